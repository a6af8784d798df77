//! Vocabulary item model
//!
//! Items arrive from capture surfaces (browser selection, manual entry) and
//! are stored with camelCase keys. Scheduling metadata is optional on the
//! wire; an item without it has simply never been reviewed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::srs::models::{lenient_srs, SrsMetadata};

/// One captured word or phrase together with its review state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyItem {
    pub id: Uuid,
    /// The word as captured, in the language being learned
    pub original_word: String,
    pub translated_word: String,
    /// BCP 47 style code of the language being learned, e.g. "de"
    pub source_language: String,
    pub target_language: String,
    /// Sentence or phrase the word was captured from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// Absent until the first normalization; tolerated as junk on the wire
    #[serde(
        default,
        deserialize_with = "lenient_srs",
        skip_serializing_if = "Option::is_none"
    )]
    pub srs: Option<SrsMetadata>,
}

impl VocabularyItem {
    pub fn new(
        original_word: String,
        translated_word: String,
        source_language: String,
        target_language: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            original_word,
            translated_word,
            source_language,
            target_language,
            context: None,
            srs: None,
        }
    }

    pub fn with_context(mut self, context: String) -> Self {
        self.context = Some(context);
        self
    }

    /// Ensure the item carries usable scheduling metadata.
    ///
    /// Installs defaults when metadata is missing and repairs out-of-range
    /// fields otherwise. The result is not written back to storage; the next
    /// recorded review persists it.
    pub fn normalize(&mut self, now: DateTime<Utc>) {
        match self.srs.as_mut() {
            Some(srs) => srs.normalize(now),
            None => self.srs = Some(SrsMetadata::new(now)),
        }
    }

    /// Whether the item should be offered for review now.
    /// Never-reviewed items are always due.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.srs.as_ref().map_or(true, |srs| srs.is_due(now))
    }
}
