//! Data models for the spaced repetition system

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::vocabulary::VocabularyItem;

use super::algorithm::{self, BOX_COUNT, MAX_BOX_INDEX};

/// Outcome of a single review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReviewOutcome {
    Correct,
    Wrong,
    Skipped,
}

impl ReviewOutcome {
    /// Grade a raw answer. A skip wins over everything else, and a right
    /// answer only counts as correct when no hint was used.
    pub fn from_answer(correct: bool, used_hint: bool, skipped: bool) -> Self {
        if skipped {
            Self::Skipped
        } else if correct && !used_hint {
            Self::Correct
        } else {
            Self::Wrong
        }
    }
}

/// Scheduling state embedded in a vocabulary item
///
/// Deserialization runs through a wire-tolerant raw mirror that coerces
/// malformed fields instead of rejecting the record, so the typed invariants
/// (`box_index <= 5`, non-negative counters) hold for every value built from
/// stored data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawSrsMetadata")]
pub struct SrsMetadata {
    /// Current Leitner box, 0..=5
    pub box_index: u8,
    /// Next eligible review time; `None` = never reviewed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_at: Option<DateTime<Utc>>,
    /// Last computed spacing interval in days
    pub interval: u32,
    pub total_correct: u32,
    pub total_wrong: u32,
    /// Consecutive correct answers since the last wrong one
    pub streak: u32,
    pub skipped_count: u32,
    /// Most recent outcome; `None` until a review is recorded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_result: Option<ReviewOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_reviewed_at: Option<DateTime<Utc>>,
    /// Set once when the metadata is first created, never overwritten
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl SrsMetadata {
    /// Fresh metadata for a never-reviewed item
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            box_index: 0,
            due_at: None,
            interval: algorithm::interval_for_box(0),
            total_correct: 0,
            total_wrong: 0,
            streak: 0,
            skipped_count: 0,
            last_result: None,
            last_reviewed_at: None,
            created_at: Some(now),
        }
    }

    /// Repair invariants on an in-memory value. Idempotent. Values read
    /// through serde are already coerced field by field, so only the box
    /// clamp and the creation stamp remain.
    pub fn normalize(&mut self, now: DateTime<Utc>) {
        if self.box_index > MAX_BOX_INDEX {
            self.box_index = MAX_BOX_INDEX;
        }
        if self.created_at.is_none() {
            self.created_at = Some(now);
        }
    }

    /// Whether the item should be counted as due. Never-reviewed items have
    /// no due date and count as due.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.due_at.map_or(true, |due| due <= now)
    }
}

/// Aggregate corpus snapshot, computed on demand and never persisted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxDistribution {
    pub total: usize,
    /// Items due now, with never-reviewed items counted as due
    pub due: usize,
    /// Item count per Leitner box
    pub boxes: [usize; BOX_COUNT],
}

/// One prepared practice run: the prioritized items plus a corpus snapshot.
/// An empty `items` with a nonzero `counts.total` means "nothing to review",
/// as opposed to "nothing captured yet".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeSession {
    pub items: Vec<VocabularyItem>,
    pub counts: BoxDistribution,
}

/// Wire-tolerant mirror of [`SrsMetadata`]. Stored records have been through
/// several extension versions; each field is coerced independently so one bad
/// value cannot wipe the rest of the record.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawSrsMetadata {
    #[serde(deserialize_with = "lenient_int")]
    box_index: Option<i64>,
    #[serde(deserialize_with = "lenient_datetime")]
    due_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient_int")]
    interval: Option<i64>,
    #[serde(deserialize_with = "lenient_int")]
    total_correct: Option<i64>,
    #[serde(deserialize_with = "lenient_int")]
    total_wrong: Option<i64>,
    #[serde(deserialize_with = "lenient_int")]
    streak: Option<i64>,
    #[serde(deserialize_with = "lenient_int")]
    skipped_count: Option<i64>,
    #[serde(deserialize_with = "lenient_outcome")]
    last_result: Option<ReviewOutcome>,
    #[serde(deserialize_with = "lenient_datetime")]
    last_reviewed_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient_datetime")]
    created_at: Option<DateTime<Utc>>,
}

impl From<RawSrsMetadata> for SrsMetadata {
    fn from(raw: RawSrsMetadata) -> Self {
        let box_index = raw.box_index.unwrap_or(0).clamp(0, i64::from(MAX_BOX_INDEX)) as u8;
        // A stored zero is a real interval (box 0 after a demotion); only a
        // missing or negative value falls back to the table.
        let interval = match raw.interval {
            Some(days) if days >= 0 => days.min(i64::from(u32::MAX)) as u32,
            _ => algorithm::interval_for_box(box_index),
        };
        Self {
            box_index,
            due_at: raw.due_at,
            interval,
            total_correct: non_negative(raw.total_correct),
            total_wrong: non_negative(raw.total_wrong),
            streak: non_negative(raw.streak),
            skipped_count: non_negative(raw.skipped_count),
            last_result: raw.last_result,
            last_reviewed_at: raw.last_reviewed_at,
            created_at: raw.created_at,
        }
    }
}

fn non_negative(value: Option<i64>) -> u32 {
    match value {
        Some(v) if v > 0 => v.min(i64::from(u32::MAX)) as u32,
        _ => 0,
    }
}

/// Keep finite numbers (truncating any fraction), drop everything else
fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        _ => None,
    })
}

/// Accept RFC 3339 strings or epoch milliseconds (older records stored
/// `Date.now()` numbers); anything else is treated as absent
fn lenient_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => DateTime::parse_from_rfc3339(&s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Value::Number(n) => n
            .as_i64()
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single()),
        _ => None,
    })
}

fn lenient_outcome<'de, D>(deserializer: D) -> Result<Option<ReviewOutcome>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Deserializer for an item's `srs` field: anything that is not a structured
/// record comes back as `None`, and `normalize` rebuilds it from defaults
pub(crate) fn lenient_srs<'de, D>(deserializer: D) -> Result<Option<SrsMetadata>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}
