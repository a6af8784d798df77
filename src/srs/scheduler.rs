//! Review driver
//!
//! Turns host calls (prepare a session, grade an answer, badge counts) into
//! store fetches plus pure scheduling calls. Time and randomness are
//! injected so hosts and tests control both.

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;
use uuid::Uuid;

use crate::vocabulary::{StoreError, VocabularyItem, VocabularyStore};

use super::algorithm::apply_review;
use super::models::{BoxDistribution, PracticeSession, ReviewOutcome, SrsMetadata};
use super::session::{box_distribution, count_due, select_session};

/// Source of the current instant
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Error, Debug)]
pub enum SchedulerError {
    #[error("Item not found: {0}")]
    ItemNotFound(Uuid),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Failed to persist review for {id}: {source}")]
    PersistFailed {
        id: Uuid,
        /// The schedule that could not be written, so the caller can retry
        updated: SrsMetadata,
        source: StoreError,
    },
}

pub type Result<T> = std::result::Result<T, SchedulerError>;

/// Scheduling front door for a vocabulary corpus
pub struct ReviewScheduler<S: VocabularyStore> {
    store: S,
    clock: Box<dyn Clock>,
    rng: StdRng,
}

impl<S: VocabularyStore> ReviewScheduler<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            clock: Box::new(SystemClock),
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Seed the filler shuffle, making session order reproducible
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Build a practice session of at most `limit` items.
    ///
    /// Items are normalized in memory before selection; repairs are not
    /// written back until the next recorded review. The returned counts
    /// describe the whole (language-filtered) corpus, not just the session.
    pub async fn prepare_session(
        &mut self,
        limit: usize,
        language: Option<&str>,
    ) -> Result<PracticeSession> {
        let now = self.clock.now();

        let mut items = self.fetch_corpus(language).await?;
        for item in items.iter_mut() {
            item.normalize(now);
        }

        let counts = box_distribution(&items, now);
        let selected = select_session(&items, limit, now, &mut self.rng);

        log::debug!(
            "Prepared session: {} of {} items ({} due)",
            selected.len(),
            counts.total,
            counts.due
        );

        Ok(PracticeSession {
            items: selected,
            counts,
        })
    }

    /// Grade one answer and persist the item's new schedule.
    ///
    /// `skipped` wins over the other flags, and an answer given with a hint
    /// is never counted correct.
    pub async fn record_result(
        &self,
        item_id: Uuid,
        correct: bool,
        used_hint: bool,
        skipped: bool,
    ) -> Result<SrsMetadata> {
        let now = self.clock.now();

        let item = self
            .store
            .get(item_id)
            .await?
            .ok_or(SchedulerError::ItemNotFound(item_id))?;

        let mut current = item.srs.unwrap_or_else(|| SrsMetadata::new(now));
        current.normalize(now);

        let outcome = ReviewOutcome::from_answer(correct, used_hint, skipped);
        let updated = apply_review(&current, outcome, now);

        if let Err(e) = self.store.save_srs(item_id, &updated).await {
            log::warn!("Failed to persist review for {}: {}", item_id, e);
            return Err(SchedulerError::PersistFailed {
                id: item_id,
                updated,
                source: e,
            });
        }

        log::info!(
            "Recorded {:?} for {}: box {} -> {}",
            outcome,
            item_id,
            current.box_index,
            updated.box_index
        );

        Ok(updated)
    }

    /// Number of items ready for review now, for the host's badge
    pub async fn due_count(&self, language: Option<&str>) -> Result<usize> {
        let now = self.clock.now();
        let items = self.fetch_corpus(language).await?;
        Ok(count_due(&items, now))
    }

    /// Per-box corpus breakdown for the host's stats view
    pub async fn box_counts(&self, language: Option<&str>) -> Result<BoxDistribution> {
        let now = self.clock.now();
        let items = self.fetch_corpus(language).await?;
        Ok(box_distribution(&items, now))
    }

    async fn fetch_corpus(&self, language: Option<&str>) -> Result<Vec<VocabularyItem>> {
        let mut items = self.store.fetch_all().await?;
        if let Some(language) = language {
            items.retain(|item| item.source_language == language);
        }
        Ok(items)
    }
}
