//! Wordbox scheduling core
//!
//! Leitner-box spaced repetition for a personal vocabulary corpus. The
//! library is host-agnostic: a browser extension (or any other host) brings
//! its own [`vocabulary::VocabularyStore`] and drives reviews through
//! [`srs::ReviewScheduler`]. All scheduling math is pure and takes the
//! current instant as an argument, so hosts and tests control time.

pub mod srs;
pub mod vocabulary;

pub use srs::{
    apply_review, BoxDistribution, PracticeSession, ReviewOutcome, ReviewScheduler,
    SchedulerError, SrsMetadata,
};
pub use vocabulary::{MemoryVocabularyStore, StoreError, VocabularyItem, VocabularyStore};
