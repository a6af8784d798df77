//! Vocabulary corpus for Wordbox
//!
//! This module provides:
//! - The captured word/phrase model with optional scheduling metadata
//! - The host storage boundary and an in-memory implementation

pub mod models;
pub mod store;

pub use models::*;
pub use store::{MemoryVocabularyStore, StoreError, VocabularyStore};
