//! Leitner spaced repetition system for Wordbox
//!
//! This module provides:
//! - Box transition rules (promotion, demotion, skips, mastery bonus)
//! - Practice session selection with a bounded, prioritized fill
//! - Due and per-box corpus statistics
//! - A store-backed driver with injectable clock and rng

pub mod algorithm;
pub mod models;
pub mod scheduler;
pub mod session;

pub use algorithm::{apply_review, interval_for_box, LEITNER_INTERVALS_DAYS, MAX_BOX_INDEX};
pub use models::*;
pub use scheduler::{Clock, ReviewScheduler, SchedulerError, SystemClock};
pub use session::{box_distribution, count_due, select_session, NEAR_DUE_WINDOW_DAYS};
