//! Leitner box scheduling
//!
//! Six boxes with fixed day intervals. A correct answer promotes an item one
//! box, a wrong answer demotes it (steeply from the upper boxes), a skip
//! halves the current spacing without moving it. Sustained correct streaks in
//! the top boxes earn a super-linear interval bonus.
//!
//! Everything here is pure: `now` is always an explicit argument and the
//! functions never touch a clock, the store, or a logger.

use chrono::{DateTime, Duration, Utc};

use super::models::{ReviewOutcome, SrsMetadata};

/// Review interval in days for each box
pub const LEITNER_INTERVALS_DAYS: [u32; 6] = [0, 1, 3, 7, 14, 30];

/// Highest box index
pub const MAX_BOX_INDEX: u8 = 5;

/// Number of boxes
pub const BOX_COUNT: usize = LEITNER_INTERVALS_DAYS.len();

/// Cooldown used instead of an immediate re-schedule whenever an interval
/// computes to zero days (box 0, or a skip that halves to nothing)
pub const ZERO_INTERVAL_COOLDOWN_MINUTES: i64 = 2;

/// Lowest box that earns the streak bonus on a correct answer
const MASTERY_BONUS_MIN_BOX: u8 = 4;

/// Table interval for a box, floored to one day where the table says zero.
/// Used when (re)building metadata; live scheduling keeps the raw zero and
/// applies the cooldown instead.
pub fn interval_for_box(box_index: u8) -> u32 {
    let days = interval_days(box_index);
    if days == 0 {
        1
    } else {
        days
    }
}

fn interval_days(box_index: u8) -> u32 {
    LEITNER_INTERVALS_DAYS[usize::from(box_index.min(MAX_BOX_INDEX))]
}

fn due_after(now: DateTime<Utc>, interval_days: u32) -> DateTime<Utc> {
    if interval_days == 0 {
        now + Duration::minutes(ZERO_INTERVAL_COOLDOWN_MINUTES)
    } else {
        now + Duration::days(i64::from(interval_days))
    }
}

/// Apply a review outcome to scheduling metadata and return the new state.
///
/// The input must already be normalized. Lifetime counters only ever grow,
/// `created_at` is left untouched, and every branch stamps `last_result` and
/// `last_reviewed_at`.
pub fn apply_review(srs: &SrsMetadata, outcome: ReviewOutcome, now: DateTime<Utc>) -> SrsMetadata {
    let mut next = srs.clone();
    // The mastery bonus rewards the streak as it stood when the answer was
    // given, not the incremented one.
    let streak_before = srs.streak;

    match outcome {
        ReviewOutcome::Skipped => {
            next.skipped_count += 1;
            // Box stays put; the item comes back after half its usual spacing
            let halved = (f64::from(interval_days(next.box_index)) * 0.5).ceil() as u32;
            next.interval = halved;
            next.due_at = Some(due_after(now, halved));
        }
        ReviewOutcome::Correct | ReviewOutcome::Wrong => {
            if outcome == ReviewOutcome::Correct {
                next.total_correct += 1;
                next.streak += 1;
                next.box_index = (next.box_index + 1).min(MAX_BOX_INDEX);
            } else {
                next.total_wrong += 1;
                next.streak = 0;
                next.box_index = demote(next.box_index);
            }

            let mut interval = interval_days(next.box_index);
            if next.box_index >= MASTERY_BONUS_MIN_BOX && outcome == ReviewOutcome::Correct {
                let bonus = 1.2 + 0.1 * f64::from(streak_before);
                interval = (f64::from(interval) * bonus).ceil() as u32;
            }
            next.interval = interval;
            next.due_at = Some(due_after(now, interval));
        }
    }

    next.last_result = Some(outcome);
    next.last_reviewed_at = Some(now);
    next
}

/// Demotion for a wrong answer: the top box restarts at 0, the upper-middle
/// boxes drop three, the lower boxes one
fn demote(box_index: u8) -> u8 {
    if box_index >= MAX_BOX_INDEX {
        0
    } else if box_index >= 3 {
        box_index - 3
    } else if box_index > 0 {
        box_index - 1
    } else {
        0
    }
}
