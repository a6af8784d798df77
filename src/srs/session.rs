//! Practice session selection and corpus statistics
//!
//! Selection fills a bounded session by priority: overdue items first (most
//! overdue leading), then never-reviewed items, then items due within the
//! next two days. If that still leaves room, the rest of the corpus is
//! shuffled and used as filler so a session is only ever shorter than the
//! limit when the corpus itself is.

use chrono::{DateTime, Duration, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::vocabulary::VocabularyItem;

use super::algorithm::MAX_BOX_INDEX;
use super::models::BoxDistribution;

/// How far ahead an upcoming review still counts as "near due"
pub const NEAR_DUE_WINDOW_DAYS: i64 = 2;

/// Pick at most `limit` items for one practice run.
///
/// Items must already be normalized; an item without metadata is treated as
/// never reviewed. Only the overdue bucket is sorted (ascending by due time,
/// stable so ties keep corpus order); the other buckets keep corpus order,
/// and the random filler draws through the caller's rng so selection stays
/// reproducible under a seeded generator.
pub fn select_session<R>(
    items: &[VocabularyItem],
    limit: usize,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Vec<VocabularyItem>
where
    R: Rng + ?Sized,
{
    if limit == 0 || items.is_empty() {
        return Vec::new();
    }

    let horizon = now + Duration::days(NEAR_DUE_WINDOW_DAYS);

    let mut due: Vec<&VocabularyItem> = Vec::new();
    let mut fresh: Vec<&VocabularyItem> = Vec::new();
    let mut near_due: Vec<&VocabularyItem> = Vec::new();
    let mut later: Vec<&VocabularyItem> = Vec::new();

    for item in items {
        match item.srs.as_ref().and_then(|srs| srs.due_at) {
            None => fresh.push(item),
            Some(at) if at <= now => due.push(item),
            Some(at) if at <= horizon => near_due.push(item),
            Some(_) => later.push(item),
        }
    }

    due.sort_by_key(|item| item.srs.as_ref().and_then(|srs| srs.due_at));

    let mut selected: Vec<VocabularyItem> = Vec::new();
    for item in due.into_iter().chain(fresh).chain(near_due) {
        if selected.len() >= limit {
            break;
        }
        selected.push(item.clone());
    }

    // Filler: pad a thin session with a random draw from the items that are
    // not due for a while yet
    if selected.len() < limit {
        later.shuffle(rng);
        for item in later {
            if selected.len() >= limit {
                break;
            }
            selected.push(item.clone());
        }
    }

    selected
}

/// Count the items due for review, with never-reviewed items counted as due
pub fn count_due(items: &[VocabularyItem], now: DateTime<Utc>) -> usize {
    items.iter().filter(|item| item.is_due(now)).count()
}

/// Tally the corpus into per-box counts plus the due counter
pub fn box_distribution(items: &[VocabularyItem], now: DateTime<Utc>) -> BoxDistribution {
    let mut counts = BoxDistribution::default();
    counts.total = items.len();

    for item in items {
        let box_index = item
            .srs
            .as_ref()
            .map_or(0, |srs| srs.box_index.min(MAX_BOX_INDEX));
        counts.boxes[usize::from(box_index)] += 1;
        if item.is_due(now) {
            counts.due += 1;
        }
    }

    counts
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use uuid::Uuid;

    use crate::srs::models::SrsMetadata;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap()
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn item(word: &str) -> VocabularyItem {
        VocabularyItem::new(
            word.to_string(),
            format!("{}-translated", word),
            "de".to_string(),
            "en".to_string(),
        )
    }

    fn item_due_at(word: &str, due: DateTime<Utc>) -> VocabularyItem {
        let mut it = item(word);
        let mut srs = SrsMetadata::new(now());
        srs.due_at = Some(due);
        it.srs = Some(srs);
        it
    }

    fn ids(items: &[VocabularyItem]) -> Vec<Uuid> {
        items.iter().map(|item| item.id).collect()
    }

    #[test]
    fn test_empty_corpus_and_zero_limit() {
        assert!(select_session(&[], 10, now(), &mut rng()).is_empty());
        assert!(select_session(&[item("a")], 0, now(), &mut rng()).is_empty());
        assert_eq!(count_due(&[], now()), 0);
        assert_eq!(box_distribution(&[], now()), BoxDistribution::default());
    }

    #[test]
    fn test_selection_never_exceeds_limit_or_corpus() {
        let items = vec![item("a"), item("b"), item("c")];
        assert_eq!(select_session(&items, 2, now(), &mut rng()).len(), 2);
        assert_eq!(select_session(&items, 9, now(), &mut rng()).len(), 3);
    }

    #[test]
    fn test_overdue_items_come_first_most_overdue_leading() {
        let items = vec![
            item_due_at("one-hour-late", now() - Duration::hours(1)),
            item_due_at("three-days-late", now() - Duration::days(3)),
            item_due_at("one-day-late", now() - Duration::days(1)),
        ];

        let selected = select_session(&items, 3, now(), &mut rng());
        assert_eq!(
            ids(&selected),
            vec![items[1].id, items[2].id, items[0].id]
        );
    }

    #[test]
    fn test_due_then_fresh_then_near_due() {
        let items = vec![
            item_due_at("near", now() + Duration::days(1)),
            item("fresh"),
            item_due_at("due", now() - Duration::hours(2)),
        ];

        let selected = select_session(&items, 3, now(), &mut rng());
        assert_eq!(
            ids(&selected),
            vec![items[2].id, items[1].id, items[0].id]
        );
    }

    #[test]
    fn test_three_due_two_fresh_limit_four() {
        let items = vec![
            item_due_at("due-recent", now() - Duration::hours(1)),
            item("fresh-a"),
            item_due_at("due-oldest", now() - Duration::days(2)),
            item("fresh-b"),
            item_due_at("due-middle", now() - Duration::days(1)),
        ];

        let selected = select_session(&items, 4, now(), &mut rng());

        // All three due items sorted by due time, then the first fresh item
        assert_eq!(
            ids(&selected),
            vec![items[2].id, items[4].id, items[0].id, items[1].id]
        );
    }

    #[test]
    fn test_items_beyond_window_are_filler_only() {
        let far = item_due_at("far", now() + Duration::days(10));
        let due = item_due_at("due", now() - Duration::hours(1));

        // With the limit already satisfied the far-future item stays out
        let selected = select_session(&[far.clone(), due.clone()], 1, now(), &mut rng());
        assert_eq!(ids(&selected), vec![due.id]);

        // With room to spare it gets pulled in as filler
        let selected = select_session(&[far.clone(), due.clone()], 2, now(), &mut rng());
        assert_eq!(selected.len(), 2);
        assert!(ids(&selected).contains(&far.id));
    }

    #[test]
    fn test_filler_draw_is_seed_reproducible() {
        let items: Vec<VocabularyItem> = (0..20)
            .map(|i| item_due_at(&format!("far-{}", i), now() + Duration::days(3 + i)))
            .collect();

        let first = select_session(&items, 5, now(), &mut rng());
        let second = select_session(&items, 5, now(), &mut rng());

        assert_eq!(first.len(), 5);
        assert_eq!(ids(&first), ids(&second));
    }

    #[test]
    fn test_missing_metadata_counts_as_fresh() {
        let items = vec![
            item_due_at("due", now() - Duration::hours(1)),
            item("never-scheduled"),
        ];

        let selected = select_session(&items, 2, now(), &mut rng());
        assert_eq!(ids(&selected), vec![items[0].id, items[1].id]);
        assert_eq!(count_due(&items, now()), 2);
    }

    #[test]
    fn test_count_due_includes_fresh_items() {
        let items = vec![
            item("fresh"),
            item_due_at("due", now() - Duration::hours(1)),
            item_due_at("upcoming", now() + Duration::days(1)),
        ];
        assert_eq!(count_due(&items, now()), 2);
    }

    #[test]
    fn test_box_distribution_tallies() {
        let mut mastered = item_due_at("mastered", now() + Duration::days(20));
        if let Some(srs) = mastered.srs.as_mut() {
            srs.box_index = 5;
        }
        let items = vec![
            item("fresh"),
            item_due_at("due", now() - Duration::hours(1)),
            mastered,
        ];

        let counts = box_distribution(&items, now());
        assert_eq!(counts.total, 3);
        assert_eq!(counts.due, 2);
        assert_eq!(counts.boxes, [2, 0, 0, 0, 0, 1]);
    }
}
