//! Rank stage and the score-based filter/sort/truncate step.

use std::collections::HashMap;

use tracing::{error, info, warn};

use crate::ai::Ranker;
use crate::config::{ConfigProvider, ARTICLE_COUNT_KEY};
use crate::content::{RankResult, ScrapedContent};
use crate::metrics;
use crate::notify::NotificationDispatcher;

use super::types::StageOutcome;

/// Ask the ranker to score `items`.
///
/// A ranker failure degrades to an empty result list.
pub(crate) async fn rank(
    ranker: &dyn Ranker,
    items: &[ScrapedContent],
    notifications: &NotificationDispatcher,
) -> StageOutcome<Vec<RankResult>> {
    match ranker.rank(items).await {
        Ok(results) => {
            info!(items = items.len(), scored = results.len(), "Ranked content");
            metrics::RANK_TOTAL.with_label_values(&["success"]).inc();
            StageOutcome::Complete(results)
        }
        Err(e) => {
            error!(error = %e, "Ranking failed, continuing unranked");
            metrics::RANK_TOTAL.with_label_values(&["failed"]).inc();
            notifications
                .error("Ranking failed", &format!("Continuing without scores: {}", e))
                .await;
            StageOutcome::Degraded {
                value: Vec::new(),
                reason: format!("ranking failed: {}", e),
            }
        }
    }
}

/// Keep only the items that were scored, carrying their scores.
///
/// With no results at all every item is kept unscored.
pub fn apply_scores(items: Vec<ScrapedContent>, results: &[RankResult]) -> Vec<ScrapedContent> {
    if results.is_empty() {
        warn!(items = items.len(), "Nothing scored, keeping all items unranked");
        return items;
    }

    let scores: HashMap<&str, f64> = results
        .iter()
        .map(|r| (r.id.as_str(), r.score))
        .collect();

    items
        .into_iter()
        .filter_map(|mut item| {
            let score = *scores.get(item.id.as_str())?;
            item.score = score;
            Some(item)
        })
        .collect()
}

/// Stable sort, highest score first.
pub fn sort_by_score(items: &mut [ScrapedContent]) {
    items.sort_by(|a, b| b.score.total_cmp(&a.score));
}

/// How many items to publish: the `article_count` setting, or `default`.
pub fn resolve_top_n(settings: &dyn ConfigProvider, default: usize) -> usize {
    match settings.get_usize(ARTICLE_COUNT_KEY) {
        Some(n) => n,
        None => {
            if settings.get(ARTICLE_COUNT_KEY).is_some() {
                warn!(
                    key = ARTICLE_COUNT_KEY,
                    fallback = default,
                    "Invalid article count setting, using default"
                );
            } else {
                warn!(
                    key = ARTICLE_COUNT_KEY,
                    fallback = default,
                    "Article count not set, using default"
                );
            }
            default
        }
    }
}

/// Join, sort and return the filtered list plus how many of it to publish.
pub fn filter_and_sort(
    items: Vec<ScrapedContent>,
    results: &[RankResult],
    top_n: usize,
) -> (Vec<ScrapedContent>, usize) {
    let mut filtered = apply_scores(items, results);
    sort_by_score(&mut filtered);
    let n = top_n.min(filtered.len());
    (filtered, n)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::ai::AiError;
    use crate::testing::{fixtures, MockNotifier, MockRanker, MockSettings};

    fn ids(items: &[ScrapedContent]) -> Vec<&str> {
        items.iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn test_inner_join_drops_unscored() {
        let items = vec![
            fixtures::item("A"),
            fixtures::item("B"),
            fixtures::item("C"),
        ];
        let results = vec![RankResult::new("A", 0.9), RankResult::new("B", 0.4)];

        let (filtered, n) = filter_and_sort(items, &results, 10);
        assert_eq!(ids(&filtered), vec!["A", "B"]);
        assert_eq!(filtered[0].score, 0.9);
        assert_eq!(filtered[1].score, 0.4);
        assert_eq!(n, 2);
    }

    #[test]
    fn test_unknown_ids_in_results_are_ignored() {
        let items = vec![fixtures::item("A")];
        let results = vec![RankResult::new("Z", 1.0), RankResult::new("A", 0.2)];
        let filtered = apply_scores(items, &results);
        assert_eq!(ids(&filtered), vec!["A"]);
    }

    #[test]
    fn test_empty_results_keep_everything() {
        let items = fixtures::items("x", 4);
        let filtered = apply_scores(items.clone(), &[]);
        assert_eq!(filtered, items);
        assert!(filtered.iter().all(|i| i.score == 0.0));
    }

    #[test]
    fn test_sort_is_descending_and_stable() {
        let mut items = vec![
            fixtures::scored("a", 0.1),
            fixtures::scored("b", 0.5),
            fixtures::scored("c", 0.5),
            fixtures::scored("d", 0.9),
        ];
        sort_by_score(&mut items);
        assert_eq!(ids(&items), vec!["d", "b", "c", "a"]);
    }

    #[test]
    fn test_truncates_to_highest_n() {
        let items: Vec<_> = (0..15).map(|i| fixtures::item(&format!("i{}", i))).collect();
        let results: Vec<_> = (0..15)
            .map(|i| RankResult::new(format!("i{}", i), i as f64 / 15.0))
            .collect();

        let (filtered, n) = filter_and_sort(items, &results, 10);
        assert_eq!(filtered.len(), 15);
        assert_eq!(n, 10);
        let top: Vec<_> = filtered[..n].iter().map(|i| i.id.clone()).collect();
        let expected: Vec<_> = (5..15).rev().map(|i| format!("i{}", i)).collect();
        assert_eq!(top, expected);
    }

    #[test]
    fn test_resolve_top_n() {
        let settings = MockSettings::new();
        assert_eq!(resolve_top_n(&settings, 10), 10);

        settings.set(ARTICLE_COUNT_KEY, serde_json::json!(4));
        assert_eq!(resolve_top_n(&settings, 10), 4);

        settings.set(ARTICLE_COUNT_KEY, serde_json::json!("6"));
        assert_eq!(resolve_top_n(&settings, 10), 6);

        settings.set(ARTICLE_COUNT_KEY, serde_json::json!(0));
        assert_eq!(resolve_top_n(&settings, 10), 10);

        settings.set(ARTICLE_COUNT_KEY, serde_json::json!("many"));
        assert_eq!(resolve_top_n(&settings, 10), 10);
    }

    #[tokio::test]
    async fn test_rank_failure_degrades() {
        let ranker = MockRanker::new();
        ranker
            .set_next_error(AiError::Other("model overloaded".to_string()))
            .await;
        let notifier = MockNotifier::new();
        let dispatcher = NotificationDispatcher::new(Arc::new(notifier.clone()));

        let outcome = rank(&ranker, &fixtures::items("x", 3), &dispatcher).await;
        match outcome {
            StageOutcome::Degraded { value, reason } => {
                assert!(value.is_empty());
                assert!(reason.contains("model overloaded"));
            }
            other => panic!("expected degraded outcome, got {:?}", other),
        }
        assert_eq!(ranker.call_count().await, 1);
        assert_eq!(notifier.sent().await.len(), 1);
    }
}
