//! Enrichment stage: bounded concurrent summarization of the top items.

use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use crate::ai::{AiError, Summarizer};
use crate::content::{ScrapedContent, Summary};
use crate::metrics;
use crate::notify::NotificationDispatcher;

use super::types::{EnrichProgress, EnrichProgressCallback, EnrichStats};

/// Title given to an item that failed enrichment and had none.
pub const UNTITLED: &str = "Untitled";

/// Body given to an item that failed enrichment and had none.
pub const PROCESSING_FAILED: &str = "Content processing failed";

/// Summarize every item in place with at most `batch_size` calls in flight.
///
/// Items are never dropped. A failed item keeps what it had, with
/// placeholders for an empty title or body.
pub(crate) async fn enrich_all(
    summarizer: &dyn Summarizer,
    items: &mut [ScrapedContent],
    batch_size: usize,
    notifications: &NotificationDispatcher,
    progress: Option<&EnrichProgressCallback>,
) -> EnrichStats {
    let total = items.len();
    if total == 0 {
        return EnrichStats::default();
    }

    info!(items = total, batch_size, "Enriching content");

    let outcomes: Vec<(usize, Result<Summary, AiError>)> = {
        let snapshot: &[ScrapedContent] = &*items;
        let mut pending = stream::iter(snapshot.iter().enumerate())
            .map(|(idx, item)| async move {
                let result = summarizer.summarize(item).await;
                if let Err(e) = &result {
                    warn!(id = %item.id, error = %e, "Enrichment failed, applying fallbacks");
                    notifications
                        .warning(
                            "Enrichment failed",
                            &format!("Item {} kept unenriched: {}", item.id, e),
                        )
                        .await;
                }
                (idx, result)
            })
            .buffer_unordered(batch_size.max(1));

        let mut outcomes = Vec::with_capacity(total);
        while let Some((idx, result)) = pending.next().await {
            let update = EnrichProgress {
                id: snapshot[idx].id.clone(),
                completed: outcomes.len() + 1,
                total,
                ok: result.is_ok(),
            };
            debug!(
                id = %update.id,
                completed = update.completed,
                total = update.total,
                ok = update.ok,
                "Enrichment progress"
            );
            if let Some(callback) = progress {
                callback(&update);
            }
            outcomes.push((idx, result));
        }
        outcomes
    };

    let mut stats = EnrichStats::default();
    for (idx, result) in outcomes {
        let item = &mut items[idx];
        match result {
            Ok(summary) => {
                apply_summary(item, summary);
                stats.enriched += 1;
                metrics::ENRICHMENT_TOTAL.with_label_values(&["success"]).inc();
            }
            Err(_) => {
                apply_fallbacks(item);
                stats.fallbacks += 1;
                metrics::ENRICHMENT_TOTAL.with_label_values(&["fallback"]).inc();
            }
        }
    }

    info!(
        enriched = stats.enriched,
        fallbacks = stats.fallbacks,
        "Enrichment finished"
    );
    stats
}

fn apply_summary(item: &mut ScrapedContent, summary: Summary) {
    item.title = summary.title;
    item.content = summary.content;
    item.metadata.keywords = summary.keywords;
}

fn apply_fallbacks(item: &mut ScrapedContent) {
    if item.title.trim().is_empty() {
        item.title = UNTITLED.to_string();
    }
    if item.content.trim().is_empty() {
        item.content = PROCESSING_FAILED.to_string();
    }
}
