//! Content pipeline runner.
//!
//! Drives one run through a fixed sequence of stages:
//! Scrape -> Rank -> Filter -> Enrich -> Headline -> Cover -> Publish -> Report.
//!
//! Failures are absorbed as close to their origin as possible (source, then
//! item, then stage). Only a missing scraper and errors from Headline onward
//! end the run with an error.

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::ai::{Ranker, Summarizer};
use crate::config::{ConfigProvider, SourceProvider};
use crate::content::{PublishRecord, RankResult, ScrapedContent};
use crate::image::{ImageGenerator, ImageRef, ImageRequest};
use crate::metrics;
use crate::notify::{NotificationDispatcher, Notifier};
use crate::publisher::{PublishRequest, Publisher};
use crate::render::Renderer;
use crate::scraper::ScraperRegistry;

use super::config::PipelineConfig;
use super::enrich::enrich_all;
use super::headline::{
    compose_headline, cover_prompt, cover_subtitle, format_date, format_report, join_titles,
    short_title,
};
use super::ranking::{filter_and_sort, rank, resolve_top_n};
use super::scrape::scrape_all;
use super::types::{
    EnrichProgressCallback, EnrichStats, PipelineError, RunOutcome, RunReport, RunStats,
    StageOutcome,
};

/// External capabilities the pipeline calls into.
#[derive(Clone)]
pub struct PipelineCollaborators {
    pub scrapers: ScraperRegistry,
    pub ranker: Arc<dyn Ranker>,
    pub summarizer: Arc<dyn Summarizer>,
    pub image_generator: Arc<dyn ImageGenerator>,
    pub publisher: Arc<dyn Publisher>,
    pub renderer: Arc<dyn Renderer>,
    pub notifier: Arc<dyn Notifier>,
    pub settings: Arc<dyn ConfigProvider>,
    pub sources: Arc<dyn SourceProvider>,
}

/// Where a run is between stages.
enum RunState {
    Scrape,
    Rank {
        items: Vec<ScrapedContent>,
    },
    Filter {
        items: Vec<ScrapedContent>,
        results: Vec<RankResult>,
    },
    Enrich {
        filtered: Vec<ScrapedContent>,
        top_n: usize,
    },
    Headline {
        filtered: Vec<ScrapedContent>,
        top_n: usize,
    },
    Cover {
        top: Vec<ScrapedContent>,
        headline: String,
        generated: String,
    },
    Publish {
        top: Vec<ScrapedContent>,
        headline: String,
        cover: ImageRef,
    },
    Report {
        report: RunReport,
    },
    Finished(RunOutcome),
}

impl RunState {
    fn name(&self) -> &'static str {
        match self {
            RunState::Scrape => "scrape",
            RunState::Rank { .. } => "rank",
            RunState::Filter { .. } => "filter",
            RunState::Enrich { .. } => "enrich",
            RunState::Headline { .. } => "headline",
            RunState::Cover { .. } => "cover",
            RunState::Publish { .. } => "publish",
            RunState::Report { .. } => "report",
            RunState::Finished(_) => "finished",
        }
    }
}

/// Accumulated while the run moves through its states.
#[derive(Default)]
struct RunContext {
    stats: RunStats,
    enrich: EnrichStats,
    degraded: Vec<String>,
}

/// Single-run content pipeline.
pub struct ContentPipeline {
    config: PipelineConfig,
    scrapers: ScraperRegistry,
    ranker: Arc<dyn Ranker>,
    summarizer: Arc<dyn Summarizer>,
    image_generator: Arc<dyn ImageGenerator>,
    publisher: Arc<dyn Publisher>,
    renderer: Arc<dyn Renderer>,
    settings: Arc<dyn ConfigProvider>,
    sources: Arc<dyn SourceProvider>,
    notifications: NotificationDispatcher,
    progress: Option<EnrichProgressCallback>,
    run_date: Option<NaiveDate>,
}

impl ContentPipeline {
    /// Create a pipeline. Fails if a configured source type has no scraper.
    pub fn new(
        config: PipelineConfig,
        collaborators: PipelineCollaborators,
    ) -> Result<Self, PipelineError> {
        if let Some(missing) = collaborators.scrapers.first_missing(&config.source_types) {
            error!(source_type = %missing, "No scraper registered for configured source type");
            return Err(PipelineError::MissingScraper(missing));
        }

        Ok(Self {
            config,
            scrapers: collaborators.scrapers,
            ranker: collaborators.ranker,
            summarizer: collaborators.summarizer,
            image_generator: collaborators.image_generator,
            publisher: collaborators.publisher,
            renderer: collaborators.renderer,
            settings: collaborators.settings,
            sources: collaborators.sources,
            notifications: NotificationDispatcher::new(collaborators.notifier),
            progress: None,
            run_date: None,
        })
    }

    /// Receive a progress update per enriched item.
    pub fn with_progress_callback(mut self, callback: EnrichProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    /// Pin the date used in the headline. Defaults to today, local time.
    pub fn with_run_date(mut self, date: NaiveDate) -> Self {
        self.run_date = Some(date);
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Execute one run.
    ///
    /// Returns `Ok(RunOutcome::NoContent)` when nothing was scraped. Any
    /// error is logged and reported as an error notification before it is
    /// returned.
    pub async fn run(&self) -> Result<RunOutcome, PipelineError> {
        let run_id = Uuid::new_v4();
        let span = info_span!("pipeline_run", run_id = %run_id);

        async {
            info!("Starting pipeline run");
            let result = self.drive().await;

            match &result {
                Ok(RunOutcome::NoContent { .. }) => {
                    metrics::RUNS_TOTAL.with_label_values(&["no_content"]).inc();
                }
                Ok(RunOutcome::Published(report)) => {
                    let outcome = if report.stats.has_failures() {
                        "partial"
                    } else {
                        "published"
                    };
                    metrics::RUNS_TOTAL.with_label_values(&[outcome]).inc();
                }
                Err(e) => {
                    error!(error = %e, "Pipeline run failed");
                    metrics::RUNS_TOTAL.with_label_values(&["failed"]).inc();
                    self.notifications
                        .error("Pipeline failed", &e.to_string())
                        .await;
                }
            }

            result
        }
        .instrument(span)
        .await
    }

    async fn drive(&self) -> Result<RunOutcome, PipelineError> {
        let mut ctx = RunContext::default();
        let mut state = RunState::Scrape;

        loop {
            let stage = state.name();
            if let RunState::Finished(outcome) = state {
                info!("Pipeline run finished");
                return Ok(outcome);
            }

            debug!(stage, "Entering stage");
            let timer = metrics::STAGE_DURATION
                .with_label_values(&[stage])
                .start_timer();
            state = self.step(state, &mut ctx).await?;
            timer.observe_duration();
        }
    }

    async fn step(&self, state: RunState, ctx: &mut RunContext) -> Result<RunState, PipelineError> {
        match state {
            RunState::Scrape => self.scrape_stage(ctx).await,
            RunState::Rank { items } => Ok(self.rank_stage(items, ctx).await),
            RunState::Filter { items, results } => Ok(self.filter_stage(items, &results)),
            RunState::Enrich {
                mut filtered,
                top_n,
            } => {
                ctx.enrich = enrich_all(
                    self.summarizer.as_ref(),
                    &mut filtered[..top_n],
                    self.config.enrich_batch_size,
                    &self.notifications,
                    self.progress.as_ref(),
                )
                .await;
                self.notifications
                    .info(
                        "Enrichment finished",
                        &format!(
                            "{} enriched, {} with fallbacks",
                            ctx.enrich.enriched, ctx.enrich.fallbacks
                        ),
                    )
                    .await;
                Ok(RunState::Headline { filtered, top_n })
            }
            RunState::Headline { filtered, top_n } => self.headline_stage(filtered, top_n).await,
            RunState::Cover {
                top,
                headline,
                generated,
            } => self.cover_stage(top, headline, &generated).await,
            RunState::Publish {
                top,
                headline,
                cover,
            } => self.publish_stage(top, headline, cover, ctx).await,
            RunState::Report { report } => Ok(self.report_stage(report).await),
            RunState::Finished(outcome) => Ok(RunState::Finished(outcome)),
        }
    }

    async fn scrape_stage(&self, ctx: &mut RunContext) -> Result<RunState, PipelineError> {
        let sources = self.sources.get_sources();
        let total = sources.count(&self.config.source_types);
        self.notifications
            .info("Pipeline started", &format!("Scraping {} sources", total))
            .await;

        let output = scrape_all(
            &self.scrapers,
            &self.config.source_types,
            &sources,
            &self.notifications,
        )
        .await?;

        let (stats, outcome) = output.into_outcome();
        ctx.stats = stats;
        info!(
            success = stats.success,
            failed = stats.failed,
            contents = stats.contents,
            "Scrape finished"
        );

        match outcome {
            StageOutcome::Complete(items) | StageOutcome::Degraded { value: items, .. } => {
                self.notifications
                    .info(
                        "Scrape finished",
                        &format!(
                            "{} items from {} of {} sources",
                            stats.contents,
                            stats.success,
                            stats.sources()
                        ),
                    )
                    .await;
                Ok(RunState::Rank { items })
            }
            StageOutcome::Halt { reason } => {
                warn!(reason = %reason, "No content scraped, ending run");
                self.notifications.error("No content", &reason).await;
                Ok(RunState::Finished(RunOutcome::NoContent { stats }))
            }
        }
    }

    async fn rank_stage(&self, items: Vec<ScrapedContent>, ctx: &mut RunContext) -> RunState {
        let results = match rank(self.ranker.as_ref(), &items, &self.notifications).await {
            StageOutcome::Complete(results) => results,
            StageOutcome::Degraded { value, reason } => {
                ctx.degraded.push(reason);
                value
            }
            StageOutcome::Halt { reason } => {
                warn!(reason = %reason, "Ranking halted, continuing unranked");
                Vec::new()
            }
        };
        RunState::Filter { items, results }
    }

    fn filter_stage(&self, items: Vec<ScrapedContent>, results: &[RankResult]) -> RunState {
        let wanted = resolve_top_n(self.settings.as_ref(), self.config.top_n);
        let scraped = items.len();
        let (filtered, top_n) = filter_and_sort(items, results, wanted);
        info!(
            scraped,
            kept = filtered.len(),
            top_n,
            "Filtered and sorted content"
        );
        RunState::Enrich { filtered, top_n }
    }

    async fn headline_stage(
        &self,
        mut filtered: Vec<ScrapedContent>,
        top_n: usize,
    ) -> Result<RunState, PipelineError> {
        let joined = join_titles(&filtered, &self.config.title_separator);
        let generated = self.summarizer.generate_title(&joined).await?;

        let date = self.formatted_date();
        let headline = compose_headline(
            &date,
            &self.config.campaign_label,
            &generated,
            self.config.headline_max_chars,
        );
        info!(headline = %headline, "Generated headline");

        filtered.truncate(top_n);
        Ok(RunState::Cover {
            top: filtered,
            headline,
            generated,
        })
    }

    async fn cover_stage(
        &self,
        top: Vec<ScrapedContent>,
        headline: String,
        generated: &str,
    ) -> Result<RunState, PipelineError> {
        let title = short_title(
            &headline,
            &self.config.title_separator,
            generated,
            self.config.short_title_max_chars,
        );
        let request = ImageRequest {
            provider: self.config.cover_provider.clone(),
            prompt: cover_prompt(&self.config.cover_prompt_keywords, &title),
            subtitle: cover_subtitle(&self.formatted_date(), &self.config.campaign_label),
            title,
            mode: self.config.cover_mode.clone(),
            count: 1,
        };

        let cover = self.image_generator.generate(request).await?;
        info!(cover = %cover, "Generated cover image");

        Ok(RunState::Publish {
            top,
            headline,
            cover,
        })
    }

    async fn publish_stage(
        &self,
        top: Vec<ScrapedContent>,
        headline: String,
        cover: ImageRef,
        ctx: &mut RunContext,
    ) -> Result<RunState, PipelineError> {
        let media = self.publisher.upload_image(&cover).await?;
        debug!(media = media.as_str(), "Uploaded cover image");

        let records: Vec<PublishRecord> = top.iter().map(PublishRecord::from).collect();
        let document = self.renderer.render(&records).await?;

        let publish = self
            .publisher
            .publish(PublishRequest {
                content: document.into_inner(),
                title: headline.clone(),
                summary: headline.clone(),
                thumb_media_id: media.clone(),
            })
            .await?;
        info!(
            publisher = self.publisher.name(),
            status = %publish.status,
            id = ?publish.id,
            "Published document"
        );

        Ok(RunState::Report {
            report: RunReport {
                stats: ctx.stats,
                headline,
                cover,
                media,
                publish,
                published_items: records.len(),
                enrich: ctx.enrich,
                degraded: std::mem::take(&mut ctx.degraded),
            },
        })
    }

    async fn report_stage(&self, report: RunReport) -> RunState {
        let summary = format_report(&report.stats, &report.publish.status);
        if report.stats.has_failures() {
            warn!(failed = report.stats.failed, "Run completed with partial failures");
            self.notifications
                .warning("Pipeline completed with partial failures", &summary)
                .await;
        } else {
            info!("Run completed successfully");
            self.notifications
                .success("Pipeline completed successfully", &summary)
                .await;
        }
        RunState::Finished(RunOutcome::Published(Box::new(report)))
    }

    fn formatted_date(&self) -> String {
        let date = self.run_date.unwrap_or_else(|| Local::now().date_naive());
        format_date(date, &self.config.date_format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scraper::SourceType;
    use crate::testing::{
        MockImageGenerator, MockNotifier, MockPublisher, MockRanker, MockRenderer, MockScraper,
        MockSettings, MockSummarizer,
    };
    use crate::config::SourceLists;

    fn collaborators(scrapers: ScraperRegistry) -> PipelineCollaborators {
        PipelineCollaborators {
            scrapers,
            ranker: Arc::new(MockRanker::new()),
            summarizer: Arc::new(MockSummarizer::new()),
            image_generator: Arc::new(MockImageGenerator::new()),
            publisher: Arc::new(MockPublisher::new()),
            renderer: Arc::new(MockRenderer::new()),
            notifier: Arc::new(MockNotifier::new()),
            settings: Arc::new(MockSettings::new()),
            sources: Arc::new(SourceLists::default()),
        }
    }

    #[test]
    fn test_new_rejects_unbound_source_type() {
        let scrapers =
            ScraperRegistry::new().with(SourceType::Crawler, Arc::new(MockScraper::new()));
        let result = ContentPipeline::new(PipelineConfig::default(), collaborators(scrapers));
        assert!(matches!(
            result,
            Err(PipelineError::MissingScraper(SourceType::SocialFeed))
        ));
    }

    #[test]
    fn test_new_accepts_subset_of_types() {
        let scrapers =
            ScraperRegistry::new().with(SourceType::Crawler, Arc::new(MockScraper::new()));
        let config = PipelineConfig {
            source_types: vec![SourceType::Crawler],
            ..PipelineConfig::default()
        };
        let pipeline = ContentPipeline::new(config, collaborators(scrapers)).unwrap();
        assert_eq!(pipeline.config().source_types, vec![SourceType::Crawler]);
    }

    #[test]
    fn test_state_names() {
        assert_eq!(RunState::Scrape.name(), "scrape");
        assert_eq!(
            RunState::Enrich {
                filtered: vec![],
                top_n: 0
            }
            .name(),
            "enrich"
        );
    }
}
