use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pressroom_core::ai::{AnthropicClient, LlmAnalyst, LlmClient, OllamaClient};
use pressroom_core::config::{LlmConfig, LlmProvider};
use pressroom_core::image::HttpImageGenerator;
use pressroom_core::notify::{LogNotifier, Notifier, WebhookNotifier};
use pressroom_core::publisher::HttpPublisher;
use pressroom_core::render::HtmlRenderer;
use pressroom_core::scraper::{FeedScraper, ScraperRegistry, SourceType};
use pressroom_core::{
    load_config, metrics, validate_config, Config, ContentPipeline, PipelineCollaborators,
    RunOutcome,
};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("pressroom {}", VERSION);

    // Determine config path
    let config_path = std::env::var("PRESSROOM_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    let config_json = serde_json::to_string(&config.pipeline).unwrap_or_default();
    let config_hash = format!("{:x}", Sha256::digest(config_json.as_bytes()));
    info!(
        "Configuration loaded successfully (pipeline hash {})",
        &config_hash[..16]
    );

    let config = Arc::new(config);
    let pipeline = build_pipeline(&config)?;

    let result = pipeline.run().await;
    write_metrics(&config);

    match result.context("Pipeline run failed")? {
        RunOutcome::NoContent { stats } => {
            warn!(
                "Run ended without content ({} sources, {} failed)",
                stats.sources(),
                stats.failed
            );
        }
        RunOutcome::Published(report) => {
            info!(
                "Published {} items as \"{}\" (status {})",
                report.published_items, report.headline, report.publish.status
            );
        }
    }

    Ok(())
}

/// Wire the HTTP collaborators from configuration.
fn build_pipeline(config: &Arc<Config>) -> Result<ContentPipeline> {
    let mut scrapers = ScraperRegistry::new();
    for source_type in SourceType::ALL {
        let scraper = FeedScraper::new(source_type, config.scraper.clone())
            .with_context(|| format!("Failed to create {} scraper", source_type))?;
        scrapers.register(source_type, Arc::new(scraper));
    }

    let llm = create_llm_client(&config.llm)?;
    let analyst = Arc::new(LlmAnalyst::new(llm, config.pipeline.title_separator.clone()));

    let image_generator = HttpImageGenerator::new(config.image.clone())
        .context("Failed to create image generator")?;
    let publisher =
        HttpPublisher::new(config.publisher.clone()).context("Failed to create publisher")?;

    let notifier: Arc<dyn Notifier> = match &config.notifier {
        Some(webhook) => {
            info!("Sending notifications to webhook");
            Arc::new(WebhookNotifier::new(webhook.clone()).context("Failed to create notifier")?)
        }
        None => {
            info!("No notifier configured, notifications are logged only");
            Arc::new(LogNotifier)
        }
    };

    let collaborators = PipelineCollaborators {
        scrapers,
        ranker: analyst.clone(),
        summarizer: analyst,
        image_generator: Arc::new(image_generator),
        publisher: Arc::new(publisher),
        renderer: Arc::new(HtmlRenderer::new()),
        notifier,
        settings: config.clone(),
        sources: config.clone(),
    };

    ContentPipeline::new(config.pipeline.clone(), collaborators)
        .context("Failed to create pipeline")
}

fn create_llm_client(config: &LlmConfig) -> Result<Arc<dyn LlmClient>> {
    let timeout = Duration::from_secs(config.timeout_secs);
    let client: Arc<dyn LlmClient> = match config.provider {
        LlmProvider::Anthropic => {
            info!("Using Anthropic model {}", config.model);
            let api_key = config.api_key.clone().unwrap_or_default();
            let mut client = AnthropicClient::new(api_key, &config.model, timeout)
                .context("Failed to create Anthropic client")?;
            if let Some(base) = &config.api_base {
                client = client.with_api_base(base);
            }
            Arc::new(client)
        }
        LlmProvider::Ollama => {
            info!("Using Ollama model {}", config.model);
            let mut client = OllamaClient::new(&config.model, timeout)
                .context("Failed to create Ollama client")?;
            if let Some(base) = &config.api_base {
                client = client.with_api_base(base);
            }
            Arc::new(client)
        }
    };
    Ok(client)
}

/// Dump metrics for a textfile collector, if configured.
fn write_metrics(config: &Config) {
    let Some(path) = &config.metrics.textfile_path else {
        return;
    };

    let text = match metrics::gather_text() {
        Ok(text) => text,
        Err(e) => {
            warn!("Failed to encode metrics: {}", e);
            return;
        }
    };

    match std::fs::write(path, text) {
        Ok(()) => info!("Wrote metrics to {:?}", path),
        Err(e) => warn!("Failed to write metrics to {:?}: {}", path, e),
    }
}
