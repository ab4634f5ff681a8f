pub mod ai;
pub mod config;
pub mod content;
pub mod image;
pub mod metrics;
pub mod notify;
pub mod orchestrator;
pub mod publisher;
pub mod render;
pub mod scraper;
pub mod testing;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, ConfigProvider,
    SourceLists, SourceProvider,
};
pub use content::{PublishRecord, RankResult, ScrapedContent, Summary};
pub use orchestrator::{
    ContentPipeline, PipelineCollaborators, PipelineConfig, PipelineError, RunOutcome, RunReport,
    RunStats,
};
