use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::application::use_cases::enrichment::{
    CompositeObserver, EnrichmentDriver, EnrichmentObserver, LlmExtractor, TracingObserver,
};
use crate::application::CsvEnrichmentUseCase;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::llm_clients::{LLMClient, RouterClient};
use crate::interfaces::http::{add_log, start_server, LogBuffer, LogBufferObserver};

pub async fn run() -> std::io::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let config = AppConfig::load().map_err(|err| {
        error!(error = %err, "Failed to load configuration");
        std::io::Error::new(std::io::ErrorKind::InvalidInput, err.to_string())
    })?;

    if config.llm.api_key.is_none() {
        info!("No LLM API key configured; every enrichment call will fail and keep the original text");
    }

    let logs: Arc<LogBuffer> = Arc::new(LogBuffer::default());
    let use_case = Arc::new(build_use_case(&config, logs.clone()));

    add_log(
        &logs,
        "INFO",
        "Bootstrap",
        &format!(
            "Listening on {}:{} (provider={:?} model={})",
            config.server.host, config.server.port, config.llm.provider, config.llm.model
        ),
    );
    info!(
        host = %config.server.host,
        port = config.server.port,
        output_dir = %config.upload.output_dir.display(),
        "Starting HTTP server"
    );

    start_server(use_case, logs, &config.server, config.upload.max_bytes)?.await
}

pub fn build_use_case(config: &AppConfig, logs: Arc<LogBuffer>) -> CsvEnrichmentUseCase {
    let llm_client: Arc<dyn LLMClient + Send + Sync> = Arc::new(RouterClient::new());
    let extractor = Arc::new(LlmExtractor::new(llm_client, config.llm.clone()));

    let observers: Vec<Arc<dyn EnrichmentObserver + Send + Sync>> = vec![
        Arc::new(TracingObserver),
        Arc::new(LogBufferObserver::new(logs)),
    ];

    let driver = EnrichmentDriver::new(
        extractor,
        Arc::new(CompositeObserver::new(observers)),
        config.enrichment.instruction.clone(),
        config.enrichment.sentinel.clone(),
        Duration::from_secs(config.enrichment.request_timeout_secs),
    );

    CsvEnrichmentUseCase::new(driver, config.upload.output_dir.clone())
}
