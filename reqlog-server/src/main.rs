// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  reqlog: demo host for the request logging middleware
//
//  Server:   axum on a multi-thread tokio runtime
//  Config:   YAML file + REQLOG_* env overrides
//  Logging:  tracing-subscriber (text or JSON)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

mod app;

use clap::{Parser, ValueEnum};
use reqlog_core::AppConfig;
use reqlog_filter::RequestLogPipeline;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "reqlog", version, about = "HTTP request logging middleware demo server")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "reqlog.yaml")]
    config: PathBuf,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // ── Tracing ──
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);
    match cli.log_format {
        LogFormat::Text => subscriber.init(),
        LogFormat::Json => subscriber.json().init(),
    }

    info!(version = env!("CARGO_PKG_VERSION"), "reqlog starting");

    // ── Config ──
    let config = if cli.config.exists() {
        info!(path = %cli.config.display(), "Loading config file");
        AppConfig::load(&cli.config)?
    } else {
        info!("No config file found, using defaults");
        AppConfig::default()
    };

    let logger = &config.request_logger;
    info!(
        enabled = logger.enabled,
        log_body = logger.log_body,
        log_params = logger.log_params,
        max_body_size = logger.max_body_size,
        headers = logger.headers.len(),
        "Request logger configured"
    );

    // ── Pipeline ──
    let pipeline = RequestLogPipeline::new(config.request_logger.clone());
    #[cfg(feature = "otel")]
    let pipeline = pipeline.with_trace_provider(Arc::new(reqlog_filter::OtelTraceProvider));
    let pipeline = Arc::new(pipeline);

    // ── Runtime ──
    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    rt.block_on(async move {
        let listener = tokio::net::TcpListener::bind(&config.server.addr).await?;
        info!(addr = %config.server.addr, "reqlog is ready, serving traffic");

        axum::serve(listener, app::build_app(pipeline))
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("reqlog stopped");
        Ok::<(), anyhow::Error>(())
    })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, stopping...");
}
