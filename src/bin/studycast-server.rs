//! HTTP server binary for studycast.
//!
//! A thin shim over the library crate: maps CLI flags to [`PipelineConfig`],
//! initialises logging, and serves the extraction/preprocessing routes.

use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use studycast::server::{router, AppState};
use studycast::{PipelineConfig, API_KEY_ENV};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "studycast-server",
    about = "Serve document extraction and lecture-script generation over HTTP",
    version
)]
struct Args {
    /// Address to bind.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to bind.
    #[arg(long, default_value_t = 8000)]
    port: u16,

    /// Exact frontend origin allowed by CORS (e.g. http://localhost:3000).
    /// Omit to allow any origin.
    #[arg(long, env = "STUDYCAST_ALLOW_ORIGIN")]
    allow_origin: Option<String>,

    /// Generative-text model identifier.
    #[arg(long, env = "STUDYCAST_MODEL")]
    model: Option<String>,

    /// Per-call generation timeout in seconds.
    #[arg(long, default_value_t = 120)]
    api_timeout_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut builder = PipelineConfig::builder().api_timeout_secs(args.api_timeout_secs);
    if let Some(model) = &args.model {
        builder = builder.model(model);
    }
    let config = builder.build().context("invalid pipeline configuration")?;

    if std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty()).is_none() {
        // Extraction still works; only /preprocess needs the credential.
        warn!("{API_KEY_ENV} is not set — /preprocess will fail until it is");
    }

    let state = Arc::new(AppState::new(config));
    let app = router(state, args.allow_origin.as_deref());

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .with_context(|| format!("invalid bind address {}:{}", args.host, args.port))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("studycast-server listening on http://{addr}");

    axum::serve(listener, app)
        .await
        .context("server terminated unexpectedly")?;
    Ok(())
}
