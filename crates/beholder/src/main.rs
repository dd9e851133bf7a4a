//! Beholder - HTTP service that describes images via a hosted VLM.
//!
//! Accepts an image (inline base64 or a public URL), forwards it to the
//! configured Azure vision-language model deployment, and returns a
//! natural-language description.
//!
//! # Usage
//!
//! ```bash
//! # Start with the primary inference endpoint
//! AZURE_INFERENCE_ENDPOINT=... AZURE_INFERENCE_API_KEY=... \
//! AZURE_INFERENCE_DEPLOYMENT=... beholder
//!
//! # Bind elsewhere, JSON logs
//! beholder --bind 127.0.0.1:9000 --json-logs
//! ```

use clap::Parser;
use std::sync::Arc;

use beholder_core::{AzureProvider, Config, Generator};

mod logging;
mod server;

/// Beholder - image description service over a hosted vision-language model.
#[derive(Parser, Debug)]
#[command(name = "beholder")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Address to bind the HTTP server to
    #[arg(long, env = "BEHOLDER_BIND", default_value = "0.0.0.0:8000")]
    bind: String,

    /// Enable verbose (debug) logging
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.json_logs);

    tracing::debug!("Beholder v{}", beholder_core::VERSION);

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Failed to load config: {e}. Using default configuration.");
            Config::default()
        }
    };

    // Credentials resolve once here; describe requests reuse the result for
    // the process lifetime. A server without credentials still serves the
    // root and health routes.
    let generator = match config.resolve_credentials() {
        Ok(credentials) => {
            tracing::info!(
                group = credentials.label,
                deployment = %credentials.deployment,
                "VLM credentials resolved"
            );
            let provider = AzureProvider::new(&credentials, config.vlm.timeout_ms);
            Some(Arc::new(Generator::new(
                Box::new(provider),
                config.prompt.clone(),
                config.vlm.clone(),
            )))
        }
        Err(e) => {
            tracing::warn!("{e}; /api/describe will return 503");
            None
        }
    };

    let router = server::build_router(server::AppState { generator });

    let listener = tokio::net::TcpListener::bind(&cli.bind).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, router).await?;

    Ok(())
}
