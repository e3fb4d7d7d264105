//! Upload/download HTTP server, compiled with the `http` feature.
//!
//! Exposes the single-file analysis pipeline over multipart upload and lets
//! clients download a rendered description as a text attachment.

mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;

use crate::analysis::Analyzer;
use crate::config::AppConfig;

pub use routes::{build_router, HttpServerError, UploadResponse};

/// Shared application state for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    analyzer: Arc<Analyzer>,
    max_upload_bytes: usize,
    config: Arc<AppConfig>,
}

impl HttpState {
    pub fn new(config: &AppConfig, analyzer: Analyzer) -> Self {
        Self {
            analyzer: Arc::new(analyzer),
            max_upload_bytes: config.server.max_upload_bytes,
            config: Arc::new(config.clone()),
        }
    }

    fn is_supported_extension(&self, extension: &str) -> bool {
        self.config.batch.is_supported_extension(extension)
    }
}

/// Bind `addr` and serve until the process is interrupted.
pub async fn serve(config: &AppConfig, addr: SocketAddr) -> anyhow::Result<()> {
    let state = HttpState::new(config, Analyzer::with_heuristics(config));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding HTTP listener on {}", addr))?;

    log::info!(
        "[HTTP] Listening on {} (upload cap {} bytes)",
        addr,
        config.server.max_upload_bytes
    );

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP router")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::warn!("[HTTP] Failed to install Ctrl-C handler: {}", err);
        std::future::pending::<()>().await;
    }
    log::info!("[HTTP] Shutting down");
}
