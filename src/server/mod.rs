// PromptGAN - Refinement Server Module
// HTTP front end: one request in, one refinement run, one JSON answer out

mod error;
mod handlers;
mod types;

pub use error::ApiError;
pub use handlers::{create_router, handle_refine_json, handle_refine_query, health_check};
pub use types::{ErrorResponse, HealthResponse, RefineQuery, RefineRequest, RefineResponse};

use anyhow::{Context, Result};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::{Config, ServerConfig};
use crate::refinement::RefinementLoop;

/// Shared state behind every request.
///
/// The refinement loop is stateless between runs, so requests never
/// contend on anything here.
pub struct RefineServer {
    refinement: RefinementLoop,
    config: ServerConfig,
}

impl RefineServer {
    pub fn new(refinement: RefinementLoop, config: ServerConfig) -> Self {
        Self { refinement, config }
    }

    /// Build from full configuration. Fails before binding when no API key is set.
    pub fn from_config(config: &Config) -> Result<Self> {
        let refinement = RefinementLoop::from_config(config)
            .context("Failed to set up agents for the refinement server")?;
        Ok(Self::new(refinement, config.server.clone()))
    }

    pub fn refinement(&self) -> &RefinementLoop {
        &self.refinement
    }

    /// Router with body limit, tracing and (optionally) CORS applied.
    pub fn into_app(self) -> Router {
        let body_limit = self.config.body_limit_bytes;
        let cors_enabled = self.config.cors_enabled;

        let mut app = create_router(Arc::new(self))
            .layer(axum::extract::DefaultBodyLimit::max(body_limit))
            .layer(TraceLayer::new_for_http());

        if cors_enabled {
            app = app.layer(CorsLayer::permissive());
        }
        app
    }

    /// Bind and serve until the process is stopped.
    pub async fn serve(self) -> Result<()> {
        let addr: SocketAddr = self
            .config
            .bind_address
            .parse()
            .with_context(|| format!("Invalid bind address '{}'", self.config.bind_address))?;

        tracing::info!(
            max_attempts = self.refinement.config().max_attempts,
            "Starting PromptGAN refinement server on {}",
            addr
        );

        let app = self.into_app();
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}
