use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use reqwest::Client;
use tokio::net::TcpListener;

use crate::{
    ai,
    classifier::EmailClassifier,
    config::AppConfig,
    http::{self, AppState},
    infrastructure::{directories::ResolvedPaths, shutdown::Shutdown},
};

pub struct EmailClassifierApp {
    _paths: ResolvedPaths,
    config: Arc<AppConfig>,
    router: Router,
    shutdown: Shutdown,
}

impl EmailClassifierApp {
    pub fn initialize(config: AppConfig, paths: ResolvedPaths, shutdown: Shutdown) -> Result<Self> {
        let config = Arc::new(config);

        let http_client = Client::builder()
            .user_agent(format!("email-classifier-rust/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build HTTP client")?;

        let generator = ai::create_generator(http_client, &config.ai);
        let classifier = Arc::new(EmailClassifier::new(generator));
        let router = http::router(AppState {
            classifier,
            max_upload_bytes: config.server.max_upload_bytes,
        });

        Ok(Self {
            _paths: paths,
            config,
            router,
            shutdown,
        })
    }

    pub async fn run(self) -> Result<()> {
        let EmailClassifierApp {
            _paths: _,
            config,
            router,
            shutdown,
        } = self;

        let addr = config.server.bind_addr;
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;

        tracing::info!(target: "lifecycle", %addr, "email classifier API listening");

        let stopped = shutdown.subscribe();
        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                stopped.notified().await;
                tracing::info!(target: "lifecycle", "shutdown requested; draining connections");
            })
            .await
            .context("HTTP server failed")?;

        tracing::info!(target: "lifecycle", "email classifier API stopped");
        Ok(())
    }
}
