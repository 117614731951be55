use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use clinic_core::ArticleRepository;

/// Main entry point for the clinic site server
///
/// Serves the public site API (blog and services) with its OpenAPI/Swagger documentation.
///
/// # Environment Variables
/// - `CLINIC_SITE_ADDR`: server address (default: "0.0.0.0:3000")
///
/// # Errors
/// Returns an error if:
/// - the logging configuration cannot be initialised,
/// - the embedded articles cannot be loaded,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("clinic=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("CLINIC_SITE_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    let articles = Arc::new(ArticleRepository::seeded()?);
    tracing::info!(articles = articles.all().len(), "++ Starting clinic site on {}", addr);

    let app = clinic_site::router(articles);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
