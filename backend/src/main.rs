use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    http::{HeaderValue, Method},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

use certificate_portal_backend::clients::{
    FormSubmissionClient, SheetLookupClient, SmtpCodeDelivery,
};
use certificate_portal_backend::config::AppConfig;
use certificate_portal_backend::domain::{ReviewService, VerificationService};
use certificate_portal_backend::rest::{self, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env()?;

    // One HTTP client shared by both sheet-API collaborators.
    let http = reqwest::Client::new();
    let lookup = Arc::new(SheetLookupClient::new(
        http.clone(),
        config.lookup_api_url.clone(),
    ));
    let sink = Arc::new(FormSubmissionClient::new(
        http,
        config.submission_api_url.clone(),
    ));
    let delivery = Arc::new(SmtpCodeDelivery::new(
        &config.smtp,
        config.delivery_timeout_secs,
    )?);

    let state = AppState::new(
        lookup,
        Arc::new(VerificationService::new(delivery)),
        Arc::new(ReviewService::new(sink)),
    );

    // CORS setup so the web frontend can call us across origins.
    let cors = CorsLayer::new()
        .allow_origin(config.allowed_origin.parse::<HeaderValue>()?)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(Any);

    let app = Router::new()
        .nest("/api", rest::api_router())
        .layer(cors)
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("starting certificate portal on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
