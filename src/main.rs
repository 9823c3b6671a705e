use lead_scoring_api::config::Config;
use lead_scoring_api::handlers::AppState;
use lead_scoring_api::router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the scoring service.
///
/// Initializes tracing, loads configuration from the environment, builds
/// the config service client and serves the router with per-IP rate
/// limiting on the scoring endpoint.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lead_scoring_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let app_state = Arc::new(AppState::new(config.clone())?);
    tracing::info!(
        "Config service client initialized: {}",
        app_state.config_client.base_url()
    );

    // Health stays outside the limiter so liveness checks are never throttled
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(config.rate_limit_per_second)
            .burst_size(config.rate_limit_burst)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .ok_or_else(|| anyhow::anyhow!("Invalid rate limit configuration"))?,
    );

    let scoring_routes = router::scoring_routes(config.max_body_bytes).layer(GovernorLayer {
        config: governor_conf,
    });
    let app = router::finish(scoring_routes, app_state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Scoring service listening on {}", addr);
    tracing::info!("Config API: {}", config.config_api_url);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
