use std::sync::Arc;

use account_service::config::Config;
use account_service::domain::user::service::OnboardingService;
use account_service::inbound::http::router::create_router;
use account_service::outbound::repositories::PostgresUserStore;
use auth::IdpVerifier;
use auth::TokenIssuer;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Fixed issuer label stamped into every first-party token.
const TOKEN_ISSUER_LABEL: &str = "account-service";

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "account_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "account-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = 5,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let user_store = Arc::new(PostgresUserStore::new(pg_pool));
    let identity_verifier = Arc::new(IdpVerifier::new(config.auth.google_client_id.clone())?);
    let token_issuer = Arc::new(TokenIssuer::new(
        config.auth.token_secret.as_bytes(),
        TOKEN_ISSUER_LABEL,
    ));

    let onboarding = Arc::new(OnboardingService::new(
        user_store,
        identity_verifier,
        token_issuer,
    ));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let application = create_router(onboarding);
    axum::serve(http_listener, application).await?;

    Ok(())
}
