use std::net::SocketAddr;
use std::sync::Arc;

use fairway_api::{
    app,
    state::{AppState, AuthConfig},
};
use fairway_core::{SystemClock, TeeTimeRepository};
use fairway_reserve::{HoldPolicy, ReservationManager};
use fairway_store::{Config, DbClient, PgTeeTimeRepository};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fairway_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().expect("Failed to load config");
    tracing::info!("Starting Fairway API on port {}", config.server.port);

    let db = DbClient::new(&config.database.url)
        .await
        .expect("Failed to connect to Postgres");
    db.migrate().await.expect("Failed to run migrations");

    let repo: Arc<dyn TeeTimeRepository> = Arc::new(PgTeeTimeRepository::new(db.pool.clone()));
    let policy = HoldPolicy::new(
        config.business_rules.hold_seconds,
        config.business_rules.terminal_cancel,
    );
    let manager = Arc::new(ReservationManager::new(
        repo.clone(),
        Arc::new(SystemClock),
        policy,
    ));

    if let Some(interval_seconds) = config.business_rules.sweep_interval_seconds {
        tokio::spawn(fairway_api::worker::start_expiry_sweeper(
            manager.clone(),
            interval_seconds,
        ));
    }

    let app_state = AppState {
        manager,
        repo,
        auth: AuthConfig {
            secret: config.auth.jwt_secret.clone(),
            expiration: config.auth.jwt_expiration_seconds,
        },
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
