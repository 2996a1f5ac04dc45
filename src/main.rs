use betledger::api::router::create_router;
use betledger::config::AppConfig;
use betledger::db;
use betledger::services::SettlementLocks;
use betledger::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;
    let addr = format!("{}:{}", config.host, config.port);

    tracing::info!("Connecting to database...");
    let pool = db::init_pool(&config.database_url).await?;
    tracing::info!("Database connected");

    sqlx::migrate!("./migrations").run(&pool).await?;

    let metrics_handle = betledger::metrics::init_metrics();

    if let Ok(active) = db::bankroll_repo::count_active(&pool).await {
        metrics::gauge!("active_bankrolls").set(active as f64);
    }

    let state = AppState {
        db: pool,
        config,
        metrics_handle,
        settlement_locks: SettlementLocks::new(),
    };
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {addr}");
    axum::serve(listener, router).await?;

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();
}
