use tokio::task;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use seat_holds::{app, config::Config, services::sweeper::SweeperService, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.app.rust_log))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting seat-hold reservation engine");

    let state = AppState::new(config.clone());

    // --- Start background tasks ---

    // Reclaim expired holds on a fixed interval
    let sweeper = SweeperService::new(state.clone());
    task::spawn(sweeper.run());

    // --- Start the web server ---

    let addr = format!("{}:{}", config.app.host, config.app.port);
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app(state).into_make_service()).await?;

    Ok(())
}
