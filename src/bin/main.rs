use std::net::SocketAddr;

use school_records::bootstrap::initialize_admin_user;
use school_records::state::AppState;
use school_records::utils::jwt::JwtManager;
use school_records::{app, config::APP_CONFIG, db, utils::tracing::init_standard_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    init_standard_tracing(env!("CARGO_CRATE_NAME"), &APP_CONFIG.log_level);

    tracing::info!("Starting application...");

    let db_connection = db::connect(&APP_CONFIG.database_url).await?;

    tracing::info!("Checking admin user...");
    if let Err(e) = initialize_admin_user(
        &db_connection,
        &APP_CONFIG.admin_username,
        &APP_CONFIG.admin_password,
    )
    .await
    {
        tracing::error!("Failed to initialize admin user: {:#}", e);
        tracing::warn!("Continuing without admin user initialization...");
    }

    let jwt = JwtManager::new(&APP_CONFIG.jwt_secret, APP_CONFIG.jwt_expires_in_days);
    let state = AppState::new(db_connection, jwt, APP_CONFIG.settings());
    let app = app::create_app(state);

    let http_address = format!("0.0.0.0:{}", APP_CONFIG.port);
    tracing::info!(env = %APP_CONFIG.app_env, "HTTP server listening on {}", &http_address);

    let listener = tokio::net::TcpListener::bind(&http_address).await?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutdown signal received");
}
