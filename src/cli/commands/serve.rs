use anyhow::Result;
use tokio::net::TcpListener;
use tracing::{debug, error, info, trace};

use crate::cli::commands::initdb::connect_and_migrate;
use crate::config::{initialize_app_state, AppConfig};
use crate::router::create_router_with_timeout;

pub async fn serve(config: &AppConfig, migrate: bool) -> Result<()> {
    info!("Football API starting up");
    debug!("Database URL: {}", config.database_url);
    debug!("Bind address: {}", config.bind_address);

    if migrate {
        connect_and_migrate(&config.database_url).await?;
    }

    trace!("Initializing application state");
    let state = match initialize_app_state(config).await {
        Ok(state) => state,
        Err(e) => {
            error!("Failed to initialize application state: {}", e);
            return Err(e);
        }
    };

    let app = create_router_with_timeout(state, config.request_timeout());
    debug!("Router created successfully");

    let listener = match TcpListener::bind(&config.bind_address).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to address {}: {}", config.bind_address, e);
            return Err(e.into());
        }
    };

    info!("Football API server running on http://{}", config.bind_address);
    info!("Swagger UI available at http://{}/swagger-ui", config.bind_address);

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        return Err(e.into());
    }

    info!("Server shutdown gracefully");
    Ok(())
}
