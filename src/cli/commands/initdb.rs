use anyhow::Result;
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};
use tracing::{debug, error, info, trace};

/// Connects to `database_url` and applies every pending migration.
pub async fn connect_and_migrate(database_url: &str) -> Result<DatabaseConnection> {
    trace!("Attempting to connect to database");
    let db = match Database::connect(database_url).await {
        Ok(connection) => {
            debug!("Database connection established");
            connection
        }
        Err(e) => {
            error!("Failed to connect to database '{}': {}", database_url, e);
            return Err(e.into());
        }
    };

    info!("Running database migrations");
    if let Err(e) = Migrator::up(&db, None).await {
        error!("Failed to run database migrations: {}", e);
        return Err(e.into());
    }
    debug!("All pending migrations have been applied");

    Ok(db)
}

pub async fn init_database(database_url: &str) -> Result<()> {
    info!("Initializing database");
    debug!("Database URL: {}", database_url);

    connect_and_migrate(database_url).await?;

    info!("Database initialization completed successfully!");
    Ok(())
}
