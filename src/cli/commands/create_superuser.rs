use anyhow::Result;
use domain::{AccountStore, NewAccount};
use model::entities::user;
use sea_orm::DatabaseConnection;
use tracing::{error, info, instrument};

use crate::cli::commands::initdb::connect_and_migrate;

/// Creates an account with staff and superuser rights, migrating the
/// database first so a fresh database works without `init-db`.
#[instrument(skip(password))]
pub async fn create_superuser(
    database_url: &str,
    email: String,
    password: String,
    name: Option<String>,
) -> Result<()> {
    let db = connect_and_migrate(database_url).await?;
    let account = create_superuser_in(&db, email, password, name).await?;
    info!("Superuser {} created with ID {}", account.email, account.id);
    Ok(())
}

async fn create_superuser_in(
    db: &DatabaseConnection,
    email: String,
    password: String,
    name: Option<String>,
) -> Result<user::Model> {
    let store = AccountStore::new(db.clone());

    let mut new_account = NewAccount::new(email, password);
    if let Some(name) = name {
        new_account = new_account.with_name(name);
    }

    store.create_superuser(new_account).await.map_err(|e| {
        error!("Failed to create superuser: {}", e);
        anyhow::Error::from(e)
    })
}
