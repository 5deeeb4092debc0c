//! Fixtures shared by the domain tests.

use std::sync::atomic::{AtomicU64, Ordering};

use migration::{Migrator, MigratorTrait};
use model::entities::{club, league, player, position};
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, DbErr, Set};

pub type Result<T> = std::result::Result<T, DbErr>;

/// In-memory SQLite database with all migrations applied.
pub async fn setup_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

pub async fn new_league(db: &DatabaseConnection) -> Result<league::Model> {
    static LEAGUE_ID: AtomicU64 = AtomicU64::new(0);
    let current_id = LEAGUE_ID.fetch_add(1, Ordering::SeqCst);

    league::ActiveModel {
        name: Set(format!("League {}", current_id)),
        country: Set("GB".to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn new_club(
    db: &DatabaseConnection,
    league: &league::Model,
    name: &str,
) -> Result<club::Model> {
    club::ActiveModel {
        name: Set(name.to_string()),
        league_id: Set(league.id),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn new_position(db: &DatabaseConnection) -> Result<position::Model> {
    position::ActiveModel {
        short_name: Set("ST".to_string()),
        long_name: Set("Striker".to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn new_player(
    db: &DatabaseConnection,
    club: &club::Model,
    number: i32,
) -> Result<player::Model> {
    player::ActiveModel {
        name: Set(format!("Player {}", number)),
        number: Set(number),
        age: Set(24),
        nationality: Set("FR".to_string()),
        position_id: Set(None),
        club_id: Set(club.id),
        ..Default::default()
    }
    .insert(db)
    .await
}
