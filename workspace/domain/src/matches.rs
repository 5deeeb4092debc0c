//! Validated writes of matches. Home and away teams are compared by
//! primary key before anything else, so identical teams fail regardless of
//! date or result.

use chrono::NaiveDate;
use model::entities::{club, football_match};
use sea_orm::{ActiveModelTrait, ConnectionTrait, DatabaseConnection, EntityTrait, Set, TransactionTrait};
use tracing::{info, instrument};

use crate::error::{DomainError, Result};
use crate::validators::{validate_match_result, validate_match_teams};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchInput {
    pub home_team_id: i32,
    pub away_team_id: i32,
    pub date: NaiveDate,
    pub result: String,
}

/// Partial update of a match. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchChanges {
    pub home_team_id: Option<i32>,
    pub away_team_id: Option<i32>,
    pub date: Option<NaiveDate>,
    pub result: Option<String>,
}

#[instrument(skip(db))]
pub async fn create_match(db: &DatabaseConnection, input: MatchInput) -> Result<football_match::Model> {
    let txn = db.begin().await?;
    check_match(&txn, &input).await?;

    let created = football_match::ActiveModel {
        home_team_id: Set(input.home_team_id),
        away_team_id: Set(input.away_team_id),
        date: Set(input.date),
        result: Set(input.result),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;

    info!("Match created with ID: {}", created.id);
    Ok(created)
}

#[instrument(skip(db))]
pub async fn update_match(
    db: &DatabaseConnection,
    id: i32,
    changes: MatchChanges,
) -> Result<football_match::Model> {
    let txn = db.begin().await?;
    let existing = football_match::Entity::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or_else(|| DomainError::not_found("Match", id))?;

    let input = MatchInput {
        home_team_id: changes.home_team_id.unwrap_or(existing.home_team_id),
        away_team_id: changes.away_team_id.unwrap_or(existing.away_team_id),
        date: changes.date.unwrap_or(existing.date),
        result: changes.result.unwrap_or_else(|| existing.result.clone()),
    };
    check_match(&txn, &input).await?;

    let mut active: football_match::ActiveModel = existing.into();
    active.home_team_id = Set(input.home_team_id);
    active.away_team_id = Set(input.away_team_id);
    active.date = Set(input.date);
    active.result = Set(input.result);
    let updated = active.update(&txn).await?;
    txn.commit().await?;

    info!("Match with ID {} updated", id);
    Ok(updated)
}

async fn check_match<C: ConnectionTrait>(conn: &C, input: &MatchInput) -> Result<()> {
    validate_match_teams(input.home_team_id, input.away_team_id)?;
    validate_match_result(&input.result)?;

    for team_id in [input.home_team_id, input.away_team_id] {
        if club::Entity::find_by_id(team_id).one(conn).await?.is_none() {
            return Err(DomainError::validation(format!(
                "Club with ID {} does not exist",
                team_id
            )));
        }
    }
    Ok(())
}
