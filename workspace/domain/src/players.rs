//! Validated writes of players.
//!
//! Every create and update runs inside one transaction: referenced club and
//! position are checked, field rules applied, then the reserved-number check
//! runs before the row is written. The `(club_id, number)` unique index
//! turns a lost race between two writers into the same validation error.

use model::entities::{club, player, position};
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, Set,
    TransactionTrait,
};
use tracing::{debug, info, instrument};

use crate::error::{is_unique_violation, DomainError, Result};
use crate::validators::{
    reserved_number_error, validate_player_fields, validate_reserved_number,
};

/// A complete player record as submitted for creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerInput {
    pub name: String,
    pub number: i32,
    pub age: i32,
    pub nationality: String,
    pub position_id: Option<i32>,
    pub club_id: i32,
}

/// Partial update of a player. `None` leaves the field unchanged.
/// `position_id: Some(None)` clears the player's position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerChanges {
    pub name: Option<String>,
    pub number: Option<i32>,
    pub age: Option<i32>,
    pub nationality: Option<String>,
    pub position_id: Option<Option<i32>>,
    pub club_id: Option<i32>,
}

impl PlayerChanges {
    fn apply(self, existing: player::Model) -> PlayerInput {
        PlayerInput {
            name: self.name.unwrap_or(existing.name),
            number: self.number.unwrap_or(existing.number),
            age: self.age.unwrap_or(existing.age),
            nationality: self.nationality.unwrap_or(existing.nationality),
            position_id: self.position_id.unwrap_or(existing.position_id),
            club_id: self.club_id.unwrap_or(existing.club_id),
        }
    }
}

#[instrument(skip(db))]
pub async fn create_player(db: &DatabaseConnection, input: PlayerInput) -> Result<player::Model> {
    let txn = db.begin().await?;
    let input = checked_player(&txn, input, None).await?;
    let number = input.number;

    let created = player::ActiveModel {
        name: Set(input.name),
        number: Set(input.number),
        age: Set(input.age),
        nationality: Set(input.nationality),
        position_id: Set(input.position_id),
        club_id: Set(input.club_id),
        ..Default::default()
    }
    .insert(&txn)
    .await
    .map_err(|err| number_conflict(err, number))?;
    txn.commit().await?;

    info!("Player created with ID: {}, club: {}, number: {}", created.id, created.club_id, created.number);
    Ok(created)
}

/// Updates a player. The reserved-number check runs even when the number
/// is unchanged; the player's own current number does not count as taken.
#[instrument(skip(db))]
pub async fn update_player(
    db: &DatabaseConnection,
    id: i32,
    changes: PlayerChanges,
) -> Result<player::Model> {
    let txn = db.begin().await?;
    let existing = player::Entity::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or_else(|| DomainError::not_found("Player", id))?;

    let input = checked_player(&txn, changes.apply(existing.clone()), Some(id)).await?;
    let number = input.number;

    let mut active: player::ActiveModel = existing.into();
    active.name = Set(input.name);
    active.number = Set(input.number);
    active.age = Set(input.age);
    active.nationality = Set(input.nationality);
    active.position_id = Set(input.position_id);
    active.club_id = Set(input.club_id);

    let updated = active
        .update(&txn)
        .await
        .map_err(|err| number_conflict(err, number))?;
    txn.commit().await?;

    info!("Player with ID {} updated", id);
    Ok(updated)
}

async fn checked_player<C: ConnectionTrait>(
    conn: &C,
    mut input: PlayerInput,
    player_id: Option<i32>,
) -> Result<PlayerInput> {
    input.nationality =
        validate_player_fields(&input.name, input.number, input.age, &input.nationality)?;

    if club::Entity::find_by_id(input.club_id).one(conn).await?.is_none() {
        return Err(DomainError::validation(format!(
            "Club with ID {} does not exist",
            input.club_id
        )));
    }
    if let Some(position_id) = input.position_id {
        if position::Entity::find_by_id(position_id).one(conn).await?.is_none() {
            return Err(DomainError::validation(format!(
                "Position with ID {} does not exist",
                position_id
            )));
        }
    }

    debug!("Checking number {} against club {}", input.number, input.club_id);
    validate_reserved_number(conn, input.club_id, input.number, player_id).await?;
    Ok(input)
}

fn number_conflict(err: DbErr, number: i32) -> DomainError {
    if is_unique_violation(&err) {
        reserved_number_error(number)
    } else {
        err.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{new_club, new_league, new_position, setup_db};

    fn input(club_id: i32, number: i32) -> PlayerInput {
        PlayerInput {
            name: format!("Player {}", number),
            number,
            age: 27,
            nationality: "br".to_string(),
            position_id: None,
            club_id,
        }
    }

    #[tokio::test]
    async fn test_create_player_normalizes_nationality() {
        let db = setup_db().await;
        let league = new_league(&db).await.unwrap();
        let club = new_club(&db, &league, "Santos").await.unwrap();
        let position = new_position(&db).await.unwrap();

        let player = create_player(
            &db,
            PlayerInput {
                position_id: Some(position.id),
                ..input(club.id, 10)
            },
        )
        .await
        .unwrap();

        assert_eq!(player.nationality, "BR");
        assert_eq!(player.position_id, Some(position.id));
    }

    #[tokio::test]
    async fn test_reserved_number_in_same_club() {
        let db = setup_db().await;
        let league = new_league(&db).await.unwrap();
        let club = new_club(&db, &league, "Club C").await.unwrap();
        let other = new_club(&db, &league, "Club D").await.unwrap();

        create_player(&db, input(club.id, 7)).await.unwrap();

        let err = create_player(&db, input(club.id, 7)).await.unwrap_err();
        match err {
            DomainError::Validation(message) => assert_eq!(message, "7 is reserved"),
            other => panic!("Expected validation error, got {:?}", other),
        }

        assert!(create_player(&db, input(other.id, 7)).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_keeps_own_number() {
        let db = setup_db().await;
        let league = new_league(&db).await.unwrap();
        let club = new_club(&db, &league, "Club C").await.unwrap();
        let player = create_player(&db, input(club.id, 7)).await.unwrap();

        let updated = update_player(
            &db,
            player.id,
            PlayerChanges {
                age: Some(28),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.number, 7);
        assert_eq!(updated.age, 28);
    }

    #[tokio::test]
    async fn test_update_position_set_keep_and_clear() {
        let db = setup_db().await;
        let league = new_league(&db).await.unwrap();
        let club = new_club(&db, &league, "Club C").await.unwrap();
        let position = new_position(&db).await.unwrap();
        let player = create_player(
            &db,
            PlayerInput {
                position_id: Some(position.id),
                ..input(club.id, 4)
            },
        )
        .await
        .unwrap();

        let kept = update_player(
            &db,
            player.id,
            PlayerChanges {
                age: Some(30),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(kept.position_id, Some(position.id));

        let cleared = update_player(
            &db,
            player.id,
            PlayerChanges {
                position_id: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(cleared.position_id, None);

        let missing = update_player(
            &db,
            player.id,
            PlayerChanges {
                position_id: Some(Some(9999)),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(missing, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_to_reserved_number_fails() {
        let db = setup_db().await;
        let league = new_league(&db).await.unwrap();
        let club = new_club(&db, &league, "Club C").await.unwrap();
        create_player(&db, input(club.id, 7)).await.unwrap();
        let eight = create_player(&db, input(club.id, 8)).await.unwrap();

        let err = update_player(
            &db,
            eight.id,
            PlayerChanges {
                number: Some(7),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "7 is reserved");
    }

    #[tokio::test]
    async fn test_transfer_to_club_with_number_taken() {
        let db = setup_db().await;
        let league = new_league(&db).await.unwrap();
        let from = new_club(&db, &league, "From").await.unwrap();
        let to = new_club(&db, &league, "To").await.unwrap();
        let mover = create_player(&db, input(from.id, 9)).await.unwrap();
        create_player(&db, input(to.id, 9)).await.unwrap();

        let err = update_player(
            &db,
            mover.id,
            PlayerChanges {
                club_id: Some(to.id),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "9 is reserved");
    }

    #[tokio::test]
    async fn test_field_and_reference_checks() {
        let db = setup_db().await;
        let league = new_league(&db).await.unwrap();
        let club = new_club(&db, &league, "Club C").await.unwrap();

        assert!(create_player(&db, input(club.id, 101)).await.is_err());
        assert!(create_player(&db, input(club.id, -1)).await.is_err());
        assert!(create_player(&db, input(9999, 5)).await.is_err());
        assert!(
            create_player(
                &db,
                PlayerInput {
                    position_id: Some(9999),
                    ..input(club.id, 5)
                }
            )
            .await
            .is_err()
        );
        assert!(
            create_player(
                &db,
                PlayerInput {
                    nationality: "Brazil".to_string(),
                    ..input(club.id, 5)
                }
            )
            .await
            .is_err()
        );
    }

    #[tokio::test]
    async fn test_update_unknown_player() {
        let db = setup_db().await;

        let err = update_player(&db, 77, PlayerChanges::default()).await.unwrap_err();

        assert!(matches!(err, DomainError::NotFound { id: 77, .. }));
    }
}
