//! Record-level rules checked before league data is persisted.

use model::entities::player;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QuerySelect};
use tracing::{debug, warn};

use crate::error::{DomainError, Result};

pub const MIN_JERSEY_NUMBER: i32 = 0;
pub const MAX_JERSEY_NUMBER: i32 = 100;
pub const MAX_NAME_LENGTH: usize = 100;
pub const MAX_SHORT_NAME_LENGTH: usize = 3;
pub const MAX_RESULT_LENGTH: usize = 50;

/// Checks that a required text field is present and not too long.
pub fn validate_name(field: &str, value: &str, max_len: usize) -> Result<()> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{} may not be blank", field)));
    }
    if value.chars().count() > max_len {
        return Err(DomainError::validation(format!(
            "Ensure {} has no more than {} characters",
            field, max_len
        )));
    }
    Ok(())
}

/// Validates an ISO 3166-1 alpha-2 shaped country code and returns it uppercased.
pub fn validate_country_code(field: &str, code: &str) -> Result<String> {
    let code = code.trim();
    if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(DomainError::validation(format!(
            "\"{}\" is not a valid choice for {}",
            code, field
        )));
    }
    Ok(code.to_ascii_uppercase())
}

pub fn validate_jersey_number(number: i32) -> Result<()> {
    if !(MIN_JERSEY_NUMBER..=MAX_JERSEY_NUMBER).contains(&number) {
        return Err(DomainError::validation(format!(
            "Ensure number is between {} and {}",
            MIN_JERSEY_NUMBER, MAX_JERSEY_NUMBER
        )));
    }
    Ok(())
}

pub fn validate_age(age: i32) -> Result<()> {
    if age < 0 {
        return Err(DomainError::validation("Ensure age is not negative"));
    }
    Ok(())
}

/// Field rules of a player record. Returns the nationality code uppercased.
pub fn validate_player_fields(name: &str, number: i32, age: i32, nationality: &str) -> Result<String> {
    validate_name("name", name, MAX_NAME_LENGTH)?;
    validate_jersey_number(number)?;
    validate_age(age)?;
    validate_country_code("nationality", nationality)
}

pub fn validate_position_fields(short_name: &str, long_name: &str) -> Result<()> {
    validate_name("short_name", short_name, MAX_SHORT_NAME_LENGTH)?;
    validate_name("long_name", long_name, MAX_NAME_LENGTH)
}

pub fn validate_league_fields(name: &str, country: &str) -> Result<String> {
    validate_name("name", name, MAX_NAME_LENGTH)?;
    validate_country_code("country", country)
}

/// Jersey numbers already taken by players of `club_id`, optionally ignoring
/// one player (the one being updated).
pub async fn reserved_numbers<C: ConnectionTrait>(
    conn: &C,
    club_id: i32,
    exclude_player: Option<i32>,
) -> Result<Vec<i32>> {
    let mut query = player::Entity::find()
        .select_only()
        .column(player::Column::Number)
        .filter(player::Column::ClubId.eq(club_id));
    if let Some(player_id) = exclude_player {
        query = query.filter(player::Column::Id.ne(player_id));
    }

    let numbers: Vec<i32> = query.into_tuple().all(conn).await?;
    debug!("Club {} has {} reserved numbers", club_id, numbers.len());
    Ok(numbers)
}

/// Fails with `"<number> is reserved"` when another player of the club
/// already wears `number`.
pub async fn validate_reserved_number<C: ConnectionTrait>(
    conn: &C,
    club_id: i32,
    number: i32,
    exclude_player: Option<i32>,
) -> Result<()> {
    let reserved = reserved_numbers(conn, club_id, exclude_player).await?;
    if reserved.contains(&number) {
        warn!("Number {} already taken in club {}", number, club_id);
        return Err(reserved_number_error(number));
    }
    Ok(())
}

pub(crate) fn reserved_number_error(number: i32) -> DomainError {
    DomainError::validation(format!("{} is reserved", number))
}

/// A club cannot play against itself. Compared by primary key.
pub fn validate_match_teams(home_team_id: i32, away_team_id: i32) -> Result<()> {
    if home_team_id == away_team_id {
        return Err(DomainError::validation(
            "Same team can not play against each other",
        ));
    }
    Ok(())
}

pub fn validate_match_result(result: &str) -> Result<()> {
    if result.chars().count() > MAX_RESULT_LENGTH {
        return Err(DomainError::validation(format!(
            "Ensure result has no more than {} characters",
            MAX_RESULT_LENGTH
        )));
    }
    Ok(())
}
