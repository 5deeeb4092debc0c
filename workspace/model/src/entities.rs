//! Root for all SeaORM entity modules of the football service.
//! Accounts and their session tokens live next to the league data
//! (leagues, clubs, positions, players, matches).

pub mod auth_token;
pub mod club;
pub mod football_match;
pub mod league;
pub mod player;
pub mod position;
pub mod user;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::auth_token::Entity as AuthToken;
    pub use super::club::Entity as Club;
    pub use super::football_match::Entity as FootballMatch;
    pub use super::league::Entity as League;
    pub use super::player::Entity as Player;
    pub use super::position::Entity as Position;
    pub use super::user::Entity as User;
}
