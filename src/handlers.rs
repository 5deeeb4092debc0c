pub mod auth;
pub mod clubs;
pub mod health;
pub mod leagues;
pub mod matches;
pub mod players;
pub mod positions;
pub mod users;
