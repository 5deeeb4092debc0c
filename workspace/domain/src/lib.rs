//! Business rules of the football service: the account lifecycle
//! (creation, authentication, updates), ownership-based access control,
//! token issuing and the record-level validators that guard every write of
//! players and matches.

pub mod access;
pub mod account_store;
pub mod email;
pub mod error;
pub mod matches;
pub mod password;
pub mod players;
pub mod token;
pub mod validators;

#[cfg(test)]
pub(crate) mod testing;

pub use account_store::{AccountBackend, AccountChanges, AccountStore, NewAccount};
pub use error::{DomainError, Result};
pub use token::TokenIssuer;
