use async_trait::async_trait;
use model::entities::user;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use std::fmt;
use tracing::{debug, info, instrument, trace, warn};

use crate::email::{is_valid_email, normalize_email, MAX_EMAIL_LENGTH};
use crate::error::{is_unique_violation, DomainError, Result};
use crate::password::{hash_password, validate_password, verify_password};

/// Longest display name a user may carry.
pub const MAX_NAME_LENGTH: usize = 50;

const DUPLICATE_EMAIL: &str = "user with this email address already exists";

/// Input for creating an account.
#[derive(Clone, Default)]
pub struct NewAccount {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
}

impl NewAccount {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl fmt::Debug for NewAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewAccount")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("name", &self.name)
            .finish()
    }
}

/// Partial update of an account. `None` leaves the field unchanged.
#[derive(Clone, Default)]
pub struct AccountChanges {
    pub email: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
}

impl AccountChanges {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.name.is_none() && self.password.is_none()
    }
}

impl fmt::Debug for AccountChanges {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountChanges")
            .field("email", &self.email)
            .field("name", &self.name)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// The authentication capability of the account store.
///
/// The token issuer only depends on this interface, so alternative
/// backends can stand in for the database-backed [`AccountStore`].
#[async_trait]
pub trait AccountBackend: Send + Sync {
    /// Creates an account with a normalized email and a hashed password.
    async fn create_account(&self, new_account: NewAccount) -> Result<user::Model>;

    /// Returns the active account matching the credentials.
    ///
    /// Unknown email, wrong password and inactive account all yield `None`.
    async fn authenticate(&self, email: &str, password: &str) -> Result<Option<user::Model>>;
}

/// Database-backed store of user accounts.
#[derive(Clone, Debug)]
pub struct AccountStore {
    db: DatabaseConnection,
}

impl AccountStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an account with staff and superuser rights in one transaction.
    #[instrument(skip(self))]
    pub async fn create_superuser(&self, new_account: NewAccount) -> Result<user::Model> {
        let txn = self.db.begin().await?;
        let superuser = insert_account(&txn, new_account, true).await?;
        txn.commit().await?;

        info!("Superuser created with ID: {}", superuser.id);
        Ok(superuser)
    }

    /// Applies a partial update. A new password is re-hashed before storing;
    /// a new email is normalized and must stay unique.
    #[instrument(skip(self))]
    pub async fn update_account(&self, id: i32, changes: AccountChanges) -> Result<user::Model> {
        trace!("Entering update_account for user_id: {}", id);

        let txn = self.db.begin().await?;
        let existing = user::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| DomainError::not_found("User", id))?;

        let mut active: user::ActiveModel = existing.into();
        let mut updated_fields = Vec::new();

        if let Some(email) = changes.email {
            let email = checked_email(&email)?;
            if find_by_email(&txn, &email, Some(id)).await?.is_some() {
                warn!("Email change for user {} collides with another account", id);
                return Err(DomainError::validation(DUPLICATE_EMAIL));
            }
            active.email = Set(email);
            updated_fields.push("email");
        }

        if let Some(name) = changes.name {
            active.name = Set(checked_name(Some(name))?);
            updated_fields.push("name");
        }

        if let Some(password) = changes.password {
            validate_password(&password)?;
            active.password = Set(hash_password(&password)?);
            updated_fields.push("password");
        }

        let updated = active.update(&txn).await.map_err(|err| {
            if is_unique_violation(&err) {
                DomainError::validation(DUPLICATE_EMAIL)
            } else {
                err.into()
            }
        })?;
        txn.commit().await?;

        info!(
            "User with ID {} updated. Updated fields: {}",
            id,
            if updated_fields.is_empty() { "none".to_string() } else { updated_fields.join(", ") }
        );
        Ok(updated)
    }

    pub async fn find_account(&self, id: i32) -> Result<Option<user::Model>> {
        Ok(user::Entity::find_by_id(id).one(&self.db).await?)
    }

    pub async fn list_accounts(&self) -> Result<Vec<user::Model>> {
        Ok(user::Entity::find()
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await?)
    }

    /// Deletes an account together with its token.
    #[instrument(skip(self))]
    pub async fn delete_account(&self, id: i32) -> Result<()> {
        let result = user::Entity::delete_by_id(id).exec(&self.db).await?;
        debug!("Delete operation completed. Rows affected: {}", result.rows_affected);
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("User", id));
        }
        info!("User with ID {} deleted", id);
        Ok(())
    }
}

#[async_trait]
impl AccountBackend for AccountStore {
    #[instrument(skip(self))]
    async fn create_account(&self, new_account: NewAccount) -> Result<user::Model> {
        let txn = self.db.begin().await?;
        let account = insert_account(&txn, new_account, false).await?;
        txn.commit().await?;

        info!("User created with ID: {}, email: {}", account.id, account.email);
        Ok(account)
    }

    #[instrument(skip(self, password))]
    async fn authenticate(&self, email: &str, password: &str) -> Result<Option<user::Model>> {
        let email = normalize_email(email);
        let Some(account) = find_by_email(&self.db, &email, None).await? else {
            // keep timing in line with the wrong-password path
            let _ = hash_password(password);
            debug!("Authentication failed: no matching account");
            return Ok(None);
        };

        if !verify_password(password, &account.password) || !account.is_active {
            debug!("Authentication failed for user {}", account.id);
            return Ok(None);
        }

        Ok(Some(account))
    }
}

/// Validates and inserts an account. Staff and superuser flags are set in
/// the same insert when `superuser` is true.
async fn insert_account<C: ConnectionTrait>(
    conn: &C,
    new_account: NewAccount,
    superuser: bool,
) -> Result<user::Model> {
    let email = checked_email(&new_account.email)?;
    validate_password(&new_account.password)?;
    let name = checked_name(new_account.name)?;

    if find_by_email(conn, &email, None).await?.is_some() {
        warn!("Account with email '{}' already exists", email);
        return Err(DomainError::validation(DUPLICATE_EMAIL));
    }

    user::ActiveModel {
        email: Set(email),
        password: Set(hash_password(&new_account.password)?),
        name: Set(name),
        is_active: Set(true),
        is_staff: Set(superuser),
        is_superuser: Set(superuser),
        ..Default::default()
    }
    .insert(conn)
    .await
    .map_err(|err| {
        if is_unique_violation(&err) {
            DomainError::validation(DUPLICATE_EMAIL)
        } else {
            err.into()
        }
    })
}

/// Looks up an account by email, case-insensitively over the whole address.
async fn find_by_email<C: ConnectionTrait>(
    conn: &C,
    email: &str,
    exclude_id: Option<i32>,
) -> Result<Option<user::Model>> {
    let mut query = user::Entity::find().filter(
        Expr::expr(Func::lower(Expr::col((user::Entity, user::Column::Email))))
            .eq(email.to_lowercase()),
    );
    if let Some(id) = exclude_id {
        query = query.filter(user::Column::Id.ne(id));
    }
    Ok(query.one(conn).await?)
}

fn checked_email(raw: &str) -> Result<String> {
    if raw.trim().is_empty() {
        return Err(DomainError::validation("Users must have an email address"));
    }
    let email = normalize_email(raw);
    if email.chars().count() > MAX_EMAIL_LENGTH {
        return Err(DomainError::validation(format!(
            "Ensure email has no more than {} characters",
            MAX_EMAIL_LENGTH
        )));
    }
    if !is_valid_email(&email) {
        return Err(DomainError::validation("Enter a valid email address"));
    }
    Ok(email)
}

fn checked_name(name: Option<String>) -> Result<Option<String>> {
    match name {
        Some(name) if name.chars().count() > MAX_NAME_LENGTH => Err(DomainError::validation(
            format!("Ensure name has no more than {} characters", MAX_NAME_LENGTH),
        )),
        other => Ok(other),
    }
}
