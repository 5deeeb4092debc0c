use chrono::Utc;
use model::entities::{auth_token, user};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use tracing::{debug, info, instrument, warn};

use crate::account_store::{AccountBackend, AccountStore};
use crate::error::{is_unique_violation, DomainError, Result};

const MISSING_CREDENTIALS: &str = "Must include \"email\" and \"password\".";
const INVALID_CREDENTIALS: &str = "Unable to log in with provided credentials.";

/// Bytes of randomness in a token key; rendered as twice as many hex chars.
const TOKEN_BYTES: usize = 20;

/// Exchanges credentials for an opaque session token.
///
/// Each account has at most one token. It never expires and is revoked
/// only by deleting it (directly or by deleting the account).
#[derive(Clone, Debug)]
pub struct TokenIssuer<B = AccountStore> {
    db: DatabaseConnection,
    backend: B,
}

impl TokenIssuer<AccountStore> {
    /// Token issuer authenticating against the database-backed account store.
    pub fn with_store(db: DatabaseConnection) -> Self {
        let backend = AccountStore::new(db.clone());
        Self { db, backend }
    }
}

impl<B: AccountBackend> TokenIssuer<B> {
    pub fn new(db: DatabaseConnection, backend: B) -> Self {
        Self { db, backend }
    }

    /// Returns the token of the account matching the credentials, creating
    /// one on first login.
    ///
    /// Both credentials are required; a missing one is rejected before any
    /// lookup. Failures carry a generic message that does not reveal whether
    /// the account exists.
    #[instrument(skip(self, password))]
    pub async fn issue_token(
        &self,
        email: Option<&str>,
        password: Option<&str>,
    ) -> Result<auth_token::Model> {
        let (Some(email), Some(password)) = (
            email.filter(|e| !e.is_empty()),
            password.filter(|p| !p.is_empty()),
        ) else {
            debug!("Token request without email or password");
            return Err(DomainError::Authorization(MISSING_CREDENTIALS.to_string()));
        };

        let Some(account) = self.backend.authenticate(email, password).await? else {
            warn!("Token request with invalid credentials");
            return Err(DomainError::Authorization(INVALID_CREDENTIALS.to_string()));
        };

        if let Some(existing) = self.token_for_account(account.id).await? {
            debug!("Reusing token for user {}", account.id);
            return Ok(existing);
        }

        let token = auth_token::ActiveModel {
            key: Set(generate_key()),
            user_id: Set(account.id),
            created: Set(Utc::now()),
        }
        .insert(&self.db)
        .await;

        match token {
            Ok(token) => {
                info!("Token issued for user {}", account.id);
                Ok(token)
            }
            // A concurrent login for the same account won the insert
            Err(err) if is_unique_violation(&err) => self
                .token_for_account(account.id)
                .await?
                .ok_or(DomainError::Database(err)),
            Err(err) => Err(err.into()),
        }
    }

    /// Returns the active account bound to `key`, if any.
    pub async fn resolve_token(&self, key: &str) -> Result<Option<user::Model>> {
        let found = auth_token::Entity::find_by_id(key.to_string())
            .find_also_related(user::Entity)
            .one(&self.db)
            .await?;

        Ok(found
            .and_then(|(_, account)| account)
            .filter(|account| account.is_active))
    }

    pub async fn token_for_account(&self, account_id: i32) -> Result<Option<auth_token::Model>> {
        Ok(auth_token::Entity::find()
            .filter(auth_token::Column::UserId.eq(account_id))
            .one(&self.db)
            .await?)
    }

    /// Deletes the account's token and returns the revoked key.
    #[instrument(skip(self))]
    pub async fn revoke_token(&self, account_id: i32) -> Result<Option<String>> {
        let Some(token) = self.token_for_account(account_id).await? else {
            return Ok(None);
        };

        auth_token::Entity::delete_by_id(token.key.clone())
            .exec(&self.db)
            .await?;
        info!("Token revoked for user {}", account_id);
        Ok(Some(token.key))
    }
}

/// Generates a fresh random token key of lowercase hex characters.
pub fn generate_key() -> String {
    let bytes: [u8; TOKEN_BYTES] = rand::random();
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account_store::NewAccount;
    use crate::testing::setup_db;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    async fn issuer_with_account() -> (TokenIssuer, user::Model) {
        let db = setup_db().await;
        let account = AccountStore::new(db.clone())
            .create_account(NewAccount::new("test_user@dev.com", "Testpass123").with_name("Test"))
            .await
            .unwrap();
        (TokenIssuer::with_store(db), account)
    }

    /// Backend counting how often authentication was attempted.
    #[derive(Clone, Default)]
    struct CountingBackend {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl AccountBackend for CountingBackend {
        async fn create_account(&self, _new_account: NewAccount) -> Result<user::Model> {
            unreachable!("not used by the token issuer")
        }

        async fn authenticate(&self, _email: &str, _password: &str) -> Result<Option<user::Model>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(None)
        }
    }

    #[test]
    fn test_generate_key_shape() {
        let key = generate_key();
        assert_eq!(key.len(), 40);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_ne!(key, generate_key());
    }

    #[tokio::test]
    async fn test_issue_token_for_valid_credentials() {
        let (issuer, account) = issuer_with_account().await;

        let token = issuer
            .issue_token(Some("test_user@dev.com"), Some("Testpass123"))
            .await
            .unwrap();

        assert_eq!(token.user_id, account.id);
        assert_eq!(token.key.len(), 40);
    }

    #[tokio::test]
    async fn test_issue_token_reuses_existing_token() {
        let (issuer, _) = issuer_with_account().await;

        let first = issuer
            .issue_token(Some("test_user@dev.com"), Some("Testpass123"))
            .await
            .unwrap();
        let second = issuer
            .issue_token(Some("test_user@DEV.com"), Some("Testpass123"))
            .await
            .unwrap();

        assert_eq!(first.key, second.key);
    }

    #[tokio::test]
    async fn test_issue_token_failures_are_indistinguishable() {
        let (issuer, _) = issuer_with_account().await;

        let wrong_password = issuer
            .issue_token(Some("test_user@dev.com"), Some("fail"))
            .await
            .unwrap_err();
        let unknown_user = issuer
            .issue_token(Some("ghost@dev.com"), Some("Testpass123"))
            .await
            .unwrap_err();

        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
        assert!(matches!(wrong_password, DomainError::Authorization(_)));
    }

    #[tokio::test]
    async fn test_missing_credentials_rejected_before_lookup() {
        let backend = CountingBackend::default();
        let issuer = TokenIssuer::new(setup_db().await, backend.clone());

        for (email, password) in [
            (None, Some("Testpass123")),
            (Some("test"), None),
            (Some("test"), Some("")),
            (Some(""), Some("Testpass123")),
        ] {
            let result = issuer.issue_token(email, password).await;
            match result {
                Err(DomainError::Authorization(message)) => assert_eq!(message, MISSING_CREDENTIALS),
                other => panic!("Expected authorization error, got {:?}", other),
            }
        }
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);

        let _ = issuer.issue_token(Some("a@b.com"), Some("secret")).await;
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_resolve_and_revoke_token() {
        let (issuer, account) = issuer_with_account().await;
        let token = issuer
            .issue_token(Some("test_user@dev.com"), Some("Testpass123"))
            .await
            .unwrap();

        let resolved = issuer.resolve_token(&token.key).await.unwrap();
        assert_eq!(resolved.map(|a| a.id), Some(account.id));

        let revoked = issuer.revoke_token(account.id).await.unwrap();
        assert_eq!(revoked.as_deref(), Some(token.key.as_str()));
        assert!(issuer.resolve_token(&token.key).await.unwrap().is_none());
        assert!(issuer.revoke_token(account.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_deleting_account_deletes_token() {
        let (issuer, account) = issuer_with_account().await;
        let token = issuer
            .issue_token(Some("test_user@dev.com"), Some("Testpass123"))
            .await
            .unwrap();

        AccountStore::new(issuer.db.clone())
            .delete_account(account.id)
            .await
            .unwrap();

        assert!(issuer.resolve_token(&token.key).await.unwrap().is_none());
        assert!(issuer.token_for_account(account.id).await.unwrap().is_none());
    }
}
