use sea_orm::entity::prelude::*;
use std::fmt;

/// A user account of the system. The email address is the sole identity
/// field; there is no separate username.
#[derive(Clone, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Normalized email (domain part lowercased).
    #[sea_orm(unique)]
    pub email: String,
    /// Salted one-way hash, never the plaintext password.
    pub password: String,
    pub name: Option<String>,
    #[sea_orm(default_value = "true")]
    pub is_active: bool,
    #[sea_orm(default_value = "false")]
    pub is_staff: bool,
    #[sea_orm(default_value = "false")]
    pub is_superuser: bool,
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("name", &self.name)
            .field("is_active", &self.is_active)
            .field("is_staff", &self.is_staff)
            .field("is_superuser", &self.is_superuser)
            .finish()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// A user holds at most one session token.
    #[sea_orm(has_one = "super::auth_token::Entity")]
    AuthToken,
}

impl Related<super::auth_token::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AuthToken.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_password() {
        let user = Model {
            id: 1,
            email: "someone@example.com".to_string(),
            password: "abcd:ef01".to_string(),
            name: None,
            is_active: true,
            is_staff: false,
            is_superuser: false,
        };

        let rendered = format!("{:?}", user);
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("abcd:ef01"));
    }
}
