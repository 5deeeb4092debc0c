use model::entities::user;
use tracing::warn;

use crate::error::{DomainError, Result};

/// Returns true when `requester` may read, update or delete `target`:
/// either it is the same account or the requester is a superuser.
pub fn can_access(requester: &user::Model, target: &user::Model) -> bool {
    requester.id == target.id || requester.is_superuser
}

/// Like [`can_access`] but yields `PermissionDenied` instead of `false`.
pub fn authorize(requester: &user::Model, target: &user::Model) -> Result<()> {
    if can_access(requester, target) {
        Ok(())
    } else {
        warn!(
            "User {} denied access to user {}",
            requester.id, target.id
        );
        Err(DomainError::PermissionDenied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(id: i32, is_superuser: bool) -> user::Model {
        user::Model {
            id,
            email: format!("user{}@example.com", id),
            password: String::new(),
            name: None,
            is_active: true,
            is_staff: is_superuser,
            is_superuser,
        }
    }

    #[test]
    fn test_owner_can_access_own_account() {
        let owner = account(1, false);
        assert!(can_access(&owner, &owner));
        assert!(authorize(&owner, &owner).is_ok());
    }

    #[test]
    fn test_other_account_is_denied() {
        let requester = account(1, false);
        let target = account(2, false);

        assert!(!can_access(&requester, &target));
        assert!(matches!(
            authorize(&requester, &target),
            Err(DomainError::PermissionDenied)
        ));
    }

    #[test]
    fn test_superuser_can_access_any_account() {
        let admin = account(1, true);
        let target = account(2, false);

        assert!(can_access(&admin, &target));
        assert!(!can_access(&target, &admin));
    }

    #[test]
    fn test_staff_flag_alone_grants_nothing() {
        let mut staff = account(1, false);
        staff.is_staff = true;
        let target = account(2, false);

        assert!(!can_access(&staff, &target));
    }
}
