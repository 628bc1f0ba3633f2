//! Authorization capability checks.
//!
//! Pure predicates over (caller, resource). Handlers evaluate these before
//! invoking ledger operations; the core never re-validates credentials.

use uuid::Uuid;

/// Caller role supplied by the identity layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Regular wallet owner.
    Customer,
    /// Back-office administrator.
    Admin,
}

impl Role {
    /// Parses a role string from token claims. Unknown roles are customers.
    #[must_use]
    pub fn from_claim(role: &str) -> Self {
        if role.eq_ignore_ascii_case("admin") {
            Self::Admin
        } else {
            Self::Customer
        }
    }
}

/// Returns true if the caller owns the resource.
#[must_use]
pub fn is_owner(caller: Uuid, resource_owner: Uuid) -> bool {
    caller == resource_owner
}

/// Returns true if the caller holds the admin role.
#[must_use]
pub fn is_admin(role: Role) -> bool {
    role == Role::Admin
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_owner() {
        let owner = Uuid::new_v4();
        assert!(is_owner(owner, owner));
        assert!(!is_owner(owner, Uuid::new_v4()));
    }

    #[test]
    fn test_is_admin() {
        assert!(is_admin(Role::Admin));
        assert!(!is_admin(Role::Customer));
    }

    #[test]
    fn test_role_from_claim() {
        assert_eq!(Role::from_claim("admin"), Role::Admin);
        assert_eq!(Role::from_claim("ADMIN"), Role::Admin);
        assert_eq!(Role::from_claim("customer"), Role::Customer);
        assert_eq!(Role::from_claim("anything-else"), Role::Customer);
    }
}
