//! Static role-based authorization policy.
//!
//! The grant table is built once at process start and never mutated. Each
//! endpoint declares a `(resource, action, possession)` triple which is
//! checked against the caller's roles. Unknown combinations deny, and an
//! `Any` grant always satisfies an `Own` check.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::handlers::images::IMAGE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }

    /// Parse the stored role column; unrecognized values fall back to `User`
    /// so a corrupt row can never escalate privileges.
    #[must_use]
    pub fn from_stored(value: &str) -> Self {
        match value {
            "admin" => Self::Admin,
            _ => Self::User,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Possession {
    Own,
    Any,
}

#[derive(Debug, Clone, Copy)]
struct Grant {
    role: Role,
    resource: &'static str,
    action: Action,
    possession: Possession,
}

/// Immutable grant table with a fluent builder.
#[derive(Debug, Default)]
pub struct AccessControl {
    grants: Vec<Grant>,
}

impl AccessControl {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn grant(self, role: Role) -> GrantBuilder {
        GrantBuilder { acl: self, role }
    }

    /// Returns `true` when any of the roles holds a matching grant.
    ///
    /// An `Any` grant satisfies both `Any` and `Own` checks; an `Own` grant
    /// satisfies only `Own`. Anything not granted is denied.
    #[must_use]
    pub fn check(
        &self,
        roles: &[Role],
        resource: &str,
        action: Action,
        possession: Possession,
    ) -> bool {
        self.grants.iter().any(|grant| {
            roles.contains(&grant.role)
                && grant.resource == resource
                && grant.action == action
                && (grant.possession == Possession::Any || possession == Possession::Own)
        })
    }
}

#[derive(Debug)]
pub struct GrantBuilder {
    acl: AccessControl,
    role: Role,
}

impl GrantBuilder {
    fn push(mut self, resource: &'static str, action: Action, possession: Possession) -> Self {
        self.acl.grants.push(Grant {
            role: self.role,
            resource,
            action,
            possession,
        });
        self
    }

    #[must_use]
    pub fn create_own(self, resource: &'static str) -> Self {
        self.push(resource, Action::Create, Possession::Own)
    }

    #[must_use]
    pub fn read_own(self, resource: &'static str) -> Self {
        self.push(resource, Action::Read, Possession::Own)
    }

    #[must_use]
    pub fn update_own(self, resource: &'static str) -> Self {
        self.push(resource, Action::Update, Possession::Own)
    }

    #[must_use]
    pub fn delete_own(self, resource: &'static str) -> Self {
        self.push(resource, Action::Delete, Possession::Own)
    }

    #[must_use]
    pub fn create_any(self, resource: &'static str) -> Self {
        self.push(resource, Action::Create, Possession::Any)
    }

    #[must_use]
    pub fn read_any(self, resource: &'static str) -> Self {
        self.push(resource, Action::Read, Possession::Any)
    }

    #[must_use]
    pub fn update_any(self, resource: &'static str) -> Self {
        self.push(resource, Action::Update, Possession::Any)
    }

    #[must_use]
    pub fn delete_any(self, resource: &'static str) -> Self {
        self.push(resource, Action::Delete, Possession::Any)
    }

    #[must_use]
    pub fn grant(self, role: Role) -> Self {
        GrantBuilder {
            acl: self.acl,
            role,
        }
    }

    #[must_use]
    pub fn build(self) -> AccessControl {
        self.acl
    }
}

/// Process-wide policy: USER gets own-scoped image CRUD, ADMIN any-scoped.
pub static POLICY: Lazy<AccessControl> = Lazy::new(|| {
    AccessControl::new()
        .grant(Role::User)
        .create_own(IMAGE)
        .read_own(IMAGE)
        .update_own(IMAGE)
        .delete_own(IMAGE)
        .grant(Role::Admin)
        .create_any(IMAGE)
        .read_any(IMAGE)
        .update_any(IMAGE)
        .delete_any(IMAGE)
        .build()
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_has_own_image_crud() {
        let roles = [Role::User];
        for action in [Action::Create, Action::Read, Action::Update, Action::Delete] {
            assert!(POLICY.check(&roles, IMAGE, action, Possession::Own));
        }
    }

    #[test]
    fn user_cannot_touch_any_possession() {
        let roles = [Role::User];
        for action in [Action::Create, Action::Read, Action::Update, Action::Delete] {
            assert!(!POLICY.check(&roles, IMAGE, action, Possession::Any));
        }
    }

    #[test]
    fn admin_any_grant_subsumes_own_checks() {
        let roles = [Role::Admin];
        for action in [Action::Create, Action::Read, Action::Update, Action::Delete] {
            assert!(POLICY.check(&roles, IMAGE, action, Possession::Any));
            assert!(POLICY.check(&roles, IMAGE, action, Possession::Own));
        }
    }

    #[test]
    fn unknown_resource_is_denied() {
        assert!(!POLICY.check(&[Role::Admin], "video", Action::Read, Possession::Own));
    }

    #[test]
    fn empty_roles_are_denied() {
        assert!(!POLICY.check(&[], IMAGE, Action::Read, Possession::Own));
    }

    #[test]
    fn role_from_stored_never_escalates() {
        assert_eq!(Role::from_stored("admin"), Role::Admin);
        assert_eq!(Role::from_stored("user"), Role::User);
        assert_eq!(Role::from_stored("root"), Role::User);
    }
}
