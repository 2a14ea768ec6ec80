use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use wareops_core::{Branch, UserId};

use crate::directory::UserDirectory;
use crate::permissions::PermissionSet;
use crate::roles::Role;
use crate::session::parse_session_token;

/// Resolved authorization context for one request.
///
/// `permissions` stays `None` when the user has no explicit permission set and
/// no matching role record exists — callers must treat that as "nothing
/// granted" (except for Admin, which bypasses page checks entirely).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthContext {
    pub user_id: UserId,
    pub role: Option<Role>,
    pub permissions: Option<PermissionSet>,
    pub branch: Option<Branch>,
}

impl AuthContext {
    pub fn is_admin(&self) -> bool {
        self.role.as_ref().is_some_and(Role::is_admin)
    }

    /// True iff the resolved permission set grants `action` on `page`.
    ///
    /// This is the raw permission lookup; route guards combine it with the
    /// admin bypass (`is_admin() || allows(...)`).
    pub fn allows(&self, page: &str, action: &str) -> bool {
        self.permissions
            .as_ref()
            .is_some_and(|set| set.allows(page, action))
    }
}

/// Derives a caller's identity and effective permissions from the opaque
/// `session` cookie value.
///
/// This is the single shared implementation of the cookie → identity →
/// permission-fallback chain; routes must not re-derive any part of it.
/// All failure paths degrade: an unresolvable or unknown session yields
/// `None`, a failed role lookup yields a context without permissions. The
/// resolver never returns an error.
#[derive(Clone)]
pub struct SessionResolver {
    directory: Arc<dyn UserDirectory>,
}

impl SessionResolver {
    pub fn new(directory: Arc<dyn UserDirectory>) -> Self {
        Self { directory }
    }

    pub async fn resolve(&self, cookie_value: &str) -> Option<AuthContext> {
        let user_id = parse_session_token(cookie_value)?;

        let user = match self.directory.find_user(&user_id).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                debug!(user_id = %user_id, "session user not found");
                return None;
            }
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "user lookup failed, treating as unauthenticated");
                return None;
            }
        };

        let permissions = match (&user.permissions, &user.role) {
            // Explicit permissions on the user win, verbatim.
            (Some(explicit), _) => Some(explicit.clone()),
            (None, Some(role)) => self.role_permissions(role).await,
            (None, None) => None,
        };

        Some(AuthContext {
            user_id: user.id,
            role: user.role,
            permissions,
            branch: user.branch,
        })
    }

    async fn role_permissions(&self, role: &Role) -> Option<PermissionSet> {
        match self.directory.find_role(role.as_str()).await {
            Ok(Some(record)) => Some(record.to_permission_set()),
            Ok(None) => {
                debug!(role = %role, "no role record, permissions stay unset");
                None
            }
            Err(e) => {
                warn!(role = %role, error = %e, "role lookup failed, permissions stay unset");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use wareops_core::EmployeeNo;

    use crate::directory::DirectoryError;
    use crate::user::{RoleRecord, UserRecord};

    struct StubDirectory {
        users: Vec<UserRecord>,
        roles: Vec<RoleRecord>,
        fail_roles: bool,
    }

    #[async_trait]
    impl UserDirectory for StubDirectory {
        async fn find_user(&self, id: &UserId) -> Result<Option<UserRecord>, DirectoryError> {
            Ok(self.users.iter().find(|u| &u.id == id).cloned())
        }

        async fn find_user_by_employee_no(
            &self,
            employee_no: &EmployeeNo,
        ) -> Result<Option<UserRecord>, DirectoryError> {
            Ok(self
                .users
                .iter()
                .find(|u| &u.employee_no == employee_no)
                .cloned())
        }

        async fn find_role(&self, name: &str) -> Result<Option<RoleRecord>, DirectoryError> {
            if self.fail_roles {
                return Err(DirectoryError::new("store unavailable"));
            }
            Ok(self.roles.iter().find(|r| r.name == name).cloned())
        }
    }

    fn employee(role: Option<&'static str>, permissions: Option<PermissionSet>) -> UserRecord {
        UserRecord {
            id: UserId::new("u1"),
            employee_no: EmployeeNo::new("E-100"),
            full_name: "Sanna Virtanen".to_string(),
            role: role.map(Role::new),
            permissions,
            branch: Some(Branch::new("Vantaa")),
        }
    }

    fn resolver(dir: StubDirectory) -> SessionResolver {
        SessionResolver::new(Arc::new(dir))
    }

    #[tokio::test]
    async fn json_cookie_and_bare_cookie_resolve_to_same_user() {
        let resolver = resolver(StubDirectory {
            users: vec![employee(None, None)],
            roles: vec![],
            fail_roles: false,
        });

        let a = resolver.resolve(r#"{"id":"u1"}"#).await.unwrap();
        let b = resolver.resolve("u1").await.unwrap();
        assert_eq!(a.user_id, b.user_id);
    }

    #[tokio::test]
    async fn unknown_user_is_unauthenticated() {
        let resolver = resolver(StubDirectory {
            users: vec![],
            roles: vec![],
            fail_roles: false,
        });

        assert!(resolver.resolve("ghost").await.is_none());
        assert!(resolver.resolve("").await.is_none());
    }

    #[tokio::test]
    async fn role_fallback_flattens_grant_strings() {
        let resolver = resolver(StubDirectory {
            users: vec![employee(Some("Employee"), None)],
            roles: vec![RoleRecord {
                name: "Employee".to_string(),
                permissions: vec!["tasks:view".to_string(), "tasks:add".to_string()],
            }],
            fail_roles: false,
        });

        let ctx = resolver.resolve("u1").await.unwrap();
        let perms = ctx.permissions.expect("role fallback should populate permissions");
        assert!(perms.allows("tasks", "view"));
        assert!(perms.allows("tasks", "add"));
        assert!(!perms.allows("tasks", "edit"));
    }

    #[tokio::test]
    async fn explicit_permissions_override_role_fallback() {
        let mut explicit = PermissionSet::new();
        explicit.grant("maintenance", "view");

        let resolver = resolver(StubDirectory {
            users: vec![employee(Some("Employee"), Some(explicit))],
            roles: vec![RoleRecord {
                name: "Employee".to_string(),
                permissions: vec!["tasks:view".to_string()],
            }],
            fail_roles: false,
        });

        let ctx = resolver.resolve("u1").await.unwrap();
        assert!(ctx.allows("maintenance", "view"));
        assert!(!ctx.allows("tasks", "view"));
    }

    #[tokio::test]
    async fn missing_role_record_leaves_permissions_unset() {
        let resolver = resolver(StubDirectory {
            users: vec![employee(Some("Contractor"), None)],
            roles: vec![],
            fail_roles: false,
        });

        let ctx = resolver.resolve("u1").await.unwrap();
        assert!(ctx.permissions.is_none());
        assert!(!ctx.allows("tasks", "view"));
    }

    #[tokio::test]
    async fn role_lookup_failure_degrades_instead_of_erroring() {
        let resolver = resolver(StubDirectory {
            users: vec![employee(Some("Employee"), None)],
            roles: vec![],
            fail_roles: true,
        });

        let ctx = resolver.resolve("u1").await.unwrap();
        assert_eq!(ctx.user_id.as_str(), "u1");
        assert!(ctx.permissions.is_none());
    }

    #[tokio::test]
    async fn admin_bypass_is_role_based() {
        let resolver = resolver(StubDirectory {
            users: vec![employee(Some("Admin"), None)],
            roles: vec![],
            fail_roles: false,
        });

        let ctx = resolver.resolve("u1").await.unwrap();
        assert!(ctx.is_admin());
        // Admin has no permission set of its own; bypass happens in the guard.
        assert!(!ctx.allows("tasks", "view"));
    }
}
