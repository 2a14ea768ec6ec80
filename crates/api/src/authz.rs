//! Route-side authorization guard.
//!
//! There is no central deny-by-default: every permission-bearing handler must
//! call [`require`] before acting. The check itself is this one shared
//! function rather than being re-derived per route.

use axum::response::Response;

use wareops_auth::AuthContext;

use crate::app::errors;

/// Allow iff the caller is Admin or holds `page:action`.
///
/// Returns the ready-to-send `403` response on denial so handlers can
/// `return` it directly.
pub fn require(ctx: &AuthContext, page: &str, action: &str) -> Result<(), Response> {
    if ctx.is_admin() || ctx.allows(page, action) {
        Ok(())
    } else {
        Err(errors::forbidden(page, action))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wareops_auth::{PermissionSet, Role};
    use wareops_core::UserId;

    fn ctx(role: Option<&'static str>, permissions: Option<PermissionSet>) -> AuthContext {
        AuthContext {
            user_id: UserId::new("u1"),
            role: role.map(Role::new),
            permissions,
            branch: None,
        }
    }

    #[test]
    fn admin_bypasses_page_checks() {
        assert!(require(&ctx(Some("Admin"), None), "production", "add").is_ok());
    }

    #[test]
    fn permission_holder_is_allowed() {
        let mut perms = PermissionSet::new();
        perms.grant("production", "add");
        assert!(require(&ctx(Some("Employee"), Some(perms)), "production", "add").is_ok());
    }

    #[test]
    fn everyone_else_is_forbidden() {
        let mut perms = PermissionSet::new();
        perms.grant("production", "view");

        assert!(require(&ctx(Some("Employee"), Some(perms)), "production", "add").is_err());
        assert!(require(&ctx(Some("Employee"), None), "production", "add").is_err());
        assert!(require(&ctx(Some("admin"), None), "production", "add").is_err());
    }
}
