use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Role name used for permission fallback.
///
/// Roles are opaque strings at this layer; the mapping from a role to its
/// granted permissions lives in the role records of the directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Exact, case-sensitive comparison with `"Admin"`.
    ///
    /// Admin bypasses per-page permission checks everywhere. The comparison is
    /// deliberately case-sensitive: `"admin"` and `"ADMIN"` are ordinary roles.
    pub fn is_admin(&self) -> bool {
        self.as_str() == "Admin"
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_check_is_case_sensitive() {
        assert!(Role::new("Admin").is_admin());
        assert!(!Role::new("admin").is_admin());
        assert!(!Role::new("ADMIN").is_admin());
        assert!(!Role::new("Employee").is_admin());
    }
}
