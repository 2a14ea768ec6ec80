use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Effective permissions of a user: page key → set of allowed actions.
///
/// Pages and actions are opaque strings (e.g. `"production"` → `{"view",
/// "add"}`). Lookups are set-based, so the order actions were granted in
/// never matters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet(BTreeMap<String, BTreeSet<String>>);

impl PermissionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant `action` on `page`.
    pub fn grant(&mut self, page: impl Into<String>, action: impl Into<String>) {
        self.0.entry(page.into()).or_default().insert(action.into());
    }

    /// True iff `page` is present and its action set contains `action`.
    pub fn allows(&self, page: &str, action: &str) -> bool {
        self.0.get(page).is_some_and(|actions| actions.contains(action))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn pages(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Flatten a role's `"page:action"` grant strings into a permission set.
    ///
    /// Entries missing either segment (`"tasks"`, `"tasks:"`, `":view"`) are
    /// silently dropped; anything past the second segment is ignored.
    pub fn from_role_grants<S: AsRef<str>>(grants: &[S]) -> Self {
        let mut set = Self::new();
        for grant in grants {
            let mut parts = grant.as_ref().splitn(3, ':');
            let (Some(page), Some(action)) = (parts.next(), parts.next()) else {
                continue;
            };
            if page.is_empty() || action.is_empty() {
                continue;
            }
            set.grant(page, action);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_requires_exact_page_and_action() {
        let mut set = PermissionSet::new();
        set.grant("tasks", "view");

        assert!(set.allows("tasks", "view"));
        assert!(!set.allows("tasks", "edit"));
        assert!(!set.allows("maintenance", "view"));
    }

    #[test]
    fn role_grants_flatten_and_group_by_page() {
        let set = PermissionSet::from_role_grants(&["tasks:view", "tasks:add", "shipments:view"]);

        assert!(set.allows("tasks", "view"));
        assert!(set.allows("tasks", "add"));
        assert!(set.allows("shipments", "view"));
        assert!(!set.allows("shipments", "add"));
        assert_eq!(set.pages().count(), 2);
    }

    #[test]
    fn malformed_grants_are_dropped() {
        let set = PermissionSet::from_role_grants(&["tasks", "tasks:", ":view", "", "ok:view"]);

        assert!(set.allows("ok", "view"));
        assert_eq!(set.pages().count(), 1);
    }

    #[test]
    fn extra_segments_are_ignored() {
        let set = PermissionSet::from_role_grants(&["reports:generate:pdf"]);
        assert!(set.allows("reports", "generate"));
        assert!(!set.allows("reports", "generate:pdf"));
    }
}
