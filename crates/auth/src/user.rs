use serde::{Deserialize, Serialize};

use wareops_core::{Branch, EmployeeNo, UserId};

use crate::{PermissionSet, Role};

/// A user document as stored in the directory.
///
/// `permissions`, when present, overrides any role-derived set. Field names
/// follow the stored document format (camelCase).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: UserId,
    pub employee_no: EmployeeNo,
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<PermissionSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<Branch>,
}

/// A role document: the role name plus its `"page:action"` grant strings.
///
/// Created and edited by administrators; read-only from the resolver's side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleRecord {
    pub name: String,
    pub permissions: Vec<String>,
}

impl RoleRecord {
    /// Flatten this role's grants into an effective permission set.
    pub fn to_permission_set(&self) -> PermissionSet {
        PermissionSet::from_role_grants(&self.permissions)
    }
}
