use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use wareops_auth::{DirectoryError, RoleRecord, UserDirectory, UserRecord};
use wareops_core::{EmployeeNo, UserId};

/// In-memory user/role directory for dev/test wiring.
///
/// Role names are the lookup key, matched exactly — the same exact-equality
/// contract the resolver's role fallback specifies.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    users: RwLock<HashMap<UserId, UserRecord>>,
    roles: RwLock<HashMap<String, RoleRecord>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert_user(&self, user: UserRecord) {
        if let Ok(mut users) = self.users.write() {
            users.insert(user.id.clone(), user);
        }
    }

    pub fn upsert_role(&self, role: RoleRecord) {
        if let Ok(mut roles) = self.roles.write() {
            roles.insert(role.name.clone(), role);
        }
    }
}

#[async_trait]
impl UserDirectory for InMemoryDirectory {
    async fn find_user(&self, id: &UserId) -> Result<Option<UserRecord>, DirectoryError> {
        let users = self
            .users
            .read()
            .map_err(|_| DirectoryError::new("lock poisoned"))?;
        Ok(users.get(id).cloned())
    }

    async fn find_user_by_employee_no(
        &self,
        employee_no: &EmployeeNo,
    ) -> Result<Option<UserRecord>, DirectoryError> {
        let users = self
            .users
            .read()
            .map_err(|_| DirectoryError::new("lock poisoned"))?;
        Ok(users
            .values()
            .find(|u| &u.employee_no == employee_no)
            .cloned())
    }

    async fn find_role(&self, name: &str) -> Result<Option<RoleRecord>, DirectoryError> {
        let roles = self
            .roles
            .read()
            .map_err(|_| DirectoryError::new("lock poisoned"))?;
        Ok(roles.get(name).cloned())
    }
}
