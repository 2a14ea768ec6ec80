use async_trait::async_trait;
use thiserror::Error;

use wareops_core::{EmployeeNo, UserId};

use crate::user::{RoleRecord, UserRecord};

/// Directory lookup failure (storage/network).
///
/// The resolver never propagates this to callers; it is logged and degraded
/// to "unauthenticated". The login path, which does surface lookup failures,
/// wraps calls in retry instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("directory lookup failed: {0}")]
pub struct DirectoryError(pub String);

impl DirectoryError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// Read-side seam over the user/role documents in the hosted store.
///
/// Every lookup suspends on network I/O in real implementations; the in-memory
/// implementation in infra exists for dev/test wiring.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_user(&self, id: &UserId) -> Result<Option<UserRecord>, DirectoryError>;

    async fn find_user_by_employee_no(
        &self,
        employee_no: &EmployeeNo,
    ) -> Result<Option<UserRecord>, DirectoryError>;

    async fn find_role(&self, name: &str) -> Result<Option<RoleRecord>, DirectoryError>;
}
