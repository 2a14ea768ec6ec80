use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use wareops_core::CaseKey;
use wareops_ledger::{AllocationError, ProductionCase};

/// Case store operation error (infrastructure side).
///
/// Domain failures (unknown case, capacity) travel as
/// [`AllocationError`] through [`TransactionError::Allocation`] instead.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend failure: {0}")]
    Backend(String),

    #[error("case already exists: {0}")]
    AlreadyExists(CaseKey),
}

impl StoreError {
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}

/// Outcome of a read-modify-write transaction.
#[derive(Debug, Error)]
pub enum TransactionError {
    /// The decision callback rejected the update (domain-level, no retry).
    #[error(transparent)]
    Allocation(#[from] AllocationError),

    /// The store gave up after repeated write conflicts.
    #[error("transaction on {key} aborted after {attempts} conflicting attempts")]
    Contention { key: CaseKey, attempts: u32 },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Decision callback for [`CaseStore::run_transaction`].
///
/// Receives the current document (`None` when absent) and returns the
/// document to commit. It may run more than once: the store re-invokes it
/// with a fresh read after a write conflict, so it must be pure over its
/// captured inputs.
pub type Decide =
    Box<dyn FnMut(Option<ProductionCase>) -> Result<ProductionCase, AllocationError> + Send>;

/// Store seam over the per-case capacity documents.
///
/// `run_transaction` is the only mutation path used by allocations: a
/// read-then-conditionally-write executed with optimistic concurrency, with
/// conflict retry handled entirely by the implementation. Different keys
/// never coordinate with each other.
#[async_trait]
pub trait CaseStore: Send + Sync {
    async fn get(&self, key: &CaseKey) -> Result<Option<ProductionCase>, StoreError>;

    /// Create a case document. Fails if the key already exists: cases are
    /// created once by the shipment import and never recreated.
    async fn insert(&self, case: ProductionCase) -> Result<(), StoreError>;

    /// Atomically apply `decide` to the document at `key`.
    ///
    /// Two concurrent transactions on the same key serialize: at most one
    /// commits against any given read, the loser re-reads and re-decides.
    async fn run_transaction(
        &self,
        key: &CaseKey,
        decide: Decide,
    ) -> Result<ProductionCase, TransactionError>;
}

#[async_trait]
impl<S> CaseStore for Arc<S>
where
    S: CaseStore + ?Sized,
{
    async fn get(&self, key: &CaseKey) -> Result<Option<ProductionCase>, StoreError> {
        (**self).get(key).await
    }

    async fn insert(&self, case: ProductionCase) -> Result<(), StoreError> {
        (**self).insert(case).await
    }

    async fn run_transaction(
        &self,
        key: &CaseKey,
        decide: Decide,
    ) -> Result<ProductionCase, TransactionError> {
        (**self).run_transaction(key, decide).await
    }
}
