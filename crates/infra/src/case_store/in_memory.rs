use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use wareops_core::CaseKey;
use wareops_ledger::ProductionCase;

use super::r#trait::{CaseStore, Decide, StoreError, TransactionError};

#[derive(Debug, Clone)]
struct VersionedCase {
    version: u64,
    case: ProductionCase,
}

/// In-memory case store with optimistic concurrency.
///
/// Intended for tests/dev. Documents carry a version counter; a transaction
/// reads, decides, then commits only if the version is unchanged, re-reading
/// on conflict up to `max_attempts` times — the same read-modify-write shape
/// the hosted store's transaction runner provides.
#[derive(Debug)]
pub struct InMemoryCaseStore {
    docs: RwLock<HashMap<CaseKey, VersionedCase>>,
    max_attempts: u32,
}

impl Default for InMemoryCaseStore {
    fn default() -> Self {
        Self {
            docs: RwLock::new(HashMap::new()),
            max_attempts: 8,
        }
    }
}

impl InMemoryCaseStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read_versioned(&self, key: &CaseKey) -> Result<Option<VersionedCase>, StoreError> {
        let docs = self
            .docs
            .read()
            .map_err(|_| StoreError::backend("lock poisoned"))?;
        Ok(docs.get(key).cloned())
    }
}

#[async_trait]
impl CaseStore for InMemoryCaseStore {
    async fn get(&self, key: &CaseKey) -> Result<Option<ProductionCase>, StoreError> {
        Ok(self.read_versioned(key)?.map(|v| v.case))
    }

    async fn insert(&self, case: ProductionCase) -> Result<(), StoreError> {
        let key = case.key();
        let mut docs = self
            .docs
            .write()
            .map_err(|_| StoreError::backend("lock poisoned"))?;
        if docs.contains_key(&key) {
            return Err(StoreError::AlreadyExists(key));
        }
        docs.insert(key, VersionedCase { version: 1, case });
        Ok(())
    }

    async fn run_transaction(
        &self,
        key: &CaseKey,
        mut decide: Decide,
    ) -> Result<ProductionCase, TransactionError> {
        for _attempt in 0..self.max_attempts {
            let read = self.read_versioned(key)?;
            let read_version = read.as_ref().map(|v| v.version);

            let updated = decide(read.map(|v| v.case))?;

            // Models the gap between a transaction's read and its commit;
            // the real store is on the other side of a network round-trip.
            tokio::task::yield_now().await;

            let mut docs = self
                .docs
                .write()
                .map_err(|_| StoreError::backend("lock poisoned"))?;
            let current_version = docs.get(key).map(|v| v.version);
            if current_version != read_version {
                tracing::debug!(key = %key, "write conflict, retrying transaction");
                continue;
            }
            docs.insert(
                key.clone(),
                VersionedCase {
                    version: current_version.unwrap_or(0) + 1,
                    case: updated.clone(),
                },
            );
            return Ok(updated);
        }

        Err(TransactionError::Contention {
            key: key.clone(),
            attempts: self.max_attempts,
        })
    }
}
