use std::collections::HashMap;
use std::sync::Arc;
use std::sync::RwLock;

use async_trait::async_trait;

use wareops_core::{UserId, WorkDate};
use wareops_ledger::{AllocationEntry, DailySummary};

use crate::case_store::StoreError;

/// Audit seam: append-only entry log plus the additively-merged daily
/// summaries.
///
/// Entries in one `append` batch are written together but carry no ordering
/// among themselves. Audit writes happen outside the case transactions, so
/// ledger state and audit log are only eventually consistent — the capacity
/// invariant never depends on this log.
#[async_trait]
pub trait AuditLog: Send + Sync {
    async fn append(&self, entries: Vec<AllocationEntry>) -> Result<(), StoreError>;

    /// Merge-write a summary: absent fields start at zero, present ones add up.
    async fn merge_daily_summary(&self, summary: &DailySummary) -> Result<(), StoreError>;

    async fn daily_summary(
        &self,
        date: WorkDate,
        user_id: &UserId,
    ) -> Result<Option<DailySummary>, StoreError>;
}

#[async_trait]
impl<A> AuditLog for Arc<A>
where
    A: AuditLog + ?Sized,
{
    async fn append(&self, entries: Vec<AllocationEntry>) -> Result<(), StoreError> {
        (**self).append(entries).await
    }

    async fn merge_daily_summary(&self, summary: &DailySummary) -> Result<(), StoreError> {
        (**self).merge_daily_summary(summary).await
    }

    async fn daily_summary(
        &self,
        date: WorkDate,
        user_id: &UserId,
    ) -> Result<Option<DailySummary>, StoreError> {
        (**self).daily_summary(date, user_id).await
    }
}

/// In-memory audit log for dev/test wiring.
#[derive(Debug, Default)]
pub struct InMemoryAuditLog {
    entries: RwLock<Vec<AllocationEntry>>,
    summaries: RwLock<HashMap<(WorkDate, UserId), DailySummary>>,
}

impl InMemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// All entries appended so far (test helper).
    pub fn entries(&self) -> Vec<AllocationEntry> {
        self.entries.read().map(|e| e.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl AuditLog for InMemoryAuditLog {
    async fn append(&self, mut entries: Vec<AllocationEntry>) -> Result<(), StoreError> {
        let mut log = self
            .entries
            .write()
            .map_err(|_| StoreError::backend("lock poisoned"))?;
        log.append(&mut entries);
        Ok(())
    }

    async fn merge_daily_summary(&self, summary: &DailySummary) -> Result<(), StoreError> {
        let mut summaries = self
            .summaries
            .write()
            .map_err(|_| StoreError::backend("lock poisoned"))?;
        summaries
            .entry((summary.date, summary.user_id.clone()))
            .or_insert_with(|| DailySummary::empty(summary.date, summary.user_id.clone()))
            .merge_from(summary);
        Ok(())
    }

    async fn daily_summary(
        &self,
        date: WorkDate,
        user_id: &UserId,
    ) -> Result<Option<DailySummary>, StoreError> {
        let summaries = self
            .summaries
            .read()
            .map_err(|_| StoreError::backend("lock poisoned"))?;
        Ok(summaries.get(&(date, user_id.clone())).cloned())
    }
}
