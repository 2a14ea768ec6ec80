use chrono::Utc;
use thiserror::Error;
use tracing::{debug, instrument};

use wareops_core::{CaseKey, UserId, WorkDate};
use wareops_ledger::{
    AllocationEntry, AllocationError, DailySummary, PackingEntry, SortingEntry, validate_entries,
};

use crate::audit::AuditLog;
use crate::case_store::{CaseStore, StoreError, TransactionError};

/// Failure of a production submission.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error(transparent)]
    Allocation(#[from] AllocationError),

    #[error("allocation for {key} aborted under contention")]
    Contention { key: CaseKey },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<TransactionError> for RecordError {
    fn from(err: TransactionError) -> Self {
        match err {
            TransactionError::Allocation(e) => Self::Allocation(e),
            TransactionError::Contention { key, .. } => Self::Contention { key },
            TransactionError::Store(e) => Self::Store(e),
        }
    }
}

/// Executes production submissions against the case ledger and audit log.
///
/// Semantics per submission:
/// 1. Every entry is validated up front; the first invalid one rejects the
///    whole batch before any transaction starts.
/// 2. Each sorting entry consumes its case transactionally and independently.
///    A failure stops the batch but does NOT roll back cases that already
///    committed.
/// 3. Audit entries and the daily summary are written only after all cases
///    committed, outside the case transactions.
///
/// Submissions are not idempotent: resubmitting the same entries consumes
/// capacity again. There is no dedup key in the submission format.
pub struct ProductionRecorder<S, A> {
    cases: S,
    audit: A,
}

impl<S, A> ProductionRecorder<S, A>
where
    S: CaseStore,
    A: AuditLog,
{
    pub fn new(cases: S, audit: A) -> Self {
        Self { cases, audit }
    }

    #[instrument(
        skip(self, sorting, packing),
        fields(user_id = %user_id, date = %date, sorting = sorting.len(), packing = packing.len())
    )]
    pub async fn record(
        &self,
        date: WorkDate,
        user_id: UserId,
        sorting: Vec<SortingEntry>,
        packing: Vec<PackingEntry>,
    ) -> Result<DailySummary, RecordError> {
        validate_entries(&sorting, &packing)?;

        let now = Utc::now();

        for entry in &sorting {
            let key = entry.case_key();
            let requested = entry.total_lines;
            let by = user_id.clone();
            let tx_key = key.clone();

            self.cases
                .run_transaction(
                    &key,
                    Box::new(move |current| {
                        let mut case =
                            current.ok_or_else(|| AllocationError::CaseNotFound(tx_key.clone()))?;
                        case.allocate(requested, by.clone(), now)?;
                        Ok(case)
                    }),
                )
                .await?;

            debug!(key = %key, requested, "case allocation committed");
        }

        let mut records: Vec<AllocationEntry> = sorting
            .iter()
            .map(|e| AllocationEntry::sorting(user_id.clone(), date, e, now))
            .collect();
        records.extend(
            packing
                .iter()
                .map(|e| AllocationEntry::packing(user_id.clone(), date, e, now)),
        );
        self.audit.append(records).await?;

        let summary = DailySummary::tally(date, user_id, &sorting, &packing);
        self.audit.merge_daily_summary(&summary).await?;

        Ok(summary)
    }
}
