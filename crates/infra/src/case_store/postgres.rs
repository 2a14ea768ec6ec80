//! Postgres-backed case store.
//!
//! Stores each case as a JSONB document row with a version column. The
//! transaction runner is optimistic: read the row, run the decision callback,
//! then `UPDATE ... WHERE version = <read version>`; zero rows affected means
//! a concurrent writer won and the transaction re-reads.
//!
//! ## Error mapping
//!
//! | sqlx outcome                     | mapped to                    |
//! |----------------------------------|------------------------------|
//! | unique violation on insert       | `StoreError::AlreadyExists`  |
//! | any other database/pool error    | `StoreError::Backend`        |
//! | update matched zero rows         | conflict → re-read, retry    |

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tracing::instrument;

use wareops_core::CaseKey;
use wareops_ledger::ProductionCase;

use super::r#trait::{CaseStore, Decide, StoreError, TransactionError};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS production_cases (
    shipment_id TEXT NOT NULL,
    case_number TEXT NOT NULL,
    version     BIGINT NOT NULL,
    doc         JSONB NOT NULL,
    PRIMARY KEY (shipment_id, case_number)
)
"#;

#[derive(Debug, Clone)]
pub struct PostgresCaseStore {
    pool: PgPool,
    max_attempts: u32,
}

impl PostgresCaseStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            max_attempts: 8,
        }
    }

    /// Create the backing table if it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::backend(e.to_string()))?;
        Ok(())
    }

    async fn read_versioned(
        &self,
        key: &CaseKey,
    ) -> Result<Option<(i64, ProductionCase)>, StoreError> {
        let row = sqlx::query(
            "SELECT version, doc FROM production_cases WHERE shipment_id = $1 AND case_number = $2",
        )
        .bind(key.shipment_id.as_str())
        .bind(key.case_number.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::backend(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let version: i64 = row
            .try_get("version")
            .map_err(|e| StoreError::backend(e.to_string()))?;
        let doc: serde_json::Value = row
            .try_get("doc")
            .map_err(|e| StoreError::backend(e.to_string()))?;
        let case: ProductionCase = serde_json::from_value(doc)
            .map_err(|e| StoreError::backend(format!("malformed case document: {e}")))?;

        Ok(Some((version, case)))
    }
}

#[async_trait]
impl CaseStore for PostgresCaseStore {
    #[instrument(skip(self), fields(key = %key))]
    async fn get(&self, key: &CaseKey) -> Result<Option<ProductionCase>, StoreError> {
        Ok(self.read_versioned(key).await?.map(|(_, case)| case))
    }

    #[instrument(skip(self, case), fields(key = %case.key()))]
    async fn insert(&self, case: ProductionCase) -> Result<(), StoreError> {
        let key = case.key();
        let doc = serde_json::to_value(&case)
            .map_err(|e| StoreError::backend(format!("case serialization failed: {e}")))?;

        let result = sqlx::query(
            "INSERT INTO production_cases (shipment_id, case_number, version, doc) \
             VALUES ($1, $2, 1, $3) ON CONFLICT DO NOTHING",
        )
        .bind(key.shipment_id.as_str())
        .bind(key.case_number.as_str())
        .bind(&doc)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::backend(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::AlreadyExists(key));
        }
        Ok(())
    }

    #[instrument(skip(self, decide), fields(key = %key))]
    async fn run_transaction(
        &self,
        key: &CaseKey,
        mut decide: Decide,
    ) -> Result<ProductionCase, TransactionError> {
        for _attempt in 0..self.max_attempts {
            let read = self.read_versioned(key).await?;
            let read_version = read.as_ref().map(|(v, _)| *v);

            let updated = decide(read.map(|(_, case)| case))?;
            let doc = serde_json::to_value(&updated)
                .map_err(|e| StoreError::backend(format!("case serialization failed: {e}")))?;

            // A decision over an absent document can only come from a decide
            // callback that creates state; allocations always require an
            // existing row, so the conditional update below is the only path.
            let Some(read_version) = read_version else {
                return Err(StoreError::backend(format!(
                    "transaction on {key} decided over a missing document"
                ))
                .into());
            };

            let result = sqlx::query(
                "UPDATE production_cases SET doc = $1, version = version + 1 \
                 WHERE shipment_id = $2 AND case_number = $3 AND version = $4",
            )
            .bind(&doc)
            .bind(key.shipment_id.as_str())
            .bind(key.case_number.as_str())
            .bind(read_version)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::backend(e.to_string()))?;

            if result.rows_affected() == 0 {
                tracing::debug!(key = %key, "write conflict, retrying transaction");
                continue;
            }
            return Ok(updated);
        }

        Err(TransactionError::Contention {
            key: key.clone(),
            attempts: self.max_attempts,
        })
    }
}
