use std::sync::Arc;

use wareops_auth::{RoleRecord, SessionResolver, UserDirectory, UserRecord};
use wareops_core::{CaseKey, UserId, WorkDate};
use wareops_infra::{
    AuditLog, CaseStore, InMemoryAuditLog, InMemoryCaseStore, InMemoryDirectory,
    ProductionRecorder, RecordError, StoreError,
};
#[cfg(feature = "postgres")]
use wareops_infra::PostgresCaseStore;
use wareops_ledger::{CaseState, DailySummary, PackingEntry, ProductionCase, SortingEntry};

/// Service wiring behind the HTTP handlers.
///
/// The in-memory variant backs dev and the black-box tests. With the
/// `postgres` feature and `USE_PERSISTENT_STORES=true`, the capacity ledger
/// moves to Postgres; directory and audit stay in-memory (dev-grade) until a
/// persistent backend exists for them.
pub enum AppServices {
    InMemory {
        directory: Arc<InMemoryDirectory>,
        cases: Arc<InMemoryCaseStore>,
        audit: Arc<InMemoryAuditLog>,
        recorder: ProductionRecorder<Arc<InMemoryCaseStore>, Arc<InMemoryAuditLog>>,
        resolver: SessionResolver,
    },
    #[cfg(feature = "postgres")]
    Persistent {
        directory: Arc<InMemoryDirectory>,
        cases: Arc<PostgresCaseStore>,
        audit: Arc<InMemoryAuditLog>,
        recorder: ProductionRecorder<Arc<PostgresCaseStore>, Arc<InMemoryAuditLog>>,
        resolver: SessionResolver,
    },
}

/// Select the store wiring from the environment (teacher-style env switch).
pub async fn build_services() -> AppServices {
    let use_persistent = std::env::var("USE_PERSISTENT_STORES")
        .unwrap_or_else(|_| "false".to_string())
        .parse::<bool>()
        .unwrap_or(false);

    if use_persistent {
        #[cfg(feature = "postgres")]
        {
            return AppServices::persistent().await;
        }
        #[cfg(not(feature = "postgres"))]
        tracing::warn!(
            "USE_PERSISTENT_STORES=true but postgres feature not enabled, falling back to in-memory"
        );
    }

    AppServices::in_memory()
}

impl AppServices {
    pub fn in_memory() -> Self {
        let directory = Arc::new(InMemoryDirectory::new());
        let cases = Arc::new(InMemoryCaseStore::new());
        let audit = Arc::new(InMemoryAuditLog::new());
        let recorder = ProductionRecorder::new(cases.clone(), audit.clone());
        let resolver = SessionResolver::new(directory.clone());

        Self::InMemory {
            directory,
            cases,
            audit,
            recorder,
            resolver,
        }
    }

    #[cfg(feature = "postgres")]
    pub async fn persistent() -> Self {
        let database_url = std::env::var("DATABASE_URL")
            .expect("DATABASE_URL must be set when USE_PERSISTENT_STORES=true");
        let pool = sqlx::PgPool::connect(&database_url)
            .await
            .expect("failed to connect to Postgres");

        let cases = Arc::new(PostgresCaseStore::new(pool));
        cases
            .ensure_schema()
            .await
            .expect("failed to ensure case store schema");

        let directory = Arc::new(InMemoryDirectory::new());
        let audit = Arc::new(InMemoryAuditLog::new());
        let recorder = ProductionRecorder::new(cases.clone(), audit.clone());
        let resolver = SessionResolver::new(directory.clone());

        Self::Persistent {
            directory,
            cases,
            audit,
            recorder,
            resolver,
        }
    }

    pub fn resolver(&self) -> SessionResolver {
        match self {
            Self::InMemory { resolver, .. } => resolver.clone(),
            #[cfg(feature = "postgres")]
            Self::Persistent { resolver, .. } => resolver.clone(),
        }
    }

    pub fn directory(&self) -> Arc<dyn UserDirectory> {
        match self {
            Self::InMemory { directory, .. } => directory.clone(),
            #[cfg(feature = "postgres")]
            Self::Persistent { directory, .. } => directory.clone(),
        }
    }

    pub fn seed_user(&self, user: UserRecord) {
        match self {
            Self::InMemory { directory, .. } => directory.upsert_user(user),
            #[cfg(feature = "postgres")]
            Self::Persistent { directory, .. } => directory.upsert_user(user),
        }
    }

    pub fn seed_role(&self, role: RoleRecord) {
        match self {
            Self::InMemory { directory, .. } => directory.upsert_role(role),
            #[cfg(feature = "postgres")]
            Self::Persistent { directory, .. } => directory.upsert_role(role),
        }
    }

    pub async fn seed_case(&self, case: ProductionCase) -> Result<(), StoreError> {
        match self {
            Self::InMemory { cases, .. } => cases.insert(case).await,
            #[cfg(feature = "postgres")]
            Self::Persistent { cases, .. } => cases.insert(case).await,
        }
    }

    pub async fn record_production(
        &self,
        date: WorkDate,
        user_id: UserId,
        sorting: Vec<SortingEntry>,
        packing: Vec<PackingEntry>,
    ) -> Result<DailySummary, RecordError> {
        match self {
            Self::InMemory { recorder, .. } => recorder.record(date, user_id, sorting, packing).await,
            #[cfg(feature = "postgres")]
            Self::Persistent { recorder, .. } => {
                recorder.record(date, user_id, sorting, packing).await
            }
        }
    }

    pub async fn case_state(&self, key: &CaseKey) -> Result<Option<CaseState>, StoreError> {
        let case = match self {
            Self::InMemory { cases, .. } => cases.get(key).await?,
            #[cfg(feature = "postgres")]
            Self::Persistent { cases, .. } => cases.get(key).await?,
        };
        Ok(case.map(|c| c.state()))
    }

    pub async fn daily_summary(
        &self,
        date: WorkDate,
        user_id: &UserId,
    ) -> Result<Option<DailySummary>, StoreError> {
        match self {
            Self::InMemory { audit, .. } => audit.daily_summary(date, user_id).await,
            #[cfg(feature = "postgres")]
            Self::Persistent { audit, .. } => audit.daily_summary(date, user_id).await,
        }
    }
}
