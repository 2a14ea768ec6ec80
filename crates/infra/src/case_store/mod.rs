//! Case store: one capacity document per `(shipment, case)` pair.

mod in_memory;
#[cfg(feature = "postgres")]
mod postgres;
mod r#trait;

pub use in_memory::InMemoryCaseStore;
#[cfg(feature = "postgres")]
pub use postgres::PostgresCaseStore;
pub use r#trait::{CaseStore, Decide, StoreError, TransactionError};
