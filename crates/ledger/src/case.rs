use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use wareops_core::{CaseKey, CaseNumber, ShipmentId, UserId};

/// Allocation failure taxonomy.
///
/// `ExceedsRemaining` carries the actual remaining capacity so callers can
/// surface it to the operator who typed the entry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AllocationError {
    #[error("case not found: {0}")]
    CaseNotFound(CaseKey),

    #[error("requested lines exceed remaining capacity ({remaining} left)")]
    ExceedsRemaining { remaining: i64 },

    #[error("invalid entry: {0}")]
    InvalidEntry(String),
}

/// A production case: a shipment sub-unit with a fixed line-count capacity
/// that gets consumed by sorting allocations.
///
/// # Invariants
/// - `0 <= consumed_lines <= total_lines` after any successful allocation.
/// - `remaining_lines` and `fully_sorted` are derived on read, never stored.
/// - Mutated only through [`ProductionCase::allocate`]; never deleted here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionCase {
    shipment_id: ShipmentId,
    case_number: CaseNumber,
    total_lines: i64,
    consumed_lines: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_allocated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_allocated_by: Option<UserId>,
}

impl ProductionCase {
    /// A fresh, unconsumed case. Creation happens once per shipment/case pair
    /// by the shipment import, which is outside this subsystem.
    pub fn new(
        shipment_id: impl Into<ShipmentId>,
        case_number: impl Into<CaseNumber>,
        total_lines: i64,
    ) -> Self {
        Self {
            shipment_id: shipment_id.into(),
            case_number: case_number.into(),
            total_lines,
            consumed_lines: 0,
            last_allocated_at: None,
            last_allocated_by: None,
        }
    }

    pub fn key(&self) -> CaseKey {
        CaseKey::new(self.shipment_id.clone(), self.case_number.clone())
    }

    pub fn total_lines(&self) -> i64 {
        self.total_lines
    }

    pub fn consumed_lines(&self) -> i64 {
        self.consumed_lines
    }

    /// Remaining capacity, clamped at zero so an over-stamped document can
    /// never report negative capacity.
    pub fn remaining_lines(&self) -> i64 {
        (self.total_lines - self.consumed_lines).max(0)
    }

    pub fn fully_sorted(&self) -> bool {
        self.consumed_lines >= self.total_lines
    }

    /// Consume `requested_lines` of remaining capacity.
    ///
    /// The check-then-act here is only safe inside the store's per-case
    /// transaction; callers must not invoke it on a stale read.
    pub fn allocate(
        &mut self,
        requested_lines: i64,
        by: UserId,
        at: DateTime<Utc>,
    ) -> Result<(), AllocationError> {
        if requested_lines <= 0 {
            return Err(AllocationError::InvalidEntry(
                "requested lines must be positive".to_string(),
            ));
        }

        let remaining = self.remaining_lines();
        if requested_lines > remaining {
            return Err(AllocationError::ExceedsRemaining { remaining });
        }

        self.consumed_lines += requested_lines;
        self.last_allocated_at = Some(at);
        self.last_allocated_by = Some(by);
        Ok(())
    }

    /// Read snapshot with the derived fields recomputed.
    pub fn state(&self) -> CaseState {
        CaseState {
            shipment_id: self.shipment_id.clone(),
            case_number: self.case_number.clone(),
            total_lines: self.total_lines,
            consumed_lines: self.consumed_lines,
            remaining_lines: self.remaining_lines(),
            fully_sorted: self.fully_sorted(),
            last_allocated_at: self.last_allocated_at,
            last_allocated_by: self.last_allocated_by.clone(),
        }
    }
}

/// Point-in-time view of a case, including the derived fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseState {
    pub shipment_id: ShipmentId,
    pub case_number: CaseNumber,
    pub total_lines: i64,
    pub consumed_lines: i64,
    pub remaining_lines: i64,
    pub fully_sorted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_allocated_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_allocated_by: Option<UserId>,
}
