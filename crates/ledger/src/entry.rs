use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use wareops_core::{CaseKey, CaseNumber, ShipmentId, UserId, WorkDate};

use crate::case::AllocationError;

/// Productivity entry kind.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Sorting,
    Packing,
}

/// One sorting entry: consumes `total_lines` from the named case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortingEntry {
    pub shipment_id: ShipmentId,
    pub case_number: CaseNumber,
    pub total_lines: i64,
    pub ekc_domestic: i64,
    pub ekm_bulk: i64,
}

impl SortingEntry {
    pub fn case_key(&self) -> CaseKey {
        CaseKey::new(self.shipment_id.clone(), self.case_number.clone())
    }

    pub fn validate(&self) -> Result<(), AllocationError> {
        if self.shipment_id.is_empty() {
            return Err(AllocationError::InvalidEntry(
                "sorting entry is missing shipmentId".to_string(),
            ));
        }
        if self.case_number.is_empty() {
            return Err(AllocationError::InvalidEntry(
                "sorting entry is missing caseNumber".to_string(),
            ));
        }
        if self.total_lines <= 0 {
            return Err(AllocationError::InvalidEntry(format!(
                "sorting entry for {} has non-positive totalLines",
                self.case_key()
            )));
        }
        if self.ekc_domestic < 0 || self.ekm_bulk < 0 {
            return Err(AllocationError::InvalidEntry(format!(
                "sorting entry for {} has negative line counters",
                self.case_key()
            )));
        }
        Ok(())
    }
}

/// One packing entry. Packing is audit-only: it never touches case capacity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackingEntry {
    pub location_no: String,
    pub new_case_no: String,
    pub lines_packed: i64,
}

impl PackingEntry {
    pub fn validate(&self) -> Result<(), AllocationError> {
        if self.location_no.trim().is_empty() {
            return Err(AllocationError::InvalidEntry(
                "packing entry is missing locationNo".to_string(),
            ));
        }
        if self.new_case_no.trim().is_empty() {
            return Err(AllocationError::InvalidEntry(
                "packing entry is missing newCaseNo".to_string(),
            ));
        }
        if self.lines_packed <= 0 {
            return Err(AllocationError::InvalidEntry(format!(
                "packing entry for {} has non-positive linesPacked",
                self.location_no
            )));
        }
        Ok(())
    }
}

/// Validate a whole submission before any transaction is attempted.
///
/// The first invalid entry fails the batch; nothing is written.
pub fn validate_entries(
    sorting: &[SortingEntry],
    packing: &[PackingEntry],
) -> Result<(), AllocationError> {
    for entry in sorting {
        entry.validate()?;
    }
    for entry in packing {
        entry.validate()?;
    }
    Ok(())
}

/// Append-only audit record, one per accepted entry. Never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationEntry {
    pub id: Uuid,
    pub kind: EntryKind,
    pub user_id: UserId,
    pub date: WorkDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipment_id: Option<ShipmentId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_number: Option<CaseNumber>,
    /// `totalLines` for sorting entries, `linesPacked` for packing entries.
    pub lines: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ekc_domestic: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ekm_bulk: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_no: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_case_no: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl AllocationEntry {
    pub fn sorting(
        user_id: UserId,
        date: WorkDate,
        entry: &SortingEntry,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            kind: EntryKind::Sorting,
            user_id,
            date,
            shipment_id: Some(entry.shipment_id.clone()),
            case_number: Some(entry.case_number.clone()),
            lines: entry.total_lines,
            ekc_domestic: Some(entry.ekc_domestic),
            ekm_bulk: Some(entry.ekm_bulk),
            location_no: None,
            new_case_no: None,
            created_at,
        }
    }

    pub fn packing(
        user_id: UserId,
        date: WorkDate,
        entry: &PackingEntry,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            kind: EntryKind::Packing,
            user_id,
            date,
            shipment_id: None,
            case_number: None,
            lines: entry.lines_packed,
            ekc_domestic: None,
            ekm_bulk: None,
            location_no: Some(entry.location_no.clone()),
            new_case_no: Some(entry.new_case_no.clone()),
            created_at,
        }
    }
}

/// Per-user, per-day productivity totals. Merged additively into the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    pub date: WorkDate,
    pub user_id: UserId,
    pub sorting_cases: i64,
    pub sorting_lines: i64,
    pub packing_cases: i64,
    pub packing_lines: i64,
}

impl DailySummary {
    pub fn empty(date: WorkDate, user_id: UserId) -> Self {
        Self {
            date,
            user_id,
            sorting_cases: 0,
            sorting_lines: 0,
            packing_cases: 0,
            packing_lines: 0,
        }
    }

    /// Totals for one submission.
    pub fn tally(
        date: WorkDate,
        user_id: UserId,
        sorting: &[SortingEntry],
        packing: &[PackingEntry],
    ) -> Self {
        Self {
            date,
            user_id,
            sorting_cases: sorting.len() as i64,
            sorting_lines: sorting.iter().map(|e| e.total_lines).sum(),
            packing_cases: packing.len() as i64,
            packing_lines: packing.iter().map(|e| e.lines_packed).sum(),
        }
    }

    /// Additive merge, matching the store's merge-write semantics.
    pub fn merge_from(&mut self, other: &DailySummary) {
        self.sorting_cases += other.sorting_cases;
        self.sorting_lines += other.sorting_lines;
        self.packing_cases += other.packing_cases;
        self.packing_lines += other.packing_lines;
    }
}
