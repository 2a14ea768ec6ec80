//! Request DTOs (camelCase wire format).
//!
//! Entry fields default when absent so that missing values flow into entry
//! validation (`invalid_entry`) instead of a serde-level rejection.

use serde::Deserialize;

use wareops_ledger::{PackingEntry, SortingEntry};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub employee_no: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionEntriesRequest {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub sorting_entries: Vec<SortingEntryDto>,
    #[serde(default)]
    pub packing_entries: Vec<PackingEntryDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortingEntryDto {
    #[serde(default)]
    pub shipment_id: String,
    #[serde(default)]
    pub case_number: String,
    #[serde(default)]
    pub total_lines: i64,
    #[serde(default)]
    pub ekc_domestic: i64,
    #[serde(default)]
    pub ekm_bulk: i64,
}

impl From<SortingEntryDto> for SortingEntry {
    fn from(dto: SortingEntryDto) -> Self {
        Self {
            shipment_id: dto.shipment_id.into(),
            case_number: dto.case_number.into(),
            total_lines: dto.total_lines,
            ekc_domestic: dto.ekc_domestic,
            ekm_bulk: dto.ekm_bulk,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackingEntryDto {
    #[serde(default)]
    pub location_no: String,
    #[serde(default)]
    pub new_case_no: String,
    #[serde(default)]
    pub lines_packed: i64,
}

impl From<PackingEntryDto> for PackingEntry {
    fn from(dto: PackingEntryDto) -> Self {
        Self {
            location_no: dto.location_no,
            new_case_no: dto.new_case_no,
            lines_packed: dto.lines_packed,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseQuery {
    pub shipment_id: Option<String>,
    pub case_number: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryQuery {
    pub date: Option<String>,
    pub user_id: Option<String>,
}
