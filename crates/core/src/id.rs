//! Strongly-typed identifiers used across the domain.
//!
//! The upstream document store is keyed by caller-supplied strings (user ids,
//! shipment ids, case numbers), so these newtypes wrap `String` rather than
//! generated UUIDs. Parsing rejects empty values; everything else is opaque.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifier of a user (actor identity; also the session lookup key).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

/// Employee number used on the login path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeNo(String);

/// Identifier of a shipment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShipmentId(String);

/// Case number within a shipment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CaseNumber(String);

/// Branch/site a user belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Branch(String);

macro_rules! impl_string_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $t {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $t {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                if s.trim().is_empty() {
                    return Err(DomainError::invalid_id(concat!($name, " cannot be empty")));
                }
                Ok(Self(s.to_string()))
            }
        }
    };
}

impl_string_newtype!(UserId, "UserId");
impl_string_newtype!(EmployeeNo, "EmployeeNo");
impl_string_newtype!(ShipmentId, "ShipmentId");
impl_string_newtype!(CaseNumber, "CaseNumber");
impl_string_newtype!(Branch, "Branch");

/// Composite key of a production case: one capacity counter per
/// `(shipment, case)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CaseKey {
    pub shipment_id: ShipmentId,
    pub case_number: CaseNumber,
}

impl CaseKey {
    pub fn new(shipment_id: impl Into<ShipmentId>, case_number: impl Into<CaseNumber>) -> Self {
        Self {
            shipment_id: shipment_id.into(),
            case_number: case_number.into(),
        }
    }
}

impl core::fmt::Display for CaseKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}/{}", self.shipment_id, self.case_number)
    }
}

/// Calendar date a productivity entry is booked against.
///
/// Serialized as `YYYY-MM-DD` (the wire format of the `date` field).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkDate(chrono::NaiveDate);

impl WorkDate {
    pub fn new(date: chrono::NaiveDate) -> Self {
        Self(date)
    }

    pub fn as_date(&self) -> chrono::NaiveDate {
        self.0
    }
}

impl core::fmt::Display for WorkDate {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for WorkDate {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let date = chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|e| DomainError::invalid_id(format!("WorkDate: {e}")))?;
        Ok(Self(date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_ids_are_rejected() {
        assert!("".parse::<UserId>().is_err());
        assert!("  ".parse::<ShipmentId>().is_err());
        assert!("u1".parse::<UserId>().is_ok());
    }

    #[test]
    fn work_date_round_trips_wire_format() {
        let d: WorkDate = "2025-11-03".parse().unwrap();
        assert_eq!(d.to_string(), "2025-11-03");
        assert!("03/11/2025".parse::<WorkDate>().is_err());
    }
}
