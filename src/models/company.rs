//! Company model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Whether a company is enrolled and operating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompanyStatus {
    /// The company is enrolled.
    Active,
    /// The company is suspended or unenrolled.
    Inactive,
}

/// A company whose employees may request advances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    /// Unique identifier for the company.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Enrollment status.
    pub status: CompanyStatus,
    /// Flat base added to every dispersion fee charged to this company's employees.
    #[serde(default)]
    pub dispersion_base: Decimal,
    /// Last day of the month on which requests are accepted. Carried for the
    /// catalog; the engine does not enforce it.
    #[serde(default)]
    pub max_request_day: Option<u32>,
}

impl Company {
    /// Returns true if the company is active.
    pub fn is_active(&self) -> bool {
        self.status == CompanyStatus::Active
    }
}
