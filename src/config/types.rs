//! Configuration types for the advance engine.
//!
//! These structures are deserialized from the YAML files in a configuration
//! directory.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Company, Employee};

/// Platform-wide financial settings.
///
/// Externally administered; the engine only reads it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalSettings {
    /// Effective annual interest rate in percent (e.g. `24.5`). No interest is
    /// charged when unset.
    #[serde(default)]
    pub annual_interest_rate: Option<Decimal>,
    /// Flat allowance added to every salary before accrual. Treated as zero when unset.
    #[serde(default)]
    pub allowance: Option<Decimal>,
}

/// Where and how status notifications are delivered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSettings {
    /// Inbox that receives admin-facing notifications.
    pub admin_inbox: String,
    /// Base URL deep links are built from (no trailing slash).
    pub app_base_url: String,
}

/// Which status transitions the state machine accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionPolicy {
    /// Only same-state and post-PAID transitions are rejected.
    #[default]
    Permissive,
    /// Only REQUESTED to APPROVED, DENIED or CANCELLED, and APPROVED to PAID.
    Strict,
}

/// The contents of `settings.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Financial settings.
    #[serde(default)]
    pub global: GlobalSettings,
    /// Notification routing settings.
    pub notifications: NotificationSettings,
    /// Status guard policy.
    #[serde(default)]
    pub transition_policy: TransitionPolicy,
}

/// The contents of `directory.yaml`: catalog records used to seed an
/// in-memory directory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectorySeed {
    /// Companies in the catalog.
    #[serde(default)]
    pub companies: Vec<Company>,
    /// Employees in the catalog.
    #[serde(default)]
    pub employees: Vec<Employee>,
}
