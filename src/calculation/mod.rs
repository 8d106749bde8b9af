//! Calculation logic for the advance engine.
//!
//! This module contains the pure calculations run before a request exists:
//! eligibility checks, salary accrual over the semiannual window, and the
//! interest and dispersion cost of a requested amount. Every function takes
//! its settings and the current instant explicitly.

mod accrual;
mod cost;
mod eligibility;

pub use accrual::{
    AccrualResult, COMMERCIAL_YEAR_DAYS, active_anchor, calculate_accrual, whole_days_between,
};
pub use cost::{
    CostBreakdown, DISPERSION_ITEM, INTEREST_ITEM, INTEREST_YEAR_DAYS, calculate_cost,
    dispersion_rate, prorated_interest,
};
pub use eligibility::{EligibleEmployee, check_eligibility};
