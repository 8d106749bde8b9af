//! Cost calculation for a requested advance.
//!
//! The cost of an advance is an interest charge, prorated from a compound
//! annual rate down to the elapsed part of the accrual window, plus a
//! dispersion fee made of a proportional part and a company-specific base.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::GlobalSettings;
use crate::error::{EngineError, EngineResult};
use crate::models::{AdvanceDraft, Company, TaxItem};

use super::{AccrualResult, EligibleEmployee, calculate_accrual};

/// Tax item name for the interest charge.
pub const INTEREST_ITEM: &str = "interest";

/// Tax item name for the dispersion fee.
pub const DISPERSION_ITEM: &str = "dispersion";

/// Days per year used to prorate the annual interest rate.
pub const INTEREST_YEAR_DAYS: f64 = 365.0;

/// Returns the proportional part of the dispersion fee (0.4%).
pub fn dispersion_rate() -> Decimal {
    Decimal::new(4, 3)
}

/// The full cost of a requested advance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostBreakdown {
    /// Amount the employee asked for.
    pub requested_amount: Decimal,
    /// Credit available when the cost was computed.
    pub available_amount: Decimal,
    /// Whole days in the accrual window.
    pub working_days: i64,
    /// Requested amount plus every tax item.
    pub total_amount: Decimal,
    /// Itemized costs: interest first, dispersion second.
    pub tax_items: Vec<TaxItem>,
    /// Start of the accrual window.
    pub start_date: DateTime<Utc>,
    /// End of the accrual window.
    pub end_date: DateTime<Utc>,
}

impl CostBreakdown {
    /// Converts the breakdown into a draft ready to be persisted.
    pub fn into_draft(
        self,
        employee_id: impl Into<String>,
        company_id: impl Into<String>,
        reason_id: Option<Uuid>,
    ) -> AdvanceDraft {
        AdvanceDraft {
            employee_id: employee_id.into(),
            company_id: company_id.into(),
            reason_id,
            requested_amount: self.requested_amount,
            total_amount: self.total_amount,
            start_date: self.start_date,
            end_date: self.end_date,
            tax_items: self.tax_items,
        }
    }
}

/// Computes the interest and dispersion fee for a requested amount.
///
/// # Arguments
///
/// * `requested_amount` - The amount the employee wants to withdraw
/// * `employee` - An employee that passed the eligibility checks
/// * `company` - The employee's company, supplying the dispersion base
/// * `settings` - Global settings supplying the interest rate and allowance
/// * `last_paid_at` - Creation date of the employee's most recent paid advance
/// * `now` - The calculation instant
///
/// # Returns
///
/// A [`CostBreakdown`], or [`EngineError::Validation`] tagged to
/// `requested_amount` when the amount is not positive or exceeds the
/// available credit.
///
/// # Formulas
///
/// * interest: `round(requested * ((1 + rate/100) ^ ((working_days - 1) / 365) - 1))`,
///   zero when no rate is configured
/// * dispersion: `round(requested * 0.004 + company.dispersion_base)`
pub fn calculate_cost(
    requested_amount: Decimal,
    employee: &EligibleEmployee<'_>,
    company: &Company,
    settings: &GlobalSettings,
    last_paid_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> EngineResult<CostBreakdown> {
    if requested_amount <= Decimal::ZERO {
        return Err(EngineError::requested_amount("must be greater than zero"));
    }

    let AccrualResult {
        available_amount,
        working_days,
        start_date,
        end_date,
    } = calculate_accrual(employee, settings, last_paid_at, now);

    if requested_amount > available_amount {
        return Err(EngineError::requested_amount(format!(
            "exceeds the available amount of {}",
            available_amount.normalize()
        )));
    }

    let interest = interest_item(requested_amount, settings, working_days, now)?;
    let dispersion = dispersion_item(requested_amount, company);

    let tax_items = vec![interest, dispersion];
    let total_amount = requested_amount + tax_items.iter().map(|item| item.value).sum::<Decimal>();

    Ok(CostBreakdown {
        requested_amount,
        available_amount,
        working_days,
        total_amount,
        tax_items,
        start_date,
        end_date,
    })
}

fn interest_item(
    requested_amount: Decimal,
    settings: &GlobalSettings,
    working_days: i64,
    now: DateTime<Utc>,
) -> EngineResult<TaxItem> {
    let Some(rate) = settings.annual_interest_rate else {
        return Ok(TaxItem {
            name: INTEREST_ITEM.to_string(),
            description: "No interest rate configured".to_string(),
            value: Decimal::ZERO,
        });
    };

    let value = prorated_interest(requested_amount, rate, working_days)?;
    Ok(TaxItem {
        name: INTEREST_ITEM.to_string(),
        description: format!(
            "Interest at {}% effective annual rate, computed on {} over {} days",
            rate.normalize(),
            now.format("%Y-%m-%d"),
            working_days
        ),
        value,
    })
}

/// Prorates a compound annual rate to `working_days - 1` days and applies it
/// to `amount`, rounded to whole units.
///
/// The power is evaluated in binary floating point to match historical
/// output.
pub fn prorated_interest(
    amount: Decimal,
    rate: Decimal,
    working_days: i64,
) -> EngineResult<Decimal> {
    let to_f64 = |value: Decimal, what: &str| {
        value.to_f64().ok_or_else(|| EngineError::CalculationError {
            message: format!("{what} {value} is not representable as f64"),
        })
    };
    let amount = to_f64(amount, "amount")?;
    let rate = to_f64(rate, "interest rate")?;

    let exponent = (working_days - 1) as f64 / INTEREST_YEAR_DAYS;
    let interest = (amount * ((1.0 + rate / 100.0).powf(exponent) - 1.0)).round();

    Decimal::from_f64(interest).ok_or_else(|| EngineError::CalculationError {
        message: format!("interest {interest} is not representable as a decimal"),
    })
}

fn dispersion_item(requested_amount: Decimal, company: &Company) -> TaxItem {
    let value = (requested_amount * dispersion_rate() + company.dispersion_base)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

    TaxItem {
        name: DISPERSION_ITEM.to_string(),
        description: format!(
            "Dispersion fee: 0.4% of the requested amount plus a base of {}",
            company.dispersion_base.normalize()
        ),
        value,
    }
}
