//! Salary accrual calculation.
//!
//! Credit accrues per calendar day over a fixed semiannual window that
//! re-anchors on January 1st and July 1st, starting no earlier than the hire
//! date or the creation of the employee's last paid advance.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::config::GlobalSettings;

use super::EligibleEmployee;

/// Number of days in the commercial year used to derive a daily salary.
pub const COMMERCIAL_YEAR_DAYS: i64 = 360;

/// The amount of credit accrued in the current window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccrualResult {
    /// Credit available to request, rounded to cents.
    pub available_amount: Decimal,
    /// Whole days between `start_date` and `end_date`.
    pub working_days: i64,
    /// Start of the accrual window.
    pub start_date: DateTime<Utc>,
    /// End of the accrual window (the calculation instant).
    pub end_date: DateTime<Utc>,
}

/// Returns the semiannual anchor active at `now`: January 1st before July,
/// July 1st from July onwards, both at midnight UTC.
pub fn active_anchor(now: DateTime<Utc>) -> DateTime<Utc> {
    let january = first_of_month(now.year(), 1);
    let july = first_of_month(now.year(), 7);
    if now < july { january } else { july }
}

fn first_of_month(year: i32, month: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .expect("first day of January and July always exists")
        .and_time(NaiveTime::MIN)
        .and_utc()
}

/// Whole days from `start` to `end`, truncated. Never negative.
pub fn whole_days_between(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    (end - start).num_days().max(0)
}

/// Computes the credit an employee has accrued in the current window.
///
/// # Arguments
///
/// * `employee` - An employee that passed the eligibility checks
/// * `settings` - Global settings supplying the flat allowance
/// * `last_paid_at` - Creation date of the employee's most recent paid advance, if any
/// * `now` - The calculation instant
///
/// # Algorithm
///
/// The window starts at the later of the active anchor and the init date,
/// where the init date is `last_paid_at` when it is later than the hire date
/// and the hire date otherwise. The daily credit is
/// `(salary + allowance) / 360` and the available amount is the daily credit
/// times the whole days elapsed, rounded to two decimals.
///
/// The result depends only on its inputs.
pub fn calculate_accrual(
    employee: &EligibleEmployee<'_>,
    settings: &GlobalSettings,
    last_paid_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> AccrualResult {
    let init_date = match last_paid_at {
        Some(paid) if paid > employee.started_at => paid,
        _ => employee.started_at,
    };
    let start_date = init_date.max(active_anchor(now));
    let end_date = now;
    let working_days = whole_days_between(start_date, end_date);

    let base_salary = employee.salary + settings.allowance.unwrap_or_default();
    let daily = base_salary / Decimal::from(COMMERCIAL_YEAR_DAYS);
    let available_amount = (daily * Decimal::from(working_days))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

    AccrualResult {
        available_amount,
        working_days,
        start_date,
        end_date,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::check_eligibility;
    use crate::models::{BankAccount, Company, CompanyStatus, Employee, EmployeeStatus};
    use chrono::TimeZone;
    use proptest::prelude::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn employee(salary: &str, started_at: DateTime<Utc>) -> Employee {
        Employee {
            id: "emp_001".to_string(),
            company_id: "acme".to_string(),
            name: "Ana Torres".to_string(),
            email: "ana@example.com".to_string(),
            status: EmployeeStatus::Active,
            salary: Some(dec(salary)),
            started_at: Some(started_at),
            bank_account: Some(BankAccount {
                bank_name: "Banco Uno".to_string(),
                account_type: "savings".to_string(),
                account_number: "001-22".to_string(),
                holder_name: "Ana Torres".to_string(),
            }),
        }
    }

    fn company() -> Company {
        Company {
            id: "acme".to_string(),
            name: "Acme".to_string(),
            status: CompanyStatus::Active,
            dispersion_base: Decimal::ZERO,
            max_request_day: None,
        }
    }

    fn settings(allowance: Option<&str>) -> GlobalSettings {
        GlobalSettings {
            annual_interest_rate: None,
            allowance: allowance.map(dec),
        }
    }

    #[test]
    fn test_anchor_is_january_before_july() {
        assert_eq!(active_anchor(at(2026, 6, 30)), at(2026, 1, 1));
        assert_eq!(
            active_anchor(Utc.with_ymd_and_hms(2026, 6, 30, 23, 59, 59).unwrap()),
            at(2026, 1, 1)
        );
    }

    #[test]
    fn test_anchor_is_july_from_july_first() {
        assert_eq!(active_anchor(at(2026, 7, 1)), at(2026, 7, 1));
        assert_eq!(active_anchor(at(2026, 12, 31)), at(2026, 7, 1));
    }

    #[test]
    fn test_thirty_days_with_allowance() {
        let emp = employee("200000", at(2020, 1, 1));
        let company = company();
        let eligible = check_eligibility(&emp, &company).unwrap();

        let result = calculate_accrual(&eligible, &settings(Some("1000")), None, at(2026, 7, 31));

        assert_eq!(result.start_date, at(2026, 7, 1));
        assert_eq!(result.end_date, at(2026, 7, 31));
        assert_eq!(result.working_days, 30);
        // 201000 / 360 * 30
        assert_eq!(result.available_amount, dec("16750.00"));
    }

    #[test]
    fn test_missing_allowance_counts_as_zero() {
        let emp = employee("360000", at(2020, 1, 1));
        let company = company();
        let eligible = check_eligibility(&emp, &company).unwrap();

        let result = calculate_accrual(&eligible, &settings(None), None, at(2026, 1, 11));

        assert_eq!(result.working_days, 10);
        assert_eq!(result.available_amount, dec("10000.00"));
    }

    #[test]
    fn test_hire_date_after_anchor_starts_window() {
        let hired = Utc.with_ymd_and_hms(2026, 8, 10, 9, 30, 0).unwrap();
        let emp = employee("300000", hired);
        let company = company();
        let eligible = check_eligibility(&emp, &company).unwrap();

        let result = calculate_accrual(&eligible, &settings(None), None, at(2026, 9, 1));

        assert_eq!(result.start_date, hired);
        // 21 days 14.5 hours truncates to 21
        assert_eq!(result.working_days, 21);
    }

    #[test]
    fn test_last_paid_advance_after_hire_moves_start() {
        let emp = employee("300000", at(2020, 1, 1));
        let company = company();
        let eligible = check_eligibility(&emp, &company).unwrap();
        let paid = at(2026, 8, 20);

        let result = calculate_accrual(&eligible, &settings(None), Some(paid), at(2026, 9, 1));

        assert_eq!(result.start_date, paid);
        assert_eq!(result.working_days, 12);
    }

    #[test]
    fn test_last_paid_advance_before_anchor_is_ignored() {
        let emp = employee("300000", at(2020, 1, 1));
        let company = company();
        let eligible = check_eligibility(&emp, &company).unwrap();

        let result = calculate_accrual(
            &eligible,
            &settings(None),
            Some(at(2026, 3, 5)),
            at(2026, 9, 1),
        );

        assert_eq!(result.start_date, at(2026, 7, 1));
    }

    #[test]
    fn test_last_paid_before_hire_date_uses_hire_date() {
        let hired = at(2026, 8, 1);
        let emp = employee("300000", hired);
        let company = company();
        let eligible = check_eligibility(&emp, &company).unwrap();

        let result = calculate_accrual(
            &eligible,
            &settings(None),
            Some(at(2026, 7, 15)),
            at(2026, 9, 1),
        );

        assert_eq!(result.start_date, hired);
    }

    #[test]
    fn test_zero_working_days_yields_zero() {
        let emp = employee("300000", at(2020, 1, 1));
        let company = company();
        let eligible = check_eligibility(&emp, &company).unwrap();

        let now = Utc.with_ymd_and_hms(2026, 7, 1, 18, 0, 0).unwrap();
        let result = calculate_accrual(&eligible, &settings(Some("1000")), None, now);

        assert_eq!(result.working_days, 0);
        assert_eq!(result.available_amount, Decimal::ZERO);
    }

    #[test]
    fn test_hire_date_in_future_clamps_to_zero_days() {
        let emp = employee("300000", at(2026, 10, 1));
        let company = company();
        let eligible = check_eligibility(&emp, &company).unwrap();

        let result = calculate_accrual(&eligible, &settings(None), None, at(2026, 9, 1));

        assert_eq!(result.working_days, 0);
        assert_eq!(result.available_amount, Decimal::ZERO);
    }

    #[test]
    fn test_available_amount_rounds_to_cents() {
        let emp = employee("1000", at(2020, 1, 1));
        let company = company();
        let eligible = check_eligibility(&emp, &company).unwrap();

        let result = calculate_accrual(&eligible, &settings(None), None, at(2026, 1, 2));

        // 1000 / 360 = 2.7777...
        assert_eq!(result.working_days, 1);
        assert_eq!(result.available_amount, dec("2.78"));
    }

    proptest! {
        #[test]
        fn prop_accrual_is_pure(
            salary in 1_000i64..50_000_000,
            allowance in 0i64..500_000,
            day_offset in 0i64..365,
            paid_offset in proptest::option::of(0i64..365),
        ) {
            let base = at(2026, 1, 1);
            let now = base + chrono::Duration::days(day_offset);
            let emp = employee(&salary.to_string(), at(2021, 5, 3));
            let company = company();
            let eligible = check_eligibility(&emp, &company).unwrap();
            let global = settings(Some(allowance.to_string().as_str()));
            let last_paid = paid_offset.map(|d| base + chrono::Duration::days(d));

            let first = calculate_accrual(&eligible, &global, last_paid, now);
            let second = calculate_accrual(&eligible, &global, last_paid, now);

            prop_assert_eq!(&first, &second);
            prop_assert!(first.working_days >= 0);
            prop_assert!(first.available_amount >= Decimal::ZERO);
            prop_assert!(first.start_date >= active_anchor(now));
        }
    }
}
