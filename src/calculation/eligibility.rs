//! Eligibility checks run before any advance calculation.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult, Ineligibility};
use crate::models::{BankAccount, Company, Employee};

/// An employee that passed every eligibility check.
///
/// Holds the fields the checks proved present, so downstream calculations do
/// not need to re-check optional values.
#[derive(Debug, Clone, Copy)]
pub struct EligibleEmployee<'a> {
    /// The underlying employee record.
    pub employee: &'a Employee,
    /// The registered salary.
    pub salary: Decimal,
    /// The registered hire date.
    pub started_at: DateTime<Utc>,
    /// The registered bank account.
    pub bank_account: &'a BankAccount,
}

/// Validates employee and company preconditions.
///
/// Checks are evaluated in order and the first failure wins:
/// account active, company active, salary set, hire date set, bank account set.
/// Pure function of the current records.
///
/// # Examples
///
/// ```
/// use advance_engine::calculation::check_eligibility;
/// use advance_engine::error::{EngineError, Ineligibility};
/// use advance_engine::models::{Company, CompanyStatus, Employee, EmployeeStatus};
/// use rust_decimal::Decimal;
///
/// let employee = Employee {
///     id: "emp_001".to_string(),
///     company_id: "acme".to_string(),
///     name: "Ana Torres".to_string(),
///     email: "ana@example.com".to_string(),
///     status: EmployeeStatus::Active,
///     salary: None,
///     started_at: None,
///     bank_account: None,
/// };
/// let company = Company {
///     id: "acme".to_string(),
///     name: "Acme".to_string(),
///     status: CompanyStatus::Active,
///     dispersion_base: Decimal::ZERO,
///     max_request_day: None,
/// };
///
/// let result = check_eligibility(&employee, &company);
/// assert!(matches!(
///     result,
///     Err(EngineError::Ineligible(Ineligibility::SalaryNotRegistered))
/// ));
/// ```
pub fn check_eligibility<'a>(
    employee: &'a Employee,
    company: &Company,
) -> EngineResult<EligibleEmployee<'a>> {
    if !employee.is_active() {
        return Err(EngineError::Ineligible(Ineligibility::AccountInactive));
    }
    if !company.is_active() {
        return Err(EngineError::Ineligible(Ineligibility::CompanyInactive));
    }
    let Some(salary) = employee.salary else {
        return Err(EngineError::Ineligible(Ineligibility::SalaryNotRegistered));
    };
    let Some(started_at) = employee.started_at else {
        return Err(EngineError::Ineligible(Ineligibility::HireDateNotRegistered));
    };
    let Some(bank_account) = employee.bank_account.as_ref() else {
        return Err(EngineError::Ineligible(Ineligibility::BankAccountNotRegistered));
    };

    Ok(EligibleEmployee {
        employee,
        salary,
        started_at,
        bank_account,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CompanyStatus, EmployeeStatus};
    use chrono::TimeZone;

    fn eligible_employee() -> Employee {
        Employee {
            id: "emp_001".to_string(),
            company_id: "acme".to_string(),
            name: "Ana Torres".to_string(),
            email: "ana@example.com".to_string(),
            status: EmployeeStatus::Active,
            salary: Some(Decimal::new(2_000_000, 0)),
            started_at: Some(Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap()),
            bank_account: Some(BankAccount {
                bank_name: "Banco Uno".to_string(),
                account_type: "savings".to_string(),
                account_number: "001-22".to_string(),
                holder_name: "Ana Torres".to_string(),
            }),
        }
    }

    fn active_company() -> Company {
        Company {
            id: "acme".to_string(),
            name: "Acme".to_string(),
            status: CompanyStatus::Active,
            dispersion_base: Decimal::ZERO,
            max_request_day: None,
        }
    }

    fn reason(result: EngineResult<EligibleEmployee<'_>>) -> Ineligibility {
        match result {
            Err(EngineError::Ineligible(reason)) => reason,
            other => panic!("expected ineligible, got {other:?}"),
        }
    }

    #[test]
    fn test_complete_active_employee_is_eligible() {
        let employee = eligible_employee();
        let eligible = check_eligibility(&employee, &active_company()).unwrap();

        assert_eq!(eligible.salary, Decimal::new(2_000_000, 0));
        assert_eq!(eligible.bank_account.account_number, "001-22");
    }

    #[test]
    fn test_inactive_account_fails_first() {
        let mut employee = eligible_employee();
        employee.status = EmployeeStatus::Inactive;
        employee.salary = None;
        let mut company = active_company();
        company.status = CompanyStatus::Inactive;

        assert_eq!(
            reason(check_eligibility(&employee, &company)),
            Ineligibility::AccountInactive
        );
    }

    #[test]
    fn test_inactive_company_checked_before_missing_data() {
        let mut employee = eligible_employee();
        employee.bank_account = None;
        let mut company = active_company();
        company.status = CompanyStatus::Inactive;

        assert_eq!(
            reason(check_eligibility(&employee, &company)),
            Ineligibility::CompanyInactive
        );
    }

    #[test]
    fn test_missing_salary() {
        let mut employee = eligible_employee();
        employee.salary = None;
        employee.started_at = None;

        assert_eq!(
            reason(check_eligibility(&employee, &active_company())),
            Ineligibility::SalaryNotRegistered
        );
    }

    #[test]
    fn test_missing_hire_date() {
        let mut employee = eligible_employee();
        employee.started_at = None;
        employee.bank_account = None;

        assert_eq!(
            reason(check_eligibility(&employee, &active_company())),
            Ineligibility::HireDateNotRegistered
        );
    }

    #[test]
    fn test_missing_bank_account() {
        let mut employee = eligible_employee();
        employee.bank_account = None;

        assert_eq!(
            reason(check_eligibility(&employee, &active_company())),
            Ineligibility::BankAccountNotRegistered
        );
    }
}
