//! Employee model and related types.
//!
//! Employees are owned by the catalog; the engine only reads them.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Whether an employee account may use the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmployeeStatus {
    /// The account is enabled.
    Active,
    /// The account is disabled.
    Inactive,
}

/// Bank payout details registered for an employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankAccount {
    /// Name of the bank.
    pub bank_name: String,
    /// Account type (e.g. "savings", "checking").
    pub account_type: String,
    /// Account number.
    pub account_number: String,
    /// Name of the account holder.
    pub holder_name: String,
}

/// An employee who may request salary advances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: String,
    /// The company the employee belongs to.
    pub company_id: String,
    /// Full name, used in notifications.
    pub name: String,
    /// Email address notifications are sent to.
    pub email: String,
    /// Account status.
    pub status: EmployeeStatus,
    /// Monthly salary, if registered.
    #[serde(default)]
    pub salary: Option<Decimal>,
    /// Hire date, if registered.
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    /// Bank payout details, if registered.
    #[serde(default)]
    pub bank_account: Option<BankAccount>,
}

impl Employee {
    /// Returns true if the employee account is active.
    pub fn is_active(&self) -> bool {
        self.status == EmployeeStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_deserialize_employee_with_optional_fields_missing() {
        let json = r#"{
            "id": "emp_001",
            "company_id": "acme",
            "name": "Ana Torres",
            "email": "ana@example.com",
            "status": "ACTIVE"
        }"#;

        let employee: Employee = serde_json::from_str(json).unwrap();
        assert_eq!(employee.id, "emp_001");
        assert!(employee.is_active());
        assert!(employee.salary.is_none());
        assert!(employee.started_at.is_none());
        assert!(employee.bank_account.is_none());
    }

    #[test]
    fn test_deserialize_complete_employee() {
        let json = r#"{
            "id": "emp_002",
            "company_id": "acme",
            "name": "Luis Pardo",
            "email": "luis@example.com",
            "status": "INACTIVE",
            "salary": "2500000",
            "started_at": "2024-02-01T00:00:00Z",
            "bank_account": {
                "bank_name": "Banco Uno",
                "account_type": "savings",
                "account_number": "001-22",
                "holder_name": "Luis Pardo"
            }
        }"#;

        let employee: Employee = serde_json::from_str(json).unwrap();
        assert!(!employee.is_active());
        assert_eq!(employee.salary, Some(Decimal::new(2_500_000, 0)));
        assert_eq!(
            employee.started_at,
            Some(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(employee.bank_account.unwrap().account_number, "001-22");
    }

    #[test]
    fn test_employee_status_serialization() {
        assert_eq!(
            serde_json::to_string(&EmployeeStatus::Active).unwrap(),
            "\"ACTIVE\""
        );
        assert_eq!(
            serde_json::to_string(&EmployeeStatus::Inactive).unwrap(),
            "\"INACTIVE\""
        );
    }
}
