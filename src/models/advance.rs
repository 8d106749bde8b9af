//! Advance request models.
//!
//! An [`AdvanceRequest`] owns its [`TaxItem`]s and [`HistoryEntry`]s by
//! composition: they are created with the request and travel with it.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{BankAccount, Company, Employee};

/// Lifecycle status of an advance request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdvanceStatus {
    /// Submitted by the employee, awaiting review.
    Requested,
    /// Approved by an administrator.
    Approved,
    /// Rejected by an administrator.
    Denied,
    /// Withdrawn before payment.
    Cancelled,
    /// Paid out. Terminal and immutable.
    Paid,
}

impl AdvanceStatus {
    /// Returns the upper-case wire name of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            AdvanceStatus::Requested => "REQUESTED",
            AdvanceStatus::Approved => "APPROVED",
            AdvanceStatus::Denied => "DENIED",
            AdvanceStatus::Cancelled => "CANCELLED",
            AdvanceStatus::Paid => "PAID",
        }
    }
}

impl fmt::Display for AdvanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The kind of party that caused a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActorKind {
    /// The employee who owns the request.
    Employee,
    /// A platform administrator.
    Admin,
}

/// The identity performing an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Employee or admin.
    pub kind: ActorKind,
    /// Identifier of the employee or admin user.
    pub id: String,
}

impl Actor {
    /// An employee actor.
    pub fn employee(id: impl Into<String>) -> Self {
        Self {
            kind: ActorKind::Employee,
            id: id.into(),
        }
    }

    /// An admin actor.
    pub fn admin(id: impl Into<String>) -> Self {
        Self {
            kind: ActorKind::Admin,
            id: id.into(),
        }
    }
}

/// One itemized cost charged on top of the requested amount.
///
/// The description embeds the basis of the computation so the item can be
/// displayed without recomputing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxItem {
    /// Short name of the charge ("interest", "dispersion").
    pub name: String,
    /// Human-readable description of how the value was computed.
    pub description: String,
    /// The charged amount.
    pub value: Decimal,
}

/// An append-only audit record of one status change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// The status entered.
    pub to_status: AdvanceStatus,
    /// Who caused the change.
    pub actor: Actor,
    /// When the change was committed.
    pub at: DateTime<Utc>,
}

/// Bank payout details copied from the employee at submission time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutSnapshot {
    /// Name of the bank.
    pub bank_name: String,
    /// Account type.
    pub account_type: String,
    /// Account number.
    pub account_number: String,
    /// Name of the account holder.
    pub holder_name: String,
}

impl From<&BankAccount> for PayoutSnapshot {
    fn from(account: &BankAccount) -> Self {
        Self {
            bank_name: account.bank_name.clone(),
            account_type: account.account_type.clone(),
            account_number: account.account_number.clone(),
            holder_name: account.holder_name.clone(),
        }
    }
}

/// Everything needed to persist a new request, produced by the cost calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvanceDraft {
    /// The requesting employee.
    pub employee_id: String,
    /// The employee's company.
    pub company_id: String,
    /// Optional reference to a request reason.
    pub reason_id: Option<Uuid>,
    /// Amount the employee asked for.
    pub requested_amount: Decimal,
    /// Requested amount plus all tax items.
    pub total_amount: Decimal,
    /// Start of the accrual window used.
    pub start_date: DateTime<Utc>,
    /// End of the accrual window used.
    pub end_date: DateTime<Utc>,
    /// Itemized costs, interest first.
    pub tax_items: Vec<TaxItem>,
}

/// A persisted salary advance request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvanceRequest {
    /// Unique identifier.
    pub id: Uuid,
    /// The requesting employee.
    pub employee_id: String,
    /// The employee's company.
    pub company_id: String,
    /// Optional reference to a request reason.
    pub reason_id: Option<Uuid>,
    /// Amount the employee asked for.
    pub requested_amount: Decimal,
    /// Requested amount plus all tax items.
    pub total_amount: Decimal,
    /// Current lifecycle status.
    pub status: AdvanceStatus,
    /// Start of the accrual window used.
    pub start_date: DateTime<Utc>,
    /// End of the accrual window used.
    pub end_date: DateTime<Utc>,
    /// When the request was submitted.
    pub created_at: DateTime<Utc>,
    /// When the request was approved.
    pub approved_at: Option<DateTime<Utc>>,
    /// When the request was denied.
    pub denied_at: Option<DateTime<Utc>>,
    /// When the request was cancelled.
    pub cancelled_at: Option<DateTime<Utc>>,
    /// When the request was paid.
    pub paid_at: Option<DateTime<Utc>>,
    /// Payout target captured at submission.
    pub payout: PayoutSnapshot,
    /// Itemized costs. Immutable after submission.
    pub tax_items: Vec<TaxItem>,
    /// Status history, oldest first.
    pub history: Vec<HistoryEntry>,
    /// Incremented on every committed transition.
    pub version: u64,
}

impl AdvanceRequest {
    /// Composes a new request from a draft: status REQUESTED, a by-value copy
    /// of the payout account and the initial history entry by the employee.
    pub fn submit(
        id: Uuid,
        draft: AdvanceDraft,
        payout: &BankAccount,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        let actor = Actor::employee(draft.employee_id.clone());
        Self {
            id,
            employee_id: draft.employee_id,
            company_id: draft.company_id,
            reason_id: draft.reason_id,
            requested_amount: draft.requested_amount,
            total_amount: draft.total_amount,
            status: AdvanceStatus::Requested,
            start_date: draft.start_date,
            end_date: draft.end_date,
            created_at: submitted_at,
            approved_at: None,
            denied_at: None,
            cancelled_at: None,
            paid_at: None,
            payout: PayoutSnapshot::from(payout),
            tax_items: draft.tax_items,
            history: vec![HistoryEntry {
                to_status: AdvanceStatus::Requested,
                actor,
                at: submitted_at,
            }],
            version: 0,
        }
    }

    /// Sum of all tax item values.
    pub fn tax_total(&self) -> Decimal {
        self.tax_items.iter().map(|item| item.value).sum()
    }
}

/// A request together with its owning employee and company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvanceRequestDetail {
    /// The request with nested tax items and history.
    pub request: AdvanceRequest,
    /// The requesting employee.
    pub employee: Employee,
    /// The employee's company.
    pub company: Company,
}

/// Filters for listing requests. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvanceFilter {
    /// Only requests by this employee.
    #[serde(default)]
    pub employee_id: Option<String>,
    /// Only requests for this company.
    #[serde(default)]
    pub company_id: Option<String>,
    /// Only requests in this status.
    #[serde(default)]
    pub status: Option<AdvanceStatus>,
}

impl AdvanceFilter {
    /// Returns true if `request` satisfies every set filter.
    pub fn matches(&self, request: &AdvanceRequest) -> bool {
        self.employee_id
            .as_ref()
            .is_none_or(|id| *id == request.employee_id)
            && self
                .company_id
                .as_ref()
                .is_none_or(|id| *id == request.company_id)
            && self.status.is_none_or(|status| status == request.status)
    }
}
