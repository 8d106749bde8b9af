//! Status transition guards and application.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::TransitionPolicy;
use crate::error::{EngineError, EngineResult, TransitionConflict};
use crate::models::{Actor, AdvanceRequest, AdvanceStatus, HistoryEntry};

/// A validated status change, ready to be committed.
///
/// Carries the version of the request the guards were evaluated against so a
/// store can refuse to commit over a concurrent change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// The request being changed.
    pub request_id: Uuid,
    /// Status at the time the guards ran.
    pub from: AdvanceStatus,
    /// Target status.
    pub to: AdvanceStatus,
    /// Who requested the change.
    pub actor: Actor,
    /// When the change takes effect.
    pub at: DateTime<Utc>,
    /// Request version the guards were evaluated against.
    pub expected_version: u64,
}

/// Returns true if the strict adjacency table allows `from` to `to`.
pub fn strictly_allowed(from: AdvanceStatus, to: AdvanceStatus) -> bool {
    use AdvanceStatus::*;
    matches!(
        (from, to),
        (Requested, Approved) | (Requested, Denied) | (Requested, Cancelled) | (Approved, Paid)
    )
}

/// Evaluates the transition guards for `request`.
///
/// Under every policy a transition to the current status and any transition
/// out of PAID are rejected. The strict policy additionally requires the edge
/// to be in the adjacency table.
///
/// # Examples
///
/// ```
/// use advance_engine::config::TransitionPolicy;
/// use advance_engine::error::{EngineError, TransitionConflict};
/// use advance_engine::lifecycle::plan_transition;
/// # use advance_engine::models::*;
/// # use chrono::Utc;
/// # use rust_decimal::Decimal;
/// # use uuid::Uuid;
/// # let draft = AdvanceDraft {
/// #     employee_id: "emp_001".to_string(),
/// #     company_id: "acme".to_string(),
/// #     reason_id: None,
/// #     requested_amount: Decimal::new(1000, 0),
/// #     total_amount: Decimal::new(1004, 0),
/// #     start_date: Utc::now(),
/// #     end_date: Utc::now(),
/// #     tax_items: vec![],
/// # };
/// # let bank = BankAccount {
/// #     bank_name: "Banco Uno".to_string(),
/// #     account_type: "savings".to_string(),
/// #     account_number: "001".to_string(),
/// #     holder_name: "Ana".to_string(),
/// # };
/// let request = AdvanceRequest::submit(Uuid::new_v4(), draft, &bank, Utc::now());
///
/// let result = plan_transition(
///     &request,
///     AdvanceStatus::Requested,
///     Actor::admin("admin_1"),
///     Utc::now(),
///     TransitionPolicy::Permissive,
/// );
/// assert!(matches!(
///     result,
///     Err(EngineError::StateConflict { conflict: TransitionConflict::AlreadyInState { .. }, .. })
/// ));
/// ```
pub fn plan_transition(
    request: &AdvanceRequest,
    to: AdvanceStatus,
    actor: Actor,
    at: DateTime<Utc>,
    policy: TransitionPolicy,
) -> EngineResult<Transition> {
    let from = request.status;
    let conflict = if from == to {
        Some(TransitionConflict::AlreadyInState { status: from })
    } else if from == AdvanceStatus::Paid {
        Some(TransitionConflict::AlreadyPaid)
    } else if policy == TransitionPolicy::Strict && !strictly_allowed(from, to) {
        Some(TransitionConflict::NotAllowed { from, to })
    } else {
        None
    };

    if let Some(conflict) = conflict {
        return Err(EngineError::StateConflict {
            request_id: request.id,
            conflict,
        });
    }

    Ok(Transition {
        request_id: request.id,
        from,
        to,
        actor,
        at,
        expected_version: request.version,
    })
}

/// Applies a planned transition: sets the status, stamps the matching
/// timestamp, appends one history entry and bumps the version.
pub fn apply_transition(request: &mut AdvanceRequest, transition: &Transition) {
    let at = Some(transition.at);
    match transition.to {
        AdvanceStatus::Requested => {}
        AdvanceStatus::Approved => request.approved_at = at,
        AdvanceStatus::Denied => request.denied_at = at,
        AdvanceStatus::Cancelled => request.cancelled_at = at,
        AdvanceStatus::Paid => request.paid_at = at,
    }
    request.status = transition.to;
    request.history.push(HistoryEntry {
        to_status: transition.to,
        actor: transition.actor.clone(),
        at: transition.at,
    });
    request.version += 1;
}
