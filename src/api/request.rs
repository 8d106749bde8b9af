//! Request bodies accepted by the API.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Actor, AdvanceStatus};

/// Body for quoting or submitting an advance.
///
/// `requested_amount` accepts either a JSON string or a JSON number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvanceAmountRequest {
    /// The amount the employee wants advanced.
    pub requested_amount: Decimal,
    /// Optional reason category.
    #[serde(default)]
    pub reason_id: Option<Uuid>,
}

/// Body for changing the status of a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionRequest {
    /// The target status.
    pub to_status: AdvanceStatus,
    /// Who is performing the change.
    pub actor: Actor,
}
