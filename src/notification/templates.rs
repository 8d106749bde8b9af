//! Status-change notification routing table and templates.

use serde::{Deserialize, Serialize};

use crate::config::NotificationSettings;
use crate::models::{Actor, ActorKind, AdvanceRequest, AdvanceStatus};

/// Who a notification is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Audience {
    /// The configured admin inbox.
    Admin,
    /// The employee who owns the request.
    Employee,
}

/// The content handed to the templated-email pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationTemplate {
    /// Email subject.
    pub subject: String,
    /// Heading shown in the body.
    pub title: String,
    /// First line of the body.
    pub first_line: String,
    /// Call-to-action button label.
    pub button_label: String,
    /// Deep link to the request detail view.
    pub link: String,
}

/// A routed notification: recipient plus template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Which side of the platform receives it.
    pub audience: Audience,
    /// Destination address.
    pub recipient: String,
    /// Rendered template fields.
    pub template: NotificationTemplate,
}

fn admin_link(settings: &NotificationSettings, request: &AdvanceRequest) -> String {
    format!("{}/admin/advances/{}", settings.app_base_url, request.id)
}

fn employee_link(settings: &NotificationSettings, request: &AdvanceRequest) -> String {
    format!("{}/advances/{}", settings.app_base_url, request.id)
}

fn to_admin(
    settings: &NotificationSettings,
    request: &AdvanceRequest,
    subject: &str,
    first_line: String,
) -> Notification {
    Notification {
        audience: Audience::Admin,
        recipient: settings.admin_inbox.clone(),
        template: NotificationTemplate {
            subject: subject.to_string(),
            title: subject.to_string(),
            first_line,
            button_label: "Review request".to_string(),
            link: admin_link(settings, request),
        },
    }
}

fn to_employee(
    settings: &NotificationSettings,
    request: &AdvanceRequest,
    employee_email: &str,
    status: AdvanceStatus,
) -> Notification {
    let amount = request.requested_amount.normalize();
    let (subject, title, first_line, button_label) = match status {
        AdvanceStatus::Requested => (
            "We received your advance request",
            "Request received",
            format!("Your request for {amount} has been received and is pending review."),
            "View request",
        ),
        AdvanceStatus::Approved => (
            "Your advance request was approved",
            "Request approved",
            format!("Your request for {amount} was approved and will be paid soon."),
            "View request",
        ),
        AdvanceStatus::Denied => (
            "Your advance request was denied",
            "Request denied",
            format!("Your request for {amount} was not approved."),
            "See details",
        ),
        AdvanceStatus::Cancelled => (
            "Your advance request was cancelled",
            "Request cancelled",
            format!("Your request for {amount} was cancelled."),
            "See details",
        ),
        AdvanceStatus::Paid => (
            "Your advance has been paid",
            "Advance paid",
            format!(
                "{amount} was sent to your {} account ending in {}.",
                request.payout.bank_name,
                account_suffix(&request.payout.account_number)
            ),
            "View payment",
        ),
    };

    Notification {
        audience: Audience::Employee,
        recipient: employee_email.to_string(),
        template: NotificationTemplate {
            subject: subject.to_string(),
            title: title.to_string(),
            first_line,
            button_label: button_label.to_string(),
            link: employee_link(settings, request),
        },
    }
}

fn account_suffix(account_number: &str) -> &str {
    let start = account_number
        .char_indices()
        .rev()
        .nth(3)
        .map_or(0, |(index, _)| index);
    &account_number[start..]
}

/// Routes a status change to its notifications.
///
/// | status    | actor    | recipients                         |
/// |-----------|----------|------------------------------------|
/// | REQUESTED | employee | admin ("new request") and employee |
/// | REQUESTED | admin    | employee                           |
/// | APPROVED  | any      | employee                           |
/// | DENIED    | any      | employee                           |
/// | PAID      | any      | employee                           |
/// | CANCELLED | employee | admin ("request cancelled")        |
/// | CANCELLED | admin    | employee                           |
pub fn route(
    request: &AdvanceRequest,
    status: AdvanceStatus,
    actor: &Actor,
    employee_email: &str,
    settings: &NotificationSettings,
) -> Vec<Notification> {
    match (status, actor.kind) {
        (AdvanceStatus::Requested, ActorKind::Employee) => vec![
            to_admin(
                settings,
                request,
                "New advance request",
                format!(
                    "Employee {} requested an advance of {}.",
                    request.employee_id,
                    request.requested_amount.normalize()
                ),
            ),
            to_employee(settings, request, employee_email, status),
        ],
        (AdvanceStatus::Cancelled, ActorKind::Employee) => vec![to_admin(
            settings,
            request,
            "Advance request cancelled",
            format!(
                "Employee {} cancelled their request of {}.",
                request.employee_id,
                request.requested_amount.normalize()
            ),
        )],
        _ => vec![to_employee(settings, request, employee_email, status)],
    }
}
