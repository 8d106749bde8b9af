//! The advance lifecycle service.
//!
//! [`AdvanceService`] wires the calculators, the state machine, storage and
//! notifications into the operations the HTTP layer exposes.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::calculation::{
    AccrualResult, CostBreakdown, calculate_accrual, calculate_cost, check_eligibility,
};
use crate::clock::Clock;
use crate::config::{GlobalSettings, TransitionPolicy};
use crate::error::{EngineError, EngineResult, TransitionConflict};
use crate::lifecycle::plan_transition;
use crate::models::{
    Actor, AdvanceFilter, AdvanceRequest, AdvanceRequestDetail, AdvanceStatus, Company, Employee,
};
use crate::notification::NotificationDispatcher;
use crate::store::{AdvanceRepositoryBox, SharedDirectory, StoreError};

/// Records loaded for an employee before any calculation.
struct EmployeeContext {
    employee: Employee,
    company: Company,
    settings: GlobalSettings,
    last_paid_at: Option<DateTime<Utc>>,
}

/// Logs a storage failure and replaces it with a safe, generic error.
fn persistence(operation: &'static str) -> impl FnOnce(StoreError) -> EngineError {
    move |err| {
        error!(operation, error = %err, "Storage failure");
        EngineError::Persistence { operation }
    }
}

/// Entry point for advance calculations, submissions and status changes.
pub struct AdvanceService {
    repository: AdvanceRepositoryBox,
    directory: SharedDirectory,
    dispatcher: NotificationDispatcher,
    clock: Arc<dyn Clock>,
    policy: TransitionPolicy,
}

impl AdvanceService {
    /// Creates a new service.
    pub fn new(
        repository: AdvanceRepositoryBox,
        directory: SharedDirectory,
        dispatcher: NotificationDispatcher,
        clock: Arc<dyn Clock>,
        policy: TransitionPolicy,
    ) -> Self {
        Self {
            repository,
            directory,
            dispatcher,
            clock,
            policy,
        }
    }

    /// Computes the credit currently available to an employee.
    pub async fn calculate_accrual(&self, employee_id: &str) -> EngineResult<AccrualResult> {
        let ctx = self.load_context(employee_id).await?;
        let eligible = check_eligibility(&ctx.employee, &ctx.company)?;
        Ok(calculate_accrual(
            &eligible,
            &ctx.settings,
            ctx.last_paid_at,
            self.clock.now(),
        ))
    }

    /// Quotes the cost of a requested amount without persisting anything.
    pub async fn calculate_cost(
        &self,
        requested_amount: Decimal,
        reason_id: Option<Uuid>,
        employee_id: &str,
    ) -> EngineResult<CostBreakdown> {
        let ctx = self.load_context(employee_id).await?;
        let eligible = check_eligibility(&ctx.employee, &ctx.company)?;
        let breakdown = calculate_cost(
            requested_amount,
            &eligible,
            &ctx.company,
            &ctx.settings,
            ctx.last_paid_at,
            self.clock.now(),
        )?;
        info!(
            employee_id,
            reason_id = ?reason_id,
            requested_amount = %requested_amount,
            total_amount = %breakdown.total_amount,
            "Advance cost quoted"
        );
        Ok(breakdown)
    }

    /// Submits a new advance request.
    ///
    /// The request, its tax items, the payout snapshot and the initial
    /// REQUESTED history entry are stored in one write. Notifications are
    /// dispatched after the write and never affect the result.
    pub async fn create_advance_request(
        &self,
        requested_amount: Decimal,
        reason_id: Option<Uuid>,
        employee_id: &str,
    ) -> EngineResult<AdvanceRequest> {
        let ctx = self.load_context(employee_id).await?;
        let eligible = check_eligibility(&ctx.employee, &ctx.company)?;
        let now = self.clock.now();

        let breakdown = calculate_cost(
            requested_amount,
            &eligible,
            &ctx.company,
            &ctx.settings,
            ctx.last_paid_at,
            now,
        )?;
        let draft = breakdown.into_draft(&ctx.employee.id, &ctx.company.id, reason_id);
        let request = AdvanceRequest::submit(Uuid::new_v4(), draft, eligible.bank_account, now);

        let stored = self
            .repository
            .insert(request)
            .await
            .map_err(persistence("creation"))?;

        info!(
            request_id = %stored.id,
            employee_id,
            requested_amount = %stored.requested_amount,
            total_amount = %stored.total_amount,
            "Advance request created"
        );

        self.dispatcher.notify(
            &stored,
            AdvanceStatus::Requested,
            &Actor::employee(&ctx.employee.id),
            &ctx.employee.email,
        );
        Ok(stored)
    }

    /// Moves a request to `to_status` on behalf of `actor`.
    ///
    /// Same-state transitions and any change to a PAID request are rejected
    /// with [`EngineError::StateConflict`]. The status change and its history
    /// entry are committed together, and only if no other transition was
    /// committed since the request was read.
    pub async fn transition_advance_status(
        &self,
        request_id: Uuid,
        to_status: AdvanceStatus,
        actor: Actor,
    ) -> EngineResult<AdvanceRequest> {
        let request = self.fetch_request(request_id).await?;
        let transition = plan_transition(
            &request,
            to_status,
            actor.clone(),
            self.clock.now(),
            self.policy,
        )?;

        let updated = match self.repository.commit_transition(&transition).await {
            Ok(updated) => updated,
            Err(StoreError::VersionConflict { .. }) => {
                warn!(
                    request_id = %request_id,
                    to_status = %to_status,
                    "Concurrent status change detected"
                );
                return Err(EngineError::StateConflict {
                    request_id,
                    conflict: TransitionConflict::ConcurrentModification,
                });
            }
            Err(StoreError::Missing(_)) => return Err(EngineError::RequestNotFound { request_id }),
            Err(err) => return Err(persistence("update")(err)),
        };

        info!(
            request_id = %request_id,
            from_status = %transition.from,
            to_status = %to_status,
            actor_id = %actor.id,
            "Advance request status changed"
        );

        self.notify_transition(&updated, to_status, actor);
        Ok(updated)
    }

    /// Looks up the employee's address and dispatches the transition's
    /// notifications, all on a detached task.
    fn notify_transition(&self, request: &AdvanceRequest, to_status: AdvanceStatus, actor: Actor) {
        let directory = Arc::clone(&self.directory);
        let dispatcher = self.dispatcher.clone();
        let request = request.clone();

        tokio::spawn(async move {
            match directory.employee(&request.employee_id).await {
                Ok(Some(employee)) => {
                    let _ = dispatcher
                        .notify(&request, to_status, &actor, &employee.email)
                        .await;
                }
                Ok(None) => warn!(
                    request_id = %request.id,
                    employee_id = %request.employee_id,
                    "Employee missing, notification skipped"
                ),
                Err(err) => warn!(
                    request_id = %request.id,
                    error = %err,
                    "Employee lookup failed, notification skipped"
                ),
            }
        });
    }

    /// Fetches a request with its employee and company.
    pub async fn get_advance_request(
        &self,
        request_id: Uuid,
    ) -> EngineResult<AdvanceRequestDetail> {
        let request = self.fetch_request(request_id).await?;
        let employee = self.fetch_employee(&request.employee_id).await?;
        let company = self.fetch_company(&request.company_id).await?;
        Ok(AdvanceRequestDetail {
            request,
            employee,
            company,
        })
    }

    /// Lists requests matching `filter`, newest first.
    pub async fn list_advance_requests(
        &self,
        filter: &AdvanceFilter,
    ) -> EngineResult<Vec<AdvanceRequest>> {
        self.repository
            .list(filter)
            .await
            .map_err(persistence("listing"))
    }

    async fn load_context(&self, employee_id: &str) -> EngineResult<EmployeeContext> {
        let employee = self.fetch_employee(employee_id).await?;
        let company = self.fetch_company(&employee.company_id).await?;
        let settings = self
            .directory
            .global_settings()
            .await
            .map_err(persistence("lookup"))?;

        let paid = AdvanceFilter {
            employee_id: Some(employee.id.clone()),
            status: Some(AdvanceStatus::Paid),
            ..Default::default()
        };
        let last_paid_at = self
            .repository
            .list(&paid)
            .await
            .map_err(persistence("lookup"))?
            .first()
            .map(|request| request.created_at);

        Ok(EmployeeContext {
            employee,
            company,
            settings,
            last_paid_at,
        })
    }

    async fn fetch_request(&self, request_id: Uuid) -> EngineResult<AdvanceRequest> {
        self.repository
            .get(request_id)
            .await
            .map_err(persistence("lookup"))?
            .ok_or(EngineError::RequestNotFound { request_id })
    }

    async fn fetch_employee(&self, employee_id: &str) -> EngineResult<Employee> {
        self.directory
            .employee(employee_id)
            .await
            .map_err(persistence("lookup"))?
            .ok_or_else(|| EngineError::EmployeeNotFound {
                employee_id: employee_id.to_string(),
            })
    }

    async fn fetch_company(&self, company_id: &str) -> EngineResult<Company> {
        self.directory
            .company(company_id)
            .await
            .map_err(persistence("lookup"))?
            .ok_or_else(|| EngineError::CompanyNotFound {
                company_id: company_id.to_string(),
            })
    }
}
