use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::config::{DirectorySeed, GlobalSettings};
use crate::lifecycle::{Transition, apply_transition};
use crate::models::{AdvanceFilter, AdvanceRequest, Company, Employee};

use super::{AdvanceRepository, Directory, StoreError};

/// A thread-safe in-memory store for advance requests.
///
/// Every write happens under a single write lock, so an inserted request and
/// its nested tax items and history appear together or not at all.
#[derive(Default, Clone)]
pub struct InMemoryAdvanceRepository {
    requests: Arc<RwLock<HashMap<Uuid, AdvanceRequest>>>,
}

impl InMemoryAdvanceRepository {
    /// Creates a new, empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AdvanceRepository for InMemoryAdvanceRepository {
    async fn insert(&self, request: AdvanceRequest) -> Result<AdvanceRequest, StoreError> {
        let mut requests = self.requests.write().await;
        if requests.contains_key(&request.id) {
            return Err(StoreError::Duplicate(request.id));
        }
        requests.insert(request.id, request.clone());
        Ok(request)
    }

    async fn get(&self, id: Uuid) -> Result<Option<AdvanceRequest>, StoreError> {
        let requests = self.requests.read().await;
        Ok(requests.get(&id).cloned())
    }

    async fn list(&self, filter: &AdvanceFilter) -> Result<Vec<AdvanceRequest>, StoreError> {
        let requests = self.requests.read().await;
        let mut matching: Vec<AdvanceRequest> = requests
            .values()
            .filter(|request| filter.matches(request))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(matching)
    }

    async fn commit_transition(
        &self,
        transition: &Transition,
    ) -> Result<AdvanceRequest, StoreError> {
        let mut requests = self.requests.write().await;
        let request = requests
            .get_mut(&transition.request_id)
            .ok_or(StoreError::Missing(transition.request_id))?;

        if request.version != transition.expected_version {
            return Err(StoreError::VersionConflict {
                request_id: transition.request_id,
                expected: transition.expected_version,
                found: request.version,
            });
        }

        apply_transition(request, transition);
        Ok(request.clone())
    }
}

/// A read-only in-memory catalog seeded from configuration.
#[derive(Default, Clone)]
pub struct InMemoryDirectory {
    employees: Arc<HashMap<String, Employee>>,
    companies: Arc<HashMap<String, Company>>,
    settings: Arc<GlobalSettings>,
}

impl InMemoryDirectory {
    /// Builds a directory from seed records and global settings.
    pub fn new(seed: DirectorySeed, settings: GlobalSettings) -> Self {
        Self {
            employees: Arc::new(
                seed.employees
                    .into_iter()
                    .map(|employee| (employee.id.clone(), employee))
                    .collect(),
            ),
            companies: Arc::new(
                seed.companies
                    .into_iter()
                    .map(|company| (company.id.clone(), company))
                    .collect(),
            ),
            settings: Arc::new(settings),
        }
    }
}

#[async_trait]
impl Directory for InMemoryDirectory {
    async fn employee(&self, id: &str) -> Result<Option<Employee>, StoreError> {
        Ok(self.employees.get(id).cloned())
    }

    async fn company(&self, id: &str) -> Result<Option<Company>, StoreError> {
        Ok(self.companies.get(id).cloned())
    }

    async fn global_settings(&self) -> Result<GlobalSettings, StoreError> {
        Ok(self.settings.as_ref().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TransitionPolicy;
    use crate::lifecycle::plan_transition;
    use crate::models::{
        Actor, AdvanceDraft, AdvanceStatus, BankAccount, CompanyStatus, EmployeeStatus,
    };
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use rust_decimal::Decimal;

    fn at(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, d, 9, 0, 0).unwrap()
    }

    fn bank() -> BankAccount {
        BankAccount {
            bank_name: "Banco Uno".to_string(),
            account_type: "savings".to_string(),
            account_number: "001-22".to_string(),
            holder_name: "Ana Torres".to_string(),
        }
    }

    fn request(employee_id: &str, submitted_at: DateTime<Utc>) -> AdvanceRequest {
        let draft = AdvanceDraft {
            employee_id: employee_id.to_string(),
            company_id: "acme".to_string(),
            reason_id: None,
            requested_amount: Decimal::new(1_000, 0),
            total_amount: Decimal::new(1_004, 0),
            start_date: at(1),
            end_date: submitted_at,
            tax_items: vec![],
        };
        AdvanceRequest::submit(Uuid::new_v4(), draft, &bank(), submitted_at)
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let repo = InMemoryAdvanceRepository::new();
        let stored = repo.insert(request("emp_001", at(2))).await.unwrap();

        let fetched = repo.get(stored.id).await.unwrap().unwrap();
        assert_eq!(fetched, stored);
        assert!(repo.get(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_duplicate_id_fails() {
        let repo = InMemoryAdvanceRepository::new();
        let original = request("emp_001", at(2));
        repo.insert(original.clone()).await.unwrap();

        let result = repo.insert(original).await;
        assert!(matches!(result, Err(StoreError::Duplicate(_))));
    }

    #[tokio::test]
    async fn test_list_is_newest_first_and_filtered() {
        let repo = InMemoryAdvanceRepository::new();
        let oldest = repo.insert(request("emp_001", at(2))).await.unwrap();
        let newest = repo
            .insert(request("emp_001", at(2) + Duration::hours(5)))
            .await
            .unwrap();
        repo.insert(request("emp_002", at(3))).await.unwrap();

        let filter = AdvanceFilter {
            employee_id: Some("emp_001".to_string()),
            ..Default::default()
        };
        let listed = repo.list(&filter).await.unwrap();
        let ids: Vec<Uuid> = listed.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![newest.id, oldest.id]);

        let all = repo.list(&AdvanceFilter::default()).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].employee_id, "emp_002");
    }

    #[tokio::test]
    async fn test_commit_transition_applies_and_bumps_version() {
        let repo = InMemoryAdvanceRepository::new();
        let stored = repo.insert(request("emp_001", at(2))).await.unwrap();

        let transition = plan_transition(
            &stored,
            AdvanceStatus::Approved,
            Actor::admin("admin_1"),
            at(3),
            TransitionPolicy::Permissive,
        )
        .unwrap();
        let updated = repo.commit_transition(&transition).await.unwrap();

        assert_eq!(updated.status, AdvanceStatus::Approved);
        assert_eq!(updated.version, 1);
        assert_eq!(updated.history.len(), 2);
        assert_eq!(repo.get(stored.id).await.unwrap().unwrap(), updated);
    }

    #[tokio::test]
    async fn test_stale_transition_is_refused() {
        let repo = InMemoryAdvanceRepository::new();
        let stored = repo.insert(request("emp_001", at(2))).await.unwrap();

        // Two callers evaluate guards against the same snapshot.
        let approve = plan_transition(
            &stored,
            AdvanceStatus::Approved,
            Actor::admin("admin_1"),
            at(3),
            TransitionPolicy::Permissive,
        )
        .unwrap();
        let deny = plan_transition(
            &stored,
            AdvanceStatus::Denied,
            Actor::admin("admin_2"),
            at(3),
            TransitionPolicy::Permissive,
        )
        .unwrap();

        repo.commit_transition(&approve).await.unwrap();
        let result = repo.commit_transition(&deny).await;

        assert!(matches!(
            result,
            Err(StoreError::VersionConflict {
                expected: 0,
                found: 1,
                ..
            })
        ));
        let current = repo.get(stored.id).await.unwrap().unwrap();
        assert_eq!(current.status, AdvanceStatus::Approved);
        assert_eq!(current.history.len(), 2);
        assert!(current.denied_at.is_none());
    }

    #[tokio::test]
    async fn test_commit_on_missing_request() {
        let repo = InMemoryAdvanceRepository::new();
        let orphan = request("emp_001", at(2));
        let transition = plan_transition(
            &orphan,
            AdvanceStatus::Approved,
            Actor::admin("admin_1"),
            at(3),
            TransitionPolicy::Permissive,
        )
        .unwrap();

        let result = repo.commit_transition(&transition).await;
        assert!(matches!(result, Err(StoreError::Missing(_))));
    }

    #[tokio::test]
    async fn test_directory_lookups() {
        let seed = DirectorySeed {
            companies: vec![Company {
                id: "acme".to_string(),
                name: "Acme".to_string(),
                status: CompanyStatus::Active,
                dispersion_base: Decimal::ZERO,
                max_request_day: None,
            }],
            employees: vec![Employee {
                id: "emp_001".to_string(),
                company_id: "acme".to_string(),
                name: "Ana Torres".to_string(),
                email: "ana@example.com".to_string(),
                status: EmployeeStatus::Active,
                salary: None,
                started_at: None,
                bank_account: None,
            }],
        };
        let settings = GlobalSettings {
            annual_interest_rate: Some(Decimal::new(245, 1)),
            allowance: None,
        };
        let directory = InMemoryDirectory::new(seed, settings.clone());

        assert!(directory.employee("emp_001").await.unwrap().is_some());
        assert!(directory.employee("emp_404").await.unwrap().is_none());
        assert!(directory.company("acme").await.unwrap().is_some());
        assert_eq!(directory.global_settings().await.unwrap(), settings);
    }
}
