//! Storage ports for advance requests and the employee/company catalog.
//!
//! Implementations must make [`AdvanceRepository::insert`] and
//! [`AdvanceRepository::commit_transition`] atomic: a request is stored with
//! its tax items and history in one write, and a transition is committed
//! together with its history entry only if the request is still at the
//! version the guards saw.

mod in_memory;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::config::GlobalSettings;
use crate::lifecycle::Transition;
use crate::models::{AdvanceFilter, AdvanceRequest, Company, Employee};

pub use in_memory::{InMemoryAdvanceRepository, InMemoryDirectory};

/// Failure reported by a storage backend.
///
/// The service logs these and surfaces a generic persistence error instead.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A request with the same id already exists.
    #[error("duplicate advance request id {0}")]
    Duplicate(Uuid),
    /// The stored version no longer matches the expected version.
    #[error("version conflict on request {request_id}: expected {expected}, found {found}")]
    VersionConflict {
        /// The request being updated.
        request_id: Uuid,
        /// The version the caller read.
        expected: u64,
        /// The version currently stored.
        found: u64,
    },
    /// The request to update does not exist.
    #[error("advance request {0} not found")]
    Missing(Uuid),
    /// Any other backend failure.
    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// Persistence for advance requests and their owned tax items and history.
#[async_trait]
pub trait AdvanceRepository: Send + Sync {
    /// Stores a newly submitted request, including its tax items, initial
    /// history entry and payout snapshot, in a single atomic write.
    async fn insert(&self, request: AdvanceRequest) -> Result<AdvanceRequest, StoreError>;

    /// Fetches a request by id.
    async fn get(&self, id: Uuid) -> Result<Option<AdvanceRequest>, StoreError>;

    /// Lists requests matching `filter`, newest first.
    async fn list(&self, filter: &AdvanceFilter) -> Result<Vec<AdvanceRequest>, StoreError>;

    /// Commits a planned transition if the stored version still equals
    /// `transition.expected_version`.
    async fn commit_transition(&self, transition: &Transition)
    -> Result<AdvanceRequest, StoreError>;
}

/// Read access to the catalog and platform settings.
#[async_trait]
pub trait Directory: Send + Sync {
    /// Fetches an employee by id.
    async fn employee(&self, id: &str) -> Result<Option<Employee>, StoreError>;

    /// Fetches a company by id.
    async fn company(&self, id: &str) -> Result<Option<Company>, StoreError>;

    /// Returns the current global settings.
    async fn global_settings(&self) -> Result<GlobalSettings, StoreError>;
}

/// Boxed repository, as held by the service.
pub type AdvanceRepositoryBox = Box<dyn AdvanceRepository>;

/// Shared directory, as held by the service and its notification tasks.
pub type SharedDirectory = Arc<dyn Directory>;
