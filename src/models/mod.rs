//! Core data models for the advance engine.
//!
//! Employees and companies are read-only catalog records; advance requests
//! are the aggregate this engine creates and mutates.

mod advance;
mod company;
mod employee;

pub use advance::{
    Actor, ActorKind, AdvanceDraft, AdvanceFilter, AdvanceRequest, AdvanceRequestDetail,
    AdvanceStatus, HistoryEntry, PayoutSnapshot, TaxItem,
};
pub use company::{Company, CompanyStatus};
pub use employee::{BankAccount, Employee, EmployeeStatus};
