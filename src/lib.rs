//! Salary advance lifecycle and cost engine.
//!
//! Computes how much of an employee's salary has accrued and may be advanced,
//! prices a requested advance with its interest and dispersion fee, and
//! drives submitted requests through their approval and payout lifecycle
//! with a complete audit trail and best-effort notifications.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod clock;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod models;
pub mod notification;
pub mod service;
pub mod store;
