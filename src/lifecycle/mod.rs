//! Advance request status state machine.
//!
//! ```text
//! REQUESTED ──► APPROVED ──► PAID
//!     │
//!     ├──► DENIED
//!     └──► CANCELLED
//! ```
//!
//! PAID is immutable. Guards are evaluated by [`plan_transition`]; the
//! resulting [`Transition`] is committed by a store, which calls
//! [`apply_transition`] under its own write.

mod transition;

pub use transition::{Transition, apply_transition, plan_transition, strictly_allowed};
