//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Resource identity (from routing::classifier):
//!     → rules.rs (segment rule matching)
//!     → access_control.rs (allow → deny → bypass)
//!     → Decision handed back to routing
//!
//! Forwarding:
//!     → headers.rs (drop Host and hop-by-hop headers)
//! ```
//!
//! # Design Decisions
//! - Rule lists compiled once at startup, immutable at runtime
//! - Unrecognized URLs are not filtered

pub mod access_control;
pub mod headers;
pub mod rules;

pub use access_control::{AccessControl, Decision, DenyReason};
pub use rules::{Rule, RuleList};
