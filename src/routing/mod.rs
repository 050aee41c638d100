//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound path + query
//!     → router.rs (static paths, `?q=` shortcut)
//!     → normalize.rs (repair scheme)
//!     → classifier.rs (URL shape → resource identity)
//!     → security::access_control (allow / deny / bypass)
//!     → mirror.rs (optional `repo@ref` shorthand redirect)
//!     → Return: Route
//! ```
//!
//! # Design Decisions
//! - Classification patterns compiled once, tried in fixed order
//! - First matching shape wins
//! - Every step is a pure function of its input and the config

pub mod classifier;
pub mod mirror;
pub mod normalize;
pub mod router;

pub use router::{Route, Router};
