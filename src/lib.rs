//! # Waitlist Admission
//!
//! Capacity-limited admission control with transactional FIFO waitlist promotion.
//!
//! Testers apply to join a test program that has a fixed number of seats. Each
//! application is admitted immediately when a seat is free and waitlisted
//! otherwise. When the program's developer rejects an admitted tester, the
//! freed seat goes to the earliest waitlisted application in the same unit of
//! work, so a seat can never be lost between the two steps.
//!
//! ## Guarantees
//!
//! - **Capacity invariant**: the number of `APPROVED` requests of a resource
//!   never exceeds its capacity, under any interleaving of concurrent calls.
//! - **FIFO promotion**: the waitlisted request with the earliest
//!   `submitted_at` (then lowest id) is promoted first.
//! - **Retry safety**: a retried submission fails with `Conflict`; a retried
//!   decision fails with `InvalidTransition`. Neither double-admits.
//!
//! Occupancy is never cached. Every decision counts the request rows inside
//! the store transaction that writes the decision.
//!
//! ## Example
//!
//! ```rust,ignore
//! use waitlist_admission::builders::EngineBuilder;
//! use waitlist_admission::config::EngineConfig;
//! use waitlist_admission::core::{Decision, RequestStatus};
//!
//! let cfg = EngineConfig::from_json_str(r#"{
//!     "resources": { "beta": { "owner_id": "dev", "capacity": 1 } }
//! }"#)?;
//! let engine = EngineBuilder::new(cfg).build()?;
//!
//! let a = engine.submit("beta", "alice", serde_json::json!({})).await?;
//! let b = engine.submit("beta", "bob", serde_json::json!({})).await?;
//! assert_eq!(b.status, RequestStatus::Waitlisted);
//!
//! engine.decide(a.id, Decision::Reject, "dev").await?;
//! // bob now holds the seat
//! ```
//!
//! For complete scenarios, see `tests/admission_scenarios_test.rs`.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core admission abstractions and the decision protocol.
pub mod core;
/// Configuration models for resources, the store, and limits.
pub mod config;
/// Builders to construct engines from configuration.
pub mod builders;
/// Infrastructure adapters for stores and resource directories.
pub mod infra;
/// API surface for callers.
pub mod runtime;
/// Shared utilities.
pub mod util;
