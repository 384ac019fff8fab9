//! quota-rs: Constraint and quota enforcement for hosted Spaces
//!
//! Decides, before anything is persisted, whether a Space may create or
//! resize a mailbox or email forward within its configured limits, and
//! recomputes limits on plan change without invalidating storage the
//! Space already uses.
//!
//! # Features
//!
//! - **Admission checks**: address, mailbox and forward counts plus an
//!   ordered per-batch storage budget
//! - **Plan changes**: new constraints never shrink storage below usage
//! - **Unit-aware sizes**: [`ByteSize`] with an unlimited sentinel
//! - **Structured errors**: [`ConstraintExceeded`] to pattern-match on
//!
//! The engine holds no locks. Two admission checks for the same Space
//! running concurrently may both pass; serialize mutations per Space at
//! the transaction boundary if that matters.
//!
//! # Example
//!
//! ```no_run
//! use quota_rs::checker::ConstraintsChecker;
//! use quota_rs::space::{InMemoryForwards, InMemoryMailboxes, InMemorySpaces, SpaceId, UnmeteredUsage};
//! use quota_rs::{ByteSize, Config};
//! use std::sync::Arc;
//!
//! # async fn example(space_id: SpaceId) -> quota_rs::Result<()> {
//! let config = Config::default();
//! let checker = ConstraintsChecker::new(
//!     Arc::new(InMemorySpaces::new()),
//!     Arc::new(InMemoryMailboxes::new()),
//!     Arc::new(InMemoryForwards::new()),
//!     Arc::new(UnmeteredUsage),
//!     config.engine.platform_available_storage,
//! );
//!
//! checker
//!     .allow_new_mailbox(space_id, &[("info@example.com".to_string(), ByteSize::gib(2))])
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`size`]: Storage size values
//! - [`constraints`]: Quota configuration and plan templates
//! - [`space`]: Entities and collaborator traits
//! - [`checker`]: Admission and applicability checks
//! - [`config`]: Configuration management
//! - [`error`]: Error types and handling
//! - [`logging`]: Tracing subscriber setup

pub mod checker;
pub mod config;
pub mod constraints;
pub mod error;
pub mod logging;
pub mod size;
pub mod space;

// Re-export commonly used types
pub use checker::{ApplicabilityChecker, ConstraintsChecker};
pub use config::Config;
pub use constraints::{Constraints, DbConstraints, DbEngine, EmailConstraints};
pub use error::{ConstraintExceeded, QuotaError, Result};
pub use size::{ByteSize, ByteUnit};
