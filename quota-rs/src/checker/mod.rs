//! Quota enforcement services
//!
//! - [`ConstraintsChecker`]: admission checks before creating or resizing
//!   mailboxes and forwards
//! - [`ApplicabilityChecker`]: adapts new constraints on plan change so
//!   consumed storage stays valid
//!
//! Both are stateless and only read through the injected collaborators.

pub mod applicability;
pub mod constraints;

pub use applicability::ApplicabilityChecker;
pub use constraints::ConstraintsChecker;
