/// Quota configuration of a Space
///
/// This module provides the immutable constraint values:
/// - Monthly traffic and total storage per Space
/// - Email limits (addresses, mailboxes, forwards, mailbox storage)
/// - Database limits (storage, amount per engine, enabled engines)
/// - Named plan templates loaded from configuration

pub mod plans;
pub mod types;

pub use plans::PlanCatalog;
pub use types::{Constraints, DbConstraints, DbEngine, EmailConstraints, UNLIMITED};
