use thiserror::Error;

use crate::size::ByteSize;
use crate::space::{MailboxId, SpaceId};

/// A proposed change would violate the Space's current constraints.
///
/// These are validation failures to surface to the end user. They are
/// never retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConstraintExceeded {
    #[error("Email address limit exceeded: {actual} addresses requested, at most {limit} allowed")]
    EmailAddressesCount { limit: i64, actual: u64 },

    #[error("Mailbox limit exceeded: {actual} mailboxes requested, at most {limit} allowed")]
    MailboxCount { limit: i64, actual: u64 },

    #[error("Forward limit exceeded: {actual} forwards requested, at most {limit} allowed")]
    ForwardCount { limit: i64, actual: u64 },

    #[error("Storage size {requested} of mailbox {address} is outside the allowed range {min_allowed} to {max_allowed}")]
    MailboxStorageSizeRange {
        address: String,
        requested: ByteSize,
        min_allowed: ByteSize,
        max_allowed: ByteSize,
    },
}

#[derive(Error, Debug)]
pub enum QuotaError {
    #[error(transparent)]
    ConstraintExceeded(#[from] ConstraintExceeded),

    #[error("Space not found: {0}")]
    SpaceNotFound(SpaceId),

    #[error("Mailbox not found: {0}")]
    MailboxNotFound(MailboxId),

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid byte size: {0}")]
    InvalidByteSize(String),

    #[error("Unknown plan: {0}")]
    UnknownPlan(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl QuotaError {
    /// The constraint violation behind this error, if it is one
    pub fn constraint_exceeded(&self) -> Option<&ConstraintExceeded> {
        match self {
            QuotaError::ConstraintExceeded(violation) => Some(violation),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, QuotaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_exceeded_message() {
        let err = ConstraintExceeded::MailboxCount { limit: 2, actual: 3 };
        assert_eq!(
            err.to_string(),
            "Mailbox limit exceeded: 3 mailboxes requested, at most 2 allowed"
        );

        let err = ConstraintExceeded::MailboxStorageSizeRange {
            address: "b@example.com".to_string(),
            requested: ByteSize::gib(60),
            min_allowed: ByteSize::gib(1),
            max_allowed: ByteSize::gib(40),
        };
        assert!(err.to_string().contains("60 GiB"));
        assert!(err.to_string().contains("1 GiB to 40 GiB"));
    }

    #[test]
    fn test_constraint_exceeded_is_transparent() {
        let err: QuotaError = ConstraintExceeded::ForwardCount { limit: 1, actual: 2 }.into();
        assert_eq!(
            err.to_string(),
            "Forward limit exceeded: 2 forwards requested, at most 1 allowed"
        );
        assert_eq!(
            err.constraint_exceeded(),
            Some(&ConstraintExceeded::ForwardCount { limit: 1, actual: 2 })
        );
    }

    #[test]
    fn test_not_found_is_not_a_violation() {
        let err = QuotaError::SpaceNotFound(SpaceId::new());
        assert!(err.constraint_exceeded().is_none());
    }
}
