//! Collaborators the engine reads Space state through
//!
//! The engine only reads. Persisting a Space, mailbox or forward after an
//! admission check passed is up to the caller, as is serializing
//! concurrent mutations of the same Space: two checks running side by side
//! can both see a count below the limit and both pass.

use async_trait::async_trait;

use super::types::{Mailbox, MailboxId, Space, SpaceId};
use crate::error::Result;
use crate::size::ByteSize;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpaceRepository: Send + Sync {
    /// Load a Space, failing with [`QuotaError::SpaceNotFound`](crate::QuotaError::SpaceNotFound)
    async fn get(&self, id: SpaceId) -> Result<Space>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MailboxRepository: Send + Sync {
    /// Load a mailbox, failing with [`QuotaError::MailboxNotFound`](crate::QuotaError::MailboxNotFound)
    async fn get(&self, id: MailboxId) -> Result<Mailbox>;

    async fn count_by_space(&self, space_id: SpaceId) -> Result<u64>;

    async fn all_by_space(&self, space_id: SpaceId) -> Result<Vec<Mailbox>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ForwardRepository: Send + Sync {
    async fn count_by_space(&self, space_id: SpaceId) -> Result<u64>;
}

/// Platform disk usage of a Space outside its mailbox allocations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StorageUsage: Send + Sync {
    async fn disk_usage_of(&self, space_id: SpaceId) -> Result<ByteSize>;
}

/// Storage and traffic metering of a Space
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsageMeteringProvider: Send + Sync {
    async fn storage_size_exceeded(&self, space_id: SpaceId) -> Result<bool>;

    async fn traffic_quota_exceeded(&self, space_id: SpaceId) -> Result<bool>;
}

/// Metering provider for platforms without usage metering.
///
/// Never reports a quota as exceeded.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnmeteredUsage;

#[async_trait]
impl UsageMeteringProvider for UnmeteredUsage {
    async fn storage_size_exceeded(&self, _space_id: SpaceId) -> Result<bool> {
        Ok(false)
    }

    async fn traffic_quota_exceeded(&self, _space_id: SpaceId) -> Result<bool> {
        Ok(false)
    }
}
