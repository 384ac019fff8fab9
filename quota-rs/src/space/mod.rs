//! Spaces and the resources they own
//!
//! Provides the entities the engine reads and the collaborator traits it
//! reads them through:
//! - [`types`]: Space, Mailbox and Forward entities
//! - [`repository`]: repository, storage usage and metering traits
//! - [`memory`]: in-memory implementations of those traits

pub mod memory;
pub mod repository;
pub mod types;

pub use memory::{InMemoryForwards, InMemoryMailboxes, InMemorySpaces, InMemoryStorageUsage};
pub use repository::{
    ForwardRepository, MailboxRepository, SpaceRepository, StorageUsage, UnmeteredUsage,
    UsageMeteringProvider,
};
pub use types::{Forward, ForwardId, Mailbox, MailboxId, OwnerId, Space, SpaceId};
