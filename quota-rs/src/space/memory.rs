//! In-memory collaborators
//!
//! Backed by `tokio::sync::RwLock` maps. Useful for embedding the engine
//! without a database and for tests; nothing here is durable.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::repository::{ForwardRepository, MailboxRepository, SpaceRepository, StorageUsage};
use super::types::{Forward, ForwardId, Mailbox, MailboxId, Space, SpaceId};
use crate::error::{QuotaError, Result};
use crate::size::ByteSize;

/// In-memory Space store
#[derive(Debug, Clone, Default)]
pub struct InMemorySpaces {
    spaces: Arc<RwLock<HashMap<SpaceId, Space>>>,
}

impl InMemorySpaces {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a Space
    pub async fn save(&self, space: Space) {
        let mut spaces = self.spaces.write().await;
        spaces.insert(space.id, space);
    }

    pub async fn remove(&self, id: SpaceId) -> Option<Space> {
        let mut spaces = self.spaces.write().await;
        spaces.remove(&id)
    }

    pub async fn len(&self) -> usize {
        self.spaces.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.spaces.read().await.is_empty()
    }
}

#[async_trait]
impl SpaceRepository for InMemorySpaces {
    async fn get(&self, id: SpaceId) -> Result<Space> {
        let spaces = self.spaces.read().await;
        spaces.get(&id).cloned().ok_or(QuotaError::SpaceNotFound(id))
    }
}

/// In-memory mailbox store
#[derive(Debug, Clone, Default)]
pub struct InMemoryMailboxes {
    mailboxes: Arc<RwLock<HashMap<MailboxId, Mailbox>>>,
}

impl InMemoryMailboxes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a mailbox
    pub async fn save(&self, mailbox: Mailbox) {
        let mut mailboxes = self.mailboxes.write().await;
        mailboxes.insert(mailbox.id, mailbox);
    }

    pub async fn remove(&self, id: MailboxId) -> Option<Mailbox> {
        let mut mailboxes = self.mailboxes.write().await;
        mailboxes.remove(&id)
    }
}

#[async_trait]
impl MailboxRepository for InMemoryMailboxes {
    async fn get(&self, id: MailboxId) -> Result<Mailbox> {
        let mailboxes = self.mailboxes.read().await;
        mailboxes.get(&id).cloned().ok_or(QuotaError::MailboxNotFound(id))
    }

    async fn count_by_space(&self, space_id: SpaceId) -> Result<u64> {
        let mailboxes = self.mailboxes.read().await;
        Ok(mailboxes.values().filter(|m| m.space_id == space_id).count() as u64)
    }

    async fn all_by_space(&self, space_id: SpaceId) -> Result<Vec<Mailbox>> {
        let mailboxes = self.mailboxes.read().await;
        Ok(mailboxes
            .values()
            .filter(|m| m.space_id == space_id)
            .cloned()
            .collect())
    }
}

/// In-memory forward store
#[derive(Debug, Clone, Default)]
pub struct InMemoryForwards {
    forwards: Arc<RwLock<HashMap<ForwardId, Forward>>>,
}

impl InMemoryForwards {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a forward
    pub async fn save(&self, forward: Forward) {
        let mut forwards = self.forwards.write().await;
        forwards.insert(forward.id, forward);
    }

    pub async fn remove(&self, id: ForwardId) -> Option<Forward> {
        let mut forwards = self.forwards.write().await;
        forwards.remove(&id)
    }
}

#[async_trait]
impl ForwardRepository for InMemoryForwards {
    async fn count_by_space(&self, space_id: SpaceId) -> Result<u64> {
        let forwards = self.forwards.read().await;
        Ok(forwards.values().filter(|f| f.space_id == space_id).count() as u64)
    }
}

/// Disk usage per Space set by hand; unknown Spaces use nothing
#[derive(Debug, Clone, Default)]
pub struct InMemoryStorageUsage {
    usage: Arc<RwLock<HashMap<SpaceId, ByteSize>>>,
}

impl InMemoryStorageUsage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_usage(&self, space_id: SpaceId, usage: ByteSize) {
        let mut all = self.usage.write().await;
        all.insert(space_id, usage);
    }
}

#[async_trait]
impl StorageUsage for InMemoryStorageUsage {
    async fn disk_usage_of(&self, space_id: SpaceId) -> Result<ByteSize> {
        let all = self.usage.read().await;
        Ok(all.get(&space_id).copied().unwrap_or_default())
    }
}
