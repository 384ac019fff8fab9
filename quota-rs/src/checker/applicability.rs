//! Applying new constraints to an existing Space
//!
//! When an operator changes a Space's plan, the requested constraints are
//! adapted so they never invalidate storage the Space already consumes.
//! Count limits and traffic are applied as requested, even below current
//! usage.

use std::sync::Arc;
use tracing::{debug, info};

use crate::constraints::Constraints;
use crate::error::Result;
use crate::size::ByteSize;
use crate::space::{MailboxRepository, SpaceId, SpaceRepository, StorageUsage};

pub struct ApplicabilityChecker {
    spaces: Arc<dyn SpaceRepository>,
    mailboxes: Arc<dyn MailboxRepository>,
    storage_usage: Arc<dyn StorageUsage>,
}

impl ApplicabilityChecker {
    pub fn new(
        spaces: Arc<dyn SpaceRepository>,
        mailboxes: Arc<dyn MailboxRepository>,
        storage_usage: Arc<dyn StorageUsage>,
    ) -> Self {
        ApplicabilityChecker {
            spaces,
            mailboxes,
            storage_usage,
        }
    }

    /// Constraints to store on the Space in place of `proposed`.
    ///
    /// Nothing is persisted here; the caller replaces the Space's
    /// constraints with the returned value.
    pub async fn get_applicable(&self, space_id: SpaceId, proposed: Constraints) -> Result<Constraints> {
        let space = self.spaces.get(space_id).await?;
        let current = space.constraints();

        if proposed.equals(current) {
            debug!(space_id = %space_id, "Proposed constraints equal current ones");
            return Ok(current.clone());
        }

        let storage_size = self
            .compute_maximum_storage_size(space_id, current, &proposed)
            .await?;

        let applicable = current
            .clone()
            .with_monthly_traffic(proposed.monthly_traffic)
            .with_email(current.email.merge_from(&proposed.email))
            .with_database(current.database.merge_from(&proposed.database))
            .with_storage_size(storage_size);

        debug!(
            space_id = %space_id,
            storage_size = %applicable.storage_size,
            monthly_traffic = applicable.monthly_traffic,
            "Computed applicable constraints"
        );
        Ok(applicable)
    }

    async fn compute_maximum_storage_size(
        &self,
        space_id: SpaceId,
        current: &Constraints,
        proposed: &Constraints,
    ) -> Result<ByteSize> {
        if proposed.storage_size.greater_than_or_equal_to(&current.storage_size) {
            return Ok(proposed.storage_size);
        }

        let mailbox_sizes: ByteSize = self
            .mailboxes
            .all_by_space(space_id)
            .await?
            .iter()
            .map(|mailbox| mailbox.size)
            .sum();
        let usage = self
            .storage_usage
            .disk_usage_of(space_id)
            .await?
            .increase(&mailbox_sizes);

        if proposed.storage_size.less_than(&usage) {
            let clamped = usage.increase(&proposed.storage_size.one_unit());
            info!(
                space_id = %space_id,
                requested = %proposed.storage_size,
                usage = %usage,
                applied = %clamped,
                "Storage size kept above current usage"
            );
            return Ok(clamped);
        }

        Ok(proposed.storage_size)
    }
}
