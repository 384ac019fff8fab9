//! Admission control for new and resized Space resources
//!
//! Command handlers call [`ConstraintsChecker`] before persisting a new
//! mailbox or forward, or a mailbox resize. A rejected check returns
//! [`ConstraintExceeded`] and nothing of the request may be applied.

use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::constraints::{EmailConstraints, UNLIMITED};
use crate::error::{ConstraintExceeded, Result};
use crate::size::ByteSize;
use crate::space::{
    ForwardRepository, MailboxId, MailboxRepository, SpaceId, SpaceRepository,
    UsageMeteringProvider,
};

/// Admission gate checking proposed changes against a Space's constraints
pub struct ConstraintsChecker {
    spaces: Arc<dyn SpaceRepository>,
    mailboxes: Arc<dyn MailboxRepository>,
    forwards: Arc<dyn ForwardRepository>,
    metering: Arc<dyn UsageMeteringProvider>,
    platform_available_storage: ByteSize,
}

impl ConstraintsChecker {
    pub fn new(
        spaces: Arc<dyn SpaceRepository>,
        mailboxes: Arc<dyn MailboxRepository>,
        forwards: Arc<dyn ForwardRepository>,
        metering: Arc<dyn UsageMeteringProvider>,
        platform_available_storage: ByteSize,
    ) -> Self {
        ConstraintsChecker {
            spaces,
            mailboxes,
            forwards,
            metering,
            platform_available_storage,
        }
    }

    /// Check that new mailboxes may be created in a Space.
    ///
    /// `proposed` pairs each address with the storage it asks for. Order
    /// matters: every mailbox reserves its share of the storage budget
    /// before the next one is checked, and the first one that no longer
    /// fits is reported.
    pub async fn allow_new_mailbox(
        &self,
        space_id: SpaceId,
        proposed: &[(String, ByteSize)],
    ) -> Result<()> {
        let space = self.spaces.get(space_id).await?;
        let email = &space.constraints().email;
        let mailbox_count = self.mailboxes.count_by_space(space_id).await?;

        self.check_address_count(space_id, email, mailbox_count, proposed.len() as u64)
            .await?;

        // Either limit being unlimited admits the whole batch, size included.
        if email.maximum_address_count == UNLIMITED || email.maximum_mailbox_count == UNLIMITED {
            debug!(
                space_id = %space_id,
                requested = proposed.len(),
                "Mailboxes admitted, no mailbox limit"
            );
            return Ok(());
        }

        let total = mailbox_count.saturating_add(proposed.len() as u64);
        if exceeds(email.maximum_mailbox_count, total) {
            warn!(
                space_id = %space_id,
                limit = email.maximum_mailbox_count,
                actual = total,
                "Mailbox limit exceeded"
            );
            return Err(ConstraintExceeded::MailboxCount {
                limit: email.maximum_mailbox_count,
                actual: total,
            }
            .into());
        }

        let mut budget = self.storage_budget(email);
        for (address, size) in proposed {
            if size.greater_than(&budget) {
                warn!(
                    space_id = %space_id,
                    address = %address,
                    requested = %size,
                    available = %budget,
                    "Mailbox storage does not fit remaining budget"
                );
                return Err(ConstraintExceeded::MailboxStorageSizeRange {
                    address: address.clone(),
                    requested: *size,
                    min_allowed: minimum_size(size),
                    max_allowed: budget,
                }
                .into());
            }

            budget = budget.decrease(size);
        }

        debug!(
            space_id = %space_id,
            requested = proposed.len(),
            remaining = %budget,
            "Mailboxes admitted"
        );
        Ok(())
    }

    /// Check that new email forwards may be created in a Space.
    ///
    /// Forwards take no storage, only the count limits apply.
    pub async fn allow_new_email_forward(
        &self,
        space_id: SpaceId,
        proposed: &HashSet<String>,
    ) -> Result<()> {
        let space = self.spaces.get(space_id).await?;
        let email = &space.constraints().email;
        let mailbox_count = self.mailboxes.count_by_space(space_id).await?;

        self.check_address_count(space_id, email, mailbox_count, proposed.len() as u64)
            .await?;

        if email.maximum_address_count == UNLIMITED || email.maximum_forward_count == UNLIMITED {
            debug!(
                space_id = %space_id,
                requested = proposed.len(),
                "Forwards admitted, no forward limit"
            );
            return Ok(());
        }

        let total = self
            .forwards
            .count_by_space(space_id)
            .await?
            .saturating_add(proposed.len() as u64);
        if exceeds(email.maximum_forward_count, total) {
            warn!(
                space_id = %space_id,
                limit = email.maximum_forward_count,
                actual = total,
                "Forward limit exceeded"
            );
            return Err(ConstraintExceeded::ForwardCount {
                limit: email.maximum_forward_count,
                actual: total,
            }
            .into());
        }

        debug!(space_id = %space_id, requested = proposed.len(), "Forwards admitted");
        Ok(())
    }

    /// Check that a mailbox may be resized to `new_size`.
    ///
    /// The new size must fit the storage budget and may not drop below what
    /// the mailbox already stores.
    pub async fn allow_mailbox_size(&self, mailbox_id: MailboxId, new_size: ByteSize) -> Result<()> {
        let mailbox = self.mailboxes.get(mailbox_id).await?;
        let space = self.spaces.get(mailbox.space_id).await?;

        if new_size.equals(&mailbox.size) {
            return Ok(());
        }

        let budget = self.storage_budget(&space.constraints().email);
        let minimum = minimum_size(&new_size).max(mailbox.used);

        if new_size.greater_than(&budget) || new_size.less_than(&mailbox.used) {
            warn!(
                space_id = %mailbox.space_id,
                mailbox_id = %mailbox_id,
                requested = %new_size,
                used = %mailbox.used,
                available = %budget,
                "Mailbox resize out of range"
            );
            return Err(ConstraintExceeded::MailboxStorageSizeRange {
                address: mailbox.address,
                requested: new_size,
                min_allowed: minimum,
                max_allowed: budget,
            }
            .into());
        }

        debug!(mailbox_id = %mailbox_id, size = %new_size, "Mailbox resize admitted");
        Ok(())
    }

    /// Whether the Space stores more than it may, as reported by metering
    pub async fn is_storage_size_exceeded(&self, space_id: SpaceId) -> Result<bool> {
        self.metering.storage_size_exceeded(space_id).await
    }

    /// Whether the Space used more traffic this month than it may, as
    /// reported by metering
    pub async fn is_traffic_quota_exceeded(&self, space_id: SpaceId) -> Result<bool> {
        self.metering.traffic_quota_exceeded(space_id).await
    }

    async fn check_address_count(
        &self,
        space_id: SpaceId,
        email: &EmailConstraints,
        mailbox_count: u64,
        requested: u64,
    ) -> Result<()> {
        if email.maximum_address_count == UNLIMITED {
            return Ok(());
        }

        let total = mailbox_count
            .saturating_add(self.forwards.count_by_space(space_id).await?)
            .saturating_add(requested);
        if exceeds(email.maximum_address_count, total) {
            warn!(
                space_id = %space_id,
                limit = email.maximum_address_count,
                actual = total,
                "Email address limit exceeded"
            );
            return Err(ConstraintExceeded::EmailAddressesCount {
                limit: email.maximum_address_count,
                actual: total,
            }
            .into());
        }

        Ok(())
    }

    fn storage_budget(&self, email: &EmailConstraints) -> ByteSize {
        email.max_storage_size.min(self.platform_available_storage)
    }
}

/// Whether `total` goes over `limit`; any negative limit other than
/// [`UNLIMITED`] admits nothing.
fn exceeds(limit: i64, total: u64) -> bool {
    u64::try_from(limit).map_or(true, |limit| total > limit)
}

/// Smallest size a mailbox may be given: one of the requested unit
fn minimum_size(requested: &ByteSize) -> ByteSize {
    requested.one_unit()
}
