use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::constraints::Constraints;
use crate::size::ByteSize;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a new random id
            pub fn new() -> Self {
                $name(Uuid::new_v4())
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                $name(id)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

entity_id!(
    /// Identifier of a Space
    SpaceId
);
entity_id!(
    /// Identifier of the account owning a Space
    OwnerId
);
entity_id!(
    /// Identifier of a mailbox
    MailboxId
);
entity_id!(
    /// Identifier of an email forward
    ForwardId
);

/// Tenant aggregate owning hosted resources and exactly one [`Constraints`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Space {
    pub id: SpaceId,
    pub owner_id: OwnerId,
    constraints: Constraints,
}

impl Space {
    /// Register a new Space with the constraints of a plan or custom ones
    pub fn register(id: SpaceId, owner_id: OwnerId, constraints: Constraints) -> Self {
        Space {
            id,
            owner_id,
            constraints,
        }
    }

    pub fn constraints(&self) -> &Constraints {
        &self.constraints
    }

    /// Replace the constraints as a whole.
    ///
    /// Pass the value returned by
    /// [`ApplicabilityChecker::get_applicable`](crate::checker::ApplicabilityChecker::get_applicable).
    pub fn change_constraints(&mut self, constraints: Constraints) {
        self.constraints = constraints;
    }
}

/// Mailbox belonging to a Space
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mailbox {
    pub id: MailboxId,
    pub space_id: SpaceId,
    pub address: String,
    /// Allocated storage
    pub size: ByteSize,
    /// Storage already taken by stored mail
    pub used: ByteSize,
}

impl Mailbox {
    pub fn new(space_id: SpaceId, address: impl Into<String>, size: ByteSize) -> Self {
        Mailbox {
            id: MailboxId::new(),
            space_id,
            address: address.into(),
            size,
            used: ByteSize::zero(),
        }
    }

    pub fn with_used(self, used: ByteSize) -> Self {
        Mailbox { used, ..self }
    }
}

/// Email forward belonging to a Space; takes no storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Forward {
    pub id: ForwardId,
    pub space_id: SpaceId,
    pub address: String,
    pub destination: String,
}

impl Forward {
    pub fn new(space_id: SpaceId, address: impl Into<String>, destination: impl Into<String>) -> Self {
        Forward {
            id: ForwardId::new(),
            space_id,
            address: address.into(),
            destination: destination.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(SpaceId::new(), SpaceId::new());
    }

    #[test]
    fn test_id_display_matches_uuid() {
        let uuid = Uuid::new_v4();
        assert_eq!(SpaceId::from(uuid).to_string(), uuid.to_string());
    }

    #[test]
    fn test_change_constraints_replaces_whole_value() {
        let mut space = Space::register(SpaceId::new(), OwnerId::new(), Constraints::default());
        space.change_constraints(Constraints::unlimited());
        assert_eq!(space.constraints(), &Constraints::unlimited());
    }

    #[test]
    fn test_new_mailbox_is_empty() {
        let mailbox = Mailbox::new(SpaceId::new(), "info@example.com", ByteSize::gib(1));
        assert!(mailbox.used.is_zero());

        let mailbox = mailbox.with_used(ByteSize::mib(300));
        assert_eq!(mailbox.used, ByteSize::mib(300));
    }
}
