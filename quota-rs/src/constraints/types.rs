use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::size::ByteSize;

/// Count limit meaning "no limit"
pub const UNLIMITED: i64 = -1;

/// Database engines a Space may be allowed to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DbEngine {
    Pgsql,
    Mysql,
}

/// Email limits of a Space
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailConstraints {
    /// Storage that mailboxes may allocate in total
    pub max_storage_size: ByteSize,
    /// Mailboxes plus forwards, -1 for unlimited
    pub maximum_address_count: i64,
    /// -1 for unlimited
    pub maximum_mailbox_count: i64,
    /// -1 for unlimited
    pub maximum_forward_count: i64,
    pub spam_filter_count: i64,
    pub mail_list_count: i64,
}

impl EmailConstraints {
    pub fn with_max_storage_size(self, max_storage_size: ByteSize) -> Self {
        EmailConstraints {
            max_storage_size,
            ..self
        }
    }

    pub fn with_maximum_address_count(self, maximum_address_count: i64) -> Self {
        EmailConstraints {
            maximum_address_count,
            ..self
        }
    }

    pub fn with_maximum_mailbox_count(self, maximum_mailbox_count: i64) -> Self {
        EmailConstraints {
            maximum_mailbox_count,
            ..self
        }
    }

    pub fn with_maximum_forward_count(self, maximum_forward_count: i64) -> Self {
        EmailConstraints {
            maximum_forward_count,
            ..self
        }
    }

    pub fn with_spam_filter_count(self, spam_filter_count: i64) -> Self {
        EmailConstraints {
            spam_filter_count,
            ..self
        }
    }

    pub fn with_mail_list_count(self, mail_list_count: i64) -> Self {
        EmailConstraints {
            mail_list_count,
            ..self
        }
    }

    /// Field-level override: every field of `other` wins.
    ///
    /// Count limits below the current usage are applied as-is.
    pub fn merge_from(&self, other: &EmailConstraints) -> EmailConstraints {
        EmailConstraints {
            max_storage_size: other.max_storage_size,
            maximum_address_count: other.maximum_address_count,
            maximum_mailbox_count: other.maximum_mailbox_count,
            maximum_forward_count: other.maximum_forward_count,
            spam_filter_count: other.spam_filter_count,
            mail_list_count: other.mail_list_count,
        }
    }
}

/// Database limits of a Space
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DbConstraints {
    pub provided_storage_size: ByteSize,
    pub maximum_amount_per_type: i64,
    pub enabled_engines: BTreeSet<DbEngine>,
}

impl DbConstraints {
    pub fn with_provided_storage_size(self, provided_storage_size: ByteSize) -> Self {
        DbConstraints {
            provided_storage_size,
            ..self
        }
    }

    pub fn with_maximum_amount_per_type(self, maximum_amount_per_type: i64) -> Self {
        DbConstraints {
            maximum_amount_per_type,
            ..self
        }
    }

    pub fn with_enabled_engines<I: IntoIterator<Item = DbEngine>>(self, engines: I) -> Self {
        DbConstraints {
            enabled_engines: engines.into_iter().collect(),
            ..self
        }
    }

    pub fn enable_engine(mut self, engine: DbEngine) -> Self {
        self.enabled_engines.insert(engine);
        self
    }

    pub fn disable_engine(mut self, engine: DbEngine) -> Self {
        self.enabled_engines.remove(&engine);
        self
    }

    pub fn is_engine_enabled(&self, engine: DbEngine) -> bool {
        self.enabled_engines.contains(&engine)
    }

    /// Field-level override: every field of `other` wins.
    pub fn merge_from(&self, other: &DbConstraints) -> DbConstraints {
        DbConstraints {
            provided_storage_size: other.provided_storage_size,
            maximum_amount_per_type: other.maximum_amount_per_type,
            enabled_engines: other.enabled_engines.clone(),
        }
    }
}

/// Quota configuration owned by exactly one Space
///
/// Values are never changed in place; every setter returns a new value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Constraints {
    /// Traffic per month in bytes, -1 for unlimited
    pub monthly_traffic: i64,
    /// Total storage of the Space (disk plus mailboxes)
    pub storage_size: ByteSize,
    pub email: EmailConstraints,
    pub database: DbConstraints,
}

impl Constraints {
    pub fn new(
        monthly_traffic: i64,
        storage_size: ByteSize,
        email: EmailConstraints,
        database: DbConstraints,
    ) -> Self {
        Constraints {
            monthly_traffic,
            storage_size,
            email,
            database,
        }
    }

    /// No limit on anything
    pub fn unlimited() -> Self {
        Constraints {
            monthly_traffic: UNLIMITED,
            storage_size: ByteSize::inf(),
            email: EmailConstraints {
                max_storage_size: ByteSize::inf(),
                maximum_address_count: UNLIMITED,
                maximum_mailbox_count: UNLIMITED,
                maximum_forward_count: UNLIMITED,
                spam_filter_count: UNLIMITED,
                mail_list_count: UNLIMITED,
            },
            database: DbConstraints {
                provided_storage_size: ByteSize::inf(),
                maximum_amount_per_type: UNLIMITED,
                enabled_engines: [DbEngine::Pgsql, DbEngine::Mysql].into_iter().collect(),
            },
        }
    }

    pub fn with_monthly_traffic(self, monthly_traffic: i64) -> Self {
        Constraints {
            monthly_traffic,
            ..self
        }
    }

    pub fn with_storage_size(self, storage_size: ByteSize) -> Self {
        Constraints {
            storage_size,
            ..self
        }
    }

    pub fn with_email(self, email: EmailConstraints) -> Self {
        Constraints { email, ..self }
    }

    pub fn with_database(self, database: DbConstraints) -> Self {
        Constraints { database, ..self }
    }

    /// Field-level override of every scalar and nested limit.
    ///
    /// `storage_size` is taken from `other` as well; callers that must not
    /// shrink storage below current usage go through
    /// [`crate::checker::ApplicabilityChecker`] instead.
    pub fn merge_from(&self, other: &Constraints) -> Constraints {
        Constraints {
            monthly_traffic: other.monthly_traffic,
            storage_size: other.storage_size,
            email: self.email.merge_from(&other.email),
            database: self.database.merge_from(&other.database),
        }
    }

    /// Structural equality, sizes compared by magnitude
    pub fn equals(&self, other: &Constraints) -> bool {
        self == other
    }

    pub fn is_traffic_unlimited(&self) -> bool {
        self.monthly_traffic == UNLIMITED
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basic() -> Constraints {
        Constraints::default()
            .with_monthly_traffic(100)
            .with_storage_size(ByteSize::gib(10))
            .with_email(
                EmailConstraints::default()
                    .with_max_storage_size(ByteSize::gib(5))
                    .with_maximum_address_count(10)
                    .with_maximum_mailbox_count(5)
                    .with_maximum_forward_count(5),
            )
            .with_database(
                DbConstraints::default()
                    .with_provided_storage_size(ByteSize::gib(1))
                    .with_maximum_amount_per_type(2)
                    .enable_engine(DbEngine::Pgsql),
            )
    }

    #[test]
    fn test_constraints_default() {
        let constraints = Constraints::default();
        assert_eq!(constraints.monthly_traffic, 0);
        assert!(constraints.storage_size.is_zero());
        assert_eq!(constraints.email.maximum_mailbox_count, 0);
        assert!(constraints.database.enabled_engines.is_empty());
    }

    #[test]
    fn test_setters_return_new_value() {
        let original = basic();
        let changed = original.clone().with_monthly_traffic(UNLIMITED);

        assert_eq!(original.monthly_traffic, 100);
        assert!(changed.is_traffic_unlimited());
        assert_ne!(original, changed);
    }

    #[test]
    fn test_equality_ignores_storage_unit() {
        let a = basic();
        let b = basic().with_storage_size(ByteSize::mib(10 * 1024));
        assert_eq!(a, b);
    }

    #[test]
    fn test_email_merge_from_overrides_every_field() {
        let current = basic().email;
        let proposed = EmailConstraints::default()
            .with_max_storage_size(ByteSize::gib(1))
            .with_maximum_address_count(UNLIMITED)
            .with_maximum_mailbox_count(1)
            .with_maximum_forward_count(0)
            .with_spam_filter_count(3)
            .with_mail_list_count(2);

        let merged = current.merge_from(&proposed);
        assert_eq!(merged, proposed);
    }

    #[test]
    fn test_db_engines() {
        let db = DbConstraints::default()
            .enable_engine(DbEngine::Mysql)
            .enable_engine(DbEngine::Pgsql)
            .disable_engine(DbEngine::Mysql);

        assert!(db.is_engine_enabled(DbEngine::Pgsql));
        assert!(!db.is_engine_enabled(DbEngine::Mysql));

        let merged = db.merge_from(&DbConstraints::default().with_enabled_engines([DbEngine::Mysql]));
        assert!(merged.is_engine_enabled(DbEngine::Mysql));
        assert!(!merged.is_engine_enabled(DbEngine::Pgsql));
    }

    #[test]
    fn test_merge_from_takes_incoming_storage() {
        let merged = basic().merge_from(&basic().with_storage_size(ByteSize::gib(1)));
        assert_eq!(merged.storage_size, ByteSize::gib(1));
    }

    #[test]
    fn test_unlimited() {
        let constraints = Constraints::unlimited();
        assert!(constraints.storage_size.is_inf());
        assert_eq!(constraints.email.maximum_mailbox_count, UNLIMITED);
        assert!(constraints.database.is_engine_enabled(DbEngine::Mysql));
    }

    #[test]
    fn test_deserialize_partial() {
        let constraints: Constraints = toml::from_str(
            r#"
            monthly_traffic = -1
            storage_size = "50 GiB"

            [email]
            max_storage_size = "20 GiB"
            maximum_mailbox_count = 10

            [database]
            enabled_engines = ["pgsql"]
            "#,
        )
        .unwrap();

        assert!(constraints.is_traffic_unlimited());
        assert_eq!(constraints.storage_size, ByteSize::gib(50));
        assert_eq!(constraints.email.max_storage_size, ByteSize::gib(20));
        assert_eq!(constraints.email.maximum_mailbox_count, 10);
        assert_eq!(constraints.email.maximum_forward_count, 0);
        assert!(constraints.database.is_engine_enabled(DbEngine::Pgsql));
    }
}
