//! Integration tests for applying changed constraints to a Space

use quota_rs::constraints::{DbEngine, UNLIMITED};
use quota_rs::space::{
    InMemoryMailboxes, InMemorySpaces, InMemoryStorageUsage, Mailbox, OwnerId, Space, SpaceId,
    SpaceRepository,
};
use quota_rs::{ApplicabilityChecker, ByteSize, Config, Constraints, DbConstraints, EmailConstraints, QuotaError};
use std::sync::Arc;

struct TestSetup {
    spaces: InMemorySpaces,
    mailboxes: InMemoryMailboxes,
    usage: InMemoryStorageUsage,
    checker: ApplicabilityChecker,
}

fn setup() -> TestSetup {
    let spaces = InMemorySpaces::new();
    let mailboxes = InMemoryMailboxes::new();
    let usage = InMemoryStorageUsage::new();

    let checker = ApplicabilityChecker::new(
        Arc::new(spaces.clone()),
        Arc::new(mailboxes.clone()),
        Arc::new(usage.clone()),
    );

    TestSetup {
        spaces,
        mailboxes,
        usage,
        checker,
    }
}

fn current_plan() -> Constraints {
    Constraints::default()
        .with_monthly_traffic(1000)
        .with_storage_size(ByteSize::gib(50))
        .with_email(
            EmailConstraints::default()
                .with_max_storage_size(ByteSize::gib(40))
                .with_maximum_address_count(20)
                .with_maximum_mailbox_count(10)
                .with_maximum_forward_count(10),
        )
        .with_database(
            DbConstraints::default()
                .with_provided_storage_size(ByteSize::gib(5))
                .with_maximum_amount_per_type(3)
                .enable_engine(DbEngine::Mysql),
        )
}

async fn register_space(setup: &TestSetup, constraints: Constraints) -> SpaceId {
    let space = Space::register(SpaceId::new(), OwnerId::new(), constraints);
    let id = space.id;
    setup.spaces.save(space).await;
    id
}

#[tokio::test]
async fn test_same_constraints_returned_unchanged() {
    let setup = setup();
    let space_id = register_space(&setup, current_plan()).await;

    let applicable = setup
        .checker
        .get_applicable(space_id, current_plan())
        .await
        .unwrap();

    assert!(applicable.equals(&current_plan()));
}

#[tokio::test]
async fn test_downgrade_below_usage_keeps_usage() {
    let setup = setup();
    let space_id = register_space(&setup, current_plan()).await;
    setup.usage.set_usage(space_id, ByteSize::gib(8)).await;
    setup
        .mailboxes
        .save(Mailbox::new(space_id, "a@example.com", ByteSize::gib(25)))
        .await;
    setup
        .mailboxes
        .save(Mailbox::new(space_id, "b@example.com", ByteSize::gib(15)))
        .await;

    let proposed = current_plan().with_storage_size(ByteSize::gib(10));
    let applicable = setup.checker.get_applicable(space_id, proposed).await.unwrap();

    assert_eq!(applicable.storage_size, ByteSize::gib(49));
}

#[tokio::test]
async fn test_downgrade_counts_applied_strictly() {
    let setup = setup();
    let space_id = register_space(&setup, current_plan()).await;
    for i in 0..8 {
        setup
            .mailboxes
            .save(Mailbox::new(space_id, format!("u{}@example.com", i), ByteSize::mib(100)))
            .await;
    }

    let proposed = current_plan()
        .with_monthly_traffic(10)
        .with_email(current_plan().email.with_maximum_mailbox_count(2))
        .with_database(DbConstraints::default().enable_engine(DbEngine::Pgsql));
    let applicable = setup.checker.get_applicable(space_id, proposed).await.unwrap();

    assert_eq!(applicable.monthly_traffic, 10);
    assert_eq!(applicable.email.maximum_mailbox_count, 2);
    assert!(applicable.database.is_engine_enabled(DbEngine::Pgsql));
    assert!(!applicable.database.is_engine_enabled(DbEngine::Mysql));
    assert_eq!(applicable.database.maximum_amount_per_type, 0);
    assert_eq!(applicable.storage_size, ByteSize::gib(50));
}

#[tokio::test]
async fn test_upgrade_to_unlimited() {
    let setup = setup();
    let space_id = register_space(&setup, current_plan()).await;

    let applicable = setup
        .checker
        .get_applicable(space_id, Constraints::unlimited())
        .await
        .unwrap();

    assert_eq!(applicable, Constraints::unlimited());
    assert_eq!(applicable.monthly_traffic, UNLIMITED);
}

#[tokio::test]
async fn test_unlimited_space_downgrade_uses_usage() {
    let setup = setup();
    let space_id = register_space(&setup, Constraints::unlimited()).await;
    setup.usage.set_usage(space_id, ByteSize::gib(30)).await;

    let applicable = setup
        .checker
        .get_applicable(space_id, current_plan().with_storage_size(ByteSize::gib(20)))
        .await
        .unwrap();

    assert_eq!(applicable.storage_size, ByteSize::gib(31));
}

#[tokio::test]
async fn test_unknown_space() {
    let setup = setup();
    let missing = SpaceId::new();

    let err = setup
        .checker
        .get_applicable(missing, current_plan())
        .await
        .unwrap_err();

    assert!(matches!(err, QuotaError::SpaceNotFound(id) if id == missing));
}

#[tokio::test]
async fn test_plan_change_from_catalog() {
    let setup = setup();
    let config: Config = toml::from_str(
        r#"
        [plans.starter]
        monthly_traffic = 100
        storage_size = "5 GiB"

        [plans.starter.email]
        max_storage_size = "5 GiB"
        maximum_address_count = 5
        maximum_mailbox_count = 5
        maximum_forward_count = 5
        "#,
    )
    .unwrap();
    let catalog = config.plan_catalog();

    let space_id = register_space(&setup, current_plan()).await;
    setup.usage.set_usage(space_id, ByteSize::gib(7)).await;

    let applicable = setup
        .checker
        .get_applicable(space_id, catalog.get("starter").unwrap())
        .await
        .unwrap();

    let mut space = setup.spaces.get(space_id).await.unwrap();
    space.change_constraints(applicable);
    setup.spaces.save(space).await;

    let stored = setup.spaces.get(space_id).await.unwrap();
    assert_eq!(stored.constraints().storage_size, ByteSize::gib(8));
    assert_eq!(stored.constraints().email.maximum_mailbox_count, 5);
    assert_eq!(stored.constraints().monthly_traffic, 100);
}
