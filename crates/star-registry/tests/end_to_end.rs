//! End-to-end tests: request → validate → register over real stores.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use star_registry::core::{Ed25519Verifier, Keypair, ManualClock, StarRecord, StarRegistration};
use star_registry::store::{MemoryStore, SqliteStore, Store};
use star_registry::validation::{WindowConfig, WindowError};
use star_registry::{ErrorKind, Registry, RegistryConfig, RegistryError};
use star_registry_testkit::{multi_party_fixtures, sample_star, TestFixture, FIXTURE_EPOCH};
use tamper::overwrite_hash;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Helpers for rewriting stored records behind the ledger's back.
mod tamper {
    use star_registry::core::{canonical_bytes, decode_block};
    use star_registry::store::Store;

    /// Replace the stored hash of the block at `height`, leaving its contents.
    pub async fn overwrite_hash<S: Store>(store: &S, height: u64, hash: &str) {
        let bytes = store.get(height).await.unwrap().unwrap();
        let mut block = decode_block(&bytes).unwrap();
        block.hash = hash.to_string();
        store
            .put(height, canonical_bytes(&block).into())
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn test_full_registration_flow() -> Result<()> {
    init_tracing();
    let fixture = TestFixture::with_seed([1u8; 32]);
    let registry = fixture.registry().await?;
    let address = fixture.address();

    let genesis = registry.block(0).await?;
    assert_eq!(genesis.previous_block_hash, "");
    assert_eq!(registry.height().await?, 1);

    let ticket = registry.request_validation(&address)?;
    assert_eq!(ticket.address, address);
    assert_eq!(
        ticket.message,
        format!("{}:{}:starRegistry", address, FIXTURE_EPOCH)
    );
    assert_eq!(ticket.validation_window, 300);

    fixture.clock.advance(12);
    let grant = registry.validate_signature(&address, &fixture.sign(&ticket.message))?;
    assert!(grant.register_star);
    assert_eq!(grant.status.message_signature, "valid");
    assert_eq!(grant.remaining(), 288);

    let block = registry
        .register_star(&fixture.registration("Found star using https://www.google.com/sky/"))
        .await?;
    assert_eq!(block.height, 1);
    assert_eq!(block.previous_block_hash, genesis.hash);
    assert_eq!(
        block.body.star.story_decoded,
        "Found star using https://www.google.com/sky/"
    );
    assert_eq!(block.body.star.record.magnitude.as_deref(), Some("1.06"));

    let json = serde_json::to_value(&block)?;
    assert_eq!(json["body"]["star"]["con"], "Scorpius");
    assert_eq!(
        json["body"]["star"]["storyDecoded"],
        "Found star using https://www.google.com/sky/"
    );
    let grant_json = serde_json::to_value(&grant)?;
    assert_eq!(grant_json["status"]["validationWindow"], 288);

    assert!(registry.verify_chain().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_one_grant_one_registration() -> Result<()> {
    let fixture = TestFixture::with_seed([2u8; 32]);
    let registry = fixture.registry().await?;
    let registration = fixture.registration("only once");

    let err = registry.register_star(&registration).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(matches!(err, RegistryError::NotValidated(_)));

    fixture.validate(&registry)?;
    registry.register_star(&registration).await?;

    let err = registry.register_star(&registration).await.unwrap_err();
    assert!(matches!(err, RegistryError::NotValidated(_)));

    // A fresh validation allows exactly one more.
    fixture.validate(&registry)?;
    registry.register_star(&registration).await?;
    assert_eq!(registry.height().await?, 3);
    Ok(())
}

#[tokio::test]
async fn test_invalid_input_keeps_grant() -> Result<()> {
    let fixture = TestFixture::with_seed([3u8; 32]);
    let registry = fixture.registry().await?;
    fixture.validate(&registry)?;

    let mut registration = fixture.registration("x");
    registration.star.story = "x".repeat(501);
    let err = registry.register_star(&registration).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(registry.window().has_grant(&fixture.address()));

    registration.star.story = "x".repeat(500);
    registry.register_star(&registration).await?;
    assert!(!registry.window().has_grant(&fixture.address()));
    Ok(())
}

#[tokio::test]
async fn test_expired_ticket_cannot_be_validated() -> Result<()> {
    let fixture = TestFixture::with_seed([4u8; 32]);
    let registry = fixture.registry().await?;
    let address = fixture.address();

    let ticket = registry.request_validation(&address)?;
    fixture.clock.advance(301);

    let err = registry
        .validate_signature(&address, &fixture.sign(&ticket.message))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(matches!(
        err,
        RegistryError::Window(WindowError::NoPendingTicket(_))
    ));
    Ok(())
}

#[tokio::test]
async fn test_wrong_key_is_rejected() -> Result<()> {
    let fixture = TestFixture::with_seed([5u8; 32]);
    let registry = fixture.registry().await?;
    let address = fixture.address();
    let mallory = Keypair::from_seed(&[6u8; 32]);

    let ticket = registry.request_validation(&address)?;
    let err = registry
        .validate_signature(&address, &mallory.sign_message(&ticket.message))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    registry.validate_signature(&address, &fixture.sign(&ticket.message))?;
    Ok(())
}

#[tokio::test]
async fn test_lookups_by_address_and_hash() -> Result<()> {
    let parties = multi_party_fixtures(2);
    let (alice, bob) = (&parties[0], &parties[1]);
    let registry = alice.registry().await?;

    for story in ["first", "second"] {
        alice.validate(&registry)?;
        registry.register_star(&alice.registration(story)).await?;
    }
    bob.validate(&registry)?;
    let bobs = registry.register_star(&bob.registration("bob's")).await?;

    let stars = registry.stars_by_address(&alice.address()).await?;
    let stories: Vec<_> = stars.iter().map(|b| b.body.star.story_decoded.as_str()).collect();
    assert_eq!(stories, vec!["first", "second"]);

    assert_eq!(registry.star_by_hash(&bobs.hash).await?, bobs);

    let err = registry.stars_by_address("nobody").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    let err = registry.star_by_hash("nothing").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    let err = registry.block(99).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    Ok(())
}

#[tokio::test]
async fn test_sequential_appends_link_up() -> Result<()> {
    let fixture = TestFixture::with_seed([7u8; 32]);
    let registry = fixture.registry().await?;
    let ledger = registry.ledger();

    for i in 0..10 {
        ledger
            .append(&fixture.address(), fixture.registration(&format!("{}", i)).to_record())
            .await?;
    }

    assert_eq!(ledger.height().await?, 11);
    for h in 1..=10 {
        let block = ledger.get_by_height(h).await?;
        let previous = ledger.get_by_height(h - 1).await?;
        assert_eq!(block.previous_block_hash, previous.hash);
    }
    assert!(ledger.verify_block(0).await?);
    Ok(())
}

#[tokio::test]
async fn test_corrupted_hash_is_reported_twice() -> Result<()> {
    let fixture = TestFixture::with_seed([8u8; 32]);
    let registry = fixture.registry().await?;
    let ledger = registry.ledger();
    for i in 0..4 {
        ledger
            .append(&fixture.address(), fixture.registration(&format!("{}", i)).to_record())
            .await?;
    }

    overwrite_hash(ledger.store(), 2, &"f".repeat(64)).await;
    assert_eq!(registry.verify_chain().await?, vec![2, 2]);

    // The tip has no successor, so only its hash check fails.
    overwrite_hash(ledger.store(), 4, &"e".repeat(64)).await;
    let report = ledger.verify_chain_report().await?;
    assert_eq!(report.invalid_blocks, vec![2, 4]);
    assert_eq!(report.broken_links, vec![2]);
    Ok(())
}

#[tokio::test]
async fn test_concurrent_appends_stay_contiguous() -> Result<()> {
    let fixture = TestFixture::with_seed([9u8; 32]);
    let registry = Arc::new(fixture.registry().await?);

    let mut tasks = Vec::new();
    for i in 0..32 {
        let registry = Arc::clone(&registry);
        let address = fixture.address();
        tasks.push(tokio::spawn(async move {
            registry
                .ledger()
                .append(&address, StarRecord::new("ra", "dec", &format!("#{}", i)))
                .await
        }));
    }

    let mut heights = Vec::new();
    for task in tasks {
        heights.push(task.await??.height);
    }
    heights.sort_unstable();
    assert_eq!(heights, (1..=32).collect::<Vec<u64>>());
    assert_eq!(registry.height().await?, 33);
    assert!(registry.verify_chain().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_reaper_sweeps_abandoned_tickets() -> Result<()> {
    let fixture = TestFixture::with_seed([10u8; 32]);
    let registry = fixture
        .registry_with(RegistryConfig::default().reaper_interval(Duration::from_millis(10)))
        .await?;

    registry.request_validation("abandoned")?;
    fixture.clock.advance(301);

    for _ in 0..100 {
        if registry.window().pending_count() == 0 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(registry.window().pending_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_custom_window_length() -> Result<()> {
    let fixture = TestFixture::with_seed([11u8; 32]);
    let config = RegistryConfig::default()
        .window(WindowConfig::default().window(Duration::from_secs(60)));
    let registry = fixture.registry_with(config).await?;
    let address = fixture.address();

    let ticket = registry.request_validation(&address)?;
    assert_eq!(ticket.validation_window, 60);
    fixture.clock.advance(61);
    assert!(registry.request_validation(&address)?.request_time_stamp > ticket.request_time_stamp);
    Ok(())
}

#[tokio::test]
async fn test_sqlite_registry_survives_reopen() -> Result<()> {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("registry.db");
    let keypair = Keypair::from_seed(&[12u8; 32]);
    let address = keypair.address().to_hex();
    let clock = Arc::new(ManualClock::new(FIXTURE_EPOCH));

    let genesis_hash = {
        let registry = Registry::open_with_clock(
            SqliteStore::open(&path)?,
            clock.clone(),
            Arc::new(Ed25519Verifier),
            RegistryConfig::default(),
        )
        .await?;

        let ticket = registry.request_validation(&address)?;
        registry.validate_signature(&address, &keypair.sign_message(&ticket.message))?;
        registry
            .register_star(&StarRegistration::new(address.clone(), sample_star("persisted")))
            .await?;
        registry.block(0).await?.hash
    };

    clock.advance(3_600);
    let registry = Registry::open_with_clock(
        SqliteStore::open(&path)?,
        clock,
        Arc::new(Ed25519Verifier),
        RegistryConfig::default(),
    )
    .await?;

    assert_eq!(registry.height().await?, 2);
    assert_eq!(registry.block(0).await?.hash, genesis_hash);
    let stars = registry.stars_by_address(&address).await?;
    assert_eq!(stars[0].body.star.story_decoded, "persisted");
    assert!(registry.verify_chain().await?.is_empty());

    let raw = registry.ledger().store().get(1).await?.unwrap_or_default();
    assert!(!std::str::from_utf8(&raw)?.contains("storyDecoded"));
    Ok(())
}

#[tokio::test]
async fn test_memory_store_behind_arc_is_shared() -> Result<()> {
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(ManualClock::new(FIXTURE_EPOCH));
    let registry = Registry::open_with_clock(
        Arc::clone(&store),
        clock,
        Arc::new(Ed25519Verifier),
        RegistryConfig::default(),
    )
    .await?;

    assert_eq!(store.height().await?, 1);
    assert_eq!(registry.height().await?, 1);
    Ok(())
}
