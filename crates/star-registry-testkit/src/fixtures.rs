//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::Arc;

use star_registry::{Registry, RegistryConfig, Result};
use star_registry_core::{Ed25519Verifier, Keypair, ManualClock, StarInput, StarRegistration};
use star_registry_store::MemoryStore;
use star_registry_validation::ValidatedGrant;

/// A fixed start time for fixture clocks (unix seconds).
pub const FIXTURE_EPOCH: u64 = 1_532_296_090;

/// A claimant with a deterministic key and a controllable clock.
pub struct TestFixture {
    pub keypair: Keypair,
    pub clock: ManualClock,
    pub store: Arc<MemoryStore>,
}

impl TestFixture {
    /// Create a new test fixture with a random keypair.
    pub fn new() -> Self {
        Self::from_keypair(Keypair::generate())
    }

    /// Create with a deterministic keypair from seed.
    pub fn with_seed(seed: [u8; 32]) -> Self {
        Self::from_keypair(Keypair::from_seed(&seed))
    }

    fn from_keypair(keypair: Keypair) -> Self {
        Self {
            keypair,
            clock: ManualClock::new(FIXTURE_EPOCH),
            store: Arc::new(MemoryStore::new()),
        }
    }

    /// The claimant's address.
    pub fn address(&self) -> String {
        self.keypair.address().to_hex()
    }

    /// Sign a challenge message.
    pub fn sign(&self, message: &str) -> String {
        self.keypair.sign_message(message)
    }

    /// A registration for this claimant.
    pub fn registration(&self, story: &str) -> StarRegistration {
        StarRegistration::new(self.address(), sample_star(story))
    }

    /// Open a registry over the fixture's store and clock.
    pub async fn registry(&self) -> Result<Registry<Arc<MemoryStore>>> {
        self.registry_with(RegistryConfig::default()).await
    }

    pub async fn registry_with(
        &self,
        config: RegistryConfig,
    ) -> Result<Registry<Arc<MemoryStore>>> {
        Registry::open_with_clock(
            Arc::clone(&self.store),
            Arc::new(self.clock.clone()),
            Arc::new(Ed25519Verifier),
            config,
        )
        .await
    }

    /// Request a ticket and sign it, leaving a grant for this claimant.
    pub fn validate<S: star_registry_store::Store>(
        &self,
        registry: &Registry<S>,
    ) -> Result<ValidatedGrant> {
        let address = self.address();
        let ticket = registry.request_validation(&address)?;
        registry.validate_signature(&address, &self.sign(&ticket.message))
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// A star with plausible coordinates.
pub fn sample_star(story: &str) -> StarInput {
    StarInput::new("16h 29m 1.0s", "-26° 29' 24.9", story)
        .with_magnitude("1.06")
        .with_constellation("Scorpius")
}

/// Create multiple claimants sharing nothing but the fixture epoch.
pub fn multi_party_fixtures(count: usize) -> Vec<TestFixture> {
    (0..count)
        .map(|i| {
            let mut seed = [0u8; 32];
            seed[0] = i as u8;
            seed[1] = 0x5a;
            TestFixture::with_seed(seed)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fixture_registers_a_star() {
        let fixture = TestFixture::with_seed([1u8; 32]);
        let registry = fixture.registry().await.unwrap();

        fixture.validate(&registry).unwrap();
        let block = registry
            .register_star(&fixture.registration("fixture star"))
            .await
            .unwrap();

        assert_eq!(block.height, 1);
        assert_eq!(block.body.address, fixture.address());
        assert_eq!(block.time, FIXTURE_EPOCH);
    }

    #[test]
    fn test_multi_party_addresses_differ() {
        let parties = multi_party_fixtures(3);
        assert_ne!(parties[0].address(), parties[1].address());
        assert_ne!(parties[1].address(), parties[2].address());
    }
}
