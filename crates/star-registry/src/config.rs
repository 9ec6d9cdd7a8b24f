//! Registry configuration.

use std::time::Duration;

use star_registry_core::{BlockBody, StarRecord, DEFAULT_MAX_STORY_BYTES};
use star_registry_validation::WindowConfig;

/// Contents of the genesis block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenesisConfig {
    pub address: String,
    pub right_ascension: String,
    pub declination: String,
    pub story: String,
}

impl Default for GenesisConfig {
    fn default() -> Self {
        Self {
            address: "Genesis block".to_string(),
            right_ascension: "Nill".to_string(),
            declination: "Nill".to_string(),
            story: "This is the Genesis block".to_string(),
        }
    }
}

impl GenesisConfig {
    /// The body stored at height 0.
    pub fn body(&self) -> BlockBody {
        BlockBody::new(
            self.address.clone(),
            StarRecord::new(&*self.right_ascension, &*self.declination, &self.story),
        )
    }
}

/// Configuration for a [`Registry`](crate::Registry).
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Validation window settings.
    pub window: WindowConfig,
    /// Genesis block contents.
    pub genesis: GenesisConfig,
    /// Largest accepted story, in bytes.
    pub max_story_bytes: usize,
    /// Sweep expired tickets on this period. `None` relies on lazy expiry only.
    pub reaper_interval: Option<Duration>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            genesis: GenesisConfig::default(),
            max_story_bytes: DEFAULT_MAX_STORY_BYTES,
            reaper_interval: None,
        }
    }
}

impl RegistryConfig {
    pub fn window(mut self, window: WindowConfig) -> Self {
        self.window = window;
        self
    }

    pub fn genesis(mut self, genesis: GenesisConfig) -> Self {
        self.genesis = genesis;
        self
    }

    pub fn max_story_bytes(mut self, max: usize) -> Self {
        self.max_story_bytes = max;
        self
    }

    pub fn reaper_interval(mut self, period: Duration) -> Self {
        self.reaper_interval = Some(period);
        self
    }
}
