//! Integrity verification of the stored chain.
//!
//! Two independent checks run over every stored record: each block's hash
//! must equal the digest recomputed with `hash` blanked, and each block's
//! hash must equal the `previousBlockHash` of the block above it. Neither
//! check stops at the first failure, and nothing is written.

use star_registry_core::{decode_block, Block};
use star_registry_store::Store;
use tracing::{debug, warn};

use crate::error::{RegistryError, Result};
use crate::ledger::Ledger;

/// Outcome of a full chain check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainReport {
    /// Number of blocks checked.
    pub height: u64,
    /// Heights whose stored hash does not match their contents.
    pub invalid_blocks: Vec<u64>,
    /// Heights `h` where block `h + 1` does not point back at block `h`.
    pub broken_links: Vec<u64>,
}

impl ChainReport {
    pub fn is_valid(&self) -> bool {
        self.invalid_blocks.is_empty() && self.broken_links.is_empty()
    }

    /// Hash failures then link failures, each ascending. A height may
    /// appear in both.
    pub fn errors(&self) -> Vec<u64> {
        self.invalid_blocks
            .iter()
            .chain(self.broken_links.iter())
            .copied()
            .collect()
    }
}

fn check_hash(height: u64, block: &Block) -> bool {
    let recomputed = block.compute_hash();
    if block.hash == recomputed {
        return true;
    }
    warn!(
        height,
        stored = %block.hash,
        recomputed = %recomputed,
        "block hash mismatch"
    );
    false
}

impl<S: Store> Ledger<S> {
    /// Whether the block at `height` still matches its stored hash.
    ///
    /// An undecodable record is reported as invalid rather than an error.
    pub async fn verify_block(&self, height: u64) -> Result<bool> {
        if height >= self.height().await? {
            return Err(RegistryError::BlockNotFound(height));
        }
        match self.load(height).await {
            Ok(block) => Ok(check_hash(height, &block)),
            Err(RegistryError::Core(e)) => {
                warn!(height, error = %e, "block record is undecodable");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Check every block and every link.
    pub async fn verify_chain_report(&self) -> Result<ChainReport> {
        let height = self.height().await?;
        let mut blocks: Vec<Option<Block>> = Vec::with_capacity(height as usize);
        let mut report = ChainReport {
            height,
            ..ChainReport::default()
        };

        for h in 0..height {
            let block = match self.store().get(h).await? {
                Some(bytes) => decode_block(&bytes).ok(),
                None => None,
            };
            let valid = match &block {
                Some(block) => check_hash(h, block),
                None => {
                    warn!(height = h, "block record is missing or undecodable");
                    false
                }
            };
            if !valid {
                report.invalid_blocks.push(h);
            }
            blocks.push(block);
        }

        for (h, pair) in (0u64..).zip(blocks.windows(2)) {
            let linked = match (&pair[0], &pair[1]) {
                (Some(block), Some(next)) => block.is_linked_to(next),
                _ => false,
            };
            if !linked {
                warn!(height = h, "broken link to next block");
                report.broken_links.push(h);
            }
        }

        debug!(
            height,
            invalid = report.invalid_blocks.len(),
            broken = report.broken_links.len(),
            "verified chain"
        );
        Ok(report)
    }

    /// Heights that failed verification: hash failures then link failures.
    pub async fn verify_chain(&self) -> Result<Vec<u64>> {
        Ok(self.verify_chain_report().await?.errors())
    }
}
