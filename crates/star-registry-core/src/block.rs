//! Block: one immutable, hash-linked ledger entry.
//!
//! A block is never edited after it is persisted. Its `hash` is the digest of
//! its own canonical form with `hash` blanked, and `previous_block_hash`
//! links it to the block one height below.

use serde::{Deserialize, Serialize};

use crate::canonical::block_digest;
use crate::error::CoreError;
use crate::star::{StarRecord, StarView};

/// Height of the genesis block.
pub const GENESIS_HEIGHT: u64 = 0;

/// The owner and star carried by a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockBody {
    /// Address of the claimant.
    pub address: String,

    /// The registered star.
    pub star: StarRecord,
}

impl BlockBody {
    pub fn new(address: impl Into<String>, star: StarRecord) -> Self {
        Self {
            address: address.into(),
            star,
        }
    }
}

/// A ledger block.
///
/// Field order is part of the digest; do not reorder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Hex SHA-256 of the canonical block with this field blanked.
    pub hash: String,

    /// Zero-based position in the ledger.
    pub height: u64,

    /// Owner address and star record.
    pub body: BlockBody,

    /// Creation time (unix seconds).
    pub time: u64,

    /// Hash of the block at `height - 1`; empty for genesis.
    #[serde(rename = "previousBlockHash")]
    pub previous_block_hash: String,
}

impl Block {
    /// Build and hash the genesis block.
    pub fn genesis(body: BlockBody, time: u64) -> Self {
        Self::new(GENESIS_HEIGHT, time, String::new(), body)
    }

    /// Build and hash a block.
    pub fn new(height: u64, time: u64, previous_block_hash: String, body: BlockBody) -> Self {
        let mut block = Self {
            hash: String::new(),
            height,
            body,
            time,
            previous_block_hash,
        };
        block.hash = block.compute_hash();
        block
    }

    /// Recompute the digest with `hash` blanked.
    pub fn compute_hash(&self) -> String {
        block_digest(self).to_hex()
    }

    /// Check that the stored hash matches the recomputed digest.
    pub fn verify_hash(&self) -> bool {
        self.hash == self.compute_hash()
    }

    /// Whether this is the genesis block.
    pub fn is_genesis(&self) -> bool {
        self.height == GENESIS_HEIGHT
    }

    /// Owner address.
    pub fn address(&self) -> &str {
        &self.body.address
    }

    /// Whether `next` links back to this block.
    pub fn is_linked_to(&self, next: &Block) -> bool {
        next.previous_block_hash == self.hash
    }
}

/// Outbound body: the stored body with a decoded star story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyView {
    pub address: String,
    pub star: StarView,
}

/// A block as returned to callers.
///
/// Identical to [`Block`] except that `body.star` carries `storyDecoded`.
/// Views are never persisted or hashed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockView {
    pub hash: String,
    pub height: u64,
    pub body: BodyView,
    pub time: u64,
    #[serde(rename = "previousBlockHash")]
    pub previous_block_hash: String,
}

impl TryFrom<Block> for BlockView {
    type Error = CoreError;

    fn try_from(block: Block) -> Result<Self, Self::Error> {
        Ok(Self {
            hash: block.hash,
            height: block.height,
            body: BodyView {
                address: block.body.address,
                star: StarView::try_from(block.body.star)?,
            },
            time: block.time,
            previous_block_hash: block.previous_block_hash,
        })
    }
}
