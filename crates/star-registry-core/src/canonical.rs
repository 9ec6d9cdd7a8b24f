//! Canonical block encoding.
//!
//! A block is encoded as compact JSON, fields in declaration order, optional
//! star fields omitted when unset. These bytes are what the store persists,
//! and the digest is SHA-256 over the same encoding with `hash` set to the
//! empty string.
//!
//! The encoding must be byte-stable: two encodings of equal blocks are always
//! identical, so a digest recomputed after reload matches the one computed at
//! construction.

use crate::block::Block;
use crate::crypto::Sha256Hash;
use crate::error::CoreError;

/// Encode a block to its canonical bytes.
pub fn canonical_bytes(block: &Block) -> Vec<u8> {
    // Serializing plain strings and integers cannot fail.
    serde_json::to_vec(block).unwrap_or_default()
}

/// Encode a block with its hash field blanked.
pub fn unhashed_bytes(block: &Block) -> Vec<u8> {
    let blanked = Block {
        hash: String::new(),
        height: block.height,
        body: block.body.clone(),
        time: block.time,
        previous_block_hash: block.previous_block_hash.clone(),
    };
    canonical_bytes(&blanked)
}

/// Compute the digest of a block (hash field blanked).
pub fn block_digest(block: &Block) -> Sha256Hash {
    Sha256Hash::hash(&unhashed_bytes(block))
}

/// Decode a block from its canonical bytes.
pub fn decode_block(bytes: &[u8]) -> Result<Block, CoreError> {
    serde_json::from_slice(bytes).map_err(|e| CoreError::DecodingError(e.to_string()))
}
