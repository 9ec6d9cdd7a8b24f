//! The ledger: an append-only, hash-linked chain of blocks over a [`Store`].
//!
//! Every write goes through one async mutex. Reading the height, loading the
//! predecessor and inserting the new block happen inside that critical
//! section, so heights stay contiguous and every block links to the one
//! actually stored below it. The store's insert is conflict-checked on top of
//! that; a foreign writer cannot silently replace a height either.

use std::sync::Arc;

use bytes::Bytes;
use star_registry_core::{
    canonical_bytes, decode_block, Block, BlockBody, BlockView, Clock, StarRecord, GENESIS_HEIGHT,
};
use star_registry_store::{InsertResult, Store};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::config::GenesisConfig;
use crate::error::{RegistryError, Result};

/// Hash-linked block ledger.
pub struct Ledger<S: Store> {
    /// The storage backend.
    store: Arc<S>,
    /// Source of block timestamps.
    clock: Arc<dyn Clock>,
    /// Contents of the block at height 0.
    genesis: GenesisConfig,
    /// Serializes genesis creation and appends.
    append_lock: Mutex<()>,
}

impl<S: Store> Ledger<S> {
    /// Create a ledger over `store`. Call [`initialize`](Self::initialize)
    /// before appending.
    pub fn new(store: S, clock: Arc<dyn Clock>, genesis: GenesisConfig) -> Self {
        Self {
            store: Arc::new(store),
            clock,
            genesis,
            append_lock: Mutex::new(()),
        }
    }

    /// Get the store reference.
    pub fn store(&self) -> &S {
        &self.store
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Writes
    // ─────────────────────────────────────────────────────────────────────────

    /// Create the genesis block if the ledger is empty.
    ///
    /// Idempotent: on a populated ledger this returns the existing genesis
    /// block and writes nothing.
    pub async fn initialize(&self) -> Result<Block> {
        let _guard = self.append_lock.lock().await;

        if self.store.height().await? > 0 {
            return self.load(GENESIS_HEIGHT).await;
        }

        let genesis = Block::genesis(self.genesis.body(), self.clock.now_secs());
        self.insert(&genesis).await?;
        info!(hash = %genesis.hash, "created genesis block");
        Ok(genesis)
    }

    /// Append a block registering `star` for `address`.
    pub async fn append(&self, address: &str, star: StarRecord) -> Result<Block> {
        let _guard = self.append_lock.lock().await;

        let height = self.store.height().await?;
        if height == 0 {
            return Err(RegistryError::NotInitialized);
        }

        let previous = self.load(height - 1).await?;
        let block = Block::new(
            height,
            self.clock.now_secs(),
            previous.hash,
            BlockBody::new(address, star),
        );
        self.insert(&block).await?;

        info!(height, address, hash = %block.hash, "appended block");
        Ok(block)
    }

    async fn insert(&self, block: &Block) -> Result<()> {
        let bytes = Bytes::from(canonical_bytes(block));
        match self.store.insert(block.height, bytes).await? {
            InsertResult::Inserted => Ok(()),
            InsertResult::AlreadyExists => {
                debug!(height = block.height, "block already stored");
                Ok(())
            }
            InsertResult::Conflict { .. } => Err(RegistryError::Conflict {
                height: block.height,
            }),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Reads
    // ─────────────────────────────────────────────────────────────────────────

    /// Number of blocks, genesis included.
    pub async fn height(&self) -> Result<u64> {
        Ok(self.store.height().await?)
    }

    /// Load and decode the record at `height`.
    pub(crate) async fn load(&self, height: u64) -> Result<Block> {
        let bytes = self
            .store
            .get(height)
            .await?
            .ok_or(RegistryError::BlockNotFound(height))?;
        Ok(decode_block(&bytes)?)
    }

    /// The block at `height`.
    pub async fn get_by_height(&self, height: u64) -> Result<Block> {
        if height >= self.height().await? {
            return Err(RegistryError::BlockNotFound(height));
        }
        self.load(height).await
    }

    /// The most recent block.
    pub async fn latest(&self) -> Result<Block> {
        match self.height().await? {
            0 => Err(RegistryError::NotInitialized),
            height => self.load(height - 1).await,
        }
    }

    /// Every block, ascending by height.
    pub async fn blocks(&self) -> Result<Vec<Block>> {
        self.store
            .scan_values()
            .await?
            .iter()
            .map(|bytes| decode_block(bytes).map_err(RegistryError::from))
            .collect()
    }

    /// Blocks registered by `address`, ascending by height. Empty if none.
    pub async fn get_by_address(&self, address: &str) -> Result<Vec<Block>> {
        let blocks = self.blocks().await?;
        Ok(blocks
            .into_iter()
            .filter(|block| block.address() == address)
            .collect())
    }

    /// The lowest block whose hash is `hash`.
    pub async fn get_by_hash(&self, hash: &str) -> Result<Block> {
        self.blocks()
            .await?
            .into_iter()
            .find(|block| block.hash == hash)
            .ok_or_else(|| RegistryError::HashNotFound(hash.to_string()))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Views
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn view_by_height(&self, height: u64) -> Result<BlockView> {
        Ok(BlockView::try_from(self.get_by_height(height).await?)?)
    }

    pub async fn view_by_address(&self, address: &str) -> Result<Vec<BlockView>> {
        self.get_by_address(address)
            .await?
            .into_iter()
            .map(|block| BlockView::try_from(block).map_err(RegistryError::from))
            .collect()
    }

    pub async fn view_by_hash(&self, hash: &str) -> Result<BlockView> {
        Ok(BlockView::try_from(self.get_by_hash(hash).await?)?)
    }
}
