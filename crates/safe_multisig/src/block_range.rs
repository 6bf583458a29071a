use tracing::debug;

use crate::{client::ChainClient, error::Result};

/// Translates wall-clock timestamps into block numbers.
pub struct BlockRangeResolver<'a, C> {
    client: &'a C,
}

impl<'a, C: ChainClient> BlockRangeResolver<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// Returns the rightmost block whose timestamp is `<= target`, or block 0 when every block
    /// is newer than `target`.
    ///
    /// Only assumes that timestamps grow along the chain on the whole, not at a fixed pace.
    pub async fn timestamp_to_block(&self, target: u64) -> Result<u64> {
        let latest = self.client.block_number().await?;
        self.timestamp_to_block_before(target, latest).await
    }

    /// Same as [`Self::timestamp_to_block`] with the search bounded by `latest`.
    pub async fn timestamp_to_block_before(&self, target: u64, latest: u64) -> Result<u64> {
        if self.client.block_timestamp(latest).await? <= target {
            return Ok(latest);
        }

        // invariant: the answer lies in [low, high], and every block above `high` is too new
        let mut low = 0u64;
        let mut high = latest.saturating_sub(1);
        while low < high {
            let mid = low + (high - low + 1) / 2;
            if self.client.block_timestamp(mid).await? <= target {
                low = mid;
            } else {
                high = mid - 1;
            }
        }

        debug!(target, block = low, "Resolved timestamp to block");
        Ok(low)
    }
}
