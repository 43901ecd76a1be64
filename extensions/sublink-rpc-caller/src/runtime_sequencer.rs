use crate::{NodeClient, RpcCallError};
use std::sync::PoisonError;
use sublink::runtime::{ActiveRuntime, BlockRef};

impl NodeClient {
    /// Makes the runtime governing `block` the active one.
    ///
    /// `None` means the current chain head. The runtime of a block is the one
    /// its parent ran with, except for genesis which uses its own hash. Metadata
    /// is fetched only for runtime versions the cache has not seen.
    ///
    /// Every node call happens before any active field is written, so a failure
    /// leaves the previously active runtime in place. Runs are serialized per
    /// client.
    pub async fn ensure_runtime_for(
        &self,
        block: Option<BlockRef>,
    ) -> Result<ActiveRuntime, RpcCallError> {
        let _guard = self.runtime_init.lock().await;
        let active = self.active_runtime();

        let hash = match block {
            None => self.chain_head().await?,
            // Hex hashes compare case-insensitively; the node answers in lowercase.
            Some(BlockRef::Hash(hash)) => hash.to_ascii_lowercase(),
            Some(BlockRef::Number(number)) => {
                if active.block_number == Some(number) && active.block_hash.is_some() {
                    tracing::debug!("Runtime for block #{} already active", number);
                    return Ok(active);
                }
                self.block_hash(number)
                    .await?
                    .ok_or_else(|| RpcCallError::UnknownBlock(BlockRef::Number(number).to_string()))?
            }
        };

        if active.block_hash.as_deref() == Some(hash.as_str()) {
            tracing::debug!("Runtime for block {} already active", hash);
            return Ok(active);
        }

        let header = self
            .header(&hash)
            .await?
            .ok_or_else(|| RpcCallError::UnknownBlock(hash.clone()))?;

        let runtime_hash = if header.is_genesis() {
            hash.clone()
        } else {
            header.parent_hash.clone()
        };

        let version = self.runtime_version(&runtime_hash).await?;

        let next = ActiveRuntime {
            block_hash: Some(hash.clone()),
            block_number: Some(header.number),
            runtime_version: Some(version.spec_version),
            transaction_version: Some(version.transaction_version),
        };

        if active.runtime_version == Some(version.spec_version) {
            tracing::debug!(
                "Block {} (#{}) runs active runtime {}",
                hash,
                header.number,
                version.spec_version
            );
            return Ok(self.commit(ActiveRuntime {
                transaction_version: active.transaction_version,
                ..next
            }));
        }

        if self.metadata_cache.has(version.spec_version) {
            tracing::info!(
                "Metadata cache hit for runtime version {}",
                version.spec_version
            );
        } else {
            tracing::info!(
                "Metadata cache miss for runtime version {}: fetching at {}",
                version.spec_version,
                runtime_hash
            );
            let metadata = self.metadata(&runtime_hash).await?;
            self.metadata_cache.put(version.spec_version, metadata);
        }

        tracing::info!(
            "Switched to runtime {} (transaction version {}) at block {} (#{})",
            version.spec_version,
            version.transaction_version,
            hash,
            header.number
        );

        Ok(self.commit(next))
    }

    fn commit(&self, next: ActiveRuntime) -> ActiveRuntime {
        let mut runtime = self.runtime.write().unwrap_or_else(PoisonError::into_inner);
        *runtime = next;
        runtime.clone()
    }
}
