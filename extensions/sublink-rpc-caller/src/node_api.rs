use crate::{NodeClient, RpcCallError};
use once_cell::sync::OnceCell;
use serde_json::json;
use std::sync::PoisonError;
use sublink::runtime::{BlockHeader, BlockRef, ChainProperties, RuntimeVersion, SignedBlock};
use sublink::storage::{StorageHasher, storage_key};
use sublink::utils::{decode_prefixed_hex, encode_prefixed_hex};

impl NodeClient {
    // The first successful answer is kept for the life of the client.
    async fn memoized_string(
        &self,
        cell: &OnceCell<String>,
        method: &str,
    ) -> Result<String, RpcCallError> {
        if let Some(value) = cell.get() {
            return Ok(value.clone());
        }

        let value: String = self.call_typed(method, vec![]).await?;
        Ok(cell.get_or_init(|| value).clone())
    }

    /// Node implementation name (`system_name`).
    pub async fn node_name(&self) -> Result<String, RpcCallError> {
        self.memoized_string(&self.node_name, "system_name").await
    }

    /// Chain name (`system_chain`).
    pub async fn chain(&self) -> Result<String, RpcCallError> {
        self.memoized_string(&self.chain, "system_chain").await
    }

    /// Node software version (`system_version`).
    pub async fn node_version(&self) -> Result<String, RpcCallError> {
        self.memoized_string(&self.node_version, "system_version")
            .await
    }

    /// Chain properties as advertised by the node (`system_properties`).
    ///
    /// Fetched once; local overrides are not applied here.
    pub async fn properties(&self) -> Result<ChainProperties, RpcCallError> {
        if let Some(properties) = self.properties.get() {
            return Ok(properties.clone());
        }

        let result = self.dispatcher.call("system_properties", vec![]).await?;
        let properties = ChainProperties::from_value(result).map_err(|err| {
            RpcCallError::MalformedResponse(format!("unexpected system_properties: {err}"))
        })?;

        Ok(self.properties.get_or_init(|| properties).clone())
    }

    fn overrides(&self) -> ChainProperties {
        self.overrides
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Address format: override, else node-advertised, else the configured default.
    pub async fn ss58_format(&self) -> Result<u16, RpcCallError> {
        if let Some(format) = self.overrides().ss58_format {
            return Ok(format);
        }
        Ok(self
            .properties()
            .await?
            .ss58_format
            .unwrap_or(self.config().default_ss58_format))
    }

    pub fn set_ss58_format(&self, format: u16) {
        self.overrides
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .ss58_format = Some(format);
    }

    pub async fn token_symbol(&self) -> Result<String, RpcCallError> {
        if let Some(symbol) = self.overrides().token_symbol {
            return Ok(symbol);
        }
        Ok(self.properties().await?.token_symbol_or_default())
    }

    pub fn set_token_symbol(&self, symbol: &str) {
        self.overrides
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .token_symbol = Some(symbol.to_string());
    }

    pub async fn token_decimals(&self) -> Result<u8, RpcCallError> {
        if let Some(decimals) = self.overrides().token_decimals {
            return Ok(decimals);
        }
        Ok(self.properties().await?.token_decimals_or_default())
    }

    pub fn set_token_decimals(&self, decimals: u8) {
        self.overrides
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .token_decimals = Some(decimals);
    }

    /// Hash of the best block.
    pub async fn chain_head(&self) -> Result<String, RpcCallError> {
        let head: Option<String> = self.call_typed("chain_getBlockHash", vec![]).await?;
        head.ok_or_else(|| RpcCallError::MalformedResponse("node reported no chain head".into()))
    }

    pub async fn finalized_head(&self) -> Result<String, RpcCallError> {
        self.call_typed("chain_getFinalizedHead", vec![]).await
    }

    /// Hash of block `number`, or `None` if the node does not know it yet.
    pub async fn block_hash(&self, number: u64) -> Result<Option<String>, RpcCallError> {
        self.call_typed("chain_getBlockHash", vec![json!(number)])
            .await
    }

    pub async fn block(&self, block: BlockRef) -> Result<Option<SignedBlock>, RpcCallError> {
        let hash = match block {
            BlockRef::Hash(hash) => hash,
            BlockRef::Number(number) => match self.block_hash(number).await? {
                Some(hash) => hash,
                None => return Ok(None),
            },
        };

        self.call_typed("chain_getBlock", vec![json!(hash)]).await
    }

    pub async fn header(&self, hash: &str) -> Result<Option<BlockHeader>, RpcCallError> {
        self.call_typed("chain_getHeader", vec![json!(hash)]).await
    }

    pub async fn block_number(&self, hash: &str) -> Result<Option<u64>, RpcCallError> {
        Ok(self.header(hash).await?.map(|header| header.number))
    }

    pub async fn runtime_version(&self, hash: &str) -> Result<RuntimeVersion, RpcCallError> {
        self.call_typed("state_getRuntimeVersion", vec![json!(hash)])
            .await
    }

    /// Runtime metadata at `hash`, straight from the node (never cached here).
    pub async fn metadata(&self, hash: &str) -> Result<Vec<u8>, RpcCallError> {
        let encoded: String = self
            .call_typed("state_getMetadata", vec![json!(hash)])
            .await?;

        decode_prefixed_hex(&encoded)
            .map_err(|err| RpcCallError::MalformedResponse(format!("metadata is not hex: {err}")))
    }

    /// Raw storage value under `key`, at block `at` or at the head.
    ///
    /// Returns `None` when nothing is stored there.
    pub async fn storage(
        &self,
        key: &[u8],
        at: Option<&str>,
    ) -> Result<Option<Vec<u8>>, RpcCallError> {
        let mut params = vec![json!(encode_prefixed_hex(key))];
        if let Some(at) = at {
            params.push(json!(at));
        }

        let value: Option<String> = self.call_typed("state_getStorage", params).await?;

        match value.as_deref() {
            None | Some("") | Some("0x") => Ok(None),
            Some(encoded) => decode_prefixed_hex(encoded).map(Some).map_err(|err| {
                RpcCallError::MalformedResponse(format!("storage value is not hex: {err}"))
            }),
        }
    }

    /// Storage lookup by module and item name.
    ///
    /// `keys` are already SCALE-encoded map keys with their hashers.
    pub async fn storage_value(
        &self,
        module: &str,
        item: &str,
        keys: &[(StorageHasher, &[u8])],
        at: Option<&str>,
    ) -> Result<Option<Vec<u8>>, RpcCallError> {
        let key = storage_key(module, item, keys);
        tracing::debug!(
            "Storage key for {}::{}: {}",
            module,
            item,
            encode_prefixed_hex(&key)
        );
        self.storage(&key, at).await
    }
}
