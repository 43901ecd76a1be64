use crate::{ClientConfig, RpcCallError, RpcChannel, RpcConnector, RpcDispatcher};
use once_cell::sync::OnceCell;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::{Arc, PoisonError, RwLock};
use sublink::rpc::{RpcInbound, RpcPendingResponses, RpcResponse};
use sublink::runtime::{ActiveRuntime, ChainProperties, MetadataCache};
use tokio::sync::Mutex;

/// Client state for one node.
///
/// Owns the dispatcher, the memoized node identity, the active runtime and the
/// metadata cache. Several clients can live side by side in one process; each
/// talks to exactly one node.
pub struct NodeClient {
    pub(crate) dispatcher: RpcDispatcher,
    pub(crate) node_name: OnceCell<String>,
    pub(crate) chain: OnceCell<String>,
    pub(crate) node_version: OnceCell<String>,
    pub(crate) properties: OnceCell<ChainProperties>,
    // Values set locally win over what the node advertises.
    pub(crate) overrides: RwLock<ChainProperties>,
    pub(crate) runtime: RwLock<ActiveRuntime>,
    pub(crate) metadata_cache: MetadataCache,
    pub(crate) runtime_init: Mutex<()>,
}

impl NodeClient {
    pub fn builder() -> NodeClientBuilder {
        NodeClientBuilder::new()
    }

    /// Connects to `address` through `connector` with the given config.
    pub async fn connect(
        address: &str,
        connector: Arc<dyn RpcConnector>,
        config: ClientConfig,
    ) -> Result<Self, RpcCallError> {
        NodeClientBuilder::new()
            .config(config)
            .url(address)
            .connector(connector)
            .build()
            .await
    }

    fn from_dispatcher(dispatcher: RpcDispatcher) -> Self {
        Self {
            dispatcher,
            node_name: OnceCell::new(),
            chain: OnceCell::new(),
            node_version: OnceCell::new(),
            properties: OnceCell::new(),
            overrides: RwLock::new(ChainProperties::default()),
            runtime: RwLock::new(ActiveRuntime::default()),
            metadata_cache: MetadataCache::new(),
            runtime_init: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        self.dispatcher.config()
    }

    pub fn dispatcher(&self) -> &RpcDispatcher {
        &self.dispatcher
    }

    pub fn is_connected(&self) -> bool {
        self.dispatcher.is_connected()
    }

    /// Drops the current channel and opens a new one.
    pub async fn reconnect(&self) -> Result<(), RpcCallError> {
        self.dispatcher.reconnect().await
    }

    pub fn metadata_cache(&self) -> &MetadataCache {
        &self.metadata_cache
    }

    /// Snapshot of the runtime the client currently has loaded.
    pub fn active_runtime(&self) -> ActiveRuntime {
        self.runtime
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Metadata for the active runtime version, if one is loaded.
    pub fn active_metadata(&self) -> Option<Arc<[u8]>> {
        let version = self.active_runtime().runtime_version?;
        self.metadata_cache.get(version)
    }

    /// Successfully claimed responses, oldest first.
    pub fn response_history(&self) -> Vec<RpcResponse> {
        self.dispatcher.pending_responses().history()
    }

    /// Drains notifications the node pushed without a request id.
    pub fn take_unsolicited(&self) -> Vec<RpcResponse> {
        self.dispatcher.pending_responses().take_unsolicited()
    }

    /// Issues any RPC method and returns its raw `result`.
    pub async fn call_raw(&self, method: &str, params: Vec<Value>) -> Result<Value, RpcCallError> {
        self.dispatcher.call(method, params).await
    }

    pub(crate) async fn call_typed<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Vec<Value>,
    ) -> Result<T, RpcCallError> {
        let result = self.dispatcher.call(method, params).await?;
        serde_json::from_value(result).map_err(|err| {
            RpcCallError::MalformedResponse(format!("unexpected result for {method}: {err}"))
        })
    }

    /// Tears the client down.
    ///
    /// Closes the transport, wakes outstanding calls with `Closed` and empties
    /// the response registry and the metadata cache.
    pub fn close(&self) {
        self.dispatcher.close();
        self.metadata_cache.clear();
        *self.runtime.write().unwrap_or_else(PoisonError::into_inner) = ActiveRuntime::default();
    }
}

/// Validates startup parameters and assembles a [`NodeClient`].
///
/// Exactly one of `url` or `channel` must be given. A `url` needs a
/// `connector` to open it, and a `connector` is only meaningful with a `url`.
/// A client built from an existing channel cannot reconnect.
#[derive(Default)]
pub struct NodeClientBuilder {
    config: ClientConfig,
    url: Option<String>,
    connector: Option<Arc<dyn RpcConnector>>,
    channel: Option<Arc<dyn RpcChannel>>,
    pending: Option<Arc<RpcPendingResponses>>,
}

impl NodeClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    pub fn url(mut self, url: &str) -> Self {
        self.url = Some(url.to_string());
        self
    }

    pub fn connector(mut self, connector: Arc<dyn RpcConnector>) -> Self {
        self.connector = Some(connector);
        self
    }

    /// Uses an already-open channel instead of connecting.
    ///
    /// The channel must feed its inbound frames to [`Self::inbound`].
    pub fn channel(mut self, channel: Arc<dyn RpcChannel>) -> Self {
        self.channel = Some(channel);
        self
    }

    /// The receiver an externally opened channel must deliver frames to.
    pub fn inbound(&mut self) -> Arc<dyn RpcInbound> {
        self.pending_responses().clone()
    }

    fn pending_responses(&mut self) -> &Arc<RpcPendingResponses> {
        let capacity = self.config.response_history_capacity;
        self.pending
            .get_or_insert_with(|| Arc::new(RpcPendingResponses::with_history_capacity(capacity)))
    }

    pub async fn build(mut self) -> Result<NodeClient, RpcCallError> {
        let pending = self.pending_responses().clone();

        let dispatcher = match (self.url, self.channel, self.connector) {
            (Some(_), Some(_), _) => {
                return Err(RpcCallError::Configuration(
                    "both a node address and an existing channel were supplied".into(),
                ));
            }
            (None, None, _) => {
                return Err(RpcCallError::Configuration(
                    "neither a node address nor an existing channel was supplied".into(),
                ));
            }
            (Some(_), None, None) => {
                return Err(RpcCallError::Configuration(
                    "a node address needs a connector to open it".into(),
                ));
            }
            (None, Some(_), Some(_)) => {
                return Err(RpcCallError::Configuration(
                    "a connector was supplied without a node address".into(),
                ));
            }
            (Some(url), None, Some(connector)) => {
                RpcDispatcher::connect(&url, connector, pending, self.config).await?
            }
            (None, Some(channel), None) => {
                RpcDispatcher::with_channel(channel, pending, self.config)
            }
        };

        Ok(NodeClient::from_dispatcher(dispatcher))
    }
}
