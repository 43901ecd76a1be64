mod ws_client;

use std::sync::Arc;
use sublink_rpc_caller::{ClientConfig, NodeClient, RpcCallError};
pub use ws_client::{RpcTransportStateHandler, WsChannel, WsConnector};

/// Connects a [`NodeClient`] to the node at `url` (e.g. `ws://127.0.0.1:9944`).
pub async fn connect(url: &str, config: ClientConfig) -> Result<NodeClient, RpcCallError> {
    connect_with(url, config, Arc::new(WsConnector::new())).await
}

/// Like [`connect`], with a caller-provided connector (for example one with a
/// state change handler installed).
pub async fn connect_with(
    url: &str,
    config: ClientConfig,
    connector: Arc<WsConnector>,
) -> Result<NodeClient, RpcCallError> {
    NodeClient::connect(url, connector, config).await
}
