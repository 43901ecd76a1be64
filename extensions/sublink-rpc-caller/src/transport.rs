//! Seams between the dispatcher and a concrete transport.
//!
//! A transport is anything that can push one text frame at a time to the
//! node and feed every inbound frame to an [`RpcInbound`]. The tokio
//! WebSocket client is one implementation; tests use in-memory ones.

use std::io;
use std::sync::Arc;
use sublink::rpc::RpcInbound;

/// Connection state reported by a transport's state change handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpcTransportState {
    Connected,
    Disconnected,
}

/// A live, already-open connection to the node.
pub trait RpcChannel: Send + Sync {
    /// Queues one outbound frame.
    ///
    /// Fails with `NotConnected`/`BrokenPipe` (or another disconnect kind)
    /// once the connection is gone.
    fn send(&self, frame: String) -> io::Result<()>;

    fn is_connected(&self) -> bool;

    fn close(&self);
}

/// Opens channels to an address; used for the initial connection and for
/// every reconnect.
#[async_trait::async_trait]
pub trait RpcConnector: Send + Sync {
    async fn open(
        &self,
        address: &str,
        inbound: Arc<dyn RpcInbound>,
    ) -> io::Result<Arc<dyn RpcChannel>>;
}

/// True for send failures that mean "the channel is closed".
pub(crate) fn is_disconnect(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::NotConnected
            | io::ErrorKind::BrokenPipe
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
    )
}
