use futures_util::{Sink, SinkExt, Stream, StreamExt};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use sublink::rpc::RpcInbound;
use sublink_rpc_caller::{RpcChannel, RpcConnector, RpcTransportState};
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::task::JoinHandle;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{self, protocol::Message as WsMessage},
};

/// Callback invoked whenever a channel connects or goes away.
pub type RpcTransportStateHandler = Arc<dyn Fn(RpcTransportState) + Send + Sync>;

/// Opens WebSocket channels to a node, one per (re)connect.
#[derive(Default)]
pub struct WsConnector {
    state_handler: Mutex<Option<RpcTransportStateHandler>>,
}

impl WsConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a callback for transport state changes of every channel opened
    /// from now on.
    pub fn set_state_change_handler(
        &self,
        handler: impl Fn(RpcTransportState) + Send + Sync + 'static,
    ) {
        *self
            .state_handler
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(handler));
    }

    fn state_handler(&self) -> Option<RpcTransportStateHandler> {
        self.state_handler
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait::async_trait]
impl RpcConnector for WsConnector {
    async fn open(
        &self,
        address: &str,
        inbound: Arc<dyn RpcInbound>,
    ) -> io::Result<Arc<dyn RpcChannel>> {
        let (ws_stream, _) = connect_async(address).await.map_err(into_io_error)?;
        tracing::info!("WebSocket connected to {}", address);

        let (sender, receiver) = ws_stream.split();

        Ok(Arc::new(WsChannel::spawn(
            sender,
            receiver,
            inbound,
            self.state_handler(),
        )))
    }
}

/// State shared between a channel and its background tasks.
struct ChannelLink {
    connected: AtomicBool,
    state_handler: Option<RpcTransportStateHandler>,
}

impl ChannelLink {
    /// Flips to disconnected; returns `true` only for the first caller.
    fn mark_disconnected(&self) -> bool {
        let was_connected = self.connected.swap(false, Ordering::AcqRel);
        if was_connected {
            self.notify(RpcTransportState::Disconnected);
        }
        was_connected
    }

    fn notify(&self, state: RpcTransportState) {
        if let Some(handler) = &self.state_handler {
            handler(state);
        }
    }
}

/// One live WebSocket connection.
pub struct WsChannel {
    tx: UnboundedSender<WsMessage>,
    link: Arc<ChannelLink>,
    tasks: Vec<JoinHandle<()>>,
}

impl WsChannel {
    /// Drives an already-established WebSocket split into its two halves.
    ///
    /// Inbound frames go to `inbound`. Whichever half fails first reports the
    /// disconnect, exactly once.
    pub fn spawn<S, R>(
        mut sender: S,
        mut receiver: R,
        inbound: Arc<dyn RpcInbound>,
        state_handler: Option<RpcTransportStateHandler>,
    ) -> Self
    where
        S: Sink<WsMessage, Error = tungstenite::Error> + Send + Unpin + 'static,
        R: Stream<Item = Result<WsMessage, tungstenite::Error>> + Send + Unpin + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<WsMessage>();

        let link = Arc::new(ChannelLink {
            connected: AtomicBool::new(true),
            state_handler,
        });

        // Send loop
        let send_task = tokio::spawn({
            let link = link.clone();
            let inbound = inbound.clone();
            async move {
                while let Some(msg) = rx.recv().await {
                    if let Err(err) = sender.send(msg).await {
                        tracing::warn!("WebSocket send failed: {}", err);
                        if link.mark_disconnected() {
                            inbound.on_disconnect();
                        }
                        break;
                    }
                }
            }
        });

        // Receive loop
        let recv_task = tokio::spawn({
            let link = link.clone();
            let tx = tx.clone();
            async move {
                while let Some(msg) = receiver.next().await {
                    match msg {
                        Ok(WsMessage::Text(text)) => inbound.on_message(text.as_bytes()),
                        Ok(WsMessage::Binary(bytes)) => inbound.on_message(&bytes),
                        Ok(WsMessage::Ping(payload)) => {
                            let _ = tx.send(WsMessage::Pong(payload));
                        }
                        Ok(WsMessage::Close(frame)) => {
                            tracing::info!("Node closed the connection: {:?}", frame);
                            break;
                        }
                        Ok(_) => {}
                        Err(err) => {
                            tracing::warn!("WebSocket receive failed: {}", err);
                            break;
                        }
                    }
                }

                if link.mark_disconnected() {
                    inbound.on_disconnect();
                }
            }
        });

        link.notify(RpcTransportState::Connected);

        Self {
            tx,
            link,
            tasks: vec![send_task, recv_task],
        }
    }
}

impl RpcChannel for WsChannel {
    fn send(&self, frame: String) -> io::Result<()> {
        if !self.link.connected.load(Ordering::Acquire) {
            return Err(io::Error::new(
                io::ErrorKind::NotConnected,
                "WebSocket is closed",
            ));
        }

        self.tx
            .send(WsMessage::Text(frame.into()))
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "WebSocket writer is gone"))
    }

    fn is_connected(&self) -> bool {
        self.link.connected.load(Ordering::Acquire)
    }

    fn close(&self) {
        let _ = self.tx.send(WsMessage::Close(None));
        self.link.mark_disconnected();
    }
}

impl Drop for WsChannel {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
        self.link.mark_disconnected();
    }
}

fn into_io_error(err: tungstenite::Error) -> io::Error {
    match err {
        tungstenite::Error::Io(err) => err,
        other => io::Error::new(io::ErrorKind::ConnectionRefused, other),
    }
}
