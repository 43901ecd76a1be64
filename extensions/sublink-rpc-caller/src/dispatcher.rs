use crate::transport::is_disconnect;
use crate::{ClientConfig, RpcCallError, RpcChannel, RpcConnector};
use serde_json::Value;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use sublink::rpc::{RpcInbound, RpcPendingClaim, RpcPendingResponses, RpcRequest};
use sublink::utils::RequestIdCounter;
use tokio::sync::Mutex;

/// The channel currently in use, tagged with how many times it was replaced.
struct ChannelSlot {
    channel: Option<Arc<dyn RpcChannel>>,
    generation: u64,
}

/// Correlating dispatcher for JSON-RPC calls over a single channel.
///
/// `call` looks synchronous to its caller: it sends the envelope and then
/// waits (asynchronously, bounded by the configured timeout) for the response
/// carrying its own id. Any number of calls may be outstanding at once.
pub struct RpcDispatcher {
    pending: Arc<RpcPendingResponses>,
    ids: RequestIdCounter,
    slot: RwLock<ChannelSlot>,
    connector: Option<Arc<dyn RpcConnector>>,
    address: Option<String>,
    // Serializes reconnects so a dead channel is replaced once.
    reconnect_lock: Mutex<()>,
    closed: AtomicBool,
    config: ClientConfig,
}

impl RpcDispatcher {
    /// Wraps a channel that is already open and wired to `pending`.
    ///
    /// Without an address and connector the dispatcher cannot reconnect.
    pub fn with_channel(
        channel: Arc<dyn RpcChannel>,
        pending: Arc<RpcPendingResponses>,
        config: ClientConfig,
    ) -> Self {
        Self::assemble(Some(channel), pending, None, None, config)
    }

    /// Opens a channel to `address` through `connector`.
    pub async fn connect(
        address: &str,
        connector: Arc<dyn RpcConnector>,
        pending: Arc<RpcPendingResponses>,
        config: ClientConfig,
    ) -> Result<Self, RpcCallError> {
        tracing::info!("Connecting to {} ...", address);

        let inbound: Arc<dyn RpcInbound> = pending.clone();
        let channel = connector.open(address, inbound).await.map_err(|err| {
            RpcCallError::Connection(format!("failed to connect to {address}: {err}"))
        })?;

        Ok(Self::assemble(
            Some(channel),
            pending,
            Some(connector),
            Some(address.to_string()),
            config,
        ))
    }

    fn assemble(
        channel: Option<Arc<dyn RpcChannel>>,
        pending: Arc<RpcPendingResponses>,
        connector: Option<Arc<dyn RpcConnector>>,
        address: Option<String>,
        config: ClientConfig,
    ) -> Self {
        Self {
            pending,
            ids: RequestIdCounter::new(),
            slot: RwLock::new(ChannelSlot {
                channel,
                generation: 0,
            }),
            connector,
            address,
            reconnect_lock: Mutex::new(()),
            closed: AtomicBool::new(false),
            config,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    /// The registry inbound frames are delivered to.
    pub fn pending_responses(&self) -> &Arc<RpcPendingResponses> {
        &self.pending
    }

    /// The id the next call will use.
    pub fn next_request_id(&self) -> u64 {
        self.ids.peek()
    }

    pub fn is_connected(&self) -> bool {
        self.current_channel()
            .0
            .is_some_and(|channel| channel.is_connected())
    }

    /// Issues `method` with `params` and waits for the matching result.
    pub async fn call(&self, method: &str, params: Vec<Value>) -> Result<Value, RpcCallError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(RpcCallError::Closed);
        }

        let id = self.ids.next_id();
        let frame = RpcRequest::new(id, method, params)
            .encode()
            .map_err(|err| RpcCallError::MalformedRequest(err.to_string()))?;

        tracing::debug!("RPC request #{}: \"{}\"", id, method);

        let claim = self.send_frame(id, &frame).await?;

        let delivery = tokio::time::timeout(self.config.request_timeout, claim)
            .await
            .map_err(|_| {
                tracing::warn!("RPC request #{} (\"{}\") timed out", id, method);
                RpcCallError::Timeout {
                    method: method.to_string(),
                    after: self.config.request_timeout,
                }
            })?;

        let response = delivery?;

        if let Some(error) = response.error {
            tracing::warn!("RPC request #{} failed: {}", id, error.message);
            return Err(RpcCallError::Remote {
                code: error.code,
                message: error.message,
            });
        }

        Ok(response.result)
    }

    /// Sends `frame` and returns the claim on its response.
    ///
    /// The claim is registered before each send attempt, so a disconnect
    /// reported while the frame is in flight reaches this caller too.
    async fn send_frame(&self, id: u64, frame: &str) -> Result<RpcPendingClaim, RpcCallError> {
        let mut attempts = 0;

        loop {
            let (channel, generation) = self.current_channel();
            let claim = self.pending.register(id);

            let outcome = match channel {
                Some(channel) => channel.send(frame.to_string()),
                None => Err(io::Error::from(io::ErrorKind::NotConnected)),
            };

            match outcome {
                Ok(()) => return Ok(claim),
                Err(err) if is_disconnect(&err) => {
                    // Nothing went out; the resend registers again.
                    drop(claim);

                    if !self.can_reconnect() {
                        tracing::error!("Could not reach node: {}", err);
                        return Err(RpcCallError::TransportUnavailable);
                    }

                    if attempts >= self.config.max_reconnect_attempts {
                        return Err(RpcCallError::Connection(format!(
                            "channel still closed after {attempts} reconnect attempt(s)"
                        )));
                    }

                    attempts += 1;
                    tracing::warn!(
                        "Connection closed: trying to reconnect ({}/{})",
                        attempts,
                        self.config.max_reconnect_attempts
                    );
                    self.reconnect_from(generation).await?;
                }
                Err(err) => return Err(RpcCallError::Connection(err.to_string())),
            }
        }
    }

    fn can_reconnect(&self) -> bool {
        self.config.auto_reconnect
            && self.config.max_reconnect_attempts > 0
            && self.connector.is_some()
            && self.address.is_some()
            && !self.closed.load(Ordering::Acquire)
    }

    fn current_channel(&self) -> (Option<Arc<dyn RpcChannel>>, u64) {
        let slot = self.slot.read().unwrap_or_else(PoisonError::into_inner);
        (slot.channel.clone(), slot.generation)
    }

    /// Replaces the channel with a freshly opened one.
    ///
    /// Waiters on the old channel are released with `ConnectionLost`.
    pub async fn reconnect(&self) -> Result<(), RpcCallError> {
        let (_, generation) = self.current_channel();
        self.reconnect_from(generation).await
    }

    async fn reconnect_from(&self, failed_generation: u64) -> Result<(), RpcCallError> {
        let _guard = self.reconnect_lock.lock().await;

        if self.closed.load(Ordering::Acquire) {
            return Err(RpcCallError::Closed);
        }

        let (connector, address) = match (&self.connector, &self.address) {
            (Some(connector), Some(address)) => (connector.clone(), address.clone()),
            _ => return Err(RpcCallError::TransportUnavailable),
        };

        // Another caller already replaced the channel we saw fail.
        if self.current_channel().1 != failed_generation {
            return Ok(());
        }

        let dead = {
            let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
            slot.generation += 1;
            slot.channel.take()
        };
        if let Some(dead) = dead {
            dead.close();
        }
        self.pending.fail_waiters();

        let inbound: Arc<dyn RpcInbound> = self.pending.clone();
        let channel = connector.open(&address, inbound).await.map_err(|err| {
            tracing::error!("Reconnect to {} failed: {}", address, err);
            RpcCallError::Connection(format!("failed to reconnect to {address}: {err}"))
        })?;

        {
            let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
            slot.channel = Some(channel);
            slot.generation += 1;
        }

        tracing::info!("Reconnected to {}", address);
        Ok(())
    }

    /// Closes the channel and tears down the registry.
    ///
    /// Calls made afterwards fail with `Closed`.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }

        let channel = self
            .slot
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .channel
            .take();

        if let Some(channel) = channel {
            channel.close();
        }

        self.pending.clear();
        tracing::info!("Dispatcher closed");
    }
}
