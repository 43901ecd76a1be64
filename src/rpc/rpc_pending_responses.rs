use super::{RpcDeliveryError, RpcInbound, RpcResponse};
use crate::constants::{DEFAULT_RESPONSE_HISTORY_CAPACITY, MAX_ABANDONED_REQUEST_IDS};
use futures::channel::oneshot;
use std::collections::{BTreeSet, HashMap, VecDeque};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};

/// What a waiter is eventually handed for its id.
pub type RpcDelivery = Result<RpcResponse, RpcDeliveryError>;

/// Registry of responses that have arrived but have not been claimed yet,
/// plus the waiters currently blocked on a specific id.
///
/// The delivery path (`on_message`) and waiting callers (`register`) share a
/// single mutex, so an arrival can never slip between a lookup and a waiter
/// registration. Pairing is strictly by id; arrival order is irrelevant.
///
/// Responses nobody is waiting for (foreign ids, unsolicited pushes) are kept
/// until claimed or until `clear` tears the registry down.
pub struct RpcPendingResponses {
    state: Mutex<PendingState>,
    history_capacity: usize,
}

#[derive(Default)]
struct PendingState {
    waiters: HashMap<u64, oneshot::Sender<RpcDelivery>>,
    arrived: HashMap<u64, RpcDelivery>,
    // Ids whose waiter gave up (timeout/cancel); a late reply is dropped.
    // Bounded: the oldest ids are forgotten first.
    abandoned: BTreeSet<u64>,
    unsolicited: Vec<RpcResponse>,
    history: VecDeque<RpcResponse>,
    undecodable: u64,
}

impl Default for RpcPendingResponses {
    fn default() -> Self {
        Self::new()
    }
}

impl RpcPendingResponses {
    pub fn new() -> Self {
        Self::with_history_capacity(DEFAULT_RESPONSE_HISTORY_CAPACITY)
    }

    pub fn with_history_capacity(history_capacity: usize) -> Self {
        Self {
            state: Mutex::new(PendingState::default()),
            history_capacity,
        }
    }

    fn state(&self) -> MutexGuard<'_, PendingState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers interest in the response for `id`.
    ///
    /// If that response already arrived, the returned claim resolves
    /// immediately. Dropping the claim before it resolves withdraws it.
    pub fn register(self: &Arc<Self>, id: u64) -> RpcPendingClaim {
        let (tx, rx) = oneshot::channel();

        {
            let mut state = self.state();
            state.abandoned.remove(&id);
            match state.arrived.remove(&id) {
                Some(delivery) => self.hand_over(&mut state, id, tx, delivery),
                None => {
                    if state.waiters.insert(id, tx).is_some() {
                        tracing::warn!("Replaced an existing waiter for response #{}", id);
                    }
                }
            }
        }

        RpcPendingClaim {
            id,
            rx,
            registry: Arc::clone(self),
            settled: false,
        }
    }

    /// Routes a delivery to the waiter for `id`, or parks it.
    pub fn deliver(&self, id: u64, delivery: RpcDelivery) {
        let mut state = self.state();

        if state.abandoned.remove(&id) {
            tracing::debug!("Dropping late response #{} (waiter gave up)", id);
            return;
        }

        match state.waiters.remove(&id) {
            Some(tx) => self.hand_over(&mut state, id, tx, delivery),
            None => {
                if state.arrived.contains_key(&id) {
                    tracing::warn!("Dropping duplicate response #{}", id);
                } else {
                    tracing::debug!("Parking response #{} (no waiter yet)", id);
                    state.arrived.insert(id, delivery);
                }
            }
        }
    }

    fn hand_over(
        &self,
        state: &mut PendingState,
        id: u64,
        tx: oneshot::Sender<RpcDelivery>,
        delivery: RpcDelivery,
    ) {
        let successful = match &delivery {
            Ok(response) if !response.is_error() => Some(response.clone()),
            _ => None,
        };

        match tx.send(delivery) {
            Ok(()) => {
                if let Some(response) = successful {
                    self.push_history(state, response);
                }
            }
            // The claim was dropped but has not withdrawn itself yet.
            Err(_) => {
                tracing::debug!("Waiter for response #{} went away; dropping", id);
            }
        }
    }

    fn push_history(&self, state: &mut PendingState, response: RpcResponse) {
        if self.history_capacity == 0 {
            return;
        }
        while state.history.len() >= self.history_capacity {
            state.history.pop_front();
        }
        state.history.push_back(response);
    }

    /// Removes and returns the parked delivery for `id`, if any.
    pub fn take(&self, id: u64) -> Option<RpcDelivery> {
        self.state().arrived.remove(&id)
    }

    /// Drains responses that arrived without a correlation id.
    pub fn take_unsolicited(&self) -> Vec<RpcResponse> {
        std::mem::take(&mut self.state().unsolicited)
    }

    /// Successfully claimed responses, oldest first.
    pub fn history(&self) -> Vec<RpcResponse> {
        self.state().history.iter().cloned().collect()
    }

    pub fn waiter_count(&self) -> usize {
        self.state().waiters.len()
    }

    /// Ids whose late responses will be dropped on arrival.
    pub fn abandoned_count(&self) -> usize {
        self.state().abandoned.len()
    }

    pub fn parked_count(&self) -> usize {
        self.state().arrived.len()
    }

    pub fn unsolicited_count(&self) -> usize {
        self.state().unsolicited.len()
    }

    /// Frames that could not be decoded and carried no usable id.
    pub fn undecodable_count(&self) -> u64 {
        self.state().undecodable
    }

    /// Releases every current waiter with `ConnectionLost`.
    ///
    /// Parked responses are left alone.
    pub fn fail_waiters(&self) {
        let waiters: Vec<_> = {
            let mut state = self.state();
            state.abandoned.clear();
            state.waiters.drain().collect()
        };

        if !waiters.is_empty() {
            tracing::warn!(
                "Failing {} outstanding request(s): connection lost",
                waiters.len()
            );
        }

        for (_, tx) in waiters {
            let _ = tx.send(Err(RpcDeliveryError::ConnectionLost));
        }
    }

    /// Tears the registry down. Remaining waiters resolve to `Closed`.
    pub fn clear(&self) {
        let mut state = self.state();
        state.waiters.clear();
        state.arrived.clear();
        state.abandoned.clear();
        state.unsolicited.clear();
        state.history.clear();
    }

    fn withdraw(&self, id: u64) {
        let mut state = self.state();
        if state.waiters.remove(&id).is_some() {
            state.abandoned.insert(id);
            while state.abandoned.len() > MAX_ABANDONED_REQUEST_IDS {
                state.abandoned.pop_first();
            }
            tracing::debug!("Withdrew waiter for response #{}", id);
        }
    }
}

impl RpcInbound for RpcPendingResponses {
    fn on_message(&self, bytes: &[u8]) {
        match RpcResponse::decode(bytes) {
            Ok(response) => match response.id {
                Some(id) => self.deliver(id, Ok(response)),
                None => {
                    tracing::trace!("Received unsolicited message: {}", response.raw);
                    self.state().unsolicited.push(response);
                }
            },
            Err(err) => match err.id {
                Some(id) => self.deliver(id, Err(RpcDeliveryError::Malformed(err.reason))),
                None => {
                    tracing::warn!("Discarding undecodable frame: {}", err);
                    self.state().undecodable += 1;
                }
            },
        }
    }

    fn on_disconnect(&self) {
        self.fail_waiters();
    }
}

/// A pending claim on the response for one request id.
///
/// Resolves once the delivery path hands over a matching response, the
/// connection is lost, or the registry is cleared.
pub struct RpcPendingClaim {
    id: u64,
    rx: oneshot::Receiver<RpcDelivery>,
    registry: Arc<RpcPendingResponses>,
    settled: bool,
}

impl RpcPendingClaim {
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl Future for RpcPendingClaim {
    type Output = RpcDelivery;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.rx).poll(cx) {
            Poll::Ready(delivery) => {
                self.settled = true;
                Poll::Ready(delivery.unwrap_or(Err(RpcDeliveryError::Closed)))
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl Drop for RpcPendingClaim {
    fn drop(&mut self) {
        if !self.settled {
            self.registry.withdraw(self.id);
        }
    }
}
