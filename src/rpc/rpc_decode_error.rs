use std::fmt;

/// An inbound frame that could not be turned into an `RpcResponse`.
///
/// `id` is set when the frame was valid JSON carrying a correlation id, so
/// the failure can still be routed to the caller waiting on it.
#[derive(Debug, Clone, PartialEq)]
pub struct RpcDecodeError {
    pub id: Option<u64>,
    pub reason: String,
}

impl RpcDecodeError {
    pub fn new(id: Option<u64>, reason: impl Into<String>) -> Self {
        Self {
            id,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for RpcDecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            Some(id) => write!(f, "malformed response #{}: {}", id, self.reason),
            None => write!(f, "malformed response: {}", self.reason),
        }
    }
}

impl std::error::Error for RpcDecodeError {}

/// Why a registered waiter was released without a decoded response.
#[derive(Debug, Clone, PartialEq)]
pub enum RpcDeliveryError {
    /// A frame tagged with the waiter's id arrived but could not be decoded.
    Malformed(String),
    /// The channel the request went out on died before a reply arrived.
    ConnectionLost,
    /// The registry was torn down while the waiter was outstanding.
    Closed,
}

impl fmt::Display for RpcDeliveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RpcDeliveryError::Malformed(reason) => write!(f, "malformed response: {}", reason),
            RpcDeliveryError::ConnectionLost => write!(f, "connection lost while awaiting response"),
            RpcDeliveryError::Closed => write!(f, "response registry closed"),
        }
    }
}

impl std::error::Error for RpcDeliveryError {}
