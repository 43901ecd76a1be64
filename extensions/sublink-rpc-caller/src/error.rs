use std::fmt;
use std::io;
use std::time::Duration;
use sublink::rpc::RpcDeliveryError;

/// Represents errors that can occur during a call from the perspective of the caller.
#[derive(Debug)]
pub enum RpcCallError {
    /// The transport could not be established or resumed.
    Connection(String),
    /// The channel is closed and reconnecting is disabled or impossible.
    TransportUnavailable,
    /// The channel died while the call was waiting for its response.
    ConnectionLost,
    /// The client was torn down.
    Closed,
    /// The node answered with an error object; `message` is verbatim.
    Remote { code: i64, message: String },
    /// The node's reply could not be decoded into the expected shape.
    MalformedResponse(String),
    /// The request envelope could not be serialized.
    MalformedRequest(String),
    /// No matching response arrived in time.
    Timeout { method: String, after: Duration },
    /// The node does not know the requested block.
    UnknownBlock(String),
    /// Conflicting or missing startup parameters.
    Configuration(String),
}

impl fmt::Display for RpcCallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RpcCallError::Connection(msg) => write!(f, "Connection error: {}", msg),
            RpcCallError::TransportUnavailable => {
                write!(f, "Transport unavailable: connection closed and reconnect is not possible")
            }
            RpcCallError::ConnectionLost => write!(f, "Connection lost while awaiting response"),
            RpcCallError::Closed => write!(f, "Client closed"),
            RpcCallError::Remote { code, message } => {
                write!(f, "Remote error ({}): {}", code, message)
            }
            RpcCallError::MalformedResponse(msg) => write!(f, "Malformed response: {}", msg),
            RpcCallError::MalformedRequest(msg) => write!(f, "Malformed request: {}", msg),
            RpcCallError::Timeout { method, after } => {
                write!(f, "Call to {} timed out after {:?}", method, after)
            }
            RpcCallError::UnknownBlock(block) => write!(f, "Unknown block: {}", block),
            RpcCallError::Configuration(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for RpcCallError {}

impl From<io::Error> for RpcCallError {
    fn from(e: io::Error) -> Self {
        RpcCallError::Connection(e.to_string())
    }
}

impl From<RpcDeliveryError> for RpcCallError {
    fn from(e: RpcDeliveryError) -> Self {
        match e {
            RpcDeliveryError::Malformed(reason) => RpcCallError::MalformedResponse(reason),
            RpcDeliveryError::ConnectionLost => RpcCallError::ConnectionLost,
            RpcDeliveryError::Closed => RpcCallError::Closed,
        }
    }
}
