mod rpc_decode_error;
mod rpc_inbound;
mod rpc_pending_responses;
mod rpc_request;
mod rpc_response;

pub use rpc_decode_error::{RpcDecodeError, RpcDeliveryError};
pub use rpc_inbound::RpcInbound;
pub use rpc_pending_responses::{RpcDelivery, RpcPendingClaim, RpcPendingResponses};
pub use rpc_request::RpcRequest;
pub use rpc_response::{RpcErrorObject, RpcResponse};
