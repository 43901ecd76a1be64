use crate::constants::JSONRPC_VERSION;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outbound JSON-RPC 2.0 request envelope.
///
/// Serializes to `{"jsonrpc":"2.0","method":..,"params":[..],"id":n}`, in
/// that field order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    pub params: Vec<Value>,
    pub id: u64,
}

impl RpcRequest {
    pub fn new(id: u64, method: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params,
            id,
        }
    }

    /// Serializes the envelope into a single text frame.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
