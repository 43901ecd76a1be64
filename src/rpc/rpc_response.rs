use super::RpcDecodeError;
use crate::utils::now;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The `error` member of a JSON-RPC response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// One decoded inbound frame.
///
/// `id` is `None` for unsolicited pushes such as subscription notifications;
/// for those, `result` carries the notification's `params`.
#[derive(Debug, Clone, PartialEq)]
pub struct RpcResponse {
    pub id: Option<u64>,
    pub result: Value,
    pub error: Option<RpcErrorObject>,
    pub raw: String,
    pub received_at: DateTime<Utc>,
}

impl RpcResponse {
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Decodes one inbound transport frame.
    pub fn decode(bytes: &[u8]) -> Result<RpcResponse, RpcDecodeError> {
        let raw = std::str::from_utf8(bytes)
            .map_err(|err| RpcDecodeError::new(None, format!("frame is not UTF-8: {err}")))?;

        let value: Value = serde_json::from_str(raw)
            .map_err(|err| RpcDecodeError::new(None, format!("invalid JSON: {err}")))?;

        let Value::Object(mut object) = value else {
            return Err(RpcDecodeError::new(None, "frame is not a JSON object"));
        };

        let id = Self::decode_id(&object)?;

        let error = match object.remove("error") {
            None | Some(Value::Null) => None,
            Some(error) => Some(serde_json::from_value::<RpcErrorObject>(error).map_err(
                |err| RpcDecodeError::new(id, format!("invalid error object: {err}")),
            )?),
        };

        let result = match (object.remove("result"), error.is_some(), id) {
            (Some(result), _, _) => result,
            (None, true, _) => Value::Null,
            // Notification: `{"method": .., "params": ..}`
            (None, false, None) => object.remove("params").unwrap_or(Value::Null),
            (None, false, Some(_)) => {
                return Err(RpcDecodeError::new(
                    id,
                    "response carries neither `result` nor `error`",
                ));
            }
        };

        Ok(RpcResponse {
            id,
            result,
            error,
            raw: raw.to_string(),
            received_at: now(),
        })
    }

    fn decode_id(object: &Map<String, Value>) -> Result<Option<u64>, RpcDecodeError> {
        match object.get("id") {
            None | Some(Value::Null) => Ok(None),
            Some(id) => id
                .as_u64()
                .or_else(|| id.as_str().and_then(|s| s.parse().ok()))
                .map(Some)
                .ok_or_else(|| RpcDecodeError::new(None, format!("unsupported id: {id}"))),
        }
    }
}
