/// Decodes a node-style hex string, with or without the `0x` prefix.
pub fn decode_prefixed_hex(value: &str) -> Result<Vec<u8>, hex::FromHexError> {
    hex::decode(value.strip_prefix("0x").unwrap_or(value))
}

/// Encodes bytes the way the node expects them in params: `0x` + lowercase hex.
pub fn encode_prefixed_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}
