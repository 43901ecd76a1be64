use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Identifies a block either by hash or by number.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BlockRef {
    Hash(String),
    Number(u64),
}

impl From<u64> for BlockRef {
    fn from(number: u64) -> Self {
        BlockRef::Number(number)
    }
}

impl From<&str> for BlockRef {
    fn from(hash: &str) -> Self {
        BlockRef::Hash(hash.to_string())
    }
}

impl From<String> for BlockRef {
    fn from(hash: String) -> Self {
        BlockRef::Hash(hash)
    }
}

impl fmt::Display for BlockRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockRef::Hash(hash) => write!(f, "{}", hash),
            BlockRef::Number(number) => write!(f, "#{}", number),
        }
    }
}

/// Block header as returned by `chain_getHeader`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockHeader {
    pub parent_hash: String,
    #[serde(deserialize_with = "deserialize_block_number")]
    pub number: u64,
    #[serde(default)]
    pub state_root: String,
    #[serde(default)]
    pub extrinsics_root: String,
    #[serde(default)]
    pub digest: Value,
}

impl BlockHeader {
    /// True when the parent hash is the all-zero sentinel carried by genesis.
    pub fn is_genesis(&self) -> bool {
        let digits = self
            .parent_hash
            .strip_prefix("0x")
            .unwrap_or(&self.parent_hash);
        !digits.is_empty() && digits.bytes().all(|b| b == b'0')
    }
}

/// Block body as returned inside `chain_getBlock`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub header: BlockHeader,
    #[serde(default)]
    pub extrinsics: Vec<String>,
}

/// Result of `chain_getBlock`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignedBlock {
    pub block: Block,
    #[serde(default)]
    pub justifications: Option<Value>,
}

// Nodes send header numbers as hex strings ("0x1a"); plain integers are
// accepted too.
fn deserialize_block_number<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Value::deserialize(deserializer)? {
        Value::Number(number) => number
            .as_u64()
            .ok_or_else(|| D::Error::custom(format!("invalid block number: {number}"))),
        Value::String(text) => {
            let parsed = match text.strip_prefix("0x") {
                Some(digits) => u64::from_str_radix(digits, 16),
                None => text.parse(),
            };
            parsed.map_err(|err| D::Error::custom(format!("invalid block number {text:?}: {err}")))
        }
        other => Err(D::Error::custom(format!("invalid block number: {other}"))),
    }
}
