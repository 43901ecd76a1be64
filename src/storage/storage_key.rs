use super::{StorageHasher, twox_128};

/// `twox128(module) ++ twox128(item)`.
pub fn storage_prefix(module: &str, item: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(32);
    key.extend_from_slice(&twox_128(module.as_bytes()));
    key.extend_from_slice(&twox_128(item.as_bytes()));
    key
}

/// Full storage key for a value or map entry.
///
/// Each `(hasher, encoded_key)` pair contributes one segment, in order.
pub fn storage_key(module: &str, item: &str, keys: &[(StorageHasher, &[u8])]) -> Vec<u8> {
    let mut key = storage_prefix(module, item);
    for (hasher, encoded_key) in keys {
        key.extend(hasher.hash(encoded_key));
    }
    key
}
