use xxhash_rust::xxh64::xxh64;

/// Hashers that can be applied to a storage map key.
///
/// Blake2-based hashers are not offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageHasher {
    Identity,
    Twox64Concat,
    Twox128,
}

impl StorageHasher {
    /// Hashes an encoded map key into its storage key segment.
    pub fn hash(&self, encoded_key: &[u8]) -> Vec<u8> {
        match self {
            StorageHasher::Identity => encoded_key.to_vec(),
            StorageHasher::Twox64Concat => {
                let mut out = twox_64(encoded_key).to_vec();
                out.extend_from_slice(encoded_key);
                out
            }
            StorageHasher::Twox128 => twox_128(encoded_key).to_vec(),
        }
    }
}

/// 64-bit xxHash with seed 0, little-endian.
pub fn twox_64(data: &[u8]) -> [u8; 8] {
    xxh64(data, 0).to_le_bytes()
}

/// Two 64-bit xxHash rounds (seeds 0 and 1), concatenated little-endian.
pub fn twox_128(data: &[u8]) -> [u8; 16] {
    let mut out = [0u8; 16];
    out[..8].copy_from_slice(&xxh64(data, 0).to_le_bytes());
    out[8..].copy_from_slice(&xxh64(data, 1).to_le_bytes());
    out
}
