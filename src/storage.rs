//! Storage key construction for `state_getStorage`.
//!
//! A storage key is `twox128(module) ++ twox128(item)` followed by one hashed
//! segment per map key. Map keys are passed in already SCALE-encoded; this
//! module never encodes or decodes values itself.

mod storage_hasher;
mod storage_key;

pub use storage_hasher::{StorageHasher, twox_64, twox_128};
pub use storage_key::{storage_key, storage_prefix};
