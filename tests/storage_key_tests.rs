use sublink::storage::{StorageHasher, storage_key, storage_prefix, twox_128};
use sublink::utils::encode_prefixed_hex;

#[test]
fn test_twox_128_matches_well_known_prefixes() {
    assert_eq!(
        hex::encode(twox_128(b"System")),
        "26aa394eea5630e07c48ae0c9558cef7"
    );
    assert_eq!(
        hex::encode(twox_128(b"Account")),
        "b99d880ec681799c0cf30e8886371da9"
    );
}

#[test]
fn test_storage_prefix_for_timestamp_now() {
    assert_eq!(
        encode_prefixed_hex(&storage_prefix("Timestamp", "Now")),
        "0xf0c365c3cf59d671eb72da0e7a4113c49f1f0515f462cdcf84e0f1d6045dfcbb"
    );
}

#[test]
fn test_storage_key_appends_hashed_segments_in_order() {
    let account = [7u8; 32];
    let key = storage_key(
        "System",
        "Account",
        &[(StorageHasher::Twox64Concat, &account[..])],
    );

    // prefix (32) + twox64 (8) + raw key (32)
    assert_eq!(key.len(), 72);
    assert_eq!(&key[..32], storage_prefix("System", "Account").as_slice());
    assert_eq!(&key[40..], &account[..]);
}

#[test]
fn test_identity_and_twox128_hashers() {
    let encoded = [1u8, 2, 3];

    assert_eq!(StorageHasher::Identity.hash(&encoded), encoded.to_vec());
    assert_eq!(
        StorageHasher::Twox128.hash(&encoded),
        twox_128(&encoded).to_vec()
    );
}

#[test]
fn test_plain_value_key_is_just_the_prefix() {
    assert_eq!(
        storage_key("Timestamp", "Now", &[]),
        storage_prefix("Timestamp", "Now")
    );
}
