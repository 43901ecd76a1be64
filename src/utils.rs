mod hex_bytes;
mod now;
mod request_id_counter;

pub use hex_bytes::{decode_prefixed_hex, encode_prefixed_hex};
pub use now::now;
pub use request_id_counter::RequestIdCounter;
