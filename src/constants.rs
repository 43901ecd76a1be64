/// JSON-RPC protocol version placed in every outbound envelope.
pub const JSONRPC_VERSION: &str = "2.0";

/// The first request id handed out by a fresh id counter.
pub const FIRST_REQUEST_ID: u64 = 1;

/// Parent hash carried by the genesis block header.
///
/// A header with this parent has no parent state to query, so its runtime is
/// read from the block's own hash instead.
pub const GENESIS_PARENT_HASH: &str =
    "0x0000000000000000000000000000000000000000000000000000000000000000";

/// Address format used when the node does not advertise one.
pub const DEFAULT_SS58_FORMAT: u16 = 42;

/// Token symbol used when the node does not advertise one.
pub const DEFAULT_TOKEN_SYMBOL: &str = "UNIT";

/// Token decimals used when the node does not advertise them.
pub const DEFAULT_TOKEN_DECIMALS: u8 = 0;

/// How long a call waits for its matching response before giving up.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

/// How many reconnect-and-resend rounds a single call may trigger.
pub const DEFAULT_MAX_RECONNECT_ATTEMPTS: u32 = 1;

/// The number of successfully claimed responses kept for inspection.
///
/// Oldest entries are dropped first once the limit is reached.
pub const DEFAULT_RESPONSE_HISTORY_CAPACITY: usize = 256;

/// How many given-up request ids are remembered so their late responses can
/// be dropped. Older ids are forgotten first.
pub const MAX_ABANDONED_REQUEST_IDS: usize = 1024;
