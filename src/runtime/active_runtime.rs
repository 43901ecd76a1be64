/// Snapshot of which runtime a client currently has loaded.
///
/// All fields are `None` until the first runtime initialization completes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveRuntime {
    pub block_hash: Option<String>,
    pub block_number: Option<u64>,
    pub runtime_version: Option<u32>,
    pub transaction_version: Option<u32>,
}
