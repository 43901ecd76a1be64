mod active_runtime;
mod block;
mod chain_properties;
mod metadata_cache;
mod runtime_version;

pub use active_runtime::ActiveRuntime;
pub use block::{Block, BlockHeader, BlockRef, SignedBlock};
pub use chain_properties::ChainProperties;
pub use metadata_cache::MetadataCache;
pub use runtime_version::RuntimeVersion;
