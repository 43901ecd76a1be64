pub mod constants;
pub mod rpc;
pub mod runtime;
pub mod storage;
pub mod utils;
