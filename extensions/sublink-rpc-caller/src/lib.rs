mod config;
mod dispatcher;
pub mod error;
mod node_api;
mod node_client;
mod runtime_sequencer;
pub mod transport;

pub use config::ClientConfig;
pub use dispatcher::RpcDispatcher;
pub use error::RpcCallError;
pub use node_client::{NodeClient, NodeClientBuilder};
pub use transport::{RpcChannel, RpcConnector, RpcTransportState};
