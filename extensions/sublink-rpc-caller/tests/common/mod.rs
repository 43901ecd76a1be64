#![allow(dead_code)]

use serde_json::{Value, json};
use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use sublink::rpc::RpcInbound;
use sublink_rpc_caller::{ClientConfig, NodeClient, RpcChannel, RpcConnector};

/// What the mock node does with a request.
#[derive(Clone)]
pub enum Reply {
    Result(Value),
    Error { code: i64, message: String },
    /// Sends back this exact text, `{id}` replaced by the request id.
    Raw(String),
    /// Never answers.
    Silent,
}

/// A scripted node: answers by method, or by method plus exact params.
#[derive(Default)]
pub struct MockNode {
    by_method: Mutex<HashMap<String, Reply>>,
    by_params: Mutex<HashMap<(String, String), Reply>>,
    calls: Mutex<Vec<(String, Vec<Value>)>>,
}

impl MockNode {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn on(&self, method: &str, result: Value) {
        self.reply(method, Reply::Result(result));
    }

    pub fn reply(&self, method: &str, reply: Reply) {
        self.by_method
            .lock()
            .unwrap()
            .insert(method.to_string(), reply);
    }

    pub fn on_params(&self, method: &str, params: Vec<Value>, result: Value) {
        self.reply_params(method, params, Reply::Result(result));
    }

    pub fn reply_params(&self, method: &str, params: Vec<Value>, reply: Reply) {
        self.by_params
            .lock()
            .unwrap()
            .insert((method.to_string(), Value::Array(params).to_string()), reply);
    }

    pub fn calls(&self) -> Vec<(String, Vec<Value>)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, method: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(called, _)| called == method)
            .count()
    }

    /// Records the request and returns the frame to send back, if any.
    fn answer(&self, frame: &str) -> Option<String> {
        let request: Value = serde_json::from_str(frame).unwrap();
        let id = request["id"].as_u64().unwrap();
        let method = request["method"].as_str().unwrap().to_string();
        let params: Vec<Value> = request["params"].as_array().cloned().unwrap_or_default();

        self.calls
            .lock()
            .unwrap()
            .push((method.clone(), params.clone()));

        let exact = self
            .by_params
            .lock()
            .unwrap()
            .get(&(method.clone(), Value::Array(params).to_string()))
            .cloned();
        let reply = exact.or_else(|| self.by_method.lock().unwrap().get(&method).cloned());

        match reply {
            Some(Reply::Result(result)) => {
                Some(json!({"jsonrpc": "2.0", "id": id, "result": result}).to_string())
            }
            Some(Reply::Error { code, message }) => Some(
                json!({"jsonrpc": "2.0", "id": id, "error": {"code": code, "message": message}})
                    .to_string(),
            ),
            Some(Reply::Raw(text)) => Some(text.replace("{id}", &id.to_string())),
            Some(Reply::Silent) => None,
            None => Some(
                json!({"jsonrpc": "2.0", "id": id, "error": {"code": -32601, "message": "Method not found"}})
                    .to_string(),
            ),
        }
    }
}

/// In-memory channel to a [`MockNode`]; replies arrive on a spawned task.
pub struct MockChannel {
    node: Arc<MockNode>,
    inbound: Arc<dyn RpcInbound>,
    connected: AtomicBool,
    sent: AtomicUsize,
}

impl MockChannel {
    pub fn new(node: Arc<MockNode>, inbound: Arc<dyn RpcInbound>) -> Arc<Self> {
        Arc::new(Self {
            node,
            inbound,
            connected: AtomicBool::new(true),
            sent: AtomicUsize::new(0),
        })
    }

    /// Simulates the node hanging up.
    pub fn drop_connection(&self) {
        if self.connected.swap(false, Ordering::SeqCst) {
            self.inbound.on_disconnect();
        }
    }

    /// Marks the channel dead without notifying anyone.
    pub fn go_stale(&self) {
        self.connected.store(false, Ordering::SeqCst);
    }

    pub fn sent_count(&self) -> usize {
        self.sent.load(Ordering::SeqCst)
    }
}

impl RpcChannel for MockChannel {
    fn send(&self, frame: String) -> io::Result<()> {
        if !self.connected.load(Ordering::SeqCst) {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "mock channel closed"));
        }

        self.sent.fetch_add(1, Ordering::SeqCst);

        if let Some(reply) = self.node.answer(&frame) {
            let inbound = self.inbound.clone();
            tokio::spawn(async move {
                inbound.on_message(reply.as_bytes());
            });
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn close(&self) {
        self.connected.store(false, Ordering::SeqCst);
    }
}

/// Opens [`MockChannel`]s; can be told to refuse.
pub struct MockConnector {
    node: Arc<MockNode>,
    refuse: AtomicBool,
    opens: AtomicUsize,
    channels: Mutex<Vec<Arc<MockChannel>>>,
}

impl MockConnector {
    pub fn new(node: Arc<MockNode>) -> Arc<Self> {
        Arc::new(Self {
            node,
            refuse: AtomicBool::new(false),
            opens: AtomicUsize::new(0),
            channels: Mutex::new(Vec::new()),
        })
    }

    pub fn refuse_connections(&self, refuse: bool) {
        self.refuse.store(refuse, Ordering::SeqCst);
    }

    /// Open attempts so far, including refused ones.
    pub fn open_count(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    pub fn latest_channel(&self) -> Arc<MockChannel> {
        self.channels.lock().unwrap().last().cloned().unwrap()
    }
}

#[async_trait::async_trait]
impl RpcConnector for MockConnector {
    async fn open(
        &self,
        _address: &str,
        inbound: Arc<dyn RpcInbound>,
    ) -> io::Result<Arc<dyn RpcChannel>> {
        self.opens.fetch_add(1, Ordering::SeqCst);

        if self.refuse.load(Ordering::SeqCst) {
            return Err(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "mock node refused",
            ));
        }

        let channel = MockChannel::new(self.node.clone(), inbound);
        self.channels.lock().unwrap().push(channel.clone());
        Ok(channel)
    }
}

pub const NODE_ADDRESS: &str = "ws://mock-node:9944";

pub async fn connect_with(
    node: &Arc<MockNode>,
    config: ClientConfig,
) -> (NodeClient, Arc<MockConnector>) {
    let connector = MockConnector::new(node.clone());
    let client = NodeClient::connect(NODE_ADDRESS, connector.clone(), config)
        .await
        .unwrap();
    (client, connector)
}

pub async fn connect(node: &Arc<MockNode>) -> (NodeClient, Arc<MockConnector>) {
    connect_with(node, ClientConfig::default()).await
}

pub fn hash(n: u8) -> String {
    format!("0x{}", hex_byte(n).repeat(32))
}

fn hex_byte(n: u8) -> String {
    format!("{:02x}", n)
}

pub fn header(parent_hash: &str, number: u64) -> Value {
    json!({
        "parentHash": parent_hash,
        "number": format!("0x{:x}", number),
        "stateRoot": hash(0xaa),
        "extrinsicsRoot": hash(0xbb),
        "digest": {"logs": []}
    })
}

pub fn runtime_version(spec_version: u32, transaction_version: u32) -> Value {
    json!({
        "specName": "polkadot",
        "implName": "parity-polkadot",
        "authoringVersion": 0,
        "specVersion": spec_version,
        "implVersion": 0,
        "transactionVersion": transaction_version,
        "apis": []
    })
}
