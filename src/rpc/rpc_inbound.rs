/// Receiving side of a transport channel.
///
/// A transport calls `on_message` once per inbound frame, from whatever task
/// or thread owns the socket, and `on_disconnect` once when the connection is
/// gone. Implementations must not block for long; they sit on the socket's
/// read path.
pub trait RpcInbound: Send + Sync {
    fn on_message(&self, bytes: &[u8]);

    fn on_disconnect(&self);
}
