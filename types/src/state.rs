use std::fmt;

/// Lifecycle of a streaming session as seen by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum ConnectionState {
    /// Never connected.
    #[default]
    Idle,
    /// Transport handshake in flight.
    Connecting,
    /// Socket open, `setup` sent, waiting for `setupResponse`.
    AwaitingSetupAck,
    /// Setup acknowledged; sends are accepted.
    Ready,
    /// Socket closed, either by the caller or by the peer.
    Closed,
}

impl ConnectionState {
    /// True while a socket is open, whether or not setup has completed.
    pub fn is_open(&self) -> bool {
        matches!(self, ConnectionState::AwaitingSetupAck | ConnectionState::Ready)
    }

    /// True for every state in which a new `connect` must be refused.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            ConnectionState::Connecting | ConnectionState::AwaitingSetupAck | ConnectionState::Ready
        )
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConnectionState::Idle => "idle",
            ConnectionState::Connecting => "connecting",
            ConnectionState::AwaitingSetupAck => "awaiting setup ack",
            ConnectionState::Ready => "ready",
            ConnectionState::Closed => "closed",
        };
        f.write_str(name)
    }
}
