pub mod client;
pub mod server;

pub use client::ClientMessage;
pub use server::ServerMessage;

use crate::log::LogEntry;

/// Events a client publishes to its subscribers.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type")]
pub enum LiveEvent {
    #[serde(rename = "open")]
    Open,
    #[serde(rename = "close")]
    Close {
        reason: Option<String>,
    },
    /// Every inbound frame that parsed as JSON, unmodified.
    #[serde(rename = "message")]
    Message {
        message: serde_json::Value,
    },
    /// The `serverContent` object of frames that carry a `modelTurn`.
    #[serde(rename = "content")]
    Content {
        content: serde_json::Value,
    },
    #[serde(rename = "log")]
    Log(LogEntry),
}
