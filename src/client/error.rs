use multimodal_live_types::ConnectionState;

use crate::client::config::ConfigError;

/// Failures surfaced to callers. Everything past connection establishment is
/// reported through the event stream instead.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("already connected ({0}), disconnect first")]
    AlreadyConnected(ConnectionState),
    #[error("failed to connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: tokio_tungstenite::tungstenite::Error,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, ClientError>;
