use secrecy::ExposeSecret;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::error::UrlError;
use tokio_tungstenite::tungstenite::handshake::client::Request;
use crate::client::config::Config;
use crate::client::consts::API_KEY_QUERY_PARAM;

/// Endpoint URL with the API key appended as a percent-encoded query
/// parameter. A path-less endpoint gets the root path.
pub fn build_request(config: &Config) -> tokio_tungstenite::tungstenite::Result<Request> {
    let mut endpoint = url::Url::parse(config.base_url()).map_err(|e| {
        tokio_tungstenite::tungstenite::Error::Url(UrlError::UnableToConnect(format!(
            "{}: {}",
            config.base_url(),
            e
        )))
    })?;
    endpoint
        .query_pairs_mut()
        .append_pair(API_KEY_QUERY_PARAM, config.api_key().expose_secret());
    endpoint.as_str().into_client_request()
}
