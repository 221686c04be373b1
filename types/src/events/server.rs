/// An inbound frame. The endpoint controls the shape, so the parsed JSON is
/// kept whole and classified by its top-level keys only.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ServerMessage(serde_json::Value);

impl ServerMessage {
    pub fn parse(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text).map(Self)
    }

    /// `setupResponse` body, present on the handshake acknowledgement.
    pub fn setup_response(&self) -> Option<&serde_json::Value> {
        self.0.get("setupResponse")
    }

    /// The `serverContent` object, but only when it carries a `modelTurn`.
    pub fn server_content(&self) -> Option<&serde_json::Value> {
        self.0
            .get("serverContent")
            .filter(|content| content.get("modelTurn").is_some())
    }

    pub fn usage_metadata(&self) -> Option<UsageMetadata> {
        let usage = self.0.get("usageMetadata")?;
        let count = |key: &str| usage.get(key).and_then(|v| v.as_u64()).unwrap_or(0);
        Some(UsageMetadata {
            prompt_tokens: count("promptTokenCount"),
            response_tokens: count("responseTokenCount"),
            total_tokens: count("totalTokenCount"),
        })
    }

    /// First top-level key, used to label the frame in logs.
    pub fn kind(&self) -> &str {
        self.0
            .as_object()
            .and_then(|object| object.keys().next())
            .map(String::as_str)
            .unwrap_or("unknown")
    }

    pub fn into_value(self) -> serde_json::Value {
        self.0
    }
}

/// Token counters reported in `usageMetadata`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UsageMetadata {
    pub prompt_tokens: u64,
    pub response_tokens: u64,
    pub total_tokens: u64,
}
