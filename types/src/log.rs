use chrono::{DateTime, Utc};

/// One entry of the diagnostic trail published through `LiveEvent::Log`.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq)]
pub struct LogEntry {
    timestamp: DateTime<Utc>,

    /// Dotted origin/kind, ex: "client.send", "server.content"
    category: String,

    payload: serde_json::Value,
}

impl LogEntry {
    pub fn new(category: &str, payload: serde_json::Value) -> Self {
        Self {
            timestamp: Utc::now(),
            category: category.to_string(),
            payload,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn payload(&self) -> &serde_json::Value {
        &self.payload
    }
}
