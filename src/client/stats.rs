use multimodal_live_types::events::server::UsageMetadata;

/// Counters for one client across all of its connections.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Stats {
    frames_sent: u64,
    frames_received: u64,
    setup_attempts: u64,
    reconnects: u64,
    total_tokens: u64,
    input_tokens: u64,
    output_tokens: u64,
}

impl Stats {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn update_usage(&mut self, usage: UsageMetadata) {
        self.total_tokens += usage.total_tokens;
        self.input_tokens += usage.prompt_tokens;
        self.output_tokens += usage.response_tokens;
    }

    pub(crate) fn record_sent(&mut self) {
        self.frames_sent += 1;
    }

    pub(crate) fn record_received(&mut self) {
        self.frames_received += 1;
    }

    pub(crate) fn record_setup_attempt(&mut self) {
        self.setup_attempts += 1;
    }

    pub(crate) fn record_reconnect(&mut self) {
        self.reconnects += 1;
    }

    pub fn frames_sent(&self) -> u64 {
        self.frames_sent
    }

    pub fn frames_received(&self) -> u64 {
        self.frames_received
    }

    /// Number of `setup` frames written, retries included.
    pub fn setup_attempts(&self) -> u64 {
        self.setup_attempts
    }

    /// Number of automatic reconnects that were actually started.
    pub fn reconnects(&self) -> u64 {
        self.reconnects
    }

    pub fn total_tokens(&self) -> u64 {
        self.total_tokens
    }

    pub fn input_tokens(&self) -> u64 {
        self.input_tokens
    }

    pub fn output_tokens(&self) -> u64 {
        self.output_tokens
    }
}
