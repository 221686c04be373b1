pub const API_KEY_VAR: &str = "MULTIMODAL_LIVE_API_KEY";
pub const BASE_URL_VAR: &str = "MULTIMODAL_LIVE_URL";

pub const BASE_URL: &str = "wss://generativelanguage.googleapis.com/ws/google.ai.generativelanguage.v1alpha.GenerativeService.BidiGenerateContent";
pub const API_KEY_QUERY_PARAM: &str = "key";

pub const DEFAULT_EVENT_CAPACITY: usize = 1024;
pub const DEFAULT_SETUP_RETRY_INTERVAL_MS: u64 = 1000;
pub const DEFAULT_RECONNECT_DELAY_MS: u64 = 2000;
pub const MIN_INTERVAL_MS: u64 = 1;
