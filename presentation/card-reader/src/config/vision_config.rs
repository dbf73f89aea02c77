use std::env;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://westus.api.cognitive.microsoft.com";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the vision OCR API.
#[derive(Debug, Clone)]
pub struct VisionConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl VisionConfig {
    /// Load vision configuration from environment variables
    ///
    /// Environment variables:
    /// - VISION_ENDPOINT: Service base URL (default: "https://westus.api.cognitive.microsoft.com")
    /// - VISION_API_KEY: Subscription key; when unset the host must call `initialize`
    /// - VISION_TIMEOUT_SECS: Request timeout in seconds (default: 30)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let endpoint = lookup("VISION_ENDPOINT").unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let api_key = lookup("VISION_API_KEY").filter(|key| !key.trim().is_empty());
        let timeout_secs = lookup("VISION_TIMEOUT_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            endpoint,
            api_key,
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}
