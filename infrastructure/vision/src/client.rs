use std::time::Duration;

use reqwest::Client;
use url::Url;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const OCR_PATH: &str = "vision/v3.2/ocr";

/// Header carrying the subscription key.
pub const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// Shared HTTP client configuration for the vision OCR API.
pub struct VisionClient {
    pub client: Client,
    pub endpoint: Url,
}

impl VisionClient {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, url::ParseError> {
        let mut endpoint = Url::parse(endpoint)?;
        if !endpoint.path().ends_with('/') {
            let path = format!("{}/", endpoint.path());
            endpoint.set_path(&path);
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        Ok(Self { client, endpoint })
    }

    /// Returns the OCR endpoint URL for `language`.
    pub fn ocr_url(&self, language: &str) -> Result<Url, url::ParseError> {
        let mut url = self.endpoint.join(OCR_PATH)?;
        url.query_pairs_mut()
            .append_pair("language", language)
            .append_pair("detectOrientation", "true");
        Ok(url)
    }
}
