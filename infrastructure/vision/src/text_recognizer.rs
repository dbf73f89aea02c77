use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;

use business::domain::card::model::{ServiceCredential, TextRegion};
use business::domain::card::services::TextRecognitionService;
use business::domain::errors::ServiceError;

use crate::client::{SUBSCRIPTION_KEY_HEADER, VisionClient};
use crate::dto::{ErrorBodyDto, OcrResponseDto};

pub struct TextRecognizerVision {
    client: VisionClient,
}

impl TextRecognizerVision {
    pub fn new(client: VisionClient) -> Self {
        Self { client }
    }

    fn error_from_body(status: u16, body: &str) -> ServiceError {
        let message = serde_json::from_str::<ErrorBodyDto>(body)
            .unwrap_or_default()
            .message_or(body);
        ServiceError::with_status(status, message)
    }
}

#[async_trait]
impl TextRecognitionService for TextRecognizerVision {
    async fn recognize_text(
        &self,
        image: &[u8],
        language: &str,
        credential: &ServiceCredential,
    ) -> Result<Vec<TextRegion>, ServiceError> {
        let url = self
            .client
            .ocr_url(language)
            .map_err(|e| ServiceError::transport(e.to_string()))?;

        let response = self
            .client
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/octet-stream")
            .header(SUBSCRIPTION_KEY_HEADER, credential.expose())
            .body(image.to_vec())
            .send()
            .await
            .map_err(|e| ServiceError::transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .map_err(|e| ServiceError::transport(e.to_string()))?;
            return Err(Self::error_from_body(status.as_u16(), &body));
        }

        let data: OcrResponseDto = response.json().await.map_err(|e| {
            ServiceError::with_status(status.as_u16(), format!("Invalid OCR response: {}", e))
        })?;

        Ok(data.into_regions())
    }
}
