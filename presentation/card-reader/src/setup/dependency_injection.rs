use std::sync::Arc;

use anyhow::Context;

use logger::TracingLogger;
use vision::client::VisionClient;
use vision::text_recognizer::TextRecognizerVision;

use business::application::card::read_card_image::ReadCardImageUseCaseImpl;
use business::application::card::recognize_card::RecognizeCardUseCaseImpl;
use business::domain::card::model::ServiceCredential;
use business::domain::card::services::{CaptureFlow, DeviceCapabilities};
use business::domain::card::use_cases::read_card_image::ReadCardImageUseCase;
use business::domain::card::use_cases::recognize_card::RecognizeCardUseCase;
use business::domain::logger::Logger;

use crate::config::app_config::AppConfig;

pub struct DependencyContainer {
    pub recognize_card: Arc<RecognizeCardUseCaseImpl>,
    pub read_card_image: Arc<dyn ReadCardImageUseCase>,
}

impl DependencyContainer {
    /// Wires the reader.
    ///
    /// `capture_flow` receives the image reading use case so the platform
    /// flow can build a `CaptureSession` for each launch.
    pub fn new<F>(
        config: &AppConfig,
        capture_flow: F,
        device: Arc<dyn DeviceCapabilities>,
    ) -> anyhow::Result<Self>
    where
        F: FnOnce(Arc<dyn ReadCardImageUseCase>) -> Arc<dyn CaptureFlow>,
    {
        let logger: Arc<dyn Logger> = Arc::new(TracingLogger);

        // Infrastructure adapters
        let vision_client = VisionClient::new(&config.vision.endpoint, config.vision.timeout)
            .with_context(|| format!("invalid VISION_ENDPOINT: {}", config.vision.endpoint))?;
        let recognizer = Arc::new(TextRecognizerVision::new(vision_client));

        // Card use cases
        let read_card_image: Arc<dyn ReadCardImageUseCase> = Arc::new(ReadCardImageUseCaseImpl {
            recognizer,
            logger: logger.clone(),
        });
        let recognize_card = Arc::new(RecognizeCardUseCaseImpl::new(
            capture_flow(read_card_image.clone()),
            device,
            logger,
        ));

        if let Some(api_key) = &config.vision.api_key {
            recognize_card.initialize(ServiceCredential::new(api_key.clone()));
        }

        Ok(Self {
            recognize_card,
            read_card_image,
        })
    }
}
