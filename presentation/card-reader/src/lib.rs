//! Host-facing entry point of the card reader.
//!
//! The host platform supplies two adapters: a [`CaptureFlow`] that shows the
//! camera UI and a [`DeviceCapabilities`] probe. Everything else is wired here:
//! - config/: Environment configuration (vision endpoint, key, log filter)
//! - setup/: Tracing initialization and dependency injection

use std::sync::Arc;

use dotenvy::dotenv;

pub mod config;
pub mod setup;

pub use business::application::card::capture_session::CaptureSession;
pub use business::domain::card::errors::{CardError, ErrorKind};
pub use business::domain::card::model::{
    Card, CaptureEvent, CaptureOutcome, CaptureRequest, ProductFilter, RequestId,
    ServiceCredential,
};
pub use business::domain::card::services::{CaptureCompletion, CaptureFlow, DeviceCapabilities};
pub use business::domain::card::use_cases::read_card_image::ReadCardImageUseCase;

use business::domain::card::use_cases::recognize_card::{
    RecognizeCardParams, RecognizeCardUseCase,
};
use config::app_config::AppConfig;
use setup::dependency_injection::DependencyContainer;
use setup::logging::init_tracing;

pub struct CardReaderSdk {
    container: DependencyContainer,
}

impl CardReaderSdk {
    /// Builds a reader from the process environment (and `.env`, when present).
    pub fn from_env<F>(capture_flow: F, device: Arc<dyn DeviceCapabilities>) -> anyhow::Result<Self>
    where
        F: FnOnce(Arc<dyn ReadCardImageUseCase>) -> Arc<dyn CaptureFlow>,
    {
        dotenv().ok();
        let config = AppConfig::from_env();
        init_tracing(&config.log_filter);

        Self::with_config(&config, capture_flow, device)
    }

    pub fn with_config<F>(
        config: &AppConfig,
        capture_flow: F,
        device: Arc<dyn DeviceCapabilities>,
    ) -> anyhow::Result<Self>
    where
        F: FnOnce(Arc<dyn ReadCardImageUseCase>) -> Arc<dyn CaptureFlow>,
    {
        let container = DependencyContainer::new(config, capture_flow, device)?;
        tracing::debug!(endpoint = %config.vision.endpoint, "Card reader wired");
        Ok(Self { container })
    }

    pub fn initialize(&self, api_key: &str) -> bool {
        self.container
            .recognize_card
            .initialize(ServiceCredential::new(api_key))
    }

    /// Opens the capture flow and waits for the user to photograph a card.
    ///
    /// `Ok(None)` when the user closed the capture UI.
    pub async fn recognize_card<I, S>(&self, products: I) -> Result<Option<Card>, CardError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let params = RecognizeCardParams {
            product_filter: products.into_iter().collect(),
        };
        self.container.recognize_card.recognize_card(params).await
    }

    /// Delivers a capture flow's terminal event; false for a stale request id.
    pub fn complete(&self, event: CaptureEvent) -> bool {
        self.container.recognize_card.complete(event)
    }

    pub fn is_pending(&self) -> bool {
        self.container.recognize_card.is_pending()
    }

    pub fn read_card_image(&self) -> Arc<dyn ReadCardImageUseCase> {
        self.container.read_card_image.clone()
    }
}
