use async_trait::async_trait;

use crate::domain::card::errors::CardError;
use crate::domain::card::model::{Card, ProductFilter, ServiceCredential};

#[derive(Debug)]
pub struct RecognizeCardParams {
    pub product_filter: ProductFilter,
}

#[async_trait]
pub trait RecognizeCardUseCase: Send + Sync {
    /// Stores the OCR credential used by every later recognition.
    fn initialize(&self, credential: ServiceCredential) -> bool;

    /// Runs one capture flow and waits for its result.
    ///
    /// `Ok(None)` means the user closed the capture UI without a photo.
    async fn recognize_card(&self, params: RecognizeCardParams) -> Result<Option<Card>, CardError>;
}
