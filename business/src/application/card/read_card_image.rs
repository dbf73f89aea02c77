use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::card::errors::CardError;
use crate::domain::card::extraction::extract;
use crate::domain::card::language::default_language;
use crate::domain::card::model::Card;
use crate::domain::card::services::TextRecognitionService;
use crate::domain::card::use_cases::read_card_image::{ReadCardImageParams, ReadCardImageUseCase};
use crate::domain::logger::Logger;

pub struct ReadCardImageUseCaseImpl {
    pub recognizer: Arc<dyn TextRecognitionService>,
    pub logger: Arc<dyn Logger>,
}

#[async_trait]
impl ReadCardImageUseCase for ReadCardImageUseCaseImpl {
    async fn execute(&self, params: ReadCardImageParams) -> Result<Card, CardError> {
        let language = default_language();
        self.logger.info(&format!(
            "Reading card image ({} bytes, language: {})",
            params.image.len(),
            language.code
        ));

        let regions = self
            .recognizer
            .recognize_text(&params.image, language.code, &params.credential)
            .await
            .inspect_err(|e| {
                self.logger.error(&format!(
                    "Text recognition failed (status: {:?}): {}",
                    e.status, e.message
                ))
            })?;

        self.logger
            .debug(&format!("Text recognition returned {} regions", regions.len()));

        let card = extract(&regions, &params.product_filter).inspect_err(|e| {
            self.logger
                .warn(&format!("Could not parse card fields: {:?}", e))
        })?;

        self.logger.info(&format!(
            "Card read: expiry {:02}/{:02}, number found: {}",
            card.expiry_month,
            card.expiry_year,
            card.number != 0
        ));

        Ok(card)
    }
}
