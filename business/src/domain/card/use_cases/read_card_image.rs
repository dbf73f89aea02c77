use async_trait::async_trait;

use crate::domain::card::errors::CardError;
use crate::domain::card::model::{Card, ProductFilter, ServiceCredential};

#[derive(Debug)]
pub struct ReadCardImageParams {
    pub image: Vec<u8>,
    pub product_filter: ProductFilter,
    pub credential: ServiceCredential,
}

#[async_trait]
pub trait ReadCardImageUseCase: Send + Sync {
    async fn execute(&self, params: ReadCardImageParams) -> Result<Card, CardError>;
}
