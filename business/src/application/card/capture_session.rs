use std::sync::Arc;

use crate::domain::card::model::{CaptureEvent, CaptureRequest, RequestId};
use crate::domain::card::use_cases::read_card_image::{ReadCardImageParams, ReadCardImageUseCase};

/// One platform capture flow, from camera UI to terminal event.
///
/// Both finishing methods consume the session, so a request id can only
/// ever produce one [`CaptureEvent`]. The platform layer hands that event to
/// the [`CaptureCompletion`](crate::domain::card::services::CaptureCompletion)
/// it was launched with.
pub struct CaptureSession {
    request: CaptureRequest,
    reader: Arc<dyn ReadCardImageUseCase>,
}

impl CaptureSession {
    pub fn new(request: CaptureRequest, reader: Arc<dyn ReadCardImageUseCase>) -> Self {
        Self { request, reader }
    }

    pub fn request_id(&self) -> RequestId {
        self.request.request_id
    }

    /// Runs OCR and extraction on the captured photo.
    pub async fn finish_with_image(self, image: Vec<u8>) -> CaptureEvent {
        let request_id = self.request.request_id;
        let params = ReadCardImageParams {
            image,
            product_filter: self.request.product_filter,
            credential: self.request.credential,
        };

        match self.reader.execute(params).await {
            Ok(card) => CaptureEvent::success(request_id, card),
            Err(error) => CaptureEvent::error(request_id, error),
        }
    }

    /// The user closed the capture UI without taking a photo.
    pub fn cancel(self) -> CaptureEvent {
        CaptureEvent::cancelled(self.request.request_id)
    }
}
