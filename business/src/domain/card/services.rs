use std::sync::Arc;

use async_trait::async_trait;

use super::errors::CardError;
use super::model::{CaptureEvent, CaptureRequest, ServiceCredential, TextRegion};
use crate::domain::errors::ServiceError;

/// Service port for the cloud OCR call.
///
/// Returns the recognized text regions in reading order. An image with no
/// text yields an empty vector, not an error.
#[async_trait]
pub trait TextRecognitionService: Send + Sync {
    async fn recognize_text(
        &self,
        image: &[u8],
        language: &str,
        credential: &ServiceCredential,
    ) -> Result<Vec<TextRegion>, ServiceError>;
}

/// Receives the terminal event of a capture flow.
pub trait CaptureCompletion: Send + Sync {
    /// Returns false when the event does not belong to the pending request.
    fn deliver(&self, event: CaptureEvent) -> bool;
}

/// Platform port that shows the camera UI and takes the photo.
///
/// `launch` returns as soon as the UI is up. The flow later reports exactly
/// one [`CaptureEvent`] for `request.request_id` through `completion`.
pub trait CaptureFlow: Send + Sync {
    fn launch(
        &self,
        request: CaptureRequest,
        completion: Arc<dyn CaptureCompletion>,
    ) -> Result<(), CardError>;
}

/// Platform port describing what the device can do.
pub trait DeviceCapabilities: Send + Sync {
    fn is_camera_available(&self) -> bool;
    /// The camera can take still photos, not just stream video.
    fn supports_still_capture(&self) -> bool;
    /// The host app declared its camera usage (manifest entry, Info.plist key).
    fn has_camera_permission(&self) -> bool;
}
