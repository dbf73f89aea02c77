use crate::domain::errors::ServiceError;

/// Broad category of a [`CardError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller misused the reader; capture never started.
    Usage,
    /// The device cannot run a capture flow.
    Capability,
    /// The OCR service call failed.
    Service,
    /// OCR text could not be turned into card fields.
    Format,
}

/// Card reading errors.
/// Use code-style identifiers for all error variants for i18n compatibility.
#[derive(Debug, thiserror::Error)]
pub enum CardError {
    #[error("card.operation_in_progress")]
    OperationInProgress,
    #[error("card.invalid_product_filter")]
    InvalidProductFilter,
    #[error("card.not_initialized")]
    NotInitialized,
    #[error("card.camera_unavailable")]
    CameraUnavailable,
    #[error("card.camera_permission_missing")]
    CameraPermissionMissing,
    #[error("card.capture_unavailable")]
    CaptureUnavailable(String),
    #[error("service.request_failed")]
    Service(#[from] ServiceError),
    #[error("card.invalid_number")]
    InvalidNumber(String),
    #[error("card.invalid_expiry")]
    InvalidExpiry(String),
}

impl CardError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CardError::OperationInProgress
            | CardError::InvalidProductFilter
            | CardError::NotInitialized => ErrorKind::Usage,
            CardError::CameraUnavailable
            | CardError::CameraPermissionMissing
            | CardError::CaptureUnavailable(_) => ErrorKind::Capability,
            CardError::Service(_) => ErrorKind::Service,
            CardError::InvalidNumber(_) | CardError::InvalidExpiry(_) => ErrorKind::Format,
        }
    }
}
