/// Failure reported by an external service adapter.
///
/// `status` carries the remote status code when the service answered,
/// and is `None` for transport faults (DNS, timeout, connection reset).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("service.request_failed")]
pub struct ServiceError {
    pub status: Option<u16>,
    pub message: String,
}

impl ServiceError {
    pub fn with_status(status: u16, message: impl Into<String>) -> Self {
        ServiceError {
            status: Some(status),
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        ServiceError {
            status: None,
            message: message.into(),
        }
    }
}
