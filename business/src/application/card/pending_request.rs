use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::oneshot;

use crate::domain::card::errors::CardError;
use crate::domain::card::model::{Card, CaptureEvent, CaptureOutcome, RequestId};
use crate::domain::card::services::CaptureCompletion;
use crate::domain::logger::Logger;

/// What the awaiting caller receives: a card, an error, or `None` on cancel.
pub type RecognitionResult = Result<Option<Card>, CardError>;

/// Issues request ids, wrapping from `u32::MAX` back to zero.
#[derive(Debug, Default)]
pub struct RequestIdGenerator {
    next: AtomicU32,
}

impl RequestIdGenerator {
    pub fn starting_at(first: u32) -> Self {
        Self {
            next: AtomicU32::new(first),
        }
    }

    pub fn next_id(&self) -> RequestId {
        // fetch_add wraps on overflow.
        RequestId(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

struct PendingRequest {
    request_id: RequestId,
    result: oneshot::Sender<RecognitionResult>,
}

/// Holds the single in-flight recognition request.
pub struct PendingRequestSlot {
    slot: Mutex<Option<PendingRequest>>,
    logger: Arc<dyn Logger>,
}

impl PendingRequestSlot {
    pub fn new(logger: Arc<dyn Logger>) -> Self {
        Self {
            slot: Mutex::new(None),
            logger,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<PendingRequest>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Claims the empty slot for `request_id`.
    ///
    /// Fails with `OperationInProgress` and leaves the current request in
    /// place when the slot is already taken.
    pub fn claim(
        &self,
        request_id: RequestId,
    ) -> Result<oneshot::Receiver<RecognitionResult>, CardError> {
        let mut slot = self.lock();
        if let Some(pending) = slot.as_ref() {
            self.logger.warn(&format!(
                "Rejecting request {}: request {} is still pending",
                request_id, pending.request_id
            ));
            return Err(CardError::OperationInProgress);
        }

        let (sender, receiver) = oneshot::channel();
        *slot = Some(PendingRequest {
            request_id,
            result: sender,
        });
        Ok(receiver)
    }

    /// Empties the slot if it still belongs to `request_id`.
    pub fn release(&self, request_id: RequestId) -> bool {
        self.take_matching(request_id).is_some()
    }

    pub fn pending_id(&self) -> Option<RequestId> {
        self.lock().as_ref().map(|pending| pending.request_id)
    }

    fn take_matching(&self, request_id: RequestId) -> Option<PendingRequest> {
        let mut slot = self.lock();
        match slot.as_ref() {
            Some(pending) if pending.request_id == request_id => slot.take(),
            _ => None,
        }
    }
}

impl CaptureCompletion for PendingRequestSlot {
    fn deliver(&self, event: CaptureEvent) -> bool {
        let Some(pending) = self.take_matching(event.request_id) else {
            self.logger.warn(&format!(
                "Ignoring stale completion for request {}",
                event.request_id
            ));
            return false;
        };

        let result = match event.outcome {
            CaptureOutcome::Success(card) => Ok(Some(card)),
            CaptureOutcome::Error(error) => Err(error),
            CaptureOutcome::Cancelled => Ok(None),
        };

        if pending.result.send(result).is_err() {
            self.logger.debug(&format!(
                "Caller for request {} stopped waiting",
                pending.request_id
            ));
        }
        true
    }
}
