use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;

use super::pending_request::{PendingRequestSlot, RequestIdGenerator};
use crate::domain::card::errors::CardError;
use crate::domain::card::model::{
    Card, CaptureEvent, CaptureRequest, ProductFilter, ServiceCredential,
};
use crate::domain::card::services::{CaptureCompletion, CaptureFlow, DeviceCapabilities};
use crate::domain::card::use_cases::recognize_card::{RecognizeCardParams, RecognizeCardUseCase};
use crate::domain::logger::Logger;

/// Single-flight card reader.
///
/// At most one capture flow runs per instance. A second `recognize_card`
/// while one is pending fails with `OperationInProgress` instead of queueing.
pub struct RecognizeCardUseCaseImpl {
    capture_flow: Arc<dyn CaptureFlow>,
    device: Arc<dyn DeviceCapabilities>,
    logger: Arc<dyn Logger>,
    credential: RwLock<Option<ServiceCredential>>,
    request_ids: RequestIdGenerator,
    pending: Arc<PendingRequestSlot>,
}

impl RecognizeCardUseCaseImpl {
    pub fn new(
        capture_flow: Arc<dyn CaptureFlow>,
        device: Arc<dyn DeviceCapabilities>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            capture_flow,
            device,
            pending: Arc::new(PendingRequestSlot::new(logger.clone())),
            logger,
            credential: RwLock::new(None),
            request_ids: RequestIdGenerator::default(),
        }
    }

    pub fn with_request_ids(mut self, request_ids: RequestIdGenerator) -> Self {
        self.request_ids = request_ids;
        self
    }

    /// Hands a capture flow's terminal event to the pending request.
    ///
    /// Returns false, and leaves the pending request untouched, when the
    /// event's id is not the pending one.
    pub fn complete(&self, event: CaptureEvent) -> bool {
        self.pending.deliver(event)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.pending_id().is_some()
    }

    fn check_preconditions(&self, filter: &ProductFilter) -> Result<ServiceCredential, CardError> {
        if !self.device.is_camera_available() || !self.device.supports_still_capture() {
            return Err(CardError::CameraUnavailable);
        }
        if filter.is_empty() {
            return Err(CardError::InvalidProductFilter);
        }
        if !self.device.has_camera_permission() {
            return Err(CardError::CameraPermissionMissing);
        }

        self.credential
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(CardError::NotInitialized)
    }
}

#[async_trait]
impl RecognizeCardUseCase for RecognizeCardUseCaseImpl {
    fn initialize(&self, credential: ServiceCredential) -> bool {
        if credential.is_blank() {
            self.logger.warn("Refusing to initialize card reader with a blank credential");
            return false;
        }

        *self
            .credential
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(credential);
        self.logger.info("Card reader initialized");
        true
    }

    async fn recognize_card(&self, params: RecognizeCardParams) -> Result<Option<Card>, CardError> {
        let credential = self.check_preconditions(&params.product_filter).inspect_err(|e| {
            self.logger
                .warn(&format!("Card recognition rejected: {}", e))
        })?;

        let request_id = self.request_ids.next_id();
        let receiver = self.pending.claim(request_id)?;

        self.logger.info(&format!(
            "Launching capture flow for request {} ({} accepted products)",
            request_id,
            params.product_filter.entries().len()
        ));

        let request = CaptureRequest {
            request_id,
            product_filter: params.product_filter,
            credential,
        };
        let completion: Arc<dyn CaptureCompletion> = self.pending.clone();

        if let Err(e) = self.capture_flow.launch(request, completion) {
            self.pending.release(request_id);
            self.logger.error(&format!(
                "Capture flow for request {} failed to launch: {:?}",
                request_id, e
            ));
            return Err(e);
        }

        match receiver.await {
            Ok(result) => {
                match &result {
                    Ok(Some(_)) => self
                        .logger
                        .info(&format!("Request {} produced a card", request_id)),
                    Ok(None) => self
                        .logger
                        .info(&format!("Request {} was cancelled by the user", request_id)),
                    Err(e) => self
                        .logger
                        .warn(&format!("Request {} failed: {:?}", request_id, e)),
                }
                result
            }
            Err(_) => {
                self.logger.warn(&format!(
                    "Request {} was dropped without a result",
                    request_id
                ));
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::card::capture_session::CaptureSession;
    use crate::domain::card::errors::ErrorKind;
    use crate::domain::card::model::RequestId;
    use crate::domain::card::use_cases::read_card_image::{
        ReadCardImageParams, ReadCardImageUseCase,
    };
    use crate::domain::errors::ServiceError;
    use mockall::mock;
    use std::time::Duration;
    use tokio::sync::{Barrier, mpsc};

    mock! {
        pub Device {}

        impl DeviceCapabilities for Device {
            fn is_camera_available(&self) -> bool;
            fn supports_still_capture(&self) -> bool;
            fn has_camera_permission(&self) -> bool;
        }
    }

    mock! {
        pub CardImageReader {}

        #[async_trait]
        impl ReadCardImageUseCase for CardImageReader {
            async fn execute(&self, params: ReadCardImageParams) -> Result<Card, CardError>;
        }
    }

    mock! {
        pub Log {}

        impl Logger for Log {
            fn info(&self, message: &str);
            fn warn(&self, message: &str);
            fn error(&self, message: &str);
            fn debug(&self, message: &str);
        }
    }

    type Launch = (CaptureRequest, Arc<dyn CaptureCompletion>);

    /// Records every launch so the test can play the platform UI.
    struct RecordingCaptureFlow {
        launches: mpsc::UnboundedSender<Launch>,
    }

    impl CaptureFlow for RecordingCaptureFlow {
        fn launch(
            &self,
            request: CaptureRequest,
            completion: Arc<dyn CaptureCompletion>,
        ) -> Result<(), CardError> {
            self.launches
                .send((request, completion))
                .map_err(|_| CardError::CaptureUnavailable("test receiver gone".to_string()))
        }
    }

    struct FailingCaptureFlow;

    impl CaptureFlow for FailingCaptureFlow {
        fn launch(
            &self,
            _request: CaptureRequest,
            _completion: Arc<dyn CaptureCompletion>,
        ) -> Result<(), CardError> {
            Err(CardError::CaptureUnavailable("no active window".to_string()))
        }
    }

    /// Takes the photo as soon as it is launched and runs the real session.
    struct InstantCaptureFlow {
        reader: Arc<dyn ReadCardImageUseCase>,
    }

    impl CaptureFlow for InstantCaptureFlow {
        fn launch(
            &self,
            request: CaptureRequest,
            completion: Arc<dyn CaptureCompletion>,
        ) -> Result<(), CardError> {
            let session = CaptureSession::new(request, self.reader.clone());
            tokio::spawn(async move {
                let event = session.finish_with_image(b"jpeg".to_vec()).await;
                completion.deliver(event);
            });
            Ok(())
        }
    }

    fn mock_logger() -> Arc<dyn Logger> {
        let mut logger = MockLog::new();
        logger.expect_info().returning(|_| ());
        logger.expect_warn().returning(|_| ());
        logger.expect_error().returning(|_| ());
        logger.expect_debug().returning(|_| ());
        Arc::new(logger)
    }

    fn device(camera: bool, permission: bool) -> Arc<dyn DeviceCapabilities> {
        device_with_still_capture(camera, true, permission)
    }

    fn device_with_still_capture(
        camera: bool,
        still_capture: bool,
        permission: bool,
    ) -> Arc<dyn DeviceCapabilities> {
        let mut device = MockDevice::new();
        device.expect_is_camera_available().return_const(camera);
        device
            .expect_supports_still_capture()
            .return_const(still_capture);
        device.expect_has_camera_permission().return_const(permission);
        Arc::new(device)
    }

    fn recording_reader() -> (RecognizeCardUseCaseImpl, mpsc::UnboundedReceiver<Launch>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let flow = Arc::new(RecordingCaptureFlow { launches: sender });
        let reader = RecognizeCardUseCaseImpl::new(flow, device(true, true), mock_logger());
        assert!(reader.initialize(ServiceCredential::new("vision-key")));
        (reader, receiver)
    }

    fn visa_params() -> RecognizeCardParams {
        RecognizeCardParams {
            product_filter: ["411111111111"].into_iter().collect(),
        }
    }

    fn visa_card() -> Card {
        Card {
            number: 4111111111111111,
            expiry_month: 9,
            expiry_year: 27,
        }
    }

    #[tokio::test]
    async fn should_return_card_when_capture_succeeds() {
        let (reader, mut launches) = recording_reader();
        let reader = Arc::new(reader);

        let task = tokio::spawn({
            let reader = reader.clone();
            async move { reader.recognize_card(visa_params()).await }
        });
        let (request, completion) = launches.recv().await.unwrap();

        assert_eq!(request.request_id, RequestId(0));
        assert_eq!(request.credential.expose(), "vision-key");
        assert!(completion.deliver(CaptureEvent::success(request.request_id, visa_card())));

        let result = task.await.unwrap().unwrap();
        assert_eq!(result, Some(visa_card()));
        assert!(!reader.is_pending());
    }

    #[tokio::test]
    async fn should_return_none_when_user_cancels() {
        let (reader, mut launches) = recording_reader();
        let reader = Arc::new(reader);

        let task = tokio::spawn({
            let reader = reader.clone();
            async move { reader.recognize_card(visa_params()).await }
        });
        let (request, _completion) = launches.recv().await.unwrap();
        assert!(reader.complete(CaptureEvent::cancelled(request.request_id)));

        assert_eq!(task.await.unwrap().unwrap(), None);
    }

    #[tokio::test]
    async fn should_surface_pipeline_error_as_request_result() {
        let (reader, mut launches) = recording_reader();
        let reader = Arc::new(reader);

        let task = tokio::spawn({
            let reader = reader.clone();
            async move { reader.recognize_card(visa_params()).await }
        });
        let (request, completion) = launches.recv().await.unwrap();
        completion.deliver(CaptureEvent::error(
            request.request_id,
            ServiceError::with_status(500, "Internal error").into(),
        ));

        let error = task.await.unwrap().unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Service);
        assert!(!reader.is_pending());
    }

    #[tokio::test]
    async fn should_reject_second_request_while_first_pending() {
        let (reader, mut launches) = recording_reader();
        let reader = Arc::new(reader);

        let first = tokio::spawn({
            let reader = reader.clone();
            async move { reader.recognize_card(visa_params()).await }
        });
        let (request, completion) = launches.recv().await.unwrap();

        let second = reader.recognize_card(visa_params()).await;

        assert!(matches!(second, Err(CardError::OperationInProgress)));
        assert!(launches.try_recv().is_err());
        assert!(reader.is_pending());

        completion.deliver(CaptureEvent::success(request.request_id, visa_card()));
        assert_eq!(first.await.unwrap().unwrap(), Some(visa_card()));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn should_launch_once_when_requests_race() {
        const CALLERS: usize = 8;
        let (reader, mut launches) = recording_reader();
        let reader = Arc::new(reader);
        let start = Arc::new(Barrier::new(CALLERS));

        let tasks: Vec<_> = (0..CALLERS)
            .map(|_| {
                let reader = reader.clone();
                let start = start.clone();
                tokio::spawn(async move {
                    start.wait().await;
                    reader.recognize_card(visa_params()).await
                })
            })
            .collect();

        let (request, completion) = launches.recv().await.unwrap();
        while tasks.iter().filter(|task| task.is_finished()).count() < CALLERS - 1 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert!(reader.is_pending());
        assert!(completion.deliver(CaptureEvent::cancelled(request.request_id)));

        let mut cancelled = 0;
        let mut rejected = 0;
        for task in tasks {
            match task.await.unwrap() {
                Ok(None) => cancelled += 1,
                Err(CardError::OperationInProgress) => rejected += 1,
                other => panic!("unexpected result: {:?}", other),
            }
        }
        assert_eq!(cancelled, 1);
        assert_eq!(rejected, CALLERS - 1);
        assert!(launches.try_recv().is_err());
        assert!(!reader.is_pending());
    }

    #[tokio::test]
    async fn should_ignore_completion_with_stale_request_id() {
        let (reader, mut launches) = recording_reader();
        let reader = Arc::new(reader);

        let task = tokio::spawn({
            let reader = reader.clone();
            async move { reader.recognize_card(visa_params()).await }
        });
        let (request, completion) = launches.recv().await.unwrap();
        let stale = RequestId(request.request_id.0.wrapping_add(1));

        assert!(!completion.deliver(CaptureEvent::success(stale, Card::default())));
        assert!(reader.is_pending());
        assert!(!task.is_finished());

        assert!(completion.deliver(CaptureEvent::success(request.request_id, visa_card())));
        assert_eq!(task.await.unwrap().unwrap(), Some(visa_card()));
    }

    #[tokio::test]
    async fn should_fail_with_invalid_product_filter_before_launch() {
        let (reader, mut launches) = recording_reader();

        let result = reader
            .recognize_card(RecognizeCardParams {
                product_filter: ProductFilter::default(),
            })
            .await;

        assert!(matches!(result, Err(CardError::InvalidProductFilter)));
        assert!(launches.try_recv().is_err());
        assert!(!reader.is_pending());
    }

    #[tokio::test]
    async fn should_fail_when_camera_unavailable() {
        let reader =
            RecognizeCardUseCaseImpl::new(Arc::new(FailingCaptureFlow), device(false, true), mock_logger());
        reader.initialize(ServiceCredential::new("vision-key"));

        let result = reader.recognize_card(visa_params()).await;

        assert!(matches!(result, Err(CardError::CameraUnavailable)));
    }

    #[tokio::test]
    async fn should_fail_when_camera_cannot_take_photos() {
        let reader = RecognizeCardUseCaseImpl::new(
            Arc::new(FailingCaptureFlow),
            device_with_still_capture(true, false, true),
            mock_logger(),
        );
        reader.initialize(ServiceCredential::new("vision-key"));

        let result = reader.recognize_card(visa_params()).await;

        assert!(matches!(result, Err(CardError::CameraUnavailable)));
    }

    #[tokio::test]
    async fn should_check_camera_before_product_filter() {
        let reader =
            RecognizeCardUseCaseImpl::new(Arc::new(FailingCaptureFlow), device(false, true), mock_logger());
        reader.initialize(ServiceCredential::new("vision-key"));

        let result = reader
            .recognize_card(RecognizeCardParams {
                product_filter: ProductFilter::default(),
            })
            .await;

        assert!(matches!(result, Err(CardError::CameraUnavailable)));
    }

    #[tokio::test]
    async fn should_fail_when_camera_permission_missing() {
        let reader =
            RecognizeCardUseCaseImpl::new(Arc::new(FailingCaptureFlow), device(true, false), mock_logger());
        reader.initialize(ServiceCredential::new("vision-key"));

        let result = reader.recognize_card(visa_params()).await;

        assert!(matches!(result, Err(CardError::CameraPermissionMissing)));
    }

    #[tokio::test]
    async fn should_fail_when_not_initialized() {
        let reader =
            RecognizeCardUseCaseImpl::new(Arc::new(FailingCaptureFlow), device(true, true), mock_logger());

        let result = reader.recognize_card(visa_params()).await;

        assert!(matches!(result, Err(CardError::NotInitialized)));
    }

    #[test]
    fn should_refuse_blank_credential() {
        let reader =
            RecognizeCardUseCaseImpl::new(Arc::new(FailingCaptureFlow), device(true, true), mock_logger());

        assert!(!reader.initialize(ServiceCredential::new("  ")));
        assert!(reader.initialize(ServiceCredential::new("vision-key")));
    }

    #[tokio::test]
    async fn should_release_slot_when_launch_fails() {
        let reader =
            RecognizeCardUseCaseImpl::new(Arc::new(FailingCaptureFlow), device(true, true), mock_logger());
        reader.initialize(ServiceCredential::new("vision-key"));

        let first = reader.recognize_card(visa_params()).await;
        let second = reader.recognize_card(visa_params()).await;

        assert!(matches!(first, Err(CardError::CaptureUnavailable(_))));
        assert!(matches!(second, Err(CardError::CaptureUnavailable(_))));
        assert!(!reader.is_pending());
    }

    #[tokio::test]
    async fn should_issue_zero_after_max_request_id() {
        let (sender, mut launches) = mpsc::unbounded_channel();
        let reader = RecognizeCardUseCaseImpl::new(
            Arc::new(RecordingCaptureFlow { launches: sender }),
            device(true, true),
            mock_logger(),
        )
        .with_request_ids(RequestIdGenerator::starting_at(u32::MAX));
        reader.initialize(ServiceCredential::new("vision-key"));
        let reader = Arc::new(reader);

        for expected in [RequestId(u32::MAX), RequestId(0)] {
            let task = tokio::spawn({
                let reader = reader.clone();
                async move { reader.recognize_card(visa_params()).await }
            });
            let (request, completion) = launches.recv().await.unwrap();
            assert_eq!(request.request_id, expected);
            completion.deliver(CaptureEvent::cancelled(request.request_id));
            assert_eq!(task.await.unwrap().unwrap(), None);
        }
    }

    #[tokio::test]
    async fn should_read_card_through_capture_session() {
        let mut image_reader = MockCardImageReader::new();
        image_reader
            .expect_execute()
            .withf(|params| params.image == b"jpeg".to_vec())
            .times(1)
            .returning(|_| Ok(visa_card()));
        let flow = Arc::new(InstantCaptureFlow {
            reader: Arc::new(image_reader),
        });
        let reader = RecognizeCardUseCaseImpl::new(flow, device(true, true), mock_logger());
        reader.initialize(ServiceCredential::new("vision-key"));

        let result = reader.recognize_card(visa_params()).await.unwrap();

        assert_eq!(result, Some(visa_card()));
        assert!(!reader.is_pending());
    }
}
