use crate::domain::model::ImageSource;
use crate::domain::ports::Recognizer;
use crate::utils::error::{Result, SplitError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// 任務結束（完成、失敗或被取消）時釋放上傳旗標
struct InFlightGuard(Arc<AtomicBool>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// 一次只允許一個辨識請求；第二次上傳會被拒絕而不是排隊
pub struct Uploader {
    recognizer: Arc<dyn Recognizer>,
    in_flight: Arc<AtomicBool>,
    timeout: Option<Duration>,
}

impl Uploader {
    pub fn new<R: Recognizer + 'static>(recognizer: R) -> Self {
        Self::from_arc(Arc::new(recognizer))
    }

    pub fn from_arc(recognizer: Arc<dyn Recognizer>) -> Self {
        Self {
            recognizer,
            in_flight: Arc::new(AtomicBool::new(false)),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn recognizer_name(&self) -> &'static str {
        self.recognizer.name()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn start(&self, image: ImageSource, language: &str) -> Result<UploadHandle> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::warn!("Rejected upload of {}: another upload is pending", image.display_name());
            return Err(SplitError::UploadInProgress);
        }

        let guard = InFlightGuard(Arc::clone(&self.in_flight));
        let recognizer = Arc::clone(&self.recognizer);
        let language = language.to_string();
        let timeout = self.timeout;

        tracing::debug!(
            "Starting {} recognition of {} ({})",
            recognizer.name(),
            image.display_name(),
            language
        );

        let task = tokio::spawn(async move {
            let _guard = guard;
            let recognition = recognizer.recognize(&image, &language);

            match timeout {
                Some(limit) => match tokio::time::timeout(limit, recognition).await {
                    Ok(result) => result,
                    Err(_) => Err(SplitError::recognition(format!(
                        "no result after {:?}",
                        limit
                    ))),
                },
                None => recognition.await,
            }
        });

        Ok(UploadHandle { task })
    }
}

/// 進行中的上傳。可以等待結果，也可以取消
#[derive(Debug)]
pub struct UploadHandle {
    task: JoinHandle<Result<String>>,
}

impl UploadHandle {
    pub fn cancel(&self) {
        tracing::info!("Cancelling pending upload");
        self.task.abort();
    }

    pub async fn finish(self) -> Result<String> {
        match self.task.await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Err(SplitError::UploadCancelled),
            Err(e) => Err(SplitError::recognition(format!(
                "recognition task failed: {}",
                e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tokio::sync::Notify;

    struct GatedRecognizer {
        gate: Arc<Notify>,
        text: String,
    }

    #[async_trait]
    impl Recognizer for GatedRecognizer {
        async fn recognize(&self, _image: &ImageSource, _language: &str) -> Result<String> {
            self.gate.notified().await;
            Ok(self.text.clone())
        }

        fn name(&self) -> &'static str {
            "gated"
        }
    }

    struct NeverRecognizer;

    #[async_trait]
    impl Recognizer for NeverRecognizer {
        async fn recognize(&self, _image: &ImageSource, _language: &str) -> Result<String> {
            std::future::pending::<()>().await;
            Ok(String::new())
        }

        fn name(&self) -> &'static str {
            "never"
        }
    }

    struct FailingRecognizer;

    #[async_trait]
    impl Recognizer for FailingRecognizer {
        async fn recognize(&self, _image: &ImageSource, _language: &str) -> Result<String> {
            Err(SplitError::recognition("unreadable image"))
        }

        fn name(&self) -> &'static str {
            "failing"
        }
    }

    fn image() -> ImageSource {
        ImageSource::Bytes {
            name: "menu.png".to_string(),
            data: vec![0x89, 0x50, 0x4e, 0x47],
        }
    }

    #[tokio::test]
    async fn test_second_upload_rejected_while_pending() {
        let gate = Arc::new(Notify::new());
        let uploader = Uploader::new(GatedRecognizer {
            gate: Arc::clone(&gate),
            text: "Burger 25".to_string(),
        });

        let first = uploader.start(image(), "eng").unwrap();
        assert!(uploader.is_in_flight());

        let second = uploader.start(image(), "eng");
        assert!(matches!(second, Err(SplitError::UploadInProgress)));

        gate.notify_one();
        assert_eq!(first.finish().await.unwrap(), "Burger 25");
        assert!(!uploader.is_in_flight());

        // 前一次完成後可以再上傳
        let third = uploader.start(image(), "eng").unwrap();
        gate.notify_one();
        assert!(third.finish().await.is_ok());
    }

    #[tokio::test]
    async fn test_cancel_releases_guard() {
        let uploader = Uploader::new(NeverRecognizer);

        let handle = uploader.start(image(), "eng").unwrap();
        handle.cancel();

        let result = handle.finish().await;
        assert!(matches!(result, Err(SplitError::UploadCancelled)));
        assert!(!uploader.is_in_flight());
        assert!(uploader.start(image(), "eng").is_ok());
    }

    #[tokio::test]
    async fn test_failure_is_reported_and_guard_released() {
        let uploader = Uploader::new(FailingRecognizer);

        let result = uploader.start(image(), "eng").unwrap().finish().await;

        assert!(matches!(result, Err(SplitError::RecognitionError { .. })));
        assert!(!uploader.is_in_flight());
    }

    #[tokio::test]
    async fn test_timeout_turns_into_recognition_error() {
        let uploader =
            Uploader::new(NeverRecognizer).with_timeout(Some(Duration::from_millis(20)));

        let result = uploader.start(image(), "eng").unwrap().finish().await;

        match result {
            Err(SplitError::RecognitionError { message }) => assert!(message.contains("no result")),
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(!uploader.is_in_flight());
    }
}
