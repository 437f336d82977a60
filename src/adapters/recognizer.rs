use crate::config::toml_config::{RecognizerKind, SessionConfig};
use crate::domain::model::ImageSource;
use crate::domain::ports::Recognizer;
use crate::utils::error::{Result, SplitError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// 依設定建立辨識器
pub fn build_recognizer(config: &SessionConfig, image: &Path) -> Result<Arc<dyn Recognizer>> {
    let recognizer: Arc<dyn Recognizer> = match config.recognizer_kind_for(image) {
        RecognizerKind::Text => Arc::new(TextRecognizer),
        RecognizerKind::Tesseract => Arc::new(TesseractRecognizer::new(config.tesseract_binary())),
        RecognizerKind::Http => {
            let endpoint = config
                .recognizer
                .endpoint
                .clone()
                .ok_or_else(|| SplitError::MissingConfigError {
                    field: "recognizer.endpoint".to_string(),
                })?;
            Arc::new(HttpRecognizer::new(endpoint))
        }
    };

    tracing::debug!("Using {} recognizer", recognizer.name());
    Ok(recognizer)
}

fn read_error(path: &Path, e: std::io::Error) -> SplitError {
    SplitError::recognition(format!("cannot read {}: {}", path.display(), e))
}

/// 輸入已經是文字（例如先前存下的 OCR 結果），直接讀出
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRecognizer;

#[async_trait]
impl Recognizer for TextRecognizer {
    async fn recognize(&self, image: &ImageSource, _language: &str) -> Result<String> {
        match image {
            ImageSource::Path(path) => tokio::fs::read_to_string(path)
                .await
                .map_err(|e| read_error(path, e)),
            ImageSource::Bytes { name, data } => String::from_utf8(data.clone())
                .map_err(|e| SplitError::recognition(format!("{} is not UTF-8 text: {}", name, e))),
        }
    }

    fn name(&self) -> &'static str {
        "text"
    }
}

/// 呼叫本機 `tesseract <image> stdout -l <lang>`
#[derive(Debug, Clone)]
pub struct TesseractRecognizer {
    binary: String,
}

impl TesseractRecognizer {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

#[async_trait]
impl Recognizer for TesseractRecognizer {
    async fn recognize(&self, image: &ImageSource, language: &str) -> Result<String> {
        let mut command = Command::new(&self.binary);
        command
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = match image {
            ImageSource::Path(path) => {
                command.arg(path).args(["stdout", "-l", language]);
                command.stdin(Stdio::null());
                command.spawn().map_err(|e| self.launch_error(e))?.wait_with_output().await?
            }
            ImageSource::Bytes { data, .. } => {
                // tesseract 支援以 "stdin" 當作輸入檔名
                command.args(["stdin", "stdout", "-l", language]);
                command.stdin(Stdio::piped());
                let mut child = command.spawn().map_err(|e| self.launch_error(e))?;
                if let Some(mut stdin) = child.stdin.take() {
                    // 提早結束的 tesseract 會讓寫入失敗，真正的原因在它的 stderr
                    if let Err(e) = stdin.write_all(data).await {
                        tracing::debug!("{} stopped reading stdin: {}", self.binary, e);
                    }
                }
                child.wait_with_output().await?
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SplitError::recognition(format!(
                "{} exited with {}: {}",
                self.binary,
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn name(&self) -> &'static str {
        "tesseract"
    }
}

impl TesseractRecognizer {
    fn launch_error(&self, e: std::io::Error) -> SplitError {
        SplitError::recognition(format!("failed to launch {}: {}", self.binary, e))
    }
}

#[derive(Debug, Deserialize)]
struct HttpRecognition {
    text: String,
}

/// 把影像原始位元組 POST 到 OCR 服務，回應格式為 `{"text": "..."}`
#[derive(Debug, Clone)]
pub struct HttpRecognizer {
    endpoint: String,
    client: Client,
}

impl HttpRecognizer {
    pub fn new(endpoint: String) -> Self {
        Self {
            endpoint,
            client: Client::new(),
        }
    }
}

#[async_trait]
impl Recognizer for HttpRecognizer {
    async fn recognize(&self, image: &ImageSource, language: &str) -> Result<String> {
        let body = match image {
            ImageSource::Path(path) => tokio::fs::read(path).await.map_err(|e| read_error(path, e))?,
            ImageSource::Bytes { data, .. } => data.clone(),
        };

        tracing::debug!(
            "Posting {} bytes to OCR endpoint {}",
            body.len(),
            self.endpoint
        );
        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("lang", language)])
            .header("Content-Type", "application/octet-stream")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("OCR response status: {}", status);
        if !status.is_success() {
            return Err(SplitError::recognition(format!(
                "OCR endpoint returned {}",
                status
            )));
        }

        let recognition: HttpRecognition = response.json().await?;
        Ok(recognition.text)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
