use crate::app::export::SUPPORTED_FORMATS;
use crate::domain::model::{BillConfig, RosterEntry};
use crate::utils::error::{Result, SplitError};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

pub const DEFAULT_LANGUAGE: &str = "eng";
pub const DEFAULT_OUTPUT_PATH: &str = "./bill-output";
pub const DEFAULT_TESSERACT_BINARY: &str = "tesseract";
pub const MAX_TIMEOUT_SECONDS: u64 = 600;

static RE_ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum RecognizerKind {
    /// 已經辨識好的文字檔
    Text,
    /// 本機 tesseract 指令
    Tesseract,
    /// HTTP OCR 服務
    Http,
}

impl RecognizerKind {
    /// 未指定時依副檔名判斷：.txt 視為已辨識文字，其他交給 tesseract
    pub fn infer_from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("txt") | Some("text") => RecognizerKind::Text,
            _ => RecognizerKind::Tesseract,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub bill: BillSection,
    #[serde(default)]
    pub recognizer: RecognizerConfig,
    #[serde(default)]
    pub people: Vec<RosterEntry>,
    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BillSection {
    pub tax_rate_percent: Option<f64>,
    pub tip_rate_percent: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecognizerConfig {
    pub kind: Option<RecognizerKind>,
    pub language: Option<String>,
    pub endpoint: Option<String>,
    pub binary: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportConfig {
    pub enabled: Option<bool>,
    pub output_path: Option<String>,
    pub formats: Option<Vec<String>>,
}

impl SessionConfig {
    /// 從 TOML 檔案載入會話設定
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SplitError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| SplitError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${OCR_ENDPOINT})，找不到的保留原樣
    fn substitute_env_vars(content: &str) -> String {
        RE_ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        if let Some(tax) = self.bill.tax_rate_percent {
            validation::validate_finite("bill.tax_rate_percent", tax)?;
        }
        if let Some(tip) = self.bill.tip_rate_percent {
            validation::validate_finite("bill.tip_rate_percent", tip)?;
        }

        if let Some(language) = &self.recognizer.language {
            validation::validate_non_empty_string("recognizer.language", language)?;
        }

        if self.recognizer.kind == Some(RecognizerKind::Http) {
            let endpoint =
                validation::validate_required_field("recognizer.endpoint", &self.recognizer.endpoint)?;
            validation::validate_url("recognizer.endpoint", endpoint)?;
        } else if let Some(endpoint) = &self.recognizer.endpoint {
            validation::validate_url("recognizer.endpoint", endpoint)?;
        }

        if let Some(binary) = &self.recognizer.binary {
            validation::validate_path("recognizer.binary", binary)?;
        }

        if let Some(timeout) = self.recognizer.timeout_seconds {
            validation::validate_range("recognizer.timeout_seconds", timeout, 1, MAX_TIMEOUT_SECONDS)?;
        }

        validation::validate_path("export.output_path", &self.output_path())?;
        validation::validate_allowed_values("export.formats", &self.formats(), &SUPPORTED_FORMATS)?;

        Ok(())
    }

    pub fn bill_config(&self) -> BillConfig {
        BillConfig::new(
            self.bill
                .tax_rate_percent
                .unwrap_or(BillConfig::DEFAULT_TAX_RATE_PERCENT),
            self.bill
                .tip_rate_percent
                .unwrap_or(BillConfig::DEFAULT_TIP_RATE_PERCENT),
        )
    }

    pub fn language(&self) -> &str {
        self.recognizer.language.as_deref().unwrap_or(DEFAULT_LANGUAGE)
    }

    pub fn recognizer_kind_for(&self, image: &Path) -> RecognizerKind {
        self.recognizer
            .kind
            .unwrap_or_else(|| RecognizerKind::infer_from_path(image))
    }

    pub fn tesseract_binary(&self) -> &str {
        self.recognizer
            .binary
            .as_deref()
            .unwrap_or(DEFAULT_TESSERACT_BINARY)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.recognizer.timeout_seconds.map(Duration::from_secs)
    }

    pub fn export_enabled(&self) -> bool {
        self.export.enabled.unwrap_or(false)
    }

    pub fn output_path(&self) -> String {
        self.export
            .output_path
            .clone()
            .unwrap_or_else(|| DEFAULT_OUTPUT_PATH.to_string())
    }

    pub fn formats(&self) -> Vec<String> {
        self.export
            .formats
            .clone()
            .unwrap_or_else(|| SUPPORTED_FORMATS.iter().map(|f| f.to_string()).collect())
    }
}

impl Validate for SessionConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
