use crate::config::toml_config::{RecognizerKind, SessionConfig};
use crate::utils::error::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "bill-splitter")]
#[command(about = "Read a menu photo, assign dishes to people and split the bill")]
pub struct CliConfig {
    /// Menu image (or pre-recognized .txt file)
    #[arg(long)]
    pub image: PathBuf,

    /// Session file with people, orders and rates
    #[arg(long)]
    pub session: Option<PathBuf>,

    #[arg(long, value_enum)]
    pub recognizer: Option<RecognizerKind>,

    /// OCR language code passed to the recognizer
    #[arg(long)]
    pub language: Option<String>,

    /// OCR endpoint for the http recognizer
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Tax rate in percent
    #[arg(long, allow_negative_numbers = true)]
    pub tax: Option<f64>,

    /// Tip rate in percent
    #[arg(long, allow_negative_numbers = true)]
    pub tip: Option<f64>,

    /// Write menu and summary to a zip bundle
    #[arg(long)]
    pub export: bool,

    #[arg(long)]
    pub output_path: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

impl CliConfig {
    /// 載入會話檔（若有），再套用命令列覆蓋
    pub fn resolve(&self) -> Result<SessionConfig> {
        let mut config = match &self.session {
            Some(path) => SessionConfig::from_file(path)?,
            None => SessionConfig::default(),
        };

        if let Some(kind) = self.recognizer {
            config.recognizer.kind = Some(kind);
        }
        if let Some(language) = &self.language {
            config.recognizer.language = Some(language.clone());
        }
        if let Some(endpoint) = &self.endpoint {
            config.recognizer.endpoint = Some(endpoint.clone());
        }
        if let Some(tax) = self.tax {
            config.bill.tax_rate_percent = Some(tax);
        }
        if let Some(tip) = self.tip {
            config.bill.tip_rate_percent = Some(tip);
        }
        if self.export {
            config.export.enabled = Some(true);
        }
        if let Some(output_path) = &self.output_path {
            config.export.output_path = Some(output_path.clone());
        }

        Ok(config)
    }
}
