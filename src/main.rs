use bill_splitter::adapters::build_recognizer;
use bill_splitter::app::report;
use bill_splitter::domain::model::ImageSource;
use bill_splitter::utils::error::ErrorSeverity;
use bill_splitter::utils::{logger, validation::Validate};
use bill_splitter::{BillExporter, BillSession, CliConfig, LocalStorage, SplitEngine, Uploader};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting bill-splitter");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // 載入並驗證設定
    let config = match cli.resolve().and_then(|config| config.validate().map(|_| config)) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    let recognizer = match build_recognizer(&config, &cli.image) {
        Ok(recognizer) => recognizer,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };
    let uploader = Uploader::from_arc(recognizer).with_timeout(config.timeout());

    let output_path = config.output_path();
    let mut engine = SplitEngine::new(uploader, config.language());
    if config.export_enabled() {
        let storage = LocalStorage::new(output_path.clone());
        engine = engine.with_exporter(BillExporter::new(storage, output_path, config.formats()));
    }

    let mut session = BillSession::new(config.bill_config());

    match engine
        .run(&mut session, ImageSource::Path(cli.image.clone()), &config.people)
        .await
    {
        Ok(outcome) => {
            if let Some(notice) = &outcome.notice {
                eprintln!("⚠️  {}", notice);
            }

            println!("{}", report::render_menu(session.menu()));
            println!("{}", report::render_summary(&outcome.summary));

            if let Some(path) = &outcome.export_path {
                println!("📁 Bill saved to: {}", path);
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Bill split failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
