use clap::Parser;
use sla_engine::adapters::report;
use sla_engine::core::{FixedClock, SystemClock, TicketSource};
use sla_engine::utils::error::{ErrorSeverity, SlaError};
use sla_engine::utils::{logger, validation::Validate};
use sla_engine::{CliConfig, CsvTicketSource, LocalStorage, OutputFormat, SlaConfig, SlaEngine};

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting sla-report");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    match run(&config).await {
        Ok(output) => println!("{}", output),
        Err(e) => {
            tracing::error!(
                "❌ SLA report failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            // 根據錯誤嚴重程度決定退出碼
            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            std::process::exit(exit_code);
        }
    }
}

async fn run(config: &CliConfig) -> Result<String, SlaError> {
    config.validate()?;

    let sla_config = match &config.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            SlaConfig::from_file(path)?
        }
        None => SlaConfig::default(),
    };
    let classifier = sla_config.classifier()?;
    tracing::info!(
        "✅ Calendar {}-{} on {:?}",
        classifier.calendar().workday_start,
        classifier.calendar().workday_end,
        Vec::<String>::from(classifier.calendar().working_days)
    );

    let storage = LocalStorage::new(".");
    let source = CsvTicketSource::load(&storage, &config.tickets).await?;
    let tickets = source.tickets()?;

    let (evaluations, summary) = match config.as_of_instant()? {
        Some(as_of) => SlaEngine::with_clock(classifier, FixedClock(as_of)).report(&tickets),
        None => SlaEngine::with_clock(classifier, SystemClock).report(&tickets),
    };

    match config.format {
        OutputFormat::Text => Ok(report::render_text(&evaluations, &summary)),
        OutputFormat::Json => report::render_json(&evaluations, &summary),
    }
}
