use clap::Parser;
use page_harvester::app::{describe_plan, run_job_to};
use page_harvester::utils::{logger, validation::Validate};
use page_harvester::CliArgs;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Presets read their listing URL from the environment.
    dotenvy::dotenv().ok();

    let args = CliArgs::parse();

    if args.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("Starting page-harvester");
    if args.verbose {
        tracing::debug!("CLI args: {:?}", args);
    }

    let config = match args.load_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Failed to load configuration: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let output_path = config.output_path();

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - nothing will be fetched");
        for line in describe_plan(&config, &output_path)? {
            println!("{}", line);
        }
        return Ok(());
    }

    match run_job_to(&config, &output_path).await {
        Ok(report) => {
            let summary = &report.summary;
            println!(
                "✅ Data extraction completed and saved to {}.",
                report.output_path.display()
            );
            println!(
                "📄 {} rows from {} pages ({} empty, {} failed)",
                summary.rows_written,
                summary.pages_attempted,
                summary.pages_empty,
                summary.failed_pages.len()
            );
        }
        Err(e) => {
            tracing::error!("❌ Run aborted: {}", e);
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    }

    Ok(())
}
