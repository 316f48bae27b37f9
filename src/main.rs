use clap::Parser;
use edhrec_etl::core::ConfigProvider;
use edhrec_etl::utils::error::{AnalyzerError, ErrorSeverity};
use edhrec_etl::utils::{logger, validation::Validate};
use edhrec_etl::{AnalyzerContext, CliConfig, DeckPipeline, EtlEngine, LocalStorage};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting edhrec-etl CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if cli.has_no_run_args() {
        println!("{}", CliConfig::usage_hint());
    }

    if let Err(e) = run(&cli).await {
        tracing::error!(
            "❌ Analysis failed: {} (Category: {:?}, Severity: {:?})",
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

    Ok(())
}

async fn run(cli: &CliConfig) -> Result<(), AnalyzerError> {
    let config = cli.analyzer_config()?;
    config.validate()?;

    let (request, sources) = {
        let stdin = std::io::stdin();
        let mut input = stdin.lock();
        let mut output = std::io::stdout();
        cli.resolve_request(&mut input, &mut output)?
    };
    request.validate()?;

    let storage = LocalStorage::new(config.output_path());
    let context = Arc::new(AnalyzerContext::new(config).await?);
    let pipeline = DeckPipeline::new(context, storage, request, sources);
    let engine = EtlEngine::new(pipeline);

    let outcome = engine.run().await?;
    let report = &outcome.report;

    tracing::info!("✅ Analysis completed successfully!");
    println!(
        "✅ Analyzed {} of {} decks for {} ({} distinct cards)",
        report.decks_analyzed,
        report.decks_selected,
        report.commander,
        report.cards.len()
    );
    for card in report.cards.iter().take(10) {
        println!("   {:>4}  {}", card.count, card.name);
    }
    println!("📁 Output saved to: {}", outcome.output_path);

    Ok(())
}
