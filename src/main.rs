use anyhow::Context;
use clap::Parser;
use module_backfill::core::ConfigProvider;
use module_backfill::utils::logger;
use module_backfill::{
    BackfillEngine, BackfillError, BackfillPipeline, CachedCatalog, CliConfig, LocalStorage,
};
use std::io::Write;

fn exit_with(e: &BackfillError) -> ! {
    tracing::error!(
        "❌ Run failed: {} (Severity: {:?})",
        e,
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e);
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(e.exit_code());
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose, cli.debug);
    tracing::debug!("CLI config: {:?}", cli);

    let settings = match cli.resolve() {
        Ok(settings) => settings,
        Err(e) => exit_with(&e),
    };
    if let Err(e) = settings.validate() {
        exit_with(&e);
    }
    tracing::info!("cache directory: {}", settings.cache_dir());

    let storage = LocalStorage::new(settings.cache_dir().to_string());
    let catalog = CachedCatalog::new(storage, settings.cache_policy())
        .with_timeout(settings.request_timeout());
    let engine = BackfillEngine::new(BackfillPipeline::new(catalog, settings));

    let report = match engine.run().await {
        Ok(report) => report,
        Err(e) => exit_with(&e),
    };

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", report.trim_end_matches('\n')).context("failed to write report")?;
    stdout.flush().context("failed to flush stdout")?;

    Ok(())
}
