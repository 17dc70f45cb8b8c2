use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter directive for the given verbosity flags.
pub fn default_directive(verbose: bool, debug: bool) -> &'static str {
    if debug {
        "module_backfill=debug,warn"
    } else if verbose {
        "module_backfill=info,warn"
    } else {
        "warn"
    }
}

pub fn init_cli_logger(verbose: bool, debug: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, debug)));

    // stdout carries the report, so logs go to stderr
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}
