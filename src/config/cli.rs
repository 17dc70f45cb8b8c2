use crate::config::settings::Settings;
use crate::config::toml_config::TomlConfig;
use crate::domain::ports::ReportFormat;
use crate::utils::error::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "module-backfill")]
#[command(about = "Software modules per resourceid or groupid")]
pub struct CliConfig {
    #[arg(short, long, help = "Enable debug output")]
    pub debug: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(short, long, help = "Force update cache from web API")]
    pub force: bool,

    #[arg(
        short = 't',
        long,
        alias = "cache_timeout",
        help = "Max age, in days, to use cached data (default: 1)"
    )]
    pub cache_timeout: Option<u32>,

    #[arg(short, long, help = "Print pretty, human readable, json output")]
    pub pretty: bool,

    #[arg(long, value_enum, help = "Output format (default: json)")]
    pub format: Option<ReportFormat>,

    #[arg(long, help = "Report duplicate name:version entries instead of modules")]
    pub duplicates: bool,

    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Base URL of the catalog API")]
    pub catalog_url: Option<String>,

    #[arg(long, help = "Directory holding the cached API responses")]
    pub cache_dir: Option<String>,

    #[arg(long, help = "Timeout for each API request, in seconds (default: 600)")]
    pub request_timeout: Option<u64>,
}

impl CliConfig {
    /// Builds settings from defaults, the optional config file, then these flags.
    pub fn resolve(&self) -> Result<Settings> {
        let mut settings = Settings::default();
        if let Some(path) = &self.config {
            tracing::debug!("loading configuration from {}", path.display());
            settings.apply_file(&TomlConfig::from_file(path)?);
        }

        if let Some(url) = &self.catalog_url {
            settings.catalog_url = url.clone();
        }
        if let Some(dir) = &self.cache_dir {
            settings.cache_dir = dir.clone();
        }
        if let Some(days) = self.cache_timeout {
            settings.cache.max_age_days = days;
        }
        if let Some(timeout) = self.request_timeout {
            settings.request_timeout_seconds = timeout;
        }
        if let Some(format) = self.format {
            settings.report.format = format;
        }
        settings.cache.force_refresh |= self.force;
        settings.report.pretty |= self.pretty;
        settings.report.duplicates |= self.duplicates;

        Ok(settings)
    }
}
