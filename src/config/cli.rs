use crate::config::presets;
use crate::config::toml_config::HarvestConfig;
use crate::utils::error::Result;
use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    /// Company listing pages, browser session
    Companies,
    /// Pokédex type tables, plain HTTP
    Pokedex,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "page-harvester")]
#[command(about = "Scrape paginated listings into an incrementally written CSV file")]
pub struct CliArgs {
    /// Path to a TOML job file; overrides --preset
    #[arg(short, long)]
    pub config: Option<String>,

    /// Built-in job to run when no config file is given
    #[arg(long, value_enum, default_value = "companies")]
    pub preset: Preset,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    /// Print the pages and output path without fetching anything
    #[arg(long)]
    pub dry_run: bool,
}

impl CliArgs {
    pub fn load_config(&self) -> Result<HarvestConfig> {
        match &self.config {
            Some(path) => HarvestConfig::from_file(path),
            None => Ok(match self.preset {
                Preset::Companies => presets::company_listing(),
                Preset::Pokedex => presets::pokedex(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::toml_config::SiteKind;

    #[test]
    fn test_defaults_to_company_preset() {
        let args = CliArgs::parse_from(["page-harvester"]);
        assert_eq!(args.preset, Preset::Companies);
        assert!(!args.dry_run);
        assert_eq!(args.load_config().unwrap().job.site, SiteKind::CompanyCards);
    }

    #[test]
    fn test_pokedex_preset() {
        let args = CliArgs::parse_from(["page-harvester", "--preset", "pokedex", "-v"]);
        assert!(args.verbose);
        assert_eq!(args.load_config().unwrap().job.site, SiteKind::Pokedex);
    }

    #[test]
    fn test_missing_config_file_is_error() {
        let args = CliArgs::parse_from(["page-harvester", "--config", "/nonexistent/job.toml"]);
        assert!(args.load_config().is_err());
    }
}
