//! Built-in job definitions for the two supported sites.

use crate::config::toml_config::{
    FetcherKind, HarvestConfig, JobConfig, OutputConfig, PageRange, RetryConfig, SiteKind,
    SourceConfig, ThrottleConfig,
};
use crate::utils::delay::DelayRange;

pub const DEFAULT_LISTING_URL: &str =
    "https://www.ambitionbox.com/list-of-companies?IndustryName=it-services-and-consulting&sort_by=popularity";

pub const POKEDEX_BASE_URL: &str = "https://www.serebii.net/pokedex-gs/";

pub const POKEMON_TYPES: [&str; 18] = [
    "bug", "dark", "dragon", "electric", "fairy", "fighting", "fire", "flying", "ghost", "grass",
    "ground", "ice", "normal", "poison", "psychic", "rock", "steel", "water",
];

pub const USER_AGENTS: [&str; 4] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Firefox/89.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_6) AppleWebKit/537.36 (KHTML, like Gecko) Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) Edge/91.0.864.64",
];

/// Company listings through a browser session. The listing URL comes from
/// the `URL` environment variable when set.
pub fn company_listing() -> HarvestConfig {
    let base = std::env::var("URL").unwrap_or_else(|_| DEFAULT_LISTING_URL.to_string());

    HarvestConfig {
        job: JobConfig {
            name: "AmbitionBox".to_string(),
            site: SiteKind::CompanyCards,
        },
        source: SourceConfig {
            fetcher: FetcherKind::Browser,
            url_template: Some(format!("{}&page={{page}}", base)),
            pages: Some(PageRange { start: 1, end: 100 }),
            urls: None,
            user_agents: USER_AGENTS.iter().map(|s| s.to_string()).collect(),
            timeout_seconds: None,
            headless: true,
        },
        retry: RetryConfig::default(),
        throttle: ThrottleConfig {
            page_delay: DelayRange::new(2.0, 5.0),
        },
        output: OutputConfig::default(),
    }
}

/// One Pokédex page per type, fetched over plain HTTP with retry.
pub fn pokedex() -> HarvestConfig {
    HarvestConfig {
        job: JobConfig {
            name: "Pokemon".to_string(),
            site: SiteKind::Pokedex,
        },
        source: SourceConfig {
            fetcher: FetcherKind::Http,
            url_template: None,
            pages: None,
            urls: Some(pokedex_urls(POKEDEX_BASE_URL)),
            user_agents: USER_AGENTS.iter().map(|s| s.to_string()).collect(),
            timeout_seconds: Some(30),
            headless: true,
        },
        retry: RetryConfig::default(),
        throttle: ThrottleConfig {
            page_delay: DelayRange::new(2.0, 5.0),
        },
        output: OutputConfig::default(),
    }
}

pub fn pokedex_urls(base_url: &str) -> Vec<String> {
    POKEMON_TYPES
        .iter()
        .map(|kind| format!("{}{}.shtml", base_url, kind))
        .collect()
}
