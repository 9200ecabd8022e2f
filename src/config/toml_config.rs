use crate::adapters::browser::BrowserOptions;
use crate::adapters::retry::DEFAULT_MAX_RETRIES;
use crate::core::page_plan::{PagePlan, PAGE_PLACEHOLDER};
use crate::utils::delay::DelayRange;
use crate::utils::error::{HarvestError, Result};
use crate::utils::validation::{self, Validate};
use chrono::{DateTime, Local};
use rand::seq::SliceRandom;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestConfig {
    pub job: JobConfig,
    pub source: SourceConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub throttle: ThrottleConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    /// Dataset name, used as the output file prefix.
    pub name: String,
    pub site: SiteKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SiteKind {
    CompanyCards,
    Pokedex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetcherKind {
    Browser,
    Http,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub fetcher: FetcherKind,
    pub url_template: Option<String>,
    pub pages: Option<PageRange>,
    pub urls: Option<Vec<String>>,
    #[serde(default)]
    pub user_agents: Vec<String>,
    pub timeout_seconds: Option<u64>,
    #[serde(default = "default_headless")]
    pub headless: bool,
}

/// Half-open range of page numbers, `start..end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRange {
    pub start: u32,
    pub end: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_backoff")]
    pub backoff: DelayRange,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThrottleConfig {
    #[serde(default = "default_page_delay")]
    pub page_delay: DelayRange,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_directory")]
    pub directory: String,
}

fn default_headless() -> bool {
    true
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

fn default_backoff() -> DelayRange {
    DelayRange::new(5.0, 10.0)
}

fn default_page_delay() -> DelayRange {
    DelayRange::new(2.0, 5.0)
}

fn default_output_directory() -> String {
    "data/scrapped".to_string()
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            backoff: default_backoff(),
        }
    }
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            page_delay: default_page_delay(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
        }
    }
}

impl HarvestConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(HarvestError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| HarvestError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| HarvestError::ConfigValidationError {
            field: "environment".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("job.name", &self.job.name)?;
        validation::validate_path("output.directory", &self.output.directory)?;
        validation::validate_positive_number("retry.max_retries", self.retry.max_retries, 1)?;
        validation::validate_delay_range(
            "retry.backoff",
            self.retry.backoff.min_secs,
            self.retry.backoff.max_secs,
        )?;
        validation::validate_delay_range(
            "throttle.page_delay",
            self.throttle.page_delay.min_secs,
            self.throttle.page_delay.max_secs,
        )?;

        match &self.source.urls {
            Some(urls) => {
                if urls.is_empty() {
                    return Err(HarvestError::ConfigValidationError {
                        field: "source.urls".to_string(),
                        message: "URL list cannot be empty".to_string(),
                    });
                }
                for url in urls {
                    validation::validate_url("source.urls", url)?;
                }
            }
            None => {
                let template =
                    validation::validate_required_field("source.url_template", &self.source.url_template)?;
                validation::validate_url_template("source.url_template", template, PAGE_PLACEHOLDER)?;
                let pages = validation::validate_required_field("source.pages", &self.source.pages)?;
                validation::validate_page_range("source.pages", pages.start, pages.end)?;
            }
        }

        for agent in &self.source.user_agents {
            validation::validate_non_empty_string("source.user_agents", agent)?;
        }

        Ok(())
    }

    /// An explicit URL list wins over the template.
    pub fn page_plan(&self) -> Result<PagePlan> {
        if let Some(urls) = &self.source.urls {
            return Ok(PagePlan::Urls(urls.clone()));
        }

        let template =
            validation::validate_required_field("source.url_template", &self.source.url_template)?;
        let pages = validation::validate_required_field("source.pages", &self.source.pages)?;
        Ok(PagePlan::Range {
            template: template.clone(),
            start: pages.start,
            end: pages.end,
        })
    }

    /// `{directory}/{name}_{MMDDYYYYThhmm}.csv`
    pub fn output_path_at(&self, now: DateTime<Local>) -> PathBuf {
        let stamp = now.format("%m%d%YT%H%M");
        Path::new(&self.output.directory).join(format!("{}_{}.csv", self.job.name, stamp))
    }

    pub fn output_path(&self) -> PathBuf {
        self.output_path_at(Local::now())
    }

    /// One user agent from the pool, picked at random per session.
    pub fn pick_user_agent(&self) -> Option<String> {
        self.source
            .user_agents
            .choose(&mut rand::thread_rng())
            .cloned()
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.source.timeout_seconds.map(Duration::from_secs)
    }

    pub fn browser_options(&self) -> BrowserOptions {
        BrowserOptions {
            user_agent: self.pick_user_agent(),
            headless: self.source.headless,
            timeout: self.timeout(),
            ..BrowserOptions::default()
        }
    }
}

impl Validate for HarvestConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
