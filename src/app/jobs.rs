use crate::adapters::{HttpFetcher, IncrementalCsvSink, RetryingFetcher};
use crate::app::extractors::{CompanyCardExtractor, PokedexTableExtractor};
use crate::config::toml_config::{FetcherKind, HarvestConfig, SiteKind};
use crate::core::{PagePlan, PageTarget, PaginationDriver, RunSummary};
use crate::domain::ports::{PageFetcher, RecordExtractor};
use crate::utils::delay::TokioSleeper;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct RunReport {
    pub output_path: PathBuf,
    pub summary: RunSummary,
}

/// Validates `config`, then scrapes every configured page into a fresh
/// timestamped CSV file.
pub async fn run_job(config: &HarvestConfig) -> Result<RunReport> {
    let output_path = config.output_path();
    run_job_to(config, &output_path).await
}

pub async fn run_job_to(config: &HarvestConfig, output_path: &Path) -> Result<RunReport> {
    config.validate()?;
    let plan = config.page_plan()?;

    tracing::info!(
        "Starting job '{}' ({} pages) -> {}",
        config.job.name,
        plan.len(),
        output_path.display()
    );

    let summary = match config.job.site {
        SiteKind::CompanyCards => {
            run_with(config, CompanyCardExtractor::new()?, plan, output_path).await?
        }
        SiteKind::Pokedex => {
            run_with(config, PokedexTableExtractor::new()?, plan, output_path).await?
        }
    };

    tracing::info!(
        "Data extraction completed and saved to {}.",
        output_path.display()
    );
    for page in &summary.failed_pages {
        tracing::warn!(
            "Page {} ({}) failed; to re-run it, {}",
            page.number,
            page.url,
            rerun_hint(config, page)
        );
    }

    Ok(RunReport {
        output_path: output_path.to_path_buf(),
        summary,
    })
}

async fn run_with<E: RecordExtractor>(
    config: &HarvestConfig,
    extractor: E,
    plan: PagePlan,
    output_path: &Path,
) -> Result<RunSummary> {
    let mut driver = PaginationDriver::new(extractor, TokioSleeper, plan, config.throttle.page_delay);
    driver
        .run(acquire_fetcher(config), |schema| {
            IncrementalCsvSink::open(output_path, schema.clone())
        })
        .await
}

pub async fn acquire_fetcher(config: &HarvestConfig) -> Result<Box<dyn PageFetcher>> {
    match config.source.fetcher {
        FetcherKind::Http => {
            let http = HttpFetcher::new(config.pick_user_agent().as_deref(), config.timeout())?;
            Ok(Box::new(RetryingFetcher::new(
                http,
                config.retry.max_retries,
                config.retry.backoff,
                TokioSleeper,
            )))
        }
        FetcherKind::Browser => launch_browser(config).await,
    }
}

#[cfg(feature = "browser")]
async fn launch_browser(config: &HarvestConfig) -> Result<Box<dyn PageFetcher>> {
    use crate::adapters::browser::BrowserFetcher;

    let fetcher = BrowserFetcher::launch(&config.browser_options()).await?;
    Ok(Box::new(fetcher))
}

#[cfg(not(feature = "browser"))]
async fn launch_browser(_config: &HarvestConfig) -> Result<Box<dyn PageFetcher>> {
    Err(crate::utils::error::HarvestError::SetupError {
        message: "this build does not include the `browser` feature".to_string(),
    })
}

/// Config change that scrapes only `page` again.
pub fn rerun_hint(config: &HarvestConfig, page: &PageTarget) -> String {
    if config.source.urls.is_some() {
        format!("set source.urls = [\"{}\"]", page.url)
    } else {
        format!(
            "set source.pages = {{ start = {}, end = {} }}",
            page.number,
            page.number.saturating_add(1)
        )
    }
}

/// Lines printed by `--dry-run`.
pub fn describe_plan(config: &HarvestConfig, output_path: &Path) -> Result<Vec<String>> {
    config.validate()?;
    let plan = config.page_plan()?;

    let mut lines = vec![
        format!("Job: {} ({:?}, {:?} fetcher)", config.job.name, config.job.site, config.source.fetcher),
        format!("Output: {}", output_path.display()),
        format!(
            "Retries: {} (backoff {}-{}s), page delay {}-{}s",
            config.retry.max_retries,
            config.retry.backoff.min_secs,
            config.retry.backoff.max_secs,
            config.throttle.page_delay.min_secs,
            config.throttle.page_delay.max_secs
        ),
    ];
    lines.extend(
        plan.targets()
            .into_iter()
            .map(|target| format!("Page {}: {}", target.number, target.url)),
    );
    Ok(lines)
}
