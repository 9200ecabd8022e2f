use crate::core::page_plan::{PagePlan, PageTarget};
use crate::domain::model::{PageOutcome, Schema};
use crate::domain::ports::{PageFetcher, RecordExtractor, RecordSink, Sleeper};
use crate::utils::delay::DelayRange;
use crate::utils::error::Result;
use std::future::Future;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    NotStarted,
    Running,
    Finished,
    Aborted,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub pages_attempted: usize,
    pub pages_saved: usize,
    pub pages_empty: usize,
    pub rows_written: usize,
    pub records_dropped: usize,
    /// Pages that could not be fetched or persisted, for a manual re-run.
    pub failed_pages: Vec<PageTarget>,
}

impl RunSummary {
    fn record(&mut self, target: &PageTarget, outcome: &PageOutcome) {
        self.pages_attempted += 1;
        self.rows_written += outcome.rows();
        if outcome.is_failure() {
            self.failed_pages.push(target.clone());
        }
        match outcome {
            PageOutcome::Saved { dropped, .. } => {
                self.pages_saved += 1;
                self.records_dropped += dropped;
            }
            PageOutcome::NoData { dropped } => {
                self.pages_empty += 1;
                self.records_dropped += dropped;
            }
            PageOutcome::FetchFailed { .. } | PageOutcome::SinkFailed { .. } => {}
        }
    }
}

/// Runs fetch → extract → append for every page of a [`PagePlan`], one at a
/// time, sleeping a jittered delay after each page whatever its outcome.
pub struct PaginationDriver<E, S> {
    extractor: E,
    sleeper: S,
    plan: PagePlan,
    page_delay: DelayRange,
    state: RunState,
}

impl<E: RecordExtractor, S: Sleeper> PaginationDriver<E, S> {
    pub fn new(extractor: E, sleeper: S, plan: PagePlan, page_delay: DelayRange) -> Self {
        Self {
            extractor,
            sleeper,
            plan,
            page_delay,
            state: RunState::NotStarted,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn schema(&self) -> &Schema {
        self.extractor.schema()
    }

    /// Acquires the fetcher, then opens the sink, then walks the plan.
    ///
    /// A failure in either setup step aborts the run. Once the fetcher has
    /// been acquired it is released on every path out of this function.
    pub async fn run<F, K, A, O>(&mut self, acquire: A, open_sink: O) -> Result<RunSummary>
    where
        F: PageFetcher,
        K: RecordSink,
        A: Future<Output = Result<F>>,
        O: FnOnce(&Schema) -> Result<K>,
    {
        let mut fetcher = match acquire.await {
            Ok(fetcher) => fetcher,
            Err(e) => {
                self.state = RunState::Aborted;
                tracing::error!("Aborting run, fetcher setup failed: {}", e);
                return Err(e);
            }
        };

        let mut sink = match open_sink(self.extractor.schema()) {
            Ok(sink) => sink,
            Err(e) => {
                self.state = RunState::Aborted;
                tracing::error!("Aborting run, could not open destination: {}", e);
                if let Err(release_err) = fetcher.release().await {
                    tracing::warn!("Releasing fetcher failed: {}", release_err);
                }
                return Err(e);
            }
        };

        self.state = RunState::Running;
        tracing::info!("Scraping {} pages", self.plan.len());

        let summary = self.drive(&mut fetcher, &mut sink).await;

        let finished = sink.finish();
        let released = fetcher.release().await;
        self.state = RunState::Finished;

        tracing::info!(
            "Run finished: {} pages, {} saved, {} empty, {} failed, {} rows written",
            summary.pages_attempted,
            summary.pages_saved,
            summary.pages_empty,
            summary.failed_pages.len(),
            summary.rows_written
        );

        finished?;
        released?;
        Ok(summary)
    }

    async fn drive<F, K>(&self, fetcher: &mut F, sink: &mut K) -> RunSummary
    where
        F: PageFetcher,
        K: RecordSink,
    {
        let mut summary = RunSummary::default();
        for target in self.plan.targets() {
            let outcome = self.process_page(fetcher, sink, &target).await;
            if !outcome.is_failure() {
                tracing::info!("Scraped {} entries from {}", outcome.rows(), target.url);
            }
            summary.record(&target, &outcome);
            self.sleeper.sleep(self.page_delay.sample()).await;
        }
        summary
    }

    async fn process_page<F, K>(&self, fetcher: &mut F, sink: &mut K, target: &PageTarget) -> PageOutcome
    where
        F: PageFetcher,
        K: RecordSink,
    {
        let content = match fetcher.fetch(&target.url).await {
            Ok(content) => content,
            Err(e) => {
                tracing::error!("Error scraping page {}: {}", target.number, e);
                return PageOutcome::FetchFailed {
                    error: e.to_string(),
                };
            }
        };

        let extraction = self.extractor.extract(&content);
        let dropped = extraction.dropped;
        if extraction.is_empty() {
            tracing::debug!("Page {} yielded no records", target.number);
            return PageOutcome::NoData { dropped };
        }

        match sink.append(&extraction.records) {
            Ok(rows) => {
                tracing::info!("Page {} scraped and data saved successfully.", target.number);
                PageOutcome::Saved { rows, dropped }
            }
            Err(e) => {
                tracing::error!("Error saving page {}: {}", target.number, e);
                PageOutcome::SinkFailed {
                    error: e.to_string(),
                }
            }
        }
    }
}
