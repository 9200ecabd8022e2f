use async_trait::async_trait;
use page_harvester::app::extractors::{CompanyCardExtractor, COMPANY_COLUMNS};
use page_harvester::core::{PagePlan, PageFetcher, PaginationDriver, RunState, Sleeper};
use page_harvester::utils::delay::DelayRange;
use page_harvester::{FetchError, IncrementalCsvSink, RetryingFetcher};
use std::collections::{HashMap, VecDeque};
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

const TEMPLATE: &str = "https://listing.test/companies?sort_by=popularity&page={page}";

fn page_url(page: u32) -> String {
    TEMPLATE.replace("{page}", &page.to_string())
}

fn company_card(name: &str, rating: &str) -> String {
    format!(
        r#"<div class="companyCardWrapper">
             <h2 class="companyCardWrapper__companyName">{name}</h2>
             <div class="rating_text">{rating}</div>
             <a href="/reviews/{name}"><span class="companyCardWrapper__ActionCount">12k</span></a>
             <a href="/jobs/{name}"><span class="companyCardWrapper__ActionCount">340</span></a>
             <a href="/interviews/{name}"><span class="companyCardWrapper__ActionCount">95</span></a>
           </div>"#
    )
}

fn listing(cards: &[(&str, &str)]) -> String {
    let body: Vec<String> = cards.iter().map(|(n, r)| company_card(n, r)).collect();
    format!("<html><body>{}</body></html>", body.join("\n"))
}

/// Serves scripted responses per URL; `None` is a failed request.
#[derive(Default)]
struct FakeSite {
    responses: HashMap<String, VecDeque<Option<String>>>,
    requests: Arc<Mutex<Vec<String>>>,
    released: Arc<Mutex<bool>>,
}

impl FakeSite {
    fn serve(mut self, url: String, responses: Vec<Option<String>>) -> Self {
        self.responses.insert(url, responses.into());
        self
    }
}

#[async_trait]
impl PageFetcher for FakeSite {
    async fn fetch(&mut self, url: &str) -> Result<String, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());
        let next = self
            .responses
            .get_mut(url)
            .and_then(|queue| queue.pop_front())
            .flatten();
        next.ok_or_else(|| FetchError::Status {
            url: url.to_string(),
            status: 503,
        })
    }

    async fn release(&mut self) -> page_harvester::Result<()> {
        *self.released.lock().unwrap() = true;
        Ok(())
    }
}

#[derive(Clone, Default)]
struct RecordingSleeper {
    delays: Arc<Mutex<Vec<Duration>>>,
}

impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.delays.lock().unwrap().push(duration);
    }
}

#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl LogBuffer {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).to_string()
    }
}

fn read_lines(path: &std::path::Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[tokio::test]
async fn test_two_pages_with_one_retry_end_to_end() {
    let logs = LogBuffer::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("AmbitionBox_01012025T0000.csv");

    let site = FakeSite::default()
        .serve(
            page_url(1),
            vec![Some(listing(&[("TCS", "3.7"), ("Infosys", "3.6")]))],
        )
        .serve(page_url(2), vec![None, Some(listing(&[("Wipro", "3.7")]))]);
    let requests = site.requests.clone();
    let released = site.released.clone();

    let backoff = DelayRange::new(5.0, 10.0);
    let retry_sleeper = RecordingSleeper::default();
    let fetcher = RetryingFetcher::new(site, 3, backoff, retry_sleeper.clone());

    let page_sleeper = RecordingSleeper::default();
    let plan = PagePlan::Range {
        template: TEMPLATE.to_string(),
        start: 1,
        end: 3,
    };
    let mut driver = PaginationDriver::new(
        CompanyCardExtractor::new().unwrap(),
        page_sleeper.clone(),
        plan,
        DelayRange::new(2.0, 5.0),
    );

    let summary = driver
        .run(async { Ok(fetcher) }, |schema| {
            IncrementalCsvSink::open(&output, schema.clone())
        })
        .await
        .unwrap();

    assert_eq!(driver.state(), RunState::Finished);
    assert_eq!(summary.rows_written, 3);
    assert!(summary.failed_pages.is_empty());
    assert!(*released.lock().unwrap());
    assert_eq!(requests.lock().unwrap().len(), 3);

    let lines = read_lines(&output);
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], COMPANY_COLUMNS.join(","));
    assert_eq!(lines[1], "TCS,3.7,12k,340,95,,");
    assert_eq!(lines[2], "Infosys,3.6,12k,340,95,,");
    assert_eq!(lines[3], "Wipro,3.7,12k,340,95,,");

    let retry_lines = logs
        .contents()
        .lines()
        .filter(|line| line.contains("Retrying..."))
        .count();
    assert_eq!(retry_lines, 1);

    let retry_delays = retry_sleeper.delays.lock().unwrap();
    assert_eq!(retry_delays.len(), 1);
    assert!(backoff.contains(retry_delays[0]));
    assert_eq!(page_sleeper.delays.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_exhausted_retries_skip_page_and_continue() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.csv");

    let site = FakeSite::default()
        .serve(page_url(1), vec![None, None, None])
        .serve(page_url(2), vec![Some(listing(&[("HCL", "3.5")]))]);
    let requests = site.requests.clone();
    let retry_sleeper = RecordingSleeper::default();
    let fetcher = RetryingFetcher::new(site, 3, DelayRange::new(5.0, 10.0), retry_sleeper.clone());

    let mut driver = PaginationDriver::new(
        CompanyCardExtractor::new().unwrap(),
        RecordingSleeper::default(),
        PagePlan::Range {
            template: TEMPLATE.to_string(),
            start: 1,
            end: 3,
        },
        DelayRange::none(),
    );

    let summary = driver
        .run(async { Ok(fetcher) }, |schema| {
            IncrementalCsvSink::open(&output, schema.clone())
        })
        .await
        .unwrap();

    let requests = requests.lock().unwrap();
    assert_eq!(requests.iter().filter(|u| **u == page_url(1)).count(), 3);
    assert_eq!(requests.last().unwrap(), &page_url(2));
    assert_eq!(retry_sleeper.delays.lock().unwrap().len(), 3);
    assert_eq!(summary.failed_pages.len(), 1);
    assert_eq!(summary.failed_pages[0].number, 1);
    assert_eq!(read_lines(&output).len(), 2);
}

#[tokio::test]
async fn test_header_written_once_with_empty_pages_between() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.csv");

    let site = FakeSite::default()
        .serve(page_url(1), vec![Some(listing(&[]))])
        .serve(page_url(2), vec![Some(listing(&[("TCS", "3.7")]))])
        .serve(page_url(3), vec![Some(listing(&[]))])
        .serve(page_url(4), vec![Some(listing(&[("Infosys", "3.6"), ("Wipro", "3.7")]))]);

    let mut driver = PaginationDriver::new(
        CompanyCardExtractor::new().unwrap(),
        RecordingSleeper::default(),
        PagePlan::Range {
            template: TEMPLATE.to_string(),
            start: 1,
            end: 5,
        },
        DelayRange::none(),
    );

    let summary = driver
        .run(async { Ok(site) }, |schema| {
            IncrementalCsvSink::open(&output, schema.clone())
        })
        .await
        .unwrap();

    assert_eq!(summary.pages_empty, 2);
    assert_eq!(summary.pages_saved, 2);

    let lines = read_lines(&output);
    let header = COMPANY_COLUMNS.join(",");
    assert_eq!(lines.iter().filter(|l| **l == header).count(), 1);
    assert_eq!(lines.len(), 4);
    for line in &lines {
        assert_eq!(line.split(',').count(), COMPANY_COLUMNS.len());
    }
}

#[tokio::test]
async fn test_appending_to_existing_file_never_rewrites_header() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("resumed.csv");
    std::fs::write(
        &output,
        format!("{}\nAccenture,4.0,1L,2k,300,,\n", COMPANY_COLUMNS.join(",")),
    )
    .unwrap();

    let site = FakeSite::default().serve(page_url(7), vec![Some(listing(&[("TCS", "3.7")]))]);
    let mut driver = PaginationDriver::new(
        CompanyCardExtractor::new().unwrap(),
        RecordingSleeper::default(),
        PagePlan::Range {
            template: TEMPLATE.to_string(),
            start: 7,
            end: 8,
        },
        DelayRange::none(),
    );

    driver
        .run(async { Ok(site) }, |schema| {
            IncrementalCsvSink::open(&output, schema.clone())
        })
        .await
        .unwrap();

    let lines = read_lines(&output);
    assert_eq!(
        lines,
        vec![
            COMPANY_COLUMNS.join(","),
            "Accenture,4.0,1L,2k,300,,".to_string(),
            "TCS,3.7,12k,340,95,,".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_each_fetched_page_logs_entry_count_with_url() {
    let logs = LogBuffer::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.csv");

    let site = FakeSite::default()
        .serve(page_url(1), vec![Some(listing(&[("TCS", "3.7"), ("Infosys", "3.6")]))])
        .serve(page_url(2), vec![Some(listing(&[]))])
        .serve(page_url(3), vec![None]);

    let mut driver = PaginationDriver::new(
        CompanyCardExtractor::new().unwrap(),
        RecordingSleeper::default(),
        PagePlan::Range {
            template: TEMPLATE.to_string(),
            start: 1,
            end: 4,
        },
        DelayRange::none(),
    );

    driver
        .run(async { Ok(site) }, |schema| {
            IncrementalCsvSink::open(&output, schema.clone())
        })
        .await
        .unwrap();

    let contents = logs.contents();
    assert!(contents.contains(&format!("Scraped 2 entries from {}", page_url(1))));
    assert!(contents.contains(&format!("Scraped 0 entries from {}", page_url(2))));
    assert!(!contents.contains(&format!("entries from {}", page_url(3))));
    assert!(contents.contains("Error scraping page 3"));
}
