pub mod page_plan;
pub mod pagination;

pub use crate::domain::model::{Extraction, PageOutcome, Record, Schema, TableStructure};
pub use crate::domain::ports::{PageFetcher, RecordExtractor, RecordSink, Sleeper};
pub use crate::utils::error::Result;
pub use page_plan::{PagePlan, PageTarget};
pub use pagination::{PaginationDriver, RunState, RunSummary};
