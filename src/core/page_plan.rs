pub const PAGE_PLACEHOLDER: &str = "{page}";

/// The ordered pages one run will attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PagePlan {
    /// `{page}` substituted with every number in `start..end`.
    Range {
        template: String,
        start: u32,
        end: u32,
    },
    /// Explicit URLs, numbered from 1.
    Urls(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTarget {
    pub number: u32,
    pub url: String,
}

impl PagePlan {
    pub fn targets(&self) -> Vec<PageTarget> {
        match self {
            PagePlan::Range {
                template,
                start,
                end,
            } => (*start..*end)
                .map(|number| PageTarget {
                    number,
                    url: template.replace(PAGE_PLACEHOLDER, &number.to_string()),
                })
                .collect(),
            PagePlan::Urls(urls) => urls
                .iter()
                .zip(1..)
                .map(|(url, number)| PageTarget {
                    number,
                    url: url.clone(),
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            PagePlan::Range { start, end, .. } => end.saturating_sub(*start) as usize,
            PagePlan::Urls(urls) => urls.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
