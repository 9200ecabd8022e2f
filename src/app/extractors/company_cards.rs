use crate::domain::model::{Extraction, Record, Schema};
use crate::domain::ports::RecordExtractor;
use crate::utils::error::Result;
use crate::utils::html::{selector, MissingNode, Node};
use scraper::{Html, Selector};

pub const COMPANY_COLUMNS: [&str; 7] = [
    "company_name",
    "rating",
    "reviews",
    "jobs",
    "interviews",
    "highly_rated_for",
    "critically_rated_for",
];

/// Company listing cards: one record per `div.companyCardWrapper`.
pub struct CompanyCardExtractor {
    schema: Schema,
    card: Selector,
    name: Selector,
    rating: Selector,
    reviews_link: Selector,
    jobs_link: Selector,
    interviews_link: Selector,
    action_count: Selector,
    rating_wrapper: Selector,
    highly_rated_header: Selector,
    critically_rated_header: Selector,
    rating_values: Selector,
}

impl CompanyCardExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            schema: Schema::new(COMPANY_COLUMNS),
            card: selector("div.companyCardWrapper")?,
            name: selector("h2.companyCardWrapper__companyName")?,
            rating: selector("div.rating_text")?,
            reviews_link: selector(r#"a[href*="reviews"]"#)?,
            jobs_link: selector(r#"a[href*="jobs"]"#)?,
            interviews_link: selector(r#"a[href*="interviews"]"#)?,
            action_count: selector("span.companyCardWrapper__ActionCount")?,
            rating_wrapper: selector("div.companyCardWrapper__ratingComparisonWrapper")?,
            highly_rated_header: selector("span.companyCardWrapper__ratingHeader--high")?,
            critically_rated_header: selector("span.companyCardWrapper__ratingHeader--critical")?,
            rating_values: selector("span.companyCardWrapper__ratingValues")?,
        })
    }

    /// The count inside the action link whose href contains `what`. The link
    /// itself is mandatory; the count is not.
    fn action_count(
        &self,
        card: Node<'_>,
        link: &Selector,
        what: &str,
    ) -> std::result::Result<Option<String>, MissingNode> {
        let anchor = card.find(link).require(what)?;
        Ok(Node::new(anchor).find(&self.action_count).text())
    }

    fn callout(&self, wrapper: Node<'_>, header: &Selector) -> Option<String> {
        let section = wrapper.find(header);
        if !section.is_present() {
            return None;
        }
        section.find_next(&self.rating_values).text()
    }

    fn parse_card(&self, card: Node<'_>) -> std::result::Result<Record, MissingNode> {
        let reviews = self.action_count(card, &self.reviews_link, "reviews link")?;
        let jobs = self.action_count(card, &self.jobs_link, "jobs link")?;
        let interviews = self.action_count(card, &self.interviews_link, "interviews link")?;

        let (highly_rated_for, critically_rated_for) = {
            let wrapper = card.find(&self.rating_wrapper);
            if wrapper.is_present() {
                (
                    self.callout(wrapper, &self.highly_rated_header),
                    self.callout(wrapper, &self.critically_rated_header),
                )
            } else {
                (None, None)
            }
        };

        Ok(Record::new()
            .with("company_name", card.find(&self.name).text())
            .with("rating", card.find(&self.rating).text())
            .with("reviews", reviews)
            .with("jobs", jobs)
            .with("interviews", interviews)
            .with("highly_rated_for", highly_rated_for)
            .with("critically_rated_for", critically_rated_for))
    }
}

impl RecordExtractor for CompanyCardExtractor {
    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn extract(&self, content: &str) -> Extraction {
        let document = Html::parse_document(content);
        let mut extraction = Extraction::empty();

        for card in Node::root(&document).find_all(&self.card) {
            match self.parse_card(Node::new(card)) {
                Ok(record) => extraction.records.push(record),
                Err(e) => {
                    tracing::warn!("Skipping company card: {}", e);
                    extraction.dropped += 1;
                }
            }
        }

        tracing::debug!(
            "Extracted {} company cards ({} dropped)",
            extraction.records.len(),
            extraction.dropped
        );
        extraction
    }
}
