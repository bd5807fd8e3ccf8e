use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Category;

/// Parameters of a single search against one category.
///
/// The page size can only shrink through the retry logic of the fetch
/// engine; callers fix it once at construction. It never drops below 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    keyword: String,
    category: Category,
    page_no: u32,
    page_size: u32,
    max_page: Option<u32>,
}

impl SearchRequest {
    pub fn new(keyword: impl Into<String>, category: Category, page_size: u32) -> Self {
        Self {
            keyword: keyword.into(),
            category,
            page_no: 1,
            page_size: page_size.max(1),
            max_page: None,
        }
    }

    /// Attach the proxy's page budget (`maxPage`)
    pub fn with_max_page(mut self, max_page: u32) -> Self {
        self.max_page = Some(max_page.max(1));
        self
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn page_no(&self) -> u32 {
        self.page_no
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn max_page(&self) -> Option<u32> {
        self.max_page
    }

    /// Request a smaller response for the next attempt.
    ///
    /// Returns `false` without touching anything when the page size (or the
    /// page budget) is already at its floor of 1.
    pub(crate) fn shrink(&mut self) -> bool {
        if self.page_size <= 1 || self.max_page.is_some_and(|p| p <= 1) {
            return false;
        }
        self.page_size -= 1;
        if let Some(max_page) = self.max_page.as_mut() {
            *max_page -= 1;
        }
        true
    }
}

/// One matched regulation document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    /// Opaque document key; records without one are never deduplicated
    pub document_id: Option<String>,
    /// Title, may contain `<em class='smart'>` emphasis
    pub title: String,
    /// Matched excerpt, same markup as the title
    pub highlighted_content: String,
    /// Link to the original document
    pub source_link: String,
}

/// Classified result of a fetch attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The service answered with at least one record
    Success(Vec<ResultRecord>),
    /// The service answered successfully but matched nothing
    EmptyResult,
    /// Non-"00" status code from either envelope
    ApiError { code: String, message: String },
    /// Connection refused, timeout, DNS failure or a broken body stream
    TransportError(String),
    /// The upstream refused to send a page this large
    OversizedResponse,
    /// Any other non-success HTTP status
    HttpStatus(u16),
    /// Body was not one of the known envelopes
    Malformed(String),
    /// No service key configured; nothing was sent
    MissingCredential,
}

impl FetchOutcome {
    /// Records carried by this outcome, empty for every failure
    pub fn into_records(self) -> Vec<ResultRecord> {
        match self {
            Self::Success(records) => records,
            _ => Vec::new(),
        }
    }

    /// Whether another attempt with a smaller page may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::OversizedResponse)
    }

    /// Convert to the crate error taxonomy for callers that want to surface failures
    pub fn into_result(self) -> crate::error::Result<Vec<ResultRecord>> {
        use crate::error::KoshaError;

        match self {
            Self::Success(records) => Ok(records),
            Self::EmptyResult => Ok(Vec::new()),
            Self::ApiError { code, message } => Err(KoshaError::api_error(
                code,
                message,
                Some("서비스 키와 요청 파라미터를 확인하세요.".to_string()),
            )),
            Self::TransportError(cause) => Err(KoshaError::Transport(cause)),
            Self::OversizedResponse => Err(KoshaError::OversizedResponse),
            Self::HttpStatus(status) => Err(KoshaError::HttpStatus(status)),
            Self::Malformed(detail) => Err(KoshaError::Parse(detail)),
            Self::MissingCredential => Err(KoshaError::NoApiKey),
        }
    }
}

/// Final outcome of a fetch together with how it was reached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchReport {
    pub outcome: FetchOutcome,
    /// Number of HTTP requests issued
    pub attempts: u32,
    /// Page size of the last request (or the starting size if none was sent)
    pub page_size: u32,
}

/// Per-category bookkeeping of an aggregate search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: Category,
    /// Records returned by the fetch engine
    pub fetched: usize,
    /// Records that survived deduplication
    pub added: usize,
}

/// Merged result of a search across several categories
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatedReport {
    /// Keyword the search was issued with
    pub keyword: String,
    /// Records in category order, first occurrence wins
    pub records: Vec<ResultRecord>,
    /// Number of records in `records`
    pub total_count: usize,
    /// Categories in the order they were searched
    pub categories: Vec<CategorySummary>,
    /// Report timestamp
    pub generated_at: DateTime<Utc>,
}

impl AggregatedReport {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
