//! Sequential search across several regulation categories.
//!
//! Categories are fetched one after another, in the order given. Records are
//! merged in that order and the first occurrence of a document identifier
//! wins; records without an identifier are always kept.

use chrono::Utc;
use log::{debug, info};
use std::collections::HashSet;

use crate::api::types::{AggregatedReport, CategorySummary, ResultRecord};
use crate::api::{Category, CategoryFetcher};

/// Progress of one aggregate call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AggregateEvent {
    /// A category fetch is about to start
    Fetching { category: Category, index: usize, total: usize },
    /// A category's records were merged
    Merged(CategorySummary),
    /// Every category has been processed
    Done { total_count: usize },
}

/// Accumulates records while enforcing first-seen-wins deduplication
#[derive(Debug, Default)]
struct Merger {
    seen: HashSet<String>,
    records: Vec<ResultRecord>,
}

impl Merger {
    /// Append new records, returning how many were kept
    fn merge(&mut self, fetched: Vec<ResultRecord>) -> usize {
        let before = self.records.len();
        for record in fetched {
            let is_new = match &record.document_id {
                Some(id) => self.seen.insert(id.clone()),
                None => true,
            };
            if is_new {
                self.records.push(record);
            }
        }
        self.records.len() - before
    }
}

/// Drives a [`CategoryFetcher`] across an ordered list of categories
pub struct Aggregator<F: CategoryFetcher> {
    fetcher: F,
}

impl<F: CategoryFetcher> Aggregator<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    /// Search every category in order and merge the results
    pub async fn search_across_categories(
        &self,
        keyword: &str,
        categories: &[Category],
    ) -> AggregatedReport {
        self.search_across_categories_with(keyword, categories, |_| {})
            .await
    }

    /// Same as [`Self::search_across_categories`], reporting progress to `observer`
    pub async fn search_across_categories_with<O>(
        &self,
        keyword: &str,
        categories: &[Category],
        mut observer: O,
    ) -> AggregatedReport
    where
        O: FnMut(AggregateEvent),
    {
        info!(
            "'{}' 검색 시작 (대상: {})",
            keyword,
            categories
                .iter()
                .map(Category::display_name)
                .collect::<Vec<_>>()
                .join(", ")
        );

        let mut merger = Merger::default();
        let mut summaries = Vec::with_capacity(categories.len());

        for (index, &category) in categories.iter().enumerate() {
            observer(AggregateEvent::Fetching {
                category,
                index,
                total: categories.len(),
            });

            let fetched = self.fetcher.fetch(keyword, category).await;
            let fetched_count = fetched.len();
            let added = merger.merge(fetched);

            debug!(
                "{}: fetched {}, kept {} after deduplication",
                category, fetched_count, added
            );

            let summary = CategorySummary {
                category,
                fetched: fetched_count,
                added,
            };
            observer(AggregateEvent::Merged(summary.clone()));
            summaries.push(summary);
        }

        let total_count = merger.records.len();
        observer(AggregateEvent::Done { total_count });

        if total_count == 0 {
            info!("'{}': 검색된 내용이 없습니다", keyword);
        }

        AggregatedReport {
            keyword: keyword.to_string(),
            records: merger.records,
            total_count,
            categories: summaries,
            generated_at: Utc::now(),
        }
    }
}
