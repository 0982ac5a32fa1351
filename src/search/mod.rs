mod arxiv;

pub use arxiv::ArxivClient;

use async_trait::async_trait;
use chrono::{DateTime, Datelike, Utc};
use std::sync::Arc;
use tracing::warn;

use crate::core::error::SearchError;

/// Multiplier applied to the desired result count before the external
/// relevance-ranked query. The recency re-sort needs a larger pool than the
/// final count, since the feed's relevance rank is the only relevance signal
/// available.
pub const OVERFETCH_FACTOR: usize = 4;

/// One raw entry as returned by a bibliographic source, before shaping.
#[derive(Debug, Clone)]
pub struct PaperEntry {
    /// Canonical entry URL, doubles as the identifier
    pub entry_id: String,
    pub title: String,
    pub summary: String,
    pub published: DateTime<Utc>,
    pub authors: Vec<String>,
    pub pdf_url: Option<String>,
}

/// The bibliographic search capability. Relevance-ranked; never mutated.
#[async_trait]
pub trait PaperSource: Send + Sync {
    async fn query(&self, text: &str, limit: usize) -> Result<Vec<PaperEntry>, SearchError>;
}

/// One shaped bibliographic record, ready for prompt embedding. Transient;
/// produced fresh per search call and never persisted.
#[derive(Debug, Clone)]
pub struct PaperRecord {
    pub entry_id: String,
    pub title: String,
    /// Full author names joined with ", ", original order
    pub authors: String,
    pub year: String,
    /// Abstract with embedded newlines collapsed to single spaces
    pub abstract_text: String,
    pub pdf_url: String,
}

impl PaperRecord {
    pub fn from_entry(entry: PaperEntry) -> Self {
        Self {
            entry_id: entry.entry_id,
            title: collapse_whitespace(&entry.title),
            authors: entry.authors.join(", "),
            year: entry.published.year().to_string(),
            abstract_text: collapse_whitespace(&entry.summary),
            pdf_url: entry.pdf_url.unwrap_or_default(),
        }
    }

    /// Serializes the record as one fixed textual block.
    pub fn to_block(&self) -> String {
        format!(
            "[Paper ID: {}]\n\
             - Title: {}\n\
             - Authors: {}\n\
             - Published Year: {}\n\
             - Abstract: {}\n\
             - PDF Link: {}",
            self.entry_id, self.title, self.authors, self.year, self.abstract_text, self.pdf_url,
        )
    }
}

/// Result of one adapter call. An empty outcome is a valid "no matches"
/// answer, distinct from a transport failure (which is absorbed here).
#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    pub records: Vec<PaperRecord>,
    pub count: usize,
}

pub struct PaperSearch {
    source: Arc<dyn PaperSource>,
}

impl PaperSearch {
    pub fn new(source: Arc<dyn PaperSource>) -> Self {
        Self { source }
    }

    /// Over-fetches a relevance-ranked pool, re-sorts it by publication date
    /// descending, truncates to `desired` and shapes the survivors. Transport
    /// or protocol failures degrade to the empty outcome with a logged
    /// diagnostic; they are never retried and never propagate.
    pub async fn search_papers(&self, query: &str, desired: usize) -> SearchOutcome {
        if desired == 0 {
            return SearchOutcome::default();
        }

        let mut pool = match self.source.query(query, desired * OVERFETCH_FACTOR).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!("paper search unavailable, degrading to no results: {e}");
                return SearchOutcome::default();
            }
        };

        if pool.is_empty() {
            return SearchOutcome::default();
        }

        pool.sort_by(|a, b| b.published.cmp(&a.published));
        pool.truncate(desired);

        let records: Vec<PaperRecord> = pool.into_iter().map(PaperRecord::from_entry).collect();
        SearchOutcome {
            count: records.len(),
            records,
        }
    }
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
