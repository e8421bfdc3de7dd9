// Smart search: free-text query -> structured criteria -> narrowed catalog
//
// The parser and the insight provider are remote generative-AI calls. Any
// failure on their side degrades to "no criteria" / "no insight" here and is
// never surfaced to the caller as an error.

use crate::model::{Category, Language, SearchCriteria, ServiceItem};
use async_trait::async_trait;
use std::collections::VecDeque;
use thiserror::Error;
use tracing::{debug, info, warn};

pub const DEFAULT_HISTORY_LIMIT: usize = 5;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error: {status_code} - {message}")]
    ApiResponseError { status_code: u16, message: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Missing API key")]
    MissingApiKey,
}

// Maps a free-text query to structured criteria.
#[async_trait]
pub trait SearchParser: Send + Sync {
    async fn parse(&self, query: &str) -> Result<Option<SearchCriteria>, SearchError>;
}

// Produces a short natural-language note about a result set.
#[async_trait]
pub trait InsightProvider: Send + Sync {
    async fn analyze(
        &self,
        query: &str,
        result_count: usize,
        top_result: Option<&str>,
        language: Language,
    ) -> Result<Option<String>, SearchError>;
}

// Stand-in for both AI collaborators when none is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSmartSearch;

#[async_trait]
impl SearchParser for NoSmartSearch {
    async fn parse(&self, _query: &str) -> Result<Option<SearchCriteria>, SearchError> {
        Ok(None)
    }
}

#[async_trait]
impl InsightProvider for NoSmartSearch {
    async fn analyze(
        &self,
        _query: &str,
        _result_count: usize,
        _top_result: Option<&str>,
        _language: Language,
    ) -> Result<Option<String>, SearchError> {
        Ok(None)
    }
}

// Most-recent-first query history, bounded and free of duplicates.
#[derive(Debug, Clone)]
pub struct RecentSearches {
    entries: VecDeque<String>,
    limit: usize,
}

impl RecentSearches {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(limit),
            limit,
        }
    }

    // History the app starts with on a fresh install
    pub fn seeded() -> Self {
        Self::seeded_with_limit(DEFAULT_HISTORY_LIMIT)
    }

    pub fn seeded_with_limit(limit: usize) -> Self {
        let mut history = Self::new(limit);
        for query in ["Vé máy bay Hà Nội", "Homestay Đà Lạt", "Đà Nẵng"] {
            history.record(query);
        }
        history
    }

    pub fn record(&mut self, query: &str) {
        self.entries.retain(|q| q != query);
        self.entries.push_front(query.to_string());
        self.entries.truncate(self.limit);
    }

    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for RecentSearches {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

// Narrows `items` to those satisfying every field set in `criteria`.
pub fn apply_criteria(items: &[ServiceItem], criteria: &SearchCriteria) -> Vec<ServiceItem> {
    let location = criteria.location.as_ref().map(|l| l.to_lowercase());

    items
        .iter()
        .filter(|item| {
            location
                .as_ref()
                .map_or(true, |l| item.location.to_lowercase().contains(l))
        })
        .filter(|item| criteria.max_price.map_or(true, |max| item.price <= max))
        .filter(|item| criteria.category.map_or(true, |c| item.category == c))
        .filter(|item| {
            criteria.amenities.is_empty()
                || criteria.amenities.iter().all(|a| item.has_amenity_like(a))
        })
        .filter(|item| match (criteria.guests, criteria.category) {
            // guest capacity is only known for hotel rooms
            (Some(guests), Some(Category::Hotel)) => item.fits_guests(guests),
            _ => true,
        })
        .cloned()
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    // Empty query: results and insight go back to absent.
    Cleared,
    Results {
        results: Vec<ServiceItem>,
        insight: Option<String>,
        category_hint: Option<Category>,
        show_empty_notice: bool,
    },
}

pub struct SmartSearch<P, I> {
    parser: P,
    insight: I,
    history: RecentSearches,
}

impl<P: SearchParser, I: InsightProvider> SmartSearch<P, I> {
    pub fn new(parser: P, insight: I) -> Self {
        Self::with_history(parser, insight, RecentSearches::default())
    }

    pub fn with_history(parser: P, insight: I, history: RecentSearches) -> Self {
        Self {
            parser,
            insight,
            history,
        }
    }

    pub fn history(&self) -> &RecentSearches {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut RecentSearches {
        &mut self.history
    }

    pub async fn search(
        &mut self,
        query: &str,
        items: &[ServiceItem],
        language: Language,
    ) -> SearchOutcome {
        if query.trim().is_empty() {
            return SearchOutcome::Cleared;
        }

        self.history.record(query);

        let criteria = match self.parser.parse(query).await {
            Ok(criteria) => criteria,
            Err(e) => {
                warn!("Smart search parser failed for {:?}: {}", query, e);
                None
            }
        };
        debug!("Criteria for {:?}: {:?}", query, criteria);

        let results = match &criteria {
            Some(criteria) => apply_criteria(items, criteria),
            None => items.to_vec(),
        };

        let top_result = results.first().map(|item| item.name.as_str());
        let insight = match self
            .insight
            .analyze(query, results.len(), top_result, language)
            .await
        {
            Ok(text) => text,
            Err(e) => {
                warn!("Search insight failed for {:?}: {}", query, e);
                None
            }
        };

        info!("Search {:?} matched {} items", query, results.len());

        let show_empty_notice = results.is_empty() && insight.is_none();
        SearchOutcome::Results {
            results,
            insight,
            category_hint: criteria.and_then(|c| c.category),
            show_empty_notice,
        }
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // Scripted parser/insight pair that counts its calls
    #[derive(Default)]
    pub struct ScriptedAi {
        pub criteria: Option<SearchCriteria>,
        pub insight: Option<String>,
        pub fail_parse: bool,
        pub fail_insight: bool,
        pub parse_calls: AtomicUsize,
        pub insight_calls: AtomicUsize,
    }

    impl ScriptedAi {
        pub fn returning(criteria: SearchCriteria) -> Self {
            Self {
                criteria: Some(criteria),
                ..Default::default()
            }
        }

        pub fn failing() -> Self {
            Self {
                fail_parse: true,
                fail_insight: true,
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl SearchParser for ScriptedAi {
        async fn parse(&self, _query: &str) -> Result<Option<SearchCriteria>, SearchError> {
            self.parse_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_parse {
                return Err(SearchError::NetworkError("connection reset".to_string()));
            }
            Ok(self.criteria.clone())
        }
    }

    #[async_trait]
    impl InsightProvider for ScriptedAi {
        async fn analyze(
            &self,
            _query: &str,
            _result_count: usize,
            _top_result: Option<&str>,
            _language: Language,
        ) -> Result<Option<String>, SearchError> {
            self.insight_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_insight {
                return Err(SearchError::ApiResponseError {
                    status_code: 503,
                    message: "overloaded".to_string(),
                });
            }
            Ok(self.insight.clone())
        }
    }

    // Shared-reference impls so a test can keep the mock and inspect counters
    #[async_trait]
    impl<'a> SearchParser for &'a ScriptedAi {
        async fn parse(&self, query: &str) -> Result<Option<SearchCriteria>, SearchError> {
            <ScriptedAi as SearchParser>::parse(*self, query).await
        }
    }

    #[async_trait]
    impl<'a> InsightProvider for &'a ScriptedAi {
        async fn analyze(
            &self,
            query: &str,
            result_count: usize,
            top_result: Option<&str>,
            language: Language,
        ) -> Result<Option<String>, SearchError> {
            <ScriptedAi as InsightProvider>::analyze(
                *self,
                query,
                result_count,
                top_result,
                language,
            )
            .await
        }
    }
}
