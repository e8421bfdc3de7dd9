// Headless core of the travel hub: catalog browsing, smart search and local persistence

pub mod app;
pub mod catalog;
pub mod config;
pub mod gemini;
pub mod marketplace;
pub mod model;
pub mod notifications;
pub mod pagination;
pub mod pipeline;
pub mod search;
pub mod store;

// Re-export key types for convenience
pub use app::{TravelHub, ViewState};
pub use catalog::Catalog;
pub use config::{AppConfig, GeminiConfig};
pub use gemini::GeminiClient;
pub use model::{
    Booking, BookingStatus, CancellationPolicy, Category, CategoryFilter, FilterState, Language,
    Notification, SearchCriteria, ServiceItem, Settings, UserProfile,
};
pub use pagination::Paginator;
pub use pipeline::{filter_items, sort_items, ItemQuery, SortKey};
pub use search::{
    apply_criteria, InsightProvider, NoSmartSearch, RecentSearches, SearchError, SearchOutcome,
    SearchParser, SmartSearch,
};
pub use store::{FileStore, MemoryStore, Store, StoreError};
