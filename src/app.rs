// Application state container
//
// Every piece of UI state lives in `TravelHub` and changes only through the
// transition methods below. Views read the derived lists; nothing is global.

use crate::catalog::Catalog;
use crate::config::AppConfig;
use crate::model::{
    Booking, BookingStatus, Category, CategoryFilter, FilterState, Settings, ServiceItem,
    UserProfile, CURRENT_USER_ID,
};
use crate::notifications::{NotificationCenter, Push, ToastKind, Toasts};
use crate::pagination::Paginator;
use crate::pipeline::{ItemQuery, SortKey};
use crate::search::{InsightProvider, RecentSearches, SearchOutcome, SearchParser, SmartSearch};
use crate::store::{self, Store, StoreError};
use chrono::Utc;
use tokio::sync::watch;
use tracing::{error, info, warn};

pub const NO_RESULTS_MESSAGE: &str = "No matching results. Try clearing some filters.";

// Browse-list state derived from user actions
#[derive(Debug, Clone)]
pub struct ViewState {
    pub query: ItemQuery,
    pub paginator: Paginator,
    pub search_results: Option<Vec<ServiceItem>>,
    pub insight: Option<String>,
}

pub struct TravelHub<S, P, I> {
    config: AppConfig,
    catalog: Catalog,
    store: S,
    search: SmartSearch<P, I>,
    view: ViewState,
    // Busy flag for the search spinner; receivers see it flip while a search is in flight
    searching: watch::Sender<bool>,
    settings: Settings,
    profile: UserProfile,
    pub notifications: NotificationCenter,
    pub toasts: Toasts,
}

impl<S, P, I> TravelHub<S, P, I>
where
    S: Store,
    P: SearchParser,
    I: InsightProvider,
{
    pub fn new(config: AppConfig, catalog: Catalog, store: S, parser: P, insight: I) -> Self {
        let history = RecentSearches::seeded_with_limit(config.history_limit);
        let query = ItemQuery {
            filters: FilterState {
                price_range: config.price_range,
                ..Default::default()
            },
            ..Default::default()
        };

        Self {
            view: ViewState {
                query,
                paginator: Paginator::new(config.page_size),
                search_results: None,
                insight: None,
            },
            searching: watch::channel(false).0,
            search: SmartSearch::with_history(parser, insight, history),
            settings: Settings {
                dark_mode: config.prefers_dark,
                ..Default::default()
            },
            profile: UserProfile::guest(),
            notifications: NotificationCenter::with_defaults(),
            toasts: Toasts::default(),
            config,
            catalog,
            store,
        }
    }

    // Loads settings and profile, seeding defaults on first run.
    // Store failures are logged and the defaults kept.
    pub async fn boot(&mut self) {
        let (settings, user) = futures::join!(
            self.store.get_settings(),
            self.store.get_user(CURRENT_USER_ID)
        );

        match settings {
            Ok(Some(settings)) => self.settings = settings,
            Ok(None) => {
                self.settings = Settings {
                    dark_mode: self.config.prefers_dark,
                    ..Default::default()
                }
            }
            Err(e) => error!("Failed to load settings: {}", e),
        }

        match user {
            Ok(Some(user)) => self.profile = user,
            Ok(None) => {
                let guest = UserProfile::guest();
                if let Err(e) = self.store.save_user(&guest).await {
                    error!("Failed to save default profile: {}", e);
                }
                self.profile = guest;
            }
            Err(e) => error!("Failed to load profile: {}", e),
        }

        info!(
            "Booted as {} (language {}, dark mode {})",
            self.profile.name,
            self.settings.language.code(),
            self.settings.dark_mode
        );
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn recent_searches(&self) -> &RecentSearches {
        self.search.history()
    }

    pub fn is_searching(&self) -> bool {
        *self.searching.borrow()
    }

    pub fn watch_searching(&self) -> watch::Receiver<bool> {
        self.searching.subscribe()
    }

    // Re-selecting the active category keeps the tag and the page cursor
    pub fn set_category(&mut self, category: CategoryFilter) {
        if self.view.query.category == category {
            return;
        }
        self.view.query.category = category;
        self.view.query.tag = None;
        self.view.paginator.reset();
    }

    pub fn select_tag(&mut self, tag: Option<String>) {
        self.view.query.tag = tag;
        self.view.paginator.reset();
    }

    pub fn set_filters(&mut self, filters: FilterState) {
        self.view.query.filters = filters;
    }

    pub fn clear_filters(&mut self) {
        self.view.query.filters = FilterState {
            price_range: self.config.price_range,
            ..Default::default()
        };
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        self.view.query.sort = sort;
    }

    // Category tags for the chip row
    pub fn available_tags(&self) -> Vec<String> {
        self.catalog.available_tags(self.view.query.category)
    }

    // Full filtered and sorted list for the current state
    pub fn filtered_items(&self) -> Vec<ServiceItem> {
        let source = self
            .view
            .search_results
            .as_deref()
            .unwrap_or_else(|| self.catalog.items());
        self.view.query.run(source)
    }

    pub fn filtered_count(&self) -> usize {
        self.filtered_items().len()
    }

    pub fn visible_items(&self) -> Vec<ServiceItem> {
        let mut items = self.filtered_items();
        items.truncate(self.view.paginator.visible(items.len()));
        items
    }

    pub fn load_more(&mut self) {
        let total = self.filtered_count();
        self.view.paginator.load_more(total);
    }

    pub async fn search(&mut self, query: &str) {
        self.searching.send_replace(true);

        let outcome = self
            .search
            .search(query, self.catalog.items(), self.settings.language)
            .await;

        match outcome {
            SearchOutcome::Cleared => {
                self.view.search_results = None;
                self.view.insight = None;
            }
            SearchOutcome::Results {
                results,
                insight,
                category_hint,
                show_empty_notice,
            } => {
                self.view.search_results = Some(results);
                self.view.insight = insight;
                if self.config.sync_category {
                    if let Some(category) = category_hint {
                        self.set_category(CategoryFilter::Only(category));
                    }
                }
                if show_empty_notice {
                    self.toasts.add(NO_RESULTS_MESSAGE, ToastKind::Info);
                }
            }
        }

        self.searching.send_replace(false);
    }

    // Simulated push: lands in the inbox and shows its banner as a toast
    pub fn receive_push(&mut self, push: Push) {
        self.toasts.add(push.banner, ToastKind::Info);
        self.notifications.push(push.notification);
    }

    pub async fn toggle_dark_mode(&mut self) {
        self.settings.dark_mode = !self.settings.dark_mode;
        self.persist_settings().await;
    }

    pub async fn toggle_language(&mut self) {
        self.settings.language = self.settings.language.toggled();
        self.persist_settings().await;
        self.toasts.add(
            format!("Language changed to {}", self.settings.language.display_name()),
            ToastKind::Success,
        );
    }

    async fn persist_settings(&self) {
        if let Err(e) = self.store.save_settings(&self.settings).await {
            warn!("Failed to save settings: {}", e);
        }
    }

    pub async fn toggle_favorite(&mut self, item_id: &str) -> Result<bool, StoreError> {
        let Some(item) = self.catalog.find(item_id) else {
            warn!("Cannot favorite unknown item {}", item_id);
            return Ok(false);
        };
        store::toggle_favorite(&self.store, item).await
    }

    pub async fn favorites(&self) -> Vec<ServiceItem> {
        self.store.get_favorites().await.unwrap_or_else(|e| {
            error!("Failed to load favorites: {}", e);
            Vec::new()
        })
    }

    // Books `item_id` at its listed price and stores the booking
    pub async fn book(&mut self, item_id: &str) -> Result<Option<Booking>, StoreError> {
        let Some(item) = self.catalog.find(item_id) else {
            return Ok(None);
        };
        let now = Utc::now();
        let booking = Booking {
            id: format!("BK{}{:04}", now.timestamp_millis(), rand::random::<u16>() % 10_000),
            item_name: item.name.clone(),
            item_image: item.image.clone(),
            date: now,
            total_price: item.price,
            status: BookingStatus::Confirmed,
        };
        self.store.save_booking(&booking).await?;
        self.toasts
            .add(format!("Booked {}", booking.item_name), ToastKind::Success);
        info!("Saved booking {} for {}", booking.id, booking.item_name);
        Ok(Some(booking))
    }

    pub async fn bookings(&self) -> Vec<Booking> {
        self.store.get_bookings().await.unwrap_or_else(|e| {
            error!("Failed to load bookings: {}", e);
            Vec::new()
        })
    }

    // Active category, if a single one is selected
    pub fn active_category(&self) -> Option<Category> {
        match self.view.query.category {
            CategoryFilter::All => None,
            CategoryFilter::Only(c) => Some(c),
        }
    }
}
