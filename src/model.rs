// Core data model shared by the catalog, the pipeline and the store

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

// Points needed to fill the profile level bar
pub const LEVEL_POINTS: u32 = 3000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Flight,
    Hotel,
    Train,
    Bus,
    Tour,
    Car,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Flight,
        Category::Hotel,
        Category::Train,
        Category::Bus,
        Category::Tour,
        Category::Car,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Flight => "flight",
            Category::Hotel => "hotel",
            Category::Train => "train",
            Category::Bus => "bus",
            Category::Tour => "tour",
            Category::Car => "car",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "flight" => Some(Category::Flight),
            "hotel" => Some(Category::Hotel),
            "train" => Some(Category::Train),
            "bus" => Some(Category::Bus),
            "tour" => Some(Category::Tour),
            "car" => Some(Category::Car),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Category tab selection; `All` passes every item through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn matches(&self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(c) => *c == category,
        }
    }
}

impl From<Category> for CategoryFilter {
    fn from(category: Category) -> Self {
        CategoryFilter::Only(category)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancellationPolicy {
    Free,
    Partial,
    NonRefundable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomType {
    pub name: String,
    pub price: f64,
    pub max_guests: u32,
}

// A bookable catalog entry. Built once with the catalog and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceItem {
    pub id: String,
    pub category: Category,
    pub name: String,
    pub location: String,
    pub price: f64,
    #[serde(default)]
    pub original_price: Option<f64>,
    pub rating: f64,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub amenities: Option<Vec<String>>,
    pub cancellation_policy: CancellationPolicy,
    #[serde(default)]
    pub room_types: Option<Vec<RoomType>>,
    #[serde(default)]
    pub image: String,
}

impl ServiceItem {
    // Share of the original price knocked off, `0.0` without an original price.
    pub fn discount_ratio(&self) -> f64 {
        match self.original_price {
            Some(original) if original > 0.0 => (original - self.price) / original,
            _ => 0.0,
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    // Fuzzy amenity match: `wanted` must appear inside one of the item's amenities
    pub fn has_amenity_like(&self, wanted: &str) -> bool {
        let wanted = wanted.to_lowercase();
        self.amenities.as_ref().map_or(false, |list| {
            list.iter().any(|a| a.to_lowercase().contains(&wanted))
        })
    }

    pub fn fits_guests(&self, guests: u32) -> bool {
        self.room_types
            .as_ref()
            .map_or(false, |rooms| rooms.iter().any(|r| r.max_guests >= guests))
    }
}

// Structured intent extracted from a free-text query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchCriteria {
    pub location: Option<String>,
    pub max_price: Option<f64>,
    #[serde(rename = "type")]
    pub category: Option<Category>,
    pub amenities: Vec<String>,
    pub guests: Option<u32>,
}

impl SearchCriteria {
    pub fn is_empty(&self) -> bool {
        self.location.is_none()
            && self.max_price.is_none()
            && self.category.is_none()
            && self.amenities.is_empty()
            && self.guests.is_none()
    }
}

pub const DEFAULT_PRICE_RANGE: (f64, f64) = (0.0, 1000.0);

// User-owned advanced filter, edited through the filter panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    pub amenities: BTreeSet<String>,
    pub property_types: BTreeSet<String>,
    pub price_range: (f64, f64),
    pub free_cancellation: bool,
    pub min_rating: f64,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            amenities: BTreeSet::new(),
            property_types: BTreeSet::new(),
            price_range: DEFAULT_PRICE_RANGE,
            free_cancellation: false,
            min_rating: 0.0,
        }
    }
}

impl FilterState {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    // Number of non-default controls, shown as a badge on the filter button
    pub fn active_count(&self) -> usize {
        let mut count = self.amenities.len() + self.property_types.len();
        if self.price_range != DEFAULT_PRICE_RANGE {
            count += 1;
        }
        if self.free_cancellation {
            count += 1;
        }
        if self.min_rating > 0.0 {
            count += 1;
        }
        count
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Pending,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub item_name: String,
    pub item_image: String,
    pub date: DateTime<Utc>,
    pub total_price: f64,
    pub status: BookingStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Vi,
    En,
    Zh,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::Vi => "vi",
            Language::En => "en",
            Language::Zh => "zh",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "vi" => Some(Language::Vi),
            "en" => Some(Language::En),
            "zh" => Some(Language::Zh),
            _ => None,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Language::Vi => Language::En,
            Language::En | Language::Zh => Language::Vi,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Language::Vi => "Vietnamese",
            Language::En => "English",
            Language::Zh => "Chinese",
        }
    }
}

pub const SETTINGS_KEY: &str = "settings";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Settings {
    pub dark_mode: bool,
    pub language: Language,
}

pub const CURRENT_USER_ID: &str = "current";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub avatar: String,
    pub language: Language,
    pub points: u32,
    pub rank: String,
}

impl UserProfile {
    // Profile created on first run.
    pub fn guest() -> Self {
        Self {
            id: CURRENT_USER_ID.to_string(),
            name: "Guest".to_string(),
            email: "user@example.com".to_string(),
            avatar: "https://picsum.photos/seed/user/200/200".to_string(),
            language: Language::Vi,
            points: 100,
            rank: "Member".to_string(),
        }
    }

    pub fn level_progress(&self) -> f64 {
        (self.points as f64 / LEVEL_POINTS as f64).min(1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Alert,
    Info,
    Promo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub time: String,
    pub read: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(price: f64, original_price: Option<f64>) -> ServiceItem {
        ServiceItem {
            id: "h1".to_string(),
            category: Category::Hotel,
            name: "Test".to_string(),
            location: "Da Lat".to_string(),
            price,
            original_price,
            rating: 4.5,
            tags: BTreeSet::new(),
            amenities: Some(vec!["Free WiFi Access".to_string(), "Pool".to_string()]),
            cancellation_policy: CancellationPolicy::Free,
            room_types: Some(vec![RoomType {
                name: "Family".to_string(),
                price,
                max_guests: 4,
            }]),
            image: String::new(),
        }
    }

    #[test]
    fn test_discount_ratio() {
        assert_eq!(item(50.0, Some(100.0)).discount_ratio(), 0.5);
        assert_eq!(item(50.0, None).discount_ratio(), 0.0);
        assert_eq!(item(50.0, Some(0.0)).discount_ratio(), 0.0);
    }

    #[test]
    fn test_amenity_and_guest_helpers() {
        let hotel = item(80.0, None);
        assert!(hotel.has_amenity_like("wifi"));
        assert!(hotel.has_amenity_like("POOL"));
        assert!(!hotel.has_amenity_like("gym"));
        assert!(hotel.fits_guests(4));
        assert!(!hotel.fits_guests(5));
    }

    #[test]
    fn test_criteria_deserializes_parser_shape() {
        let json = r#"{"location":"Da Lat","maxPrice":50,"type":"hotel","amenities":["wifi"]}"#;
        let criteria: SearchCriteria = serde_json::from_str(json).unwrap();
        assert_eq!(criteria.location.as_deref(), Some("Da Lat"));
        assert_eq!(criteria.max_price, Some(50.0));
        assert_eq!(criteria.category, Some(Category::Hotel));
        assert_eq!(criteria.amenities, vec!["wifi".to_string()]);
        assert_eq!(criteria.guests, None);
    }

    #[test]
    fn test_filter_state_clear_and_count() {
        let mut filters = FilterState {
            price_range: (50.0, 100.0),
            min_rating: 4.0,
            free_cancellation: true,
            ..Default::default()
        };
        filters.amenities.insert("wifi".to_string());
        assert_eq!(filters.active_count(), 4);

        filters.clear();
        assert_eq!(filters, FilterState::default());
        assert_eq!(filters.active_count(), 0);
    }

    #[test]
    fn test_profile_defaults() {
        let mut profile = UserProfile::guest();
        assert_eq!(profile.id, CURRENT_USER_ID);
        assert_eq!(profile.points, 100);
        profile.points = 6000;
        assert_eq!(profile.level_progress(), 1.0);
    }

    #[test]
    fn test_language_toggle() {
        assert_eq!(Language::Vi.toggled(), Language::En);
        assert_eq!(Language::En.toggled(), Language::Vi);
        assert_eq!(Language::Zh.toggled(), Language::Vi);
        assert_eq!(Language::from_code("en"), Some(Language::En));
    }
}
