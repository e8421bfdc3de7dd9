// Filter/sort pipeline over catalog items
//
// Everything here is a pure transform: the input slice is never modified and
// the output only ever holds clones of input items.

use crate::model::{CancellationPolicy, CategoryFilter, FilterState, ServiceItem};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    PriceLow,
    PriceHigh,
    RatingHigh,
    RatingLow,
    #[default]
    Deal,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        SortKey::PriceLow,
        SortKey::PriceHigh,
        SortKey::RatingHigh,
        SortKey::RatingLow,
        SortKey::Deal,
    ];

    fn compare(&self, a: &ServiceItem, b: &ServiceItem) -> Ordering {
        let ord = match self {
            SortKey::PriceLow => a.price.partial_cmp(&b.price),
            SortKey::PriceHigh => b.price.partial_cmp(&a.price),
            SortKey::RatingHigh => b.rating.partial_cmp(&a.rating),
            SortKey::RatingLow => a.rating.partial_cmp(&b.rating),
            SortKey::Deal => b.discount_ratio().partial_cmp(&a.discount_ratio()),
        };
        // NaN compares equal so it keeps its place
        ord.unwrap_or(Ordering::Equal)
    }
}

// Everything that narrows and orders the browse list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemQuery {
    pub category: CategoryFilter,
    pub tag: Option<String>,
    pub filters: FilterState,
    pub sort: SortKey,
}

impl ItemQuery {
    pub fn run(&self, items: &[ServiceItem]) -> Vec<ServiceItem> {
        let filtered = filter_items(items, self.category, self.tag.as_deref(), &self.filters);
        sort_items(filtered, self.sort)
    }
}

// True when `item` passes every active predicate
pub fn matches(
    item: &ServiceItem,
    category: CategoryFilter,
    tag: Option<&str>,
    filters: &FilterState,
) -> bool {
    if !category.matches(item.category) {
        return false;
    }

    if !tag.map_or(true, |t| item.has_tag(t)) {
        return false;
    }

    let (min, max) = filters.price_range;
    if item.price < min || item.price > max {
        return false;
    }

    if filters.min_rating > 0.0 && item.rating < filters.min_rating {
        return false;
    }

    if filters.free_cancellation && item.cancellation_policy != CancellationPolicy::Free {
        return false;
    }

    if !filters.amenities.is_empty() {
        if item.amenities.is_none() {
            return false;
        }
        if !filters.amenities.iter().all(|a| item.has_amenity_like(a)) {
            return false;
        }
    }

    true
}

pub fn filter_items(
    items: &[ServiceItem],
    category: CategoryFilter,
    tag: Option<&str>,
    filters: &FilterState,
) -> Vec<ServiceItem> {
    items
        .iter()
        .filter(|item| matches(item, category, tag, filters))
        .cloned()
        .collect()
}

// Stable sort: items with equal keys keep their input order.
pub fn sort_items(mut items: Vec<ServiceItem>, key: SortKey) -> Vec<ServiceItem> {
    items.sort_by(|a, b| key.compare(a, b));
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, RoomType};
    use std::collections::BTreeSet;
    use test_case::test_case;

    fn item(
        id: &str,
        category: Category,
        price: f64,
        original_price: Option<f64>,
        rating: f64,
        tags: &[&str],
        amenities: Option<&[&str]>,
        policy: CancellationPolicy,
    ) -> ServiceItem {
        ServiceItem {
            id: id.to_string(),
            category,
            name: format!("Item {}", id),
            location: "Da Nang".to_string(),
            price,
            original_price,
            rating,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            amenities: amenities.map(|list| list.iter().map(|a| a.to_string()).collect()),
            cancellation_policy: policy,
            room_types: None,
            image: String::new(),
        }
    }

    fn sample_items() -> Vec<ServiceItem> {
        use CancellationPolicy::*;
        vec![
            item(
                "hotel1",
                Category::Hotel,
                150.0,
                Some(200.0),
                4.8,
                &["Luxury"],
                Some(&["Free WiFi Access", "Spa"]),
                Free,
            ),
            item(
                "hotel2",
                Category::Hotel,
                80.0,
                None,
                3.9,
                &["Budget"],
                Some(&["Shared Kitchen"]),
                NonRefundable,
            ),
            item("hotel3", Category::Hotel, 60.0, Some(100.0), 4.2, &["Homestay"], None, Free),
            item(
                "tour1",
                Category::Tour,
                30.0,
                Some(33.0),
                4.6,
                &["Food"],
                Some(&["Local Guide", "wifi hotspot"]),
                Partial,
            ),
            item(
                "car1",
                Category::Car,
                55.0,
                None,
                4.5,
                &["Family", "Budget"],
                Some(&["Driver Included"]),
                Free,
            ),
        ]
    }

    fn ids(items: &[ServiceItem]) -> Vec<&str> {
        items.iter().map(|i| i.id.as_str()).collect()
    }

    fn amenities(list: &[&str]) -> BTreeSet<String> {
        list.iter().map(|a| a.to_string()).collect()
    }

    #[test_case(CategoryFilter::All, None, FilterState::default(),
        vec!["hotel1", "hotel2", "hotel3", "tour1", "car1"]; "#1 no filters")]
    #[test_case(CategoryFilter::Only(Category::Hotel), None, FilterState::default(),
        vec!["hotel1", "hotel2", "hotel3"]; "#2 category")]
    #[test_case(CategoryFilter::All, Some("Budget"), FilterState::default(),
        vec!["hotel2", "car1"]; "#3 tag")]
    #[test_case(CategoryFilter::All, None, FilterState { price_range: (55.0, 80.0), ..Default::default() },
        vec!["hotel2", "hotel3", "car1"]; "#4 inclusive price range")]
    #[test_case(CategoryFilter::All, None, FilterState { min_rating: 4.5, ..Default::default() },
        vec!["hotel1", "tour1", "car1"]; "#5 rating floor")]
    #[test_case(CategoryFilter::All, None, FilterState { free_cancellation: true, ..Default::default() },
        vec!["hotel1", "hotel3", "car1"]; "#6 free cancellation")]
    #[test_case(CategoryFilter::All, None, FilterState { amenities: amenities(&["WIFI"]), ..Default::default() },
        vec!["hotel1", "tour1"]; "#7 fuzzy amenity")]
    #[test_case(CategoryFilter::All, None, FilterState { amenities: amenities(&["wifi", "spa"]), ..Default::default() },
        vec!["hotel1"]; "#8 every amenity required")]
    #[test_case(CategoryFilter::Only(Category::Hotel), Some("Budget"), FilterState { min_rating: 4.0, ..Default::default() },
        vec![]; "#9 combined empty")]
    fn test_filter_items(
        category: CategoryFilter,
        tag: Option<&str>,
        filters: FilterState,
        expected_ids: Vec<&str>,
    ) {
        let items = sample_items();
        let results = filter_items(&items, category, tag, &filters);
        assert_eq!(ids(&results), expected_ids);

        // never fabricates, every result passes every predicate
        for result in &results {
            assert!(items.contains(result));
            assert!(matches(result, category, tag, &filters));
        }
    }

    #[test]
    fn test_filter_does_not_touch_input() {
        let items = sample_items();
        let before = items.clone();
        let filters = FilterState {
            price_range: (0.0, 10.0),
            ..Default::default()
        };
        assert!(filter_items(&items, CategoryFilter::All, None, &filters).is_empty());
        assert_eq!(items, before);
    }

    #[test_case(SortKey::PriceLow, vec!["tour1", "car1", "hotel3", "hotel2", "hotel1"]; "price low")]
    #[test_case(SortKey::PriceHigh, vec!["hotel1", "hotel2", "hotel3", "car1", "tour1"]; "price high")]
    #[test_case(SortKey::RatingHigh, vec!["hotel1", "tour1", "car1", "hotel3", "hotel2"]; "rating high")]
    #[test_case(SortKey::RatingLow, vec!["hotel2", "hotel3", "car1", "tour1", "hotel1"]; "rating low")]
    #[test_case(SortKey::Deal, vec!["hotel3", "hotel1", "tour1", "hotel2", "car1"]; "best deal")]
    fn test_sort_items(key: SortKey, expected_ids: Vec<&str>) {
        let sorted = sort_items(sample_items(), key);
        assert_eq!(ids(&sorted), expected_ids);
    }

    #[test]
    fn test_price_sorts_are_reverses() {
        let asc = sort_items(sample_items(), SortKey::PriceLow);
        let mut desc = sort_items(sample_items(), SortKey::PriceHigh);
        desc.reverse();
        assert_eq!(asc, desc);
    }

    #[test]
    fn test_deal_ranks_bigger_discount_first() {
        use CancellationPolicy::Free;
        let items = vec![
            item("ten", Category::Hotel, 90.0, Some(100.0), 4.0, &[], None, Free),
            item("half", Category::Hotel, 50.0, Some(100.0), 4.0, &[], None, Free),
        ];
        assert_eq!(ids(&sort_items(items, SortKey::Deal)), vec!["half", "ten"]);
    }

    #[test]
    fn test_sort_is_stable_for_ties() {
        use CancellationPolicy::Free;
        let items = vec![
            item("a", Category::Bus, 20.0, None, 4.0, &[], None, Free),
            item("b", Category::Bus, 10.0, None, 4.0, &[], None, Free),
            item("c", Category::Bus, 20.0, None, 4.0, &[], None, Free),
            item("d", Category::Bus, 10.0, None, 4.0, &[], None, Free),
        ];
        assert_eq!(
            ids(&sort_items(items.clone(), SortKey::PriceLow)),
            vec!["b", "d", "a", "c"]
        );
        // no discount anywhere, deal order is input order
        assert_eq!(ids(&sort_items(items, SortKey::Deal)), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_hotel_price_and_rating_scenario() {
        use CancellationPolicy::Free;
        let fixtures: [(f64, f64, Option<f64>); 10] = [
            (20.0, 4.5, Some(40.0)),
            (55.0, 4.2, Some(110.0)),
            (60.0, 3.5, Some(120.0)),
            (75.0, 4.8, Some(100.0)),
            (90.0, 4.0, None),
            (100.0, 4.1, Some(125.0)),
            (101.0, 4.9, Some(200.0)),
            (150.0, 4.4, Some(160.0)),
            (50.0, 4.0, Some(60.0)),
            (200.0, 5.0, None),
        ];
        let hotels: Vec<ServiceItem> = fixtures
            .iter()
            .enumerate()
            .map(|(i, (price, rating, original))| {
                let id = format!("h{}", i);
                let mut hotel =
                    item(&id, Category::Hotel, *price, *original, *rating, &[], None, Free);
                hotel.room_types = Some(vec![RoomType {
                    name: "Std".to_string(),
                    price: *price,
                    max_guests: 2,
                }]);
                hotel
            })
            .collect();

        let query = ItemQuery {
            filters: FilterState {
                price_range: (50.0, 100.0),
                min_rating: 4.0,
                ..Default::default()
            },
            ..Default::default()
        };
        let results = query.run(&hotels);

        // h1 50%, h3 25%, h5 20%, h8 16.7%, h4 0%
        assert_eq!(ids(&results), vec!["h1", "h3", "h5", "h8", "h4"]);
        for hotel in &results {
            assert!(hotel.price >= 50.0 && hotel.price <= 100.0);
            assert!(hotel.rating >= 4.0);
        }
    }
}
