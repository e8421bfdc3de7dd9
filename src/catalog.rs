// Static catalog of bookable items and destinations

use crate::model::{CancellationPolicy, Category, CategoryFilter, RoomType, ServiceItem};
use std::collections::BTreeSet;

pub const LOCATIONS: &[&str] = &[
    "Ha Noi",
    "Da Nang",
    "Da Lat",
    "Hoi An",
    "Phu Quoc",
    "Ho Chi Minh",
    "Sa Pa",
    "Nha Trang",
];

// Immutable, ordered collection of catalog entries.
#[derive(Debug, Clone)]
pub struct Catalog {
    items: Vec<ServiceItem>,
}

impl Catalog {
    pub fn new(items: Vec<ServiceItem>) -> Self {
        Self { items }
    }

    // Built-in catalog: flights, hotels, trains, buses, tours and cars in that order.
    pub fn builtin() -> Self {
        let mut items = Vec::new();
        items.extend(flights());
        items.extend(hotels());
        items.extend(trains());
        items.extend(buses());
        items.extend(tours());
        items.extend(cars());
        Self { items }
    }

    pub fn items(&self) -> &[ServiceItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn find(&self, id: &str) -> Option<&ServiceItem> {
        self.items.iter().find(|item| item.id == id)
    }

    // Sorted, de-duplicated tags of the items visible under `category`
    pub fn available_tags(&self, category: CategoryFilter) -> Vec<String> {
        self.items
            .iter()
            .filter(|item| category.matches(item.category))
            .flat_map(|item| item.tags.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

struct Entry<'a> {
    id: &'a str,
    name: &'a str,
    location: &'a str,
    price: f64,
    original_price: Option<f64>,
    rating: f64,
    tags: &'a [&'a str],
    amenities: &'a [&'a str],
    policy: CancellationPolicy,
}

fn build(category: Category, entry: Entry<'_>) -> ServiceItem {
    ServiceItem {
        id: entry.id.to_string(),
        category,
        name: entry.name.to_string(),
        location: entry.location.to_string(),
        price: entry.price,
        original_price: entry.original_price,
        rating: entry.rating,
        tags: entry.tags.iter().map(|t| t.to_string()).collect(),
        amenities: if entry.amenities.is_empty() {
            None
        } else {
            Some(entry.amenities.iter().map(|a| a.to_string()).collect())
        },
        cancellation_policy: entry.policy,
        room_types: None,
        image: format!("https://picsum.photos/seed/{}/600/400", entry.id),
    }
}

fn rooms(list: &[(&str, f64, u32)]) -> Option<Vec<RoomType>> {
    Some(
        list.iter()
            .map(|(name, price, max_guests)| RoomType {
                name: name.to_string(),
                price: *price,
                max_guests: *max_guests,
            })
            .collect(),
    )
}

fn flights() -> Vec<ServiceItem> {
    use CancellationPolicy::*;
    vec![
        build(Category::Flight, Entry {
            id: "f1",
            name: "VietJet Air Ha Noi - Phu Quoc",
            location: "Phu Quoc",
            price: 45.0,
            original_price: Some(90.0),
            rating: 4.1,
            tags: &["Flash Sale", "Beach"],
            amenities: &["Cabin Baggage 7kg"],
            policy: NonRefundable,
        }),
        build(Category::Flight, Entry {
            id: "f2",
            name: "Vietnam Airlines Ho Chi Minh - Ha Noi",
            location: "Ha Noi",
            price: 120.0,
            original_price: Some(140.0),
            rating: 4.7,
            tags: &["Business"],
            amenities: &["Checked Baggage 23kg", "In-flight Meal", "Free WiFi"],
            policy: Partial,
        }),
        build(Category::Flight, Entry {
            id: "f3",
            name: "Bamboo Airways Ha Noi - Da Nang",
            location: "Da Nang",
            price: 65.0,
            original_price: None,
            rating: 4.3,
            tags: &["Beach"],
            amenities: &["Checked Baggage 20kg"],
            policy: Free,
        }),
    ]
}

fn hotels() -> Vec<ServiceItem> {
    use CancellationPolicy::*;
    let mut list = vec![
        build(Category::Hotel, Entry {
            id: "h1",
            name: "Pine Hill Homestay",
            location: "Da Lat",
            price: 35.0,
            original_price: Some(50.0),
            rating: 4.6,
            tags: &["Homestay", "Mountain View"],
            amenities: &["Free WiFi", "Breakfast Included", "Garden"],
            policy: Free,
        }),
        build(Category::Hotel, Entry {
            id: "h2",
            name: "Dalat Palace Heritage Hotel",
            location: "Da Lat",
            price: 180.0,
            original_price: Some(220.0),
            rating: 4.8,
            tags: &["Luxury", "Mountain View"],
            amenities: &["Free WiFi Access", "Spa", "Restaurant", "Golf Course"],
            policy: Partial,
        }),
        build(Category::Hotel, Entry {
            id: "h3",
            name: "Hoi An Riverside Villa",
            location: "Hoi An",
            price: 75.0,
            original_price: Some(100.0),
            rating: 4.5,
            tags: &["Villa", "Old Town"],
            amenities: &["Outdoor Pool", "Free Wifi", "Bicycle Rental"],
            policy: Free,
        }),
        build(Category::Hotel, Entry {
            id: "h4",
            name: "InterContinental Danang Sun Peninsula",
            location: "Da Nang",
            price: 450.0,
            original_price: Some(600.0),
            rating: 4.9,
            tags: &["Luxury", "Beach"],
            amenities: &["Private Beach", "Infinity Pool", "Spa", "Free WiFi"],
            policy: Partial,
        }),
        build(Category::Hotel, Entry {
            id: "h5",
            name: "Old Quarter Backpackers",
            location: "Ha Noi",
            price: 12.0,
            original_price: None,
            rating: 3.9,
            tags: &["Budget", "Old Town"],
            amenities: &["Free WiFi", "Shared Kitchen"],
            policy: NonRefundable,
        }),
        build(Category::Hotel, Entry {
            id: "h6",
            name: "Sapa Cloud Eco Lodge",
            location: "Sa Pa",
            price: 48.0,
            original_price: Some(60.0),
            rating: 4.4,
            tags: &["Homestay", "Mountain View"],
            amenities: &["Breakfast Included", "Trekking Guide"],
            policy: Free,
        }),
    ];
    let room_sets: [&[(&str, f64, u32)]; 6] = [
        &[("Double", 35.0, 2), ("Family Loft", 55.0, 4)],
        &[("Deluxe", 180.0, 2), ("Suite", 320.0, 3)],
        &[("Garden Room", 75.0, 2), ("Pool Villa", 140.0, 5)],
        &[("Ocean View", 450.0, 2), ("Penthouse", 1200.0, 6)],
        &[("Dorm Bed", 12.0, 1)],
        &[("Bungalow", 48.0, 3)],
    ];
    for (hotel, set) in list.iter_mut().zip(room_sets) {
        hotel.room_types = rooms(set);
    }
    list
}

fn trains() -> Vec<ServiceItem> {
    use CancellationPolicy::*;
    vec![
        build(Category::Train, Entry {
            id: "t1",
            name: "SE1 Reunification Express Ha Noi - Da Nang",
            location: "Da Nang",
            price: 38.0,
            original_price: None,
            rating: 4.2,
            tags: &["Scenic"],
            amenities: &["Soft Sleeper", "Air Conditioning"],
            policy: Partial,
        }),
        build(Category::Train, Entry {
            id: "t2",
            name: "Lotus Sapa Train",
            location: "Sa Pa",
            price: 42.0,
            original_price: Some(50.0),
            rating: 4.0,
            tags: &["Scenic", "Overnight"],
            amenities: &["Private Cabin", "Free WiFi"],
            policy: Free,
        }),
    ]
}

fn buses() -> Vec<ServiceItem> {
    use CancellationPolicy::*;
    vec![
        build(Category::Bus, Entry {
            id: "b1",
            name: "Phuong Trang Limousine Ho Chi Minh - Da Lat",
            location: "Da Lat",
            price: 15.0,
            original_price: Some(18.0),
            rating: 4.1,
            tags: &["Overnight"],
            amenities: &["Reclining Seats", "Free Wifi"],
            policy: Free,
        }),
        build(Category::Bus, Entry {
            id: "b2",
            name: "Sao Viet Sleeper Ha Noi - Sa Pa",
            location: "Sa Pa",
            price: 18.0,
            original_price: None,
            rating: 3.8,
            tags: &["Overnight", "Budget"],
            amenities: &["Blanket", "Water Bottle"],
            policy: NonRefundable,
        }),
    ]
}

fn tours() -> Vec<ServiceItem> {
    use CancellationPolicy::*;
    vec![
        build(Category::Tour, Entry {
            id: "tr1",
            name: "Ha Long Bay Overnight Cruise",
            location: "Ha Noi",
            price: 160.0,
            original_price: Some(200.0),
            rating: 4.8,
            tags: &["Cruise", "Scenic"],
            amenities: &["Meals Included", "Kayaking"],
            policy: Partial,
        }),
        build(Category::Tour, Entry {
            id: "tr2",
            name: "Hoi An Lantern Night Food Tour",
            location: "Hoi An",
            price: 25.0,
            original_price: Some(30.0),
            rating: 4.7,
            tags: &["Food", "Old Town"],
            amenities: &["Local Guide", "Tastings Included"],
            policy: Free,
        }),
        build(Category::Tour, Entry {
            id: "tr3",
            name: "Phu Quoc Four Islands Snorkeling",
            location: "Phu Quoc",
            price: 30.0,
            original_price: Some(45.0),
            rating: 4.4,
            tags: &["Beach", "Flash Sale"],
            amenities: &["Snorkel Gear", "Lunch Included"],
            policy: Free,
        }),
    ]
}

fn cars() -> Vec<ServiceItem> {
    use CancellationPolicy::*;
    vec![
        build(Category::Car, Entry {
            id: "c1",
            name: "Toyota Innova 7 Seats with Driver",
            location: "Da Nang",
            price: 55.0,
            original_price: Some(65.0),
            rating: 4.5,
            tags: &["Family"],
            amenities: &["Driver Included", "Air Conditioning"],
            policy: Free,
        }),
        build(Category::Car, Entry {
            id: "c2",
            name: "Honda Air Blade Scooter",
            location: "Nha Trang",
            price: 8.0,
            original_price: None,
            rating: 4.2,
            tags: &["Budget"],
            amenities: &["Two Helmets"],
            policy: Partial,
        }),
    ]
}
