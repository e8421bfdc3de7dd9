// App marketplace storefront: catalog browsing, plans, mocked checkout and
// affiliate reporting

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AppCategory {
    Content,
    Automation,
    Design,
    Productivity,
    #[serde(rename = "Image Generation")]
    ImageGeneration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppCategoryFilter {
    #[default]
    All,
    Only(AppCategory),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameOrder {
    #[default]
    None,
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppInfo {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub price: String,
    pub embed_url: String,
    pub category: AppCategory,
    #[serde(default)]
    pub is_unlocked: bool,
}

// Category + free-text narrowing of the app grid, optionally ordered by name
pub fn filter_apps(
    apps: &[AppInfo],
    category: AppCategoryFilter,
    query: &str,
    order: NameOrder,
) -> Vec<AppInfo> {
    let query = query.to_lowercase();
    let mut results: Vec<AppInfo> = apps
        .iter()
        .filter(|app| match category {
            AppCategoryFilter::All => true,
            AppCategoryFilter::Only(c) => app.category == c,
        })
        .filter(|app| {
            app.name.to_lowercase().contains(&query)
                || app.description.to_lowercase().contains(&query)
        })
        .cloned()
        .collect();

    match order {
        NameOrder::Asc => results.sort_by_key(|app| app.name.to_lowercase()),
        NameOrder::Desc => {
            results.sort_by(|a, b| b.name.to_lowercase().cmp(&a.name.to_lowercase()))
        }
        NameOrder::None => {}
    }
    results
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub name: String,
    pub price: String,
    pub unit: String,
    pub cta: String,
    pub recommended: bool,
    pub features: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PurchaseItem {
    Plan(Plan),
    App(AppInfo),
}

impl PurchaseItem {
    pub fn name(&self) -> &str {
        match self {
            PurchaseItem::Plan(plan) => &plan.name,
            PurchaseItem::App(app) => &app.name,
        }
    }

    pub fn price_label(&self) -> String {
        match self {
            PurchaseItem::Plan(plan) => format!("{} {}", plan.price, plan.unit),
            PurchaseItem::App(app) => app.price.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    BankTransfer,
    Momo,
    Paypal,
    CreditCard,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: String,
    pub item_name: String,
    pub price_label: String,
    pub method: PaymentMethod,
    pub affiliate_code: Option<String>,
    pub paid_at: DateTime<Utc>,
}

// Mocked checkout: waits `processing` and always confirms. Nothing is charged
// and the affiliate code is recorded as typed.
pub async fn simulate_payment(
    item: &PurchaseItem,
    method: PaymentMethod,
    affiliate_code: Option<&str>,
    processing: Duration,
) -> Order {
    let affiliate_code = affiliate_code
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(str::to_string);

    tokio::time::sleep(processing).await;

    let paid_at = Utc::now();
    let order = Order {
        id: format!("DMP{}", paid_at.timestamp_millis()),
        item_name: item.name().to_string(),
        price_label: item.price_label(),
        method,
        affiliate_code,
        paid_at,
    };
    info!("Simulated {:?} payment for {} ({})", method, order.item_name, order.id);
    order
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffiliateSale {
    pub id: u64,
    pub date: String,
    pub product: String,
    pub commission: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AffiliateSummary {
    pub sales: usize,
    pub total_commission: f64,
}

impl AffiliateSummary {
    // Labels that carry no number are counted as sales but add no commission
    pub fn from_sales(sales: &[AffiliateSale]) -> Self {
        Self {
            sales: sales.len(),
            total_commission: sales
                .iter()
                .filter_map(|s| parse_amount(&s.commission))
                .sum(),
        }
    }
}

// First number in a price label. Dong amounts ("1.194.000 VND", "199,000đ")
// use both '.' and ',' as thousands separators; other labels use ',' only.
// A '$' marks where the amount starts.
fn parse_amount(label: &str) -> Option<f64> {
    let lower = label.to_lowercase();
    let dong = lower.contains("vnd") || lower.contains('đ');
    let from = label.find('$').map_or(0, |i| i + 1);

    let run: String = label[from..]
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .filter(|c| *c != ',' && !(dong && *c == '.'))
        .collect();
    run.trim_end_matches('.').parse().ok()
}
