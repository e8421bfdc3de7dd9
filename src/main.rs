// Demo driver: boots the hub against the on-disk store and runs one search
//
//   cargo run -- "homestay in Da Lat under 50"
//
// Smart search is used when GEMINI_API_KEY is set; otherwise the query only
// lands in the history and the full catalog is listed.

use std::time::Duration;
use travel_hub::notifications::{default_pushes, Countdown, CountdownTimer, PushSimulator};
use travel_hub::{
    AppConfig, Catalog, FileStore, GeminiClient, MemoryStore, NoSmartSearch, Store, TravelHub,
};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let cfg = AppConfig::from_env()?;
    let query = std::env::args().skip(1).collect::<Vec<_>>().join(" ");

    match FileStore::open(&cfg.store_dir).await {
        Ok(store) => run(cfg, store, &query).await,
        Err(e) => {
            error!("Store at {} unavailable, using memory: {}", cfg.store_dir.display(), e);
            run(cfg, MemoryStore::new(), &query).await
        }
    }
}

async fn run<S: Store>(cfg: AppConfig, store: S, query: &str) -> anyhow::Result<()> {
    let catalog = Catalog::builtin();
    if cfg.gemini.api_key.is_some() {
        let parser = GeminiClient::new(cfg.gemini.clone())?;
        let insight = GeminiClient::new(cfg.gemini.clone())?;
        show(TravelHub::new(cfg, catalog, store, parser, insight), query).await;
    } else {
        show(TravelHub::new(cfg, catalog, store, NoSmartSearch, NoSmartSearch), query).await;
    }
    Ok(())
}

async fn show<S, P, I>(mut hub: TravelHub<S, P, I>, query: &str)
where
    S: Store,
    P: travel_hub::SearchParser,
    I: travel_hub::InsightProvider,
{
    hub.boot().await;

    let pushes = if hub.config().simulate_pushes {
        default_pushes()
    } else {
        Vec::new()
    };
    let (_pushes, mut inbox) = PushSimulator::start(pushes);
    let (_countdown, remaining) =
        CountdownTimer::start(Countdown::FLASH_SALE, Duration::from_secs(1));

    hub.search(query).await;

    println!("Flash sale ends in {}", *remaining.borrow());
    if let Some(insight) = &hub.view().insight {
        println!("Insight: {}", insight);
    }
    println!(
        "Showing {} of {} items",
        hub.visible_items().len(),
        hub.filtered_count()
    );
    for item in hub.visible_items() {
        println!(
            "  [{}] {} - {} - ${:.2} ({:.1}★)",
            item.category, item.name, item.location, item.price, item.rating
        );
    }

    // Drain anything delivered while we were searching; pending timers die with the simulator
    while let Ok(push) = inbox.try_recv() {
        hub.receive_push(push);
    }
    for toast in hub.toasts.pending() {
        println!("! {}", toast.message);
    }
    info!("{} unread notifications", hub.notifications.unread_count());
}
