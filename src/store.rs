// Local persistence for settings, profile, favorites and bookings
//
// Four logical tables keyed by a stable identifier. Reads return `None` (or an
// empty list) when nothing has been saved yet; every save is an upsert.

use crate::model::{Booking, ServiceItem, Settings, UserProfile, SETTINGS_KEY};
use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error in {table}: {source}")]
    SerializationError {
        table: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

#[async_trait]
pub trait Store: Send + Sync {
    async fn get_settings(&self) -> Result<Option<Settings>, StoreError>;
    async fn save_settings(&self, settings: &Settings) -> Result<(), StoreError>;

    async fn get_user(&self, id: &str) -> Result<Option<UserProfile>, StoreError>;
    async fn save_user(&self, user: &UserProfile) -> Result<(), StoreError>;

    async fn get_favorites(&self) -> Result<Vec<ServiceItem>, StoreError>;
    async fn save_favorite(&self, item: &ServiceItem) -> Result<(), StoreError>;
    async fn remove_favorite(&self, id: &str) -> Result<bool, StoreError>;
    async fn is_favorite(&self, id: &str) -> Result<bool, StoreError>;

    // Newest first
    async fn get_bookings(&self) -> Result<Vec<Booking>, StoreError>;
    async fn save_booking(&self, booking: &Booking) -> Result<(), StoreError>;
}

// Flips the favorite state of `item` and returns the new state
pub async fn toggle_favorite<S: Store + ?Sized>(
    store: &S,
    item: &ServiceItem,
) -> Result<bool, StoreError> {
    if store.is_favorite(&item.id).await? {
        store.remove_favorite(&item.id).await?;
        Ok(false)
    } else {
        store.save_favorite(item).await?;
        Ok(true)
    }
}

fn newest_first(mut bookings: Vec<Booking>) -> Vec<Booking> {
    bookings.sort_by(|a, b| b.date.cmp(&a.date));
    bookings
}

// In-process store; contents live as long as the value
#[derive(Debug, Default)]
pub struct MemoryStore {
    settings: DashMap<String, Settings>,
    users: DashMap<String, UserProfile>,
    favorites: DashMap<String, ServiceItem>,
    bookings: DashMap<String, Booking>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get_settings(&self) -> Result<Option<Settings>, StoreError> {
        Ok(self.settings.get(SETTINGS_KEY).map(|s| s.clone()))
    }

    async fn save_settings(&self, settings: &Settings) -> Result<(), StoreError> {
        self.settings
            .insert(SETTINGS_KEY.to_string(), settings.clone());
        Ok(())
    }

    async fn get_user(&self, id: &str) -> Result<Option<UserProfile>, StoreError> {
        Ok(self.users.get(id).map(|u| u.clone()))
    }

    async fn save_user(&self, user: &UserProfile) -> Result<(), StoreError> {
        self.users.insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn get_favorites(&self) -> Result<Vec<ServiceItem>, StoreError> {
        let mut items: Vec<ServiceItem> =
            self.favorites.iter().map(|e| e.value().clone()).collect();
        items.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(items)
    }

    async fn save_favorite(&self, item: &ServiceItem) -> Result<(), StoreError> {
        self.favorites.insert(item.id.clone(), item.clone());
        Ok(())
    }

    async fn remove_favorite(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.favorites.remove(id).is_some())
    }

    async fn is_favorite(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.favorites.contains_key(id))
    }

    async fn get_bookings(&self) -> Result<Vec<Booking>, StoreError> {
        let bookings = self.bookings.iter().map(|e| e.value().clone()).collect();
        Ok(newest_first(bookings))
    }

    async fn save_booking(&self, booking: &Booking) -> Result<(), StoreError> {
        self.bookings.insert(booking.id.clone(), booking.clone());
        Ok(())
    }
}

const SETTINGS_TABLE: &str = "settings";
const USERS_TABLE: &str = "users";
const FAVORITES_TABLE: &str = "favorites";
const BOOKINGS_TABLE: &str = "bookings";

#[derive(Debug, Default)]
struct Tables {
    settings: BTreeMap<String, Settings>,
    users: BTreeMap<String, UserProfile>,
    favorites: BTreeMap<String, ServiceItem>,
    bookings: BTreeMap<String, Booking>,
}

// JSON-file store: one document per table under a directory.
//
// Tables are loaded once by `FileStore::open` and kept in memory; each save
// rewrites the affected table on disk so the data survives restarts.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
    tables: RwLock<Tables>,
    // Held across snapshot, write and rename so flushes land in save order
    flush_lock: Mutex<()>,
}

impl FileStore {
    pub async fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&dir).await?;

        let tables = Tables {
            settings: read_table(&dir, SETTINGS_TABLE).await?,
            users: read_table(&dir, USERS_TABLE).await?,
            favorites: read_table(&dir, FAVORITES_TABLE).await?,
            bookings: read_table(&dir, BOOKINGS_TABLE).await?,
        };
        info!(
            "Opened store at {} ({} users, {} favorites, {} bookings)",
            dir.display(),
            tables.users.len(),
            tables.favorites.len(),
            tables.bookings.len()
        );

        Ok(Self {
            dir,
            tables: RwLock::new(tables),
            flush_lock: Mutex::new(()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    async fn flush<T: Serialize>(
        &self,
        table: &'static str,
        select: impl FnOnce(&Tables) -> &BTreeMap<String, T>,
    ) -> Result<(), StoreError> {
        let _guard = self.flush_lock.lock().await;
        // Snapshot taken after acquiring the flush lock, so it is never older
        // than one already on disk
        let body = {
            let tables = self.tables.read();
            serde_json::to_vec_pretty(select(&tables))
                .map_err(|source| StoreError::SerializationError { table, source })?
        };
        let path = table_path(&self.dir, table);
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, body).await?;
        tokio::fs::rename(&tmp, &path).await?;
        debug!("Flushed {} to {}", table, path.display());
        Ok(())
    }
}

fn table_path(dir: &Path, table: &str) -> PathBuf {
    dir.join(format!("{}.json", table))
}

// A table that fails to decode starts empty; the unreadable file is moved
// aside as `<table>.json.corrupt` so the next flush does not destroy it
async fn read_table<T: DeserializeOwned>(
    dir: &Path,
    table: &'static str,
) -> Result<BTreeMap<String, T>, StoreError> {
    let path = table_path(dir, table);
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
        Err(e) => return Err(StoreError::IoError(e)),
    };

    match serde_json::from_slice(&bytes) {
        Ok(rows) => Ok(rows),
        Err(source) => {
            let err = StoreError::SerializationError { table, source };
            warn!("Starting {} empty: {}", table, err);
            let aside = path.with_extension("json.corrupt");
            if let Err(e) = tokio::fs::rename(&path, &aside).await {
                warn!("Could not move {} aside: {}", path.display(), e);
            }
            Ok(BTreeMap::new())
        }
    }
}

#[async_trait]
impl Store for FileStore {
    async fn get_settings(&self) -> Result<Option<Settings>, StoreError> {
        Ok(self.tables.read().settings.get(SETTINGS_KEY).cloned())
    }

    async fn save_settings(&self, settings: &Settings) -> Result<(), StoreError> {
        self.tables
            .write()
            .settings
            .insert(SETTINGS_KEY.to_string(), settings.clone());
        self.flush(SETTINGS_TABLE, |t| &t.settings).await
    }

    async fn get_user(&self, id: &str) -> Result<Option<UserProfile>, StoreError> {
        Ok(self.tables.read().users.get(id).cloned())
    }

    async fn save_user(&self, user: &UserProfile) -> Result<(), StoreError> {
        self.tables
            .write()
            .users
            .insert(user.id.clone(), user.clone());
        self.flush(USERS_TABLE, |t| &t.users).await
    }

    async fn get_favorites(&self) -> Result<Vec<ServiceItem>, StoreError> {
        Ok(self.tables.read().favorites.values().cloned().collect())
    }

    async fn save_favorite(&self, item: &ServiceItem) -> Result<(), StoreError> {
        self.tables
            .write()
            .favorites
            .insert(item.id.clone(), item.clone());
        self.flush(FAVORITES_TABLE, |t| &t.favorites).await
    }

    async fn remove_favorite(&self, id: &str) -> Result<bool, StoreError> {
        let removed = self.tables.write().favorites.remove(id).is_some();
        if removed {
            self.flush(FAVORITES_TABLE, |t| &t.favorites).await?;
        }
        Ok(removed)
    }

    async fn is_favorite(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.tables.read().favorites.contains_key(id))
    }

    async fn get_bookings(&self) -> Result<Vec<Booking>, StoreError> {
        let bookings = self.tables.read().bookings.values().cloned().collect();
        Ok(newest_first(bookings))
    }

    async fn save_booking(&self, booking: &Booking) -> Result<(), StoreError> {
        self.tables
            .write()
            .bookings
            .insert(booking.id.clone(), booking.clone());
        self.flush(BOOKINGS_TABLE, |t| &t.bookings).await
    }
}
