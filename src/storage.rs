use crate::errors::StoreError;
use crate::models::Settings;
use crate::settings;
use crate::stats;
use chrono::{DateTime, NaiveDate, SecondsFormat, TimeZone, Utc};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use std::{
    collections::HashMap,
    future::Future,
    io,
    path::{Path, PathBuf},
    sync::Mutex,
};
use tokio::fs;
use tracing::{debug, error, warn};

pub const SETTINGS_FILE: &str = "settings.json";
pub const EVENTS_FILE: &str = "smiles.json";
pub const REMINDERS_FILE: &str = "notifications.json";

/// File-system capability: whole-document reads and writes by name.
pub trait DocumentStore: Send + Sync {
    /// Returns `None` when the document does not exist yet.
    fn read(&self, name: &str) -> impl Future<Output = io::Result<Option<Vec<u8>>>> + Send;
    fn write(&self, name: &str, bytes: Vec<u8>) -> impl Future<Output = io::Result<()>> + Send;
}

/// Documents stored as files inside one directory.
#[derive(Debug, Clone)]
pub struct FsDocumentStore {
    root: PathBuf,
}

impl FsDocumentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn ensure_root(&self) -> io::Result<()> {
        fs::create_dir_all(&self.root).await
    }
}

impl DocumentStore for FsDocumentStore {
    async fn read(&self, name: &str) -> io::Result<Option<Vec<u8>>> {
        match fs::read(self.root.join(name)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn write(&self, name: &str, bytes: Vec<u8>) -> io::Result<()> {
        self.ensure_root().await?;
        fs::write(self.root.join(name), bytes).await
    }
}

/// In-process store, handy for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    documents: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentStore for MemoryDocumentStore {
    async fn read(&self, name: &str) -> io::Result<Option<Vec<u8>>> {
        let documents = self
            .documents
            .lock()
            .map_err(|_| io::Error::other("document store lock poisoned"))?;
        Ok(documents.get(name).cloned())
    }

    async fn write(&self, name: &str, bytes: Vec<u8>) -> io::Result<()> {
        let mut documents = self
            .documents
            .lock()
            .map_err(|_| io::Error::other("document store lock poisoned"))?;
        documents.insert(name.to_string(), bytes);
        Ok(())
    }
}

/// Reads and decodes a document. Missing, unreadable and malformed documents
/// all come back as `None`.
pub async fn load_json<S, T>(store: &S, name: &str) -> Option<T>
where
    S: DocumentStore,
    T: DeserializeOwned,
{
    match load_json_strict(store, name).await {
        Ok(value) => value,
        Err(err) => {
            error!("{err}");
            None
        }
    }
}

/// Like [`load_json`] but reports unreadable and malformed documents, for
/// callers about to rewrite them.
pub async fn load_json_strict<S, T>(store: &S, name: &str) -> Result<Option<T>, StoreError>
where
    S: DocumentStore,
    T: DeserializeOwned,
{
    let Some(bytes) = store.read(name).await.map_err(|source| StoreError::Read {
        name: name.to_string(),
        source,
    })?
    else {
        return Ok(None);
    };
    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|source| StoreError::Decode {
            name: name.to_string(),
            source,
        })
}

pub async fn save_json<S, T>(store: &S, name: &str, value: &T) -> Result<(), StoreError>
where
    S: DocumentStore,
    T: Serialize + ?Sized,
{
    let payload = serde_json::to_vec(value).map_err(|source| StoreError::Encode {
        name: name.to_string(),
        source,
    })?;
    store
        .write(name, payload)
        .await
        .map_err(|source| StoreError::Write {
            name: name.to_string(),
            source,
        })?;
    debug!("wrote {name}");
    Ok(())
}

/// Settings for display. An unreadable or non-object file yields the defaults.
pub async fn load_settings<S: DocumentStore>(store: &S) -> Settings {
    load_json::<_, Map<String, Value>>(store, SETTINGS_FILE)
        .await
        .map(|stored| merge_settings(&stored))
        .unwrap_or_default()
}

/// Settings about to be edited and saved back. Fails instead of falling back
/// to the defaults so a damaged file is never overwritten.
pub async fn load_settings_for_update<S: DocumentStore>(store: &S) -> Result<Settings, StoreError> {
    Ok(load_json_strict::<_, Map<String, Value>>(store, SETTINGS_FILE)
        .await?
        .map(|stored| merge_settings(&stored))
        .unwrap_or_default())
}

/// Takes every stored key that decodes over the defaults; rejected keys keep
/// their default and are logged.
pub fn merge_settings(stored: &Map<String, Value>) -> Settings {
    let mut merged = match serde_json::to_value(Settings::default()) {
        Ok(Value::Object(defaults)) => defaults,
        _ => Map::new(),
    };
    for (key, value) in stored {
        let mut candidate = merged.clone();
        candidate.insert(key.clone(), value.clone());
        match serde_json::from_value::<Settings>(Value::Object(candidate)) {
            Ok(_) => {
                merged.insert(key.clone(), value.clone());
            }
            Err(err) => warn!("ignoring settings key {key:?}: {err}"),
        }
    }
    let mut settings: Settings = serde_json::from_value(Value::Object(merged)).unwrap_or_default();
    settings::normalize(&mut settings);
    settings
}

pub async fn save_settings<S: DocumentStore>(store: &S, settings: &Settings) -> Result<(), StoreError> {
    save_json(store, SETTINGS_FILE, settings).await
}

/// Append-only smile log kept as one JSON array of ISO-8601 strings.
pub struct EventStore<'a, S> {
    store: &'a S,
}

impl<'a, S: DocumentStore> EventStore<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Parsed timestamps. Entries that do not parse are skipped here but stay
    /// on disk.
    pub async fn load(&self) -> Vec<DateTime<Utc>> {
        let raw: Vec<String> = load_json(self.store, EVENTS_FILE).await.unwrap_or_default();
        raw.iter()
            .filter_map(|value| match DateTime::parse_from_rfc3339(value) {
                Ok(at) => Some(at.with_timezone(&Utc)),
                Err(err) => {
                    warn!("skipping malformed timestamp {value:?}: {err}");
                    None
                }
            })
            .collect()
    }

    /// Appends to the raw log as stored. Refuses to write when the existing
    /// log cannot be read or decoded.
    pub async fn append(&self, at: DateTime<Utc>) -> Result<usize, StoreError> {
        let mut raw: Vec<String> = load_json_strict(self.store, EVENTS_FILE)
            .await?
            .unwrap_or_default();
        raw.push(at.to_rfc3339_opts(SecondsFormat::Millis, true));
        save_json(self.store, EVENTS_FILE, &raw).await?;
        Ok(raw.len())
    }

    pub async fn count_on_date<Tz: TimeZone>(&self, day: NaiveDate, tz: &Tz) -> usize {
        stats::count_on_date(&self.load().await, day, tz)
    }
}
