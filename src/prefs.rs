use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DAY: u64 = 24 * 60 * 60;

/// Default lifetime for persisted preferences.
pub const DEFAULT_TTL: Duration = Duration::from_secs(365 * DAY);

/// A named preference with its expiry policy and fallback value.
///
/// Reading an absent, expired or malformed preference always yields the
/// default; the store never surfaces a parse problem to the caller.
pub struct PrefKey {
    pub name: &'static str,
    pub ttl: Option<Duration>,
    pub default: &'static str,
}

pub const LANGUAGE: PrefKey = PrefKey {
    name: "language",
    ttl: Some(DEFAULT_TTL),
    default: "en",
};

pub const DARK_MODE: PrefKey = PrefKey {
    name: "dark_mode",
    ttl: Some(DEFAULT_TTL),
    default: "true",
};

pub const ACCENT_COLOR: PrefKey = PrefKey {
    name: "accent_color",
    ttl: Some(DEFAULT_TTL),
    default: "#3b82f6",
};

pub const CITY: PrefKey = PrefKey {
    name: "city",
    ttl: Some(DEFAULT_TTL),
    default: "Siegen",
};

pub const TICKER_CURRENCY: PrefKey = PrefKey {
    name: "ticker_currency",
    ttl: Some(DEFAULT_TTL),
    default: "EUR",
};

pub const TICKER_SYMBOLS: PrefKey = PrefKey {
    name: "ticker_symbols",
    ttl: Some(DEFAULT_TTL),
    default: r#"["BTC","ETH","SOL"]"#,
};

/// The countdown target is short-lived on purpose; a month-old end time
/// is stale anyway.
pub const WORK_END_TIME: PrefKey = PrefKey {
    name: "work_end_time",
    ttl: Some(Duration::from_secs(30 * DAY)),
    default: "",
};

/// Layout geometry never expires.
pub const DASHBOARD_LAYOUT: PrefKey = PrefKey {
    name: "dashboard_layout_v1",
    ttl: None,
    default: "",
};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PrefEntry {
    value: String,
    #[serde(default)]
    expires_at: Option<i64>,
}

impl PrefEntry {
    fn expired(&self, now: i64) -> bool {
        self.expires_at.map(|at| at <= now).unwrap_or(false)
    }
}

/// Flat key/value store persisted as a single JSON file, the desktop
/// equivalent of the browser cookie jar. Writes go through to disk
/// immediately; there is no change notification in this layer.
pub struct PrefStore {
    path: PathBuf,
    entries: HashMap<String, PrefEntry>,
}

impl PrefStore {
    /// Load the store from `path`. A missing or unreadable file yields an
    /// empty store; entries that already expired are dropped up front.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let content = std::fs::read_to_string(&path).unwrap_or_default();
        let mut entries: HashMap<String, PrefEntry> = if content.trim().is_empty() {
            HashMap::new()
        } else {
            match serde_json::from_str(&content) {
                Ok(entries) => entries,
                Err(err) => {
                    tracing::warn!("preference file {} is malformed: {err}", path.display());
                    HashMap::new()
                }
            }
        };
        let now = Utc::now().timestamp();
        entries.retain(|_, entry| !entry.expired(now));
        Self { path, entries }
    }

    /// Read a preference, falling back to its documented default.
    pub fn get(&self, key: &PrefKey) -> String {
        self.raw(key.name)
            .map(str::to_string)
            .unwrap_or_else(|| key.default.to_string())
    }

    /// Read a JSON-valued preference. A malformed stored value falls back to
    /// the key default, then to `T::default()`.
    pub fn get_json<T: DeserializeOwned + Default>(&self, key: &PrefKey) -> T {
        if let Some(raw) = self.raw(key.name) {
            match serde_json::from_str(raw) {
                Ok(value) => return value,
                Err(err) => {
                    tracing::warn!("preference '{}' is malformed: {err}", key.name);
                }
            }
        }
        serde_json::from_str(key.default).unwrap_or_default()
    }

    /// Store a preference and write the file through immediately.
    pub fn set(&mut self, key: &PrefKey, value: impl Into<String>) {
        let expires_at = key
            .ttl
            .map(|ttl| Utc::now().timestamp() + ttl.as_secs() as i64);
        self.entries.insert(
            key.name.to_string(),
            PrefEntry {
                value: value.into(),
                expires_at,
            },
        );
        self.save();
    }

    pub fn set_json<T: Serialize>(&mut self, key: &PrefKey, value: &T) {
        match serde_json::to_string(value) {
            Ok(json) => self.set(key, json),
            Err(err) => tracing::warn!("failed to encode preference '{}': {err}", key.name),
        }
    }

    pub fn remove(&mut self, key: &PrefKey) {
        if self.entries.remove(key.name).is_some() {
            self.save();
        }
    }

    /// Raw expiry-checked lookup by name. Empty strings count as unset so a
    /// key with an empty default reads as absent.
    pub fn raw(&self, name: &str) -> Option<&str> {
        let now = Utc::now().timestamp();
        self.entries
            .get(name)
            .filter(|entry| !entry.expired(now) && !entry.value.is_empty())
            .map(|entry| entry.value.as_str())
    }

    fn save(&self) {
        let json = match serde_json::to_string_pretty(&self.entries) {
            Ok(json) => json,
            Err(err) => {
                tracing::warn!("failed to encode preferences: {err}");
                return;
            }
        };
        if let Err(err) = std::fs::write(&self.path, json) {
            tracing::warn!(
                "failed to write preferences to {}: {err}",
                self.path.display()
            );
        }
    }
}
