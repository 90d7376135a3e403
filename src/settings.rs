use crate::i18n::Language;
use crate::prefs::{self, PrefStore};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

/// Global display settings shared by every widget.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub dark_mode: bool,
    pub language: Language,
    pub accent_color: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dark_mode: true,
            language: Language::En,
            accent_color: prefs::ACCENT_COLOR.default.to_string(),
        }
    }
}

impl Settings {
    pub fn from_prefs(store: &PrefStore) -> Self {
        Self {
            dark_mode: store.get(&prefs::DARK_MODE) == "true",
            language: Language::from_code(&store.get(&prefs::LANGUAGE)),
            accent_color: store.get(&prefs::ACCENT_COLOR),
        }
    }

    pub fn persist(&self, store: &mut PrefStore) {
        store.set(&prefs::DARK_MODE, if self.dark_mode { "true" } else { "false" });
        store.set(&prefs::LANGUAGE, self.language.code());
        store.set(&prefs::ACCENT_COLOR, self.accent_color.clone());
    }
}

/// Shared handle to the settings, passed to widgets instead of a global.
/// Every update bumps a version counter so watchers can cheaply detect
/// changes between frames.
#[derive(Clone)]
pub struct SettingsHandle {
    inner: Arc<RwLock<Settings>>,
    version: Arc<AtomicU64>,
}

impl SettingsHandle {
    pub fn new(settings: Settings) -> Self {
        Self {
            inner: Arc::new(RwLock::new(settings)),
            version: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn current(&self) -> Settings {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn update(&self, f: impl FnOnce(&mut Settings)) {
        {
            let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
            f(&mut guard);
        }
        self.version.fetch_add(1, Ordering::SeqCst);
    }

    pub fn version(&self) -> u64 {
        self.version.load(Ordering::SeqCst)
    }

    pub fn watch(&self) -> SettingsWatcher {
        SettingsWatcher {
            last_seen: self.version(),
        }
    }
}

/// Tracks the settings version a widget last reacted to.
pub struct SettingsWatcher {
    last_seen: u64,
}

impl SettingsWatcher {
    /// True exactly once per settings change.
    pub fn changed(&mut self, handle: &SettingsHandle) -> bool {
        let version = handle.version();
        if version != self.last_seen {
            self.last_seen = version;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn watcher_fires_once_per_update() {
        let handle = SettingsHandle::new(Settings::default());
        let mut watcher = handle.watch();
        assert!(!watcher.changed(&handle));

        handle.update(|s| s.dark_mode = false);
        assert!(watcher.changed(&handle));
        assert!(!watcher.changed(&handle));
        assert!(!handle.current().dark_mode);
    }

    #[test]
    fn prefs_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        let mut store = PrefStore::load(&path);

        let settings = Settings {
            dark_mode: false,
            language: Language::De,
            accent_color: "#ff0000".into(),
        };
        settings.persist(&mut store);

        let reloaded = Settings::from_prefs(&PrefStore::load(&path));
        assert_eq!(reloaded, settings);
    }

    #[test]
    fn defaults_when_store_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = PrefStore::load(dir.path().join("prefs.json"));
        let settings = Settings::from_prefs(&store);
        assert_eq!(settings, Settings::default());
    }
}
