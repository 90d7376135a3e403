use crate::dashboard::widgets::WidgetRegistry;
use crate::prefs::{self, PrefStore};
use serde::{Deserialize, Serialize};

fn default_version() -> u32 {
    1
}

fn default_rows() -> u8 {
    2
}

fn default_cols() -> u8 {
    3
}

fn default_span() -> u8 {
    1
}

/// Grid definition for the dashboard layout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GridConfig {
    #[serde(default = "default_rows")]
    pub rows: u8,
    #[serde(default = "default_cols")]
    pub cols: u8,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: default_rows(),
            cols: default_cols(),
        }
    }
}

/// Widget slot configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SlotConfig {
    #[serde(default)]
    pub widget: String,
    pub row: i32,
    pub col: i32,
    #[serde(default = "default_span")]
    pub row_span: u8,
    #[serde(default = "default_span")]
    pub col_span: u8,
    #[serde(default)]
    pub settings: serde_json::Value,
}

impl SlotConfig {
    pub fn with_widget(widget: &str, row: i32, col: i32) -> Self {
        Self {
            widget: widget.to_string(),
            row,
            col,
            row_span: default_span(),
            col_span: default_span(),
            settings: serde_json::Value::Object(Default::default()),
        }
    }

    pub fn spanning(widget: &str, row: i32, col: i32, row_span: u8, col_span: u8) -> Self {
        Self {
            row_span,
            col_span,
            ..Self::with_widget(widget, row, col)
        }
    }
}

/// Primary dashboard configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardConfig {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub slots: Vec<SlotConfig>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            grid: GridConfig::default(),
            slots: vec![
                SlotConfig::spanning("news", 0, 0, 2, 1),
                SlotConfig::with_widget("markets", 0, 1),
                SlotConfig::with_widget("weather", 0, 2),
                SlotConfig::with_widget("work_timer", 1, 1),
                SlotConfig::with_widget("calculator", 1, 2),
            ],
        }
    }
}

impl DashboardConfig {
    /// Load the layout from the preference store. A missing or malformed
    /// entry yields the default layout; unknown widget types are filtered
    /// out using the provided registry.
    pub fn load(store: &PrefStore, registry: &WidgetRegistry) -> Self {
        let mut cfg = match store.raw(prefs::DASHBOARD_LAYOUT.name) {
            Some(raw) => match serde_json::from_str::<DashboardConfig>(raw) {
                Ok(cfg) => cfg,
                Err(err) => {
                    tracing::warn!("stored dashboard layout is malformed: {err}");
                    Self::default()
                }
            },
            None => Self::default(),
        };
        for warning in cfg.sanitize(registry) {
            tracing::warn!("{warning}");
        }
        cfg
    }

    /// Persist the layout through the preference store.
    pub fn save(&self, store: &mut PrefStore) {
        store.set_json(&prefs::DASHBOARD_LAYOUT, self);
    }

    /// Write the layout back on first run, so the persisted entry exists and
    /// can be hand-edited. An entry that is already present is left alone.
    pub fn ensure_persisted(&self, store: &mut PrefStore) {
        if store.raw(prefs::DASHBOARD_LAYOUT.name).is_none() {
            self.save(store);
        }
    }

    /// Remove unsupported widgets and normalize empty settings.
    pub fn sanitize(&mut self, registry: &WidgetRegistry) -> Vec<String> {
        let mut warnings = Vec::new();
        self.slots.retain(|slot| {
            if registry.contains(&slot.widget) {
                true
            } else {
                warnings.push(format!("dropping unknown widget '{}'", slot.widget));
                false
            }
        });
        for slot in &mut self.slots {
            if slot.settings.is_null() {
                slot.settings = serde_json::Value::Object(Default::default());
            }
        }
        warnings
    }
}
