use crate::i18n::Language;
use crate::prefs::PrefStore;
use crate::settings::SettingsHandle;
use eframe::egui;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Mutex;

mod calculator;
mod countdown;
mod markets;
mod news;
mod weather;

pub use calculator::CalculatorWidget;
pub use countdown::CountdownWidget;
pub use markets::MarketsWidget;
pub use news::NewsWidget;
pub use weather::WeatherWidget;

/// Context available to widgets while rendering a frame.
pub struct DashboardContext<'a> {
    pub prefs: &'a Mutex<PrefStore>,
    pub settings: &'a SettingsHandle,
    pub accent: egui::Color32,
    pub language: Language,
}

/// Widget trait implemented by all dashboard widgets.
pub trait Widget: Send {
    fn render(&mut self, ui: &mut egui::Ui, ctx: &DashboardContext<'_>);

    /// Cancel background work. Called when the widget leaves the layout or
    /// the application shuts down.
    fn stop(&mut self) {}
}

/// Descriptor for building widgets from JSON settings.
#[derive(Clone)]
pub struct WidgetDescriptor {
    ctor: std::sync::Arc<dyn Fn(&Value) -> Box<dyn Widget> + Send + Sync>,
    default_settings: std::sync::Arc<dyn Fn() -> Value + Send + Sync>,
}

impl WidgetDescriptor {
    pub fn new<T, C>(build: fn(C) -> T) -> Self
    where
        T: Widget + 'static,
        C: DeserializeOwned + Serialize + Default + 'static,
    {
        Self {
            ctor: std::sync::Arc::new(move |v| {
                let cfg = serde_json::from_value::<C>(v.clone()).unwrap_or_default();
                Box::new(build(cfg))
            }),
            default_settings: std::sync::Arc::new(|| {
                serde_json::to_value(C::default()).unwrap_or_else(|_| json!({}))
            }),
        }
    }

    pub fn default_settings(&self) -> Value {
        (self.default_settings)()
    }

    pub fn create(&self, settings: &Value) -> Box<dyn Widget> {
        (self.ctor)(settings)
    }
}

#[derive(Clone, Default)]
pub struct WidgetRegistry {
    map: HashMap<String, WidgetDescriptor>,
}

impl WidgetRegistry {
    pub fn with_defaults() -> Self {
        let mut reg = Self::default();
        reg.register("news", WidgetDescriptor::new(NewsWidget::new));
        reg.register("markets", WidgetDescriptor::new(MarketsWidget::new));
        reg.register("weather", WidgetDescriptor::new(WeatherWidget::new));
        reg.register("work_timer", WidgetDescriptor::new(CountdownWidget::new));
        reg.register("calculator", WidgetDescriptor::new(CalculatorWidget::new));
        reg
    }

    pub fn register(&mut self, name: &str, descriptor: WidgetDescriptor) {
        self.map.insert(name.to_string(), descriptor);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&WidgetDescriptor> {
        self.map.get(name)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.map.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Parse a `#rrggbb` color string. Anything else yields `None`.
pub fn parse_hex_color(value: &str) -> Option<egui::Color32> {
    let hex = value.trim().strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(egui::Color32::from_rgb(r, g, b))
}

pub fn format_hex_color(color: egui::Color32) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r(), color.g(), color.b())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_knows_all_builtin_widgets() {
        let reg = WidgetRegistry::with_defaults();
        for name in ["news", "markets", "weather", "work_timer", "calculator"] {
            assert!(reg.contains(name), "missing widget '{name}'");
        }
        assert!(!reg.contains("bogus"));
    }

    #[test]
    fn hex_color_round_trip() {
        let color = parse_hex_color("#3b82f6").unwrap();
        assert_eq!(format_hex_color(color), "#3b82f6");
        assert!(parse_hex_color("3b82f6").is_none());
        assert!(parse_hex_color("#xyzxyz").is_none());
        assert!(parse_hex_color("#fff").is_none());
    }
}
