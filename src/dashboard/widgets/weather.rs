use crate::dashboard::widgets::{DashboardContext, Widget};
use crate::fetch::{FetchStatus, Poller};
use crate::i18n::tr;
use crate::prefs;
use crate::providers::http_client;
use crate::providers::weather::{fetch_city_weather, weather_description, WeatherSnapshot};
use eframe::egui;
use serde::{Deserialize, Serialize};
use std::sync::PoisonError;
use std::time::Duration;

fn default_refresh_minutes() -> u64 {
    15
}

fn default_forecast_days() -> u8 {
    7
}

const FORECAST_CHOICES: &[u8] = &[7, 16];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherWidgetConfig {
    #[serde(default = "default_refresh_minutes")]
    pub refresh_minutes: u64,
    #[serde(default = "default_forecast_days")]
    pub forecast_days: u8,
}

impl Default for WeatherWidgetConfig {
    fn default() -> Self {
        Self {
            refresh_minutes: default_refresh_minutes(),
            forecast_days: default_forecast_days(),
        }
    }
}

/// Current conditions plus a short daily forecast for one city. The city is
/// persisted only after a successful fetch, so a typo never clobbers the
/// last working choice.
pub struct WeatherWidget {
    poller: Poller<WeatherSnapshot>,
    city_input: String,
    active_city: Option<String>,
    last_saved_city: Option<String>,
    days: u8,
}

impl WeatherWidget {
    pub fn new(config: WeatherWidgetConfig) -> Self {
        let interval = Duration::from_secs(config.refresh_minutes.max(1) * 60);
        Self {
            poller: Poller::new(Some(interval)),
            city_input: String::new(),
            active_city: None,
            last_saved_city: None,
            days: config.forecast_days.clamp(1, 16),
        }
    }

    fn load_persisted(&mut self, ctx: &DashboardContext<'_>) {
        if self.active_city.is_some() {
            return;
        }
        let store = ctx.prefs.lock().unwrap_or_else(PoisonError::into_inner);
        let city = store.get(&prefs::CITY);
        self.last_saved_city = Some(city.clone());
        self.active_city = Some(city);
    }

    fn start_fetch(&mut self, immediate: bool) {
        let Some(city) = self.active_city.clone() else {
            return;
        };
        let days = self.days;
        let fetch = move || {
            let client = http_client()?;
            fetch_city_weather(&client, &city, days)
        };
        if immediate {
            self.poller.refresh_now(fetch);
        } else {
            self.poller.maybe_poll(fetch);
        }
    }

    fn search(&mut self) {
        let city = self.city_input.trim().to_string();
        if city.is_empty() {
            return;
        }
        self.city_input.clear();
        self.active_city = Some(city);
        self.start_fetch(true);
    }

    /// Switch the forecast range and re-fetch right away.
    fn set_days(&mut self, days: u8) {
        if self.days == days {
            return;
        }
        self.days = days.clamp(1, 16);
        self.start_fetch(true);
    }

    /// Write the resolved city through once a fetch for it succeeded.
    fn persist_on_success(&mut self, ctx: &DashboardContext<'_>, snapshot: &WeatherSnapshot) {
        if self.last_saved_city.as_deref() == Some(snapshot.city.as_str()) {
            return;
        }
        let mut store = ctx.prefs.lock().unwrap_or_else(PoisonError::into_inner);
        store.set(&prefs::CITY, snapshot.city.clone());
        self.last_saved_city = Some(snapshot.city.clone());
        self.active_city = Some(snapshot.city.clone());
    }
}

impl Widget for WeatherWidget {
    fn render(&mut self, ui: &mut egui::Ui, ctx: &DashboardContext<'_>) {
        self.load_persisted(ctx);
        self.start_fetch(false);
        let language = ctx.language;

        ui.horizontal(|ui| {
            ui.strong(tr(language, "weather"));
            let field = ui.add(
                egui::TextEdit::singleline(&mut self.city_input)
                    .hint_text(tr(language, "search_city"))
                    .desired_width(120.0),
            );
            let submitted = field.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if ui.small_button("🔍").clicked() || submitted {
                self.search();
            }
            for days in FORECAST_CHOICES {
                if ui
                    .selectable_label(self.days == *days, format!("{days}d"))
                    .clicked()
                {
                    self.set_days(*days);
                }
            }
            if self.poller.in_flight() {
                ui.spinner();
            }
        });
        ui.separator();

        let (snapshot, error) = {
            let state = self.poller.state();
            if state.status == FetchStatus::Loading && state.data.is_none() {
                ui.spinner();
                ui.label(tr(language, "refreshing"));
                return;
            }
            (state.data.clone(), state.error.clone())
        };

        if let Some(error) = error {
            ui.colored_label(egui::Color32::RED, error);
        }
        let Some(snapshot) = snapshot else {
            return;
        };
        self.persist_on_success(ctx, &snapshot);

        let place = if snapshot.country.is_empty() {
            snapshot.city.clone()
        } else {
            format!("{}, {}", snapshot.city, snapshot.country)
        };
        ui.colored_label(ctx.accent, place);
        ui.heading(format!("{:.1} °C", snapshot.current_temp));

        ui.add_space(4.0);
        ui.strong(tr(language, "forecast"));
        egui::Grid::new(ui.id().with("forecast_grid"))
            .num_columns(3)
            .striped(true)
            .show(ui, |ui| {
                for day in &snapshot.daily {
                    ui.label(day.date.format("%a %d.%m.").to_string());
                    ui.label(tr(language, weather_description(day.weather_code)));
                    ui.label(format!("{:.0}° / {:.0}°", day.max, day.min));
                    ui.end_row();
                }
            });
    }

    fn stop(&mut self) {
        self.poller.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::{FetchError, FetchStatus};

    fn snapshot() -> WeatherSnapshot {
        WeatherSnapshot {
            city: "Siegen".into(),
            country: "Germany".into(),
            current_temp: 21.0,
            daily: Vec::new(),
        }
    }

    #[test]
    fn failed_fetch_leaves_no_stale_snapshot() {
        let mut widget = WeatherWidget::new(WeatherWidgetConfig::default());
        widget.poller.maybe_poll(|| Ok(snapshot()));
        widget.poller.join_in_flight();
        assert!(widget.poller.state().data.is_some());

        widget
            .poller
            .refresh_now(|| Err(FetchError::NotFound("Nonexistent City XYZ".into())));
        widget.poller.join_in_flight();

        let state = widget.poller.state();
        assert_eq!(state.status, FetchStatus::Error);
        assert_eq!(state.data, None);
        assert!(state.error.as_deref().unwrap().contains("not found"));
    }

    #[test]
    fn changing_the_range_refetches_immediately() {
        let mut widget = WeatherWidget::new(WeatherWidgetConfig::default());
        widget.active_city = Some("Siegen".into());
        assert_eq!(widget.days, 7);

        widget.set_days(16);
        assert_eq!(widget.days, 16);
        assert!(widget.poller.in_flight());
        widget.poller.stop();
    }

    #[test]
    fn same_range_is_a_no_op() {
        let mut widget = WeatherWidget::new(WeatherWidgetConfig::default());
        widget.active_city = Some("Siegen".into());
        widget.set_days(7);
        assert!(!widget.poller.in_flight());
    }
}
