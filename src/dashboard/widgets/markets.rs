use crate::dashboard::widgets::{DashboardContext, Widget};
use crate::fetch::{FetchError, FetchStatus, Poller};
use crate::i18n::{tr, tr_with};
use crate::prefs;
use crate::providers::http_client;
use crate::providers::markets::{fetch_prices, MarketRow, Watchlist};
use eframe::egui;
use serde::{Deserialize, Serialize};
use std::sync::PoisonError;
use std::time::Duration;

const CURRENCIES: &[&str] = &["EUR", "USD"];

fn default_refresh_secs() -> u64 {
    60
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketsWidgetConfig {
    #[serde(default = "default_refresh_secs")]
    pub refresh_secs: u64,
}

impl Default for MarketsWidgetConfig {
    fn default() -> Self {
        Self {
            refresh_secs: default_refresh_secs(),
        }
    }
}

/// Crypto ticker table over a persisted watch-list. Watch-list and display
/// currency changes write through to the preference store and trigger an
/// immediate re-price.
pub struct MarketsWidget {
    poller: Poller<Vec<MarketRow>>,
    watchlist: Option<Watchlist>,
    currency: String,
    input: String,
    notice: Option<String>,
}

impl MarketsWidget {
    pub fn new(config: MarketsWidgetConfig) -> Self {
        Self {
            poller: Poller::new(Some(Duration::from_secs(config.refresh_secs.max(1)))),
            watchlist: None,
            currency: String::new(),
            input: String::new(),
            notice: None,
        }
    }

    fn load_persisted(&mut self, ctx: &DashboardContext<'_>) {
        if self.watchlist.is_some() {
            return;
        }
        let store = ctx.prefs.lock().unwrap_or_else(PoisonError::into_inner);
        let symbols: Vec<String> = store.get_json(&prefs::TICKER_SYMBOLS);
        self.watchlist = Some(Watchlist::new(symbols));
        self.currency = store.get(&prefs::TICKER_CURRENCY);
    }

    fn persist(&self, ctx: &DashboardContext<'_>) {
        let mut store = ctx.prefs.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(watchlist) = &self.watchlist {
            store.set_json(&prefs::TICKER_SYMBOLS, watchlist);
        }
        store.set(&prefs::TICKER_CURRENCY, self.currency.clone());
    }

    fn start_fetch(&mut self, immediate: bool) {
        let Some(watchlist) = self.watchlist.clone() else {
            return;
        };
        let currency = self.currency.clone();
        let fetch = move || {
            let client = http_client()?;
            fetch_prices(&client, &watchlist, &currency)
        };
        if immediate {
            self.poller.refresh_now(fetch);
        } else {
            self.poller.maybe_poll(fetch);
        }
    }

    /// Switch the display currency: persist it and re-price right away.
    fn set_currency(&mut self, ctx: &DashboardContext<'_>, currency: String) {
        if currency == self.currency {
            return;
        }
        self.currency = currency;
        self.persist(ctx);
        self.start_fetch(true);
    }

    fn add_symbol(&mut self, ctx: &DashboardContext<'_>) {
        let symbol = self.input.trim().to_string();
        if symbol.is_empty() {
            return;
        }
        let Some(watchlist) = self.watchlist.as_mut() else {
            return;
        };
        match watchlist.add(&symbol) {
            Ok(true) => {
                self.input.clear();
                self.persist(ctx);
                self.start_fetch(true);
            }
            Ok(false) => {
                // Already watched, silently ignored.
                self.input.clear();
            }
            Err(FetchError::UnknownSymbol(sym)) => {
                self.notice = Some(tr_with(ctx.language, "unknown_symbol", &sym));
            }
            Err(err) => {
                self.notice = Some(err.to_string());
            }
        }
    }
}

impl Widget for MarketsWidget {
    fn render(&mut self, ui: &mut egui::Ui, ctx: &DashboardContext<'_>) {
        self.load_persisted(ctx);
        self.start_fetch(false);
        let language = ctx.language;

        // Unknown-symbol notice blocks the widget until dismissed.
        if let Some(notice) = self.notice.clone() {
            egui::Window::new(tr(language, "error"))
                .id(ui.id().with("symbol_notice"))
                .collapsible(false)
                .resizable(false)
                .show(ui.ctx(), |ui| {
                    ui.label(notice);
                    if ui.button("OK").clicked() {
                        self.notice = None;
                    }
                });
            ui.set_enabled(false);
        }

        ui.horizontal(|ui| {
            ui.strong(tr(language, "currency"));
            let mut selected = self.currency.clone();
            egui::ComboBox::from_id_source(ui.id().with("ticker_currency"))
                .selected_text(&self.currency)
                .show_ui(ui, |ui| {
                    for cur in CURRENCIES {
                        ui.selectable_value(&mut selected, cur.to_string(), *cur);
                    }
                });
            if selected != self.currency {
                self.set_currency(ctx, selected);
            }
            if self.poller.in_flight() {
                ui.spinner();
            }
        });

        ui.horizontal(|ui| {
            let field = ui.add(
                egui::TextEdit::singleline(&mut self.input)
                    .hint_text(tr(language, "placeholder_symbol"))
                    .desired_width(120.0),
            );
            let submitted = field.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if ui.button(tr(language, "add_symbol")).clicked() || submitted {
                self.add_symbol(ctx);
            }
        });
        ui.separator();

        let rows: Vec<MarketRow> = {
            let state = self.poller.state();
            if let Some(error) = &state.error {
                ui.colored_label(
                    egui::Color32::RED,
                    format!("{}: {error}", tr(language, "error")),
                );
            }
            if state.status == FetchStatus::Loading && state.data.is_none() {
                ui.spinner();
                return;
            }
            state.data.clone().unwrap_or_default()
        };

        let mut removed: Option<String> = None;
        egui::Grid::new(ui.id().with("ticker_grid"))
            .num_columns(4)
            .striped(true)
            .show(ui, |ui| {
                for row in &rows {
                    ui.strong(&row.symbol);
                    match row.price {
                        Some(price) => ui.label(format!("{price:.2} {}", self.currency)),
                        None => ui.label("—"),
                    };
                    match row.change_24h {
                        Some(change) => {
                            let color = if change >= 0.0 {
                                egui::Color32::from_rgb(0x22, 0xc5, 0x5e)
                            } else {
                                egui::Color32::RED
                            };
                            ui.colored_label(color, format!("{change:+.2}%"))
                        }
                        None => ui.label("—"),
                    };
                    if ui
                        .small_button("✖")
                        .on_hover_text(tr(language, "remove"))
                        .clicked()
                    {
                        removed = Some(row.symbol.clone());
                    }
                    ui.end_row();
                }
            });

        if let Some(symbol) = removed {
            if let Some(watchlist) = self.watchlist.as_mut() {
                if watchlist.remove(&symbol) {
                    self.persist(ctx);
                    self.start_fetch(true);
                }
            }
        }
    }

    fn stop(&mut self) {
        self.poller.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Language;
    use crate::prefs::PrefStore;
    use crate::settings::{Settings, SettingsHandle};
    use std::sync::Mutex;

    #[test]
    fn currency_change_persists_and_refetches() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        let store = Mutex::new(PrefStore::load(&path));
        let settings = SettingsHandle::new(Settings::default());
        let ctx = DashboardContext {
            prefs: &store,
            settings: &settings,
            accent: egui::Color32::WHITE,
            language: Language::En,
        };

        let mut widget = MarketsWidget::new(MarketsWidgetConfig::default());
        widget.load_persisted(&ctx);
        assert_eq!(widget.currency, "EUR");

        widget.set_currency(&ctx, "USD".into());
        assert!(widget.poller.in_flight());
        widget.poller.stop();

        let reloaded = PrefStore::load(&path);
        assert_eq!(reloaded.get(&prefs::TICKER_CURRENCY), "USD");
    }

    #[test]
    fn same_currency_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let store = Mutex::new(PrefStore::load(dir.path().join("prefs.json")));
        let settings = SettingsHandle::new(Settings::default());
        let ctx = DashboardContext {
            prefs: &store,
            settings: &settings,
            accent: egui::Color32::WHITE,
            language: Language::En,
        };

        let mut widget = MarketsWidget::new(MarketsWidgetConfig::default());
        widget.load_persisted(&ctx);
        widget.set_currency(&ctx, "EUR".into());
        assert!(!widget.poller.in_flight());
    }

    #[test]
    fn unknown_symbol_sets_a_notice_and_keeps_the_list() {
        let dir = tempfile::tempdir().unwrap();
        let store = Mutex::new(PrefStore::load(dir.path().join("prefs.json")));
        let settings = SettingsHandle::new(Settings::default());
        let ctx = DashboardContext {
            prefs: &store,
            settings: &settings,
            accent: egui::Color32::WHITE,
            language: Language::En,
        };

        let mut widget = MarketsWidget::new(MarketsWidgetConfig::default());
        widget.load_persisted(&ctx);
        widget.input = "WAGMI".into();
        widget.add_symbol(&ctx);

        assert!(widget.notice.as_deref().unwrap().contains("WAGMI"));
        let symbols = widget.watchlist.as_ref().unwrap().symbols();
        assert_eq!(symbols, ["BTC", "ETH", "SOL"]);
    }
}
