use crate::dashboard::widgets::{DashboardContext, Widget};
use crate::fetch::{FetchStatus, Poller};
use crate::i18n::{tr, Language};
use crate::providers::http_client;
use crate::providers::news::{feeds_for, fetch_feed, NewsItem, DEFAULT_MAX_ITEMS};
use crate::settings::SettingsWatcher;
use eframe::egui;
use serde::{Deserialize, Serialize};
use std::time::Duration;

fn default_refresh_minutes() -> u64 {
    180
}

fn default_max_items() -> usize {
    DEFAULT_MAX_ITEMS
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsWidgetConfig {
    #[serde(default = "default_refresh_minutes")]
    pub refresh_minutes: u64,
    #[serde(default = "default_max_items")]
    pub max_items: usize,
}

impl Default for NewsWidgetConfig {
    fn default() -> Self {
        Self {
            refresh_minutes: default_refresh_minutes(),
            max_items: default_max_items(),
        }
    }
}

/// Headline list for the feed selected in a drop-down. The feed set follows
/// the dashboard language; switching language resets to that set's first feed.
pub struct NewsWidget {
    config: NewsWidgetConfig,
    poller: Poller<Vec<NewsItem>>,
    source_index: usize,
    last_language: Option<Language>,
    watcher: Option<SettingsWatcher>,
}

impl NewsWidget {
    pub fn new(config: NewsWidgetConfig) -> Self {
        let interval = Duration::from_secs(config.refresh_minutes.max(1) * 60);
        Self {
            config,
            poller: Poller::new(Some(interval)),
            source_index: 0,
            last_language: None,
            watcher: None,
        }
    }

    fn start_fetch(&mut self, language: Language, immediate: bool) {
        let feeds = feeds_for(language);
        let url = feeds[self.source_index.min(feeds.len() - 1)].url;
        let max_items = self.config.max_items;
        let fetch = move || {
            let client = http_client()?;
            fetch_feed(&client, url, max_items)
        };
        if immediate {
            self.poller.refresh_now(fetch);
        } else {
            self.poller.maybe_poll(fetch);
        }
    }
}

impl Widget for NewsWidget {
    fn render(&mut self, ui: &mut egui::Ui, ctx: &DashboardContext<'_>) {
        let language = ctx.language;
        if self.watcher.is_none() {
            self.watcher = Some(ctx.settings.watch());
            self.last_language = Some(language);
        }
        let settings_changed = self
            .watcher
            .as_mut()
            .map(|w| w.changed(ctx.settings))
            .unwrap_or(false);
        if settings_changed && self.last_language != Some(language) {
            self.last_language = Some(language);
            self.source_index = 0;
            self.start_fetch(language, true);
        }
        self.start_fetch(language, false);

        let feeds = feeds_for(language);
        self.source_index = self.source_index.min(feeds.len() - 1);

        ui.horizontal(|ui| {
            ui.strong(tr(language, "news"));
            let before = self.source_index;
            egui::ComboBox::from_id_source(ui.id().with("news_source"))
                .selected_text(feeds[self.source_index].name)
                .show_ui(ui, |ui| {
                    for (idx, feed) in feeds.iter().enumerate() {
                        ui.selectable_value(&mut self.source_index, idx, feed.name);
                    }
                });
            if self.source_index != before {
                self.start_fetch(language, true);
            }
            if ui.small_button("⟳").on_hover_text(tr(language, "refresh")).clicked() {
                self.start_fetch(language, true);
            }
        });
        ui.separator();

        let state = self.poller.state();
        if state.status == FetchStatus::Loading && state.data.is_none() {
            ui.spinner();
            ui.label(tr(language, "refreshing"));
            return;
        }
        if let Some(error) = &state.error {
            ui.colored_label(egui::Color32::RED, format!("{}: {error}", tr(language, "error")));
        }
        match &state.data {
            Some(items) => {
                egui::ScrollArea::vertical()
                    .id_source(ui.id().with("news_scroll"))
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        for item in items {
                            ui.horizontal_wrapped(|ui| {
                                if item.image.is_some() {
                                    ui.label("🖼");
                                }
                                if item.link.is_empty() {
                                    ui.label(&item.title);
                                } else {
                                    ui.hyperlink_to(&item.title, &item.link);
                                }
                            });
                            if let Some(published) = item.published {
                                ui.weak(published.format("%Y-%m-%d %H:%M").to_string());
                            }
                            ui.add_space(4.0);
                        }
                    });
            }
            None => {
                if state.error.is_none() {
                    ui.weak(tr(language, "news_failed"));
                }
            }
        }
    }

    fn stop(&mut self) {
        self.poller.stop();
    }
}
