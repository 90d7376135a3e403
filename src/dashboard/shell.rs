use crate::dashboard::config::DashboardConfig;
use crate::dashboard::layout::{normalize_slots, NormalizedSlot};
use crate::dashboard::widgets::{
    format_hex_color, parse_hex_color, DashboardContext, Widget, WidgetRegistry,
};
use crate::i18n::tr;
use crate::prefs::{self, PrefStore};
use crate::settings::{Settings, SettingsHandle};
use eframe::egui;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// The application shell: owns the preference store, the shared settings
/// and the instantiated widget grid.
pub struct DashboardApp {
    prefs: Arc<Mutex<PrefStore>>,
    settings: SettingsHandle,
    grid: (usize, usize),
    widgets: Vec<(NormalizedSlot, Box<dyn Widget>)>,
}

impl DashboardApp {
    pub fn new(mut store: PrefStore) -> Self {
        let registry = WidgetRegistry::with_defaults();
        let config = DashboardConfig::load(&store, &registry);
        config.ensure_persisted(&mut store);
        let (slots, warnings) = normalize_slots(&config, &registry);
        for warning in warnings {
            tracing::warn!("{warning}");
        }

        let widgets = slots
            .into_iter()
            .filter_map(|slot| {
                registry
                    .get(&slot.widget)
                    .map(|descriptor| (slot.clone(), descriptor.create(&slot.settings)))
            })
            .collect();

        let settings = SettingsHandle::new(Settings::from_prefs(&store));
        Self {
            prefs: Arc::new(Mutex::new(store)),
            settings,
            grid: (
                config.grid.rows.max(1) as usize,
                config.grid.cols.max(1) as usize,
            ),
            widgets,
        }
    }

    fn top_bar(&mut self, ui: &mut egui::Ui) {
        let mut settings = self.settings.current();
        let language = settings.language;
        let mut changed = false;

        ui.horizontal(|ui| {
            ui.heading(tr(language, "dashboard_title"));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let mut accent = parse_hex_color(&settings.accent_color)
                    .unwrap_or_else(|| default_accent());
                if ui
                    .color_edit_button_srgba(&mut accent)
                    .on_hover_text(tr(language, "select_color"))
                    .changed()
                {
                    settings.accent_color = format_hex_color(accent);
                    changed = true;
                }
                if ui
                    .button(language.toggled().code().to_uppercase())
                    .on_hover_text(tr(language, "language"))
                    .clicked()
                {
                    settings.language = settings.language.toggled();
                    changed = true;
                }
                let icon = if settings.dark_mode { "☀" } else { "🌙" };
                if ui
                    .button(icon)
                    .on_hover_text(tr(language, "dark_mode"))
                    .clicked()
                {
                    settings.dark_mode = !settings.dark_mode;
                    changed = true;
                }
            });
        });

        if changed {
            let applied = settings.clone();
            self.settings.update(move |s| *s = applied);
            let mut store = self.prefs.lock().unwrap_or_else(PoisonError::into_inner);
            settings.persist(&mut store);
        }
    }

    fn grid_ui(&mut self, ui: &mut egui::Ui) {
        let settings = self.settings.current();
        let accent = parse_hex_color(&settings.accent_color).unwrap_or_else(default_accent);
        let (rows, cols) = self.grid;
        let row_height = (ui.available_height() / rows as f32).max(120.0);

        ui.columns(cols, |columns| {
            for (slot, widget) in &mut self.widgets {
                let Some(column) = columns.get_mut(slot.col) else {
                    continue;
                };
                let height = row_height * slot.row_span as f32;
                let ctx = DashboardContext {
                    prefs: &self.prefs,
                    settings: &self.settings,
                    accent,
                    language: settings.language,
                };
                egui::Frame::group(column.style())
                    .inner_margin(egui::Margin::same(8.0))
                    .show(column, |ui| {
                        ui.set_min_height(height - 24.0);
                        ui.set_max_height(height - 24.0);
                        widget.render(ui, &ctx);
                    });
            }
        });
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let settings = self.settings.current();
        if settings.dark_mode {
            ctx.set_visuals(egui::Visuals::dark());
        } else {
            ctx.set_visuals(egui::Visuals::light());
        }

        egui::TopBottomPanel::top("dashboard_top_bar").show(ctx, |ui| {
            self.top_bar(ui);
        });
        egui::CentralPanel::default().show(ctx, |ui| {
            self.grid_ui(ui);
        });

        // Interval polling is driven by the frame loop, so keep it ticking
        // even without input events.
        ctx.request_repaint_after(Duration::from_secs(1));
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        for (_, widget) in &mut self.widgets {
            widget.stop();
        }
    }
}

fn default_accent() -> egui::Color32 {
    parse_hex_color(prefs::ACCENT_COLOR.default)
        .unwrap_or(egui::Color32::from_rgb(0x3b, 0x82, 0xf6))
}
