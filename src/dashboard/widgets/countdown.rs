use crate::dashboard::widgets::{DashboardContext, Widget};
use crate::i18n::tr;
use crate::prefs;
use chrono::{DateTime, Duration as ChronoDuration, Local, TimeZone, Timelike};
use eframe::egui;
use serde::{Deserialize, Serialize};
use std::sync::PoisonError;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CountdownWidgetConfig {
    /// When the target passes, advance it by one day instead of sitting
    /// at zero until the next manual edit.
    #[serde(default)]
    pub auto_roll: bool,
}

/// Countdown to a daily target time, typically the end of the work day.
/// The target is persisted; once it passes the display clamps at zero.
pub struct CountdownWidget {
    config: CountdownWidgetConfig,
    end_time: Option<DateTime<Local>>,
    loaded: bool,
    editing: bool,
    hour_input: u32,
    minute_input: u32,
}

impl CountdownWidget {
    pub fn new(config: CountdownWidgetConfig) -> Self {
        Self {
            config,
            end_time: None,
            loaded: false,
            editing: false,
            hour_input: 17,
            minute_input: 0,
        }
    }

    fn load_persisted(&mut self, ctx: &DashboardContext<'_>) {
        if self.loaded {
            return;
        }
        self.loaded = true;
        let store = ctx.prefs.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(raw) = store.raw(prefs::WORK_END_TIME.name) {
            match DateTime::parse_from_rfc3339(raw) {
                Ok(parsed) => self.end_time = Some(parsed.with_timezone(&Local)),
                Err(err) => tracing::warn!("stored end time is malformed: {err}"),
            }
        }
        if let Some(end) = self.end_time {
            self.hour_input = end.hour();
            self.minute_input = end.minute();
        }
    }

    fn persist(&self, ctx: &DashboardContext<'_>) {
        let mut store = ctx.prefs.lock().unwrap_or_else(PoisonError::into_inner);
        match self.end_time {
            Some(end) => store.set(&prefs::WORK_END_TIME, end.to_rfc3339()),
            None => store.remove(&prefs::WORK_END_TIME),
        }
    }

    fn apply_edit(&mut self, ctx: &DashboardContext<'_>) {
        self.end_time = Some(next_occurrence(
            Local::now(),
            self.hour_input,
            self.minute_input,
        ));
        self.editing = false;
        self.persist(ctx);
    }
}

impl Widget for CountdownWidget {
    fn render(&mut self, ui: &mut egui::Ui, ctx: &DashboardContext<'_>) {
        self.load_persisted(ctx);
        let language = ctx.language;
        let now = Local::now();

        if self.config.auto_roll {
            if let Some(end) = self.end_time {
                if end <= now {
                    self.end_time = Some(end + ChronoDuration::days(1));
                    self.persist(ctx);
                }
            }
        }

        ui.strong(tr(language, "work_timer"));
        ui.separator();

        match self.end_time {
            Some(end) => {
                ui.label(format!(
                    "{} {}",
                    tr(language, "time_remaining"),
                    end.format("%H:%M")
                ));
                let left = remaining(now, end);
                ui.heading(format_remaining(left));
                if !left.is_zero() {
                    ui.ctx().request_repaint_after(Duration::from_secs(1));
                }
            }
            None => {
                ui.weak(tr(language, "not_set"));
            }
        }

        if self.editing {
            ui.horizontal(|ui| {
                ui.add(egui::DragValue::new(&mut self.hour_input).clamp_range(0..=23));
                ui.label(":");
                ui.add(egui::DragValue::new(&mut self.minute_input).clamp_range(0..=59));
                if ui.button(tr(language, "save")).clicked() {
                    self.apply_edit(ctx);
                }
                if ui.button(tr(language, "cancel")).clicked() {
                    self.editing = false;
                }
            });
        } else if ui.button(tr(language, "set_end_time")).clicked() {
            self.editing = true;
        }
    }
}

/// The next time the wall clock reads `hour:minute`, today if still ahead,
/// otherwise tomorrow.
pub fn next_occurrence(now: DateTime<Local>, hour: u32, minute: u32) -> DateTime<Local> {
    let date = now.date_naive();
    let candidate = date
        .and_hms_opt(hour, minute, 0)
        .and_then(|naive| Local.from_local_datetime(&naive).single());
    match candidate {
        Some(at) if at > now => at,
        // Past (or ambiguous around a DST switch): roll to tomorrow.
        _ => {
            let tomorrow = date + ChronoDuration::days(1);
            tomorrow
                .and_hms_opt(hour, minute, 0)
                .and_then(|naive| Local.from_local_datetime(&naive).single())
                .unwrap_or(now)
        }
    }
}

/// Time left until `end`, clamped at zero once it passed.
pub fn remaining(now: DateTime<Local>, end: DateTime<Local>) -> Duration {
    (end - now).to_std().unwrap_or(Duration::ZERO)
}

pub fn format_remaining(left: Duration) -> String {
    let total = left.as_secs();
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}
