use crate::dashboard::widgets::{DashboardContext, Widget};
use crate::i18n::tr;
use eframe::egui;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// How long the error state stays on screen before the display resets.
const ERROR_DISPLAY: Duration = Duration::from_millis(900);

const BUTTON_ROWS: &[&[&str]] = &[
    &["7", "8", "9", "/"],
    &["4", "5", "6", "*"],
    &["1", "2", "3", "-"],
    &["0", ".", "=", "+"],
    &["C", "%"],
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CalculatorWidgetConfig {}

/// Four-function calculator with a free-form expression line. Expressions
/// are evaluated as a whole, so operator precedence applies.
pub struct CalculatorWidget {
    expression: String,
    error_since: Option<Instant>,
}

impl CalculatorWidget {
    pub fn new(_config: CalculatorWidgetConfig) -> Self {
        Self {
            expression: String::new(),
            error_since: None,
        }
    }

    fn evaluate(&mut self) {
        if self.expression.trim().is_empty() {
            return;
        }
        match exmex::eval_str::<f64>(&self.expression) {
            Ok(result) if result.is_finite() => {
                self.expression = trim_float(result);
            }
            _ => {
                self.error_since = Some(Instant::now());
            }
        }
    }

    /// Evaluate the current expression and divide by 100.
    fn percent(&mut self) {
        if self.expression.trim().is_empty() {
            return;
        }
        match exmex::eval_str::<f64>(&self.expression) {
            Ok(result) if result.is_finite() => {
                self.expression = trim_float(result / 100.0);
            }
            _ => {
                self.error_since = Some(Instant::now());
            }
        }
    }

    fn press(&mut self, label: &str) {
        match label {
            "=" => self.evaluate(),
            "%" => self.percent(),
            "C" => self.expression.clear(),
            _ => self.expression.push_str(label),
        }
    }
}

impl Widget for CalculatorWidget {
    fn render(&mut self, ui: &mut egui::Ui, ctx: &DashboardContext<'_>) {
        let language = ctx.language;
        ui.strong(tr(language, "calculator"));
        ui.separator();

        // The error state is transient; the display resets once it elapses.
        if let Some(since) = self.error_since {
            if since.elapsed() >= ERROR_DISPLAY {
                self.error_since = None;
                self.expression.clear();
            } else {
                ui.ctx().request_repaint_after(ERROR_DISPLAY - since.elapsed());
            }
        }

        if self.error_since.is_some() {
            ui.colored_label(egui::Color32::RED, tr(language, "error"));
        } else {
            let field = ui.add(
                egui::TextEdit::singleline(&mut self.expression)
                    .font(egui::TextStyle::Monospace)
                    .desired_width(f32::INFINITY),
            );
            if field.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                self.evaluate();
            }
        }

        ui.add_space(4.0);
        for row in BUTTON_ROWS {
            ui.horizontal(|ui| {
                for label in *row {
                    let button = egui::Button::new(*label).min_size(egui::vec2(32.0, 28.0));
                    let button = if *label == "=" {
                        button.fill(ctx.accent)
                    } else {
                        button
                    };
                    if ui.add(button).clicked() {
                        self.press(label);
                    }
                }
            });
        }
    }
}

/// Drop the trailing `.0` from whole results; keep everything else as-is.
fn trim_float(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}
