use crate::dashboard::config::{DashboardConfig, SlotConfig};
use crate::dashboard::widgets::WidgetRegistry;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedSlot {
    pub widget: String,
    pub row: usize,
    pub col: usize,
    pub row_span: usize,
    pub col_span: usize,
    pub settings: Value,
}

/// Validate and normalize slot positions to the configured grid size.
/// Slots with unknown widgets, positions outside the grid or overlapping
/// an earlier slot are dropped with a warning.
pub fn normalize_slots(
    cfg: &DashboardConfig,
    registry: &WidgetRegistry,
) -> (Vec<NormalizedSlot>, Vec<String>) {
    let rows = cfg.grid.rows.max(1) as usize;
    let cols = cfg.grid.cols.max(1) as usize;
    let mut occupied = vec![vec![false; cols]; rows];
    let mut normalized = Vec::new();
    let mut warnings = Vec::new();

    for slot in &cfg.slots {
        if !registry.contains(&slot.widget) {
            warnings.push(format!("dropping unknown widget '{}'", slot.widget));
            continue;
        }
        if let Some(ns) = normalize_slot(slot, rows, cols, &mut occupied) {
            normalized.push(ns);
        } else {
            warnings.push(format!(
                "slot for widget '{}' is outside the grid or overlaps and was ignored",
                slot.widget
            ));
        }
    }

    (normalized, warnings)
}

fn normalize_slot(
    slot: &SlotConfig,
    rows: usize,
    cols: usize,
    occupied: &mut [Vec<bool>],
) -> Option<NormalizedSlot> {
    if slot.row < 0 || slot.col < 0 {
        return None;
    }
    let row = slot.row as usize;
    let col = slot.col as usize;
    if row >= rows || col >= cols {
        return None;
    }
    let row_span = slot.row_span.max(1).min((rows - row).max(1) as u8) as usize;
    let col_span = slot.col_span.max(1).min((cols - col).max(1) as u8) as usize;

    for r in row..row + row_span {
        for c in col..col + col_span {
            if occupied[r][c] {
                return None;
            }
        }
    }
    for r in row..row + row_span {
        for c in col..col + col_span {
            occupied[r][c] = true;
        }
    }

    Some(NormalizedSlot {
        widget: slot.widget.clone(),
        row,
        col,
        row_span,
        col_span,
        settings: slot.settings.clone(),
    })
}
