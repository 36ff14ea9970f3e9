use crate::algebra::Layout;
use crate::ir::{PanelData, PanelScales, RenderData, RenderStyle, Scale, ScaleSystem};
use anyhow::{bail, Result};
use tracing::debug;

/// Build the scale system for the plot.
///
/// In a grid, x domains are shared down each column and y domains across each
/// row. Panels holding only histograms keep their own count axis. A panel that
/// overlays a histogram with scatter or line layers keeps its own y domain,
/// covering both the counts and the plotted values.
pub fn build_scales(data: &RenderData, layout: Layout) -> Result<ScaleSystem> {
    if data.panels.len() != data.nrow * data.ncol {
        bail!(
            "Expected {} panels for a {}x{} grid, found {}",
            data.nrow * data.ncol,
            data.nrow,
            data.ncol,
            data.panels.len()
        );
    }

    // 1. Raw ranges per panel
    let raw: Vec<(MinMax, MinMax)> = data
        .panels
        .iter()
        .map(|p| (calculate_min_max_x(p), calculate_min_max_y(p)))
        .collect();

    // 2. Shared ranges per column (x) and per row (y)
    let shared = layout == Layout::Grid;
    let mut col_x = vec![MinMax::default(); data.ncol];
    let mut row_y = vec![MinMax::default(); data.nrow];
    if shared {
        for (panel, (x, y)) in data.panels.iter().zip(&raw) {
            col_x[panel.col] = col_x[panel.col].merge(x);
            if !panel.has_histogram() {
                row_y[panel.row] = row_y[panel.row].merge(y);
            }
        }
    }

    // 3. Final domains
    let mut panels = Vec::with_capacity(raw.len());
    for (panel, (x_local, y_local)) in data.panels.iter().zip(&raw) {
        let x = if shared { &col_x[panel.col] } else { x_local };
        let y = if shared && !panel.has_histogram() {
            &row_y[panel.row]
        } else {
            y_local
        };

        let y_domain = if panel.is_histogram_only() {
            count_range(y.max)
        } else {
            y.domain()
        };

        panels.push(PanelScales {
            x: Scale { domain: x.domain() },
            y: Scale { domain: y_domain },
        });
    }

    debug!(panels = panels.len(), shared, "built scales");

    Ok(ScaleSystem { panels })
}

#[derive(Debug, Clone, Copy)]
struct MinMax {
    min: f64,
    max: f64,
}

impl Default for MinMax {
    fn default() -> Self {
        MinMax {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }
}

impl MinMax {
    fn include(&mut self, value: f64) {
        if value.is_finite() {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
        }
    }

    fn merge(&self, other: &MinMax) -> MinMax {
        MinMax {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    fn is_empty(&self) -> bool {
        self.min > self.max
    }

    fn domain(&self) -> (f64, f64) {
        if self.is_empty() {
            (0.0, 1.0)
        } else {
            pad_range(self.min, self.max)
        }
    }
}

fn calculate_min_max_x(panel: &PanelData) -> MinMax {
    let mut range = MinMax::default();
    for layer in &panel.layers {
        let half_width = layer.bin_width.unwrap_or(0.0) / 2.0;
        for group in &layer.groups {
            for &x in &group.x {
                range.include(x - half_width);
                range.include(x + half_width);
            }
        }
    }
    range
}

fn calculate_min_max_y(panel: &PanelData) -> MinMax {
    let mut range = MinMax::default();
    let mut has_bars = false;

    for layer in &panel.layers {
        for group in &layer.groups {
            for &y in &group.y {
                range.include(y);
            }
            // Only bars are drawn from their baseline
            if matches!(group.style, RenderStyle::Bar(_)) {
                has_bars = true;
                for &y in &group.y_start {
                    range.include(y);
                }
            }
        }
    }

    // Bars always include 0
    if has_bars {
        range.include(0.0);
    }

    range
}

/// Count axis: starts at zero, padded at the top
fn count_range(max: f64) -> (f64, f64) {
    if max.is_finite() && max > 0.0 {
        (0.0, max * 1.05)
    } else {
        (0.0, 1.0)
    }
}

fn pad_range(min: f64, max: f64) -> (f64, f64) {
    if min == max {
        (min - 1.0, max + 1.0)
    } else {
        let padding = (max - min) * 0.05;
        (min - padding, max + padding)
    }
}
