use crate::algebra::{Geom, Props, Varset};
use crate::csv_reader::{parse_number, Catalog, Dataset};
use crate::graph::{BarStyle, LineStyle, PointStyle};
use crate::ir::{GroupData, LayerData, PanelData, RenderData, RenderStyle, ResolvedLayer, ResolvedSpec};
use crate::palette::ColorPalette;
use anyhow::{anyhow, Context, Result};
use std::collections::BTreeSet;
use tracing::{debug, warn};

const DEFAULT_GROUP: &str = "default";
const PALETTE_SIZE: usize = 10;

/// Pull every resolved layer's observations out of its dataset and place it
/// in the panel at its grid position
pub fn apply_transformations(spec: &ResolvedSpec, catalog: &Catalog, bins: usize) -> Result<RenderData> {
    let (nrow, ncol) = (spec.nrow, spec.ncol);
    let mut panels: Vec<PanelData> = (0..nrow * ncol)
        .map(|i| PanelData {
            row: i / ncol,
            col: i % ncol,
            layers: Vec::new(),
        })
        .collect();

    for layer in &spec.layers {
        let dataset = catalog
            .get(layer.data.as_deref())
            .with_context(|| format!("Failed to find dataset for layer {}", layer.index))?;
        let layer_data = process_layer(layer, dataset, bins)
            .with_context(|| format!("Failed to transform layer {}", layer.index))?;

        let panel = panels
            .get_mut(layer.grid.row * ncol + layer.grid.col)
            .filter(|_| layer.grid.col < ncol)
            .ok_or_else(|| {
                anyhow!(
                    "Layer {} is placed at ({}, {}) outside the {}x{} grid",
                    layer.index,
                    layer.grid.row,
                    layer.grid.col,
                    nrow,
                    ncol
                )
            })?;
        panel.layers.push(layer_data);
    }

    debug!(panels = panels.len(), nrow, ncol, "transformed layers into panels");

    Ok(RenderData { panels, nrow, ncol })
}

/// Observations of one group, already parsed
struct RawGroup {
    key: String,
    rows: Vec<usize>,
    x: Vec<f64>,
    y: Vec<f64>,
}

fn process_layer(layer: &ResolvedLayer, dataset: &Dataset, bins: usize) -> Result<LayerData> {
    // Histograms only look at x
    let y_col = layer.y.as_ref().filter(|_| layer.geom != Geom::Histogram);

    let mut columns = vec![layer.x.clone()];
    columns.extend(y_col.cloned());
    let varset = Varset::from_dataset(dataset, &columns)?;

    let raw = match layer.group_col() {
        Some(group_col) => {
            let keys = Varset::from_dataset(dataset, &[group_col])?;
            split_groups(&varset, &keys, group_col)?
        }
        None => vec![parse_group(DEFAULT_GROUP.to_string(), &varset)?],
    };

    if raw.len() > PALETTE_SIZE {
        warn!(
            layer = layer.index,
            groups = raw.len(),
            "more groups than palette colors; colors will repeat"
        );
    }

    let palette = ColorPalette::category10();
    let keys: Vec<String> = raw.iter().map(|g| g.key.clone()).collect();
    let color_map = palette.assign_colors(&keys);
    let fixed_color = layer
        .props
        .get("color")
        .and_then(|v| v.as_text())
        .map(str::to_string);

    let color_for = |key: &str| -> String {
        if layer.group_col().is_some() {
            color_map.get(key).cloned().unwrap_or_else(|| palette.get_color(0))
        } else {
            fixed_color
                .clone()
                .unwrap_or_else(|| palette.get_color(layer.index))
        }
    };

    let (groups, bin_width) = if layer.geom == Geom::Histogram {
        let (groups, width) = bucket_groups(raw, bins);
        let groups = groups
            .into_iter()
            .map(|mut g| {
                g.style = build_style(layer.geom, color_for(&g.key), &layer.props);
                g
            })
            .collect();
        (groups, Some(width))
    } else {
        let groups = raw
            .into_iter()
            .map(|g| {
                let style = build_style(layer.geom, color_for(&g.key), &layer.props);
                GroupData {
                    y_start: vec![0.0; g.y.len()],
                    key: g.key,
                    rows: g.rows,
                    x: g.x,
                    y: g.y,
                    style,
                }
            })
            .collect();
        (groups, None)
    };

    Ok(LayerData {
        layer_index: layer.index,
        geom: layer.geom,
        x_label: layer.x.clone(),
        y_label: y_col.cloned(),
        bin_width,
        groups,
    })
}

/// Split a varset by the distinct values of `keys` (sorted)
fn split_groups(varset: &Varset, keys: &Varset, group_col: &str) -> Result<Vec<RawGroup>> {
    let distinct: BTreeSet<&str> = keys
        .rows
        .values()
        .filter_map(|t| t.first().map(String::as_str))
        .collect();

    let mut groups = Vec::with_capacity(distinct.len());
    for key in distinct {
        let indices = keys.select(group_col, |v| v == key)?;
        groups.push(parse_group(key.to_string(), &varset.restrict(&indices))?);
    }
    Ok(groups)
}

fn parse_group(key: String, varset: &Varset) -> Result<RawGroup> {
    let mut group = RawGroup {
        key,
        rows: Vec::with_capacity(varset.len()),
        x: Vec::with_capacity(varset.len()),
        y: Vec::new(),
    };

    for (&idx, tuple) in &varset.rows {
        group.rows.push(idx);
        group.x.push(parse_number(&tuple[0], &varset.columns[0], idx)?);
        if let (Some(cell), Some(column)) = (tuple.get(1), varset.columns.get(1)) {
            group.y.push(parse_number(cell, column, idx)?);
        }
    }

    // 1-D layers still need a y per mark
    if group.y.is_empty() {
        group.y = vec![0.0; group.x.len()];
    }

    Ok(group)
}

/// Count observations into `bins` equal-width buckets spanning the layer's x
/// range. Every group uses the same edges.
fn bucket_groups(raw: Vec<RawGroup>, bins: usize) -> (Vec<GroupData>, f64) {
    let bins = bins.max(1);
    let (mut lo, mut hi) = raw
        .iter()
        .flat_map(|g| g.x.iter().copied())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| (lo.min(x), hi.max(x)));
    if !lo.is_finite() || !hi.is_finite() {
        (lo, hi) = (0.0, 1.0);
    } else if lo == hi {
        (lo, hi) = (lo - 0.5, hi + 0.5);
    }
    let width = (hi - lo) / bins as f64;

    let groups = raw
        .into_iter()
        .map(|g| {
            let mut counts = vec![0.0; bins];
            for x in &g.x {
                let bucket = (((x - lo) / width).floor() as usize).min(bins - 1);
                counts[bucket] += 1.0;
            }
            GroupData {
                key: g.key,
                rows: Vec::new(),
                x: (0..bins).map(|i| lo + (i as f64 + 0.5) * width).collect(),
                y: counts,
                y_start: vec![0.0; bins],
                style: RenderStyle::Bar(BarStyle::default()),
            }
        })
        .collect();

    (groups, width)
}

fn build_style(geom: Geom, color: String, props: &Props) -> RenderStyle {
    let number = |key: &str| props.get(key).and_then(|v| v.as_number());

    match geom {
        Geom::Scatter => RenderStyle::Point(PointStyle {
            color: Some(color),
            size: number("size"),
            alpha: number("alpha"),
        }),
        Geom::Line => RenderStyle::Line(LineStyle {
            color: Some(color),
            width: number("size"),
            alpha: number("alpha"),
        }),
        Geom::Histogram => RenderStyle::Bar(BarStyle {
            color: Some(color),
            alpha: number("alpha"),
        }),
    }
}
