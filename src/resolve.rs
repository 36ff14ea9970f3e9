use crate::algebra::{Geom, GridPos, Layer, Layout, Spec};
use crate::error::AlgebraError;
use crate::ir::{ResolvedLayer, ResolvedSpec};
use tracing::{debug, warn};

/// Apply smart defaults to an algebraic spec.
///
/// Roles are assigned positionally (1 column -> x, 2 -> x + y, 3+ -> error)
/// unless the layer sets them explicitly. A layer whose x and y are the same
/// column is diagonal and defaults to a histogram, as does a layer with no y;
/// everything else defaults to a scatter. Grid positions follow the order in
/// which x and y labels first appear.
pub fn resolve(spec: &Spec) -> Result<ResolvedSpec, AlgebraError> {
    let mut layers = Vec::with_capacity(spec.layers.len());
    for (index, layer) in spec.layers.iter().enumerate() {
        layers.push(resolve_layer(index, layer, spec.data.as_deref())?);
    }

    let x_labels = distinct(layers.iter().map(|l| l.x.as_str()));
    let y_labels = distinct(layers.iter().map(y_label));

    let layout = match spec.layout {
        Layout::Auto if x_labels.len() > 1 || y_labels.len() > 1 => Layout::Grid,
        Layout::Auto => Layout::Single,
        explicit => explicit,
    };

    for (resolved, layer) in layers.iter_mut().zip(&spec.layers) {
        resolved.grid = match (layer.grid, layout) {
            (Some(explicit), _) => explicit,
            (None, Layout::Grid) => GridPos {
                row: position(&y_labels, y_label(resolved)),
                col: position(&x_labels, &resolved.x),
            },
            (None, _) => GridPos::default(),
        };
    }

    let nrow = layers.iter().map(|l| l.grid.row + 1).max().unwrap_or(0);
    let ncol = layers.iter().map(|l| l.grid.col + 1).max().unwrap_or(0);

    debug!(
        layers = layers.len(),
        ?layout,
        nrow,
        ncol,
        "resolved smart defaults"
    );

    Ok(ResolvedSpec {
        layers,
        layout,
        nrow,
        ncol,
    })
}

/// Resolve roles, diagonal flag and geometry of one layer (grid comes later)
fn resolve_layer(
    index: usize,
    layer: &Layer,
    shared_data: Option<&str>,
) -> Result<ResolvedLayer, AlgebraError> {
    let (x, y) = assign_roles(index, layer)?;

    let diagonal = y.as_deref() == Some(x.as_str());
    let geom = layer.geom.unwrap_or(if y.is_none() || diagonal {
        Geom::Histogram
    } else {
        Geom::Scatter
    });

    debug!(layer = index, x = %x, y = ?y, %geom, diagonal, "inferred layer");

    if let (Some(color), Some(group)) = (&layer.aes.color, &layer.aes.group) {
        if color != group {
            warn!(layer = index, %color, %group, "color mapping overrides nest group");
        }
    }

    Ok(ResolvedLayer {
        index,
        data: layer.data.clone().or_else(|| shared_data.map(str::to_string)),
        columns: layer.columns.clone(),
        x,
        y,
        color: layer.aes.color.clone(),
        group: layer.aes.group.clone(),
        geom,
        diagonal,
        grid: GridPos::default(),
        props: layer.props.clone(),
    })
}

fn assign_roles(index: usize, layer: &Layer) -> Result<(String, Option<String>), AlgebraError> {
    if layer.aes.has_positional() {
        let x = layer
            .aes
            .x
            .clone()
            .ok_or(AlgebraError::MissingX { layer: index })?;
        return Ok((x, layer.aes.y.clone()));
    }

    match layer.columns.as_slice() {
        [] => Err(AlgebraError::NoColumns { layer: index }),
        [x] => Ok((x.clone(), None)),
        [x, y] => Ok((x.clone(), Some(y.clone()))),
        columns => Err(AlgebraError::AmbiguousRoles {
            columns: columns.to_vec(),
            layer: index,
        }),
    }
}

/// Row label of a layer: its y, or its x when it has none (keeps 1-D layers on the diagonal)
fn y_label(layer: &ResolvedLayer) -> &str {
    layer.y.as_deref().unwrap_or(&layer.x)
}

fn distinct<'a>(labels: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for label in labels {
        if !seen.iter().any(|s| s == label) {
            seen.push(label.to_string());
        }
    }
    seen
}

fn position(labels: &[String], label: &str) -> usize {
    labels.iter().position(|l| l == label).unwrap_or(0)
}
