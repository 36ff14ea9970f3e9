use crate::algebra::{Geom, GridPos, Layout, Props};
use crate::graph::{BarStyle, LineStyle, PointStyle};
use serde::Serialize;

// =============================================================================
// Phase 1: Smart defaults
// =============================================================================

/// Result of resolving an algebraic spec: explicit roles, geometry and grid
/// position for every layer (no data touched yet)
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedSpec {
    pub layers: Vec<ResolvedLayer>,
    /// Layout after `Auto` has been decided
    pub layout: Layout,
    pub nrow: usize,
    pub ncol: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResolvedLayer {
    /// Position in the original blend
    pub index: usize,
    pub data: Option<String>,
    pub columns: Vec<String>,
    pub x: String,
    pub y: Option<String>,
    pub color: Option<String>,
    pub group: Option<String>,
    pub geom: Geom,
    /// Same column on both axes
    pub diagonal: bool,
    pub grid: GridPos,
    pub props: Props,
}

impl ResolvedLayer {
    /// Column used to split the layer into series, if any.
    ///
    /// A mapped `color` takes precedence over a `nest` group; resolution
    /// warns when both are set to different columns.
    pub fn group_col(&self) -> Option<&str> {
        self.color.as_deref().or(self.group.as_deref())
    }
}

// =============================================================================
// Phase 2: Transformation
// =============================================================================

/// Data pulled out of the datasets, arranged into grid panels
#[derive(Debug, Clone)]
pub struct RenderData {
    /// Row-major, `nrow * ncol` panels
    pub panels: Vec<PanelData>,
    pub nrow: usize,
    pub ncol: usize,
}

#[derive(Debug, Clone)]
pub struct PanelData {
    pub row: usize,
    pub col: usize,
    pub layers: Vec<LayerData>,
}

impl PanelData {
    pub fn has_histogram(&self) -> bool {
        self.layers.iter().any(|l| l.geom == Geom::Histogram)
    }

    /// Every layer is a histogram, so the y axis is a pure count axis
    pub fn is_histogram_only(&self) -> bool {
        !self.layers.is_empty() && self.layers.iter().all(|l| l.geom == Geom::Histogram)
    }
}

#[derive(Debug, Clone)]
pub struct LayerData {
    pub layer_index: usize,
    pub geom: Geom,
    pub x_label: String,
    pub y_label: Option<String>,
    /// Bucket width of a histogram layer
    pub bin_width: Option<f64>,
    pub groups: Vec<GroupData>,
}

/// A set of marks sharing one visual style.
///
/// Scatter/line: one entry per observation. Histogram: one entry per bucket,
/// `x` is the bucket center, `y` the count and `y_start` zero.
#[derive(Debug, Clone)]
pub struct GroupData {
    /// Legend key ("default" when the layer is not grouped)
    pub key: String,
    /// Dataset row index per entry (empty for histogram buckets)
    pub rows: Vec<usize>,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub y_start: Vec<f64>,
    pub style: RenderStyle,
}

#[derive(Debug, Clone)]
pub enum RenderStyle {
    Point(PointStyle),
    Line(LineStyle),
    Bar(BarStyle),
}

// =============================================================================
// Phase 3: Scaling
// =============================================================================

#[derive(Debug, Clone)]
pub struct ScaleSystem {
    /// One scale pair per panel, same order as `RenderData::panels`
    pub panels: Vec<PanelScales>,
}

#[derive(Debug, Clone)]
pub struct PanelScales {
    pub x: Scale,
    pub y: Scale,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scale {
    pub domain: (f64, f64),
}

// =============================================================================
// Phase 4: Compilation (Scene Graph)
// =============================================================================

#[derive(Debug, Clone)]
pub struct SceneGraph {
    pub width: u32,
    pub height: u32,
    pub title: Option<String>,
    pub nrow: usize,
    pub ncol: usize,
    pub panels: Vec<PanelScene>,
}

#[derive(Debug, Clone)]
pub struct PanelScene {
    pub row: usize,
    pub col: usize,
    pub x_label: String,
    pub y_label: String,
    pub x_scale: Scale,
    pub y_scale: Scale,
    pub commands: Vec<DrawCommand>,
}

#[derive(Debug, Clone)]
pub enum DrawCommand {
    DrawPoints {
        points: Vec<(f64, f64)>,
        style: PointStyle,
        legend: Option<String>,
    },
    DrawLine {
        points: Vec<(f64, f64)>,
        style: LineStyle,
        legend: Option<String>,
    },
    DrawRect {
        // Top-Left, Bottom-Right
        tl: (f64, f64),
        br: (f64, f64),
        style: BarStyle,
        legend: Option<String>,
    },
}
