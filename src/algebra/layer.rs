// Layer: a single data-to-mark mapping and its merge rules

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Free-form layer properties (visual options, renderer hints).
pub type Props = BTreeMap<String, PropValue>;

/// A property value. Maps nest and merge recursively.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PropValue {
    Bool(bool),
    Number(f64),
    Text(String),
    Map(Props),
}

impl PropValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            PropValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<f64> for PropValue {
    fn from(n: f64) -> Self {
        PropValue::Number(n)
    }
}

impl From<bool> for PropValue {
    fn from(b: bool) -> Self {
        PropValue::Bool(b)
    }
}

impl From<&str> for PropValue {
    fn from(s: &str) -> Self {
        PropValue::Text(s.to_string())
    }
}

impl From<String> for PropValue {
    fn from(s: String) -> Self {
        PropValue::Text(s)
    }
}

impl From<Props> for PropValue {
    fn from(m: Props) -> Self {
        PropValue::Map(m)
    }
}

/// Geometry a layer is drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Geom {
    Histogram,
    Scatter,
    Line,
}

impl fmt::Display for Geom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Geom::Histogram => "histogram",
            Geom::Scatter => "scatter",
            Geom::Line => "line",
        };
        f.write_str(name)
    }
}

/// Explicit aesthetic role assignments (None = not assigned)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Aesthetics {
    pub x: Option<String>,
    pub y: Option<String>,
    pub color: Option<String>,
    pub group: Option<String>,
}

impl Aesthetics {
    /// Field-wise merge; roles set on `other` win.
    pub fn merge(&self, other: &Aesthetics) -> Aesthetics {
        Aesthetics {
            x: other.x.clone().or_else(|| self.x.clone()),
            y: other.y.clone().or_else(|| self.y.clone()),
            color: other.color.clone().or_else(|| self.color.clone()),
            group: other.group.clone().or_else(|| self.group.clone()),
        }
    }

    /// True if x or y was assigned explicitly
    pub fn has_positional(&self) -> bool {
        self.x.is_some() || self.y.is_some()
    }
}

/// Position of a layer in the plot grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct GridPos {
    pub row: usize,
    pub col: usize,
}

impl GridPos {
    pub fn new(row: usize, col: usize) -> Self {
        GridPos { row, col }
    }
}

/// One data-to-mark mapping.
///
/// Layers are plain values: every combinator returns a new layer and leaves
/// its inputs untouched. `Layer::default()` is the identity of [`Layer::merge`].
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Layer {
    /// Dataset reference by name (None = plot-level or default dataset)
    pub data: Option<String>,
    /// Columns in the order they were crossed in
    pub columns: Vec<String>,
    pub aes: Aesthetics,
    pub geom: Option<Geom>,
    pub grid: Option<GridPos>,
    pub props: Props,
}

/// Wrap a dataset reference and a column selection into a layer
pub fn layer<I, S>(data: impl Into<String>, columns: I) -> Layer
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Layer::columns(columns).with_data(data)
}

impl Layer {
    pub fn new() -> Self {
        Layer::default()
    }

    /// A bare column selection
    pub fn columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Layer {
            columns: columns.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }

    pub fn with_geom(mut self, geom: Geom) -> Self {
        self.geom = Some(geom);
        self
    }

    pub fn with_aes(mut self, aes: Aesthetics) -> Self {
        self.aes = self.aes.merge(&aes);
        self
    }

    pub fn with_grid(mut self, row: usize, col: usize) -> Self {
        self.grid = Some(GridPos::new(row, col));
        self
    }

    pub fn with_prop(mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }

    /// Right-biased recursive merge.
    ///
    /// Scalars set on `other` replace ours, aesthetics merge per role,
    /// columns concatenate (ours first) and property maps merge key by key.
    /// Associative as long as a given property key holds a map on every side
    /// or a scalar on every side.
    pub fn merge(&self, other: &Layer) -> Layer {
        let mut columns = self.columns.clone();
        columns.extend(other.columns.iter().cloned());

        Layer {
            data: other.data.clone().or_else(|| self.data.clone()),
            columns,
            aes: self.aes.merge(&other.aes),
            geom: other.geom.or(self.geom),
            grid: other.grid.or(self.grid),
            props: merge_props(&self.props, &other.props),
        }
    }

    /// Fill everything this layer leaves unset from `base`
    pub fn inherit(&self, base: &Layer) -> Layer {
        base.merge(self)
    }
}

/// Recursive key-wise merge of two property maps, right side wins
pub fn merge_props(left: &Props, right: &Props) -> Props {
    let mut merged = left.clone();
    for (key, value) in right {
        let next = match (merged.get(key), value) {
            (Some(PropValue::Map(l)), PropValue::Map(r)) => PropValue::Map(merge_props(l, r)),
            _ => value.clone(),
        };
        merged.insert(key.clone(), next);
    }
    merged
}
