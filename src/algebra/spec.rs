// Spec: a blend of layers plus plot-level properties, and the combinators over it

use super::layer::Layer;
use serde::Serialize;
use std::ops::{Add, Mul};

/// How the layers of a plot are arranged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Grid when more than one x or y variable is used, single panel otherwise
    #[default]
    Auto,
    /// Every layer overlaid in one panel
    Single,
    /// Scatterplot-matrix grid, one panel per (y, x) pair
    Grid,
}

/// Ordered collection of layers (the blend alternatives) plus plot-level properties
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Spec {
    pub layers: Vec<Layer>,
    /// Shared dataset for layers without their own
    pub data: Option<String>,
    pub layout: Layout,
}

impl From<Layer> for Spec {
    fn from(layer: Layer) -> Self {
        Spec {
            layers: vec![layer],
            ..Default::default()
        }
    }
}

impl Spec {
    /// One empty layer: the unit of `cross`
    pub fn identity() -> Self {
        Spec::from(Layer::new())
    }

    /// No layers: the unit of `blend`
    pub fn empty() -> Self {
        Spec::default()
    }

    /// Blend of single-column layers, one per column
    pub fn columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        blend_all(columns.into_iter().map(|c| Spec::from(Layer::columns([c]))))
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }

    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    /// Every alternative inherits unset aesthetics and properties from `base`
    pub fn with_base(&self, base: &Layer) -> Spec {
        Spec {
            layers: self.layers.iter().map(|l| l.inherit(base)).collect(),
            data: self.data.clone(),
            layout: self.layout,
        }
    }

    fn merge_plot_props(&self, other: &Spec) -> (Option<String>, Layout) {
        let data = other.data.clone().or_else(|| self.data.clone());
        let layout = match other.layout {
            Layout::Auto => self.layout,
            explicit => explicit,
        };
        (data, layout)
    }
}

/// Cartesian product: every left layer merged with every right layer, row-major
pub fn cross(a: &Spec, b: &Spec) -> Spec {
    let mut layers = Vec::with_capacity(a.layers.len() * b.layers.len());
    for left in &a.layers {
        for right in &b.layers {
            layers.push(left.merge(right));
        }
    }

    let (data, layout) = a.merge_plot_props(b);
    Spec { layers, data, layout }
}

/// Concatenation of alternatives
pub fn blend(a: &Spec, b: &Spec) -> Spec {
    let mut layers = a.layers.clone();
    layers.extend(b.layers.iter().cloned());

    let (data, layout) = a.merge_plot_props(b);
    Spec { layers, data, layout }
}

/// Group every layer by `by`: each distinct value becomes its own colored series
pub fn nest(spec: &Spec, by: impl Into<String>) -> Spec {
    let by = by.into();
    Spec {
        layers: spec
            .layers
            .iter()
            .map(|l| {
                let mut nested = l.clone();
                nested.aes.group = Some(by.clone());
                nested
            })
            .collect(),
        data: spec.data.clone(),
        layout: spec.layout,
    }
}

pub fn blend_all<I: IntoIterator<Item = Spec>>(specs: I) -> Spec {
    specs
        .into_iter()
        .fold(Spec::empty(), |acc, s| blend(&acc, &s))
}

pub fn cross_all<I: IntoIterator<Item = Spec>>(specs: I) -> Spec {
    specs
        .into_iter()
        .fold(Spec::identity(), |acc, s| cross(&acc, &s))
}

impl<R: Into<Spec>> Mul<R> for Spec {
    type Output = Spec;

    fn mul(self, rhs: R) -> Spec {
        cross(&self, &rhs.into())
    }
}

impl<R: Into<Spec>> Add<R> for Spec {
    type Output = Spec;

    fn add(self, rhs: R) -> Spec {
        blend(&self, &rhs.into())
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::algebra::layer::{Aesthetics, Geom, GridPos, PropValue, Props};
    use proptest::prelude::*;

    fn arb_aes() -> impl Strategy<Value = Aesthetics> {
        (
            prop::option::of("[a-c]"),
            prop::option::of("[a-c]"),
            prop::option::of("[s-t]"),
            prop::option::of("[s-t]"),
        )
            .prop_map(|(x, y, color, group)| Aesthetics { x, y, color, group })
    }

    fn arb_number() -> impl Strategy<Value = PropValue> {
        (-8i32..8).prop_map(|n| PropValue::Number(f64::from(n) / 2.0))
    }

    // Scalar keys never collide with the map-valued "style" key
    fn arb_props() -> impl Strategy<Value = Props> {
        (
            prop::collection::btree_map("(size|alpha)", arb_number(), 0..3),
            prop::option::of("(red|blue)"),
            prop::option::of(prop::collection::btree_map(
                "(dash|width|cap)",
                prop_oneof![arb_number(), any::<bool>().prop_map(PropValue::Bool)],
                0..3,
            )),
        )
            .prop_map(|(mut props, color, style)| {
                if let Some(color) = color {
                    props.insert("color".to_string(), PropValue::Text(color));
                }
                if let Some(style) = style {
                    props.insert("style".to_string(), PropValue::Map(style));
                }
                props
            })
    }

    fn arb_layer() -> impl Strategy<Value = Layer> {
        (
            prop::collection::vec("[a-e]", 0..3),
            prop::option::of(prop_oneof![
                Just(Geom::Histogram),
                Just(Geom::Scatter),
                Just(Geom::Line)
            ]),
            prop::option::of("[xyz]"),
            arb_aes(),
            prop::option::of((0usize..3, 0usize..3).prop_map(|(row, col)| GridPos::new(row, col))),
            arb_props(),
        )
            .prop_map(|(columns, geom, data, aes, grid, props)| {
                let mut layer = Layer::columns(columns);
                layer.geom = geom;
                layer.data = data;
                layer.aes = aes;
                layer.grid = grid;
                layer.props = props;
                layer
            })
    }

    fn arb_spec() -> impl Strategy<Value = Spec> {
        prop::collection::vec(arb_layer(), 0..4).prop_map(|layers| Spec {
            layers,
            ..Default::default()
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_cross_right_distributes(a in arb_spec(), b in arb_spec(), c in arb_spec()) {
            let left = (a.clone() + b.clone()) * c.clone();
            let right = a * c.clone() + b * c;
            prop_assert_eq!(left.layers, right.layers);
        }

        #[test]
        fn prop_cross_left_distributes(a in arb_spec(), b in arb_spec(), c in arb_spec()) {
            let left = c.clone() * (a.clone() + b.clone());
            let right = c.clone() * a + c * b;
            prop_assert_eq!(left.layers, right.layers);
        }

        #[test]
        fn prop_cross_associative(a in arb_spec(), b in arb_spec(), c in arb_spec()) {
            let left = (a.clone() * b.clone()) * c.clone();
            let right = a * (b * c);
            prop_assert_eq!(left.layers, right.layers);
        }

        #[test]
        fn prop_blend_associative(a in arb_spec(), b in arb_spec(), c in arb_spec()) {
            let left = (a.clone() + b.clone()) + c.clone();
            let right = a + (b + c);
            prop_assert_eq!(left.layers, right.layers);
        }

        #[test]
        fn prop_identity_units(a in arb_spec()) {
            prop_assert_eq!((a.clone() * Spec::identity()).layers, a.layers.clone());
            prop_assert_eq!((Spec::identity() * a.clone()).layers, a.layers.clone());
            prop_assert_eq!((a.clone() + Spec::empty()).layers, a.layers.clone());
            prop_assert_eq!((Spec::empty() + a.clone()).layers, a.layers.clone());
            prop_assert!((a.clone() * Spec::empty()).is_empty());
            prop_assert!((Spec::empty() * a).is_empty());
        }

        #[test]
        fn prop_layer_merge_associative(a in arb_layer(), b in arb_layer(), c in arb_layer()) {
            prop_assert_eq!(a.merge(&b).merge(&c), a.merge(&b.merge(&c)));
        }

        #[test]
        fn prop_sizes(a in arb_spec(), b in arb_spec()) {
            prop_assert_eq!((a.clone() * b.clone()).len(), a.len() * b.len());
            prop_assert_eq!((a.clone() + b.clone()).len(), a.len() + b.len());
        }
    }
}
