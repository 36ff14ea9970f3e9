//! The layer algebra.
//!
//! A plot is a [`Spec`]: an ordered blend of [`Layer`]s. Specs combine with
//! `*` ([`cross`], Cartesian product with merging) and `+` ([`blend`],
//! concatenation). Cross distributes over blend, so a scatterplot matrix is
//! just the square of a blend of columns:
//!
//! ```
//! use gramsplom::algebra::Spec;
//!
//! let vars = Spec::columns(["sepal_length", "sepal_width", "petal_length"]);
//! let splom = vars.clone() * vars;
//! assert_eq!(splom.len(), 9);
//! ```

pub mod layer;
pub mod spec;
pub mod varset;

pub use layer::{layer, merge_props, Aesthetics, Geom, GridPos, Layer, PropValue, Props};
pub use spec::{blend, blend_all, cross, cross_all, nest, Layout, Spec};
pub use varset::{VarBlend, Varset};
