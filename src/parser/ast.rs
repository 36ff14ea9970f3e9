// Abstract Syntax Tree for algebra expressions

use crate::algebra::{self, Aesthetics, Geom, GridPos, Layer, Props, Spec};

/// A parsed algebra expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A bare column: a one-layer spec over that column
    Column(String),
    /// data(name)
    Data(String),
    /// histogram(), scatter(), line() with optional fixed visual properties
    Geom { geom: Geom, props: Props },
    /// aes(x: a, y: b, color: c, group: d)
    Aes(Aesthetics),
    /// grid(row: n, col: m)
    Grid(GridPos),
    /// nest(expr, by: column)
    Nest { inner: Box<Expr>, by: String },
    Cross(Box<Expr>, Box<Expr>),
    Blend(Box<Expr>, Box<Expr>),
}

impl Expr {
    /// Fold the tree with the algebra combinators
    pub fn eval(&self) -> Spec {
        match self {
            Expr::Column(name) => Spec::from(Layer::columns([name.as_str()])),
            Expr::Data(name) => Spec::from(Layer::new().with_data(name.as_str())),
            Expr::Geom { geom, props } => {
                let mut layer = Layer::new().with_geom(*geom);
                layer.props = props.clone();
                Spec::from(layer)
            }
            Expr::Aes(aes) => Spec::from(Layer::new().with_aes(aes.clone())),
            Expr::Grid(pos) => Spec::from(Layer::new().with_grid(pos.row, pos.col)),
            Expr::Nest { inner, by } => algebra::nest(&inner.eval(), by.as_str()),
            Expr::Cross(a, b) => algebra::cross(&a.eval(), &b.eval()),
            Expr::Blend(a, b) => algebra::blend(&a.eval(), &b.eval()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col(name: &str) -> Box<Expr> {
        Box::new(Expr::Column(name.to_string()))
    }

    #[test]
    fn test_eval_column() {
        let spec = Expr::Column("a".to_string()).eval();
        assert_eq!(spec.layers, vec![Layer::columns(["a"])]);
    }

    #[test]
    fn test_eval_cross_of_blends() {
        let vars = Expr::Blend(col("a"), col("b"));
        let splom = Expr::Cross(Box::new(vars.clone()), Box::new(vars));
        let spec = splom.eval();
        assert_eq!(spec.len(), 4);
        assert_eq!(spec.layers[1].columns, vec!["a", "b"]);
        assert_eq!(spec.layers[2].columns, vec!["b", "a"]);
    }

    #[test]
    fn test_eval_property_layers_merge() {
        let expr = Expr::Cross(
            Box::new(Expr::Cross(
                Box::new(Expr::Data("iris".to_string())),
                col("a"),
            )),
            Box::new(Expr::Geom {
                geom: Geom::Line,
                props: Props::new(),
            }),
        );
        let spec = expr.eval();
        assert_eq!(spec.len(), 1);
        let layer = &spec.layers[0];
        assert_eq!(layer.data.as_deref(), Some("iris"));
        assert_eq!(layer.geom, Some(Geom::Line));
        assert_eq!(layer.columns, vec!["a"]);
    }

    #[test]
    fn test_eval_nest_and_grid() {
        let expr = Expr::Nest {
            inner: Box::new(Expr::Cross(col("a"), Box::new(Expr::Grid(GridPos::new(2, 1))))),
            by: "species".to_string(),
        };
        let spec = expr.eval();
        assert_eq!(spec.layers[0].aes.group.as_deref(), Some("species"));
        assert_eq!(spec.layers[0].grid, Some(GridPos::new(2, 1)));
    }
}
