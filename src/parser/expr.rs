// Expression parser: columns and calls combined with * and +

use super::aesthetics::parse_aesthetics;
use super::ast::Expr;
use super::geom::parse_geom;
use super::lexer::{column_name, identifier, uint_literal, ws};
use crate::algebra::GridPos;
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::char,
    combinator::{eof, map},
    multi::many0,
    sequence::{delimited, preceded},
    IResult,
};

/// Parse a complete algebra expression; the whole input must be consumed
/// Format: a + b, (a + b) * (a + b), data(iris) * (a + b) * scatter()
pub fn parse_expr(input: &str) -> IResult<&str, Expr> {
    let (input, expr) = expr(input)?;
    let (input, _) = ws(eof)(input)?;
    Ok((input, expr))
}

/// expr := term ( "+" term )*
fn expr(input: &str) -> IResult<&str, Expr> {
    let (input, first) = term(input)?;
    let (input, rest) = many0(preceded(ws(char('+')), term))(input)?;
    let folded = rest
        .into_iter()
        .fold(first, |acc, next| Expr::Blend(Box::new(acc), Box::new(next)));
    Ok((input, folded))
}

/// term := factor ( "*" factor )*
fn term(input: &str) -> IResult<&str, Expr> {
    let (input, first) = factor(input)?;
    let (input, rest) = many0(preceded(ws(char('*')), factor))(input)?;
    let folded = rest
        .into_iter()
        .fold(first, |acc, next| Expr::Cross(Box::new(acc), Box::new(next)));
    Ok((input, folded))
}

/// factor := "(" expr ")" | call | column
fn factor(input: &str) -> IResult<&str, Expr> {
    alt((
        delimited(ws(char('(')), expr, ws(char(')'))),
        parse_data,
        parse_nest,
        parse_grid,
        map(parse_aesthetics, Expr::Aes),
        map(parse_geom, |(geom, props)| Expr::Geom { geom, props }),
        map(ws(column_name), Expr::Column),
    ))(input)
}

/// data(name)
fn parse_data(input: &str) -> IResult<&str, Expr> {
    let (input, _) = ws(tag("data"))(input)?;
    let (input, name) = delimited(ws(char('(')), ws(identifier), ws(char(')')))(input)?;
    Ok((input, Expr::Data(name)))
}

/// nest(expr, by: column)
fn parse_nest(input: &str) -> IResult<&str, Expr> {
    let (input, _) = ws(tag("nest"))(input)?;
    let (input, _) = ws(char('('))(input)?;
    let (input, inner) = expr(input)?;
    let (input, _) = ws(char(','))(input)?;
    let (input, _) = ws(tag("by"))(input)?;
    let (input, _) = ws(char(':'))(input)?;
    let (input, by) = ws(column_name)(input)?;
    let (input, _) = ws(char(')'))(input)?;
    Ok((
        input,
        Expr::Nest {
            inner: Box::new(inner),
            by,
        },
    ))
}

/// grid(row: n, col: m)
fn parse_grid(input: &str) -> IResult<&str, Expr> {
    let (input, _) = ws(tag("grid"))(input)?;
    let (input, _) = ws(char('('))(input)?;
    let (input, _) = ws(tag("row"))(input)?;
    let (input, _) = ws(char(':'))(input)?;
    let (input, row) = ws(uint_literal)(input)?;
    let (input, _) = ws(char(','))(input)?;
    let (input, _) = ws(tag("col"))(input)?;
    let (input, _) = ws(char(':'))(input)?;
    let (input, col) = ws(uint_literal)(input)?;
    let (input, _) = ws(char(')'))(input)?;
    Ok((input, Expr::Grid(GridPos::new(row, col))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::{Geom, Layout, Spec};
    use crate::resolve::resolve;

    fn eval(input: &str) -> Spec {
        let (rest, expr) = parse_expr(input).unwrap();
        assert_eq!(rest, "");
        expr.eval()
    }

    #[test]
    fn test_parse_column() {
        assert_eq!(
            parse_expr("sepal_length"),
            Ok(("", Expr::Column("sepal_length".to_string())))
        );
    }

    #[test]
    fn test_precedence() {
        // a + b * c == a + (b * c)
        let spec = eval("a + b * c");
        assert_eq!(spec.len(), 2);
        assert_eq!(spec.layers[0].columns, vec!["a"]);
        assert_eq!(spec.layers[1].columns, vec!["b", "c"]);
    }

    #[test]
    fn test_splom_expression() {
        let spec = eval("(a + b + c) * (a + b + c)");
        assert_eq!(spec.len(), 9);
        let resolved = resolve(&spec).unwrap();
        assert_eq!(resolved.layout, Layout::Grid);
        assert_eq!((resolved.nrow, resolved.ncol), (3, 3));
    }

    #[test]
    fn test_calls_in_products() {
        let spec = eval(r#"data(iris) * aes(x: a, y: b) * line(color: "red") * grid(row: 1, col: 2)"#);
        let layer = &spec.layers[0];
        assert_eq!(layer.data.as_deref(), Some("iris"));
        assert_eq!(layer.aes.x.as_deref(), Some("a"));
        assert_eq!(layer.geom, Some(Geom::Line));
        assert_eq!(layer.props["color"].as_text(), Some("red"));
        assert_eq!(layer.grid, Some(GridPos::new(1, 2)));
    }

    #[test]
    fn test_geom_arguments_spaced_around_colon() {
        let spec = eval("a * b * scatter(size : 4)");
        let layer = &spec.layers[0];
        assert_eq!(layer.columns, vec!["a", "b"]);
        assert_eq!(layer.geom, Some(Geom::Scatter));
        assert_eq!(layer.props["size"].as_number(), Some(4.0));
    }

    #[test]
    fn test_nest() {
        let spec = eval("nest((a + b) * (a + b), by: species)");
        assert_eq!(spec.len(), 4);
        assert!(spec
            .layers
            .iter()
            .all(|l| l.aes.group.as_deref() == Some("species")));
    }

    #[test]
    fn test_quoted_columns() {
        let spec = eval(r#""petal width" * "petal length""#);
        assert_eq!(spec.layers[0].columns, vec!["petal width", "petal length"]);
    }

    #[test]
    fn test_column_named_like_a_call() {
        // no parentheses: a column, not a call
        let spec = eval("line * data");
        assert_eq!(spec.layers[0].columns, vec!["line", "data"]);
    }

    #[test]
    fn test_whitespace_everywhere() {
        let spec = eval("  ( a\n+ b )\t*\ta  ");
        assert_eq!(spec.len(), 2);
    }

    #[test]
    fn test_parse_errors() {
        for input in ["", "a +", "a * ", "(a + b", "a + b)", "aes()", "aes(size: a)", "a b", "a * scatter(size: inf)"] {
            assert!(parse_expr(input).is_err(), "expected error for {input:?}");
        }
    }
}
