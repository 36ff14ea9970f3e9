// Geometry (geom) parser: histogram(), scatter(), line()

use super::lexer::{number_literal, string_literal, ws};
use crate::algebra::{Geom, PropValue, Props};
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::char,
    combinator::{map, value, verify},
    multi::separated_list0,
    sequence::{preceded, terminated},
    IResult,
};

/// Parse a geometry call
/// Format: scatter() or scatter(color: "red", size: 4, alpha: 0.5)
pub fn parse_geom(input: &str) -> IResult<&str, (Geom, Props)> {
    let (input, geom) = ws(alt((
        value(Geom::Histogram, tag("histogram")),
        value(Geom::Scatter, tag("scatter")),
        value(Geom::Line, tag("line")),
    )))(input)?;
    let (input, _) = ws(char('('))(input)?;

    // Optional fixed visual properties
    let (input, args) = separated_list0(
        ws(char(',')),
        alt((
            map(preceded(argument_key("color"), ws(string_literal)), |c| {
                ("color", PropValue::Text(c))
            }),
            map(preceded(argument_key("size"), ws(finite_number)), |s| {
                ("size", PropValue::Number(s))
            }),
            map(preceded(argument_key("alpha"), ws(finite_number)), |a| {
                ("alpha", PropValue::Number(a))
            }),
        )),
    )(input)?;

    let (input, _) = ws(char(')'))(input)?;

    let props = args
        .into_iter()
        .map(|(key, val)| (key.to_string(), val))
        .collect();

    Ok((input, (geom, props)))
}

/// `name :` with whitespace allowed on either side of the colon
fn argument_key<'a>(name: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    terminated(ws(tag(name)), ws(char(':')))
}

/// A number that is neither infinite nor NaN
fn finite_number(input: &str) -> IResult<&str, f64> {
    verify(number_literal, |v: &f64| v.is_finite())(input)
}
