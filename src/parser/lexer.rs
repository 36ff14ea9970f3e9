// Lexer utilities for the algebra expression language

use nom::{
    branch::alt,
    bytes::complete::take_while1,
    character::complete::{char, digit1, multispace0},
    combinator::{map_res, recognize},
    number::complete::double,
    sequence::delimited,
    IResult,
};

/// Parse and consume whitespace
pub fn ws<'a, F, O>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

/// Parse an identifier (column name, function name)
/// Format: [a-zA-Z_][a-zA-Z0-9_]*
pub fn identifier(input: &str) -> IResult<&str, String> {
    let (rest, ident) = recognize(take_while1(|c: char| c.is_alphanumeric() || c == '_'))(input)?;

    // Validate first character
    if let Some(first) = ident.chars().next() {
        if !first.is_alphabetic() && first != '_' {
            return Err(nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::Alpha)));
        }
    }

    Ok((rest, ident.to_string()))
}

/// Parse a string literal
/// Format: "..."
pub fn string_literal(input: &str) -> IResult<&str, String> {
    let (input, content) = delimited(
        char('"'),
        take_while1(|c| c != '"'),
        char('"'),
    )(input)?;

    Ok((input, content.to_string()))
}

/// A column reference: a bare identifier or a quoted name ("petal width")
pub fn column_name(input: &str) -> IResult<&str, String> {
    alt((identifier, string_literal))(input)
}

/// Parse a number literal (integer or float)
pub fn number_literal(input: &str) -> IResult<&str, f64> {
    double(input)
}

/// Parse an unsigned integer (grid positions)
pub fn uint_literal(input: &str) -> IResult<&str, usize> {
    map_res(digit1, |s: &str| s.parse::<usize>())(input)
}
