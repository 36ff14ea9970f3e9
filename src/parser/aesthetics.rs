// Aesthetics parser: explicit role assignments

use super::lexer::{column_name, identifier, ws};
use crate::algebra::Aesthetics;
use nom::{
    bytes::complete::tag,
    character::complete::char,
    multi::separated_list1,
    IResult,
};

/// Parse aesthetics specification
/// Format: aes(x: col[, y: col][, color: col][, group: col])
pub fn parse_aesthetics(input: &str) -> IResult<&str, Aesthetics> {
    let (input, _) = ws(tag("aes"))(input)?;
    let (input, _) = ws(char('('))(input)?;

    // At least one named argument
    let (input, args) = separated_list1(ws(char(',')), parse_aesthetic_argument)(input)?;

    let (input, _) = ws(char(')'))(input)?;

    let mut aes = Aesthetics::default();
    for (key, value) in args {
        match key.as_str() {
            "x" => aes.x = Some(value),
            "y" => aes.y = Some(value),
            "color" => aes.color = Some(value),
            // only "group" is left after parse_aesthetic_argument
            _ => aes.group = Some(value),
        }
    }

    Ok((input, aes))
}

/// Parse a single aesthetic argument (key: column)
fn parse_aesthetic_argument(input: &str) -> IResult<&str, (String, String)> {
    let (rest, key) = ws(identifier)(input)?;
    if !matches!(key.as_str(), "x" | "y" | "color" | "group") {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Tag,
        )));
    }
    let (rest, _) = ws(char(':'))(rest)?;
    let (rest, value) = ws(column_name)(rest)?;
    Ok((rest, (key, value)))
}
