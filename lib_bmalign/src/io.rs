use nom::{
    IResult, Parser,
    bytes::complete::take_while1,
    character::complete::{char, digit1, satisfy},
    multi::many0,
};

use crate::error::Error;

pub fn parse_whitespace(input: &str) -> IResult<&str, ()> {
    skip_whitespace(input).map(|input| (input, ()))
}

pub fn parse_any_whitespace(input: &str) -> IResult<&str, ()> {
    skip_any_whitespace(input).map(|input| (input, ()))
}

fn skip_whitespace(
    input: &str,
) -> std::result::Result<&str, nom::Err<nom::error::Error<&str>>> {
    many0(satisfy(is_whitespace))
        .parse(input)
        .map(|(input, _)| input)
}

pub fn skip_any_whitespace(
    input: &str,
) -> std::result::Result<&str, nom::Err<nom::error::Error<&str>>> {
    many0(satisfy(is_any_whitespace))
        .parse(input)
        .map(|(input, _)| input)
}

fn is_any_whitespace(c: char) -> bool {
    is_whitespace(c) || is_any_line_break(c)
}

fn is_whitespace(c: char) -> bool {
    c.is_whitespace() && !is_any_line_break(c)
}

pub fn is_any_line_break(c: char) -> bool {
    c == '\n' || c == '\r'
}

/// Parses a word made of alphanumeric characters, `_` and `-`.
pub fn parse_word(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '_' || c == '-')(input)
}

/// Parses a non-empty token that ends at whitespace or a line break.
pub fn parse_token(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !is_any_whitespace(c))(input)
}

pub fn parse_usize(input: &str) -> IResult<&str, usize> {
    let (remaining, digits) = digit1(input)?;
    let value = digits.parse().map_err(|_| {
        nom::Err::Failure(nom::error::Error {
            input,
            code: nom::error::ErrorKind::Digit,
        })
    })?;
    Ok((remaining, value))
}

/// Parses either a number or `-`, which stands for an absent value.
pub fn parse_optional_usize(input: &str) -> IResult<&str, Option<usize>> {
    if let Ok((input, _)) = char::<_, nom::error::Error<&str>>('-')(input) {
        Ok((input, None))
    } else {
        parse_usize(input).map(|(input, value)| (input, Some(value)))
    }
}

pub fn translate_nom_error(error: nom::Err<nom::error::Error<&str>>) -> Error {
    match error {
        nom::Err::Incomplete(needed) => Error::ParserIncomplete(needed),
        nom::Err::Error(error) | nom::Err::Failure(error) => Error::Parser {
            input: error.input.to_string(),
            kind: error.code,
        },
    }
}
