use std::{io::Write, str::FromStr};

use log::trace;
use nom::{
    IResult,
    bytes::complete::{tag, take_while1},
    character::complete::line_ending,
    combinator::opt,
    sequence::tuple,
};

use crate::{
    error::Result,
    io::{parse_any_whitespace, parse_whitespace, parse_word, skip_any_whitespace, translate_nom_error},
};

use super::AlignmentConfiguration;

impl AlignmentConfiguration {
    pub fn read_plain(mut reader: impl std::io::Read) -> Result<Self> {
        let mut input = String::new();
        reader.read_to_string(&mut input)?;
        let input = input.as_str();
        Self::parse_plain(input)
            .map(|(_, result)| result)
            .map_err(translate_nom_error)
    }

    pub fn write_plain(&self, mut writer: impl Write) -> Result<()> {
        writeln!(writer, "# Merge")?;
        writeln!(writer, "master_selection = {}", self.master_selection)?;
        writeln!(writer, "# Display")?;
        writeln!(writer, "justification = {}", self.justification)?;
        Ok(())
    }

    fn parse_plain(input: &str) -> IResult<&str, Self> {
        trace!("Parsing merge options");
        let (input, ()) = parse_specific_name("Merge")(input)?;
        let (input, master_selection) = parse_specific_equals_value("master_selection")(input)?;

        trace!("Parsing display options");
        let (input, ()) = parse_specific_name("Display")(input)?;
        let (input, justification) = parse_specific_equals_value("justification")(input)?;
        let input = skip_any_whitespace(input)?;

        Ok((
            input,
            Self {
                master_selection,
                justification,
            },
        ))
    }
}

fn parse_specific_name(name: &str) -> impl '_ + FnMut(&str) -> IResult<&str, ()> {
    move |input| {
        tuple((
            parse_any_whitespace,
            tag("#"),
            parse_whitespace,
            tag(name),
            parse_whitespace,
            line_ending,
            parse_any_whitespace,
        ))(input)
        .map(|(input, _)| (input, ()))
    }
}

fn parse_specific_equals_value<Value: FromStr>(
    identifier: &str,
) -> impl '_ + FnMut(&str) -> IResult<&str, Value> {
    move |input| {
        let (input, (actual_identifier, value)) = parse_equals_value(input)?;
        if actual_identifier == identifier {
            Ok((input, value))
        } else {
            Err(nom::Err::Failure(nom::error::Error {
                input,
                code: nom::error::ErrorKind::Verify,
            }))
        }
    }
}

fn parse_equals_value<Value: FromStr>(input: &str) -> IResult<&str, (&str, Value)> {
    let input = skip_any_whitespace(input)?;
    let (input, identifier) = take_while1(|c: char| c.is_alphanumeric() || c == '_')(input)?;
    let (input, _) = tuple((parse_whitespace, tag("="), parse_whitespace))(input)?;
    let (remaining, value) = parse_word(input)?;
    let value = Value::from_str(value).map_err(|_| {
        nom::Err::Failure(nom::error::Error {
            input,
            code: nom::error::ErrorKind::Verify,
        })
    })?;
    let (remaining, _) = tuple((parse_whitespace, opt(line_ending)))(remaining)?;

    Ok((remaining, (identifier, value)))
}
