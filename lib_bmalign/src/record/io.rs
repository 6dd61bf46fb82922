use std::io::{Read, Write};

use log::trace;
use nom::{
    IResult, Parser,
    bytes::complete::{tag, take_till1},
    multi::many0,
    sequence::tuple,
};

use crate::{
    error::{Error, Result},
    io::{
        is_any_line_break, parse_optional_usize, parse_whitespace, parse_word, skip_any_whitespace,
        translate_nom_error,
    },
    sequence::{SequenceIdentifier, io::parse_identifier},
};

use super::{DenseDiagonal, DenseSegment, DenseSegmentEntry, PairwiseRecord, RecordKind, Segments};

const DENSE_DIAGONAL: &str = "dense-diag";
const DENSE_SEGMENT: &str = "dense-seg";
const STANDARD: &str = "standard";

impl PairwiseRecord {
    /// Reads all records from `reader`.
    pub fn read_plain(mut reader: impl Read) -> Result<Vec<Self>> {
        let mut input = String::new();
        reader.read_to_string(&mut input)?;
        Self::parse_plain_all(&input)
    }

    pub fn parse_plain_all(input: &str) -> Result<Vec<Self>> {
        let (input, records) = many0(parse_record)
            .parse(input)
            .map_err(translate_nom_error)?;
        let input = skip_any_whitespace(input).map_err(translate_nom_error)?;

        if input.is_empty() {
            Ok(records)
        } else {
            Err(Error::Parser {
                input: input.lines().next().unwrap_or_default().to_string(),
                kind: nom::error::ErrorKind::Eof,
            })
        }
    }

    pub fn write_plain(&self, mut writer: impl Write) -> Result<()> {
        match &self.segments {
            Segments::DenseDiagonals(diagonals) => {
                writeln!(writer, "> {} {DENSE_DIAGONAL}", self.kind)?;
                for diagonal in diagonals {
                    for identifier in &diagonal.identifiers {
                        write!(writer, "{identifier} ")?;
                    }
                    for start in &diagonal.starts {
                        write!(writer, "{start} ")?;
                    }
                    writeln!(writer, "{}", diagonal.length)?;
                }
            }
            Segments::DenseSegment(dense_segment) => {
                write!(writer, "> {} {DENSE_SEGMENT}", self.kind)?;
                for identifier in &dense_segment.identifiers {
                    write!(writer, " {identifier}")?;
                }
                writeln!(writer)?;
                for entry in &dense_segment.entries {
                    for start in &entry.starts {
                        match start {
                            Some(start) => write!(writer, "{start} ")?,
                            None => write!(writer, "- ")?,
                        }
                    }
                    writeln!(writer, "{}", entry.length)?;
                }
            }
            Segments::Standard { identifiers } => {
                write!(writer, "> {} {STANDARD}", self.kind)?;
                for identifier in identifiers {
                    write!(writer, " {identifier}")?;
                }
                writeln!(writer)?;
            }
        }

        Ok(())
    }
}

/// Writes all records in the order given.
pub fn write_plain_all<'record>(
    records: impl IntoIterator<Item = &'record PairwiseRecord>,
    mut writer: impl Write,
) -> Result<()> {
    for record in records {
        record.write_plain(&mut writer)?;
    }
    Ok(())
}

fn parse_record(input: &str) -> IResult<&str, PairwiseRecord> {
    let input = skip_any_whitespace(input)?;
    let (input, _) = tuple((tag(">"), parse_whitespace))(input)?;
    let (input, kind) = parse_word(input)?;
    let kind: RecordKind = kind.parse().map_err(|_| verify_failure(input))?;
    let (input, ()) = parse_whitespace(input)?;
    let (input, encoding) = parse_word(input)?;
    let (input, header_identifiers) = many0(parse_header_identifier).parse(input)?;
    let (input, ()) = parse_whitespace(input)?;
    trace!("Parsing {kind} record with {encoding} encoding");

    let (input, segments) = match encoding {
        DENSE_DIAGONAL => {
            let (input, lines) = many0(parse_body_line).parse(input)?;
            let diagonals = lines
                .into_iter()
                .map(parse_dense_diagonal)
                .collect::<std::result::Result<Vec<_>, _>>()?;
            (input, Segments::DenseDiagonals(diagonals))
        }
        DENSE_SEGMENT => {
            let (input, lines) = many0(parse_body_line).parse(input)?;
            let dimension = header_identifiers.len();
            let entries = lines
                .into_iter()
                .map(|line| parse_dense_segment_entry(line, dimension))
                .collect::<std::result::Result<Vec<_>, _>>()?;
            (
                input,
                Segments::DenseSegment(DenseSegment {
                    identifiers: header_identifiers,
                    entries,
                }),
            )
        }
        STANDARD => (
            input,
            Segments::Standard {
                identifiers: header_identifiers,
            },
        ),
        _ => return Err(verify_failure(input)),
    };

    Ok((input, PairwiseRecord::new(kind, segments)))
}

fn parse_header_identifier(input: &str) -> IResult<&str, SequenceIdentifier> {
    let (input, ()) = parse_whitespace(input)?;
    parse_identifier(input)
}

/// Parses one non-empty line that does not start a new record.
fn parse_body_line(input: &str) -> IResult<&str, &str> {
    let input = skip_any_whitespace(input)?;
    if input.starts_with('>') {
        return Err(nom::Err::Error(nom::error::Error {
            input,
            code: nom::error::ErrorKind::Tag,
        }));
    }
    take_till1(is_any_line_break)(input)
}

fn parse_dense_diagonal(line: &str) -> std::result::Result<DenseDiagonal, nom::Err<nom::error::Error<&str>>> {
    let mut identifiers = Vec::new();
    let mut numbers = Vec::new();

    for token in line.split_whitespace() {
        if numbers.is_empty() && token.contains('|') {
            identifiers.push(parse_complete_identifier(token)?);
        } else {
            numbers.push(parse_complete_usize(token)?);
        }
    }

    if identifiers.is_empty() || numbers.len() != identifiers.len() + 1 {
        return Err(verify_failure(line));
    }

    let length = numbers.pop().ok_or_else(|| verify_failure(line))?;
    Ok(DenseDiagonal {
        identifiers,
        starts: numbers,
        length,
    })
}

fn parse_dense_segment_entry(
    line: &str,
    dimension: usize,
) -> std::result::Result<DenseSegmentEntry, nom::Err<nom::error::Error<&str>>> {
    let mut starts = line
        .split_whitespace()
        .map(|token| match parse_optional_usize(token)? {
            ("", value) => Ok(value),
            (remaining, _) => Err(verify_failure(remaining)),
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;

    if starts.len() != dimension + 1 {
        return Err(verify_failure(line));
    }

    let length = starts.pop().flatten().ok_or_else(|| verify_failure(line))?;
    Ok(DenseSegmentEntry { starts, length })
}

fn parse_complete_identifier(
    token: &str,
) -> std::result::Result<SequenceIdentifier, nom::Err<nom::error::Error<&str>>> {
    match parse_identifier(token)? {
        ("", identifier) => Ok(identifier),
        (remaining, _) => Err(verify_failure(remaining)),
    }
}

fn parse_complete_usize(token: &str) -> std::result::Result<usize, nom::Err<nom::error::Error<&str>>> {
    match crate::io::parse_usize(token)? {
        ("", value) => Ok(value),
        (remaining, _) => Err(verify_failure(remaining)),
    }
}

fn verify_failure(input: &str) -> nom::Err<nom::error::Error<&str>> {
    nom::Err::Failure(nom::error::Error {
        input,
        code: nom::error::ErrorKind::Verify,
    })
}
