use nom::IResult;

use crate::{
    error::{Error, Result},
    io::{parse_token, skip_any_whitespace, translate_nom_error},
};

use super::SequenceIdentifier;

/// Parses one identifier such as `gi|123`, `acc|NP_000001.2`, `lcl|name` or `pdb|1ABC|A`.
pub fn parse_identifier(input: &str) -> IResult<&str, SequenceIdentifier> {
    let (remaining, token) = parse_token(input)?;
    identifier_from_token(token)
        .map(|identifier| (remaining, identifier))
        .ok_or(nom::Err::Error(nom::error::Error {
            input,
            code: nom::error::ErrorKind::Verify,
        }))
}

pub fn parse_identifier_complete(input: &str) -> Result<SequenceIdentifier> {
    let (remaining, identifier) = parse_identifier(input.trim()).map_err(translate_nom_error)?;
    let remaining = skip_any_whitespace(remaining).map_err(translate_nom_error)?;
    if remaining.is_empty() {
        Ok(identifier)
    } else {
        Err(Error::Parser {
            input: remaining.to_string(),
            kind: nom::error::ErrorKind::Eof,
        })
    }
}

fn identifier_from_token(token: &str) -> Option<SequenceIdentifier> {
    let (kind, value) = token.split_once('|')?;
    if value.is_empty() {
        return None;
    }

    match kind {
        "gi" => value.parse().ok().map(SequenceIdentifier::Gi),
        "acc" => Some(match value.rsplit_once('.') {
            Some((accession, version)) if !accession.is_empty() => match version.parse() {
                Ok(version) => SequenceIdentifier::Accession {
                    accession: accession.to_string(),
                    version: Some(version),
                },
                Err(_) => SequenceIdentifier::Accession {
                    accession: value.to_string(),
                    version: None,
                },
            },
            _ => SequenceIdentifier::Accession {
                accession: value.to_string(),
                version: None,
            },
        }),
        "lcl" => Some(SequenceIdentifier::Local(value.to_string())),
        "pdb" => {
            let (molecule, chain) = value.split_once('|')?;
            let mut chain_chars = chain.chars();
            let chain = chain_chars.next()?;
            if molecule.is_empty() || chain_chars.next().is_some() {
                None
            } else {
                Some(SequenceIdentifier::Pdb {
                    molecule: molecule.to_string(),
                    chain,
                })
            }
        }
        _ => None,
    }
}
