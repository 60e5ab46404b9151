//! SRG ("Searge") mapping file parser.
//!
//! One record per line, fields separated by whitespace:
//!
//! ```text
//! PK: old/pkg new/pkg
//! CL: a/b/Old a/b/New
//! FD: a/b/Old/x a/b/New/y
//! MD: a/b/Old/m (I)V a/b/New/n (I)V
//! ```
//!
//! Blank lines and `#` comments are ignored. Names are JVM internal names and
//! member names are `owner/name`.

use thiserror::Error;
use winnow::ascii::{space0, space1};
use winnow::combinator::{alt, preceded, repeat};
use winnow::prelude::*;
use winnow::token::take_till;
use winnow::ModalResult;

use super::{DuplicateMapping, Mappings};
use crate::keys::{DescriptorError, FieldKey, MethodKey, MethodSignature, TypeKey};

/// Why a line was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// The line does not start with a known record tag.
    #[error("unrecognized record '{text}'")]
    UnknownRecord { text: String },

    /// The record has the wrong number of fields.
    #[error("{record} expects {expected} fields, found {found}")]
    WrongFieldCount {
        record: &'static str,
        expected: usize,
        found: usize,
    },

    /// A member reference has no `owner/` prefix.
    #[error("member '{name}' has no owner")]
    InvalidMemberName { name: String },

    /// A method descriptor could not be decoded.
    #[error(transparent)]
    InvalidDescriptor(#[from] DescriptorError),

    /// The same old key is mapped twice with different targets.
    #[error(transparent)]
    Duplicate(#[from] DuplicateMapping),
}

/// A rejected mapping line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {kind}")]
pub struct MappingParseError {
    /// 1-based line number.
    pub line: usize,
    /// What was wrong with it.
    pub kind: ParseErrorKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Record {
    Package,
    Class,
    Field,
    Method,
}

impl Record {
    fn tag(self) -> &'static str {
        match self {
            Record::Package => "PK:",
            Record::Class => "CL:",
            Record::Field => "FD:",
            Record::Method => "MD:",
        }
    }

    fn arity(self) -> usize {
        match self {
            Record::Method => 4,
            _ => 2,
        }
    }
}

/// Parse SRG text into mutable [`Mappings`].
///
/// Stops at the first bad line.
pub fn parse_srg(text: &str) -> Result<Mappings, MappingParseError> {
    let mut mappings = Mappings::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }
        apply_line(&mut mappings, line).map_err(|kind| MappingParseError {
            line: idx + 1,
            kind,
        })?;
    }

    Ok(mappings)
}

fn apply_line(mappings: &mut Mappings, line: &str) -> Result<(), ParseErrorKind> {
    let (record, fields) = srg_record.parse(line).map_err(|_| ParseErrorKind::UnknownRecord {
        text: line.split_whitespace().next().unwrap_or(line).to_string(),
    })?;

    if fields.len() != record.arity() {
        return Err(ParseErrorKind::WrongFieldCount {
            record: record.tag(),
            expected: record.arity(),
            found: fields.len(),
        });
    }

    match record {
        Record::Package => mappings.put_package(fields[0], fields[1])?,
        Record::Class => mappings.put_type(
            TypeKey::from_internal_name(fields[0]),
            TypeKey::from_internal_name(fields[1]),
        )?,
        Record::Field => {
            let (old_owner, old_name) = split_member(fields[0])?;
            let (new_owner, new_name) = split_member(fields[1])?;
            mappings.put_field(
                FieldKey::new(old_owner, old_name),
                FieldKey::new(new_owner, new_name),
            )?
        }
        Record::Method => {
            let (old_owner, old_name) = split_member(fields[0])?;
            let old_sig = MethodSignature::from_descriptor(fields[1])?;
            let (new_owner, new_name) = split_member(fields[2])?;
            let new_sig = MethodSignature::from_descriptor(fields[3])?;
            mappings.put_method(
                MethodKey::new(old_owner, old_name, old_sig),
                MethodKey::new(new_owner, new_name, new_sig),
            )?
        }
    }

    Ok(())
}

fn split_member(member: &str) -> Result<(TypeKey, &str), ParseErrorKind> {
    match member.rsplit_once('/') {
        Some((owner, name)) if !owner.is_empty() && !name.is_empty() => {
            Ok((TypeKey::from_internal_name(owner), name))
        }
        _ => Err(ParseErrorKind::InvalidMemberName {
            name: member.to_string(),
        }),
    }
}

fn srg_record<'i>(input: &mut &'i str) -> ModalResult<(Record, Vec<&'i str>)> {
    let record = alt((
        "PK:".value(Record::Package),
        "CL:".value(Record::Class),
        "FD:".value(Record::Field),
        "MD:".value(Record::Method),
    ))
    .parse_next(input)?;
    let fields: Vec<&str> =
        repeat(0.., preceded(space1, take_till(1.., char::is_whitespace))).parse_next(input)?;
    space0.parse_next(input)?;
    Ok((record, fields))
}
