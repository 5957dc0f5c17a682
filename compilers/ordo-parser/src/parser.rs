use nom::{
    branch::alt,
    bytes::complete::take_while,
    character::complete::{char, u32 as decimal},
    combinator::{all_consuming, map},
    multi::separated_list1,
    sequence::separated_pair,
    IResult,
};

use crate::error::LineError;
use crate::token::{RawId, RawToken};

pub const COLUMN_COUNT: usize = 10;
const EMPTY_FIELD: &str = "_";

fn columns(input: &str) -> IResult<&str, Vec<&str>> {
    separated_list1(char('\t'), take_while(|c| c != '\t'))(input)
}

/// `7`, `3-4` or `5.1`.
pub fn raw_id(input: &str) -> IResult<&str, RawId> {
    alt((
        map(separated_pair(decimal, char('-'), decimal), |(a, b)| {
            RawId::Range(a, b)
        }),
        map(separated_pair(decimal, char('.'), decimal), |(a, b)| {
            RawId::Empty(a, b)
        }),
        map(decimal, RawId::Word),
    ))(input)
}

fn optional(field: &str) -> Option<&str> {
    if field == EMPTY_FIELD {
        None
    } else {
        Some(field)
    }
}

/// Parses one non-comment, non-blank line.
///
/// Returns `Ok(None)` for multiword ranges and empty nodes: they are
/// well-formed but carry no basic-tree arc.
pub fn parse_line(line: &str) -> Result<Option<RawToken<'_>>, LineError> {
    let (_, cols) =
        all_consuming(columns)(line).map_err(|_| LineError::ColumnCount { found: 0 })?;
    if cols.len() != COLUMN_COUNT {
        return Err(LineError::ColumnCount { found: cols.len() });
    }

    let id = match all_consuming(raw_id)(cols[0]) {
        Ok((_, id)) => id,
        Err(_) => {
            return Err(LineError::InvalidId {
                value: cols[0].to_string(),
            })
        }
    };
    let id = match id {
        // HEAD 0 is the root sentinel, so word ids start at 1.
        RawId::Word(0) => {
            return Err(LineError::InvalidId {
                value: cols[0].to_string(),
            })
        }
        RawId::Word(id) => id,
        RawId::Range(..) | RawId::Empty(..) => return Ok(None),
    };

    let head = match all_consuming(decimal::<&str, nom::error::Error<&str>>)(cols[6]) {
        Ok((_, head)) => head,
        Err(_) => {
            return Err(LineError::InvalidHead {
                value: cols[6].to_string(),
            })
        }
    };

    let deprel = optional(cols[7])
        .filter(|d| !d.is_empty())
        .ok_or(LineError::MissingRelation)?;

    Ok(Some(RawToken {
        id,
        form: cols[1],
        lemma: optional(cols[2]),
        upos: optional(cols[3]),
        xpos: optional(cols[4]),
        feats: optional(cols[5]),
        head,
        deprel,
        deps: optional(cols[8]),
        misc: optional(cols[9]),
    }))
}
