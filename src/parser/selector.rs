// Column selector grammar
//
//   x        := column
//   y        := range | column ("," column)*
//   range    := bound? ":" bound?
//   column   := "0" (row index) | positive integer (1-based position) | name

use super::lexer::list_item;
use crate::error::{LineplotError, Result};
use nom::{
    bytes::complete::take_till,
    character::complete::char,
    combinator::{all_consuming, rest},
    multi::separated_list1,
    sequence::separated_pair,
    IResult,
};

/// A single column reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnRef {
    /// The implicit row index
    Index,
    /// 1-based column position
    Position(usize),
    /// Column title
    Name(String),
}

/// A y-axis selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// 1-based, half-open range of column positions; `None` is an open bound
    Range {
        start: Option<usize>,
        end: Option<usize>,
    },
    List(Vec<ColumnRef>),
}

/// Parse a single column token.
///
/// Integer tokens are positions (`0` being the index), anything else is a title.
/// Whitespace around an integer is ignored; a title is matched exactly as given.
pub fn parse_column_ref(token: &str) -> Result<ColumnRef> {
    match token.trim().parse::<i64>() {
        Ok(0) => Ok(ColumnRef::Index),
        Ok(v) if v > 0 => Ok(ColumnRef::Position(v as usize)),
        Ok(_) => Err(LineplotError::InvalidSelector(token.to_string())),
        Err(_) => Ok(ColumnRef::Name(token.to_string())),
    }
}

fn range_parts(input: &str) -> IResult<&str, (&str, &str)> {
    separated_pair(take_till(|c: char| c == ':'), char(':'), rest)(input)
}

fn list_parts(input: &str) -> IResult<&str, Vec<&str>> {
    separated_list1(char(','), list_item)(input)
}

fn parse_bound(range: &str, bound: &str) -> Result<Option<usize>> {
    let trimmed = bound.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.parse::<usize>() {
        Ok(v) if v > 0 => Ok(Some(v)),
        _ => Err(LineplotError::InvalidRangeBound {
            range: range.to_string(),
            bound: bound.to_string(),
        }),
    }
}

/// Parse a y selector: a `start:end` range or a comma-separated list of columns
pub fn parse_selector(input: &str) -> Result<Selector> {
    if input.contains(':') {
        let (_, (start, end)) = all_consuming(range_parts)(input)
            .map_err(|_| LineplotError::InvalidSelector(input.to_string()))?;
        return Ok(Selector::Range {
            start: parse_bound(input, start)?,
            end: parse_bound(input, end)?,
        });
    }

    let (_, tokens) = all_consuming(list_parts)(input)
        .map_err(|_| LineplotError::InvalidSelector(input.to_string()))?;
    let columns = tokens
        .into_iter()
        .map(parse_column_ref)
        .collect::<Result<Vec<_>>>()?;
    Ok(Selector::List(columns))
}
