// Shared nom helpers for the selector and legend grammars

use nom::{
    bytes::complete::take_till1,
    character::complete::multispace0,
    sequence::delimited,
    IResult,
};

/// Wrap a parser so surrounding whitespace is ignored
pub fn ws<'a, F, O>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

/// A non-empty run of characters up to (not including) a `,`
pub fn list_item(input: &str) -> IResult<&str, &str> {
    take_till1(|c: char| c == ',')(input)
}

/// A non-empty run of non-whitespace characters
pub fn word(input: &str) -> IResult<&str, &str> {
    take_till1(|c: char| c.is_whitespace())(input)
}
