// key=value style strings and typed token coercion

use crate::error::{LineplotError, Result};
use indexmap::IndexMap;
use std::fmt;

/// Short keys accepted in style strings and their full names
pub const STYLE_ALIASES: &[(&str, &str)] = &[
    ("lt", "linestyle"),
    ("pt", "marker"),
    ("ps", "markersize"),
    ("fill", "fillstyle"),
    ("edgecolor", "markeredgecolor"),
    ("facecolor", "markerfacecolor"),
];

/// A coerced style value
#[derive(Debug, Clone, PartialEq)]
pub enum StyleValue {
    Bool(bool),
    None,
    Float(f64),
    Int(i64),
    Str(String),
}

/// Ordered mapping of style key to value
pub type StyleMap = IndexMap<String, StyleValue>;

impl StyleValue {
    /// Numeric view of the value (ints widen to floats)
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            StyleValue::Float(v) => Some(*v),
            StyleValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            StyleValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            StyleValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleValue::Bool(b) => write!(f, "{}", b),
            StyleValue::None => write!(f, "none"),
            StyleValue::Float(v) => write!(f, "{}", v),
            StyleValue::Int(v) => write!(f, "{}", v),
            StyleValue::Str(s) => write!(f, "{}", s),
        }
    }
}

/// Coerce a raw token into a typed value.
///
/// Precedence: `true`/`false`/`none` (any case), then a float if the token contains
/// `.` or `e`, then an integer, otherwise the raw string. A failed float or integer
/// parse falls back to the string, so `e5` stays `"e5"` while `1e3` becomes 1000.0.
/// Only a lowercase `e` triggers the float attempt: `1E3` is the string `"1E3"`.
pub fn coerce(token: &str) -> StyleValue {
    match token.to_lowercase().as_str() {
        "true" => return StyleValue::Bool(true),
        "false" => return StyleValue::Bool(false),
        "none" => return StyleValue::None,
        _ => {}
    }

    let trimmed = token.trim();
    if token.contains('.') || token.contains('e') {
        return match trimmed.parse::<f64>() {
            Ok(v) => StyleValue::Float(v),
            Err(_) => StyleValue::Str(token.to_string()),
        };
    }

    match trimmed.parse::<i64>() {
        Ok(v) => StyleValue::Int(v),
        Err(_) => StyleValue::Str(token.to_string()),
    }
}

fn resolve_alias(key: &str, aliases: &[(&str, &str)]) -> String {
    aliases
        .iter()
        .find(|(short, _)| *short == key)
        .map(|(_, full)| full.to_string())
        .unwrap_or_else(|| key.to_string())
}

fn split_segment(segment: &str) -> Result<(&str, &str)> {
    segment
        .split_once('=')
        .ok_or_else(|| LineplotError::MissingAssignment(segment.to_string()))
}

/// Parse `key=value,key2=value2,...` into an ordered style mapping.
///
/// Keys are looked up in `aliases`; a repeated key keeps its first position and its
/// last value.
pub fn parse_style(input: Option<&str>, aliases: &[(&str, &str)]) -> Result<StyleMap> {
    let mut map = StyleMap::new();
    let input = match input {
        Some(s) if !s.is_empty() => s,
        _ => return Ok(map),
    };

    for segment in input.split(',') {
        let (key, value) = split_segment(segment)?;
        map.insert(resolve_alias(key, aliases), coerce(value));
    }

    Ok(map)
}

/// Parse `key=v1|v2,key2=v3|v4` into property lists for a prop cycle
pub fn parse_cycle(
    input: Option<&str>,
    aliases: &[(&str, &str)],
) -> Result<Vec<(String, Vec<StyleValue>)>> {
    let input = match input {
        Some(s) if !s.is_empty() => s,
        _ => return Ok(Vec::new()),
    };

    input
        .split(',')
        .map(|segment| {
            let (key, values) = split_segment(segment)?;
            Ok((
                resolve_alias(key, aliases),
                values.split('|').map(coerce).collect(),
            ))
        })
        .collect()
}
