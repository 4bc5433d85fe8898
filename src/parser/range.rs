use crate::error::{LineplotError, Result};

/// Axis limits where either bound may be left open
pub type Bounds = (Option<f64>, Option<f64>);

/// Parse `low:high` axis limits, splitting once on `:`; an empty side is unbounded
pub fn parse_range(input: &str) -> Result<Bounds> {
    let (low, high) = input
        .split_once(':')
        .ok_or_else(|| LineplotError::InvalidRange(input.to_string()))?;
    Ok((parse_bound(input, low)?, parse_bound(input, high)?))
}

fn parse_bound(range: &str, bound: &str) -> Result<Option<f64>> {
    let trimmed = bound.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<f64>()
        .map(Some)
        .map_err(|_| LineplotError::InvalidRangeBound {
            range: range.to_string(),
            bound: bound.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_range_open_high() {
        assert_eq!(parse_range("1:"), Ok((Some(1.0), None)));
    }

    #[test]
    fn test_parse_range_open_low() {
        assert_eq!(parse_range(":5"), Ok((None, Some(5.0))));
    }

    #[test]
    fn test_parse_range_closed() {
        assert_eq!(parse_range("-2.5:1e3"), Ok((Some(-2.5), Some(1000.0))));
    }

    #[test]
    fn test_parse_range_fully_open() {
        assert_eq!(parse_range(":"), Ok((None, None)));
    }

    #[test]
    fn test_parse_range_missing_colon() {
        assert!(parse_range("5").is_err());
    }

    #[test]
    fn test_parse_range_bad_bound() {
        assert!(matches!(
            parse_range("1:x"),
            Err(LineplotError::InvalidRangeBound { .. })
        ));
        // Only the first colon splits
        assert!(parse_range("1:2:3").is_err());
    }
}
