use crate::error::{LineplotError, Result};
use crate::parser::range::Bounds;
use crate::theme::AutolimitMode;
use std::str::FromStr;

/// Axes drawn on a log10 scale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogAxes {
    X,
    Y,
    All,
}

impl FromStr for LogAxes {
    type Err = LineplotError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "x" => Ok(LogAxes::X),
            "y" => Ok(LogAxes::Y),
            "all" | "both" => Ok(LogAxes::All),
            _ => Err(LineplotError::invalid_option("log axes", s)),
        }
    }
}

impl LogAxes {
    pub fn x(self) -> bool {
        matches!(self, LogAxes::X | LogAxes::All)
    }

    pub fn y(self) -> bool {
        matches!(self, LogAxes::Y | LogAxes::All)
    }
}

/// Map values to log10 space; non-positive values become NaN
pub fn log_transform(values: &[f64]) -> Vec<f64> {
    values
        .iter()
        .map(|&v| if v > 0.0 { v.log10() } else { f64::NAN })
        .collect()
}

/// Minimum and maximum of the finite values, if any
pub fn data_extent<I: IntoIterator<Item = f64>>(values: I) -> Option<(f64, f64)> {
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// A 1, 2 or 5 times a power of ten step giving about five ticks over `span`
pub fn nice_step(span: f64) -> f64 {
    let raw = span / 5.0;
    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let factor = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    factor * magnitude
}

/// Automatic axis limits for a data extent
pub fn auto_limits(extent: Option<(f64, f64)>, mode: AutolimitMode) -> (f64, f64) {
    let (min, max) = match extent {
        Some(e) => e,
        None => return (0.0, 1.0),
    };
    if min == max {
        return (min - 1.0, max + 1.0);
    }
    match mode {
        AutolimitMode::Data => (min, max),
        AutolimitMode::RoundNumbers => {
            let step = nice_step(max - min);
            ((min / step).floor() * step, (max / step).ceil() * step)
        }
    }
}

/// Automatic limits for an axis already in log10 space. `RoundNumbers` widens to
/// whole decades.
pub fn auto_log_limits(extent: Option<(f64, f64)>, mode: AutolimitMode) -> (f64, f64) {
    let (min, max) = match extent {
        Some(e) => e,
        None => return (0.0, 1.0),
    };
    let (lo, hi) = match mode {
        AutolimitMode::Data => (min, max),
        AutolimitMode::RoundNumbers => (min.floor(), max.ceil()),
    };
    if lo == hi {
        (lo - 1.0, hi + 1.0)
    } else {
        (lo, hi)
    }
}

/// Override automatic limits with any explicitly given bound. A lone bound that
/// crosses the automatic opposite side moves that side by the automatic span.
pub fn apply_bounds(auto: (f64, f64), bounds: Bounds) -> (f64, f64) {
    let span = auto.1 - auto.0;
    match bounds {
        (Some(lo), None) if lo >= auto.1 => (lo, lo + span),
        (None, Some(hi)) if hi <= auto.0 => (hi - span, hi),
        (lo, hi) => (lo.unwrap_or(auto.0), hi.unwrap_or(auto.1)),
    }
}

fn trim_number(v: f64, decimals: usize) -> String {
    let s = format!("{:.*}", decimals, v);
    let s = if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    };
    if s == "-0" {
        "0".to_string()
    } else {
        s
    }
}

/// Label for a linear-axis tick. Magnitudes at or beyond `10^power_limit` (or at or
/// below `10^-power_limit`) use `m×10^k` notation.
pub fn format_tick(v: f64, power_limit: i32) -> String {
    if v == 0.0 || !v.is_finite() {
        return trim_number(v, 0);
    }
    let exponent = v.abs().log10().floor() as i32;
    if exponent >= power_limit || exponent <= -power_limit {
        let mantissa = v / 10f64.powi(exponent);
        format!("{}×10^{}", trim_number(mantissa, 2), exponent)
    } else {
        trim_number(v, 6)
    }
}

/// Label for a tick on a log axis, where `v` is the log10 of the data value
pub fn format_log_tick(v: f64) -> String {
    let rounded = v.round();
    if (v - rounded).abs() > 1e-9 {
        return trim_number(10f64.powf(v), 3);
    }
    let exponent = rounded as i32;
    if (-2..=3).contains(&exponent) {
        trim_number(10f64.powi(exponent), 2)
    } else {
        format!("10^{}", exponent)
    }
}
