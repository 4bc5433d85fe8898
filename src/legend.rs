// Legend location parsing and placement

use crate::error::{LineplotError, Result};
use crate::parser::lexer::{word, ws};
use crate::parser::style::{parse_style, StyleValue};
use log::warn;
use nom::{
    combinator::{all_consuming, opt},
    sequence::pair,
    IResult,
};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vertical {
    Lower,
    Center,
    Upper,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Horizontal {
    Left,
    Center,
    Right,
}

/// Which corner (or edge midpoint) of the legend box sits on the anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegendLoc {
    pub vertical: Vertical,
    pub horizontal: Horizontal,
}

impl fmt::Display for LegendLoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = match self.vertical {
            Vertical::Lower => "lower",
            Vertical::Center => "center",
            Vertical::Upper => "upper",
        };
        let h = match self.horizontal {
            Horizontal::Left => "left",
            Horizontal::Center => "center",
            Horizontal::Right => "right",
        };
        if self.vertical == Vertical::Center && self.horizontal == Horizontal::Center {
            write!(f, "center")
        } else {
            write!(f, "{} {}", v, h)
        }
    }
}

/// Where the legend goes
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// Pick the emptiest corner once the data is known
    Best,
    /// Put the `loc` point of the legend on `anchor` (normalized axes coordinates)
    Anchored { anchor: (f64, f64), loc: LegendLoc },
}

impl LegendLoc {
    pub fn new(vertical: Vertical, horizontal: Horizontal) -> Self {
        Self {
            vertical,
            horizontal,
        }
    }

    /// The point of the unit box matching this location
    pub fn corner(&self) -> (f64, f64) {
        let x = match self.horizontal {
            Horizontal::Left => 0.0,
            Horizontal::Center => 0.5,
            Horizontal::Right => 1.0,
        };
        let y = match self.vertical {
            Vertical::Lower => 0.0,
            Vertical::Center => 0.5,
            Vertical::Upper => 1.0,
        };
        (x, y)
    }

    pub fn anchored(self) -> Placement {
        Placement::Anchored {
            anchor: self.corner(),
            loc: self,
        }
    }
}

fn location_words(input: &str) -> IResult<&str, (&str, Option<&str>)> {
    pair(ws(word), opt(ws(word)))(input)
}

/// Resolve a vertical token to (anchor y, legend side)
fn vertical_token(token: &str, padding: f64) -> Option<(f64, Vertical)> {
    match token {
        "lower" => Some((0.0, Vertical::Lower)),
        "center" => Some((0.5, Vertical::Center)),
        "upper" => Some((1.0, Vertical::Upper)),
        "outlower" => Some((-padding, Vertical::Upper)),
        "outupper" => Some((1.0 + padding, Vertical::Lower)),
        _ => None,
    }
}

/// Resolve a horizontal token to (anchor x, legend side)
fn horizontal_token(token: &str, padding: f64) -> Option<(f64, Horizontal)> {
    match token {
        "left" => Some((0.0, Horizontal::Left)),
        "center" => Some((0.5, Horizontal::Center)),
        "right" => Some((1.0, Horizontal::Right)),
        "outleft" => Some((-padding, Horizontal::Right)),
        "outright" => Some((1.0 + padding, Horizontal::Left)),
        _ => None,
    }
}

/// Parse a legend location such as `upper right`, `best` or `outupper right`.
///
/// `out*` keywords anchor the legend `padding` beyond the axes and flip to the
/// opposite side, so the legend grows away from the axes.
pub fn resolve_location(input: &str, padding: f64) -> Result<Placement> {
    let invalid = || LineplotError::InvalidLegendLocation(input.to_string());
    let (_, (first, second)) = all_consuming(location_words)(input).map_err(|_| invalid())?;

    let second = match second {
        Some(second) => second,
        None => {
            let (v, h) = match first {
                "best" => return Ok(Placement::Best),
                "center" => (Vertical::Center, Horizontal::Center),
                "left" => (Vertical::Center, Horizontal::Left),
                "right" => (Vertical::Center, Horizontal::Right),
                "upper" => (Vertical::Upper, Horizontal::Center),
                "lower" => (Vertical::Lower, Horizontal::Center),
                _ => return Err(invalid()),
            };
            return Ok(LegendLoc::new(v, h).anchored());
        }
    };

    let (y, vertical) = vertical_token(first, padding).ok_or_else(invalid)?;
    let (x, horizontal) = horizontal_token(second, padding).ok_or_else(invalid)?;
    Ok(Placement::Anchored {
        anchor: (x, y),
        loc: LegendLoc::new(vertical, horizontal),
    })
}

/// Choose the corner holding the fewest points (normalized axes coordinates).
/// Ties go to the earlier of upper right, upper left, lower left, lower right.
pub fn best_location(points: &[(f64, f64)]) -> LegendLoc {
    let candidates = [
        LegendLoc::new(Vertical::Upper, Horizontal::Right),
        LegendLoc::new(Vertical::Upper, Horizontal::Left),
        LegendLoc::new(Vertical::Lower, Horizontal::Left),
        LegendLoc::new(Vertical::Lower, Horizontal::Right),
    ];
    let in_quadrant = |loc: &LegendLoc, (x, y): (f64, f64)| {
        let right = x >= 0.5;
        let upper = y >= 0.5;
        (loc.horizontal == Horizontal::Right) == right && (loc.vertical == Vertical::Upper) == upper
    };
    candidates
        .into_iter()
        .min_by_key(|loc| points.iter().filter(|&&p| in_quadrant(loc, p)).count())
        .unwrap_or(candidates[0])
}

/// Upper-left pixel of a legend box of `legend` size placed inside a plot area of
/// `area` size. `inset` keeps the box off the anchor edges.
pub fn legend_origin(
    anchor: (f64, f64),
    loc: LegendLoc,
    area: (u32, u32),
    legend: (u32, u32),
    inset: i32,
) -> (i32, i32) {
    let ax = (anchor.0 * area.0 as f64).round() as i32;
    let ay = ((1.0 - anchor.1) * area.1 as f64).round() as i32;
    let (lw, lh) = (legend.0 as i32, legend.1 as i32);
    let x = match loc.horizontal {
        Horizontal::Left => ax + inset,
        Horizontal::Center => ax - lw / 2,
        Horizontal::Right => ax - lw - inset,
    };
    let y = match loc.vertical {
        Vertical::Upper => ay + inset,
        Vertical::Center => ay - lh / 2,
        Vertical::Lower => ay - lh - inset,
    };
    (x, y)
}

/// Legend settings built from the `--legend` flag
#[derive(Debug, Clone, PartialEq)]
pub struct LegendOptions {
    pub placement: Placement,
    /// Draw a frame around the legend
    pub frame: bool,
    pub linewidth: f64,
    /// Distance of out-of-axes legends from the axes
    pub padding: f64,
    pub font_size: Option<f64>,
}

impl LegendOptions {
    pub fn with_frame(frame: bool) -> Self {
        Self {
            placement: Placement::Best,
            frame,
            linewidth: 0.5,
            padding: 0.0,
            font_size: None,
        }
    }

    /// Build options from a `key=value` string (`loc`, `box`, `linewidth`, `padding`,
    /// `fontsize`)
    pub fn parse(input: &str, default_frame: bool) -> Result<Self> {
        let map = parse_style(Some(input), &[])?;
        let mut options = Self::with_frame(default_frame);
        let mut loc = "best".to_string();
        let number = |key: &'static str, v: &StyleValue| {
            v.as_f64()
                .ok_or_else(|| LineplotError::invalid_option(key, v.to_string()))
        };

        for (key, value) in &map {
            match key.as_str() {
                "loc" => loc = value.to_string(),
                "box" | "frameon" => {
                    options.frame = value
                        .as_bool()
                        .ok_or_else(|| LineplotError::invalid_option("box", value.to_string()))?
                }
                "linewidth" => options.linewidth = number("linewidth", value)?,
                "padding" => options.padding = number("padding", value)?,
                "fontsize" => options.font_size = Some(number("fontsize", value)?),
                other => warn!("ignoring unsupported legend option '{}'", other),
            }
        }

        options.placement = resolve_location(&loc, options.padding)?;
        Ok(options)
    }
}

/// Interpret the `--legend` flag.
///
/// Absent or `true` shows the default legend and `false` hides it. Any other value is
/// read as a legend options string, with the legend shown.
pub fn parse_legend_flag(flag: Option<&str>, default_frame: bool) -> Result<Option<LegendOptions>> {
    let flag = match flag {
        None => return Ok(Some(LegendOptions::with_frame(default_frame))),
        Some(f) => f,
    };
    match flag.to_lowercase().as_str() {
        "true" => Ok(Some(LegendOptions::with_frame(default_frame))),
        "false" => Ok(None),
        _ => LegendOptions::parse(flag, default_frame).map(Some),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outupper_right() {
        let placement = resolve_location("outupper right", 0.05).unwrap();
        match placement {
            Placement::Anchored { anchor, loc } => {
                assert_eq!(anchor.0, 1.0);
                assert!((anchor.1 - 1.05).abs() < 1e-12);
                assert_eq!(loc.to_string(), "lower right");
            }
            Placement::Best => panic!("Expected anchored placement"),
        }
    }

    #[test]
    fn test_out_tokens_flip_sides() {
        let cases = [
            ("outlower left", (0.0, -0.1), "upper left"),
            ("center outright", (1.1, 0.5), "center left"),
            ("upper outleft", (-0.1, 1.0), "upper right"),
            ("outlower outleft", (-0.1, -0.1), "upper right"),
        ];
        for (input, expected_anchor, expected_loc) in cases {
            match resolve_location(input, 0.1).unwrap() {
                Placement::Anchored { anchor, loc } => {
                    assert!((anchor.0 - expected_anchor.0).abs() < 1e-12, "{}", input);
                    assert!((anchor.1 - expected_anchor.1).abs() < 1e-12, "{}", input);
                    assert_eq!(loc.to_string(), expected_loc, "{}", input);
                }
                Placement::Best => panic!("Expected anchored placement for {}", input),
            }
        }
    }

    #[test]
    fn test_in_box_location_keeps_loc() {
        assert_eq!(
            resolve_location("upper left", 0.3).unwrap(),
            Placement::Anchored {
                anchor: (0.0, 1.0),
                loc: LegendLoc::new(Vertical::Upper, Horizontal::Left),
            }
        );
    }

    #[test]
    fn test_single_word_locations() {
        assert_eq!(resolve_location("best", 0.0).unwrap(), Placement::Best);
        assert_eq!(
            resolve_location(" right ", 0.0).unwrap(),
            LegendLoc::new(Vertical::Center, Horizontal::Right).anchored()
        );
    }

    #[test]
    fn test_invalid_locations() {
        assert!(resolve_location("", 0.0).is_err());
        assert!(resolve_location("outupper", 0.0).is_err());
        assert!(resolve_location("left upper", 0.0).is_err());
        assert!(resolve_location("upper right extra", 0.0).is_err());
    }

    #[test]
    fn test_best_location_prefers_empty_corner() {
        // Data rising from lower left to upper right leaves upper left empty
        let points: Vec<_> = (0..10).map(|i| (i as f64 / 10.0, i as f64 / 10.0)).collect();
        assert_eq!(
            best_location(&points),
            LegendLoc::new(Vertical::Upper, Horizontal::Left)
        );
        assert_eq!(
            best_location(&[]),
            LegendLoc::new(Vertical::Upper, Horizontal::Right)
        );
    }

    #[test]
    fn test_legend_origin() {
        let area = (400, 300);
        let legend = (100, 50);
        let upper_right = LegendLoc::new(Vertical::Upper, Horizontal::Right);
        assert_eq!(legend_origin((1.0, 1.0), upper_right, area, legend, 5), (295, 5));

        let lower_left = LegendLoc::new(Vertical::Lower, Horizontal::Left);
        assert_eq!(legend_origin((0.0, 0.0), lower_left, area, legend, 0), (0, 250));

        // Above the axes, right-aligned
        let lower_right = LegendLoc::new(Vertical::Lower, Horizontal::Right);
        assert_eq!(legend_origin((1.0, 1.1), lower_right, area, legend, 0), (300, -80));
    }

    #[test]
    fn test_legend_flag_bool() {
        assert_eq!(parse_legend_flag(Some("False"), false).unwrap(), None);
        assert_eq!(
            parse_legend_flag(Some("true"), true).unwrap(),
            Some(LegendOptions::with_frame(true))
        );
        assert_eq!(
            parse_legend_flag(None, false).unwrap(),
            Some(LegendOptions::with_frame(false))
        );
    }

    #[test]
    fn test_legend_flag_options_string() {
        let options = parse_legend_flag(Some("loc=lower left,box=true,fontsize=10"), false)
            .unwrap()
            .unwrap();
        assert!(options.frame);
        assert_eq!(options.font_size, Some(10.0));
        assert_eq!(
            options.placement,
            LegendLoc::new(Vertical::Lower, Horizontal::Left).anchored()
        );
    }

    #[test]
    fn test_legend_flag_options_out_location() {
        let options = parse_legend_flag(Some("loc=upper outright,padding=0.1"), false)
            .unwrap()
            .unwrap();
        match options.placement {
            Placement::Anchored { anchor, loc } => {
                assert!((anchor.0 - 1.1).abs() < 1e-12);
                assert_eq!(anchor.1, 1.0);
                assert_eq!(loc.to_string(), "upper left");
            }
            Placement::Best => panic!("Expected anchored placement"),
        }
    }

    #[test]
    fn test_legend_flag_bad_option() {
        assert!(parse_legend_flag(Some("box=maybe"), false).is_err());
        assert!(parse_legend_flag(Some("loc=somewhere"), false).is_err());
        assert!(parse_legend_flag(Some("nonsense"), false).is_err());
    }
}
