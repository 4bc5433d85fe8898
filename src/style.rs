// Typed per-series styles built from parsed style maps

use crate::colormap::parse_hex;
use crate::cycle::CycleEntry;
use crate::error::{LineplotError, Result};
use crate::parser::style::{StyleMap, StyleValue};
use log::warn;
use plotters::style::RGBColor;
use std::str::FromStr;

/// Line dash pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Solid,
    Dashed,
    Dotted,
    DashDot,
    /// No connecting line (markers only)
    Hidden,
}

impl FromStr for LineKind {
    type Err = LineplotError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "-" | "solid" => Ok(LineKind::Solid),
            "--" | "dashed" => Ok(LineKind::Dashed),
            ":" | "dotted" => Ok(LineKind::Dotted),
            "-." | "dashdot" => Ok(LineKind::DashDot),
            "" | " " | "None" | "none" => Ok(LineKind::Hidden),
            _ => Err(LineplotError::invalid_option("linestyle", s)),
        }
    }
}

/// Marker glyph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Circle,
    Square,
    TriangleUp,
    TriangleDown,
    Diamond,
    Cross,
    Plus,
    Star,
    Point,
}

impl FromStr for Marker {
    type Err = LineplotError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "o" | "circle" => Ok(Marker::Circle),
            "s" | "square" => Ok(Marker::Square),
            "^" | "triangle" => Ok(Marker::TriangleUp),
            "v" => Ok(Marker::TriangleDown),
            "D" | "d" | "diamond" => Ok(Marker::Diamond),
            "x" => Ok(Marker::Cross),
            "+" => Ok(Marker::Plus),
            "*" | "star" => Ok(Marker::Star),
            "." => Ok(Marker::Point),
            _ => Err(LineplotError::invalid_option("marker", s)),
        }
    }
}

/// Marker fill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillKind {
    #[default]
    Full,
    /// Hollow markers
    Empty,
}

impl FromStr for FillKind {
    type Err = LineplotError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "full" => Ok(FillKind::Full),
            "none" => Ok(FillKind::Empty),
            _ => Err(LineplotError::invalid_option("fillstyle", s)),
        }
    }
}

/// Style options for one series. `None` fields fall back to render defaults.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SeriesStyle {
    pub color: Option<RGBColor>,
    pub linestyle: Option<LineKind>,
    pub linewidth: Option<f64>,
    pub marker: Option<Marker>,
    pub markersize: Option<f64>,
    pub fillstyle: FillKind,
    pub markeredgecolor: Option<RGBColor>,
    pub markerfacecolor: Option<RGBColor>,
    pub alpha: Option<f64>,
    pub label: Option<String>,
}

/// Parse a color name, single-letter code or hex string
pub fn parse_color(s: &str) -> Result<RGBColor> {
    let color = match s {
        "k" | "black" => RGBColor(0, 0, 0),
        "w" | "white" => RGBColor(255, 255, 255),
        "r" | "red" => RGBColor(255, 0, 0),
        "g" | "green" => RGBColor(0, 128, 0),
        "b" | "blue" => RGBColor(0, 0, 255),
        "y" | "yellow" => RGBColor(191, 191, 0),
        "c" | "cyan" => RGBColor(0, 191, 191),
        "m" | "magenta" => RGBColor(191, 0, 191),
        "gray" | "grey" => RGBColor(128, 128, 128),
        "orange" => RGBColor(255, 165, 0),
        "purple" => RGBColor(128, 0, 128),
        "brown" => RGBColor(165, 42, 42),
        "pink" => RGBColor(255, 192, 203),
        _ => return parse_hex(s),
    };
    Ok(color)
}

fn expect_str<'a>(option: &'static str, value: &'a StyleValue) -> Result<&'a str> {
    value
        .as_str()
        .ok_or_else(|| LineplotError::invalid_option(option, value.to_string()))
}

fn expect_f64(option: &'static str, value: &StyleValue) -> Result<f64> {
    value
        .as_f64()
        .ok_or_else(|| LineplotError::invalid_option(option, value.to_string()))
}

fn expect_color(option: &'static str, value: &StyleValue) -> Result<RGBColor> {
    parse_color(expect_str(option, value)?)
}

impl SeriesStyle {
    /// Convert a style map into typed options.
    ///
    /// Unknown keys are logged and ignored; known keys with unusable values fail.
    pub fn from_map(map: &StyleMap) -> Result<Self> {
        let mut style = SeriesStyle::default();
        for (key, value) in map {
            match key.as_str() {
                "color" | "c" => style.color = Some(expect_color("color", value)?),
                "linestyle" | "ls" => {
                    style.linestyle = Some(match value {
                        StyleValue::None => LineKind::Hidden,
                        v => expect_str("linestyle", v)?.parse()?,
                    })
                }
                "linewidth" | "lw" => style.linewidth = Some(expect_f64("linewidth", value)?),
                "marker" => {
                    style.marker = match value {
                        StyleValue::None => None,
                        v => Some(expect_str("marker", v)?.parse()?),
                    }
                }
                "markersize" | "ms" => style.markersize = Some(expect_f64("markersize", value)?),
                "fillstyle" => {
                    style.fillstyle = match value {
                        StyleValue::None => FillKind::Empty,
                        v => expect_str("fillstyle", v)?.parse()?,
                    }
                }
                "markeredgecolor" | "mec" => {
                    style.markeredgecolor = Some(expect_color("markeredgecolor", value)?)
                }
                "markerfacecolor" | "mfc" => {
                    style.markerfacecolor = Some(expect_color("markerfacecolor", value)?)
                }
                "alpha" => {
                    let alpha = expect_f64("alpha", value)?;
                    if !(0.0..=1.0).contains(&alpha) {
                        return Err(LineplotError::invalid_option("alpha", value.to_string()));
                    }
                    style.alpha = Some(alpha);
                }
                "label" => style.label = Some(value.to_string()),
                other => warn!("ignoring unsupported style key '{}'", other),
            }
        }
        Ok(style)
    }

    /// Style for the next series: cycle properties overridden by the explicit map,
    /// with the cycle's color and marker face filling any gaps.
    pub fn for_series(map: &StyleMap, entry: &CycleEntry) -> Result<Self> {
        let mut merged = entry.props.clone();
        merged.extend(map.iter().map(|(k, v)| (k.clone(), v.clone())));

        let mut style = Self::from_map(&merged)?;
        style.color.get_or_insert(entry.color);
        if style.markerfacecolor.is_none() {
            style.markerfacecolor = entry.marker_face;
        }
        Ok(style)
    }

    /// Whether a connecting line is drawn
    pub fn draws_line(&self) -> bool {
        self.linestyle != Some(LineKind::Hidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::style::{parse_style, STYLE_ALIASES};

    fn style_of(s: &str) -> Result<SeriesStyle> {
        SeriesStyle::from_map(&parse_style(Some(s), STYLE_ALIASES)?)
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("r").unwrap(), RGBColor(255, 0, 0));
        assert_eq!(parse_color("black").unwrap(), RGBColor(0, 0, 0));
        assert_eq!(parse_color("#1e77e5").unwrap(), RGBColor(30, 119, 229));
        assert_eq!(
            parse_color("chartreuse"),
            Err(LineplotError::InvalidColor("chartreuse".to_string()))
        );
    }

    #[test]
    fn test_from_map_full() {
        let style = style_of("lt=--,pt=o,ps=4,lw=2.5,color=#ff0000,fill=none,alpha=0.5").unwrap();
        assert_eq!(style.linestyle, Some(LineKind::Dashed));
        assert_eq!(style.marker, Some(Marker::Circle));
        assert_eq!(style.markersize, Some(4.0));
        assert_eq!(style.linewidth, Some(2.5));
        assert_eq!(style.color, Some(RGBColor(255, 0, 0)));
        assert_eq!(style.fillstyle, FillKind::Empty);
        assert_eq!(style.alpha, Some(0.5));
    }

    #[test]
    fn test_linestyle_none_hides_line() {
        let style = style_of("lt=none,pt=s").unwrap();
        assert_eq!(style.linestyle, Some(LineKind::Hidden));
        assert!(!style.draws_line());
        assert!(SeriesStyle::default().draws_line());
    }

    #[test]
    fn test_unknown_key_ignored() {
        let style = style_of("zorder=3").unwrap();
        assert_eq!(style, SeriesStyle::default());
    }

    #[test]
    fn test_bad_values_rejected() {
        assert!(style_of("lw=thick").is_err());
        assert!(style_of("pt=@").is_err());
        assert!(style_of("alpha=2").is_err());
        assert!(style_of("lt=~").is_err());
    }

    #[test]
    fn test_label_from_any_value() {
        assert_eq!(style_of("label=5").unwrap().label, Some("5".to_string()));
    }

    #[test]
    fn test_for_series_merges_cycle() {
        let entry = CycleEntry {
            color: RGBColor(1, 2, 3),
            marker_face: Some(RGBColor(4, 5, 6)),
            props: parse_style(Some("linestyle=--,marker=o"), &[]).unwrap(),
        };
        let explicit = parse_style(Some("pt=s"), STYLE_ALIASES).unwrap();
        let style = SeriesStyle::for_series(&explicit, &entry).unwrap();
        assert_eq!(style.color, Some(RGBColor(1, 2, 3)));
        assert_eq!(style.markerfacecolor, Some(RGBColor(4, 5, 6)));
        assert_eq!(style.linestyle, Some(LineKind::Dashed));
        // Explicit style wins over the cycle
        assert_eq!(style.marker, Some(Marker::Square));
    }

    #[test]
    fn test_for_series_explicit_color_wins() {
        let entry = CycleEntry {
            color: RGBColor(1, 2, 3),
            marker_face: None,
            props: StyleMap::new(),
        };
        let explicit = parse_style(Some("color=k"), STYLE_ALIASES).unwrap();
        let style = SeriesStyle::for_series(&explicit, &entry).unwrap();
        assert_eq!(style.color, Some(RGBColor(0, 0, 0)));
    }
}
