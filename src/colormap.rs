// Named color palettes

use crate::error::{LineplotError, Result};
use plotters::style::RGBColor;

/// Prefix of the discrete line palettes
pub const LINE_PREFIX: &str = "line.";

/// Colormap used when none is given
pub const DEFAULT_COLORMAP: &str = "line.default";

/// Default colormap for marker faces
pub const DEFAULT_MARKER_COLORMAP: &str = "line.lighter";

const PALETTES: &[(&str, &[&str])] = &[
    (
        "default",
        &[
            "#000000", "#e61919", "#1e77e5", "#33a02b", "#ff8000", "#7e46b9", "#ff1ab3",
            "#b8752e", "#d8d80a", "#ff7f7f", "#efbaa3", "#99ccff", "#7fe2a3", "#ffcc00",
            "#cc99ff",
        ],
    ),
    (
        "lighter",
        &[
            "#b3b3b3", "#ff6666", "#99ccff", "#7fe2a3", "#ffcc00", "#cc99ff", "#ff99cc",
            "#f7b56e", "#ffff4d", "#ffb3b3", "#f3e6be",
        ],
    ),
    (
        "lighter+",
        &["#bfbfbf", "#fad1d1", "#d1e3fa", "#c6efc3", "#fce6cf", "#e5daf1", "#fccfe6"],
    ),
    (
        "lighter++",
        &["#f2f2f2", "#fce8e8", "#e8f1fc", "#ecfaeb", "#fdf3e7", "#f2edf8", "#fde7f3"],
    ),
    (
        "darker",
        &["#000000", "#983a1b", "#1b5398", "#267920", "#aa5909", "#583281", "#8a0f4d"],
    ),
    (
        "contrast1",
        &["#000000", "#e21919", "#00008c", "#39ac58", "#dfa920", "#cc66cc"],
    ),
    (
        "vivid",
        &["#a8a8a8", "#ff2300", "#008cf2", "#6bd69b", "#ffd675", "#9335ff", "#ff9300"],
    ),
    (
        "pair",
        &[
            "#000000", "#e61919", "#ffa299", "#1e77e5", "#99ccff", "#33a02b", "#7fe2a3",
            "#ff8000", "#ffd480", "#7e46b9", "#cc99ff",
        ],
    ),
    (
        "gdv",
        &[
            "#000000", "#ff1f5b", "#00cd6c", "#009ade", "#af58ba", "#ffc61e", "#f28522",
            "#a0b1ba", "#a6761d",
        ],
    ),
    ("gdv3", &["#000000", "#e9002d", "#ffaa00", "#00b000"]),
    ("cool3", &["#000000", "#ff33bb", "#4d88ff", "#ff4000"]),
    ("cold3", &["#000000", "#00c261", "#4d88ff", "#b366ff"]),
];

const CONTINUOUS: &[(&str, &[&str])] = &[
    (
        "viridis",
        &["#440154", "#3b528b", "#21918c", "#5ec962", "#fde725"],
    ),
    (
        "plasma",
        &["#0d0887", "#7e03a8", "#cc4778", "#f89540", "#f0f921"],
    ),
    ("gray", &["#000000", "#ffffff"]),
];

/// How a continuous colormap is discretized
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// Number of evenly spaced samples, both ends included
    Count(usize),
    /// Spacing between samples in `0..1`
    Size(f64),
}

impl Default for Step {
    fn default() -> Self {
        Step::Size(0.4)
    }
}

/// Parse `#rgb` or `#rrggbb`
pub fn parse_hex(s: &str) -> Result<RGBColor> {
    let invalid = || LineplotError::InvalidColor(s.to_string());
    let hex = s.strip_prefix('#').ok_or_else(invalid)?;
    let channel = |h: &str| u8::from_str_radix(h, 16).map_err(|_| invalid());
    match hex.len() {
        6 => Ok(RGBColor(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        3 => {
            let c = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
            Ok(RGBColor(c(0)?, c(1)?, c(2)?))
        }
        _ => Err(invalid()),
    }
}

fn lookup<'a>(table: &'a [(&str, &'a [&'a str])], name: &str) -> Option<&'a [&'a str]> {
    table.iter().find(|(n, _)| *n == name).map(|(_, c)| *c)
}

fn interpolate(anchors: &[RGBColor], t: f64) -> RGBColor {
    let t = t.clamp(0.0, 1.0);
    if anchors.len() == 1 {
        return anchors[0];
    }
    let scaled = t * (anchors.len() - 1) as f64;
    let i = (scaled.floor() as usize).min(anchors.len() - 2);
    let frac = scaled - i as f64;
    let (a, b) = (anchors[i], anchors[i + 1]);
    let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * frac).round() as u8;
    RGBColor(mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}

/// Colors of a named colormap.
///
/// Discrete palettes return their full list; continuous maps are sampled per `step`.
pub fn get_colors(name: &str, step: Step) -> Result<Vec<RGBColor>> {
    if let Some(colors) = name.strip_prefix(LINE_PREFIX).and_then(|n| lookup(PALETTES, n)) {
        return colors.iter().map(|c| parse_hex(c)).collect();
    }

    let anchors = lookup(CONTINUOUS, name)
        .ok_or_else(|| LineplotError::UnknownColormap(name.to_string()))?
        .iter()
        .map(|c| parse_hex(c))
        .collect::<Result<Vec<_>>>()?;

    let samples = match step {
        Step::Count(0) => Vec::new(),
        Step::Count(1) => vec![0.0],
        Step::Count(n) => (0..n).map(|i| i as f64 / (n - 1) as f64).collect(),
        Step::Size(s) if s > 0.0 => {
            let n = (1.0 / s).ceil() as usize;
            (0..n).map(|i| i as f64 * s).collect()
        }
        Step::Size(s) => {
            return Err(LineplotError::invalid_option("colormap step", s.to_string()))
        }
    };

    Ok(samples.into_iter().map(|t| interpolate(&anchors, t)).collect())
}

/// Colors of a colormap as used by a property cycle: `line.` palettes drop their
/// leading dark color when `skip_header` is set.
pub fn cycle_colors(name: &str, skip_header: bool) -> Result<Vec<RGBColor>> {
    let mut colors = get_colors(name, Step::default())?;
    if skip_header && name.starts_with(LINE_PREFIX) && colors.len() > 1 {
        colors.remove(0);
    }
    Ok(colors)
}

/// Names of every registered colormap
pub fn available() -> Vec<String> {
    PALETTES
        .iter()
        .map(|(n, _)| format!("{}{}", LINE_PREFIX, n))
        .chain(CONTINUOUS.iter().map(|(n, _)| n.to_string()))
        .collect()
}
