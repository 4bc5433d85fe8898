// Subplot grid inference and figure sizing

use crate::error::{LineplotError, Result};
use log::debug;
use std::str::FromStr;

/// Two subplot centers closer than this (normalized figure units) share a row/column
pub const BIN_TOLERANCE: f64 = 0.1;

/// How the figure shrinks as the subplot grid grows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScalingMode {
    /// No shrinking
    Linear,
    /// Shrink by `n^-0.25`
    #[default]
    Qrt,
    /// Shrink by `n^-0.5`
    Sqrt,
    /// Shrink by `1/n`, keeping the figure the size of one subplot
    Same,
}

impl FromStr for ScalingMode {
    type Err = LineplotError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "linear" => Ok(ScalingMode::Linear),
            "qrt" => Ok(ScalingMode::Qrt),
            "sqrt" => Ok(ScalingMode::Sqrt),
            "same" => Ok(ScalingMode::Same),
            _ => Err(LineplotError::invalid_option("scaling", s)),
        }
    }
}

impl ScalingMode {
    /// Size factor for a grid whose larger (aspect-corrected) dimension is `n`
    pub fn factor(self, n: f64) -> f64 {
        match self {
            ScalingMode::Linear => 1.0,
            ScalingMode::Qrt => n.powf(-0.25),
            ScalingMode::Sqrt => n.powf(-0.5),
            ScalingMode::Same => 1.0 / n,
        }
    }
}

/// Position of a subplot in normalized figure coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubplotRect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl SubplotRect {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn center(&self) -> (f64, f64) {
        ((self.x0 + self.x1) / 2.0, (self.y0 + self.y1) / 2.0)
    }
}

/// Grid of subplots as (rows, cols)
pub type Alignment = (usize, usize);

/// Count clusters in sorted values: a new bin starts whenever a value is more than
/// the tolerance past the first value of the current bin
fn count_bins(mut values: Vec<f64>) -> usize {
    values.sort_by(|a, b| a.total_cmp(b));
    let mut starts: Vec<f64> = Vec::new();
    for v in values {
        match starts.last() {
            Some(&last) if v - last <= BIN_TOLERANCE => {}
            _ => starts.push(v),
        }
    }
    starts.len()
}

/// Recover (rows, cols) of a figure's subplots. An explicit grid wins; otherwise the
/// subplot centers are clustered along each axis. No subplots means a 1x1 grid.
pub fn infer_alignment(grid: Option<Alignment>, subplots: &[SubplotRect]) -> Alignment {
    if let Some(grid) = grid {
        return grid;
    }
    if subplots.is_empty() {
        return (1, 1);
    }
    let (xs, ys): (Vec<f64>, Vec<f64>) = subplots.iter().map(SubplotRect::center).unzip();
    (count_bins(ys), count_bins(xs))
}

/// Presumed subplot size and padding, in inches
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FigureSizing {
    pub subplot_width: f64,
    pub subplot_height: f64,
    pub padding_width: f64,
    pub padding_height: f64,
    pub scaling: ScalingMode,
}

impl Default for FigureSizing {
    fn default() -> Self {
        Self {
            subplot_width: 5.0,
            subplot_height: 4.0,
            padding_width: 0.0,
            padding_height: 0.0,
            scaling: ScalingMode::Qrt,
        }
    }
}

impl FigureSizing {
    /// Defaults used when resizing before rendering: a lone subplot is 6 wide with
    /// aspect 0.6, otherwise 5 wide with aspect 0.8. Height is width times aspect.
    pub fn for_subplots(count: usize, aspect: Option<f64>, width: Option<f64>) -> Self {
        let single = count == 1;
        let aspect = aspect.unwrap_or(if single { 0.6 } else { 0.8 });
        let width = width.unwrap_or(if single { 6.0 } else { 5.0 });
        Self {
            subplot_width: width,
            subplot_height: width * aspect,
            ..Self::default()
        }
    }

    /// Subplot height over width
    pub fn aspect(&self) -> f64 {
        self.subplot_height / self.subplot_width
    }

    /// Figure size in inches for a grid of subplots
    pub fn figure_size(&self, alignment: Alignment) -> (f64, f64) {
        let (rows, cols) = (alignment.0 as f64, alignment.1 as f64);
        let n = cols.max(rows * self.subplot_height / self.subplot_width);
        let scale = self.scaling.factor(n);
        let size = (
            cols * scale * self.subplot_width + self.padding_width,
            rows * scale * self.subplot_height + self.padding_height,
        );
        debug!("figure size for {:?} subplots: {:.2}x{:.2} in", alignment, size.0, size.1);
        size
    }
}

/// Convert a size in inches to whole pixels
pub fn to_pixels(size: (f64, f64), dpi: u32) -> (u32, u32) {
    let px = |inches: f64| (inches * dpi as f64).round().max(1.0) as u32;
    (px(size.0), px(size.1))
}
