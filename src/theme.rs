// Render configuration

use crate::colormap::parse_hex;
use crate::error::{LineplotError, Result};
use anyhow::Context;
use plotters::style::RGBColor;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::str::FromStr;

/// Which way tick marks point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TickDirection {
    In,
    Out,
}

impl FromStr for TickDirection {
    type Err = LineplotError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "in" => Ok(TickDirection::In),
            "out" => Ok(TickDirection::Out),
            _ => Err(LineplotError::invalid_option("tick direction", s)),
        }
    }
}

/// Which sides of the axes frame are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// All four sides
    Full,
    /// Left and bottom only
    Half,
    /// No frame, ticks or tick labels
    None,
}

impl FromStr for Visibility {
    type Err = LineplotError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "full" | "true" => Ok(Visibility::Full),
            "half" => Ok(Visibility::Half),
            "none" | "false" => Ok(Visibility::None),
            _ => Err(LineplotError::invalid_option("visibility", s)),
        }
    }
}

/// How automatic axis limits are chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutolimitMode {
    /// The data extent
    Data,
    /// The data extent widened to the enclosing tick step
    RoundNumbers,
}

impl FromStr for AutolimitMode {
    type Err = LineplotError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "data" => Ok(AutolimitMode::Data),
            "round_numbers" => Ok(AutolimitMode::RoundNumbers),
            _ => Err(LineplotError::invalid_option("autolimit mode", s)),
        }
    }
}

/// Named starting points for a [`RenderConfig`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    #[default]
    Default,
    Prl,
    Nature,
}

impl FromStr for Preset {
    type Err = LineplotError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "default" => Ok(Preset::Default),
            "prl" => Ok(Preset::Prl),
            "nature" => Ok(Preset::Nature),
            _ => Err(LineplotError::invalid_option("preset", s)),
        }
    }
}

/// Rendering defaults shared by every series and axis
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub font_family: String,
    pub font_size: f64,
    pub line_width: f64,
    pub marker_size: f64,
    pub marker_edge_width: f64,
    pub axes_line_width: f64,
    pub tick_direction: TickDirection,
    pub tick_length: f64,
    /// Minor ticks between two major ticks
    pub minor_ticks: usize,
    pub grid: bool,
    pub grid_color: String,
    /// Draw a frame around the legend by default
    pub legend_frame: bool,
    pub border: Visibility,
    pub autolimit: AutolimitMode,
    /// Exponent beyond which tick labels switch to power notation
    pub power_limit: i32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            font_family: "sans-serif".to_string(),
            font_size: 14.0,
            line_width: 1.5,
            marker_size: 6.0,
            marker_edge_width: 0.8,
            axes_line_width: 0.8,
            tick_direction: TickDirection::In,
            tick_length: 3.0,
            minor_ticks: 1,
            grid: false,
            grid_color: "#cccccc".to_string(),
            legend_frame: false,
            border: Visibility::Full,
            autolimit: AutolimitMode::RoundNumbers,
            power_limit: 5,
        }
    }
}

impl RenderConfig {
    pub fn preset(preset: Preset) -> Self {
        match preset {
            Preset::Default => RenderConfig::default(),
            Preset::Prl => RenderConfig {
                font_family: "serif".to_string(),
                font_size: 16.0,
                axes_line_width: 1.0,
                grid_color: "#bbbbbb".to_string(),
                tick_length: 7.0,
                ..RenderConfig::default()
            },
            Preset::Nature => RenderConfig {
                font_size: 14.0,
                axes_line_width: 1.0,
                grid_color: "#bbbbbb".to_string(),
                tick_direction: TickDirection::Out,
                tick_length: 4.0,
                minor_ticks: 0,
                border: Visibility::Half,
                ..RenderConfig::default()
            },
        }
    }

    /// Load a configuration from a JSON file; missing fields take default values
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open config '{}'", path.display()))?;
        let config: RenderConfig = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse config '{}'", path.display()))?;
        config.grid_rgb()?;
        Ok(config)
    }

    pub fn grid_rgb(&self) -> Result<RGBColor> {
        parse_hex(&self.grid_color)
    }

    /// Tick mark length in pixels; inward ticks are negative
    pub fn tick_mark_size(&self) -> i32 {
        let len = self.tick_length.round() as i32;
        match self.tick_direction {
            TickDirection::In => -len,
            TickDirection::Out => len,
        }
    }
}
