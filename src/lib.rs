// Library exports for lineplot

pub mod colormap;
pub mod csv_reader;
pub mod cycle;
pub mod data;
pub mod error;
pub mod graph;
pub mod layout;
pub mod legend;
pub mod parser;
pub mod resolve;
pub mod runtime;
pub mod scale;
pub mod style;
pub mod theme;

use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
pub enum OutputFormat {
    #[serde(rename = "png")]
    #[default]
    Png,
    #[serde(rename = "svg")]
    Svg,
}

impl OutputFormat {
    /// SVG for `.svg` paths (any case), PNG otherwise
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("svg") => OutputFormat::Svg,
            _ => OutputFormat::Png,
        }
    }
}
