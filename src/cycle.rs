// Property cycles: per-series attributes handed out round-robin

use crate::colormap;
use crate::error::{LineplotError, Result};
use crate::parser::style::{StyleMap, StyleValue};
use plotters::style::RGBColor;
use std::str::FromStr;

/// How extra cycled properties combine with the colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Combination {
    /// `+`: advance the extra properties together with the colors
    Zip,
    /// `*`: run through every extra property before moving to the next color
    #[default]
    Product,
}

impl FromStr for Combination {
    type Err = LineplotError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "+" => Ok(Combination::Zip),
            "*" => Ok(Combination::Product),
            _ => Err(LineplotError::invalid_option("combination", s)),
        }
    }
}

/// Attributes assigned to one series
#[derive(Debug, Clone, PartialEq)]
pub struct CycleEntry {
    pub color: RGBColor,
    pub marker_face: Option<RGBColor>,
    pub props: StyleMap,
}

/// A round-robin sequence of series attributes
#[derive(Debug, Clone)]
pub struct PropCycle {
    entries: Vec<CycleEntry>,
    pos: usize,
}

/// Repeat `items` until it is exactly `len` long
fn loop_list<T: Clone>(items: &[T], len: usize) -> Vec<T> {
    items.iter().cycle().take(len).cloned().collect()
}

/// Zip the extra property lists into one style map per step.
/// All lists must already have the same length.
fn zip_props(extra: &[(String, Vec<StyleValue>)], len: usize) -> Vec<StyleMap> {
    (0..len)
        .map(|i| {
            extra
                .iter()
                .map(|(key, values)| (key.clone(), values[i].clone()))
                .collect()
        })
        .collect()
}

impl PropCycle {
    pub fn new(
        colors: Vec<RGBColor>,
        marker_colors: Option<Vec<RGBColor>>,
        extra: Vec<(String, Vec<StyleValue>)>,
        combination: Combination,
    ) -> Result<Self> {
        if colors.is_empty() {
            return Err(LineplotError::invalid_option("colormap", "no colors"));
        }
        let marker_faces: Vec<Option<RGBColor>> = match marker_colors {
            Some(mc) if !mc.is_empty() => loop_list(&mc, colors.len()).into_iter().map(Some).collect(),
            _ => vec![None; colors.len()],
        };
        let extra: Vec<_> = extra.into_iter().filter(|(_, v)| !v.is_empty()).collect();

        let entries = if extra.is_empty() {
            colors
                .iter()
                .zip(marker_faces)
                .map(|(&color, marker_face)| CycleEntry {
                    color,
                    marker_face,
                    props: StyleMap::new(),
                })
                .collect()
        } else {
            match combination {
                Combination::Zip => {
                    let looped: Vec<_> = extra
                        .iter()
                        .map(|(k, v)| (k.clone(), loop_list(v, colors.len())))
                        .collect();
                    colors
                        .iter()
                        .zip(marker_faces)
                        .zip(zip_props(&looped, colors.len()))
                        .map(|((&color, marker_face), props)| CycleEntry {
                            color,
                            marker_face,
                            props,
                        })
                        .collect()
                }
                Combination::Product => {
                    let len = extra[0].1.len();
                    if let Some((key, values)) = extra.iter().find(|(_, v)| v.len() != len) {
                        return Err(LineplotError::invalid_option(
                            "cycle",
                            format!("{} has {} values, expected {}", key, values.len(), len),
                        ));
                    }
                    let props = zip_props(&extra, len);
                    colors
                        .iter()
                        .zip(marker_faces)
                        .flat_map(|(&color, marker_face)| {
                            props.iter().map(move |p| CycleEntry {
                                color,
                                marker_face,
                                props: p.clone(),
                            })
                        })
                        .collect()
                }
            }
        };

        Ok(Self { entries, pos: 0 })
    }

    /// Build a cycle from colormap names
    pub fn from_colormaps(
        colormap: &str,
        marker_colormap: Option<&str>,
        skip_header: bool,
        extra: Vec<(String, Vec<StyleValue>)>,
        combination: Combination,
    ) -> Result<Self> {
        let colors = colormap::cycle_colors(colormap, skip_header)?;
        let marker_colors = marker_colormap
            .map(|name| colormap::cycle_colors(name, skip_header))
            .transpose()?;
        Self::new(colors, marker_colors, extra, combination)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Hand out the next entry, wrapping around at the end
    pub fn next_entry(&mut self) -> CycleEntry {
        let entry = self.entries[self.pos % self.entries.len()].clone();
        self.pos = (self.pos + 1) % self.entries.len();
        entry
    }
}
