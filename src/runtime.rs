// Runtime executor: input files and command-line options to a rendered figure

use crate::colormap::{self, DEFAULT_COLORMAP, DEFAULT_MARKER_COLORMAP};
use crate::csv_reader::{read_table_from_path, ReadOptions};
use crate::cycle::{Combination, PropCycle};
use crate::data::Table;
use crate::graph::{self, Figure, Series};
use crate::layout::{infer_alignment, FigureSizing, ScalingMode};
use crate::legend::parse_legend_flag;
use crate::parser::range::Bounds;
use crate::parser::style::{parse_cycle, parse_style, StyleMap, STYLE_ALIASES};
use crate::resolve::resolve;
use crate::scale::LogAxes;
use crate::style::SeriesStyle;
use crate::theme::RenderConfig;
use crate::OutputFormat;
use anyhow::{Context, Result};
use indexmap::IndexSet;
use log::{debug, info, warn};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Everything the command line asks for
#[derive(Debug, Clone, PartialEq)]
pub struct PlotRequest {
    pub files: Vec<PathBuf>,
    pub x: String,
    pub y: String,
    /// Style strings, one per file in order
    pub styles: Vec<String>,
    /// Style applied to every file before its own style string
    pub default_style: Option<String>,
    /// Colormap names, one per file in order
    pub colormaps: Vec<String>,
    pub marker_colormap: Option<String>,
    /// Extra cycled properties, `key=v1|v2,...`
    pub cycle: Option<String>,
    pub combination: Combination,
    pub read: ReadOptions,
    pub title: Option<String>,
    pub xlabel: Option<String>,
    pub ylabel: Option<String>,
    pub xlim: Bounds,
    pub ylim: Bounds,
    pub log: Option<LogAxes>,
    /// Raw `--legend` value
    pub legend: Option<String>,
    pub dpi: u32,
    pub aspect: Option<f64>,
    pub subplot_width: Option<f64>,
    pub scaling: ScalingMode,
}

impl Default for PlotRequest {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            x: "1".to_string(),
            y: "2:".to_string(),
            styles: Vec::new(),
            default_style: None,
            colormaps: Vec::new(),
            marker_colormap: Some(DEFAULT_MARKER_COLORMAP.to_string()),
            cycle: None,
            combination: Combination::default(),
            read: ReadOptions::default(),
            title: None,
            xlabel: None,
            ylabel: None,
            xlim: (None, None),
            ylim: (None, None),
            log: None,
            legend: None,
            dpi: 100,
            aspect: None,
            subplot_width: None,
            scaling: ScalingMode::default(),
        }
    }
}

/// Label prefixes telling series from different files apart: nothing for a single
/// file, the base name when base names are unique, otherwise the full path
pub fn file_prefixes(files: &[PathBuf]) -> Vec<String> {
    if files.len() == 1 {
        return vec![String::new()];
    }
    let basename = |p: &Path| {
        p.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| p.display().to_string())
    };
    let unique: HashSet<String> = files.iter().map(|f| basename(f.as_path())).collect();
    if unique.len() == files.len() {
        files.iter().map(|f| format!("{}:", basename(f.as_path()))).collect()
    } else {
        files.iter().map(|f| format!("{}:", f.display())).collect()
    }
}

/// One colormap per file. Empty entries use the default map; missing trailing
/// entries repeat the last given one.
pub fn colormaps_per_file(colormaps: &[String], count: usize) -> Vec<String> {
    let mut names: Vec<String> = colormaps
        .iter()
        .map(|c| {
            if c.is_empty() {
                DEFAULT_COLORMAP.to_string()
            } else {
                c.clone()
            }
        })
        .collect();
    let last = names
        .last()
        .cloned()
        .unwrap_or_else(|| DEFAULT_COLORMAP.to_string());
    names.resize(count.max(names.len()), last);
    names.truncate(count);
    names
}

/// One style map per file: the default style updated by the file's own style string.
/// Files without a style string get the default style alone.
pub fn styles_per_file(
    default_style: Option<&str>,
    styles: &[String],
    count: usize,
) -> Result<Vec<StyleMap>> {
    let default = parse_style(default_style, STYLE_ALIASES).context("Invalid default style")?;
    (0..count)
        .map(|i| {
            let mut map = default.clone();
            if let Some(s) = styles.get(i) {
                let own = parse_style(Some(s), STYLE_ALIASES)
                    .with_context(|| format!("Invalid style '{}'", s))?;
                map.extend(own);
            }
            Ok(map)
        })
        .collect()
}

/// The only title in the set, if there is exactly one
fn single_title(titles: &IndexSet<String>) -> Option<String> {
    match titles.len() {
        1 => titles.first().cloned(),
        _ => None,
    }
}

/// Sizing for the command line: the classic 5x4 subplot unless width or aspect are
/// given
fn sizing(request: &PlotRequest) -> FigureSizing {
    let base = if request.aspect.is_some() || request.subplot_width.is_some() {
        FigureSizing::for_subplots(1, request.aspect, request.subplot_width)
    } else {
        FigureSizing::default()
    };
    FigureSizing {
        scaling: request.scaling,
        ..base
    }
}

/// Build a figure from already-read tables, one per requested file
pub fn build_figure(request: &PlotRequest, tables: &[Table], config: &RenderConfig) -> Result<Figure> {
    if tables.len() != request.files.len() {
        anyhow::bail!(
            "Expected {} tables, got {}",
            request.files.len(),
            tables.len()
        );
    }

    let count = tables.len();
    let prefixes = file_prefixes(&request.files);
    let colormaps = colormaps_per_file(&request.colormaps, count);
    let styles = styles_per_file(request.default_style.as_deref(), &request.styles, count)?;
    let extra = parse_cycle(request.cycle.as_deref(), STYLE_ALIASES).context("Invalid cycle")?;

    let mut x_titles = IndexSet::new();
    let mut y_titles = IndexSet::new();
    let mut series = Vec::new();

    for (n, table) in tables.iter().enumerate() {
        let file = request.files[n].display();
        let columns = resolve(&request.x, &request.y, table)
            .with_context(|| format!("Failed to select columns in '{}'", file))?;
        if columns.y.is_empty() {
            warn!("no y columns selected by '{}' in '{}'", request.y, file);
        }

        let mut cycle = PropCycle::from_colormaps(
            &colormaps[n],
            request.marker_colormap.as_deref(),
            true,
            extra.clone(),
            request.combination,
        )
        .with_context(|| {
            format!(
                "Invalid property cycle for '{}' (colormaps: {})",
                file,
                colormap::available().join(", ")
            )
        })?;

        let x = columns.x.numeric()?;
        for (title, column) in &columns.y {
            let mut style = SeriesStyle::for_series(&styles[n], &cycle.next_entry())
                .with_context(|| format!("Invalid style for '{}'", file))?;
            let label = style
                .label
                .take()
                .unwrap_or_else(|| format!("{}{}", prefixes[n], title));
            debug!("series '{}' from '{}'", label, file);
            series.push(Series {
                label,
                x: x.clone(),
                y: column.numeric()?,
                style,
            });
        }

        x_titles.insert(columns.x_title().to_string());
        // Only single-column files name the y axis
        if let [only] = columns.y_titles().as_slice() {
            y_titles.insert(only.to_string());
        }
    }

    let xlabel = request.xlabel.clone().or_else(|| single_title(&x_titles));
    let ylabel = request.ylabel.clone().or_else(|| single_title(&y_titles));

    let legend = parse_legend_flag(request.legend.as_deref(), config.legend_frame)
        .context("Invalid legend option")?;
    let size = sizing(request).figure_size(infer_alignment(None, &[]));

    Ok(Figure {
        title: request.title.clone(),
        xlabel,
        ylabel,
        xlim: request.xlim,
        ylim: request.ylim,
        log: request.log,
        series,
        legend,
        size,
        dpi: request.dpi,
    })
}

/// Read every requested file
pub fn load_tables(request: &PlotRequest) -> Result<Vec<Table>> {
    if request.files.is_empty() {
        anyhow::bail!("At least one input file is required");
    }
    request
        .files
        .iter()
        .map(|path| {
            info!("reading {}", path.display());
            read_table_from_path(path, request.read)
        })
        .collect()
}

/// Read, build and render a plot request
pub fn render_plot(request: &PlotRequest, config: &RenderConfig, format: OutputFormat) -> Result<Vec<u8>> {
    let tables = load_tables(request)?;
    let figure = build_figure(request, &tables, config)?;
    info!(
        "plotting {} series from {} file(s)",
        figure.series.len(),
        request.files.len()
    );
    graph::render(&figure, config, format).context("Failed to render plot")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv_reader::read_table;
    use crate::parser::style::StyleValue;
    use crate::style::{LineKind, Marker};
    use std::io::Cursor;

    fn table(text: &str) -> Table {
        read_table(Cursor::new(text), ReadOptions::default()).unwrap()
    }

    fn request(files: &[&str]) -> PlotRequest {
        PlotRequest {
            files: files.iter().map(PathBuf::from).collect(),
            ..PlotRequest::default()
        }
    }

    #[test]
    fn test_file_prefixes() {
        assert_eq!(file_prefixes(&[PathBuf::from("a/data.txt")]), vec![""]);
        assert_eq!(
            file_prefixes(&[PathBuf::from("a/one.txt"), PathBuf::from("b/two.txt")]),
            vec!["one.txt:", "two.txt:"]
        );
        assert_eq!(
            file_prefixes(&[PathBuf::from("a/data.txt"), PathBuf::from("b/data.txt")]),
            vec!["a/data.txt:", "b/data.txt:"]
        );
    }

    #[test]
    fn test_colormaps_per_file() {
        assert_eq!(colormaps_per_file(&[], 2), vec![DEFAULT_COLORMAP, DEFAULT_COLORMAP]);
        let given = vec!["".to_string(), "line.vivid".to_string()];
        assert_eq!(
            colormaps_per_file(&given, 3),
            vec![DEFAULT_COLORMAP, "line.vivid", "line.vivid"]
        );
        assert_eq!(colormaps_per_file(&given, 1), vec![DEFAULT_COLORMAP]);
    }

    #[test]
    fn test_styles_per_file() {
        let styles = vec!["lt=--".to_string()];
        let maps = styles_per_file(Some("lw=2,lt=-"), &styles, 2).unwrap();
        assert_eq!(maps[0]["linestyle"], StyleValue::Str("--".to_string()));
        assert_eq!(maps[0]["lw"], StyleValue::Int(2));
        assert_eq!(maps[1]["linestyle"], StyleValue::Str("-".to_string()));
        assert!(styles_per_file(None, &["oops".to_string()], 1).is_err());
    }

    #[test]
    fn test_sizing_explicit_shape() {
        assert_eq!(sizing(&request(&["a"])).figure_size((1, 1)), (5.0, 4.0));
        let wide = PlotRequest {
            aspect: Some(0.5),
            ..request(&["a"])
        };
        // Width falls back to the single-subplot 6 inches
        assert_eq!(sizing(&wide).figure_size((1, 1)), (6.0, 3.0));
    }

    #[test]
    fn test_build_figure_single_file() {
        let tables = vec![table("t a b\n0 1 2\n1 3 4\n2 5 6\n")];
        let fig = build_figure(&request(&["run.txt"]), &tables, &RenderConfig::default()).unwrap();
        let labels: Vec<_> = fig.series.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["a", "b"]);
        assert_eq!(fig.series[1].y, vec![2.0, 4.0, 6.0]);
        assert_eq!(fig.xlabel.as_deref(), Some("t"));
        // Two y columns: no inferred y label
        assert_eq!(fig.ylabel, None);
        assert_eq!(fig.size, (5.0, 4.0));
        // Successive series take successive cycle colors
        assert_ne!(fig.series[0].style.color, fig.series[1].style.color);
    }

    #[test]
    fn test_build_figure_multiple_files_prefix_and_ylabel() {
        let tables = vec![table("t v\n0 1\n1 2\n"), table("t v\n0 3\n1 4\n")];
        let mut req = request(&["a/first.txt", "b/second.txt"]);
        req.y = "v".to_string();
        let fig = build_figure(&req, &tables, &RenderConfig::default()).unwrap();
        let labels: Vec<_> = fig.series.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["first.txt:v", "second.txt:v"]);
        assert_eq!(fig.ylabel.as_deref(), Some("v"));
        // The cycle restarts for every file
        assert_eq!(fig.series[0].style.color, fig.series[1].style.color);
    }

    #[test]
    fn test_build_figure_ylabel_from_single_column_files() {
        let tables = vec![table("t a b\n0 1 2\n1 3 4\n"), table("t a\n0 5\n1 6\n")];
        let fig = build_figure(&request(&["one.txt", "two.txt"]), &tables, &RenderConfig::default())
            .unwrap();
        assert_eq!(fig.series.len(), 3);
        assert_eq!(fig.ylabel.as_deref(), Some("a"));
    }

    #[test]
    fn test_build_figure_range_keeps_repeated_titles() {
        let tables = vec![table("x v v\n0 1 2\n1 3 4\n")];
        let fig = build_figure(&request(&["run.txt"]), &tables, &RenderConfig::default()).unwrap();
        let labels: Vec<_> = fig.series.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["v", "v.1"]);
        assert_eq!(fig.series[1].y, vec![2.0, 4.0]);
    }

    #[test]
    fn test_build_figure_explicit_labels_and_styles() {
        let tables = vec![table("t v\n0 1\n1 2\n")];
        let mut req = request(&["run.txt"]);
        req.xlabel = Some("time".to_string());
        req.ylabel = Some("value".to_string());
        req.styles = vec!["lt=--,pt=o".to_string()];
        req.legend = Some("false".to_string());
        let fig = build_figure(&req, &tables, &RenderConfig::default()).unwrap();
        assert_eq!(fig.xlabel.as_deref(), Some("time"));
        assert_eq!(fig.ylabel.as_deref(), Some("value"));
        assert_eq!(fig.series[0].style.linestyle, Some(LineKind::Dashed));
        assert_eq!(fig.series[0].style.marker, Some(Marker::Circle));
        assert_eq!(fig.legend, None);
    }

    #[test]
    fn test_build_figure_index_x() {
        let tables = vec![table("a\n5\n6\n")];
        let mut req = request(&["run.txt"]);
        req.x = "0".to_string();
        req.y = "1".to_string();
        let fig = build_figure(&req, &tables, &RenderConfig::default()).unwrap();
        assert_eq!(fig.series[0].x, vec![0.0, 1.0]);
        assert_eq!(fig.xlabel.as_deref(), Some("index"));
    }

    #[test]
    fn test_build_figure_cycle_product() {
        let tables = vec![table("t a b c\n0 1 2 3\n")];
        let mut req = request(&["run.txt"]);
        req.cycle = Some("lt=-|--".to_string());
        let fig = build_figure(&req, &tables, &RenderConfig::default()).unwrap();
        let kinds: Vec<_> = fig.series.iter().map(|s| s.style.linestyle).collect();
        assert_eq!(
            kinds,
            vec![Some(LineKind::Solid), Some(LineKind::Dashed), Some(LineKind::Solid)]
        );
        // Product: the color holds while the line styles run through
        assert_eq!(fig.series[0].style.color, fig.series[1].style.color);
        assert_ne!(fig.series[1].style.color, fig.series[2].style.color);
    }

    #[test]
    fn test_build_figure_errors() {
        let tables = vec![table("t v\n0 1\n")];
        let mut req = request(&["run.txt"]);
        req.y = "missing".to_string();
        assert!(build_figure(&req, &tables, &RenderConfig::default()).is_err());

        let mut req = request(&["run.txt"]);
        req.colormaps = vec!["nope".to_string()];
        assert!(build_figure(&req, &tables, &RenderConfig::default()).is_err());

        let tables = vec![table("t v\n0 abc\n")];
        assert!(build_figure(&request(&["run.txt"]), &tables, &RenderConfig::default()).is_err());
    }

    #[test]
    fn test_load_tables_requires_files() {
        assert!(load_tables(&PlotRequest::default()).is_err());
    }
}
