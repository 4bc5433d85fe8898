use crate::legend::{best_location, legend_origin, LegendOptions, Placement};
use crate::parser::range::Bounds;
use crate::scale::{
    apply_bounds, auto_limits, auto_log_limits, data_extent, format_log_tick, format_tick,
    log_transform, LogAxes,
};
use crate::style::{FillKind, LineKind, Marker, SeriesStyle};
use crate::theme::{AutolimitMode, RenderConfig, Visibility};
use crate::OutputFormat;
use anyhow::{Context, Result};
use image::ImageEncoder;
use log::{debug, warn};
use plotters::coord::Shift;
use plotters::prelude::*;

/// Width of the legend glyph area, in pixels
const LEGEND_GLYPH_WIDTH: u32 = 24;
const LEGEND_MARGIN: u32 = 5;
const CHART_MARGIN: u32 = 12;

/// One line on the plot
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub style: SeriesStyle,
}

/// Everything needed to draw a single-axes figure
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub title: Option<String>,
    pub xlabel: Option<String>,
    pub ylabel: Option<String>,
    pub xlim: Bounds,
    pub ylim: Bounds,
    pub log: Option<LogAxes>,
    pub series: Vec<Series>,
    /// `None` hides the legend
    pub legend: Option<LegendOptions>,
    /// Figure size in inches
    pub size: (f64, f64),
    pub dpi: u32,
}

/// Largest canvas rendered, in pixels
pub const MAX_PIXELS: u64 = 100_000_000;

impl Figure {
    pub fn log_x(&self) -> bool {
        self.log.is_some_and(LogAxes::x)
    }

    pub fn log_y(&self) -> bool {
        self.log.is_some_and(LogAxes::y)
    }

    /// Size in whole pixels, refusing canvases beyond [`MAX_PIXELS`]
    pub fn pixels(&self) -> Result<(u32, u32)> {
        let (width, height) = crate::layout::to_pixels(self.size, self.dpi);
        let area = u64::from(width) * u64::from(height);
        if area > MAX_PIXELS {
            anyhow::bail!(
                "Figure of {}x{} px is too large; lower the dpi or the figure size",
                width,
                height
            );
        }
        Ok((width, height))
    }

    /// Convert a length in points to pixels at this figure's resolution
    fn px(&self, points: f64) -> f64 {
        points * self.dpi as f64 / 72.0
    }
}

/// Data points of a series in plot space. Log axes map values through log10; points
/// that cannot be shown become NaN gaps.
pub fn series_points(series: &Series, log_x: bool, log_y: bool) -> Vec<(f64, f64)> {
    let xs = if log_x { log_transform(&series.x) } else { series.x.clone() };
    let ys = if log_y { log_transform(&series.y) } else { series.y.clone() };

    let dropped = series
        .x
        .iter()
        .zip(&series.y)
        .zip(xs.iter().zip(&ys))
        .filter(|((x, y), (tx, ty))| {
            x.is_finite() && y.is_finite() && !(tx.is_finite() && ty.is_finite())
        })
        .count();
    if dropped > 0 {
        warn!(
            "dropping {} non-positive point(s) of '{}' on a log axis",
            dropped, series.label
        );
    }

    xs.into_iter().zip(ys).collect()
}

fn axis_range(
    axis: &str,
    extent: Option<(f64, f64)>,
    bounds: Bounds,
    log: bool,
    mode: AutolimitMode,
) -> Result<(f64, f64)> {
    let (auto, bounds) = if log {
        let to_log = |bound: Option<f64>| -> Result<Option<f64>> {
            match bound {
                Some(v) if v <= 0.0 => {
                    anyhow::bail!("{} limit {} is not positive on a log axis", axis, v)
                }
                other => Ok(other.map(f64::log10)),
            }
        };
        (
            auto_log_limits(extent, mode),
            (to_log(bounds.0)?, to_log(bounds.1)?),
        )
    } else {
        (auto_limits(extent, mode), bounds)
    };

    let (lo, hi) = apply_bounds(auto, bounds);
    if lo.partial_cmp(&hi) != Some(std::cmp::Ordering::Less) {
        anyhow::bail!(
            "Invalid {} limits: lower bound {} must be below upper bound {}",
            axis,
            lo,
            hi
        );
    }
    Ok((lo, hi))
}

/// Axis ranges in plot space for a set of series points
pub fn axis_limits(
    points: &[Vec<(f64, f64)>],
    figure: &Figure,
    mode: AutolimitMode,
) -> Result<((f64, f64), (f64, f64))> {
    let x_extent = data_extent(points.iter().flatten().map(|p| p.0));
    let y_extent = data_extent(points.iter().flatten().map(|p| p.1));
    let x = axis_range("x", x_extent, figure.xlim, figure.log_x(), mode)?;
    let y = axis_range("y", y_extent, figure.ylim, figure.log_y(), mode)?;
    debug!("axis limits: x {:?}, y {:?}", x, y);
    Ok((x, y))
}

/// Split points into drawable runs, breaking at NaN gaps and at points outside the
/// axis ranges
pub fn segments(points: &[(f64, f64)], x: (f64, f64), y: (f64, f64)) -> Vec<Vec<(f64, f64)>> {
    let slack = |r: (f64, f64)| (r.1 - r.0).abs() * 1e-9;
    let (sx, sy) = (slack(x), slack(y));
    let visible = |&(px, py): &(f64, f64)| {
        px.is_finite()
            && py.is_finite()
            && px >= x.0 - sx
            && px <= x.1 + sx
            && py >= y.0 - sy
            && py <= y.1 + sy
    };

    let mut runs = Vec::new();
    let mut current = Vec::new();
    for p in points {
        if visible(p) {
            current.push(*p);
        } else if !current.is_empty() {
            runs.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

/// Marker outline relative to its center, in pixels (y grows downward). Line-only
/// glyphs retrace through the center so each marker is one path.
pub fn marker_outline(marker: Marker, radius: i32) -> Vec<(i32, i32)> {
    let r = radius.max(1);
    let polygon = |r: i32, sides: usize| -> Vec<(i32, i32)> {
        (0..=sides)
            .map(|i| {
                let a = i as f64 * std::f64::consts::TAU / sides as f64;
                (
                    (r as f64 * a.cos()).round() as i32,
                    (r as f64 * a.sin()).round() as i32,
                )
            })
            .collect()
    };
    match marker {
        Marker::Circle => polygon(r, 20),
        Marker::Point => polygon((r / 3).max(1), 8),
        Marker::Square => vec![(-r, -r), (r, -r), (r, r), (-r, r), (-r, -r)],
        Marker::TriangleUp => vec![(0, -r), (r, r), (-r, r), (0, -r)],
        Marker::TriangleDown => vec![(0, r), (r, -r), (-r, -r), (0, r)],
        Marker::Diamond => vec![(0, -r), (r, 0), (0, r), (-r, 0), (0, -r)],
        Marker::Cross => vec![(-r, -r), (r, r), (0, 0), (r, -r), (-r, r)],
        Marker::Plus => vec![(-r, 0), (r, 0), (0, 0), (0, -r), (0, r)],
        Marker::Star => vec![
            (-r, 0),
            (r, 0),
            (0, 0),
            (0, -r),
            (0, r),
            (0, 0),
            (-r, -r),
            (r, r),
            (0, 0),
            (r, -r),
            (-r, r),
        ],
    }
}

fn has_face(marker: Marker) -> bool {
    !matches!(marker, Marker::Cross | Marker::Plus | Marker::Star)
}

fn stroke(px: f64) -> u32 {
    px.round().max(1.0) as u32
}

/// Pixel shape and styles of a series' marker
#[derive(Clone)]
struct MarkerGlyph {
    outline: Vec<(i32, i32)>,
    fill: ShapeStyle,
    edge: ShapeStyle,
}

impl MarkerGlyph {
    fn new(marker: Marker, style: &SeriesStyle, figure: &Figure, config: &RenderConfig) -> Self {
        let color = style.color.unwrap_or(BLACK);
        let alpha = style.alpha.unwrap_or(1.0);
        let radius = figure.px(style.markersize.unwrap_or(config.marker_size)) / 2.0;
        let face = style.markerfacecolor.unwrap_or(color);
        let fill = if has_face(marker) && style.fillstyle == FillKind::Full {
            face.mix(alpha).filled()
        } else {
            TRANSPARENT.filled()
        };
        let edge = style
            .markeredgecolor
            .unwrap_or(color)
            .mix(alpha)
            .stroke_width(stroke(figure.px(config.marker_edge_width)));
        Self {
            outline: marker_outline(marker, radius.round() as i32),
            fill,
            edge,
        }
    }
}

/// Dash and gap lengths in pixels for a line of the given width
fn dash_pattern(kind: LineKind, width: f64) -> (u32, u32) {
    let scaled = |f: f64| (f * width).round().max(1.0) as u32;
    match kind {
        LineKind::Dotted => (scaled(1.0), scaled(1.65)),
        LineKind::DashDot => (scaled(6.4), scaled(1.6)),
        _ => (scaled(3.7), scaled(1.6)),
    }
}

fn estimate_legend_size(labels: &[&str], font_px: f64) -> (u32, u32) {
    let longest = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let width = longest as f64 * font_px * 0.6 + (LEGEND_GLYPH_WIDTH + 3 * LEGEND_MARGIN) as f64;
    let height = labels.len() as f64 * font_px * 1.3 + (2 * LEGEND_MARGIN) as f64;
    (width.ceil() as u32, height.ceil() as u32)
}

fn draw_figure<DB>(root: DrawingArea<DB, Shift>, figure: &Figure, config: &RenderConfig) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE).context("Failed to fill background")?;

    let points: Vec<Vec<(f64, f64)>> = figure
        .series
        .iter()
        .map(|s| series_points(s, figure.log_x(), figure.log_y()))
        .collect();
    let (x_range, y_range) = axis_limits(&points, figure, config.autolimit)?;
    let runs: Vec<Vec<Vec<(f64, f64)>>> = points
        .iter()
        .map(|p| segments(p, x_range, y_range))
        .collect();

    let family = FontFamily::from(config.font_family.as_str());
    let font_px = figure.px(config.font_size);
    let font = FontDesc::new(family, font_px, FontStyle::Normal);
    let legend_font_px = figure
        .legend
        .as_ref()
        .and_then(|l| l.font_size)
        .map_or(font_px * 0.85, |pt| figure.px(pt));

    let labels: Vec<&str> = figure.series.iter().map(|s| s.label.as_str()).collect();
    let legend_size = estimate_legend_size(&labels, legend_font_px);

    // Room for legends anchored outside the axes
    let mut margins = [CHART_MARGIN; 4]; // top, right, bottom, left
    if let Some(LegendOptions {
        placement: Placement::Anchored { anchor, .. },
        ..
    }) = &figure.legend
    {
        if anchor.1 > 1.0 {
            margins[0] += legend_size.1;
        }
        if anchor.0 > 1.0 {
            margins[1] += legend_size.0;
        }
        if anchor.1 < 0.0 {
            margins[2] += legend_size.1;
        }
        if anchor.0 < 0.0 {
            margins[3] += legend_size.0;
        }
    }

    let mut builder = ChartBuilder::on(&root);
    builder
        .margin_top(margins[0])
        .margin_right(margins[1])
        .margin_bottom(margins[2])
        .margin_left(margins[3])
        .x_label_area_size((font_px * 2.6).round() as u32)
        .y_label_area_size((font_px * 4.2).round() as u32);
    if let Some(title) = &figure.title {
        builder.caption(title, font.clone());
    }
    let mut chart = builder
        .build_cartesian_2d(x_range.0..x_range.1, y_range.0..y_range.1)
        .context("Failed to build chart")?;

    let hidden = config.border == Visibility::None;
    let power_limit = config.power_limit;
    let (log_x, log_y) = (figure.log_x(), figure.log_y());
    let x_fmt = move |v: &f64| match (hidden, log_x) {
        (true, _) => String::new(),
        (false, true) => format_log_tick(*v),
        (false, false) => format_tick(*v, power_limit),
    };
    let y_fmt = move |v: &f64| match (hidden, log_y) {
        (true, _) => String::new(),
        (false, true) => format_log_tick(*v),
        (false, false) => format_tick(*v, power_limit),
    };
    let tick_count = |log: bool, range: (f64, f64)| {
        if log {
            ((range.1 - range.0).ceil() as usize + 1).clamp(2, 12)
        } else {
            6
        }
    };

    let axis_style = BLACK.stroke_width(stroke(figure.px(config.axes_line_width)));
    let grid_color = config.grid_rgb()?;

    {
        let mut mesh = chart.configure_mesh();
        mesh.x_labels(tick_count(log_x, x_range))
            .y_labels(tick_count(log_y, y_range))
            .x_label_formatter(&x_fmt)
            .y_label_formatter(&y_fmt)
            .label_style(font.clone())
            .axis_desc_style(font.clone())
            .axis_style(axis_style)
            .set_all_tick_mark_size(if hidden { 0 } else { config.tick_mark_size() });
        if let Some(xlabel) = &figure.xlabel {
            mesh.x_desc(xlabel.as_str());
        }
        if let Some(ylabel) = &figure.ylabel {
            mesh.y_desc(ylabel.as_str());
        }
        if config.grid {
            mesh.bold_line_style(grid_color.stroke_width(1))
                .light_line_style(grid_color.mix(0.4).stroke_width(1))
                .x_max_light_lines(config.minor_ticks)
                .y_max_light_lines(config.minor_ticks);
        } else {
            mesh.disable_mesh();
        }
        if hidden {
            mesh.disable_axes();
        }
        mesh.draw().context("Failed to draw mesh")?;
    }

    if config.border == Visibility::Full {
        chart
            .plotting_area()
            .draw(&Rectangle::new(
                [(x_range.0, y_range.0), (x_range.1, y_range.1)],
                axis_style,
            ))
            .context("Failed to draw axes frame")?;
    }

    for (series, series_runs) in figure.series.iter().zip(&runs) {
        let style = &series.style;
        let color = style.color.unwrap_or(BLACK);
        let width = figure.px(style.linewidth.unwrap_or(config.line_width));
        let line_style = color.mix(style.alpha.unwrap_or(1.0)).stroke_width(stroke(width));

        if style.draws_line() {
            let kind = style.linestyle.unwrap_or(LineKind::Solid);
            for run in series_runs.iter().filter(|r| r.len() > 1) {
                if kind == LineKind::Solid {
                    chart
                        .draw_series(LineSeries::new(run.iter().copied(), line_style))
                        .context("Failed to draw line series")?;
                } else {
                    let (dash, gap) = dash_pattern(kind, width);
                    chart
                        .draw_series(DashedLineSeries::new(run.clone(), dash, gap, line_style))
                        .context("Failed to draw line series")?;
                }
            }
        }

        let glyph = style
            .marker
            .map(|m| MarkerGlyph::new(m, style, figure, config));
        if let Some(glyph) = &glyph {
            for run in series_runs {
                chart
                    .draw_series(run.iter().map(|&p| {
                        EmptyElement::at(p)
                            + Polygon::new(glyph.outline.clone(), glyph.fill)
                            + PathElement::new(glyph.outline.clone(), glyph.edge)
                    }))
                    .context("Failed to draw markers")?;
            }
        }

        let anno = chart
            .draw_series(std::iter::empty::<PathElement<(f64, f64)>>())
            .context("Failed to register legend entry")?;
        anno.label(series.label.as_str());
        let half = (LEGEND_GLYPH_WIDTH / 2) as i32;
        match (glyph, style.draws_line()) {
            (Some(g), true) => {
                anno.legend(move |(x, y)| {
                    EmptyElement::at((x + half, y))
                        + PathElement::new(vec![(-half, 0), (half, 0)], line_style)
                        + Polygon::new(g.outline.clone(), g.fill)
                        + PathElement::new(g.outline.clone(), g.edge)
                });
            }
            (Some(g), false) => {
                anno.legend(move |(x, y)| {
                    EmptyElement::at((x + half, y))
                        + Polygon::new(g.outline.clone(), g.fill)
                        + PathElement::new(g.outline.clone(), g.edge)
                });
            }
            (None, _) => {
                anno.legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 2 * half, y)], line_style)
                });
            }
        }
    }

    if let Some(options) = &figure.legend {
        if !figure.series.is_empty() {
            let area = chart.plotting_area().dim_in_pixel();
            let (anchor, loc) = match options.placement {
                Placement::Anchored { anchor, loc } => (anchor, loc),
                Placement::Best => {
                    let span = |r: (f64, f64), v: f64| (v - r.0) / (r.1 - r.0);
                    let normalized: Vec<(f64, f64)> = runs
                        .iter()
                        .flatten()
                        .flatten()
                        .map(|&(x, y)| (span(x_range, x), span(y_range, y)))
                        .collect();
                    let loc = best_location(&normalized);
                    (loc.corner(), loc)
                }
            };
            debug!("legend at {} anchored on {:?}", loc, anchor);
            let (lx, ly) = legend_origin(anchor, loc, area, legend_size, LEGEND_MARGIN as i32);

            let (border, background) = if options.frame {
                (
                    BLACK.stroke_width(stroke(figure.px(options.linewidth))),
                    WHITE.mix(0.8).filled(),
                )
            } else {
                (TRANSPARENT.stroke_width(0), TRANSPARENT.filled())
            };
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::Coordinate(lx, ly))
                .margin(LEGEND_MARGIN)
                .legend_area_size(LEGEND_GLYPH_WIDTH)
                .label_font(FontDesc::new(
                    FontFamily::from(config.font_family.as_str()),
                    legend_font_px,
                    FontStyle::Normal,
                ))
                .border_style(border)
                .background_style(background)
                .draw()
                .context("Failed to draw legend")?;
        }
    }

    root.present().context("Failed to present drawing")?;
    Ok(())
}

/// Render a figure to PNG or SVG bytes
pub fn render(figure: &Figure, config: &RenderConfig, format: OutputFormat) -> Result<Vec<u8>> {
    let (width, height) = figure.pixels()?;
    debug!("rendering {}x{} px as {:?}", width, height, format);

    match format {
        OutputFormat::Png => {
            let mut buffer = vec![255u8; width as usize * height as usize * 3];
            {
                let root = BitMapBackend::with_buffer(&mut buffer, (width, height))
                    .into_drawing_area();
                draw_figure(root, figure, config)?;
            }

            let mut png_bytes = Vec::new();
            {
                let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
                encoder
                    .write_image(&buffer, width, height, image::ColorType::Rgb8)
                    .context("Failed to encode PNG")?;
            }
            Ok(png_bytes)
        }
        OutputFormat::Svg => {
            let mut svg = String::new();
            {
                let root = SVGBackend::with_string(&mut svg, (width, height)).into_drawing_area();
                draw_figure(root, figure, config)?;
            }
            Ok(svg.into_bytes())
        }
    }
}
