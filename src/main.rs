use anyhow::{Context, Result};
use clap::{builder::BoolishValueParser, ArgAction, Parser, ValueEnum};
use lineplot::csv_reader::{ReadOptions, Separator};
use lineplot::cycle::Combination;
use lineplot::layout::ScalingMode;
use lineplot::parser::range::{parse_range, Bounds};
use lineplot::runtime::{self, PlotRequest};
use lineplot::scale::LogAxes;
use lineplot::theme::{Preset, RenderConfig};
use lineplot::OutputFormat;
use log::{info, warn};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "lineplot")]
#[command(about = "Plot columns of one or more delimited text files as lines", long_about = None)]
struct Args {
    /// The x column: a 1-based number, a column title, or 0 for the row index
    #[arg(short = 'x', default_value = "1")]
    x: String,

    /// The y columns: a number, a title, a comma-separated list, or a range like "2:5"
    #[arg(short = 'y', default_value = "2:")]
    y: String,

    /// Line style for the next file, "key=value,key2=value2,..." (repeatable)
    #[arg(short = 's', long = "style", num_args = 0..=1, default_missing_value = "")]
    styles: Vec<String>,

    /// Colormap for the next file (repeatable; empty means line.default)
    #[arg(short = 'c', long = "colormap", num_args = 0..=1, default_missing_value = "")]
    colormaps: Vec<String>,

    /// Colormap for marker faces, or "none"
    #[arg(long, default_value = "line.lighter")]
    marker_colormap: String,

    /// Style applied to every file before its own style
    #[arg(long = "default")]
    default_style: Option<String>,

    /// Extra cycled properties, "key=v1|v2,key2=v3|v4"
    #[arg(long)]
    cycle: Option<String>,

    /// How cycled properties combine with colors: "*" (product) or "+" (zip)
    #[arg(long, default_value = "*")]
    combination: Combination,

    /// Whether files start with a line of column titles
    #[arg(long, default_value = "true", action = ArgAction::Set, value_parser = BoolishValueParser::new())]
    header: bool,

    /// Field separator: "\s+" for whitespace, "tab", or a single character
    #[arg(long, default_value = r"\s+")]
    sep: Separator,

    /// Output file (.png or .svg); PNG goes to stdout when omitted
    #[arg(long)]
    save: Option<PathBuf>,

    #[arg(long)]
    xlabel: Option<String>,

    #[arg(long)]
    ylabel: Option<String>,

    /// Range of x as "start:end"; either side may be empty
    #[arg(long, value_parser = parse_range, allow_hyphen_values = true)]
    xlim: Option<Bounds>,

    /// Range of y as "start:end"; either side may be empty
    #[arg(long, value_parser = parse_range, allow_hyphen_values = true)]
    ylim: Option<Bounds>,

    /// Log scale on "x", "y" or "all" axes
    #[arg(long)]
    log: Option<LogAxes>,

    #[arg(long)]
    title: Option<String>,

    #[arg(long, default_value_t = 100)]
    dpi: u32,

    /// Subplot height over width
    #[arg(long)]
    aspect: Option<f64>,

    /// Subplot width in inches
    #[arg(long)]
    subplot_width: Option<f64>,

    /// Figure scaling mode: linear, qrt, sqrt or same
    #[arg(long, default_value = "qrt")]
    scaling: ScalingMode,

    /// "true", "false", or legend options like "loc=outupper right,box=true"
    #[arg(long)]
    legend: Option<String>,

    /// Rendering preset: default, prl or nature
    #[arg(long, default_value = "default")]
    preset: Preset,

    /// JSON rendering configuration; replaces the preset
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log verbosity level
    #[arg(long, default_value = "warn")]
    log_level: LogLevel,

    /// Input files
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

impl Args {
    fn into_request(self) -> PlotRequest {
        let marker_colormap = match self.marker_colormap.to_lowercase().as_str() {
            "" | "none" => None,
            _ => Some(self.marker_colormap),
        };
        PlotRequest {
            files: self.files,
            x: self.x,
            y: self.y,
            styles: self.styles,
            default_style: self.default_style,
            colormaps: self.colormaps,
            marker_colormap,
            cycle: self.cycle,
            combination: self.combination,
            read: ReadOptions {
                sep: self.sep,
                header: self.header,
            },
            title: self.title,
            xlabel: self.xlabel,
            ylabel: self.ylabel,
            xlim: self.xlim.unwrap_or((None, None)),
            ylim: self.ylim.unwrap_or((None, None)),
            log: self.log,
            legend: self.legend,
            dpi: self.dpi,
            aspect: self.aspect,
            subplot_width: self.subplot_width,
            scaling: self.scaling,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(args.log_level.to_level_filter())
        .format_module_path(false)
        .init();

    let config = match &args.config {
        Some(path) => {
            if args.preset != Preset::Default {
                warn!("--config given; ignoring preset {:?}", args.preset);
            }
            RenderConfig::load(path)?
        }
        None => RenderConfig::preset(args.preset),
    };

    let save = args.save.clone();
    let format = save
        .as_deref()
        .map(OutputFormat::from_path)
        .unwrap_or_default();
    let request = args.into_request();

    let bytes = runtime::render_plot(&request, &config, format).context("Failed to render plot")?;

    match save {
        Some(path) => {
            fs::write(&path, &bytes)
                .with_context(|| format!("Failed to write '{}'", path.display()))?;
            info!("saved {}", path.display());
        }
        None => {
            // Write PNG to stdout
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(&bytes)
                .context("Failed to write PNG to stdout")?;
            handle.flush().context("Failed to flush stdout")?;
        }
    }

    Ok(())
}
