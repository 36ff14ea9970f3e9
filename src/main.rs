use anyhow::{anyhow, Context, Result};
use clap::{Parser, ValueEnum};
use gramsplom::algebra::Layout;
use gramsplom::csv_reader::{self, Catalog};
use gramsplom::graph::OutputFormat;
use gramsplom::parser::parse_expr;
use gramsplom::runtime::{self, RenderOptions};
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{debug, info};

/// Name of the dataset read from stdin when no --data is given
const STDIN_DATASET: &str = "data";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Emit {
    /// Render the plot
    Image,
    /// Print the resolved layers as JSON
    Spec,
}

#[derive(Parser, Debug)]
#[command(name = "gramsplom")]
#[command(about = "Plot CSV data from layer algebra expressions", long_about = None)]
struct Args {
    /// Algebra expression, e.g. "(a + b) * (a + b)"
    #[arg(value_name = "EXPR")]
    expr: String,

    #[arg(long = "data", value_name = "NAME=PATH", value_parser = parse_data_arg, help = "Named CSV dataset (repeatable; stdin is dataset 'data' when omitted)")]
    data: Vec<(String, PathBuf)>,

    #[arg(long = "width", default_value = "800", help = "Output width in pixels")]
    width: u32,

    #[arg(long = "height", default_value = "800", help = "Output height in pixels")]
    height: u32,

    #[arg(short = 't', long = "title", help = "Graph title")]
    title: Option<String>,

    #[arg(long = "format", value_enum, default_value_t = OutputFormat::Png, help = "Output format")]
    format: OutputFormat,

    #[arg(long = "layout", value_enum, default_value_t = Layout::Auto, help = "Panel layout")]
    layout: Layout,

    #[arg(long = "bins", default_value = "20", help = "Histogram bucket count")]
    bins: usize,

    #[arg(long = "emit", value_enum, default_value_t = Emit::Image, help = "What to write to stdout")]
    emit: Emit,
}

fn parse_data_arg(arg: &str) -> std::result::Result<(String, PathBuf), String> {
    match arg.split_once('=') {
        Some((name, path)) if !name.is_empty() && !path.is_empty() => {
            Ok((name.to_string(), PathBuf::from(path)))
        }
        _ => Err(format!("expected NAME=PATH, got '{}'", arg)),
    }
}

fn main() -> Result<()> {
    // stdout carries the image, logs go to stderr
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn,gramsplom=info")),
        )
        .init();

    let args = Args::parse();

    let (_, expr) = parse_expr(&args.expr).map_err(|e| anyhow!("Parse error: {}", e))?;
    let spec = expr.eval().with_layout(args.layout);
    debug!(layers = spec.len(), "parsed expression");

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    if args.emit == Emit::Spec {
        let resolved = runtime::resolve_spec(&spec)?;
        serde_json::to_writer_pretty(&mut handle, &resolved)
            .context("Failed to write resolved spec")?;
        writeln!(handle).context("Failed to write to stdout")?;
        handle.flush().context("Failed to flush stdout")?;
        return Ok(());
    }

    let catalog = load_catalog(&args.data)?;
    info!(datasets = ?catalog.names(), "loaded datasets");

    let options = RenderOptions {
        width: args.width,
        height: args.height,
        title: args.title,
        format: args.format,
        bins: args.bins,
    };

    let bytes = runtime::render_plot(&spec, &catalog, &options)
        .context("Failed to generate graph")?;

    handle
        .write_all(&bytes)
        .context("Failed to write image to stdout")?;
    handle.flush().context("Failed to flush stdout")?;

    Ok(())
}

fn load_catalog(data: &[(String, PathBuf)]) -> Result<Catalog> {
    let mut catalog = Catalog::new();

    if data.is_empty() {
        let dataset = csv_reader::read_csv(io::stdin().lock(), STDIN_DATASET)
            .context("Failed to read CSV from stdin")?;
        catalog.insert(dataset)?;
        return Ok(catalog);
    }

    for (name, path) in data {
        let file = File::open(path)
            .with_context(|| format!("Failed to open dataset '{}' at {}", name, path.display()))?;
        let dataset = csv_reader::read_csv(file, name)
            .with_context(|| format!("Failed to read dataset '{}'", name))?;
        catalog.insert(dataset)?;
    }

    Ok(catalog)
}
