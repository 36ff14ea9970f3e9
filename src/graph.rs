use crate::ir::{DrawCommand, PanelScene, SceneGraph};
use crate::palette;
use anyhow::{anyhow, bail, Context, Result};
use image::ImageEncoder;
use plotters::coord::Shift;
use plotters::prelude::*;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointStyle {
    pub color: Option<String>,
    pub size: Option<f64>,
    pub alpha: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineStyle {
    pub color: Option<String>,
    pub width: Option<f64>,
    pub alpha: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BarStyle {
    pub color: Option<String>,
    pub alpha: Option<f64>,
}

/// Encoded output of the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Png,
    Svg,
}

const DEFAULT_POINT_SIZE: f64 = 3.0;
const DEFAULT_LINE_WIDTH: f64 = 2.0;
const DEFAULT_ALPHA: f64 = 0.8;

/// Execute a scene graph with plotters and encode it
pub fn render_scene(scene: &SceneGraph, format: OutputFormat) -> Result<Vec<u8>> {
    if scene.width == 0 || scene.height == 0 {
        bail!("Invalid dimensions: {}x{}", scene.width, scene.height);
    }

    match format {
        OutputFormat::Png => render_png(scene),
        OutputFormat::Svg => render_svg(scene),
    }
}

/// Upper bound on the RGB buffer of a PNG render (1 GiB)
const MAX_PNG_BUFFER_BYTES: usize = 1 << 30;

fn render_png(scene: &SceneGraph) -> Result<Vec<u8>> {
    let len = (scene.width as usize)
        .checked_mul(scene.height as usize)
        .and_then(|n| n.checked_mul(3))
        .filter(|&n| n <= MAX_PNG_BUFFER_BYTES)
        .ok_or_else(|| anyhow!("Image too large: {}x{}", scene.width, scene.height))?;
    let mut buffer = vec![0u8; len];

    {
        let root = BitMapBackend::with_buffer(&mut buffer, (scene.width, scene.height))
            .into_drawing_area();
        draw_scene(&root, scene)?;
        root.present()
            .map_err(|e| anyhow!("Failed to present drawing: {}", e))?;
    }

    let mut png_bytes = Vec::new();
    {
        let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
        encoder
            .write_image(&buffer, scene.width, scene.height, image::ColorType::Rgb8)
            .context("Failed to encode PNG")?;
    }

    Ok(png_bytes)
}

fn render_svg(scene: &SceneGraph) -> Result<Vec<u8>> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (scene.width, scene.height))
            .into_drawing_area();
        draw_scene(&root, scene)?;
        root.present()
            .map_err(|e| anyhow!("Failed to present drawing: {}", e))?;
    }
    Ok(svg.into_bytes())
}

fn draw_scene<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, scene: &SceneGraph) -> Result<()> {
    root.fill(&WHITE)
        .map_err(|e| anyhow!("Failed to fill background: {}", e))?;

    let plot_area = match &scene.title {
        Some(title) => root
            .titled(title, ("sans-serif", 24))
            .map_err(|e| anyhow!("Failed to draw title: {}", e))?,
        None => root.clone(),
    };

    let cells = plot_area.split_evenly((scene.nrow, scene.ncol));
    for panel in &scene.panels {
        let Some(cell) = cells.get(panel.row * scene.ncol + panel.col) else {
            bail!("Panel ({}, {}) outside the {}x{} grid", panel.row, panel.col, scene.nrow, scene.ncol);
        };
        if panel.commands.is_empty() {
            continue;
        }
        draw_panel(cell, panel)?;
    }

    Ok(())
}

fn draw_panel<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>, panel: &PanelScene) -> Result<()> {
    let (x_min, x_max) = panel.x_scale.domain;
    let (y_min, y_max) = panel.y_scale.domain;

    let mut chart = ChartBuilder::on(area)
        .margin(8)
        .x_label_area_size(35)
        .y_label_area_size(45)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(|e| anyhow!("Failed to build chart: {}", e))?;

    chart
        .configure_mesh()
        .x_labels(5)
        .y_labels(5)
        .x_desc(panel.x_label.as_str())
        .y_desc(panel.y_label.as_str())
        .draw()
        .map_err(|e| anyhow!("Failed to draw mesh: {}", e))?;

    let mut has_legend = false;

    for command in &panel.commands {
        match command {
            DrawCommand::DrawPoints { points, style, legend } => {
                let color = to_color(style.color.as_deref(), style.alpha);
                let size = style.size.unwrap_or(DEFAULT_POINT_SIZE).round().max(1.0) as u32;
                let series = chart
                    .draw_series(
                        points
                            .iter()
                            .map(|&(x, y)| Circle::new((x, y), size, color.filled())),
                    )
                    .map_err(|e| anyhow!("Failed to draw points: {}", e))?;
                if let Some(label) = legend {
                    has_legend = true;
                    series
                        .label(label.as_str())
                        .legend(move |(x, y)| Circle::new((x + 8, y), 4, color.filled()));
                }
            }
            DrawCommand::DrawLine { points, style, legend } => {
                let color = to_color(style.color.as_deref(), style.alpha);
                let width = style.width.unwrap_or(DEFAULT_LINE_WIDTH).round().max(1.0) as u32;
                let series = chart
                    .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(width)))
                    .map_err(|e| anyhow!("Failed to draw line: {}", e))?;
                if let Some(label) = legend {
                    has_legend = true;
                    series.label(label.as_str()).legend(move |(x, y)| {
                        PathElement::new(vec![(x, y), (x + 16, y)], color.stroke_width(2))
                    });
                }
            }
            DrawCommand::DrawRect { tl, br, style, legend } => {
                let color = to_color(style.color.as_deref(), style.alpha);
                let series = chart
                    .draw_series(std::iter::once(Rectangle::new([*tl, *br], color.filled())))
                    .map_err(|e| anyhow!("Failed to draw bar: {}", e))?;
                if let Some(label) = legend {
                    has_legend = true;
                    series.label(label.as_str()).legend(move |(x, y)| {
                        Rectangle::new([(x, y - 4), (x + 12, y + 4)], color.filled())
                    });
                }
            }
        }
    }

    if has_legend {
        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(|e| anyhow!("Failed to draw legend: {}", e))?;
    }

    Ok(())
}

/// Unknown color names fall back to the first palette color
fn to_color(name: Option<&str>, alpha: Option<f64>) -> RGBAColor {
    let (r, g, b) = name
        .and_then(palette::rgb)
        .or_else(|| palette::rgb(&palette::ColorPalette::category10().get_color(0)))
        .unwrap_or((0, 0, 0));
    RGBColor(r, g, b).mix(alpha.unwrap_or(DEFAULT_ALPHA).clamp(0.0, 1.0))
}
