use crate::ir::{DrawCommand, LayerData, PanelScene, RenderData, RenderStyle, ScaleSystem, SceneGraph};
use crate::runtime::RenderOptions;
use anyhow::{bail, Result};
use tracing::debug;

const DEFAULT_GROUP: &str = "default";

/// Compile data and scales into a SceneGraph of drawing commands
pub fn compile_geometry(data: RenderData, scales: ScaleSystem, options: &RenderOptions) -> Result<SceneGraph> {
    if data.panels.len() != scales.panels.len() {
        bail!(
            "Scale system covers {} panels but the data has {}",
            scales.panels.len(),
            data.panels.len()
        );
    }

    let mut panels = Vec::with_capacity(data.panels.len());

    for (panel_data, panel_scales) in data.panels.into_iter().zip(scales.panels) {
        let (x_label, y_label) = panel_labels(&panel_data.layers);
        let mut commands = Vec::new();

        for layer in panel_data.layers {
            compile_layer(layer, &mut commands);
        }

        panels.push(PanelScene {
            row: panel_data.row,
            col: panel_data.col,
            x_label,
            y_label,
            x_scale: panel_scales.x,
            y_scale: panel_scales.y,
            commands,
        });
    }

    let commands: usize = panels.iter().map(|p| p.commands.len()).sum();
    debug!(panels = panels.len(), commands, "compiled scene graph");

    Ok(SceneGraph {
        width: options.width,
        height: options.height,
        title: options.title.clone(),
        nrow: data.nrow,
        ncol: data.ncol,
        panels,
    })
}

/// Axis labels come from the panel's first layer
fn panel_labels(layers: &[LayerData]) -> (String, String) {
    match layers.first() {
        Some(layer) if layer.bin_width.is_some() => (layer.x_label.clone(), "count".to_string()),
        Some(layer) => (
            layer.x_label.clone(),
            layer.y_label.clone().unwrap_or_default(),
        ),
        None => (String::new(), String::new()),
    }
}

fn compile_layer(layer: LayerData, commands: &mut Vec<DrawCommand>) {
    let half_width = layer.bin_width.unwrap_or(1.0) / 2.0;

    for group in layer.groups {
        // Only grouped layers get a legend entry
        let legend = (group.key != DEFAULT_GROUP).then(|| group.key.clone());

        match group.style {
            RenderStyle::Point(style) => {
                let points = group.x.into_iter().zip(group.y).collect();
                commands.push(DrawCommand::DrawPoints { points, style, legend });
            }
            RenderStyle::Line(style) => {
                let mut points: Vec<(f64, f64)> = group.x.into_iter().zip(group.y).collect();
                points.sort_by(|a, b| a.0.total_cmp(&b.0));
                commands.push(DrawCommand::DrawLine { points, style, legend });
            }
            RenderStyle::Bar(style) => {
                let bars = group.x.iter().zip(&group.y).zip(&group.y_start);
                for (i, ((&x, &top), &bottom)) in bars.enumerate() {
                    commands.push(DrawCommand::DrawRect {
                        tl: (x - half_width, top),
                        br: (x + half_width, bottom),
                        style: style.clone(),
                        // Only legend once per group
                        legend: if i == 0 { legend.clone() } else { None },
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::Geom;
    use crate::graph::{BarStyle, LineStyle, OutputFormat, PointStyle};
    use crate::ir::{GroupData, PanelData, PanelScales, Scale};

    fn options() -> RenderOptions {
        RenderOptions {
            width: 640,
            height: 480,
            title: Some("iris".to_string()),
            format: OutputFormat::Png,
            bins: 20,
        }
    }

    fn group(key: &str, x: Vec<f64>, y: Vec<f64>, style: RenderStyle) -> GroupData {
        GroupData {
            key: key.to_string(),
            rows: Vec::new(),
            y_start: vec![0.0; y.len()],
            x,
            y,
            style,
        }
    }

    fn single_panel(layers: Vec<LayerData>) -> (RenderData, ScaleSystem) {
        let data = RenderData {
            panels: vec![PanelData { row: 0, col: 0, layers }],
            nrow: 1,
            ncol: 1,
        };
        let scales = ScaleSystem {
            panels: vec![PanelScales {
                x: Scale { domain: (0.0, 1.0) },
                y: Scale { domain: (0.0, 20.0) },
            }],
        };
        (data, scales)
    }

    #[test]
    fn test_compile_line_sorted_by_x() {
        let (data, scales) = single_panel(vec![LayerData {
            layer_index: 0,
            geom: Geom::Line,
            x_label: "x".to_string(),
            y_label: Some("y".to_string()),
            bin_width: None,
            groups: vec![group(
                DEFAULT_GROUP,
                vec![1.0, 0.0],
                vec![20.0, 10.0],
                RenderStyle::Line(LineStyle::default()),
            )],
        }]);
        let scene = compile_geometry(data, scales, &options()).unwrap();

        assert_eq!((scene.width, scene.height), (640, 480));
        assert_eq!(scene.title.as_deref(), Some("iris"));
        let panel = &scene.panels[0];
        assert_eq!((panel.x_label.as_str(), panel.y_label.as_str()), ("x", "y"));
        match &panel.commands[0] {
            DrawCommand::DrawLine { points, legend, .. } => {
                assert_eq!(points, &vec![(0.0, 10.0), (1.0, 20.0)]);
                assert_eq!(legend, &None);
            }
            other => panic!("Expected DrawLine, got {other:?}"),
        }
    }

    #[test]
    fn test_compile_grouped_points_have_legends() {
        let (data, scales) = single_panel(vec![LayerData {
            layer_index: 0,
            geom: Geom::Scatter,
            x_label: "a".to_string(),
            y_label: Some("b".to_string()),
            bin_width: None,
            groups: vec![
                group("setosa", vec![1.0], vec![2.0], RenderStyle::Point(PointStyle::default())),
                group("virginica", vec![3.0], vec![4.0], RenderStyle::Point(PointStyle::default())),
            ],
        }]);
        let scene = compile_geometry(data, scales, &options()).unwrap();
        let legends: Vec<Option<&str>> = scene.panels[0]
            .commands
            .iter()
            .map(|c| match c {
                DrawCommand::DrawPoints { legend, .. } => legend.as_deref(),
                _ => None,
            })
            .collect();
        assert_eq!(legends, vec![Some("setosa"), Some("virginica")]);
    }

    #[test]
    fn test_compile_histogram_rects() {
        let (data, scales) = single_panel(vec![LayerData {
            layer_index: 0,
            geom: Geom::Histogram,
            x_label: "a".to_string(),
            y_label: None,
            bin_width: Some(0.5),
            groups: vec![group(
                "setosa",
                vec![0.25, 0.75],
                vec![3.0, 1.0],
                RenderStyle::Bar(BarStyle::default()),
            )],
        }]);
        let scene = compile_geometry(data, scales, &options()).unwrap();
        let panel = &scene.panels[0];
        assert_eq!(panel.y_label, "count");
        assert_eq!(panel.commands.len(), 2);

        match &panel.commands[0] {
            DrawCommand::DrawRect { tl, br, legend, .. } => {
                assert_eq!(*tl, (0.0, 3.0));
                assert_eq!(*br, (0.5, 0.0));
                assert_eq!(legend.as_deref(), Some("setosa"));
            }
            other => panic!("Expected DrawRect, got {other:?}"),
        }
        match &panel.commands[1] {
            DrawCommand::DrawRect { legend, .. } => assert_eq!(legend, &None),
            other => panic!("Expected DrawRect, got {other:?}"),
        }
    }

    #[test]
    fn test_compile_empty_panel() {
        let (data, scales) = single_panel(vec![]);
        let scene = compile_geometry(data, scales, &options()).unwrap();
        assert!(scene.panels[0].commands.is_empty());
        assert_eq!(scene.panels[0].x_label, "");
    }

    #[test]
    fn test_compile_mismatched_scales() {
        let (data, _) = single_panel(vec![]);
        let scales = ScaleSystem { panels: vec![] };
        assert!(compile_geometry(data, scales, &options()).is_err());
    }
}
