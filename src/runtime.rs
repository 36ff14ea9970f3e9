// Runtime executor: runs the render pipeline over a catalog of datasets

use crate::algebra::Spec;
use crate::compiler;
use crate::csv_reader::Catalog;
use crate::graph::{self, OutputFormat};
use crate::ir::ResolvedSpec;
use crate::resolve;
use crate::scale;
use crate::transform;
use anyhow::{bail, Context, Result};
use tracing::info;

/// Output configuration for one render
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
    pub title: Option<String>,
    pub format: OutputFormat,
    /// Bucket count for histograms
    pub bins: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            width: 800,
            height: 800,
            title: None,
            format: OutputFormat::Png,
            bins: 20,
        }
    }
}

/// Apply smart defaults, wrapping the typed error for callers on anyhow
pub fn resolve_spec(spec: &Spec) -> Result<ResolvedSpec> {
    resolve::resolve(spec).context("Failed to resolve plot roles")
}

/// Render an algebraic spec to encoded image bytes
pub fn render_plot(spec: &Spec, catalog: &Catalog, options: &RenderOptions) -> Result<Vec<u8>> {
    // Validate: must have at least one layer
    if spec.is_empty() {
        bail!("Plot requires at least one layer");
    }
    if catalog.is_empty() {
        bail!("Plot requires at least one dataset");
    }

    // 1. Resolve
    let resolved = resolve_spec(spec)?;

    // 2. Transform
    let data = transform::apply_transformations(&resolved, catalog, options.bins)
        .context("Failed to prepare layer data")?;

    // 3. Scale
    let scales = scale::build_scales(&data, resolved.layout)?;

    // 4. Compile
    let scene = compiler::compile_geometry(data, scales, options)?;

    info!(
        layers = resolved.layers.len(),
        nrow = scene.nrow,
        ncol = scene.ncol,
        format = ?options.format,
        "rendering plot"
    );

    // 5. Render
    graph::render_scene(&scene, options.format).context("Failed to render plot")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::{nest, Layer};
    use crate::csv_reader::dataset_from_str;

    const IRIS: &str = "sepal_length,sepal_width,petal_length,species\n\
                        5.1,3.5,1.4,setosa\n\
                        4.9,3.0,1.4,setosa\n\
                        7.0,3.2,4.7,versicolor\n\
                        6.4,3.2,4.5,versicolor\n\
                        6.3,3.3,6.0,virginica\n\
                        5.8,2.7,5.1,virginica\n";

    fn catalog() -> Catalog {
        Catalog::from(dataset_from_str("iris", IRIS).unwrap())
    }

    fn small() -> RenderOptions {
        RenderOptions {
            width: 300,
            height: 300,
            bins: 5,
            ..Default::default()
        }
    }

    fn is_valid_png(bytes: &[u8]) -> bool {
        bytes.len() > 8 && bytes[0..8] == [137, 80, 78, 71, 13, 10, 26, 10]
    }

    #[test]
    fn test_render_splom_png() {
        let vars = Spec::columns(["sepal_length", "sepal_width", "petal_length"]);
        let bytes = render_plot(&(vars.clone() * vars), &catalog(), &small()).unwrap();
        assert!(is_valid_png(&bytes));
    }

    #[test]
    fn test_render_grouped_splom_svg() {
        let vars = Spec::columns(["sepal_length", "petal_length"]);
        let spec = nest(&(vars.clone() * vars), "species");
        let options = RenderOptions {
            format: OutputFormat::Svg,
            title: Some("iris".to_string()),
            ..small()
        };
        let svg = String::from_utf8(render_plot(&spec, &catalog(), &options).unwrap()).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("setosa"));
    }

    #[test]
    fn test_render_empty_spec_rejected() {
        let err = render_plot(&Spec::empty(), &catalog(), &small()).unwrap_err();
        assert!(err.to_string().contains("at least one layer"));
    }

    #[test]
    fn test_render_empty_catalog_rejected() {
        assert!(render_plot(&Spec::columns(["a"]), &Catalog::new(), &small()).is_err());
    }

    #[test]
    fn test_render_ambiguous_roles_reported() {
        let spec = Spec::from(Layer::columns(["sepal_length", "sepal_width", "petal_length"]));
        let err = render_plot(&spec, &catalog(), &small()).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("sepal_length, sepal_width, petal_length"), "{message}");
    }

    #[test]
    fn test_default_options() {
        let options = RenderOptions::default();
        assert_eq!((options.width, options.height, options.bins), (800, 800, 20));
        assert_eq!(options.format, OutputFormat::Png);
    }
}
