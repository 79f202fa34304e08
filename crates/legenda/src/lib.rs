#![forbid(unsafe_code)]

//! `legenda` generates map legends from GIBS-style ColorMap XML documents.
//!
//! The pipeline is fetch → parse → layout → render: a color-map document is
//! normalized into value records, classified as discrete/range/classification,
//! laid out into color-bar bounds and ticks, and rendered to a standalone SVG.
//! SVG output optionally gains hover tooltips; the `raster` feature adds
//! PNG/PDF/SVGZ/raw-RGBA conversion via pure-Rust SVG rasterization.
//!
//! # Features
//!
//! - `raster`: enable [`generate_legend`] and the [`raster`] conversion module

pub use legenda_core::*;
pub use legenda_render::{
    Orientation, RenderedLegend, TooltipAnchors, attach_tooltips, render_legend_svg,
};

use legenda_core::layout::layout_colormaps;
use legenda_core::model::ColorMaps;

#[cfg(feature = "raster")]
pub mod raster;

/// Output file format. All formats are recognized by the parser; the
/// PostScript family (`eps`, `ps`, `pgf`) is rejected at conversion time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Eps,
    Pdf,
    Pgf,
    Png,
    Ps,
    Raw,
    Rgba,
    Svg,
    Svgz,
}

impl OutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Eps => "eps",
            OutputFormat::Pdf => "pdf",
            OutputFormat::Pgf => "pgf",
            OutputFormat::Png => "png",
            OutputFormat::Ps => "ps",
            OutputFormat::Raw => "raw",
            OutputFormat::Rgba => "rgba",
            OutputFormat::Svg => "svg",
            OutputFormat::Svgz => "svgz",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "eps" => Some(OutputFormat::Eps),
            "pdf" => Some(OutputFormat::Pdf),
            "pgf" => Some(OutputFormat::Pgf),
            "png" => Some(OutputFormat::Png),
            "ps" => Some(OutputFormat::Ps),
            "raw" => Some(OutputFormat::Raw),
            "rgba" => Some(OutputFormat::Rgba),
            "svg" => Some(OutputFormat::Svg),
            "svgz" => Some(OutputFormat::Svgz),
            _ => None,
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error(transparent)]
    Document(#[from] legenda_core::Error),
    #[error(transparent)]
    Render(#[from] legenda_render::Error),
    #[cfg(feature = "raster")]
    #[error(transparent)]
    Raster(#[from] raster::RasterError),
}

pub type GenerateResult<T> = std::result::Result<T, GenerateError>;

/// Finished legend bytes in the requested format.
#[derive(Debug, Clone)]
pub struct GeneratedLegend {
    pub bytes: Vec<u8>,
    /// True when the SVG hover-tooltip pass ran (SVG output, numeric legend,
    /// small palette).
    pub tooltips_applied: bool,
}

/// Generates an SVG legend, with hover tooltips when the legend is numeric
/// and not down-sampled.
pub fn generate_legend_svg(
    maps: &ColorMaps,
    orientation: Orientation,
) -> GenerateResult<GeneratedLegend> {
    let (layouts, summary) = layout_colormaps(maps)?;
    let rendered = render_legend_svg(&layouts, orientation)?;

    let mut tooltips_applied = false;
    let mut svg = rendered.svg;
    if summary.has_values && !summary.large_palette {
        if let Some(anchors) = &rendered.tooltip_anchors {
            svg = attach_tooltips(&svg, anchors, &summary.labels);
            tooltips_applied = true;
        }
    }
    Ok(GeneratedLegend {
        bytes: svg.into_bytes(),
        tooltips_applied,
    })
}

/// Generates a legend in any supported output format.
#[cfg(feature = "raster")]
pub fn generate_legend(
    maps: &ColorMaps,
    format: OutputFormat,
    orientation: Orientation,
) -> GenerateResult<GeneratedLegend> {
    if format == OutputFormat::Svg {
        return generate_legend_svg(maps, orientation);
    }

    let (layouts, _) = layout_colormaps(maps)?;
    let rendered = render_legend_svg(&layouts, orientation)?;
    let bytes = match format {
        OutputFormat::Svgz => raster::svg_to_svgz(&rendered.svg)?,
        OutputFormat::Png => raster::svg_to_png(&rendered.svg)?,
        OutputFormat::Pdf => raster::svg_to_pdf(&rendered.svg)?,
        OutputFormat::Raw | OutputFormat::Rgba => raster::svg_to_rgba(&rendered.svg)?,
        // eps/ps/pgf are accepted on the command line but have no backend.
        other => return Err(raster::RasterError::UnsupportedFormat(other).into()),
    };
    Ok(GeneratedLegend {
        bytes,
        tooltips_applied: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use legenda_core::parse::parse_colormaps;

    const DISCRETE: &str = r#"<ColorMap units="K">
        <ColorMapEntry rgb="255,0,0" value="0" label="cold"/>
        <ColorMapEntry rgb="0,0,255" value="10" label="warm"/>
    </ColorMap>"#;

    #[test]
    fn output_format_parsing() {
        assert_eq!(OutputFormat::parse("SVG"), Some(OutputFormat::Svg));
        assert_eq!(OutputFormat::parse("svgz"), Some(OutputFormat::Svgz));
        assert_eq!(OutputFormat::parse("rgba"), Some(OutputFormat::Rgba));
        assert_eq!(OutputFormat::parse("gif"), None);
        assert_eq!(OutputFormat::Pdf.to_string(), "pdf");
    }

    #[test]
    fn svg_output_gets_tooltips() {
        let maps = parse_colormaps(DISCRETE).unwrap();
        let generated = generate_legend_svg(&maps, Orientation::Vertical).unwrap();
        assert!(generated.tooltips_applied);
        let text = String::from_utf8(generated.bytes).unwrap();
        assert!(text.contains("ShowTooltip"));
        assert!(text.contains(">cold</text>"));
    }

    #[test]
    fn classification_legend_skips_tooltips() {
        let xml = r#"<ColorMap>
            <ColorMapEntry rgb="0,0,255" label="Water"/>
        </ColorMap>"#;
        let maps = parse_colormaps(xml).unwrap();
        let generated = generate_legend_svg(&maps, Orientation::Vertical).unwrap();
        assert!(!generated.tooltips_applied);
        let text = String::from_utf8(generated.bytes).unwrap();
        assert!(!text.contains("ShowTooltip"));
    }

    #[test]
    fn large_palette_skips_tooltips() {
        let mut xml = String::from("<ColorMap>");
        for i in 0..13 {
            xml.push_str(&format!(r#"<ColorMapEntry rgb="{i},0,0" value="{i}"/>"#));
        }
        xml.push_str("</ColorMap>");
        let maps = parse_colormaps(&xml).unwrap();
        let generated = generate_legend_svg(&maps, Orientation::Horizontal).unwrap();
        assert!(!generated.tooltips_applied);
    }

    #[cfg(feature = "raster")]
    #[test]
    fn postscript_formats_are_rejected() {
        let maps = parse_colormaps(DISCRETE).unwrap();
        for format in [OutputFormat::Eps, OutputFormat::Ps, OutputFormat::Pgf] {
            let err = generate_legend(&maps, format, Orientation::Vertical).unwrap_err();
            assert!(matches!(
                err,
                GenerateError::Raster(raster::RasterError::UnsupportedFormat(_))
            ));
        }
    }
}
