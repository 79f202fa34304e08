#![forbid(unsafe_code)]

//! SVG → PNG/PDF/SVGZ/raw-RGBA conversion, pure Rust.

use crate::OutputFormat;
use flate2::Compression;
use flate2::write::GzEncoder;
use std::io::Write as _;

#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    #[error("failed to parse rendered SVG")]
    SvgParse,
    #[error("failed to allocate pixmap for raster rendering")]
    PixmapAlloc,
    #[error("failed to encode PNG")]
    PngEncode,
    #[error("failed to convert SVG to PDF")]
    PdfConvert,
    #[error("failed to compress SVG")]
    SvgzEncode,
    #[error("output format {0} is not supported")]
    UnsupportedFormat(OutputFormat),
}

pub type Result<T> = std::result::Result<T, RasterError>;

pub fn svg_to_png(svg: &str) -> Result<Vec<u8>> {
    let pixmap = svg_to_pixmap(svg)?;
    pixmap.encode_png().map_err(|_| RasterError::PngEncode)
}

/// Raw RGBA8 pixel bytes of the rasterized legend, row-major.
pub fn svg_to_rgba(svg: &str) -> Result<Vec<u8>> {
    Ok(svg_to_pixmap(svg)?.take())
}

pub fn svg_to_pdf(svg: &str) -> Result<Vec<u8>> {
    let mut opt = svg2pdf::usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();
    opt.font_family = "DejaVu Sans".to_string();

    let tree = svg2pdf::usvg::Tree::from_str(svg, &opt).map_err(|_| RasterError::SvgParse)?;
    svg2pdf::to_pdf(
        &tree,
        svg2pdf::ConversionOptions::default(),
        svg2pdf::PageOptions::default(),
    )
    .map_err(|_| RasterError::PdfConvert)
}

/// Gzip-compressed SVG (`.svgz`), best compression.
pub fn svg_to_svgz(svg: &str) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
    encoder
        .write_all(svg.as_bytes())
        .map_err(|_| RasterError::SvgzEncode)?;
    encoder.finish().map_err(|_| RasterError::SvgzEncode)
}

fn svg_to_pixmap(svg: &str) -> Result<tiny_skia::Pixmap> {
    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();
    opt.font_family = "DejaVu Sans".to_string();

    let tree = usvg::Tree::from_str(svg, &opt).map_err(|_| RasterError::SvgParse)?;

    // The renderer always emits a root viewBox; fall back to the usvg size
    // for foreign documents.
    let (width, height) = match parse_svg_viewbox(svg) {
        Some((w, h)) => (w, h),
        None => {
            let size = tree.size();
            (size.width(), size.height())
        }
    };
    let width_px = width.ceil().max(1.0) as u32;
    let height_px = height.ceil().max(1.0) as u32;

    let mut pixmap = tiny_skia::Pixmap::new(width_px, height_px).ok_or(RasterError::PixmapAlloc)?;
    resvg::render(&tree, tiny_skia::Transform::identity(), &mut pixmap.as_mut());
    Ok(pixmap)
}

/// Cheap, non-validating root `viewBox="minX minY w h"` extraction.
fn parse_svg_viewbox(svg: &str) -> Option<(f32, f32)> {
    let i = svg.find("viewBox=\"")?;
    let rest = &svg[i + "viewBox=\"".len()..];
    let end = rest.find('"')?;
    let mut it = rest[..end].split_whitespace();
    let _min_x = it.next()?.parse::<f32>().ok()?;
    let _min_y = it.next()?.parse::<f32>().ok()?;
    let width = it.next()?.parse::<f32>().ok()?;
    let height = it.next()?.parse::<f32>().ok()?;
    if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
        Some((width, height))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="40" height="20" viewBox="0 0 40 20"><rect x="0" y="0" width="40" height="20" fill="rgb(255,0,0)"/></svg>"#;

    #[test]
    fn viewbox_extraction() {
        assert_eq!(parse_svg_viewbox(SVG), Some((40.0, 20.0)));
        assert_eq!(parse_svg_viewbox("<svg/>"), None);
    }

    #[test]
    fn png_output_has_png_signature() {
        let png = svg_to_png(SVG).unwrap();
        assert_eq!(&png[..8], &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]);
    }

    #[test]
    fn rgba_output_covers_every_pixel() {
        let rgba = svg_to_rgba(SVG).unwrap();
        assert_eq!(rgba.len(), 40 * 20 * 4);
        assert_eq!(&rgba[..4], &[255, 0, 0, 255]);
    }

    #[test]
    fn svgz_output_is_gzip() {
        let svgz = svg_to_svgz(SVG).unwrap();
        assert_eq!(&svgz[..2], &[0x1f, 0x8b]);
        assert!(svgz.len() < SVG.len());
    }

    #[test]
    fn pdf_output_has_pdf_header() {
        let pdf = svg_to_pdf(SVG).unwrap();
        assert_eq!(&pdf[..5], b"%PDF-");
    }
}
