#![forbid(unsafe_code)]

//! SVG rendering of derived legend layouts.
//!
//! Consumes the [`MapLayout`]s produced by `legenda-core` and emits a
//! standalone SVG legend: numeric color bars with outward ticks, optional
//! classification swatch keys, titles and unit captions. The figure geometry
//! reproduces the panel fractions of the original OnEarth legend generator
//! at 100 px per figure unit, with a transparent background.

mod colorbar;
mod figure;
mod svg;
mod swatch;
pub mod tooltip;

use crate::figure::FigureGeometry;
use crate::svg::{escape_xml, fmt, pt_to_px};
use legenda_core::layout::MapLayout;
use legenda_core::model::Style;
use std::fmt::Write as _;

pub use tooltip::{TooltipAnchors, attach_tooltips};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no renderable color maps in document")]
    NoRenderableMaps,
}

pub type Result<T> = std::result::Result<T, Error>;

/// Legend reading direction: bar along the x axis or the y axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    pub fn as_str(self) -> &'static str {
        match self {
            Orientation::Horizontal => "horizontal",
            Orientation::Vertical => "vertical",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "horizontal" => Some(Orientation::Horizontal),
            "vertical" => Some(Orientation::Vertical),
            _ => None,
        }
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rendered legend plus the anchors the tooltip pass needs.
///
/// `tooltip_anchors` is present when at least one color bar was drawn; it
/// describes the first bar only.
#[derive(Debug, Clone)]
pub struct RenderedLegend {
    pub svg: String,
    pub tooltip_anchors: Option<TooltipAnchors>,
}

const TITLE_PT: f64 = 10.0;
const UNITS_PT: f64 = 10.0;

/// Renders the laid-out legend to a standalone SVG document.
pub fn render_legend_svg(layouts: &[MapLayout], orientation: Orientation) -> Result<RenderedLegend> {
    if layouts.is_empty() {
        return Err(Error::NoRenderableMaps);
    }
    let geom = FigureGeometry::compute(layouts, orientation);

    let mut out = String::new();
    let _ = write!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="DejaVu Sans, Verdana, sans-serif">"#,
        w = fmt(geom.width),
        h = fmt(geom.height),
    );

    let mut anchors: Option<TooltipAnchors> = None;
    for (i, layout) in layouts.iter().enumerate() {
        if !layout.swatches.is_empty() {
            swatch::render_swatch_key(&mut out, &geom, i, layout, orientation);
        }

        if let Some(bar) = &layout.bar {
            let first_bar = anchors.is_none();
            let rendered =
                colorbar::render_colorbar(&mut out, &geom, i, layout, bar, orientation, first_bar);
            if first_bar {
                anchors = Some(TooltipAnchors {
                    positions: rendered.tick_label_positions,
                    bin_count: rendered.bin_count,
                });
            }

            // Horizontal figures carry the units as a caption below the bar;
            // vertical ones fold them into the outer tick labels.
            if orientation == Orientation::Horizontal
                && layout.shared_style != Style::Classification
            {
                if let Some(units) = layout.units.as_deref() {
                    let (x, y) = geom.fraction_point(0.5, 0.05);
                    let _ = write!(
                        out,
                        r#"<text x="{x}" y="{y}" font-size="{fs}" text-anchor="middle">{units}</text>"#,
                        x = fmt(x),
                        y = fmt(y),
                        fs = fmt(pt_to_px(UNITS_PT)),
                        units = escape_xml(units),
                    );
                }
            }
        }

        if let Some(title) = layout.title.as_deref() {
            render_title(&mut out, &geom, i, layout, title, orientation);
        }
    }

    out.push_str("</svg>");
    Ok(RenderedLegend {
        svg: out,
        tooltip_anchors: anchors,
    })
}

fn render_title(
    out: &mut String,
    geom: &FigureGeometry,
    index: usize,
    layout: &MapLayout,
    title: &str,
    orientation: Orientation,
) {
    let (fx, fy) = match orientation {
        Orientation::Horizontal => {
            let fy = if geom.map_count == 1 {
                1.0 - geom.title_pad
            } else {
                geom.bar_bottom(index) + geom.title_pad
            };
            (0.5, fy)
        }
        Orientation::Vertical => {
            let fx = if geom.map_count > 1 {
                geom.bar_left(index) + 0.025
            } else {
                0.5
            };
            let fy = if layout.style != Style::Classification {
                0.96
            } else {
                1.0 - geom.title_pad
            };
            (fx, fy)
        }
    };
    let (x, y) = geom.fraction_point(fx, fy);
    let _ = write!(
        out,
        r#"<text x="{x}" y="{y}" font-size="{fs}" text-anchor="middle">{title}</text>"#,
        x = fmt(x),
        y = fmt(y),
        fs = fmt(pt_to_px(TITLE_PT)),
        title = escape_xml(title),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use legenda_core::layout::layout_colormaps;
    use legenda_core::parse::parse_colormaps;

    fn render(xml: &str, orientation: Orientation) -> RenderedLegend {
        let maps = parse_colormaps(xml).unwrap();
        let (layouts, _) = layout_colormaps(&maps).unwrap();
        render_legend_svg(&layouts, orientation).unwrap()
    }

    const DISCRETE: &str = r#"<ColorMap title="Depth" units="m">
        <ColorMapEntry rgb="255,0,0" value="0"/>
        <ColorMapEntry rgb="0,255,0" value="10"/>
        <ColorMapEntry rgb="0,0,255" value="20"/>
    </ColorMap>"#;

    #[test]
    fn horizontal_bar_has_bins_ticks_and_caption() {
        let rendered = render(DISCRETE, Orientation::Horizontal);
        let svg = &rendered.svg;

        assert!(svg.starts_with("<svg "));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains(r#"id="bin-0""#));
        assert!(svg.contains(r#"id="bin-2""#));
        assert!(svg.contains(r#"fill="rgb(255,0,0)""#));
        // Units caption and title.
        assert!(svg.contains(">m</text>"));
        assert!(svg.contains(">Depth</text>"));
        // One tick label per entry on the centered path.
        assert_eq!(svg.matches("<line ").count(), 3);

        let anchors = rendered.tooltip_anchors.unwrap();
        assert_eq!(anchors.bin_count, 3);
        assert_eq!(anchors.positions.len(), 3);
    }

    #[test]
    fn vertical_bar_folds_units_into_outer_labels() {
        let rendered = render(DISCRETE, Orientation::Vertical);
        let svg = &rendered.svg;
        assert!(svg.contains(">0 m</text>"));
        assert!(svg.contains(">20 m</text>"));
        assert!(svg.contains(">10</text>"));
        assert!(!svg.contains(r#"text-anchor="middle">m</text>"#));
    }

    #[test]
    fn classification_map_renders_a_key_without_a_bar() {
        let xml = r#"<ColorMap>
            <ColorMapEntry rgb="0,0,255" label="Water"/>
            <ColorMapEntry rgb="0,255,0" label="Land"/>
        </ColorMap>"#;
        let rendered = render(xml, Orientation::Vertical);
        assert!(rendered.tooltip_anchors.is_none());
        assert!(rendered.svg.contains(">Water</text>"));
        assert!(!rendered.svg.contains("id=\"bin-"));
    }

    #[test]
    fn empty_layout_list_is_an_error() {
        assert!(matches!(
            render_legend_svg(&[], Orientation::Vertical),
            Err(Error::NoRenderableMaps)
        ));
    }

    #[test]
    fn second_bar_gets_no_bin_ids() {
        let xml = r#"<ColorMaps>
            <ColorMap><ColorMapEntry rgb="255,0,0" value="0"/><ColorMapEntry rgb="0,255,0" value="1"/></ColorMap>
            <ColorMap><ColorMapEntry rgb="0,0,255" value="5"/><ColorMapEntry rgb="255,255,0" value="6"/></ColorMap>
        </ColorMaps>"#;
        let rendered = render(xml, Orientation::Vertical);
        // Bin ids appear once per first-bar bin, never for the second bar.
        assert_eq!(rendered.svg.matches("id=\"bin-0\"").count(), 1);
        assert_eq!(rendered.svg.matches("id=\"bin-").count(), 2);
    }
}
