//! Classification swatch key: colored squares with labels, laid out in
//! columns, framed when the key is the whole legend.

use crate::Orientation;
use crate::figure::FigureGeometry;
use crate::svg::{css_color, escape_xml, estimate_text_width, fmt, pt_to_px};
use legenda_core::layout::{MapLayout, SwatchItem};
use std::fmt::Write as _;

const SWATCH_SIZE: f64 = 10.0;
const SWATCH_GAP: f64 = 4.0;
const COLUMN_GAP: f64 = 12.0;
const FRAME_PAD: f64 = 6.0;

pub(crate) fn render_swatch_key(
    out: &mut String,
    geom: &FigureGeometry,
    index: usize,
    layout: &MapLayout,
    orientation: Orientation,
) {
    let swatches = &layout.swatches;
    let n = swatches.len();
    if n == 0 {
        return;
    }

    // Wider keys pack more columns at a smaller size.
    let (mut cols, font_pt) = if n > 28 {
        (3, 7.0)
    } else if n > 14 {
        (2, 8.0)
    } else {
        (1, 9.0)
    };
    // A key beside a vertical bar always stays single-column.
    if layout.has_values && orientation == Orientation::Vertical {
        cols = 1;
    }
    let font_px = pt_to_px(font_pt);
    let row_h = font_px + 4.0;
    let rows = n.div_ceil(cols);

    // Items fill columns top to bottom.
    let mut col_widths = vec![0.0_f64; cols];
    for (i, item) in swatches.iter().enumerate() {
        let col = i / rows;
        let label = item.label.as_deref().unwrap_or("");
        let w = SWATCH_SIZE + SWATCH_GAP + estimate_text_width(label, font_px);
        if w > col_widths[col] {
            col_widths[col] = w;
        }
    }
    let block_w: f64 =
        col_widths.iter().sum::<f64>() + COLUMN_GAP * cols.saturating_sub(1) as f64;
    let block_h = rows as f64 * row_h;

    let (x0, y0, framed) = place_key(geom, index, layout, orientation, block_w, block_h);

    if framed {
        let _ = write!(
            out,
            r#"<rect x="{x}" y="{y}" width="{w}" height="{h}" rx="4" fill="white" fill-opacity="0.5" stroke="rgb(204,204,204)" stroke-width="1"/>"#,
            x = fmt(x0 - FRAME_PAD),
            y = fmt(y0 - FRAME_PAD),
            w = fmt(block_w + 2.0 * FRAME_PAD),
            h = fmt(block_h + 2.0 * FRAME_PAD),
        );
    }

    for (i, item) in swatches.iter().enumerate() {
        let col = i / rows;
        let row = i % rows;
        let col_x: f64 = col_widths[..col].iter().sum::<f64>() + COLUMN_GAP * col as f64;
        let x = x0 + col_x;
        let y = y0 + row as f64 * row_h;
        draw_swatch(out, item, x, y, row_h, font_px);
    }
}

fn draw_swatch(out: &mut String, item: &SwatchItem, x: f64, y: f64, row_h: f64, font_px: f64) {
    let fill = css_color(item.color);
    let _ = write!(
        out,
        r#"<rect x="{x}" y="{y}" width="{s}" height="{s}" fill="{fill}" stroke="black" stroke-width="0.5"/>"#,
        x = fmt(x),
        y = fmt(y + (row_h - SWATCH_SIZE) / 2.0),
        s = fmt(SWATCH_SIZE),
    );
    if let Some(label) = item.label.as_deref() {
        let _ = write!(
            out,
            r#"<text x="{x}" y="{y}" font-size="{fs}" dominant-baseline="middle">{label}</text>"#,
            x = fmt(x + SWATCH_SIZE + SWATCH_GAP),
            y = fmt(y + row_h / 2.0),
            fs = fmt(font_px),
            label = escape_xml(label),
        );
    }
}

/// Top-left pixel position of the key block, and whether it gets a frame.
///
/// A key that shares the figure with a value bar is anchored beside/below
/// the bar without a frame; a key that is the whole legend is centered with
/// a translucent frame.
fn place_key(
    geom: &FigureGeometry,
    index: usize,
    layout: &MapLayout,
    orientation: Orientation,
    block_w: f64,
    block_h: f64,
) -> (f64, f64, bool) {
    if layout.has_values {
        match orientation {
            Orientation::Horizontal => {
                let (x, y) = geom.fraction_point(0.025, geom.bar_bottom(index) + 0.15);
                (x, y, false)
            }
            Orientation::Vertical => {
                let left = geom.bar_left(index) - 0.15 / geom.map_count as f64;
                let (x, cy) = geom.fraction_point(left, 0.5);
                (x, cy - block_h / 2.0, false)
            }
        }
    } else {
        let (cx, cy) = geom.fraction_point(0.5, 0.5);
        (cx - block_w / 2.0, cy - block_h / 2.0, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use legenda_core::model::Style;

    fn key_layout(n: usize, has_values: bool) -> MapLayout {
        MapLayout {
            title: None,
            units: None,
            style: Style::Classification,
            shared_style: Style::Classification,
            has_values,
            large_palette: false,
            bar: None,
            swatches: (0..n)
                .map(|i| SwatchItem {
                    color: [0.0, 0.0, 0.0],
                    label: Some(format!("class {i}")),
                })
                .collect(),
            min_label: None,
            max_label: None,
        }
    }

    #[test]
    fn standalone_key_is_framed_and_centered() {
        let layout = key_layout(4, false);
        let geom = FigureGeometry::compute(std::slice::from_ref(&layout), Orientation::Vertical);
        let mut out = String::new();
        render_swatch_key(&mut out, &geom, 0, &layout, Orientation::Vertical);
        assert!(out.contains(r#"fill-opacity="0.5""#));
        assert_eq!(out.matches("<text").count(), 4);
    }

    #[test]
    fn key_beside_a_bar_has_no_frame() {
        let layout = key_layout(2, true);
        let geom = FigureGeometry::compute(std::slice::from_ref(&layout), Orientation::Horizontal);
        let mut out = String::new();
        render_swatch_key(&mut out, &geom, 0, &layout, Orientation::Horizontal);
        assert!(!out.contains("fill-opacity"));
    }

    #[test]
    fn wide_keys_use_more_columns() {
        let layout = key_layout(20, false);
        let geom = FigureGeometry::compute(std::slice::from_ref(&layout), Orientation::Horizontal);
        let mut out = String::new();
        render_swatch_key(&mut out, &geom, 0, &layout, Orientation::Horizontal);
        // 20 swatches in two columns of ten: the frame rect plus two
        // distinct swatch x positions.
        let mut xs: Vec<&str> = out
            .match_indices("<rect x=\"")
            .map(|(i, _)| {
                let rest = &out[i + 9..];
                &rest[..rest.find('"').unwrap_or(0)]
            })
            .collect();
        xs.sort_unstable();
        xs.dedup();
        assert_eq!(xs.len(), 3);
    }
}
