//! Numeric color-bar panel: uniform bins, outward ticks, tick labels.

use crate::Orientation;
use crate::figure::FigureGeometry;
use crate::svg::{css_color, escape_xml, fmt, pt_to_px};
use legenda_core::layout::{
    ColorBarLayout, LARGE_PALETTE_TICKS, MapLayout, annotate_vertical_labels,
};
use std::fmt::Write as _;

const TICK_LEN: f64 = 4.0;
const HORIZONTAL_TICK_PT: f64 = 8.0;
const VERTICAL_TICK_PT: f64 = 10.0;

/// Legend-supplied tick labels are only shown when the first one is short
/// enough to fit the panel; otherwise numeric values are shown.
const HORIZONTAL_LABEL_LIMIT: usize = 5;
const VERTICAL_LABEL_LIMIT: usize = 8;

/// Anchor positions of the rendered tick labels, in pixels, used by the
/// tooltip post-processor.
pub(crate) struct BarRender {
    pub tick_label_positions: Vec<(f64, f64)>,
    pub bin_count: usize,
}

pub(crate) fn render_colorbar(
    out: &mut String,
    geom: &FigureGeometry,
    index: usize,
    layout: &MapLayout,
    bar: &ColorBarLayout,
    orientation: Orientation,
    emit_bin_ids: bool,
) -> BarRender {
    let rect = geom.bar_rect(index, orientation);
    let n = bar.colors.len();

    for (i, color) in bar.colors.iter().enumerate() {
        let fill = css_color(*color);
        let (x, y, w, h) = match orientation {
            Orientation::Horizontal => {
                let bin_w = rect.w / n as f64;
                (rect.x + i as f64 * bin_w, rect.y, bin_w, rect.h)
            }
            Orientation::Vertical => {
                // Lowest bin sits at the bottom of the bar.
                let bin_h = rect.h / n as f64;
                (
                    rect.x,
                    rect.y + rect.h - (i + 1) as f64 * bin_h,
                    rect.w,
                    bin_h,
                )
            }
        };
        let id_attr = if emit_bin_ids {
            format!(r#" id="bin-{i}""#)
        } else {
            String::new()
        };
        let _ = write!(
            out,
            r#"<rect{id_attr} x="{x}" y="{y}" width="{w}" height="{h}" fill="{fill}" stroke="{fill}" stroke-width="0.5"/>"#,
            x = fmt(x),
            y = fmt(y),
            w = fmt(w),
            h = fmt(h),
        );
    }
    let _ = write!(
        out,
        r#"<rect x="{x}" y="{y}" width="{w}" height="{h}" fill="none" stroke="black" stroke-width="1"/>"#,
        x = fmt(rect.x),
        y = fmt(rect.y),
        w = fmt(rect.w),
        h = fmt(rect.h),
    );

    let (ticks, mut labels) = resolve_ticks(bar, layout.large_palette, orientation);
    if orientation == Orientation::Vertical && layout.units.is_some() {
        annotate_vertical_labels(
            &mut labels,
            layout.units.as_deref(),
            layout.min_label.as_deref(),
            layout.max_label.as_deref(),
        );
    }

    let font_px = pt_to_px(match orientation {
        Orientation::Horizontal => HORIZONTAL_TICK_PT,
        Orientation::Vertical => VERTICAL_TICK_PT,
    });

    let mut positions = Vec::with_capacity(ticks.len());
    for (tick, label) in ticks.iter().zip(labels.iter()) {
        let frac = tick_fraction(bar, layout.large_palette, *tick);
        match orientation {
            Orientation::Horizontal => {
                let x = rect.x + frac * rect.w;
                let y0 = rect.y + rect.h;
                let _ = write!(
                    out,
                    r#"<line x1="{x}" y1="{y0}" x2="{x}" y2="{y1}" stroke="black" stroke-width="1"/>"#,
                    x = fmt(x),
                    y0 = fmt(y0),
                    y1 = fmt(y0 + TICK_LEN),
                );
                let ty = y0 + TICK_LEN + font_px;
                let _ = write!(
                    out,
                    r#"<text x="{x}" y="{y}" font-size="{fs}" text-anchor="middle">{label}</text>"#,
                    x = fmt(x),
                    y = fmt(ty),
                    fs = fmt(font_px),
                    label = escape_xml(label),
                );
                positions.push((x, ty));
            }
            Orientation::Vertical => {
                let y = rect.y + rect.h - frac * rect.h;
                let x0 = rect.x + rect.w;
                let _ = write!(
                    out,
                    r#"<line x1="{x0}" y1="{y}" x2="{x1}" y2="{y}" stroke="black" stroke-width="1"/>"#,
                    x0 = fmt(x0),
                    x1 = fmt(x0 + TICK_LEN),
                    y = fmt(y),
                );
                let tx = x0 + TICK_LEN + 2.0;
                let _ = write!(
                    out,
                    r#"<text x="{x}" y="{y}" font-size="{fs}" text-anchor="start" dominant-baseline="middle">{label}</text>"#,
                    x = fmt(tx),
                    y = fmt(y),
                    fs = fmt(font_px),
                    label = escape_xml(label),
                );
                positions.push((tx, y));
            }
        }
    }

    BarRender {
        tick_label_positions: positions,
        bin_count: n,
    }
}

/// Picks the tick values and label texts for a bar.
///
/// Down-sampled bars get evenly spaced numeric ticks. Legend-driven bars
/// keep their declared tick values; range-style legend bars fall back to
/// numeric labels when the first label is too long for the panel, while
/// centered discrete legend bars keep their labels regardless (the numeric
/// defaults there would be mid-bin values, not bounds). Centered discrete
/// bars and plain range bars label every tick directly from the layout.
fn resolve_ticks(
    bar: &ColorBarLayout,
    large_palette: bool,
    orientation: Orientation,
) -> (Vec<f64>, Vec<String>) {
    if large_palette {
        let lo = bar.bounds.first().copied().unwrap_or(0.0);
        let hi = bar.bounds.last().copied().unwrap_or(lo);
        let ticks = linspace(lo, hi, LARGE_PALETTE_TICKS);
        let labels = ticks.iter().map(|t| fmt(*t)).collect();
        return (ticks, labels);
    }
    if bar.from_legend {
        let limit = match orientation {
            Orientation::Horizontal => HORIZONTAL_LABEL_LIMIT,
            Orientation::Vertical => VERTICAL_LABEL_LIMIT,
        };
        let first = bar.ticklabels.first().map(|l| l.display()).unwrap_or_default();
        let keep_declared =
            bar.center_ticks || (!first.is_empty() && first.chars().count() <= limit);
        let labels = if keep_declared {
            bar.ticklabels.iter().map(|l| l.display()).collect()
        } else {
            bar.ticks.iter().map(|t| fmt(*t)).collect()
        };
        return (bar.ticks.clone(), labels);
    }
    if bar.center_ticks {
        let labels = bar.ticklabels.iter().map(|l| l.display()).collect();
        return (bar.ticks.clone(), labels);
    }
    // Plain range bar: one tick per bin edge.
    let labels = bar.ticklabels.iter().map(|l| l.display()).collect();
    (bar.bounds.clone(), labels)
}

/// Offset of a tick value along the bar, in `[0, 1]`.
///
/// Bins are drawn uniformly, so on the non-down-sampled path a value maps
/// piecewise-linearly through the bound segments; the down-sampled path is
/// linear over the full bound span.
fn tick_fraction(bar: &ColorBarLayout, large_palette: bool, tick: f64) -> f64 {
    let bounds = &bar.bounds;
    if bounds.len() < 2 {
        return 0.5;
    }
    let lo = bounds[0];
    let hi = bounds[bounds.len() - 1];
    if large_palette {
        if hi == lo {
            return 0.0;
        }
        return ((tick - lo) / (hi - lo)).clamp(0.0, 1.0);
    }
    let segments = bounds.len() - 1;
    for j in 0..segments {
        let (a, b) = (bounds[j], bounds[j + 1]);
        if tick >= a && tick <= b {
            let within = if b == a { 0.0 } else { (tick - a) / (b - a) };
            return (j as f64 + within) / segments as f64;
        }
    }
    if tick < lo { 0.0 } else { 1.0 }
}

fn linspace(lo: f64, hi: f64, count: usize) -> Vec<f64> {
    if count < 2 {
        return vec![lo];
    }
    let step = (hi - lo) / (count - 1) as f64;
    (0..count).map(|i| lo + step * i as f64).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use legenda_core::layout::TickLabel;

    fn bar(bounds: Vec<f64>, ticks: Vec<f64>, center: bool, legend: bool) -> ColorBarLayout {
        ColorBarLayout {
            colors: vec![[0.0, 0.0, 0.0]; bounds.len().saturating_sub(1).max(1)],
            bounds,
            ticks,
            ticklabels: Vec::new(),
            center_ticks: center,
            from_legend: legend,
        }
    }

    #[test]
    fn centered_ticks_land_mid_bin() {
        let bar = bar(vec![0.0, 10.0, 20.0, 30.0], vec![5.0, 15.0, 25.0], true, false);
        assert_eq!(tick_fraction(&bar, false, 5.0), 0.5 / 3.0);
        assert_eq!(tick_fraction(&bar, false, 15.0), 1.5 / 3.0);
        assert_eq!(tick_fraction(&bar, false, 25.0), 2.5 / 3.0);
    }

    #[test]
    fn uneven_bounds_still_fill_uniform_bins() {
        // Bins are uniform even when the value spans are not.
        let bar = bar(vec![0.0, 1.0, 100.0], Vec::new(), false, false);
        assert_eq!(tick_fraction(&bar, false, 1.0), 0.5);
        assert_eq!(tick_fraction(&bar, false, 100.0), 1.0);
    }

    #[test]
    fn large_palette_maps_linearly() {
        let bar = bar(vec![0.0, 25.0, 100.0], Vec::new(), false, false);
        assert_eq!(tick_fraction(&bar, true, 25.0), 0.25);
    }

    #[test]
    fn down_sampled_ticks_are_evenly_spaced() {
        let b = bar((0..=13).map(f64::from).collect(), Vec::new(), false, false);
        let (ticks, labels) = resolve_ticks(&b, true, Orientation::Horizontal);
        assert_eq!(ticks.len(), LARGE_PALETTE_TICKS);
        assert_eq!(ticks[0], 0.0);
        assert_eq!(*ticks.last().unwrap(), 13.0);
        assert_eq!(labels[4], "6.5");
    }

    #[test]
    fn long_legend_labels_fall_back_to_numbers() {
        let mut b = bar(vec![0.0, 5.0, 10.0], vec![0.0, 5.0, 10.0], false, true);
        b.ticklabels = vec![
            TickLabel::Text("quite long label".to_string()),
            TickLabel::Text("other".to_string()),
            TickLabel::Text("other".to_string()),
        ];
        let (_, labels) = resolve_ticks(&b, false, Orientation::Horizontal);
        assert_eq!(labels, vec!["0", "5", "10"]);

        b.ticklabels[0] = TickLabel::Text("low".to_string());
        let (_, labels) = resolve_ticks(&b, false, Orientation::Horizontal);
        assert_eq!(labels[0], "low");
    }

    #[test]
    fn centered_legend_bars_keep_long_labels() {
        // Discrete legend ticks sit mid-bin, so the numeric fallback would
        // print values like 7.5 instead of bounds. Keep the declared labels.
        let mut b = bar(vec![0.0, 5.0, 10.0], vec![2.5, 7.5], true, true);
        b.ticklabels = vec![
            TickLabel::Text("quite long label".to_string()),
            TickLabel::Text("other".to_string()),
        ];
        let (ticks, labels) = resolve_ticks(&b, false, Orientation::Horizontal);
        assert_eq!(ticks, vec![2.5, 7.5]);
        assert_eq!(labels, vec!["quite long label", "other"]);
    }
}
