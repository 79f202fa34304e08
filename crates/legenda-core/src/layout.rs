//! Legend layout derivation.
//!
//! One call per color map, folding an explicit [`LayoutState`] between calls:
//! the accumulated palette, the value-bearing entries and the shared flags
//! that earlier maps establish for later ones (a classification legend
//! anywhere flips the shared style; any value-bearing entry marks the whole
//! document as numeric). The derivation itself produces plain value records;
//! no drawing happens here.

use crate::error::{Error, Result};
use crate::model::{ColorMap, ColorMaps, Style};
use serde::Serialize;
use tracing::debug;

/// Strictly more than this many accumulated colors switches a map to the
/// down-sampled tick path (dense per-bin labels become unreadable).
pub const LARGE_PALETTE_THRESHOLD: usize = 12;

/// Tick count used on the down-sampled path, evenly spanning the bounds.
pub const LARGE_PALETTE_TICKS: usize = 9;

/// A tick label: a derived number, or verbatim text from the document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TickLabel {
    Number(f64),
    Text(String),
}

impl TickLabel {
    pub fn display(&self) -> String {
        match self {
            TickLabel::Number(v) => fmt_number(*v),
            TickLabel::Text(s) => s.clone(),
        }
    }
}

/// Minimal decimal rendering of a derived numeric label (3-digit precision,
/// trailing zeros trimmed).
pub fn fmt_number(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }
    let mut r = (v * 1000.0).round() / 1000.0;
    if r.abs() < 0.0005 {
        r = 0.0;
    }
    let mut s = format!("{r:.3}");
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    if s == "-0" { "0".to_string() } else { s }
}

/// One categorical swatch of a classification key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwatchItem {
    pub color: [f64; 3],
    pub label: Option<String>,
}

/// The numeric color-bar artifacts for one map: bin colors in document order,
/// bin edges, tick anchor values and the labels aligned to them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorBarLayout {
    pub colors: Vec<[f64; 3]>,
    pub bounds: Vec<f64>,
    pub ticks: Vec<f64>,
    pub ticklabels: Vec<TickLabel>,
    /// Discrete maps with a small palette get ticks centered between bounds.
    pub center_ticks: bool,
    /// True when the entries came from a `<Legend>` override.
    pub from_legend: bool,
}

/// Per-map layout result consumed by the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapLayout {
    pub title: Option<String>,
    pub units: Option<String>,
    pub style: Style,
    /// Shared style as of this map (a classification legend on any earlier
    /// map is visible here).
    pub shared_style: Style,
    /// Whether any value-bearing entry has been seen up to and including this
    /// map; gates whether a bar panel is drawn at all.
    pub has_values: bool,
    pub large_palette: bool,
    pub bar: Option<ColorBarLayout>,
    pub swatches: Vec<SwatchItem>,
    pub min_label: Option<String>,
    pub max_label: Option<String>,
}

/// Document-level facts the renderer and tooltip injector need after the fold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutSummary {
    pub has_values: bool,
    /// Large-palette flag of the last laid-out map; gates tooltip injection.
    pub large_palette: bool,
    /// Labels of every non-transparent entry across the document, in order.
    pub labels: Vec<Option<String>>,
}

#[derive(Debug, Clone)]
struct NumericEntry {
    value: String,
    label: Option<String>,
    color: [f64; 3],
}

/// Fold accumulator threaded through [`layout_colormap`] calls.
#[derive(Debug)]
pub struct LayoutState {
    shared_style: Style,
    has_values: bool,
    entries: Vec<NumericEntry>,
    labels: Vec<Option<String>>,
}

impl Default for LayoutState {
    fn default() -> Self {
        Self {
            shared_style: Style::Discrete,
            has_values: false,
            entries: Vec::new(),
            labels: Vec::new(),
        }
    }
}

/// Lays out every renderable color map of the document.
///
/// Fully transparent maps are dropped here; they contribute nothing visual.
/// Declared legends are pre-scanned so the shared flags are primed before the
/// first map is derived.
pub fn layout_colormaps(maps: &ColorMaps) -> Result<(Vec<MapLayout>, LayoutSummary)> {
    let mut state = LayoutState::default();
    for map in maps.iter() {
        if map.is_fully_transparent() {
            continue;
        }
        if let Some(legend) = &map.legend {
            if legend.legend_type == Style::Classification {
                state.shared_style = Style::Classification;
            } else {
                state.has_values = true;
            }
        }
    }

    let mut layouts = Vec::new();
    for map in maps.iter() {
        if map.is_fully_transparent() {
            debug!(title = ?map.title, "dropping fully transparent color map");
            continue;
        }
        layouts.push(layout_colormap(map, &mut state)?);
    }

    let summary = LayoutSummary {
        has_values: state.has_values,
        large_palette: layouts.last().is_some_and(|l| l.large_palette),
        labels: state.labels,
    };
    Ok((layouts, summary))
}

/// Derives the layout of one color map, updating the fold state.
pub fn layout_colormap(map: &ColorMap, state: &mut LayoutState) -> Result<MapLayout> {
    struct EntryView<'a> {
        transparent: bool,
        value: Option<&'a str>,
        label: Option<&'a str>,
        color: [f64; 3],
    }

    let views: Vec<EntryView<'_>> = match &map.legend {
        None => map
            .entries
            .iter()
            .map(|e| EntryView {
                transparent: e.transparent,
                value: e.value.as_deref(),
                label: e.label.as_deref(),
                color: e.color(),
            })
            .collect(),
        Some(legend) => legend
            .entries
            .iter()
            .map(|e| EntryView {
                transparent: e.transparent,
                value: e.value.as_deref(),
                label: e.label.as_deref(),
                color: e.color(),
            })
            .collect(),
    };

    if let Some(legend) = &map.legend {
        if legend.legend_type == Style::Classification {
            state.shared_style = Style::Classification;
        } else {
            // A legend-driven numeric map restarts the accumulated palette.
            state.entries.clear();
        }
    }

    let style = map.style;
    let mut swatches = Vec::new();
    let mut large_palette = false;

    for view in &views {
        if !view.transparent {
            state.labels.push(view.label.map(str::to_string));
            match view.value {
                Some(v) => {
                    state.has_values = true;
                    state.entries.push(NumericEntry {
                        value: v.to_string(),
                        label: view.label.map(str::to_string),
                        color: view.color,
                    });
                }
                // Entries without a numeric value render as keyed swatches
                // even inside a discrete/range map (combined bar + "no data"
                // key).
                None => swatches.push(SwatchItem {
                    color: view.color,
                    label: view.label.map(str::to_string),
                }),
            }
        }
        if state.entries.len() > LARGE_PALETTE_THRESHOLD {
            large_palette = true;
        }
    }

    let from_legend = map.legend.is_some();
    let derived = derive_bar(&mut state.entries, style, from_legend, large_palette)?;
    let draw_bar = state.has_values && (style != Style::Classification || map.legend.is_none());

    Ok(MapLayout {
        title: map.title.clone(),
        units: map.units.clone(),
        style,
        shared_style: state.shared_style,
        has_values: state.has_values,
        large_palette,
        bar: draw_bar.then_some(derived),
        swatches,
        min_label: map.legend.as_ref().and_then(|l| l.min_label.clone()),
        max_label: map.legend.as_ref().and_then(|l| l.max_label.clone()),
    })
}

/// Extracts bounds, ticks and tick labels from the accumulated value-bearing
/// entries.
fn derive_bar(
    entries: &mut [NumericEntry],
    style: Style,
    from_legend: bool,
    large_palette: bool,
) -> Result<ColorBarLayout> {
    let mut bounds = Vec::new();
    let mut ticks = Vec::new();
    let mut ticklabels = Vec::new();
    let mut center_ticks = false;
    let n = entries.len();

    for idx in 0..n {
        // Bracket stripping follows the observed rule: square brackets are
        // removed when the value contains `(`, or contains `[` with no comma.
        // The stripped form is what later passes see.
        let raw = entries[idx].value.clone();
        if raw.contains('(') || (raw.contains('[') && !raw.contains(',')) {
            entries[idx].value = raw.replace(['[', ']'], "");
        }
        let value = entries[idx].value.clone();
        let label = entries[idx].label.clone().unwrap_or_default();

        if style == Style::Range || value.contains('(') || value.contains('[') {
            let open = parse_bound(&open_bound(&value))?;
            bounds.push(open);
            if from_legend {
                ticks.push(open);
                ticklabels.push(TickLabel::Text(label.clone()));
            } else {
                ticklabels.push(TickLabel::Number(open));
            }
            // The closing number of the last interval is the final bin edge.
            if idx == n - 1 && (value.contains('(') || value.contains('[')) {
                let close = parse_bound(&close_bound(&value)?)?;
                bounds.push(close);
                if from_legend {
                    ticks.push(close);
                    ticklabels.push(TickLabel::Text(label));
                } else {
                    ticklabels.push(TickLabel::Number(close));
                }
            }
        } else {
            let v = parse_bound(&value)?;
            bounds.push(v);
            if from_legend {
                ticklabels.push(TickLabel::Text(label));
            } else {
                ticklabels.push(TickLabel::Text(value.clone()));
            }
            if !large_palette {
                center_ticks = true;
                if idx == n - 1 {
                    // Reuse the previous step's increment; a single entry
                    // folds onto itself with increment zero.
                    let prev = if n == 1 {
                        v
                    } else {
                        parse_bound(&entries[idx - 1].value)?
                    };
                    let increment = v - prev;
                    ticks.push(v + increment / 2.0);
                    bounds.push(v + increment);
                } else {
                    let next = entries[idx + 1].value.replace(['[', ']'], "");
                    let increment = parse_bound(&next)? - v;
                    ticks.push(v + increment / 2.0);
                }
            }
        }
    }

    Ok(ColorBarLayout {
        colors: entries.iter().map(|e| e.color).collect(),
        bounds,
        ticks,
        ticklabels,
        center_ticks,
        from_legend,
    })
}

/// Vertical-orientation label annotation: the unit string goes on the
/// outermost tick labels, then explicit legend min/max labels take
/// precedence.
pub fn annotate_vertical_labels(
    labels: &mut [String],
    units: Option<&str>,
    min_label: Option<&str>,
    max_label: Option<&str>,
) {
    if let Some(units) = units {
        if let Some(first) = labels.first_mut() {
            *first = format!("{first} {units}");
        }
        if let Some(last) = labels.last_mut() {
            *last = format!("{last} {units}");
        }
    }
    if let Some(min) = min_label {
        if let Some(first) = labels.first_mut() {
            *first = min.to_string();
        }
    }
    if let Some(max) = max_label {
        if let Some(last) = labels.last_mut() {
            *last = max.to_string();
        }
    }
}

fn open_bound(value: &str) -> String {
    value
        .split(',')
        .next()
        .unwrap_or(value)
        .replace(['[', ']', '('], "")
}

fn close_bound(value: &str) -> Result<String> {
    value
        .split(',')
        .nth(1)
        .map(|s| s.replace([')', '[', ']'], ""))
        .ok_or_else(|| Error::numeric(value))
}

fn parse_bound(raw: &str) -> Result<f64> {
    raw.trim().parse::<f64>().map_err(|_| Error::numeric(raw))
}
