//! Normalized color-map value records.
//!
//! All records are immutable once parsed and owned strictly top-down: a
//! [`ColorMaps`] owns its [`ColorMap`]s, a [`ColorMap`] owns its entries and
//! its optional [`Legend`]. The `Display` impls re-serialize a record to its
//! XML element text; re-parsing that text yields an equal record (en-dash
//! label normalization is one-way and already applied by then).

use serde::Serialize;
use std::fmt;

/// Display style of a color map, inferred from its entries or declared by a
/// `<Legend type="...">` override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    Discrete,
    Range,
    Classification,
}

impl Style {
    pub fn as_str(self) -> &'static str {
        match self {
            Style::Discrete => "discrete",
            Style::Range => "range",
            Style::Classification => "classification",
        }
    }

    /// Case-insensitive parse of the `<Legend type>` attribute value.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "discrete" => Some(Style::Discrete),
            "range" => Some(Style::Range),
            "classification" => Some(Style::Classification),
            _ => None,
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `<ColorMapEntry>`: an RGB color plus the raw data value(s) it covers.
///
/// `value` is kept as the raw attribute text; it may encode a single number,
/// a `[a,b)`-style interval, or be absent (categorical entry). Numeric
/// interpretation happens in the layout deriver, not here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorMapEntry {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub transparent: bool,
    pub source_value: Option<String>,
    pub value: Option<String>,
    pub label: Option<String>,
    pub nodata: bool,
}

impl ColorMapEntry {
    /// RGB components normalized to `[0, 1]`.
    pub fn color(&self) -> [f64; 3] {
        [
            f64::from(self.red) / 255.0,
            f64::from(self.green) / 255.0,
            f64::from(self.blue) / 255.0,
        ]
    }
}

impl fmt::Display for ColorMapEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            r#"<ColorMapEntry rgb="{},{},{}" transparent="{}" nodata="{}""#,
            self.red, self.green, self.blue, self.transparent, self.nodata
        )?;
        write_opt_attr(f, "sourceValue", self.source_value.as_deref())?;
        write_opt_attr(f, "value", self.value.as_deref())?;
        write_opt_attr(f, "label", self.label.as_deref())?;
        f.write_str("/>")
    }
}

/// One `<LegendEntry>`: a [`ColorMapEntry`] with a display-order id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub entry_id: i64,
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub transparent: bool,
    pub source_value: Option<String>,
    pub value: Option<String>,
    pub label: Option<String>,
    pub nodata: bool,
}

impl LegendEntry {
    pub fn color(&self) -> [f64; 3] {
        [
            f64::from(self.red) / 255.0,
            f64::from(self.green) / 255.0,
            f64::from(self.blue) / 255.0,
        ]
    }
}

impl fmt::Display for LegendEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            r#"<LegendEntry id="{}" rgb="{},{},{}" transparent="{}" nodata="{}""#,
            self.entry_id, self.red, self.green, self.blue, self.transparent, self.nodata
        )?;
        write_opt_attr(f, "sourceValue", self.source_value.as_deref())?;
        write_opt_attr(f, "value", self.value.as_deref())?;
        write_opt_attr(f, "label", self.label.as_deref())?;
        f.write_str("/>")
    }
}

/// Optional `<Legend>` display override for a color map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub max_label: Option<String>,
    pub min_label: Option<String>,
    pub legend_type: Style,
    pub entries: Vec<LegendEntry>,
}

impl fmt::Display for Legend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<Legend")?;
        write_opt_attr(f, "maxLabel", self.max_label.as_deref())?;
        write_opt_attr(f, "minLabel", self.min_label.as_deref())?;
        write!(f, r#" type="{}">"#, self.legend_type)?;
        for entry in &self.entries {
            write!(f, "\n    {entry}")?;
        }
        f.write_str("\n</Legend>")
    }
}

/// One `<ColorMap>` with its derived style.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorMap {
    pub units: Option<String>,
    pub entries: Vec<ColorMapEntry>,
    pub style: Style,
    pub title: Option<String>,
    pub legend: Option<Legend>,
}

impl ColorMap {
    /// True when no entry would contribute any visual output.
    pub fn is_fully_transparent(&self) -> bool {
        self.entries.iter().all(|e| e.transparent)
    }
}

impl fmt::Display for ColorMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<ColorMap")?;
        write_opt_attr(f, "title", self.title.as_deref())?;
        write_opt_attr(f, "units", self.units.as_deref())?;
        f.write_str(">")?;
        for entry in &self.entries {
            write!(f, "\n    {entry}")?;
        }
        if let Some(legend) = &self.legend {
            let mut indented = String::new();
            for line in legend.to_string().lines() {
                indented.push_str("\n    ");
                indented.push_str(line);
            }
            f.write_str(&indented)?;
        }
        f.write_str("\n</ColorMap>")
    }
}

/// Ordered collection of color maps, in document order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorMaps(pub Vec<ColorMap>);

impl ColorMaps {
    pub fn iter(&self) -> std::slice::Iter<'_, ColorMap> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ColorMaps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<ColorMaps>")?;
        for map in &self.0 {
            for line in map.to_string().lines() {
                write!(f, "\n    {line}")?;
            }
        }
        f.write_str("\n</ColorMaps>")
    }
}

fn write_opt_attr(f: &mut fmt::Formatter<'_>, name: &str, value: Option<&str>) -> fmt::Result {
    match value {
        Some(v) => write!(f, r#" {name}="{}""#, escape_attr(v)),
        None => Ok(()),
    }
}

fn escape_attr(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}
