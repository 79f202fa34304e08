//! Color-map document access and XML parsing.
//!
//! Attribute access is tolerant-by-default: optional attributes fall back per
//! rule (`sourceValue` <- `value`, `label` <- `value`, booleans <- false)
//! while `rgb` (and `id` on legend entries) are mandatory and fail the whole
//! parse when malformed. There is no partial result: the first malformed
//! color map aborts the document.

use crate::error::{Error, Result};
use crate::model::{ColorMap, ColorMapEntry, ColorMaps, Legend, LegendEntry, Style};
use tracing::debug;

/// Reads the color-map document from a local path, falling back to a blocking
/// HTTP GET when the path is not a readable file.
pub fn fetch_document(location: &str) -> Result<String> {
    let io_err = match std::fs::read_to_string(location) {
        Ok(text) => return Ok(text),
        Err(err) => err,
    };
    debug!(location, "not a readable local file, trying HTTP fetch");
    fetch_url(location).map_err(|message| Error::DocumentAccess {
        location: location.to_string(),
        message: format!("{io_err}; {message}"),
    })
}

fn fetch_url(location: &str) -> std::result::Result<String, String> {
    let response = reqwest::blocking::get(location).map_err(|e| e.to_string())?;
    let status = response.status();
    if !status.is_success() {
        return Err(format!("HTTP status {status}"));
    }
    response.text().map_err(|e| e.to_string())
}

/// Parses every `<ColorMap>` element of the document, in document order.
///
/// Accepts either a single top-level `<ColorMap>` or any wrapper document
/// containing one or more `<ColorMap>` descendants. A document with none is
/// malformed.
pub fn parse_colormaps(xml: &str) -> Result<ColorMaps> {
    let doc = roxmltree::Document::parse(xml).map_err(|e| Error::malformed(e.to_string()))?;
    let root = doc.root_element();

    let mut maps = Vec::new();
    if root.tag_name().name() == "ColorMap" {
        maps.push(parse_colormap(root)?);
    } else {
        for node in root
            .descendants()
            .filter(|n| n.is_element() && n.tag_name().name() == "ColorMap")
        {
            maps.push(parse_colormap(node)?);
        }
    }

    if maps.is_empty() {
        return Err(Error::malformed("no ColorMap element found"));
    }
    Ok(ColorMaps(maps))
}

fn parse_colormap(node: roxmltree::Node<'_, '_>) -> Result<ColorMap> {
    let title = attr(node, "title").map(str::to_string);
    let units = attr(node, "units").map(str::to_string);
    debug!(?title, ?units, "parsing ColorMap");

    let mut saw_range = false;
    let mut saw_categorical = false;
    let mut entries = Vec::new();

    for entry_node in child_elements(node, "ColorMapEntry") {
        let (red, green, blue) = parse_rgb_attr(entry_node)?;
        let value = attr(entry_node, "value").map(str::to_string);
        match &value {
            Some(v) if v.contains('(') || v.contains('[') => saw_range = true,
            Some(_) => {}
            None => saw_categorical = true,
        }
        let source_value = attr(entry_node, "sourceValue")
            .map(str::to_string)
            .or_else(|| value.clone());
        let label = attr(entry_node, "label")
            .map(str::to_string)
            .or_else(|| value.clone());

        entries.push(ColorMapEntry {
            red,
            green,
            blue,
            transparent: attr_bool(entry_node, "transparent"),
            source_value,
            value,
            label,
            nodata: attr_bool(entry_node, "nodata"),
        });
    }

    let legend = node
        .descendants()
        .find(|n| n.is_element() && n.tag_name().name() == "Legend")
        .map(parse_legend)
        .transpose()?;

    // The range marker is the stronger signal when both occur; an explicit
    // Legend overrides entry-based inference entirely.
    let inferred = if saw_range {
        Style::Range
    } else if saw_categorical {
        Style::Classification
    } else {
        Style::Discrete
    };
    let style = legend.as_ref().map(|l| l.legend_type).unwrap_or(inferred);
    debug!(style = %style, entries = entries.len(), "parsed ColorMap");

    Ok(ColorMap {
        units,
        entries,
        style,
        title,
        legend,
    })
}

fn parse_legend(node: roxmltree::Node<'_, '_>) -> Result<Legend> {
    let legend_type = attr(node, "type")
        .ok_or_else(|| Error::malformed("Legend element is missing its type attribute"))
        .and_then(|raw| {
            Style::parse(raw).ok_or_else(|| Error::malformed(format!("unknown Legend type {raw:?}")))
        })?;

    let mut entries = Vec::new();
    for entry_node in child_elements(node, "LegendEntry") {
        let raw_id = attr(entry_node, "id")
            .ok_or_else(|| Error::malformed("LegendEntry element is missing its id attribute"))?;
        let entry_id = raw_id
            .trim()
            .parse::<i64>()
            .map_err(|_| Error::malformed(format!("invalid LegendEntry id {raw_id:?}")))?;

        let (red, green, blue) = parse_rgb_attr(entry_node)?;
        let value = attr(entry_node, "value").map(str::to_string);
        let source_value = attr(entry_node, "sourceValue")
            .map(str::to_string)
            .or_else(|| value.clone());
        // En-dash labels come in from hand-edited documents; normalized one-way.
        let label = attr(entry_node, "label")
            .map(str::to_string)
            .or_else(|| value.clone())
            .map(|l| l.replace('\u{2013}', "-"));

        entries.push(LegendEntry {
            entry_id,
            red,
            green,
            blue,
            transparent: attr_bool(entry_node, "transparent"),
            source_value,
            value,
            label,
            nodata: attr_bool(entry_node, "nodata"),
        });
    }

    Ok(Legend {
        max_label: attr(node, "maxLabel").map(str::to_string),
        min_label: attr(node, "minLabel").map(str::to_string),
        legend_type,
        entries,
    })
}

fn child_elements<'a, 'input>(
    node: roxmltree::Node<'a, 'input>,
    name: &'static str,
) -> impl Iterator<Item = roxmltree::Node<'a, 'input>> {
    node.children()
        .filter(move |n| n.is_element() && n.tag_name().name() == name)
}

/// Namespace-agnostic attribute lookup.
fn attr<'a>(node: roxmltree::Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.attributes()
        .find(|a| a.name() == name)
        .map(|a| a.value())
}

/// Missing or non-`"true"` boolean attributes read as false.
fn attr_bool(node: roxmltree::Node<'_, '_>, name: &str) -> bool {
    attr(node, name).is_some_and(|v| v.eq_ignore_ascii_case("true"))
}

fn parse_rgb_attr(node: roxmltree::Node<'_, '_>) -> Result<(u8, u8, u8)> {
    let raw = attr(node, "rgb").ok_or_else(|| {
        Error::malformed(format!(
            "{} element is missing its rgb attribute",
            node.tag_name().name()
        ))
    })?;

    let bad = || Error::malformed(format!("invalid rgb attribute {raw:?}"));
    let mut parts = raw.split(',');
    let component = |part: Option<&str>| -> Result<u8> {
        part.ok_or_else(bad)?.trim().parse::<u8>().map_err(|_| bad())
    };
    let red = component(parts.next())?;
    let green = component(parts.next())?;
    let blue = component(parts.next())?;
    if parts.next().is_some() {
        return Err(bad());
    }
    Ok((red, green, blue))
}
