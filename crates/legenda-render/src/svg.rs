//! Small shared helpers for string-built SVG output.

pub(crate) use legenda_core::layout::fmt_number as fmt;

/// Pixels per abstract figure unit (a 4x1 figure renders as 400x100 px).
pub(crate) const PX_PER_UNIT: f64 = 100.0;

/// Converts a point size to pixels at the figure's nominal resolution.
pub(crate) fn pt_to_px(pt: f64) -> f64 {
    pt * 4.0 / 3.0
}

pub(crate) fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// CSS color text for a normalized `[0, 1]` RGB triple.
pub(crate) fn css_color(color: [f64; 3]) -> String {
    format!(
        "rgb({},{},{})",
        (color[0] * 255.0).round() as u8,
        (color[1] * 255.0).round() as u8,
        (color[2] * 255.0).round() as u8
    )
}

/// Rough width of a label at the given font size; used to size key columns
/// and tooltip boxes, not for exact glyph metrics.
pub(crate) fn estimate_text_width(text: &str, font_px: f64) -> f64 {
    text.chars().count() as f64 * font_px * 0.6
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn css_color_round_trips_entry_components() {
        assert_eq!(css_color([0.0, 51.0 / 255.0, 1.0]), "rgb(0,51,255)");
    }

    #[test]
    fn escape_xml_covers_markup_characters() {
        assert_eq!(escape_xml(r#"<a & "b">"#), "&lt;a &amp; &quot;b&quot;>");
    }
}
