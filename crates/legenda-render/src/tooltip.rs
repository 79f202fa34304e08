//! SVG tooltip post-processing.
//!
//! Rewrites an already-rendered legend SVG: the root element gains an
//! `onload` hook and a show/hide script, every color-bar bin gets mouse
//! handlers, and one hidden annotation group per tick label is appended.
//! Pure string surgery; the renderer guarantees the `bin-<i>` ids exist.

use crate::svg::{escape_xml, estimate_text_width, fmt};
use std::fmt::Write as _;

/// Tick-label anchor positions and bin count of the first color bar,
/// captured during rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipAnchors {
    /// Pixel positions of the tick labels, in tick order.
    pub positions: Vec<(f64, f64)>,
    pub bin_count: usize,
}

const TOOLTIP_FONT_PX: f64 = 13.333;
const TOOLTIP_BOX_H: f64 = 20.0;

const SCRIPT: &str = r#"<script type="text/ecmascript"><![CDATA[
function init(evt) {
    if ( window.svgDocument == null ) {
        svgDocument = evt.target.ownerDocument;
        }
    }

function ShowTooltip(idx) {
    var tip = svgDocument.getElementById('tooltip_'+idx);
    tip.setAttribute('visibility',"visible")
    }

function HideTooltip(idx) {
    var tip = svgDocument.getElementById('tooltip_'+idx);
    tip.setAttribute('visibility',"hidden")
    }
]]></script>"#;

/// Injects hover tooltips into a rendered legend SVG.
///
/// `labels` is the document-order list of entry labels; annotation `i` shows
/// `labels[i]` at tick-label position `i`, so annotations stop at whichever
/// of the two lists is shorter.
pub fn attach_tooltips(svg: &str, anchors: &TooltipAnchors, labels: &[Option<String>]) -> String {
    let mut out = match svg.find("<svg") {
        Some(start) => match svg[start..].find('>') {
            Some(end) => {
                let tag_end = start + end;
                let mut s = String::with_capacity(svg.len() + SCRIPT.len());
                s.push_str(&svg[..tag_end]);
                s.push_str(r#" onload="init(evt)">"#);
                s.push_str(SCRIPT);
                s.push_str(&svg[tag_end + 1..]);
                s
            }
            None => svg.to_string(),
        },
        None => svg.to_string(),
    };

    for i in 0..anchors.bin_count {
        let plain = format!(r#"id="bin-{i}""#);
        let wired = format!(
            r#"id="bin-{i}" onmouseover="ShowTooltip({i})" onmouseout="HideTooltip({i})""#
        );
        out = out.replacen(&plain, &wired, 1);
    }

    let mut groups = String::new();
    for (i, ((x, y), label)) in anchors.positions.iter().zip(labels.iter()).enumerate() {
        let text = label.as_deref().unwrap_or("");
        let box_w = estimate_text_width(text, TOOLTIP_FONT_PX) + 12.0;
        let _ = write!(
            groups,
            r#"<g id="tooltip_{i}" visibility="hidden"><rect x="{bx}" y="{by}" width="{bw}" height="{bh}" rx="3" fill="rgb(255,255,230)" stroke="rgb(26,26,26)" stroke-width="1"/><text x="{x}" y="{ty}" font-size="{fs}" text-anchor="middle">{text}</text></g>"#,
            bx = fmt(x - box_w / 2.0),
            by = fmt(y - TOOLTIP_BOX_H - 8.0),
            bw = fmt(box_w),
            bh = fmt(TOOLTIP_BOX_H),
            x = fmt(*x),
            ty = fmt(y - 14.0),
            fs = fmt(TOOLTIP_FONT_PX),
            text = escape_xml(text),
        );
    }
    match out.rfind("</svg>") {
        Some(pos) => {
            out.insert_str(pos, &groups);
            out
        }
        None => out + &groups,
    }
}
