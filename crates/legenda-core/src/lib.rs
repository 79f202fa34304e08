#![forbid(unsafe_code)]

//! Color-map parsing + legend layout derivation (headless).
//!
//! The input is a GIBS-style color-map XML document: one or more `<ColorMap>`
//! elements holding `<ColorMapEntry>` children and, optionally, a `<Legend>`
//! display override. This crate normalizes that document into value records
//! ([`model`]), classifies each map as discrete/range/classification, and
//! derives the numeric bounds, tick positions and tick labels that drive a
//! color-bar renderer ([`layout`]). It performs no drawing itself.

pub mod error;
pub mod layout;
pub mod model;
pub mod parse;

pub use error::{Error, Result};
pub use model::{ColorMap, ColorMapEntry, ColorMaps, Legend, LegendEntry, Style};
pub use parse::{fetch_document, parse_colormaps};
