//! Figure sizing and panel placement.
//!
//! Geometry is expressed in abstract figure units (converted to pixels at
//! [`PX_PER_UNIT`]) with panel rectangles given as fractions of the final
//! figure, origin at the bottom-left. Classification keys may resize the
//! figure after the initial estimate; the adjustments are replayed in map
//! order so the last one wins, matching the output of a renderer that sizes
//! lazily at save time.

use crate::Orientation;
use crate::svg::PX_PER_UNIT;
use legenda_core::layout::MapLayout;
use legenda_core::model::Style;

/// Legends with a title reserve this much vertical figure fraction for it.
pub(crate) const TITLE_PAD: f64 = 0.15;

/// A panel rectangle in pixels, origin at the top-left (SVG convention).
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct FigureGeometry {
    /// Final figure size in pixels.
    pub width: f64,
    pub height: f64,
    /// Vertical fraction reserved for titles (`0` when no map has one, in
    /// the vertical orientation; always reserved horizontally).
    pub title_pad: f64,
    pub map_count: usize,
}

impl FigureGeometry {
    pub fn compute(layouts: &[MapLayout], orientation: Orientation) -> Self {
        let lc = layouts.len();
        let extra = lc.saturating_sub(1) as f64;
        let (mut fw, mut fh, t) = match orientation {
            Orientation::Horizontal => (4.0, TITLE_PAD + 0.75 + extra, TITLE_PAD),
            Orientation::Vertical => {
                let t = if layouts.iter().any(|l| l.title.is_some()) {
                    TITLE_PAD
                } else {
                    0.0
                };
                (1.5 + 2.0 * extra, 3.0 + t, t)
            }
        };

        // Classification keys resize small figures; replayed in map order.
        for layout in layouts {
            if layout.style != Style::Classification {
                continue;
            }
            let n = layout.swatches.len();
            match orientation {
                Orientation::Horizontal => {
                    if lc == 1 {
                        fh = 3.0;
                        fw = 1.5;
                        if n < 7 && !layout.has_values {
                            fh = 1.5;
                        }
                        if n > 14 {
                            fw = 3.0;
                        }
                        if n > 28 {
                            fw = 4.0;
                        }
                        if layout.has_values {
                            fw = 4.0;
                        }
                    }
                }
                Orientation::Vertical => {
                    if lc <= 2 {
                        if n < 7 && !layout.has_values {
                            fh = 1.5;
                        }
                        if n > 14 {
                            fw = 3.0;
                        }
                        if n > 28 {
                            fw = 4.0;
                        }
                        if layout.has_values {
                            fw = 3.0;
                        }
                    }
                }
            }
        }

        Self {
            width: fw * PX_PER_UNIT,
            height: fh * PX_PER_UNIT,
            title_pad: t,
            map_count: lc,
        }
    }

    /// Bottom-left fraction of the color-bar panel for map `index`
    /// (horizontal orientation).
    pub fn bar_bottom(&self, index: usize) -> f64 {
        if self.map_count == 1 {
            0.6 - self.title_pad
        } else {
            0.9 - (0.9 / self.map_count as f64) * index as f64 - self.title_pad
        }
    }

    /// Left fraction of the color-bar panel for map `index` (vertical
    /// orientation).
    pub fn bar_left(&self, index: usize) -> f64 {
        0.2 + 0.3 * index as f64
    }

    /// Pixel rectangle of the color-bar panel for map `index`.
    pub fn bar_rect(&self, index: usize, orientation: Orientation) -> Rect {
        let lc = self.map_count as f64;
        let (fx, fy, fw, fh) = match orientation {
            Orientation::Horizontal => (0.05, self.bar_bottom(index), 0.9, 0.25 / lc),
            Orientation::Vertical => (
                self.bar_left(index),
                0.06 - self.title_pad / 4.0,
                0.15 / lc,
                0.9,
            ),
        };
        self.fraction_rect(fx, fy, fw, fh)
    }

    /// Converts a bottom-left fraction rectangle to a top-left pixel one.
    pub fn fraction_rect(&self, fx: f64, fy: f64, fw: f64, fh: f64) -> Rect {
        Rect {
            x: fx * self.width,
            y: (1.0 - (fy + fh)) * self.height,
            w: fw * self.width,
            h: fh * self.height,
        }
    }

    /// Pixel position of a bottom-left fraction point.
    pub fn fraction_point(&self, fx: f64, fy: f64) -> (f64, f64) {
        (fx * self.width, (1.0 - fy) * self.height)
    }
}
