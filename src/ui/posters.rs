//! Poster strip widget.
//!
//! Lays the padded sequence out left to right in logical pixels, shifts it
//! by the scroll offset and projects every slot onto terminal cells.  Each
//! poster is lifted by its parallax translation, so the strip reserves
//! enough rows above the resting line for the full lift.

use std::collections::{HashMap, HashSet};

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    text::Line,
    widgets::{Paragraph, Widget},
};

use crate::app::image_runtime::DecodedPoster;
use crate::core::carousel::{FrameState, SlotVisual};
use crate::core::library::ImageRef;
use crate::core::sequence::{PaddedSequence, Slot};

use super::halfblock::paint_image;
use super::layout::Projection;
use super::theme::Theme;

/// Poster height as a multiple of the item pitch.
const POSTER_ASPECT: f64 = 1.2;

/// Cell box of one poster, in signed coordinates (it may hang off-screen).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PosterBox {
    pub real_index: usize,
    pub x: i32,
    pub y: i32,
    pub cols: u16,
    pub rows: u16,
}

/// Geometry of the strip, shared by the widget and its tests.
pub struct StripGeometry {
    projection: Projection,
    /// Item margin in logical px; the poster is inset by three of these
    /// (one margin plus a double padding) on each side.
    spacing: f64,
    pitch: f64,
    displacement: f64,
}

impl StripGeometry {
    pub fn new(viewport_width: f64, spacing: f64, pitch: f64, displacement: f64, area: Rect) -> Self {
        Self {
            projection: Projection::new(viewport_width, area),
            spacing,
            pitch,
            displacement,
        }
    }

    /// Rows kept free above the resting line for the parallax lift.
    pub fn lift_rows(&self) -> u16 {
        self.projection.rows(self.displacement.abs()).ceil() as u16
    }

    /// Poster boxes for every real slot in `frame`, relative to `area`.
    pub fn boxes(&self, frame: &FrameState, area: Rect) -> Vec<PosterBox> {
        let lift = self.lift_rows();
        let inset = 3.0 * self.spacing;
        let width_px = (self.pitch - 2.0 * inset).max(0.0);
        let rows = (self.projection.rows(POSTER_ASPECT * self.pitch).round() as u16)
            .min(area.height.saturating_sub(lift));
        let cols = self.projection.cols(width_px).round() as u16;

        frame
            .slots
            .iter()
            .filter_map(|slot| match slot {
                SlotVisual::Spacer { .. } => None,
                SlotVisual::Item { left, visual, .. } => {
                    let x_px = left - frame.position + inset;
                    Some(PosterBox {
                        real_index: visual.real_index,
                        x: area.x as i32 + self.projection.cols(x_px).round() as i32,
                        y: area.y as i32
                            + lift as i32
                            + self.projection.rows(visual.translate_y).round() as i32,
                        cols,
                        rows,
                    })
                }
            })
            .filter(|b| b.x + (b.cols as i32) > area.left() as i32 && b.x < area.right() as i32)
            .collect()
    }
}

pub struct PosterStrip<'a> {
    pub frame: &'a FrameState,
    pub sequence: &'a PaddedSequence<ImageRef>,
    pub images: &'a HashMap<usize, DecodedPoster>,
    pub failed: &'a HashSet<usize>,
    pub geometry: StripGeometry,
    /// `true` while the first batch is still being discovered or decoded.
    pub loading: bool,
}

impl Widget for PosterStrip<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        if self.sequence.is_empty() {
            let msg = if self.loading { "Loading…" } else { "No posters" };
            let y = area.y + area.height / 2;
            Paragraph::new(Line::styled(msg, Theme::loading_style()))
                .alignment(Alignment::Center)
                .render(Rect::new(area.x, y, area.width, 1), buf);
            return;
        }

        for b in self.geometry.boxes(self.frame, area) {
            match self.images.get(&b.real_index) {
                Some(decoded) => {
                    paint_image(buf, area, b.x, b.y, b.cols, b.rows, &decoded.poster);
                }
                None => {
                    let failed = self.failed.contains(&b.real_index);
                    let slot = self.sequence.get(b.real_index + 1).and_then(Slot::item);
                    let label = match slot {
                        Some(item) if failed => format!("✗ {}", item.label()),
                        Some(item) => item.label(),
                        None => String::new(),
                    };
                    let style = if failed {
                        Theme::failed_style()
                    } else {
                        Theme::placeholder_style()
                    };
                    render_placeholder(buf, area, &b, &label, style);
                }
            }
        }
    }
}

/// A dotted frame with the label on its middle row, clipped to `clip`.
fn render_placeholder(
    buf: &mut Buffer,
    clip: Rect,
    b: &PosterBox,
    label: &str,
    style: ratatui::style::Style,
) {
    let (x0, x1) = (b.x.max(clip.left() as i32), (b.x + b.cols as i32).min(clip.right() as i32));
    let (y0, y1) = (b.y.max(clip.top() as i32), (b.y + b.rows as i32).min(clip.bottom() as i32));
    if x0 >= x1 || y0 >= y1 {
        return;
    }
    for y in y0..y1 {
        for x in x0..x1 {
            let edge = x == b.x || x == b.x + b.cols as i32 - 1 || y == b.y || y == b.y + b.rows as i32 - 1;
            if let Some(cell) = buf.cell_mut((x as u16, y as u16)) {
                cell.set_char(if edge { '·' } else { ' ' }).set_style(style);
            }
        }
    }

    let mid = b.y + b.rows as i32 / 2;
    if mid < y0 || mid >= y1 || b.cols < 3 {
        return;
    }
    // The label is laid out against the whole box so it slides with it.
    let inner_w = b.cols as usize - 2;
    let text: String = label.chars().take(inner_w).collect();
    let pad = (inner_w - text.chars().count()) / 2;
    for (i, ch) in text.chars().enumerate() {
        let x = b.x + 1 + (pad + i) as i32;
        if x >= x0 && x < x1 {
            if let Some(cell) = buf.cell_mut((x as u16, mid as u16)) {
                cell.set_char(ch).set_style(style);
            }
        }
    }
}
