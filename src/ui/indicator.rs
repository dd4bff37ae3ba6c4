//! Indicator row: one dot per padded slot, stretched by its scale.
//!
//! Spacer slots take no room at all.  Real dots are laid out centred in
//! logical pixels and drawn with left-aligned eighth blocks so a dot can
//! grow by less than a whole cell.

use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

use crate::core::carousel::{FrameState, SlotVisual};

use super::layout::Projection;
use super::theme::Theme;

/// Resting dot width in logical px.
const DOT_SIZE: f64 = 8.0;
/// Horizontal margin on each side of a dot.
const DOT_MARGIN: f64 = 4.0;

const EIGHTHS: [char; 8] = ['▏', '▎', '▍', '▌', '▋', '▊', '▉', '█'];

/// Horizontal extent of one dot, in fractional columns from the area's left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DotSpan {
    pub start: f64,
    pub width: f64,
}

/// Dot extents for every real slot of `frame`, centred in a row that maps
/// `viewport_width` px onto `area`.
pub fn dot_spans(frame: &FrameState, viewport_width: f64, area: Rect) -> Vec<DotSpan> {
    let projection = Projection::new(viewport_width, area);
    let widths: Vec<f64> = frame
        .slots
        .iter()
        .filter_map(|slot| match slot {
            SlotVisual::Spacer { .. } => None,
            SlotVisual::Item { visual, .. } => Some(DOT_SIZE * visual.scale_x),
        })
        .collect();
    let total: f64 = widths.iter().map(|w| w + 2.0 * DOT_MARGIN).sum();

    let mut x = (viewport_width - total) / 2.0;
    widths
        .into_iter()
        .map(|w| {
            let span = DotSpan {
                start: projection.cols(x + DOT_MARGIN),
                width: projection.cols(w),
            };
            x += w + 2.0 * DOT_MARGIN;
            span
        })
        .collect()
}

pub struct IndicatorRow<'a> {
    pub frame: &'a FrameState,
    pub viewport_width: f64,
}

impl Widget for IndicatorRow<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let y = area.y + area.height / 2;
        let style = Theme::dot_style();
        for span in dot_spans(self.frame, self.viewport_width, area) {
            // Whole eighths, at least one so a dot never vanishes.
            let eighths = ((span.width * 8.0).round() as i64).max(1);
            let mut x = area.x as i64 + span.start.round() as i64;
            let mut left = eighths;
            while left > 0 {
                let glyph = EIGHTHS[(left.min(8) - 1) as usize];
                if x >= area.left() as i64 && x < area.right() as i64 {
                    if let Some(cell) = buf.cell_mut((x as u16, y)) {
                        cell.set_char(glyph).set_style(style);
                    }
                }
                left -= 8;
                x += 1;
            }
        }
    }
}
