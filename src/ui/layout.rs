//! Layout helpers: split the terminal area into regions and convert
//! logical carousel pixels to terminal cells.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Primary screen layout: a full-bleed backdrop holding the poster strip and
/// the indicator row, plus a bottom status bar.
pub struct AppLayout {
    pub backdrop_area: Rect,
    pub strip_area: Rect,
    pub indicator_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    /// Compute the layout from the full terminal area.
    pub fn from_area(area: Rect) -> Self {
        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(4),    // backdrop (takes all remaining space)
                Constraint::Length(1), // status bar
            ])
            .split(area);

        let inner = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // breathing room above the lift
                Constraint::Fill(1),   // poster strip
                Constraint::Length(1), // indicator dots
                Constraint::Length(1), // bottom margin
            ])
            .split(outer[0]);

        Self {
            backdrop_area: outer[0],
            strip_area: inner[1],
            indicator_area: inner[2],
            status_area: outer[1],
        }
    }
}

/// Maps logical pixels onto the cells of one area.
///
/// One column spans `viewport_width / area.width` pixels; a row spans twice
/// that, since terminal cells are about twice as tall as wide.
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    px_per_col: f64,
}

impl Projection {
    pub fn new(viewport_width: f64, area: Rect) -> Self {
        let cols = area.width.max(1) as f64;
        Self {
            px_per_col: viewport_width / cols,
        }
    }

    /// Horizontal pixels → columns.
    pub fn cols(&self, px: f64) -> f64 {
        px / self.px_per_col
    }

    /// Vertical pixels → rows.
    pub fn rows(&self, px: f64) -> f64 {
        px / self.px_per_col / 2.0
    }
}
