//! Half-block pixel painting.
//!
//! Each terminal cell shows two vertically stacked pixels using `▀`: the
//! foreground colour is the top pixel and the background the bottom one.
//! Terminal cells are roughly twice as tall as they are wide, so a cell is
//! treated as 1 pixel wide × 2 pixels tall.

use image::RgbaImage;
use ratatui::{buffer::Buffer, layout::Position, layout::Rect, style::Color};

/// Linear RGB triple in `0.0..=255.0`.
pub type Rgb = [f64; 3];

pub fn to_color(c: Rgb) -> Color {
    let q = |v: f64| v.round().clamp(0.0, 255.0) as u8;
    Color::Rgb(q(c[0]), q(c[1]), q(c[2]))
}

/// `dst` with `src` painted over it at `alpha`.
pub fn blend(dst: Rgb, src: Rgb, alpha: f64) -> Rgb {
    let a = alpha.clamp(0.0, 1.0);
    [
        dst[0] + (src[0] - dst[0]) * a,
        dst[1] + (src[1] - dst[1]) * a,
        dst[2] + (src[2] - dst[2]) * a,
    ]
}

/// Write one half-block cell, ignoring positions outside the buffer.
pub fn put(buf: &mut Buffer, x: u16, y: u16, top: Rgb, bottom: Rgb) {
    if let Some(cell) = buf.cell_mut(Position::new(x, y)) {
        cell.set_char('▀').set_fg(to_color(top)).set_bg(to_color(bottom));
    }
}

/// Nearest-pixel sample of `img` stretched to *cover* a `w × h` pixel box
/// (aspect kept, overflow cropped evenly), at box pixel `(x, y)`.
pub fn sample_cover(img: &RgbaImage, w: u32, h: u32, x: u32, y: u32) -> Rgb {
    let (iw, ih) = img.dimensions();
    if iw == 0 || ih == 0 || w == 0 || h == 0 {
        return [0.0; 3];
    }
    let scale = (w as f64 / iw as f64).max(h as f64 / ih as f64);
    let off_x = (iw as f64 * scale - w as f64) / 2.0;
    let off_y = (ih as f64 * scale - h as f64) / 2.0;
    let sx = (((x as f64 + 0.5 + off_x) / scale) as u32).min(iw - 1);
    let sy = (((y as f64 + 0.5 + off_y) / scale) as u32).min(ih - 1);
    let p = img.get_pixel(sx, sy);
    [p[0] as f64, p[1] as f64, p[2] as f64]
}

/// Paint `img` covering the cell box at signed `(x, y)` of `cols × rows`
/// cells, clipped to `clip`.  Parts of the box outside `clip` are skipped,
/// so posters can slide partly off-screen.
pub fn paint_image(buf: &mut Buffer, clip: Rect, x: i32, y: i32, cols: u16, rows: u16, img: &RgbaImage) {
    if cols == 0 || rows == 0 {
        return;
    }
    let (x0, x1) = (x.max(clip.left() as i32), (x + cols as i32).min(clip.right() as i32));
    let (y0, y1) = (y.max(clip.top() as i32), (y + rows as i32).min(clip.bottom() as i32));
    if x0 >= x1 || y0 >= y1 {
        return;
    }
    // Sampled straight from the source: nothing is resized per frame.
    let (w, h) = (cols as u32, rows as u32 * 2);
    let px = |ix: u32, iy: u32| sample_cover(img, w, h, ix, iy);
    for cy in y0..y1 {
        let iy = ((cy - y) * 2) as u32;
        for cx in x0..x1 {
            let ix = (cx - x) as u32;
            put(buf, cx as u16, cy as u16, px(ix, iy), px(ix, iy + 1));
        }
    }
}
