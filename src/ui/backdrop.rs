//! Full-screen blurred backdrop with scroll-driven crossfade.
//!
//! Every real poster's backdrop variant is stretched over the whole area and
//! painted in list order at its crossfade opacity, so where two fades
//! overlap the later item covers the earlier one.  A vertical gradient from
//! transparent to white is laid over the stack.

use std::collections::HashMap;

use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

use crate::app::image_runtime::DecodedPoster;

use super::halfblock::{blend, put, sample_cover, Rgb};
use super::theme::Theme;

/// Opacities below this are not worth sampling.
const MIN_VISIBLE_OPACITY: f64 = 1.0 / 512.0;

pub struct BackdropWidget<'a> {
    /// Opacity per real item, in paint order.
    pub opacities: &'a [f64],
    pub images: &'a HashMap<usize, DecodedPoster>,
}

impl<'a> BackdropWidget<'a> {
    /// Visible layers, bottom first.
    fn layers(&self) -> Vec<(&'a image::RgbaImage, f64)> {
        self.opacities
            .iter()
            .enumerate()
            .filter(|&(_, &a)| a >= MIN_VISIBLE_OPACITY)
            .filter_map(|(i, &a)| self.images.get(&i).map(|d| (d.backdrop.as_ref(), a)))
            .collect()
    }
}

/// Colour of one backdrop pixel: canvas, then each layer, then the gradient.
fn composite(layers: &[(&image::RgbaImage, f64)], w: u32, h: u32, x: u32, y: u32) -> Rgb {
    let mut c = Theme::CANVAS;
    for (img, alpha) in layers {
        c = blend(c, sample_cover(img, w, h, x, y), *alpha);
    }
    let t = if h > 1 { y as f64 / (h - 1) as f64 } else { 1.0 };
    blend(c, Theme::GRADIENT_END, t)
}

impl Widget for BackdropWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let layers = self.layers();
        let (w, h) = (area.width as u32, area.height as u32 * 2);
        for row in 0..area.height {
            let yt = row as u32 * 2;
            for col in 0..area.width {
                let x = col as u32;
                let top = composite(&layers, w, h, x, yt);
                let bottom = composite(&layers, w, h, x, yt + 1);
                put(buf, area.x + col, area.y + row, top, bottom);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use ratatui::{layout::Position, style::Color};
    use std::sync::Arc;

    fn solid(r: u8, g: u8, b: u8) -> DecodedPoster {
        let img = Arc::new(RgbaImage::from_pixel(4, 4, Rgba([r, g, b, 255])));
        DecodedPoster {
            poster: img.clone(),
            backdrop: img,
        }
    }

    #[test]
    fn test_later_layer_paints_over_earlier() {
        let (red, blue) = (solid(255, 0, 0), solid(0, 0, 255));
        let layers_red_then_blue = [(&*red.backdrop, 1.0), (&*blue.backdrop, 1.0)];
        // Top row: the gradient is fully transparent.
        assert_eq!(composite(&layers_red_then_blue, 4, 8, 0, 0), [0.0, 0.0, 255.0]);
        let layers_blue_then_red = [layers_red_then_blue[1], layers_red_then_blue[0]];
        assert_eq!(composite(&layers_blue_then_red, 4, 8, 0, 0), [255.0, 0.0, 0.0]);
    }

    #[test]
    fn test_partial_opacity_shows_canvas() {
        let black = solid(0, 0, 0);
        let c = composite(&[(&*black.backdrop, 0.5)], 4, 8, 0, 0);
        assert_eq!(c, [127.5; 3]);
    }

    #[test]
    fn test_gradient_reaches_white_at_bottom() {
        let black = solid(0, 0, 0);
        let c = composite(&[(&*black.backdrop, 1.0)], 4, 8, 0, 7);
        assert_eq!(c, Theme::GRADIENT_END);
    }

    #[test]
    fn test_render_uses_only_loaded_visible_layers() {
        let mut images = HashMap::new();
        images.insert(0, solid(0, 0, 0));
        images.insert(1, solid(255, 0, 0));
        let opacities = [1.0, 0.0, 1.0];
        let widget = BackdropWidget {
            opacities: &opacities,
            images: &images,
        };
        assert_eq!(widget.layers().len(), 1);

        let area = Rect::new(0, 0, 3, 4);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);
        let cell = buf.cell(Position::new(1, 0)).unwrap();
        assert_eq!(cell.symbol(), "▀");
        assert_eq!(cell.fg, Color::Rgb(0, 0, 0));
        assert_eq!(buf.cell(Position::new(1, 3)).unwrap().bg, Color::Rgb(255, 255, 255));
    }
}
