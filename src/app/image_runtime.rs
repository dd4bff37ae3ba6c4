//! Background poster decoding to keep the UI thread responsive.
//!
//! Each load batch runs on its own thread and reports per-item results over
//! a channel, tagged with the batch generation so a reload can ignore
//! whatever an older batch is still sending.

use std::path::Path;
use std::sync::Arc;

use image::imageops::FilterType;
use image::RgbaImage;
use tokio::sync::mpsc;

use crate::core::library::ImageRef;

/// Longest edge of the decoded poster thumbnail.
const POSTER_MAX_EDGE: u32 = 320;
/// Longest edge of the backdrop variant (it is blurred and stretched anyway).
const BACKDROP_MAX_EDGE: u32 = 160;
/// Gaussian sigma applied to the backdrop variant.
const BACKDROP_BLUR: f32 = 1.0;

/// Both render variants of one poster.
#[derive(Debug, Clone)]
pub struct DecodedPoster {
    pub poster: Arc<RgbaImage>,
    pub backdrop: Arc<RgbaImage>,
}

#[derive(Debug)]
pub enum ImageUpdate {
    Decoded {
        generation: u64,
        index: usize,
        images: DecodedPoster,
    },
    Failed {
        generation: u64,
        index: usize,
        error: String,
    },
    BatchDone {
        generation: u64,
    },
}

/// Decode `items` in order on a worker thread.  `index` in every update is
/// the item's real (unpadded) index.
pub fn spawn_image_loads(
    tx: mpsc::UnboundedSender<ImageUpdate>,
    generation: u64,
    items: Vec<ImageRef>,
) {
    std::thread::spawn(move || {
        for (index, item) in items.iter().enumerate() {
            let t0 = std::time::Instant::now();
            let update = match decode(&item.path) {
                Ok(images) => {
                    tracing::debug!("decoded {} in {:.2?}", item.path.display(), t0.elapsed());
                    ImageUpdate::Decoded {
                        generation,
                        index,
                        images,
                    }
                }
                Err(e) => {
                    tracing::warn!("failed to decode {}: {e:#}", item.path.display());
                    ImageUpdate::Failed {
                        generation,
                        index,
                        error: e.to_string(),
                    }
                }
            };
            if tx.send(update).is_err() {
                return; // UI gone
            }
        }
        let _ = tx.send(ImageUpdate::BatchDone { generation });
    });
}

fn decode(path: &Path) -> anyhow::Result<DecodedPoster> {
    let full = image::open(path)?.to_rgba8();
    let poster = shrink(&full, POSTER_MAX_EDGE);
    let backdrop = image::imageops::blur(&shrink(&full, BACKDROP_MAX_EDGE), BACKDROP_BLUR);
    Ok(DecodedPoster {
        poster: Arc::new(poster),
        backdrop: Arc::new(backdrop),
    })
}

/// Downscale so the longest edge is at most `max_edge`, preserving aspect.
fn shrink(img: &RgbaImage, max_edge: u32) -> RgbaImage {
    let (w, h) = img.dimensions();
    let longest = w.max(h);
    if longest <= max_edge || longest == 0 {
        return img.clone();
    }
    let scale = max_edge as f64 / longest as f64;
    let nw = ((w as f64 * scale).round() as u32).max(1);
    let nh = ((h as f64 * scale).round() as u32).max(1);
    image::imageops::resize(img, nw, nh, FilterType::Triangle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shrink_preserves_aspect() {
        let img = RgbaImage::new(1000, 500);
        let small = shrink(&img, 100);
        assert_eq!(small.dimensions(), (100, 50));

        let tiny = RgbaImage::new(20, 40);
        assert_eq!(shrink(&tiny, 100).dimensions(), (20, 40));
    }

    #[test]
    fn test_loader_reports_every_item() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.png");
        RgbaImage::from_pixel(8, 12, image::Rgba([1, 2, 3, 255]))
            .save(&good)
            .unwrap();
        let bad = dir.path().join("bad.png");
        std::fs::write(&bad, b"not really a png").unwrap();

        let (tx, mut rx) = mpsc::unbounded_channel();
        spawn_image_loads(tx, 7, vec![ImageRef::new(&good), ImageRef::new(&bad)]);

        let mut decoded = Vec::new();
        let mut failed = Vec::new();
        loop {
            match rx.blocking_recv() {
                Some(ImageUpdate::Decoded { generation, index, images }) => {
                    assert_eq!(generation, 7);
                    assert_eq!(images.poster.dimensions(), (8, 12));
                    decoded.push(index);
                }
                Some(ImageUpdate::Failed { generation, index, .. }) => {
                    assert_eq!(generation, 7);
                    failed.push(index);
                }
                Some(ImageUpdate::BatchDone { generation }) => {
                    assert_eq!(generation, 7);
                    break;
                }
                None => panic!("loader hung up before BatchDone"),
            }
        }
        assert_eq!(decoded, vec![0]);
        assert_eq!(failed, vec![1]);
    }
}
