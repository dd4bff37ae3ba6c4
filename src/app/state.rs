//! Central application state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&AppState` (rendering) or `&mut AppState` (event handling).

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use ratatui::layout::Rect;

use crate::config::AppConfig;
use crate::core::{
    carousel::{Engine, FrameState},
    library::{DiscoverConfig, ImageRef},
    position::{PositionReader, ScrollController},
    sequence::PaddedSequence,
};

use super::image_runtime::{DecodedPoster, ImageUpdate};

/// Top-level application state.
pub struct AppState {
    pub config: AppConfig,
    /// Validated carousel geometry and mappings.
    pub engine: Engine,
    /// Sole writer of the scroll offset.
    pub scroll: ScrollController,
    /// What the renderer reads the offset from.
    pub position: PositionReader,
    /// Paths given on the command line; rescanned on reload.
    pub inputs: Vec<PathBuf>,
    pub discover: DiscoverConfig,
    /// The poster list wrapped in spacers.
    pub sequence: PaddedSequence<ImageRef>,
    /// Decoded images by real index.
    pub images: HashMap<usize, DecodedPoster>,
    /// Real indices that failed to decode.
    pub failed: HashSet<usize>,
    /// Bumped on every reload so late results from an older batch are dropped.
    pub load_generation: u64,
    /// `true` while the current batch is still decoding.
    pub loading: bool,
    /// Set by the reload action; serviced by the main loop.
    pub needs_reload: bool,
    /// Controls the main event loop.
    pub should_quit: bool,
    /// An optional status message shown in the bottom bar.
    pub status_message: Option<String>,
    /// Column of the last mouse-drag sample, while the left button is held.
    pub drag_column: Option<u16>,
    /// Where the poster strip was last drawn (mouse px conversion).
    pub strip_area: Rect,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        engine: Engine,
        inputs: Vec<PathBuf>,
        discover: DiscoverConfig,
    ) -> Self {
        let scroll = ScrollController::new(engine, &config.carousel);
        let position = scroll.subscribe();
        Self {
            config,
            engine,
            scroll,
            position,
            inputs,
            discover,
            sequence: PaddedSequence::default(),
            images: HashMap::new(),
            failed: HashSet::new(),
            load_generation: 0,
            loading: false,
            needs_reload: true,
            should_quit: false,
            status_message: None,
            drag_column: None,
            strip_area: Rect::default(),
        }
    }

    /// Replace the poster list wholesale.  Returns the real items to decode
    /// and the generation their results must carry.
    pub fn set_items(&mut self, items: Vec<ImageRef>) -> (u64, Vec<ImageRef>) {
        self.sequence = PaddedSequence::build(&items);
        self.scroll.set_item_count(self.sequence.real_len());
        self.images.clear();
        self.failed.clear();
        self.load_generation = self.load_generation.wrapping_add(1);
        self.loading = !self.sequence.is_empty();
        self.status_message = Some(match self.sequence.real_len() {
            0 => "No posters found".to_string(),
            1 => "1 poster".to_string(),
            n => format!("{n} posters"),
        });
        (self.load_generation, self.sequence.real_items_only())
    }

    /// Apply one decode result; stale generations are ignored.
    pub fn apply_image_update(&mut self, update: ImageUpdate) {
        match update {
            ImageUpdate::Decoded {
                generation,
                index,
                images,
            } if generation == self.load_generation => {
                self.images.insert(index, images);
            }
            ImageUpdate::Failed {
                generation,
                index,
                error,
            } if generation == self.load_generation => {
                self.failed.insert(index);
                self.status_message = Some(format!("Could not load poster {}: {error}", index + 1));
            }
            ImageUpdate::BatchDone { generation } if generation == self.load_generation => {
                self.loading = false;
            }
            _ => {}
        }
    }

    /// All derived values for the current offset, sampled once per frame.
    pub fn frame(&self) -> FrameState {
        self.engine.frame(&self.sequence, self.position.get())
    }

    /// Poster currently nearest the centre, with its label.
    pub fn current_item(&self) -> Option<(usize, &ImageRef)> {
        let index = self.scroll.current_index()?;
        let item = self.sequence.real_items().nth(index)?;
        Some((index, item))
    }

    /// Logical pixels per terminal column for the last drawn strip.
    pub fn px_per_column(&self) -> f64 {
        if self.strip_area.width == 0 {
            return 0.0;
        }
        self.config.carousel.viewport_width / self.strip_area.width as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn state() -> AppState {
        let config = AppConfig::default();
        let engine = Engine::new(&config.carousel).unwrap();
        AppState::new(config, engine, Vec::new(), DiscoverConfig::default())
    }

    fn decoded() -> DecodedPoster {
        DecodedPoster {
            poster: Arc::new(image::RgbaImage::new(1, 1)),
            backdrop: Arc::new(image::RgbaImage::new(1, 1)),
        }
    }

    #[test]
    fn test_set_items_rebuilds_sequence() {
        let mut s = state();
        let (generation, to_load) = s.set_items(vec![ImageRef::new("a.png"), ImageRef::new("b.png")]);
        assert_eq!(generation, 1);
        assert_eq!(to_load.len(), 2);
        assert_eq!(s.sequence.len(), 4);
        assert!(s.loading);
        assert_eq!(s.status_message.as_deref(), Some("2 posters"));
        assert_eq!(s.current_item().map(|(i, _)| i), Some(0));
    }

    #[test]
    fn test_empty_reload_is_loading_state() {
        let mut s = state();
        let (_, to_load) = s.set_items(Vec::new());
        assert!(to_load.is_empty());
        assert!(s.sequence.is_empty());
        assert!(!s.loading);
        assert!(s.frame().slots.is_empty());
        assert!(s.current_item().is_none());
    }

    #[test]
    fn test_stale_updates_are_ignored() {
        let mut s = state();
        let (old, _) = s.set_items(vec![ImageRef::new("a.png")]);
        let (new, _) = s.set_items(vec![ImageRef::new("b.png")]);
        assert_ne!(old, new);

        s.apply_image_update(ImageUpdate::Decoded {
            generation: old,
            index: 0,
            images: decoded(),
        });
        assert!(s.images.is_empty());

        s.apply_image_update(ImageUpdate::Decoded {
            generation: new,
            index: 0,
            images: decoded(),
        });
        assert!(s.images.contains_key(&0));

        s.apply_image_update(ImageUpdate::BatchDone { generation: old });
        assert!(s.loading);
        s.apply_image_update(ImageUpdate::BatchDone { generation: new });
        assert!(!s.loading);
    }

    #[test]
    fn test_failed_update_sets_status() {
        let mut s = state();
        let (generation, _) = s.set_items(vec![ImageRef::new("a.png")]);
        s.apply_image_update(ImageUpdate::Failed {
            generation,
            index: 0,
            error: "boom".into(),
        });
        assert!(s.failed.contains(&0));
        assert!(s.status_message.as_deref().unwrap_or("").contains("boom"));
    }

    #[test]
    fn test_px_per_column() {
        let mut s = state();
        assert_eq!(s.px_per_column(), 0.0);
        s.strip_area = Rect::new(0, 0, 100, 20);
        assert_eq!(s.px_per_column(), 4.0);
    }
}
