//! Scroll-driven visual state for the carousel.
//!
//! Every value here is a pure function of `(scroll offset, index, pitch)`.
//! Nothing is cached between frames: the renderer asks again each time and
//! always gets an answer consistent with the offset it passed in.

use std::time::Duration;

use crate::error::ConfigError;

use super::interpolate::{Extrapolate, Interpolation};
use super::sequence::{PaddedSequence, Slot};

// ───────────────────────────────────────── config ────────────

/// Session constants.  Fixed at start-up; validated once into an [`Engine`].
#[derive(Debug, Clone, PartialEq)]
pub struct CarouselConfig {
    /// Logical viewport width in pixels.
    pub viewport_width: f64,
    /// Share of the viewport one real item occupies.
    pub item_fraction: f64,
    /// Horizontal margin around each poster card.
    pub spacing: f64,
    /// How far a poster lifts (upward) at the peak of its parallax window.
    pub displacement: f64,
    /// Minimum interval between published drag samples.
    pub scroll_throttle: Duration,
    /// Velocity retained after release; higher glides further before snapping.
    pub deceleration_rate: f64,
    /// Fraction of the remaining distance covered per settle tick.
    pub settle_speed: f64,
    /// Keyboard / wheel nudge, as a fraction of one item pitch.
    pub drag_step: f64,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            viewport_width: 400.0,
            item_fraction: 0.72,
            spacing: 10.0,
            displacement: 50.0,
            scroll_throttle: Duration::from_millis(16),
            deceleration_rate: 0.1,
            settle_speed: 0.35,
            drag_step: 0.25,
        }
    }
}

impl CarouselConfig {
    /// `viewport_width · item_fraction`.
    pub fn item_size(&self) -> f64 {
        self.viewport_width * self.item_fraction
    }

    /// Width of each leading / trailing spacer.
    pub fn spacer_width(&self) -> f64 {
        (self.viewport_width - self.item_size()) / 2.0
    }

    /// Reject every configuration the engine could misbehave on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.viewport_width.is_finite() && self.viewport_width > 0.0) {
            return Err(ConfigError::ViewportWidth(self.viewport_width));
        }
        if !(self.item_fraction > 0.0 && self.item_fraction <= 1.0) {
            return Err(ConfigError::ItemFraction(self.item_fraction));
        }
        let pitch = self.item_size();
        if !(pitch.is_finite() && pitch > 0.0) {
            return Err(ConfigError::ItemPitch(pitch));
        }
        if !(self.displacement.is_finite() && self.displacement >= 0.0) {
            return Err(ConfigError::Displacement(self.displacement));
        }
        if !(self.spacing.is_finite() && self.spacing >= 0.0) {
            return Err(ConfigError::Spacing(self.spacing));
        }
        if self.scroll_throttle < Duration::from_millis(1) {
            return Err(ConfigError::Throttle);
        }
        if !(self.deceleration_rate >= 0.0 && self.deceleration_rate < 1.0) {
            return Err(ConfigError::DecelerationRate(self.deceleration_rate));
        }
        if !(self.settle_speed > 0.0 && self.settle_speed < 1.0) {
            return Err(ConfigError::SettleSpeed(self.settle_speed));
        }
        if !(self.drag_step > 0.0 && self.drag_step <= 1.0) {
            return Err(ConfigError::DragStep(self.drag_step));
        }
        Ok(())
    }
}

// ───────────────────────────────────────── engine ────────────

/// Validated geometry plus the three scroll mappings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Engine {
    pitch: f64,
    displacement: f64,
    spacer_width: f64,
}

impl Engine {
    pub fn new(config: &CarouselConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            pitch: config.item_size(),
            displacement: config.displacement,
            spacer_width: config.spacer_width(),
        })
    }

    /// Build directly from a pitch and displacement (no spacer geometry).
    #[cfg(test)]
    pub fn with_pitch(pitch: f64, displacement: f64) -> Result<Self, ConfigError> {
        if !(pitch.is_finite() && pitch > 0.0) {
            return Err(ConfigError::ItemPitch(pitch));
        }
        if !(displacement.is_finite() && displacement >= 0.0) {
            return Err(ConfigError::Displacement(displacement));
        }
        Ok(Self {
            pitch,
            displacement,
            spacer_width: 0.0,
        })
    }

    pub fn pitch(&self) -> f64 {
        self.pitch
    }

    pub fn displacement(&self) -> f64 {
        self.displacement
    }

    pub fn spacer_width(&self) -> f64 {
        self.spacer_width
    }

    /// Three breakpoints one pitch apart, centred on `center` pitches.
    fn window(&self, center: f64) -> [f64; 3] {
        [
            (center - 1.0) * self.pitch,
            center * self.pitch,
            (center + 1.0) * self.pitch,
        ]
    }

    fn table(&self, center: f64, anchors: [f64; 3], extrapolate: Extrapolate) -> Interpolation<3> {
        let breakpoints = self.window(center);
        // Only fails for offsets so large that adjacent multiples of the
        // pitch collapse to the same f64; hold the resting anchor there.
        Interpolation::new(breakpoints, anchors, extrapolate)
            .unwrap_or_else(|_| Interpolation::constant(anchors[0]))
    }

    /// Backdrop table for real item `real_index`: `[0, 1, 0]` over
    /// `[(i−1)·P, i·P, (i+1)·P]`.
    pub fn backdrop_table(&self, real_index: usize) -> Interpolation<3> {
        self.table(real_index as f64, [0.0, 1.0, 0.0], Extrapolate::Hold)
    }

    /// Parallax table for padded slot `padded_index`: `[0, −D, 0]` over
    /// `[(idx−2)·P, (idx−1)·P, idx·P]`.
    ///
    /// The window is keyed on the padded index, so it sits one pitch behind
    /// the backdrop and indicator windows.  Real item `r` lives in slot
    /// `r + 1`, which puts the peak on the offset that centres the item.
    pub fn parallax_table(&self, padded_index: usize) -> Interpolation<3> {
        self.table(
            padded_index as f64 - 1.0,
            [0.0, -self.displacement, 0.0],
            Extrapolate::Hold,
        )
    }

    /// Indicator table for real item `real_index`: `[1, 2, 1]` over
    /// `[P·(c−1), P·c, P·(c+1)]`, clamped.
    pub fn indicator_table(&self, real_index: usize) -> Interpolation<3> {
        self.table(real_index as f64, [1.0, 2.0, 1.0], Extrapolate::Clamp)
    }

    /// Crossfade opacity of real item `real_index`'s backdrop.
    pub fn backdrop_opacity(&self, real_index: usize, position: f64) -> f64 {
        self.backdrop_table(real_index).sample(position)
    }

    /// Vertical offset of the poster in padded slot `padded_index` (≤ 0 lifts it).
    pub fn poster_translate_y(&self, padded_index: usize, position: f64) -> f64 {
        self.parallax_table(padded_index).sample(position)
    }

    /// Horizontal stretch of real item `real_index`'s indicator dot, in `[1, 2]`.
    pub fn indicator_scale(&self, real_index: usize, position: f64) -> f64 {
        self.indicator_table(real_index).sample(position)
    }

    // ── geometry ────────────────────────────────────────────────

    /// Largest valid scroll offset for `item_count` real items.
    pub fn max_offset(&self, item_count: usize) -> f64 {
        item_count.saturating_sub(1) as f64 * self.pitch
    }

    /// Scroll offset that centres real item `real_index`.
    pub fn offset_of(&self, real_index: usize) -> f64 {
        real_index as f64 * self.pitch
    }

    /// Real item closest to the centred slot at `position`.
    pub fn nearest_index(&self, position: f64, item_count: usize) -> Option<usize> {
        if item_count == 0 {
            return None;
        }
        let raw = (position / self.pitch).round();
        let last = (item_count - 1) as f64;
        Some(if raw.is_nan() { 0.0 } else { raw.clamp(0.0, last) } as usize)
    }

    /// Left edge of padded slot `padded_index` in content coordinates.
    pub fn slot_left(&self, padded_index: usize) -> f64 {
        if padded_index == 0 {
            0.0
        } else {
            self.spacer_width + (padded_index - 1) as f64 * self.pitch
        }
    }

    /// Width of padded slot `padded_index` in a sequence of `len` slots.
    pub fn slot_width(&self, padded_index: usize, len: usize) -> f64 {
        if padded_index == 0 || padded_index + 1 == len {
            self.spacer_width
        } else {
            self.pitch
        }
    }

    // ── render boundary ─────────────────────────────────────────

    /// All derived values for one padded slot, or `None` for a spacer.
    pub fn visual<T>(
        &self,
        seq: &PaddedSequence<T>,
        padded_index: usize,
        position: f64,
    ) -> Option<ItemVisual> {
        let real_index = seq.real_index(padded_index)?;
        Some(ItemVisual {
            real_index,
            opacity: self.backdrop_opacity(real_index, position),
            translate_y: self.poster_translate_y(padded_index, position),
            scale_x: self.indicator_scale(real_index, position),
        })
    }

    /// Everything one frame needs, sampled at a single scroll offset.
    pub fn frame<T>(&self, seq: &PaddedSequence<T>, position: f64) -> FrameState {
        let slots = seq
            .slots()
            .iter()
            .enumerate()
            .map(|(padded_index, slot)| match slot {
                Slot::Spacer => SlotVisual::Spacer {
                    left: self.slot_left(padded_index),
                    width: self.slot_width(padded_index, seq.len()),
                },
                Slot::Item(_) => {
                    // Slot::Item always has a real index.
                    let visual = self
                        .visual(seq, padded_index, position)
                        .unwrap_or(ItemVisual::resting(padded_index - 1));
                    SlotVisual::Item {
                        left: self.slot_left(padded_index),
                        width: self.slot_width(padded_index, seq.len()),
                        visual,
                    }
                }
            })
            .collect();
        let backdrops = (0..seq.real_len())
            .map(|i| self.backdrop_opacity(i, position))
            .collect();
        FrameState {
            position,
            slots,
            backdrops,
        }
    }
}

/// Derived values for one real item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemVisual {
    pub real_index: usize,
    /// Backdrop crossfade opacity in `[0, 1]`.
    pub opacity: f64,
    /// Poster vertical translation in `[−D, 0]`.
    pub translate_y: f64,
    /// Indicator horizontal scale in `[1, 2]`.
    pub scale_x: f64,
}

impl ItemVisual {
    fn resting(real_index: usize) -> Self {
        Self {
            real_index,
            opacity: 0.0,
            translate_y: 0.0,
            scale_x: 1.0,
        }
    }
}

/// One padded slot as the renderer sees it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SlotVisual {
    /// Fixed-width empty space; transparent indicator slot.
    Spacer { left: f64, width: f64 },
    Item {
        left: f64,
        width: f64,
        visual: ItemVisual,
    },
}

/// Snapshot of every derived value at one scroll offset.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameState {
    pub position: f64,
    /// One entry per padded slot, in order.
    pub slots: Vec<SlotVisual>,
    /// Backdrop opacity per real item, in paint order (later paints over earlier).
    pub backdrops: Vec<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const P: f64 = 300.0;
    const D: f64 = 50.0;

    fn engine() -> Engine {
        Engine::with_pitch(P, D).unwrap()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_default_config_geometry() {
        let config = CarouselConfig::default();
        assert!(config.validate().is_ok());
        assert!(approx(config.item_size(), 288.0));
        assert!(approx(config.spacer_width(), 56.0));
        let engine = Engine::new(&config).unwrap();
        assert!(approx(engine.pitch(), 288.0));
        assert!(approx(engine.spacer_width(), 56.0));
    }

    #[test]
    fn test_config_errors_rejected_at_construction() {
        let bad = |f: fn(&mut CarouselConfig)| {
            let mut config = CarouselConfig::default();
            f(&mut config);
            Engine::new(&config).unwrap_err()
        };
        assert_eq!(bad(|c| c.viewport_width = 0.0), ConfigError::ViewportWidth(0.0));
        assert!(matches!(bad(|c| c.viewport_width = f64::NAN), ConfigError::ViewportWidth(_)));
        assert_eq!(bad(|c| c.item_fraction = 0.0), ConfigError::ItemFraction(0.0));
        assert_eq!(bad(|c| c.displacement = -1.0), ConfigError::Displacement(-1.0));
        assert!(matches!(bad(|c| c.displacement = f64::INFINITY), ConfigError::Displacement(_)));
        assert_eq!(bad(|c| c.scroll_throttle = Duration::ZERO), ConfigError::Throttle);
        assert_eq!(bad(|c| c.deceleration_rate = 1.0), ConfigError::DecelerationRate(1.0));
        assert_eq!(bad(|c| c.settle_speed = 0.0), ConfigError::SettleSpeed(0.0));
        assert_eq!(bad(|c| c.drag_step = 2.0), ConfigError::DragStep(2.0));

        assert_eq!(Engine::with_pitch(0.0, D).unwrap_err(), ConfigError::ItemPitch(0.0));
        assert_eq!(Engine::with_pitch(-5.0, D).unwrap_err(), ConfigError::ItemPitch(-5.0));
    }

    #[test]
    fn test_breakpoints_strictly_increasing_one_pitch_apart() {
        let e = engine();
        for idx in 0..20 {
            for bp in [
                *e.backdrop_table(idx).breakpoints(),
                *e.parallax_table(idx).breakpoints(),
                *e.indicator_table(idx).breakpoints(),
            ] {
                assert!(bp[0] < bp[1] && bp[1] < bp[2]);
                assert!(approx(bp[1] - bp[0], P));
                assert!(approx(bp[2] - bp[1], P));
            }
        }
    }

    #[test]
    fn test_backdrop_centering_law() {
        let e = engine();
        for i in 0..10 {
            let centre = i as f64 * P;
            assert_eq!(e.backdrop_opacity(i, centre), 1.0);
            assert_eq!(e.backdrop_opacity(i, centre + P), 0.0);
            assert_eq!(e.backdrop_opacity(i, centre - P), 0.0);
            assert!(approx(e.backdrop_opacity(i, centre + P / 2.0), 0.5));
            assert!(approx(e.backdrop_opacity(i, centre - P / 4.0), 0.75));
        }
    }

    #[test]
    fn test_backdrop_far_out_of_range_is_transparent() {
        let e = engine();
        assert_eq!(e.backdrop_opacity(2, -1e9), 0.0);
        assert_eq!(e.backdrop_opacity(2, 1e9), 0.0);
        assert_eq!(e.backdrop_opacity(0, -P / 2.0), 0.5);
    }

    #[test]
    fn test_indicator_scale_stays_in_range() {
        let e = engine();
        for i in 0..6 {
            for k in -40..40 {
                let pos = k as f64 * P / 7.0;
                let s = e.indicator_scale(i, pos);
                assert!((1.0..=2.0).contains(&s), "i={i} pos={pos} s={s}");
            }
            assert_eq!(e.indicator_scale(i, i as f64 * P), 2.0);
            assert_eq!(e.indicator_scale(i, 10_000.0 * P), 1.0);
            assert_eq!(e.indicator_scale(i, -10_000.0 * P), 1.0);
        }
    }

    #[test]
    fn test_parallax_window_trails_by_one_pitch() {
        let e = engine();
        for idx in 1..8 {
            let at = |k: f64| e.poster_translate_y(idx, k * P);
            let idx_f = idx as f64;
            assert_eq!(at(idx_f), 0.0);
            assert_eq!(at(idx_f - 2.0), 0.0);
            assert_eq!(at(idx_f - 1.0), -D);
            assert!(approx(at(idx_f - 1.5), -D / 2.0));
            assert!(approx(at(idx_f - 0.5), -D / 2.0));
            assert_eq!(at(idx_f + 3.0), 0.0);
            assert_eq!(at(idx_f - 5.0), 0.0);
        }
    }

    #[test]
    fn test_zero_displacement_never_lifts() {
        let e = Engine::with_pitch(P, 0.0).unwrap();
        assert_eq!(e.poster_translate_y(3, 2.0 * P), 0.0);
        assert_eq!(e.poster_translate_y(3, 1.5 * P), 0.0);
    }

    #[test]
    fn test_spacers_get_no_visuals() {
        let e = engine();
        let seq = PaddedSequence::build(&["a", "b"]);
        assert_eq!(e.visual(&seq, 0, 0.0), None);
        assert_eq!(e.visual(&seq, 3, 0.0), None);
        assert!(e.visual(&seq, 1, 0.0).is_some());
    }

    #[test]
    fn test_end_to_end_scenario() {
        let e = engine();
        let items = ["p0", "p1", "p2", "p3"];
        let seq = PaddedSequence::build(&items);
        let position = 2.0 * P;

        assert_eq!(e.backdrop_opacity(2, position), 1.0);
        assert_eq!(e.backdrop_opacity(0, position), 0.0);
        assert_eq!(e.backdrop_opacity(4, position), 0.0);
        assert_eq!(e.backdrop_opacity(1, position), 0.0);
        assert_eq!(e.backdrop_opacity(3, position), 0.0);

        assert_eq!(e.indicator_scale(2, position), 2.0);
        assert_eq!(e.indicator_scale(1, position), 1.0);
        assert_eq!(e.indicator_scale(3, position), 1.0);

        // Padded slot 3 holds real item 2; its window is [300, 600, 900].
        assert_eq!(e.poster_translate_y(3, position), -D);
        assert_eq!(e.poster_translate_y(3, 3.0 * P), 0.0);
        assert_eq!(e.poster_translate_y(3, P), 0.0);

        let visual = e.visual(&seq, 3, position).unwrap();
        assert_eq!(visual.real_index, 2);
        assert_eq!(visual.opacity, 1.0);
        assert_eq!(visual.translate_y, -D);
        assert_eq!(visual.scale_x, 2.0);

        // Neighbours sit on the edges of their windows.
        assert_eq!(e.poster_translate_y(2, position), 0.0);
        assert_eq!(e.poster_translate_y(4, position), 0.0);
        assert!(approx(e.poster_translate_y(4, 2.5 * P), -D / 2.0));
    }

    #[test]
    fn test_frame_state_layout() {
        let config = CarouselConfig {
            viewport_width: 400.0,
            item_fraction: 0.75,
            ..Default::default()
        };
        let e = Engine::new(&config).unwrap();
        let seq = PaddedSequence::build(&["a", "b", "c"]);
        let frame = e.frame(&seq, 150.0);

        assert_eq!(frame.slots.len(), 5);
        assert_eq!(frame.backdrops.len(), 3);
        assert!(approx(frame.backdrops[0], 0.5));
        assert!(approx(frame.backdrops[1], 0.5));
        assert_eq!(frame.backdrops[2], 0.0);

        assert_eq!(frame.slots[0], SlotVisual::Spacer { left: 0.0, width: 50.0 });
        match frame.slots[2] {
            SlotVisual::Item { left, width, visual } => {
                assert!(approx(left, 350.0));
                assert!(approx(width, 300.0));
                assert_eq!(visual.real_index, 1);
                assert!(approx(visual.scale_x, 1.5));
            }
            other => panic!("expected item, got {other:?}"),
        }
        assert_eq!(frame.slots[4], SlotVisual::Spacer { left: 950.0, width: 50.0 });
        assert!(approx(e.slot_width(4, 5), 50.0));
        assert!(approx(e.slot_width(2, 5), 300.0));
    }

    #[test]
    fn test_empty_sequence_frame_is_empty() {
        let e = engine();
        let seq: PaddedSequence<&str> = PaddedSequence::default();
        let frame = e.frame(&seq, 123.0);
        assert!(frame.slots.is_empty());
        assert!(frame.backdrops.is_empty());
        assert_eq!(e.nearest_index(123.0, 0), None);
        assert_eq!(e.max_offset(0), 0.0);
    }

    #[test]
    fn test_nearest_index_and_offsets() {
        let e = engine();
        assert_eq!(e.nearest_index(0.0, 4), Some(0));
        assert_eq!(e.nearest_index(449.0, 4), Some(1));
        assert_eq!(e.nearest_index(451.0, 4), Some(2));
        assert_eq!(e.nearest_index(1e9, 4), Some(3));
        assert_eq!(e.nearest_index(-1e9, 4), Some(0));
        assert_eq!(e.nearest_index(f64::NAN, 4), Some(0));
        assert_eq!(e.offset_of(3), 900.0);
        assert_eq!(e.max_offset(4), 900.0);
    }
}
