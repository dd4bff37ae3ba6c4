//! The scroll offset signal and the gesture logic that writes it.
//!
//! [`PositionSource`] is the one writer; any number of [`PositionReader`]s
//! observe the latest committed value.  [`ScrollController`] turns drags,
//! nudges and item jumps into published offsets: throttled while a drag is
//! live, then eased onto the nearest item boundary and finished with the
//! exact target value.

use std::time::{Duration, Instant};

use tokio::sync::watch;

use super::carousel::{CarouselConfig, Engine};

/// Remaining distance (in px) below which a settle snaps onto its target.
const SETTLE_EPSILON: f64 = 0.5;

/// Animation frame the settle speed is expressed against.  Also the rate
/// at which the host ticks while the terminal is quiet.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

// ───────────────────────────────────────── signal ────────────

/// Single writer of the scroll offset.  Starts at 0.
#[derive(Debug)]
pub struct PositionSource {
    tx: watch::Sender<f64>,
}

impl Default for PositionSource {
    fn default() -> Self {
        Self::new()
    }
}

impl PositionSource {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0.0);
        Self { tx }
    }

    /// Commit a new offset; readers see it on their next read.
    pub fn publish(&self, position: f64) {
        self.tx.send_replace(position);
    }

    pub fn current(&self) -> f64 {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> PositionReader {
        PositionReader {
            rx: self.tx.subscribe(),
        }
    }
}

/// Read-only view of the scroll offset.
#[derive(Debug, Clone)]
pub struct PositionReader {
    rx: watch::Receiver<f64>,
}

impl PositionReader {
    /// Latest committed offset.
    pub fn get(&self) -> f64 {
        *self.rx.borrow()
    }

    /// `true` if the offset changed since the last [`PositionReader::mark_seen`].
    pub fn has_changed(&self) -> bool {
        // Err means the source was dropped: nothing can change any more.
        self.rx.has_changed().unwrap_or(false)
    }

    pub fn mark_seen(&mut self) {
        self.rx.borrow_and_update();
    }
}

// ───────────────────────────────────────── throttle ──────────

/// Coalesces a stream of samples to at most one per `interval`.
#[derive(Debug, Clone)]
pub struct Throttle {
    interval: Duration,
    last_emit: Option<Instant>,
    pending: Option<f64>,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_emit: None,
            pending: None,
        }
    }

    fn due(&self, now: Instant) -> bool {
        match self.last_emit {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.interval,
        }
    }

    /// Offer a sample.  Returns it if the interval has elapsed; otherwise it
    /// replaces any earlier pending sample and `None` is returned.
    pub fn offer(&mut self, value: f64, now: Instant) -> Option<f64> {
        if self.due(now) {
            self.last_emit = Some(now);
            self.pending = None;
            Some(value)
        } else {
            self.pending = Some(value);
            None
        }
    }

    /// Emit the pending sample once its interval has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<f64> {
        if self.pending.is_some() && self.due(now) {
            self.last_emit = Some(now);
            self.pending.take()
        } else {
            None
        }
    }

    /// Drop the timer and hand back whatever was still pending.
    pub fn flush(&mut self) -> Option<f64> {
        self.last_emit = None;
        self.pending.take()
    }
}

// ───────────────────────────────────────── controller ────────

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Idle,
    Dragging {
        last_sample: Instant,
        /// Smoothed velocity in px per second.
        velocity: f64,
    },
    Settling {
        target: f64,
        /// When the settle last advanced; `None` until the first tick.
        last_tick: Option<Instant>,
    },
}

/// Gesture state machine that owns the [`PositionSource`].
#[derive(Debug)]
pub struct ScrollController {
    engine: Engine,
    source: PositionSource,
    throttle: Throttle,
    phase: Phase,
    /// Unthrottled offset; what the finger is actually at.
    raw: f64,
    item_count: usize,
    deceleration_rate: f64,
    settle_speed: f64,
    drag_step: f64,
}

impl ScrollController {
    pub fn new(engine: Engine, config: &CarouselConfig) -> Self {
        Self {
            engine,
            source: PositionSource::new(),
            throttle: Throttle::new(config.scroll_throttle),
            phase: Phase::Idle,
            raw: 0.0,
            item_count: 0,
            deceleration_rate: config.deceleration_rate,
            settle_speed: config.settle_speed,
            drag_step: config.drag_step,
        }
    }

    pub fn subscribe(&self) -> PositionReader {
        self.source.subscribe()
    }

    /// Latest published offset.
    pub fn position(&self) -> f64 {
        self.source.current()
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, Phase::Dragging { .. })
    }

    #[cfg(test)]
    pub fn is_settling(&self) -> bool {
        matches!(self.phase, Phase::Settling { .. })
    }

    /// Item currently closest to the centred slot.
    pub fn current_index(&self) -> Option<usize> {
        self.engine.nearest_index(self.raw, self.item_count)
    }

    fn clamp(&self, position: f64) -> f64 {
        let max = self.engine.max_offset(self.item_count);
        if position.is_nan() {
            0.0
        } else {
            position.clamp(0.0, max)
        }
    }

    fn commit(&mut self, position: f64) {
        self.raw = position;
        self.source.publish(position);
    }

    /// The item list was replaced.  Keeps the offset inside the new range.
    pub fn set_item_count(&mut self, count: usize) {
        self.item_count = count;
        self.phase = Phase::Idle;
        self.throttle.flush();
        let clamped = self.clamp(self.raw);
        self.commit(clamped);
    }

    // ── drag ────────────────────────────────────────────────────

    pub fn begin_drag(&mut self, now: Instant) {
        self.throttle.flush();
        self.phase = Phase::Dragging {
            last_sample: now,
            velocity: 0.0,
        };
    }

    /// Move by `delta` px (positive scrolls forward).  Published subject to
    /// the throttle.
    pub fn drag_by(&mut self, delta: f64, now: Instant) {
        if !self.is_dragging() {
            self.begin_drag(now);
        }
        let Phase::Dragging {
            last_sample,
            velocity,
        } = self.phase
        else {
            return;
        };

        let next = self.clamp(self.raw + delta);
        let moved = next - self.raw;
        let dt = now.saturating_duration_since(last_sample).as_secs_f64();
        let velocity = if dt > 0.0 {
            // Light smoothing against jittery terminal mouse reports.
            0.6 * (moved / dt) + 0.4 * velocity
        } else {
            velocity
        };
        self.phase = Phase::Dragging {
            last_sample: now,
            velocity,
        };
        self.raw = next;
        if let Some(v) = self.throttle.offer(next, now) {
            self.source.publish(v);
        }
    }

    /// Release: flush the last sample, then settle onto an item boundary.
    pub fn end_drag(&mut self) {
        let velocity = match self.phase {
            Phase::Dragging { velocity, .. } => velocity,
            _ => 0.0,
        };
        if let Some(v) = self.throttle.flush() {
            self.source.publish(v);
        }
        let target = self.snap_target(self.raw, velocity);
        tracing::debug!(raw = self.raw, velocity, target, "drag released");
        self.settle_to(target);
    }

    /// Item boundary nearest to where the release would glide to.
    fn snap_target(&self, position: f64, velocity: f64) -> f64 {
        let glide = velocity * self.deceleration_rate / (1.0 - self.deceleration_rate);
        self.engine
            .nearest_index(position + glide, self.item_count)
            .map_or(0.0, |index| self.engine.offset_of(index))
    }

    // ── programmatic ───────────────────────────────────────────

    /// Wheel / key nudge of `steps` drag steps, then settle.
    pub fn nudge(&mut self, steps: f64) {
        let delta = steps * self.drag_step * self.engine.pitch();
        let next = self.clamp(self.raw + delta);
        self.commit(next);
        let target = self.snap_target(next, 0.0);
        self.settle_to(target);
    }

    pub fn scroll_to_index(&mut self, index: usize) {
        if self.item_count == 0 {
            return;
        }
        let index = index.min(self.item_count - 1);
        self.settle_to(self.engine.offset_of(index));
    }

    pub fn next(&mut self) {
        if let Some(index) = self.settle_index() {
            self.scroll_to_index(index + 1);
        }
    }

    pub fn prev(&mut self) {
        if let Some(index) = self.settle_index() {
            self.scroll_to_index(index.saturating_sub(1));
        }
    }

    pub fn first(&mut self) {
        self.scroll_to_index(0);
    }

    pub fn last(&mut self) {
        self.scroll_to_index(self.item_count.saturating_sub(1));
    }

    /// Index being settled onto, or the current one when idle.  Repeated
    /// jumps while a settle is running keep advancing from its target.
    fn settle_index(&self) -> Option<usize> {
        match self.phase {
            Phase::Settling { target, .. } => self.engine.nearest_index(target, self.item_count),
            _ => self.current_index(),
        }
    }

    fn settle_to(&mut self, target: f64) {
        let target = self.clamp(target);
        if (target - self.raw).abs() < f64::EPSILON {
            self.commit(target);
            self.phase = Phase::Idle;
        } else {
            self.phase = Phase::Settling {
                target,
                last_tick: None,
            };
        }
    }

    // ── frame tick ─────────────────────────────────────────────

    /// Advance animations to `now`.  Returns `true` if a new offset was
    /// published.
    ///
    /// A settle closes `settle_speed` of the remaining distance per
    /// [`FRAME_INTERVAL`] of elapsed time, however often this is called.
    /// Its first tick counts as one whole frame.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.phase {
            Phase::Idle => false,
            Phase::Dragging { .. } => match self.throttle.poll(now) {
                Some(v) => {
                    self.source.publish(v);
                    true
                }
                None => false,
            },
            Phase::Settling { target, last_tick } => {
                let frames = match last_tick {
                    Some(last) => {
                        now.saturating_duration_since(last).as_secs_f64()
                            / FRAME_INTERVAL.as_secs_f64()
                    }
                    None => 1.0,
                };
                if frames <= 0.0 {
                    return false;
                }
                let eased = 1.0 - (1.0 - self.settle_speed).powf(frames);
                let next = self.raw + (target - self.raw) * eased;
                if (target - next).abs() < SETTLE_EPSILON {
                    self.commit(target);
                    self.phase = Phase::Idle;
                } else {
                    self.commit(next);
                    self.phase = Phase::Settling {
                        target,
                        last_tick: Some(now),
                    };
                }
                true
            }
        }
    }
}
