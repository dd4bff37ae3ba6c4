//! Piecewise-linear interpolation tables.
//!
//! A table maps a scalar input (a scroll offset) onto an output by blending
//! linearly between consecutive `(breakpoint, anchor)` pairs.  Inputs at or
//! before the first breakpoint yield the first anchor; inputs past the last
//! breakpoint yield the last anchor.  Evaluation is total: every `f64`,
//! including NaN and the infinities, maps to a finite output.

use crate::error::InterpolationError;

/// What happens to the output outside (and inside) the breakpoint span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Extrapolate {
    /// Hold the boundary anchor past the outer breakpoints.
    #[default]
    Hold,
    /// Hold the boundary anchor *and* bound every output to the
    /// `[min anchor, max anchor]` range, so float error in the blend can
    /// never push the value outside it.
    Clamp,
}

/// A validated table of `N` strictly increasing breakpoints and their anchors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interpolation<const N: usize> {
    input: [f64; N],
    output: [f64; N],
    extrapolate: Extrapolate,
}

impl<const N: usize> Interpolation<N> {
    /// Build a table, rejecting anything the blend could divide by zero on.
    pub fn new(
        input: [f64; N],
        output: [f64; N],
        extrapolate: Extrapolate,
    ) -> Result<Self, InterpolationError> {
        if N < 2 {
            return Err(InterpolationError::TooFewBreakpoints(N));
        }
        for (index, b) in input.iter().enumerate() {
            if !b.is_finite() {
                return Err(InterpolationError::NonFinite { index });
            }
            if index > 0 && *b <= input[index - 1] {
                return Err(InterpolationError::NotIncreasing { index });
            }
        }
        Ok(Self {
            input,
            output,
            extrapolate,
        })
    }

    /// A flat table that yields `value` everywhere.  Skips validation, so
    /// it stays within `core` as the fallback for unbuildable tables.
    pub(super) fn constant(value: f64) -> Self {
        Self {
            input: std::array::from_fn(|i| i as f64),
            output: [value; N],
            extrapolate: Extrapolate::Hold,
        }
    }

    #[cfg(test)]
    pub fn breakpoints(&self) -> &[f64; N] {
        &self.input
    }

    /// Evaluate the table at `x`.
    pub fn sample(&self, x: f64) -> f64 {
        let value = self.sample_raw(x);
        match self.extrapolate {
            Extrapolate::Hold => value,
            Extrapolate::Clamp => {
                let (lo, hi) = self.anchor_bounds();
                value.clamp(lo, hi)
            }
        }
    }

    fn sample_raw(&self, x: f64) -> f64 {
        // Only `constant` can produce these; `new` rejects them.
        if N < 2 {
            return self.output.first().copied().unwrap_or(0.0);
        }
        // NaN compares false against everything; treat it as "before the start".
        if x.is_nan() || x <= self.input[0] {
            return self.output[0];
        }
        if x > self.input[N - 1] {
            return self.output[N - 1];
        }
        // First segment whose upper breakpoint is >= x: (b[k], b[k+1]].
        let k = self.input[1..]
            .iter()
            .position(|&b| x <= b)
            .unwrap_or(N - 2);
        let (x0, x1) = (self.input[k], self.input[k + 1]);
        let (y0, y1) = (self.output[k], self.output[k + 1]);
        let span = x1 - x0;
        if span <= 0.0 {
            return y1;
        }
        let t = (x - x0) / span;
        // Written as a weighted sum so t == 1 lands exactly on y1.
        y0 * (1.0 - t) + y1 * t
    }

    fn anchor_bounds(&self) -> (f64, f64) {
        self.output
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }
}
