//! Typed errors for the pure core.
//!
//! Anything that can go wrong is caught when a value is *built*; once a
//! config or interpolation table exists, evaluating it cannot fail.

use thiserror::Error;

/// Rejected carousel configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("viewport width must be a positive finite number, got {0}")]
    ViewportWidth(f64),

    #[error("item fraction must be in (0, 1], got {0}")]
    ItemFraction(f64),

    #[error("item pitch must be a positive finite number, got {0}")]
    ItemPitch(f64),

    #[error("displacement must be a non-negative finite number, got {0}")]
    Displacement(f64),

    #[error("spacing must be a non-negative finite number, got {0}")]
    Spacing(f64),

    #[error("scroll throttle must be at least 1 ms")]
    Throttle,

    #[error("deceleration rate must be in [0, 1), got {0}")]
    DecelerationRate(f64),

    #[error("settle speed must be in (0, 1), got {0}")]
    SettleSpeed(f64),

    #[error("drag step must be in (0, 1], got {0}")]
    DragStep(f64),
}

/// Rejected breakpoint / anchor table.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InterpolationError {
    #[error("need at least two breakpoints, got {0}")]
    TooFewBreakpoints(usize),

    #[error("breakpoint {index} is not finite")]
    NonFinite { index: usize },

    #[error("breakpoints must be strictly increasing (index {index})")]
    NotIncreasing { index: usize },
}
