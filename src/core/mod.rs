//! Core logic – interpolation, the padded item sequence, scroll state and
//! poster discovery.
//!
//! Nothing in this module depends on any TUI or rendering crate.

pub mod carousel;
pub mod interpolate;
pub mod library;
pub mod position;
pub mod sequence;
