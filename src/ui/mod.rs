//! UI / rendering layer: everything that touches Ratatui widgets.
//!
//! This layer takes a `FrameState` sampled from the core and turns it into
//! cells on the terminal.  No filesystem I/O happens here.

pub mod backdrop;
pub mod halfblock;
pub mod indicator;
pub mod layout;
pub mod posters;
pub mod theme;
