//! Application orchestration: state management, event loop plumbing, input
//! handling and background image decoding.

pub mod event;
pub mod handler;
pub mod image_runtime;
pub mod state;
