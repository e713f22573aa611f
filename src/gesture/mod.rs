//! Gesture Classification Layer
//!
//! Turns the noisy per-tick extension vector into a stable discrete gesture
//! via an explicit rolling-window debounce.

pub mod classifier;
pub mod history;

pub use classifier::{GestureClassifier, GestureState};
pub use history::StateWindow;
