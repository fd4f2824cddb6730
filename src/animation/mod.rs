//! Progress control for the chaos/formed morph
//!
//! Holds the global tree state signal, the explicit frame clock and the
//! per-group exponential progress controller.

mod progress;

pub use progress::{DampingMode, FrameTime, ProgressController, TreeState, REFERENCE_FPS};
