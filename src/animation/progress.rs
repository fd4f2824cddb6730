//! Per-group progress toward the formed tree
//!
//! Each animated group owns one controller. Every frame the controller
//! moves its scalar a fixed fraction of the remaining distance toward the
//! target implied by the current [`TreeState`], so groups with different
//! damping settle at different rates and a state toggle mid-flight simply
//! redirects the motion.

use serde::{Deserialize, Serialize};

/// Frame rate the damping constants are tuned for
pub const REFERENCE_FPS: f32 = 60.0;

/// Global tree state, owned by the host and read by every group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeState {
    #[default]
    Formed,
    Chaos,
}

impl TreeState {
    /// Progress value this state pulls toward
    pub fn target(self) -> f32 {
        match self {
            TreeState::Formed => 1.0,
            TreeState::Chaos => 0.0,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            TreeState::Formed => TreeState::Chaos,
            TreeState::Chaos => TreeState::Formed,
        }
    }

    pub fn is_formed(self) -> bool {
        self == TreeState::Formed
    }
}

/// Frame clock supplied by the host render loop
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameTime {
    /// Seconds since the previous frame
    pub delta: f32,
    /// Monotonic seconds since start
    pub elapsed: f32,
}

impl FrameTime {
    pub fn new(delta: f32, elapsed: f32) -> Self {
        Self { delta, elapsed }
    }

    /// Clock for frame `index` (0-based) of a fixed-rate simulation
    pub fn fixed(index: u32, delta: f32) -> Self {
        Self {
            delta,
            elapsed: (index + 1) as f32 * delta,
        }
    }
}

/// How a controller applies its damping factor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DampingMode {
    /// The factor is applied once per update, whatever the frame length
    #[default]
    PerFrame,
    /// The factor is rescaled by `dt` so that it is exact at
    /// [`REFERENCE_FPS`] and settles in the same wall-clock time at any
    /// other rate
    FrameTime,
}

/// Exponential smoothing of one group's progress scalar
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressController {
    current: f32,
    target: f32,
    damping: f32,
    mode: DampingMode,
}

impl ProgressController {
    /// Controller starting fully in chaos
    pub fn new(damping: f32) -> Self {
        Self::with_progress(damping, 0.0)
    }

    pub fn with_progress(damping: f32, progress: f32) -> Self {
        let damping = if damping.is_finite() {
            damping.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let current = if progress.is_finite() {
            progress.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            current,
            target: current,
            damping,
            mode: DampingMode::PerFrame,
        }
    }

    pub fn with_mode(mut self, mode: DampingMode) -> Self {
        self.mode = mode;
        self
    }

    /// Advance one frame toward the target implied by `state`
    pub fn update(&mut self, dt: f32, state: TreeState) -> f32 {
        self.target = state.target();
        let alpha = self.frame_alpha(dt);
        self.current = (self.current + (self.target - self.current) * alpha).clamp(0.0, 1.0);
        self.current
    }

    fn frame_alpha(&self, dt: f32) -> f32 {
        match self.mode {
            DampingMode::PerFrame => self.damping,
            DampingMode::FrameTime => {
                if !dt.is_finite() || dt <= 0.0 {
                    return 0.0;
                }
                let frames = dt * REFERENCE_FPS;
                (1.0 - (1.0 - self.damping).powf(frames)).clamp(0.0, 1.0)
            }
        }
    }

    pub fn mode(&self) -> DampingMode {
        self.mode
    }

    pub fn progress(&self) -> f32 {
        self.current
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn damping(&self) -> f32 {
        self.damping
    }

    /// Whether the scalar is within `epsilon` of its target.
    ///
    /// Convergence is asymptotic, so this is the only meaningful notion
    /// of "done".
    pub fn is_settled(&self, epsilon: f32) -> bool {
        (self.target - self.current).abs() <= epsilon
    }
}
