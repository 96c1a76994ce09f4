//! Adaptive quality based on measured frame time.
//!
//! Frames are counted into fixed-size windows. When a window fills, its
//! average frame time is compared with the slow and fast thresholds and the
//! quality level moves at most one tier. Partial windows are never evaluated.

use std::collections::VecDeque;

use tracing::{debug, warn};
use uranus_config::PerformanceConfig;
use uranus_sim::{QualityError, QualityLevel};

/// A tier change decided by the governor or requested by the user.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QualityChange {
    pub from: QualityLevel,
    pub to: QualityLevel,
    /// Window average that triggered the change; `None` for manual changes.
    pub average_ms: Option<f64>,
}

#[derive(Clone, Debug)]
pub struct PerformanceGovernor {
    level: QualityLevel,
    adaptive: bool,
    window_frames: u32,
    slow_frame_ms: f64,
    fast_frame_ms: f64,
    max_slow_frames_for_upgrade: u32,

    samples: VecDeque<f64>,
    capacity: usize,

    window_count: u32,
    window_time_ms: f64,
    window_slow_frames: u32,

    last_window_average_ms: Option<f64>,
    last_window_slow_frames: u32,
    total_frames: u64,
    changes: u64,
}

impl PerformanceGovernor {
    /// Build from config. An unknown `initial_quality` logs a warning and
    /// falls back to the default tier.
    pub fn new(config: &PerformanceConfig) -> Self {
        let level = match config.initial_quality.parse::<QualityLevel>() {
            Ok(level) => level,
            Err(error) => {
                warn!(%error, "falling back to {}", QualityLevel::default());
                QualityLevel::default()
            }
        };
        let capacity = config.sample_capacity.max(1);
        Self {
            level,
            adaptive: config.adaptive,
            window_frames: config.window_frames.max(1),
            slow_frame_ms: config.slow_frame_ms,
            fast_frame_ms: config.fast_frame_ms,
            max_slow_frames_for_upgrade: config.max_slow_frames_for_upgrade,
            samples: VecDeque::with_capacity(capacity),
            capacity,
            window_count: 0,
            window_time_ms: 0.0,
            window_slow_frames: 0,
            last_window_average_ms: None,
            last_window_slow_frames: 0,
            total_frames: 0,
            changes: 0,
        }
    }

    pub fn quality(&self) -> QualityLevel {
        self.level
    }

    pub fn is_adaptive(&self) -> bool {
        self.adaptive
    }

    /// Enable or disable automatic changes. The current window keeps
    /// collecting either way.
    pub fn set_adaptive(&mut self, adaptive: bool) {
        self.adaptive = adaptive;
    }

    /// Record one frame duration in milliseconds.
    ///
    /// Returns the change decided at the end of a window, if any. Negative or
    /// non-finite durations are dropped.
    pub fn record_frame(&mut self, frame_ms: f64) -> Option<QualityChange> {
        if !frame_ms.is_finite() || frame_ms < 0.0 {
            debug!(frame_ms, "ignoring invalid frame time");
            return None;
        }

        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(frame_ms);
        self.total_frames += 1;

        self.window_count += 1;
        self.window_time_ms += frame_ms;
        if frame_ms > self.slow_frame_ms {
            self.window_slow_frames += 1;
        }

        if self.window_count < self.window_frames {
            return None;
        }

        let average = self.window_time_ms / f64::from(self.window_count);
        let slow_frames = self.window_slow_frames;
        self.window_count = 0;
        self.window_time_ms = 0.0;
        self.window_slow_frames = 0;
        self.last_window_average_ms = Some(average);
        self.last_window_slow_frames = slow_frames;

        if !self.adaptive {
            return None;
        }
        self.evaluate(average, slow_frames)
    }

    fn evaluate(&mut self, average_ms: f64, slow_frames: u32) -> Option<QualityChange> {
        let target = if average_ms > self.slow_frame_ms {
            self.level.step_down()
        } else if average_ms < self.fast_frame_ms
            && slow_frames <= self.max_slow_frames_for_upgrade
        {
            self.level.step_up()
        } else {
            None
        }?;
        let change = QualityChange {
            from: self.level,
            to: target,
            average_ms: Some(average_ms),
        };
        self.level = target;
        self.changes += 1;
        Some(change)
    }

    /// Force a level. Returns the change, or `None` if already at `level`.
    pub fn set_quality(&mut self, level: QualityLevel) -> Option<QualityChange> {
        if level == self.level {
            return None;
        }
        let change = QualityChange {
            from: self.level,
            to: level,
            average_ms: None,
        };
        self.level = level;
        self.changes += 1;
        Some(change)
    }

    /// Force a level by name. An unsupported name leaves the level unchanged
    /// and is reported as a warning.
    pub fn request_quality(&mut self, name: &str) -> Result<Option<QualityChange>, QualityError> {
        match name.parse::<QualityLevel>() {
            Ok(level) => Ok(self.set_quality(level)),
            Err(error) => {
                warn!(%error, current = %self.level, "quality unchanged");
                Err(error)
            }
        }
    }

    /// Mean of the retained samples.
    pub fn rolling_average_ms(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.samples.iter().sum::<f64>() / self.samples.len() as f64
    }

    pub fn min_frame_ms(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.samples.iter().copied().fold(f64::INFINITY, f64::min)
    }

    pub fn max_frame_ms(&self) -> f64 {
        self.samples.iter().copied().fold(0.0, f64::max)
    }

    /// Frames per second implied by the rolling average.
    pub fn fps(&self) -> f64 {
        let average = self.rolling_average_ms();
        if average > 0.0 { 1000.0 / average } else { 0.0 }
    }

    pub fn last_window_average_ms(&self) -> Option<f64> {
        self.last_window_average_ms
    }

    pub fn last_window_slow_frames(&self) -> u32 {
        self.last_window_slow_frames
    }

    /// Frames recorded since the last evaluation.
    pub fn window_progress(&self) -> u32 {
        self.window_count
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    /// Number of level changes, automatic or manual.
    pub fn changes(&self) -> u64 {
        self.changes
    }
}

impl Default for PerformanceGovernor {
    fn default() -> Self {
        Self::new(&PerformanceConfig::default())
    }
}
