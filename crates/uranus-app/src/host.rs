//! The environment that schedules frames for the animation loop.
//!
//! A host delivers one-shot frame callbacks: the loop requests a frame, the
//! host later reports the instant it fired, and the loop re-arms for the next
//! one. Nothing in the loop reads the wall clock directly.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Identifies one requested frame so it can be cancelled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

/// Per-frame callback scheduler.
pub trait FrameHost {
    /// Current host time.
    fn now(&self) -> Instant;

    /// Arm a single frame callback. Only one request is outstanding at a time;
    /// a new request replaces the previous one.
    fn request_frame(&mut self) -> FrameHandle;

    /// Disarm a pending request. Unknown or already fired handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);

    /// Block until the pending frame fires and return its timestamp, or
    /// `None` if no frame is armed.
    fn wait_for_frame(&mut self) -> Option<Instant>;
}

/// Host with a hand-driven clock, for tests and benchmarks.
///
/// Each fired frame advances time by the next scripted delta, or by
/// `frame_interval` when the script is empty.
#[derive(Debug)]
pub struct ManualHost {
    now: Instant,
    frame_interval: Duration,
    script: VecDeque<Duration>,
    pending: Option<FrameHandle>,
    next_handle: u64,
    requests: u64,
    cancellations: u64,
}

impl ManualHost {
    pub fn new(frame_interval: Duration) -> Self {
        Self {
            now: Instant::now(),
            frame_interval,
            script: VecDeque::new(),
            pending: None,
            next_handle: 0,
            requests: 0,
            cancellations: 0,
        }
    }

    /// Queue explicit frame deltas, consumed one per fired frame.
    pub fn script<I: IntoIterator<Item = Duration>>(&mut self, deltas: I) {
        self.script.extend(deltas);
    }

    /// Move the clock forward without firing a frame.
    pub fn advance(&mut self, by: Duration) {
        self.now += by;
    }

    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Total `request_frame` calls.
    pub fn requests(&self) -> u64 {
        self.requests
    }

    /// Total cancellations of a pending frame.
    pub fn cancellations(&self) -> u64 {
        self.cancellations
    }
}

impl Default for ManualHost {
    fn default() -> Self {
        Self::new(Duration::from_micros(16_667))
    }
}

impl FrameHost for ManualHost {
    fn now(&self) -> Instant {
        self.now
    }

    fn request_frame(&mut self) -> FrameHandle {
        self.next_handle += 1;
        self.requests += 1;
        let handle = FrameHandle(self.next_handle);
        self.pending = Some(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
            self.cancellations += 1;
        }
    }

    fn wait_for_frame(&mut self) -> Option<Instant> {
        self.pending.take()?;
        let delta = self.script.pop_front().unwrap_or(self.frame_interval);
        self.now += delta;
        Some(self.now)
    }
}

/// Wall-clock host that sleeps to hold a target frame rate.
#[derive(Debug)]
pub struct PacedHost {
    interval: Duration,
    last_frame: Instant,
    pending: Option<FrameHandle>,
    next_handle: u64,
}

impl PacedHost {
    /// `target_fps` of zero disables pacing.
    pub fn new(target_fps: u32) -> Self {
        let interval = if target_fps == 0 {
            Duration::ZERO
        } else {
            Duration::from_secs_f64(1.0 / f64::from(target_fps))
        };
        Self {
            interval,
            last_frame: Instant::now(),
            pending: None,
            next_handle: 0,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl FrameHost for PacedHost {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn request_frame(&mut self) -> FrameHandle {
        self.next_handle += 1;
        let handle = FrameHandle(self.next_handle);
        self.pending = Some(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
    }

    fn wait_for_frame(&mut self) -> Option<Instant> {
        self.pending.take()?;
        let deadline = self.last_frame + self.interval;
        let now = Instant::now();
        if deadline > now {
            std::thread::sleep(deadline - now);
        }
        self.last_frame = Instant::now();
        Some(self.last_frame)
    }
}
