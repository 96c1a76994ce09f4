//! Collaborators driven by the animation loop.
//!
//! A collaborator is anything the loop updates without knowing its internals:
//! the planet, its rings and moons, visual effects. Each capability is a
//! separate trait, and a [`Collaborator`] registration states at construction
//! which of them it has.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use glam::DVec3;
use tracing::warn;

use crate::quality::QualityLevel;

/// Single-threaded shared ownership, so one object can be registered for
/// several capabilities.
pub type Shared<T> = Rc<RefCell<T>>;

/// Wrap a value for registration.
pub fn shared<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}

/// Inputs for one fixed simulation step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedContext {
    /// Constant step size in seconds.
    pub step: f64,
    /// `step * time_speed`: the simulation time added by this step.
    pub scaled_step: f64,
    /// Simulation time after this step was applied.
    pub simulation_time: f64,
    pub time_speed: f64,
}

/// Inputs for one variable-rate visual update.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameContext {
    /// Clamped frame delta in seconds.
    pub delta: f64,
    /// Fraction of a fixed step not yet simulated, in `[0, 1)` unless the
    /// sub-step cap left extra time in the accumulator.
    pub alpha: f64,
    pub simulation_time: f64,
    pub paused: bool,
    pub quality: QualityLevel,
    pub camera_position: DVec3,
}

/// Fixed-rate simulation time advance (orbits, spin).
pub trait SimulationStep {
    fn step(&mut self, ctx: &FixedContext) -> Result<(), CollaboratorError>;
}

/// Variable-rate visual update (effects, animation).
pub trait FrameUpdate {
    fn update(&mut self, ctx: &FrameContext) -> Result<(), CollaboratorError>;
}

/// Reacts to a quality level change from the performance governor.
pub trait QualityAdjustable {
    fn update_quality(&mut self, level: QualityLevel) -> Result<(), CollaboratorError>;
}

/// Why a collaborator call did not complete.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CollaboratorError {
    /// The collaborator reported a failure.
    #[error("{0}")]
    Failed(String),
    /// The collaborator was already borrowed (re-entrant call).
    #[error("collaborator is busy")]
    Busy,
    /// The collaborator panicked; the panic was contained.
    #[error("collaborator panicked: {0}")]
    Panicked(String),
}

impl CollaboratorError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// Which loop phase a call belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Simulation,
    Frame,
    Quality,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Simulation => "simulation",
            Phase::Frame => "frame",
            Phase::Quality => "quality",
        })
    }
}

/// A named registration with optional capabilities.
pub struct Collaborator {
    name: String,
    simulation: Option<Shared<dyn SimulationStep>>,
    frame: Option<Shared<dyn FrameUpdate>>,
    quality: Option<Shared<dyn QualityAdjustable>>,
    failures: u64,
}

impl Collaborator {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            simulation: None,
            frame: None,
            quality: None,
            failures: 0,
        }
    }

    pub fn with_simulation<T: SimulationStep + 'static>(mut self, target: Shared<T>) -> Self {
        self.simulation = Some(target);
        self
    }

    pub fn with_frame<T: FrameUpdate + 'static>(mut self, target: Shared<T>) -> Self {
        self.frame = Some(target);
        self
    }

    pub fn with_quality<T: QualityAdjustable + 'static>(mut self, target: Shared<T>) -> Self {
        self.quality = Some(target);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of failed calls across all phases.
    pub fn failures(&self) -> u64 {
        self.failures
    }

    pub fn has_phase(&self, phase: Phase) -> bool {
        match phase {
            Phase::Simulation => self.simulation.is_some(),
            Phase::Frame => self.frame.is_some(),
            Phase::Quality => self.quality.is_some(),
        }
    }

    /// Run the fixed-step capability, if present.
    pub fn step(&mut self, ctx: &FixedContext) -> Result<(), CollaboratorError> {
        let result = match &self.simulation {
            Some(target) => invoke(target, |c| c.step(ctx)),
            None => Ok(()),
        };
        self.record(result)
    }

    /// Run the frame capability, if present.
    pub fn update(&mut self, ctx: &FrameContext) -> Result<(), CollaboratorError> {
        let result = match &self.frame {
            Some(target) => invoke(target, |c| c.update(ctx)),
            None => Ok(()),
        };
        self.record(result)
    }

    /// Run the quality capability, if present.
    pub fn update_quality(&mut self, level: QualityLevel) -> Result<(), CollaboratorError> {
        let result = match &self.quality {
            Some(target) => invoke(target, |c| c.update_quality(level)),
            None => Ok(()),
        };
        self.record(result)
    }

    fn record(&mut self, result: Result<(), CollaboratorError>) -> Result<(), CollaboratorError> {
        if result.is_err() {
            self.failures += 1;
        }
        result
    }
}

impl fmt::Debug for Collaborator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collaborator")
            .field("name", &self.name)
            .field("simulation", &self.simulation.is_some())
            .field("frame", &self.frame.is_some())
            .field("quality", &self.quality.is_some())
            .field("failures", &self.failures)
            .finish()
    }
}

/// Borrow the target and run `f`, turning a panic into an error.
fn invoke<T: ?Sized>(
    target: &RefCell<T>,
    f: impl FnOnce(&mut T) -> Result<(), CollaboratorError>,
) -> Result<(), CollaboratorError> {
    let mut guard = target
        .try_borrow_mut()
        .map_err(|_| CollaboratorError::Busy)?;
    match panic::catch_unwind(AssertUnwindSafe(|| f(&mut *guard))) {
        Ok(result) => result,
        Err(payload) => Err(CollaboratorError::Panicked(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Ordered registrations. Each phase visits collaborators in registration
/// order; a failure is logged and skipped, never aborting the phase.
#[derive(Debug, Default)]
pub struct CollaboratorSet {
    entries: Vec<Collaborator>,
}

impl CollaboratorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, collaborator: Collaborator) {
        self.entries.push(collaborator);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Collaborator> {
        self.entries.iter()
    }

    /// Total failures across every collaborator.
    pub fn total_failures(&self) -> u64 {
        self.entries.iter().map(Collaborator::failures).sum()
    }

    /// Run one fixed step on every simulation collaborator. Returns the
    /// number of failures.
    pub fn step_all(&mut self, ctx: &FixedContext) -> usize {
        self.for_each(Phase::Simulation, |c| c.step(ctx))
    }

    /// Run the frame update on every visual collaborator.
    pub fn update_all(&mut self, ctx: &FrameContext) -> usize {
        self.for_each(Phase::Frame, |c| c.update(ctx))
    }

    /// Tell every quality-adjustable collaborator about a new level.
    pub fn broadcast_quality(&mut self, level: QualityLevel) -> usize {
        self.for_each(Phase::Quality, |c| c.update_quality(level))
    }

    fn for_each(
        &mut self,
        phase: Phase,
        mut f: impl FnMut(&mut Collaborator) -> Result<(), CollaboratorError>,
    ) -> usize {
        let mut failed = 0;
        for entry in self.entries.iter_mut().filter(|c| c.has_phase(phase)) {
            if let Err(error) = f(entry) {
                failed += 1;
                warn!(collaborator = entry.name(), %phase, %error, "collaborator failed");
            }
        }
        failed
    }
}
