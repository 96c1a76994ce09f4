//! Shared simulation state for the Uranus viewer.
//!
//! Holds the [`SimulationClock`] advanced by the fixed-step loop, the discrete
//! [`QualityLevel`] chosen by the performance governor, and the collaborator
//! traits through which the loop drives planets, rings, moons and effects
//! without knowing their internals.

pub mod clock;
pub mod collaborator;
pub mod quality;

pub use clock::{ClockError, SimulationClock, TimeSpeedPolicy};
pub use collaborator::{
    Collaborator, CollaboratorError, CollaboratorSet, FixedContext, FrameContext, FrameUpdate,
    Phase, QualityAdjustable, Shared, SimulationStep, shared,
};
pub use quality::{QualityError, QualityLevel};
