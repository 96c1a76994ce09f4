//! The simulation clock advanced by the fixed-step phase of the loop.

use uranus_config::SimulationConfig;

/// Rejections from [`SimulationClock::set_time_speed`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClockError {
    #[error("time speed must be finite, got {0}")]
    NonFinite(f64),
    #[error("reverse time is disabled, got speed {0}")]
    ReverseDisabled(f64),
    #[error("time speed {speed} exceeds maximum {max}")]
    TooFast { speed: f64, max: f64 },
}

/// Which time speeds the clock accepts.
///
/// Zero is always accepted (frozen time); negative speeds only when
/// `allow_reverse` is set.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeSpeedPolicy {
    pub allow_reverse: bool,
    pub max_speed: f64,
}

impl TimeSpeedPolicy {
    pub fn check(&self, speed: f64) -> Result<(), ClockError> {
        if !speed.is_finite() {
            return Err(ClockError::NonFinite(speed));
        }
        if speed < 0.0 && !self.allow_reverse {
            return Err(ClockError::ReverseDisabled(speed));
        }
        if speed.abs() > self.max_speed {
            return Err(ClockError::TooFast {
                speed,
                max: self.max_speed,
            });
        }
        Ok(())
    }
}

impl Default for TimeSpeedPolicy {
    fn default() -> Self {
        Self::from(&SimulationConfig::default())
    }
}

impl From<&SimulationConfig> for TimeSpeedPolicy {
    fn from(config: &SimulationConfig) -> Self {
        Self {
            allow_reverse: config.allow_reverse_time,
            max_speed: config.max_time_speed,
        }
    }
}

/// Accumulated simulation time, its speed multiplier, and the pause gate.
///
/// Only the fixed-step phase advances it; pause/resume/reset are explicit
/// user actions.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationClock {
    simulation_time: f64,
    time_speed: f64,
    paused: bool,
    policy: TimeSpeedPolicy,
}

impl SimulationClock {
    /// A running clock at time zero and speed 1.
    pub fn new(policy: TimeSpeedPolicy) -> Self {
        Self {
            simulation_time: 0.0,
            time_speed: 1.0,
            paused: false,
            policy,
        }
    }

    /// Build from config, validating the configured speed against its policy.
    pub fn from_config(config: &SimulationConfig) -> Result<Self, ClockError> {
        let mut clock = Self::new(TimeSpeedPolicy::from(config));
        clock.set_time_speed(config.time_speed)?;
        clock.paused = config.start_paused;
        Ok(clock)
    }

    pub fn simulation_time(&self) -> f64 {
        self.simulation_time
    }

    pub fn time_speed(&self) -> f64 {
        self.time_speed
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn policy(&self) -> &TimeSpeedPolicy {
        &self.policy
    }

    /// Advance by one fixed step. Returns the scaled step actually applied,
    /// which is zero while paused.
    pub fn advance(&mut self, step: f64) -> f64 {
        if self.paused {
            return 0.0;
        }
        let scaled = step * self.time_speed;
        self.simulation_time += scaled;
        scaled
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Flip the pause gate, returning the new paused state.
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    /// Return simulation time to zero. Speed and pause state are kept.
    pub fn reset(&mut self) {
        self.simulation_time = 0.0;
    }

    /// Change the speed multiplier. Rejected values leave the speed unchanged.
    pub fn set_time_speed(&mut self, speed: f64) -> Result<(), ClockError> {
        self.policy.check(speed)?;
        self.time_speed = speed;
        Ok(())
    }
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new(TimeSpeedPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_scales_by_speed() {
        let mut clock = SimulationClock::default();
        clock.set_time_speed(10.0).unwrap();
        let applied = clock.advance(0.5);
        assert!((applied - 5.0).abs() < 1e-12);
        assert!((clock.simulation_time() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_pause_halts_time() {
        let mut clock = SimulationClock::default();
        clock.advance(1.0);
        clock.pause();
        assert_eq!(clock.advance(1.0), 0.0);
        assert!((clock.simulation_time() - 1.0).abs() < 1e-12);
        clock.resume();
        clock.advance(1.0);
        assert!((clock.simulation_time() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_toggle_pause() {
        let mut clock = SimulationClock::default();
        assert!(clock.toggle_pause());
        assert!(!clock.toggle_pause());
    }

    #[test]
    fn test_reset_keeps_speed() {
        let mut clock = SimulationClock::default();
        clock.set_time_speed(3.0).unwrap();
        clock.advance(2.0);
        clock.reset();
        assert_eq!(clock.simulation_time(), 0.0);
        assert_eq!(clock.time_speed(), 3.0);
    }

    #[test]
    fn test_zero_speed_freezes_time() {
        let mut clock = SimulationClock::default();
        clock.set_time_speed(0.0).unwrap();
        clock.advance(1.0);
        assert_eq!(clock.simulation_time(), 0.0);
        assert!(!clock.is_paused());
    }

    #[test]
    fn test_reverse_speed_policy() {
        let mut clock = SimulationClock::default();
        assert_eq!(
            clock.set_time_speed(-1.0),
            Err(ClockError::ReverseDisabled(-1.0))
        );
        assert_eq!(clock.time_speed(), 1.0);

        let mut reversible = SimulationClock::new(TimeSpeedPolicy {
            allow_reverse: true,
            max_speed: 100.0,
        });
        reversible.set_time_speed(-2.0).unwrap();
        reversible.advance(1.0);
        assert!((reversible.simulation_time() + 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_non_finite_and_excessive_speed() {
        let mut clock = SimulationClock::default();
        assert!(matches!(
            clock.set_time_speed(f64::NAN),
            Err(ClockError::NonFinite(_))
        ));
        assert!(matches!(
            clock.set_time_speed(1e9),
            Err(ClockError::TooFast { .. })
        ));
        assert_eq!(clock.time_speed(), 1.0);
    }

    #[test]
    fn test_from_config() {
        let config = SimulationConfig {
            time_speed: 5.0,
            start_paused: true,
            ..Default::default()
        };
        let clock = SimulationClock::from_config(&config).unwrap();
        assert_eq!(clock.time_speed(), 5.0);
        assert!(clock.is_paused());
    }
}
