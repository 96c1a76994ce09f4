//! Query-surface snapshots for external UI.

use serde::Serialize;
use uranus_camera::CameraInfo;
use uranus_sim::QualityLevel;

/// Loop, clock and camera state at the moment of the query.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LoopInfo {
    pub running: bool,
    pub paused: bool,
    pub simulation_time: f64,
    pub time_speed: f64,
    pub frame_count: u64,
    pub fixed_step_count: u64,
    pub accumulator: f64,
    pub alpha: f64,
    pub camera: CameraInfo,
}

/// Frame timing and quality statistics.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PerformanceReport {
    pub quality: QualityLevel,
    pub adaptive: bool,
    pub frame_count: u64,
    /// Mean over the rolling sample buffer.
    pub average_frame_ms: f64,
    pub last_window_average_ms: Option<f64>,
    pub fps: f64,
    pub min_frame_ms: f64,
    pub max_frame_ms: f64,
    pub quality_changes: u64,
    /// Frames whose raw delta exceeded the clamp.
    pub clamped_frames: u64,
    /// Frames that stopped draining at the sub-step cap.
    pub sub_step_cap_hits: u64,
    pub collaborator_failures: u64,
    pub render_failures: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_serializes_quality_lowercase() {
        let report = PerformanceReport {
            quality: QualityLevel::Medium,
            adaptive: true,
            frame_count: 10,
            average_frame_ms: 16.0,
            last_window_average_ms: None,
            fps: 62.5,
            min_frame_ms: 15.0,
            max_frame_ms: 17.0,
            quality_changes: 0,
            clamped_frames: 0,
            sub_step_cap_hits: 0,
            collaborator_failures: 0,
            render_failures: 0,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["quality"], "medium");
        assert!(json["last_window_average_ms"].is_null());
    }
}
