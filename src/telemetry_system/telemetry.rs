use serde::Serialize;
use tracing::info;

use crate::control::satellite::{RemovalCause, Satellite, SatelliteId, SatelliteState};
use crate::utils::vector3d::Vector3D;

/// Read-only view of one live satellite after a tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SatelliteSnapshot {
    pub id: SatelliteId,
    pub position: Vector3D,
    pub velocity: Vector3D,
    pub height: f64,
    pub gravity: Vector3D,
    pub drag: Vector3D,
}

impl From<&Satellite> for SatelliteSnapshot {
    fn from(satellite: &Satellite) -> Self {
        SatelliteSnapshot {
            id: satellite.id,
            position: satellite.position,
            velocity: satellite.velocity,
            height: satellite.height,
            gravity: satellite.forces.gravity,
            drag: satellite.forces.drag,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameSnapshot {
    pub frame: u64,
    pub timestamp_ms: f64,
    pub delta_time: f64,
    pub simulated_time: f64,
    pub planet_rotation: f64,
    pub satellites: Vec<SatelliteSnapshot>,
    pub trail_markers: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RemovalRecord {
    pub simulated_time: f64,
    pub satellite: SatelliteId,
    pub cause: RemovalCause,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Telemetry {
    pub ticks: u64,
    pub skipped_ticks: u64,
    pub degenerate_samples: u64,
    pub simulated_time: f64,
    pub satellites_added: u64,
    pub removals: Vec<RemovalRecord>,
    max_speed: f64,
    min_height: Option<f64>,
    max_height: Option<f64>,
}

impl Telemetry {
    pub fn new() -> Self {
        Self::default()
    }

    fn format_vector3d(vec: &Vector3D, precision: usize) -> String {
        format!(
            "x = {:.precision$} m, y = {:.precision$} m, z = {:.precision$} m",
            vec.x,
            vec.y,
            vec.z,
            precision = precision
        )
    }

    pub fn format_time(elapsed_time: f64) -> String {
        if elapsed_time >= 3600.0 {
            let hours = (elapsed_time / 3600.0).floor();
            let minutes = ((elapsed_time % 3600.0) / 60.0).floor();
            let seconds = elapsed_time % 60.0;
            format!("{:.0}h {:.0}m {:.2}s", hours, minutes, seconds)
        } else if elapsed_time >= 60.0 {
            let minutes = (elapsed_time / 60.0).floor();
            let seconds = elapsed_time % 60.0;
            format!("{:.0}m {:.2}s", minutes, seconds)
        } else {
            format!("{:.2}s", elapsed_time)
        }
    }

    pub fn format_altitude(altitude: f64) -> String {
        if altitude.abs() >= 1000.0 {
            format!("{:.2} km", altitude / 1000.0)
        } else {
            format!("{:.2} m", altitude)
        }
    }

    pub fn record_addition(&mut self) {
        self.satellites_added += 1;
    }

    pub fn record_skipped_tick(&mut self) {
        self.skipped_ticks += 1;
    }

    pub fn record_degenerate_sample(&mut self) {
        self.degenerate_samples += 1;
    }

    pub fn record_removal(&mut self, simulated_time: f64, satellite: &Satellite) {
        let cause = match satellite.state() {
            SatelliteState::Dead(cause) => cause,
            SatelliteState::Active => return,
        };
        self.removals.push(RemovalRecord {
            simulated_time,
            satellite: satellite.id,
            cause,
        });
    }

    pub fn collect_frame(&mut self, frame: &FrameSnapshot) {
        self.ticks += 1;
        self.simulated_time = frame.simulated_time;

        for satellite in &frame.satellites {
            let speed = satellite.velocity.magnitude();
            if speed > self.max_speed {
                self.max_speed = speed;
            }
            self.min_height = Some(
                self.min_height
                    .map_or(satellite.height, |h| h.min(satellite.height)),
            );
            self.max_height = Some(
                self.max_height
                    .map_or(satellite.height, |h| h.max(satellite.height)),
            );
        }
    }

    pub fn removals_by(&self, predicate: impl Fn(&RemovalCause) -> bool) -> usize {
        self.removals
            .iter()
            .filter(|record| predicate(&record.cause))
            .count()
    }

    pub fn max_speed(&self) -> f64 {
        self.max_speed
    }

    pub fn min_height(&self) -> Option<f64> {
        self.min_height
    }

    pub fn max_height(&self) -> Option<f64> {
        self.max_height
    }

    pub fn describe_satellite(satellite: &SatelliteSnapshot) -> String {
        format!(
            "Satellite {}\n\
                 Position: {}\n\
                 Velocity: {} (Magnitude: {:.2} m/s)\n\
                 Height: {}\n\
                 Gravity: {:.4} m/s²\n\
                 Drag: {:.4} m/s²\n",
            satellite.id.0,
            Self::format_vector3d(&satellite.position, 2),
            Self::format_vector3d(&satellite.velocity, 2),
            satellite.velocity.magnitude(),
            Self::format_altitude(satellite.height),
            satellite.gravity.magnitude(),
            satellite.drag.magnitude(),
        )
    }

    pub fn summary(&self) -> String {
        let ground = self.removals_by(|cause| *cause == RemovalCause::GroundImpact);
        let collisions =
            self.removals_by(|cause| matches!(cause, RemovalCause::Collision { .. }));
        let external = self.removals_by(|cause| *cause == RemovalCause::External);

        let mut lines = vec![
            "--- Simulation Summary ---".to_string(),
            format!("Ticks: {} ({} skipped)", self.ticks, self.skipped_ticks),
            format!("Simulated Time: {}", Self::format_time(self.simulated_time)),
            format!("Satellites Added: {}", self.satellites_added),
            format!(
                "Removed: {} ground impact, {} collision, {} external",
                ground, collisions, external
            ),
            format!("Degenerate Force Samples: {}", self.degenerate_samples),
            format!("Max Speed: {:.2} m/s", self.max_speed),
        ];
        if let (Some(min), Some(max)) = (self.min_height, self.max_height) {
            lines.push(format!(
                "Height Range: {} .. {}",
                Self::format_altitude(min),
                Self::format_altitude(max)
            ));
        }

        lines.push("\n--- Removals ---".to_string());
        for record in &self.removals {
            lines.push(format!(
                "Satellite {} removed at {}: {:?}",
                record.satellite.0,
                Self::format_time(record.simulated_time),
                record.cause
            ));
        }

        lines.join("\n")
    }

    pub fn log_summary(&self) {
        for line in self.summary().lines() {
            info!("{}", line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(height: f64, velocity: Vector3D) -> SatelliteSnapshot {
        SatelliteSnapshot {
            id: SatelliteId(7),
            position: Vector3D::new(1.0, 2.0, 3.0),
            velocity,
            height,
            gravity: Vector3D::new(0.0, -8.0, 0.0),
            drag: Vector3D::ZERO,
        }
    }

    fn frame(satellites: Vec<SatelliteSnapshot>, simulated_time: f64) -> FrameSnapshot {
        FrameSnapshot {
            frame: 1,
            timestamp_ms: 16.0,
            delta_time: 0.016,
            simulated_time,
            planet_rotation: 0.0,
            satellites,
            trail_markers: 0,
        }
    }

    #[test]
    fn test_format_time() {
        assert_eq!(Telemetry::format_time(42.5), "42.50s");
        assert_eq!(Telemetry::format_time(125.0), "2m 5.00s");
        assert_eq!(Telemetry::format_time(3725.0), "1h 2m 5.00s");
    }

    #[test]
    fn test_format_altitude() {
        assert_eq!(Telemetry::format_altitude(950.0), "950.00 m");
        assert_eq!(Telemetry::format_altitude(400_000.0), "400.00 km");
        assert_eq!(Telemetry::format_altitude(-2_000.0), "-2.00 km");
    }

    #[test]
    fn test_collect_frame_tracks_extremes() {
        let mut telemetry = Telemetry::new();
        telemetry.collect_frame(&frame(
            vec![
                snapshot(400_000.0, Vector3D::new(7_000.0, 0.0, 0.0)),
                snapshot(900_000.0, Vector3D::new(0.0, 7_600.0, 0.0)),
            ],
            1.0,
        ));
        telemetry.collect_frame(&frame(vec![snapshot(350_000.0, Vector3D::ZERO)], 2.0));

        assert_eq!(telemetry.ticks, 2);
        assert_eq!(telemetry.simulated_time, 2.0);
        assert_eq!(telemetry.max_speed(), 7_600.0);
        assert_eq!(telemetry.min_height(), Some(350_000.0));
        assert_eq!(telemetry.max_height(), Some(900_000.0));
    }

    #[test]
    fn test_summary_counts_removals_by_cause() {
        let mut telemetry = Telemetry::new();
        telemetry.removals = vec![
            RemovalRecord {
                simulated_time: 10.0,
                satellite: SatelliteId(1),
                cause: RemovalCause::GroundImpact,
            },
            RemovalRecord {
                simulated_time: 12.0,
                satellite: SatelliteId(2),
                cause: RemovalCause::Collision {
                    other: SatelliteId(3),
                },
            },
            RemovalRecord {
                simulated_time: 12.0,
                satellite: SatelliteId(3),
                cause: RemovalCause::Collision {
                    other: SatelliteId(2),
                },
            },
        ];

        let summary = telemetry.summary();

        assert!(summary.contains("Removed: 1 ground impact, 2 collision, 0 external"));
        assert!(summary.contains("Satellite 2 removed at 12.00s"));
    }

    #[test]
    fn test_describe_satellite_mentions_height() {
        let text = Telemetry::describe_satellite(&snapshot(400_000.0, Vector3D::ZERO));
        assert!(text.contains("Height: 400.00 km"));
        assert!(text.contains("Gravity: 8.0000 m/s²"));
    }
}
