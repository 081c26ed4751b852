use std::collections::VecDeque;

use serde::Serialize;

use crate::control::satellite::SatelliteId;
use crate::utils::vector3d::Vector3D;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrailMarker {
    pub satellite: SatelliteId,
    pub position: Vector3D,
    pub direction: Vector3D,
    pub created_at_ms: f64,
}

/// Short-lived markers left behind by moving satellites. Markers expire on
/// wall-clock time and outlive the satellite that dropped them.
#[derive(Debug, Clone)]
pub struct TrailBuffer {
    lifetime_ms: f64,
    markers: VecDeque<TrailMarker>,
}

impl TrailBuffer {
    pub fn new(lifetime_ms: f64) -> Self {
        TrailBuffer {
            lifetime_ms,
            markers: VecDeque::new(),
        }
    }

    pub fn push(&mut self, marker: TrailMarker) {
        self.markers.push_back(marker);
    }

    /// Drops every marker at least `lifetime_ms` old. Returns how many went.
    pub fn prune(&mut self, now_ms: f64) -> usize {
        let before = self.markers.len();
        let lifetime_ms = self.lifetime_ms;
        self.markers
            .retain(|marker| now_ms - marker.created_at_ms < lifetime_ms);
        before - self.markers.len()
    }

    pub fn markers(&self) -> impl Iterator<Item = &TrailMarker> {
        self.markers.iter()
    }

    pub fn markers_for(&self, satellite: SatelliteId) -> impl Iterator<Item = &TrailMarker> {
        self.markers
            .iter()
            .filter(move |marker| marker.satellite == satellite)
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}
