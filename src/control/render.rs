//! Interface to the scene graph that draws satellites.
//!
//! The simulation never draws anything itself. It creates one visual handle
//! per satellite, pushes transforms and force arrows every tick, and releases
//! the handle exactly once when the satellite is removed.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::control::satellite::Satellite;
use crate::utils::vector3d::Vector3D;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VisualHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetState {
    /// Placeholder only; the model is still loading.
    Pending,
    Ready,
}

/// The three arrows drawn on each satellite.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VectorSet {
    pub velocity_direction: Vector3D,
    pub gravity: Vector3D,
    pub drag: Vector3D,
}

pub trait RenderBackend {
    /// Starts loading the satellite's model. The returned handle is usable
    /// immediately even while its asset is still `Pending`.
    fn create_visual_handle(&mut self, satellite: &Satellite) -> VisualHandle;

    fn asset_state(&self, handle: VisualHandle) -> AssetState;

    fn set_handle_transform(
        &mut self,
        handle: VisualHandle,
        position: Vector3D,
        orientation: Vector3D,
    );

    fn set_handle_vectors(&mut self, handle: VisualHandle, vectors: &VectorSet);

    fn release_handle(&mut self, handle: VisualHandle);

    fn set_planet_rotation(&mut self, _angle: f64) {}

    /// Called once at the start of every tick, before any transform is pushed.
    fn begin_frame(&mut self) {}
}

#[derive(Debug, Clone)]
pub struct HandleRecord {
    pub asset: AssetState,
    pub frames_until_ready: u32,
    pub position: Vector3D,
    pub orientation: Vector3D,
    pub vectors: VectorSet,
    pub transform_updates: u64,
    pub release_count: u32,
}

/// Headless backend that records every call. Assets become ready after a
/// fixed number of frames.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub asset_latency_frames: u32,
    pub planet_rotation: f64,
    pub frames: u64,
    next_handle: u64,
    handles: HashMap<VisualHandle, HandleRecord>,
}

impl RecordingBackend {
    pub fn new(asset_latency_frames: u32) -> Self {
        RecordingBackend {
            asset_latency_frames,
            ..Default::default()
        }
    }

    pub fn record(&self, handle: VisualHandle) -> Option<&HandleRecord> {
        self.handles.get(&handle)
    }

    pub fn release_count(&self, handle: VisualHandle) -> u32 {
        self.handles.get(&handle).map_or(0, |record| record.release_count)
    }

    pub fn live_handle_count(&self) -> usize {
        self.handles
            .values()
            .filter(|record| record.release_count == 0)
            .count()
    }

    pub fn handle_count(&self) -> usize {
        self.handles.len()
    }
}

impl RenderBackend for RecordingBackend {
    fn create_visual_handle(&mut self, satellite: &Satellite) -> VisualHandle {
        self.next_handle += 1;
        let handle = VisualHandle(self.next_handle);
        let asset = if self.asset_latency_frames == 0 {
            AssetState::Ready
        } else {
            AssetState::Pending
        };
        self.handles.insert(
            handle,
            HandleRecord {
                asset,
                frames_until_ready: self.asset_latency_frames,
                position: satellite.position,
                orientation: satellite.velocity.normalize(),
                vectors: VectorSet::default(),
                transform_updates: 0,
                release_count: 0,
            },
        );
        debug!("created visual handle {:?} for satellite {:?}", handle, satellite.id);
        handle
    }

    fn asset_state(&self, handle: VisualHandle) -> AssetState {
        self.handles
            .get(&handle)
            .map_or(AssetState::Pending, |record| record.asset)
    }

    fn set_handle_transform(
        &mut self,
        handle: VisualHandle,
        position: Vector3D,
        orientation: Vector3D,
    ) {
        if let Some(record) = self.handles.get_mut(&handle) {
            record.position = position;
            record.orientation = orientation;
            record.transform_updates += 1;
        }
    }

    fn set_handle_vectors(&mut self, handle: VisualHandle, vectors: &VectorSet) {
        if let Some(record) = self.handles.get_mut(&handle) {
            record.vectors = *vectors;
        }
    }

    fn release_handle(&mut self, handle: VisualHandle) {
        match self.handles.get_mut(&handle) {
            Some(record) => {
                record.release_count += 1;
                if record.release_count > 1 {
                    warn!("visual handle {:?} released {} times", handle, record.release_count);
                }
            }
            None => warn!("release of unknown visual handle {:?}", handle),
        }
    }

    fn set_planet_rotation(&mut self, angle: f64) {
        self.planet_rotation = angle;
    }

    fn begin_frame(&mut self) {
        self.frames += 1;
        for record in self.handles.values_mut() {
            if record.asset == AssetState::Pending {
                record.frames_until_ready = record.frames_until_ready.saturating_sub(1);
                if record.frames_until_ready == 0 {
                    record.asset = AssetState::Ready;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PhysicsConfig;
    use crate::control::planet::CelestialBody;
    use crate::control::satellite::SatelliteId;

    fn satellite() -> Satellite {
        let earth = CelestialBody::from_config(&PhysicsConfig::default());
        Satellite::new(
            SatelliteId(1),
            Vector3D::new(earth.radius * 2.0, 0.0, 0.0),
            10.0,
            1.0,
            Vector3D::new(0.0, 1.0, 0.0),
            &earth,
        )
        .expect("valid satellite")
    }

    #[test]
    fn test_asset_resolves_after_latency() {
        let mut backend = RecordingBackend::new(2);
        let handle = backend.create_visual_handle(&satellite());
        assert_eq!(backend.asset_state(handle), AssetState::Pending);

        backend.begin_frame();
        assert_eq!(backend.asset_state(handle), AssetState::Pending);
        backend.begin_frame();
        assert_eq!(backend.asset_state(handle), AssetState::Ready);
    }

    #[test]
    fn test_transforms_apply_to_pending_placeholder() {
        let mut backend = RecordingBackend::new(10);
        let handle = backend.create_visual_handle(&satellite());
        let target = Vector3D::new(1.0, 2.0, 3.0);

        backend.set_handle_transform(handle, target, Vector3D::new(0.0, 0.0, 1.0));

        let record = backend.record(handle).expect("handle exists");
        assert_eq!(record.asset, AssetState::Pending);
        assert_eq!(record.position, target);
        assert_eq!(record.transform_updates, 1);
    }

    #[test]
    fn test_release_is_counted() {
        let mut backend = RecordingBackend::new(0);
        let handle = backend.create_visual_handle(&satellite());
        assert_eq!(backend.live_handle_count(), 1);

        backend.release_handle(handle);

        assert_eq!(backend.release_count(handle), 1);
        assert_eq!(backend.live_handle_count(), 0);
        assert_eq!(backend.handle_count(), 1);
    }
}
