pub mod config;
pub mod constants;
pub mod control;
pub mod errors;
pub mod telemetry_system;
pub mod trajectory_system;
pub mod utils;

pub use config::PhysicsConfig;
pub use constants::*;
pub use control::clock::{SimulationClock, TimeScale};
pub use control::planet::CelestialBody;
pub use control::render::{AssetState, RecordingBackend, RenderBackend, VectorSet, VisualHandle};
pub use control::satellite::{ForceSample, RemovalCause, Satellite, SatelliteId, SatelliteState};
pub use control::scheduler::{
    CancelToken, FrameScheduler, MonotonicTimeSource, RealtimeScheduler, SyntheticScheduler,
    TickRequest, TimeSource,
};
pub use control::simulation::Simulation;
pub use errors::SimulationError;

// Re-export commonly used items from trajectory_system
pub use trajectory_system::collision::CollisionResolver;
pub use trajectory_system::forces::ForceModel;

// Re-export commonly used items from telemetry_system
pub use telemetry_system::telemetry::{FrameSnapshot, SatelliteSnapshot, Telemetry};
pub use telemetry_system::trail::{TrailBuffer, TrailMarker};

// Re-export commonly used utilities
pub use utils::vector3d::Vector3D;
