// Physical Constants
pub const GRAVITATIONAL_CONSTANT: f64 = 6.6743e-11; // N⋅m²/kg²
pub const EARTH_MASS: f64 = 5.972e24; // kg
pub const EARTH_RADIUS: f64 = 6.378e6; // meters
pub const EARTH_RADIUS_SQ: f64 = EARTH_RADIUS * EARTH_RADIUS; // m²
pub const EARTH_CIRCUMFERENCE: f64 = 2.0 * std::f64::consts::PI * EARTH_RADIUS; // meters

// Planet spin, one frame's rotation at 60 Hz expressed per second
pub const EARTH_ROTATION_RATE: f64 = 1.212_035_108_024_691_3e-6 * 60.0; // rad/s

// Atmospheric Constants (Fd = 1/2 ρ v² Cd A)
pub const AIR_DENSITY: f64 = 1.293; // kg/m³
pub const SATELLITE_CROSS_SECTIONAL_AREA: f64 = 20.015086796021; // m²
pub const SATELLITE_DRAG_COEFFICIENT: f64 = 0.47;
pub const DRAG_CEILING_ALTITUDE: f64 = 6.0e5; // m, no drag at or above

// Collision Constants
pub const PROXIMITY_THRESHOLD_SQ: f64 = 7.0e10; // m², roughly 264 km separation

// Simulation Parameters
pub const DEFAULT_TIME_SCALE: f64 = 1.0;
pub const FRAME_INTERVAL_MS: f64 = 1000.0 / 60.0; // ms
pub const TRAIL_LIFETIME_MS: f64 = 7.0e4; // ms of wall time
pub const MILLIS_PER_SECOND: f64 = 1000.0;
