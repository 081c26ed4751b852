//! Semi-implicit (symplectic) Euler integration.
//!
//! Velocity is advanced from the accelerations first, and the displacement is
//! taken from the updated velocity. Swapping the two steps turns this into
//! explicit Euler, which spirals orbits outward.

use crate::control::satellite::Satellite;
use crate::errors::SimulationError;
use crate::utils::vector3d::Vector3D;

pub fn validate_timestep(delta_time: f64) -> Result<f64, SimulationError> {
    if delta_time.is_finite() && delta_time >= 0.0 {
        Ok(delta_time)
    } else {
        Err(SimulationError::InvalidTimestep(delta_time))
    }
}

/// Advances one satellite and returns the displacement applied. A result
/// that is no longer finite is refused and the satellite is left as it was.
pub fn step(
    satellite: &mut Satellite,
    acceleration: Vector3D,
    delta_time: f64,
) -> Result<Vector3D, SimulationError> {
    let velocity = satellite.velocity + acceleration * delta_time;
    let displacement = velocity * delta_time;
    let position = satellite.position + displacement;
    if !velocity.is_finite() || !position.is_finite() {
        return Err(SimulationError::DegenerateGeometry(format!(
            "satellite {:?} would leave finite space",
            satellite.id
        )));
    }
    satellite.velocity = velocity;
    satellite.position = position;
    Ok(displacement)
}

/// Advances every live satellite by `delta_time` seconds.
///
/// `gravity[i]` and `drag[i]` belong to `satellites[i]`. A rejected timestep
/// leaves every satellite untouched; a satellite whose step would produce a
/// non-finite state is skipped. Returns how many satellites moved.
pub fn integrate(
    satellites: &mut [Satellite],
    gravity: &[Vector3D],
    drag: &[Vector3D],
    delta_time: f64,
) -> Result<usize, SimulationError> {
    let delta_time = validate_timestep(delta_time)?;
    if gravity.len() != satellites.len() || drag.len() != satellites.len() {
        return Err(SimulationError::InvalidConfiguration(format!(
            "{} satellites but {} gravity and {} drag samples",
            satellites.len(),
            gravity.len(),
            drag.len()
        )));
    }

    let mut moved = 0;
    for ((satellite, g), d) in satellites.iter_mut().zip(gravity).zip(drag) {
        if !satellite.is_alive() {
            continue;
        }
        if step(satellite, *g + *d, delta_time).is_ok() {
            moved += 1;
        }
    }
    Ok(moved)
}
