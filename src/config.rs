//! Tunable physical parameters for one simulation session.
//!
//! Every value defaults to the matching entry in [`crate::constants`]; a JSON
//! file only needs to list the fields it overrides.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{
    AIR_DENSITY, DRAG_CEILING_ALTITUDE, EARTH_MASS, EARTH_RADIUS, EARTH_ROTATION_RATE,
    GRAVITATIONAL_CONSTANT, PROXIMITY_THRESHOLD_SQ, SATELLITE_CROSS_SECTIONAL_AREA,
    SATELLITE_DRAG_COEFFICIENT, TRAIL_LIFETIME_MS,
};
use crate::errors::SimulationError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravitational_constant: f64,
    pub planet_mass: f64,
    pub planet_radius: f64,
    /// Radians per simulated second.
    pub planet_rotation_rate: f64,
    pub air_density: f64,
    pub drag_coefficient: f64,
    pub cross_section_area: f64,
    /// Altitude in meters at and above which drag is zero.
    pub drag_ceiling_altitude: f64,
    /// Squared separation in m² under which two satellites collide.
    pub proximity_threshold_sq: f64,
    /// Wall-clock lifetime of a trail marker, in milliseconds.
    pub trail_lifetime_ms: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        PhysicsConfig {
            gravitational_constant: GRAVITATIONAL_CONSTANT,
            planet_mass: EARTH_MASS,
            planet_radius: EARTH_RADIUS,
            planet_rotation_rate: EARTH_ROTATION_RATE,
            air_density: AIR_DENSITY,
            drag_coefficient: SATELLITE_DRAG_COEFFICIENT,
            cross_section_area: SATELLITE_CROSS_SECTIONAL_AREA,
            drag_ceiling_altitude: DRAG_CEILING_ALTITUDE,
            proximity_threshold_sq: PROXIMITY_THRESHOLD_SQ,
            trail_lifetime_ms: TRAIL_LIFETIME_MS,
        }
    }
}

impl PhysicsConfig {
    pub fn from_json_str(json: &str) -> Result<Self, SimulationError> {
        let config: PhysicsConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SimulationError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> Result<(), SimulationError> {
        let strictly_positive = [
            ("gravitational_constant", self.gravitational_constant),
            ("planet_mass", self.planet_mass),
            ("planet_radius", self.planet_radius),
            ("drag_ceiling_altitude", self.drag_ceiling_altitude),
            ("proximity_threshold_sq", self.proximity_threshold_sq),
            ("trail_lifetime_ms", self.trail_lifetime_ms),
        ];
        for (name, value) in strictly_positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(SimulationError::InvalidConfiguration(format!(
                    "{} must be positive and finite, got {}",
                    name, value
                )));
            }
        }

        let non_negative = [
            ("planet_rotation_rate", self.planet_rotation_rate),
            ("air_density", self.air_density),
            ("drag_coefficient", self.drag_coefficient),
            ("cross_section_area", self.cross_section_area),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(SimulationError::InvalidConfiguration(format!(
                    "{} must be non-negative and finite, got {}",
                    name, value
                )));
            }
        }

        Ok(())
    }
}
