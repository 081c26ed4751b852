//! Wall-clock to simulated-time conversion.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::constants::{DEFAULT_TIME_SCALE, MILLIS_PER_SECOND};
use crate::errors::SimulationError;

/// Shared time multiplier. Clones refer to the same value, so a UI thread can
/// hold one and write to it while the frame loop reads another.
#[derive(Debug, Clone)]
pub struct TimeScale {
    bits: Arc<AtomicU64>,
}

impl TimeScale {
    pub fn new(scale: f64) -> Result<Self, SimulationError> {
        let time_scale = TimeScale {
            bits: Arc::new(AtomicU64::new(DEFAULT_TIME_SCALE.to_bits())),
        };
        time_scale.set(scale)?;
        Ok(time_scale)
    }

    pub fn get(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Relaxed))
    }

    /// 0 pauses the simulation.
    pub fn set(&self, scale: f64) -> Result<(), SimulationError> {
        if !scale.is_finite() || scale < 0.0 {
            return Err(SimulationError::InvalidConfiguration(format!(
                "time scale must be non-negative and finite, got {}",
                scale
            )));
        }
        self.bits.store(scale.to_bits(), Ordering::Relaxed);
        Ok(())
    }
}

impl Default for TimeScale {
    fn default() -> Self {
        TimeScale {
            bits: Arc::new(AtomicU64::new(DEFAULT_TIME_SCALE.to_bits())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SimulationClock {
    last_tick_ms: f64,
    time_scale: TimeScale,
}

impl SimulationClock {
    pub fn new(start_ms: f64) -> Self {
        SimulationClock {
            last_tick_ms: start_ms,
            time_scale: TimeScale::default(),
        }
    }

    pub fn with_time_scale(start_ms: f64, time_scale: TimeScale) -> Self {
        SimulationClock {
            last_tick_ms: start_ms,
            time_scale,
        }
    }

    /// Scaled seconds elapsed since the previous call.
    ///
    /// The result is not validated; a clock that went backwards yields a
    /// negative delta, which the integrator refuses. `now_ms` always becomes
    /// the new reference point.
    pub fn tick(&mut self, now_ms: f64) -> f64 {
        let delta_time =
            (now_ms - self.last_tick_ms) * self.time_scale.get() / MILLIS_PER_SECOND;
        self.last_tick_ms = now_ms;
        delta_time
    }

    pub fn last_tick_ms(&self) -> f64 {
        self.last_tick_ms
    }

    pub fn time_scale(&self) -> &TimeScale {
        &self.time_scale
    }
}
