//! The simulation context: sole owner of the live satellite list.
//!
//! One call to [`Simulation::tick`] runs the whole frame pipeline:
//! clock → forces → integration → collision resolution → redraw.

use tracing::{debug, info, warn};

use crate::config::PhysicsConfig;
use crate::control::clock::{SimulationClock, TimeScale};
use crate::control::planet::CelestialBody;
use crate::control::render::{RenderBackend, VectorSet};
use crate::control::satellite::{ForceSample, RemovalCause, Satellite, SatelliteId};
use crate::control::scheduler::FrameScheduler;
use crate::errors::SimulationError;
use crate::telemetry_system::telemetry::{FrameSnapshot, SatelliteSnapshot, Telemetry};
use crate::telemetry_system::trail::{TrailBuffer, TrailMarker};
use crate::trajectory_system::collision::CollisionResolver;
use crate::trajectory_system::forces::ForceModel;
use crate::trajectory_system::integrator;
use crate::utils::vector3d::Vector3D;

pub struct Simulation {
    config: PhysicsConfig,
    planet: CelestialBody,
    force_model: ForceModel,
    resolver: CollisionResolver,
    clock: SimulationClock,
    satellites: Vec<Satellite>,
    trail: TrailBuffer,
    telemetry: Telemetry,
    next_id: u64,
    frame: u64,
    simulated_time: f64,
}

impl Simulation {
    pub fn new(config: PhysicsConfig, start_ms: f64) -> Result<Self, SimulationError> {
        Self::with_time_scale(config, start_ms, TimeScale::default())
    }

    /// Builds a simulation whose clock reads `time_scale`, typically a clone
    /// of a handle the UI already owns.
    pub fn with_time_scale(
        config: PhysicsConfig,
        start_ms: f64,
        time_scale: TimeScale,
    ) -> Result<Self, SimulationError> {
        config.validate()?;
        if !start_ms.is_finite() {
            return Err(SimulationError::InvalidConfiguration(format!(
                "start timestamp must be finite, got {}",
                start_ms
            )));
        }

        Ok(Simulation {
            planet: CelestialBody::from_config(&config),
            force_model: ForceModel::from_config(&config),
            resolver: CollisionResolver::from_config(&config),
            clock: SimulationClock::with_time_scale(start_ms, time_scale),
            satellites: Vec::new(),
            trail: TrailBuffer::new(config.trail_lifetime_ms),
            telemetry: Telemetry::new(),
            next_id: 0,
            frame: 0,
            simulated_time: 0.0,
            config,
        })
    }

    /// Adds a satellite moving at `speed` along `direction`. Its visual handle
    /// is created on the next tick.
    pub fn add_satellite(
        &mut self,
        position: Vector3D,
        mass: f64,
        speed: f64,
        direction: Vector3D,
    ) -> Result<SatelliteId, SimulationError> {
        let id = SatelliteId(self.next_id + 1);
        let satellite = Satellite::new(id, position, mass, speed, direction, &self.planet)?;
        self.next_id = id.0;

        info!(
            "added satellite {} at height {:.0} m, speed {:.1} m/s",
            id.0,
            satellite.height,
            satellite.speed()
        );
        self.satellites.push(satellite);
        self.telemetry.record_addition();
        Ok(id)
    }

    /// Removes the satellite at `index` in the live list and releases its
    /// visuals. An invalid index changes nothing.
    pub fn remove_satellite<B: RenderBackend + ?Sized>(
        &mut self,
        index: usize,
        backend: &mut B,
    ) -> Result<SatelliteId, SimulationError> {
        if index >= self.satellites.len() {
            return Err(SimulationError::OutOfRange {
                index,
                len: self.satellites.len(),
            });
        }

        let mut satellite = self.satellites.remove(index);
        let id = satellite.id;
        satellite.kill(RemovalCause::External);
        self.retire(satellite, backend);
        Ok(id)
    }

    pub fn set_time_scale(&self, scale: f64) -> Result<(), SimulationError> {
        self.clock.time_scale().set(scale)
    }

    /// A handle sharing this simulation's time multiplier.
    pub fn time_scale(&self) -> TimeScale {
        self.clock.time_scale().clone()
    }

    pub fn tick<B: RenderBackend + ?Sized>(
        &mut self,
        now_ms: f64,
        backend: &mut B,
    ) -> FrameSnapshot {
        self.frame += 1;
        backend.begin_frame();
        let delta_time = self.clock.tick(now_ms);

        for satellite in self.satellites.iter_mut().filter(|s| s.handle.is_none()) {
            let handle = backend.create_visual_handle(satellite);
            satellite.handle = Some(handle);
        }

        let applied = match integrator::validate_timestep(delta_time) {
            Ok(delta_time) => {
                self.advance(delta_time);
                delta_time
            }
            Err(e) => {
                warn!("frame {}: {}; integration skipped", self.frame, e);
                self.telemetry.record_skipped_tick();
                0.0
            }
        };

        for satellite in self.resolver.resolve(&mut self.satellites, &self.planet) {
            self.retire(satellite, backend);
        }

        self.planet.rotate(applied);
        backend.set_planet_rotation(self.planet.rotation_angle());
        self.redraw(now_ms, backend);
        self.trail.prune(now_ms);

        let snapshot = FrameSnapshot {
            frame: self.frame,
            timestamp_ms: now_ms,
            delta_time: applied,
            simulated_time: self.simulated_time,
            planet_rotation: self.planet.rotation_angle(),
            satellites: self.snapshot(),
            trail_markers: self.trail.len(),
        };
        self.telemetry.collect_frame(&snapshot);
        debug!(
            "frame {}: dt {:.4} s, {} live satellites",
            self.frame,
            applied,
            snapshot.satellites.len()
        );
        snapshot
    }

    /// Ticks once per scheduler request until the scheduler stops. Returns
    /// the number of ticks run.
    pub fn run<S, B>(&mut self, scheduler: &mut S, backend: &mut B) -> u64
    where
        S: FrameScheduler + ?Sized,
        B: RenderBackend + ?Sized,
    {
        let mut ticks = 0;
        while let Some(request) = scheduler.request_next_tick() {
            self.tick(request.timestamp_ms, backend);
            ticks += 1;
        }
        info!("frame loop stopped after {} ticks", ticks);
        ticks
    }

    fn advance(&mut self, delta_time: f64) {
        let mut gravity = Vec::with_capacity(self.satellites.len());
        let mut drag = Vec::with_capacity(self.satellites.len());
        for satellite in &mut self.satellites {
            satellite.refresh_height(&self.planet);
            satellite.forces = match self.force_model.sample(satellite, &self.planet) {
                Ok(forces) => forces,
                Err(e) => {
                    warn!("satellite {} coasts this tick: {}", satellite.id.0, e);
                    self.telemetry.record_degenerate_sample();
                    ForceSample::default()
                }
            };
            gravity.push(satellite.forces.gravity);
            drag.push(satellite.forces.drag);
        }

        match integrator::integrate(&mut self.satellites, &gravity, &drag, delta_time) {
            Ok(moved) if moved < self.satellites.len() => {
                warn!(
                    "{} of {} satellites refused a non-finite step",
                    self.satellites.len() - moved,
                    self.satellites.len()
                );
            }
            Ok(_) => {}
            Err(e) => warn!("integration failed: {}", e),
        }

        for satellite in &mut self.satellites {
            satellite.refresh_height(&self.planet);
        }
        self.simulated_time += delta_time;
    }

    fn redraw<B: RenderBackend + ?Sized>(&mut self, now_ms: f64, backend: &mut B) {
        for satellite in &self.satellites {
            let direction = satellite.velocity.normalize();
            if let Some(handle) = satellite.handle {
                backend.set_handle_transform(handle, satellite.position, direction);
                backend.set_handle_vectors(
                    handle,
                    &VectorSet {
                        velocity_direction: direction,
                        gravity: satellite.forces.gravity,
                        drag: satellite.forces.drag,
                    },
                );
            }
            self.trail.push(TrailMarker {
                satellite: satellite.id,
                position: satellite.position,
                direction,
                created_at_ms: now_ms,
            });
        }
    }

    fn retire<B: RenderBackend + ?Sized>(&mut self, satellite: Satellite, backend: &mut B) {
        if let Some(handle) = satellite.handle {
            backend.release_handle(handle);
        }
        info!(
            "removed satellite {} ({:?}) at height {:.0} m",
            satellite.id.0,
            satellite.state(),
            satellite.height
        );
        self.telemetry.record_removal(self.simulated_time, &satellite);
    }

    pub fn snapshot(&self) -> Vec<SatelliteSnapshot> {
        self.satellites.iter().map(SatelliteSnapshot::from).collect()
    }

    pub fn satellites(&self) -> &[Satellite] {
        &self.satellites
    }

    pub fn live_count(&self) -> usize {
        self.satellites.len()
    }

    pub fn planet(&self) -> &CelestialBody {
        &self.planet
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    pub fn telemetry(&self) -> &Telemetry {
        &self.telemetry
    }

    pub fn trail(&self) -> &TrailBuffer {
        &self.trail
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn simulated_time(&self) -> f64 {
        self.simulated_time
    }
}
