//! Property-based tests for the force model, integrator and resolver.

use proptest::prelude::*;

use crate::config::PhysicsConfig;
use crate::control::planet::CelestialBody;
use crate::control::satellite::{Satellite, SatelliteId};
use crate::trajectory_system::collision::CollisionResolver;
use crate::trajectory_system::forces::ForceModel;
use crate::trajectory_system::integrator;
use crate::utils::vector3d::Vector3D;

fn earth() -> CelestialBody {
    CelestialBody::from_config(&PhysicsConfig::default())
}

fn satellite(id: u64, position: Vector3D, velocity: Vector3D, mass: f64) -> Satellite {
    let mut satellite =
        Satellite::new(SatelliteId(id), position, mass, 0.0, Vector3D::ZERO, &earth())
            .expect("valid satellite");
    satellite.velocity = velocity;
    satellite
}

fn unit_vector() -> impl Strategy<Value = Vector3D> {
    (-1.0f64..1.0, 0.0f64..std::f64::consts::TAU).prop_map(|(z, phi)| {
        let ring = (1.0 - z * z).sqrt();
        Vector3D::new(ring * phi.cos(), ring * phi.sin(), z)
    })
}

fn specific_energy(body: &CelestialBody, position: Vector3D, velocity: Vector3D) -> f64 {
    velocity.magnitude_squared() / 2.0 - body.gm() / position.magnitude()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Gravity magnitude is GM/r² whatever the satellite's mass.
    #[test]
    fn prop_gravity_magnitude_independent_of_mass(
        direction in unit_vector(),
        distance in 1.0e3f64..1.0e9,
        mass in 1.0e-300f64..1.0e300,
    ) {
        let body = earth();
        let position = direction * distance;
        let sat = satellite(1, position, Vector3D::ZERO, mass);

        let gravity = ForceModel::from_config(&PhysicsConfig::default())
            .compute_gravity(&sat, &body)
            .expect("non-degenerate");

        let r_squared = position.magnitude_squared();
        let expected = body.gm() / r_squared;
        prop_assert!(((gravity.magnitude() - expected) / expected).abs() < 1e-12);
        // Points at the planet
        prop_assert!(gravity.dot(&position) < 0.0);
    }

    /// Drag is exactly zero at or above the ceiling altitude.
    #[test]
    fn prop_drag_zero_above_ceiling(
        direction in unit_vector(),
        extra_altitude in 0.0f64..1.0e8,
        velocity in unit_vector(),
        speed in 0.0f64..2.0e4,
    ) {
        let body = earth();
        let model = ForceModel::from_config(&PhysicsConfig::default());
        let altitude = model.drag_ceiling_altitude + 1.0 + extra_altitude;
        let sat = satellite(1, direction * (body.radius + altitude), velocity * speed, 100.0);

        prop_assert_eq!(model.compute_drag(&sat, &body), Vector3D::ZERO);
    }

    /// Drag below the ceiling never speeds a satellite up.
    #[test]
    fn prop_drag_opposes_motion(
        direction in unit_vector(),
        altitude in 0.0f64..5.9e5,
        velocity in unit_vector(),
        speed in 1.0f64..2.0e4,
    ) {
        let body = earth();
        let model = ForceModel::from_config(&PhysicsConfig::default());
        let sat = satellite(1, direction * (body.radius + altitude), velocity * speed, 100.0);

        let drag = model.compute_drag(&sat, &body);

        prop_assert!(drag.dot(&sat.velocity) < 0.0);
    }

    /// The displacement is taken from the updated velocity.
    #[test]
    fn prop_step_is_semi_implicit(
        vx in -1.0e4f64..1.0e4,
        vy in -1.0e4f64..1.0e4,
        ax in -20.0f64..20.0,
        ay in -20.0f64..20.0,
        dt in 0.0f64..10.0,
    ) {
        let start = Vector3D::new(7.0e6, 0.0, 0.0);
        let mut sat = satellite(1, start, Vector3D::new(vx, vy, 0.0), 10.0);
        let acceleration = Vector3D::new(ax, ay, 0.0);

        let displacement = integrator::step(&mut sat, acceleration, dt).expect("finite");

        prop_assert_eq!(sat.velocity, Vector3D::new(vx, vy, 0.0) + acceleration * dt);
        prop_assert_eq!(displacement, sat.velocity * dt);
    }

    /// Negative timesteps never touch the state.
    #[test]
    fn prop_negative_timestep_rejected(dt in -1.0e6f64..-1.0e-12) {
        let start = Vector3D::new(7.0e6, 1.0, -1.0);
        let mut satellites = vec![satellite(1, start, Vector3D::new(0.0, 7.5e3, 0.0), 10.0)];

        let result = integrator::integrate(
            &mut satellites,
            &[Vector3D::new(-8.0, 0.0, 0.0)],
            &[Vector3D::ZERO],
            dt,
        );

        prop_assert!(result.is_err());
        prop_assert_eq!(satellites[0].position, start);
        prop_assert_eq!(satellites[0].velocity, Vector3D::new(0.0, 7.5e3, 0.0));
    }

    /// Symplectic Euler keeps the energy of a drag-free circular orbit bounded.
    #[test]
    fn prop_circular_orbit_energy_bounded(altitude in 1.0e6f64..3.0e7) {
        let body = earth();
        let model = ForceModel::from_config(&PhysicsConfig::default());
        let r = body.radius + altitude;
        let speed = body.circular_velocity(altitude);
        let velocity = Vector3D::new(0.0, 0.0, speed);
        let mut sat = satellite(1, Vector3D::new(r, 0.0, 0.0), velocity, 500.0);
        let initial_energy = specific_energy(&body, sat.position, sat.velocity);

        let period = std::f64::consts::TAU * r / speed;
        let steps = 5_000;
        let dt = period / steps as f64;
        for _ in 0..steps {
            let forces = model.sample(&sat, &body).expect("non-degenerate");
            integrator::step(&mut sat, forces.total(), dt).expect("finite");
        }

        let final_energy = specific_energy(&body, sat.position, sat.velocity);
        let drift = ((final_energy - initial_energy) / initial_energy).abs();
        prop_assert!(drift < 0.01, "energy drift {:.4}%", drift * 100.0);
        prop_assert!((sat.position.magnitude() - r).abs() / r < 0.02);
    }

    /// A second resolution pass over a resolved set removes nothing.
    #[test]
    fn prop_resolution_idempotent(
        positions in prop::collection::vec((unit_vector(), 6.4e6f64..2.0e7), 0..12),
    ) {
        let body = earth();
        let resolver = CollisionResolver::from_config(&PhysicsConfig::default());
        let mut satellites: Vec<Satellite> = positions
            .into_iter()
            .enumerate()
            .map(|(i, (direction, r))| satellite(i as u64 + 1, direction * r, Vector3D::ZERO, 10.0))
            .collect();
        let total = satellites.len();

        let removed = resolver.resolve(&mut satellites, &body);

        prop_assert_eq!(removed.len() + satellites.len(), total);
        prop_assert!(resolver.resolve(&mut satellites, &body).is_empty());
        prop_assert!(resolver.proximity_pairs(&satellites).is_empty());
    }
}
