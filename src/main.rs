use std::f64::consts::TAU;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use satellite_simulation::*;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "satellite-sim", about = "Headless satellite orbit simulation")]
struct Args {
    /// JSON file overriding physical parameters
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of random satellites to launch
    #[arg(long, default_value_t = 8)]
    satellites: usize,

    /// Frames to run before stopping
    #[arg(long, default_value_t = 3600)]
    frames: u64,

    #[arg(long, default_value_t = FRAME_INTERVAL_MS)]
    frame_interval_ms: f64,

    /// Simulated seconds per wall-clock second
    #[arg(long, default_value_t = 60.0)]
    time_scale: f64,

    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Sleep between frames instead of feeding synthetic timestamps
    #[arg(long)]
    realtime: bool,

    /// Frames before a satellite's model finishes loading
    #[arg(long, default_value_t = 30)]
    asset_latency_frames: u32,
}

struct Launch {
    position: Vector3D,
    mass: f64,
    speed: f64,
    direction: Vector3D,
}

fn random_launch(rng: &mut StdRng, planet: &CelestialBody) -> Launch {
    let altitude = rng.gen_range(300_000.0..2_000_000.0);

    // Uniform point on the sphere
    let z: f64 = rng.gen_range(-1.0..1.0);
    let phi = rng.gen_range(0.0..TAU);
    let ring = (1.0 - z * z).sqrt();
    let radial = Vector3D::new(ring * phi.cos(), ring * phi.sin(), z);

    let helper = Vector3D::new(
        rng.gen_range(-1.0..1.0),
        rng.gen_range(-1.0..1.0),
        rng.gen_range(-1.0..1.0),
    );
    let direction = radial
        .cross(&helper)
        .try_normalize()
        .unwrap_or_else(|| radial.cross(&Vector3D::new(0.0, 0.0, 1.0)).normalize());

    Launch {
        position: planet.position + radial * (planet.radius + altitude),
        mass: rng.gen_range(100.0..5_000.0),
        speed: planet.circular_velocity(altitude) * rng.gen_range(0.9..1.05),
        direction,
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    if !args.frame_interval_ms.is_finite() || args.frame_interval_ms <= 0.0 {
        return Err(SimulationError::InvalidConfiguration(format!(
            "frame interval must be positive, got {} ms",
            args.frame_interval_ms
        ))
        .into());
    }

    let config = match &args.config {
        Some(path) => PhysicsConfig::load(path)?,
        None => PhysicsConfig::default(),
    };

    let time_source = MonotonicTimeSource::new();
    let start_ms = if args.realtime { time_source.now() } else { 0.0 };
    let mut simulation = Simulation::new(config, start_ms)?;
    simulation.set_time_scale(args.time_scale)?;

    let mut rng = StdRng::seed_from_u64(args.seed);
    for _ in 0..args.satellites {
        let launch = random_launch(&mut rng, simulation.planet());
        if let Err(e) =
            simulation.add_satellite(launch.position, launch.mass, launch.speed, launch.direction)
        {
            warn!("Skipping satellite: {}", e);
        }
    }

    let mut backend = RecordingBackend::new(args.asset_latency_frames);
    let ticks = if args.realtime {
        let mut scheduler = RealtimeScheduler::new(
            time_source,
            Duration::from_secs_f64(args.frame_interval_ms / MILLIS_PER_SECOND),
            Some(args.frames),
        );
        simulation.run(&mut scheduler, &mut backend)
    } else {
        let mut scheduler =
            SyntheticScheduler::fixed_rate(start_ms, args.frame_interval_ms, args.frames);
        simulation.run(&mut scheduler, &mut backend)
    };

    info!(
        "Ran {} frames, {} satellites still in orbit, {} trail markers",
        ticks,
        simulation.live_count(),
        simulation.trail().len()
    );
    for satellite in simulation.snapshot() {
        info!("{}", Telemetry::describe_satellite(&satellite));
    }
    simulation.telemetry().log_summary();

    Ok(())
}
