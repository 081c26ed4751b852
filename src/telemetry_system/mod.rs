pub mod telemetry;
pub mod trail;
