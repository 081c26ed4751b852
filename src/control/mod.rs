pub mod clock;
pub mod planet;
pub mod render;
pub mod satellite;
pub mod scheduler;
pub mod simulation;
