pub mod collision;
pub mod forces;
pub mod integrator;

#[cfg(test)]
mod proptest_physics;
