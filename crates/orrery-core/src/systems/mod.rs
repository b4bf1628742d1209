pub mod quiz;
pub mod rng;
