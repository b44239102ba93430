pub mod rng;

pub use rng::{RngStream, SeedSequence, rng_from_seed};
