//! Random number generation for Monte Carlo path sampling.

pub mod prng;

pub use prng::{NormalStream, PseudoRandomSource, RandomSource};
