//! The input modeling module provides a foundation for configurable
//! transition delays, whether that is deterministic or stochastic.  The
//! module includes a set of continuous random variable distributions, the
//! `Delay` source attached to every transition, and a structure around
//! random number generation.

pub mod delay;
pub mod dynamic_rng;
pub mod random_variable;

pub use delay::Delay;
pub use dynamic_rng::{dyn_rng, seeded_rng, DynRng, SimulationRng};
pub use random_variable::Continuous as ContinuousRandomVariable;
