use rand::{RngCore, SeedableRng};

pub trait SimulationRng: std::fmt::Debug + RngCore + Send {}
impl<T: std::fmt::Debug + RngCore + Send> SimulationRng for T {}
pub type DynRng = Box<dyn SimulationRng>;

pub(crate) fn default_rng() -> DynRng {
    Box::new(rand_pcg::Pcg64Mcg::new(42))
}

pub fn dyn_rng<Rng: SimulationRng + 'static>(rng: Rng) -> DynRng {
    Box::new(rng)
}

/// A PCG generator seeded from a single integer, for reproducible
/// replications.
pub fn seeded_rng(seed: u64) -> DynRng {
    Box::new(rand_pcg::Pcg64Mcg::seed_from_u64(seed))
}
