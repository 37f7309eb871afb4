//! The utilities module provides general capabilities, that may span the
//! input modeling, models, output analysis, and simulator modules.  The
//! utilities are centered around debugging and the weighted random choice
//! used for conflict resolution.

pub mod errors;

use rand::distributions::Distribution;
use rand::Rng;
use rand_distr::WeightedIndex;

use errors::SimulationError;

/// Select one item from a set of `(weight, item)` pairs, with probability
/// proportional to its weight.  Weights are relative and need not sum to 1.
/// A single candidate with a positive weight is returned directly, without
/// drawing from the random number generator.  A zero-weight candidate is
/// never chosen, alone or not.
pub fn weighted_choice<'a, T, R: Rng + ?Sized>(
    candidates: &'a [(f64, T)],
    rng: &mut R,
) -> Result<&'a T, SimulationError> {
    match candidates {
        [] => Err(SimulationError::InternalConsistency(String::from(
            "weighted choice over an empty set",
        ))),
        [(weight, only)] if *weight > 0.0 => Ok(only),
        _ => {
            let index =
                WeightedIndex::new(candidates.iter().map(|(weight, _)| *weight))?.sample(rng);
            Ok(&candidates[index].1)
        }
    }
}

/// When the `console_error_panic_hook` feature is enabled, we can call the
/// `set_panic_hook` function at least once during initialization, and then
/// we will get better error messages if our code ever panics.
///
/// For more details see
/// <https://github.com/rustwasm/console_error_panic_hook#readme>
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}
