use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::random_variable::Continuous;
use crate::utils::errors::SimulationError;

/// A user supplied, zero-argument delay function.  It is owned by a single
/// transition and called exactly once per firing.
pub struct DelayFn(Box<dyn FnMut() -> f64 + Send>);

impl fmt::Debug for DelayFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DelayFn")
    }
}

/// The delay source of a transition: how long an in-flight firing takes to
/// complete, sampled independently for every firing.
///
/// `Custom` delays cannot be serialized.  Nets built with them can still be
/// run, but not exported as configuration.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Delay {
    /// The firing completes in the same instant it started.
    Immediate,
    Constant {
        value: f64,
    },
    Random(Continuous),
    #[serde(skip)]
    Custom(DelayFn),
}

impl Default for Delay {
    fn default() -> Self {
        Delay::Immediate
    }
}

impl From<Continuous> for Delay {
    fn from(variable: Continuous) -> Self {
        Delay::Random(variable)
    }
}

impl Delay {
    pub fn constant(value: f64) -> Self {
        Delay::Constant { value }
    }

    pub fn custom<F>(function: F) -> Self
    where
        F: FnMut() -> f64 + Send + 'static,
    {
        Delay::Custom(DelayFn(Box::new(function)))
    }

    /// Draw one delay.  The value is returned as sampled; validation against
    /// the non-negativity contract is left to the caller, which knows the
    /// transition the sample belongs to.
    pub fn sample<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<f64, SimulationError> {
        match self {
            Delay::Immediate => Ok(0.0),
            Delay::Constant { value } => Ok(*value),
            Delay::Random(variable) => variable.random_variate(rng),
            Delay::Custom(DelayFn(function)) => Ok(function()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_pcg::Pcg64Mcg;

    #[test]
    fn custom_delay_is_called_once_per_sample() {
        let mut calls = 0.0;
        let mut delay = Delay::custom(move || {
            calls += 1.0;
            calls
        });
        let mut rng = Pcg64Mcg::new(42);
        assert_eq!(delay.sample(&mut rng).unwrap(), 1.0);
        assert_eq!(delay.sample(&mut rng).unwrap(), 2.0);
    }

    #[test]
    fn delays_read_from_json() {
        let delays: Vec<Delay> = serde_json::from_str(
            r#"["immediate", {"constant": {"value": 60.0}}, {"random": {"exp": {"lambda": 2.0}}}]"#,
        )
        .unwrap();
        assert!(matches!(delays[0], Delay::Immediate));
        assert!(matches!(delays[1], Delay::Constant { value } if value == 60.0));
        assert!(matches!(
            delays[2],
            Delay::Random(Continuous::Exp { lambda }) if lambda == 2.0
        ));
    }

    #[test]
    fn custom_delay_does_not_serialize() {
        assert!(serde_json::to_string(&Delay::custom(|| 1.0)).is_err());
    }
}
