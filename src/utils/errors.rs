use thiserror::Error;

/// `SimulationError` enumerates all possible errors returned by petrisim
#[derive(Error, Debug)]
pub enum SimulationError {
    /// Represents a net where nothing is enabled and nothing is in flight,
    /// before the requested horizon was reached
    #[error("The net deadlocked at time {time}: no transition is enabled and no firing is pending")]
    Deadlock { time: f64 },

    /// Represents a delay source returning a negative, NaN, or infinite sample
    #[error("Transition {transition} sampled an invalid delay of {delay}")]
    InvalidDelay { transition: String, delay: f64 },

    /// Represents a conflict set where every candidate has a probability of zero
    #[error("Every enabled transition of the highest priority has zero probability at time {time}")]
    ZeroWeightConflict { time: f64 },

    /// Represents a broken engine invariant, such as an empty conflict set
    /// or a completion removed twice
    #[error("An internal consistency fault occured: {0}")]
    InternalConsistency(String),

    /// Represents an invalid net configuration encountered during construction
    #[error("An invalid net configuration was encountered: {0}")]
    InvalidModelConfiguration(String),

    /// Represents a reference to a place that does not exist
    #[error("Place {0} cannot be found in the net")]
    PlaceNotFound(String),

    /// Represents a reference to a transition that does not exist
    #[error("Transition {0} cannot be found in the net")]
    TransitionNotFound(String),

    /// Represents a non-positive or non-finite run duration or snapshot interval
    #[error("Simulation durations and snapshot intervals must be finite, and intervals positive")]
    InvalidInterval,

    /// Represents an internal logic error, where prerequisite calculations were not executed
    #[error("An internal logic error occured, where prerequisite calculations were not executed")]
    PrerequisiteCalcError,

    /// Represents a failed conversion to num-traits Float
    #[error("Failed to convert to a Float value")]
    FloatConvError,

    /// Represents a confidence level without a tabulated t-score
    #[error("No t-score is available for a significance level of {0}")]
    UnsupportedConfidenceLevel(f64),

    /// Transparent serde_json errors
    #[error(transparent)]
    JSONError(#[from] serde_json::error::Error),

    /// Transparent serde_yaml errors
    #[error(transparent)]
    YAMLError(#[from] serde_yaml::Error),

    /// Transparent csv errors
    #[error(transparent)]
    CSVError(#[from] csv::Error),

    /// Transparent I/O errors
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// Transparent Beta distribution errors
    #[error(transparent)]
    BetaError(#[from] rand_distr::BetaError),

    /// Transparent Exponential distribution errors
    #[error(transparent)]
    ExpError(#[from] rand_distr::ExpError),

    /// Transparent Gamma distribution errors
    #[error(transparent)]
    GammaError(#[from] rand_distr::GammaError),

    /// Transparent Normal distribution errors
    #[error(transparent)]
    NormalError(#[from] rand_distr::NormalError),

    /// Transparent Triangular distribution errors
    #[error(transparent)]
    TriangularError(#[from] rand_distr::TriangularError),

    /// Transparent Weibull distribution errors
    #[error(transparent)]
    WeibullError(#[from] rand_distr::WeibullError),

    /// Transparent Weighted Index distribution errors
    #[error(transparent)]
    WeightedError(#[from] rand_distr::WeightedError),
}
