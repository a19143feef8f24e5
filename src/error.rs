use std::{
    error::Error,
    fmt::{self, Display},
};

/// The result type used in the entire perceptron crate.
pub type Result<T> = std::result::Result<T, PerceptronErr>;

/// The perceptron crate's error type.
#[derive(Debug, Clone, PartialEq)]
pub enum PerceptronErr {
    InvalidLearningRate { got: f64 },
    InvalidEpochLimit { got: usize },
    InvalidSigma { got: f64 },
    InvalidInterval,
    IndexOutOfBounds { index: usize, len: usize },
    UnknownMode { got: String },
}

impl Display for PerceptronErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PerceptronErr::InvalidLearningRate { got } => {
                write!(f, "the learning rate must be a positive finite number, got {got}")
            }
            PerceptronErr::InvalidEpochLimit { got } => {
                write!(f, "the epoch limit must be greater than zero, got {got}")
            }
            PerceptronErr::InvalidSigma { got } => write!(
                f,
                "the standard deviation must be a non-negative finite number, got {got}"
            ),
            PerceptronErr::InvalidInterval => {
                write!(f, "the run interval must be greater than zero")
            }
            PerceptronErr::IndexOutOfBounds { index, len } => write!(
                f,
                "point index {index} is out of bounds for a dataset of {len} points"
            ),
            PerceptronErr::UnknownMode { got } => write!(
                f,
                "unknown dataset mode '{got}', expected one of: separable, xor, custom"
            ),
        }
    }
}

impl Error for PerceptronErr {}
