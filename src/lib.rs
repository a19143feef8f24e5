pub mod boundary;
pub mod dataset;
pub mod error;
pub mod model;
pub mod session;
pub mod settings;
pub mod training;

pub use dataset::{Dataset, Field, Label, Mode, Point};
pub use error::{PerceptronErr, Result};
pub use model::Perceptron;
pub use session::{Session, Snapshot, Status};
pub use training::{Driver, EpochReport, RunOutcome, StopReason, Trainer, TrainerConfig};
