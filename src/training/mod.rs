mod config;
mod driver;
mod trainer;

pub use config::{DEFAULT_EPOCH_LIMIT, DEFAULT_LEARNING_RATE, TrainerConfig};
pub use driver::Driver;
pub use trainer::{EpochReport, RunOutcome, StopReason, Trainer};
