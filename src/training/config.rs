use std::num::NonZeroUsize;

use log::warn;

use crate::error::{PerceptronErr, Result};

pub const DEFAULT_LEARNING_RATE: f64 = 0.1;
pub const DEFAULT_EPOCH_LIMIT: NonZeroUsize = NonZeroUsize::new(10).unwrap();

/// The hyperparameters of a training run.
///
/// Every setter validates its input and keeps the previous value when it's rejected,
/// so a `TrainerConfig` is always valid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainerConfig {
    learning_rate: f64,
    epoch_limit: NonZeroUsize,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            learning_rate: DEFAULT_LEARNING_RATE,
            epoch_limit: DEFAULT_EPOCH_LIMIT,
        }
    }
}

impl TrainerConfig {
    /// Creates a new trainer configuration.
    ///
    /// # Args
    /// * `learning_rate` - The step length of every correction, must be positive and finite.
    /// * `epoch_limit` - The maximum amount of epochs a run may reach, must be positive.
    ///
    /// # Returns
    /// A `TrainerConfig` or an error if any of the values is invalid.
    pub fn new(learning_rate: f64, epoch_limit: usize) -> Result<Self> {
        let mut cfg = Self::default();
        cfg.set_learning_rate(learning_rate)?;
        cfg.set_epoch_limit(epoch_limit)?;
        Ok(cfg)
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn epoch_limit(&self) -> usize {
        self.epoch_limit.get()
    }

    /// Replaces the learning rate if `learning_rate` is positive and finite.
    pub fn set_learning_rate(&mut self, learning_rate: f64) -> Result<()> {
        if !learning_rate.is_finite() || learning_rate <= 0. {
            warn!(
                "rejected learning rate: got={learning_rate} kept={}",
                self.learning_rate
            );
            return Err(PerceptronErr::InvalidLearningRate { got: learning_rate });
        }

        self.learning_rate = learning_rate;
        Ok(())
    }

    /// Replaces the epoch limit if `epoch_limit` is positive.
    pub fn set_epoch_limit(&mut self, epoch_limit: usize) -> Result<()> {
        let Some(limit) = NonZeroUsize::new(epoch_limit) else {
            warn!("rejected epoch limit: got=0 kept={}", self.epoch_limit);
            return Err(PerceptronErr::InvalidEpochLimit { got: epoch_limit });
        };

        self.epoch_limit = limit;
        Ok(())
    }
}
