use log::{debug, info};
use serde::Serialize;

use super::TrainerConfig;
use crate::{dataset::Dataset, error::Result, model::Perceptron};

/// What happened during a single epoch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EpochReport {
    /// The epoch counter after this pass, 1-based.
    pub epoch: usize,
    /// The amount of misclassified points corrected during the pass.
    pub updates: usize,
    /// The model's accuracy over the dataset at the end of the pass.
    pub accuracy: f64,
}

impl EpochReport {
    /// An epoch without updates means every point was already classified correctly.
    pub fn converged(&self) -> bool {
        self.updates == 0
    }
}

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    Converged,
    EpochLimit,
    Stopped,
}

/// The result of a training run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    pub reason: StopReason,
    /// The epoch counter when the run ended.
    pub epoch: usize,
    /// One report per epoch stepped during the run.
    pub history: Vec<EpochReport>,
}

impl RunOutcome {
    pub fn converged(&self) -> bool {
        self.reason == StopReason::Converged
    }
}

/// Applies the online perceptron rule over a dataset.
///
/// The trainer owns no data, it borrows the dataset and the model for the duration of a
/// single step. It does own the epoch counter and the hyperparameters.
#[derive(Debug, Clone, Default)]
pub struct Trainer {
    cfg: TrainerConfig,
    epoch: usize,
}

impl Trainer {
    /// Returns a new `Trainer` with its epoch counter at zero.
    ///
    /// # Arguments
    /// * `cfg` - The hyperparameters for training.
    pub fn new(cfg: TrainerConfig) -> Self {
        Self { cfg, epoch: 0 }
    }

    pub fn epoch(&self) -> usize {
        self.epoch
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.cfg
    }

    /// Replaces the learning rate, see `TrainerConfig::set_learning_rate`.
    pub fn set_learning_rate(&mut self, learning_rate: f64) -> Result<()> {
        self.cfg.set_learning_rate(learning_rate)
    }

    /// Replaces the epoch limit, see `TrainerConfig::set_epoch_limit`.
    pub fn set_epoch_limit(&mut self, epoch_limit: usize) -> Result<()> {
        self.cfg.set_epoch_limit(epoch_limit)
    }

    /// Whether the epoch counter already reached the configured limit.
    pub fn exhausted(&self) -> bool {
        self.epoch >= self.cfg.epoch_limit()
    }

    /// Sets the epoch counter back to zero.
    pub fn reset(&mut self) {
        self.epoch = 0;
    }

    /// Performs a single epoch: visits every point in order and corrects the model on
    /// each misclassified one. Every correction is seen by the points that follow.
    ///
    /// # Arguments
    /// * `dataset` - The points to learn from.
    /// * `model` - The model to update.
    ///
    /// # Returns
    /// The report for this epoch.
    pub fn step_once(&mut self, dataset: &Dataset, model: &mut Perceptron) -> EpochReport {
        let lr = self.cfg.learning_rate();

        let updates = dataset
            .points()
            .iter()
            .filter(|p| model.learn(p, lr))
            .count();

        self.epoch += 1;

        let report = EpochReport {
            epoch: self.epoch,
            updates,
            accuracy: model.accuracy(dataset),
        };

        let (w0, w1, b) = model.weights();
        debug!(
            epoch = report.epoch,
            updates = report.updates,
            accuracy = report.accuracy,
            w0 = w0,
            w1 = w1,
            b = b;
            "epoch finished"
        );

        report
    }

    /// Steps until an epoch converges or the epoch counter reaches the limit.
    ///
    /// The limit bounds the work unconditionally, if it's already reached no epoch is run.
    ///
    /// # Arguments
    /// * `dataset` - The points to learn from.
    /// * `model` - The model to update.
    pub fn train(&mut self, dataset: &Dataset, model: &mut Perceptron) -> RunOutcome {
        let mut history = Vec::new();

        let reason = loop {
            if self.exhausted() {
                break StopReason::EpochLimit;
            }

            let report = self.step_once(dataset, model);
            history.push(report);

            if report.converged() {
                break StopReason::Converged;
            }
        };

        info!(
            "training finished: reason={reason:?} epoch={} epochs_run={}",
            self.epoch,
            history.len()
        );

        RunOutcome {
            reason,
            epoch: self.epoch,
            history,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Point, presets};

    fn trainer(lr: f64, limit: usize) -> Trainer {
        Trainer::new(TrainerConfig::new(lr, limit).unwrap())
    }

    #[test]
    fn exact_update_on_a_misclassified_point() {
        let ds = Dataset::from_iter([Point::new(1., 1., -1.)]);
        let mut model = Perceptron::new();
        let mut trainer = trainer(1., 10);

        let report = trainer.step_once(&ds, &mut model);

        assert_eq!(report.updates, 1);
        assert_eq!(model.weights(), (-1., -1., -1.));
    }

    #[test]
    fn updates_are_visible_within_the_same_epoch() {
        // The first correction already classifies the second point, only one update.
        let ds = Dataset::from_iter([Point::new(1., 1., -1.), Point::new(2., 2., -1.)]);
        let mut model = Perceptron::new();
        let mut trainer = trainer(1., 10);

        let report = trainer.step_once(&ds, &mut model);

        assert_eq!(report.updates, 1);
        assert_eq!(model.weights(), (-1., -1., -1.));
    }

    #[test]
    fn correctly_classified_data_is_left_alone() {
        let ds = presets::separable();
        let mut model = Perceptron::with_params([1., 1.], 0.);
        let mut trainer = trainer(0.1, 10);

        let report = trainer.step_once(&ds, &mut model);

        assert!(report.converged());
        assert_eq!(report.accuracy, 1.);
        assert_eq!(model, Perceptron::with_params([1., 1.], 0.));
    }

    #[test]
    fn empty_dataset_never_changes_the_model() {
        let ds = Dataset::new();
        let mut model = Perceptron::with_params([0.4, -0.7], 0.2);
        let mut trainer = trainer(1., 10);

        let report = trainer.step_once(&ds, &mut model);

        assert_eq!(report.updates, 0);
        assert_eq!(report.accuracy, 0.);
        assert_eq!(model, Perceptron::with_params([0.4, -0.7], 0.2));
    }

    #[test]
    fn epoch_counter_is_monotonic() {
        let ds = presets::xor();
        let mut model = Perceptron::new();
        let mut trainer = trainer(0.1, 10);

        for n in 1..=7 {
            let report = trainer.step_once(&ds, &mut model);
            assert_eq!(report.epoch, n);
            assert_eq!(trainer.epoch(), n);
        }
    }

    #[test]
    fn single_point_converges_within_two_epochs() {
        let ds = Dataset::from_iter([Point::new(0.5, -2., -1.)]);
        let mut model = Perceptron::new();
        let mut trainer = trainer(0.3, 10);

        let outcome = trainer.train(&ds, &mut model);

        assert!(outcome.converged());
        assert!(outcome.epoch <= 2);
        assert_eq!(model.accuracy(&ds), 1.);
    }

    #[test]
    fn train_does_not_step_past_the_limit() {
        let ds = presets::xor();
        let mut model = Perceptron::new();
        let mut trainer = trainer(0.1, 3);

        let first = trainer.train(&ds, &mut model);
        assert_eq!(first.reason, StopReason::EpochLimit);
        assert_eq!(first.history.len(), 3);

        let second = trainer.train(&ds, &mut model);
        assert_eq!(second.reason, StopReason::EpochLimit);
        assert!(second.history.is_empty());
        assert_eq!(trainer.epoch(), 3);
    }

    #[test]
    fn reset_restarts_the_counter() {
        let ds = presets::xor();
        let mut model = Perceptron::new();
        let mut trainer = trainer(0.1, 3);

        trainer.train(&ds, &mut model);
        trainer.reset();

        assert_eq!(trainer.epoch(), 0);
        assert!(!trainer.exhausted());
    }
}
