use std::fmt;

use rand::Rng;
use serde::Serialize;

use crate::{
    boundary::{Bounds, Segment},
    dataset::{Dataset, Mode, Point},
    error::Result,
    model::Perceptron,
    training::{EpochReport, StopReason, Trainer, TrainerConfig},
};

/// The status readout of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Idle,
    /// A mode was just loaded.
    Mode(Mode),
    Initialized,
    Running,
    Converged { epoch: usize },
    EpochLimit { epoch: usize },
    Stopped,
}

impl Status {
    /// Maps the end of a run to its status.
    pub fn finished(reason: StopReason, epoch: usize) -> Self {
        match reason {
            StopReason::Converged => Status::Converged { epoch },
            StopReason::EpochLimit => Status::EpochLimit { epoch },
            StopReason::Stopped => Status::Stopped,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Idle => write!(f, "idle"),
            Status::Mode(mode) => write!(f, "mode: {mode}"),
            Status::Initialized => write!(f, "weights initialized"),
            Status::Running => write!(f, "running"),
            Status::Converged { epoch } => write!(f, "converged at epoch {epoch}"),
            Status::EpochLimit { epoch } => {
                write!(f, "stopped (reached epochs) at epoch {epoch}")
            }
            Status::Stopped => write!(f, "stopped"),
        }
    }
}

/// Everything a demo needs: the points, the model, the trainer and the status readout.
///
/// These are always mutated together, so a session is the unit to lock when it's shared.
#[derive(Debug, Clone)]
pub struct Session {
    mode: Mode,
    dataset: Dataset,
    model: Perceptron,
    trainer: Trainer,
    status: Status,
    last_report: Option<EpochReport>,
}

impl Session {
    /// Creates a new `Session` with the preset for `mode` and a zeroed model.
    pub fn new(mode: Mode, cfg: TrainerConfig) -> Self {
        Self {
            mode,
            dataset: mode.preset(),
            model: Perceptron::new(),
            trainer: Trainer::new(cfg),
            status: Status::Idle,
            last_report: None,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Edits to the dataset don't retrain nor reset the model.
    pub fn dataset_mut(&mut self) -> &mut Dataset {
        &mut self.dataset
    }

    pub fn model(&self) -> &Perceptron {
        &self.model
    }

    pub fn trainer(&self) -> &Trainer {
        &self.trainer
    }

    pub fn trainer_mut(&mut self) -> &mut Trainer {
        &mut self.trainer
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn set_status(&mut self, status: Status) {
        self.status = status;
    }

    pub fn last_report(&self) -> Option<EpochReport> {
        self.last_report
    }

    /// Switches to `mode`, replacing the dataset with its preset and resetting the model.
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.dataset = mode.preset();
        self.reset_model();
        self.status = Status::Mode(mode);
    }

    /// Zeroes the model and the epoch counter, the readout shows the session as stopped.
    pub fn reset_model(&mut self) {
        self.model.reset();
        self.trainer.reset();
        self.last_report = None;
        self.status = Status::Stopped;
    }

    /// Samples small random weights and restarts the epoch counter.
    ///
    /// # Arguments
    /// * `rng` - A random number generator.
    /// * `sigma` - The standard deviation of the weights.
    pub fn init_weights<R: Rng + ?Sized>(&mut self, rng: &mut R, sigma: f64) -> Result<()> {
        self.model.random_init(rng, sigma)?;
        self.trainer.reset();
        self.last_report = None;
        self.status = Status::Initialized;
        Ok(())
    }

    /// Trains a single epoch over the current dataset.
    pub fn step_once(&mut self) -> EpochReport {
        let report = self.trainer.step_once(&self.dataset, &mut self.model);
        self.last_report = Some(report);
        report
    }

    /// Takes a drawable snapshot of the session.
    pub fn snapshot(&self) -> Snapshot {
        let (w0, w1, b) = self.model.weights();
        let bounds = Bounds::around(self.dataset.points());

        Snapshot {
            mode: self.mode,
            weights: Weights { w0, w1, b },
            epoch: self.trainer.epoch(),
            accuracy: self.model.accuracy(&self.dataset),
            updates: self.last_report.map(|r| r.updates),
            status: self.status.to_string(),
            points: self.dataset.points().to_vec(),
            boundary: self.model.boundary().segment(&bounds),
            bounds,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Weights {
    pub w0: f64,
    pub w1: f64,
    pub b: f64,
}

/// A read-only view of a session, enough to draw the plot and the readouts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub mode: Mode,
    pub weights: Weights,
    pub epoch: usize,
    pub accuracy: f64,
    /// Corrections made during the last epoch, if any epoch ran since the last reset.
    pub updates: Option<usize>,
    pub status: String,
    pub points: Vec<Point>,
    pub bounds: Bounds,
    pub boundary: Option<Segment>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn session(mode: Mode) -> Session {
        Session::new(mode, TrainerConfig::default())
    }

    #[test]
    fn new_sessions_load_the_preset() {
        let s = session(Mode::Xor);
        assert_eq!(s.dataset().len(), 4);
        assert_eq!(s.model(), &Perceptron::new());
        assert_eq!(s.status(), Status::Idle);
    }

    #[test]
    fn set_mode_reloads_data_and_resets_the_model() {
        let mut s = session(Mode::Separable);
        s.dataset_mut().add(9., 9., 1.);
        s.step_once();
        s.step_once();

        s.set_mode(Mode::Xor);

        assert_eq!(s.mode(), Mode::Xor);
        assert_eq!(s.dataset(), &Mode::Xor.preset());
        assert_eq!(s.model(), &Perceptron::new());
        assert_eq!(s.trainer().epoch(), 0);
        assert!(s.last_report().is_none());
        assert_eq!(s.status(), Status::Mode(Mode::Xor));
        assert_eq!(s.status().to_string(), "mode: xor");
    }

    #[test]
    fn reset_model_reads_as_stopped() {
        let mut s = session(Mode::Separable);
        s.step_once();

        s.reset_model();

        assert_eq!(s.model(), &Perceptron::new());
        assert_eq!(s.trainer().epoch(), 0);
        assert_eq!(s.status(), Status::Stopped);
        assert_eq!(s.snapshot().status, "stopped");
    }

    #[test]
    fn init_weights_restarts_the_epoch_counter() {
        let mut s = session(Mode::Xor);
        s.step_once();

        s.init_weights(&mut StdRng::seed_from_u64(3), 0.1).unwrap();

        assert_eq!(s.trainer().epoch(), 0);
        assert_eq!(s.status(), Status::Initialized);
        assert_ne!(s.model(), &Perceptron::new());
    }

    #[test]
    fn dataset_edits_keep_the_model() {
        let mut s = session(Mode::Separable);
        s.step_once();
        let model = *s.model();

        s.dataset_mut().remove(0).unwrap();

        assert_eq!(s.model(), &model);
        assert_eq!(s.trainer().epoch(), 1);
    }

    #[test]
    fn snapshot_of_a_fresh_session_has_no_boundary() {
        let snap = session(Mode::Xor).snapshot();

        assert_eq!(snap.epoch, 0);
        assert_eq!(snap.updates, None);
        assert_eq!(snap.status, "idle");
        assert!(snap.boundary.is_none());
        assert_eq!(snap.points.len(), 4);
    }

    #[test]
    fn snapshot_serializes_to_json() {
        let mut s = session(Mode::Separable);
        s.step_once();

        let json = serde_json::to_value(s.snapshot()).unwrap();

        assert_eq!(json["mode"], "separable");
        assert_eq!(json["epoch"], 1);
        assert_eq!(json["updates"], 1);
        assert_eq!(json["points"].as_array().unwrap().len(), 12);
        assert!(json["boundary"]["from"].is_array());
    }

    #[test]
    fn finished_statuses_read_like_the_demo() {
        assert_eq!(
            Status::finished(StopReason::EpochLimit, 10).to_string(),
            "stopped (reached epochs) at epoch 10"
        );
        assert_eq!(Status::finished(StopReason::Stopped, 4), Status::Stopped);
    }
}
