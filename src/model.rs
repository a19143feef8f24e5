use log::debug;
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::{
    boundary::Boundary,
    dataset::{Dataset, Label, Point},
    error::{PerceptronErr, Result},
};

/// The standard deviation used to initialize the weights when none is given.
pub const DEFAULT_SIGMA: f64 = 0.1;

/// A linear binary classifier over the plane.
///
/// Represents the oriented line `w·x + b = 0`, points on the positive side (or on the
/// line itself) are classified as `Label::Positive`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Perceptron {
    w: [f64; 2],
    b: f64,
}

impl Perceptron {
    /// Returns a new `Perceptron` with every parameter set to zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a new `Perceptron` with the given parameters.
    ///
    /// # Arguments
    /// * `w` - The weight vector.
    /// * `b` - The bias.
    pub fn with_params(w: [f64; 2], b: f64) -> Self {
        Self { w, b }
    }

    /// Returns the raw `w·x + b` for the point.
    pub fn score(&self, point: &Point) -> f64 {
        self.w[0] * point.x1 + self.w[1] * point.x2 + self.b
    }

    /// Classifies the point, ties go to `Label::Positive`.
    pub fn predict(&self, point: &Point) -> Label {
        if self.score(point) >= 0. {
            Label::Positive
        } else {
            Label::Negative
        }
    }

    /// Returns the fraction of points in the dataset this model classifies correctly.
    ///
    /// An empty dataset has an accuracy of `0`.
    pub fn accuracy(&self, dataset: &Dataset) -> f64 {
        if dataset.is_empty() {
            return 0.;
        }

        let correct = dataset
            .points()
            .iter()
            .filter(|p| self.predict(p) == p.y)
            .count();

        correct as f64 / dataset.len() as f64
    }

    /// Applies the perceptron rule for a single point.
    ///
    /// # Arguments
    /// * `point` - The point to learn from.
    /// * `learning_rate` - The step length for the correction.
    ///
    /// # Returns
    /// Whether the point was misclassified and the parameters changed.
    pub fn learn(&mut self, point: &Point, learning_rate: f64) -> bool {
        if self.predict(point) == point.y {
            return false;
        }

        let step = learning_rate * point.y.sign();
        for (w, x) in self.w.iter_mut().zip(point.coords()) {
            *w += step * x;
        }
        self.b += step;

        true
    }

    /// Sets every parameter back to zero.
    pub fn reset(&mut self) {
        self.w = [0., 0.];
        self.b = 0.;
    }

    /// Samples every parameter from a zero mean normal distribution.
    ///
    /// # Arguments
    /// * `rng` - A random number generator.
    /// * `sigma` - The standard deviation of the distribution.
    ///
    /// # Returns
    /// An error if `sigma` is negative or not finite, the model is left untouched.
    pub fn random_init<R: Rng + ?Sized>(&mut self, rng: &mut R, sigma: f64) -> Result<()> {
        // `Normal::new` accepts a negative standard deviation.
        if !sigma.is_finite() || sigma < 0. {
            return Err(PerceptronErr::InvalidSigma { got: sigma });
        }

        let normal =
            Normal::new(0., sigma).map_err(|_| PerceptronErr::InvalidSigma { got: sigma })?;

        self.w = [normal.sample(rng), normal.sample(rng)];
        self.b = normal.sample(rng);

        debug!(w0 = self.w[0], w1 = self.w[1], b = self.b; "weights initialized");
        Ok(())
    }

    /// Returns the parameters as `(w0, w1, b)`.
    pub fn weights(&self) -> (f64, f64, f64) {
        (self.w[0], self.w[1], self.b)
    }

    /// Returns the geometry of the decision boundary.
    pub fn boundary(&self) -> Boundary {
        Boundary::from_weights(self.w[0], self.w[1], self.b)
    }
}
