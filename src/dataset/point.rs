use serde::{Deserialize, Serialize};

/// The class of a point, either -1 or +1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "f64", from = "f64")]
pub enum Label {
    Negative,
    Positive,
}

impl Label {
    /// Coerces any number into a label by its sign, non-negative values map to `Positive`.
    ///
    /// `NaN` fails the comparison and maps to `Negative`.
    pub fn coerce(value: f64) -> Self {
        if value >= 0. {
            Label::Positive
        } else {
            Label::Negative
        }
    }

    /// Returns the label as the number `-1.` or `1.`.
    pub fn sign(self) -> f64 {
        match self {
            Label::Negative => -1.,
            Label::Positive => 1.,
        }
    }
}

impl From<f64> for Label {
    fn from(value: f64) -> Self {
        Self::coerce(value)
    }
}

impl From<Label> for f64 {
    fn from(label: Label) -> Self {
        label.sign()
    }
}

/// A labeled point in the plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x1: f64,
    pub x2: f64,
    pub y: Label,
}

impl Point {
    /// Creates a new `Point`, coercing `y` into a label.
    ///
    /// # Arguments
    /// * `x1` - The first coordinate.
    /// * `x2` - The second coordinate.
    /// * `y` - Any number, its sign decides the label.
    pub fn new(x1: f64, x2: f64, y: f64) -> Self {
        Self {
            x1,
            x2,
            y: Label::coerce(y),
        }
    }

    /// Returns the coordinates as an array.
    pub fn coords(&self) -> [f64; 2] {
        [self.x1, self.x2]
    }
}
