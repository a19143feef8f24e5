use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::{Dataset, Point};
use crate::error::{PerceptronErr, Result};

/// The dataset a session starts from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Separable,
    Xor,
    /// User edited data, seeded with the separable clusters.
    Custom,
}

impl Mode {
    /// Builds the preset dataset for this mode.
    pub fn preset(self) -> Dataset {
        match self {
            Mode::Separable | Mode::Custom => separable(),
            Mode::Xor => xor(),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Mode::Separable => "separable",
            Mode::Xor => "xor",
            Mode::Custom => "custom",
        };

        write!(f, "{s}")
    }
}

impl FromStr for Mode {
    type Err = PerceptronErr;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "separable" => Ok(Mode::Separable),
            "xor" => Ok(Mode::Xor),
            "custom" => Ok(Mode::Custom),
            _ => Err(PerceptronErr::UnknownMode { got: s.to_string() }),
        }
    }
}

/// Two clusters, one per class, split by a line through the origin.
pub fn separable() -> Dataset {
    let negatives = [
        (-2.0, -1.0),
        (-1.5, -1.0),
        (-1.0, -1.2),
        (-1.2, -0.8),
        (-1.8, -0.5),
        (-2.2, -0.6),
    ];

    let positives = [
        (1.5, 1.0),
        (1.8, 1.2),
        (2.2, 0.8),
        (1.2, 0.9),
        (1.9, 0.6),
        (2.1, 1.4),
    ];

    let points = negatives
        .into_iter()
        .map(|(x1, x2)| Point::new(x1, x2, -1.))
        .chain(positives.into_iter().map(|(x1, x2)| Point::new(x1, x2, 1.)));

    Dataset::from_iter(points)
}

/// The four XOR corners, no line separates them.
pub fn xor() -> Dataset {
    Dataset::from_iter([
        Point::new(-1., -1., -1.),
        Point::new(-1., 1., 1.),
        Point::new(1., -1., 1.),
        Point::new(1., 1., -1.),
    ])
}
