mod point;
pub mod presets;

pub use point::{Label, Point};
pub use presets::Mode;

use serde::{Deserialize, Serialize};

use crate::error::{PerceptronErr, Result};

/// A single editable field of a `Point`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    X1,
    X2,
    Y,
}

/// An ordered collection of labeled points.
///
/// The order of the points is the order the trainer visits them in, so it matters.
/// Mutations never retrain anything, that's up to the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    points: Vec<Point>,
}

impl Dataset {
    /// Creates a new empty `Dataset`.
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns a read-only view of the points, in order.
    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Appends a new point at the end of the dataset.
    ///
    /// # Arguments
    /// * `x1` - The first coordinate.
    /// * `x2` - The second coordinate.
    /// * `y` - The label, coerced by its sign.
    ///
    /// Non-finite coordinates are stored as `0`.
    pub fn add(&mut self, x1: f64, x2: f64, y: f64) {
        self.points.push(Point::new(sanitize(x1), sanitize(x2), y));
    }

    /// Updates a single field of the point at `index`.
    ///
    /// Labels are coerced by sign and non-finite coordinates are stored as `0`.
    ///
    /// # Arguments
    /// * `index` - The position of the point.
    /// * `field` - The field to overwrite.
    /// * `value` - The new value.
    ///
    /// # Returns
    /// An error if `index` is out of bounds.
    pub fn update(&mut self, index: usize, field: Field, value: f64) -> Result<()> {
        let len = self.len();
        let point = self
            .points
            .get_mut(index)
            .ok_or(PerceptronErr::IndexOutOfBounds { index, len })?;

        match field {
            Field::X1 => point.x1 = sanitize(value),
            Field::X2 => point.x2 = sanitize(value),
            Field::Y => point.y = Label::coerce(value),
        }

        Ok(())
    }

    /// Removes the point at `index`, shifting the following points back.
    ///
    /// # Returns
    /// The removed point or an error if `index` is out of bounds.
    pub fn remove(&mut self, index: usize) -> Result<Point> {
        let len = self.len();
        if index >= len {
            return Err(PerceptronErr::IndexOutOfBounds { index, len });
        }

        Ok(self.points.remove(index))
    }
}

/// Maps non-finite coordinates to `0`.
fn sanitize(coord: f64) -> f64 {
    if coord.is_finite() { coord } else { 0. }
}

impl FromIterator<Point> for Dataset {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_appends_in_order() {
        let mut ds = Dataset::new();
        ds.add(1., 2., 1.);
        ds.add(3., 4., -1.);

        assert_eq!(ds.len(), 2);
        assert_eq!(ds.points()[0], Point::new(1., 2., 1.));
        assert_eq!(ds.points()[1], Point::new(3., 4., -1.));
    }

    #[test]
    fn add_coerces_the_label() {
        let mut ds = Dataset::new();
        ds.add(0., 0., 0.);
        ds.add(0., 0., -0.1);

        assert_eq!(ds.points()[0].y, Label::Positive);
        assert_eq!(ds.points()[1].y, Label::Negative);
    }

    #[test]
    fn add_sanitizes_coordinates() {
        let mut ds = Dataset::new();
        ds.add(f64::NAN, f64::NEG_INFINITY, 1.);
        ds.add(2., f64::INFINITY, -1.);

        assert_eq!(ds.points()[0], Point::new(0., 0., 1.));
        assert_eq!(ds.points()[1], Point::new(2., 0., -1.));
    }

    #[test]
    fn update_sanitizes_values() {
        let mut ds = Dataset::from_iter([Point::new(1., 1., 1.)]);

        ds.update(0, Field::X1, f64::NAN).unwrap();
        ds.update(0, Field::X2, -2.5).unwrap();
        ds.update(0, Field::Y, -4.).unwrap();

        assert_eq!(ds.points()[0], Point::new(0., -2.5, -1.));
    }

    #[test]
    fn update_out_of_bounds_fails() {
        let mut ds = Dataset::new();
        assert_eq!(
            ds.update(0, Field::Y, 1.),
            Err(PerceptronErr::IndexOutOfBounds { index: 0, len: 0 })
        );
    }

    #[test]
    fn remove_shifts_the_following_points() {
        let mut ds = Dataset::from_iter([
            Point::new(1., 0., 1.),
            Point::new(2., 0., 1.),
            Point::new(3., 0., 1.),
        ]);

        let removed = ds.remove(1).unwrap();
        assert_eq!(removed.x1, 2.);
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.points()[1].x1, 3.);

        assert_eq!(
            ds.remove(2),
            Err(PerceptronErr::IndexOutOfBounds { index: 2, len: 2 })
        );
    }
}
