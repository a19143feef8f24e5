use serde::Serialize;

use crate::dataset::Point;

/// Weights whose magnitude is below this are treated as zero when solving for the line.
const EPSILON: f64 = 1e-6;

/// Every plot shows at least `[-2, 2]` on both axes.
const MIN_EXTENT: f64 = 2.;
const PADDING: f64 = 0.5;

/// The decision boundary `w0*x1 + w1*x2 + b = 0` solved for drawing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Boundary {
    /// `x2 = slope * x1 + intercept`.
    Line { slope: f64, intercept: f64 },
    /// A line of constant `x1`, the weight on `x2` is (nearly) zero.
    Vertical { x1: f64 },
    /// Both weights are (nearly) zero, there's no line to draw.
    Undefined,
}

impl Boundary {
    /// Solves the boundary for the given parameters.
    pub fn from_weights(w0: f64, w1: f64, b: f64) -> Self {
        if w1.abs() > EPSILON {
            Boundary::Line {
                slope: -w0 / w1,
                intercept: -b / w1,
            }
        } else if w0.abs() > EPSILON {
            Boundary::Vertical { x1: -b / w0 }
        } else {
            Boundary::Undefined
        }
    }

    /// Clips the boundary to the plot area.
    ///
    /// # Returns
    /// The segment to draw, or `None` if the boundary is undefined.
    pub fn segment(&self, bounds: &Bounds) -> Option<Segment> {
        match *self {
            Boundary::Line { slope, intercept } => {
                let at = |x: f64| slope * x + intercept;
                Some(Segment {
                    from: (bounds.min_x1, at(bounds.min_x1)),
                    to: (bounds.max_x1, at(bounds.max_x1)),
                })
            }
            Boundary::Vertical { x1 } => Some(Segment {
                from: (x1, bounds.min_x2),
                to: (x1, bounds.max_x2),
            }),
            Boundary::Undefined => None,
        }
    }
}

/// A line segment in data coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Segment {
    pub from: (f64, f64),
    pub to: (f64, f64),
}

/// The visible area of the plot in data coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub min_x1: f64,
    pub max_x1: f64,
    pub min_x2: f64,
    pub max_x2: f64,
}

impl Bounds {
    /// Computes the padded area that contains every point and at least `[-2, 2]²`.
    pub fn around(points: &[Point]) -> Self {
        let (mut min_x1, mut max_x1) = (-MIN_EXTENT, MIN_EXTENT);
        let (mut min_x2, mut max_x2) = (-MIN_EXTENT, MIN_EXTENT);

        for p in points {
            min_x1 = min_x1.min(p.x1);
            max_x1 = max_x1.max(p.x1);
            min_x2 = min_x2.min(p.x2);
            max_x2 = max_x2.max(p.x2);
        }

        Self {
            min_x1: min_x1 - PADDING,
            max_x1: max_x1 + PADDING,
            min_x2: min_x2 - PADDING,
            max_x2: max_x2 + PADDING,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regular_weights_give_a_line() {
        let boundary = Boundary::from_weights(1., 2., -4.);
        assert_eq!(
            boundary,
            Boundary::Line {
                slope: -0.5,
                intercept: 2.
            }
        );
    }

    #[test]
    fn zero_w1_gives_a_vertical_line() {
        let boundary = Boundary::from_weights(2., 1e-9, 1.);
        assert_eq!(boundary, Boundary::Vertical { x1: -0.5 });
    }

    #[test]
    fn zero_weights_are_undefined() {
        let boundary = Boundary::from_weights(0., 0., 3.);
        assert_eq!(boundary, Boundary::Undefined);
        assert!(boundary.segment(&Bounds::around(&[])).is_none());
    }

    #[test]
    fn empty_bounds_are_padded_defaults() {
        let bounds = Bounds::around(&[]);
        assert_eq!(
            bounds,
            Bounds {
                min_x1: -2.5,
                max_x1: 2.5,
                min_x2: -2.5,
                max_x2: 2.5
            }
        );
    }

    #[test]
    fn bounds_grow_with_the_points() {
        let bounds = Bounds::around(&[Point::new(4., -1., 1.), Point::new(0., -3., -1.)]);
        assert_eq!(bounds.max_x1, 4.5);
        assert_eq!(bounds.min_x1, -2.5);
        assert_eq!(bounds.min_x2, -3.5);
        assert_eq!(bounds.max_x2, 2.5);
    }

    #[test]
    fn line_segments_span_the_plot_width() {
        let bounds = Bounds::around(&[]);
        let segment = Boundary::Line {
            slope: 1.,
            intercept: 0.5,
        }
        .segment(&bounds)
        .unwrap();

        assert_eq!(segment.from, (-2.5, -2.));
        assert_eq!(segment.to, (2.5, 3.));
    }

    #[test]
    fn vertical_segments_span_the_plot_height() {
        let bounds = Bounds::around(&[]);
        let segment = Boundary::Vertical { x1: 1. }.segment(&bounds).unwrap();

        assert_eq!(segment.from, (1., -2.5));
        assert_eq!(segment.to, (1., 2.5));
    }
}
