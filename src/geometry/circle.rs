use rand::seq::SliceRandom;
use rand::Rng;

use crate::geometry::{Coordinate, Point, Vector, EPSILON};

/// A circle given by centre and radius.
#[derive(Copy, Clone, Debug)]
pub struct Circle<T> {
    center: Point<T>,
    radius: T,
}

/// Outcome of intersecting two circles.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum CircleIntersection {
    /// No common point: the circles lie apart, or one inside the other.
    Disjoint,
    /// A single touch point.
    Tangent(Point<f64>),
    /// Two crossing points.
    Crossing(Point<f64>, Point<f64>),
    /// The same circle.
    Coincident,
}

impl<T: Coordinate> Circle<T> {
    pub fn new(center: Point<T>, radius: T) -> Self {
        debug_assert!(radius >= T::default());
        Circle { center, radius }
    }

    pub fn center(&self) -> Point<T> {
        self.center
    }

    pub fn radius(&self) -> T {
        self.radius
    }

    /// Whether `point` lies inside the circle or on its boundary.
    pub fn contains(&self, point: Point<T>) -> bool {
        let to_point = Vector::between(self.center, point);
        to_point.square_len() <= self.radius * self.radius
    }

    /// Intersection with another circle.
    ///
    /// With `d` the centre distance, the verdict falls out of comparing
    /// `d^2` against `(r0 + r1)^2` and `(r0 - r1)^2`; the crossing points
    /// are offset from the chord midpoint `H` along the perpendicular to
    /// the centre line, at `OH = (r0^2 - r1^2 + d^2) / 2d` from the first
    /// centre and `HP = sqrt(r0^2 - OH^2)` off the axis.
    ///
    /// # Example
    /// ```rust
    /// use algokit::geometry::{Circle, CircleIntersection, Point};
    ///
    /// let a = Circle::new(Point::new(3i64, 4), 5);
    /// let b = Circle::new(Point::new(11i64, 4), 3);
    /// assert_eq!(
    ///     a.intersect(&b),
    ///     CircleIntersection::Tangent(Point::new(8.0, 4.0)),
    /// );
    /// ```
    pub fn intersect(&self, rhs: &Circle<T>) -> CircleIntersection {
        if self == rhs {
            return CircleIntersection::Coincident;
        }

        let center_line = Vector::between(self.center, rhs.center);
        let d_square = center_line.square_len();
        let radius_sum = self.radius + rhs.radius;
        let radius_diff = self.radius - rhs.radius;

        let tangent = d_square.coord_eq(radius_sum * radius_sum)
            || d_square.coord_eq(radius_diff * radius_diff);
        if !tangent {
            if d_square > radius_sum * radius_sum {
                return CircleIntersection::Disjoint;
            }
            if d_square < radius_diff * radius_diff {
                // one circle inside the other
                return CircleIntersection::Disjoint;
            }
        }

        let d = center_line.len();
        let r0_square = (self.radius * self.radius).to_f64();
        let r1_square = (rhs.radius * rhs.radius).to_f64();
        let axis_offset = (r0_square - r1_square + d_square.to_f64()) / (2.0 * d);
        let chord_midpoint =
            self.center.to_f64() + center_line.to_f64().scaled(axis_offset / d);

        if tangent {
            return CircleIntersection::Tangent(chord_midpoint);
        }

        let half_chord = (r0_square - axis_offset * axis_offset).max(0.0).sqrt();
        let perpendicular = center_line.to_f64().rotated_ccw().scaled(half_chord / d);
        CircleIntersection::Crossing(
            chord_midpoint + perpendicular,
            chord_midpoint + perpendicular.scaled(-1.0),
        )
    }
}

impl Circle<f64> {
    /// The circle with segment `pq` as diameter.
    pub fn diametral(p: Point<f64>, q: Point<f64>) -> Self {
        let half = Vector::between(p, q).scaled(0.5);
        Circle {
            center: p + half,
            radius: half.len(),
        }
    }

    /// The circle through three points; for a (near-)colinear triple it
    /// degrades to the diametral circle of the farthest pair.
    pub fn circumscribed(p: Point<f64>, q: Point<f64>, r: Point<f64>) -> Self {
        use crate::geometry::{Line, LineIntersection};

        let bisector = |a: Point<f64>, b: Point<f64>| {
            let direction = Vector::between(a, b);
            let mid = a + direction.scaled(0.5);
            // direction is the normal of the bisector
            Line::new(
                direction.dx,
                direction.dy,
                -(direction.dx * mid.x + direction.dy * mid.y),
            )
        };

        if !Vector::between(p, q).cross(Vector::between(q, r)).is_zero() {
            if let LineIntersection::Crossing(center) =
                bisector(p, q).intersect(&bisector(q, r))
            {
                let radius = Vector::between(center, p).len();
                return Circle {
                    center,
                    radius,
                };
            }
        }

        // colinear: the farthest pair spans the whole triple
        let pairs = [(p, q), (q, r), (p, r)];
        let (a, b) = pairs
            .iter()
            .copied()
            .max_by(|(a1, b1), (a2, b2)| {
                let d1 = Vector::between(*a1, *b1).square_len();
                let d2 = Vector::between(*a2, *b2).square_len();
                d1.partial_cmp(&d2).expect("finite coordinates")
            })
            .expect("three candidate pairs");
        Circle::diametral(a, b)
    }

    /// Minimum enclosing circle of `points` (Welzl's randomised
    /// incremental construction). Expected linear time after the shuffle;
    /// any valid smallest circle may be returned for degenerate inputs.
    ///
    /// Returns `None` for an empty slice.
    pub fn enclosing<R: Rng + ?Sized>(points: &[Point<f64>], rng: &mut R) -> Option<Self> {
        match points {
            [] => return None,
            [only] => return Some(Circle::new(*only, 0.0)),
            _ => {}
        }
        let mut points = points.to_vec();
        points.shuffle(rng);

        let mut circle = Circle::diametral(points[0], points[1]);
        for i in 2..points.len() {
            let stray = points[i];
            if !circle.covers(stray) {
                // the stray point must lie on the boundary of the rebuilt circle
                circle = Self::enclose_with_fixed(&mut points[..i], stray, rng);
            }
        }
        Some(circle)
    }

    /// Smallest circle covering `seen` with `fixed` on its boundary.
    fn enclose_with_fixed<R: Rng + ?Sized>(
        seen: &mut [Point<f64>],
        fixed: Point<f64>,
        rng: &mut R,
    ) -> Self {
        seen.shuffle(rng);
        let mut circle = Circle::diametral(seen[0], fixed);
        for i in 1..seen.len() {
            let stray = seen[i];
            if !circle.covers(stray) {
                circle = Self::enclose_with_two_fixed(&seen[..i], stray, fixed);
            }
        }
        circle
    }

    /// Smallest circle covering `seen` with both fixed points on its
    /// boundary; three boundary points pin the circle completely.
    fn enclose_with_two_fixed(seen: &[Point<f64>], fixed1: Point<f64>, fixed2: Point<f64>) -> Self {
        let mut circle = Circle::diametral(fixed1, fixed2);
        for &stray in seen {
            if !circle.covers(stray) {
                circle = Circle::circumscribed(stray, fixed1, fixed2);
            }
        }
        circle
    }

    /// Containment with the boundary tolerance the incremental
    /// construction needs.
    fn covers(&self, point: Point<f64>) -> bool {
        Vector::between(self.center, point).square_len() <= self.radius * self.radius + EPSILON
    }
}

impl<T: Coordinate> PartialEq for Circle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.center == other.center && self.radius.coord_eq(other.radius)
    }
}
