use crate::geometry::{Coordinate, Line, LineIntersection, Point, EPSILON};

/// Which side of its boundary line a half-plane keeps.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Sign {
    /// `a*x + b*y + c >= 0`.
    Positive,
    /// `a*x + b*y + c <= 0`.
    Negative,
}

/// A half-plane: a boundary [`Line`], the side kept, and whether the
/// boundary itself belongs to the region.
#[derive(Copy, Clone, Debug)]
pub struct HalfPlane<T> {
    line: Line<T>,
    sign: Sign,
    with_border: bool,
}

impl<T: Coordinate> HalfPlane<T> {
    /// A closed half-plane (boundary included).
    pub fn new(line: Line<T>, sign: Sign) -> Self {
        HalfPlane {
            line,
            sign,
            with_border: true,
        }
    }

    /// An open half-plane (boundary excluded).
    pub fn open(line: Line<T>, sign: Sign) -> Self {
        HalfPlane {
            line,
            sign,
            with_border: false,
        }
    }

    pub fn line(&self) -> &Line<T> {
        &self.line
    }

    pub fn sign(&self) -> Sign {
        self.sign
    }

    pub fn includes_border(&self) -> bool {
        self.with_border
    }

    /// Boundary normal pointing into the kept side, plus the offset, as a
    /// unit-normalised triple `(nx, ny, offset)`: the region is
    /// `nx*x + ny*y + offset >= 0`.
    pub(crate) fn normalized(&self) -> (f64, f64, f64) {
        let (mut a, mut b, mut c) = (
            self.line.a().to_f64(),
            self.line.b().to_f64(),
            self.line.c().to_f64(),
        );
        if self.sign == Sign::Negative {
            a = -a;
            b = -b;
            c = -c;
        }
        let norm = a.hypot(b);
        (a / norm, b / norm, c / norm)
    }

    /// Whether `point` belongs to the half-plane, honouring the border
    /// flag.
    pub fn contains_point(&self, point: Point<f64>) -> bool {
        let value = match self.sign {
            Sign::Positive => self.line.eval(point),
            Sign::Negative => -self.line.eval(point),
        };
        if self.with_border {
            value >= -EPSILON
        } else {
            value > EPSILON
        }
    }

    /// Contains every point with arbitrarily large y.
    pub fn is_upward(&self) -> bool {
        let (_, ny, _) = self.normalized();
        ny > EPSILON
    }

    /// Contains every point with arbitrarily small y.
    pub fn is_downward(&self) -> bool {
        let (_, ny, _) = self.normalized();
        ny < -EPSILON
    }

    /// Vertical, keeping the side of smaller x.
    pub fn is_leftward(&self) -> bool {
        let (nx, ny, _) = self.normalized();
        ny.abs() <= EPSILON && nx < 0.0
    }

    /// Vertical, keeping the side of larger x.
    pub fn is_rightward(&self) -> bool {
        let (nx, ny, _) = self.normalized();
        ny.abs() <= EPSILON && nx > 0.0
    }

    pub fn is_parallel(&self, rhs: &HalfPlane<T>) -> bool {
        self.line.is_parallel(&rhs.line)
    }

    /// Whether this half-plane fully contains `rhs`: their normals must
    /// agree, and this boundary must sit no tighter than the other one.
    pub fn contains_halfplane(&self, rhs: &HalfPlane<T>) -> bool {
        let (nx, ny, offset) = self.normalized();
        let (rx, ry, roffset) = rhs.normalized();
        let codirectional = nx * rx + ny * ry > 1.0 - EPSILON;
        codirectional && offset >= roffset - EPSILON
    }

    /// Whether the crossing point of the two boundaries lies in this
    /// half-plane. False when the boundaries do not cross at all.
    pub fn contains_intersection_of(&self, h1: &HalfPlane<T>, h2: &HalfPlane<T>) -> bool {
        match h1.line.intersect(&h2.line) {
            LineIntersection::Crossing(point) => self.contains_point(point),
            _ => false,
        }
    }

    pub fn to_f64(&self) -> HalfPlane<f64> {
        HalfPlane {
            line: self.line.to_f64(),
            sign: self.sign,
            with_border: self.with_border,
        }
    }
}

impl<T: Coordinate> PartialEq for HalfPlane<T> {
    fn eq(&self, other: &Self) -> bool {
        self.contains_halfplane(other) && other.contains_halfplane(self)
            && self.with_border == other.with_border
    }
}
