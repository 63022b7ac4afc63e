use crate::geometry::{HalfPlane, Line, LineIntersection, Point, Sign, EPSILON};

/// A simple polygon with `f64` vertices, counter-clockwise when built
/// from half-planes.
///
/// Degenerate results (fewer than three distinct vertices, an unbounded
/// or empty half-plane intersection) collapse to the empty polygon.
#[derive(Clone, Debug, Default)]
pub struct Polygon {
    vertices: Vec<Point<f64>>,
}

/// One chain line `y = slope * x + intercept`.
#[derive(Copy, Clone, Debug)]
struct ChainLine {
    slope: f64,
    intercept: f64,
}

impl ChainLine {
    fn at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// x-coordinate where two non-parallel chain lines meet.
fn meet_x(a: &ChainLine, b: &ChainLine) -> f64 {
    (b.intercept - a.intercept) / (a.slope - b.slope)
}

/// A piecewise-linear envelope of lines; `lines[i]` is active on
/// `breaks[i-1] ..= breaks[i]` with the outer pieces unbounded.
struct Envelope {
    lines: Vec<ChainLine>,
    breaks: Vec<f64>,
}

impl Envelope {
    /// Pointwise maximum of `lines` (the binding boundary of "y >="
    /// constraints). Lines are sorted by slope, parallel-dominated ones
    /// dropped, and "bad triples" (a line lying under the crossing of
    /// its neighbours) removed by the usual hull scan.
    fn max_of(mut lines: Vec<ChainLine>) -> Envelope {
        lines.sort_by(|l, r| {
            l.slope
                .partial_cmp(&r.slope)
                .expect("finite slopes")
                .then(l.intercept.partial_cmp(&r.intercept).expect("finite intercepts"))
        });
        lines.dedup_by(|next, kept| {
            if next.slope == kept.slope {
                // same direction: the larger intercept dominates a max
                kept.intercept = next.intercept;
                true
            } else {
                false
            }
        });

        let mut hull: Vec<ChainLine> = Vec::new();
        for line in lines {
            while hull.len() >= 2 {
                let deeper = hull[hull.len() - 2];
                let top = hull[hull.len() - 1];
                // `top` never surfaces if the new line overtakes `deeper`
                // no later than `top` did
                if meet_x(&deeper, &line) <= meet_x(&deeper, &top) {
                    hull.pop();
                } else {
                    break;
                }
            }
            hull.push(line);
        }

        let breaks = hull.windows(2).map(|pair| meet_x(&pair[0], &pair[1])).collect();
        Envelope { lines: hull, breaks }
    }

    /// Pointwise minimum of `lines`, via the maximum of their negations.
    fn min_of(lines: Vec<ChainLine>) -> Envelope {
        let negated = lines
            .iter()
            .map(|line| ChainLine {
                slope: -line.slope,
                intercept: -line.intercept,
            })
            .collect();
        let mut envelope = Envelope::max_of(negated);
        for line in &mut envelope.lines {
            line.slope = -line.slope;
            line.intercept = -line.intercept;
        }
        envelope
    }

    fn at(&self, x: f64) -> f64 {
        self.lines[self.piece_at(x)].at(x)
    }

    fn piece_at(&self, x: f64) -> usize {
        self.breaks.partition_point(|&b| b < x)
    }

    /// Slope of the leftmost (x → -∞) piece.
    fn left_slope(&self) -> f64 {
        self.lines[0].slope
    }

    /// Slope of the rightmost (x → +∞) piece.
    fn right_slope(&self) -> f64 {
        self.lines[self.lines.len() - 1].slope
    }
}

/// The x-interval where `lower` stays below `upper`, i.e. where the two
/// chains enclose area. The gap function is concave piecewise linear, so
/// the answer is a single (possibly unbounded or empty) interval.
fn feasible_interval(lower: &Envelope, upper: &Envelope) -> Option<(f64, f64)> {
    let gap = |x: f64| upper.at(x) - lower.at(x);
    let left_slope = upper.left_slope() - lower.left_slope();
    let right_slope = upper.right_slope() - lower.right_slope();

    let mut xs: Vec<f64> = lower.breaks.iter().chain(upper.breaks.iter()).copied().collect();
    xs.sort_by(|a, b| a.partial_cmp(b).expect("finite breakpoints"));
    xs.dedup();

    if xs.is_empty() {
        // both chains are single lines
        let at_zero = gap(0.0);
        if left_slope == 0.0 {
            return (at_zero >= -EPSILON).then_some((f64::NEG_INFINITY, f64::INFINITY));
        }
        let root = -at_zero / left_slope;
        return Some(if left_slope > 0.0 {
            (root, f64::INFINITY)
        } else {
            (f64::NEG_INFINITY, root)
        });
    }

    let values: Vec<f64> = xs.iter().map(|&x| gap(x)).collect();
    let (peak, &peak_value) = values
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.partial_cmp(b).expect("finite gaps"))
        .expect("at least one breakpoint");

    if peak_value < -EPSILON {
        // every breakpoint is infeasible; the gap can only open out past
        // an end whose slope still grows it
        if left_slope < 0.0 {
            return Some((f64::NEG_INFINITY, xs[0] - values[0] / left_slope));
        }
        if right_slope > 0.0 {
            let last = xs.len() - 1;
            return Some((xs[last] - values[last] / right_slope, f64::INFINITY));
        }
        return None;
    }

    // expand left from the peak to the boundary of {gap >= 0}
    let mut i = peak;
    let xl = loop {
        if i == 0 {
            if left_slope <= 0.0 {
                break f64::NEG_INFINITY; // the gap never closes leftwards
            }
            break xs[0] - values[0] / left_slope;
        }
        if values[i - 1] < -EPSILON {
            let (x0, x1) = (xs[i - 1], xs[i]);
            let (v0, v1) = (values[i - 1], values[i]);
            break x0 + (x1 - x0) * (-v0) / (v1 - v0);
        }
        i -= 1;
    };

    let mut i = peak;
    let xr = loop {
        if i == xs.len() - 1 {
            if right_slope >= 0.0 {
                break f64::INFINITY;
            }
            break xs[i] - values[i] / right_slope;
        }
        if values[i + 1] < -EPSILON {
            let (x0, x1) = (xs[i], xs[i + 1]);
            let (v0, v1) = (values[i], values[i + 1]);
            break x0 + (x1 - x0) * v0 / (v0 - v1);
        }
        i += 1;
    };

    Some((xl, xr))
}

impl Polygon {
    /// Polygon from a vertex cycle. Consecutive (and wrap-around)
    /// duplicates are dropped; fewer than three distinct vertices leave
    /// the empty polygon.
    pub fn new(vertices: Vec<Point<f64>>) -> Self {
        let mut cleaned: Vec<Point<f64>> = Vec::with_capacity(vertices.len());
        for vertex in vertices {
            if cleaned.last() != Some(&vertex) {
                cleaned.push(vertex);
            }
        }
        while cleaned.len() > 1 && cleaned.first() == cleaned.last() {
            cleaned.pop();
        }
        if cleaned.len() < 3 {
            cleaned.clear();
        }
        Polygon { vertices: cleaned }
    }

    pub fn empty() -> Self {
        Polygon::default()
    }

    pub fn vertices(&self) -> &[Point<f64>] {
        &self.vertices
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Absolute area by the shoelace formula.
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Twice-signed area is summed edge by edge; positive for
    /// counter-clockwise vertex order.
    fn signed_area(&self) -> f64 {
        let n = self.vertices.len();
        let mut doubled = 0.0;
        for i in 0..n {
            let p = self.vertices[i];
            let q = self.vertices[(i + 1) % n];
            doubled += p.x * q.y - p.y * q.x;
        }
        doubled / 2.0
    }

    /// Sutherland–Hodgman clip against one half-plane: inside vertices
    /// survive, and every boundary crossing inserts the intersection
    /// point.
    pub fn clip(&self, halfplane: &HalfPlane<f64>) -> Polygon {
        if self.is_empty() {
            return Polygon::empty();
        }
        let n = self.vertices.len();
        let mut kept = Vec::with_capacity(n + 2);
        for i in 0..n {
            let current = self.vertices[i];
            let next = self.vertices[(i + 1) % n];
            let current_inside = halfplane.contains_point(current);
            if current_inside {
                kept.push(current);
            }
            if current_inside != halfplane.contains_point(next) {
                if let LineIntersection::Crossing(crossing) =
                    halfplane.line().intersect(&Line::through(current, next))
                {
                    kept.push(crossing);
                }
            }
        }
        Polygon::new(kept)
    }

    /// Split by a line into the parts on either side; 0, 1 or 2 polygons
    /// come back (slivers with no area are dropped).
    pub fn split(&self, line: &Line<f64>) -> Vec<Polygon> {
        if self.is_empty() {
            return Vec::new();
        }
        let halfplane = HalfPlane::new(*line, Sign::Positive);
        let n = self.vertices.len();
        let mut kept = Vec::with_capacity(n + 2);
        let mut dropped = Vec::with_capacity(n + 2);
        for i in 0..n {
            let current = self.vertices[i];
            let next = self.vertices[(i + 1) % n];
            let current_inside = halfplane.contains_point(current);
            if current_inside {
                kept.push(current);
            } else {
                dropped.push(current);
            }
            if current_inside != halfplane.contains_point(next) {
                if let LineIntersection::Crossing(crossing) =
                    line.intersect(&Line::through(current, next))
                {
                    kept.push(crossing);
                    dropped.push(crossing);
                }
            }
        }
        [kept, dropped]
            .into_iter()
            .map(Polygon::new)
            .filter(|polygon| !polygon.is_empty())
            .collect()
    }

    /// The convex polygon bounding the intersection of `planes`.
    ///
    /// Half-planes are split by orientation: upward-facing ones bound the
    /// polygon from below, downward-facing ones from above, and vertical
    /// ones clamp the x-range. Each group is reduced to its binding
    /// envelope (sorted by angle, parallel-dominated planes and bad
    /// triples removed), the two chains are reconnected where they cross
    /// at the left and right ends, and the vertices are read off as the
    /// intersections of consecutive boundaries.
    ///
    /// An unbounded or empty intersection yields the empty polygon.
    pub fn from_halfplanes(planes: &[HalfPlane<f64>]) -> Polygon {
        if planes.len() < 3 {
            return Polygon::empty();
        }

        let mut lower_lines = Vec::new();
        let mut upper_lines = Vec::new();
        let mut x_lo = f64::NEG_INFINITY;
        let mut x_hi = f64::INFINITY;
        for plane in planes {
            let (nx, ny, offset) = plane.normalized();
            if ny.abs() <= EPSILON {
                let bound = -offset / nx;
                if nx > 0.0 {
                    x_lo = x_lo.max(bound);
                } else {
                    x_hi = x_hi.min(bound);
                }
            } else {
                let chain_line = ChainLine {
                    slope: -nx / ny,
                    intercept: -offset / ny,
                };
                if ny > 0.0 {
                    lower_lines.push(chain_line);
                } else {
                    upper_lines.push(chain_line);
                }
            }
        }
        if lower_lines.is_empty() || upper_lines.is_empty() {
            return Polygon::empty(); // open vertically, never a polygon
        }

        let lower = Envelope::max_of(lower_lines);
        let upper = Envelope::min_of(upper_lines);

        let Some((xl, xr)) = feasible_interval(&lower, &upper) else {
            return Polygon::empty();
        };
        let xl = xl.max(x_lo);
        let xr = xr.min(x_hi);
        if !xl.is_finite() || !xr.is_finite() || xr - xl <= EPSILON {
            return Polygon::empty();
        }

        let mut vertices = Vec::new();
        vertices.push(Point::new(xl, lower.at(xl)));
        for (i, &x) in lower.breaks.iter().enumerate() {
            if x > xl + EPSILON && x < xr - EPSILON {
                vertices.push(Point::new(x, lower.lines[i].at(x)));
            }
        }
        vertices.push(Point::new(xr, lower.at(xr)));
        vertices.push(Point::new(xr, upper.at(xr)));
        for (i, &x) in upper.breaks.iter().enumerate().rev() {
            if x > xl + EPSILON && x < xr - EPSILON {
                vertices.push(Point::new(x, upper.lines[i].at(x)));
            }
        }
        vertices.push(Point::new(xl, upper.at(xl)));

        Polygon::new(vertices)
    }
}
