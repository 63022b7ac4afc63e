//! **algokit** is a library of self-contained algorithm engines.
//!
//! Each engine owns its interior storage and exposes a small, index-based
//! API; no engine performs I/O or keeps process-wide state, so independent
//! instances can live side by side.
//!
//! The engines:
//!
//! * [`flow`]: capacitated networks with Dinic maximum flow, three
//!   min-cost-max-flow strategies, Karger's randomised minimum cut and the
//!   classic reductions (assignment, scheduling, disjoint paths).
//! * [`string`]: suffix arrays (prefix doubling + Kasai) and online
//!   Ukkonen suffix trees, convertible into each other.
//! * [`fft`]: iterative Cooley–Tukey transform with convolution,
//!   correlation and exact/fuzzy substring search on top.
//! * [`interval`]: a lazy segment tree with composable operations and a
//!   persistent segment tree answering k-th order statistics on ranges.
//! * [`geometry`]: points, lines, circles, half-planes and convex
//!   polygons over integer or floating coordinates.
//! * [`numeric`]: modular arithmetic, primality testing and discrete
//!   logarithms/roots.

pub mod fft;
pub mod flow;
pub mod geometry;
pub mod interval;
pub mod numeric;
pub mod string;

mod measure;

pub use crate::measure::{BoundedMeasure, FloatMeasure, Measure, PositiveMeasure};
