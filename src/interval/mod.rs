//! Range query structures: a lazy segment tree with composable operations
//! and a persistent segment tree for order statistics on ranges.

mod persistent;
mod segment_tree;

pub use persistent::{CoordCompressor, KthStatistics};
pub use segment_tree::SegmentTree;
