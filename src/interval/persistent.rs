use crate::Measure;

/// Coordinate compression: a sorted, deduplicated copy of the value
/// universe, mapping values to dense indices and back.
pub struct CoordCompressor<T> {
    values: Vec<T>,
}

impl<T: Measure + Ord + Copy> CoordCompressor<T> {
    pub fn new(values: &[T]) -> Self {
        let mut values = values.to_vec();
        values.sort_unstable();
        values.dedup();
        CoordCompressor { values }
    }

    /// Dense index of `value`. The value must be part of the universe the
    /// compressor was built over.
    pub fn compress(&self, value: T) -> usize {
        self.values
            .binary_search(&value)
            .expect("value outside the compressed universe")
    }

    /// The value behind a dense index.
    pub fn decompress(&self, index: usize) -> T {
        self.values[index]
    }

    /// Number of distinct values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[derive(Clone, Copy)]
struct PoolNode {
    /// Children as pool indices; 0 marks a leaf (the skeleton root can
    /// never be a child).
    left: usize,
    right: usize,
    sum: u64,
}

/// K-th order statistic on a range, answered by a persistent segment tree
/// over compressed coordinates.
///
/// Version `i` of the tree counts the values among the first `i` elements
/// of the sequence; nodes are append-only, each insertion allocating one
/// path of O(log n) nodes that shares every unaffected subtree with the
/// previous version. A query on `[l, r]` walks two versions at once and
/// subtracts their counts.
///
/// # Example
/// ```rust
/// use algokit::interval::KthStatistics;
///
/// let tree = KthStatistics::new(&[1, 5, 2, 6, 3, 7, 4]);
/// assert_eq!(tree.kth(3, 2, 5), 5); // 3rd smallest of [5, 2, 6, 3]
/// assert_eq!(tree.kth(1, 4, 4), 6);
/// ```
pub struct KthStatistics<T> {
    compressor: CoordCompressor<T>,
    nodes: Vec<PoolNode>,
    /// `roots[i]` is the tree version after `i` insertions.
    roots: Vec<usize>,
    /// Leaf count of every version, a power of two.
    size: usize,
}

impl<T: Measure + Ord + Copy> KthStatistics<T> {
    /// Index `elements` for order-statistic queries.
    ///
    /// # Complexity
    /// * Time complexity: **O(n log n)**.
    /// * Auxiliary space: **O(n log n)** pool nodes.
    pub fn new(elements: &[T]) -> Self {
        assert!(!elements.is_empty(), "order statistics over an empty array");
        let compressor = CoordCompressor::new(elements);
        let size = compressor.len().next_power_of_two();

        // version zero: a complete all-zero tree in heap layout
        let mut nodes = Vec::with_capacity(2 * size - 1 + elements.len());
        for i in 0..size - 1 {
            nodes.push(PoolNode {
                left: 2 * i + 1,
                right: 2 * i + 2,
                sum: 0,
            });
        }
        for _ in 0..size {
            nodes.push(PoolNode {
                left: 0,
                right: 0,
                sum: 0,
            });
        }

        let mut tree = KthStatistics {
            compressor,
            nodes,
            roots: vec![0],
            size,
        };
        for &element in elements {
            let slot = tree.compressor.compress(element);
            tree.insert(slot);
        }
        debug_assert_eq!(tree.root_sum(elements.len()), elements.len() as u64);
        tree
    }

    /// Number of stored versions, including the empty version zero.
    pub fn version_count(&self) -> usize {
        self.roots.len()
    }

    /// Total element count in version `version`; always equals `version`.
    pub fn root_sum(&self, version: usize) -> u64 {
        self.nodes[self.roots[version]].sum
    }

    /// The k-th smallest value among elements `l..=r` of the original
    /// sequence, with `k`, `l` and `r` all 1-based and `k` no larger than
    /// the range length.
    ///
    /// Descends the version-`r` and version-`l-1` trees in lockstep: the
    /// element count of any value range is the difference of the two
    /// nodes' sums, which steers the walk left or right.
    ///
    /// # Complexity
    /// * Time complexity: **O(log n)**.
    pub fn kth(&self, k: usize, l: usize, r: usize) -> T {
        assert!(l >= 1 && l <= r && r < self.roots.len(), "bad query range");
        assert!(k >= 1 && k <= r - l + 1, "statistic order out of range");
        let mut below = self.roots[l - 1];
        let mut upto = self.roots[r];
        let mut k = k as u64;
        let mut slot = 0usize;
        let mut level_size = self.size / 2;
        while self.nodes[below].left != 0 {
            let in_left =
                self.nodes[self.nodes[upto].left].sum - self.nodes[self.nodes[below].left].sum;
            if k <= in_left {
                below = self.nodes[below].left;
                upto = self.nodes[upto].left;
            } else {
                slot += level_size;
                k -= in_left;
                below = self.nodes[below].right;
                upto = self.nodes[upto].right;
            }
            level_size /= 2;
        }
        debug_assert!(k <= self.nodes[upto].sum - self.nodes[below].sum);
        self.compressor.decompress(slot)
    }

    /// Create the next version with one more element at compressed index
    /// `slot`: a fresh root-to-leaf path whose off-path children reuse the
    /// previous version's subtrees.
    fn insert(&mut self, slot: usize) {
        let mut current = *self.roots.last().expect("version zero always exists");
        self.roots.push(self.nodes.len());
        let mut border = self.size / 2;
        let mut step = border / 2;
        while self.nodes[current].left != 0 {
            let sum = self.nodes[current].sum + 1;
            if slot < border {
                let fresh = PoolNode {
                    left: self.nodes.len() + 1,
                    right: self.nodes[current].right,
                    sum,
                };
                self.nodes.push(fresh);
                border -= step;
                current = self.nodes[current].left;
            } else {
                let fresh = PoolNode {
                    left: self.nodes[current].left,
                    right: self.nodes.len() + 1,
                    sum,
                };
                self.nodes.push(fresh);
                border += step;
                current = self.nodes[current].right;
            }
            step /= 2;
        }
        self.nodes.push(PoolNode {
            left: 0,
            right: 0,
            sum: self.nodes[current].sum + 1,
        });
    }
}
