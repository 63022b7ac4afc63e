use crate::{BoundedMeasure, Measure};

#[derive(Clone)]
struct Node<T> {
    value: T,
    /// Update amount the subtree has not absorbed yet.
    pending: T,
    /// Set when `value` was overwritten by an assignment the children have
    /// not seen; assignment dominates any accumulated `pending`.
    assigned: bool,
    /// Leaf range this node is responsible for, inclusive.
    left: usize,
    right: usize,
}

/// A segment tree with lazy propagation, generic over two operations:
///
/// * the *query* operation: associative, commutative and idempotent
///   (e.g. min, max), with its identity;
/// * the *update* operation: associative and commutative (e.g. addition),
///   with its identity.
///
/// Range assignment is supported besides range update; a pending
/// assignment overrides any pending update below it.
///
/// The leaf count is rounded up to a power of two and padded with the
/// query identity.
///
/// # Example
/// ```rust
/// use algokit::interval::SegmentTree;
///
/// let mut tree = SegmentTree::range_min_add(&[5, 2, 8, 4]);
/// assert_eq!(tree.query(0, 3), 2);
/// tree.update(1, 2, 10);     // add 10 to elements 1..=2
/// assert_eq!(tree.query(0, 3), 4);
/// tree.assign(0, 1, 3);      // set elements 0..=1 to 3
/// assert_eq!(tree.query(0, 2), 3);
/// ```
pub struct SegmentTree<T, Q, U>
where
    Q: Fn(&T, &T) -> T,
    U: Fn(&T, &T) -> T,
{
    tree: Vec<Node<T>>,
    query_op: Q,
    query_identity: T,
    update_op: U,
    update_identity: T,
}

impl<T: BoundedMeasure + Ord> SegmentTree<T, fn(&T, &T) -> T, fn(&T, &T) -> T> {
    /// The classic combination: range minimum query with range addition,
    /// for any bounded integer measure (the bound supplies the query
    /// identity, the default value the update identity).
    pub fn range_min_add(elements: &[T]) -> Self {
        fn min<T: Measure + Ord>(a: &T, b: &T) -> T {
            a.clone().min(b.clone())
        }
        fn add<T: Measure>(a: &T, b: &T) -> T {
            a.clone() + b.clone()
        }
        SegmentTree::new(
            elements,
            min::<T> as fn(&T, &T) -> T,
            <T as BoundedMeasure>::max(),
            add::<T> as fn(&T, &T) -> T,
            T::default(),
        )
    }
}

impl<T, Q, U> SegmentTree<T, Q, U>
where
    T: Measure,
    Q: Fn(&T, &T) -> T,
    U: Fn(&T, &T) -> T,
{
    /// Build a tree over `elements` with the given operation pair.
    ///
    /// # Complexity
    /// * Time complexity: **O(n)**.
    /// * Auxiliary space: **O(n)**.
    pub fn new(elements: &[T], query_op: Q, query_identity: T, update_op: U, update_identity: T) -> Self {
        assert!(!elements.is_empty(), "segment tree over an empty array");
        let leaves = elements.len().next_power_of_two();
        let mut tree = vec![
            Node {
                value: query_identity.clone(),
                pending: update_identity.clone(),
                assigned: false,
                left: 0,
                right: 0,
            };
            2 * leaves
        ];
        for (i, element) in elements.iter().enumerate() {
            tree[leaves + i].value = element.clone();
        }
        for i in leaves..2 * leaves {
            tree[i].left = i - leaves;
            tree[i].right = i - leaves;
        }
        for i in (1..leaves).rev() {
            tree[i].value = query_op(&tree[2 * i].value, &tree[2 * i + 1].value);
            tree[i].left = tree[2 * i].left;
            tree[i].right = tree[2 * i + 1].right;
        }
        SegmentTree {
            tree,
            query_op,
            query_identity,
            update_op,
            update_identity,
        }
    }

    /// Query over the inclusive element range `l..=r` (either order).
    ///
    /// # Complexity
    /// * Time complexity: **O(log n)**.
    pub fn query(&mut self, l: usize, r: usize) -> T {
        let (l, r) = if l <= r { (l, r) } else { (r, l) };
        self.query_node(1, l, r)
    }

    /// Apply the update operation with `value` to every element in
    /// `l..=r` (either order).
    pub fn update(&mut self, l: usize, r: usize, value: T) {
        let (l, r) = if l <= r { (l, r) } else { (r, l) };
        self.update_node(1, l, r, &value);
    }

    /// Assign `value` to every element in `l..=r` (either order).
    pub fn assign(&mut self, l: usize, r: usize, value: T) {
        let (l, r) = if l <= r { (l, r) } else { (r, l) };
        self.assign_node(1, l, r, &value);
    }

    /// Push the node's deferred state down to its children.
    ///
    /// An `assigned` node overwrites the children wholesale: value,
    /// pending and flag; otherwise the pending update is merged into each
    /// child's pending.
    fn push_down(&mut self, node: usize) {
        if self.tree[node].assigned {
            for child in [2 * node, 2 * node + 1] {
                self.tree[child].value = self.tree[node].value.clone();
                self.tree[child].pending = self.tree[node].pending.clone();
                self.tree[child].assigned = true;
            }
            self.tree[node].pending = self.update_identity.clone();
            self.tree[node].assigned = false;
        } else {
            for child in [2 * node, 2 * node + 1] {
                self.tree[child].pending =
                    (self.update_op)(&self.tree[child].pending, &self.tree[node].pending);
            }
            self.tree[node].pending = self.update_identity.clone();
        }
    }

    /// The node's externally-visible aggregate: stored value with its own
    /// pending update applied.
    fn effective(&self, node: usize) -> T {
        (self.update_op)(&self.tree[node].value, &self.tree[node].pending)
    }

    fn refresh(&mut self, node: usize) {
        let left = self.effective(2 * node);
        let right = self.effective(2 * node + 1);
        self.tree[node].value = (self.query_op)(&left, &right);
    }

    fn query_node(&mut self, node: usize, from: usize, to: usize) -> T {
        let (l, r) = (self.tree[node].left, self.tree[node].right);
        if to < l || r < from {
            return self.query_identity.clone();
        }
        if from <= l && r <= to {
            return self.effective(node);
        }
        self.push_down(node);
        let left = self.query_node(2 * node, from, to);
        let right = self.query_node(2 * node + 1, from, to);
        self.refresh(node);
        (self.query_op)(&left, &right)
    }

    fn update_node(&mut self, node: usize, from: usize, to: usize, value: &T) {
        let (l, r) = (self.tree[node].left, self.tree[node].right);
        if to < l || r < from {
            return;
        }
        if from <= l && r <= to {
            self.tree[node].pending = (self.update_op)(&self.tree[node].pending, value);
            return;
        }
        self.push_down(node);
        self.update_node(2 * node, from, to, value);
        self.update_node(2 * node + 1, from, to, value);
        self.refresh(node);
    }

    fn assign_node(&mut self, node: usize, from: usize, to: usize, value: &T) {
        let (l, r) = (self.tree[node].left, self.tree[node].right);
        if to < l || r < from {
            return;
        }
        if from <= l && r <= to {
            self.tree[node].pending = self.update_identity.clone();
            self.tree[node].value = value.clone();
            self.tree[node].assigned = true;
            return;
        }
        self.push_down(node);
        self.assign_node(2 * node, from, to, value);
        self.assign_node(2 * node + 1, from, to, value);
        self.refresh(node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_queries() {
        let mut tree = SegmentTree::range_min_add(&[3, 1, 4, 1, 5, 9, 2, 6]);
        assert_eq!(tree.query(0, 7), 1);
        assert_eq!(tree.query(4, 6), 2);
        assert_eq!(tree.query(5, 5), 9);
        assert_eq!(tree.query(6, 4), 2); // endpoints in either order
    }

    #[test]
    fn additive_updates() {
        let mut tree = SegmentTree::range_min_add(&[5, 5, 5, 5]);
        tree.update(1, 2, -3);
        assert_eq!(tree.query(0, 3), 2);
        assert_eq!(tree.query(0, 0), 5);
        tree.update(0, 3, 10);
        assert_eq!(tree.query(0, 3), 12);
    }

    #[test]
    fn assignment_dominates_pending() {
        let mut tree = SegmentTree::range_min_add(&[0, 0, 0, 0]);
        tree.update(0, 3, 7); // pending +7 at the root
        tree.assign(0, 1, 1); // forces the push-down first
        assert_eq!(tree.query(0, 1), 1);
        assert_eq!(tree.query(2, 3), 7);
        tree.update(0, 3, 2);
        assert_eq!(tree.query(0, 1), 3);
        assert_eq!(tree.query(2, 3), 9);
    }

    #[test]
    fn padding_stays_neutral() {
        // three elements pad to four leaves; the phantom leaf must never
        // win a min query
        let mut tree = SegmentTree::range_min_add(&[7, 8, 9]);
        assert_eq!(tree.query(0, 2), 7);
        tree.update(0, 2, -1);
        assert_eq!(tree.query(0, 2), 6);
    }

    #[test]
    fn max_with_addition() {
        let mut tree = SegmentTree::new(
            &[1i64, 6, 3, 8],
            |a: &i64, b: &i64| *a.max(b),
            i64::MIN,
            |a: &i64, b: &i64| a + b,
            0,
        );
        assert_eq!(tree.query(0, 3), 8);
        tree.assign(3, 3, 0);
        assert_eq!(tree.query(0, 3), 6);
        tree.update(0, 0, 10);
        assert_eq!(tree.query(0, 3), 11);
    }
}
