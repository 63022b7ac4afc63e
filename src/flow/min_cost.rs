//! Minimum-cost flow strategies on top of [`FlowNetwork`]: negative-cycle
//! cancellation for an existing flow, and two successive-shortest-path
//! engines (Bellman–Ford and Dijkstra with Johnson potentials).

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use fixedbitset::FixedBitSet;

use crate::flow::FlowNetwork;

/// `MinScored` holds a score and a node in a pair ordered by *reverse*
/// score, so a `BinaryHeap` of them pops the least score first.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct MinScored(i64, usize);

impl PartialOrd for MinScored {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MinScored {
    fn cmp(&self, other: &Self) -> Ordering {
        other.0.cmp(&self.0).then_with(|| other.1.cmp(&self.1))
    }
}

impl FlowNetwork {
    /// Lower the cost of the *current* flow (typically a fresh maximum
    /// flow) by cancelling negative-cost cycles in the residual graph
    /// until none remain. Returns the resulting total cost.
    ///
    /// Cycle detection is Bellman–Ford started from distance zero
    /// everywhere, the moral equivalent of a super-source wired to every
    /// node, so cycles are found anywhere in the graph and not only near
    /// the real source. A relaxation surviving into the n-th phase
    /// betrays a cycle; walking n-1 parent hops from it is guaranteed to
    /// land on the cycle itself, which is then traced and saturated by
    /// its bottleneck.
    pub fn reduce_cost_max_flow(&mut self) -> i64 {
        self.cancel_negative_cycles(None)
    }

    /// Like [`reduce_cost_max_flow`](Self::reduce_cost_max_flow), but
    /// stops after at most `cancellations` cycles. One bounded step is
    /// how a candidate flow is tested for optimality: if the cost drops,
    /// the candidate was sub-optimal and the new flow is a witness.
    pub fn reduce_cost_max_flow_bounded(&mut self, cancellations: usize) -> i64 {
        self.cancel_negative_cycles(Some(cancellations))
    }

    fn cancel_negative_cycles(&mut self, limit: Option<usize>) -> i64 {
        let n = self.nodes.len();
        let mut remaining = limit;
        loop {
            let mut dist = vec![0i64; n];
            let mut parents = vec![(0usize, 0usize); n];
            let mut last_relaxed = None;

            for _phase in 0..n {
                let mut changed = false;
                last_relaxed = None;
                for u in 0..n {
                    for i in 0..self.nodes[u].edges.len() {
                        let edge = &self.nodes[u].edges[i];
                        if edge.residual() <= 0 {
                            continue;
                        }
                        // with a cycle spinning, distances dive towards
                        // -inf at a rate of one cycle weight per phase;
                        // saturate instead of wrapping
                        let candidate = dist[u].saturating_add(edge.cost);
                        if dist[edge.to] > candidate {
                            dist[edge.to] = candidate;
                            parents[edge.to] = (u, i);
                            changed = true;
                            last_relaxed = Some(edge.to);
                        }
                    }
                }
                if !changed {
                    break;
                }
            }

            let Some(relaxed) = last_relaxed else {
                return self.flow_cost();
            };

            let mut on_cycle = relaxed;
            for _ in 1..n {
                on_cycle = parents[on_cycle].0;
            }

            let mut bottleneck = i64::MAX;
            let mut current = on_cycle;
            loop {
                let (parent, i) = parents[current];
                bottleneck = bottleneck.min(self.nodes[parent].edges[i].residual());
                current = parent;
                if current == on_cycle {
                    break;
                }
            }
            debug_assert!(bottleneck > 0);

            let mut current = on_cycle;
            loop {
                let (parent, i) = parents[current];
                self.apply_flow(parent, i, bottleneck);
                current = parent;
                if current == on_cycle {
                    break;
                }
            }

            if let Some(k) = remaining.as_mut() {
                *k -= 1;
                if *k == 0 {
                    return self.flow_cost();
                }
            }
        }
    }

    /// Minimum-cost maximum flow by successive shortest paths, one
    /// Bellman–Ford per augmentation. Handles negative edge costs as long
    /// as the initial graph has no negative cycle.
    pub fn min_cost_max_flow_bellman_ford(&mut self) -> i64 {
        assert_ne!(self.source, self.sink, "source and sink must differ");
        loop {
            if !self.has_residual_path(self.source, self.sink) {
                return self.flow_cost();
            }
            let (dist, parents) = self.residual_shortest_paths(self.source);
            debug_assert!(dist[self.sink] != i64::MAX);
            self.augment_along(&parents);
        }
    }

    /// Minimum-cost maximum flow by successive shortest paths with
    /// Dijkstra on Johnson-reduced costs.
    ///
    /// Potentials are seeded by one Bellman–Ford pass (a no-op detour
    /// when every cost is already non-negative) and refreshed with the
    /// Dijkstra distances after each augmentation, which keeps every
    /// residual reduced cost `cost(u,v) + h(u) - h(v)` non-negative.
    pub fn min_cost_max_flow_dijkstra(&mut self) -> i64 {
        assert_ne!(self.source, self.sink, "source and sink must differ");
        let n = self.nodes.len();
        let (mut potential, _) = self.residual_shortest_paths(self.source);

        loop {
            let mut dist = vec![i64::MAX; n];
            let mut parents = vec![(0usize, 0usize); n];
            let mut visited = FixedBitSet::with_capacity(n);
            let mut heap = BinaryHeap::new();
            dist[self.source] = 0;
            heap.push(MinScored(0, self.source));

            while let Some(MinScored(d, u)) = heap.pop() {
                if visited.contains(u) {
                    continue;
                }
                visited.insert(u);
                for i in 0..self.nodes[u].edges.len() {
                    let edge = &self.nodes[u].edges[i];
                    let to = edge.to;
                    if edge.residual() <= 0 || potential[to] == i64::MAX {
                        continue;
                    }
                    let reduced = edge.cost + potential[u] - potential[to];
                    debug_assert!(reduced >= 0, "negative reduced cost {reduced}");
                    let candidate = d + reduced;
                    if candidate < dist[to] {
                        dist[to] = candidate;
                        parents[to] = (u, i);
                        heap.push(MinScored(candidate, to));
                    }
                }
            }

            if dist[self.sink] == i64::MAX {
                return self.flow_cost();
            }
            for v in 0..n {
                if dist[v] != i64::MAX && potential[v] != i64::MAX {
                    potential[v] += dist[v];
                }
            }
            self.augment_along(&parents);
        }
    }

    /// Bellman–Ford over the residual graph from `from`; distances and
    /// the parent (node, edge) pairs of the shortest-path tree.
    fn residual_shortest_paths(&self, from: usize) -> (Vec<i64>, Vec<(usize, usize)>) {
        let n = self.nodes.len();
        let mut dist = vec![i64::MAX; n];
        let mut parents = vec![(0usize, 0usize); n];
        dist[from] = 0;

        for _phase in 1..n.max(2) {
            let mut changed = false;
            for u in 0..n {
                if dist[u] == i64::MAX {
                    continue;
                }
                for (i, edge) in self.nodes[u].edges.iter().enumerate() {
                    if edge.residual() <= 0 {
                        continue;
                    }
                    let candidate = dist[u] + edge.cost;
                    if dist[edge.to] > candidate {
                        dist[edge.to] = candidate;
                        parents[edge.to] = (u, i);
                        changed = true;
                    }
                }
            }
            if !changed {
                break;
            }
        }
        (dist, parents)
    }

    /// Push the bottleneck of the tree path sink → source recorded in
    /// `parents`.
    fn augment_along(&mut self, parents: &[(usize, usize)]) {
        let mut bottleneck = i64::MAX;
        let mut current = self.sink;
        while current != self.source {
            let (parent, i) = parents[current];
            bottleneck = bottleneck.min(self.nodes[parent].edges[i].residual());
            current = parent;
        }
        debug_assert!(bottleneck > 0);

        let mut current = self.sink;
        while current != self.source {
            let (parent, i) = parents[current];
            self.apply_flow(parent, i, bottleneck);
            current = parent;
        }
    }
}
