//! Capacitated flow networks.
//!
//! [`FlowNetwork`] stores a directed multigraph where every edge is
//! paired with its residual twin: adding an edge appends the forward copy
//! to one adjacency list and the zero-capacity (or, for undirected edges,
//! full-capacity) reverse copy to the other, each remembering the
//! position of its twin. All algorithms work purely on those index pairs,
//! so adjacency lists may grow without invalidating anything.
//!
//! On top of the core sit Dinic's maximum flow, three min-cost-max-flow
//! strategies ([`min_cost`](FlowNetwork::reduce_cost_max_flow) docs), the
//! randomised Karger minimum cut, and the classic reductions in
//! [`reductions`].

use fixedbitset::FixedBitSet;

mod karger;
mod min_cost;
pub mod reductions;

pub use karger::recommended_trials;

/// A directed edge with its bookkeeping. Instances always come in twin
/// pairs; `flow` on an edge is the negation of `flow` on its twin.
#[derive(Clone, Debug)]
pub struct FlowEdge {
    /// Target node.
    to: usize,
    /// Position of the twin edge inside `to`'s adjacency list.
    rev: usize,
    capacity: i64,
    cost: i64,
    flow: i64,
    /// External edge id; the reverse copy carries the negation. Zero on
    /// no edge (ids start at one).
    index: i64,
}

impl FlowEdge {
    pub fn to(&self) -> usize {
        self.to
    }

    pub fn capacity(&self) -> i64 {
        self.capacity
    }

    pub fn cost(&self) -> i64 {
        self.cost
    }

    pub fn flow(&self) -> i64 {
        self.flow
    }

    /// External id assigned at insertion, counted from one; negative on
    /// the reverse copy.
    pub fn index(&self) -> i64 {
        self.index
    }

    pub fn residual(&self) -> i64 {
        self.capacity - self.flow
    }
}

#[derive(Clone, Debug, Default)]
struct FlowNode {
    edges: Vec<FlowEdge>,
    /// BFS distance from the source; `usize::MAX` when unreached.
    depth: usize,
    /// First edge not yet exhausted by the blocking-flow DFS.
    cursor: usize,
}

/// A flow network with designated source and sink.
///
/// # Example
/// ```rust
/// use algokit::flow::FlowNetwork;
///
/// let mut network = FlowNetwork::new(4);
/// network.set_source(0);
/// network.set_sink(3);
/// network.add_directed_edge(0, 1, 3, 0);
/// network.add_directed_edge(0, 2, 2, 0);
/// network.add_directed_edge(1, 3, 2, 0);
/// network.add_directed_edge(2, 3, 3, 0);
/// network.add_directed_edge(1, 2, 5, 0);
/// assert_eq!(network.max_flow_dinic(), 5);
/// ```
#[derive(Clone, Debug, Default)]
pub struct FlowNetwork {
    nodes: Vec<FlowNode>,
    source: usize,
    sink: usize,
    last_edge_index: i64,
}

impl FlowNetwork {
    pub fn new(node_count: usize) -> Self {
        FlowNetwork {
            nodes: vec![FlowNode::default(); node_count],
            source: 0,
            sink: 0,
            last_edge_index: 0,
        }
    }

    pub fn add_node(&mut self) {
        self.nodes.push(FlowNode::default());
    }

    pub fn add_nodes(&mut self, count: usize) {
        for _ in 0..count {
            self.add_node();
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn set_source(&mut self, source: usize) {
        self.source = source;
    }

    pub fn set_sink(&mut self, sink: usize) {
        self.sink = sink;
    }

    pub fn source(&self) -> usize {
        self.source
    }

    pub fn sink(&self) -> usize {
        self.sink
    }

    /// Edges leaving `node`, twin copies included.
    pub fn edges_from(&self, node: usize) -> impl Iterator<Item = &FlowEdge> {
        self.nodes[node].edges.iter()
    }

    /// Add a directed edge of the given capacity and cost. Self-loops and
    /// zero-capacity edges are silently ignored.
    pub fn add_directed_edge(&mut self, from: usize, to: usize, capacity: i64, cost: i64) {
        self.add_directed_edge_with_flow(from, to, capacity, cost, 0);
    }

    /// Like [`add_directed_edge`](Self::add_directed_edge), but pre-loads
    /// `flow` units onto the edge pair (forward `+flow`, reverse
    /// `-flow`). Callers are responsible for the pre-load being a
    /// feasible flow overall.
    pub fn add_directed_edge_with_flow(
        &mut self,
        from: usize,
        to: usize,
        capacity: i64,
        cost: i64,
        flow: i64,
    ) {
        if from == to || capacity == 0 {
            return;
        }
        self.add_edge_pair(from, to, capacity, 0, cost, flow);
    }

    /// Add an undirected edge: both twin copies get the full capacity, so
    /// the edge may carry flow either way.
    pub fn add_undirected_edge(&mut self, from: usize, to: usize, capacity: i64, cost: i64) {
        if from == to || capacity == 0 {
            return;
        }
        self.add_edge_pair(from, to, capacity, capacity, cost, 0);
    }

    fn add_edge_pair(
        &mut self,
        from: usize,
        to: usize,
        capacity: i64,
        reverse_capacity: i64,
        cost: i64,
        flow: i64,
    ) {
        self.last_edge_index += 1;
        let index = self.last_edge_index;
        self.push_edge_pair(from, to, capacity, reverse_capacity, cost, flow, index);
    }

    /// Raw twin insertion with a caller-chosen external id; Karger's
    /// contraction uses this to re-attach surviving edges under their
    /// original ids.
    pub(crate) fn push_edge_pair(
        &mut self,
        from: usize,
        to: usize,
        capacity: i64,
        reverse_capacity: i64,
        cost: i64,
        flow: i64,
        index: i64,
    ) {
        let forward_pos = self.nodes[from].edges.len();
        let reverse_pos = self.nodes[to].edges.len();
        self.nodes[from].edges.push(FlowEdge {
            to,
            rev: reverse_pos,
            capacity,
            cost,
            flow,
            index,
        });
        self.nodes[to].edges.push(FlowEdge {
            to: from,
            rev: forward_pos,
            capacity: reverse_capacity,
            cost: -cost,
            flow: -flow,
            index: -index,
        });
    }

    /// Maximum s-t flow by Dinic's algorithm: BFS depth labelling, then
    /// blocking flow by cursor-driven DFS, repeated until the sink falls
    /// out of reach.
    ///
    /// # Complexity
    /// * Time complexity: **O(|V|² |E|)** in general, **O(|E| √|V|)** on
    ///   unit networks.
    pub fn max_flow_dinic(&mut self) -> i64 {
        assert_ne!(self.source, self.sink, "source and sink must differ");
        let mut max_flow = 0;
        while self.measure_depths() {
            for node in &mut self.nodes {
                node.cursor = 0;
            }
            loop {
                let pushed = self.push_level_path();
                if pushed == 0 {
                    break;
                }
                debug_assert!(pushed > 0);
                max_flow += pushed;
            }
        }
        debug_assert!(self.twins_are_antisymmetric());
        max_flow
    }

    /// BFS from the source over edges with positive residual, labelling
    /// depths. True when the sink is reachable.
    fn measure_depths(&mut self) -> bool {
        for node in &mut self.nodes {
            node.depth = usize::MAX;
        }
        self.nodes[self.source].depth = 0;

        let mut queue = std::collections::VecDeque::with_capacity(self.nodes.len());
        queue.push_back(self.source);
        while let Some(u) = queue.pop_front() {
            let depth = self.nodes[u].depth;
            for i in 0..self.nodes[u].edges.len() {
                let (to, residual) = {
                    let edge = &self.nodes[u].edges[i];
                    (edge.to, edge.residual())
                };
                if residual > 0 && self.nodes[to].depth == usize::MAX {
                    self.nodes[to].depth = depth + 1;
                    queue.push_back(to);
                }
            }
        }
        self.nodes[self.sink].depth != usize::MAX
    }

    /// One augmenting path inside the current level graph, found by DFS
    /// that advances each node's cursor past exhausted edges (the cursor
    /// is what gives the blocking-flow phase its amortised bound).
    /// Returns the bottleneck pushed, zero when the level graph is dry.
    fn push_level_path(&mut self) -> i64 {
        let mut path: Vec<(usize, usize)> = Vec::new();
        let mut u = self.source;
        loop {
            if u == self.sink {
                let mut bottleneck = i64::MAX;
                for &(node, i) in &path {
                    bottleneck = bottleneck.min(self.nodes[node].edges[i].residual());
                }
                debug_assert!(bottleneck > 0);
                for &(node, i) in &path {
                    self.apply_flow(node, i, bottleneck);
                }
                return bottleneck;
            }

            let depth = self.nodes[u].depth;
            let mut advanced = false;
            while self.nodes[u].cursor < self.nodes[u].edges.len() {
                let i = self.nodes[u].cursor;
                let (to, residual) = {
                    let edge = &self.nodes[u].edges[i];
                    (edge.to, edge.residual())
                };
                if residual > 0 && self.nodes[to].depth == depth + 1 {
                    path.push((u, i));
                    u = to;
                    advanced = true;
                    break;
                }
                self.nodes[u].cursor += 1;
            }
            if !advanced {
                match path.pop() {
                    Some((parent, _)) => {
                        // the edge that led here is a dead end now
                        self.nodes[parent].cursor += 1;
                        u = parent;
                    }
                    None => return 0,
                }
            }
        }
    }

    /// Push `amount` along edge `i` of `node` and pull it back on the
    /// twin.
    pub(crate) fn apply_flow(&mut self, node: usize, i: usize, amount: i64) {
        let (to, rev) = {
            let edge = &self.nodes[node].edges[i];
            (edge.to, edge.rev)
        };
        self.nodes[node].edges[i].flow += amount;
        self.nodes[to].edges[rev].flow -= amount;
        debug_assert!(self.nodes[node].edges[i].flow <= self.nodes[node].edges[i].capacity);
    }

    /// Total cost of the current flow. Every inserted edge is counted
    /// once, on its positive-id copy; the twin would double it for
    /// undirected edges, where both copies carry capacity. The flow sign
    /// is kept, so flow running against an undirected edge's insertion
    /// direction is priced at the negated cost, exactly the arc cost the
    /// shortest-path engines optimised with.
    pub fn flow_cost(&self) -> i64 {
        let mut cost = 0;
        for node in &self.nodes {
            for edge in &node.edges {
                if edge.index > 0 && edge.flow != 0 {
                    cost += edge.cost * edge.flow;
                }
            }
        }
        cost
    }

    /// Net flow leaving the source.
    pub fn flow_value(&self) -> i64 {
        self.nodes[self.source].edges.iter().map(|edge| edge.flow).sum()
    }

    /// Flow on the edge with external id `index` (in its original
    /// direction), or `None` for an unknown id.
    pub fn edge_flow(&self, index: usize) -> Option<i64> {
        let target = index as i64;
        self.nodes
            .iter()
            .flat_map(|node| node.edges.iter())
            .find(|edge| edge.index == target)
            .map(|edge| edge.flow)
    }

    /// Some node other than source and sink that `from` currently sends
    /// flow towards; the witness walk used by the reductions.
    pub fn flow_successor(&self, from: usize) -> Option<usize> {
        self.nodes[from]
            .edges
            .iter()
            .find(|edge| edge.flow != 0 && edge.to != self.source && edge.to != self.sink)
            .map(|edge| edge.to)
    }

    /// DFS reachability over positive-residual edges.
    pub(crate) fn has_residual_path(&self, from: usize, to: usize) -> bool {
        let mut visited = FixedBitSet::with_capacity(self.nodes.len());
        let mut stack = vec![from];
        visited.insert(from);
        while let Some(u) = stack.pop() {
            if u == to {
                return true;
            }
            for edge in &self.nodes[u].edges {
                if edge.residual() > 0 && !visited.contains(edge.to) {
                    visited.insert(edge.to);
                    stack.push(edge.to);
                }
            }
        }
        false
    }

    /// Minimum s-t cut: runs Dinic, then classifies by BFS over the
    /// residual graph. The cut is the set of saturated edges leaving the
    /// source side. Returns the cut value and the external edge ids,
    /// ascending.
    pub fn min_cut_dinic(&mut self) -> (i64, Vec<usize>) {
        let value = self.max_flow_dinic();

        let mut source_side = FixedBitSet::with_capacity(self.nodes.len());
        let mut stack = vec![self.source];
        source_side.insert(self.source);
        while let Some(u) = stack.pop() {
            for edge in &self.nodes[u].edges {
                if edge.residual() > 0 && !source_side.contains(edge.to) {
                    source_side.insert(edge.to);
                    stack.push(edge.to);
                }
            }
        }

        let mut cut = Vec::new();
        for u in source_side.ones() {
            for edge in &self.nodes[u].edges {
                if !source_side.contains(edge.to) && edge.index != 0 {
                    cut.push(edge.index.unsigned_abs() as usize);
                }
            }
        }
        cut.sort_unstable();
        cut.dedup();
        (value, cut)
    }

    /// Extract `count` edge-disjoint s-t paths from the current flow by
    /// repeatedly walking positive-flow edges and draining a unit off
    /// each; `None` when the flow value is smaller than `count`.
    ///
    /// Meant for unit-capacity networks, where max flow ≥ k certifies k
    /// disjoint paths.
    pub fn extract_disjoint_paths(&mut self, count: usize) -> Option<Vec<Vec<usize>>> {
        if self.flow_value() < count as i64 {
            return None;
        }
        let mut paths = Vec::with_capacity(count);
        for _ in 0..count {
            let mut path = vec![self.source];
            let mut u = self.source;
            while u != self.sink {
                let (i, to) = self.nodes[u]
                    .edges
                    .iter()
                    .enumerate()
                    .find(|(_, edge)| edge.capacity > 0 && edge.flow > 0)
                    .map(|(i, edge)| (i, edge.to))
                    .expect("flow conservation guarantees an outgoing unit");
                self.apply_flow(u, i, -1);
                u = to;
                path.push(u);
            }
            paths.push(path);
        }
        Some(paths)
    }

    /// Audit the twin invariants: antisymmetric flows, flows within
    /// capacity, and conservation at every non-terminal node.
    pub fn verify_invariants(&self) {
        assert!(self.twins_are_antisymmetric());
        for (u, node) in self.nodes.iter().enumerate() {
            let net: i64 = node.edges.iter().map(|edge| edge.flow).sum();
            for edge in &node.edges {
                assert!(edge.flow <= edge.capacity, "edge {u}->{} over capacity", edge.to);
            }
            if u != self.source && u != self.sink {
                assert_eq!(net, 0, "conservation violated at node {u}");
            }
        }
    }

    fn twins_are_antisymmetric(&self) -> bool {
        self.nodes.iter().all(|node| {
            node.edges
                .iter()
                .all(|edge| edge.flow == -self.nodes[edge.to].edges[edge.rev].flow)
        })
    }
}
