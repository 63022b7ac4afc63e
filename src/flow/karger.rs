//! Karger's randomised minimum cut by edge contraction.
//!
//! Works on undirected networks (costs ignored). Each trial contracts
//! uniformly random edges (never one joining the source and sink
//! supernodes directly) until two supernodes remain; the surviving
//! parallel edges are one cut. The best cut over many trials is returned,
//! with the trial count in the caller's hands.

use rand::Rng;

use crate::flow::FlowNetwork;

/// The trial count heuristic `1000 + n^2 ln n` tuned for a comfortable
/// success probability on contest-sized graphs.
pub fn recommended_trials(node_count: usize) -> usize {
    let n = node_count.max(2) as f64;
    1000 + (n * n * n.ln()).ceil() as usize
}

impl FlowNetwork {
    /// Best cut over `trials` independent contraction experiments:
    /// the cut value and the external ids of the cut edges, ascending.
    ///
    /// The network itself is left untouched; every trial works on a
    /// clone.
    pub fn karger_min_cut<R: Rng + ?Sized>(&self, trials: usize, rng: &mut R) -> (i64, Vec<usize>) {
        let mut best: Option<(i64, Vec<usize>)> = None;
        for _ in 0..trials.max(1) {
            let (value, cut) = self.clone().contract_trial(rng);
            if best.as_ref().map_or(true, |(best_value, _)| value < *best_value) {
                best = Some((value, cut));
            }
        }
        best.expect("at least one trial ran")
    }

    /// One experiment: contract down to two supernodes and read off the
    /// cut between them.
    fn contract_trial<R: Rng + ?Sized>(mut self, rng: &mut R) -> (i64, Vec<usize>) {
        if self.nodes[self.source].edges.is_empty() || self.nodes[self.sink].edges.is_empty() {
            return (0, Vec::new()); // already disconnected
        }
        self.sweep_isolated();

        while self.nodes.len() > 2 {
            let (u, v) = self.random_contractible_edge(rng);
            self.contract_edge(u, v);
            if self.nodes[self.source].edges.is_empty() || self.nodes[self.sink].edges.is_empty() {
                return (0, Vec::new());
            }
            self.sweep_isolated();
        }

        let cut_value = self.nodes[0].edges.iter().map(|edge| edge.capacity).sum();
        let mut cut: Vec<usize> = self.nodes[0]
            .edges
            .iter()
            .map(|edge| edge.index.unsigned_abs() as usize)
            .collect();
        cut.sort_unstable();
        cut.dedup();
        (cut_value, cut)
    }

    /// A uniformly-ish random residual-free pick: a node, then one of its
    /// edges, rejected while it runs directly between source and sink.
    fn random_contractible_edge<R: Rng + ?Sized>(&self, rng: &mut R) -> (usize, usize) {
        loop {
            let node = rng.gen_range(0..self.nodes.len());
            if self.nodes[node].edges.is_empty() {
                continue;
            }
            let i = rng.gen_range(0..self.nodes[node].edges.len());
            let to = self.nodes[node].edges[i].to;
            let terminal_pair = (node == self.source && to == self.sink)
                || (node == self.sink && to == self.source);
            if !terminal_pair {
                return (node, to);
            }
        }
    }

    /// Merge `v` into `u`: every edge of `v` not leading back to `u` is
    /// re-attached as a parallel edge of `u` under its original id, the
    /// twin copies at the peers are removed (repairing the twin indices
    /// the removal shifts), and `v` itself is deleted.
    fn contract_edge(&mut self, u: usize, v: usize) {
        debug_assert!(u != v);
        debug_assert!(!(u == self.source && v == self.sink));
        debug_assert!(!(u == self.sink && v == self.source));

        for i in 0..self.nodes[v].edges.len() {
            // re-read every pass: twin repairs may have rewritten `rev`
            let edge = self.nodes[v].edges[i].clone();
            if edge.to != u {
                self.push_edge_pair(
                    u,
                    edge.to,
                    edge.capacity,
                    edge.capacity,
                    edge.cost,
                    edge.flow,
                    edge.index,
                );
            }
            // drop the twin from the peer's list and renumber what shifted
            let peer = edge.to;
            self.nodes[peer].edges.remove(edge.rev);
            for j in edge.rev..self.nodes[peer].edges.len() {
                let (twin_node, twin_pos) = {
                    let shifted = &self.nodes[peer].edges[j];
                    (shifted.to, shifted.rev)
                };
                self.nodes[twin_node].edges[twin_pos].rev -= 1;
            }
        }

        if v == self.sink {
            self.sink = u;
        } else if v == self.source {
            self.source = u;
        }
        self.remove_node(v);
    }

    /// Delete a node nobody references any more, shifting indices above
    /// it.
    fn remove_node(&mut self, index: usize) {
        debug_assert!(index != self.source && index != self.sink);
        self.nodes.remove(index);
        if self.source > index {
            self.source -= 1;
        }
        if self.sink > index {
            self.sink -= 1;
        }
        for node in &mut self.nodes {
            for edge in &mut node.edges {
                debug_assert!(edge.to != index);
                if edge.to > index {
                    edge.to -= 1;
                }
            }
        }
    }

    /// Drop edge-less nodes left behind by contraction; the terminals
    /// stay (an isolated terminal means a zero cut, handled above).
    fn sweep_isolated(&mut self) {
        let mut index = 0;
        while index < self.nodes.len() {
            if self.nodes[index].edges.is_empty() && index != self.source && index != self.sink {
                self.remove_node(index);
            } else {
                index += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn triangle() -> FlowNetwork {
        let mut network = FlowNetwork::new(3);
        network.set_source(0);
        network.set_sink(1);
        network.add_undirected_edge(0, 1, 3, 0);
        network.add_undirected_edge(0, 2, 5, 0);
        network.add_undirected_edge(2, 1, 7, 0);
        network
    }

    #[test]
    fn agrees_with_dinic_on_the_sample() {
        let mut rng = StdRng::seed_from_u64(11);
        let network = triangle();
        let (value, cut) = network.karger_min_cut(40, &mut rng);
        assert_eq!(value, 8);
        assert_eq!(cut, vec![1, 2]);

        let (dinic_value, dinic_cut) = triangle().min_cut_dinic();
        assert_eq!(value, dinic_value);
        assert_eq!(cut, dinic_cut);
    }

    #[test]
    fn single_edge_graph() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut network = FlowNetwork::new(2);
        network.set_source(0);
        network.set_sink(1);
        network.add_undirected_edge(0, 1, 4, 0);
        let (value, cut) = network.karger_min_cut(5, &mut rng);
        assert_eq!(value, 4);
        assert_eq!(cut, vec![1]);
    }

    #[test]
    fn disconnected_terminals_cut_nothing() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut network = FlowNetwork::new(4);
        network.set_source(0);
        network.set_sink(3);
        network.add_undirected_edge(0, 1, 2, 0);
        network.add_undirected_edge(2, 3, 2, 0);
        // 0-1 and 2-3 never connect: some contraction isolates a side
        let (value, cut) = network.karger_min_cut(10, &mut rng);
        assert_eq!(value, 0);
        assert!(cut.is_empty());
    }

    #[test]
    fn randomised_cut_matches_dinic_on_random_graphs() {
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..10 {
            let n = rng.gen_range(3..7);
            let mut network = FlowNetwork::new(n);
            network.set_source(0);
            network.set_sink(n - 1);
            for u in 0..n {
                for v in u + 1..n {
                    if rng.gen_bool(0.7) {
                        network.add_undirected_edge(u, v, rng.gen_range(1..10), 0);
                    }
                }
            }
            if network.nodes[0].edges.is_empty() || network.nodes[n - 1].edges.is_empty() {
                continue;
            }
            let (karger_value, _) = network.karger_min_cut(200, &mut rng);
            let (dinic_value, _) = network.clone().min_cut_dinic();
            assert_eq!(karger_value, dinic_value);
        }
    }
}
