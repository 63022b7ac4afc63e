use algokit::flow::{recommended_trials, FlowNetwork};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Four nodes, edges (1->2,1,2), (1->3,2,2), (3->2,1,1), (2->4,2,1),
/// (3->4,2,3): the min-cost max flow is 12.
fn sample_mcmf() -> FlowNetwork {
    let mut network = FlowNetwork::new(4);
    network.set_source(0);
    network.set_sink(3);
    network.add_directed_edge(0, 1, 1, 2);
    network.add_directed_edge(0, 2, 2, 2);
    network.add_directed_edge(2, 1, 1, 1);
    network.add_directed_edge(1, 3, 2, 1);
    network.add_directed_edge(2, 3, 2, 3);
    network
}

#[test]
fn min_cost_max_flow_sample_all_engines() {
    let mut by_cancelling = sample_mcmf();
    by_cancelling.max_flow_dinic();
    assert_eq!(by_cancelling.reduce_cost_max_flow(), 12);

    let mut by_bellman_ford = sample_mcmf();
    assert_eq!(by_bellman_ford.min_cost_max_flow_bellman_ford(), 12);

    let mut by_dijkstra = sample_mcmf();
    assert_eq!(by_dijkstra.min_cost_max_flow_dijkstra(), 12);

    for network in [&by_cancelling, &by_bellman_ford, &by_dijkstra] {
        assert_eq!(network.flow_value(), 3);
        network.verify_invariants();
    }
}

#[test]
fn undirected_sample_flow_and_cut() {
    let mut network = FlowNetwork::new(3);
    network.set_source(0);
    network.set_sink(1);
    network.add_undirected_edge(0, 1, 3, 0);
    network.add_undirected_edge(0, 2, 5, 0);
    network.add_undirected_edge(2, 1, 7, 0);

    let (value, cut) = network.min_cut_dinic();
    assert_eq!(value, 8);
    assert_eq!(cut, vec![1, 2]);
    network.verify_invariants();
}

#[test]
fn costed_undirected_chain() {
    // a chain of costed undirected edges is priced once per edge
    let mut network = FlowNetwork::new(3);
    network.set_source(0);
    network.set_sink(2);
    network.add_undirected_edge(0, 1, 6, 4);
    network.add_undirected_edge(1, 2, 3, 1);
    assert_eq!(network.min_cost_max_flow_dijkstra(), 3 * 4 + 3 * 1);
    assert_eq!(network.flow_value(), 3);
    network.verify_invariants();
}

#[test]
fn karger_agrees_with_dinic_classification() {
    let mut rng = StdRng::seed_from_u64(2024);
    for round in 0..8 {
        let n = 4 + (round % 3);
        let mut network = FlowNetwork::new(n);
        network.set_source(0);
        network.set_sink(n - 1);
        for u in 0..n {
            for v in u + 1..n {
                if rng.gen_bool(0.8) {
                    network.add_undirected_edge(u, v, rng.gen_range(1..20), 0);
                }
            }
        }
        let mut for_dinic = network.clone();
        let (dinic_value, _) = for_dinic.min_cut_dinic();
        let trials = 400.min(recommended_trials(n));
        let (karger_value, _) = network.karger_min_cut(trials, &mut rng);
        assert_eq!(karger_value, dinic_value, "round {round}");
    }
}

#[test]
fn conservation_on_random_networks() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..20 {
        let n = rng.gen_range(2..9);
        let mut network = FlowNetwork::new(n);
        network.set_source(0);
        network.set_sink(n - 1);
        for _ in 0..rng.gen_range(1..20) {
            let u = rng.gen_range(0..n);
            let v = rng.gen_range(0..n);
            network.add_directed_edge(u, v, rng.gen_range(1..15), rng.gen_range(0..6));
        }
        let value = network.max_flow_dinic();
        assert!(value >= 0);
        assert_eq!(network.flow_value(), value);
        network.verify_invariants();

        // lowering the cost never changes the flow value
        network.reduce_cost_max_flow();
        assert_eq!(network.flow_value(), value);
        network.verify_invariants();
    }
}

#[test]
fn ssp_engines_agree_on_random_costed_networks() {
    let mut rng = StdRng::seed_from_u64(31);
    for _ in 0..15 {
        let n = rng.gen_range(3..8);
        let mut network = FlowNetwork::new(n);
        network.set_source(0);
        network.set_sink(n - 1);
        for _ in 0..rng.gen_range(2..18) {
            let u = rng.gen_range(0..n);
            let v = rng.gen_range(0..n);
            network.add_directed_edge(u, v, rng.gen_range(1..10), rng.gen_range(0..9));
        }
        let mut a = network.clone();
        let mut b = network.clone();
        let mut c = network;
        let cost_bf = a.min_cost_max_flow_bellman_ford();
        let cost_dijkstra = b.min_cost_max_flow_dijkstra();
        c.max_flow_dinic();
        let cost_cancelling = c.reduce_cost_max_flow();
        assert_eq!(cost_bf, cost_dijkstra);
        assert_eq!(cost_bf, cost_cancelling);
        assert_eq!(a.flow_value(), b.flow_value());
        assert_eq!(a.flow_value(), c.flow_value());
    }
}
