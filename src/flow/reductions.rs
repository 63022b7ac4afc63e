//! Classic reductions onto min-cost max-flow: the square assignment
//! problem, profit-maximising job scheduling on k machines, optimality
//! checking of transportation plans, and disjoint path extraction.

use crate::flow::FlowNetwork;

/// An assignment answer: total cost plus one task per worker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Schedule {
    pub total_cost: i64,
    /// `(worker, task)` pairs, one per worker, sorted by worker.
    pub assignments: Vec<(usize, usize)>,
}

/// The square n×n assignment problem as a min-cost max-flow gadget:
/// source → worker (cap 1, cost 0) → task (cap 1, cost c) → sink
/// (cap 1, cost 0).
///
/// # Example
/// ```rust
/// use algokit::flow::reductions::Assignment;
///
/// let mut assignment = Assignment::new(&[
///     vec![3, 2, 1],
///     vec![1, 3, 2],
///     vec![2, 1, 3],
/// ]);
/// let schedule = assignment.min_cost_schedule_dijkstra();
/// assert_eq!(schedule.total_cost, 3);
/// assert_eq!(schedule.assignments, vec![(0, 2), (1, 0), (2, 1)]);
/// ```
pub struct Assignment {
    network: FlowNetwork,
    size: usize,
}

impl Assignment {
    /// Build the gadget for a square cost matrix.
    pub fn new(costs: &[Vec<i64>]) -> Self {
        let size = costs.len();
        assert!(costs.iter().all(|row| row.len() == size), "cost matrix not square");

        let mut network = FlowNetwork::new(2 * size + 2);
        network.set_source(0);
        network.set_sink(1);
        for worker in 0..size {
            network.add_directed_edge(0, 2 + worker, 1, 0);
        }
        for task in 0..size {
            network.add_directed_edge(2 + size + task, 1, 1, 0);
        }
        for (worker, row) in costs.iter().enumerate() {
            for (task, &cost) in row.iter().enumerate() {
                network.add_directed_edge(2 + worker, 2 + size + task, 1, cost);
            }
        }
        Assignment { network, size }
    }

    /// Cheapest full assignment via Dijkstra-with-potentials MCMF.
    pub fn min_cost_schedule_dijkstra(&mut self) -> Schedule {
        let total_cost = self.network.min_cost_max_flow_dijkstra();
        self.read_schedule(total_cost)
    }

    /// Cheapest full assignment via Bellman–Ford MCMF.
    pub fn min_cost_schedule_bellman_ford(&mut self) -> Schedule {
        let total_cost = self.network.min_cost_max_flow_bellman_ford();
        self.read_schedule(total_cost)
    }

    /// Cheapest full assignment by taking any maximum flow first and
    /// cancelling negative cycles afterwards.
    pub fn min_cost_schedule_cycle_cancelling(&mut self) -> Schedule {
        self.network.max_flow_dinic();
        let total_cost = self.network.reduce_cost_max_flow();
        self.read_schedule(total_cost)
    }

    /// Each worker's task is whichever task edge carries its unit of
    /// flow.
    fn read_schedule(&self, total_cost: i64) -> Schedule {
        let assignments = (0..self.size)
            .map(|worker| {
                let task_node = self
                    .network
                    .flow_successor(2 + worker)
                    .expect("a full assignment routes every worker");
                (worker, task_node - 2 - self.size)
            })
            .collect();
        Schedule {
            total_cost,
            assignments,
        }
    }
}

/// A job for [`JobScheduler`]: half-open execution interval
/// `[start, start + duration)` and the profit for completing it.
#[derive(Copy, Clone, Debug)]
pub struct Job {
    pub start: u64,
    pub duration: u64,
    pub profit: u64,
}

/// Profit-maximising selection of jobs on `machines` identical machines.
///
/// Jobs sorted by start time form a spine of zero-cost capacity-k edges
/// carrying idle machines. Each job is a two-node gadget joined by a
/// capacity-1 edge of cost `-profit`; its end node links to the earliest
/// job starting at or after its completion (or to the sink). A min-cost
/// max flow then buys exactly the most profitable feasible selection,
/// read back off the gadget edges.
pub struct JobScheduler {
    network: FlowNetwork,
    /// Original job index per spine position.
    order: Vec<usize>,
}

impl JobScheduler {
    pub fn new(machines: usize, jobs: &[Job]) -> Self {
        assert!(!jobs.is_empty(), "no jobs to schedule");
        debug_assert!(jobs.iter().all(|job| job.duration > 0));
        let count = jobs.len();
        let mut order: Vec<usize> = (0..count).collect();
        order.sort_by_key(|&i| jobs[i].start);
        let starts: Vec<u64> = order.iter().map(|&i| jobs[i].start).collect();

        let mut network = FlowNetwork::new(2 * count + 2);
        network.set_source(0);
        network.set_sink(1);
        let machines = machines as i64;

        // gadget edge first, so it is edge 0 of its start node
        for (position, &job) in order.iter().enumerate() {
            network.add_directed_edge(
                2 + 2 * position,
                2 + 2 * position + 1,
                1,
                -(jobs[job].profit as i64),
            );
        }
        for position in 0..count - 1 {
            // skipping the job passes the machine along the spine
            network.add_directed_edge(2 + 2 * position, 2 + 2 * (position + 1), machines, 0);

            let job = jobs[order[position]];
            let completed = job.start + job.duration;
            let next = position + starts[position..].partition_point(|&s| s < completed);
            if next < count {
                network.add_directed_edge(2 + 2 * position + 1, 2 + 2 * next, 1, 0);
            } else {
                network.add_directed_edge(2 + 2 * position + 1, 1, 1, 0);
            }
        }
        network.add_directed_edge(0, 2, machines, 0);
        network.add_directed_edge(2 + 2 * (count - 1), 1, machines, 0);
        network.add_directed_edge(2 + 2 * (count - 1) + 1, 1, machines, 0);

        JobScheduler { network, order }
    }

    /// Which jobs to run, indexed like the constructor input.
    pub fn schedule(&mut self) -> Vec<bool> {
        self.network.min_cost_max_flow_dijkstra();
        let mut selected = vec![false; self.order.len()];
        for (position, &job) in self.order.iter().enumerate() {
            let gadget = self
                .network
                .edges_from(2 + 2 * position)
                .next()
                .expect("gadget edge exists");
            if gadget.flow() > 0 {
                selected[job] = true;
            }
        }
        selected
    }

    /// Total profit of the selected jobs; meaningful after
    /// [`schedule`](Self::schedule).
    pub fn total_profit(&self) -> i64 {
        -self.network.flow_cost()
    }
}

/// A transportation instance: supplies flow to demands over cost-weighted
/// routes, optionally pre-loaded with a candidate plan whose optimality
/// is then decided by one round of cycle cancelling.
pub struct Transportation {
    network: FlowNetwork,
    workers: usize,
    tasks: usize,
}

impl Transportation {
    pub fn new(supplies: &[i64], demands: &[i64]) -> Self {
        let (workers, tasks) = (supplies.len(), demands.len());
        let mut network = FlowNetwork::new(2 + workers + tasks);
        network.set_source(0);
        network.set_sink(1);
        for (worker, &supply) in supplies.iter().enumerate() {
            network.add_directed_edge(0, 2 + worker, supply, 0);
        }
        for (task, &demand) in demands.iter().enumerate() {
            network.add_directed_edge(2 + workers + task, 1, demand, 0);
        }
        Transportation {
            network,
            workers,
            tasks,
        }
    }

    /// Unbounded route from `worker` to `task` at the given unit cost.
    pub fn add_route(&mut self, worker: usize, task: usize, cost: i64) {
        self.add_route_with_load(worker, task, cost, 0);
    }

    /// Route pre-loaded with `load` units of the candidate plan; the
    /// terminal edges absorb the load so the pre-set flow is consistent.
    pub fn add_route_with_load(&mut self, worker: usize, task: usize, cost: i64, load: i64) {
        self.network.add_directed_edge_with_flow(
            2 + worker,
            2 + self.workers + task,
            i64::MAX,
            cost,
            load,
        );
        if load != 0 {
            // supply edges went in worker order, so worker i is edge i of
            // the source; the demand edge is the first of its task node
            self.network.apply_flow(0, worker, load);
            self.network.apply_flow(2 + self.workers + task, 0, load);
        }
    }

    /// Total cost of the current plan.
    pub fn plan_cost(&self) -> i64 {
        self.network.flow_cost()
    }

    /// The current plan as a worker × task load matrix.
    pub fn plan(&self) -> Vec<Vec<i64>> {
        let mut plan = vec![vec![0i64; self.tasks]; self.workers];
        for worker in 0..self.workers {
            for edge in self.network.edges_from(2 + worker) {
                if edge.flow() > 0 && edge.to() >= 2 + self.workers {
                    plan[worker][edge.to() - 2 - self.workers] = edge.flow();
                }
            }
        }
        plan
    }

    /// One step of negative-cycle cancellation over the loaded plan.
    /// `Some(better)` with a strictly cheaper plan when the candidate was
    /// sub-optimal, `None` when no improving cycle exists.
    pub fn improve(&mut self) -> Option<Vec<Vec<i64>>> {
        let before = self.network.flow_cost();
        let after = self.network.reduce_cost_max_flow_bounded(1);
        debug_assert!(after <= before);
        (after < before).then(|| self.plan())
    }
}

/// Up to `k` edge-disjoint directed paths from `source` to `sink`:
/// every edge gets unit capacity, and a max flow of at least `k`
/// certifies the paths, which are peeled off the flow one by one.
pub fn edge_disjoint_paths(
    node_count: usize,
    edges: &[(usize, usize)],
    source: usize,
    sink: usize,
    k: usize,
) -> Option<Vec<Vec<usize>>> {
    let mut network = FlowNetwork::new(node_count);
    network.set_source(source);
    network.set_sink(sink);
    for &(u, v) in edges {
        network.add_directed_edge(u, v, 1, 0);
    }
    network.max_flow_dinic();
    network.extract_disjoint_paths(k)
}

/// Up to `k` vertex-disjoint directed paths, by splitting every node
/// into an in/out pair joined by a unit edge (the terminals get capacity
/// `k` so the paths may share them).
pub fn vertex_disjoint_paths(
    node_count: usize,
    edges: &[(usize, usize)],
    source: usize,
    sink: usize,
    k: usize,
) -> Option<Vec<Vec<usize>>> {
    let mut network = FlowNetwork::new(2 * node_count);
    network.set_source(2 * source);
    network.set_sink(2 * sink + 1);
    for v in 0..node_count {
        let capacity = if v == source || v == sink { k as i64 } else { 1 };
        network.add_directed_edge(2 * v, 2 * v + 1, capacity, 0);
    }
    for &(u, v) in edges {
        network.add_directed_edge(2 * u + 1, 2 * v, 1, 0);
    }
    network.max_flow_dinic();
    let split_paths = network.extract_disjoint_paths(k)?;
    Some(
        split_paths
            .into_iter()
            .map(|path| {
                path.into_iter()
                    .filter(|node| node % 2 == 0)
                    .map(|node| node / 2)
                    .collect()
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignment_engines_agree() {
        let costs = vec![vec![3, 2, 1], vec![1, 3, 2], vec![2, 1, 3]];
        let expected = Schedule {
            total_cost: 3,
            assignments: vec![(0, 2), (1, 0), (2, 1)],
        };
        assert_eq!(Assignment::new(&costs).min_cost_schedule_dijkstra(), expected);
        assert_eq!(Assignment::new(&costs).min_cost_schedule_bellman_ford(), expected);
        assert_eq!(
            Assignment::new(&costs).min_cost_schedule_cycle_cancelling(),
            expected,
        );
    }

    #[test]
    fn assignment_on_identity_matrix() {
        let costs = vec![vec![0, 1], vec![1, 0]];
        let schedule = Assignment::new(&costs).min_cost_schedule_dijkstra();
        assert_eq!(schedule.total_cost, 0);
        assert_eq!(schedule.assignments, vec![(0, 0), (1, 1)]);
    }

    #[test]
    fn single_machine_schedule() {
        let jobs = [
            Job { start: 2, duration: 7, profit: 5 },
            Job { start: 1, duration: 3, profit: 3 },
            Job { start: 4, duration: 1, profit: 3 },
        ];
        let mut scheduler = JobScheduler::new(1, &jobs);
        assert_eq!(scheduler.schedule(), vec![false, true, true]);
        assert_eq!(scheduler.total_profit(), 6);
    }

    #[test]
    fn two_machine_schedule() {
        let jobs = [
            Job { start: 1, duration: 5, profit: 4 },
            Job { start: 1, duration: 4, profit: 5 },
            Job { start: 1, duration: 3, profit: 2 },
            Job { start: 4, duration: 1, profit: 2 },
            Job { start: 5, duration: 6, profit: 1 },
        ];
        let mut scheduler = JobScheduler::new(2, &jobs);
        let selected = scheduler.schedule();
        assert_eq!(scheduler.total_profit(), 10);

        // the winning selection must fit on two machines
        let mut events = Vec::new();
        for (i, &take) in selected.iter().enumerate() {
            if take {
                events.push((jobs[i].start, 1i32));
                events.push((jobs[i].start + jobs[i].duration, -1));
            }
        }
        events.sort();
        let mut running = 0;
        for (_, delta) in events {
            running += delta;
            assert!(running <= 2);
        }
    }

    #[test]
    fn transportation_plan_improves() {
        // three buildings evacuate into four shelters; the candidate plan
        // leaves a cheaper cycle open
        let supplies = [5, 6, 5];
        let demands = [3, 4, 7, 3];
        let costs = [
            [5, 7, 7, 8],
            [5, 7, 1, 4],
            [5, 3, 9, 6],
        ];
        let plan = [
            [3, 1, 1, 0],
            [0, 0, 6, 0],
            [0, 3, 0, 2],
        ];
        let mut transportation = Transportation::new(&supplies, &demands);
        for worker in 0..3 {
            for task in 0..4 {
                transportation.add_route_with_load(
                    worker,
                    task,
                    costs[worker][task],
                    plan[worker][task],
                );
            }
        }
        assert_eq!(transportation.plan_cost(), 56);
        transportation.network.verify_invariants();

        let improved = transportation.improve().expect("a cheaper cycle exists");
        assert!(transportation.plan_cost() < 56);
        transportation.network.verify_invariants();
        // the improved plan still moves everyone
        for (worker, row) in improved.iter().enumerate() {
            assert_eq!(row.iter().sum::<i64>(), supplies[worker]);
        }
        for task in 0..4 {
            let delivered: i64 = improved.iter().map(|row| row[task]).sum();
            assert!(delivered <= demands[task]);
        }
    }

    #[test]
    fn optimal_transportation_plan_stays() {
        let mut transportation = Transportation::new(&[2], &[2]);
        transportation.add_route_with_load(0, 0, 3, 2);
        assert_eq!(transportation.improve(), None);
    }

    #[test]
    fn two_edge_disjoint_paths() {
        let edges = [(0, 1), (1, 3), (0, 2), (2, 3), (1, 2)];
        let paths = edge_disjoint_paths(4, &edges, 0, 3, 2).unwrap();
        assert_eq!(paths.len(), 2);
        let mut used = std::collections::HashSet::new();
        for path in &paths {
            assert_eq!(path[0], 0);
            assert_eq!(*path.last().unwrap(), 3);
            for pair in path.windows(2) {
                assert!(used.insert((pair[0], pair[1])), "edge reused");
            }
        }
        // a third path does not exist
        assert!(edge_disjoint_paths(4, &edges, 0, 3, 3).is_none());
    }

    #[test]
    fn vertex_disjoint_paths_avoid_shared_middles() {
        // two routes 0 -> 4 share node 2 unless forced apart
        let edges = [(0, 1), (1, 4), (0, 2), (2, 4), (0, 3), (3, 4)];
        let paths = vertex_disjoint_paths(5, &edges, 0, 4, 3).unwrap();
        assert_eq!(paths.len(), 3);
        let mut middles = std::collections::HashSet::new();
        for path in &paths {
            assert_eq!(path[0], 0);
            assert_eq!(*path.last().unwrap(), 4);
            for &node in &path[1..path.len() - 1] {
                assert!(middles.insert(node), "vertex reused");
            }
        }

        let bowtie = [(0, 1), (1, 2), (2, 3), (0, 2), (1, 3)];
        assert!(vertex_disjoint_paths(4, &bowtie, 0, 3, 2).is_some());
        assert!(vertex_disjoint_paths(4, &bowtie, 0, 3, 3).is_none());
    }
}
