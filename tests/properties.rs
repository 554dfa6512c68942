//! Property tests over randomly generated weighted graphs.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Mutex;

use proptest::prelude::*;
use u_search::environment::{replay_path, GraphDefinition, GraphEdge};
use u_search::{Algorithm, AlgorithmKind, Cost, Environment, GraphEnvironment, SearchContext, Transition};

/// A generated graph together with the raw edge list used for the
/// brute-force reference computations.
#[derive(Debug, Clone)]
struct Case {
    nodes: usize,
    edges: Vec<(usize, usize, Cost)>,
    directed: bool,
}

impl Case {
    fn goal(&self) -> usize {
        self.nodes - 1
    }

    fn adjacency(&self) -> Vec<Vec<(usize, Cost)>> {
        let mut adj = vec![Vec::new(); self.nodes];
        for &(a, b, c) in &self.edges {
            adj[a].push((b, c));
            if !self.directed && a != b {
                adj[b].push((a, c));
            }
        }
        adj
    }

    /// Bellman-Ford from node 0.
    fn cheapest_from_start(&self) -> Vec<Option<Cost>> {
        let adj = self.adjacency();
        let mut dist = vec![None; self.nodes];
        dist[0] = Some(0.0);
        for _ in 0..self.nodes {
            for u in 0..self.nodes {
                let Some(du) = dist[u] else { continue };
                for &(v, c) in &adj[u] {
                    if dist[v].map_or(true, |dv| du + c < dv) {
                        dist[v] = Some(du + c);
                    }
                }
            }
        }
        dist
    }

    /// Cheapest cost from every node to the goal.
    fn cheapest_to_goal(&self) -> Vec<Option<Cost>> {
        let adj = self.adjacency();
        let mut dist = vec![None; self.nodes];
        dist[self.goal()] = Some(0.0);
        for _ in 0..self.nodes {
            for u in 0..self.nodes {
                for &(v, c) in &adj[u] {
                    if let Some(dv) = dist[v] {
                        if dist[u].map_or(true, |du| dv + c < du) {
                            dist[u] = Some(dv + c);
                        }
                    }
                }
            }
        }
        dist
    }

    /// Fewest steps from node 0 to the goal.
    fn fewest_steps(&self) -> Option<usize> {
        let adj = self.adjacency();
        let mut depth = vec![None; self.nodes];
        depth[0] = Some(0);
        let mut queue = std::collections::VecDeque::from([0]);
        while let Some(u) = queue.pop_front() {
            for &(v, _) in &adj[u] {
                if depth[v].is_none() {
                    depth[v] = Some(depth[u].unwrap_or(0) + 1);
                    queue.push_back(v);
                }
            }
        }
        depth[self.goal()]
    }

    /// Builds the environment. `scale` multiplies the exact distance to the
    /// goal to form a consistent heuristic; nodes that cannot reach the
    /// goal get zero.
    fn environment(&self, scale: Cost) -> GraphEnvironment {
        let to_goal = self.cheapest_to_goal();
        let heuristic: BTreeMap<String, Cost> = (0..self.nodes)
            .map(|i| (label(i), to_goal[i].map_or(0.0, |d| d * scale)))
            .collect();
        GraphEnvironment::from_definition(GraphDefinition {
            name: "random".to_string(),
            nodes: (0..self.nodes).map(label).collect(),
            edges: self
                .edges
                .iter()
                .map(|&(a, b, c)| GraphEdge::new(label(a), label(b), c))
                .collect(),
            start: label(0),
            goals: vec![label(self.goal())],
            directed: self.directed,
            heuristic: Some(heuristic),
        })
        .unwrap()
    }
}

fn label(i: usize) -> String {
    format!("n{i}")
}

fn case() -> impl Strategy<Value = Case> {
    (2usize..8, any::<bool>()).prop_flat_map(|(nodes, directed)| {
        prop::collection::vec((0..nodes, 0..nodes, 0u8..10), 0..24).prop_map(move |raw| {
            let mut seen = HashSet::new();
            let edges = raw
                .into_iter()
                .filter(|&(a, b, _)| {
                    let key = if directed || a <= b { (a, b) } else { (b, a) };
                    seen.insert(key)
                })
                .map(|(a, b, c)| (a, b, Cost::from(c)))
                .collect();
            Case {
                nodes,
                edges,
                directed,
            }
        })
    })
}

/// Counts how often each state is expanded.
struct Counting<'a> {
    inner: &'a GraphEnvironment,
    expansions: Mutex<HashMap<usize, usize>>,
}

impl<'a> Counting<'a> {
    fn new(inner: &'a GraphEnvironment) -> Self {
        Self {
            inner,
            expansions: Mutex::new(HashMap::new()),
        }
    }

    fn max_expansions_of_one_state(&self) -> usize {
        self.expansions
            .lock()
            .unwrap()
            .values()
            .copied()
            .max()
            .unwrap_or(0)
    }
}

impl Environment for Counting<'_> {
    type State = usize;
    type Action = std::sync::Arc<str>;

    fn name(&self) -> &str {
        "counting"
    }

    fn initial_state(&self) -> usize {
        self.inner.initial_state()
    }

    fn is_goal(&self, state: &usize) -> bool {
        self.inner.is_goal(state)
    }

    fn transitions(&self, state: &usize) -> Vec<Transition<usize, Self::Action>> {
        *self.expansions.lock().unwrap().entry(*state).or_insert(0) += 1;
        self.inner.transitions(state)
    }

    fn heuristic(&self, state: &usize) -> Option<Cost> {
        self.inner.heuristic(state)
    }
}

const BEST_FIRST: [AlgorithmKind; 5] = [
    AlgorithmKind::BreadthFirst,
    AlgorithmKind::DepthFirst,
    AlgorithmKind::UniformCost,
    AlgorithmKind::AStar,
    AlgorithmKind::Greedy,
];

fn local_search_params(kind: AlgorithmKind) -> &'static str {
    match kind {
        AlgorithmKind::SimulatedAnnealing => "seed=5,max_iterations=500",
        AlgorithmKind::Genetic => {
            "seed=5,population_size=16,max_generations=20,genome_length=12,parallel=false"
        }
        _ => "max_iterations=200",
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn complete_strategies_find_reachable_goals(case in case()) {
        let env = case.environment(1.0);
        let reachable = case.cheapest_from_start()[case.goal()].is_some();
        for kind in [AlgorithmKind::BreadthFirst, AlgorithmKind::DepthFirst, AlgorithmKind::UniformCost, AlgorithmKind::AStar] {
            let result = kind.run(&SearchContext::new(), &env).unwrap();
            prop_assert_eq!(result.success, reachable, "{}", kind);
        }
    }

    #[test]
    fn ucs_and_astar_are_optimal(case in case(), scale in prop::sample::select(vec![0.0, 0.5, 1.0])) {
        let env = case.environment(scale);
        let Some(best) = case.cheapest_from_start()[case.goal()] else {
            return Ok(());
        };
        for kind in [AlgorithmKind::UniformCost, AlgorithmKind::AStar] {
            let result = kind.run(&SearchContext::new(), &env).unwrap();
            prop_assert!(result.success);
            prop_assert!((result.cost - best).abs() < 1e-9, "{}: {} vs {}", kind, result.cost, best);
        }
    }

    #[test]
    fn bfs_uses_fewest_steps(case in case()) {
        let env = case.environment(1.0);
        let result = AlgorithmKind::BreadthFirst.run(&SearchContext::new(), &env).unwrap();
        prop_assert_eq!(result.success.then_some(result.path.len()), case.fewest_steps());
    }

    #[test]
    fn reported_paths_replay_to_a_goal(case in case()) {
        let env = case.environment(1.0);
        for kind in AlgorithmKind::ALL {
            let ctx = SearchContext::parse(local_search_params(kind)).unwrap();
            let result = kind.run(&ctx, &env).unwrap();
            if !result.success {
                prop_assert!(result.path.is_empty());
                continue;
            }
            let (state, cost) = replay_path(&env, &result.path).unwrap();
            prop_assert!(env.is_goal(&state), "{} ended off-goal", kind);
            prop_assert!((cost - result.cost).abs() < 1e-9, "{}: {} vs {}", kind, cost, result.cost);
        }
    }

    #[test]
    fn counters_are_consistent(case in case()) {
        let env = case.environment(1.0);
        for kind in AlgorithmKind::ALL {
            let ctx = SearchContext::parse(local_search_params(kind)).unwrap();
            let result = kind.run(&ctx, &env).unwrap();
            prop_assert!(result.expanded >= 1, "{}", kind);
            prop_assert!(result.generated >= 1, "{}", kind);
            prop_assert!(result.expanded <= result.generated, "{}: {} > {}", kind, result.expanded, result.generated);
        }
    }

    #[test]
    fn best_first_never_expands_a_state_twice(case in case()) {
        let graph = case.environment(1.0);
        for kind in BEST_FIRST {
            let env = Counting::new(&graph);
            kind.run(&SearchContext::new(), &env).unwrap();
            prop_assert!(env.max_expansions_of_one_state() <= 1, "{}", kind);
        }
    }

    #[test]
    fn expansion_budget_is_respected(case in case(), budget in 1usize..6) {
        let env = case.environment(1.0);
        let ctx = SearchContext::from_pairs([("max_expansions", budget.to_string())]);
        for kind in BEST_FIRST {
            let result = kind.run(&ctx, &env).unwrap();
            prop_assert!(result.expanded <= budget, "{}", kind);
        }
    }
}
