//! Depth-first search over the state graph.
//!
//! The search keeps one frame per node on the current path. A frame holds the
//! children computed when its node was expanded; children are taken in
//! enumeration order and the next sibling is only looked at once the subtree
//! under the previous one is finished. That is the order a recursive
//! depth-first walk would visit states in, without using the call stack.

use std::collections::HashSet;
use std::vec;

use serde::{Deserialize, Serialize};

use super::action::{GroundAction, PlanStep};
use super::condition::{is_goal, is_satisfied};
use super::effect::apply;
use super::literal::{Literal, State};

pub type Plan = Vec<PlanStep>;

/// Optional bounds on a single search. All unbounded by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SearchLimits {
    pub max_visited: Option<usize>,
    pub max_frontier: Option<usize>,
    pub max_depth: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Limit {
    Visited,
    Frontier,
    Depth,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome", content = "detail")]
pub enum Outcome {
    /// Steps leading from the initial state to a goal state. Empty if the
    /// initial state already satisfies the goal.
    Found(Plan),
    /// Every reachable state was examined; no plan exists.
    Exhausted,
    /// A limit stopped the search before the space was proven empty.
    ResourceExhausted(Limit),
}

impl Outcome {
    pub fn plan(&self) -> Option<&Plan> {
        match self {
            Outcome::Found(plan) => Some(plan),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    pub expansions: usize,
    pub generated: usize,
    pub duplicates_suppressed: usize,
    pub depth_pruned: usize,
    pub deepest: usize,
    pub frontier_high_water: usize,
    pub visited: usize,
}

/// States already entered by a search. Never shrinks while a search runs.
#[derive(Debug, Clone, Default)]
pub struct VisitedSet(HashSet<State>);

impl VisitedSet {
    pub fn new() -> Self {
        Self(HashSet::new())
    }

    /// Returns `false` if the state was already there.
    pub fn insert(&mut self, state: State) -> bool {
        self.0.insert(state)
    }

    pub fn contains(&self, state: &State) -> bool {
        self.0.contains(state)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear()
    }
}

#[derive(Debug)]
struct SearchNode {
    state: State,
    parent: Option<usize>,
    /// Index into the candidate list.
    action: Option<usize>,
    depth: usize,
}

struct Frame {
    node: usize,
    children: vec::IntoIter<(usize, State)>,
}

/// Walks parent links from `goal` back to the root.
fn reconstruct_path(nodes: &[SearchNode], goal: usize) -> Vec<usize> {
    let mut path = Vec::new();
    let mut current = Some(goal);
    while let Some(id) = current {
        let node = &nodes[id];
        if let Some(action) = node.action {
            path.push(action);
        }
        current = node.parent;
    }
    path.reverse();
    path
}

struct Search<'c, 'd> {
    candidates: &'c [GroundAction<'d>],
    goal: &'c [Literal],
    limits: &'c SearchLimits,
    nodes: Vec<SearchNode>,
    stack: Vec<Frame>,
    pending: usize,
    stats: SearchStats,
}

impl<'c, 'd> Search<'c, 'd> {
    fn expand(&mut self, node: usize) {
        let state = &self.nodes[node].state;
        let children: Vec<(usize, State)> = self.candidates.iter().enumerate()
            .filter(|(_, action)| is_satisfied(state, &action.precondition))
            .map(|(i, action)| {
                tracing::trace!(action = %action, "Applicable");
                (i, apply(action, state))
            })
            .collect();
        tracing::debug!(depth = self.nodes[node].depth, children = children.len(), state = %state, "Expanding");
        self.stats.expansions += 1;
        self.stats.generated += children.len();
        self.pending += children.len();
        self.stats.frontier_high_water = self.stats.frontier_high_water.max(self.pending);
        self.stack.push(Frame { node, children: children.into_iter() });
    }

    fn found(&self, node: usize) -> Outcome {
        let steps = reconstruct_path(&self.nodes, node).into_iter()
            .map(|i| self.candidates[i].to_step())
            .collect();
        Outcome::Found(steps)
    }

    fn run(&mut self, visited: &mut VisitedSet) -> Outcome {
        let root = &self.nodes[0].state;
        let room = has_room(self.limits.max_visited, visited.len());
        if room {
            visited.insert(root.clone());
        }
        if is_goal(root, self.goal) {
            return Outcome::Found(Vec::new());
        }
        if !room {
            return Outcome::ResourceExhausted(Limit::Visited);
        }
        self.expand(0);
        if exceeds(self.limits.max_frontier, self.pending) {
            return Outcome::ResourceExhausted(Limit::Frontier);
        }
        loop {
            let (parent, next) = match self.stack.last_mut() {
                Some(frame) => (frame.node, frame.children.next()),
                None => break,
            };
            let (action, state) = match next {
                Some(child) => child,
                None => {
                    self.stack.pop();
                    continue;
                }
            };
            self.pending -= 1;
            if visited.contains(&state) {
                self.stats.duplicates_suppressed += 1;
                continue;
            }
            let depth = self.nodes[parent].depth + 1;
            if exceeds(self.limits.max_depth, depth) {
                self.stats.depth_pruned += 1;
                continue;
            }
            // A goal is still reported when the visited set is full.
            let room = has_room(self.limits.max_visited, visited.len());
            if room {
                visited.insert(state.clone());
            }
            self.nodes.push(SearchNode { state, parent: Some(parent), action: Some(action), depth });
            let id = self.nodes.len() - 1;
            self.stats.deepest = self.stats.deepest.max(depth);
            if is_goal(&self.nodes[id].state, self.goal) {
                return self.found(id);
            }
            if !room {
                return Outcome::ResourceExhausted(Limit::Visited);
            }
            self.expand(id);
            if exceeds(self.limits.max_frontier, self.pending) {
                return Outcome::ResourceExhausted(Limit::Frontier);
            }
        }
        if self.stats.depth_pruned > 0 {
            Outcome::ResourceExhausted(Limit::Depth)
        } else {
            Outcome::Exhausted
        }
    }
}

fn exceeds(limit: Option<usize>, value: usize) -> bool {
    limit.map_or(false, |max| value > max)
}

/// The visited set may take one more state without going past `limit`.
fn has_room(limit: Option<usize>, len: usize) -> bool {
    limit.map_or(true, |max| len < max)
}

/// Searches for a sequence of `candidates` that takes `initial` to a state
/// satisfying `goal`.
///
/// `visited` is shared with the caller: states already in it are never
/// entered, and every state entered here is added to it. Pass a fresh set for
/// an independent search.
pub fn search(
    candidates: &[GroundAction],
    initial: &State,
    goal: &[Literal],
    visited: &mut VisitedSet,
    limits: &SearchLimits,
) -> (Outcome, SearchStats) {
    let mut search = Search {
        candidates,
        goal,
        limits,
        nodes: vec![SearchNode { state: initial.clone(), parent: None, action: None, depth: 0 }],
        stack: Vec::new(),
        pending: 0,
        stats: SearchStats::default(),
    };
    let outcome = search.run(visited);
    let mut stats = search.stats;
    stats.visited = visited.len();
    match &outcome {
        Outcome::Found(plan) => tracing::info!(steps = plan.len(), ?stats, "Plan found"),
        Outcome::Exhausted => tracing::info!(?stats, "Search space exhausted without a plan"),
        Outcome::ResourceExhausted(limit) => tracing::warn!(?limit, ?stats, "Search stopped by limit"),
    }
    (outcome, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strips::action::ActionSchema;
    use crate::strips::grounding::{ground_schema, Grounding};

    fn objects(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn stack_schema() -> ActionSchema {
        ActionSchema {
            name: "stack".to_owned(),
            parameters: objects(&["?x", "?y"]),
            precondition: vec![
                Literal::positive("clear", &["?x"]),
                Literal::positive("clear", &["?y"]),
                Literal::positive("on", &["?x", "table"]),
            ],
            effect: vec![
                Literal::positive("on", &["?x", "?y"]),
                Literal::negative("clear", &["?y"]),
                Literal::negative("on", &["?x", "table"]),
            ],
        }
    }

    fn initial() -> State {
        vec![
            Literal::positive("on", &["a", "table"]),
            Literal::positive("on", &["b", "table"]),
            Literal::positive("clear", &["a"]),
            Literal::positive("clear", &["b"]),
        ].into_iter().collect()
    }

    fn ground<'d>(schema: &'d ActionSchema, universe: &[String]) -> Vec<GroundAction<'d>> {
        let mut grounding = Grounding::default();
        ground_schema(schema, universe, &mut grounding);
        grounding.actions
    }

    fn step(name: &str, parameters: &[&str]) -> PlanStep {
        PlanStep { name: name.to_owned(), parameters: objects(parameters) }
    }

    #[test]
    fn test_solvable() {
        let schema = stack_schema();
        let candidates = ground(&schema, &objects(&["a", "table", "b"]));
        let goal = [Literal::positive("on", &["a", "b"])];
        let mut visited = VisitedSet::new();
        let (outcome, stats) = search(&candidates, &initial(), &goal, &mut visited, &SearchLimits::default());
        assert_eq!(outcome, Outcome::Found(vec![step("stack", &["a", "b"])]));
        // root, stack(a,a), then stack(b,b) under it before backtracking
        assert_eq!(stats.expansions, 3);
        assert_eq!(stats.deepest, 2);
        assert_eq!(stats.visited, visited.len());
    }

    #[test]
    fn test_unsolvable() {
        let schema = stack_schema();
        let candidates = ground(&schema, &objects(&["a", "table", "b"]));
        let goal = [Literal::positive("on", &["a", "c"])];
        let (outcome, stats) = search(&candidates, &initial(), &goal, &mut VisitedSet::new(), &SearchLimits::default());
        assert_eq!(outcome, Outcome::Exhausted);
        assert!(stats.expansions <= stats.visited);
    }

    #[test]
    fn test_goal_holds_initially() {
        let goal = [Literal::positive("clear", &["a"]), Literal::negative("on", &["a", "b"])];
        let (outcome, stats) = search(&[], &initial(), &goal, &mut VisitedSet::new(), &SearchLimits::default());
        assert_eq!(outcome, Outcome::Found(vec![]));
        assert_eq!(stats.expansions, 0);
    }

    #[test]
    fn test_deterministic() {
        let schema = stack_schema();
        let candidates = ground(&schema, &objects(&["a", "b", "table", "c"]));
        let mut state = initial();
        state = state.add(&Literal::positive("on", &["c", "table"])).add(&Literal::positive("clear", &["c"]));
        let goal = [Literal::positive("on", &["b", "c"]), Literal::positive("on", &["a", "b"])];
        let first = search(&candidates, &state, &goal, &mut VisitedSet::new(), &SearchLimits::default());
        let second = search(&candidates, &state, &goal, &mut VisitedSet::new(), &SearchLimits::default());
        assert_eq!(first, second);
    }

    #[test]
    fn test_visited_set_is_shared() {
        let schema = stack_schema();
        let candidates = ground(&schema, &objects(&["a", "table", "b"]));
        let goal = [Literal::positive("on", &["a", "b"])];
        let mut visited = VisitedSet::new();
        visited.insert(initial().add(&Literal::positive("on", &["a", "b"]))
            .remove(&Literal::positive("clear", &["b"]))
            .remove(&Literal::positive("on", &["a", "table"])));
        let (outcome, _) = search(&candidates, &initial(), &goal, &mut visited, &SearchLimits::default());
        assert_eq!(outcome, Outcome::Exhausted);
        visited.clear();
        let (outcome, _) = search(&candidates, &initial(), &goal, &mut visited, &SearchLimits::default());
        assert!(outcome.plan().is_some());
    }

    #[test]
    fn test_chain_expands_each_state_once() {
        // step(n) moves a token from n to n+1, reachable states form a line
        let schema = ActionSchema {
            name: "step".to_owned(),
            parameters: objects(&["?from", "?to"]),
            precondition: vec![Literal::positive("at", &["?from"]), Literal::positive("next", &["?from", "?to"])],
            effect: vec![Literal::negative("at", &["?from"]), Literal::positive("at", &["?to"])],
        };
        let universe = objects(&["n0", "n1", "n2", "n3", "n4"]);
        let candidates = ground(&schema, &universe);
        let mut facts = vec![Literal::positive("at", &["n0"])];
        for pair in universe.windows(2) {
            facts.push(Literal::positive("next", &[pair[0].as_str(), pair[1].as_str()]));
            facts.push(Literal::positive("next", &[pair[1].as_str(), pair[0].as_str()]));
        }
        let state: State = facts.into_iter().collect();
        let goal = [Literal::positive("at", &["n9"])];
        let (outcome, stats) = search(&candidates, &state, &goal, &mut VisitedSet::new(), &SearchLimits::default());
        assert_eq!(outcome, Outcome::Exhausted);
        assert_eq!(stats.visited, 5);
        assert_eq!(stats.expansions, 5);
        assert!(stats.duplicates_suppressed > 0);

        let goal = [Literal::positive("at", &["n4"])];
        let (outcome, _) = search(&candidates, &state, &goal, &mut VisitedSet::new(), &SearchLimits::default());
        let plan = outcome.plan().unwrap();
        assert_eq!(plan.len(), 4);
        assert_eq!(plan[3], step("step", &["n3", "n4"]));

        let limits = SearchLimits { max_depth: Some(2), ..SearchLimits::default() };
        let (outcome, stats) = search(&candidates, &state, &goal, &mut VisitedSet::new(), &limits);
        assert_eq!(outcome, Outcome::ResourceExhausted(Limit::Depth));
        assert_eq!(stats.deepest, 2);
        assert_eq!(stats.depth_pruned, 1);
    }

    #[test]
    fn test_visited_limit() {
        let schema = stack_schema();
        let candidates = ground(&schema, &objects(&["a", "table", "b"]));
        let goal = [Literal::positive("on", &["a", "c"])];
        let limits = SearchLimits { max_visited: Some(2), ..SearchLimits::default() };
        let (outcome, stats) = search(&candidates, &initial(), &goal, &mut VisitedSet::new(), &limits);
        assert_eq!(outcome, Outcome::ResourceExhausted(Limit::Visited));
        assert_eq!(stats.visited, 2);
    }

    #[test]
    fn test_visited_limit_still_reports_goal() {
        let finish = ActionSchema {
            name: "finish".to_owned(),
            parameters: vec![],
            precondition: vec![],
            effect: vec![Literal::positive("done", &[])],
        };
        let candidates = ground(&finish, &[]);
        let goal = [Literal::positive("done", &[])];
        let limits = SearchLimits { max_visited: Some(1), ..SearchLimits::default() };
        let (outcome, stats) = search(&candidates, &State::new(), &goal, &mut VisitedSet::new(), &limits);
        assert_eq!(outcome, Outcome::Found(vec![step("finish", &[])]));
        assert_eq!(stats.visited, 1);

        let limits = SearchLimits { max_visited: Some(0), ..SearchLimits::default() };
        let (outcome, stats) = search(&candidates, &State::new(), &goal, &mut VisitedSet::new(), &limits);
        assert_eq!(outcome, Outcome::ResourceExhausted(Limit::Visited));
        assert_eq!(stats.visited, 0);

        let (outcome, stats) = search(&candidates, &State::new(), &[], &mut VisitedSet::new(), &limits);
        assert_eq!(outcome, Outcome::Found(vec![]));
        assert_eq!(stats.visited, 0);
    }

    #[test]
    fn test_frontier_limit() {
        let schema = stack_schema();
        let candidates = ground(&schema, &objects(&["a", "table", "b"]));
        let goal = [Literal::positive("on", &["a", "c"])];
        let limits = SearchLimits { max_frontier: Some(3), ..SearchLimits::default() };
        let (outcome, stats) = search(&candidates, &initial(), &goal, &mut VisitedSet::new(), &limits);
        assert_eq!(outcome, Outcome::ResourceExhausted(Limit::Frontier));
        assert_eq!(stats.frontier_high_water, 4);
    }

    #[test]
    fn test_outcome_json() {
        let outcome = Outcome::Found(vec![step("stack", &["a", "b"])]);
        assert_eq!(serde_json::to_string(&outcome).unwrap(),
            r#"{"outcome":"found","detail":[{"name":"stack","parameters":["a","b"]}]}"#);
        assert_eq!(serde_json::to_string(&Outcome::Exhausted).unwrap(), r#"{"outcome":"exhausted"}"#);
        assert_eq!(serde_json::to_string(&Outcome::ResourceExhausted(Limit::Depth)).unwrap(),
            r#"{"outcome":"resource_exhausted","detail":"depth"}"#);
    }
}
