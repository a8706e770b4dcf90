use serde::Serialize;

use super::domain::Domain;
use super::grounding::{ground_domain, universe, GroundingError};
use super::problem::Problem;
use super::search::{search, Outcome, SearchLimits, SearchStats, VisitedSet};

/// What one planning run produced.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    #[serde(flatten)]
    pub outcome: Outcome,
    pub stats: SearchStats,
    pub ground_actions: usize,
    #[serde(skip)]
    pub rejected: Vec<GroundingError>,
}

/// Grounds a domain against a problem and searches for a plan.
#[derive(Debug, Clone, Default)]
pub struct Planner {
    limits: SearchLimits,
}

impl Planner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: SearchLimits) -> Self {
        Self { limits }
    }

    pub fn plan(&self, domain: &Domain, problem: &Problem) -> Report {
        self.plan_with(domain, problem, &mut VisitedSet::new())
    }

    /// Like [`Planner::plan`], but states already in `visited` are skipped and
    /// every state entered is left in it.
    pub fn plan_with(&self, domain: &Domain, problem: &Problem, visited: &mut VisitedSet) -> Report {
        if problem.domain != domain.name {
            tracing::warn!(problem = %problem.name, expected = %problem.domain, found = %domain.name, "Problem was written for another domain");
        }
        let objects = universe(domain, problem);
        let grounding = ground_domain(domain, &objects);
        tracing::info!(objects = objects.len(), ground_actions = grounding.actions.len(),
            rejected = grounding.rejected.len(), "Grounded {}", problem.name);
        let (outcome, stats) = search(&grounding.actions, &problem.initial, &problem.goal, visited, &self.limits);
        Report { outcome, stats, ground_actions: grounding.actions.len(), rejected: grounding.rejected }
    }
}
