pub mod action;
pub mod condition;
pub mod domain;
pub mod effect;
pub mod error;
pub mod grounding;
pub mod literal;
pub mod parser;
pub mod planner;
pub mod problem;
pub mod search;
pub mod wire;

pub use action::{ActionSchema, GroundAction, PlanStep};
pub use domain::Domain;
pub use error::Error;
pub use literal::{Literal, Polarity, State};
pub use planner::{Planner, Report};
pub use problem::Problem;
pub use search::{Limit, Outcome, SearchLimits, SearchStats, VisitedSet};
