use std::fmt;

use super::action::{ActionSchema, Binding, GroundAction};
use super::domain::Domain;
use super::literal::Literal;
use super::problem::Problem;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroundingError {
    /// A schema literal names a symbol that is neither a parameter nor an object.
    BindingMissing { action: String, symbol: String },
}

impl fmt::Display for GroundingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BindingMissing { action, symbol } =>
                write!(f, "Action {} references {} which is neither a parameter nor an object", action, symbol),
        }
    }
}

impl std::error::Error for GroundingError {}

/// Objects an action may be bound to: domain constants first, then the
/// problem's objects, without duplicates.
pub fn universe(domain: &Domain, problem: &Problem) -> Vec<String> {
    let mut objects: Vec<String> = Vec::with_capacity(domain.constants.len() + problem.objects.len());
    for o in domain.constants.iter().chain(problem.objects.iter()) {
        if !objects.contains(o) {
            objects.push(o.clone());
        }
    }
    objects
}

/// Every `arity`-tuple over the universe, last position varying fastest.
pub struct Bindings<'u> {
    universe: &'u [String],
    indices: Vec<usize>,
    done: bool,
}

impl<'u> Bindings<'u> {
    pub fn new(universe: &'u [String], arity: usize) -> Self {
        Self { universe, indices: vec![0; arity], done: arity > 0 && universe.is_empty() }
    }
}

impl<'u> Iterator for Bindings<'u> {
    type Item = Vec<&'u str>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let current = self.indices.iter().map(|&i| self.universe[i].as_str()).collect();
        self.done = true;
        for i in self.indices.iter_mut().rev() {
            *i += 1;
            if *i < self.universe.len() {
                self.done = false;
                break;
            }
            *i = 0;
        }
        Some(current)
    }
}

/// Ground actions in schema order then binding order, plus every binding
/// that was thrown away.
#[derive(Debug, Default)]
pub struct Grounding<'d> {
    pub actions: Vec<GroundAction<'d>>,
    pub rejected: Vec<GroundingError>,
}

fn resolve(schema: &ActionSchema, binding: &Binding, universe: &[String], literal: &Literal) -> Result<Literal, GroundingError> {
    let parameters = literal.parameters.iter().map(|symbol| match binding.get(symbol) {
        Some(object) => Ok(object.to_owned()),
        None if universe.contains(symbol) => Ok(symbol.clone()),
        None => Err(GroundingError::BindingMissing { action: schema.name.clone(), symbol: symbol.clone() }),
    }).collect::<Result<Vec<_>, _>>()?;
    Ok(Literal::new(literal.name.as_str(), parameters, literal.polarity))
}

fn ground_binding<'d>(schema: &'d ActionSchema, binding: Binding, universe: &[String]) -> Result<GroundAction<'d>, GroundingError> {
    let precondition = schema.precondition.iter()
        .map(|l| resolve(schema, &binding, universe, l))
        .collect::<Result<Vec<_>, _>>()?;
    let effect = schema.effect.iter()
        .map(|l| resolve(schema, &binding, universe, l))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(GroundAction { schema, binding, precondition, effect })
}

pub fn ground_schema<'d>(schema: &'d ActionSchema, universe: &[String], grounding: &mut Grounding<'d>) {
    for objects in Bindings::new(universe, schema.arity()) {
        let binding = Binding::new(&schema.parameters, &objects);
        match ground_binding(schema, binding, universe) {
            Ok(action) => {
                if action.effect.iter().any(|a| a.is_positive() && action.effect.iter().any(|d| d.is_negative() && d == a)) {
                    tracing::debug!(action = %action, "Effect adds and deletes the same fact, delete wins");
                }
                grounding.actions.push(action);
            }
            Err(e) => {
                tracing::warn!(objects = ?objects, "{}", e);
                grounding.rejected.push(e);
            }
        }
    }
}

pub fn ground_domain<'d>(domain: &'d Domain, universe: &[String]) -> Grounding<'d> {
    let mut grounding = Grounding::default();
    for schema in &domain.actions {
        ground_schema(schema, universe, &mut grounding);
    }
    tracing::debug!(objects = universe.len(), actions = grounding.actions.len(),
        rejected = grounding.rejected.len(), "Grounded domain");
    grounding
}
