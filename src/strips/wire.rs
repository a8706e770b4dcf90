//! JSON form of domains and problems.
//!
//! ```json
//! { "action": "on", "parameters": ["a", "b"], "operation": "not" }
//! ```
//!
//! Literals without an `operation`, or with `"and"`, are positive.

use serde::Deserialize;

use super::action::ActionSchema;
use super::domain::Domain;
use super::error::Error;
use super::literal::{Literal, Polarity};
use super::problem::Problem;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Operation {
    And,
    Not,
}

#[derive(Debug, Deserialize)]
struct WireLiteral {
    action: String,
    #[serde(default)]
    parameters: Vec<String>,
    #[serde(default)]
    operation: Option<Operation>,
}

impl From<WireLiteral> for Literal {
    fn from(l: WireLiteral) -> Self {
        let polarity = match l.operation {
            Some(Operation::Not) => Polarity::Negative,
            Some(Operation::And) | None => Polarity::Positive,
        };
        Literal::new(l.action, l.parameters, polarity)
    }
}

#[derive(Debug, Deserialize)]
struct WireState {
    actions: Vec<WireLiteral>,
}

#[derive(Debug, Deserialize)]
struct WireAction {
    action: String,
    #[serde(default)]
    parameters: Vec<String>,
    #[serde(default)]
    precondition: Vec<WireLiteral>,
    #[serde(default)]
    effect: Vec<WireLiteral>,
}

impl From<WireAction> for ActionSchema {
    fn from(a: WireAction) -> Self {
        ActionSchema {
            name: a.action,
            parameters: a.parameters,
            precondition: a.precondition.into_iter().map(Literal::from).collect(),
            effect: a.effect.into_iter().map(Literal::from).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireDomain {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    constants: Vec<String>,
    actions: Vec<WireAction>,
}

#[derive(Debug, Deserialize)]
struct WireProblem {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    domain: Option<String>,
    #[serde(default)]
    objects: Vec<String>,
    states: Vec<WireState>,
}

pub fn domain_from_json(path: &str, text: &str) -> Result<Domain, Error> {
    let wire: WireDomain = serde_json::from_str(text).map_err(|e| Error::Json(path.to_owned(), e))?;
    Ok(Domain {
        name: wire.name.unwrap_or_else(|| "unnamed".to_owned()),
        requirements: Vec::new(),
        constants: wire.constants,
        actions: wire.actions.into_iter().map(ActionSchema::from).collect(),
    })
}

/// `states[0]` is the initial state and `states[1]` the goal.
pub fn problem_from_json(path: &str, text: &str) -> Result<Problem, Error> {
    let wire: WireProblem = serde_json::from_str(text).map_err(|e| Error::Json(path.to_owned(), e))?;
    let invalid = |message: String| Error::Invalid(path.to_owned(), message);
    let [initial, goal]: [WireState; 2] = wire.states.try_into()
        .map_err(|states: Vec<WireState>| invalid(format!("Expected exactly 2 states (initial, goal), found {}.", states.len())))?;
    Problem::new(
        wire.name.as_deref().unwrap_or("unnamed"),
        wire.domain.as_deref().unwrap_or("unnamed"),
        wire.objects,
        initial.actions.into_iter().map(Literal::from).collect(),
        goal.actions.into_iter().map(Literal::from).collect(),
    ).map_err(invalid)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::strips::literal::State;

    const DOMAIN: &str = r#"{ "actions": [{
        "action": "stack",
        "parameters": ["x", "y"],
        "precondition": [
            { "action": "clear", "parameters": ["x"] },
            { "action": "clear", "parameters": ["y"], "operation": "and" },
            { "action": "on", "parameters": ["x", "y"], "operation": "not" }
        ],
        "effect": [
            { "action": "on", "parameters": ["x", "y"] },
            { "action": "clear", "parameters": ["y"], "operation": "not" }
        ]
    }]}"#;

    const PROBLEM: &str = r#"{ "states": [
        { "actions": [
            { "action": "on", "parameters": ["a", "table"] },
            { "action": "clear", "parameters": ["a"] },
            { "action": "clear", "parameters": ["b"] }
        ]},
        { "actions": [{ "action": "on", "parameters": ["a", "b"] }] }
    ]}"#;

    #[test]
    fn test_domain() {
        let domain = domain_from_json("d.json", DOMAIN).unwrap();
        let stack = domain.action("stack").unwrap();
        assert_eq!(stack.parameters, vec!["x", "y"]);
        assert_eq!(stack.precondition.iter().map(|l| l.polarity).collect::<Vec<_>>(),
            vec![Polarity::Positive, Polarity::Positive, Polarity::Negative]);
        assert_eq!(stack.effect[1], Literal::negative("clear", &["y"]));
        assert!(stack.effect[1].is_negative());
    }

    #[test]
    fn test_problem() {
        let problem = problem_from_json("p.json", PROBLEM).unwrap();
        assert_eq!(problem.objects, vec!["a", "table", "b"]);
        let expected: State = vec![
            Literal::positive("on", &["a", "table"]),
            Literal::positive("clear", &["a"]),
            Literal::positive("clear", &["b"]),
        ].into_iter().collect();
        assert_eq!(problem.initial, expected);
        assert_eq!(problem.goal, vec![Literal::positive("on", &["a", "b"])]);
    }

    #[test]
    fn test_declared_objects_win() {
        let text = r#"{ "objects": ["b", "a", "b"], "states": [{ "actions": [] }, { "actions": [] }] }"#;
        let problem = problem_from_json("p.json", text).unwrap();
        assert_eq!(problem.objects, vec!["b", "a"]);
    }

    #[test]
    fn test_state_count() {
        let text = r#"{ "states": [{ "actions": [] }] }"#;
        match problem_from_json("p.json", text) {
            Err(Error::Invalid(_, message)) => assert_eq!(message, "Expected exactly 2 states (initial, goal), found 1."),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_unknown_operation() {
        let text = r#"{ "actions": [{ "action": "a", "parameters": [], "precondition": [
            { "action": "p", "parameters": [], "operation": "or" }], "effect": [] }] }"#;
        assert!(matches!(domain_from_json("d.json", text), Err(Error::Json(_, _))));
    }

    #[test]
    fn test_from_file() {
        use tempfile::Builder;
        let mut file = Builder::new().suffix(".json").tempfile().expect("Unable to create temporary file");
        write!(file.as_file_mut(), "{}", PROBLEM).expect("Unable to write to tempfile");
        let problem = Problem::from_file(&file.path().display().to_string()).expect("Unable to load problem");
        assert_eq!(problem.goal.len(), 1);
    }
}
