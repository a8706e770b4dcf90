use std::fmt;
use std::fs;
use std::str::FromStr;

use super::domain::{flatten, is_json};
use super::error::Error;
use super::literal::{Literal, Polarity, State};
use super::parser::{self, ast, Parser};
use super::wire;

/// One planning task: the objects in play, where we start, and what must hold at the end.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Problem {
    pub name: String,
    pub domain: String,
    pub objects: Vec<String>,
    pub initial: State,
    pub goal: Vec<Literal>,
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let objects = self.objects.iter().fold(String::new(), |acc, item| acc + " " + item);
        let init = self.initial.iter().fold(String::new(), |acc, item| acc + " " + &item.to_string());
        let goal = self.goal.iter().fold(String::new(), |acc, item| acc + " " + &item.to_string());
        write!(f, "(define (problem {})\n(:domain {})\n(:objects{})\n(:init{})\n(:goal (and{}))\n)",
            self.name, self.domain, objects, init, goal)
    }
}

impl FromStr for Problem {
    type Err = Error;
    fn from_str(pddl: &str) -> Result<Self, Self::Err> {
        Problem::from_pddl("<string>", pddl)
    }
}

impl Problem {
    pub fn from_pddl(path: &str, code: &str) -> Result<Problem, Error> {
        let parse_error = |errors: Vec<parser::Error>| Error::Parse { path: path.to_owned(), source: code.to_owned(), errors };
        match Parser::parse_one(code).map_err(parse_error)? {
            ast::Stmt::Problem(problem) => Problem::try_from(problem).map_err(|e| Error::Invalid(path.to_owned(), e)),
            ast::Stmt::Domain(_) => Err(Error::Invalid(path.to_owned(), "Expected a problem, found a domain.".to_owned())),
        }
    }

    /// Loads a PDDL problem, or a JSON problem when the file ends in `.json`.
    pub fn from_file(filepath: &str) -> Result<Problem, Error> {
        let code = fs::read_to_string(filepath).map_err(|e| Error::Io(filepath.to_owned(), e))?;
        let problem = if is_json(filepath) {
            wire::problem_from_json(filepath, &code)?
        } else {
            Problem::from_pddl(filepath, &code)?
        };
        tracing::info!(path = filepath, problem = %problem.name, objects = problem.objects.len(),
            facts = problem.initial.len(), goals = problem.goal.len(), "Loaded problem");
        Ok(problem)
    }

    /// Builds a problem from literals that were already flattened.
    ///
    /// When no objects are declared, the universe is every symbol of the
    /// initial state in order of first appearance.
    pub fn new(name: &str, domain: &str, objects: Vec<String>, initial: Vec<Literal>, goal: Vec<Literal>) -> Result<Problem, String> {
        if let Some(l) = initial.iter().find(|l| l.is_negative()) {
            return Err(format!("Initial state cannot hold a negated fact {}", l));
        }
        let objects = if objects.is_empty() { objects_of(&initial) } else { dedup(objects) };
        Ok(Problem {
            name: name.to_owned(),
            domain: domain.to_owned(),
            objects,
            initial: initial.into_iter().collect(),
            goal,
        })
    }
}

fn dedup(symbols: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(symbols.len());
    for s in symbols {
        if !out.contains(&s) {
            out.push(s);
        }
    }
    out
}

fn objects_of(literals: &[Literal]) -> Vec<String> {
    dedup(literals.iter().flat_map(|l| l.parameters.iter().cloned()).collect())
}

impl<'a> TryFrom<ast::Problem<'a>> for Problem {
    type Error = String;

    fn try_from(problem: ast::Problem<'a>) -> Result<Self, Self::Error> {
        let objects = problem.objects.iter().flat_map(|l| l.identifiers.iter().map(|s| s.to_string())).collect();
        let mut initial = Vec::new();
        flatten(&problem.init, Polarity::Positive, &mut initial).map_err(|e| format!("In :init: {}", e))?;
        let mut goal = Vec::new();
        flatten(&problem.goal, Polarity::Positive, &mut goal).map_err(|e| format!("In :goal: {}", e))?;
        if let Some(l) = initial.iter().chain(goal.iter()).find(|l| l.parameters.iter().any(|p| p.starts_with('?'))) {
            return Err(format!("Problem literals must be ground, found {}", l));
        }
        Problem::new(problem.name, problem.domain, objects, initial, goal)
    }
}
