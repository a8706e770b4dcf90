use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use super::action::ActionSchema;
use super::error::Error;
use super::literal::{Literal, Polarity};
use super::parser::{self, ast, Parser};
use super::wire;

/// Action schemas plus the constants they may mention. Read-only once loaded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Domain {
    pub name: String,
    pub requirements: Vec<String>,
    pub constants: Vec<String>,
    pub actions: Vec<ActionSchema>,
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let requirements = self.requirements.iter().fold(String::new(), |acc, item| acc + " :" + item);
        let constants = self.constants.iter().fold(String::new(), |acc, item| acc + " " + item);
        let actions = self.actions.iter().fold(String::new(), |acc, item| acc + "\n" + &item.to_string());
        write!(f, "(define (domain {})\n(:requirements{})\n(:constants{}){}\n)", self.name, requirements, constants, actions)
    }
}

impl FromStr for Domain {
    type Err = Error;
    fn from_str(pddl: &str) -> Result<Self, Self::Err> {
        Domain::from_pddl("<string>", pddl)
    }
}

impl Domain {
    pub fn from_pddl(path: &str, code: &str) -> Result<Domain, Error> {
        let parse_error = |errors: Vec<parser::Error>| Error::Parse { path: path.to_owned(), source: code.to_owned(), errors };
        match Parser::parse_one(code).map_err(parse_error)? {
            ast::Stmt::Domain(domain) => Domain::try_from(domain).map_err(|e| Error::Invalid(path.to_owned(), e)),
            ast::Stmt::Problem(_) => Err(Error::Invalid(path.to_owned(), "Expected a domain, found a problem.".to_owned())),
        }
    }

    /// Loads a PDDL domain, or a JSON domain when the file ends in `.json`.
    pub fn from_file(filepath: &str) -> Result<Domain, Error> {
        let code = fs::read_to_string(filepath).map_err(|e| Error::Io(filepath.to_owned(), e))?;
        let domain = if is_json(filepath) {
            wire::domain_from_json(filepath, &code)?
        } else {
            Domain::from_pddl(filepath, &code)?
        };
        tracing::info!(path = filepath, domain = %domain.name, actions = domain.actions.len(), "Loaded domain");
        Ok(domain)
    }

    pub fn action(&self, name: &str) -> Option<&ActionSchema> {
        self.actions.iter().find(|a| a.name == name)
    }
}

pub(super) fn is_json(filepath: &str) -> bool {
    Path::new(filepath).extension().map_or(false, |ext| ext.eq_ignore_ascii_case("json"))
}

impl<'a> TryFrom<ast::Domain<'a>> for Domain {
    type Error = String;

    fn try_from(domain: ast::Domain<'a>) -> Result<Self, Self::Error> {
        let constants = domain.constants.iter().flat_map(|l| l.identifiers.iter().map(|s| s.to_string())).collect();
        let mut actions = Vec::new();
        for action in &domain.actions {
            let parameters = action.parameters.iter()
                .flat_map(|l| l.identifiers.iter().map(|v| variable(v)))
                .collect();
            let mut precondition = Vec::new();
            if let Some(expr) = &action.precondition {
                flatten(expr, Polarity::Positive, &mut precondition)
                    .map_err(|e| format!("In precondition of {}: {}", action.name, e))?;
            }
            let mut effect = Vec::new();
            if let Some(expr) = &action.effect {
                flatten(expr, Polarity::Positive, &mut effect)
                    .map_err(|e| format!("In effect of {}: {}", action.name, e))?;
            }
            actions.push(ActionSchema { name: action.name.to_owned(), parameters, precondition, effect });
        }
        Ok(Domain {
            name: domain.name.to_owned(),
            requirements: domain.requirements.iter().map(|r| r.to_string()).collect(),
            constants,
            actions,
        })
    }
}

/// Schema parameters keep their `?` so they can never collide with object names.
fn variable(name: &str) -> String {
    format!("?{}", name)
}

/// Flattens a conjunction of (possibly negated) atoms into literals.
pub(super) fn flatten(expr: &ast::Expr, polarity: Polarity, out: &mut Vec<Literal>) -> Result<(), String> {
    match expr {
        ast::Expr::And(group) if polarity == Polarity::Positive => group.iter().try_for_each(|e| flatten(e, polarity, out)),
        ast::Expr::And(_) => Err("only atoms can be negated".to_owned()),
        ast::Expr::Not(inner) if polarity == Polarity::Positive => flatten(inner, Polarity::Negative, out),
        ast::Expr::Not(_) => Err("double negation is not supported".to_owned()),
        ast::Expr::Literal { name, terms } => {
            let parameters = terms.iter().map(|t| match t {
                ast::Term::Variable(v) => variable(v),
                ast::Term::Constant(c) => c.to_string(),
            }).collect();
            out.push(Literal::new(*name, parameters, polarity));
            Ok(())
        }
    }
}
