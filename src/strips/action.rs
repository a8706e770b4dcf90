use std::fmt;

use serde::Serialize;

use super::literal::Literal;

/// Parameterized action. Precondition and effect literals may reference the
/// schema's parameters by symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionSchema {
    pub name: String,
    pub parameters: Vec<String>,
    pub precondition: Vec<Literal>,
    pub effect: Vec<Literal>,
}

impl ActionSchema {
    pub fn arity(&self) -> usize {
        self.parameters.len()
    }
}

fn literal_list(literals: &[Literal]) -> String {
    let list = literals.iter().fold(String::new(), |acc, item| acc + " " + &item.to_string());
    format!("(and{})", list)
}

impl fmt::Display for ActionSchema {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let parameters = self.parameters.iter().take(1).fold(String::new(), |acc, item| acc + item);
        let parameters = self.parameters.iter().skip(1).fold(parameters, |acc, item| acc + " " + item);
        write!(f, "(:action {} :parameters ({}) :precondition {} :effect {})",
            self.name, parameters, literal_list(&self.precondition), literal_list(&self.effect))
    }
}

/// Assignment of one object to every schema parameter, in parameter order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Binding(Vec<(String, String)>);

impl Binding {
    pub fn new(parameters: &[String], objects: &[&str]) -> Self {
        Self(parameters.iter().cloned().zip(objects.iter().map(|o| o.to_string())).collect())
    }

    pub fn get(&self, parameter: &str) -> Option<&str> {
        self.0.iter().find(|(p, _)| p == parameter).map(|(_, o)| o.as_str())
    }

    /// Bound objects in schema parameter order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(_, o)| o.as_str())
    }
}

/// Schema with every parameter bound.
#[derive(Debug, Clone, PartialEq)]
pub struct GroundAction<'d> {
    pub schema: &'d ActionSchema,
    pub binding: Binding,
    pub precondition: Vec<Literal>,
    pub effect: Vec<Literal>,
}

impl GroundAction<'_> {
    pub fn to_step(&self) -> PlanStep {
        PlanStep { name: self.schema.name.clone(), parameters: self.binding.values().map(str::to_owned).collect() }
    }
}

impl fmt::Display for GroundAction<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.to_step(), f)
    }
}

/// One entry of a solution plan: the action name and its bound objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanStep {
    pub name: String,
    pub parameters: Vec<String>,
}

impl fmt::Display for PlanStep {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)?;
        self.parameters.iter().try_for_each(|p| write!(f, " {}", p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack() -> ActionSchema {
        ActionSchema {
            name: "stack".to_owned(),
            parameters: vec!["?x".to_owned(), "?y".to_owned()],
            precondition: vec![Literal::positive("clear", &["?x"])],
            effect: vec![Literal::negative("clear", &["?y"])],
        }
    }

    #[test]
    fn test_binding_lookup() {
        let schema = stack();
        let binding = Binding::new(&schema.parameters, &["a", "b"]);
        assert_eq!(binding.get("?x"), Some("a"));
        assert_eq!(binding.get("?y"), Some("b"));
        assert_eq!(binding.get("?z"), None);
        assert_eq!(binding.values().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_display() {
        let schema = stack();
        assert_eq!(schema.to_string(),
            "(:action stack :parameters (?x ?y) :precondition (and (clear ?x)) :effect (and (not (clear ?y))))");
        let step = PlanStep { name: "stack".to_owned(), parameters: vec!["a".to_owned(), "b".to_owned()] };
        assert_eq!(step.to_string(), "stack a b");
    }
}
