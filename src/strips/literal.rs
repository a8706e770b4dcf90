use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::Serialize;

/// Whether a literal asserts a fact (`Positive`) or requires its absence (`Negative`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Positive,
    Negative,
}

/// A named fact with positional parameters.
///
/// Equality, ordering and hashing only look at the name and the parameters.
/// Polarity matters when a literal is read as a precondition, an effect or a
/// goal, never when deciding whether two literals denote the same fact.
#[derive(Debug, Clone, Serialize)]
pub struct Literal {
    pub name: String,
    pub parameters: Vec<String>,
    pub polarity: Polarity,
}

impl Literal {
    pub fn new<S: Into<String>>(name: S, parameters: Vec<String>, polarity: Polarity) -> Self {
        Self { name: name.into(), parameters, polarity }
    }

    pub fn positive(name: &str, parameters: &[&str]) -> Self {
        Self::new(name, parameters.iter().map(|p| p.to_string()).collect(), Polarity::Positive)
    }

    pub fn negative(name: &str, parameters: &[&str]) -> Self {
        Self::new(name, parameters.iter().map(|p| p.to_string()).collect(), Polarity::Negative)
    }

    #[inline]
    pub fn is_positive(&self) -> bool {
        self.polarity == Polarity::Positive
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        self.polarity == Polarity::Negative
    }

    /// Same fact, positive polarity. States only ever store these.
    pub fn as_fact(&self) -> Literal {
        Literal { name: self.name.clone(), parameters: self.parameters.clone(), polarity: Polarity::Positive }
    }
}

impl PartialEq for Literal {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.parameters == other.parameters
    }
}

impl Eq for Literal {}

impl PartialOrd for Literal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Literal {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name).then_with(|| self.parameters.cmp(&other.parameters))
    }
}

impl Hash for Literal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.parameters.hash(state);
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_negative() {
            write!(f, "(not ")?;
        }
        write!(f, "({}", self.name)?;
        for p in &self.parameters {
            write!(f, " {}", p)?;
        }
        write!(f, ")")?;
        if self.is_negative() {
            write!(f, ")")?;
        }
        Ok(())
    }
}

/// Closed-world set of facts that currently hold.
///
/// Facts are kept sorted, so two states holding the same facts compare and
/// hash equal no matter how they were built. The state is its own
/// memoization key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct State(BTreeSet<Literal>);

impl State {
    pub fn new() -> Self {
        Self(BTreeSet::new())
    }

    pub fn contains(&self, literal: &Literal) -> bool {
        self.0.contains(literal)
    }

    /// New state that also holds `literal`. No-op if it is already there.
    pub fn add(&self, literal: &Literal) -> State {
        let mut facts = self.0.clone();
        facts.insert(literal.as_fact());
        State(facts)
    }

    /// New state without any member equal to `literal`.
    pub fn remove(&self, literal: &Literal) -> State {
        State(self.0.iter().filter(|fact| *fact != literal).cloned().collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Literal> {
        self.0.iter()
    }
}

impl FromIterator<Literal> for State {
    fn from_iter<I: IntoIterator<Item = Literal>>(iter: I) -> Self {
        State(iter.into_iter().map(|l| l.as_fact()).collect())
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let facts = self.0.iter().take(1).fold(String::new(), |acc, item| acc + &item.to_string());
        let facts = self.0.iter().skip(1).fold(facts, |acc, item| acc + " " + &item.to_string());
        write!(f, "{{{}}}", facts)
    }
}
