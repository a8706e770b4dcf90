#[derive(PartialEq, Debug)]
pub enum Stmt<'a> {
    Domain(Domain<'a>),
    Problem(Problem<'a>),
}

#[derive(PartialEq, Debug)]
pub struct Problem<'a> {
    pub name: &'a str,
    pub domain: &'a str,
    pub requirements: Vec<&'a str>,
    pub objects: Vec<TypedList<'a>>,
    pub init: Expr<'a>,
    pub goal: Expr<'a>,
}

#[derive(PartialEq, Debug)]
pub struct Domain<'a> {
    pub name: &'a str,
    pub requirements: Vec<&'a str>,
    pub types: Vec<TypedList<'a>>,
    pub constants: Vec<TypedList<'a>>,
    pub predicates: Vec<Predicate<'a>>,
    pub actions: Vec<Action<'a>>,
}

#[derive(PartialEq, Debug, Clone, Copy)]
pub enum Term<'a> {
    Variable(&'a str),
    Constant(&'a str),
}

#[derive(PartialEq, Debug)]
pub enum Expr<'a> {
    And(Vec<Expr<'a>>),
    Not(Box<Expr<'a>>),
    Literal { name: &'a str, terms: Vec<Term<'a>> },
}

#[derive(PartialEq, Debug)]
pub struct Action<'a> {
    pub name: &'a str,
    pub parameters: Vec<TypedList<'a>>,
    pub precondition: Option<Expr<'a>>,
    pub effect: Option<Expr<'a>>,
}

#[derive(PartialEq, Debug)]
pub struct Predicate<'a> {
    pub name: &'a str,
    pub variables: Vec<TypedList<'a>>,
}

/// `a b c - kind`. Untyped lists have no kind.
#[derive(PartialEq, Debug)]
pub struct TypedList<'a> {
    pub identifiers: Vec<&'a str>,
    pub kind: Option<&'a str>,
}

#[cfg(test)]
impl<'a> Stmt<'a> {
    pub fn unwrap_domain(self) -> Domain<'a> {
        match self {
            Stmt::Domain(d) => d,
            Stmt::Problem(_) => panic!("Expected domain."),
        }
    }
}
