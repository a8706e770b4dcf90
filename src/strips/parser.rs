pub mod ast;
pub mod lexer;
pub mod tokens;

use std::fmt;
use std::iter::Peekable;

use ast::{Stmt, Term, TypedList};
use lexer::Lexer;
use tokens::{KeywordToken, Span, Token, TokenKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Position {
    Span(Span),
    EOF,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Error {
    pub pos: Position,
    pub message: String,
}

impl Error {
    pub fn new(pos: Position, message: &str) -> Self {
        Self { pos, message: String::from(message) }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.pos {
            Position::Span(span) => write!(f, "line:{} col:{} {}", span.line, span.col, self.message),
            Position::EOF => write!(f, "end of input: {}", self.message),
        }
    }
}

impl std::error::Error for Error {}

/// Parses the STRIPS subset of PDDL: `define (domain ...)` and `define (problem ...)`.
/// Types are accepted and kept in the AST, but nothing downstream reads them.
pub struct Parser<'a> {
    lexer: Peekable<Lexer<'a>>,
}

impl<'a> Iterator for Parser<'a> {
    type Item = Result<Stmt<'a>, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.lexer.peek()?;
        let r = self.root();
        if r.is_err() {
            self.error_recover();
        }
        Some(r)
    }
}

const EXPECTED_IDENTIFIER: &str = "Expected identifier.";
const EXPECTED_COLON: &str = "Expected ':'.";
const EXPECTED_OPEN_PARENTHESIS: &str = "Expected '('.";
const EXPECTED_CLOSE_PARENTHESIS: &str = "Expected matched ')'.";

macro_rules! expect {
    ($input:expr, {$($p:pat => $b:expr$(,)?)+}, $err:expr) => {
        match $input {
            $($p => $b,)+
            Some(Ok(Token{span,..})) => Err(Error { pos: Position::Span(span), message: String::from($err) }),
            Some(Err(e)) => Err(e),
            None => Err(Error { pos: Position::EOF, message: String::from($err) })
        }
    };
}

impl<'a> Parser<'a> {
    pub fn new(code: &'a str) -> Self {
        Self { lexer: Lexer::new(code).peekable() }
    }

    /// Parses input that must hold exactly one `define` statement.
    pub fn parse_one(code: &'a str) -> Result<Stmt<'a>, Vec<Error>> {
        let mut statements = Vec::new();
        let mut errors = Vec::new();
        for result in Parser::new(code) {
            match result {
                Ok(stmt) => statements.push(stmt),
                Err(e) => errors.push(e),
            }
        }
        if !errors.is_empty() {
            return Err(errors);
        }
        match statements.len() {
            1 => Ok(statements.remove(0)),
            0 => Err(vec![Error::new(Position::EOF, "Expected a define statement.")]),
            _ => Err(vec![Error::new(Position::EOF, "Expected a single define statement.")]),
        }
    }

    /// Statements are not nested, so after an error the rest of the input is
    /// dropped instead of producing a cascade of follow-up errors.
    fn error_recover(&mut self) {
        self.lexer.by_ref().for_each(drop);
    }

    fn root(&mut self) -> Result<Stmt<'a>, Error> {
        use KeywordToken::{Define, Domain, Problem};
        use TokenKind::{CloseParenthesis, Keyword, OpenParenthesis};
        expect!(self.lexer.next(), {Some(Ok(Token{kind:OpenParenthesis,..})) => Ok(())}, EXPECTED_OPEN_PARENTHESIS)?;
        expect!(self.lexer.next(), {Some(Ok(Token{kind:Keyword(Define),..})) => Ok(())}, "Expected 'define'.")?;
        expect!(self.lexer.next(), {Some(Ok(Token{kind:OpenParenthesis,..})) => Ok(())}, EXPECTED_OPEN_PARENTHESIS)?;
        let body = expect!(self.lexer.next(), {
            Some(Ok(Token{kind:Keyword(Domain),..})) => self.domain(),
            Some(Ok(Token{kind:Keyword(Problem),..})) => self.problem(),
        }, "Expected 'domain' or 'problem'.")?;
        expect!(self.lexer.next(), {Some(Ok(Token{kind:CloseParenthesis,..})) => Ok(())}, EXPECTED_CLOSE_PARENTHESIS)?;
        Ok(body)
    }

    fn domain(&mut self) -> Result<Stmt<'a>, Error> {
        use KeywordToken::{Action, Constants, Predicates, Requirements, Types};
        use TokenKind::{CloseParenthesis, Colon, Identifier, Keyword, OpenParenthesis};
        let name = expect!(self.lexer.next(), {Some(Ok(Token{kind:Identifier(s),..})) => Ok(s)}, "Expected domain name.")?;
        expect!(self.lexer.next(), {Some(Ok(Token{kind:CloseParenthesis,..})) => Ok(())}, EXPECTED_CLOSE_PARENTHESIS)?;
        let mut requirements = Vec::new();
        let mut types = Vec::new();
        let mut constants = Vec::new();
        let mut predicates = Vec::new();
        let mut actions = Vec::new();
        while self.lexer.next_if(|r| matches!(r, Ok(Token{kind:OpenParenthesis,..}))).is_some() {
            expect!(self.lexer.next(), {Some(Ok(Token{kind:Colon,..})) => Ok(())}, EXPECTED_COLON)?;
            expect!(self.lexer.next(), {
                Some(Ok(Token{kind:Keyword(Requirements),..})) => self.requirements().map(|r| requirements = r),
                Some(Ok(Token{kind:Keyword(Types),..})) => self.typed_names().map(|t| types = t),
                Some(Ok(Token{kind:Keyword(Constants),..})) => self.typed_names().map(|c| constants = c),
                Some(Ok(Token{kind:Keyword(Predicates),..})) => self.predicates().map(|p| predicates = p),
                Some(Ok(Token{kind:Keyword(Action),..})) => self.action().map(|a| actions.push(a)),
            }, "Expected :requirements, :types, :constants, :predicates, or :action.")?;
            expect!(self.lexer.next(), {Some(Ok(Token{kind:CloseParenthesis,..})) => Ok(())}, EXPECTED_CLOSE_PARENTHESIS)?;
        }
        Ok(Stmt::Domain(ast::Domain { name, requirements, types, constants, predicates, actions }))
    }

    fn problem(&mut self) -> Result<Stmt<'a>, Error> {
        use KeywordToken::{Domain, Goal, Init, Objects, Requirements};
        use TokenKind::{CloseParenthesis, Colon, Identifier, Keyword, OpenParenthesis};
        let (name, name_span) = expect!(self.lexer.next(), {Some(Ok(Token{kind:Identifier(s),span})) => Ok((s, span))}, "Expected problem name.")?;
        expect!(self.lexer.next(), {Some(Ok(Token{kind:CloseParenthesis,..})) => Ok(())}, EXPECTED_CLOSE_PARENTHESIS)?;
        let mut domain = None;
        let mut requirements = Vec::new();
        let mut objects = Vec::new();
        let mut init = None;
        let mut goal = None;
        while self.lexer.next_if(|r| matches!(r, Ok(Token{kind:OpenParenthesis,..}))).is_some() {
            expect!(self.lexer.next(), {Some(Ok(Token{kind:Colon,..})) => Ok(())}, EXPECTED_COLON)?;
            expect!(self.lexer.next(), {
                Some(Ok(Token{kind:Keyword(Domain),..})) => expect!(self.lexer.next(), {Some(Ok(Token{kind:Identifier(s),..})) => Ok(domain = Some(s))}, EXPECTED_IDENTIFIER),
                Some(Ok(Token{kind:Keyword(Requirements),..})) => self.requirements().map(|r| requirements = r),
                Some(Ok(Token{kind:Keyword(Objects),..})) => self.typed_names().map(|o| objects = o),
                Some(Ok(Token{kind:Keyword(Init),..})) => self.and().map(|e| init = Some(e)), // force it to use a vector of Expressions
                Some(Ok(Token{kind:Keyword(Goal),..})) => self.expr().map(|e| goal = Some(e)),
            }, "Expected :domain, :requirements, :objects, :init, or :goal.")?;
            expect!(self.lexer.next(), {Some(Ok(Token{kind:CloseParenthesis,..})) => Ok(())}, EXPECTED_CLOSE_PARENTHESIS)?;
        }
        let missing = |section: &str| Error { pos: Position::Span(name_span), message: format!("Problem is missing {}.", section) };
        let domain = domain.ok_or_else(|| missing(":domain"))?;
        let init = init.ok_or_else(|| missing(":init"))?;
        let goal = goal.ok_or_else(|| missing(":goal"))?;
        Ok(Stmt::Problem(ast::Problem { name, domain, requirements, objects, init, goal }))
    }

    fn requirements(&mut self) -> Result<Vec<&'a str>, Error> {
        use TokenKind::{Colon, Identifier};
        let mut r = Vec::new();
        while self.lexer.next_if(|t| matches!(t, Ok(Token{kind:Colon,..}))).is_some() {
            r.push(expect!(self.lexer.next(), {Some(Ok(Token{kind:Identifier(s),..})) => Ok(s)}, "Expected requirement.")?);
        }
        Ok(r)
    }

    fn predicates(&mut self) -> Result<Vec<ast::Predicate<'a>>, Error> {
        use TokenKind::{CloseParenthesis, Identifier, OpenParenthesis};
        let mut predicates = Vec::new();
        while self.lexer.next_if(|t| matches!(t, Ok(Token{kind:OpenParenthesis,..}))).is_some() {
            let name = expect!(self.lexer.next(), {Some(Ok(Token{kind:Identifier(s),..})) => Ok(s)}, EXPECTED_IDENTIFIER)?;
            let variables = self.typed_variables()?;
            predicates.push(ast::Predicate { name, variables });
            expect!(self.lexer.next(), {Some(Ok(Token{kind:CloseParenthesis,..})) => Ok(())}, EXPECTED_CLOSE_PARENTHESIS)?;
        }
        Ok(predicates)
    }

    fn action(&mut self) -> Result<ast::Action<'a>, Error> {
        use KeywordToken::{Effect, Parameters, Precondition};
        use TokenKind::{CloseParenthesis, Colon, Identifier, Keyword, OpenParenthesis};
        let name = expect!(self.lexer.next(), {Some(Ok(Token{kind:Identifier(s),..})) => Ok(s)}, EXPECTED_IDENTIFIER)?;
        let mut parameters = Vec::new();
        let mut precondition = None;
        let mut effect = None;
        while self.lexer.next_if(|t| matches!(t, Ok(Token{kind:Colon,..}))).is_some() {
            expect!(self.lexer.next(), {
                Some(Ok(Token{kind:Keyword(Parameters),..})) => {
                    expect!(self.lexer.next(), {Some(Ok(Token{kind:OpenParenthesis,..})) => Ok(())}, EXPECTED_OPEN_PARENTHESIS)?;
                    parameters = self.typed_variables()?;
                    expect!(self.lexer.next(), {Some(Ok(Token{kind:CloseParenthesis,..})) => Ok(())}, EXPECTED_CLOSE_PARENTHESIS)
                },
                Some(Ok(Token{kind:Keyword(Precondition),..})) => self.expr().map(|e| precondition = Some(e)),
                Some(Ok(Token{kind:Keyword(Effect),..})) => self.expr().map(|e| effect = Some(e)),
            }, "Expected :parameters, :precondition, or :effect.")?;
        }
        Ok(ast::Action { name, parameters, precondition, effect })
    }

    fn expr(&mut self) -> Result<ast::Expr<'a>, Error> {
        use KeywordToken::{And, Not};
        use TokenKind::{CloseParenthesis, Identifier, Keyword, OpenParenthesis};
        expect!(self.lexer.next(), {Some(Ok(Token{kind:OpenParenthesis,..})) => Ok(())}, EXPECTED_OPEN_PARENTHESIS)?;
        if self.lexer.next_if(|t| matches!(t, Ok(Token{kind:CloseParenthesis,..}))).is_some() {
            return Ok(ast::Expr::And(Vec::new()));
        }
        let result = expect!(self.lexer.next(), {
            Some(Ok(Token{kind:Keyword(And),..})) => self.and(),
            Some(Ok(Token{kind:Keyword(Not),..})) => self.not(),
            Some(Ok(Token{kind:Identifier(s),..})) => Ok(self.literal(s)),
        }, "Expected expression.")?;
        expect!(self.lexer.next(), {Some(Ok(Token{kind:CloseParenthesis,..})) => Ok(())}, EXPECTED_CLOSE_PARENTHESIS)?;
        Ok(result)
    }

    fn and(&mut self) -> Result<ast::Expr<'a>, Error> {
        use TokenKind::OpenParenthesis;
        let mut group = Vec::new();
        while matches!(self.lexer.peek(), Some(Ok(Token{kind:OpenParenthesis,..}))) {
            group.push(self.expr()?)
        }
        Ok(ast::Expr::And(group))
    }

    fn not(&mut self) -> Result<ast::Expr<'a>, Error> {
        Ok(ast::Expr::Not(Box::new(self.expr()?)))
    }

    fn literal(&mut self, name: &'a str) -> ast::Expr<'a> {
        use TokenKind::{Identifier, QuestionMark};
        let mut terms = Vec::new();
        loop {
            if self.lexer.next_if(|t| matches!(t, Ok(Token{kind:QuestionMark,..}))).is_some() {
                match self.lexer.next_if(|t| matches!(t, Ok(Token{kind:Identifier(_),..}))) {
                    Some(Ok(Token{kind:Identifier(s),..})) => terms.push(Term::Variable(s)),
                    // Leave the offending token to the closing-parenthesis check.
                    _ => break,
                }
            } else if let Some(Ok(Token{kind:Identifier(s),..})) = self.lexer.next_if(|t| matches!(t, Ok(Token{kind:Identifier(_),..}))) {
                terms.push(Term::Constant(s));
            } else {
                break;
            }
        }
        ast::Expr::Literal { name, terms }
    }

    /// `?a ?b - kind ?c`
    fn typed_variables(&mut self) -> Result<Vec<TypedList<'a>>, Error> {
        use TokenKind::{Identifier, Minus, QuestionMark};
        let mut lists = Vec::new();
        let mut identifiers = Vec::new();
        loop {
            if self.lexer.next_if(|t| matches!(t, Ok(Token{kind:QuestionMark,..}))).is_some() {
                identifiers.push(expect!(self.lexer.next(), {Some(Ok(Token{kind:Identifier(s),..})) => Ok(s)}, EXPECTED_IDENTIFIER)?);
            } else if self.lexer.next_if(|t| matches!(t, Ok(Token{kind:Minus,..}))).is_some() {
                let kind = expect!(self.lexer.next(), {Some(Ok(Token{kind:Identifier(s),..})) => Ok(s)}, "Expected type after '-'.")?;
                lists.push(TypedList { identifiers: std::mem::take(&mut identifiers), kind: Some(kind) });
            } else {
                break;
            }
        }
        if !identifiers.is_empty() {
            lists.push(TypedList { identifiers, kind: None });
        }
        Ok(lists)
    }

    /// `a b - kind c`
    fn typed_names(&mut self) -> Result<Vec<TypedList<'a>>, Error> {
        use TokenKind::{Identifier, Minus};
        let mut lists = Vec::new();
        let mut identifiers = Vec::new();
        loop {
            if let Some(Ok(Token{kind:Identifier(s),..})) = self.lexer.next_if(|t| matches!(t, Ok(Token{kind:Identifier(_),..}))) {
                identifiers.push(s);
            } else if self.lexer.next_if(|t| matches!(t, Ok(Token{kind:Minus,..}))).is_some() {
                let kind = expect!(self.lexer.next(), {Some(Ok(Token{kind:Identifier(s),..})) => Ok(s)}, "Expected type after '-'.")?;
                lists.push(TypedList { identifiers: std::mem::take(&mut identifiers), kind: Some(kind) });
            } else {
                break;
            }
        }
        if !identifiers.is_empty() {
            lists.push(TypedList { identifiers, kind: None });
        }
        Ok(lists)
    }
}
