#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Span {
    pub line: usize,
    pub col: usize,
    pub len: usize,
}

impl Span {
    pub fn new(line: usize, col: usize, len: usize) -> Self {
        Self { line, col, len }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeywordToken {
    Define,
    Domain,
    Problem,
    Requirements,
    Types,
    Constants,
    Predicates,
    Action,
    Parameters,
    Precondition,
    Effect,
    Objects,
    Init,
    Goal,
    And,
    Not,
}

/// Words that open a section when they follow `:`.
const SECTIONS: [(&str, KeywordToken); 12] = [
    ("domain", KeywordToken::Domain), ("requirements", KeywordToken::Requirements),
    ("types", KeywordToken::Types), ("constants", KeywordToken::Constants),
    ("predicates", KeywordToken::Predicates), ("action", KeywordToken::Action),
    ("parameters", KeywordToken::Parameters), ("precondition", KeywordToken::Precondition),
    ("effect", KeywordToken::Effect), ("objects", KeywordToken::Objects),
    ("init", KeywordToken::Init), ("goal", KeywordToken::Goal),
];

/// Words with a meaning right after `(`.
const HEADS: [(&str, KeywordToken); 5] = [
    ("define", KeywordToken::Define), ("domain", KeywordToken::Domain),
    ("problem", KeywordToken::Problem), ("and", KeywordToken::And), ("not", KeywordToken::Not),
];

fn lookup(table: &[(&str, KeywordToken)], word: &str) -> Option<KeywordToken> {
    table.iter().find(|(k, _)| k.eq_ignore_ascii_case(word)).map(|(_, t)| *t)
}

impl KeywordToken {
    /// Keywords only exist after `:` or `(`. Anywhere else the same word is
    /// an ordinary name, so objects and predicates may be called `goal` or `init`.
    pub fn from_word(word: &str, after: Option<TokenKind>) -> Option<Self> {
        match after {
            Some(TokenKind::Colon) => lookup(&SECTIONS, word),
            Some(TokenKind::OpenParenthesis) => lookup(&HEADS, word),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind<'a> {
    OpenParenthesis,
    CloseParenthesis,
    Colon,
    QuestionMark,
    Minus,
    Keyword(KeywordToken),
    Identifier(&'a str),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token<'a> {
    pub span: Span,
    pub kind: TokenKind<'a>,
}
