use std::iter::Peekable;
use std::str::CharIndices;

use super::tokens::{KeywordToken, Span, Token, TokenKind, TokenKind::*};
use super::{Error, Position};

pub struct Lexer<'a> {
    text: &'a str,
    it: Peekable<CharIndices<'a>>,
    line: usize, // current source line, used for error reporting by Tokens
    col: usize,  // current source column, used for error reporting by Tokens
    prev: Option<TokenKind<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text, it: text.char_indices().peekable(), line: 1, col: 1, prev: None }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token<'a>, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let (offset, c) = self.next_char()?;
        let span = Span::new(self.line, self.col, 1);
        let new_token = match c {
            '(' => Ok(Token { span, kind: OpenParenthesis }),
            ')' => Ok(Token { span, kind: CloseParenthesis }),
            ':' => Ok(Token { span, kind: Colon }),
            '?' => Ok(Token { span, kind: QuestionMark }),
            '-' => Ok(Token { span, kind: Minus }),
            c if c.is_alphabetic() || c == '_' => Ok(self.identifier(offset)),
            c if c.is_ascii_digit() => Ok(self.identifier(offset)),
            _ => Err(Error::new(Position::Span(span), "Unexpected character.")),
        };
        match &new_token {
            Ok(t) => { self.col += t.span.len; self.prev = Some(t.kind); }
            Err(_) => { self.col += 1; self.prev = None; }
        }
        Some(new_token)
    }
}

impl<'a> Lexer<'a> {
    fn next_char(&mut self) -> Option<(usize, char)> {
        loop {
            match self.it.next() {
                // Newline handler:
                Some((_, '\n')) => { self.col = 1; self.line += 1; }
                // Comments:
                Some((_, ';')) => while self.it.next_if(|(_, c)| *c != '\n').is_some() {},
                Some((_, c)) if c.is_whitespace() => self.col += 1,
                c => return c,
            }
        }
    }

    fn identifier(&mut self, offset: usize) -> Token<'a> {
        let mut len = 1;
        while self.it.next_if(|(_, c)| c.is_alphanumeric() || *c == '_' || *c == '-').is_some() {
            len += 1;
        }
        let slice = match self.it.peek() {
            Some((end, _)) => &self.text[offset..*end],
            None => &self.text[offset..],
        };
        let span = Span::new(self.line, self.col, len);
        match KeywordToken::from_word(slice, self.prev) {
            Some(keyword) => Token { span, kind: Keyword(keyword) },
            None => Token { span, kind: Identifier(slice) },
        }
    }
}
