//! Contains the [`Parser`] cursor and the matching primitives all grammar rules
//! are composed from.

use crate::lexical::{
    token::{Identifier, Newline, Numeric, Operator, Semicolon, Token},
    token_stream::TokenStream,
};

use super::error::{ParseResult, SyntaxKind, UnexpectedToken};

/// The parser cursor over a [`TokenStream`].
///
/// Holds one token of lookahead through [`Self::peek`] plus bounded
/// non-consuming lookahead for the constraint/directive ambiguity. Once the
/// cursor is past the last token every read keeps returning [`None`].
#[derive(Debug, Clone, Copy)]
pub struct Parser<'a> {
    stream: &'a TokenStream,
    position: usize,
}

impl<'a> Parser<'a> {
    /// Creates a new parser at the beginning of the given token stream.
    #[must_use]
    pub fn new(stream: &'a TokenStream) -> Self {
        Self {
            stream,
            position: 0,
        }
    }

    /// Returns the current token without consuming it.
    #[must_use]
    pub fn peek(&self) -> Option<&'a Token> {
        self.stream.get(self.position)
    }

    /// Returns the token `offset` positions ahead of the current one without consuming anything.
    #[must_use]
    pub fn peek_at(&self, offset: usize) -> Option<&'a Token> {
        self.stream.get(self.position + offset)
    }

    /// Consumes and returns the current token.
    pub fn next_token(&mut self) -> Option<&'a Token> {
        let token = self.stream.get(self.position);
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    /// Whether the cursor is past the last token.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.position >= self.stream.len()
    }

    /// Decides whether the line starting at the cursor is a constraint.
    ///
    /// A constraint and a plain directive both start with identifier/number
    /// tokens, so the cursor scans past them until some other token is
    /// reached; the line is a constraint exactly when that token is an
    /// operator. Nothing is consumed.
    #[must_use]
    pub fn line_begins_constraint(&self) -> bool {
        let mut offset = 0;

        while matches!(
            self.peek_at(offset),
            Some(Token::Identifier(..) | Token::Numeric(..))
        ) {
            offset += 1;
        }

        matches!(self.peek_at(offset), Some(Token::Operator(..)))
    }

    /// Builds the failure value for an expectation not met at the current token.
    pub(super) fn unexpected(&self, expected: SyntaxKind) -> UnexpectedToken {
        UnexpectedToken {
            expected,
            found: self.peek().cloned(),
        }
    }

    /// Consumes an identifier token, failing with the given expectation otherwise.
    pub(super) fn expect_identifier_as(&mut self, expected: SyntaxKind) -> ParseResult<Identifier> {
        match self.peek() {
            Some(Token::Identifier(identifier)) => {
                self.next_token();
                Ok(identifier.clone())
            }
            _ => Err(self.unexpected(expected).into()),
        }
    }

    /// Consumes an identifier token.
    pub(super) fn expect_identifier(&mut self) -> ParseResult<Identifier> {
        self.expect_identifier_as(SyntaxKind::Identifier)
    }

    /// Consumes a numeric token, failing with the given expectation otherwise.
    pub(super) fn expect_numeric_as(&mut self, expected: SyntaxKind) -> ParseResult<Numeric> {
        match self.peek() {
            Some(Token::Numeric(numeric)) => {
                self.next_token();
                Ok(numeric.clone())
            }
            _ => Err(self.unexpected(expected).into()),
        }
    }

    /// Consumes a numeric token.
    pub(super) fn expect_numeric(&mut self) -> ParseResult<Numeric> {
        self.expect_numeric_as(SyntaxKind::Numeric)
    }

    /// Consumes an operator token.
    pub(super) fn expect_operator(&mut self) -> ParseResult<Operator> {
        match self.peek() {
            Some(Token::Operator(operator)) => {
                self.next_token();
                Ok(operator.clone())
            }
            _ => Err(self.unexpected(SyntaxKind::Operator).into()),
        }
    }

    /// Consumes a `;` token.
    pub(super) fn expect_semicolon(&mut self) -> ParseResult<Semicolon> {
        match self.peek() {
            Some(Token::Semicolon(semicolon)) => {
                self.next_token();
                Ok(semicolon.clone())
            }
            _ => Err(self.unexpected(SyntaxKind::Semicolon).into()),
        }
    }

    /// Consumes the line terminator.
    ///
    /// The physical end of the file is accepted in place of a newline, so the
    /// last line of a file need not end in a line break.
    pub(super) fn expect_line_end(&mut self) -> ParseResult<Option<Newline>> {
        match self.peek() {
            Some(Token::Newline(newline)) => {
                self.next_token();
                Ok(Some(newline.clone()))
            }
            None => Ok(None),
            _ => Err(self.unexpected(SyntaxKind::LineEnd).into()),
        }
    }
}
