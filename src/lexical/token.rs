//! Contains the [`Token`] struct and its related types.

use std::{collections::HashMap, str::FromStr, sync::OnceLock};

use crate::base::source_file::{SourceElement, SourceIterator, Span};
use derive_more::From;
use enum_as_inner::EnumAsInner;
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

/// Is an enumeration representing the comparison operators of the constraint grammar.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter)]
#[allow(missing_docs)]
pub enum OperatorKind {
    Greater,
    GreaterOrEqual,
    NotEqual,
    Equal,
}

/// Is an error that is returned when a string cannot be parsed into an [`OperatorKind`] in
/// [`FromStr`] trait implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, thiserror::Error)]
#[error("invalid string representation of operator.")]
pub struct OperatorParseError;

impl FromStr for OperatorKind {
    type Err = OperatorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        static STRING_OPERATOR_MAP: OnceLock<HashMap<&'static str, OperatorKind>> = OnceLock::new();
        let map = STRING_OPERATOR_MAP.get_or_init(|| {
            let mut map = HashMap::new();

            for operator in Self::iter() {
                map.insert(operator.as_str(), operator);
            }

            map
        });

        map.get(s).copied().ok_or(OperatorParseError)
    }
}

impl OperatorKind {
    /// Gets the string representation of the operator as a `&str`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Greater => ">",
            Self::GreaterOrEqual => ">=",
            Self::NotEqual => "!=",
            Self::Equal => "==",
        }
    }
}

/// Is an enumeration containing all kinds of tokens in the configuration format.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, From, EnumAsInner)]
#[allow(missing_docs)]
pub enum Token {
    Identifier(Identifier),
    Numeric(Numeric),
    Operator(Operator),
    Semicolon(Semicolon),
    Comment(Comment),
    Newline(Newline),
    Unknown(Unknown),
}

impl Token {
    /// Returns the span of the token.
    #[must_use]
    pub fn span(&self) -> &Span {
        match self {
            Self::Identifier(token) => &token.span,
            Self::Numeric(token) => &token.span,
            Self::Operator(token) => &token.span,
            Self::Semicolon(token) => &token.span,
            Self::Comment(token) => &token.span,
            Self::Newline(token) => &token.span,
            Self::Unknown(token) => &token.span,
        }
    }
}

impl SourceElement for Token {
    fn span(&self) -> Span {
        match self {
            Self::Identifier(token) => token.span(),
            Self::Numeric(token) => token.span(),
            Self::Operator(token) => token.span(),
            Self::Semicolon(token) => token.span(),
            Self::Comment(token) => token.span(),
            Self::Newline(token) => token.span(),
            Self::Unknown(token) => token.span(),
        }
    }
}

/// Represents an identifier: a tag name, a genotype, a theta or parameter
/// reference, or a bare filename.
///
/// Identifiers are deliberately permissive. They start with a letter, `/`,
/// `\` or `.` and run until whitespace or `;`, so path-like values such as
/// `ped/file.pre` lex as a single token.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Identifier {
    /// Is the span that makes up the token.
    pub span: Span,
}

impl SourceElement for Identifier {
    fn span(&self) -> Span {
        self.span.clone()
    }
}

/// Represents a numeric value, optionally signed, with at most one decimal point.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Numeric {
    /// Is the span that makes up the token.
    pub span: Span,
}

impl Numeric {
    /// Whether the token is a plain integer without a decimal point.
    #[must_use]
    pub fn is_integer(&self) -> bool {
        !self.span.str().contains('.')
    }
}

impl SourceElement for Numeric {
    fn span(&self) -> Span {
        self.span.clone()
    }
}

/// Represents a comparison operator of the constraint grammar.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Operator {
    /// Is the span that makes up the token.
    pub span: Span,

    /// Is the [`OperatorKind`] that the token represents.
    pub operator: OperatorKind,
}

impl SourceElement for Operator {
    fn span(&self) -> Span {
        self.span.clone()
    }
}

/// Represents the `;` value separator.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Semicolon {
    /// Is the span that makes up the token.
    pub span: Span,
}

impl SourceElement for Semicolon {
    fn span(&self) -> Span {
        self.span.clone()
    }
}

/// Represents a `#` comment running to the end of the physical line.
///
/// The trailing newline is not part of the token.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Comment {
    /// Is the span that makes up the token.
    pub span: Span,
}

impl Comment {
    /// Returns the content of the comment without the leading `#`.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.span.str()[1..]
    }
}

impl SourceElement for Comment {
    fn span(&self) -> Span {
        self.span.clone()
    }
}

/// Represents a line break, the statement terminator of the format.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Newline {
    /// Is the span that makes up the token.
    pub span: Span,
}

impl SourceElement for Newline {
    fn span(&self) -> Span {
        self.span.clone()
    }
}

/// Represents a character sequence the lexer does not recognize.
///
/// Lexing never fails; the parser rejects these tokens with a positioned
/// message when they cannot form a legal line.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Unknown {
    /// Is the span that makes up the token.
    pub span: Span,
}

impl SourceElement for Unknown {
    fn span(&self) -> Span {
        self.span.clone()
    }
}

impl Token {
    /// Increments the iterator while the predicate returns true.
    fn walk_iter(iter: &mut SourceIterator, predicate: impl Fn(char) -> bool) {
        while let Some((_, character)) = iter.peek() {
            if !predicate(character) {
                break;
            }

            iter.next();
        }
    }

    /// Creates a span from the given start location to the current location of the iterator.
    fn create_span(start: usize, iter: &mut SourceIterator) -> Span {
        iter.peek().map_or_else(
            || Span::to_end(iter.source_file().clone(), start).unwrap(),
            |(index, _)| Span::new(iter.source_file().clone(), start, index).unwrap(),
        )
    }

    /// Checks if the given character starts an identifier.
    ///
    /// `/`, `\` and `.` are included so bare filenames lex as identifiers.
    fn is_first_identifier_character(character: char) -> bool {
        character.is_alphabetic() || matches!(character, '/' | '\\' | '.')
    }

    /// Checks if the given character continues an identifier.
    fn is_identifier_character(character: char) -> bool {
        !character.is_whitespace() && character != ';'
    }

    /// Handles a contiguous sequence of characters that are valid in an identifier.
    fn handle_identifier(iter: &mut SourceIterator, start: usize) -> Self {
        Self::walk_iter(iter, Self::is_identifier_character);

        Identifier {
            span: Self::create_span(start, iter),
        }
        .into()
    }

    /// Handles a `#` comment running to the end of the physical line.
    fn handle_comment(iter: &mut SourceIterator, start: usize) -> Self {
        Self::walk_iter(iter, |character| {
            !(character == '\n' || character == '\r')
        });

        Comment {
            span: Self::create_span(start, iter),
        }
        .into()
    }

    /// Handles a sequence of digits with an optional sign and at most one decimal point.
    ///
    /// A second `.` ends the number; the remainder is re-lexed as the start
    /// of the next token.
    fn handle_numeric_literal(iter: &mut SourceIterator, start: usize) -> Self {
        Self::walk_iter(iter, |character| character.is_ascii_digit());

        if let Some((_, '.')) = iter.peek() {
            iter.next();
            Self::walk_iter(iter, |character| character.is_ascii_digit());
        }

        Numeric {
            span: Self::create_span(start, iter),
        }
        .into()
    }

    /// Handles a character that may start a one- or two-character operator.
    ///
    /// `>` is an operator on its own and `>=` with a following `=`. `!` and
    /// `=` only form operators as `!=` and `==`; alone they are [`Unknown`].
    /// The asymmetry between `>` and the other two is part of the format.
    fn handle_operator(iter: &mut SourceIterator, start: usize, character: char) -> Self {
        let follow_up = matches!(iter.peek(), Some((_, '=')));
        if follow_up {
            iter.next();
        }

        let span = Self::create_span(start, iter);

        let operator = match (character, follow_up) {
            ('>', false) => Some(OperatorKind::Greater),
            ('>', true) => Some(OperatorKind::GreaterOrEqual),
            ('!', true) => Some(OperatorKind::NotEqual),
            ('=', true) => Some(OperatorKind::Equal),
            _ => None,
        };

        operator.map_or_else(
            || Unknown { span: span.clone() }.into(),
            |operator| {
                Operator {
                    span: span.clone(),
                    operator,
                }
                .into()
            },
        )
    }

    /// Lexes the next token from the given iterator.
    ///
    /// Whitespace other than line breaks is skipped silently; a line break is
    /// itself a token. Returns [`None`] once the iterator is exhausted, and
    /// keeps returning [`None`] on repeated calls.
    pub fn tokenize(iter: &mut SourceIterator) -> Option<Self> {
        loop {
            let (start, character) = iter.next()?;

            // Found a line break
            if character == '\n' {
                return Some(
                    Newline {
                        span: Self::create_span(start, iter),
                    }
                    .into(),
                );
            }
            // Found insignificant whitespace
            else if character.is_whitespace() {
                continue;
            }
            // Found the value separator
            else if character == ';' {
                return Some(
                    Semicolon {
                        span: Self::create_span(start, iter),
                    }
                    .into(),
                );
            }
            // Found a comment
            else if character == '#' {
                return Some(Self::handle_comment(iter, start));
            }
            // Found an operator or a stray `!`/`=`
            else if matches!(character, '>' | '!' | '=') {
                return Some(Self::handle_operator(iter, start, character));
            }
            // Found an identifier or filename
            else if Self::is_first_identifier_character(character) {
                return Some(Self::handle_identifier(iter, start));
            }
            // Found a numeric literal
            else if character.is_ascii_digit() || character == '-' {
                return Some(Self::handle_numeric_literal(iter, start));
            }
            // Anything else is left for the parser to reject
            return Some(
                Unknown {
                    span: Self::create_span(start, iter),
                }
                .into(),
            );
        }
    }
}
