//! Contains the syntax tree of the configuration format and the parse
//! functions producing it.

pub mod constraint;
pub mod directive;

use std::fmt::Debug;

use derive_more::{Deref, From};
use enum_as_inner::EnumAsInner;
use getset::Getters;

use crate::{
    base::source_file::{SourceElement, Span},
    grammar::GrammarTable,
    lexical::token::{Comment, Newline, Token},
    syntax::{
        error::{IllegalLineStart, ParseResult, SyntaxKind},
        parser::Parser,
    },
};

use self::{constraint::ConstraintLine, directive::Directive};

/// A `;`-connected sequence of elements, keeping the separator tokens.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct ConnectedList<Element, Separator> {
    /// The first element of the list.
    #[get = "pub"]
    first: Element,

    /// The rest of the elements, each preceded by its separator.
    #[get = "pub"]
    rest: Vec<(Separator, Element)>,
}

impl<Element, Separator> ConnectedList<Element, Separator> {
    pub(crate) fn new(first: Element, rest: Vec<(Separator, Element)>) -> Self {
        Self { first, rest }
    }

    /// Iterates over the elements, skipping the separators.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        std::iter::once(&self.first).chain(self.rest.iter().map(|(_, element)| element))
    }

    /// The number of elements in the list.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rest.len() + 1
    }

    /// Whether the list is empty. Always `false`, lists hold at least one element.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Dissolves the list into its components.
    #[must_use]
    pub fn dissolve(self) -> (Element, Vec<(Separator, Element)>) {
        (self.first, self.rest)
    }
}

impl<Element: SourceElement, Separator: SourceElement> SourceElement
    for ConnectedList<Element, Separator>
{
    fn span(&self) -> Span {
        self.rest.last().map_or_else(
            || self.first.span(),
            |(_, last)| self.first.span().join(&last.span()).expect("invalid span"),
        )
    }
}

/// One logical line of a configuration file.
///
/// Syntax Synopsis:
///
/// ``` ebnf
/// Line:
///     Comment Newline
///     | Newline
///     | Directive
///     | ConstraintLine
///     ;
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, From, EnumAsInner)]
#[allow(missing_docs)]
pub enum Line {
    Blank(Blank),
    Comment(CommentLine),
    Directive(Directive),
    Constraint(ConstraintLine),
}

impl SourceElement for Line {
    fn span(&self) -> Span {
        match self {
            Self::Blank(blank) => blank.span(),
            Self::Comment(comment) => comment.span(),
            Self::Directive(directive) => directive.span(),
            Self::Constraint(constraint) => constraint.span(),
        }
    }
}

/// A blank line, represented by its line break alone.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct Blank {
    /// The line break.
    #[get = "pub"]
    newline: Newline,
}

impl SourceElement for Blank {
    fn span(&self) -> Span {
        self.newline.span()
    }
}

/// A line holding nothing but a comment.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct CommentLine {
    /// The comment.
    #[get = "pub"]
    comment: Comment,

    /// The trailing line break, absent only at the end of the file.
    #[get = "pub"]
    newline: Option<Newline>,
}

impl SourceElement for CommentLine {
    fn span(&self) -> Span {
        self.newline.as_ref().map_or_else(
            || self.comment.span(),
            |newline| {
                self.comment
                    .span()
                    .join(&newline.span())
                    .expect("invalid span")
            },
        )
    }
}

/// The ordered list of [`Line`]s of a parsed configuration file.
///
/// Order is exactly file order; consumers rely on it to reconstruct the file
/// layout, so every source token (separators and line breaks included) is
/// reachable from the tree.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Deref)]
pub struct ConfigFile {
    #[deref]
    lines: Vec<Line>,
}

impl ConfigFile {
    /// Dissolves this struct into its lines.
    #[must_use]
    pub fn dissolve(self) -> Vec<Line> {
        self.lines
    }
}

impl<'a> Parser<'a> {
    /// Parses a whole [`ConfigFile`].
    ///
    /// Single pass, fail-fast: the first error anywhere aborts the parse and
    /// the partially built tree is discarded.
    ///
    /// # Errors
    /// - The first [`crate::syntax::error::Error`] encountered in the token stream.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn parse_config(&mut self, table: &GrammarTable) -> ParseResult<ConfigFile> {
        let mut lines = Vec::new();

        while !self.is_exhausted() {
            lines.push(self.parse_line(table)?);
        }

        tracing::debug!("Parsed {} lines", lines.len());

        Ok(ConfigFile { lines })
    }

    /// Parses one logical [`Line`].
    ///
    /// # Errors
    /// - [`IllegalLineStart`] if the current token cannot begin any kind of line.
    /// - Any error of the line grammar the token dispatches into.
    pub fn parse_line(&mut self, table: &GrammarTable) -> ParseResult<Line> {
        match self.peek() {
            Some(Token::Comment(comment)) => {
                let comment = comment.clone();
                self.next_token();
                let newline = self.expect_line_end()?;

                Ok(Line::Comment(CommentLine { comment, newline }))
            }
            Some(Token::Newline(newline)) => {
                let newline = newline.clone();
                self.next_token();

                Ok(Line::Blank(Blank { newline }))
            }
            Some(Token::Identifier(..)) => self.parse_tag_line(table),
            // an integer can only start a liability-class qualified genotype constraint
            Some(Token::Numeric(numeric)) if numeric.is_integer() => Ok(Line::Constraint(
                self.parse_constraint_line(table)?,
            )),
            Some(token) => Err(IllegalLineStart {
                found: token.clone(),
            }
            .into()),
            None => Err(self.unexpected(SyntaxKind::LineEnd).into()),
        }
    }
}
