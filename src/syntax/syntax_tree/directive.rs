//! Syntax tree nodes for directive lines.

use enum_as_inner::EnumAsInner;
use getset::Getters;

use crate::{
    base::source_file::{SourceElement, Span},
    grammar::GrammarTable,
    lexical::token::{Identifier, Newline, Numeric, Semicolon, Token},
    syntax::{
        error::{ExtraValues, MissingValues, ParseResult, SyntaxKind, UnknownDistribution},
        parser::Parser,
    },
};

use super::{ConnectedList, Line};

/// A directive line: a tag followed by its tag-specific value shape.
///
/// Syntax Synopsis:
///
/// ``` ebnf
/// Directive:
///     Tag Filename Newline
///     | Tag Number{arity} Newline
///     | Tag ValueList Newline
///     | Tag DistributionName Number{k} Newline
///     ;
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct Directive {
    /// The leading tag.
    #[get = "pub"]
    tag: Identifier,

    /// The values following the tag.
    #[get = "pub"]
    body: DirectiveBody,

    /// The trailing line break, absent only at the end of the file.
    #[get = "pub"]
    newline: Option<Newline>,
}

impl Directive {
    /// Whether the directive takes a variable number of values.
    ///
    /// True for registered variable-arity tags and for the permissive
    /// unknown-tag fallback.
    #[must_use]
    pub fn is_variable_number(&self) -> bool {
        matches!(self.body, DirectiveBody::Values(..))
    }

    /// Dissolves the [`Directive`] into its components.
    #[must_use]
    pub fn dissolve(self) -> (Identifier, DirectiveBody, Option<Newline>) {
        (self.tag, self.body, self.newline)
    }
}

impl SourceElement for Directive {
    fn span(&self) -> Span {
        let start = self.tag.span();
        let end = self
            .newline
            .as_ref()
            .map(SourceElement::span)
            .or_else(|| self.body.end_span())
            .unwrap_or_else(|| start.clone());

        start.join(&end).expect("invalid span")
    }
}

/// The tag-specific value shape of a [`Directive`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, EnumAsInner)]
pub enum DirectiveBody {
    /// A single filename value.
    Filename(Identifier),

    /// The exact number of values the tag is registered with.
    Fixed(Vec<Numeric>),

    /// A variable value list of point values and ranges.
    Values(ValueList),

    /// A distribution name with its parameters.
    Distribution(Distribution),
}

impl DirectiveBody {
    /// The span of the last token of the body, if the body holds any token.
    fn end_span(&self) -> Option<Span> {
        match self {
            Self::Filename(filename) => Some(filename.span()),
            Self::Fixed(values) => values.last().map(SourceElement::span),
            Self::Values(values) => Some(values.span()),
            Self::Distribution(distribution) => Some(distribution.span()),
        }
    }
}

/// A `;`-connected list of value groups.
pub type ValueList = ConnectedList<ValueGroup, Semicolon>;

/// One semicolon-separated group of a value list: a point value or a range.
///
/// Syntax Synopsis:
///
/// ``` ebnf
/// ValueGroup:
///     Number
///     | Number Number Number
///     ;
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, EnumAsInner)]
pub enum ValueGroup {
    /// A single point value.
    Point(Numeric),

    /// A begin/end/step range.
    Range(Range),
}

impl SourceElement for ValueGroup {
    fn span(&self) -> Span {
        match self {
            Self::Point(value) => value.span(),
            Self::Range(range) => range.span(),
        }
    }
}

/// A begin/end/step numeric range.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct Range {
    /// The first value of the range.
    #[get = "pub"]
    begin: Numeric,

    /// The last value of the range.
    #[get = "pub"]
    end: Numeric,

    /// The step between values.
    #[get = "pub"]
    step: Numeric,
}

impl SourceElement for Range {
    fn span(&self) -> Span {
        self.begin
            .span()
            .join(&self.step.span())
            .expect("invalid span")
    }
}

/// A distribution selection of the quantitative-trait directive.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct Distribution {
    /// The distribution name.
    #[get = "pub"]
    name: Identifier,

    /// The distribution parameters; their count depends on the name.
    #[get = "pub"]
    parameters: Vec<Numeric>,
}

impl SourceElement for Distribution {
    fn span(&self) -> Span {
        let start = self.name.span();
        self.parameters
            .last()
            .map_or_else(|| start.clone(), |last| {
                start.join(&last.span()).expect("invalid span")
            })
    }
}

impl<'a> Parser<'a> {
    /// Parses a line that starts with an identifier.
    ///
    /// The constraint check runs first: both a constraint (`DD > Dd`) and a
    /// plain directive (`AF 0.2`) open with an identifier, and the later
    /// checks would misclassify a constraint. The remaining checks run in
    /// fixed priority order: filename tag, fixed arity, variable arity,
    /// distribution tag, and finally the permissive fallback that accepts any
    /// unknown tag with a value list.
    pub(crate) fn parse_tag_line(&mut self, table: &GrammarTable) -> ParseResult<Line> {
        if self.line_begins_constraint() {
            return Ok(Line::Constraint(self.parse_constraint_line(table)?));
        }

        let tag = self.expect_identifier()?;
        let tag_str = tag.span.str();

        let body = if table.is_filename_tag(tag_str) {
            DirectiveBody::Filename(self.expect_identifier_as(SyntaxKind::Filename)?)
        } else if let Some(arity) = table.fixed_arity(tag_str) {
            DirectiveBody::Fixed(self.parse_counted_values(&tag, arity)?)
        } else if table.is_variable_tag(tag_str) {
            DirectiveBody::Values(self.parse_value_list()?)
        } else if table.is_distribution_tag(tag_str) {
            DirectiveBody::Distribution(self.parse_distribution(&tag, table)?)
        } else {
            DirectiveBody::Values(self.parse_value_list()?)
        };

        let newline = self.expect_line_end()?;

        Ok(Line::Directive(Directive { tag, body, newline }))
    }

    /// Parses exactly `arity` numbers for the given tag.
    ///
    /// # Errors
    /// - [`MissingValues`] at the token where the next number was required.
    /// - [`ExtraValues`] at the first number past the registered count.
    fn parse_counted_values(
        &mut self,
        tag: &Identifier,
        arity: usize,
    ) -> ParseResult<Vec<Numeric>> {
        let mut values = Vec::with_capacity(arity);

        for provided in 0..arity {
            match self.peek() {
                Some(Token::Numeric(numeric)) => {
                    let numeric = numeric.clone();
                    self.next_token();
                    values.push(numeric);
                }
                found => {
                    return Err(MissingValues {
                        tag: tag.clone(),
                        expected: arity,
                        provided,
                        found: found.cloned(),
                    }
                    .into())
                }
            }
        }

        if let Some(found @ Token::Numeric(..)) = self.peek() {
            return Err(ExtraValues {
                tag: tag.clone(),
                expected: arity,
                found: found.clone(),
            }
            .into());
        }

        Ok(values)
    }

    /// Parses a value list: groups of one or three numbers, chained by `;`.
    ///
    /// Point values and ranges may be mixed freely within one line; splitting
    /// mixed groups is the consumer's concern.
    pub(crate) fn parse_value_list(&mut self) -> ParseResult<ValueList> {
        let first = self.parse_value_group()?;
        let mut rest = Vec::new();

        while matches!(self.peek(), Some(Token::Semicolon(..))) {
            let separator = self.expect_semicolon()?;
            rest.push((separator, self.parse_value_group()?));
        }

        Ok(ConnectedList::new(first, rest))
    }

    /// Parses one value group: a point value, or begin/end/step if a second
    /// number follows the first.
    fn parse_value_group(&mut self) -> ParseResult<ValueGroup> {
        let begin = self.expect_numeric()?;

        if matches!(self.peek(), Some(Token::Numeric(..))) {
            let end = self.expect_numeric()?;
            let step = self.expect_numeric()?;

            Ok(ValueGroup::Range(Range { begin, end, step }))
        } else {
            Ok(ValueGroup::Point(begin))
        }
    }

    /// Parses the distribution sub-grammar of the quantitative-trait tag.
    ///
    /// # Errors
    /// - [`UnknownDistribution`] listing the valid names if the name is not registered.
    fn parse_distribution(
        &mut self,
        tag: &Identifier,
        table: &GrammarTable,
    ) -> ParseResult<Distribution> {
        let name = self.expect_identifier_as(SyntaxKind::DistributionName)?;

        let Some(arity) = table.distribution_arity(name.span.str()) else {
            return Err(UnknownDistribution {
                name,
                alternatives: table
                    .distribution_names()
                    .into_iter()
                    .map(ToString::to_string)
                    .collect(),
            }
            .into());
        };

        let parameters = self.parse_counted_values(tag, arity)?;

        Ok(Distribution { name, parameters })
    }
}
