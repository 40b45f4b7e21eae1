//! Contains the error types that can occur while parsing a configuration file.

use std::fmt::Display;

use crate::{
    base::{
        log::{Message, Severity, SourceCodeDisplay},
        source_file::{Location, SourceElement, Span},
    },
    lexical::token::{Identifier, Token},
};

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, Error>;

/// An enumeration containing all kinds of syntactic errors that can occur while parsing a
/// configuration file.
///
/// The first error aborts the whole parse; there is no recovery. Every
/// variant resolves to the exact 1-based row and column of the offending
/// token via [`Error::location`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[allow(missing_docs)]
pub enum Error {
    #[error(transparent)]
    UnexpectedToken(#[from] UnexpectedToken),
    #[error(transparent)]
    IllegalLineStart(#[from] IllegalLineStart),
    #[error(transparent)]
    MissingValues(#[from] MissingValues),
    #[error(transparent)]
    ExtraValues(#[from] ExtraValues),
    #[error(transparent)]
    UnknownDistribution(#[from] UnknownDistribution),
    #[error(transparent)]
    GenotypeKindMismatch(#[from] GenotypeKindMismatch),
}

impl Error {
    /// Get the span of the offending token, if the error is not at end of input.
    #[must_use]
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::UnexpectedToken(err) => err.found.as_ref().map(SourceElement::span),
            Self::IllegalLineStart(err) => Some(SourceElement::span(&err.found)),
            Self::MissingValues(err) => err.found.as_ref().map(SourceElement::span),
            Self::ExtraValues(err) => Some(SourceElement::span(&err.found)),
            Self::UnknownDistribution(err) => Some(err.name.span()),
            Self::GenotypeKindMismatch(err) => Some(SourceElement::span(&err.right)),
        }
    }

    /// Get the 1-based row/column of the offending token, if the error is not at end of input.
    #[must_use]
    pub fn location(&self) -> Option<Location> {
        self.span().map(|span| span.start_location())
    }
}

/// Enumeration containing all kinds of syntax that can be failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub enum SyntaxKind {
    Either(&'static [SyntaxKind]),
    Identifier,
    Numeric,
    Operator,
    Semicolon,
    LineEnd,
    Filename,
    Genotype,
    LiabilityClass,
    Theta,
    Parameter,
    DistributionName,
}

impl SyntaxKind {
    fn expected_binding_str(&self) -> String {
        match self {
            Self::Either(variants) => {
                if variants.is_empty() {
                    "end of file".to_string()
                } else if variants.len() == 1 {
                    variants[0].expected_binding_str()
                } else {
                    let comma_range = ..variants.len() - 2;
                    let comma_elements = variants[comma_range]
                        .iter()
                        .map(Self::expected_binding_str)
                        .collect::<Vec<_>>()
                        .join(", ");
                    format!(
                        "{}, or {}",
                        comma_elements,
                        variants.last().unwrap().expected_binding_str()
                    )
                }
            }
            Self::Identifier => "an identifier token".to_string(),
            Self::Numeric => "a number".to_string(),
            Self::Operator => "a comparison operator".to_string(),
            Self::Semicolon => "a `;` separator".to_string(),
            Self::LineEnd => "a line break".to_string(),
            Self::Filename => "a filename".to_string(),
            Self::Genotype => "a genotype".to_string(),
            Self::LiabilityClass => "a liability class".to_string(),
            Self::Theta => "a theta reference (`Tm` or `Tf`)".to_string(),
            Self::Parameter => "a model parameter (`P` followed by a digit)".to_string(),
            Self::DistributionName => "a distribution name".to_string(),
        }
    }
}

/// Describes the given token the way it is reported in error messages.
fn found_binding_str(found: Option<&Token>) -> String {
    match found {
        Some(Token::Identifier(identifier)) => {
            format!("`{}`", identifier.span.str())
        }
        Some(Token::Numeric(numeric)) => format!("the number `{}`", numeric.span.str()),
        Some(Token::Operator(operator)) => {
            format!("the operator `{}`", operator.operator.as_str())
        }
        Some(Token::Semicolon(..)) => "a `;` separator".to_string(),
        Some(Token::Comment(..)) => "a comment".to_string(),
        Some(Token::Newline(..)) => "the end of the line".to_string(),
        Some(Token::Unknown(unknown)) => {
            format!("the unrecognized text `{}`", unknown.span.str())
        }
        None => "the end of the file".to_string(),
    }
}

/// A specific kind of syntax was required but another token was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnexpectedToken {
    /// The kind of syntax that was expected.
    pub expected: SyntaxKind,

    /// The invalid token that was found, [`None`] at end of input.
    pub found: Option<Token>,
}

impl Display for UnexpectedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let message = format!(
            "expected {}, but found {}",
            self.expected.expected_binding_str(),
            found_binding_str(self.found.as_ref())
        );

        write!(f, "{}", Message::new(Severity::Error, message))?;

        self.found.as_ref().map_or(Ok(()), |token| {
            write!(
                f,
                "\n{}",
                SourceCodeDisplay::new(token.span(), Option::<u8>::None)
            )
        })
    }
}

impl std::error::Error for UnexpectedToken {}

/// A token that cannot begin any recognized kind of line.
///
/// Distinguishes "this can never be a line" from "this almost parsed but one
/// piece was wrong".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IllegalLineStart {
    /// The token the line starts with.
    pub found: Token,
}

impl Display for IllegalLineStart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let message = format!(
            "a line cannot start with {}",
            found_binding_str(Some(&self.found))
        );

        write!(f, "{}", Message::new(Severity::Error, message))?;
        write!(
            f,
            "\n{}",
            SourceCodeDisplay::new(
                self.found.span(),
                Some("expected a directive, a constraint, a comment or a blank line")
            )
        )
    }
}

impl std::error::Error for IllegalLineStart {}

/// A fixed-arity directive ended before all its values were given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingValues {
    /// The directive tag.
    pub tag: Identifier,

    /// The number of values the tag requires.
    pub expected: usize,

    /// The number of values that were present.
    pub provided: usize,

    /// The token found where the next value was required, [`None`] at end of input.
    pub found: Option<Token>,
}

impl Display for MissingValues {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let message = format!(
            "directive `{}` requires {} values, but only {} were given ({} missing)",
            self.tag.span.str(),
            self.expected,
            self.provided,
            self.expected - self.provided
        );

        write!(f, "{}", Message::new(Severity::Error, message))?;

        self.found.as_ref().map_or(Ok(()), |token| {
            write!(
                f,
                "\n{}",
                SourceCodeDisplay::new(token.span(), Option::<u8>::None)
            )
        })
    }
}

impl std::error::Error for MissingValues {}

/// A fixed-arity directive has extra items after its values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtraValues {
    /// The directive tag.
    pub tag: Identifier,

    /// The number of values the tag requires.
    pub expected: usize,

    /// The first extra token.
    pub found: Token,
}

impl Display for ExtraValues {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let message = format!(
            "extra items after directive `{}`, which takes exactly {} values",
            self.tag.span.str(),
            self.expected
        );

        write!(f, "{}", Message::new(Severity::Error, message))?;
        write!(
            f,
            "\n{}",
            SourceCodeDisplay::new(self.found.span(), Option::<u8>::None)
        )
    }
}

impl std::error::Error for ExtraValues {}

/// The distribution name following the quantitative-trait tag is not registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDistribution {
    /// The unrecognized name.
    pub name: Identifier,

    /// The valid distribution names.
    pub alternatives: Vec<String>,
}

impl UnknownDistribution {
    /// The closest valid name, if one is reasonably similar.
    #[must_use]
    pub fn suggestion(&self) -> Option<&str> {
        self.alternatives
            .iter()
            .map(|alternative| {
                (
                    strsim::normalized_damerau_levenshtein(self.name.span.str(), alternative),
                    alternative,
                )
            })
            .filter(|(similarity, _)| *similarity > 0.5)
            .max_by(|(a, _), (b, _)| a.total_cmp(b))
            .map(|(_, alternative)| alternative.as_str())
    }
}

impl Display for UnknownDistribution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let message = format!(
            "unknown distribution `{}`, valid alternatives are: {}",
            self.name.span.str(),
            self.alternatives.join(", ")
        );

        write!(f, "{}", Message::new(Severity::Error, message))?;
        write!(
            f,
            "\n{}",
            SourceCodeDisplay::new(
                &self.name.span,
                self.suggestion()
                    .map(|suggestion| format!("did you mean `{suggestion}`?"))
            )
        )
    }
}

impl std::error::Error for UnknownDistribution {}

/// The two genotype references of a constraint mix a name with a numeric code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenotypeKindMismatch {
    /// The genotype reference on the left of the operator.
    pub left: Token,

    /// The genotype reference on the right of the operator.
    pub right: Token,
}

impl Display for GenotypeKindMismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            Message::new(
                Severity::Error,
                "the genotypes of a constraint must both be names or both be numeric codes"
            )
        )?;
        write!(
            f,
            "\n{}",
            SourceCodeDisplay::new(
                self.right.span(),
                Some(format!(
                    "this does not match the genotype `{}` on the other side",
                    self.left.span().str()
                ))
            )
        )
    }
}

impl std::error::Error for GenotypeKindMismatch {}
