//! Syntax tree nodes for constraint lines.

use enum_as_inner::EnumAsInner;
use getset::Getters;

use crate::{
    base::source_file::{SourceElement, Span},
    grammar::GrammarTable,
    lexical::token::{Identifier, Newline, Numeric, Operator, Semicolon, Token},
    syntax::{
        error::{GenotypeKindMismatch, ParseResult, SyntaxKind, UnexpectedToken},
        parser::Parser,
    },
};

use super::ConnectedList;

/// Whether the given identifier text is a theta reference.
fn is_theta(s: &str) -> bool {
    matches!(s, "Tm" | "Tf")
}

/// Whether the given identifier text is a model parameter reference (`P` plus one digit).
fn is_parameter(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 2 && bytes[0] == b'P' && bytes[1].is_ascii_digit()
}

/// A line of one or more constraints chained by `;`.
///
/// Syntax Synopsis:
///
/// ``` ebnf
/// ConstraintLine:
///     Constraint (';' Constraint)* Newline
///     ;
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct ConstraintLine {
    /// The chained constraints with their `;` separators.
    #[get = "pub"]
    constraints: ConnectedList<Constraint, Semicolon>,

    /// The trailing line break, absent only at the end of the file.
    #[get = "pub"]
    newline: Option<Newline>,
}

impl ConstraintLine {
    /// Dissolves the [`ConstraintLine`] into its components.
    #[must_use]
    pub fn dissolve(self) -> (ConnectedList<Constraint, Semicolon>, Option<Newline>) {
        (self.constraints, self.newline)
    }
}

impl SourceElement for ConstraintLine {
    fn span(&self) -> Span {
        let start = self.constraints.span();
        self.newline.as_ref().map_or_else(
            || start.clone(),
            |newline| start.join(&newline.span()).expect("invalid span"),
        )
    }
}

/// One inequality constraint.
///
/// Syntax Synopsis:
///
/// ``` ebnf
/// Constraint:
///     Theta Operator Theta
///     | Genotype LiabilityClass? Operator Genotype LiabilityClass?
///     | Parameter Genotype LiabilityClass? Operator Parameter Genotype LiabilityClass?
///     ;
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, EnumAsInner)]
#[allow(missing_docs)]
pub enum Constraint {
    Theta(ThetaConstraint),
    Genotype(GenotypeConstraint),
    Parameter(ParameterConstraint),
}

impl SourceElement for Constraint {
    fn span(&self) -> Span {
        match self {
            Self::Theta(constraint) => constraint.span(),
            Self::Genotype(constraint) => constraint.span(),
            Self::Parameter(constraint) => constraint.span(),
        }
    }
}

/// A constraint between the two recombination fractions `Tm` and `Tf`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct ThetaConstraint {
    /// The theta reference on the left of the operator.
    #[get = "pub"]
    left: Identifier,

    /// The comparison operator.
    #[get = "pub"]
    operator: Operator,

    /// The theta reference on the right of the operator.
    #[get = "pub"]
    right: Identifier,
}

impl SourceElement for ThetaConstraint {
    fn span(&self) -> Span {
        self.left
            .span()
            .join(&self.right.span())
            .expect("invalid span")
    }
}

/// A genotype reference: a recognized name or an equivalent integer code.
///
/// Both sides of one constraint must use the same representation; mixing a
/// name with a code is rejected.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, EnumAsInner)]
pub enum GenotypeRef {
    /// A genotype name from the grammar table, e.g. `DD`.
    Named(Identifier),

    /// An integer genotype code.
    Coded(Numeric),
}

impl GenotypeRef {
    /// Whether both references use the same representation.
    #[must_use]
    pub fn same_kind(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::Named(..), Self::Named(..)) | (Self::Coded(..), Self::Coded(..))
        )
    }

    fn to_token(&self) -> Token {
        match self {
            Self::Named(identifier) => identifier.clone().into(),
            Self::Coded(numeric) => numeric.clone().into(),
        }
    }
}

impl SourceElement for GenotypeRef {
    fn span(&self) -> Span {
        match self {
            Self::Named(identifier) => identifier.span(),
            Self::Coded(numeric) => numeric.span(),
        }
    }
}

/// A genotype reference with its optional liability class qualifier.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct QualifiedGenotype {
    /// The genotype reference.
    #[get = "pub"]
    genotype: GenotypeRef,

    /// The liability class narrowing the reference, if any.
    #[get = "pub"]
    liability_class: Option<Numeric>,
}

impl SourceElement for QualifiedGenotype {
    fn span(&self) -> Span {
        let start = self.genotype.span();
        self.liability_class.as_ref().map_or_else(
            || start.clone(),
            |liability_class| {
                start
                    .join(&liability_class.span())
                    .expect("invalid span")
            },
        )
    }
}

/// A constraint between two (optionally liability-class qualified) genotypes.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct GenotypeConstraint {
    /// The genotype on the left of the operator.
    #[get = "pub"]
    left: QualifiedGenotype,

    /// The comparison operator.
    #[get = "pub"]
    operator: Operator,

    /// The genotype on the right of the operator.
    #[get = "pub"]
    right: QualifiedGenotype,
}

impl SourceElement for GenotypeConstraint {
    fn span(&self) -> Span {
        self.left
            .span()
            .join(&self.right.span())
            .expect("invalid span")
    }
}

/// A constraint between two model parameters, each applied to a genotype.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct ParameterConstraint {
    /// The parameter reference on the left of the operator.
    #[get = "pub"]
    left_parameter: Identifier,

    /// The genotype the left parameter applies to.
    #[get = "pub"]
    left: QualifiedGenotype,

    /// The comparison operator.
    #[get = "pub"]
    operator: Operator,

    /// The parameter reference on the right of the operator.
    #[get = "pub"]
    right_parameter: Identifier,

    /// The genotype the right parameter applies to.
    #[get = "pub"]
    right: QualifiedGenotype,
}

impl SourceElement for ParameterConstraint {
    fn span(&self) -> Span {
        self.left_parameter
            .span()
            .join(&self.right.span())
            .expect("invalid span")
    }
}

impl<'a> Parser<'a> {
    /// Parses a [`ConstraintLine`], chaining constraints over `;`.
    ///
    /// Callers only invoke this once the lookahead has confirmed an operator
    /// ahead (or, for an integer line start, once no other reading exists).
    pub(crate) fn parse_constraint_line(
        &mut self,
        table: &GrammarTable,
    ) -> ParseResult<ConstraintLine> {
        let first = self.parse_constraint(table)?;
        let mut rest = Vec::new();

        while matches!(self.peek(), Some(Token::Semicolon(..))) {
            let separator = self.expect_semicolon()?;
            rest.push((separator, self.parse_constraint(table)?));
        }

        let newline = self.expect_line_end()?;

        Ok(ConstraintLine {
            constraints: ConnectedList::new(first, rest),
            newline,
        })
    }

    /// Parses one [`Constraint`], selecting the shape by its first token.
    fn parse_constraint(&mut self, table: &GrammarTable) -> ParseResult<Constraint> {
        match self.peek() {
            Some(Token::Identifier(identifier)) if is_theta(identifier.span.str()) => {
                Ok(Constraint::Theta(self.parse_theta_constraint(table)?))
            }
            Some(Token::Identifier(identifier)) if is_parameter(identifier.span.str()) => Ok(
                Constraint::Parameter(self.parse_parameter_constraint(table)?),
            ),
            Some(Token::Identifier(identifier)) if table.is_genotype(identifier.span.str()) => Ok(
                Constraint::Genotype(self.parse_genotype_constraint(table)?),
            ),
            Some(Token::Numeric(..)) => Ok(Constraint::Genotype(
                self.parse_genotype_constraint(table)?,
            )),
            _ => Err(self
                .unexpected(SyntaxKind::Either(&[
                    SyntaxKind::Theta,
                    SyntaxKind::Genotype,
                    SyntaxKind::Parameter,
                ]))
                .into()),
        }
    }

    /// Parses `('Tf'|'Tm') Operator ('Tf'|'Tm')`.
    fn parse_theta_constraint(&mut self, table: &GrammarTable) -> ParseResult<ThetaConstraint> {
        let left = self.parse_theta_reference()?;
        let operator = self.expect_constraint_operator(table)?;
        let right = self.parse_theta_reference()?;

        Ok(ThetaConstraint {
            left,
            operator,
            right,
        })
    }

    /// Parses a genotype constraint, enforcing that both sides use the same
    /// representation (names or integer codes).
    fn parse_genotype_constraint(
        &mut self,
        table: &GrammarTable,
    ) -> ParseResult<GenotypeConstraint> {
        let left = self.parse_qualified_genotype(table)?;
        let operator = self.expect_constraint_operator(table)?;
        let right = self.parse_qualified_genotype(table)?;

        if !left.genotype.same_kind(&right.genotype) {
            return Err(GenotypeKindMismatch {
                left: left.genotype.to_token(),
                right: right.genotype.to_token(),
            }
            .into());
        }

        Ok(GenotypeConstraint {
            left,
            operator,
            right,
        })
    }

    /// Parses `Param Genotype [LiabilityClass] Operator Param Genotype [LiabilityClass]`.
    fn parse_parameter_constraint(
        &mut self,
        table: &GrammarTable,
    ) -> ParseResult<ParameterConstraint> {
        let left_parameter = self.parse_parameter_reference()?;
        let left = self.parse_qualified_genotype(table)?;
        let operator = self.expect_constraint_operator(table)?;
        let right_parameter = self.parse_parameter_reference()?;
        let right = self.parse_qualified_genotype(table)?;

        Ok(ParameterConstraint {
            left_parameter,
            left,
            operator,
            right_parameter,
            right,
        })
    }

    /// Consumes a `Tm`/`Tf` identifier.
    fn parse_theta_reference(&mut self) -> ParseResult<Identifier> {
        match self.peek() {
            Some(Token::Identifier(identifier)) if is_theta(identifier.span.str()) => {
                let identifier = identifier.clone();
                self.next_token();
                Ok(identifier)
            }
            _ => Err(self.unexpected(SyntaxKind::Theta).into()),
        }
    }

    /// Consumes a `P<digit>` identifier.
    fn parse_parameter_reference(&mut self) -> ParseResult<Identifier> {
        match self.peek() {
            Some(Token::Identifier(identifier)) if is_parameter(identifier.span.str()) => {
                let identifier = identifier.clone();
                self.next_token();
                Ok(identifier)
            }
            _ => Err(self.unexpected(SyntaxKind::Parameter).into()),
        }
    }

    /// Consumes a genotype reference and its optional integer liability class.
    fn parse_qualified_genotype(
        &mut self,
        table: &GrammarTable,
    ) -> ParseResult<QualifiedGenotype> {
        let genotype = match self.peek() {
            Some(Token::Identifier(identifier)) if table.is_genotype(identifier.span.str()) => {
                let identifier = identifier.clone();
                self.next_token();
                GenotypeRef::Named(identifier)
            }
            Some(Token::Numeric(numeric)) if numeric.is_integer() => {
                let numeric = numeric.clone();
                self.next_token();
                GenotypeRef::Coded(numeric)
            }
            _ => return Err(self.unexpected(SyntaxKind::Genotype).into()),
        };

        let liability_class = match self.peek() {
            Some(Token::Numeric(numeric)) if numeric.is_integer() => {
                let numeric = numeric.clone();
                self.next_token();
                Some(numeric)
            }
            _ => None,
        };

        Ok(QualifiedGenotype {
            genotype,
            liability_class,
        })
    }

    /// Consumes an operator and checks it against the accepted set of the table.
    fn expect_constraint_operator(&mut self, table: &GrammarTable) -> ParseResult<Operator> {
        let operator = self.expect_operator()?;

        if table.is_operator(operator.operator) {
            Ok(operator)
        } else {
            Err(UnexpectedToken {
                expected: SyntaxKind::Operator,
                found: Some(operator.into()),
            }
            .into())
        }
    }
}
