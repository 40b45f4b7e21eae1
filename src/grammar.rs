//! Contains the [`GrammarTable`], the injected tag metadata the parser consults.

use std::collections::{BTreeMap, HashMap, HashSet};

use strum::IntoEnumIterator;

use crate::lexical::token::OperatorKind;

/// Read-only tag metadata consulted by the parser.
///
/// The table is constructed once and shared by reference across all parses;
/// the parser never mutates it. It answers, per tag, which of the line shapes
/// applies: a filename line, a fixed count of numbers, a variable value list,
/// or the quantitative-trait distribution sub-grammar. It also carries the
/// recognized genotype strings, the accepted operator spellings and the
/// distribution name table.
#[derive(Debug, Clone)]
pub struct GrammarTable {
    fixed_arity: HashMap<String, usize>,
    variable_tags: HashSet<String>,
    filename_tags: HashSet<String>,
    genotypes: HashSet<String>,
    operators: HashSet<&'static str>,
    distribution_tag: Option<String>,
    distributions: BTreeMap<String, usize>,
}

impl Default for GrammarTable {
    fn default() -> Self {
        Self {
            fixed_arity: HashMap::new(),
            variable_tags: HashSet::new(),
            filename_tags: HashSet::new(),
            genotypes: HashSet::new(),
            operators: OperatorKind::iter().map(OperatorKind::as_str).collect(),
            distribution_tag: None,
            distributions: BTreeMap::new(),
        }
    }
}

impl GrammarTable {
    /// Creates an empty table that accepts every operator spelling.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The stock table of the linkage analysis engine.
    ///
    /// Pedigree, data, marker and output files are filename tags; allele and
    /// gene frequencies, thetas and the three penetrance tags take value
    /// lists; the quantitative-trait tag `QT` selects a distribution.
    #[must_use]
    pub fn linkage() -> Self {
        Self::new()
            .with_filename_tag("PD")
            .with_filename_tag("DF")
            .with_filename_tag("MK")
            .with_filename_tag("OF")
            .with_fixed_tag("LC", 1)
            .with_fixed_tag("DA", 1)
            .with_fixed_tag("UP", 1)
            .with_variable_tag("AF")
            .with_variable_tag("GF")
            .with_variable_tag("Th")
            .with_variable_tag("Tm")
            .with_variable_tag("Tf")
            .with_variable_tag("DD")
            .with_variable_tag("Dd")
            .with_variable_tag("dd")
            .with_genotype("DD")
            .with_genotype("Dd")
            .with_genotype("dd")
            .with_distribution_tag("QT")
            .with_distribution("normal", 2)
            .with_distribution("chisq", 1)
            .with_distribution("t", 3)
    }

    /// Registers a tag that is followed by exactly `arity` numbers.
    #[must_use]
    pub fn with_fixed_tag<S: Into<String>>(mut self, tag: S, arity: usize) -> Self {
        self.fixed_arity.insert(tag.into(), arity);
        self
    }

    /// Registers a tag that takes a variable value list (groups of 1 or 3 numbers).
    #[must_use]
    pub fn with_variable_tag<S: Into<String>>(mut self, tag: S) -> Self {
        self.variable_tags.insert(tag.into());
        self
    }

    /// Registers a tag whose single value is a filename.
    #[must_use]
    pub fn with_filename_tag<S: Into<String>>(mut self, tag: S) -> Self {
        self.filename_tags.insert(tag.into());
        self
    }

    /// Registers a recognized genotype string.
    #[must_use]
    pub fn with_genotype<S: Into<String>>(mut self, genotype: S) -> Self {
        self.genotypes.insert(genotype.into());
        self
    }

    /// Restricts the accepted operators to the given spellings.
    ///
    /// By default all spellings the lexer knows are accepted.
    #[must_use]
    pub fn with_operators<I: IntoIterator<Item = OperatorKind>>(mut self, operators: I) -> Self {
        self.operators = operators.into_iter().map(OperatorKind::as_str).collect();
        self
    }

    /// Registers the tag that selects a distribution sub-grammar.
    #[must_use]
    pub fn with_distribution_tag<S: Into<String>>(mut self, tag: S) -> Self {
        self.distribution_tag = Some(tag.into());
        self
    }

    /// Registers a distribution name with its parameter count.
    #[must_use]
    pub fn with_distribution<S: Into<String>>(mut self, name: S, parameters: usize) -> Self {
        self.distributions.insert(name.into(), parameters);
        self
    }

    /// The exact number of values the given fixed-arity tag takes, if registered.
    #[must_use]
    pub fn fixed_arity(&self, tag: &str) -> Option<usize> {
        self.fixed_arity.get(tag).copied()
    }

    /// Whether the given tag is registered as taking a variable value list.
    #[must_use]
    pub fn is_variable_tag(&self, tag: &str) -> bool {
        self.variable_tags.contains(tag)
    }

    /// Whether the given tag is registered as taking a filename.
    #[must_use]
    pub fn is_filename_tag(&self, tag: &str) -> bool {
        self.filename_tags.contains(tag)
    }

    /// Whether the given string is a recognized genotype.
    #[must_use]
    pub fn is_genotype(&self, s: &str) -> bool {
        self.genotypes.contains(s)
    }

    /// Whether the given operator spelling is accepted.
    #[must_use]
    pub fn is_operator(&self, operator: OperatorKind) -> bool {
        self.operators.contains(operator.as_str())
    }

    /// Whether the given tag selects the distribution sub-grammar.
    #[must_use]
    pub fn is_distribution_tag(&self, tag: &str) -> bool {
        self.distribution_tag.as_deref() == Some(tag)
    }

    /// The parameter count of the given distribution name, if registered.
    #[must_use]
    pub fn distribution_arity(&self, name: &str) -> Option<usize> {
        self.distributions.get(name).copied()
    }

    /// The registered distribution names, in deterministic order.
    #[must_use]
    pub fn distribution_names(&self) -> Vec<&str> {
        self.distributions.keys().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_table_classifications() {
        let table = GrammarTable::linkage();

        assert!(table.is_filename_tag("PD"));
        assert!(!table.is_filename_tag("AF"));
        assert_eq!(table.fixed_arity("LC"), Some(1));
        assert_eq!(table.fixed_arity("AF"), None);
        assert!(table.is_variable_tag("AF"));
        assert!(table.is_genotype("Dd"));
        assert!(!table.is_genotype("Tf"));
        assert!(table.is_distribution_tag("QT"));
        assert_eq!(table.distribution_arity("chisq"), Some(1));
        assert_eq!(table.distribution_names(), vec!["chisq", "normal", "t"]);
    }

    #[test]
    fn operators_accepted_by_default() {
        let table = GrammarTable::new();
        assert!(table.is_operator(OperatorKind::Greater));
        assert!(table.is_operator(OperatorKind::Equal));

        let restricted = GrammarTable::new().with_operators([OperatorKind::Greater]);
        assert!(restricted.is_operator(OperatorKind::Greater));
        assert!(!restricted.is_operator(OperatorKind::NotEqual));
    }
}
