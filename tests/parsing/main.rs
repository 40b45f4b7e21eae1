use std::path::Path;

use linkage_config::{
    base::{source_file::Location, Error, MemoryProvider},
    grammar::GrammarTable,
    syntax::{error::Error as SyntaxError, syntax_tree::ConfigFile},
};

fn parse(source: &str, table: &GrammarTable) -> Result<ConfigFile, Error> {
    let mut provider = MemoryProvider::new();
    provider.add_file("model.conf", source);

    linkage_config::parse(&provider, Path::new("model.conf"), table)
}

fn parse_err(source: &str, table: &GrammarTable) -> SyntaxError {
    match parse(source, table) {
        Err(Error::ParseError(err)) => err,
        other => panic!("expected a parse error, got {other:?}"),
    }
}

#[test]
fn constraint_and_value_lines_are_disambiguated() {
    let table = GrammarTable::linkage();

    let config = parse("DD > Dd\n", &table).expect("Failed to parse");
    assert_eq!(config.len(), 1);
    let constraint = config[0].as_constraint().expect("expected constraint line");
    assert_eq!(constraint.constraints().len(), 1);

    let config = parse("AF 0.25\n", &table).expect("Failed to parse");
    assert_eq!(config.len(), 1);
    let directive = config[0].as_directive().expect("expected directive line");
    assert!(directive.is_variable_number());
}

#[test]
fn fixed_arity_is_enforced() {
    let table = GrammarTable::new().with_fixed_tag("TAG", 2);

    assert!(parse("TAG 1 2\n", &table).is_ok());

    match parse_err("TAG 1\n", &table) {
        SyntaxError::MissingValues(err) => {
            assert_eq!(err.expected, 2);
            assert_eq!(err.provided, 1);
        }
        other => panic!("expected missing values, got {other:?}"),
    }

    match parse_err("TAG 1 2 3\n", &table) {
        SyntaxError::ExtraValues(err) => assert_eq!(err.expected, 2),
        other => panic!("expected extra values, got {other:?}"),
    }
}

#[test]
fn constraints_chain_over_semicolons() {
    let table = GrammarTable::linkage();

    let config = parse("Tm > Tf; DD > Dd\n", &table).expect("Failed to parse");
    assert_eq!(config.len(), 1);

    let line = config[0].as_constraint().expect("expected constraint line");
    let constraints = line.constraints();
    assert_eq!(constraints.len(), 2);
    assert!(constraints.first().is_theta());
    assert!(constraints.rest()[0].1.is_genotype());
}

#[test]
fn genotype_representations_must_match() {
    let table = GrammarTable::linkage();

    assert!(parse("DD > Dd\n", &table).is_ok());
    assert!(parse("0 > 1\n", &table).is_ok());

    match parse_err("0 > Dd\n", &table) {
        SyntaxError::GenotypeKindMismatch(..) => {}
        other => panic!("expected genotype kind mismatch, got {other:?}"),
    }
}

#[test]
fn liability_classes_qualify_genotypes() {
    let table = GrammarTable::linkage();

    let config = parse("DD 1 > Dd 2\n", &table).expect("Failed to parse");
    let line = config[0].as_constraint().expect("expected constraint line");
    let constraint = line.constraints().first().as_genotype().unwrap();
    assert!(constraint.left().liability_class().is_some());
    assert!(constraint.right().liability_class().is_some());

    // integer-coded genotypes with liability classes start the line with a number
    let config = parse("0 1 > 0 2\n", &table).expect("Failed to parse");
    let line = config[0].as_constraint().expect("expected constraint line");
    let constraint = line.constraints().first().as_genotype().unwrap();
    assert!(constraint.left().genotype().is_coded());
    assert!(constraint.left().liability_class().is_some());
}

#[test]
fn parameter_constraints_parse() {
    let table = GrammarTable::linkage();

    let config = parse("P1 DD > P1 Dd\n", &table).expect("Failed to parse");
    let line = config[0].as_constraint().expect("expected constraint line");
    let constraint = line.constraints().first().as_parameter().unwrap();
    assert_eq!(constraint.left_parameter().span.str(), "P1");
    assert_eq!(constraint.right_parameter().span.str(), "P1");
}

#[test]
fn errors_carry_row_and_column() {
    let table = GrammarTable::linkage();

    // the filename is missing entirely, so the error points at the newline
    let err = parse_err("PD\n", &table);
    assert_eq!(err.location(), Some(Location { line: 1, column: 3 }));

    let err = parse_err("AF 0.2\nPD\n", &table);
    assert_eq!(err.location(), Some(Location { line: 2, column: 3 }));
}

#[test]
fn unknown_tags_fall_back_to_value_lists() {
    let table = GrammarTable::linkage();

    let config = parse("FOO 1; 2 3 4\n", &table).expect("Failed to parse");
    let directive = config[0].as_directive().expect("expected directive line");
    assert!(directive.is_variable_number());

    let values = directive.body().as_values().unwrap();
    assert_eq!(values.len(), 2);
    assert!(values.first().is_point());
    assert!(values.rest()[0].1.is_range());
}

#[test]
fn value_groups_are_one_or_three_numbers() {
    let table = GrammarTable::linkage();

    assert!(parse("AF 0.1 0.5 0.05\n", &table).is_ok());
    assert!(parse("AF 0.1; 0.2 0.8 0.1; 0.9\n", &table).is_ok());

    // two numbers in a group is not a valid shape
    match parse_err("AF 0.2 0.9\n", &table) {
        SyntaxError::UnexpectedToken(err) => {
            assert!(err.found.as_ref().is_some_and(|token| token.is_newline()));
        }
        other => panic!("expected unexpected token, got {other:?}"),
    }
}

#[test]
fn distribution_names_are_checked() {
    let table = GrammarTable::linkage();

    let config = parse("QT normal 0.0 1.0\n", &table).expect("Failed to parse");
    let directive = config[0].as_directive().expect("expected directive line");
    let distribution = directive.body().as_distribution().unwrap();
    assert_eq!(distribution.name().span.str(), "normal");
    assert_eq!(distribution.parameters().len(), 2);

    match parse_err("QT chisqr 1\n", &table) {
        SyntaxError::UnknownDistribution(err) => {
            assert_eq!(err.alternatives, vec!["chisq", "normal", "t"]);
            assert_eq!(err.suggestion(), Some("chisq"));
        }
        other => panic!("expected unknown distribution, got {other:?}"),
    }
}

#[test]
fn filename_directives_parse() {
    let table = GrammarTable::linkage();

    let config = parse("PD ped/file.pre\n", &table).expect("Failed to parse");
    let directive = config[0].as_directive().expect("expected directive line");
    let filename = directive.body().as_filename().unwrap();
    assert_eq!(filename.span.str(), "ped/file.pre");
    assert!(!directive.is_variable_number());
}

#[test]
fn comments_and_blank_lines_are_kept_in_order() {
    let table = GrammarTable::linkage();

    let config = parse("# trait model\n\nAF 0.5\n", &table).expect("Failed to parse");
    assert_eq!(config.len(), 3);
    assert!(config[0].is_comment());
    assert!(config[1].is_blank());
    assert!(config[2].is_directive());
}

#[test]
fn last_line_may_omit_the_newline() {
    let table = GrammarTable::linkage();

    let config = parse("AF 0.5", &table).expect("Failed to parse");
    let directive = config[0].as_directive().expect("expected directive line");
    assert!(directive.newline().is_none());
}

#[test]
fn illegal_line_starts_fail_fast() {
    let table = GrammarTable::linkage();

    let err = parse_err("; 0.5\n", &table);
    match &err {
        SyntaxError::IllegalLineStart(..) => {}
        other => panic!("expected illegal line start, got {other:?}"),
    }
    assert_eq!(err.location(), Some(Location { line: 1, column: 1 }));

    // a float cannot start a line either; only integers open a constraint
    match parse_err("0.5 > 0.6\n", &table) {
        SyntaxError::IllegalLineStart(..) => {}
        other => panic!("expected illegal line start, got {other:?}"),
    }
}

#[test]
fn first_error_aborts_the_parse() {
    let table = GrammarTable::new()
        .with_fixed_tag("TAG", 2)
        .with_filename_tag("PD");

    // the arity error on line 2 is reported even though line 3 is also wrong
    let err = parse_err("TAG 1 2\nTAG 1\nPD\n", &table);
    match &err {
        SyntaxError::MissingValues(..) => {}
        other => panic!("expected missing values, got {other:?}"),
    }
    assert_eq!(err.location().map(|location| location.line), Some(2));
}
