use std::path::Path;

use linkage_config::{
    base::MemoryProvider,
    lexical::{
        token::{OperatorKind, Token},
        token_stream::TokenStream,
    },
};

fn lex(source: &str) -> TokenStream {
    let mut provider = MemoryProvider::new();
    provider.add_file("model.conf", source);

    linkage_config::tokenize(&provider, Path::new("model.conf")).expect("Failed to tokenize")
}

fn token_texts(stream: &TokenStream) -> Vec<&str> {
    stream.iter().map(|token| token.span().str()).collect()
}

#[test]
fn token_positions_are_one_based() {
    let tokens = lex("AF 0.2\nDD > Dd\n");

    let positions = tokens
        .iter()
        .map(|token| {
            let location = token.span().start_location();
            (token.span().str(), location.line, location.column)
        })
        .collect::<Vec<_>>();

    assert_eq!(
        positions,
        vec![
            ("AF", 1, 1),
            ("0.2", 1, 4),
            ("\n", 1, 7),
            ("DD", 2, 1),
            (">", 2, 4),
            ("Dd", 2, 6),
            ("\n", 2, 8),
        ]
    );
}

#[test]
fn end_of_input_is_idempotent() {
    let mut provider = MemoryProvider::new();
    provider.add_file("model.conf", "AF 0.2\n");
    let source_file = linkage_config::base::source_file::SourceFile::load(
        Path::new("model.conf"),
        &provider,
    )
    .expect("Failed to load");

    let mut iter = source_file.iter();
    while Token::tokenize(&mut iter).is_some() {}

    assert!(Token::tokenize(&mut iter).is_none());
    assert!(Token::tokenize(&mut iter).is_none());
}

#[test]
fn operators_and_stray_characters() {
    let tokens = lex("> >= != == ! = %");

    let kinds = tokens
        .iter()
        .map(|token| match token {
            Token::Operator(operator) => format!("op:{}", operator.operator.as_str()),
            Token::Unknown(unknown) => format!("unknown:{}", unknown.span.str()),
            other => panic!("unexpected token {other:?}"),
        })
        .collect::<Vec<_>>();

    assert_eq!(
        kinds,
        vec!["op:>", "op:>=", "op:!=", "op:==", "unknown:!", "unknown:=", "unknown:%"]
    );

    assert_eq!(
        tokens[1].as_operator().unwrap().operator,
        OperatorKind::GreaterOrEqual
    );
}

#[test]
fn comment_excludes_trailing_newline() {
    let tokens = lex("# penetrance model\nAF 0.2\n");

    let comment = tokens[0].as_comment().expect("expected comment");
    assert_eq!(comment.span.str(), "# penetrance model");
    assert_eq!(comment.content(), " penetrance model");
    assert!(tokens[1].is_newline());
}

#[test]
fn numbers_signed_and_fractional() {
    let tokens = lex("-0.5 42 -7 0.125");

    assert_eq!(token_texts(&tokens), vec!["-0.5", "42", "-7", "0.125"]);
    assert!(tokens.iter().all(Token::is_numeric));
    assert!(!tokens[0].as_numeric().unwrap().is_integer());
    assert!(tokens[1].as_numeric().unwrap().is_integer());
}

#[test]
fn second_decimal_point_ends_the_number() {
    let tokens = lex("1.2.3");

    assert_eq!(token_texts(&tokens), vec!["1.2", ".3"]);
    assert!(tokens[0].is_numeric());
    // the re-lexed remainder starts with `.`, which begins an identifier
    assert!(tokens[1].is_identifier());
}

#[test]
fn filenames_lex_as_single_identifiers() {
    let tokens = lex("PD ped/file.pre\nDF \\data\\marker.dat\n");

    assert_eq!(
        token_texts(&tokens),
        vec!["PD", "ped/file.pre", "\n", "DF", "\\data\\marker.dat", "\n"]
    );
    assert!(tokens[1].is_identifier());
    assert!(tokens[4].is_identifier());
}

#[test]
fn semicolons_split_identifiers_and_values() {
    let tokens = lex("AF 0.1;0.2\n");

    assert_eq!(token_texts(&tokens), vec!["AF", "0.1", ";", "0.2", "\n"]);
    assert!(tokens[2].is_semicolon());
}

#[test]
fn whitespace_other_than_newline_is_skipped() {
    let tokens = lex("  \t AF \t 0.2 \r\n");

    assert_eq!(token_texts(&tokens), vec!["AF", "0.2", "\n"]);
}
