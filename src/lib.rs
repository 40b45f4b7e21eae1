//! Configuration-file front end for a genetic-linkage analysis engine.
//!
//! The crate lexes and parses the line-oriented directive format of the
//! engine: tag/value directives, numeric value lists and ranges, and the
//! family of inequality constraint expressions over genotypes, liability
//! classes and model parameters. Parsing is the correctness gate for a
//! long-running batch analysis, so it is single-shot and fail-fast: the
//! first error aborts with an exact 1-based row and column.
//!
//! Which shape a tag takes is not part of the grammar itself; it is looked
//! up in an injected, read-only [`grammar::GrammarTable`].

#![deny(
    missing_debug_implementations,
    missing_copy_implementations,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    clippy::missing_errors_doc
)]
#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::missing_panics_doc, clippy::missing_const_for_fn)]

pub mod base;
pub mod grammar;
pub mod lexical;
pub mod syntax;

use std::path::Path;

use base::{source_file::SourceFile, FileProvider, Result};
use grammar::GrammarTable;
use lexical::token_stream::TokenStream;
use syntax::{parser::Parser, syntax_tree::ConfigFile};

/// Converts the given configuration file to tokens.
///
/// # Errors
/// - If an error occurs while reading the file.
pub fn tokenize(provider: &impl FileProvider, path: &Path) -> Result<TokenStream> {
    let source_file = SourceFile::load(path, provider)?;

    Ok(TokenStream::tokenize(&source_file))
}

/// Parses the given configuration file against the given grammar table.
///
/// Opens the file, lexes it and parses it to completion or to the first
/// error; there is no recovery and no partial result.
///
/// # Errors
/// - If an error occurs while reading the file.
/// - If an error occurs while parsing the configuration.
pub fn parse(
    provider: &impl FileProvider,
    path: &Path,
    table: &GrammarTable,
) -> Result<ConfigFile> {
    let source_file = SourceFile::load(path, provider)?;

    let tokens = TokenStream::tokenize(&source_file);

    let mut parser = Parser::new(&tokens);
    let config = parser.parse_config(table)?;

    Ok(config)
}
