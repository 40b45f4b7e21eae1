//! Contains the [`TokenStream`] struct and its related types.

use std::{fmt::Debug, sync::Arc};

use derive_more::Deref;

use crate::base::source_file::SourceFile;

use super::token::Token;

/// Is the flat list of [`Token`]s lexed from a source file.
///
/// This struct is the final output of the lexical analysis phase and is meant
/// to be used by the parser. The grammar has no nesting delimiters, so the
/// stream stays flat and file-ordered.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deref)]
pub struct TokenStream {
    #[deref]
    tokens: Vec<Token>,
}

impl Debug for TokenStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.tokens.iter()).finish()
    }
}

impl TokenStream {
    /// Tokenizes the given source code.
    ///
    /// This function tokenizes the given source file by calling
    /// [`Token::tokenize()`] repeatedly until the character iterator is
    /// exhausted. Lexing never fails; unrecognized characters become
    /// [`Token::Unknown`] tokens.
    #[must_use]
    #[tracing::instrument(level = "debug", skip_all, fields(source_file = %source_file.path().display()))]
    pub fn tokenize(source_file: &Arc<SourceFile>) -> Self {
        let mut tokens = Vec::new();
        let mut source_file_iterator = source_file.iter();

        while let Some(token) = Token::tokenize(&mut source_file_iterator) {
            tokens.push(token);
        }

        tracing::debug!("Lexed {} tokens", tokens.len());

        Self { tokens }
    }

    /// Dissolves this struct into its tokens.
    #[must_use]
    pub fn dissolve(self) -> Vec<Token> {
        self.tokens
    }
}
