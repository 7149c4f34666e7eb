//! Diagnostic reporting with source locations
//!
//! This module provides rich error messages with source locations using miette.

use crate::common::Span;
use miette::{Diagnostic, NamedSource, SourceSpan};
use std::sync::Arc;
use thiserror::Error;

/// Source file for error reporting
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub content: Arc<str>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: Arc::from(content.into()),
        }
    }

    pub fn to_named_source(&self) -> NamedSource<String> {
        NamedSource::new(self.name.clone(), self.content.to_string())
    }
}

/// Convert our Span to miette's SourceSpan
impl From<Span> for SourceSpan {
    fn from(span: Span) -> Self {
        SourceSpan::new(span.start.into(), span.len())
    }
}

/// Front-end diagnostic
#[derive(Error, Debug, Diagnostic, Clone)]
pub enum CompileError {
    // === Lexical Errors ===
    #[error("Invalid token")]
    #[diagnostic(code(lex::invalid_token))]
    InvalidToken {
        #[label("not a valid token")]
        span: SourceSpan,
        #[source_code]
        src: NamedSource<String>,
    },

    #[error("Unterminated label")]
    #[diagnostic(
        code(lex::unterminated_label),
        help("a label is `'` immediately followed by an identifier, like `'outer`")
    )]
    UnterminatedLabel {
        #[label("`'` is not followed by an identifier")]
        span: SourceSpan,
        #[source_code]
        src: NamedSource<String>,
    },

    #[error("Unterminated `asm` block")]
    #[diagnostic(code(lex::unterminated_asm))]
    UnterminatedAsmBlock {
        #[label("no matching `}}` before end of input")]
        span: SourceSpan,
        #[source_code]
        src: NamedSource<String>,
    },

    // === Syntax Errors ===
    #[error("Unexpected token: expected {expected}, found {found}")]
    #[diagnostic(code(parse::unexpected_token))]
    UnexpectedToken {
        expected: String,
        found: String,
        #[label("unexpected token here")]
        span: SourceSpan,
        #[source_code]
        src: NamedSource<String>,
    },

    #[error("`else` must be followed by a block or an `if`")]
    #[diagnostic(
        code(parse::invalid_else_branch),
        help("a suffix-form `if` cannot follow `else` directly; write `else if cond {{ ... }}` or `else {{ ... }}`")
    )]
    InvalidElseBranch {
        #[label("expected `{{` or `if` here")]
        span: SourceSpan,
        #[source_code]
        src: NamedSource<String>,
    },

    #[error("Invalid suffix form: `.{found}`")]
    #[diagnostic(
        code(parse::invalid_suffix_form),
        help("only `if`, `while`, `for`, `break`, and `return` have suffix forms; `cont` is prefix-only")
    )]
    InvalidSuffixForm {
        found: String,
        #[label("not a suffix keyword")]
        span: SourceSpan,
        #[source_code]
        src: NamedSource<String>,
    },

    #[error("`mut` must be followed by an identifier")]
    #[diagnostic(
        code(parse::mut_requires_ident),
        help("`mut` marks a single name mutable; it cannot prefix `_` or a tuple pattern")
    )]
    MutRequiresIdent {
        #[label("expected an identifier after `mut`")]
        span: SourceSpan,
        #[source_code]
        src: NamedSource<String>,
    },

    // === Structural Errors ===
    #[error("Unclosed delimiter: expected `{delimiter}`")]
    #[diagnostic(code(parse::unclosed_delimiter))]
    UnclosedDelimiter {
        delimiter: String,
        #[label("opened here")]
        open_span: SourceSpan,
        #[label("expected `{delimiter}` before this point")]
        span: SourceSpan,
        #[source_code]
        src: NamedSource<String>,
    },

    #[error("Unexpected end of input: expected {expected}")]
    #[diagnostic(code(parse::unexpected_eof))]
    UnexpectedEof {
        expected: String,
        #[label("input ends here")]
        span: SourceSpan,
        #[source_code]
        src: NamedSource<String>,
    },
}

/// Error reporter that collects diagnostics
pub struct Reporter {
    source: SourceFile,
    errors: Vec<CompileError>,
}

impl Reporter {
    pub fn new(source: SourceFile) -> Self {
        Self {
            source,
            errors: Vec::new(),
        }
    }

    pub fn error(&mut self, error: CompileError) {
        self.errors.push(error);
    }

    pub fn extend(&mut self, errors: impl IntoIterator<Item = CompileError>) {
        self.errors.extend(errors);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Create NamedSource for this file
    pub fn named_source(&self) -> NamedSource<String> {
        self.source.to_named_source()
    }

    /// Get the source file
    pub fn source(&self) -> &SourceFile {
        &self.source
    }

    /// Print all diagnostics
    pub fn emit_all(&self) {
        for error in &self.errors {
            eprintln!("{:?}", miette::Report::new(error.clone()));
        }
    }

    /// Consume and return errors
    pub fn into_errors(self) -> Vec<CompileError> {
        self.errors
    }

    /// Get errors by reference
    pub fn errors(&self) -> &[CompileError] {
        &self.errors
    }
}
