//! AutoLang Programming Language Front End
//!
//! AutoLang is an expression-oriented systems language: declarations,
//! bindings, control flow, and even statement sequencing are expressions.
//! Every control-flow construct comes in two surface forms — prefix
//! (`if cond { .. }`, `break 'out val`) and suffix (`cond.if { .. }`,
//! `val.break 'out`) — that normalize to one AST shape. Inline machine
//! code is embedded through opaque `asm { .. }` blocks whose bodies are
//! captured verbatim.
//!
//! # Architecture
//!
//! ```text
//! Source → Lexer (+ opaque-block scanner) → Parser → AST + diagnostics
//! ```
//!
//! # Example
//!
//! ```autolang
//! fib: fn(n: i64) -> i64 = {
//!     (a, mut b): (i64, i64) = (zero(), one());
//!     'step: for i in range(n) {
//!         (a, b) = (b, add(a, b))
//!     };
//!     a
//! };
//! boot: fn = asm { call void @init() }
//! ```

#![allow(dead_code)]

pub mod ast;
pub mod common;
pub mod diagnostics;
pub mod lexer;
pub mod parser;

// Re-export diagnostics for convenience
pub use diagnostics::{CompileError, Reporter, SourceFile};

// Re-exports for convenience
pub use ast::TransUnit;
pub use parser::ParseResult;

/// Compiler version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Parse source code to an AST plus diagnostics
pub fn parse(source: &str) -> ParseResult {
    parse_file(&SourceFile::new("<input>", source))
}

/// Parse a named source file to an AST plus diagnostics
pub fn parse_file(file: &SourceFile) -> ParseResult {
    let (tokens, lex_errors) = lexer::lex(file);
    tracing::debug!(
        file = %file.name,
        tokens = tokens.len(),
        "lexed translation unit"
    );
    let mut result = parser::parse(&tokens, file);
    // lexical diagnostics come first in source order
    let mut diagnostics = lex_errors;
    diagnostics.append(&mut result.diagnostics);
    result.diagnostics = diagnostics;
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_parse_clean_source() {
        let result = parse("x : i64 = f(y)");
        assert!(result.diagnostics.is_empty());
        assert!(result.unit.body.is_some());
    }
}
