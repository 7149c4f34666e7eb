//! Lexer for the AutoLang language
//!
//! Drives the logos automaton over the source text and produces a finite
//! token stream terminated by `Eof`. Two concerns sit outside the
//! automaton: keyword classification (an explicit reserved-word table, so
//! the reserved set is configuration rather than baked-in state) and the
//! opaque `asm { ... }` regions, which are handed to a pluggable scanner
//! and captured as single `RawCode` tokens.

mod opaque;
mod tokens;

pub use opaque::{scan_inline_ir, OpaqueScanner};
pub use tokens::{Token, TokenKind};

use crate::common::Span;
use crate::diagnostics::{CompileError, SourceFile};
use logos::Logos;
use rustc_hash::FxHashMap;

/// The reserved-word table handed to a lexer at construction.
///
/// Identifier matches are looked up here; a hit becomes the corresponding
/// keyword token. The table is immutable once built.
#[derive(Debug, Clone)]
pub struct ReservedWords {
    map: FxHashMap<&'static str, TokenKind>,
}

impl ReservedWords {
    /// The AutoLang reserved set
    pub fn autolang() -> Self {
        let mut map = FxHashMap::default();
        map.insert("fn", TokenKind::Fn);
        map.insert("mut", TokenKind::Mut);
        map.insert("asm", TokenKind::Asm);
        map.insert("as", TokenKind::As);
        map.insert("if", TokenKind::If);
        map.insert("else", TokenKind::Else);
        map.insert("while", TokenKind::While);
        map.insert("for", TokenKind::For);
        map.insert("in", TokenKind::In);
        map.insert("return", TokenKind::Return);
        map.insert("break", TokenKind::Break);
        map.insert("cont", TokenKind::Cont);
        Self { map }
    }

    pub fn classify(&self, ident: &str) -> Option<TokenKind> {
        self.map.get(ident).copied()
    }
}

impl Default for ReservedWords {
    fn default() -> Self {
        Self::autolang()
    }
}

/// Lexer state
pub struct Lexer<'a> {
    file: &'a SourceFile,
    reserved: ReservedWords,
    opaque: OpaqueScanner,
}

impl<'a> Lexer<'a> {
    pub fn new(file: &'a SourceFile, reserved: ReservedWords) -> Self {
        Self {
            file,
            reserved,
            opaque: scan_inline_ir,
        }
    }

    /// Replace the opaque-block scanner (the raw dialect hook)
    pub fn with_opaque_scanner(mut self, scanner: OpaqueScanner) -> Self {
        self.opaque = scanner;
        self
    }

    /// Run the lexer over the whole input.
    ///
    /// Always returns a token stream ending in `Eof`; lexical errors are
    /// collected as diagnostics and never halt the pass.
    pub fn tokens(&self) -> (Vec<Token>, Vec<CompileError>) {
        let source: &str = &self.file.content;
        let mut lexer = TokenKind::lexer(source);
        let mut tokens = Vec::new();
        let mut errors = Vec::new();
        // Set when the previous two tokens were `asm` `{`
        let mut after_asm = false;

        while let Some(result) = lexer.next() {
            let span = Span::from(lexer.span());
            match result {
                Ok(kind) => {
                    let kind = match kind {
                        TokenKind::Ident => self
                            .reserved
                            .classify(lexer.slice())
                            .unwrap_or(TokenKind::Ident),
                        TokenKind::Quote => {
                            after_asm = false;
                            errors.push(CompileError::UnterminatedLabel {
                                span: span.into(),
                                src: self.file.to_named_source(),
                            });
                            continue;
                        }
                        other => other,
                    };

                    let entering_raw = after_asm && kind == TokenKind::LBrace;
                    after_asm = kind == TokenKind::Asm;

                    tokens.push(Token {
                        kind,
                        span,
                        text: lexer.slice().to_string(),
                    });

                    if entering_raw {
                        let rest = lexer.remainder();
                        match (self.opaque)(rest) {
                            Some(len) => {
                                if len > 0 {
                                    tokens.push(Token {
                                        kind: TokenKind::RawCode,
                                        span: Span::new(span.end, span.end + len),
                                        text: rest[..len].to_string(),
                                    });
                                }
                                lexer.bump(len);
                            }
                            None => {
                                errors.push(CompileError::UnterminatedAsmBlock {
                                    span: Span::new(span.start, source.len()).into(),
                                    src: self.file.to_named_source(),
                                });
                                tokens.push(Token {
                                    kind: TokenKind::RawCode,
                                    span: Span::new(span.end, source.len()),
                                    text: rest.to_string(),
                                });
                                lexer.bump(rest.len());
                            }
                        }
                    }
                }
                Err(()) => {
                    after_asm = false;
                    errors.push(CompileError::InvalidToken {
                        span: span.into(),
                        src: self.file.to_named_source(),
                    });
                }
            }
        }

        tokens.push(Token {
            kind: TokenKind::Eof,
            span: Span::at(source.len()),
            text: String::new(),
        });

        (tokens, errors)
    }
}

/// Lex source text with the default reserved set and opaque scanner
pub fn lex(file: &SourceFile) -> (Vec<Token>, Vec<CompileError>) {
    Lexer::new(file, ReservedWords::default()).tokens()
}
