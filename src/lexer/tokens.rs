//! Token definitions for the AutoLang lexer

use crate::common::Span;
use logos::Logos;
use serde::{Deserialize, Serialize};

/// A token with its kind, span, and text
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub text: String,
}

/// Token kinds recognized by the lexer
///
/// Keywords carry no logos patterns on purpose: the automaton only knows
/// `Ident`, and the lexer classifies matches through its reserved-word
/// table. Maximal munch then falls out for free — `continue` or `iffy`
/// match the identifier rule in full and never split at a keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Logos, Serialize, Deserialize)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum TokenKind {
    // Keywords (classified from Ident by the reserved-word table)
    Fn,
    Mut,
    Asm,
    As,
    If,
    Else,
    While,
    For,
    In,
    Return,
    Break,
    Cont,

    // Identifiers (priority 1 so the _ token takes precedence)
    #[regex(r"[_\p{XID_Start}]\p{XID_Continue}*", priority = 1)]
    Ident,

    // Loop/block label: ' immediately followed by an identifier
    #[regex(r"'[_\p{XID_Start}]\p{XID_Continue}*")]
    Label,

    // A lone ' is an unterminated label
    #[token("'")]
    Quote,

    // Delimiters
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,

    // Punctuation
    #[token(",")]
    Comma,
    #[token(";")]
    Semi,
    #[token(":")]
    Colon,
    #[token("=")]
    Eq,
    #[token(".")]
    Dot,
    #[token("->")]
    Arrow,
    #[token("$")]
    Dollar,
    #[token("_", priority = 2)]
    Underscore,

    // Raw text captured inside `asm { ... }` by the opaque scanner
    RawCode,

    // Special
    Eof,
}

impl TokenKind {
    /// Check if this token is a keyword
    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::Fn
                | TokenKind::Mut
                | TokenKind::Asm
                | TokenKind::As
                | TokenKind::If
                | TokenKind::Else
                | TokenKind::While
                | TokenKind::For
                | TokenKind::In
                | TokenKind::Return
                | TokenKind::Break
                | TokenKind::Cont
        )
    }

    /// Get the string representation of the token
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Fn => "fn",
            TokenKind::Mut => "mut",
            TokenKind::Asm => "asm",
            TokenKind::As => "as",
            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::While => "while",
            TokenKind::For => "for",
            TokenKind::In => "in",
            TokenKind::Return => "return",
            TokenKind::Break => "break",
            TokenKind::Cont => "cont",
            TokenKind::Ident => "<ident>",
            TokenKind::Label => "<label>",
            TokenKind::Quote => "'",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::Comma => ",",
            TokenKind::Semi => ";",
            TokenKind::Colon => ":",
            TokenKind::Eq => "=",
            TokenKind::Dot => ".",
            TokenKind::Arrow => "->",
            TokenKind::Dollar => "$",
            TokenKind::Underscore => "_",
            TokenKind::RawCode => "<raw>",
            TokenKind::Eof => "<eof>",
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
