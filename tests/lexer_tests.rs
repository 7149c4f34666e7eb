//! Lexer tests

use autolang::lexer::{lex, Token, TokenKind};
use autolang::{CompileError, SourceFile};
use pretty_assertions::assert_eq;

fn lex_source(source: &str) -> Vec<Token> {
    let (tokens, errors) = lex(&SourceFile::new("<test>", source));
    assert!(errors.is_empty(), "unexpected lex errors: {errors:?}");
    tokens
}

fn lex_with_errors(source: &str) -> (Vec<Token>, Vec<CompileError>) {
    lex(&SourceFile::new("<test>", source))
}

#[test]
fn test_lex_empty() {
    let tokens = lex_source("");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::Eof);
}

#[test]
fn test_lex_whitespace() {
    let tokens = lex_source("   \t\n  ");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::Eof);
}

#[test]
fn test_lex_keywords() {
    let source = "fn mut asm as if else while for in return break cont";
    let tokens = lex_source(source);

    assert_eq!(tokens[0].kind, TokenKind::Fn);
    assert_eq!(tokens[1].kind, TokenKind::Mut);
    assert_eq!(tokens[2].kind, TokenKind::Asm);
    assert_eq!(tokens[3].kind, TokenKind::As);
    assert_eq!(tokens[4].kind, TokenKind::If);
    assert_eq!(tokens[5].kind, TokenKind::Else);
    assert_eq!(tokens[6].kind, TokenKind::While);
    assert_eq!(tokens[7].kind, TokenKind::For);
    assert_eq!(tokens[8].kind, TokenKind::In);
    assert_eq!(tokens[9].kind, TokenKind::Return);
    assert_eq!(tokens[10].kind, TokenKind::Break);
    assert_eq!(tokens[11].kind, TokenKind::Cont);
    assert_eq!(tokens[12].kind, TokenKind::Eof);
}

#[test]
fn test_lex_keywords_maximal_munch() {
    // a reserved word embedded in a longer identifier stays an identifier
    let tokens = lex_source("continue iffy formula asmx whiles");
    for token in &tokens[..5] {
        assert_eq!(token.kind, TokenKind::Ident, "{:?}", token.text);
    }
}

#[test]
fn test_lex_simple_binding() {
    let tokens = lex_source("x : i64 = f(y)");
    assert_eq!(tokens[0].kind, TokenKind::Ident);
    assert_eq!(tokens[0].text, "x");
    assert_eq!(tokens[1].kind, TokenKind::Colon);
    assert_eq!(tokens[2].kind, TokenKind::Ident);
    assert_eq!(tokens[2].text, "i64");
    assert_eq!(tokens[3].kind, TokenKind::Eq);
    assert_eq!(tokens[4].kind, TokenKind::Ident);
    assert_eq!(tokens[5].kind, TokenKind::LParen);
    assert_eq!(tokens[6].kind, TokenKind::Ident);
    assert_eq!(tokens[7].kind, TokenKind::RParen);
}

#[test]
fn test_lex_punctuation() {
    let source = "( ) { } , ; : = . -> $ _";
    let tokens = lex_source(source);

    assert_eq!(tokens[0].kind, TokenKind::LParen);
    assert_eq!(tokens[1].kind, TokenKind::RParen);
    assert_eq!(tokens[2].kind, TokenKind::LBrace);
    assert_eq!(tokens[3].kind, TokenKind::RBrace);
    assert_eq!(tokens[4].kind, TokenKind::Comma);
    assert_eq!(tokens[5].kind, TokenKind::Semi);
    assert_eq!(tokens[6].kind, TokenKind::Colon);
    assert_eq!(tokens[7].kind, TokenKind::Eq);
    assert_eq!(tokens[8].kind, TokenKind::Dot);
    assert_eq!(tokens[9].kind, TokenKind::Arrow);
    assert_eq!(tokens[10].kind, TokenKind::Dollar);
    assert_eq!(tokens[11].kind, TokenKind::Underscore);
}

#[test]
fn test_lex_underscore_prefix_ident() {
    let tokens = lex_source("_ _x __");
    assert_eq!(tokens[0].kind, TokenKind::Underscore);
    assert_eq!(tokens[1].kind, TokenKind::Ident);
    assert_eq!(tokens[1].text, "_x");
    assert_eq!(tokens[2].kind, TokenKind::Ident);
    assert_eq!(tokens[2].text, "__");
}

#[test]
fn test_lex_unicode_idents() {
    let tokens = lex_source("café 名前 αβγ");
    assert_eq!(tokens[0].kind, TokenKind::Ident);
    assert_eq!(tokens[0].text, "café");
    assert_eq!(tokens[1].kind, TokenKind::Ident);
    assert_eq!(tokens[1].text, "名前");
    assert_eq!(tokens[2].kind, TokenKind::Ident);
    assert_eq!(tokens[2].text, "αβγ");
}

#[test]
fn test_lex_label() {
    let tokens = lex_source("'outer: while");
    assert_eq!(tokens[0].kind, TokenKind::Label);
    assert_eq!(tokens[0].text, "'outer");
    assert_eq!(tokens[1].kind, TokenKind::Colon);
    assert_eq!(tokens[2].kind, TokenKind::While);
}

#[test]
fn test_lex_lone_quote_is_error() {
    let (tokens, errors) = lex_with_errors("' x");
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], CompileError::UnterminatedLabel { .. }));
    // lexing continues past the error
    assert_eq!(tokens[0].kind, TokenKind::Ident);
    assert_eq!(tokens[0].text, "x");
}

#[test]
fn test_lex_invalid_char() {
    let (tokens, errors) = lex_with_errors("x @ y");
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], CompileError::InvalidToken { .. }));
    assert_eq!(tokens[0].text, "x");
    assert_eq!(tokens[1].text, "y");
}

#[test]
fn test_lex_spans() {
    let tokens = lex_source("x = y");
    assert_eq!((tokens[0].span.start, tokens[0].span.end), (0, 1));
    assert_eq!((tokens[1].span.start, tokens[1].span.end), (2, 3));
    assert_eq!((tokens[2].span.start, tokens[2].span.end), (4, 5));
    assert_eq!((tokens[3].span.start, tokens[3].span.end), (5, 5));
}

#[test]
fn test_lex_asm_raw_block() {
    let tokens = lex_source("asm { ret void }");
    assert_eq!(tokens[0].kind, TokenKind::Asm);
    assert_eq!(tokens[1].kind, TokenKind::LBrace);
    assert_eq!(tokens[2].kind, TokenKind::RawCode);
    assert_eq!(tokens[2].text, " ret void ");
    assert_eq!(tokens[3].kind, TokenKind::RBrace);
    assert_eq!(tokens[4].kind, TokenKind::Eof);
}

#[test]
fn test_lex_asm_raw_is_not_tokenized() {
    // the body is one opaque token even though it contains punctuation
    // that would otherwise lex
    let tokens = lex_source("asm { %x = add i64 %a, %b }");
    assert_eq!(tokens[2].kind, TokenKind::RawCode);
    assert_eq!(tokens[2].text, " %x = add i64 %a, %b ");
    assert_eq!(tokens[3].kind, TokenKind::RBrace);
}

#[test]
fn test_lex_asm_nested_braces() {
    let tokens = lex_source("asm { define { i32 } @f() { ret } }");
    assert_eq!(tokens[2].kind, TokenKind::RawCode);
    assert_eq!(tokens[2].text, " define { i32 } @f() { ret } ");
    assert_eq!(tokens[3].kind, TokenKind::RBrace);
}

#[test]
fn test_lex_asm_braces_in_strings_and_comments() {
    let tokens = lex_source("asm { call @p(\"{\") ; close }\nret }");
    assert_eq!(tokens[2].kind, TokenKind::RawCode);
    assert_eq!(tokens[2].text, " call @p(\"{\") ; close }\nret ");
    assert_eq!(tokens[3].kind, TokenKind::RBrace);
}

#[test]
fn test_lex_asm_empty_block() {
    let tokens = lex_source("asm {}");
    assert_eq!(tokens[0].kind, TokenKind::Asm);
    assert_eq!(tokens[1].kind, TokenKind::LBrace);
    assert_eq!(tokens[2].kind, TokenKind::RBrace);
    assert_eq!(tokens[3].kind, TokenKind::Eof);
}

#[test]
fn test_lex_asm_unterminated() {
    let (tokens, errors) = lex_with_errors("asm { ret void");
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], CompileError::UnterminatedAsmBlock { .. }));
    // the remainder folds into a single raw token
    assert_eq!(tokens[2].kind, TokenKind::RawCode);
    assert_eq!(tokens[2].text, " ret void");
    assert_eq!(tokens[3].kind, TokenKind::Eof);
}

#[test]
fn test_lex_asm_keyword_without_block() {
    // `asm` not followed by `{` is ordinary token soup for the parser
    let tokens = lex_source("asm x");
    assert_eq!(tokens[0].kind, TokenKind::Asm);
    assert_eq!(tokens[1].kind, TokenKind::Ident);
    assert_eq!(tokens[1].text, "x");
}

#[test]
fn test_lex_suffix_form_tokens() {
    let tokens = lex_source("cond.if");
    assert_eq!(tokens[0].kind, TokenKind::Ident);
    assert_eq!(tokens[1].kind, TokenKind::Dot);
    assert_eq!(tokens[2].kind, TokenKind::If);
}
