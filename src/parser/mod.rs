//! Parser for the AutoLang language
//!
//! A recursive descent parser over the token stream, using precedence
//! climbing for the expression grammar. Binding levels, higher binds
//! tighter:
//!
//! | level | form                                                |
//! |-------|-----------------------------------------------------|
//! | 15    | call `f(args)`                                      |
//! | 14    | suffix dot-forms `.if` `.while` `.for` `.break` `.return` |
//! | 11    | `as` type cast                                      |
//! | 0     | `=` assignment (right-associative)                  |
//! | −1    | `;` sequencing (left-associative)                   |
//!
//! Sequencing is also the error-recovery boundary: everything below it is
//! fallible and side-effect-free on failure, and the `;` level catches
//! the error, records the diagnostic, skips to the next `;` at the
//! current nesting depth, and substitutes an `Error` node. A parse
//! therefore always yields a (possibly partial) tree plus the list of
//! collected diagnostics.

use crate::ast::*;
use crate::common::{IdGenerator, Span};
use crate::diagnostics::{CompileError, SourceFile};
use crate::lexer::{Token, TokenKind};
use miette::NamedSource;

/// Operator binding levels (higher binds tighter)
const PREC_CALL: i8 = 15;
const PREC_SUFFIX: i8 = 14;
const PREC_AS: i8 = 11;
const PREC_ASSIGN: i8 = 0;

type PResult<T> = Result<T, CompileError>;

/// A (possibly partial) tree paired with the diagnostics collected while
/// producing it. An empty diagnostics list means a fully well-formed parse.
#[derive(Debug)]
pub struct ParseResult {
    pub unit: TransUnit,
    pub diagnostics: Vec<CompileError>,
}

/// Parse a token stream into a translation unit
pub fn parse(tokens: &[Token], file: &SourceFile) -> ParseResult {
    let mut parser = Parser::new(tokens, file);
    let unit = parser.parse_unit();
    ParseResult {
        unit,
        diagnostics: parser.diagnostics,
    }
}

/// Parser state
struct Parser<'a> {
    tokens: &'a [Token],
    file: &'a SourceFile,
    pos: usize,
    id_gen: IdGenerator,
    diagnostics: Vec<CompileError>,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token], file: &'a SourceFile) -> Self {
        Self {
            tokens,
            file,
            pos: 0,
            id_gen: IdGenerator::new(),
            diagnostics: Vec::new(),
        }
    }

    // ==================== CURSOR ====================

    fn current(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or_else(|| {
            self.tokens
                .last()
                .expect("token stream should have at least EOF")
        })
    }

    fn peek(&self) -> TokenKind {
        self.current().kind
    }

    fn peek_n(&self, n: usize) -> TokenKind {
        self.tokens
            .get(self.pos + n)
            .map(|t| t.kind)
            .unwrap_or(TokenKind::Eof)
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek() == kind
    }

    fn advance(&mut self) -> &Token {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        &self.tokens[self.pos.saturating_sub(1)]
    }

    /// Consume the current token if it matches
    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind) -> PResult<&Token> {
        if self.at(kind) {
            Ok(self.advance())
        } else {
            Err(self.err_unexpected(&format!("`{}`", kind.as_str())))
        }
    }

    fn span(&self) -> Span {
        self.current().span
    }

    /// Span of the most recently consumed token
    fn prev_span(&self) -> Span {
        if self.pos == 0 {
            Span::at(0)
        } else {
            self.tokens[self.pos - 1].span
        }
    }

    fn next_id(&mut self) -> crate::common::NodeId {
        self.id_gen.next()
    }

    // ==================== DIAGNOSTICS ====================

    fn src(&self) -> NamedSource<String> {
        self.file.to_named_source()
    }

    fn err_unexpected(&self, expected: &str) -> CompileError {
        let tok = self.current();
        if tok.kind == TokenKind::Eof {
            CompileError::UnexpectedEof {
                expected: expected.to_string(),
                span: tok.span.into(),
                src: self.src(),
            }
        } else {
            CompileError::UnexpectedToken {
                expected: expected.to_string(),
                found: format!("`{}`", tok.text),
                span: tok.span.into(),
                src: self.src(),
            }
        }
    }

    fn err_unclosed(&self, delimiter: TokenKind, open: Span) -> CompileError {
        CompileError::UnclosedDelimiter {
            delimiter: delimiter.as_str().to_string(),
            open_span: open.into(),
            span: self.span().into(),
            src: self.src(),
        }
    }

    /// Skip to the next `;` at the current nesting depth, or stop before
    /// the closing delimiter of the enclosing scope.
    fn recover(&mut self) {
        let mut depth = 0usize;
        loop {
            match self.peek() {
                TokenKind::Eof => return,
                TokenKind::Semi if depth == 0 => return,
                TokenKind::RBrace | TokenKind::RParen if depth == 0 => return,
                TokenKind::LBrace | TokenKind::LParen => {
                    depth += 1;
                    self.advance();
                }
                TokenKind::RBrace | TokenKind::RParen => {
                    depth -= 1;
                    self.advance();
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Consume the expected closing delimiter. If something else is in the
    /// way, diagnose it once and skip ahead to the matching close.
    fn expect_closing(&mut self, kind: TokenKind, open: Span) -> PResult<Span> {
        if self.at(kind) {
            return Ok(self.advance().span);
        }
        if self.at(TokenKind::Eof) {
            return Err(self.err_unclosed(kind, open));
        }
        let err = self.err_unexpected(&format!("`{}`", kind.as_str()));
        self.diagnostics.push(err);
        let mut depth = 0usize;
        loop {
            match self.peek() {
                TokenKind::Eof => return Err(self.err_unclosed(kind, open)),
                k if k == kind && depth == 0 => return Ok(self.advance().span),
                TokenKind::LBrace | TokenKind::LParen => {
                    depth += 1;
                    self.advance();
                }
                TokenKind::RBrace | TokenKind::RParen => {
                    depth = depth.saturating_sub(1);
                    self.advance();
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    // ==================== TRANSLATION UNIT ====================

    fn parse_unit(&mut self) -> TransUnit {
        let full = Span::new(0, self.file.content.len());
        if self.at(TokenKind::Eof) {
            return TransUnit {
                body: None,
                span: full,
            };
        }

        let mut body = self.parse_expr();

        // Anything the expression grammar did not consume is junk; diagnose
        // it, skip to the next `;`, and keep the chain going.
        while !self.at(TokenKind::Eof) {
            let err = self.err_unexpected("`;` or end of input");
            self.diagnostics.push(err);
            self.advance();
            self.recover();
            if self.eat(TokenKind::Semi) {
                let rhs = if self.can_start_expr() {
                    Some(Box::new(self.parse_expr()))
                } else {
                    None
                };
                let span = body.span().merge(self.prev_span());
                body = Expr::Semi {
                    id: self.next_id(),
                    lhs: Box::new(body),
                    rhs,
                    span,
                };
            }
        }

        TransUnit {
            body: Some(body),
            span: full,
        }
    }

    // ==================== EXPRESSIONS ====================

    /// Parse an expression including `;` sequencing, recovering from
    /// errors at the sequencing boundary. Never fails.
    fn parse_expr(&mut self) -> Expr {
        let mut lhs = self.parse_expr_or_recover();
        while self.at(TokenKind::Semi) {
            let semi = self.advance().span;
            let rhs = if self.can_start_expr() {
                Some(Box::new(self.parse_expr_or_recover()))
            } else {
                None
            };
            let end = rhs.as_ref().map_or(semi, |r| r.span());
            let span = lhs.span().merge(end);
            lhs = Expr::Semi {
                id: self.next_id(),
                lhs: Box::new(lhs),
                rhs,
                span,
            };
        }
        lhs
    }

    fn parse_expr_or_recover(&mut self) -> Expr {
        let start = self.span();
        let start_pos = self.pos;
        match self.parse_expr_bp(PREC_ASSIGN) {
            Ok(expr) => expr,
            Err(err) => {
                tracing::debug!(at = start.start, "resynchronizing after parse error");
                self.diagnostics.push(err);
                self.recover();
                let span = if self.pos > start_pos {
                    start.merge(self.prev_span())
                } else {
                    Span::at(start.start)
                };
                Expr::Error {
                    id: self.next_id(),
                    span,
                }
            }
        }
    }

    /// Precedence climbing over the binding table. `;` is handled one
    /// level up, at the recovery boundary.
    fn parse_expr_bp(&mut self, min_bp: i8) -> PResult<Expr> {
        let mut lhs = self.parse_primary()?;

        loop {
            match self.peek() {
                TokenKind::LParen if PREC_CALL >= min_bp => {
                    let (args, end) = self.parse_call_args()?;
                    let span = lhs.span().merge(end);
                    lhs = Expr::Call {
                        id: self.next_id(),
                        callee: Box::new(lhs),
                        args,
                        span,
                    };
                }
                TokenKind::Dot if PREC_SUFFIX >= min_bp => {
                    lhs = self.parse_suffix_form(lhs)?;
                }
                TokenKind::As if PREC_AS >= min_bp => {
                    self.advance();
                    let ty = self.parse_type()?;
                    let span = lhs.span().merge(ty.span());
                    lhs = Expr::As {
                        id: self.next_id(),
                        val: Box::new(lhs),
                        ty,
                        span,
                    };
                }
                TokenKind::Eq if PREC_ASSIGN >= min_bp => {
                    self.advance();
                    // right-associative: re-enter at the same level
                    let rhs = self.parse_expr_bp(PREC_ASSIGN)?;
                    let span = lhs.span().merge(rhs.span());
                    lhs = Expr::Assign {
                        id: self.next_id(),
                        lhs: Box::new(lhs),
                        rhs: Box::new(rhs),
                        span,
                    };
                }
                _ => break,
            }
        }

        Ok(lhs)
    }

    /// Can the current token begin an expression?
    fn can_start_expr(&self) -> bool {
        matches!(
            self.peek(),
            TokenKind::Ident
                | TokenKind::Label
                | TokenKind::LParen
                | TokenKind::LBrace
                | TokenKind::If
                | TokenKind::While
                | TokenKind::For
                | TokenKind::Return
                | TokenKind::Break
                | TokenKind::Cont
                | TokenKind::Asm
                | TokenKind::Mut
                | TokenKind::Dollar
                | TokenKind::Underscore
        )
    }

    fn parse_primary(&mut self) -> PResult<Expr> {
        match self.peek() {
            TokenKind::Ident => {
                if self.peek_n(1) == TokenKind::Colon {
                    self.parse_decl()
                } else {
                    let tok = self.advance();
                    let (name, span) = (tok.text.clone(), tok.span);
                    Ok(Expr::Ident {
                        id: self.next_id(),
                        name,
                        span,
                    })
                }
            }

            // `mut` and `$` can only begin a declaration pattern
            TokenKind::Mut | TokenKind::Dollar => self.parse_decl(),

            TokenKind::Underscore => {
                if self.peek_n(1) == TokenKind::Colon {
                    self.parse_decl()
                } else {
                    Err(self.err_unexpected("an expression"))
                }
            }

            TokenKind::LParen => {
                // A parenthesized pattern followed by `:` is a declaration;
                // probe with a bounded speculative parse, rewound either way.
                let snapshot = self.pos;
                let is_decl = self.parse_pattern_atom().is_ok() && self.at(TokenKind::Colon);
                self.pos = snapshot;
                if is_decl {
                    self.parse_decl()
                } else {
                    self.parse_paren_expr()
                }
            }

            TokenKind::LBrace => {
                let block = self.parse_block()?;
                let span = block.span;
                Ok(Expr::Block {
                    id: self.next_id(),
                    block,
                    span,
                })
            }

            TokenKind::Label => self.parse_labeled(),

            TokenKind::If => self.parse_if_prefix(),
            TokenKind::While => self.parse_while_prefix(None),
            TokenKind::For => self.parse_for_prefix(None),

            TokenKind::Return => {
                let start = self.advance().span;
                let val = if self.can_start_expr() {
                    Some(Box::new(self.parse_expr_bp(PREC_ASSIGN)?))
                } else {
                    None
                };
                let end = val.as_ref().map_or(start, |v| v.span());
                Ok(Expr::Return {
                    id: self.next_id(),
                    val,
                    form: Form::Prefix,
                    span: start.merge(end),
                })
            }

            TokenKind::Break => {
                let start = self.advance().span;
                let lab = self.parse_loop_target();
                let val = if self.can_start_expr() {
                    Some(Box::new(self.parse_expr_bp(PREC_ASSIGN)?))
                } else {
                    None
                };
                let end = val
                    .as_ref()
                    .map(|v| v.span())
                    .or(lab.as_ref().map(|l| l.span))
                    .unwrap_or(start);
                Ok(Expr::Break {
                    id: self.next_id(),
                    lab,
                    val,
                    form: Form::Prefix,
                    span: start.merge(end),
                })
            }

            TokenKind::Cont => {
                let start = self.advance().span;
                let lab = if self.at(TokenKind::Label) {
                    Some(self.parse_label())
                } else {
                    None
                };
                let end = lab.as_ref().map_or(start, |l| l.span);
                Ok(Expr::Cont {
                    id: self.next_id(),
                    lab,
                    span: start.merge(end),
                })
            }

            TokenKind::Asm => self.parse_asm(),

            _ => Err(self.err_unexpected("an expression")),
        }
    }

    fn parse_call_args(&mut self) -> PResult<(Vec<Expr>, Span)> {
        let open = self.expect(TokenKind::LParen)?.span;
        let mut args = Vec::new();
        while !self.at(TokenKind::RParen) {
            if self.at(TokenKind::Eof) {
                return Err(self.err_unclosed(TokenKind::RParen, open));
            }
            args.push(self.parse_expr());
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        let close = self.expect_closing(TokenKind::RParen, open)?;
        Ok((args, close))
    }

    fn parse_paren_expr(&mut self) -> PResult<Expr> {
        let open = self.advance().span;
        if self.at(TokenKind::RParen) {
            let close = self.advance().span;
            return Ok(Expr::Tuple {
                id: self.next_id(),
                elements: Vec::new(),
                span: open.merge(close),
            });
        }
        if self.at(TokenKind::Eof) {
            return Err(self.err_unclosed(TokenKind::RParen, open));
        }

        let first = self.parse_expr();

        if self.at(TokenKind::Comma) {
            // one-token lookahead found `,` — this is a tuple
            let mut elements = vec![first];
            while self.eat(TokenKind::Comma) {
                if self.at(TokenKind::RParen) {
                    break;
                }
                if self.at(TokenKind::Eof) {
                    return Err(self.err_unclosed(TokenKind::RParen, open));
                }
                elements.push(self.parse_expr());
            }
            let close = self.expect_closing(TokenKind::RParen, open)?;
            Ok(Expr::Tuple {
                id: self.next_id(),
                elements,
                span: open.merge(close),
            })
        } else {
            let close = self.expect_closing(TokenKind::RParen, open)?;
            Ok(Expr::Paren {
                id: self.next_id(),
                inner: Box::new(first),
                span: open.merge(close),
            })
        }
    }

    // ==================== CONTROL FLOW ====================

    fn parse_block(&mut self) -> PResult<Block> {
        let open = self.expect(TokenKind::LBrace)?.span;
        let body = if self.at(TokenKind::RBrace) {
            None
        } else if self.at(TokenKind::Eof) {
            return Err(self.err_unclosed(TokenKind::RBrace, open));
        } else {
            Some(Box::new(self.parse_expr()))
        };
        let close = self.expect_closing(TokenKind::RBrace, open)?;
        Ok(Block {
            id: self.next_id(),
            body,
            span: open.merge(close),
        })
    }

    fn parse_if_prefix(&mut self) -> PResult<Expr> {
        let start = self.expect(TokenKind::If)?.span;
        let cond = self.parse_expr_bp(PREC_ASSIGN)?;
        let body = self.parse_block()?;
        let el = self.parse_else_branch()?;
        let end = match &el {
            Some(ElseBranch::Block(b)) => b.span,
            Some(ElseBranch::If(e)) => e.span(),
            None => body.span,
        };
        Ok(Expr::If {
            id: self.next_id(),
            cond: Box::new(cond),
            body,
            el,
            form: Form::Prefix,
            span: start.merge(end),
        })
    }

    /// The branch after `else`: a block, or a prefix-form `if`. A
    /// suffix-form `if` is rejected here, by rule rather than precedence.
    fn parse_else_branch(&mut self) -> PResult<Option<ElseBranch>> {
        if !self.eat(TokenKind::Else) {
            return Ok(None);
        }
        match self.peek() {
            TokenKind::LBrace => Ok(Some(ElseBranch::Block(self.parse_block()?))),
            TokenKind::If => Ok(Some(ElseBranch::If(Box::new(self.parse_if_prefix()?)))),
            _ => Err(CompileError::InvalidElseBranch {
                span: self.span().into(),
                src: self.src(),
            }),
        }
    }

    /// `else { ... }` after a loop — a block only, no `else if` chain
    fn parse_loop_else(&mut self) -> PResult<Option<Block>> {
        if !self.eat(TokenKind::Else) {
            return Ok(None);
        }
        if !self.at(TokenKind::LBrace) {
            return Err(self.err_unexpected("`{` after `else`"));
        }
        Ok(Some(self.parse_block()?))
    }

    fn parse_while_prefix(&mut self, lab: Option<Label>) -> PResult<Expr> {
        let kw = self.expect(TokenKind::While)?.span;
        let start = lab.as_ref().map_or(kw, |l| l.span);
        let cond = self.parse_expr_bp(PREC_ASSIGN)?;
        let body = self.parse_block()?;
        let el = self.parse_loop_else()?;
        let end = el.as_ref().map_or(body.span, |b| b.span);
        Ok(Expr::While {
            id: self.next_id(),
            lab,
            cond: Box::new(cond),
            body,
            el,
            form: Form::Prefix,
            span: start.merge(end),
        })
    }

    fn parse_for_prefix(&mut self, lab: Option<Label>) -> PResult<Expr> {
        let kw = self.expect(TokenKind::For)?.span;
        let start = lab.as_ref().map_or(kw, |l| l.span);
        let pat = self.parse_pattern()?;
        self.expect(TokenKind::In)?;
        let range = self.parse_expr_bp(PREC_ASSIGN)?;
        let body = self.parse_block()?;
        let el = self.parse_loop_else()?;
        let end = el.as_ref().map_or(body.span, |b| b.span);
        Ok(Expr::For {
            id: self.next_id(),
            lab,
            pat,
            range: Box::new(range),
            body,
            el,
            form: Form::Prefix,
            span: start.merge(end),
        })
    }

    /// `'lab: { ... }`, `'lab: while ...`, or `'lab: for ...`
    fn parse_labeled(&mut self) -> PResult<Expr> {
        let lab = self.parse_label();
        self.expect(TokenKind::Colon)?;
        match self.peek() {
            TokenKind::While => self.parse_while_prefix(Some(lab)),
            TokenKind::For => self.parse_for_prefix(Some(lab)),
            TokenKind::LBrace => {
                let block = self.parse_block()?;
                let span = lab.span.merge(block.span);
                Ok(Expr::Labeled {
                    id: self.next_id(),
                    lab,
                    block,
                    span,
                })
            }
            _ => Err(self.err_unexpected("`{`, `while`, or `for` after a label")),
        }
    }

    fn parse_label(&mut self) -> Label {
        let tok = self.advance();
        Label {
            name: tok.text[1..].to_string(),
            span: tok.span,
        }
    }

    /// A label operand of `break`, as opposed to a labeled-block value:
    /// `break 'l` targets `'l`, but in `break 'l: { }` the label belongs
    /// to the block expression being broken with.
    fn parse_loop_target(&mut self) -> Option<Label> {
        if self.at(TokenKind::Label) && self.peek_n(1) != TokenKind::Colon {
            Some(self.parse_label())
        } else {
            None
        }
    }

    /// Suffix dot-forms: the left operand is the condition, scrutinee, or
    /// value, and the keyword follows the dot. An optional `'lab:` may sit
    /// between the dot and a loop keyword.
    fn parse_suffix_form(&mut self, lhs: Expr) -> PResult<Expr> {
        self.advance(); // .
        let start = lhs.span();

        let lab = if self.at(TokenKind::Label) {
            let lab = self.parse_label();
            self.expect(TokenKind::Colon)?;
            if !matches!(self.peek(), TokenKind::While | TokenKind::For) {
                return Err(self.err_unexpected("`while` or `for` after a label"));
            }
            Some(lab)
        } else {
            None
        };

        match self.peek() {
            TokenKind::If => {
                self.advance();
                let body = self.parse_block()?;
                let el = self.parse_else_branch()?;
                let end = match &el {
                    Some(ElseBranch::Block(b)) => b.span,
                    Some(ElseBranch::If(e)) => e.span(),
                    None => body.span,
                };
                Ok(Expr::If {
                    id: self.next_id(),
                    cond: Box::new(lhs),
                    body,
                    el,
                    form: Form::Suffix,
                    span: start.merge(end),
                })
            }
            TokenKind::While => {
                self.advance();
                let body = self.parse_block()?;
                let el = self.parse_loop_else()?;
                let end = el.as_ref().map_or(body.span, |b| b.span);
                Ok(Expr::While {
                    id: self.next_id(),
                    lab,
                    cond: Box::new(lhs),
                    body,
                    el,
                    form: Form::Suffix,
                    span: start.merge(end),
                })
            }
            TokenKind::For => {
                self.advance();
                let pat = self.parse_pattern()?;
                self.expect(TokenKind::In)?;
                let body = self.parse_block()?;
                let el = self.parse_loop_else()?;
                let end = el.as_ref().map_or(body.span, |b| b.span);
                Ok(Expr::For {
                    id: self.next_id(),
                    lab,
                    pat,
                    range: Box::new(lhs),
                    body,
                    el,
                    form: Form::Suffix,
                    span: start.merge(end),
                })
            }
            TokenKind::Break => {
                self.advance();
                let lab = self.parse_loop_target();
                let end = lab.as_ref().map_or(self.prev_span(), |l| l.span);
                Ok(Expr::Break {
                    id: self.next_id(),
                    lab,
                    val: Some(Box::new(lhs)),
                    form: Form::Suffix,
                    span: start.merge(end),
                })
            }
            TokenKind::Return => {
                let end = self.advance().span;
                Ok(Expr::Return {
                    id: self.next_id(),
                    val: Some(Box::new(lhs)),
                    form: Form::Suffix,
                    span: start.merge(end),
                })
            }
            TokenKind::Eof => {
                Err(self.err_unexpected("`if`, `while`, `for`, `break`, or `return`"))
            }
            _ => Err(CompileError::InvalidSuffixForm {
                found: self.current().text.clone(),
                span: self.span().into(),
                src: self.src(),
            }),
        }
    }

    fn parse_asm(&mut self) -> PResult<Expr> {
        let start = self.advance().span; // asm
        if !self.at(TokenKind::LBrace) {
            return Err(self.err_unexpected("`{` after `asm`"));
        }
        self.advance();
        let raw_text = if self.at(TokenKind::RawCode) {
            self.advance().text.clone()
        } else {
            String::new()
        };
        let end = if self.at(TokenKind::RBrace) {
            self.advance().span
        } else if self.at(TokenKind::Eof) {
            // the lexer has already diagnosed the unterminated block
            self.span()
        } else {
            return Err(self.err_unexpected("`}`"));
        };
        Ok(Expr::Asm {
            id: self.next_id(),
            raw_text,
            span: start.merge(end),
        })
    }

    // ==================== DECLARATIONS ====================

    /// `pattern : ...` — a function definition if `fn` follows the colon,
    /// a binding otherwise.
    fn parse_decl(&mut self) -> PResult<Expr> {
        let pat = self.parse_pattern_atom()?;
        self.expect(TokenKind::Colon)?;
        if self.at(TokenKind::Fn) {
            self.parse_fn_def(pat)
        } else {
            self.parse_binding(pat)
        }
    }

    fn parse_fn_def(&mut self, name: Pattern) -> PResult<Expr> {
        let sign = self.parse_fn_sign()?;
        let body = if self.eat(TokenKind::Eq) {
            Some(Box::new(self.parse_expr_bp(PREC_ASSIGN)?))
        } else {
            None
        };
        let end = body.as_ref().map_or(sign.span, |b| b.span());
        let span = name.span.merge(end);
        Ok(Expr::FnDef {
            id: self.next_id(),
            name,
            sign,
            body,
            span,
        })
    }

    fn parse_fn_sign(&mut self) -> PResult<FnSign> {
        let start = self.expect(TokenKind::Fn)?.span;
        let mut params = Vec::new();
        if self.at(TokenKind::LParen) {
            let open = self.advance().span;
            if !self.at(TokenKind::RParen) {
                loop {
                    if self.at(TokenKind::Eof) {
                        return Err(self.err_unclosed(TokenKind::RParen, open));
                    }
                    params.push(self.parse_param()?);
                    if !self.eat(TokenKind::Comma) {
                        break;
                    }
                    // parameter lists take no trailing comma
                    if self.at(TokenKind::RParen) {
                        return Err(self.err_unexpected("a parameter"));
                    }
                }
            }
            self.expect_closing(TokenKind::RParen, open)?;
        }
        let ret = if self.eat(TokenKind::Arrow) {
            Some(self.parse_type()?)
        } else {
            None
        };
        let span = start.merge(self.prev_span());
        Ok(FnSign {
            id: self.next_id(),
            params,
            ret,
            span,
        })
    }

    fn parse_param(&mut self) -> PResult<Param> {
        let pat = self.parse_pattern_atom()?;
        let ty = if self.eat(TokenKind::Colon) {
            Some(self.parse_type()?)
        } else {
            None
        };
        let span = pat.span.merge(ty.as_ref().map_or(pat.span, |t| t.span()));
        Ok(Param {
            id: self.next_id(),
            pat,
            ty,
            span,
        })
    }

    fn parse_binding(&mut self, pat: Pattern) -> PResult<Expr> {
        let ty = if self.at(TokenKind::Eq) {
            None
        } else {
            Some(self.parse_type()?)
        };
        self.expect(TokenKind::Eq)?;
        // an explicit `_` initializer is a deliberate no-value placeholder
        let init = if self.at(TokenKind::Underscore) && self.peek_n(1) != TokenKind::Colon {
            let tok = self.advance();
            let span = tok.span;
            Expr::Underscore {
                id: self.next_id(),
                span,
            }
        } else {
            self.parse_expr_bp(PREC_ASSIGN)?
        };
        let span = pat.span.merge(init.span());
        Ok(Expr::Binding {
            id: self.next_id(),
            pat,
            ty,
            init: Box::new(init),
            span,
        })
    }

    // ==================== PATTERNS ====================

    /// Full pattern: atom plus an optional `: type` ascription. Used for
    /// tuple elements and loop patterns; at a binding or parameter the
    /// top-level `:` belongs to the enclosing construct, so those sites
    /// call [`Parser::parse_pattern_atom`] directly.
    fn parse_pattern(&mut self) -> PResult<Pattern> {
        let pat = self.parse_pattern_atom()?;
        if self.eat(TokenKind::Colon) {
            let ty = self.parse_type()?;
            let span = pat.span.merge(ty.span());
            Ok(Pattern {
                id: self.next_id(),
                captured: false,
                kind: PatternKind::Typed {
                    pat: Box::new(pat),
                    ty,
                },
                span,
            })
        } else {
            Ok(pat)
        }
    }

    fn parse_pattern_atom(&mut self) -> PResult<Pattern> {
        let captured = self.eat(TokenKind::Dollar);
        let start = if captured {
            self.prev_span()
        } else {
            self.span()
        };

        match self.peek() {
            TokenKind::Underscore => {
                let end = self.advance().span;
                Ok(Pattern {
                    id: self.next_id(),
                    captured,
                    kind: PatternKind::Wildcard,
                    span: start.merge(end),
                })
            }
            TokenKind::Mut => {
                self.advance();
                if !self.at(TokenKind::Ident) {
                    return Err(CompileError::MutRequiresIdent {
                        span: self.span().into(),
                        src: self.src(),
                    });
                }
                let tok = self.advance();
                let (name, end) = (tok.text.clone(), tok.span);
                Ok(Pattern {
                    id: self.next_id(),
                    captured,
                    kind: PatternKind::Ident {
                        mutable: true,
                        name,
                    },
                    span: start.merge(end),
                })
            }
            TokenKind::Ident => {
                let tok = self.advance();
                let (name, end) = (tok.text.clone(), tok.span);
                Ok(Pattern {
                    id: self.next_id(),
                    captured,
                    kind: PatternKind::Ident {
                        mutable: false,
                        name,
                    },
                    span: start.merge(end),
                })
            }
            TokenKind::LParen => {
                self.advance();
                let mut elements = Vec::new();
                while !self.at(TokenKind::RParen) {
                    if self.at(TokenKind::Eof) {
                        return Err(self.err_unclosed(TokenKind::RParen, start));
                    }
                    elements.push(self.parse_pattern()?);
                    if !self.eat(TokenKind::Comma) {
                        break;
                    }
                }
                if !self.at(TokenKind::RParen) {
                    return Err(self.err_unexpected("`,` or `)`"));
                }
                let close = self.advance().span;
                Ok(Pattern {
                    id: self.next_id(),
                    captured,
                    kind: PatternKind::Tuple(elements),
                    span: start.merge(close),
                })
            }
            _ => Err(self.err_unexpected("a pattern")),
        }
    }

    // ==================== TYPES ====================

    fn parse_type(&mut self) -> PResult<TypeExpr> {
        match self.peek() {
            TokenKind::Ident => {
                let tok = self.advance();
                let (name, span) = (tok.text.clone(), tok.span);
                Ok(TypeExpr::Named {
                    id: self.next_id(),
                    name,
                    span,
                })
            }
            TokenKind::Underscore => {
                let span = self.advance().span;
                Ok(TypeExpr::Infer {
                    id: self.next_id(),
                    span,
                })
            }
            TokenKind::LParen => {
                let open = self.advance().span;
                if self.at(TokenKind::RParen) {
                    let close = self.advance().span;
                    return Ok(TypeExpr::Tuple {
                        id: self.next_id(),
                        elements: Vec::new(),
                        span: open.merge(close),
                    });
                }
                let mut elements = Vec::new();
                let mut trailing = false;
                loop {
                    if self.at(TokenKind::Eof) {
                        return Err(self.err_unclosed(TokenKind::RParen, open));
                    }
                    elements.push(self.parse_type()?);
                    if !self.eat(TokenKind::Comma) {
                        break;
                    }
                    if self.at(TokenKind::RParen) {
                        trailing = true;
                        break;
                    }
                }
                if !self.at(TokenKind::RParen) {
                    return Err(self.err_unexpected("`,` or `)`"));
                }
                let close = self.advance().span;
                // `(T)` is a parenthesized alias for T, not a 1-tuple;
                // only `(T,)` builds a tuple type (the reverse of the
                // tuple-expression rule)
                if elements.len() == 1 && !trailing {
                    return Ok(elements.remove(0));
                }
                Ok(TypeExpr::Tuple {
                    id: self.next_id(),
                    elements,
                    span: open.merge(close),
                })
            }
            _ => Err(self.err_unexpected("a type")),
        }
    }
}
