//! Abstract Syntax Tree for the AutoLang language
//!
//! This module defines the AST types produced by the parser. Three closed
//! sum types — [`Expr`], [`Pattern`] (via [`PatternKind`]), and
//! [`TypeExpr`] — mirror the grammar's supertype grouping; downstream
//! passes dispatch by exhaustive match. Nodes are built once during
//! parsing and immutable afterwards; each carries its `NodeId` and the
//! exact source span it was derived from.

pub mod print;

use crate::common::{NodeId, Span};
use serde::{Deserialize, Serialize};

/// A parsed translation unit
///
/// The whole unit is one optional expression: top-level `;` sequencing
/// builds a left-leaning [`Expr::Semi`] chain, and a trailing `;` leaves
/// the final `rhs` absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransUnit {
    pub body: Option<Expr>,
    pub span: Span,
}

/// Which of the two surface syntaxes produced a control-flow node.
///
/// Round-trip metadata only; both forms normalize to the same shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Form {
    Prefix,
    Suffix,
}

/// A `'name` label attached to a loop or block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Label {
    /// Label name without the leading `'`
    pub name: String,
    pub span: Span,
}

// ==================== EXPRESSIONS ====================

/// Expression
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Expr {
    /// Identifier reference
    Ident {
        id: NodeId,
        name: String,
        span: Span,
    },
    /// `_` as a deliberate no-value placeholder (binding initializer)
    Underscore { id: NodeId, span: Span },
    /// Sequencing: `lhs ; rhs?` — absent `rhs` is a trailing `;`
    Semi {
        id: NodeId,
        lhs: Box<Expr>,
        rhs: Option<Box<Expr>>,
        span: Span,
    },
    /// Assignment: `lhs = rhs`, right-associative
    Assign {
        id: NodeId,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
        span: Span,
    },
    /// Function call
    Call {
        id: NodeId,
        callee: Box<Expr>,
        args: Vec<Expr>,
        span: Span,
    },
    /// Parenthesized expression: `(e)`
    Paren {
        id: NodeId,
        inner: Box<Expr>,
        span: Span,
    },
    /// Type cast: `val as ty`
    As {
        id: NodeId,
        val: Box<Expr>,
        ty: TypeExpr,
        span: Span,
    },
    /// Tuple: `()`, `(e,)`, `(e1, e2, ...)`
    Tuple {
        id: NodeId,
        elements: Vec<Expr>,
        span: Span,
    },
    /// `return val?` / `val.return`
    Return {
        id: NodeId,
        val: Option<Box<Expr>>,
        form: Form,
        span: Span,
    },
    /// `break 'lab? val?` / `val.break 'lab?`
    Break {
        id: NodeId,
        lab: Option<Label>,
        val: Option<Box<Expr>>,
        form: Form,
        span: Span,
    },
    /// `cont 'lab?` — prefix only
    Cont {
        id: NodeId,
        lab: Option<Label>,
        span: Span,
    },
    /// `if cond { .. } else ..?` / `cond.if { .. } else ..?`
    If {
        id: NodeId,
        cond: Box<Expr>,
        body: Block,
        el: Option<ElseBranch>,
        form: Form,
        span: Span,
    },
    /// `'lab?: while cond { .. } else { .. }?` and its suffix form
    While {
        id: NodeId,
        lab: Option<Label>,
        cond: Box<Expr>,
        body: Block,
        el: Option<Block>,
        form: Form,
        span: Span,
    },
    /// `'lab?: for pat in range { .. } else { .. }?` and its suffix form
    For {
        id: NodeId,
        lab: Option<Label>,
        pat: Pattern,
        range: Box<Expr>,
        body: Block,
        el: Option<Block>,
        form: Form,
        span: Span,
    },
    /// `'lab: { .. }`
    Labeled {
        id: NodeId,
        lab: Label,
        block: Block,
        span: Span,
    },
    /// Bare block expression
    Block { id: NodeId, block: Block, span: Span },
    /// `asm { ... }` — the body is captured verbatim, never tokenized
    Asm {
        id: NodeId,
        raw_text: String,
        span: Span,
    },
    /// Function declaration/definition: `name : fn_sign (= body)?`
    FnDef {
        id: NodeId,
        name: Pattern,
        sign: FnSign,
        body: Option<Box<Expr>>,
        span: Span,
    },
    /// Binding: `pat : ty? = init` — init may be the `_` placeholder
    Binding {
        id: NodeId,
        pat: Pattern,
        ty: Option<TypeExpr>,
        init: Box<Expr>,
        span: Span,
    },
    /// Placeholder covering source skipped during error recovery
    Error { id: NodeId, span: Span },
}

/// The branch after `else`: a block, or a prefix-form `if`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ElseBranch {
    Block(Block),
    If(Box<Expr>),
}

/// Brace-delimited block with an optional body expression
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub id: NodeId,
    pub body: Option<Box<Expr>>,
    pub span: Span,
}

// ==================== FUNCTIONS ====================

/// Function signature: `fn params? (-> ret)?`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FnSign {
    pub id: NodeId,
    pub params: Vec<Param>,
    pub ret: Option<TypeExpr>,
    pub span: Span,
}

/// Function parameter: `pat (: ty)?`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Param {
    pub id: NodeId,
    pub pat: Pattern,
    pub ty: Option<TypeExpr>,
    pub span: Span,
}

// ==================== PATTERNS ====================

/// Pattern for bindings and parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pattern {
    pub id: NodeId,
    /// `$` sigil seen before the pattern. Parsed and retained only; no
    /// semantics are attached.
    pub captured: bool,
    pub kind: PatternKind,
    pub span: Span,
}

/// Pattern shapes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PatternKind {
    /// `_`
    Wildcard,
    /// `mut? name`
    Ident { mutable: bool, name: String },
    /// `(p1, p2, ...)` — `(p)` is a one-element tuple
    Tuple(Vec<Pattern>),
    /// `pat : ty` (inside tuple elements)
    Typed { pat: Box<Pattern>, ty: TypeExpr },
}

// ==================== TYPES ====================

/// Type expression
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TypeExpr {
    /// Named type
    Named {
        id: NodeId,
        name: String,
        span: Span,
    },
    /// Inference placeholder: `_`
    Infer { id: NodeId, span: Span },
    /// `()`, `(T,)`, `(T1, T2, ...)` — `(T)` is a paren alias, not a tuple
    Tuple {
        id: NodeId,
        elements: Vec<TypeExpr>,
        span: Span,
    },
}

// ==================== SPANS ====================

impl Expr {
    /// The exact source span this node was derived from
    pub fn span(&self) -> Span {
        match self {
            Expr::Ident { span, .. }
            | Expr::Underscore { span, .. }
            | Expr::Semi { span, .. }
            | Expr::Assign { span, .. }
            | Expr::Call { span, .. }
            | Expr::Paren { span, .. }
            | Expr::As { span, .. }
            | Expr::Tuple { span, .. }
            | Expr::Return { span, .. }
            | Expr::Break { span, .. }
            | Expr::Cont { span, .. }
            | Expr::If { span, .. }
            | Expr::While { span, .. }
            | Expr::For { span, .. }
            | Expr::Labeled { span, .. }
            | Expr::Block { span, .. }
            | Expr::Asm { span, .. }
            | Expr::FnDef { span, .. }
            | Expr::Binding { span, .. }
            | Expr::Error { span, .. } => *span,
        }
    }
}

impl TypeExpr {
    pub fn span(&self) -> Span {
        match self {
            TypeExpr::Named { span, .. }
            | TypeExpr::Infer { span, .. }
            | TypeExpr::Tuple { span, .. } => *span,
        }
    }
}
