//! Canonical structure dump for the AST
//!
//! Prints the tree as a compact s-expression, omitting node ids, spans,
//! and the prefix/suffix `form` tag. Two parses that differ only in
//! surface form therefore dump identically, which is what the CLI's
//! `--show-ast` and the form-equivalence tests rely on.

use super::{Block, ElseBranch, Expr, Pattern, PatternKind, TransUnit, TypeExpr};

/// Dump a whole translation unit
pub fn dump(unit: &TransUnit) -> String {
    match &unit.body {
        Some(body) => format!("(unit {})", dump_expr(body)),
        None => "(unit)".to_string(),
    }
}

/// Dump a single expression
pub fn dump_expr(expr: &Expr) -> String {
    match expr {
        Expr::Ident { name, .. } => format!("(ident {name})"),
        Expr::Underscore { .. } => "(underscore)".to_string(),
        Expr::Semi { lhs, rhs, .. } => format!(
            "(semi {} {})",
            dump_expr(lhs),
            rhs.as_deref().map_or("-".to_string(), dump_expr)
        ),
        Expr::Assign { lhs, rhs, .. } => {
            format!("(assign {} {})", dump_expr(lhs), dump_expr(rhs))
        }
        Expr::Call { callee, args, .. } => {
            let mut out = format!("(call {}", dump_expr(callee));
            for arg in args {
                out.push(' ');
                out.push_str(&dump_expr(arg));
            }
            out.push(')');
            out
        }
        Expr::Paren { inner, .. } => format!("(paren {})", dump_expr(inner)),
        Expr::As { val, ty, .. } => format!("(as {} {})", dump_expr(val), dump_type(ty)),
        Expr::Tuple { elements, .. } => {
            let mut out = String::from("(tuple");
            for element in elements {
                out.push(' ');
                out.push_str(&dump_expr(element));
            }
            out.push(')');
            out
        }
        Expr::Return { val, .. } => format!(
            "(return {})",
            val.as_deref().map_or("-".to_string(), dump_expr)
        ),
        Expr::Break { lab, val, .. } => format!(
            "(break {} {})",
            dump_label(lab),
            val.as_deref().map_or("-".to_string(), dump_expr)
        ),
        Expr::Cont { lab, .. } => format!("(cont {})", dump_label(lab)),
        Expr::If { cond, body, el, .. } => format!(
            "(if {} {} {})",
            dump_expr(cond),
            dump_block(body),
            match el {
                Some(ElseBranch::Block(block)) => dump_block(block),
                Some(ElseBranch::If(expr)) => dump_expr(expr),
                None => "-".to_string(),
            }
        ),
        Expr::While {
            lab,
            cond,
            body,
            el,
            ..
        } => format!(
            "(while {} {} {} {})",
            dump_label(lab),
            dump_expr(cond),
            dump_block(body),
            el.as_ref().map_or("-".to_string(), dump_block)
        ),
        Expr::For {
            lab,
            pat,
            range,
            body,
            el,
            ..
        } => format!(
            "(for {} {} {} {} {})",
            dump_label(lab),
            dump_pattern(pat),
            dump_expr(range),
            dump_block(body),
            el.as_ref().map_or("-".to_string(), dump_block)
        ),
        Expr::Labeled { lab, block, .. } => {
            format!("(labeled '{} {})", lab.name, dump_block(block))
        }
        Expr::Block { block, .. } => dump_block(block),
        Expr::Asm { raw_text, .. } => format!("(asm {raw_text:?})"),
        Expr::FnDef {
            name, sign, body, ..
        } => {
            let mut params = String::from("(params");
            for param in &sign.params {
                params.push_str(&format!(
                    " (param {} {})",
                    dump_pattern(&param.pat),
                    param.ty.as_ref().map_or("-".to_string(), dump_type)
                ));
            }
            params.push(')');
            format!(
                "(fn-def {} (sign {} {}) {})",
                dump_pattern(name),
                params,
                sign.ret.as_ref().map_or("-".to_string(), dump_type),
                body.as_deref().map_or("-".to_string(), dump_expr)
            )
        }
        Expr::Binding { pat, ty, init, .. } => format!(
            "(binding {} {} {})",
            dump_pattern(pat),
            ty.as_ref().map_or("-".to_string(), dump_type),
            dump_expr(init)
        ),
        Expr::Error { .. } => "(error)".to_string(),
    }
}

/// Dump a pattern
pub fn dump_pattern(pat: &Pattern) -> String {
    let sigil = if pat.captured { "$" } else { "" };
    match &pat.kind {
        PatternKind::Wildcard => format!("{sigil}_"),
        PatternKind::Ident { mutable, name } => {
            format!("{sigil}{}{name}", if *mutable { "mut " } else { "" })
        }
        PatternKind::Tuple(elements) => {
            let mut out = format!("{sigil}(pat-tuple");
            for element in elements {
                out.push(' ');
                out.push_str(&dump_pattern(element));
            }
            out.push(')');
            out
        }
        PatternKind::Typed { pat, ty } => {
            format!("{sigil}(typed {} {})", dump_pattern(pat), dump_type(ty))
        }
    }
}

/// Dump a type expression
pub fn dump_type(ty: &TypeExpr) -> String {
    match ty {
        TypeExpr::Named { name, .. } => name.clone(),
        TypeExpr::Infer { .. } => "_".to_string(),
        TypeExpr::Tuple { elements, .. } => {
            let mut out = String::from("(ty-tuple");
            for element in elements {
                out.push(' ');
                out.push_str(&dump_type(element));
            }
            out.push(')');
            out
        }
    }
}

fn dump_block(block: &Block) -> String {
    match &block.body {
        Some(body) => format!("(block {})", dump_expr(body)),
        None => "(block)".to_string(),
    }
}

fn dump_label(lab: &Option<super::Label>) -> String {
    match lab {
        Some(lab) => format!("'{}", lab.name),
        None => "-".to_string(),
    }
}
