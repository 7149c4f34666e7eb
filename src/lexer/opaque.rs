//! Opaque-region scanning for `asm { ... }` bodies
//!
//! The text between the braces of an `asm` block belongs to a foreign
//! dialect and is captured verbatim, never tokenized. The scanner is an
//! injectable capability so that dialect conventions (how strings and
//! comments hide braces) can vary without touching the grammar.

/// Scans the input that follows the opening `{` of an opaque block.
///
/// Returns the byte length of the raw body, i.e. everything up to but not
/// including the matching `}`, or `None` if the input ends first.
pub type OpaqueScanner = fn(&str) -> Option<usize>;

/// Default scanner for the inline-IR dialect.
///
/// Counts `{`/`}` nesting so the body may contain balanced braces of its
/// own. Two constructs hide braces from the count: `"..."` strings and
/// `;` line comments running to the end of the line.
pub fn scan_inline_ir(input: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut chars = input.char_indices();

    while let Some((pos, ch)) = chars.next() {
        match ch {
            '"' => loop {
                match chars.next() {
                    Some((_, '"')) => break,
                    Some(_) => {}
                    None => return None,
                }
            },
            ';' => loop {
                match chars.next() {
                    Some((_, '\n')) | None => break,
                    Some(_) => {}
                }
            },
            '{' => depth += 1,
            '}' => {
                if depth == 0 {
                    return Some(pos);
                }
                depth -= 1;
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_flat() {
        assert_eq!(scan_inline_ir("ret void }"), Some(9));
    }

    #[test]
    fn test_scan_empty() {
        assert_eq!(scan_inline_ir("}"), Some(0));
    }

    #[test]
    fn test_scan_nested_braces() {
        let input = "define { i32, i32 } @f() { ret }  }";
        assert_eq!(scan_inline_ir(input), Some(34));
    }

    #[test]
    fn test_scan_brace_in_string() {
        let input = r#"call @print("{") }"#;
        assert_eq!(scan_inline_ir(input), Some(17));
    }

    #[test]
    fn test_scan_brace_in_comment() {
        let input = "; a comment with }\nret void }";
        assert_eq!(scan_inline_ir(input), Some(28));
    }

    #[test]
    fn test_scan_unterminated() {
        assert_eq!(scan_inline_ir("ret void"), None);
        assert_eq!(scan_inline_ir("\"open string }"), None);
        assert_eq!(scan_inline_ir("{ unbalanced }"), None);
    }
}
