//! Heuristic scanner over the raw text of one [`ClassBlock`].
//!
//! There is no lexer here. Every `(` is a candidate call site and the
//! surrounding text is interpreted with four positional rules, each a helper
//! below:
//!
//! - the function name ends at `(` and starts after the nearest preceding
//!   whitespace character ([`name_start`]), so a tab-indented `\tFoo();` names
//!   `Foo`;
//! - the return type runs from the start of the name's line up to the name
//!   ([`line_start`]);
//! - the parameter list ends at the first `)` after `(` ([`close_paren`]), so
//!   nested parens truncate it;
//! - the occurrence is a declaration only when the next character after `)`
//!   that is not a space or tab is `;` ([`next_significant`]).
//!
//! Contract: a signature must keep its return type, name and `(` on one line.
//! Trailing qualifiers (`const;`), pure virtuals (`= 0;`) and `)` followed by a
//! newline before `;` are not declarations under these rules.

use crate::types::{ClassBlock, Signature};

/// Position of the next `(` at or after `from`.
pub fn find_open_paren(text: &str, from: usize) -> Option<usize> {
    text[from..].find('(').map(|i| from + i)
}

/// Position of the whitespace character (space, tab, CR, LF) nearest before `paren`.
pub fn name_start(text: &str, paren: usize) -> Option<usize> {
    text[..paren].rfind(|c: char| c.is_ascii_whitespace())
}

/// Start of the line containing byte `at`: one past the previous newline, or 0.
pub fn line_start(text: &str, at: usize) -> usize {
    text[..at].rfind('\n').map(|i| i + 1).unwrap_or(0)
}

/// Position of the first `)` after `open`. Nesting is not tracked.
pub fn close_paren(text: &str, open: usize) -> Option<usize> {
    text[open..].find(')').map(|i| open + i)
}

/// First character at or after `from` that is neither a space nor a tab.
pub fn next_significant(text: &str, from: usize) -> Option<char> {
    text[from..].chars().find(|c| *c != ' ' && *c != '\t')
}

/// Constructors and destructors are never stubbed.
fn is_special_member(name: &str, class_name: &str) -> bool {
    name == class_name || name.strip_prefix('~') == Some(class_name)
}

/// Extract every declaration-only member function from a class block, in source order.
///
/// Malformed input never errors; occurrences that don't fit the rules are skipped.
pub fn extract_signatures(block: &ClassBlock) -> Vec<Signature> {
    let text = block.raw_text.as_str();
    let mut signatures = Vec::new();
    let mut pos = 0;

    while let Some(open) = find_open_paren(text, pos) {
        let Some(boundary) = name_start(text, open) else {
            pos = open + 1;
            continue;
        };
        let name_begin = boundary + 1;

        let name = text[name_begin..open].trim();
        if is_special_member(name, &block.name) {
            pos = open + 1;
            continue;
        }

        let return_type = text[line_start(text, name_begin)..name_begin].trim();

        // An unclosed paren ends the block: nothing after it can be matched either.
        let Some(close) = close_paren(text, open) else {
            break;
        };
        let params = text[open + 1..close].trim();

        if next_significant(text, close + 1) == Some(';') {
            signatures.push(Signature {
                return_type: return_type.to_string(),
                function_name: name.to_string(),
                parameter_list: params.to_string(),
            });
        }
        pos = close + 1;
    }

    signatures
}
