// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Line-oriented formatting primitives.
//!
//! Two operations cover all of the backend's layout needs: every block
//! body is passed through [`indent_block`] before being placed between
//! its opening line and its `end` terminator, and the assembled program
//! goes through [`normalize`] once before being written out.

/// One indentation unit of the output language.
pub const INDENT: &str = "    ";

/// Trim the block, then prefix every remaining line with one indent
/// unit.
pub fn indent_block(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    trimmed
        .lines()
        .map(|line| format!("{INDENT}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Trim surrounding whitespace and terminate with exactly one newline.
pub fn normalize(text: &str) -> String {
    format!("{}\n", text.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_is_idempotent() {
        let samples = ["", "x", "  x  ", "a\nb\n\n", "\n\n  mixed \t\n"];
        for s in samples {
            let once = normalize(s);
            assert_eq!(normalize(&once), once);
        }
    }

    #[test]
    fn normalize_appends_exactly_one_newline() {
        assert_eq!(normalize("x"), "x\n");
        assert_eq!(normalize("x\n\n"), "x\n");
        assert_eq!(normalize("  x "), "x\n");
    }

    #[test]
    fn indent_block_prefixes_every_line() {
        assert_eq!(indent_block("a\nb"), "    a\n    b");
    }

    #[test]
    fn indent_block_trims_before_indenting() {
        assert_eq!(indent_block("\n  a\n"), "    a");
        assert_eq!(indent_block(""), "");
        assert_eq!(indent_block("   \n  "), "");
    }

    #[test]
    fn indent_block_nests() {
        let inner = indent_block("x = 1");
        let outer = indent_block(&format!("while true\n{}\nend", inner));
        assert_eq!(outer, "    while true\n        x = 1\n    end");
    }
}
