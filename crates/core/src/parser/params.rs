//! Parameter-list parsing.
//!
//! Turns the tokens between a parameter list's parentheses into descriptor
//! strings: `a`, `...rest`, `{ x, y }`, `a=1`, or `b=…` when the default value
//! is anything but a simple literal.

use super::lexer::{Token, TokenKind};
use regex::Regex;
use std::sync::LazyLock;

/// Stand-in for a default value that is not a simple literal.
///
/// Callers compare descriptor suffixes against this value, so it never changes.
pub const ARG_DEFAULT_PLACEHOLDER: &str = "…";

static NUMERIC_LITERAL: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"^(?:0[xX][0-9a-fA-F](?:_?[0-9a-fA-F])*|0[bB][01](?:_?[01])*|0[oO][0-7](?:_?[0-7])*|(?:\d(?:_?\d)*(?:\.(?:\d(?:_?\d)*)?)?|\.\d(?:_?\d)*)(?:[eE][+-]?\d(?:_?\d)*)?)n?$",
    )
    .ok()
});

fn is_numeric_literal(text: &str) -> bool {
    NUMERIC_LITERAL
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(text))
}

/// Build descriptors for the tokens strictly inside `( ... )`.
pub fn parse_params(tokens: &[Token<'_>]) -> Vec<String> {
    split_top_level(tokens, ",")
        .into_iter()
        .filter(|group| !group.is_empty())
        .map(describe_param)
        .collect()
}

fn describe_param(tokens: &[Token<'_>]) -> String {
    let Some(eq) = position_top_level(tokens, "=") else {
        return render(tokens);
    };

    let name = render(&tokens[..eq]);
    let value = &tokens[eq + 1..];
    if value.is_empty() {
        return name;
    }

    if is_simple_literal(value) {
        format!("{}={}", name, render(value))
    } else {
        format!("{}={}", name, ARG_DEFAULT_PLACEHOLDER)
    }
}

/// Whether a default value is kept verbatim.
///
/// Simple: numbers (optionally signed), quoted strings, templates without
/// substitutions, `true`, `false`, `null` and `undefined`.
pub fn is_simple_literal(tokens: &[Token<'_>]) -> bool {
    match tokens {
        [token] => match token.kind {
            TokenKind::Number => is_numeric_literal(token.text),
            TokenKind::String => true,
            TokenKind::Template => !token.text.contains("${"),
            TokenKind::Identifier => {
                matches!(token.text, "true" | "false" | "null" | "undefined")
            }
            TokenKind::RegExp | TokenKind::Punct => false,
        },
        [sign, number] => {
            (sign.is_punct("-") || sign.is_punct("+"))
                && number.kind == TokenKind::Number
                && is_numeric_literal(number.text)
        }
        _ => false,
    }
}

/// Split on a punctuator that sits outside any nested bracket.
fn split_top_level<'a, 'src>(tokens: &'a [Token<'src>], punct: &str) -> Vec<&'a [Token<'src>]> {
    let mut groups = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (idx, token) in tokens.iter().enumerate() {
        if token.kind != TokenKind::Punct {
            continue;
        }
        match token.text {
            "(" | "[" | "{" => depth += 1,
            ")" | "]" | "}" => depth = depth.saturating_sub(1),
            text if depth == 0 && text == punct => {
                groups.push(&tokens[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    groups.push(&tokens[start..]);

    groups
}

fn position_top_level(tokens: &[Token<'_>], punct: &str) -> Option<usize> {
    let first = split_top_level(tokens, punct).first()?.len();
    (first < tokens.len()).then_some(first)
}

/// Rejoin tokens as source text, with a single space wherever the source had
/// whitespace or a comment between them.
pub fn render(tokens: &[Token<'_>]) -> String {
    let mut out = String::new();
    let mut prev_end: Option<usize> = None;
    for token in tokens {
        if prev_end.is_some_and(|end| token.start > end) {
            out.push(' ');
        }
        out.push_str(token.text);
        prev_end = Some(token.end);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::tokenize;

    fn params(src: &str) -> Vec<String> {
        let tokens = tokenize(src).unwrap();
        parse_params(&tokens)
    }

    #[test]
    fn test_numeric_pattern_compiles() {
        assert!(NUMERIC_LITERAL.is_some());
        assert!(is_numeric_literal("0x1F"));
        assert!(is_numeric_literal("1_000n"));
        assert!(!is_numeric_literal("1__0"));
    }

    #[test]
    fn test_bare_params() {
        assert_eq!(params("a, b"), vec!["a", "b"]);
        assert!(params("").is_empty());
    }

    #[test]
    fn test_literal_defaults_kept() {
        assert_eq!(params("a = 1"), vec!["a=1"]);
        assert_eq!(params("a=-2.5"), vec!["a=-2.5"]);
        assert_eq!(params("s = 'x, y'"), vec!["s='x, y'"]);
        assert_eq!(params("t = `plain`"), vec!["t=`plain`"]);
        assert_eq!(params("f = false, n = null"), vec!["f=false", "n=null"]);
        assert_eq!(params("h = 0xFF, big = 10n"), vec!["h=0xFF", "big=10n"]);
    }

    #[test]
    fn test_complex_defaults_use_placeholder() {
        let expected = format!("b={}", ARG_DEFAULT_PLACEHOLDER);
        for src in [
            "b = {}",
            "b = []",
            "b = foo()",
            "b = a.b",
            "b = other",
            "b = 1 + 2",
            "b = `x ${y}`",
            "b = -x",
            "b = /re/",
        ] {
            assert_eq!(params(src), vec![expected.clone()], "input: {src}");
        }
    }

    #[test]
    fn test_nested_commas_do_not_split() {
        let out = params("a = f(1, 2), { x, y } = {}, [p, q], ...rest");
        assert_eq!(
            out,
            vec![
                format!("a={}", ARG_DEFAULT_PLACEHOLDER),
                format!("{{ x, y }}={}", ARG_DEFAULT_PLACEHOLDER),
                "[p, q]".to_string(),
                "...rest".to_string(),
            ]
        );
    }

    #[test]
    fn test_trailing_comma_ignored() {
        assert_eq!(params("a, b,"), vec!["a", "b"]);
    }

    #[test]
    fn test_comments_dropped_from_descriptor() {
        assert_eq!(params("a /* first */, b = /* two */ 2"), vec!["a", "b=2"]);
    }

    #[test]
    fn test_equality_is_not_a_default() {
        let tokens = tokenize("a == 1").unwrap();
        assert_eq!(position_top_level(&tokens, "="), None);
    }
}
