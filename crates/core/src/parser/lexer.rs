//! Tokenizer for the outline scanner.
//!
//! The lexer walks the source bytes once and yields only what the declaration
//! matcher needs: identifiers, numbers, punctuators and opaque literal tokens.
//! Comments produce no token at all, and string, template and regex literals
//! each collapse into a single token, so braces or keywords inside them never
//! reach the scope tracker. Every token records the line it starts on and its
//! byte span, which keeps line numbers exact after multi-line literals.

use super::ParseError;

/// The syntactic category of a significant token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Identifier or keyword, including `#private` names.
    Identifier,
    /// Numeric literal (decimal, hex, binary, octal, BigInt).
    Number,
    /// Single- or double-quoted string literal.
    String,
    /// Template literal, substitutions included.
    Template,
    /// Regular-expression literal with its flags.
    RegExp,
    /// Operator or delimiter.
    Punct,
}

/// A significant token and where it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'src> {
    pub kind: TokenKind,
    /// Source text of the token.
    pub text: &'src str,
    /// Byte offset of the first byte.
    pub start: usize,
    /// Byte offset one past the last byte.
    pub end: usize,
    /// 1-based line of the first byte.
    pub line: usize,
}

impl Token<'_> {
    /// Check for a punctuator with exactly this text
    pub fn is_punct(&self, punct: &str) -> bool {
        self.kind == TokenKind::Punct && self.text == punct
    }

    /// Check for an identifier with exactly this text
    pub fn is_ident(&self, name: &str) -> bool {
        self.kind == TokenKind::Identifier && self.text == name
    }

    /// Whether this token can end an expression.
    ///
    /// A `/` after such a token is division; anywhere else it opens a regex.
    pub fn ends_expression(&self) -> bool {
        match self.kind {
            TokenKind::Identifier => !REGEX_PRECEDING_KEYWORDS.contains(&self.text),
            TokenKind::Number | TokenKind::String | TokenKind::Template | TokenKind::RegExp => {
                true
            }
            TokenKind::Punct => matches!(self.text, ")" | "]" | "++" | "--"),
        }
    }
}

/// Keywords after which an expression (and therefore a regex) may start.
const REGEX_PRECEDING_KEYWORDS: &[&str] = &[
    "return",
    "typeof",
    "instanceof",
    "in",
    "of",
    "new",
    "delete",
    "void",
    "throw",
    "case",
    "do",
    "else",
    "yield",
    "await",
];

/// Keywords whose parenthesized head is followed by a statement, not an operand.
const CONTROL_HEAD_KEYWORDS: &[&str] = &["if", "while", "for", "with"];

/// Tokenize `source`, dropping comments and collapsing literals.
///
/// Fails with a `SyntaxError` on any unterminated string, template, regex or
/// block comment.
pub fn tokenize(source: &str) -> Result<Vec<Token<'_>>, ParseError> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    while let Some(token) = lexer.next_token()? {
        tokens.push(token);
    }
    Ok(tokens)
}

struct Lexer<'src> {
    source: &'src str,
    bytes: &'src [u8],
    pos: usize,
    line: usize,
    /// Most recent significant token, for regex / division disambiguation.
    last: Option<Token<'src>>,
    /// One flag per open `(`: whether it opened a control-flow head.
    paren_heads: Vec<bool>,
    /// Whether `last` is the `)` closing a control-flow head.
    after_control_head: bool,
}

impl<'src> Lexer<'src> {
    fn new(source: &'src str) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            pos: 0,
            line: 1,
            last: None,
            paren_heads: Vec::new(),
            after_control_head: false,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    /// Consume one byte, counting line terminators (`\n`, `\r\n`, lone `\r`).
    fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        if b == b'\n' || (b == b'\r' && self.peek() != Some(b'\n')) {
            self.line += 1;
        }
        Some(b)
    }

    fn next_token(&mut self) -> Result<Option<Token<'src>>, ParseError> {
        loop {
            self.skip_whitespace();
            let Some(b) = self.peek() else {
                return Ok(None);
            };

            let start = self.pos;
            let line = self.line;

            let kind = match b {
                b'/' => match self.peek_at(1) {
                    Some(b'/') => {
                        self.skip_line_comment();
                        continue;
                    }
                    Some(b'*') => {
                        self.skip_block_comment()?;
                        continue;
                    }
                    _ if self.regex_allowed() => {
                        self.scan_regex()?;
                        TokenKind::RegExp
                    }
                    _ => {
                        self.scan_punct();
                        TokenKind::Punct
                    }
                },
                b'"' | b'\'' => {
                    self.scan_string(b)?;
                    TokenKind::String
                }
                b'`' => {
                    self.scan_template()?;
                    TokenKind::Template
                }
                b'0'..=b'9' => {
                    self.scan_number();
                    TokenKind::Number
                }
                b'.' if self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) => {
                    self.scan_number();
                    TokenKind::Number
                }
                b'#' if self.peek_at(1).is_some_and(is_ident_start) => {
                    self.pos += 1;
                    self.scan_identifier();
                    TokenKind::Identifier
                }
                _ if is_ident_start(b) => {
                    self.scan_identifier();
                    TokenKind::Identifier
                }
                _ => {
                    self.scan_punct();
                    TokenKind::Punct
                }
            };

            let token = Token {
                kind,
                text: self.slice(start, self.pos),
                start,
                end: self.pos,
                line,
            };
            self.track_parens(&token);
            self.last = Some(token);
            return Ok(Some(token));
        }
    }

    fn slice(&self, start: usize, end: usize) -> &'src str {
        self.source.get(start..end).unwrap_or("")
    }

    fn regex_allowed(&self) -> bool {
        self.after_control_head || self.last.map_or(true, |token| !token.ends_expression())
    }

    /// Runs before `token` becomes `last`.
    fn track_parens(&mut self, token: &Token<'src>) {
        self.after_control_head = false;
        if token.is_punct("(") {
            let control = self.last.is_some_and(|prev| {
                prev.kind == TokenKind::Identifier && CONTROL_HEAD_KEYWORDS.contains(&prev.text)
            });
            self.paren_heads.push(control);
        } else if token.is_punct(")") {
            self.after_control_head = self.paren_heads.pop().unwrap_or(false);
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(b) = self.peek() {
            if b.is_ascii_whitespace() || b == 0x0b {
                self.bump();
            } else {
                break;
            }
        }
    }

    fn skip_line_comment(&mut self) {
        while let Some(b) = self.peek() {
            if b == b'\n' || b == b'\r' {
                break;
            }
            self.pos += 1;
        }
    }

    fn skip_block_comment(&mut self) -> Result<(), ParseError> {
        let line = self.line;
        self.pos += 2;
        loop {
            match self.bump() {
                None => return Err(ParseError::syntax("unterminated comment", line)),
                Some(b'*') if self.peek() == Some(b'/') => {
                    self.pos += 1;
                    return Ok(());
                }
                Some(_) => {}
            }
        }
    }

    /// Consume a quoted string starting at the opening quote.
    fn scan_string(&mut self, quote: u8) -> Result<(), ParseError> {
        let line = self.line;
        self.pos += 1;
        loop {
            match self.peek() {
                None | Some(b'\n') | Some(b'\r') => {
                    return Err(ParseError::syntax("unterminated string literal", line));
                }
                Some(b'\\') => {
                    self.pos += 1;
                    // Line continuation: `\` followed by `\r\n` spans both bytes.
                    if self.peek() == Some(b'\r') && self.peek_at(1) == Some(b'\n') {
                        self.pos += 1;
                    }
                    if self.bump().is_none() {
                        return Err(ParseError::syntax("unterminated string literal", line));
                    }
                }
                Some(b) => {
                    self.pos += 1;
                    if b == quote {
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Consume a template literal starting at the opening backtick.
    fn scan_template(&mut self) -> Result<(), ParseError> {
        let line = self.line;
        self.pos += 1;
        loop {
            match self.bump() {
                None => return Err(ParseError::syntax("unterminated template literal", line)),
                Some(b'\\') => {
                    if self.bump().is_none() {
                        return Err(ParseError::syntax("unterminated template literal", line));
                    }
                }
                Some(b'`') => return Ok(()),
                Some(b'$') if self.peek() == Some(b'{') => {
                    self.pos += 1;
                    self.scan_substitution(line)?;
                }
                Some(_) => {}
            }
        }
    }

    /// Consume a `${ ... }` body up to and including its closing brace.
    fn scan_substitution(&mut self, template_line: usize) -> Result<(), ParseError> {
        let mut depth = 1usize;
        loop {
            let Some(b) = self.peek() else {
                return Err(ParseError::syntax(
                    "unterminated template literal",
                    template_line,
                ));
            };
            match b {
                b'{' => {
                    depth += 1;
                    self.pos += 1;
                }
                b'}' => {
                    depth -= 1;
                    self.pos += 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                b'"' | b'\'' => self.scan_string(b)?,
                b'`' => self.scan_template()?,
                b'/' if self.peek_at(1) == Some(b'/') => self.skip_line_comment(),
                b'/' if self.peek_at(1) == Some(b'*') => self.skip_block_comment()?,
                _ => {
                    self.bump();
                }
            }
        }
    }

    /// Consume a regex literal starting at the opening slash, flags included.
    fn scan_regex(&mut self) -> Result<(), ParseError> {
        let line = self.line;
        self.pos += 1;
        let mut in_class = false;
        loop {
            match self.peek() {
                None | Some(b'\n') | Some(b'\r') => {
                    return Err(ParseError::syntax("unterminated regular expression", line));
                }
                Some(b'\\') => {
                    self.pos += 1;
                    match self.peek() {
                        None | Some(b'\n') | Some(b'\r') => {
                            return Err(ParseError::syntax(
                                "unterminated regular expression",
                                line,
                            ));
                        }
                        Some(_) => self.pos += 1,
                    }
                }
                Some(b'[') => {
                    in_class = true;
                    self.pos += 1;
                }
                Some(b']') => {
                    in_class = false;
                    self.pos += 1;
                }
                Some(b'/') if !in_class => {
                    self.pos += 1;
                    break;
                }
                Some(_) => self.pos += 1,
            }
        }
        while self.peek().is_some_and(|b| b.is_ascii_alphabetic()) {
            self.pos += 1;
        }
        Ok(())
    }

    fn scan_number(&mut self) {
        let start = self.pos;
        let radix_prefixed = matches!(
            (self.peek(), self.peek_at(1)),
            (Some(b'0'), Some(b'x' | b'X' | b'b' | b'B' | b'o' | b'O'))
        );
        while let Some(b) = self.peek() {
            let exponent_sign = (b == b'+' || b == b'-')
                && !radix_prefixed
                && self.pos > start
                && matches!(self.bytes[self.pos - 1], b'e' | b'E');
            if b.is_ascii_alphanumeric() || b == b'_' || b == b'.' || exponent_sign {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn scan_identifier(&mut self) {
        while self.peek().is_some_and(is_ident_continue) {
            self.pos += 1;
        }
    }

    fn scan_punct(&mut self) {
        let first = self.peek().unwrap_or(0);
        let second = self.peek_at(1);
        let third = self.peek_at(2);

        let len = match (first, second, third) {
            (b'=', Some(b'='), Some(b'=')) | (b'!', Some(b'='), Some(b'=')) => 3,
            (b'.', Some(b'.'), Some(b'.')) => 3,
            (b'=', Some(b'=' | b'>'), _) => 2,
            (b'+', Some(b'+'), _) | (b'-', Some(b'-'), _) => 2,
            (b'*', Some(b'*'), _) | (b'?', Some(b'?'), _) => 2,
            (b'&', Some(b'&'), _) | (b'|', Some(b'|'), _) => 2,
            (b'?', Some(b'.'), next) if !next.is_some_and(|c| c.is_ascii_digit()) => 2,
            (b'!' | b'<' | b'>' | b'+' | b'-' | b'*' | b'/' | b'%' | b'&' | b'|' | b'^', Some(b'='), _) => 2,
            _ => 1,
        };

        // A non-ASCII byte never reaches here (it starts an identifier), so a
        // one-byte step always lands on a char boundary.
        for _ in 0..len {
            self.bump();
        }
    }
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'$' || b == b'\\' || b >= 0x80
}

fn is_ident_continue(b: u8) -> bool {
    is_ident_start(b) || b.is_ascii_digit()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<(TokenKind, &str)> {
        tokenize(src)
            .unwrap()
            .into_iter()
            .map(|t| (t.kind, t.text))
            .collect()
    }

    #[test]
    fn test_identifiers_and_punct() {
        assert_eq!(
            kinds("function* gen(a, b) {}"),
            vec![
                (TokenKind::Identifier, "function"),
                (TokenKind::Punct, "*"),
                (TokenKind::Identifier, "gen"),
                (TokenKind::Punct, "("),
                (TokenKind::Identifier, "a"),
                (TokenKind::Punct, ","),
                (TokenKind::Identifier, "b"),
                (TokenKind::Punct, ")"),
                (TokenKind::Punct, "{"),
                (TokenKind::Punct, "}"),
            ]
        );
    }

    #[test]
    fn test_multi_char_operators() {
        let texts: Vec<&str> = kinds("a === b => c != d ...e ++ x -= 1")
            .into_iter()
            .map(|(_, t)| t)
            .collect();
        assert_eq!(
            texts,
            vec!["a", "===", "b", "=>", "c", "!=", "d", "...", "e", "++", "x", "-=", "1"]
        );
    }

    #[test]
    fn test_comments_produce_no_tokens() {
        assert!(kinds("// function a() {}\n/* class B {} */").is_empty());
    }

    #[test]
    fn test_block_comment_keeps_line_count() {
        let tokens = tokenize("/* one\ntwo\nthree */ x").unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].line, 3);
    }

    #[test]
    fn test_string_hides_braces() {
        let tokens = tokenize(r#"var s = "{ function x() }"; y"#).unwrap();
        assert_eq!(tokens[3].kind, TokenKind::String);
        assert_eq!(tokens[3].text, r#""{ function x() }""#);
        assert!(tokens.iter().all(|t| !t.is_punct("{")));
    }

    #[test]
    fn test_escaped_quote_in_string() {
        let tokens = tokenize(r#"'it\'s */ fine' x"#).unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].text, "x");
    }

    #[test]
    fn test_line_continuation_in_string() {
        let tokens = tokenize("'a\\\nb' c").unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].line, 2);
    }

    #[test]
    fn test_template_with_nested_substitution() {
        let src = "`a ${ {b: `c ${d}`}['b'] } }` x";
        let tokens = tokenize(src).unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].kind, TokenKind::Template);
        assert_eq!(tokens[1].text, "x");
    }

    #[test]
    fn test_multiline_template_keeps_line_count() {
        let tokens = tokenize("`one\ntwo\n` x").unwrap();
        assert_eq!(tokens[1].line, 3);
    }

    #[test]
    fn test_regex_versus_division() {
        let tokens = tokenize("x = /[/}]+/g.test(s); y = a / b / c").unwrap();
        assert_eq!(tokens[2].kind, TokenKind::RegExp);
        assert_eq!(tokens[2].text, "/[/}]+/g");
        assert_eq!(
            tokens.iter().filter(|t| t.is_punct("/")).count(),
            2,
            "division slashes stay punctuators"
        );
    }

    #[test]
    fn test_regex_after_return() {
        let tokens = tokenize("return /{/;").unwrap();
        assert_eq!(tokens[1].kind, TokenKind::RegExp);
    }

    #[test]
    fn test_regex_after_control_flow_head() {
        let tokens = tokenize("if (x) /}/.test(y);").unwrap();
        assert_eq!(tokens[4].kind, TokenKind::RegExp);
        assert_eq!(tokens[4].text, "/}/");

        for src in ["while (a(b)) /'/g.exec(s);", "for (;;) /`/.test(t);", "with (o) /)/;"] {
            let tokens = tokenize(src).unwrap();
            assert_eq!(
                tokens.iter().filter(|t| t.kind == TokenKind::RegExp).count(),
                1,
                "input: {src:?}"
            );
        }
    }

    #[test]
    fn test_division_after_call_parens() {
        let tokens = tokenize("f(x) / 2; (a + b) / c").unwrap();
        assert_eq!(tokens.iter().filter(|t| t.is_punct("/")).count(), 2);
        assert!(tokens.iter().all(|t| t.kind != TokenKind::RegExp));
    }

    #[test]
    fn test_private_name() {
        assert_eq!(
            kinds("#secret = 1"),
            vec![
                (TokenKind::Identifier, "#secret"),
                (TokenKind::Punct, "="),
                (TokenKind::Number, "1"),
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            kinds("0x1F 1e-3 1_000n .5"),
            vec![
                (TokenKind::Number, "0x1F"),
                (TokenKind::Number, "1e-3"),
                (TokenKind::Number, "1_000n"),
                (TokenKind::Number, ".5"),
            ]
        );
    }

    #[test]
    fn test_unicode_identifier() {
        let tokens = tokenize("function naïve() {}").unwrap();
        assert_eq!(tokens[1].text, "naïve");
    }

    #[test]
    fn test_unterminated_literals() {
        for src in ["'abc", "\"abc\ndef\"", "`abc", "`a ${ b `", "/* abc", "x = /abc\n"] {
            let err = tokenize(src).unwrap_err();
            assert_eq!(err.kind(), "SyntaxError", "input: {src:?}");
        }
    }

    #[test]
    fn test_line_numbers() {
        let tokens = tokenize("a\nb\r\nc\rd").unwrap();
        let lines: Vec<usize> = tokens.iter().map(|t| t.line).collect();
        assert_eq!(lines, vec![1, 2, 3, 4]);
    }
}
