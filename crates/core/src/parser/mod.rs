//! JavaScript outline scanner
//!
//! [`parse`] makes one pass over the token stream produced by [`lexer`],
//! asks the [`matcher`] rules at every position whether a declaration starts
//! there, and lets the [`scope`] tracker assign levels as bodies open and
//! close. Anything the rules do not recognize is skipped; a broken delimiter
//! structure or an unterminated literal aborts the scan with
//! [`ParseError::SyntaxError`].

pub mod lexer;
pub mod matcher;
pub mod params;
pub mod scope;


use crate::models::OutlineEntry;
use lexer::{Token, TokenKind};
use matcher::{BodyStart, Context, Match, Matcher};
use scope::{ScopeKind, ScopeTracker};
use thiserror::Error;

pub use params::ARG_DEFAULT_PLACEHOLDER;

/// Structural failure of a scan
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("SyntaxError: {message} (line {line})")]
    SyntaxError { message: String, line: usize },
}

impl ParseError {
    pub fn syntax(message: impl Into<String>, line: usize) -> Self {
        ParseError::SyntaxError {
            message: message.into(),
            line,
        }
    }

    /// Error class callers match on
    pub fn kind(&self) -> &'static str {
        match self {
            ParseError::SyntaxError { .. } => "SyntaxError",
        }
    }

    /// Line the error was detected on
    pub fn line(&self) -> usize {
        match self {
            ParseError::SyntaxError { line, .. } => *line,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ParseError::SyntaxError { message, .. } => message,
        }
    }
}

/// Outline `source`: every recognized declaration in source order.
///
/// Returns either the complete entry list or a `SyntaxError`, never a
/// partial result.
pub fn parse(source: &str) -> Result<Vec<OutlineEntry>, ParseError> {
    let tokens = lexer::tokenize(source)?;
    Scanner::new(&tokens).run()
}

struct Scanner<'a, 'src> {
    tokens: &'a [Token<'src>],
    matcher: Matcher<'a, 'src>,
    scope: ScopeTracker,
    /// Bodies announced by recognized declarations whose `{` is still ahead.
    pending_bodies: Vec<BodyStart>,
    entries: Vec<OutlineEntry>,
}

impl<'a, 'src> Scanner<'a, 'src> {
    fn new(tokens: &'a [Token<'src>]) -> Self {
        Self {
            tokens,
            matcher: Matcher::new(tokens),
            scope: ScopeTracker::new(),
            pending_bodies: Vec::new(),
            entries: Vec::new(),
        }
    }

    fn run(mut self) -> Result<Vec<OutlineEntry>, ParseError> {
        let mut i = 0;
        while i < self.tokens.len() {
            i = self.step(i)?;
        }
        self.scope.finish()?;
        Ok(self.entries)
    }

    fn context(&self) -> Context {
        Context {
            level: self.scope.level(),
            in_class: self.scope.in_class_body(),
        }
    }

    /// Handle the token at `i` and return where to continue.
    fn step(&mut self, i: usize) -> Result<usize, ParseError> {
        let token = self.tokens[i];

        let outcome = match token.kind {
            TokenKind::Punct => match token.text {
                "{" => {
                    let kind = self.take_pending_body(i);
                    self.scope.open(kind, i, token.line);
                    return Ok(i + 1);
                }
                "(" => {
                    self.scope.open(ScopeKind::Paren, i, token.line);
                    return Ok(i + 1);
                }
                "[" => {
                    self.scope.open(ScopeKind::Bracket, i, token.line);
                    return Ok(i + 1);
                }
                ")" | "]" | "}" => {
                    self.scope.close(&token, i)?;
                    return Ok(i + 1);
                }
                "=>" => self
                    .matcher
                    .match_arrow(i, self.context(), self.scope.last_paren()),
                "*" => self.try_member(i),
                _ => Match::Skipped,
            },
            TokenKind::Identifier => match token.text {
                "function" => self.matcher.match_function(i, self.context()),
                "class" => self.matcher.match_class(i, self.context()),
                _ => self.try_member(i),
            },
            TokenKind::String | TokenKind::Number => self.try_member(i),
            TokenKind::Template | TokenKind::RegExp => Match::Skipped,
        };

        Ok(self.apply(outcome, i))
    }

    fn try_member(&self, i: usize) -> Match {
        let in_class = match self.scope.top() {
            Some(frame) if frame.kind.is_class_body() => {
                if !self.matcher.starts_class_member(i, frame.open_index) {
                    return Match::Skipped;
                }
                true
            }
            _ => {
                if !self.matcher.starts_object_method(i) {
                    return Match::Skipped;
                }
                false
            }
        };

        self.matcher.match_member(
            i,
            Context {
                level: self.scope.level(),
                in_class,
            },
        )
    }

    fn apply(&mut self, outcome: Match, i: usize) -> usize {
        match outcome {
            Match::Recognized(decl) => {
                if let Some(entry) = decl.entry {
                    tracing::trace!(
                        name = %entry.name,
                        entry_type = entry.entry_type.as_str(),
                        level = entry.level,
                        line = entry.line,
                        "outline entry"
                    );
                    self.entries.push(entry);
                }
                if let Some(body) = decl.body {
                    self.pending_bodies.push(body);
                }
                decl.resume
            }
            Match::Skipped => i + 1,
        }
    }

    /// Kind of the scope opened by the `{` at `i`.
    fn take_pending_body(&mut self, i: usize) -> ScopeKind {
        self.pending_bodies.retain(|body| body.index >= i);
        match self.pending_bodies.iter().position(|body| body.index == i) {
            Some(pos) => self.pending_bodies.remove(pos).kind,
            None => ScopeKind::Block,
        }
    }
}
