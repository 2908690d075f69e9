//! Scope tracker.
//!
//! Keeps the stack of open delimiters. Only function and class bodies count
//! toward an entry's level; plain blocks, object literals, parentheses and
//! brackets are tracked so that every closer can be checked against its
//! opener.

use super::lexer::Token;
use super::ParseError;

/// What an open delimiter belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    /// Body of a recognized function, method or named arrow.
    Function,
    /// Body of a recognized class.
    Class,
    /// Body of a class expression that has no name to report.
    AnonymousClass,
    /// Any other `{ ... }`.
    Block,
    Paren,
    Bracket,
}

impl ScopeKind {
    /// Whether this scope adds one to the level of entries inside it
    pub fn counts_level(self) -> bool {
        matches!(self, ScopeKind::Function | ScopeKind::Class)
    }

    /// Whether members directly inside are class members
    pub fn is_class_body(self) -> bool {
        matches!(self, ScopeKind::Class | ScopeKind::AnonymousClass)
    }

    fn opener(self) -> &'static str {
        match self {
            ScopeKind::Paren => "(",
            ScopeKind::Bracket => "[",
            _ => "{",
        }
    }

    fn closer(self) -> &'static str {
        match self {
            ScopeKind::Paren => ")",
            ScopeKind::Bracket => "]",
            _ => "}",
        }
    }
}

/// One open delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub kind: ScopeKind,
    /// Token index of the opener.
    pub open_index: usize,
    /// Line of the opener.
    pub line: usize,
}

/// Stack of open delimiters plus the current level.
#[derive(Debug, Default)]
pub struct ScopeTracker {
    frames: Vec<Frame>,
    level: usize,
    /// Opener and closer indices of the most recently closed parenthesis.
    last_paren: Option<(usize, usize)>,
}

impl ScopeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of enclosing function and class bodies
    pub fn level(&self) -> usize {
        self.level
    }

    /// Innermost open delimiter
    pub fn top(&self) -> Option<&Frame> {
        self.frames.last()
    }

    /// Whether the innermost delimiter is a class body
    pub fn in_class_body(&self) -> bool {
        self.top().is_some_and(|frame| frame.kind.is_class_body())
    }

    /// Opener and closer indices of the most recently closed `( ... )`
    pub fn last_paren(&self) -> Option<(usize, usize)> {
        self.last_paren
    }

    pub fn open(&mut self, kind: ScopeKind, open_index: usize, line: usize) {
        if kind.counts_level() {
            self.level += 1;
        }
        self.frames.push(Frame {
            kind,
            open_index,
            line,
        });
    }

    /// Close the innermost delimiter with `token` found at `index`.
    pub fn close(&mut self, token: &Token<'_>, index: usize) -> Result<Frame, ParseError> {
        let Some(frame) = self.frames.pop() else {
            return Err(ParseError::syntax(
                format!("unexpected '{}'", token.text),
                token.line,
            ));
        };

        if frame.kind.closer() != token.text {
            return Err(ParseError::syntax(
                format!(
                    "mismatched '{}' for '{}' opened on line {}",
                    token.text,
                    frame.kind.opener(),
                    frame.line
                ),
                token.line,
            ));
        }

        if frame.kind.counts_level() {
            self.level -= 1;
        }
        if frame.kind == ScopeKind::Paren {
            self.last_paren = Some((frame.open_index, index));
        }
        Ok(frame)
    }

    /// Check that nothing is left open at end of input.
    pub fn finish(&self) -> Result<(), ParseError> {
        match self.frames.last() {
            Some(frame) => Err(ParseError::syntax(
                format!("unclosed '{}'", frame.kind.opener()),
                frame.line,
            )),
            None => Ok(()),
        }
    }
}
