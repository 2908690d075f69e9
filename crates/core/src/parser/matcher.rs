//! Declaration matcher.
//!
//! Each rule looks at a small window of tokens around the current position and
//! either recognizes a complete declaration or reports [`Match::Skipped`].
//! Partial matches are never reported; structural problems inside a window are
//! left for the scan driver to hit, so the matcher itself never fails.

use super::lexer::{Token, TokenKind};
use super::params::{parse_params, render};
use super::scope::ScopeKind;
use crate::models::{EntryType, OutlineEntry};

/// Outcome of trying one rule at one token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Match {
    Recognized(Declaration),
    /// Not a construct we report; move on by one token.
    Skipped,
}

/// A recognized construct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Entry to append; `None` for a class expression without a name.
    pub entry: Option<OutlineEntry>,
    /// Token index at which scanning continues.
    pub resume: usize,
    /// The `{` that opens this construct's body, if it has one.
    pub body: Option<BodyStart>,
}

/// Location and kind of a body that is about to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyStart {
    pub index: usize,
    pub kind: ScopeKind,
}

/// Scope facts the rules depend on.
#[derive(Debug, Clone, Copy)]
pub struct Context {
    /// Level given to an entry recognized here.
    pub level: usize,
    /// Whether the innermost open delimiter is a class body.
    pub in_class: bool,
}

/// Keywords that head a `kw (...) {` statement, so never an object-literal method.
const STATEMENT_HEADS: &[&str] = &["if", "for", "while", "switch", "catch", "with"];

const MEMBER_MODIFIERS: &[&str] = &["static", "async", "get", "set"];

pub struct Matcher<'a, 'src> {
    tokens: &'a [Token<'src>],
}

impl<'a, 'src> Matcher<'a, 'src> {
    pub fn new(tokens: &'a [Token<'src>]) -> Self {
        Self { tokens }
    }

    fn token(&self, idx: usize) -> Option<&'a Token<'src>> {
        self.tokens.get(idx)
    }

    fn punct_at(&self, idx: usize, punct: &str) -> bool {
        self.token(idx).is_some_and(|t| t.is_punct(punct))
    }

    fn follows_member_access(&self, idx: usize) -> bool {
        idx.checked_sub(1)
            .and_then(|prev| self.token(prev))
            .is_some_and(|t| t.is_punct(".") || t.is_punct("?."))
    }

    /// `function [*] [name] (params)` at `i`, declaration or expression.
    pub fn match_function(&self, i: usize, ctx: Context) -> Match {
        self.function(i, ctx).map_or(Match::Skipped, Match::Recognized)
    }

    fn function(&self, i: usize, ctx: Context) -> Option<Declaration> {
        if self.follows_member_access(i) {
            return None;
        }

        let mut j = i + 1;
        let generator = self.punct_at(j, "*");
        if generator {
            j += 1;
        }

        let explicit = match self.token(j) {
            Some(t) if t.kind == TokenKind::Identifier => {
                j += 1;
                Some(t.text.to_string())
            }
            _ => None,
        };

        if !self.punct_at(j, "(") {
            return None;
        }
        let close = self.find_matching(j)?;
        let args = parse_params(&self.tokens[j + 1..close]);

        let (entry_type, name) = match (generator, explicit.or_else(|| self.binding_name(i))) {
            (true, Some(name)) => (EntryType::Generator, name),
            (true, None) => (EntryType::Generator, "function".to_string()),
            (false, Some(name)) => (EntryType::for_name(&name), name),
            (false, None) => (EntryType::Unnamed, "function".to_string()),
        };

        Some(Declaration {
            entry: Some(OutlineEntry::new(
                entry_type,
                name,
                args,
                ctx.level,
                self.tokens[i].line,
            )),
            resume: close + 1,
            body: self.body_after(close),
        })
    }

    /// `class [Name] [extends Parent] { ... }` at `i`.
    pub fn match_class(&self, i: usize, ctx: Context) -> Match {
        self.class(i, ctx).map_or(Match::Skipped, Match::Recognized)
    }

    fn class(&self, i: usize, ctx: Context) -> Option<Declaration> {
        if self.follows_member_access(i) {
            return None;
        }

        let mut j = i + 1;
        let explicit = match self.token(j) {
            Some(t) if t.kind == TokenKind::Identifier && t.text != "extends" => {
                j += 1;
                Some(t.text.to_string())
            }
            _ => None,
        };

        let mut args = Vec::new();
        let mut heritage = None;
        if self.token(j).is_some_and(|t| t.is_ident("extends")) {
            j += 1;
            heritage = Some(j);
            if let Some((parent, next)) = self.dotted_path(j) {
                args.push(parent);
                j = next;
            }
        }

        let body_index = self.find_body_brace(j);
        // anything past a plain dotted path (`mixin(B)`, `(A)`) is kept as written
        if let (Some(start), Some(body)) = (heritage, body_index) {
            if body > j {
                args = vec![render(&self.tokens[start..body])];
            }
        }
        let name = explicit.or_else(|| self.binding_name(i));

        let (entry, kind) = match name {
            Some(name) => (
                Some(OutlineEntry::new(
                    EntryType::Class,
                    name,
                    args,
                    ctx.level,
                    self.tokens[i].line,
                )),
                ScopeKind::Class,
            ),
            None if body_index.is_some() => (None, ScopeKind::AnonymousClass),
            None => return None,
        };

        Some(Declaration {
            entry,
            resume: j,
            body: body_index.map(|index| BodyStart { index, kind }),
        })
    }

    /// Whether the token at `i` begins a class member, given the index of the
    /// class body's `{`.
    pub fn starts_class_member(&self, i: usize, class_open: usize) -> bool {
        let Some(token) = self.token(i) else {
            return false;
        };
        let nameish = matches!(
            token.kind,
            TokenKind::Identifier | TokenKind::String | TokenKind::Number
        ) || token.is_punct("*");
        if !nameish {
            return false;
        }
        let Some(prev_idx) = i.checked_sub(1) else {
            return false;
        };
        let prev = &self.tokens[prev_idx];

        prev_idx == class_open
            || prev.is_punct(";")
            || prev.is_punct("}")
            || (prev.line < token.line && prev.ends_expression())
    }

    /// Whether the token at `i` may begin a method shorthand in an object
    /// literal (`{ name() {} }`, `{ a: 1, *gen() {} }`).
    pub fn starts_object_method(&self, i: usize) -> bool {
        let Some(token) = self.token(i) else {
            return false;
        };
        let candidate = match token.kind {
            TokenKind::Identifier => !STATEMENT_HEADS.contains(&token.text),
            TokenKind::String | TokenKind::Number => true,
            _ => token.is_punct("*"),
        };
        candidate
            && i.checked_sub(1)
                .and_then(|prev| self.token(prev))
                .is_some_and(|prev| prev.is_punct("{") || prev.is_punct(","))
    }

    /// A method, accessor or class field starting at `i`, modifiers included.
    pub fn match_member(&self, i: usize, ctx: Context) -> Match {
        self.member(i, ctx).map_or(Match::Skipped, Match::Recognized)
    }

    fn member(&self, i: usize, ctx: Context) -> Option<Declaration> {
        let mut j = i;
        let mut generator = false;
        loop {
            let token = self.token(j)?;
            if token.is_punct("*") {
                generator = true;
                j += 1;
                continue;
            }
            let is_modifier = token.kind == TokenKind::Identifier
                && MEMBER_MODIFIERS.contains(&token.text)
                && self
                    .token(j + 1)
                    .is_some_and(|next| property_key(next).is_some() || next.is_punct("*"));
            if is_modifier {
                j += 1;
                continue;
            }
            break;
        }

        let name_token = self.token(j)?;
        if !ctx.in_class
            && name_token.kind == TokenKind::Identifier
            && STATEMENT_HEADS.contains(&name_token.text)
        {
            return None;
        }
        let name = property_key(name_token)?;
        let line = self.tokens[i].line;

        match self.token(j + 1) {
            Some(next) if next.is_punct("(") => {
                let close = self.find_matching(j + 1)?;
                let body = self.body_after(close)?;
                let entry_type = if generator {
                    EntryType::Generator
                } else {
                    EntryType::for_name(&name)
                };
                let args = parse_params(&self.tokens[j + 2..close]);
                return Some(Declaration {
                    entry: Some(OutlineEntry::new(entry_type, name, args, ctx.level, line)),
                    resume: close + 1,
                    body: Some(body),
                });
            }
            _ if !ctx.in_class || generator => return None,
            Some(next) if next.is_punct("=") => {
                // Function-valued fields are reported by the function, class
                // or arrow rule under the field's name.
                if self.initializer_is_function(j + 2) {
                    return None;
                }
            }
            Some(next) if next.is_punct(";") || next.is_punct("}") => {}
            Some(next) if next.line > name_token.line => {}
            None => {}
            Some(_) => return None,
        }

        Some(Declaration {
            entry: Some(OutlineEntry::new(
                EntryType::for_name(&name),
                name,
                Vec::new(),
                ctx.level,
                line,
            )),
            resume: j + 1,
            body: None,
        })
    }

    /// An arrow function at the `=>` at `i`, reported only when it is bound
    /// to a name (`x = (a) => ...`, `key: a => ...`).
    ///
    /// `last_paren` is the most recently closed parenthesis pair, which holds
    /// the parameter list when the arrow's head is parenthesized.
    pub fn match_arrow(&self, i: usize, ctx: Context, last_paren: Option<(usize, usize)>) -> Match {
        self.arrow(i, ctx, last_paren)
            .map_or(Match::Skipped, Match::Recognized)
    }

    fn arrow(
        &self,
        i: usize,
        ctx: Context,
        last_paren: Option<(usize, usize)>,
    ) -> Option<Declaration> {
        let prev_idx = i.checked_sub(1)?;
        let prev = self.token(prev_idx)?;

        let (params, head) = if prev.is_punct(")") {
            let (open, close) = last_paren.filter(|&(_, close)| close == prev_idx)?;
            (&self.tokens[open + 1..close], open)
        } else if prev.kind == TokenKind::Identifier {
            (&self.tokens[prev_idx..i], prev_idx)
        } else {
            return None;
        };

        let name = self.binding_name(head)?;
        let body = self.punct_at(i + 1, "{").then_some(BodyStart {
            index: i + 1,
            kind: ScopeKind::Function,
        });

        Some(Declaration {
            entry: Some(OutlineEntry::new(
                EntryType::for_name(&name),
                name,
                parse_params(params),
                ctx.level,
                self.tokens[head].line,
            )),
            resume: i + 1,
            body,
        })
    }

    /// Name a function, class or arrow expression starting at `head` takes
    /// from what it is assigned to: `x = ...`, `a.b.x = ...` or `{ x: ... }`.
    fn binding_name(&self, head: usize) -> Option<String> {
        let mut p = head;
        if p > 0 && self.tokens[p - 1].is_ident("async") {
            p -= 1;
        }
        let prev = self.token(p.checked_sub(1)?)?;
        let target = self.token(p.checked_sub(2)?)?;

        if prev.is_punct("=") {
            return (target.kind == TokenKind::Identifier).then(|| target.text.to_string());
        }

        if prev.is_punct(":") {
            let key = property_key(target)?;
            let in_object = p < 3 || {
                let before = &self.tokens[p - 3];
                before.is_punct("{") || before.is_punct(",")
            };
            return in_object.then_some(key);
        }

        None
    }

    /// Whether a field initializer starting at `k` is a function, class or
    /// arrow expression.
    fn initializer_is_function(&self, k: usize) -> bool {
        let mut k = k;
        if self.token(k).is_some_and(|t| t.is_ident("async")) && !self.punct_at(k + 1, "=>") {
            k += 1;
        }
        match self.token(k) {
            Some(t) if t.is_ident("function") || t.is_ident("class") => true,
            Some(t) if t.kind == TokenKind::Identifier => self.punct_at(k + 1, "=>"),
            Some(t) if t.is_punct("(") => self
                .find_matching(k)
                .is_some_and(|close| self.punct_at(close + 1, "=>")),
            _ => false,
        }
    }

    /// `Name` or `ns.Name` starting at `j`; returns the text and the index
    /// after it.
    fn dotted_path(&self, j: usize) -> Option<(String, usize)> {
        let first = self.token(j).filter(|t| t.kind == TokenKind::Identifier)?;
        let mut text = first.text.to_string();
        let mut k = j + 1;
        while self.punct_at(k, ".") {
            match self.token(k + 1) {
                Some(t) if t.kind == TokenKind::Identifier => {
                    text.push('.');
                    text.push_str(t.text);
                    k += 2;
                }
                _ => break,
            }
        }
        Some((text, k))
    }

    fn body_after(&self, close: usize) -> Option<BodyStart> {
        self.punct_at(close + 1, "{").then_some(BodyStart {
            index: close + 1,
            kind: ScopeKind::Function,
        })
    }

    /// Index of the delimiter closing the one at `open`, or `None` when the
    /// window is unbalanced or runs off the end.
    fn find_matching(&self, open: usize) -> Option<usize> {
        let mut expected: Vec<&str> = Vec::new();
        for (idx, token) in self.tokens.iter().enumerate().skip(open) {
            if token.kind != TokenKind::Punct {
                continue;
            }
            match token.text {
                "(" => expected.push(")"),
                "[" => expected.push("]"),
                "{" => expected.push("}"),
                ")" | "]" | "}" => {
                    if expected.pop() != Some(token.text) {
                        return None;
                    }
                    if expected.is_empty() {
                        return Some(idx);
                    }
                }
                _ => {}
            }
        }
        None
    }

    /// First `{` at bracket depth zero from `from`, stopping at a `;` or an
    /// unmatched closer.
    fn find_body_brace(&self, from: usize) -> Option<usize> {
        let mut depth = 0usize;
        for (idx, token) in self.tokens.iter().enumerate().skip(from) {
            if token.kind != TokenKind::Punct {
                continue;
            }
            match token.text {
                "{" if depth == 0 => return Some(idx),
                "(" | "[" | "{" => depth += 1,
                ")" | "]" | "}" => {
                    if depth == 0 {
                        return None;
                    }
                    depth -= 1;
                }
                ";" if depth == 0 => return None,
                _ => {}
            }
        }
        None
    }
}

/// Text of a property name token, quotes stripped from string keys.
fn property_key(token: &Token<'_>) -> Option<String> {
    match token.kind {
        TokenKind::Identifier | TokenKind::Number => Some(token.text.to_string()),
        TokenKind::String => token
            .text
            .get(1..token.text.len().saturating_sub(1))
            .map(str::to_string),
        _ => None,
    }
}
