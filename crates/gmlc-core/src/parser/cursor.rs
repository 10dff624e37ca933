//! Transactional cursor over a token slice.
//!
//! Grammar rules speculate: they save the position, try to consume, and
//! either commit or roll back. `save` hands out a `Savepoint` that must be
//! consumed by exactly one of `commit`/`restore`, so the type system keeps
//! the save discipline balanced; a depth counter backs a debug assertion
//! for the remaining misuse (committing savepoints out of order), which is
//! a programmer error, not a recoverable condition.
//!
//! The cursor also tracks the furthest index ever reached. Individual rule
//! failures are silent, so this watermark is what the entry point uses to
//! produce a useful diagnostic when statement parsing stops early.

use crate::token::{Token, TokenKind};

pub struct Cursor<'a> {
    tokens: &'a [Token],
    index: usize,
    furthest: usize,
    depth: usize,
}

/// A saved cursor position. Must be consumed by `Cursor::commit` or
/// `Cursor::restore`.
#[must_use = "savepoints must be committed or restored"]
pub struct Savepoint {
    index: usize,
    depth: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            index: 0,
            furthest: 0,
            depth: 0,
        }
    }

    /// Bounds-checked lookahead. Negative offsets peek backwards for
    /// context checks.
    pub fn at(&self, offset: isize) -> Option<&'a Token> {
        let idx = self.index as isize + offset;
        if idx < 0 {
            return None;
        }
        self.tokens.get(idx as usize)
    }

    /// Advance the index, updating the furthest-reached watermark.
    pub fn advance(&mut self, n: usize) {
        self.index += n;
        self.furthest = self.furthest.max(self.index);
    }

    pub fn furthest(&self) -> usize {
        self.furthest
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn save(&mut self) -> Savepoint {
        self.depth += 1;
        Savepoint {
            index: self.index,
            depth: self.depth,
        }
    }

    /// Discard the savepoint, keeping the current position.
    pub fn commit(&mut self, sp: Savepoint) {
        debug_assert_eq!(sp.depth, self.depth, "savepoint committed out of order");
        self.depth -= 1;
    }

    /// Roll the cursor back to the saved position.
    pub fn restore(&mut self, sp: Savepoint) {
        debug_assert_eq!(sp.depth, self.depth, "savepoint restored out of order");
        self.index = sp.index;
        self.depth -= 1;
    }

    /// Non-consuming: the token at `offset` if it has the given kind.
    pub fn match_kind(&self, offset: isize, kind: TokenKind) -> Option<&'a Token> {
        self.at(offset).filter(|t| t.kind == kind)
    }

    /// Non-consuming: the token at `offset` if its kind is in `kinds`.
    pub fn match_any(&self, offset: isize, kinds: &[TokenKind]) -> Option<&'a Token> {
        self.at(offset).filter(|t| kinds.contains(&t.kind))
    }

    /// Non-consuming: the token at `offset` if it is an identifier with
    /// exactly this text.
    pub fn match_value(&self, offset: isize, value: &str) -> Option<&'a Token> {
        self.at(offset).filter(|t| t.is_ident(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::scan;

    #[test]
    fn lookahead_is_bounds_checked() {
        let toks = scan("a b").unwrap();
        let cur = Cursor::new(&toks);
        assert_eq!(cur.at(0).unwrap().value, "a");
        assert_eq!(cur.at(1).unwrap().value, "b");
        assert_eq!(cur.at(2).unwrap().kind, TokenKind::End);
        assert!(cur.at(3).is_none());
        assert!(cur.at(-1).is_none());
    }

    #[test]
    fn negative_offsets_after_advance() {
        let toks = scan("a b c").unwrap();
        let mut cur = Cursor::new(&toks);
        cur.advance(2);
        assert_eq!(cur.at(-2).unwrap().value, "a");
        assert_eq!(cur.at(-1).unwrap().value, "b");
        assert_eq!(cur.at(0).unwrap().value, "c");
    }

    #[test]
    fn restore_rolls_back_but_keeps_watermark() {
        let toks = scan("a b c d").unwrap();
        let mut cur = Cursor::new(&toks);
        let sp = cur.save();
        cur.advance(3);
        cur.restore(sp);
        assert_eq!(cur.at(0).unwrap().value, "a");
        assert_eq!(cur.furthest(), 3);
    }

    #[test]
    fn commit_keeps_position() {
        let toks = scan("a b").unwrap();
        let mut cur = Cursor::new(&toks);
        let sp = cur.save();
        cur.advance(1);
        cur.commit(sp);
        assert_eq!(cur.at(0).unwrap().value, "b");
        assert_eq!(cur.depth(), 0);
    }

    #[test]
    fn nested_savepoints_balance() {
        let toks = scan("a b c").unwrap();
        let mut cur = Cursor::new(&toks);
        let outer = cur.save();
        cur.advance(1);
        let inner = cur.save();
        cur.advance(1);
        cur.restore(inner);
        assert_eq!(cur.at(0).unwrap().value, "b");
        cur.commit(outer);
        assert_eq!(cur.depth(), 0);
    }

    #[test]
    fn matchers_do_not_consume() {
        let toks = scan("var x").unwrap();
        let cur = Cursor::new(&toks);
        assert!(cur.match_value(0, "var").is_some());
        assert!(cur.match_value(0, "let").is_none());
        assert!(cur.match_kind(1, TokenKind::Ident).is_some());
        assert!(cur.match_any(0, &[TokenKind::Number, TokenKind::Ident]).is_some());
        assert_eq!(cur.at(0).unwrap().value, "var");
    }
}
