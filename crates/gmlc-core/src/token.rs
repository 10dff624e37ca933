//! Lexical tokens for GML source text.
//!
//! The scanner emits one `Token` per lexeme, including explicit `Newline`
//! and `Backslash` markers (the macro engine needs them to delimit `#macro`
//! bodies and line continuations). Every stream is terminated by a single
//! `End` sentinel.

use std::fmt;

use bitflags::bitflags;

/// A position in the source text. Zero-based internally; `Display` renders
/// the conventional one-based `line:col`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Location {
    pub line: u32,
    pub col: u32,
    pub offset: usize,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.col + 1)
    }
}

/// The closed set of token kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Structural
    Ident,
    Number,
    Str,
    End,
    Newline,
    Backslash,
    Hash,

    // Punctuation
    Dot,
    Comma,
    Semi,
    Colon,
    Question,
    Exclam,
    LParen,
    RParen,
    LSquare,
    RSquare,
    LCurly,
    RCurly,

    // Accessor openers: `[|` list, `[?` map, `[#` grid, `[@` array, `[$` struct
    AccList,
    AccMap,
    AccGrid,
    AccArray,
    AccStruct,

    // Comparison
    Leq,
    Geq,
    Eq,
    Neq,
    Less,
    More,

    // Arithmetic
    Plus,
    Minus,
    Mul,
    Div,
    IntDiv,
    Mod,

    // Logical
    And,
    Or,
    Nullish,

    // Bitwise
    BitAnd,
    BitOr,
    BitXor,
    BitNot,
    Shl,
    Shr,

    // Assignment
    Assign,
    AssignAdd,
    AssignSub,
    AssignMul,
    AssignDiv,
    AssignOr,
    AssignAnd,
    AssignNullish,

    // Postfix
    Inc,
    Dec,
}

impl TokenKind {
    /// Stable display name, used in diagnostics and AST dumps.
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Ident => "IDENT",
            TokenKind::Number => "NUMBER",
            TokenKind::Str => "STRING",
            TokenKind::End => "END",
            TokenKind::Newline => "NEWLINE",
            TokenKind::Backslash => "BACKSLASH",
            TokenKind::Hash => "HASH",
            TokenKind::Dot => "DOT",
            TokenKind::Comma => "COMMA",
            TokenKind::Semi => "SEMI",
            TokenKind::Colon => "COLON",
            TokenKind::Question => "QUESTION",
            TokenKind::Exclam => "EXCLAM",
            TokenKind::LParen => "LPAREN",
            TokenKind::RParen => "RPAREN",
            TokenKind::LSquare => "LSQUARE",
            TokenKind::RSquare => "RSQUARE",
            TokenKind::LCurly => "LCURLY",
            TokenKind::RCurly => "RCURLY",
            TokenKind::AccList => "ACC_LIST",
            TokenKind::AccMap => "ACC_MAP",
            TokenKind::AccGrid => "ACC_GRID",
            TokenKind::AccArray => "ACC_ARRAY",
            TokenKind::AccStruct => "ACC_STRUCT",
            TokenKind::Leq => "LEQ",
            TokenKind::Geq => "GEQ",
            TokenKind::Eq => "EQ",
            TokenKind::Neq => "NEQ",
            TokenKind::Less => "LESS",
            TokenKind::More => "MORE",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINUS",
            TokenKind::Mul => "MUL",
            TokenKind::Div => "DIV",
            TokenKind::IntDiv => "INTDIV",
            TokenKind::Mod => "MOD",
            TokenKind::And => "AND",
            TokenKind::Or => "OR",
            TokenKind::Nullish => "NULLISH",
            TokenKind::BitAnd => "BITAND",
            TokenKind::BitOr => "BITOR",
            TokenKind::BitXor => "BITXOR",
            TokenKind::BitNot => "BITNOT",
            TokenKind::Shl => "LSHIFT",
            TokenKind::Shr => "RSHIFT",
            TokenKind::Assign => "ASSIGN",
            TokenKind::AssignAdd => "ASSIGN_ADD",
            TokenKind::AssignSub => "ASSIGN_SUB",
            TokenKind::AssignMul => "ASSIGN_MUL",
            TokenKind::AssignDiv => "ASSIGN_DIV",
            TokenKind::AssignOr => "ASSIGN_OR",
            TokenKind::AssignAnd => "ASSIGN_AND",
            TokenKind::AssignNullish => "ASSIGN_NULLISH",
            TokenKind::Inc => "INC",
            TokenKind::Dec => "DEC",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

bitflags! {
    /// Extra information about numeric literals.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct TokenFlags: u8 {
        /// Contains a decimal point.
        const DOT = 1 << 0;
        /// Hexadecimal literal (any prefix form).
        const HEX = 1 << 1;
        /// `$DEADBEEF` form.
        const HEX_DOLLAR = 1 << 2;
        /// `#rrggbb` colour-literal form.
        const HEX_HASH = 1 << 3;
    }
}

/// A single lexeme with its kind, text, location, and flags.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub loc: Location,
    pub flags: TokenFlags,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>, loc: Location) -> Self {
        Self {
            kind,
            value: value.into(),
            loc,
            flags: TokenFlags::empty(),
        }
    }

    /// True for an `Ident` whose text equals `value`. Keywords are not
    /// reserved at the lexical layer; the parser recognises them by text.
    pub fn is_ident(&self, value: &str) -> bool {
        self.kind == TokenKind::Ident && self.value == value
    }

    /// A copy of this token with a different kind, preserving text,
    /// location, and flags. Used when `and`/`or`/`mod`/`div` identifiers
    /// are rewritten into operator tokens at the parse site.
    pub fn with_kind(&self, kind: TokenKind) -> Self {
        Self {
            kind,
            value: self.value.clone(),
            loc: self.loc,
            flags: self.flags,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Ident => write!(f, "IDENT<{}>", self.value),
            TokenKind::Number => write!(f, "NUM<{}>", self.value),
            TokenKind::Str => write!(f, "STR<{}>", self.value),
            _ => write!(f, "TOK<{}, {}>", self.kind, self.value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_displays_one_based() {
        let loc = Location { line: 0, col: 0, offset: 0 };
        assert_eq!(loc.to_string(), "1:1");
        let loc = Location { line: 4, col: 11, offset: 90 };
        assert_eq!(loc.to_string(), "5:12");
    }

    #[test]
    fn token_display_forms() {
        let loc = Location::default();
        assert_eq!(Token::new(TokenKind::Ident, "foo", loc).to_string(), "IDENT<foo>");
        assert_eq!(Token::new(TokenKind::Number, "1.5", loc).to_string(), "NUM<1.5>");
        assert_eq!(Token::new(TokenKind::Plus, "+", loc).to_string(), "TOK<PLUS, +>");
    }

    #[test]
    fn ident_match_is_kind_sensitive() {
        let loc = Location::default();
        let kw = Token::new(TokenKind::Ident, "var", loc);
        assert!(kw.is_ident("var"));
        assert!(!kw.is_ident("static"));
        let s = Token::new(TokenKind::Str, "var", loc);
        assert!(!s.is_ident("var"));
    }

    #[test]
    fn rewrite_preserves_everything_but_kind() {
        let loc = Location { line: 2, col: 3, offset: 17 };
        let t = Token::new(TokenKind::Ident, "and", loc);
        let op = t.with_kind(TokenKind::And);
        assert_eq!(op.kind, TokenKind::And);
        assert_eq!(op.value, "and");
        assert_eq!(op.loc, loc);
    }
}
