//! Byte-driven scanner: source text → token stream.
//!
//! Whitespace (space/tab/CR) and comments are eliminated here, but `\n` and
//! `\` are emitted as explicit `Newline`/`Backslash` tokens because the
//! macro engine uses them to delimit `#macro` bodies and line continuations.
//! Keywords are not reserved: `var`, `if`, `function` and friends come out
//! as plain `Ident` tokens and are recognised positionally by the parser.
//!
//! Bytes ≥ 0x80 are treated as opaque identifier bytes, which keeps the
//! scanner total over arbitrary UTF-8 at the cost of column accuracy inside
//! non-ASCII identifiers.

use crate::error::{Error, Result};
use crate::token::{Location, Token, TokenFlags, TokenKind};

/// Ordered literal-token table. Multi-character operators are listed before
/// their single-character prefixes so longest-match wins.
const LITERAL_TOKENS: &[(&str, TokenKind)] = &[
    ("??=", TokenKind::AssignNullish),
    ("??", TokenKind::Nullish),
    ("<<", TokenKind::Shl),
    (">>", TokenKind::Shr),
    ("<=", TokenKind::Leq),
    (">=", TokenKind::Geq),
    ("==", TokenKind::Eq),
    ("!=", TokenKind::Neq),
    ("&&", TokenKind::And),
    ("||", TokenKind::Or),
    ("+=", TokenKind::AssignAdd),
    ("-=", TokenKind::AssignSub),
    ("*=", TokenKind::AssignMul),
    ("/=", TokenKind::AssignDiv),
    ("|=", TokenKind::AssignOr),
    ("&=", TokenKind::AssignAnd),
    ("++", TokenKind::Inc),
    ("--", TokenKind::Dec),
    ("[|", TokenKind::AccList),
    ("[?", TokenKind::AccMap),
    ("[#", TokenKind::AccGrid),
    ("[@", TokenKind::AccArray),
    ("[$", TokenKind::AccStruct),
    (".", TokenKind::Dot),
    (",", TokenKind::Comma),
    (";", TokenKind::Semi),
    (":", TokenKind::Colon),
    ("?", TokenKind::Question),
    ("!", TokenKind::Exclam),
    ("(", TokenKind::LParen),
    (")", TokenKind::RParen),
    ("[", TokenKind::LSquare),
    ("]", TokenKind::RSquare),
    ("{", TokenKind::LCurly),
    ("}", TokenKind::RCurly),
    ("<", TokenKind::Less),
    (">", TokenKind::More),
    ("+", TokenKind::Plus),
    ("-", TokenKind::Minus),
    ("*", TokenKind::Mul),
    ("/", TokenKind::Div),
    ("%", TokenKind::Mod),
    ("&", TokenKind::BitAnd),
    ("|", TokenKind::BitOr),
    ("^", TokenKind::BitXor),
    ("~", TokenKind::BitNot),
    ("=", TokenKind::Assign),
    ("#", TokenKind::Hash),
];

fn is_digit(b: u8) -> bool {
    b.is_ascii_digit()
}

fn is_hex_digit(b: u8) -> bool {
    b.is_ascii_hexdigit()
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b >= 0x80
}

fn is_ident_continue(b: u8) -> bool {
    is_ident_start(b) || is_digit(b)
}

/// Scan a whole source text into a token stream terminated by `End`.
pub fn scan(text: &str) -> Result<Vec<Token>> {
    Scanner::new(text).run()
}

struct Scanner<'a> {
    text: &'a str,
    bytes: &'a [u8],
    loc: Location,
}

impl<'a> Scanner<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            bytes: text.as_bytes(),
            loc: Location::default(),
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.loc.offset).copied()
    }

    fn starts_with(&self, prefix: &str) -> bool {
        self.bytes[self.loc.offset..].starts_with(prefix.as_bytes())
    }

    /// Consume one byte, tracking line/column.
    fn bump(&mut self) {
        if let Some(b) = self.peek() {
            self.loc.offset += 1;
            if b == b'\n' {
                self.loc.line += 1;
                self.loc.col = 0;
            } else {
                self.loc.col += 1;
            }
        }
    }

    fn bump_n(&mut self, n: usize) {
        for _ in 0..n {
            self.bump();
        }
    }

    fn token_from(&self, kind: TokenKind, start: Location) -> Token {
        Token::new(kind, &self.text[start.offset..self.loc.offset], start)
    }

    fn run(mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();

        loop {
            self.skip_trivia();

            let before = self.loc.offset;
            let Some(b) = self.peek() else {
                tokens.push(Token::new(TokenKind::End, "", self.loc));
                return Ok(tokens);
            };

            match b {
                b'\n' => {
                    let start = self.loc;
                    self.bump();
                    tokens.push(Token::new(TokenKind::Newline, "\n", start));
                }
                b'\\' => {
                    let start = self.loc;
                    self.bump();
                    tokens.push(Token::new(TokenKind::Backslash, "\\", start));
                }
                _ if is_ident_start(b) => tokens.push(self.ident()),
                b'"' | b'\'' => tokens.push(self.string()?),
                b'@' if matches!(self.bytes.get(self.loc.offset + 1), Some(b'"' | b'\'')) => {
                    tokens.push(self.string()?)
                }
                _ => {
                    // A digit, `.`, `$`, or `#` may start a number; a bare
                    // prefix rewinds and falls through to the literal table.
                    let mut emitted = false;
                    if is_digit(b) || b == b'.' || b == b'$' || b == b'#' {
                        if let Some(tok) = self.number() {
                            tokens.push(tok);
                            emitted = true;
                        }
                    }
                    if !emitted {
                        match self.literal_token() {
                            Some(tok) => tokens.push(tok),
                            None => {
                                let found = self.text[self.loc.offset..]
                                    .chars()
                                    .next()
                                    .unwrap_or('\0');
                                return Err(Error::UnexpectedChar {
                                    loc: self.loc,
                                    found,
                                });
                            }
                        }
                    }
                }
            }

            if self.loc.offset == before {
                return Err(Error::ScannerStuck { loc: self.loc });
            }
        }
    }

    /// Skip spaces, tabs, carriage returns, comments, and `#region` lines.
    /// Newlines are not trivia; they become tokens.
    fn skip_trivia(&mut self) {
        loop {
            let mut moved = false;

            while matches!(self.peek(), Some(b' ' | b'\t' | b'\r')) {
                self.bump();
                moved = true;
            }

            if self.starts_with("//")
                || self.starts_with("#region")
                || self.starts_with("#endregion")
            {
                while !matches!(self.peek(), None | Some(b'\n')) {
                    self.bump();
                }
                moved = true;
            }

            if self.starts_with("/*") {
                self.bump_n(2);
                while self.peek().is_some() && !self.starts_with("*/") {
                    self.bump();
                }
                if self.starts_with("*/") {
                    self.bump_n(2);
                }
                moved = true;
            }

            if !moved {
                return;
            }
        }
    }

    fn ident(&mut self) -> Token {
        let start = self.loc;
        while self.peek().is_some_and(is_ident_continue) {
            self.bump();
        }
        self.token_from(TokenKind::Ident, start)
    }

    /// Parse a number literal, or rewind and return `None` if the prefix
    /// turns out not to be one (bare `.`, `$`, `0x`, `#`).
    fn number(&mut self) -> Option<Token> {
        let start = self.loc;
        let mut flags = TokenFlags::empty();

        if self.starts_with("$") {
            flags |= TokenFlags::HEX | TokenFlags::HEX_DOLLAR;
            self.bump();
        } else if self.starts_with("#") {
            flags |= TokenFlags::HEX | TokenFlags::HEX_HASH;
            self.bump();
        } else if self.starts_with("0x") {
            flags |= TokenFlags::HEX;
            self.bump_n(2);
        }

        let mut digits = 0usize;
        if flags.contains(TokenFlags::HEX) {
            while self.peek().is_some_and(is_hex_digit) {
                self.bump();
                digits += 1;
            }
        } else {
            loop {
                match self.peek() {
                    Some(b) if is_digit(b) => {
                        self.bump();
                        digits += 1;
                    }
                    Some(b'.') if !flags.contains(TokenFlags::DOT) => {
                        flags |= TokenFlags::DOT;
                        self.bump();
                    }
                    _ => break,
                }
            }
        }

        if digits == 0 {
            self.loc = start;
            return None;
        }

        let mut tok = self.token_from(TokenKind::Number, start);
        tok.flags = flags;
        Some(tok)
    }

    fn string(&mut self) -> Result<Token> {
        let start = self.loc;
        if self.peek() == Some(b'@') {
            self.bump();
        }
        let quote = self.peek().expect("string() called at a quote");
        self.bump();

        let body_start = self.loc.offset;
        loop {
            match self.peek() {
                None => return Err(Error::UnterminatedString { loc: start }),
                Some(b) if b == quote => break,
                Some(b'\\') => {
                    // Escape the next byte; no interpretation at this layer.
                    self.bump();
                    self.bump();
                }
                Some(_) => self.bump(),
            }
        }
        let body = &self.text[body_start..self.loc.offset];
        self.bump();
        Ok(Token::new(TokenKind::Str, body, start))
    }

    fn literal_token(&mut self) -> Option<Token> {
        let start = self.loc;
        for &(text, kind) in LITERAL_TOKENS {
            if self.starts_with(text) {
                self.bump_n(text.len());
                return Some(self.token_from(kind, start));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        scan(input).unwrap().into_iter().map(|t| t.kind).collect()
    }

    fn values(input: &str) -> Vec<String> {
        scan(input).unwrap().into_iter().map(|t| t.value).collect()
    }

    #[test]
    fn empty_input_is_just_end() {
        assert_eq!(kinds(""), vec![TokenKind::End]);
    }

    #[test]
    fn idents_and_keywords_are_idents() {
        assert_eq!(
            kinds("var foo _bar if2"),
            vec![
                TokenKind::Ident,
                TokenKind::Ident,
                TokenKind::Ident,
                TokenKind::Ident,
                TokenKind::End,
            ]
        );
        assert_eq!(values("var foo"), vec!["var", "foo", ""]);
    }

    #[test]
    fn high_bytes_are_identifier_bytes() {
        let toks = scan("héllo = 1").unwrap();
        assert_eq!(toks[0].kind, TokenKind::Ident);
        assert_eq!(toks[0].value, "héllo");
        assert_eq!(toks[1].kind, TokenKind::Assign);
    }

    #[test]
    fn decimal_numbers() {
        let toks = scan("12 3.5 .5 7.").unwrap();
        assert_eq!(toks[0].value, "12");
        assert!(toks[0].flags.is_empty());
        assert_eq!(toks[1].value, "3.5");
        assert!(toks[1].flags.contains(TokenFlags::DOT));
        assert_eq!(toks[2].value, ".5");
        assert!(toks[2].flags.contains(TokenFlags::DOT));
        assert_eq!(toks[3].value, "7.");
    }

    #[test]
    fn only_one_embedded_dot() {
        // The second dot ends the literal; `.3` then starts a new one.
        let toks = scan("1.2.3").unwrap();
        assert_eq!(toks[0].value, "1.2");
        assert_eq!(toks[1].kind, TokenKind::Number);
        assert_eq!(toks[1].value, ".3");
    }

    #[test]
    fn hex_number_forms() {
        let toks = scan("0xFF $DEADBEEF #ff00aa").unwrap();
        assert_eq!(toks[0].value, "0xFF");
        assert_eq!(toks[0].flags, TokenFlags::HEX);
        assert_eq!(toks[1].value, "$DEADBEEF");
        assert_eq!(toks[1].flags, TokenFlags::HEX | TokenFlags::HEX_DOLLAR);
        assert_eq!(toks[2].value, "#ff00aa");
        assert_eq!(toks[2].flags, TokenFlags::HEX | TokenFlags::HEX_HASH);
    }

    #[test]
    fn bare_prefixes_are_not_numbers() {
        // A lone `.` falls back to DOT, a lone `#` to HASH.
        assert_eq!(kinds("."), vec![TokenKind::Dot, TokenKind::End]);
        assert_eq!(kinds("#"), vec![TokenKind::Hash, TokenKind::End]);
        // `#macro` is HASH + IDENT, since `m` is not a hex digit.
        assert_eq!(
            kinds("#macro"),
            vec![TokenKind::Hash, TokenKind::Ident, TokenKind::End]
        );
        // A lone `$` has no literal-token fallback.
        assert!(matches!(
            scan("$"),
            Err(Error::UnexpectedChar { found: '$', .. })
        ));
    }

    #[test]
    fn strings_keep_body_and_pass_escapes_through() {
        let toks = scan(r#""a\"b" 'c'"#).unwrap();
        assert_eq!(toks[0].kind, TokenKind::Str);
        assert_eq!(toks[0].value, r#"a\"b"#);
        assert_eq!(toks[1].value, "c");
    }

    #[test]
    fn raw_string_prefix() {
        let toks = scan(r#"@"C:\path" @'x'"#).unwrap();
        assert_eq!(toks[0].kind, TokenKind::Str);
        assert_eq!(toks[0].value, r"C:\path");
        assert_eq!(toks[1].value, "x");
    }

    #[test]
    fn unterminated_string_reports_start() {
        let err = scan("x = \"oops").unwrap_err();
        match err {
            Error::UnterminatedString { loc } => {
                assert_eq!(loc.line, 0);
                assert_eq!(loc.col, 4);
            }
            other => panic!("expected UnterminatedString, got {other}"),
        }
    }

    #[test]
    fn comments_are_skipped_but_newlines_survive() {
        assert_eq!(
            kinds("a // trailing\nb"),
            vec![
                TokenKind::Ident,
                TokenKind::Newline,
                TokenKind::Ident,
                TokenKind::End,
            ]
        );
        assert_eq!(
            kinds("a /* x\ny */ b"),
            vec![TokenKind::Ident, TokenKind::Ident, TokenKind::End]
        );
    }

    #[test]
    fn region_directives_are_line_comments() {
        assert_eq!(
            kinds("#region setup\nx\n#endregion\n"),
            vec![
                TokenKind::Newline,
                TokenKind::Ident,
                TokenKind::Newline,
                TokenKind::Newline,
                TokenKind::End,
            ]
        );
    }

    #[test]
    fn longest_match_operators() {
        assert_eq!(
            kinds("a ??= b ?? c << 1 <= 2"),
            vec![
                TokenKind::Ident,
                TokenKind::AssignNullish,
                TokenKind::Ident,
                TokenKind::Nullish,
                TokenKind::Ident,
                TokenKind::Shl,
                TokenKind::Number,
                TokenKind::Leq,
                TokenKind::Number,
                TokenKind::End,
            ]
        );
        assert_eq!(
            kinds("i++ + ++j"),
            vec![
                TokenKind::Ident,
                TokenKind::Inc,
                TokenKind::Plus,
                TokenKind::Inc,
                TokenKind::Ident,
                TokenKind::End,
            ]
        );
    }

    #[test]
    fn accessor_openers() {
        assert_eq!(
            kinds("a[| 0] b[? k] c[# x, y] d[@ 1] e[$ f] g[0]"),
            vec![
                TokenKind::Ident,
                TokenKind::AccList,
                TokenKind::Number,
                TokenKind::RSquare,
                TokenKind::Ident,
                TokenKind::AccMap,
                TokenKind::Ident,
                TokenKind::RSquare,
                TokenKind::Ident,
                TokenKind::AccGrid,
                TokenKind::Ident,
                TokenKind::Comma,
                TokenKind::Ident,
                TokenKind::RSquare,
                TokenKind::Ident,
                TokenKind::AccArray,
                TokenKind::Number,
                TokenKind::RSquare,
                TokenKind::Ident,
                TokenKind::AccStruct,
                TokenKind::Ident,
                TokenKind::RSquare,
                TokenKind::Ident,
                TokenKind::LSquare,
                TokenKind::Number,
                TokenKind::RSquare,
                TokenKind::End,
            ]
        );
    }

    #[test]
    fn backslash_and_newline_tokens() {
        assert_eq!(
            kinds("a \\\nb"),
            vec![
                TokenKind::Ident,
                TokenKind::Backslash,
                TokenKind::Newline,
                TokenKind::Ident,
                TokenKind::End,
            ]
        );
    }

    #[test]
    fn locations_are_monotonic() {
        let toks = scan("var x = 1;\nif (x) {\n  y = x + 2;\n}\n").unwrap();
        for pair in toks.windows(2) {
            assert!(
                pair[0].loc <= pair[1].loc,
                "{} not before {}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn locations_track_lines_and_columns() {
        let toks = scan("ab\n  cd").unwrap();
        assert_eq!((toks[0].loc.line, toks[0].loc.col), (0, 0));
        assert_eq!(toks[1].kind, TokenKind::Newline);
        assert_eq!((toks[2].loc.line, toks[2].loc.col), (1, 2));
    }

    #[test]
    fn value_concatenation_recovers_source() {
        // Minus comments/whitespace; no strings involved, so the spans are
        // exact slices of the input.
        let input = "var x=1+2; // note\nfoo(x)";
        let recovered: String = scan(input)
            .unwrap()
            .iter()
            .map(|t| t.value.as_str())
            .collect();
        assert_eq!(recovered, "varx=1+2;\nfoo(x)");
    }

    #[test]
    fn unexpected_character_is_fatal_with_location() {
        let err = scan("a\n  `").unwrap_err();
        match err {
            Error::UnexpectedChar { loc, found } => {
                assert_eq!(found, '`');
                assert_eq!((loc.line, loc.col), (1, 2));
            }
            other => panic!("expected UnexpectedChar, got {other}"),
        }
    }

    #[test]
    fn crlf_sources_tokenize_like_lf() {
        assert_eq!(kinds("a\r\nb"), kinds("a\nb"));
    }

    #[test]
    fn unterminated_block_comment_ends_at_eof() {
        assert_eq!(kinds("a /* never closed"), vec![TokenKind::Ident, TokenKind::End]);
    }
}
