//! Backtracking recursive-descent parser over cleaned token streams.
//!
//! The single entry point is [`parse_script`]. Rules communicate failure
//! with `Option`; "not applicable" is normal control flow between
//! alternatives and never reaches the caller. The only user-visible parser
//! error is the furthest-watermark diagnostic produced when statement-list
//! parsing stops before the `End` token.

mod cursor;
mod expr;
mod stmt;

pub use cursor::{Cursor, Savepoint};

use crate::ast::{Node, Script};
use crate::error::{Error, Result};
use crate::token::{Token, TokenKind};

/// Parse a cleaned token stream into a `Script` node.
///
/// The stream must already have been through the macro engine. `clean`
/// strips every `Newline` unconditionally (debug-asserted; a leftover is
/// a pipeline bug); a stray `Hash` or `Backslash` from a malformed
/// directive legitimately survives cleaning and is rejected here as a
/// parse failure.
pub fn parse_script(tokens: &[Token]) -> Result<Node> {
    debug_assert!(
        tokens.iter().all(|t| t.kind != TokenKind::Newline),
        "parser fed an uncleaned token stream"
    );

    if tokens.is_empty() {
        return Ok(Node::Script(Script::default()));
    }

    let mut cur = Cursor::new(tokens);
    let children = stmt::parse_statements(&mut cur);

    debug_assert_eq!(cur.depth(), 0, "unbalanced savepoints after parse");

    if cur.furthest() < tokens.len() {
        let t = &tokens[cur.furthest()];
        if t.kind != TokenKind::End {
            return Err(Error::ParseFailed {
                token: t.to_string(),
                loc: t.loc,
            });
        }
    }

    Ok(Node::Script(Script { children }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::AstKind;
    use crate::lexer::scan;
    use crate::macros::{clean_tokens, MacroTable};

    fn parse(src: &str) -> Result<Node> {
        let tokens = clean_tokens(scan(src).unwrap(), &MacroTable::new());
        parse_script(&tokens)
    }

    fn children(node: &Node) -> &[Node] {
        match node {
            Node::Script(s) => &s.children,
            other => panic!("expected Script, got {:?}", other.kind()),
        }
    }

    #[test]
    fn empty_stream_is_empty_script() {
        let node = parse_script(&[]).unwrap();
        assert!(children(&node).is_empty());
    }

    #[test]
    fn empty_source_is_empty_script() {
        let node = parse("").unwrap();
        assert!(children(&node).is_empty());
    }

    #[test]
    fn statement_kinds_dispatch() {
        let node = parse(
            "var a = 1;\n\
             static b = 2;\n\
             if (a) b = 3;\n\
             while (a) { b += 1; }\n\
             repeat 3 b += 1;\n\
             with other { x = 0; }\n\
             do { b -= 1; } until b == 0\n\
             return a;",
        )
        .unwrap();
        let kinds: Vec<AstKind> = children(&node).iter().map(Node::kind).collect();
        assert_eq!(
            kinds,
            [
                AstKind::VarDecl,
                AstKind::VarDecl,
                AstKind::If,
                AstKind::While,
                AstKind::Repeat,
                AstKind::With,
                AstKind::DoUntil,
                AstKind::Return,
            ]
        );
    }

    #[test]
    fn failure_reports_furthest_token() {
        // The declaration rule consumes up to the `=` before failing, so
        // the watermark lands on the `;` its expression rejected.
        let err = parse("var x = ;").unwrap_err();
        match err {
            Error::ParseFailed { token, loc } => {
                assert_eq!(token, "TOK<SEMI, ;>");
                assert_eq!(loc.line, 0);
            }
            other => panic!("expected ParseFailed, got {other}"),
        }
    }

    #[test]
    fn failure_location_is_one_based_in_message() {
        let err = parse("x = 1;\n)").unwrap_err();
        assert_eq!(err.to_string(), "failed at token TOK<RPAREN, )> at 2:1");
    }

    #[test]
    fn trailing_garbage_fails_even_after_good_statements() {
        assert!(parse("a = 1; ]").is_err());
    }

    #[test]
    fn complete_parse_succeeds() {
        assert!(parse("x = 1; y = x + 2;").is_ok());
    }

    #[test]
    fn stray_directive_tokens_are_rejected_not_panicked() {
        // A `#` that is not part of a `#macro` definition survives
        // cleaning; it must surface as a parse failure.
        let err = parse("x = #;").unwrap_err();
        assert!(matches!(err, Error::ParseFailed { .. }));
    }
}
