//! Statement grammar.
//!
//! Keywords are ordinary identifiers; `parse_statement` dispatches on the
//! text of a leading `Ident`. A dispatched rule that fails fails the whole
//! statement; there is no fallback reinterpretation of `var ...` or `if ...`
//! as an expression. Non-keyword statements try assignment first, then a
//! bare expression statement. `case`/`default` terminate statement-list
//! parsing so switch arms can share the list walker.

use crate::ast::{
    Block, BlockStmt, Case, Catch, EnumDecl, EnumMember, ForLoop, FuncDecl, IfStmt, KwdStmt, Node,
    Switch, TryCatch, VarDecl,
};
use crate::parser::cursor::Cursor;
use crate::parser::expr::{fold_call, parse_decl_args, parse_expression, parse_expression_part};
use crate::token::TokenKind;

const ASSIGN_OPERATORS: &[TokenKind] = &[
    TokenKind::Assign,
    TokenKind::AssignAdd,
    TokenKind::AssignSub,
    TokenKind::AssignMul,
    TokenKind::AssignDiv,
    TokenKind::AssignOr,
    TokenKind::AssignAnd,
    TokenKind::AssignNullish,
];

/// Parse statements until one fails or a `}` is next.
pub(crate) fn parse_statements(cur: &mut Cursor) -> Vec<Node> {
    let mut stmts = Vec::new();
    loop {
        let Some(stmt) = parse_statement(cur) else {
            break;
        };
        stmts.push(stmt);
        if cur.match_kind(0, TokenKind::RCurly).is_some() {
            break;
        }
    }
    stmts
}

fn eat_semicolons(cur: &mut Cursor) {
    while cur.match_kind(0, TokenKind::Semi).is_some() {
        cur.advance(1);
    }
}

/// After a successful rule, consume the trailing semicolon run.
fn finish(cur: &mut Cursor, stmt: Option<Node>) -> Option<Node> {
    if stmt.is_some() {
        eat_semicolons(cur);
    }
    stmt
}

pub(crate) fn parse_statement(cur: &mut Cursor) -> Option<Node> {
    eat_semicolons(cur);

    let t = cur.at(0)?;
    if t.kind == TokenKind::Ident {
        if let Some(dispatched) = dispatch_keyword(cur, t.value.as_str()) {
            // A failed keyword rule fails the statement; no fallback.
            return finish(cur, dispatched);
        }
    }

    if let Some(assign) = parse_assign(cur) {
        return finish(cur, Some(assign));
    }

    let expr = parse_expression(cur, None);
    finish(cur, expr)
}

/// Route a statement keyword to its rule. Outer `None` means the
/// identifier is not a statement keyword and the caller should fall back
/// to assignment/expression parsing; `Some(None)` means the keyword's rule
/// rejected (or the keyword terminates the list, for `case`/`default`).
fn dispatch_keyword(cur: &mut Cursor, keyword: &str) -> Option<Option<Node>> {
    Some(match keyword {
        "var" | "static" => parse_var_decl(cur).map(Node::VarDecl),
        "if" => parse_if(cur),
        "for" => parse_for(cur),
        "enum" => parse_enum(cur),
        "while" => parse_block_stmt(cur, "while").map(Node::While),
        "with" => parse_block_stmt(cur, "with").map(Node::With),
        "repeat" => parse_block_stmt(cur, "repeat").map(Node::Repeat),
        "do" => parse_do_until(cur),
        "switch" => parse_switch(cur),
        "try" => parse_try(cur),
        "return" => parse_kwd_stmt(cur, "return", true).map(Node::Return),
        "new" => parse_kwd_stmt(cur, "new", true).map(Node::New),
        "delete" => parse_kwd_stmt(cur, "delete", true).map(Node::Delete),
        "continue" => parse_kwd_stmt(cur, "continue", false).map(Node::Continue),
        "break" => parse_kwd_stmt(cur, "break", false).map(Node::Break),
        "function" => parse_func_decl(cur, false).map(Node::FuncDecl),
        // Switch-arm labels end the enclosing statement list.
        "case" | "default" => None,
        _ => return None,
    })
}

/// `{ … }`
pub(crate) fn parse_block(cur: &mut Cursor) -> Option<Block> {
    let open = cur.match_kind(0, TokenKind::LCurly)?.clone();

    let sp = cur.save();
    cur.advance(1);

    let stmts = parse_statements(cur);

    let Some(close) = cur.match_kind(0, TokenKind::RCurly) else {
        cur.restore(sp);
        return None;
    };
    let close = close.clone();
    cur.advance(1);
    cur.commit(sp);

    Some(Block { open, close, stmts })
}

/// A body position: a block if `{` is next, otherwise a single statement.
fn parse_body(cur: &mut Cursor) -> Option<Node> {
    if let Some(block) = parse_block(cur) {
        return Some(Node::Block(block));
    }
    parse_statement(cur)
}

/// `var NAME` / `static NAME`, with an optional `= expr` initialiser.
fn parse_var_decl(cur: &mut Cursor) -> Option<VarDecl> {
    let keyword = cur
        .match_value(0, "var")
        .or_else(|| cur.match_value(0, "static"))?
        .clone();
    let name = cur.match_kind(1, TokenKind::Ident)?.clone();

    let sp = cur.save();
    cur.advance(2);

    let value = if cur.match_kind(0, TokenKind::Assign).is_some() {
        cur.advance(1);
        match parse_expression(cur, None) {
            Some(v) => Some(Box::new(v)),
            None => {
                cur.restore(sp);
                return None;
            }
        }
    } else {
        None
    };

    cur.commit(sp);
    Some(VarDecl {
        keyword,
        name,
        value,
    })
}

/// `lvalue OP expr` for `=` and its compound forms.
fn parse_assign(cur: &mut Cursor) -> Option<Node> {
    let sp = cur.save();

    let Some(left) = parse_expression(cur, None) else {
        cur.restore(sp);
        return None;
    };

    let Some(op) = cur.match_any(0, ASSIGN_OPERATORS) else {
        cur.restore(sp);
        return None;
    };
    let op = op.clone();
    cur.advance(1);

    let Some(right) = parse_expression(cur, None) else {
        cur.restore(sp);
        return None;
    };

    cur.commit(sp);
    Some(Node::Assign(crate::ast::Binop {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }))
}

/// `function NAME(args) [: Parent(args)] [constructor] { … }`, or the
/// anonymous form without a name when `anonymous` is set (expression
/// position).
pub(crate) fn parse_func_decl(cur: &mut Cursor, anonymous: bool) -> Option<FuncDecl> {
    let keyword = cur.match_value(0, "function")?.clone();

    let (name, consumed) = if anonymous {
        (None, 1)
    } else {
        let name = cur.match_kind(1, TokenKind::Ident)?.clone();
        (Some(name), 2)
    };

    let sp = cur.save();
    cur.advance(consumed);

    let Some(args) = parse_decl_args(cur) else {
        cur.restore(sp);
        return None;
    };

    let mut is_constructor = false;
    let mut parent = None;

    if cur.match_kind(0, TokenKind::Colon).is_some() {
        cur.advance(1);
        is_constructor = true;

        let Some(callee) = parse_expression_part(cur) else {
            cur.restore(sp);
            return None;
        };
        match fold_call(cur, callee) {
            Ok(call) => parent = Some(call),
            Err(_) => {
                cur.restore(sp);
                return None;
            }
        }
    }

    if cur.match_value(0, "constructor").is_some() {
        cur.advance(1);
        is_constructor = true;
    }

    let Some(body) = parse_block(cur) else {
        cur.restore(sp);
        return None;
    };

    cur.commit(sp);
    Some(FuncDecl {
        keyword,
        name,
        args,
        is_constructor,
        parent,
        body,
    })
}

/// The shared `kwd Condition Body` shape. Parentheses around the condition
/// are just a parenthesised expression, so they come out optional.
fn parse_block_stmt(cur: &mut Cursor, keyword: &str) -> Option<BlockStmt> {
    let kwd = cur.match_value(0, keyword)?.clone();

    let sp = cur.save();
    cur.advance(1);

    let Some(cond) = parse_expression(cur, None) else {
        cur.restore(sp);
        return None;
    };

    let Some(body) = parse_body(cur) else {
        cur.restore(sp);
        return None;
    };

    cur.commit(sp);
    Some(BlockStmt {
        keyword: kwd,
        cond: Box::new(cond),
        body: Box::new(body),
    })
}

/// `if ... {} else if ... {} else {}`. Else-if arms chain; each
/// body may be a block or a single statement.
fn parse_if(cur: &mut Cursor) -> Option<Node> {
    let sp = cur.save();

    let Some(head) = parse_block_stmt(cur, "if") else {
        cur.restore(sp);
        return None;
    };

    let mut elseifs = Vec::new();
    while cur.match_value(0, "else").is_some() && cur.match_value(1, "if").is_some() {
        cur.advance(1); // past `else`; the arm parses from `if`
        let Some(elif) = parse_block_stmt(cur, "if") else {
            cur.restore(sp);
            return None;
        };
        elseifs.push(elif);
    }

    let mut else_body = None;
    if cur.match_value(0, "else").is_some() {
        cur.advance(1);
        let Some(body) = parse_body(cur) else {
            cur.restore(sp);
            return None;
        };
        else_body = Some(Box::new(body));
    }

    cur.commit(sp);
    Some(Node::If(IfStmt {
        head,
        elseifs,
        else_body,
    }))
}

/// `for (var NAME = …; cond; step) Body`. The two inner semicolons are
/// mandatory; an extra trailing run before `)` is tolerated.
fn parse_for(cur: &mut Cursor) -> Option<Node> {
    let keyword = cur.match_value(0, "for")?.clone();
    cur.match_kind(1, TokenKind::LParen)?;
    cur.match_value(2, "var")?;

    let sp = cur.save();
    cur.advance(2); // past `for (`; the declaration rule consumes `var`

    let Some(init) = parse_var_decl(cur) else {
        cur.restore(sp);
        return None;
    };

    if cur.match_kind(0, TokenKind::Semi).is_none() {
        cur.restore(sp);
        return None;
    }
    cur.advance(1);

    let Some(cond) = parse_expression(cur, None) else {
        cur.restore(sp);
        return None;
    };

    if cur.match_kind(0, TokenKind::Semi).is_none() {
        cur.restore(sp);
        return None;
    }
    cur.advance(1);

    let Some(step) = parse_expression(cur, None) else {
        cur.restore(sp);
        return None;
    };

    eat_semicolons(cur);

    if cur.match_kind(0, TokenKind::RParen).is_none() {
        cur.restore(sp);
        return None;
    }
    cur.advance(1);

    // The body is stored unconditionally, whichever form it took.
    let Some(body) = parse_body(cur) else {
        cur.restore(sp);
        return None;
    };

    cur.commit(sp);
    Some(Node::For(ForLoop {
        keyword,
        init,
        cond: Box::new(cond),
        step: Box::new(step),
        body: Box::new(body),
    }))
}

/// `do Body until Cond`
fn parse_do_until(cur: &mut Cursor) -> Option<Node> {
    let keyword = cur.match_value(0, "do")?.clone();

    let sp = cur.save();
    cur.advance(1);

    let Some(body) = parse_body(cur) else {
        cur.restore(sp);
        return None;
    };

    if cur.match_value(0, "until").is_none() {
        cur.restore(sp);
        return None;
    }
    cur.advance(1);

    let Some(cond) = parse_expression(cur, None) else {
        cur.restore(sp);
        return None;
    };

    cur.commit(sp);
    Some(Node::DoUntil(BlockStmt {
        keyword,
        cond: Box::new(cond),
        body: Box::new(body),
    }))
}

/// `switch expr { case …: … default: … }`
fn parse_switch(cur: &mut Cursor) -> Option<Node> {
    let keyword = cur.match_value(0, "switch")?.clone();

    let sp = cur.save();
    cur.advance(1);

    let Some(subject) = parse_expression(cur, None) else {
        cur.restore(sp);
        return None;
    };

    if cur.match_kind(0, TokenKind::LCurly).is_none() {
        cur.restore(sp);
        return None;
    }
    cur.advance(1);

    let mut cases = Vec::new();
    while let Some(case) = parse_case(cur) {
        cases.push(case);
    }

    let Some(close) = cur.match_kind(0, TokenKind::RCurly) else {
        cur.restore(sp);
        return None;
    };
    let close = close.clone();
    cur.advance(1);

    cur.commit(sp);
    Some(Node::Switch(Switch {
        keyword,
        subject: Box::new(subject),
        cases,
        close,
    }))
}

/// One `case expr:` or `default:` arm, with its statement run.
fn parse_case(cur: &mut Cursor) -> Option<Case> {
    let is_default = cur.match_value(0, "default").is_some();
    let keyword = if is_default {
        cur.match_value(0, "default")?.clone()
    } else {
        cur.match_value(0, "case")?.clone()
    };

    let sp = cur.save();
    cur.advance(1);

    let value = if is_default {
        None
    } else {
        match parse_expression(cur, None) {
            Some(v) => Some(v),
            None => {
                cur.restore(sp);
                return None;
            }
        }
    };

    let Some(colon) = cur.match_kind(0, TokenKind::Colon) else {
        cur.restore(sp);
        return None;
    };
    let colon = colon.clone();
    cur.advance(1);

    let body = parse_statements(cur);

    cur.commit(sp);
    Some(Case {
        keyword,
        value,
        colon,
        body,
    })
}

/// `enum NAME { Member, Member = expr, }` with trailing comma tolerated.
fn parse_enum(cur: &mut Cursor) -> Option<Node> {
    let keyword = cur.match_value(0, "enum")?.clone();

    let sp = cur.save();
    cur.advance(1);

    let Some(name) = cur.match_kind(0, TokenKind::Ident) else {
        cur.restore(sp);
        return None;
    };
    let name = name.clone();
    cur.advance(1);

    if cur.match_kind(0, TokenKind::LCurly).is_none() {
        cur.restore(sp);
        return None;
    }
    cur.advance(1);

    let mut members = Vec::new();
    loop {
        match parse_enum_member(cur) {
            Some(member) => {
                members.push(member);
                if cur.match_kind(0, TokenKind::Comma).is_some() {
                    cur.advance(1);
                }
            }
            None => {
                if cur.match_kind(0, TokenKind::Comma).is_some() {
                    cur.advance(1);
                }
                break;
            }
        }
    }

    let Some(close) = cur.match_kind(0, TokenKind::RCurly) else {
        cur.restore(sp);
        return None;
    };
    let close = close.clone();
    cur.advance(1);

    cur.commit(sp);
    Some(Node::Enum(EnumDecl {
        keyword,
        name,
        members,
        close,
    }))
}

fn parse_enum_member(cur: &mut Cursor) -> Option<EnumMember> {
    let name = cur.match_kind(0, TokenKind::Ident)?.clone();

    let sp = cur.save();

    if cur.match_kind(1, TokenKind::Assign).is_none() {
        cur.advance(1);
        cur.commit(sp);
        return Some(EnumMember { name, value: None });
    }

    cur.advance(2);
    let Some(value) = parse_expression(cur, None) else {
        cur.restore(sp);
        return None;
    };

    cur.commit(sp);
    Some(EnumMember {
        name,
        value: Some(value),
    })
}

/// `try {} catch (IDENT) {} finally {}`. Catch and finally are
/// each optional and accepted independently.
fn parse_try(cur: &mut Cursor) -> Option<Node> {
    let keyword = cur.match_value(0, "try")?.clone();

    let sp = cur.save();
    cur.advance(1);

    let Some(try_block) = parse_block(cur) else {
        cur.restore(sp);
        return None;
    };

    let mut catch = None;
    if cur.match_value(0, "catch").is_some() {
        cur.advance(1);

        if cur.match_kind(0, TokenKind::LParen).is_none() {
            cur.restore(sp);
            return None;
        }
        cur.advance(1);

        let Some(ident) = cur.match_kind(0, TokenKind::Ident) else {
            cur.restore(sp);
            return None;
        };
        let ident = ident.clone();
        cur.advance(1);

        if cur.match_kind(0, TokenKind::RParen).is_none() {
            cur.restore(sp);
            return None;
        }
        cur.advance(1);

        let Some(block) = parse_block(cur) else {
            cur.restore(sp);
            return None;
        };
        catch = Some(Catch { ident, block });
    }

    let mut finally = None;
    if cur.match_value(0, "finally").is_some() {
        cur.advance(1);
        let Some(block) = parse_block(cur) else {
            cur.restore(sp);
            return None;
        };
        finally = Some(block);
    }

    cur.commit(sp);
    Some(Node::TryCatch(TryCatch {
        keyword,
        try_block,
        catch,
        finally,
    }))
}

/// Keyword statement: `return`/`new`/`delete` take an optional value,
/// `continue`/`break` take none.
fn parse_kwd_stmt(cur: &mut Cursor, keyword: &str, takes_value: bool) -> Option<KwdStmt> {
    let kwd = cur.match_value(0, keyword)?.clone();

    let sp = cur.save();
    cur.advance(1);

    let value = if takes_value {
        parse_expression(cur, None).map(Box::new)
    } else {
        None
    };

    cur.commit(sp);
    Some(KwdStmt {
        keyword: kwd,
        value,
    })
}
