//! Expression parsing: a prefix part plus a left-folding suffix loop.
//!
//! There is no precedence table. After the prefix part, the loop repeatedly
//! absorbs whichever suffix comes next (binary operator, postfix `++`/`--`,
//! ternary, attribute, call, or accessor), folding the accumulated node as
//! the left operand each time. Binary chains therefore fold strictly
//! left-associatively with flat precedence; that is the language contract
//! here, not an omission. The fold loop also keeps deep suffix chains like
//! `a.b.c().d[e]` iterative instead of recursive.

use crate::ast::{
    Access, Arg, ArrayLit, Binop, Call, Field, KwdStmt, Node, Simple, StructLit, Ternary, Unop,
};
use crate::parser::cursor::Cursor;
use crate::parser::stmt::parse_func_decl;
use crate::token::{Token, TokenKind};

const BINARY_OPERATORS: &[TokenKind] = &[
    TokenKind::Plus,
    TokenKind::Minus,
    TokenKind::Div,
    TokenKind::Mul,
    TokenKind::Mod,
    TokenKind::IntDiv,
    TokenKind::And,
    TokenKind::Or,
    TokenKind::BitAnd,
    TokenKind::BitOr,
    TokenKind::BitXor,
    TokenKind::Leq,
    TokenKind::Geq,
    TokenKind::Eq,
    TokenKind::Neq,
    TokenKind::Less,
    TokenKind::More,
    TokenKind::Shl,
    TokenKind::Shr,
    TokenKind::Nullish,
];

const UNARY_OPERATORS: &[TokenKind] = &[
    TokenKind::Minus,
    TokenKind::Exclam,
    TokenKind::BitNot,
    TokenKind::Inc,
    TokenKind::Dec,
];

const ACCESSOR_OPENERS: &[TokenKind] = &[
    TokenKind::LSquare,
    TokenKind::AccList,
    TokenKind::AccMap,
    TokenKind::AccGrid,
    TokenKind::AccArray,
    TokenKind::AccStruct,
];

/// The binary operator at the cursor, if any. `and`/`or`/`mod`/`div`
/// identifiers are rewritten into their symbolic operator tokens here; no
/// keyword layer exists below the parser.
fn binary_operator_at(cur: &Cursor) -> Option<Token> {
    if let Some(op) = cur.match_any(0, BINARY_OPERATORS) {
        return Some(op.clone());
    }
    let ident = cur.match_kind(0, TokenKind::Ident)?;
    let kind = match ident.value.as_str() {
        "and" => TokenKind::And,
        "or" => TokenKind::Or,
        "mod" => TokenKind::Mod,
        "div" => TokenKind::IntDiv,
        _ => return None,
    };
    Some(ident.with_kind(kind))
}

/// Parse an expression. With `seed`, continue folding suffixes onto an
/// already-parsed left operand instead of starting from a prefix part.
pub(crate) fn parse_expression(cur: &mut Cursor, seed: Option<Node>) -> Option<Node> {
    let mut expr = match seed {
        Some(e) => e,
        None => parse_expression_part(cur)?,
    };

    loop {
        let Some(next) = cur.at(0) else { break };

        if let Some(op) = binary_operator_at(cur) {
            let sp = cur.save();
            cur.advance(1);
            match parse_expression_part(cur) {
                Some(right) => {
                    cur.commit(sp);
                    expr = Node::Binop(Binop {
                        op,
                        left: Box::new(expr),
                        right: Box::new(right),
                    });
                    continue;
                }
                None => {
                    cur.restore(sp);
                    break;
                }
            }
        }

        match next.kind {
            TokenKind::Inc | TokenKind::Dec => {
                let op = next.clone();
                cur.advance(1);
                expr = Node::UnopPostfix(Unop {
                    op,
                    value: Box::new(expr),
                });
            }
            TokenKind::Question => match fold_ternary(cur, expr) {
                Ok(folded) => expr = folded,
                Err(unchanged) => {
                    expr = unchanged;
                    break;
                }
            },
            TokenKind::Dot => {
                let Some(name) = cur.match_kind(1, TokenKind::Ident) else {
                    break;
                };
                let name = name.clone();
                cur.advance(2);
                expr = Node::Attr(crate::ast::Attr {
                    value: Box::new(expr),
                    name,
                });
            }
            TokenKind::LParen => match fold_call(cur, expr) {
                Ok(call) => expr = Node::Call(call),
                Err(unchanged) => {
                    expr = unchanged;
                    break;
                }
            },
            k if ACCESSOR_OPENERS.contains(&k) => match fold_access(cur, expr) {
                Ok(folded) => expr = folded,
                Err(unchanged) => {
                    expr = unchanged;
                    break;
                }
            },
            _ => break,
        }
    }

    Some(expr)
}

/// `cond ? on_true : on_false`
fn fold_ternary(cur: &mut Cursor, cond: Node) -> Result<Node, Node> {
    let sp = cur.save();
    cur.advance(1); // `?`

    let Some(on_true) = parse_expression(cur, None) else {
        cur.restore(sp);
        return Err(cond);
    };
    if cur.match_kind(0, TokenKind::Colon).is_none() {
        cur.restore(sp);
        return Err(cond);
    }
    cur.advance(1);
    let Some(on_false) = parse_expression(cur, None) else {
        cur.restore(sp);
        return Err(cond);
    };

    cur.commit(sp);
    Ok(Node::Ternary(Ternary {
        cond: Box::new(cond),
        on_true: Box::new(on_true),
        on_false: Box::new(on_false),
    }))
}

/// `callee(a, b, ...)`. Also used for the parent-constructor call in
/// function declarations, which is why it returns the bare `Call`.
pub(crate) fn fold_call(cur: &mut Cursor, callee: Node) -> Result<Call, Node> {
    let Some(open) = cur.match_kind(0, TokenKind::LParen) else {
        return Err(callee);
    };
    let open = open.clone();

    let sp = cur.save();
    cur.advance(1);

    let mut args = Vec::new();
    while let Some(arg) = parse_expression(cur, None) {
        args.push(arg);
        if cur.match_kind(0, TokenKind::Comma).is_none() {
            break;
        }
        cur.advance(1);
    }

    let Some(close) = cur.match_kind(0, TokenKind::RParen) else {
        cur.restore(sp);
        return Err(callee);
    };
    let close = close.clone();
    cur.advance(1);
    cur.commit(sp);

    Ok(Call {
        func: Box::new(callee),
        open,
        close,
        args,
    })
}

/// `base[i]` and the typed accessors; grid (`[#`) takes an optional
/// second index after a comma.
fn fold_access(cur: &mut Cursor, base: Node) -> Result<Node, Node> {
    let Some(opener) = cur.match_any(0, ACCESSOR_OPENERS) else {
        return Err(base);
    };
    let opener = opener.clone();

    let sp = cur.save();
    cur.advance(1);

    let Some(index) = parse_expression(cur, None) else {
        cur.restore(sp);
        return Err(base);
    };

    let mut second = None;
    if opener.kind == TokenKind::AccGrid && cur.match_kind(0, TokenKind::Comma).is_some() {
        cur.advance(1);
        match parse_expression(cur, None) {
            Some(s) => second = Some(Box::new(s)),
            None => {
                cur.restore(sp);
                return Err(base);
            }
        }
    }

    let Some(close) = cur.match_kind(0, TokenKind::RSquare) else {
        cur.restore(sp);
        return Err(base);
    };
    let close = close.clone();
    cur.advance(1);
    cur.commit(sp);

    Ok(Node::Access(Access {
        accessor: opener,
        value: Box::new(base),
        index: Box::new(index),
        second,
        close,
    }))
}

/// Prefix expression: anonymous function, `new`, identifier, prefix unary,
/// literal, or parenthesised expression.
pub(crate) fn parse_expression_part(cur: &mut Cursor) -> Option<Node> {
    let t = cur.at(0)?;

    if t.kind == TokenKind::Ident {
        match t.value.as_str() {
            "function" => return parse_func_decl(cur, true).map(Node::FuncDecl),
            "new" => {
                let keyword = t.clone();
                cur.advance(1);
                let value = parse_expression(cur, None).map(Box::new);
                return Some(Node::New(KwdStmt { keyword, value }));
            }
            "true" | "false" => {
                let token = t.clone();
                cur.advance(1);
                return Some(Node::LitBool(Simple { token }));
            }
            _ => {
                let token = t.clone();
                cur.advance(1);
                return Some(Node::Ident(Simple { token }));
            }
        }
    }

    if let Some(op) = cur.match_any(0, UNARY_OPERATORS) {
        let op = op.clone();
        let sp = cur.save();
        cur.advance(1);
        match parse_expression(cur, None) {
            Some(value) => {
                cur.commit(sp);
                return Some(Node::UnopPrefix(Unop {
                    op,
                    value: Box::new(value),
                }));
            }
            None => cur.restore(sp),
        }
    }

    if let Some(lit) = parse_literal(cur) {
        return Some(lit);
    }

    if cur.match_kind(0, TokenKind::LParen).is_some() {
        let sp = cur.save();
        cur.advance(1);
        if let Some(inner) = parse_expression(cur, None) {
            if cur.match_kind(0, TokenKind::RParen).is_some() {
                cur.advance(1);
                cur.commit(sp);
                return Some(inner);
            }
        }
        cur.restore(sp);
    }

    None
}

fn parse_literal(cur: &mut Cursor) -> Option<Node> {
    if let Some(num) = cur.match_kind(0, TokenKind::Number) {
        let token = num.clone();
        cur.advance(1);
        return Some(Node::LitNumber(Simple { token }));
    }

    if let Some(s) = cur.match_kind(0, TokenKind::Str) {
        let token = s.clone();
        cur.advance(1);
        return Some(Node::LitString(Simple { token }));
    }

    if let Some(arr) = parse_array(cur) {
        return Some(Node::LitArray(arr));
    }

    parse_struct(cur).map(Node::LitStruct)
}

/// `[a, b, c]`
fn parse_array(cur: &mut Cursor) -> Option<ArrayLit> {
    let open = cur.match_kind(0, TokenKind::LSquare)?.clone();

    let sp = cur.save();
    cur.advance(1);

    let mut items = Vec::new();
    while let Some(item) = parse_expression(cur, None) {
        items.push(item);
        if cur.match_kind(0, TokenKind::Comma).is_none() {
            break;
        }
        cur.advance(1);
    }

    let Some(close) = cur.match_kind(0, TokenKind::RSquare) else {
        cur.restore(sp);
        return None;
    };
    let close = close.clone();
    cur.advance(1);
    cur.commit(sp);

    Some(ArrayLit { open, close, items })
}

/// `{ name: value, shorthand }`
fn parse_struct(cur: &mut Cursor) -> Option<StructLit> {
    let open = cur.match_kind(0, TokenKind::LCurly)?.clone();

    let sp = cur.save();
    cur.advance(1);

    let mut fields = Vec::new();
    while let Some(field) = parse_struct_field(cur) {
        fields.push(field);
        if cur.match_kind(0, TokenKind::Comma).is_none() {
            break;
        }
        cur.advance(1);
    }

    let Some(close) = cur.match_kind(0, TokenKind::RCurly) else {
        cur.restore(sp);
        return None;
    };
    let close = close.clone();
    cur.advance(1);
    cur.commit(sp);

    Some(StructLit { open, close, fields })
}

fn parse_struct_field(cur: &mut Cursor) -> Option<Field> {
    let name = cur.match_kind(0, TokenKind::Ident)?.clone();
    let has_value = cur.match_kind(1, TokenKind::Colon).is_some();

    let sp = cur.save();
    let value = if has_value {
        cur.advance(2);
        match parse_expression(cur, None) {
            Some(v) => Some(v),
            None => {
                cur.restore(sp);
                return None;
            }
        }
    } else {
        cur.advance(1);
        None
    };

    cur.commit(sp);
    Some(Field { name, value })
}

/// Parse the argument list of a declaration: `(a, b = expr)`.
pub(crate) fn parse_decl_args(cur: &mut Cursor) -> Option<Vec<Arg>> {
    cur.match_kind(0, TokenKind::LParen)?;

    let sp = cur.save();
    cur.advance(1);

    let mut args = Vec::new();
    while let Some(arg) = parse_decl_arg(cur) {
        args.push(arg);
        if cur.match_kind(0, TokenKind::Comma).is_none() {
            break;
        }
        cur.advance(1);
    }

    if cur.match_kind(0, TokenKind::RParen).is_none() {
        cur.restore(sp);
        return None;
    }
    cur.advance(1);
    cur.commit(sp);
    Some(args)
}

fn parse_decl_arg(cur: &mut Cursor) -> Option<Arg> {
    let name = cur.match_kind(0, TokenKind::Ident)?.clone();

    let sp = cur.save();
    cur.advance(1);

    let default = if cur.match_kind(0, TokenKind::Assign).is_some() {
        cur.advance(1);
        match parse_expression(cur, None) {
            Some(d) => Some(d),
            None => {
                cur.restore(sp);
                return None;
            }
        }
    } else {
        None
    };

    cur.commit(sp);
    Some(Arg { name, default })
}
