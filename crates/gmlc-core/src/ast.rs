//! AST node types for parsed GML scripts.
//!
//! The tree is a tagged sum: one `Node` variant per `AstKind`, with payload
//! structs owning their children. Location queries (`start`/`end`) are
//! exhaustive matches over the variants. Nodes are never mutated after
//! construction; the parser builds them bottom-up and ownership roots at the
//! `Script` node handed back to the caller.

use crate::token::{Location, Token};

/// Discriminator for AST nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AstKind {
    Script,
    Block,
    Ident,
    LitString,
    LitNumber,
    LitBool,
    LitArray,
    LitStruct,
    StructField,
    Enum,
    VarDecl,
    Assign,
    Binop,
    UnopPrefix,
    UnopPostfix,
    Ternary,
    Call,
    Attr,
    Access,
    FuncDecl,
    Arg,
    If,
    For,
    While,
    With,
    Repeat,
    DoUntil,
    Switch,
    Case,
    TryCatch,
    Return,
    New,
    Delete,
    Continue,
    Break,
}

impl std::fmt::Display for AstKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// A parsed AST node.
#[derive(Debug, Clone)]
pub enum Node {
    Script(Script),
    Block(Block),
    Ident(Simple),
    LitString(Simple),
    LitNumber(Simple),
    LitBool(Simple),
    LitArray(ArrayLit),
    LitStruct(StructLit),
    Enum(EnumDecl),
    VarDecl(VarDecl),
    Assign(Binop),
    Binop(Binop),
    UnopPrefix(Unop),
    UnopPostfix(Unop),
    Ternary(Ternary),
    Call(Call),
    Attr(Attr),
    Access(Access),
    FuncDecl(FuncDecl),
    If(IfStmt),
    For(ForLoop),
    While(BlockStmt),
    With(BlockStmt),
    Repeat(BlockStmt),
    DoUntil(BlockStmt),
    Switch(Switch),
    TryCatch(TryCatch),
    Return(KwdStmt),
    New(KwdStmt),
    Delete(KwdStmt),
    Continue(KwdStmt),
    Break(KwdStmt),
}

/// A whole script: the list of top-level statements.
#[derive(Debug, Clone, Default)]
pub struct Script {
    pub children: Vec<Node>,
}

/// `{ … }` statement block.
#[derive(Debug, Clone)]
pub struct Block {
    pub open: Token,
    pub close: Token,
    pub stmts: Vec<Node>,
}

/// A single-token leaf: identifier or literal.
#[derive(Debug, Clone)]
pub struct Simple {
    pub token: Token,
}

/// `[a, b, c]`
#[derive(Debug, Clone)]
pub struct ArrayLit {
    pub open: Token,
    pub close: Token,
    pub items: Vec<Node>,
}

/// `{ name: value, shorthand }`
#[derive(Debug, Clone)]
pub struct StructLit {
    pub open: Token,
    pub close: Token,
    pub fields: Vec<Field>,
}

/// One struct-literal field; `value` is `None` for the shorthand form.
#[derive(Debug, Clone)]
pub struct Field {
    pub name: Token,
    pub value: Option<Node>,
}

/// `enum Name { A, B = expr, }`
#[derive(Debug, Clone)]
pub struct EnumDecl {
    pub keyword: Token,
    pub name: Token,
    pub members: Vec<EnumMember>,
    pub close: Token,
}

#[derive(Debug, Clone)]
pub struct EnumMember {
    pub name: Token,
    pub value: Option<Node>,
}

/// `var x = expr` / `static x = expr`.
#[derive(Debug, Clone)]
pub struct VarDecl {
    pub keyword: Token,
    pub name: Token,
    pub value: Option<Box<Node>>,
}

/// Binary operation; also the payload of `Assign` (the operator token
/// distinguishes `=` from its compound forms).
#[derive(Debug, Clone)]
pub struct Binop {
    pub op: Token,
    pub left: Box<Node>,
    pub right: Box<Node>,
}

/// Prefix or postfix unary operation; the enclosing variant says which.
#[derive(Debug, Clone)]
pub struct Unop {
    pub op: Token,
    pub value: Box<Node>,
}

#[derive(Debug, Clone)]
pub struct Ternary {
    pub cond: Box<Node>,
    pub on_true: Box<Node>,
    pub on_false: Box<Node>,
}

#[derive(Debug, Clone)]
pub struct Call {
    pub func: Box<Node>,
    pub open: Token,
    pub close: Token,
    pub args: Vec<Node>,
}

/// `base.name`
#[derive(Debug, Clone)]
pub struct Attr {
    pub value: Box<Node>,
    pub name: Token,
}

/// Indexing through `[`, `[|`, `[?`, `[#`, `[@`, or `[$`. `second` is
/// populated only for grid (`[#`) accessors.
#[derive(Debug, Clone)]
pub struct Access {
    pub accessor: Token,
    pub value: Box<Node>,
    pub index: Box<Node>,
    pub second: Option<Box<Node>>,
    pub close: Token,
}

/// Named or anonymous function declaration. `parent` is populated only
/// when constructor-inheritance syntax (`: Parent(…) constructor`)
/// appeared.
#[derive(Debug, Clone)]
pub struct FuncDecl {
    pub keyword: Token,
    pub name: Option<Token>,
    pub args: Vec<Arg>,
    pub is_constructor: bool,
    pub parent: Option<Call>,
    pub body: Block,
}

/// One formal argument, with an optional default expression.
#[derive(Debug, Clone)]
pub struct Arg {
    pub name: Token,
    pub default: Option<Node>,
}

/// The shared `keyword (condition) body` shape used by `while`, `with`,
/// `repeat`, `do…until`, and the arms of `if`. The parentheses around the
/// condition and the braces around the body are both optional.
#[derive(Debug, Clone)]
pub struct BlockStmt {
    pub keyword: Token,
    pub cond: Box<Node>,
    pub body: Box<Node>,
}

#[derive(Debug, Clone)]
pub struct IfStmt {
    pub head: BlockStmt,
    pub elseifs: Vec<BlockStmt>,
    pub else_body: Option<Box<Node>>,
}

#[derive(Debug, Clone)]
pub struct ForLoop {
    pub keyword: Token,
    pub init: VarDecl,
    pub cond: Box<Node>,
    pub step: Box<Node>,
    pub body: Box<Node>,
}

#[derive(Debug, Clone)]
pub struct Switch {
    pub keyword: Token,
    pub subject: Box<Node>,
    pub cases: Vec<Case>,
    pub close: Token,
}

/// One `case expr:` or `default:` arm. `value` is `None` for `default`.
#[derive(Debug, Clone)]
pub struct Case {
    pub keyword: Token,
    pub value: Option<Node>,
    pub colon: Token,
    pub body: Vec<Node>,
}

#[derive(Debug, Clone)]
pub struct TryCatch {
    pub keyword: Token,
    pub try_block: Block,
    pub catch: Option<Catch>,
    pub finally: Option<Block>,
}

#[derive(Debug, Clone)]
pub struct Catch {
    pub ident: Token,
    pub block: Block,
}

/// Keyword statement with an optional value: `return`, `new`, `delete`
/// (value optional), `continue`, `break` (no value).
#[derive(Debug, Clone)]
pub struct KwdStmt {
    pub keyword: Token,
    pub value: Option<Box<Node>>,
}

impl Block {
    pub fn start(&self) -> Location {
        self.open.loc
    }

    pub fn end(&self) -> Location {
        self.close.loc
    }
}

impl Node {
    pub fn kind(&self) -> AstKind {
        match self {
            Node::Script(_) => AstKind::Script,
            Node::Block(_) => AstKind::Block,
            Node::Ident(_) => AstKind::Ident,
            Node::LitString(_) => AstKind::LitString,
            Node::LitNumber(_) => AstKind::LitNumber,
            Node::LitBool(_) => AstKind::LitBool,
            Node::LitArray(_) => AstKind::LitArray,
            Node::LitStruct(_) => AstKind::LitStruct,
            Node::Enum(_) => AstKind::Enum,
            Node::VarDecl(_) => AstKind::VarDecl,
            Node::Assign(_) => AstKind::Assign,
            Node::Binop(_) => AstKind::Binop,
            Node::UnopPrefix(_) => AstKind::UnopPrefix,
            Node::UnopPostfix(_) => AstKind::UnopPostfix,
            Node::Ternary(_) => AstKind::Ternary,
            Node::Call(_) => AstKind::Call,
            Node::Attr(_) => AstKind::Attr,
            Node::Access(_) => AstKind::Access,
            Node::FuncDecl(_) => AstKind::FuncDecl,
            Node::If(_) => AstKind::If,
            Node::For(_) => AstKind::For,
            Node::While(_) => AstKind::While,
            Node::With(_) => AstKind::With,
            Node::Repeat(_) => AstKind::Repeat,
            Node::DoUntil(_) => AstKind::DoUntil,
            Node::Switch(_) => AstKind::Switch,
            Node::TryCatch(_) => AstKind::TryCatch,
            Node::Return(_) => AstKind::Return,
            Node::New(_) => AstKind::New,
            Node::Delete(_) => AstKind::Delete,
            Node::Continue(_) => AstKind::Continue,
            Node::Break(_) => AstKind::Break,
        }
    }

    /// Source location of the first token covered by this node.
    pub fn start(&self) -> Location {
        match self {
            Node::Script(s) => s.children.first().map(Node::start).unwrap_or_default(),
            Node::Block(b) => b.start(),
            Node::Ident(s) | Node::LitString(s) | Node::LitNumber(s) | Node::LitBool(s) => {
                s.token.loc
            }
            Node::LitArray(a) => a.open.loc,
            Node::LitStruct(s) => s.open.loc,
            Node::Enum(e) => e.keyword.loc,
            Node::VarDecl(v) => v.keyword.loc,
            Node::Assign(b) | Node::Binop(b) => b.left.start(),
            Node::UnopPrefix(u) => u.op.loc,
            Node::UnopPostfix(u) => u.value.start(),
            Node::Ternary(t) => t.cond.start(),
            Node::Call(c) => c.func.start(),
            Node::Attr(a) => a.value.start(),
            Node::Access(a) => a.value.start(),
            Node::FuncDecl(f) => f.keyword.loc,
            Node::If(i) => i.head.keyword.loc,
            Node::For(f) => f.keyword.loc,
            Node::While(b) | Node::With(b) | Node::Repeat(b) | Node::DoUntil(b) => b.keyword.loc,
            Node::Switch(s) => s.keyword.loc,
            Node::TryCatch(t) => t.keyword.loc,
            Node::Return(k) | Node::New(k) | Node::Delete(k) | Node::Continue(k)
            | Node::Break(k) => k.keyword.loc,
        }
    }

    /// Source location of the last token covered by this node.
    pub fn end(&self) -> Location {
        match self {
            Node::Script(s) => s.children.last().map(Node::end).unwrap_or_default(),
            Node::Block(b) => b.end(),
            Node::Ident(s) | Node::LitString(s) | Node::LitNumber(s) | Node::LitBool(s) => {
                s.token.loc
            }
            Node::LitArray(a) => a.close.loc,
            Node::LitStruct(s) => s.close.loc,
            Node::Enum(e) => e.close.loc,
            Node::VarDecl(v) => v.value.as_deref().map(Node::end).unwrap_or(v.name.loc),
            Node::Assign(b) | Node::Binop(b) => b.right.end(),
            Node::UnopPrefix(u) => u.value.end(),
            Node::UnopPostfix(u) => u.op.loc,
            Node::Ternary(t) => t.on_false.end(),
            Node::Call(c) => c.close.loc,
            Node::Attr(a) => a.name.loc,
            Node::Access(a) => a.close.loc,
            Node::FuncDecl(f) => f.body.end(),
            Node::If(i) => match (&i.else_body, i.elseifs.last()) {
                (Some(e), _) => e.end(),
                (None, Some(elif)) => elif.body.end(),
                (None, None) => i.head.body.end(),
            },
            Node::For(f) => f.body.end(),
            Node::While(b) | Node::With(b) | Node::Repeat(b) | Node::DoUntil(b) => b.body.end(),
            Node::Switch(s) => s.close.loc,
            Node::TryCatch(t) => {
                if let Some(fin) = &t.finally {
                    fin.end()
                } else if let Some(catch) = &t.catch {
                    catch.block.end()
                } else {
                    t.try_block.end()
                }
            }
            Node::Return(k) | Node::New(k) | Node::Delete(k) | Node::Continue(k)
            | Node::Break(k) => k.value.as_deref().map(Node::end).unwrap_or(k.keyword.loc),
        }
    }
}
