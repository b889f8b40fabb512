//! Abstract Syntax Tree definitions for KPL
//!
//! Every node the parser builds lives here. Nodes form a strict tree owned by their parent; the root is a
//! [`Program`] holding the header and code files of one source document.
//!
//! ## Notes
//! - Positions are carried by [`Spanned`] wrappers, not by the node types themselves.
//! - Section keywords (`const`, `var`, `type`, ...) are flattened: each entry of a section becomes its own
//!   [`Declaration`].

use std::fmt;

/// Source location span.
///
/// `start`/`end` are byte offsets into the source; `line`/`column` are 1-based and point at `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(start: usize, end: usize, line: usize, column: usize) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }

    /// Smallest span covering both `self` and `other`. Line/column come from whichever starts first.
    pub fn merge(self, other: Span) -> Span {
        let (first, _) = if self.start <= other.start {
            (self, other)
        } else {
            (other, self)
        };
        Span {
            start: first.start,
            end: self.end.max(other.end),
            line: first.line,
            column: first.column,
        }
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A node with source location
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

pub type Ident = String;

/// A parsed source document: one or more header/code files.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    /// Path or URI of the document, if known. Used for labeling only.
    pub file: Option<String>,
    pub units: Vec<Spanned<FileUnit>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FileUnit {
    Header(HeaderFile),
    Code(CodeFile),
}

impl FileUnit {
    pub fn name(&self) -> &str {
        match self {
            FileUnit::Header(h) => &h.name,
            FileUnit::Code(c) => &c.name,
        }
    }

    pub fn declarations(&self) -> &[Spanned<Declaration>] {
        match self {
            FileUnit::Header(h) => &h.declarations,
            FileUnit::Code(c) => &c.declarations,
        }
    }
}

/// `header NAME [uses ...] decls endHeader`
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderFile {
    pub name: Ident,
    pub uses: Vec<UsesItem>,
    pub declarations: Vec<Spanned<Declaration>>,
}

/// `code NAME decls endCode`
#[derive(Debug, Clone, PartialEq)]
pub struct CodeFile {
    pub name: Ident,
    pub declarations: Vec<Spanned<Declaration>>,
}

// ============================================================================
// Uses clauses
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct UsesItem {
    pub package: PackageName,
    pub renamings: Vec<Renaming>,
}

/// A package is named either by identifier or by a string path.
#[derive(Debug, Clone, PartialEq)]
pub enum PackageName {
    Ident(Ident),
    String(String),
}

/// `renaming from to to`
#[derive(Debug, Clone, PartialEq)]
pub struct Renaming {
    pub from: Ident,
    pub to: Ident,
}

// ============================================================================
// Declarations
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    Constant(ConstantDecl),
    Error(ErrorDecl),
    Var(VarDecl),
    Enum(EnumDecl),
    Type(TypeDecl),
    FunctionProto(FunctionProto),
    Function(FunctionDecl),
    Interface(InterfaceDecl),
    Class(ClassDecl),
    Behavior(BehaviorDecl),
}

impl Declaration {
    /// Name the declaration introduces. Variable declarations return their first name.
    pub fn name(&self) -> Option<&str> {
        match self {
            Declaration::Constant(d) => Some(&d.name),
            Declaration::Error(d) => Some(&d.name),
            Declaration::Var(d) => d.names.first().map(String::as_str),
            Declaration::Enum(d) => d.members.first().map(String::as_str),
            Declaration::Type(d) => Some(&d.name),
            Declaration::FunctionProto(d) => Some(&d.name),
            Declaration::Function(d) => d.name.as_deref(),
            Declaration::Interface(d) => Some(&d.name),
            Declaration::Class(d) => Some(&d.name),
            Declaration::Behavior(d) => Some(&d.name),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstantDecl {
    pub name: Ident,
    pub value: Spanned<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ErrorDecl {
    pub name: Ident,
    pub params: Vec<Parameter>,
}

/// `a, b: int = init`
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub names: Vec<Ident>,
    pub ty: Spanned<Type>,
    pub init: Option<Spanned<Expr>>,
}

/// `enum A [= start], B, C`
#[derive(Debug, Clone, PartialEq)]
pub struct EnumDecl {
    /// All members in declaration order; never empty.
    pub members: Vec<Ident>,
    pub start: Option<Spanned<Expr>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeDecl {
    pub name: Ident,
    pub ty: Spanned<Type>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: Ident,
    pub ty: Spanned<Type>,
}

/// Entry of a `functions` section.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionProto {
    pub name: Ident,
    pub params: Vec<Parameter>,
    pub return_type: Option<Spanned<Type>>,
    pub external: bool,
}

/// A function body. Nameless functions (expression position) have `name == None`.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: Option<Ident>,
    pub params: Vec<Parameter>,
    pub return_type: Option<Spanned<Type>>,
    pub locals: Vec<VarDecl>,
    pub body: Vec<Spanned<Statement>>,
}

/// `NAME: constraint` inside `[...]` after an interface or class name.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeParam {
    pub name: Ident,
    pub constraint: Spanned<Type>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceDecl {
    pub name: Ident,
    pub type_params: Vec<TypeParam>,
    pub extends: Vec<NamedType>,
    pub messages: Vec<Spanned<MethodProto>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub name: Ident,
    pub type_params: Vec<TypeParam>,
    pub implements: Vec<NamedType>,
    pub superclass: Option<NamedType>,
    pub fields: Vec<VarDecl>,
    pub methods: Vec<Spanned<MethodProto>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BehaviorDecl {
    pub name: Ident,
    pub methods: Vec<Spanned<MethodDecl>>,
}

/// How a method is invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    /// `name (params) returns T`
    Normal,
    /// `infix + (other: T) returns T`
    Infix,
    /// `prefix - () returns T`
    Prefix,
    /// `at: (i: int) put: (v: T)`
    Keyword,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodProto {
    pub kind: MethodKind,
    /// Method name, operator spelling, or joined keyword selector (`at:put:`).
    pub selector: String,
    pub params: Vec<Parameter>,
    pub return_type: Option<Spanned<Type>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodDecl {
    pub proto: Spanned<MethodProto>,
    pub locals: Vec<VarDecl>,
    pub body: Vec<Spanned<Statement>>,
}

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Int,
    Char,
    Double,
    Bool,
    Void,
    TypeOfNull,
    AnyType,
    /// `ptr to T`
    Ptr(Box<Spanned<Type>>),
    /// `record fields endRecord`
    Record(Vec<VarDecl>),
    /// `array [d1, *] of T`; `None` marks a dynamic (`*`) dimension.
    Array {
        dims: Vec<Option<Spanned<Expr>>>,
        elem: Box<Spanned<Type>>,
    },
    /// `function (T1, T2) returns R`
    Function {
        params: Vec<Spanned<Type>>,
        ret: Option<Box<Spanned<Type>>>,
    },
    Named(NamedType),
}

/// `Name` or `Name[T1, T2]`
#[derive(Debug, Clone, PartialEq)]
pub struct NamedType {
    pub name: Ident,
    pub args: Vec<Spanned<Type>>,
}

// ============================================================================
// Statements
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    If {
        cond: Spanned<Expr>,
        then_block: Vec<Spanned<Statement>>,
        else_ifs: Vec<ElseIf>,
        else_block: Option<Vec<Spanned<Statement>>>,
    },
    While {
        cond: Spanned<Expr>,
        body: Vec<Spanned<Statement>>,
    },
    DoUntil {
        body: Vec<Spanned<Statement>>,
        cond: Spanned<Expr>,
    },
    For {
        kind: ForKind,
        body: Vec<Spanned<Statement>>,
    },
    Switch {
        scrutinee: Spanned<Expr>,
        cases: Vec<SwitchCase>,
        default: Option<Vec<Spanned<Statement>>>,
    },
    Try {
        body: Vec<Spanned<Statement>>,
        catches: Vec<CatchClause>,
    },
    Throw {
        error: Ident,
        args: Vec<Spanned<Expr>>,
    },
    Free(Spanned<Expr>),
    Debug,
    Break,
    Continue,
    Return(Option<Spanned<Expr>>),
    Assignment {
        target: Spanned<LValue>,
        value: Spanned<Expr>,
    },
    Call(CallExpr),
    Message(MessageExpr),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElseIf {
    pub cond: Spanned<Expr>,
    pub body: Vec<Spanned<Statement>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ForKind {
    /// `for i = a to b [by step]`
    Range {
        var: Spanned<LValue>,
        start: Spanned<Expr>,
        end: Spanned<Expr>,
        step: Option<Spanned<Expr>>,
    },
    /// `for (init; cond; update)`
    CStyle {
        init: Option<Box<Spanned<Statement>>>,
        cond: Option<Spanned<Expr>>,
        update: Option<Box<Spanned<Statement>>>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchCase {
    pub value: Spanned<Expr>,
    pub body: Vec<Spanned<Statement>>,
}

/// `catch NAME (params): stmts`
#[derive(Debug, Clone, PartialEq)]
pub struct CatchClause {
    pub error: Ident,
    pub params: Vec<Parameter>,
    pub body: Vec<Spanned<Statement>>,
}

/// Assignment target.
#[derive(Debug, Clone, PartialEq)]
pub enum LValue {
    Ident(Ident),
    Index {
        array: Box<Spanned<Expr>>,
        indices: Vec<Spanned<Expr>>,
    },
    Field {
        object: Box<Spanned<Expr>>,
        field: Ident,
    },
    /// `*ptr = ...`
    Deref(Box<Spanned<Expr>>),
}

// ============================================================================
// Expressions
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Ident(Ident),
    Int(i64),
    Double(f64),
    Char(char),
    String(String),
    Bool(bool),
    Null,
    SelfRef,
    Super,
    Binary(Box<Spanned<Expr>>, BinaryOp, Box<Spanned<Expr>>),
    Unary(UnaryOp, Box<Spanned<Expr>>),
    Call(CallExpr),
    Message(MessageExpr),
    Field(Box<Spanned<Expr>>, Ident),
    Index(Box<Spanned<Expr>>, Vec<Spanned<Expr>>),
    /// `expr arraySize`
    ArraySize(Box<Spanned<Expr>>),
    /// `expr asPtrTo T`
    AsPtrTo(Box<Spanned<Expr>>, Spanned<Type>),
    /// `expr asInteger`
    AsInteger(Box<Spanned<Expr>>),
    /// `expr isInstanceOf T` / `expr isKindOf T`
    TypeCheck {
        kind: TypeCheckKind,
        expr: Box<Spanned<Expr>>,
        ty: Spanned<Type>,
    },
    SizeOf(Spanned<Type>),
    Constructor(ConstructorExpr),
    /// Nameless `function (...) ... endFunction`
    Function(Box<FunctionDecl>),
}

/// `callee(args)`. Method calls use a [`Expr::Field`] callee.
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub callee: Box<Spanned<Expr>>,
    pub args: Vec<Spanned<Expr>>,
}

/// `receiver kw1: a kw2: b`
#[derive(Debug, Clone, PartialEq)]
pub struct MessageExpr {
    pub receiver: Box<Spanned<Expr>>,
    pub segments: Vec<MessageSegment>,
}

impl MessageExpr {
    /// Joined selector, e.g. `at:put:`.
    pub fn selector(&self) -> String {
        self.segments.iter().map(|s| format!("{}:", s.keyword)).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MessageSegment {
    pub keyword: Ident,
    pub arg: Spanned<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeCheckKind {
    IsInstanceOf,
    IsKindOf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocKind {
    New,
    Alloc,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstructorExpr {
    pub kind: AllocKind,
    pub ty: Spanned<Type>,
    pub init: Option<ConstructorInit>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConstructorInit {
    /// `{ f = e, g = e }`
    Fields(Vec<FieldInit>),
    /// `{ [count of] e, ... }`
    Array(Vec<ArrayInit>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldInit {
    pub field: Ident,
    pub value: Spanned<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayInit {
    pub count: Option<Spanned<Expr>>,
    pub value: Spanned<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BinaryOp {
    Or,
    And,
    BitOr,
    BitXor,
    BitAnd,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Shl,
    Shr,
    UShr,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    /// User-defined infix operator, e.g. `<+>`.
    Custom(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Neg,
    Deref,
    AddrOf,
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BinaryOp::Or => "||",
            BinaryOp::And => "&&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::BitAnd => "&",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::UShr => ">>>",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Custom(op) => op,
        };
        write!(f, "{s}")
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOp::Not => write!(f, "!"),
            UnaryOp::Neg => write!(f, "-"),
            UnaryOp::Deref => write!(f, "*"),
            UnaryOp::AddrOf => write!(f, "&"),
        }
    }
}
