//! Expression nodes.

use std::fmt;

use super::TypeRef;
use crate::Span;

/// A literal, stored as the value it denotes rather than its spelling.
///
/// Integer literals keep the bit pattern of their type, so `0x10`, `020`,
/// `0b1_0000` and `16` are the same `Int`. Floating point literals keep
/// their IEEE bits. Char literals keep their UTF-16 code unit, so `'A'`,
/// `'\101'` and `'\u0041'` are the same `Char`; string literals keep
/// decoded characters.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Literal {
    Int(u32),
    Long(u64),
    Float(u32),
    Double(u64),
    Char(u16),
    String(String),
    Bool(bool),
    Null,
}

impl Literal {
    /// Short name of the literal's type, used in divergence reports.
    pub fn type_name(&self) -> &'static str {
        match self {
            Literal::Int(_) => "int",
            Literal::Long(_) => "long",
            Literal::Float(_) => "float",
            Literal::Double(_) => "double",
            Literal::Char(_) => "char",
            Literal::String(_) => "String",
            Literal::Bool(_) => "boolean",
            Literal::Null => "null",
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(bits) => write!(f, "{}", i32::from_ne_bytes(bits.to_ne_bytes())),
            Literal::Long(bits) => write!(f, "{}L", i64::from_ne_bytes(bits.to_ne_bytes())),
            Literal::Float(bits) => write!(f, "{:?}f", f32::from_bits(*bits)),
            Literal::Double(bits) => write!(f, "{:?}", f64::from_bits(*bits)),
            Literal::Char(unit) => match char::from_u32(u32::from(*unit)) {
                Some(c) => write!(f, "{c:?}"),
                None => write!(f, "'\\u{unit:04X}'"),
            },
            Literal::String(s) => write!(f, "{s:?}"),
            Literal::Bool(b) => write!(f, "{b}"),
            Literal::Null => f.write_str("null"),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Neg,
    Plus,
    Not,
    BitNot,
    PreInc,
    PreDec,
    PostInc,
    PostDec,
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Plus => "+",
            UnaryOp::Not => "!",
            UnaryOp::BitNot => "~",
            UnaryOp::PreInc => "++_",
            UnaryOp::PreDec => "--_",
            UnaryOp::PostInc => "_++",
            UnaryOp::PostDec => "_--",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
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
    Rem,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
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
            BinaryOp::Rem => "%",
        }
    }
}

/// Assignment operator; `None` is plain `=`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct AssignOp(pub Option<BinaryOp>);

impl AssignOp {
    pub const PLAIN: AssignOp = AssignOp(None);

    pub fn symbol(self) -> &'static str {
        match self.0 {
            None => "=",
            Some(BinaryOp::Add) => "+=",
            Some(BinaryOp::Sub) => "-=",
            Some(BinaryOp::Mul) => "*=",
            Some(BinaryOp::Div) => "/=",
            Some(BinaryOp::Rem) => "%=",
            Some(BinaryOp::BitAnd) => "&=",
            Some(BinaryOp::BitOr) => "|=",
            Some(BinaryOp::BitXor) => "^=",
            Some(BinaryOp::Shl) => "<<=",
            Some(BinaryOp::Shr) => ">>=",
            Some(BinaryOp::UShr) => ">>>=",
            Some(_) => "?=",
        }
    }
}

#[derive(Clone, Debug)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }
}

/// Expression kinds. Parentheses are not represented: grouping is carried
/// by the shape of the tree.
#[derive(Clone, Debug)]
pub enum ExprKind {
    Literal(Literal),
    /// Simple name: local, parameter, field, or the head of a qualified name.
    Name(String),
    This,
    Super,
    FieldAccess {
        target: Box<Expr>,
        name: String,
    },
    MethodCall {
        target: Option<Box<Expr>>,
        name: String,
        args: Vec<Expr>,
    },
    New {
        ty: TypeRef,
        /// `new Foo<>()`: type arguments are inferred.
        diamond: bool,
        args: Vec<Expr>,
    },
    NewArray {
        elem: TypeRef,
        /// Sized dimensions, `new int[a][b]`.
        dims: Vec<Expr>,
        /// Unsized trailing dimensions, `new int[a][]`.
        extra_dims: u32,
        init: Option<Vec<Expr>>,
    },
    /// `{a, b}` in a variable initializer or annotation value.
    ArrayInit(Vec<Expr>),
    Index {
        target: Box<Expr>,
        index: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Assign {
        op: AssignOp,
        target: Box<Expr>,
        value: Box<Expr>,
    },
    Conditional {
        cond: Box<Expr>,
        then_expr: Box<Expr>,
        else_expr: Box<Expr>,
    },
    InstanceOf {
        expr: Box<Expr>,
        ty: TypeRef,
    },
    Cast {
        ty: TypeRef,
        expr: Box<Expr>,
    },
    ClassLiteral(TypeRef),
}
