//! Type references as written in source.

use std::fmt;

use crate::Span;

/// Dotted name such as `java.util.List` or `Outer.Inner`.
#[derive(Clone, Debug, Default)]
pub struct QualifiedName {
    pub segments: Vec<String>,
    pub span: Span,
}

impl QualifiedName {
    pub fn new(segments: Vec<String>, span: Span) -> Self {
        QualifiedName { segments, span }
    }

    /// Last segment (the simple name).
    pub fn last(&self) -> &str {
        self.segments.last().map_or("", String::as_str)
    }

    pub fn first(&self) -> &str {
        self.segments.first().map_or("", String::as_str)
    }

    #[inline]
    pub fn is_simple(&self) -> bool {
        self.segments.len() == 1
    }

    /// Everything but the last segment, dotted. Empty for simple names.
    pub fn qualifier(&self) -> String {
        match self.segments.split_last() {
            Some((_, rest)) => rest.join("."),
            None => String::new(),
        }
    }

    /// The dotted form.
    pub fn dotted(&self) -> String {
        self.segments.join(".")
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Boolean,
    Byte,
    Short,
    Int,
    Long,
    Char,
    Float,
    Double,
    Void,
}

impl PrimitiveType {
    pub fn keyword(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Byte => "byte",
            PrimitiveType::Short => "short",
            PrimitiveType::Int => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Char => "char",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
            PrimitiveType::Void => "void",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum WildcardBound {
    Extends,
    Super,
}

impl WildcardBound {
    pub fn keyword(self) -> &'static str {
        match self {
            WildcardBound::Extends => "extends",
            WildcardBound::Super => "super",
        }
    }
}

#[derive(Clone, Debug)]
pub enum TypeRefKind {
    Primitive(PrimitiveType),
    /// Class or interface type, with type arguments on the last segment.
    Named {
        name: QualifiedName,
        args: Vec<TypeRef>,
    },
    /// `?`, `? extends T`, `? super T`; only valid as a type argument.
    Wildcard {
        bound: Option<(WildcardBound, Box<TypeRef>)>,
    },
}

/// A type as written: `int`, `List<? extends Number>[]`, `String...`.
#[derive(Clone, Debug)]
pub struct TypeRef {
    pub kind: TypeRefKind,
    /// Array dimensions (`[]` count). Varargs are recorded on the parameter.
    pub dims: u32,
    pub span: Span,
}

impl TypeRef {
    pub fn primitive(primitive: PrimitiveType, span: Span) -> Self {
        TypeRef {
            kind: TypeRefKind::Primitive(primitive),
            dims: 0,
            span,
        }
    }

    pub fn is_void(&self) -> bool {
        matches!(self.kind, TypeRefKind::Primitive(PrimitiveType::Void)) && self.dims == 0
    }

    /// Named type without qualifier or arguments, e.g. `var`.
    pub fn simple_name(&self) -> Option<&str> {
        match &self.kind {
            TypeRefKind::Named { name, args } if name.is_simple() && args.is_empty() => {
                Some(name.last())
            }
            _ => None,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TypeRefKind::Primitive(p) => f.write_str(p.keyword())?,
            TypeRefKind::Named { name, args } => {
                write!(f, "{name}")?;
                if !args.is_empty() {
                    f.write_str("<")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{arg}")?;
                    }
                    f.write_str(">")?;
                }
            }
            TypeRefKind::Wildcard { bound } => {
                f.write_str("?")?;
                if let Some((kind, ty)) = bound {
                    write!(f, " {} {ty}", kind.keyword())?;
                }
            }
        }
        for _ in 0..self.dims {
            f.write_str("[]")?;
        }
        Ok(())
    }
}
