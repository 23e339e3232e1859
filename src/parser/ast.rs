//! Typed AST for the Java declaration subset.
//!
//! Only the declaration structure the mapping engine consumes is modeled:
//! type declarations, their supertype clauses, fields, methods, and enum
//! constants. Statements, expressions, and nested types are consumed by the
//! parser but never reach the AST.

use smol_str::SmolStr;

/// One parsed `.java` file.
#[derive(Debug, Clone, Default)]
pub struct CompilationUnit {
    /// Dotted package name from the `package` declaration, if any.
    pub package: Option<String>,
    /// Top-level type declarations in source order.
    pub types: Vec<TypeDecl>,
}

/// A top-level type declaration.
#[derive(Debug, Clone)]
pub enum TypeDecl {
    Class(ClassDecl),
    Interface(InterfaceDecl),
    Enum(EnumDecl),
}

#[derive(Debug, Clone)]
pub struct ClassDecl {
    pub name: SmolStr,
    pub is_abstract: bool,
    pub extends: Option<TypeRef>,
    pub implements: Vec<TypeRef>,
    pub fields: Vec<FieldDecl>,
    pub methods: Vec<MethodDecl>,
}

/// Interface members are consumed but not modeled; only the name and the
/// extended interfaces matter to the metamodel.
#[derive(Debug, Clone)]
pub struct InterfaceDecl {
    pub name: SmolStr,
    pub extends: Vec<TypeRef>,
}

#[derive(Debug, Clone)]
pub struct EnumDecl {
    pub name: SmolStr,
    /// Constant names in declaration order.
    pub constants: Vec<SmolStr>,
}

/// A field declaration. Multi-declarator fields (`int a, b;`) keep every
/// declarator name; the mapping stage only uses the first.
#[derive(Debug, Clone)]
pub struct FieldDecl {
    pub names: Vec<SmolStr>,
    pub ty: TypeRef,
}

#[derive(Debug, Clone)]
pub struct MethodDecl {
    pub name: SmolStr,
    pub params: Vec<ParamDecl>,
    /// `None` for `void`.
    pub return_type: Option<TypeRef>,
}

#[derive(Debug, Clone)]
pub struct ParamDecl {
    pub name: SmolStr,
    pub ty: TypeRef,
}

/// A syntactic type reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    pub kind: TypeRefKind,
    /// Array dimensions (`int[][]` has `dims == 2`).
    pub dims: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRefKind {
    Primitive(PrimitiveType),
    /// Qualified class/interface reference. Type arguments from every
    /// segment are collected into one flat list, matching the flat
    /// canonical-name composition downstream.
    Named {
        path: Vec<SmolStr>,
        args: Vec<TypeArg>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeArg {
    Type(TypeRef),
    /// `?`, `? extends T`, `? super T`.
    Wildcard(Option<(WildcardBound, TypeRef)>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WildcardBound {
    Extends,
    Super,
}

/// Java primitive type keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Int,
    Boolean,
    Byte,
    Short,
    Long,
    Float,
    Double,
    Char,
}

impl PrimitiveType {
    /// Parse a primitive keyword.
    pub fn from_keyword(text: &str) -> Option<Self> {
        Some(match text {
            "int" => Self::Int,
            "boolean" => Self::Boolean,
            "byte" => Self::Byte,
            "short" => Self::Short,
            "long" => Self::Long,
            "float" => Self::Float,
            "double" => Self::Double,
            "char" => Self::Char,
            _ => return None,
        })
    }
}
