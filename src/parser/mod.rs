//! Java subset parser.
//!
//! A logos lexer plus a hand-written recursive-descent parser covering the
//! declaration structure the mapping engine consumes: type declarations,
//! supertype clauses, fields, methods, and enum constants. Everything else
//! (bodies, initializers, annotations, nested types) is consumed with
//! balanced-delimiter skipping and never reaches the AST.

pub mod ast;
mod lexer;
#[allow(clippy::module_inception)]
mod parser;

pub use ast::{
    ClassDecl, CompilationUnit, EnumDecl, FieldDecl, InterfaceDecl, MethodDecl, ParamDecl,
    PrimitiveType, TypeArg, TypeDecl, TypeRef, TypeRefKind, WildcardBound,
};
pub use lexer::{Lexer, Token, TokenKind, tokenize};
pub use parser::{ParseError, parse_java};
