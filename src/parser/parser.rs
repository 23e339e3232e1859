//! Recursive descent parser for the Java declaration subset.
//!
//! Produces a typed [`CompilationUnit`] directly from tokens. Statements,
//! expressions, initializers, annotations, and nested type bodies are
//! consumed with balanced-delimiter skipping; a structural error anywhere
//! fails the whole file (recovery happens at file granularity, in the
//! driver).

use smol_str::SmolStr;
use thiserror::Error;

use super::ast::{
    ClassDecl, CompilationUnit, EnumDecl, FieldDecl, InterfaceDecl, MethodDecl, ParamDecl,
    PrimitiveType, TypeArg, TypeDecl, TypeRef, TypeRefKind, WildcardBound,
};
use super::lexer::{Lexer, Token, TokenKind};

/// A parse failure with the byte offset of the offending token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("parse error at offset {offset}: {message}")]
pub struct ParseError {
    pub message: String,
    pub offset: u32,
}

impl ParseError {
    pub fn new(message: impl Into<String>, offset: u32) -> Self {
        Self {
            message: message.into(),
            offset,
        }
    }
}

/// Parse one Java source file into a [`CompilationUnit`].
pub fn parse_java(input: &str) -> Result<CompilationUnit, ParseError> {
    let tokens: Vec<_> = Lexer::new(input).collect();
    let mut parser = Parser::new(&tokens, input.len() as u32);
    parser.parse_compilation_unit()
}

struct Parser<'a> {
    tokens: &'a [Token<'a>],
    pos: usize,
    end_offset: u32,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token<'a>], end_offset: u32) -> Self {
        Self {
            tokens,
            pos: 0,
            end_offset,
        }
    }

    // =========================================================================
    // Token inspection
    // =========================================================================

    fn current(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.pos)
    }

    fn nth_kind(&self, n: usize) -> Option<TokenKind> {
        self.tokens.get(self.pos + n).map(|t| t.kind)
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.current().map(|t| t.kind) == Some(kind)
    }

    fn at_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn bump(&mut self) -> Option<&Token<'a>> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn offset(&self) -> u32 {
        self.current().map(|t| t.offset).unwrap_or(self.end_offset)
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::new(message, self.offset())
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Result<Token<'a>, ParseError> {
        match self.current() {
            Some(token) if token.kind == kind => {
                let token = *token;
                self.pos += 1;
                Ok(token)
            }
            Some(token) => Err(self.error(format!("expected {what}, found `{}`", token.text))),
            None => Err(self.error(format!("expected {what}, found end of file"))),
        }
    }

    fn ident(&mut self, what: &str) -> Result<SmolStr, ParseError> {
        let token = self.expect(TokenKind::Ident, what)?;
        Ok(SmolStr::new(token.text))
    }

    // =========================================================================
    // Compilation unit
    // =========================================================================

    fn parse_compilation_unit(&mut self) -> Result<CompilationUnit, ParseError> {
        let mut unit = CompilationUnit::default();

        while self.at(TokenKind::At) {
            self.skip_annotation()?;
        }

        if self.at(TokenKind::PackageKw) {
            self.bump();
            unit.package = Some(self.parse_qualified_name("package name")?);
            self.expect(TokenKind::Semi, "`;` after package declaration")?;
        }

        while self.at(TokenKind::ImportKw) {
            // `import static a.b.*;` — consume through the semicolon
            while let Some(token) = self.bump() {
                if token.kind == TokenKind::Semi {
                    break;
                }
            }
        }

        while !self.at_eof() {
            if self.at(TokenKind::Semi) {
                self.bump();
                continue;
            }
            unit.types.push(self.parse_type_decl()?);
        }

        Ok(unit)
    }

    fn parse_qualified_name(&mut self, what: &str) -> Result<String, ParseError> {
        let mut name = self.ident(what)?.to_string();
        while self.at(TokenKind::Dot) && self.nth_kind(1) == Some(TokenKind::Ident) {
            self.bump();
            name.push('.');
            name.push_str(self.ident(what)?.as_str());
        }
        Ok(name)
    }

    // =========================================================================
    // Type declarations
    // =========================================================================

    fn parse_type_decl(&mut self) -> Result<TypeDecl, ParseError> {
        let is_abstract = self.parse_modifiers()?;
        match self.current().map(|t| t.kind) {
            Some(TokenKind::ClassKw) => Ok(TypeDecl::Class(self.parse_class(is_abstract)?)),
            Some(TokenKind::InterfaceKw) => Ok(TypeDecl::Interface(self.parse_interface()?)),
            Some(TokenKind::EnumKw) => Ok(TypeDecl::Enum(self.parse_enum()?)),
            _ => Err(self.error("expected class, interface, or enum declaration")),
        }
    }

    /// Consume leading annotations and modifiers; true if `abstract` was seen.
    fn parse_modifiers(&mut self) -> Result<bool, ParseError> {
        let mut is_abstract = false;
        loop {
            match self.current().map(|t| t.kind) {
                Some(TokenKind::AbstractKw) => {
                    is_abstract = true;
                    self.bump();
                }
                Some(TokenKind::ModifierKw) => {
                    self.bump();
                }
                Some(TokenKind::At) => self.skip_annotation()?,
                _ => return Ok(is_abstract),
            }
        }
    }

    fn parse_class(&mut self, is_abstract: bool) -> Result<ClassDecl, ParseError> {
        self.expect(TokenKind::ClassKw, "`class`")?;
        let name = self.ident("class name")?;

        if self.at(TokenKind::Lt) {
            self.skip_type_params()?;
        }

        let extends = if self.at(TokenKind::ExtendsKw) {
            self.bump();
            Some(self.parse_type()?)
        } else {
            None
        };

        let mut implements = Vec::new();
        if self.at(TokenKind::ImplementsKw) {
            self.bump();
            implements.push(self.parse_type()?);
            while self.at(TokenKind::Comma) {
                self.bump();
                implements.push(self.parse_type()?);
            }
        }

        let mut class = ClassDecl {
            name,
            is_abstract,
            extends,
            implements,
            fields: Vec::new(),
            methods: Vec::new(),
        };

        self.expect(TokenKind::LBrace, "`{` to open class body")?;
        while !self.at(TokenKind::RBrace) {
            if self.at_eof() {
                return Err(self.error("unexpected end of file in class body"));
            }
            self.parse_member(&mut class)?;
        }
        self.expect(TokenKind::RBrace, "`}` to close class body")?;

        Ok(class)
    }

    fn parse_interface(&mut self) -> Result<InterfaceDecl, ParseError> {
        self.expect(TokenKind::InterfaceKw, "`interface`")?;
        let name = self.ident("interface name")?;

        if self.at(TokenKind::Lt) {
            self.skip_type_params()?;
        }

        let mut extends = Vec::new();
        if self.at(TokenKind::ExtendsKw) {
            self.bump();
            extends.push(self.parse_type()?);
            while self.at(TokenKind::Comma) {
                self.bump();
                extends.push(self.parse_type()?);
            }
        }

        // Interface members carry no metamodel information; skip the body.
        self.expect(TokenKind::LBrace, "`{` to open interface body")?;
        self.skip_to_block_end()?;

        Ok(InterfaceDecl { name, extends })
    }

    fn parse_enum(&mut self) -> Result<EnumDecl, ParseError> {
        self.expect(TokenKind::EnumKw, "`enum`")?;
        let name = self.ident("enum name")?;

        if self.at(TokenKind::ImplementsKw) {
            self.bump();
            self.parse_type()?;
            while self.at(TokenKind::Comma) {
                self.bump();
                self.parse_type()?;
            }
        }

        self.expect(TokenKind::LBrace, "`{` to open enum body")?;

        let mut constants = Vec::new();
        loop {
            while self.at(TokenKind::At) {
                self.skip_annotation()?;
            }
            if !self.at(TokenKind::Ident) {
                break;
            }
            constants.push(self.ident("enum constant")?);
            if self.at(TokenKind::LParen) {
                self.skip_parens()?;
            }
            if self.at(TokenKind::LBrace) {
                self.bump();
                self.skip_to_block_end()?;
            }
            if self.at(TokenKind::Comma) {
                self.bump();
            } else {
                break;
            }
        }

        // Remaining enum body (fields, constructors, methods) is not mapped.
        self.skip_to_block_end()?;

        Ok(EnumDecl { name, constants })
    }

    // =========================================================================
    // Class members
    // =========================================================================

    fn parse_member(&mut self, class: &mut ClassDecl) -> Result<(), ParseError> {
        self.parse_modifiers()?;

        match self.current().map(|t| t.kind) {
            Some(TokenKind::Semi) => {
                self.bump();
                Ok(())
            }
            // Nested types are out of scope for the metamodel; parse and drop.
            Some(TokenKind::ClassKw) => {
                self.parse_class(false)?;
                Ok(())
            }
            Some(TokenKind::InterfaceKw) => {
                self.parse_interface()?;
                Ok(())
            }
            Some(TokenKind::EnumKw) => {
                self.parse_enum()?;
                Ok(())
            }
            // Static or instance initializer block.
            Some(TokenKind::LBrace) => {
                self.bump();
                self.skip_to_block_end()
            }
            Some(TokenKind::Lt) => {
                // Generic method: `<T> T identity(T value)`
                self.skip_type_params()?;
                self.parse_method_or_field(class)
            }
            Some(TokenKind::VoidKw | TokenKind::PrimitiveKw | TokenKind::Ident) => {
                self.parse_method_or_field(class)
            }
            Some(_) => Err(self.error("unexpected token in class body")),
            None => Err(self.error("unexpected end of file in class body")),
        }
    }

    fn parse_method_or_field(&mut self, class: &mut ClassDecl) -> Result<(), ParseError> {
        if self.at(TokenKind::VoidKw) {
            self.bump();
            let name = self.ident("method name")?;
            let method = self.parse_method_rest(name, None)?;
            class.methods.push(method);
            return Ok(());
        }

        let ty = self.parse_type()?;

        // A `(` right after the type means the "type" was a constructor name.
        if self.at(TokenKind::LParen) {
            self.skip_parens()?;
            self.skip_throws()?;
            if self.at(TokenKind::LBrace) {
                self.bump();
                self.skip_to_block_end()?;
            } else {
                self.expect(TokenKind::Semi, "constructor body or `;`")?;
            }
            return Ok(());
        }

        let name = self.ident("member name")?;

        if self.at(TokenKind::LParen) {
            let method = self.parse_method_rest(name, Some(ty))?;
            class.methods.push(method);
        } else {
            let field = self.parse_field_rest(name, ty)?;
            class.fields.push(field);
        }
        Ok(())
    }

    fn parse_field_rest(&mut self, first: SmolStr, ty: TypeRef) -> Result<FieldDecl, ParseError> {
        let mut names = vec![first];
        loop {
            // C-style dims on the declarator are consumed but not modeled,
            // same as reading the bare declared type in the original tool.
            while self.at(TokenKind::LBracket) && self.nth_kind(1) == Some(TokenKind::RBracket) {
                self.bump();
                self.bump();
            }
            if self.at(TokenKind::Eq) {
                self.bump();
                self.skip_initializer()?;
            }
            if self.at(TokenKind::Comma) {
                self.bump();
                names.push(self.ident("field declarator")?);
            } else {
                break;
            }
        }
        self.expect(TokenKind::Semi, "`;` after field declaration")?;
        Ok(FieldDecl { names, ty })
    }

    fn parse_method_rest(
        &mut self,
        name: SmolStr,
        return_type: Option<TypeRef>,
    ) -> Result<MethodDecl, ParseError> {
        let params = self.parse_params()?;

        while self.at(TokenKind::LBracket) && self.nth_kind(1) == Some(TokenKind::RBracket) {
            self.bump();
            self.bump();
        }

        self.skip_throws()?;

        if self.at(TokenKind::LBrace) {
            self.bump();
            self.skip_to_block_end()?;
        } else {
            self.expect(TokenKind::Semi, "method body or `;`")?;
        }

        Ok(MethodDecl {
            name,
            params,
            return_type,
        })
    }

    fn parse_params(&mut self) -> Result<Vec<ParamDecl>, ParseError> {
        self.expect(TokenKind::LParen, "`(` to open parameter list")?;
        let mut params = Vec::new();

        if !self.at(TokenKind::RParen) {
            loop {
                self.parse_modifiers()?;
                let ty = self.parse_type()?;
                // Varargs `...` lexes as three dots.
                while self.at(TokenKind::Dot) {
                    self.bump();
                }
                let name = self.ident("parameter name")?;
                while self.at(TokenKind::LBracket) && self.nth_kind(1) == Some(TokenKind::RBracket)
                {
                    self.bump();
                    self.bump();
                }
                params.push(ParamDecl { name, ty });
                if self.at(TokenKind::Comma) {
                    self.bump();
                } else {
                    break;
                }
            }
        }

        self.expect(TokenKind::RParen, "`)` to close parameter list")?;
        Ok(params)
    }

    fn skip_throws(&mut self) -> Result<(), ParseError> {
        if self.at(TokenKind::ThrowsKw) {
            self.bump();
            self.parse_qualified_name("exception type")?;
            while self.at(TokenKind::Comma) {
                self.bump();
                self.parse_qualified_name("exception type")?;
            }
        }
        Ok(())
    }

    // =========================================================================
    // Types
    // =========================================================================

    fn parse_type(&mut self) -> Result<TypeRef, ParseError> {
        let kind = if self.at(TokenKind::PrimitiveKw) {
            let token = self.expect(TokenKind::PrimitiveKw, "primitive type")?;
            let primitive = PrimitiveType::from_keyword(token.text)
                .ok_or_else(|| self.error("unknown primitive type"))?;
            TypeRefKind::Primitive(primitive)
        } else {
            let mut path = vec![self.ident("type name")?];
            let mut args = Vec::new();
            if self.at(TokenKind::Lt) {
                self.parse_type_args(&mut args)?;
            }
            while self.at(TokenKind::Dot) && self.nth_kind(1) == Some(TokenKind::Ident) {
                self.bump();
                path.push(self.ident("type name")?);
                if self.at(TokenKind::Lt) {
                    self.parse_type_args(&mut args)?;
                }
            }
            TypeRefKind::Named { path, args }
        };

        let mut dims = 0u8;
        while self.at(TokenKind::LBracket) && self.nth_kind(1) == Some(TokenKind::RBracket) {
            self.bump();
            self.bump();
            dims += 1;
        }

        Ok(TypeRef { kind, dims })
    }

    fn parse_type_args(&mut self, args: &mut Vec<TypeArg>) -> Result<(), ParseError> {
        self.expect(TokenKind::Lt, "`<`")?;
        // Diamond `<>`
        if self.at(TokenKind::Gt) {
            self.bump();
            return Ok(());
        }
        loop {
            if self.at(TokenKind::Question) {
                self.bump();
                let bound = if self.at(TokenKind::ExtendsKw) {
                    self.bump();
                    Some((WildcardBound::Extends, self.parse_type()?))
                } else if self.at(TokenKind::SuperKw) {
                    self.bump();
                    Some((WildcardBound::Super, self.parse_type()?))
                } else {
                    None
                };
                args.push(TypeArg::Wildcard(bound));
            } else {
                args.push(TypeArg::Type(self.parse_type()?));
            }
            if self.at(TokenKind::Comma) {
                self.bump();
            } else {
                break;
            }
        }
        self.expect(TokenKind::Gt, "`>` to close type arguments")?;
        Ok(())
    }

    // =========================================================================
    // Skipping
    // =========================================================================

    /// Consume a balanced `< ... >` type-parameter list, current token `<`.
    fn skip_type_params(&mut self) -> Result<(), ParseError> {
        self.expect(TokenKind::Lt, "`<`")?;
        let mut depth = 1u32;
        while depth > 0 {
            match self.bump().map(|t| t.kind) {
                Some(TokenKind::Lt) => depth += 1,
                Some(TokenKind::Gt) => depth -= 1,
                Some(_) => {}
                None => return Err(self.error("unexpected end of file in type parameters")),
            }
        }
        Ok(())
    }

    /// Consume a balanced `( ... )` group, current token `(`.
    fn skip_parens(&mut self) -> Result<(), ParseError> {
        self.expect(TokenKind::LParen, "`(`")?;
        let mut depth = 1u32;
        while depth > 0 {
            match self.bump().map(|t| t.kind) {
                Some(TokenKind::LParen) => depth += 1,
                Some(TokenKind::RParen) => depth -= 1,
                Some(_) => {}
                None => return Err(self.error("unexpected end of file in parentheses")),
            }
        }
        Ok(())
    }

    /// Consume up to and including the `}` matching an already-consumed `{`.
    fn skip_to_block_end(&mut self) -> Result<(), ParseError> {
        let mut depth = 1u32;
        while depth > 0 {
            match self.bump().map(|t| t.kind) {
                Some(TokenKind::LBrace) => depth += 1,
                Some(TokenKind::RBrace) => depth -= 1,
                Some(_) => {}
                None => return Err(self.error("unexpected end of file in block")),
            }
        }
        Ok(())
    }

    /// Consume a field initializer expression: everything until a `,` or `;`
    /// at bracket depth zero. Strings and comments are already out of the
    /// token stream, so only delimiter tokens affect the depth.
    fn skip_initializer(&mut self) -> Result<(), ParseError> {
        let mut depth = 0u32;
        loop {
            match self.current().map(|t| t.kind) {
                Some(TokenKind::Comma | TokenKind::Semi) if depth == 0 => return Ok(()),
                Some(TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace) => {
                    depth += 1;
                    self.bump();
                }
                Some(TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace) => {
                    if depth == 0 {
                        return Err(self.error("unbalanced delimiter in field initializer"));
                    }
                    depth -= 1;
                    self.bump();
                }
                Some(_) => {
                    self.bump();
                }
                None => return Err(self.error("unexpected end of file in field initializer")),
            }
        }
    }

    /// Consume an annotation: `@Qualified.Name` with an optional argument list.
    fn skip_annotation(&mut self) -> Result<(), ParseError> {
        self.expect(TokenKind::At, "`@`")?;
        // `@interface` declarations are not mapped; skip like a type body.
        if self.at(TokenKind::InterfaceKw) {
            self.bump();
            self.ident("annotation type name")?;
            self.expect(TokenKind::LBrace, "`{`")?;
            return self.skip_to_block_end();
        }
        self.parse_qualified_name("annotation name")?;
        if self.at(TokenKind::LParen) {
            self.skip_parens()?;
        }
        Ok(())
    }
}
