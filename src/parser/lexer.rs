//! Logos-based lexer for the Java subset.
//!
//! Fast tokenization using the logos crate. Only the tokens the declaration
//! grammar cares about get dedicated kinds; everything else (operators,
//! body-level punctuation) lexes as [`TokenKind::Unknown`] and is consumed
//! by the parser's balanced-delimiter skipping.

use logos::Logos;

/// A token with its kind, text, and byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub offset: u32,
}

/// Lexer wrapping the logos-generated tokenizer.
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, TokenKind>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: TokenKind::lexer(input),
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let result = self.inner.next()?;
        let text = self.inner.slice();
        let offset = self.inner.span().start as u32;

        let kind = match result {
            Ok(kind) => kind,
            Err(()) => TokenKind::Unknown,
        };

        Some(Token { kind, text, offset })
    }
}

/// Tokenize an entire string into a Vec, trivia already skipped.
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).collect()
}

/// Token kinds for the Java subset.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\u{000C}]+")]
#[logos(skip r"//[^\n]*")]
#[logos(skip r"/\*[^*]*\*+(?:[^/*][^*]*\*+)*/")]
pub enum TokenKind {
    // =========================================================================
    // KEYWORDS the grammar branches on
    // =========================================================================
    #[token("package")]
    PackageKw,

    #[token("import")]
    ImportKw,

    #[token("class")]
    ClassKw,

    #[token("interface")]
    InterfaceKw,

    #[token("enum")]
    EnumKw,

    #[token("extends")]
    ExtendsKw,

    #[token("implements")]
    ImplementsKw,

    #[token("throws")]
    ThrowsKw,

    #[token("void")]
    VoidKw,

    #[token("super")]
    SuperKw,

    /// `abstract` gets its own kind: it is the one modifier that is
    /// semantically meaningful for the metamodel.
    #[token("abstract")]
    AbstractKw,

    /// All other declaration modifiers, collapsed to one kind.
    #[token("public")]
    #[token("protected")]
    #[token("private")]
    #[token("static")]
    #[token("final")]
    #[token("native")]
    #[token("synchronized")]
    #[token("transient")]
    #[token("volatile")]
    #[token("strictfp")]
    ModifierKw,

    /// Primitive type keywords; the concrete primitive is read off `text`.
    #[token("int")]
    #[token("boolean")]
    #[token("byte")]
    #[token("short")]
    #[token("long")]
    #[token("float")]
    #[token("double")]
    #[token("char")]
    PrimitiveKw,

    // =========================================================================
    // LITERALS AND NAMES
    // =========================================================================
    #[regex(r"[A-Za-z_$][A-Za-z0-9_$]*")]
    Ident,

    // Permissive: numbers only appear in skipped regions and enum values.
    #[regex(r"[0-9][0-9a-zA-Z_.]*")]
    Number,

    #[regex(r#""([^"\\\n]|\\.)*""#)]
    StringLit,

    #[regex(r"'([^'\\\n]|\\.)*'")]
    CharLit,

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token(";")]
    Semi,

    #[token(",")]
    Comma,

    #[token(".")]
    Dot,

    // `<` and `>` stay single-char so nested generics (`List<List<T>>`)
    // close without a `>>` split.
    #[token("<")]
    Lt,

    #[token(">")]
    Gt,

    #[token("?")]
    Question,

    #[token("@")]
    At,

    #[token("=")]
    Eq,

    /// Anything the grammar has no kind for (operators inside skipped
    /// bodies and initializers).
    #[regex(r".", priority = 0)]
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn lexes_class_header() {
        assert_eq!(
            kinds("public class Foo extends Bar {"),
            vec![
                TokenKind::ModifierKw,
                TokenKind::ClassKw,
                TokenKind::Ident,
                TokenKind::ExtendsKw,
                TokenKind::Ident,
                TokenKind::LBrace,
            ]
        );
    }

    #[test]
    fn skips_comments_and_whitespace() {
        assert_eq!(
            kinds("int /* block\n comment */ x; // trailing"),
            vec![
                TokenKind::PrimitiveKw,
                TokenKind::Ident,
                TokenKind::Semi,
            ]
        );
    }

    #[test]
    fn javadoc_comments_are_trivia() {
        assert_eq!(
            kinds("/** Returns the total.\n * @return int\n **/ int total;"),
            vec![TokenKind::PrimitiveKw, TokenKind::Ident, TokenKind::Semi],
        );
    }

    #[test]
    fn braces_inside_strings_do_not_tokenize() {
        assert_eq!(kinds(r#""{ not a brace }""#), vec![TokenKind::StringLit]);
    }

    #[test]
    fn nested_generics_close_with_single_gt_tokens() {
        let ks = kinds("Map<String, List<Integer>>");
        assert_eq!(ks.iter().filter(|k| **k == TokenKind::Gt).count(), 2);
    }

    #[test]
    fn unknown_operators_are_single_tokens() {
        let toks = tokenize("a + b");
        assert_eq!(toks[1].kind, TokenKind::Unknown);
        assert_eq!(toks[1].text, "+");
    }

    #[test]
    fn offsets_are_byte_positions() {
        let toks = tokenize("int  x");
        assert_eq!(toks[0].offset, 0);
        assert_eq!(toks[1].offset, 5);
    }
}
