//! Tokenizer for the SPARQL subset.
//!
//! Keywords are matched case-insensitively; a higher `priority` on the
//! keyword regexes breaks what would otherwise be a same-length tie
//! against the generic [`Token::Identifier`] pattern (logos picks the
//! longest match at a lex position, and falls back to `priority` when two
//! patterns tie in length).

use logos::Logos;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum Token<'a> {
    #[regex("(?i)select", priority = 10)]
    Select,
    #[regex("(?i)distinct", priority = 10)]
    Distinct,
    #[regex("(?i)where", priority = 10)]
    Where,
    #[regex("(?i)optional", priority = 10)]
    Optional,
    #[regex("(?i)union", priority = 10)]
    Union,
    #[regex("(?i)filter", priority = 10)]
    Filter,
    #[regex("(?i)prefix", priority = 10)]
    Prefix,
    #[regex("(?i)order", priority = 10)]
    Order,
    #[regex("(?i)by", priority = 10)]
    By,
    #[regex("(?i)asc", priority = 10)]
    Asc,
    #[regex("(?i)desc", priority = 10)]
    Desc,
    #[regex("(?i)limit", priority = 10)]
    Limit,
    #[regex("(?i)offset", priority = 10)]
    Offset,
    #[regex("(?i)true", priority = 10)]
    True,
    #[regex("(?i)false", priority = 10)]
    False,

    #[regex(r"\?[A-Za-z_][A-Za-z0-9_]*")]
    Variable(&'a str),

    /// `<...>`. The body excludes whitespace, which is enough to keep a
    /// bare `<`/`>` comparison operator from being mistaken for the start
    /// of an IRI reference in practice (real IRIs never contain spaces).
    #[regex(r"<[^>\s]*>")]
    Iri(&'a str),

    #[regex(r#""([^"\\]|\\.)*""#)]
    StringLiteral(&'a str),

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*:[A-Za-z_][A-Za-z0-9_\-]*")]
    PrefixedName(&'a str),

    #[regex(r"[0-9]+\.[0-9]+")]
    Decimal(&'a str),

    #[regex(r"[0-9]+")]
    Integer(&'a str),

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Identifier(&'a str),

    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(".")]
    Dot,
    #[token(":")]
    Colon,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("!=")]
    Ne,
    #[token("<=")]
    Le,
    #[token(">=")]
    Ge,
    #[token("=")]
    Eq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<'a> {
    pub token: Token<'a>,
    pub position: usize,
}

/// Tokenize `input` in full. A lexical error reports the byte offset at
/// which no token could be recognized.
pub fn tokenize(input: &str) -> Result<Vec<Spanned<'_>>, usize> {
    let mut lexer = Token::lexer(input);
    let mut tokens = Vec::new();
    while let Some(result) = lexer.next() {
        match result {
            Ok(token) => tokens.push(Spanned {
                token,
                position: lexer.span().start,
            }),
            Err(_) => return Err(lexer.span().start),
        }
    }
    Ok(tokens)
}
