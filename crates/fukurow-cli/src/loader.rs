//! Turtle-style bulk loader: parses repeated `term term term .` statements
//! and produces triples for [`fukurow_store::TripleStore::add_triples`].
//!
//! Shares its term-literal decoding with [`fukurow_sparql::parser`] (IRI
//! body stripping, prefixed-name splitting, string-escape decoding) since
//! both read the same token kinds out of [`fukurow_sparql::lexer`]. This
//! loader never sees a `PREFIX` declaration, so a `pname:local` token
//! always falls back to its verbatim [`fukurow_core::Term::Identifier`]
//! form — there is no prefix map to resolve it against.

use std::collections::HashMap;

use fukurow_core::{Term, Triple};
use fukurow_sparql::lexer::{self, Spanned, Token};
use fukurow_sparql::parser::{decode_string, parse_iri_body, resolve_prefixed_name, split_prefixed_name};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LoaderError {
    #[error("unrecognized token at byte offset {0}")]
    Lex(usize),
    #[error("expected a triple term, found end of input")]
    UnexpectedEof,
    #[error("token {0} is not a valid triple term (variables and keywords are query-only)")]
    UnexpectedToken(usize),
    #[error("expected '.' terminating a triple after token {0}")]
    ExpectedDot(usize),
}

/// Parse `text` as zero or more `term term term .` statements and return
/// the triples in file order. A trailing statement missing its `.` (or
/// any statement short of three terms) is an error — the whole document
/// either loads or it doesn't; there is no partial-load recovery.
pub fn parse_triples(text: &str) -> Result<Vec<Triple>, LoaderError> {
    let tokens = lexer::tokenize(text).map_err(LoaderError::Lex)?;
    let no_prefixes: HashMap<String, String> = HashMap::new();
    let mut triples = Vec::new();
    let mut pos = 0;

    while pos < tokens.len() {
        let subject = term_at(&tokens, &mut pos, &no_prefixes)?;
        let predicate = term_at(&tokens, &mut pos, &no_prefixes)?;
        let object = term_at(&tokens, &mut pos, &no_prefixes)?;
        match tokens.get(pos) {
            Some(spanned) if spanned.token == Token::Dot => pos += 1,
            _ => return Err(LoaderError::ExpectedDot(pos)),
        }
        triples.push(Triple::new(subject, predicate, object));
    }

    Ok(triples)
}

fn term_at(
    tokens: &[Spanned<'_>],
    pos: &mut usize,
    prefixes: &HashMap<String, String>,
) -> Result<Term, LoaderError> {
    let spanned = tokens.get(*pos).ok_or(LoaderError::UnexpectedEof)?;
    let term = match spanned.token.clone() {
        Token::Iri(iri) => Term::iri(parse_iri_body(iri)),
        Token::StringLiteral(s) => Term::string(decode_string(s)),
        Token::PrefixedName(s) => {
            let (pname, local) = split_prefixed_name(s);
            resolve_prefixed_name(prefixes, pname, local)
        }
        Token::Decimal(s) => {
            Term::float(s.parse().map_err(|_| LoaderError::UnexpectedToken(*pos))?)
        }
        Token::Integer(s) => {
            Term::integer(s.parse().map_err(|_| LoaderError::UnexpectedToken(*pos))?)
        }
        Token::True => Term::boolean(true),
        Token::False => Term::boolean(false),
        Token::Identifier(s) => Term::identifier(s),
        _ => return Err(LoaderError::UnexpectedToken(*pos)),
    };
    *pos += 1;
    Ok(term)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_repeated_triple_statements() {
        let triples = parse_triples(
            r#"a name "name-a" .
               a weight "weight-a" .
               b name "name-b" ."#,
        )
        .unwrap();
        assert_eq!(triples.len(), 3);
        assert_eq!(triples[0].subject, Term::identifier("a"));
        assert_eq!(triples[0].object, Term::string("name-a"));
    }

    #[test]
    fn accepts_iris_numbers_and_booleans_as_terms() {
        let triples = parse_triples("<http://example.org/a> <http://example.org/height> 100 .").unwrap();
        assert_eq!(triples.len(), 1);
        assert_eq!(triples[0].subject, Term::iri("http://example.org/a"));
        assert_eq!(triples[0].object, Term::integer(100));
    }

    #[test]
    fn an_unresolved_prefixed_name_falls_back_to_an_identifier() {
        let triples = parse_triples("ex:a ex:name ex:b .").unwrap();
        assert_eq!(triples[0].subject, Term::identifier("ex:a"));
    }

    #[test]
    fn empty_document_yields_no_triples() {
        assert_eq!(parse_triples("").unwrap(), Vec::new());
    }

    #[test]
    fn a_triple_missing_its_trailing_dot_is_an_error() {
        let err = parse_triples("a name b").unwrap_err();
        assert_eq!(err, LoaderError::ExpectedDot(3));
    }

    #[test]
    fn a_variable_is_not_a_valid_loader_term() {
        let err = parse_triples("?a name b .").unwrap_err();
        assert_eq!(err, LoaderError::UnexpectedToken(0));
    }
}
