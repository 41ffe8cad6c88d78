//! Recursive-descent parser over the token stream produced by [`crate::lexer`].
//!
//! Grammar-level structure (prologue, `SELECT`, `WHERE`, group patterns,
//! `FILTER`, `ORDER BY`, `LIMIT`/`OFFSET`) is a hand-written descent over
//! `&[Spanned]`, since winnow's `Stream` trait is built around borrowed
//! text and slice-of-token parsing would need a bespoke impl this pipeline
//! has no other use for. Winnow earns its keep one level down: decoding an
//! IRI reference's body and splitting a prefixed name both reuse the same
//! `delimited`/`preceded`/`take_while` combinators the rest of this
//! workspace's parsers are built from.

use std::collections::HashMap;

use fukurow_core::{PatternTerm, Term, TriplePattern, Variable};
use winnow::combinator::{delimited, preceded};
use winnow::token::take_while;
use winnow::Parser as _;

use crate::algebra::Algebra;
use crate::expression::{ArithmeticOp, CompareOp, Comparison, Expression};
use crate::lexer::{self, Spanned, Token};
use crate::query::{OrderBy, OrderDirection, Projection, SparqlQuery};
use crate::SparqlError;

pub struct Parser<'a> {
    tokens: Vec<Spanned<'a>>,
    pos: usize,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Result<Self, SparqlError> {
        let tokens = lexer::tokenize(input).map_err(|position| SparqlError::Parse {
            message: "unrecognized token".to_string(),
            position,
        })?;
        Ok(Parser { tokens, pos: 0 })
    }

    pub fn parse(mut self) -> Result<SparqlQuery, SparqlError> {
        let prefixes = self.parse_prologue()?;
        self.expect(&Token::Select, "SELECT")?;
        let distinct = self.consume(&Token::Distinct);
        let projection = self.parse_projection()?;
        self.expect(&Token::Where, "WHERE")?;
        let root = self.parse_group_graph_pattern(&prefixes)?;
        let order_by = self.parse_order_clause(&prefixes)?;
        let (limit, offset) = self.parse_limit_offset_clauses()?;

        if self.pos != self.tokens.len() {
            return Err(self.error("unexpected trailing input after query"));
        }

        Ok(SparqlQuery {
            projection,
            root,
            order_by,
            limit,
            offset,
            distinct,
        })
    }

    fn peek(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.pos).map(|s| &s.token)
    }

    fn position(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map(|s| s.position)
            .unwrap_or(0)
    }

    fn advance(&mut self) -> Option<Token<'a>> {
        let token = self.tokens.get(self.pos).map(|s| s.token.clone());
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn consume(&mut self, expected: &Token<'a>) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: &Token<'a>, description: &str) -> Result<(), SparqlError> {
        if self.consume(expected) {
            Ok(())
        } else {
            Err(self.error(format!("expected {description}")))
        }
    }

    fn error(&self, message: impl Into<String>) -> SparqlError {
        SparqlError::Parse {
            message: message.into(),
            position: self.position(),
        }
    }

    fn parse_prologue(&mut self) -> Result<HashMap<String, String>, SparqlError> {
        let mut prefixes = HashMap::new();
        while self.peek() == Some(&Token::Prefix) {
            self.advance();
            let name = match self.advance() {
                Some(Token::Identifier(name)) => name.to_string(),
                _ => return Err(self.error("expected a prefix name after PREFIX")),
            };
            self.expect(&Token::Colon, "':' after prefix name")?;
            let iri = match self.advance() {
                Some(Token::Iri(iri)) => parse_iri_body(iri).to_string(),
                _ => return Err(self.error("expected an IRI reference after ':'")),
            };
            // Later PREFIX declarations shadow earlier ones for the same name.
            prefixes.insert(name, iri);
        }
        Ok(prefixes)
    }

    fn parse_projection(&mut self) -> Result<Projection, SparqlError> {
        if self.consume(&Token::Star) {
            return Ok(Projection::Star);
        }
        let mut vars = Vec::new();
        while let Some(Token::Variable(_)) = self.peek() {
            if let Some(Token::Variable(name)) = self.advance() {
                vars.push(Variable::new(&name[1..]));
            }
        }
        if vars.is_empty() {
            return Err(self.error("expected a projected variable or '*'"));
        }
        Ok(Projection::Variables(vars))
    }

    fn parse_group_graph_pattern(
        &mut self,
        prefixes: &HashMap<String, String>,
    ) -> Result<Algebra, SparqlError> {
        self.expect(&Token::LBrace, "'{'")?;
        let mut children = Vec::new();

        loop {
            match self.peek() {
                Some(Token::RBrace) => break,
                Some(Token::Optional) => {
                    self.advance();
                    let inner = self.parse_group_graph_pattern(prefixes)?;
                    children.push(Algebra::OptionalGroup(Box::new(inner)));
                }
                Some(Token::Filter) => {
                    self.advance();
                    self.expect(&Token::LParen, "'(' after FILTER")?;
                    let comparison = self.parse_comparison(prefixes)?;
                    self.expect(&Token::RParen, "')' closing FILTER")?;
                    children.push(Algebra::Filter(comparison));
                }
                Some(Token::LBrace) => {
                    let mut node = self.parse_group_graph_pattern(prefixes)?;
                    while self.consume(&Token::Union) {
                        let right = self.parse_group_graph_pattern(prefixes)?;
                        node = Algebra::UnionGroup(Box::new(node), Box::new(right));
                    }
                    children.push(node);
                }
                Some(_) => {
                    let pattern = self.parse_triple_pattern(prefixes)?;
                    children.push(Algebra::Pattern(pattern));
                    self.consume(&Token::Dot);
                }
                None => return Err(self.error("unexpected end of input inside '{ ... }'")),
            }
        }

        self.expect(&Token::RBrace, "'}'")?;

        // A lone group pattern stays as itself rather than a one-element
        // PatternGroup wrapper.
        if children.len() == 1 {
            Ok(children.into_iter().next().unwrap())
        } else {
            Ok(Algebra::PatternGroup(children))
        }
    }

    fn parse_triple_pattern(
        &mut self,
        prefixes: &HashMap<String, String>,
    ) -> Result<TriplePattern, SparqlError> {
        let subject = self.parse_pattern_term(prefixes)?;
        let predicate = self.parse_pattern_term(prefixes)?;
        let object = self.parse_pattern_term(prefixes)?;
        Ok(TriplePattern::new(subject, predicate, object))
    }

    fn parse_pattern_term(
        &mut self,
        prefixes: &HashMap<String, String>,
    ) -> Result<PatternTerm, SparqlError> {
        match self.advance() {
            Some(Token::Variable(name)) => Ok(PatternTerm::Variable(Variable::new(&name[1..]))),
            Some(Token::Iri(iri)) => Ok(PatternTerm::Term(Term::iri(parse_iri_body(iri)))),
            Some(Token::StringLiteral(s)) => Ok(PatternTerm::Term(Term::string(decode_string(s)))),
            Some(Token::PrefixedName(s)) => {
                let (pname, local) = split_prefixed_name(s);
                Ok(PatternTerm::Term(resolve_prefixed_name(prefixes, pname, local)))
            }
            Some(Token::Decimal(s)) => {
                let value: f64 = s.parse().map_err(|_| self.error("invalid decimal literal"))?;
                Ok(PatternTerm::Term(Term::float(value)))
            }
            Some(Token::Integer(s)) => {
                let value: i64 = s.parse().map_err(|_| self.error("invalid integer literal"))?;
                Ok(PatternTerm::Term(Term::integer(value)))
            }
            Some(Token::True) => Ok(PatternTerm::Term(Term::boolean(true))),
            Some(Token::False) => Ok(PatternTerm::Term(Term::boolean(false))),
            Some(Token::Identifier(s)) => Ok(PatternTerm::Term(Term::identifier(s))),
            _ => Err(self.error("expected a triple pattern term")),
        }
    }

    fn parse_comparison(
        &mut self,
        prefixes: &HashMap<String, String>,
    ) -> Result<Comparison, SparqlError> {
        let left = self.parse_additive_expr(prefixes)?;
        let op = match self.advance() {
            Some(Token::Lt) => CompareOp::Lt,
            Some(Token::Le) => CompareOp::Le,
            Some(Token::Gt) => CompareOp::Gt,
            Some(Token::Ge) => CompareOp::Ge,
            Some(Token::Eq) => CompareOp::Eq,
            Some(Token::Ne) => CompareOp::Ne,
            _ => return Err(self.error("expected a comparison operator")),
        };
        let right = self.parse_additive_expr(prefixes)?;
        Ok(Comparison { op, left, right })
    }

    fn parse_additive_expr(
        &mut self,
        prefixes: &HashMap<String, String>,
    ) -> Result<Expression, SparqlError> {
        let mut left = self.parse_multiplicative_expr(prefixes)?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => ArithmeticOp::Add,
                Some(Token::Minus) => ArithmeticOp::Subtract,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative_expr(prefixes)?;
            left = Expression::Arithmetic {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_multiplicative_expr(
        &mut self,
        prefixes: &HashMap<String, String>,
    ) -> Result<Expression, SparqlError> {
        let mut left = self.parse_expr_atom(prefixes)?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => ArithmeticOp::Multiply,
                Some(Token::Slash) => ArithmeticOp::Divide,
                _ => break,
            };
            self.advance();
            let right = self.parse_expr_atom(prefixes)?;
            left = Expression::Arithmetic {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_expr_atom(
        &mut self,
        prefixes: &HashMap<String, String>,
    ) -> Result<Expression, SparqlError> {
        match self.advance() {
            Some(Token::Variable(name)) => Ok(Expression::Variable(Variable::new(&name[1..]))),
            Some(Token::Iri(iri)) => Ok(Expression::Literal(Term::iri(parse_iri_body(iri)))),
            Some(Token::StringLiteral(s)) => Ok(Expression::Literal(Term::string(decode_string(s)))),
            Some(Token::PrefixedName(s)) => {
                let (pname, local) = split_prefixed_name(s);
                Ok(Expression::Literal(resolve_prefixed_name(prefixes, pname, local)))
            }
            Some(Token::Decimal(s)) => {
                let value: f64 = s.parse().map_err(|_| self.error("invalid decimal literal"))?;
                Ok(Expression::Literal(Term::float(value)))
            }
            Some(Token::Integer(s)) => {
                let value: i64 = s.parse().map_err(|_| self.error("invalid integer literal"))?;
                Ok(Expression::Literal(Term::integer(value)))
            }
            Some(Token::True) => Ok(Expression::Literal(Term::boolean(true))),
            Some(Token::False) => Ok(Expression::Literal(Term::boolean(false))),
            Some(Token::Identifier(s)) => Ok(Expression::Literal(Term::identifier(s))),
            Some(Token::LParen) => {
                let inner = self.parse_additive_expr(prefixes)?;
                self.expect(&Token::RParen, "')'")?;
                Ok(inner)
            }
            _ => Err(self.error("expected an expression")),
        }
    }

    fn parse_order_clause(
        &mut self,
        prefixes: &HashMap<String, String>,
    ) -> Result<Option<OrderBy>, SparqlError> {
        if !self.consume(&Token::Order) {
            return Ok(None);
        }
        self.expect(&Token::By, "BY after ORDER")?;

        let (expression, direction) = match self.peek() {
            Some(Token::Asc) => {
                self.advance();
                self.expect(&Token::LParen, "'(' after ASC")?;
                let expr = self.parse_additive_expr(prefixes)?;
                self.expect(&Token::RParen, "')' closing ASC(...)")?;
                (expr, OrderDirection::Asc)
            }
            Some(Token::Desc) => {
                self.advance();
                self.expect(&Token::LParen, "'(' after DESC")?;
                let expr = self.parse_additive_expr(prefixes)?;
                self.expect(&Token::RParen, "')' closing DESC(...)")?;
                (expr, OrderDirection::Desc)
            }
            _ => (self.parse_additive_expr(prefixes)?, OrderDirection::Asc),
        };

        Ok(Some(OrderBy { expression, direction }))
    }

    fn parse_limit_offset_clauses(&mut self) -> Result<(Option<usize>, usize), SparqlError> {
        let mut limit = None;
        let mut offset = 0;

        match self.peek() {
            Some(Token::Limit) => {
                limit = Some(self.parse_limit()?);
                if self.peek() == Some(&Token::Offset) {
                    offset = self.parse_offset()?;
                }
            }
            Some(Token::Offset) => {
                offset = self.parse_offset()?;
                if self.peek() == Some(&Token::Limit) {
                    limit = Some(self.parse_limit()?);
                }
            }
            _ => {}
        }

        Ok((limit, offset))
    }

    fn parse_limit(&mut self) -> Result<usize, SparqlError> {
        self.expect(&Token::Limit, "LIMIT")?;
        match self.advance() {
            Some(Token::Integer(s)) => s.parse().map_err(|_| self.error("invalid LIMIT value")),
            _ => Err(self.error("expected an integer after LIMIT")),
        }
    }

    fn parse_offset(&mut self) -> Result<usize, SparqlError> {
        self.expect(&Token::Offset, "OFFSET")?;
        match self.advance() {
            Some(Token::Integer(s)) => s.parse().map_err(|_| self.error("invalid OFFSET value")),
            _ => Err(self.error("expected an integer after OFFSET")),
        }
    }
}

/// Strip the surrounding `<` `>` off an [`Token::Iri`](crate::lexer::Token::Iri)
/// slice. Shared with [`crate::loader`], which lexes the same token kind
/// out of an imported Turtle-like file.
pub fn parse_iri_body(raw: &str) -> &str {
    let mut input = raw;
    delimited('<', take_while(0.., |c: char| c != '>'), '>')
        .parse_next(&mut input)
        .unwrap_or(raw)
}

/// Split a [`Token::PrefixedName`](crate::lexer::Token::PrefixedName) slice
/// into its `pname` and `local` parts.
pub fn split_prefixed_name(raw: &str) -> (&str, &str) {
    let mut input = raw;
    let result = (
        take_while(1.., |c: char| c.is_alphanumeric() || c == '_'),
        preceded(':', take_while(1.., |c: char| c.is_alphanumeric() || c == '_' || c == '-')),
    )
        .parse_next(&mut input);
    result.unwrap_or((raw, ""))
}

/// Resolve a split prefixed name against a declared prefix map — an
/// unknown prefix is kept verbatim as an [`Term::Identifier`] rather than
/// erroring (§7 "Unknown prefix" policy).
pub fn resolve_prefixed_name(prefixes: &HashMap<String, String>, pname: &str, local: &str) -> Term {
    match prefixes.get(pname) {
        Some(iri) => Term::iri(format!("{iri}{local}")),
        None => Term::identifier(format!("{pname}:{local}")),
    }
}

/// Decode a [`Token::StringLiteral`](crate::lexer::Token::StringLiteral)
/// slice's backslash escapes (`\n`, `\t`, `\r`, and a literal escaped
/// character for anything else).
pub fn decode_string(raw: &str) -> String {
    let inner = &raw[1..raw.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_simple_select() {
        let query = SparqlQuery::parse("SELECT ?id ?name WHERE { ?id name ?name }").unwrap();
        assert_eq!(
            query.projection,
            Projection::Variables(vec![Variable::new("id"), Variable::new("name")])
        );
        assert!(matches!(query.root, Algebra::Pattern(_)));
    }

    #[test]
    fn parses_select_star() {
        let query = SparqlQuery::parse("SELECT * WHERE { ?id name ?name }").unwrap();
        assert_eq!(query.projection, Projection::Star);
    }

    #[test]
    fn parses_a_join_into_a_pattern_group() {
        let query = SparqlQuery::parse(
            "SELECT ?id ?name ?weight WHERE { ?id name ?name . ?id weight ?weight }",
        )
        .unwrap();
        match query.root {
            Algebra::PatternGroup(children) => assert_eq!(children.len(), 2),
            other => panic!("expected a PatternGroup, got {other:?}"),
        }
    }

    #[test]
    fn parses_union_of_two_group_patterns() {
        let query = SparqlQuery::parse(
            "SELECT ?id ?name ?weight WHERE { {?id name ?name} UNION {?id weight ?weight} }",
        )
        .unwrap();
        assert!(matches!(query.root, Algebra::UnionGroup(_, _)));
    }

    #[test]
    fn parses_nested_optionals() {
        let query = SparqlQuery::parse(
            "SELECT ?id ?value ?weight ?size WHERE { ?id name ?value OPTIONAL {?id weight ?weight} OPTIONAL {?id size ?size} }",
        )
        .unwrap();
        match query.root {
            Algebra::PatternGroup(children) => {
                assert_eq!(children.len(), 3);
                assert!(matches!(children[1], Algebra::OptionalGroup(_)));
                assert!(matches!(children[2], Algebra::OptionalGroup(_)));
            }
            other => panic!("expected a PatternGroup, got {other:?}"),
        }
    }

    #[test]
    fn parses_filter_with_numeric_comparison() {
        let query =
            SparqlQuery::parse("SELECT ?height WHERE { ?id height ?height FILTER (?height > 99) }")
                .unwrap();
        match query.root {
            Algebra::PatternGroup(children) => {
                assert_eq!(children.len(), 2);
                assert!(matches!(children[1], Algebra::Filter(_)));
            }
            other => panic!("expected a PatternGroup, got {other:?}"),
        }
    }

    #[test]
    fn parses_order_by_desc_and_limit() {
        let query = SparqlQuery::parse(
            "SELECT ?id ?name WHERE { ?id name ?name } ORDER BY DESC(?name) LIMIT 1",
        )
        .unwrap();
        assert_eq!(query.order_by.as_ref().unwrap().direction, OrderDirection::Desc);
        assert_eq!(query.limit, Some(1));
    }

    #[test]
    fn parses_offset_before_limit() {
        let query =
            SparqlQuery::parse("SELECT ?id WHERE { ?id name ?n } OFFSET 1 LIMIT 2").unwrap();
        assert_eq!(query.offset, 1);
        assert_eq!(query.limit, Some(2));
    }

    #[test]
    fn keywords_are_fully_case_insensitive() {
        let query = SparqlQuery::parse("select ?id where { ?id name ?n }").unwrap();
        assert_eq!(query.projection, Projection::Variables(vec![Variable::new("id")]));
    }

    #[test]
    fn prefix_declaration_rewrites_a_matching_prefixed_name() {
        let query = SparqlQuery::parse(
            "PREFIX ex: <http://example.org/> SELECT ?id WHERE { ?id ex:name ?n }",
        )
        .unwrap();
        match query.root {
            Algebra::Pattern(pattern) => match pattern.predicate {
                PatternTerm::Term(Term::Iri(iri)) => assert_eq!(iri, "http://example.org/name"),
                other => panic!("expected a rewritten IRI, got {other:?}"),
            },
            other => panic!("expected a Pattern, got {other:?}"),
        }
    }

    #[test]
    fn unknown_prefix_is_kept_verbatim() {
        let query = SparqlQuery::parse("SELECT ?id WHERE { ?id ex:name ?n }").unwrap();
        match query.root {
            Algebra::Pattern(pattern) => match pattern.predicate {
                PatternTerm::Term(Term::Identifier(s)) => assert_eq!(s, "ex:name"),
                other => panic!("expected a verbatim identifier, got {other:?}"),
            },
            other => panic!("expected a Pattern, got {other:?}"),
        }
    }

    #[test]
    fn malformed_query_reports_a_position() {
        let err = SparqlQuery::parse("SELECT ?id WHERE ?id name ?n }").unwrap_err();
        match err {
            SparqlError::Parse { position, .. } => assert!(position > 0),
        }
    }
}
