//! # fukurow-cli
//!
//! The SPARQL query pipeline's external collaborator: a small `clap`-based
//! command surface over [`fukurow_sparql::SparqlStore`], plus an
//! interactive prompt and a Turtle-style bulk loader. Neither module is
//! part of the core pipeline — both consume only the store's
//! `add_triples`/`query` contract, the same one any other caller would use.

pub mod commands;
pub mod interactive;
pub mod loader;
