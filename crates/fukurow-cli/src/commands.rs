//! CLI command definitions and handlers.
//!
//! Three operations over one [`SparqlStore`]: `load` a Turtle-like file
//! standalone, `query` it once non-interactively, or `repl` it into an
//! interactive prompt. `repl` with a preload file and no subcommand at all
//! are the two entry points the pipeline this crate wraps was distilled
//! from (`import_file` + `run_prompt`); `load` and `query` exist so the
//! same loader and store can be driven from a script without a live prompt.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use fukurow_core::{Term, Variable};
use fukurow_sparql::SparqlStore;

use crate::loader;

#[derive(Parser)]
#[command(name = "fukurow-cli")]
#[command(about = "In-memory SPARQL SELECT query engine")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Turtle-like triples file to preload before starting the prompt,
    /// when no subcommand is given (`fukurow-cli data.ttl`).
    pub preload: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load a Turtle-like triples file and report how many triples it holds.
    Load { file: PathBuf },

    /// Load a triples file (optional) and run one SPARQL query against it.
    Query {
        #[arg(long)]
        data: Option<PathBuf>,
        #[arg(long)]
        query: Option<String>,
        #[arg(long = "query-file")]
        query_file: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Start an interactive prompt, optionally preloaded from a triples file.
    Repl { data: Option<PathBuf> },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

pub struct CommandResult {
    pub success: bool,
    pub message: String,
}

/// Owns the in-process store every command runs against. Not a
/// process-wide singleton — constructed fresh per CLI invocation.
pub struct CommandExecutor {
    store: SparqlStore,
}

impl Default for CommandExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandExecutor {
    pub fn new() -> Self {
        CommandExecutor { store: SparqlStore::new() }
    }

    pub fn store(&self) -> &SparqlStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut SparqlStore {
        &mut self.store
    }

    pub async fn execute(&mut self, command: Commands) -> Result<CommandResult> {
        match command {
            Commands::Load { file } => self.load(&file),
            Commands::Query { data, query, query_file, format } => {
                self.query(data.as_deref(), query, query_file, format)
            }
            Commands::Repl { data } => {
                if let Some(path) = &data {
                    self.load(path)?;
                }
                crate::interactive::run(self).await?;
                Ok(CommandResult { success: true, message: String::new() })
            }
        }
    }

    fn load(&mut self, file: &Path) -> Result<CommandResult> {
        let text = std::fs::read_to_string(file)
            .map_err(|e| anyhow::anyhow!("reading {}: {e}", file.display()))?;
        let triples = loader::parse_triples(&text)?;
        let count = triples.len();
        self.store.add_triples(triples);
        tracing::info!(path = %file.display(), count, "loaded triples");
        Ok(CommandResult {
            success: true,
            message: format!("loaded {count} triples from {}", file.display()),
        })
    }

    fn query(
        &mut self,
        data: Option<&Path>,
        query: Option<String>,
        query_file: Option<PathBuf>,
        format: OutputFormat,
    ) -> Result<CommandResult> {
        if let Some(path) = data {
            self.load(path)?;
        }
        let text = match (query, query_file) {
            (Some(q), _) => q,
            (None, Some(path)) => std::fs::read_to_string(&path)
                .map_err(|e| anyhow::anyhow!("reading {}: {e}", path.display()))?,
            (None, None) => bail!("query requires --query or --query-file"),
        };
        let select = self.store.query(&text)?;
        let rows = select.rows();
        tracing::info!(rows = rows.len(), "query evaluated");
        Ok(CommandResult {
            success: true,
            message: render_rows(select.variables(), &rows, format),
        })
    }
}

/// Render result rows for CLI output — shared by non-interactive `query`
/// and the interactive prompt.
pub fn render_rows(variables: &[Variable], rows: &[Vec<Option<Term>>], format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => render_text(variables, rows),
        OutputFormat::Json => render_json(variables, rows),
    }
}

fn render_text(variables: &[Variable], rows: &[Vec<Option<Term>>]) -> String {
    let header = variables.iter().map(Variable::to_string).collect::<Vec<_>>().join("\t");
    let mut lines = vec![header];
    for row in rows {
        let line = row
            .iter()
            .map(|cell| cell.as_ref().map(Term::to_string).unwrap_or_else(|| "null".to_string()))
            .collect::<Vec<_>>()
            .join("\t");
        lines.push(line);
    }
    lines.join("\n")
}

fn render_json(variables: &[Variable], rows: &[Vec<Option<Term>>]) -> String {
    let rows_json: Vec<serde_json::Value> = rows
        .iter()
        .map(|row| {
            serde_json::Value::Array(
                row.iter().map(|cell| cell.as_ref().map(term_to_json).unwrap_or(serde_json::Value::Null)).collect(),
            )
        })
        .collect();
    let payload = serde_json::json!({
        "variables": variables.iter().map(Variable::name).collect::<Vec<_>>(),
        "rows": rows_json,
    });
    serde_json::to_string_pretty(&payload).unwrap_or_default()
}

fn term_to_json(term: &Term) -> serde_json::Value {
    match term {
        Term::Iri(s) => serde_json::json!({"type": "iri", "value": s}),
        Term::String(s) => serde_json::json!({"type": "string", "value": s}),
        Term::Integer(i) => serde_json::json!({"type": "integer", "value": i}),
        Term::Float(f) => serde_json::json!({"type": "float", "value": f.0}),
        Term::Boolean(b) => serde_json::json!({"type": "boolean", "value": b}),
        Term::Identifier(s) => serde_json::json!({"type": "identifier", "value": s}),
    }
}
