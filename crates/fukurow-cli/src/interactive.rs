//! Interactive SPARQL prompt.
//!
//! Mirrors the REPL this pipeline was distilled from: every line that
//! isn't a recognized meta-command is parsed and run as one complete
//! SPARQL query against the in-process store, and a parse error is
//! printed without ending the session — only `quit`/`exit`/EOF do that.

use std::io::{self, BufRead, Write};

use crate::commands::{render_rows, CommandExecutor, OutputFormat};

const PROMPT: &str = "sparql> ";

pub async fn run(executor: &mut CommandExecutor) -> anyhow::Result<()> {
    println!("Fukurow SPARQL prompt. Type 'help' for commands, 'quit' to exit.");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("{PROMPT}");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            println!();
            break;
        };
        let line = line?;
        let line = line.trim();

        if line.is_empty() {
            continue;
        }

        match line {
            "quit" | "exit" => break,
            "help" => print_help(),
            "clear" => print!("\x1B[2J\x1B[1;1H"),
            _ if line.starts_with(".load ") => {
                let path = line[".load ".len()..].trim();
                load_file(executor, path);
            }
            _ => run_query(executor, line),
        }
    }

    Ok(())
}

fn run_query(executor: &CommandExecutor, text: &str) {
    match executor.store().query(text) {
        Ok(select) => {
            let rows = select.rows();
            println!("{}", render_rows(select.variables(), &rows, OutputFormat::Text));
        }
        Err(e) => eprintln!("{e}"),
    }
}

fn load_file(executor: &mut CommandExecutor, path: &str) {
    match std::fs::read_to_string(path) {
        Ok(text) => match crate::loader::parse_triples(&text) {
            Ok(triples) => {
                let count = triples.len();
                executor.store_mut().add_triples(triples);
                println!("loaded {count} triples from {path}");
            }
            Err(e) => eprintln!("{e}"),
        },
        Err(e) => eprintln!("reading {path}: {e}"),
    }
}

fn print_help() {
    println!("Available commands:");
    println!("  <SPARQL query>   Evaluate a SELECT query against the current store");
    println!("  .load <file>     Load a Turtle-like triples file into the store");
    println!("  help             Show this help");
    println!("  clear            Clear the screen");
    println!("  quit, exit       End the session");
}
