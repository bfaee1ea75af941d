//! Interactive shell and batch runner for [`foldertree::Tree`].

use clap::Parser;
use foldertree::{Tree, TreeError};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::fs;
use std::io::{self, BufRead};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const HISTORY_FILE: &str = ".foldertree_history";

const HELP_TEXT: &str = "\
commands:
  list <path>          list a folder's children
  create <path>        create an empty folder
  remove <path>        remove an empty folder
  move <src> <dst>     relocate a subtree
  help                 show this text
  quit                 exit the shell
paths look like /a/b/ (trailing slash required; / is the root)";

#[derive(Parser)]
#[command(author, version, about = "A concurrent in-memory folder tree shell")]
struct Cli {
    /// Read commands from this file (or stdin if given as "-") instead of an
    /// interactive prompt.
    #[arg(long, value_name = "FILE")]
    script: Option<String>,

    /// Increase log verbosity (stacks: -v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let tree = Tree::new();

    let result = match cli.script.as_deref() {
        Some(path) => run_script(&tree, path),
        None => run_repl(&tree),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("foldertree: {message}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn run_script(tree: &Tree, path: &str) -> Result<(), String> {
    let lines: Vec<String> = if path == "-" {
        io::stdin()
            .lock()
            .lines()
            .collect::<io::Result<_>>()
            .map_err(|e| e.to_string())?
    } else {
        fs::read_to_string(path)
            .map_err(|e| format!("{path}: {e}"))?
            .lines()
            .map(str::to_owned)
            .collect()
    };

    for line in lines {
        if let Some(reply) = dispatch(tree, &line) {
            println!("{reply}");
        }
    }
    Ok(())
}

fn run_repl(tree: &Tree) -> Result<(), String> {
    let mut editor = DefaultEditor::new().map_err(|e| e.to_string())?;
    let _ = editor.load_history(HISTORY_FILE);

    println!("{HELP_TEXT}");
    loop {
        match editor.readline("foldertree> ") {
            Ok(line) => {
                let _ = editor.add_history_entry(line.as_str());
                if line.trim() == "quit" {
                    break;
                }
                if let Some(reply) = dispatch(tree, &line) {
                    println!("{reply}");
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => return Err(e.to_string()),
        }
    }

    let _ = editor.save_history(HISTORY_FILE);
    Ok(())
}

/// Runs one command line, returning the text to print, if any. `quit` is
/// handled by the caller's loop so it can actually break out.
fn dispatch(tree: &Tree, line: &str) -> Option<String> {
    let mut words = line.split_whitespace();
    match words.next()? {
        "help" => Some(HELP_TEXT.to_owned()),
        "list" => {
            let path = words.next()?;
            Some(match tree.list(path) {
                Ok(listing) => listing,
                Err(e) => render_error(e),
            })
        }
        "create" => {
            let path = words.next()?;
            Some(render_unit(tree.create(path)))
        }
        "remove" => {
            let path = words.next()?;
            Some(render_unit(tree.remove(path)))
        }
        "move" => {
            let src = words.next()?;
            let dst = words.next()?;
            Some(render_unit(tree.move_path(src, dst)))
        }
        "quit" => None,
        other => Some(format!("unknown command: {other} (try \"help\")")),
    }
}

fn render_unit(result: Result<(), TreeError>) -> String {
    match result {
        Ok(()) => "ok".to_owned(),
        Err(e) => render_error(e),
    }
}

fn render_error(e: TreeError) -> String {
    format!("error: {e} (code {})", e.code())
}
