use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use jsonform::config::Config;
use jsonform::repl::{Outcome, Repl};
use jsonform::{EditorSession, Separator};

/// jsonform - build and edit JSON documents field by field
#[derive(Parser)]
#[command(name = "jsonform")]
#[command(version)]
#[command(about = "Build and edit JSON documents through path-addressed fields", long_about = None)]
struct Cli {
    /// JSON file to import at start-up
    file: Option<PathBuf>,

    /// Config file (default: ~/.config/jsonform/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Spaces per indentation level when exporting (0 for compact output)
    #[arg(short, long)]
    indent: Option<usize>,

    /// Character separating keys in paths
    #[arg(short, long, value_parser = parse_separator)]
    separator: Option<char>,

    /// Start from the sample document
    #[arg(long)]
    sample: bool,

    /// Run a command and exit instead of reading commands from stdin (repeatable)
    #[arg(short = 'c', long = "command")]
    commands: Vec<String>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_separator(arg: &str) -> Result<char, String> {
    let mut chars = arg.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Separator::checked(c).map(|_| c).map_err(|e| e.to_string()),
        _ => Err("expected a single character".to_string()),
    }
}

fn init_tracing(config: &Config, verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load(),
    };
    if let Some(indent) = cli.indent {
        config.indent_size = indent;
    }
    if let Some(separator) = cli.separator {
        config.separator = separator;
    }
    config.load_sample |= cli.sample;

    init_tracing(&config, cli.verbose);

    let mut session = EditorSession::from_config(&config)?;
    if let Some(file) = &cli.file {
        let text = std::fs::read_to_string(file)
            .with_context(|| format!("Failed to read {}", file.display()))?;
        session
            .import(&text)
            .with_context(|| format!("Failed to import {}", file.display()))?;
    }

    let mut repl = Repl::new(session);

    if !cli.commands.is_empty() {
        for command in &cli.commands {
            match repl.execute(command)? {
                Outcome::Continue(Some(message)) => println!("{}", message),
                Outcome::Continue(None) => {}
                Outcome::Quit => break,
            }
        }
        return Ok(());
    }

    let interactive = io::stdin().is_terminal();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        if interactive {
            print!("jsonform> ");
            io::stdout().flush()?;
        }
        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("Failed to read from stdin")?;
        match repl.execute(&line) {
            Ok(Outcome::Continue(Some(message))) => println!("{}", message),
            Ok(Outcome::Continue(None)) => {}
            Ok(Outcome::Quit) => break,
            Err(err) => eprintln!("error: {:#}", err),
        }
    }

    Ok(())
}
