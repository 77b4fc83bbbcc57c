use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use jsonxs::config::Config;
use jsonxs::file::loader::{load_document, load_document_from_stdin};
use jsonxs::file::saver::{render_document, save_document};
use jsonxs::file::DocumentFormat;
use jsonxs::{evaluate, Action, Path, Value};

/// jsonxs - get, set and delete values in JSON and YAML documents
#[derive(Parser)]
#[command(name = "jsonxs")]
#[command(version)]
#[command(about = "Get, set and delete values in JSON and YAML documents", long_about = None)]
struct Cli {
    /// Path expression, e.g. feed.tags[-1] or feed.short\.desc
    expression: String,

    /// Document to read (omit or use '-' to read stdin)
    file: Option<PathBuf>,

    /// Action: get, set, del, append, insert, mkdict or mklist
    #[arg(short, long, default_value = "get")]
    action: String,

    /// Value for set, append and insert (JSON literal, otherwise a plain string)
    #[arg(short, long)]
    value: Option<String>,

    /// Value printed by get when the path does not exist
    #[arg(short, long)]
    default: Option<String>,

    /// Output format (default: same as the input)
    #[arg(short, long)]
    format: Option<DocumentFormat>,

    /// Write the modified document back to FILE instead of stdout
    #[arg(short, long)]
    in_place: bool,

    /// Print JSON on a single line
    #[arg(short, long)]
    compact: bool,

    /// Log debug information to stderr
    #[arg(long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let action: Action = cli.action.parse()?;
    // Reject bad expressions before reading any input
    let path: Path = cli
        .expression
        .parse()
        .with_context(|| format!("Invalid path expression '{}'", cli.expression))?;

    let file = cli.file.filter(|f| f.as_os_str() != "-");
    if cli.in_place && file.is_none() {
        bail!("--in-place needs a FILE to write to");
    }

    let (mut document, input_format) = match &file {
        Some(path) => load_document(path)?,
        None => load_document_from_stdin()?,
    };

    let mut config = Config::load();
    if cli.compact {
        config.compact = true;
    }
    let output_format = cli.format.or(config.output_format).unwrap_or(input_format);

    let result = evaluate(
        &mut document,
        &path,
        action,
        cli.value.as_deref().map(Value::from_literal),
        cli.default.as_deref().map(Value::from_literal),
    )
    .with_context(|| format!("Cannot {} '{}'", action, cli.expression))?;

    let output = match (result, &file) {
        (Some(found), _) => render_document(&found, output_format, &config)?,
        (None, Some(target)) if cli.in_place => {
            save_document(target, &document, output_format, &config)?;
            return Ok(());
        }
        (None, _) => render_document(&document, output_format, &config)?,
    };

    let mut stdout = io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    stdout.flush()?;

    Ok(())
}
