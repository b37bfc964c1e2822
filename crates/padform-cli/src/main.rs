mod error;
mod expand;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use error::{CliError, ErrorCode};

#[derive(Parser)]
#[command(name = "padform", version, about = "Expand footprint definitions into sheet shapes")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Expand footprints and write their shapes as JSON
    Expand(ExpandArgs),
}

#[derive(Args)]
struct ExpandArgs {
    /// Footprint files (YAML, or JSON by extension)
    #[arg(value_name = "FOOTPRINT", required = true)]
    inputs: Vec<PathBuf>,

    /// Expansion config (distances, stack)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output directory
    #[arg(short, long, value_name = "DIR", default_value = "output")]
    output: PathBuf,

    /// Print shape counts instead of writing files
    #[arg(long)]
    summary: bool,

    /// Number of internal copper layers (overrides the config)
    #[arg(long, value_name = "N")]
    internal_layers: Option<usize>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if !err.use_stderr() => {
            let _ = err.print();
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            let _ = err.print();
            return ErrorCode::Usage.into();
        }
    };
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            error::exit_code_for(&err)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Expand(args) => run_expand(args).await,
    }
}

async fn run_expand(args: ExpandArgs) -> Result<()> {
    if !args.summary && args.output.is_file() {
        return Err(CliError::usage(format!(
            "--output {} is a file, expected a directory",
            args.output.display()
        ))
        .into());
    }
    if !args.summary {
        if let Some(name) = expand::duplicate_name(&args.inputs) {
            return Err(CliError::usage(format!(
                "two inputs would both write {name}.shapes.json"
            ))
            .into());
        }
    }
    let config = Arc::new(expand::load_config(
        args.config.as_deref(),
        args.internal_layers,
    )?);

    let handles: Vec<_> = args
        .inputs
        .into_iter()
        .map(|path| {
            let config = Arc::clone(&config);
            tokio::task::spawn_blocking(move || {
                let shapes = expand::expand_file(&path, &config);
                (path, shapes)
            })
        })
        .collect();

    let mut expanded = Vec::with_capacity(handles.len());
    for handle in handles {
        let (path, shapes) = handle
            .await
            .map_err(|e| CliError::processing(format!("expansion task failed: {e}")))?;
        let shapes = shapes.with_context(|| format!("while expanding {}", path.display()))?;
        expanded.push((path, shapes));
    }

    if args.summary {
        for (path, shapes) in &expanded {
            println!("{}", expand::summary_line(&expand::footprint_name(path), shapes));
        }
        return Ok(());
    }

    for (path, shapes) in &expanded {
        let target = expand::write_shapes(&args.output, path, shapes)?;
        tracing::info!(path = %target.display(), "wrote");
    }
    println!(
        "Expanded {} footprint(s) into {}",
        expanded.len(),
        args.output.display()
    );
    Ok(())
}
