use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use contest::{record_test, CommandLine};
use tokio::io::BufReader;

/// Record one run of a command-line program as a reproducible test case.
#[derive(Parser, Debug)]
#[command(name = "contest", version, about)]
struct Cli {
    /// Path to the YAML test recipe file
    recipe: PathBuf,

    /// Name to record the test under; must not already be in the recipe
    test_name: String,

    /// Executable and arguments to run and record
    #[arg(required = true, num_args = 1.., trailing_var_arg = true, allow_hyphen_values = true)]
    command: Vec<String>,

    /// Verbose output
    #[arg(long, default_value_t = false)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let command = CommandLine::new(cli.command)?;
    let workdir = std::env::current_dir()?;
    let input = BufReader::new(tokio::io::stdin());

    record_test(&cli.recipe, &cli.test_name, command, &workdir, input).await?;
    Ok(())
}
