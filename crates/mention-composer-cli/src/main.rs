use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mention_composer_engine::{deserialize, is_equivalent, strip_to_plain};

#[derive(Parser)]
#[command(
    name = "mention-composer",
    about = "Inspect and convert persisted mention-template values"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Strip markup down to the raw-token plain form sent to the backend
    Strip {
        /// Input file; reads stdin when omitted
        file: Option<PathBuf>,
    },
    /// Parse a persisted value and print its node list as JSON
    Inspect {
        /// Input file; reads stdin when omitted
        file: Option<PathBuf>,
    },
    /// Compare two persisted values for semantic equivalence.
    /// Exits 0 when equivalent, 1 otherwise.
    Equiv { a: PathBuf, b: PathBuf },
}

fn read_input(file: Option<&PathBuf>) -> Result<String> {
    let content = match file {
        Some(path) => read_file(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            buf
        }
    };
    Ok(content.trim_end_matches('\n').to_string())
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Strip { file } => {
            let input = read_input(file.as_ref())?;
            println!("{}", strip_to_plain(&input));
        }
        Command::Inspect { file } => {
            let input = read_input(file.as_ref())?;
            let doc = deserialize(&input);
            println!("{}", serde_json::to_string_pretty(doc.nodes())?);
        }
        Command::Equiv { a, b } => {
            let left = read_file(&a)?;
            let right = read_file(&b)?;
            if is_equivalent(
                left.trim_end_matches('\n'),
                right.trim_end_matches('\n'),
            ) {
                println!("equivalent");
            } else {
                println!("different");
                process::exit(1);
            }
        }
    }
    Ok(())
}
