use anyhow::Context;
use clap::{Parser, Subcommand};
use libctph::{Signature, hash_reader};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ctph", about = "Fuzzy hashing and signature comparison")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the fuzzy hash of each file
    Hash {
        /// Files to hash
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Omit the file name column
        #[arg(long, short)]
        bare: bool,
    },
    /// Print the edit distance between two signatures
    Compare {
        /// First signature, e.g. 24:O7XC9FZ2...:O7S9FZ2L...
        first: String,
        /// Second signature
        second: String,
    },
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn hash_file(path: &Path) -> anyhow::Result<Signature> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    hash_reader(BufReader::new(file)).with_context(|| format!("hashing {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Hash { files, bare } => {
            for path in files {
                let signature = hash_file(&path)?;
                info!(path = %path.display(), %signature, "hashed file");
                if bare {
                    println!("{signature}");
                } else {
                    println!("{signature},\"{}\"", path.display());
                }
            }
        }
        Commands::Compare { first, second } => {
            let distance = libctph::compare(&first, &second)?;
            println!("{distance}");
        }
    }

    Ok(())
}
