use anyhow::Result;
use clap::Parser;
use pairalign::align;

#[derive(Parser)]
#[command(version, about)]
enum Cli {
    /// Compute all co-optimal alignments of two sequences.
    Align(align::Cli),
}

fn main() -> Result<()> {
    match Cli::parse() {
        Cli::Align(cli) => align::cli(cli),
    }
}
