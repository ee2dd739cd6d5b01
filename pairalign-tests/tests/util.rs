use std::{env, path::Path};

use anyhow::{Result, anyhow};
use clap::Parser;
use pairalign::align;

pub fn run_in_repo_root(args: &str) -> Result<()> {
    // The manifest directory is "[...]/pairalign/pairalign-tests",
    // simulate a call from the repo root by using its parent.
    let repo_root = Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .ok_or(anyhow!("No parent directory"))?;
    env::set_current_dir(repo_root)?;

    if args.starts_with("align ") {
        let args = align::Cli::parse_from(args.split_whitespace());
        align::cli(args)?;
    } else {
        return Err(anyhow!("Unknown command: {args}"));
    }

    Ok(())
}

pub fn output_file(name: &str) -> String {
    env::temp_dir()
        .join(format!("pairalign-tests-{}-{name}.toml", std::process::id()))
        .to_string_lossy()
        .into_owned()
}
