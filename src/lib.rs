pub mod cli;
pub mod core;
pub mod error;
pub mod flags;
pub mod fs;
pub mod models;

use std::io::Write;

use anyhow::Result;

/// Resolves the invocation, materializes the tree, renders it. The resolved
/// [`cli::Args`] is read-only from here on; descent clones it with a new
/// path.
pub async fn run<W: Write>(tokens: &[String], out: &mut W) -> Result<()> {
    let args = cli::Args::parse(tokens)?;
    let fs = fs::RealFileSystem;
    let tree = core::walk::build_tree(&fs, &args).await?;
    core::render::render(out, &tree, &args)?;
    Ok(())
}
