//! The `init` command.

use std::fs;
use std::path::Path;
use trowel_store::FileTrench;

/// Provisions a new trench under the root directory.
pub fn run(root: &Path, name: &str) -> Result<(), Box<dyn std::error::Error>> {
    fs::create_dir_all(root)?;
    let trench = FileTrench::create(root, name)?;
    println!("Initialized trench '{}' at {}", name, trench.path().display());
    Ok(())
}
