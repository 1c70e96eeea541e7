//! The `inspect` command.

use std::path::Path;
use trowel_store::{FileTrench, VersionStore};

/// Prints a trench's head and record summary.
pub fn run(root: &Path, name: &str) -> Result<(), Box<dyn std::error::Error>> {
    let trench = FileTrench::open(root, name)?;

    match trench.head()? {
        Some(head) => println!("head:    {head}"),
        None => println!("head:    (no history)"),
    }

    let records = trench.current()?;
    println!("records: {}", records.len());
    for (id, survey) in records.iter() {
        println!("  {id} ({} fields)", survey.len());
    }

    let attachments = count_attachments(&trench.path().join("attachments"))?;
    println!("attachments: {attachments}");

    Ok(())
}

/// Counts blobs under the attachments directory, skipping validator
/// sidecars.
fn count_attachments(dir: &Path) -> std::io::Result<usize> {
    if !dir.is_dir() {
        return Ok(0);
    }
    let mut count = 0;
    let mut stack = vec![dir.to_path_buf()];
    while let Some(dir) = stack.pop() {
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
            } else if path.extension().is_none_or(|ext| ext != "etag") {
                count += 1;
            }
        }
    }
    Ok(count)
}
