//! The `serve` command.

use std::net::SocketAddr;
use std::path::Path;
use trowel_server::ServerConfig;

/// Runs the sync server until interrupted.
pub fn run(root: &Path, bind: SocketAddr) -> Result<(), Box<dyn std::error::Error>> {
    if !root.is_dir() {
        return Err(format!("trench root does not exist: {}", root.display()).into());
    }

    let config = ServerConfig::new(root).with_bind_addr(bind);
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(trowel_server::serve(config))?;
    Ok(())
}
