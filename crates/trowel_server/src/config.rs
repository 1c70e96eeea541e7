//! Server configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

/// Configuration for the sync server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to.
    pub bind_addr: SocketAddr,
    /// Directory holding one subdirectory per trench.
    pub root: PathBuf,
    /// Maximum accepted attachment upload size in bytes.
    pub max_attachment_bytes: usize,
}

impl ServerConfig {
    /// Creates a configuration serving trenches from `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 4571)),
            root: root.into(),
            max_attachment_bytes: 256 * 1024 * 1024,
        }
    }

    /// Sets the bind address.
    #[must_use]
    pub fn with_bind_addr(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    /// Sets the maximum attachment upload size.
    #[must_use]
    pub fn with_max_attachment_bytes(mut self, max: usize) -> Self {
        self.max_attachment_bytes = max;
        self
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new("trenches")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.root, PathBuf::from("trenches"));
        assert_eq!(config.bind_addr.port(), 4571);
    }

    #[test]
    fn config_builder() {
        let config = ServerConfig::new("/var/lib/trowel")
            .with_bind_addr("0.0.0.0:9000".parse().unwrap())
            .with_max_attachment_bytes(1024);

        assert_eq!(config.root, PathBuf::from("/var/lib/trowel"));
        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.max_attachment_bytes, 1024);
    }
}
