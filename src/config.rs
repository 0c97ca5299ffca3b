//! Server Configuration

use std::path::PathBuf;

/// Default bind address, matching the service this replaces.
pub const DEFAULT_ADDR: &str = "127.0.0.1:3999";

/// Default model artifact directory, relative to the working directory.
pub const DEFAULT_MODEL_DIR: &str = "models";

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to
    pub bind_addr: String,
    /// Directory holding the three model artifacts
    pub model_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_ADDR.into(),
            model_dir: DEFAULT_MODEL_DIR.into(),
        }
    }
}

impl ServerConfig {
    /// Build from environment, falling back to defaults.
    ///
    /// `FLOWSCOPE_ADDR` overrides the bind address and
    /// `FLOWSCOPE_MODEL_DIR` the artifact directory.
    pub fn from_env() -> Self {
        Self {
            bind_addr: std::env::var("FLOWSCOPE_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.into()),
            model_dir: std::env::var("FLOWSCOPE_MODEL_DIR")
                .unwrap_or_else(|_| DEFAULT_MODEL_DIR.into())
                .into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr, "127.0.0.1:3999");
        assert_eq!(config.model_dir, PathBuf::from("models"));
    }
}
