/// Errors surfaced by the render shell
use std::io;
use std::path::PathBuf;

use meshview_core::MeshError;
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum ShellError {
    #[error(transparent)]
    Mesh(#[from] MeshError),

    #[error("invalid config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: ConfigError,
    },

    #[error("terminal I/O error: {0}")]
    Io(#[from] io::Error),
}
