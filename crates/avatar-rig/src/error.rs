use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Error types for avatar model loading
#[derive(Error, Debug)]
pub enum LoadError {
    /// I/O error while reading the model file
    #[error("I/O error reading '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The glTF document could not be parsed or failed validation
    #[error("glTF error: {0}")]
    Gltf(#[from] gltf::Error),

    /// A node refers to a parent that does not exist
    #[error("Reference error: node {node} has invalid parent {parent}")]
    InvalidParent { node: usize, parent: usize },
}

/// Result type using LoadError
pub type Result<T> = std::result::Result<T, LoadError>;
