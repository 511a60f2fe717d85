use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VoxError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serde json error: {0}")]
    SerdeJson(#[from] serde_json::Error),
    #[error("serde yaml error: {0}")]
    SerdeYaml(#[from] serde_yaml::Error),
    #[error("malformed alias file {path:?}: {reason}")]
    MalformedAliasFile { path: PathBuf, reason: String },
    #[error("malformed taxonomy: {0}")]
    MalformedTaxonomy(String),
    #[error("taxonomy conflict at {path}")]
    TreeConflict { path: String },
}

pub type Result<T> = std::result::Result<T, VoxError>;
