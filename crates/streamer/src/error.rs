use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StreamError {
    #[error("cannot read source directory {path:?}: {source}")]
    SourceDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read source file {path:?}: {source}")]
    SourceFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write output file {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path:?} line {line}: no field at index {index}")]
    MalformedLine {
        path: PathBuf,
        line: usize,
        index: usize,
    },

    #[error("cannot read config {path:?}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML config error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON config error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported config format: {0:?}")]
    ConfigFormat(PathBuf),
}

pub type Result<T> = std::result::Result<T, StreamError>;
