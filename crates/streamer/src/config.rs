use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::error::{Result, StreamError};

/// How the counter embedded in output filenames evolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CounterMode {
    /// Counter is re-initialized for every line, so every name embeds `0`.
    #[default]
    Literal,
    /// Counter starts at 0 for each source file and advances after each emission.
    PerFile,
}

/// What to do with a line that has no field at the configured index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MalformedPolicy {
    /// Stop the whole run with an error.
    #[default]
    Abort,
    /// Log a warning, skip the line and keep going.
    Skip,
}

/// Normalization applied to the extracted field before it becomes part of a filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldPolicy {
    /// Field used as-is; only path separators and NUL become `_`.
    #[default]
    Verbatim,
    /// Trailing line terminator trimmed, characters invalid on common platforms become `_`,
    /// field cut to [`PORTABLE_FIELD_BYTES`](crate::naming::PORTABLE_FIELD_BYTES) bytes.
    Portable,
}

macro_rules! str_enum {
    ($ty:ident { $($name:literal => $variant:ident),+ $(,)? }) => {
        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                match s {
                    $($name => Ok($ty::$variant),)+
                    other => Err(format!(
                        "unknown value {:?}, expected one of: {}",
                        other,
                        [$($name),+].join(", ")
                    )),
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $($ty::$variant => f.write_str($name),)+
                }
            }
        }
    };
}

str_enum!(CounterMode { "literal" => Literal, "per-file" => PerFile });
str_enum!(MalformedPolicy { "abort" => Abort, "skip" => Skip });
str_enum!(FieldPolicy { "verbatim" => Verbatim, "portable" => Portable });

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Directory scanned for source files.
    pub source_dir: PathBuf,
    /// Directory receiving one file per emitted line. Must already exist.
    pub destination_dir: PathBuf,
    /// Only source files whose name ends with this are processed.
    pub suffix: String,
    /// Pause after each emission, in milliseconds.
    pub interval_ms: u64,
    /// Zero-based index of the comma-separated field used in output names.
    pub field_index: usize,
    /// Literal prefix of every output filename.
    pub prefix: String,
    pub counter_mode: CounterMode,
    pub malformed_lines: MalformedPolicy,
    pub field_policy: FieldPolicy,
    /// Process source files in filename order rather than directory-listing order.
    pub sorted: bool,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("../data/streaming_data"),
            destination_dir: PathBuf::from("../stream"),
            suffix: ".csv".to_string(),
            interval_ms: 1000,
            field_index: 1,
            prefix: "tweet - ".to_string(),
            counter_mode: CounterMode::Literal,
            malformed_lines: MalformedPolicy::Abort,
            field_policy: FieldPolicy::Verbatim,
            sorted: false,
        }
    }
}

impl StreamConfig {
    /// Loads a config from a `.yaml`/`.yml` or `.json` file. Missing keys keep their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| StreamError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Ok(serde_yaml::from_str(&content)?),
            Some("json") => Ok(serde_json::from_str(&content)?),
            _ => Err(StreamError::ConfigFormat(path.to_path_buf())),
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}
