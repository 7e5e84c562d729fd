//! Error types for model generation.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring or writing the model.
///
/// Geometry itself never fails here; degenerate hulls only show up once the
/// scripts are rendered.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Reading a configuration file or writing a script failed.
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for this generator.
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// The requested layout cannot carry the assembly.
    #[error("invalid layout: {0}")]
    InvalidLayout(String),

    /// Keycaps only come in 1u, 1.5u and 2u.
    #[error("unrecognized key size: {0} units")]
    UnsupportedKeySize(f64),

    /// A part name that the generator does not produce.
    #[error("unknown part: {0}")]
    UnknownPart(String),
}
