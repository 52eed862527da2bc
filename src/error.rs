//! Error taxonomy for the parameter layer and the controllability routine.
//!
//! Every error is terminal for the single computation that raised it; there
//! are no retry semantics in a deterministic numerical routine. The caller
//! decides whether to retry with adjusted parameters.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// All failure modes of the library.
#[derive(Debug, Error)]
pub enum Error {
    /// The rotor-count/coaxial pair does not name a supported multicopter
    /// layout. Supported: 4/6/8 rotors simple, 8/12 rotors coaxial.
    #[error("unsupported multicopter layout: {rotors} rotors, coaxial = {coaxial}")]
    UnsupportedConfiguration {
        /// Requested rotor count.
        rotors: usize,
        /// Requested coaxial flag.
        coaxial: bool,
    },

    /// A physical parameter was rejected at entry.
    #[error("parameter `{name}` must be positive, got {value}")]
    InvalidParameter {
        /// Name of the offending parameter.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// Singular or ill-conditioned matrix encountered during inversion,
    /// null-space computation, or matrix-exponential integration.
    #[error("numerical singularity: {0}")]
    Singular(String),

    /// A declarative definition (problem, mission, parameter tree) is
    /// structurally invalid.
    #[error("invalid definition: {0}")]
    Definition(String),

    /// File access failed while loading a definition.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A TOML definition file could not be parsed.
    #[error("toml parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A JSON parameter tree could not be parsed or written.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<ndarray_linalg::error::LinalgError> for Error {
    fn from(err: ndarray_linalg::error::LinalgError) -> Self {
        Error::Singular(err.to_string())
    }
}
