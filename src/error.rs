//! Error types for CCT estimation and document annotation
//!
//! Decode and solver failures are never recovered internally: they abort the
//! `annotate` call that triggered them. Out-of-range chromaticities are not
//! errors at all; they produce clamp sentinels or the zero failure value (see
//! [`crate::estimate`]).

use thiserror::Error;

use crate::colorimetry::ColorimetryError;
use crate::hex::DecodeError;

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, CctError>;

/// Top-level error for estimation and annotation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CctError {
    /// A color-keyed value could not be decoded into an RGB triple
    #[error("failed to decode color '{value}': {source}")]
    Decode {
        value: String,
        #[source]
        source: DecodeError,
    },

    /// A method name that no part of the pipeline implements
    #[error("unsupported CCT method '{0}'")]
    UnsupportedMethod(String),

    /// The colorimetry solver rejected the request
    #[error("colorimetry error: {0}")]
    Colorimetry(#[from] ColorimetryError),
}

impl CctError {
    pub fn decode(value: impl Into<String>, source: DecodeError) -> Self {
        Self::Decode {
            value: value.into(),
            source,
        }
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            CctError::Decode { .. } => "decode_error",
            CctError::UnsupportedMethod(_) => "unsupported_method",
            CctError::Colorimetry(ColorimetryError::UnsupportedMethod(_)) => "unsupported_method",
        }
    }

    /// Every operation here is deterministic, so nothing is worth retrying.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
