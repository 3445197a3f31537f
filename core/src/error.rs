//! Error type shared by every fact parser.
//!
//! A parser either returns fully structured data or one of these errors.
//! Empty input is always an error so consumers never have to distinguish
//! "nothing configured" from "nothing parsed".

use thiserror::Error;

/// Errors raised while turning captured text into structured facts.
#[derive(Debug, Error)]
pub enum ParseError {
    /// An active line is missing the separator the format requires.
    #[error("missing '{delimiter}' delimiter in line: {line}")]
    MissingDelimiter {
        /// The separator that was expected (e.g. `:`).
        delimiter: char,
        /// The offending line, after active-line filtering.
        line: String,
    },

    /// Parsing finished without producing any data.
    #[error("no data parsed from {what}")]
    NoData {
        /// Human-readable name of the content that was empty.
        what: &'static str,
    },

    /// A fixed-width table has no data rows and the caller required some.
    #[error("fixed-width table contains no data rows")]
    EmptyTable,

    /// JSON content could not be decoded.
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// JSON content decoded to something other than an object.
    #[error("expected a JSON object at the top level")]
    NotAnObject,

    /// No parser is registered for the requested spec name.
    #[error("no parser registered for spec '{0}'")]
    UnsupportedSpec(String),
}

/// Convenience alias for results with [`ParseError`].
pub type Result<T> = std::result::Result<T, ParseError>;
