use std::fmt;
use thiserror::Error;

/// Where in the request the parser was when it gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    RequestLine,
    Headers,
    Body,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::RequestLine => f.write_str("request line"),
            Stage::Headers => f.write_str("headers"),
            Stage::Body => f.write_str("body"),
        }
    }
}

/// Fatal request parsing failures. Every variant aborts the current request.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The request line does not split into method, target and version.
    #[error("malformed request line: {0:?}")]
    MalformedRequestLine(String),

    #[error("unsupported method: {0}")]
    UnsupportedMethod(String),

    /// The same header field name was sent twice.
    #[error("duplicate header field: {0}")]
    DuplicateHeaderField(String),

    #[error("{stage} line exceeds {limit} bytes")]
    LineTooLong { stage: Stage, limit: usize },

    /// The stream ended before `Content-Length` bytes arrived.
    #[error("truncated body: expected {expected} bytes, received {received}")]
    TruncatedBody { expected: usize, received: usize },

    #[error("failed to read {stage}")]
    StreamReadFailure {
        stage: Stage,
        #[source]
        source: std::io::Error,
    },
}

impl ParseError {
    pub fn stage(&self) -> Stage {
        match self {
            Self::MalformedRequestLine(_) | Self::UnsupportedMethod(_) => Stage::RequestLine,
            Self::DuplicateHeaderField(_) => Stage::Headers,
            Self::TruncatedBody { .. } => Stage::Body,
            Self::LineTooLong { stage, .. } | Self::StreamReadFailure { stage, .. } => *stage,
        }
    }
}

pub type Result<T> = std::result::Result<T, ParseError>;
