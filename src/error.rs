//! Error types for teigraph

use std::fmt;
use thiserror::Error;

/// Position in source text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pos {
    pub offset: usize,
    pub line: u32,
    pub col: u32,
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.offset, self.line, self.col)
    }
}

impl Pos {
    pub const fn new(offset: usize, line: u32, col: u32) -> Self {
        Self { offset, line, col }
    }
}

/// Span representing a range in source text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Span {
    pub start: Pos,
    pub end: Pos,
}

impl Span {
    pub const fn new(start: Pos, end: Pos) -> Self {
        Self { start, end }
    }

    pub const fn empty() -> Self {
        Self {
            start: Pos::new(0, 0, 0),
            end: Pos::new(0, 0, 0),
        }
    }
}

/// Error kind for detailed categorization
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed XML input
    Parse,
    /// Element nesting deeper than the configured limit
    MaxDepthExceeded { max: usize },
    /// XPath-like expression that cannot be compiled
    InvalidPath { path: String },
    /// Coordinate text that is not exactly two numbers
    MalformedCoordinates { text: String },
    /// URI component order indices that are not a permutation of `0..n`
    InvalidSequence { orders: Vec<usize> },
    /// Literal without a language tag where one is required
    MissingLanguage { text: String },
    /// Derived identifier is not a valid IRI
    InvalidIri { iri: String },
    Io,
    Serialization,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse => write!(f, "malformed xml"),
            Self::MaxDepthExceeded { max } => write!(f, "maximum nesting depth {max} exceeded"),
            Self::InvalidPath { path } => write!(f, "invalid path expression: {path}"),
            Self::MalformedCoordinates { text } => {
                write!(f, "malformed coordinates: {text:?}")
            }
            Self::InvalidSequence { orders } => {
                write!(f, "order indices {orders:?} are not a permutation of 0..n")
            }
            Self::MissingLanguage { text } => write!(f, "missing language tag for {text:?}"),
            Self::InvalidIri { iri } => write!(f, "invalid iri: {iri}"),
            Self::Io => write!(f, "i/o error"),
            Self::Serialization => write!(f, "serialization error"),
        }
    }
}

/// Main error type for teigraph
#[derive(Error, Clone, Debug, PartialEq)]
pub struct Error {
    kind: ErrorKind,
    span: Span,
    message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, span: Span) -> Self {
        let message = kind.to_string();
        Self {
            kind,
            span,
            message,
        }
    }

    pub fn with_message(kind: ErrorKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Create error at specific position
    pub fn at(kind: ErrorKind, offset: usize, line: u32, col: u32) -> Self {
        let pos = Pos::new(offset, line, col);
        Self::new(kind, Span::new(pos, pos))
    }

    /// Error without a source position
    pub fn unlocated(kind: ErrorKind) -> Self {
        Self::new(kind, Span::empty())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.span == Span::empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "error at {}: {}", self.span.start, self.message)
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::with_message(ErrorKind::Io, Span::empty(), err.to_string())
    }
}

impl From<oxrdf::IriParseError> for Error {
    fn from(err: oxrdf::IriParseError) -> Self {
        Self::with_message(ErrorKind::Serialization, Span::empty(), err.to_string())
    }
}

/// Result type alias for teigraph
pub type Result<T> = std::result::Result<T, Error>;
