/// Error types for parsing, coloring and session handling
use thiserror::Error;

/// Failure to decode STL bytes into a mesh
#[derive(Debug, Error, PartialEq)]
pub enum StlError {
    #[error("file too small to be a valid STL ({0} bytes)")]
    TooShort(usize),
    #[error("binary STL declares {declared} triangles but only {available} fit in the file")]
    Truncated { declared: usize, available: usize },
    #[error("malformed ASCII STL: {0}")]
    Ascii(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GradientError {
    #[error("a gradient needs at least two anchor colors, got {0}")]
    TooFewAnchors(usize),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColorizeError {
    #[error("gradient has {colors} colors but mesh has {triangles} triangles")]
    LengthMismatch { triangles: usize, colors: usize },
    #[error("{triangles} triangles exceed the 32-bit index range")]
    IndexOverflow { triangles: usize },
}

/// Anything that can abort a session operation.
///
/// The session state from before the failed operation stays in place.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("could not parse file: {0}")]
    Parse(#[from] StlError),
    #[error(transparent)]
    Gradient(#[from] GradientError),
    #[error(transparent)]
    Colorize(#[from] ColorizeError),
}
