use thiserror::Error;

use crate::Symbol;

/// Everything that can go wrong while building, reading or walking a code tree.
///
/// Building and serializing never fail on their own; errors come from
/// oversized counts, malformed table text, exhausted bit sources and I/O.
#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed table row at line {line}: {reason}")]
    MalformedTableRow { line: usize, reason: String },

    #[error(
        "empty path for symbol {symbol}{}",
        .line.map(|l| format!(" at line {}", l)).unwrap_or_default()
    )]
    EmptyPath { symbol: Symbol, line: Option<usize> },

    #[error("bit source exhausted after {position} bits")]
    PrematureEndOfBits { position: usize },

    #[error("path for symbol {symbol} collides with an existing branch")]
    ConflictingPath { symbol: Symbol },

    #[error("code tree has an internal node with a missing branch")]
    IncompleteTree,

    #[error("code tree is a single leaf without the end-of-data symbol {sentinel}")]
    MissingSentinel { sentinel: Symbol },

    #[error("symbol {0} has no code")]
    UnknownSymbol(Symbol),

    #[error("symbol {symbol} is outside an alphabet of size {alphabet_size}")]
    SymbolOutOfRange { symbol: Symbol, alphabet_size: u32 },

    #[error("count for symbol {symbol} pushes the total weight out of range")]
    CountOverflow { symbol: Symbol },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
