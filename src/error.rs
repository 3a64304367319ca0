use std::fmt;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UngzError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid gzip header: {0}")]
    InvalidHeader(&'static str),

    #[error("unsupported block type {0} (only dynamic Huffman blocks are handled)")]
    UnsupportedBlockType(u8),

    #[error("invalid Huffman symbol in compressed stream")]
    InvalidSymbol,

    #[error("malformed code length table: {0}")]
    MalformedLengthTable(&'static str),

    #[error("invalid back-reference distance {distance} (window holds {resident} bytes)")]
    InvalidDistance { distance: usize, resident: usize },

    #[error("unexpected end of compressed data")]
    UnexpectedEof,

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("file not found: {0}")]
    FileNotFound(String),
}

impl UngzError {
    pub fn invalid_argument<T: fmt::Display>(msg: T) -> Self {
        UngzError::InvalidArgument(msg.to_string())
    }
}

pub type UngzResult<T> = Result<T, UngzError>;
