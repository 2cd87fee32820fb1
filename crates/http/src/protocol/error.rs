use std::io;
use thiserror::Error;

use crate::protocol::WriterState;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("request error: {source}")]
    RequestError {
        #[from]
        source: ParseError,
    },

    #[error("response error: {source}")]
    ResponseError {
        #[from]
        source: SendError,
    },
}

impl HttpError {
    /// Returns true if the error came from the underlying transport rather than
    /// from the bytes that were exchanged over it.
    pub fn is_transport(&self) -> bool {
        match self {
            HttpError::RequestError { source } => source.is_io(),
            HttpError::ResponseError { source } => source.is_io(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("malformed request line: {reason}")]
    InvalidRequestLine { reason: String },

    #[error("invalid http method: {method:?}")]
    InvalidMethod { method: String },

    #[error("invalid request target: {target:?}")]
    InvalidTarget { target: String },

    #[error("invalid http version: {reason}")]
    InvalidVersion { reason: String },

    #[error("invalid header: {reason}")]
    InvalidHeader { reason: String },

    #[error("invalid content-length header: {reason}")]
    InvalidContentLength { reason: String },

    #[error("body exceeds content-length: {received} > {declared}")]
    BodyOverflow { declared: usize, received: usize },

    #[error("parser already failed, no further input is accepted")]
    Failed,

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl ParseError {
    pub fn invalid_request_line<S: ToString>(str: S) -> Self {
        Self::InvalidRequestLine { reason: str.to_string() }
    }

    pub fn invalid_method(method: &[u8]) -> Self {
        Self::InvalidMethod { method: String::from_utf8_lossy(method).into_owned() }
    }

    pub fn invalid_target(target: &[u8]) -> Self {
        Self::InvalidTarget { target: String::from_utf8_lossy(target).into_owned() }
    }

    pub fn invalid_version<S: ToString>(str: S) -> Self {
        Self::InvalidVersion { reason: str.to_string() }
    }

    pub fn invalid_header<S: ToString>(str: S) -> Self {
        Self::InvalidHeader { reason: str.to_string() }
    }

    pub fn invalid_content_length<S: ToString>(str: S) -> Self {
        Self::InvalidContentLength { reason: str.to_string() }
    }

    pub fn body_overflow(declared: usize, received: usize) -> Self {
        Self::BodyOverflow { declared, received }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }

    #[inline]
    pub fn is_io(&self) -> bool {
        matches!(self, ParseError::Io { .. })
    }
}

#[derive(Error, Debug)]
pub enum SendError {
    #[error("response writer is in {actual:?} state, operation requires {expected:?}")]
    InvalidState { expected: WriterState, actual: WriterState },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl SendError {
    pub fn invalid_state(expected: WriterState, actual: WriterState) -> Self {
        Self::InvalidState { expected, actual }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }

    #[inline]
    pub fn is_io(&self) -> bool {
        matches!(self, SendError::Io { .. })
    }

    #[inline]
    pub fn is_invalid_state(&self) -> bool {
        matches!(self, SendError::InvalidState { .. })
    }
}
