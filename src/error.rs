use std::{backtrace::Backtrace, fmt::Formatter, ops::Deref, path::PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ErrorCode {
    #[error("open database at {}: {source}", .location.display())]
    EngineOpen {
        location: PathBuf,
        #[source]
        source: redb::Error,
    },
    #[error("key {key:?} is used")]
    KeyConflict { key: Vec<u8> },
    #[error("key {key:?} not found")]
    KeyNotFound { key: Vec<u8> },
    #[error("read transaction: {0}")]
    EngineRead(#[source] redb::Error),
    #[error("write transaction: {0}")]
    EngineWrite(#[source] redb::Error),
}

pub type Result<T> = std::result::Result<T, KvError>;

/// The error returned by every store operation.
///
/// Derefs to [`ErrorCode`], so callers branch on the kind with
/// `match &*err { ErrorCode::KeyNotFound { .. } => .., _ => .. }`.
#[derive(Error)]
#[error("{inner}")]
pub struct KvError {
    #[source]
    inner: Box<ErrorCode>,
    trace: Box<Backtrace>,
}

impl KvError {
    pub fn is_key_conflict(&self) -> bool {
        matches!(*self.inner, ErrorCode::KeyConflict { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(*self.inner, ErrorCode::KeyNotFound { .. })
    }

    /// The offending key, for the kinds caused by key state.
    pub fn key(&self) -> Option<&[u8]> {
        match &*self.inner {
            ErrorCode::KeyConflict { key } | ErrorCode::KeyNotFound { key } => Some(key),
            _ => None,
        }
    }

    pub fn into_code(self) -> ErrorCode {
        *self.inner
    }
}

impl Deref for KvError {
    type Target = ErrorCode;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl From<ErrorCode> for KvError {
    fn from(value: ErrorCode) -> Self {
        KvError {
            inner: Box::new(value),
            trace: Box::new(Backtrace::capture()),
        }
    }
}

impl core::fmt::Debug for KvError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\n{}", self.inner, self.trace)
    }
}

/// Wraps a failure inside a read-only transaction.
pub(crate) fn read_error<E: Into<redb::Error>>(err: E) -> KvError {
    ErrorCode::EngineRead(err.into()).into()
}

/// Wraps a failure inside a read-write transaction.
pub(crate) fn write_error<E: Into<redb::Error>>(err: E) -> KvError {
    ErrorCode::EngineWrite(err.into()).into()
}
