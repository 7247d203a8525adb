//! A transactional key-value access layer over an embedded ordered store.
//!
//! Open a [`KvStore`] once and pass it to every operation of [`KvsEngine`]:
//! `add` (insert if absent), `update` (upsert), `delete` (idempotent),
//! `get` (owned copy, typed absence) and `view` (ordered snapshot scan).

pub use engine::redb::{Config, KvStore, DB_FILE};
pub use engine::KvsEngine;
pub use error::{ErrorCode, KvError, Result};

pub mod error;
mod engine;
