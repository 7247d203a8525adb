use std::fs;
use std::path::{Path, PathBuf};

use redb::backends::InMemoryBackend;
use redb::{Builder, Database, ReadableTable, TableDefinition};
use tracing::{debug, info};

use super::KvsEngine;
use crate::error::{read_error, write_error, ErrorCode, Result};

/// Name of the database file kept inside the store directory.
pub const DB_FILE: &str = "kvapi.redb";

const ENTRIES: TableDefinition<'static, &[u8], &[u8]> = TableDefinition::new("entries");

/// Engine options applied when a store is opened.
#[derive(Debug, Clone, Copy, Default)]
pub struct Config {
    /// Page cache size in bytes. `None` keeps the engine default.
    pub cache_size: Option<usize>,
}

impl Config {
    #[must_use]
    pub const fn cache_size(mut self, bytes: usize) -> Self {
        self.cache_size = Some(bytes);
        self
    }

    fn builder(&self) -> Builder {
        let mut builder = Database::builder();
        if let Some(bytes) = self.cache_size {
            builder.set_cache_size(bytes);
        }
        builder
    }
}

/// A handle to one opened store.
///
/// The handle owns the engine. Operations borrow it shared, so it can be
/// wrapped in an `Arc` and used from several threads; the engine runs one
/// writer at a time and readers against snapshots.
///
/// ```rust
/// # use kvapi::{KvStore, KvsEngine, Result};
/// # fn try_main() -> Result<()> {
/// let store = KvStore::in_memory()?;
/// store.add("name", "John")?;
/// assert!(store.add("name", "Jane").unwrap_err().is_key_conflict());
/// assert_eq!(store.get("name")?, b"John");
/// # Ok(())
/// # }
/// ```
pub struct KvStore {
    db: Database,
    location: Option<PathBuf>,
}

impl KvStore {
    /// Opens the store kept in directory `path`, creating it if needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_config(path, Config::default())
    }

    pub fn open_with_config(path: impl AsRef<Path>, config: Config) -> Result<Self> {
        let path = path.as_ref();
        let open = || -> std::result::Result<Database, redb::Error> {
            fs::create_dir_all(path).map_err(redb::Error::Io)?;
            let db = config.builder().create(path.join(DB_FILE))?;
            init_tables(&db)?;
            Ok(db)
        };
        let db = open().map_err(|source| ErrorCode::EngineOpen {
            location: path.to_path_buf(),
            source,
        })?;

        info!("Opened store at {}", path.display());
        Ok(KvStore {
            db,
            location: Some(path.to_path_buf()),
        })
    }

    /// Opens a store that keeps nothing on disk.
    pub fn in_memory() -> Result<Self> {
        let open = || -> std::result::Result<Database, redb::Error> {
            let db = Database::builder().create_with_backend(InMemoryBackend::new())?;
            init_tables(&db)?;
            Ok(db)
        };
        let db = open().map_err(|source| ErrorCode::EngineOpen {
            location: PathBuf::from(":memory:"),
            source,
        })?;

        debug!("Opened in-memory store");
        Ok(KvStore { db, location: None })
    }

    /// The directory this store was opened from, if it is on disk.
    pub fn location(&self) -> Option<&Path> {
        self.location.as_deref()
    }

    /// Releases the engine. Committed writes are already durable.
    pub fn close(self) {
        match &self.location {
            Some(path) => info!("Closed store at {}", path.display()),
            None => debug!("Closed in-memory store"),
        }
    }
}

fn init_tables(db: &Database) -> std::result::Result<(), redb::Error> {
    let txn = db.begin_write()?;
    txn.open_table(ENTRIES)?;
    txn.commit()?;
    Ok(())
}

impl KvsEngine for KvStore {
    fn add<K, V>(&self, key: K, value: V) -> Result<()>
    where
        K: AsRef<[u8]>,
        V: AsRef<[u8]>,
    {
        let (key, value) = (key.as_ref(), value.as_ref());
        let txn = self.db.begin_write().map_err(write_error)?;
        let used = {
            let mut table = txn.open_table(ENTRIES).map_err(write_error)?;
            let used = table.get(key).map_err(write_error)?.is_some();
            if !used {
                table.insert(key, value).map_err(write_error)?;
            }
            used
        };

        if used {
            txn.abort().map_err(write_error)?;
            debug!("add rejected, key {:?} is used", key);
            return Err(ErrorCode::KeyConflict { key: key.to_vec() }.into());
        }
        txn.commit().map_err(write_error)?;
        debug!("added key {:?}", key);
        Ok(())
    }

    fn update<K, V>(&self, key: K, value: V) -> Result<()>
    where
        K: AsRef<[u8]>,
        V: AsRef<[u8]>,
    {
        let (key, value) = (key.as_ref(), value.as_ref());
        let txn = self.db.begin_write().map_err(write_error)?;
        {
            let mut table = txn.open_table(ENTRIES).map_err(write_error)?;
            table.insert(key, value).map_err(write_error)?;
        }
        txn.commit().map_err(write_error)?;
        debug!("updated key {:?}", key);
        Ok(())
    }

    fn delete<K: AsRef<[u8]>>(&self, key: K) -> Result<()> {
        let key = key.as_ref();
        let txn = self.db.begin_write().map_err(write_error)?;
        let mut table = txn.open_table(ENTRIES).map_err(write_error)?;
        let removed = table.remove(key).map_err(write_error)?.is_some();
        drop(table);
        txn.commit().map_err(write_error)?;
        debug!("deleted key {:?}, present: {}", key, removed);
        Ok(())
    }

    fn get<K: AsRef<[u8]>>(&self, key: K) -> Result<Vec<u8>> {
        let key = key.as_ref();
        let txn = self.db.begin_read().map_err(read_error)?;
        let table = txn.open_table(ENTRIES).map_err(read_error)?;
        // copy out so the value outlives the snapshot
        let value = table
            .get(key)
            .map_err(read_error)?
            .map(|guard| guard.value().to_vec());

        match value {
            Some(value) => Ok(value),
            None => Err(ErrorCode::KeyNotFound { key: key.to_vec() }.into()),
        }
    }

    fn view<F>(&self, mut f: F) -> Result<()>
    where
        F: FnMut(&[u8], &[u8]),
    {
        let txn = self.db.begin_read().map_err(read_error)?;
        let table = txn.open_table(ENTRIES).map_err(read_error)?;
        let mut visited = 0usize;
        for entry in table.iter().map_err(read_error)? {
            let (key, value) = entry.map_err(read_error)?;
            f(key.value(), value.value());
            visited += 1;
        }
        debug!("viewed {} entries", visited);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let txn = self.db.begin_write().map_err(write_error)?;
        txn.delete_table(ENTRIES).map_err(write_error)?;
        txn.open_table(ENTRIES).map_err(write_error)?;
        txn.commit().map_err(write_error)?;
        info!("Cleared all entries");
        Ok(())
    }
}
