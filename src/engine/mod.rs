use crate::Result;

/// The transactional access contract over an ordered key-value store.
///
/// Every call runs exactly one engine transaction and either commits fully
/// or leaves the store unchanged.
pub trait KvsEngine {
    /// Inserts `key` only if it is absent.
    ///
    /// Fails with [`ErrorCode::KeyConflict`](crate::ErrorCode::KeyConflict)
    /// when the key already exists. The existence check and the insert run
    /// in the same write transaction.
    fn add<K, V>(&self, key: K, value: V) -> Result<()>
    where
        K: AsRef<[u8]>,
        V: AsRef<[u8]>;

    /// Sets the value of `key`, creating the entry if absent.
    fn update<K, V>(&self, key: K, value: V) -> Result<()>
    where
        K: AsRef<[u8]>,
        V: AsRef<[u8]>;

    /// Removes `key`. Removing an absent key succeeds.
    fn delete<K: AsRef<[u8]>>(&self, key: K) -> Result<()>;

    /// Returns an owned copy of the value stored under `key`.
    ///
    /// Fails with [`ErrorCode::KeyNotFound`](crate::ErrorCode::KeyNotFound)
    /// when the key is absent.
    fn get<K: AsRef<[u8]>>(&self, key: K) -> Result<Vec<u8>>;

    /// Calls `f` once per live entry in ascending key order.
    ///
    /// The entries come from one read snapshot taken when the call starts;
    /// writes made while the view runs, including writes from inside `f`,
    /// are not visited. The slices passed to `f` are only valid for that call.
    fn view<F>(&self, f: F) -> Result<()>
    where
        F: FnMut(&[u8], &[u8]);

    /// Removes every entry in one write transaction.
    fn clear(&self) -> Result<()>;
}

pub mod redb;
