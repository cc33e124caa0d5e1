//! In-Memory Store Engine
//!
//! This module implements the key-value store both transports execute
//! against: a single `HashMap` behind one `RwLock`, plus the validation
//! rules every mutation must pass.
//!
//! ## Validation Rules
//!
//! - Keys and values longer than [`MAX_KEY_LEN`] / [`MAX_VALUE_LEN`]
//!   characters are rejected. Short entries are the design, not a
//!   limitation to lift.
//! - Keys are normalized to lowercase before storage and before every
//!   lookup. The case the client supplied only survives in response text.
//! - `put` never overwrites: inserting an existing key is a rejection.
//!   `edit_value` is the only way to change a stored value.
//!
//! Every rejection is a typed [`StoreError`]; the command layer turns it
//! into response text. Nothing here panics on bad input.
//!
//! ## Concurrency Model
//!
//! The stream server runs one task per client, so the map sits behind a
//! single `RwLock`: readers (`get`, `keys`) share, writers exclude. Each
//! client's command sequence is an independent transaction; no cross-client
//! ordering is guaranteed or needed.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use thiserror::Error;

/// Maximum key length in characters.
pub const MAX_KEY_LEN: usize = 10;

/// Maximum value length in characters.
pub const MAX_VALUE_LEN: usize = 10;

/// Business-rule rejections produced by the store engine.
///
/// These are ordinary outcomes, not faults: the command layer renders each
/// one as a response line and the session continues.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A key exceeded [`MAX_KEY_LEN`] characters
    #[error("key length exceeds {MAX_KEY_LEN} characters")]
    KeyTooLong,

    /// A value exceeded [`MAX_VALUE_LEN`] characters
    #[error("value length exceeds {MAX_VALUE_LEN} characters")]
    ValueTooLong,

    /// An insert targeted a key that already exists
    #[error("key already exists")]
    KeyExists,

    /// A lookup or mutation targeted a key that does not exist
    #[error("key does not exist")]
    KeyNotFound,
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Snapshot of the engine's operation counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreStats {
    /// Number of keys currently stored
    pub keys: u64,
    /// Total GET operations
    pub gets: u64,
    /// Total PUT operations
    pub puts: u64,
    /// Total DELETE operations
    pub deletes: u64,
    /// Total EDIT_KEY / EDIT_VALUE operations
    pub edits: u64,
}

/// The in-memory key-value store shared by both transports.
///
/// Created empty at process start, lives for the process lifetime, and is
/// only torn down by process exit. Designed to be wrapped in an `Arc` and
/// shared across connection tasks.
///
/// # Example
///
/// ```
/// use duokv::storage::StoreEngine;
///
/// let engine = StoreEngine::new();
/// engine.put("Alpha", "123").unwrap();
///
/// // Lookup is case-insensitive
/// assert_eq!(engine.get("ALPHA").unwrap(), "123");
/// ```
pub struct StoreEngine {
    /// The key-value mapping, keys stored lowercase
    map: RwLock<HashMap<String, String>>,

    /// Statistics: total GET operations
    get_count: AtomicU64,

    /// Statistics: total PUT operations
    put_count: AtomicU64,

    /// Statistics: total DELETE operations
    delete_count: AtomicU64,

    /// Statistics: total edit operations
    edit_count: AtomicU64,
}

impl std::fmt::Debug for StoreEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreEngine")
            .field("keys", &self.len())
            .field("get_count", &self.get_count.load(Ordering::Relaxed))
            .field("put_count", &self.put_count.load(Ordering::Relaxed))
            .finish()
    }
}

impl Default for StoreEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreEngine {
    /// Creates a new, empty store engine.
    pub fn new() -> Self {
        Self {
            map: RwLock::new(HashMap::new()),
            get_count: AtomicU64::new(0),
            put_count: AtomicU64::new(0),
            delete_count: AtomicU64::new(0),
            edit_count: AtomicU64::new(0),
        }
    }

    /// The lookup form of a key: lowercase, applied on every path.
    #[inline]
    fn normalize(key: &str) -> String {
        key.to_lowercase()
    }

    /// Length in characters, not bytes.
    #[inline]
    fn char_len(s: &str) -> usize {
        s.chars().count()
    }

    /// Inserts a new key-value pair.
    ///
    /// Rejects oversized keys or values and duplicate keys; an existing
    /// entry is never overwritten.
    pub fn put(&self, key: &str, value: &str) -> StoreResult<()> {
        self.put_count.fetch_add(1, Ordering::Relaxed);

        if Self::char_len(key) > MAX_KEY_LEN {
            return Err(StoreError::KeyTooLong);
        }
        if Self::char_len(value) > MAX_VALUE_LEN {
            return Err(StoreError::ValueTooLong);
        }

        let normalized = Self::normalize(key);
        let mut map = self.map.write().unwrap();
        if map.contains_key(&normalized) {
            return Err(StoreError::KeyExists);
        }
        map.insert(normalized, value.to_string());
        Ok(())
    }

    /// Looks up the value stored under a key.
    pub fn get(&self, key: &str) -> StoreResult<String> {
        self.get_count.fetch_add(1, Ordering::Relaxed);

        if Self::char_len(key) > MAX_KEY_LEN {
            return Err(StoreError::KeyTooLong);
        }

        let map = self.map.read().unwrap();
        map.get(&Self::normalize(key))
            .cloned()
            .ok_or(StoreError::KeyNotFound)
    }

    /// Removes a key-value pair.
    pub fn delete(&self, key: &str) -> StoreResult<()> {
        self.delete_count.fetch_add(1, Ordering::Relaxed);

        if Self::char_len(key) > MAX_KEY_LEN {
            return Err(StoreError::KeyTooLong);
        }

        let mut map = self.map.write().unwrap();
        map.remove(&Self::normalize(key))
            .map(|_| ())
            .ok_or(StoreError::KeyNotFound)
    }

    /// Returns a snapshot of every stored key, in no particular order.
    pub fn keys(&self) -> Vec<String> {
        let map = self.map.read().unwrap();
        map.keys().cloned().collect()
    }

    /// Moves the value stored under `old_key` to `new_key`.
    ///
    /// Checked in order: new key length, new key collision, old key
    /// presence. The move is atomic under the write lock.
    pub fn edit_key(&self, old_key: &str, new_key: &str) -> StoreResult<()> {
        self.edit_count.fetch_add(1, Ordering::Relaxed);

        if Self::char_len(new_key) > MAX_KEY_LEN {
            return Err(StoreError::KeyTooLong);
        }

        let old_normalized = Self::normalize(old_key);
        let new_normalized = Self::normalize(new_key);

        let mut map = self.map.write().unwrap();
        if map.contains_key(&new_normalized) {
            return Err(StoreError::KeyExists);
        }
        let value = map.remove(&old_normalized).ok_or(StoreError::KeyNotFound)?;
        map.insert(new_normalized, value);
        Ok(())
    }

    /// Overwrites the value stored under an existing key.
    pub fn edit_value(&self, key: &str, value: &str) -> StoreResult<()> {
        self.edit_count.fetch_add(1, Ordering::Relaxed);

        if Self::char_len(key) > MAX_KEY_LEN {
            return Err(StoreError::KeyTooLong);
        }
        if Self::char_len(value) > MAX_VALUE_LEN {
            return Err(StoreError::ValueTooLong);
        }

        let mut map = self.map.write().unwrap();
        match map.get_mut(&Self::normalize(key)) {
            Some(slot) => {
                *slot = value.to_string();
                Ok(())
            }
            None => Err(StoreError::KeyNotFound),
        }
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.map.read().unwrap().len()
    }

    /// Returns true if the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.map.read().unwrap().is_empty()
    }

    /// Returns a snapshot of the operation counters.
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            keys: self.len() as u64,
            gets: self.get_count.load(Ordering::Relaxed),
            puts: self.put_count.load(Ordering::Relaxed),
            deletes: self.delete_count.load(Ordering::Relaxed),
            edits: self.edit_count.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_get() {
        let engine = StoreEngine::new();
        engine.put("alpha", "123").unwrap();
        assert_eq!(engine.get("alpha").unwrap(), "123");
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let engine = StoreEngine::new();
        engine.put("Alpha", "123").unwrap();

        assert_eq!(engine.get("alpha").unwrap(), "123");
        assert_eq!(engine.get("ALPHA").unwrap(), "123");
        assert_eq!(engine.keys(), vec!["alpha".to_string()]);
    }

    #[test]
    fn test_put_rejects_duplicates() {
        let engine = StoreEngine::new();
        engine.put("alpha", "first").unwrap();

        assert_eq!(engine.put("alpha", "second"), Err(StoreError::KeyExists));
        // Different case, same key after normalization
        assert_eq!(engine.put("ALPHA", "second"), Err(StoreError::KeyExists));
        // The stored value is untouched
        assert_eq!(engine.get("alpha").unwrap(), "first");
    }

    #[test]
    fn test_length_limits() {
        let engine = StoreEngine::new();
        let long = "x".repeat(11);

        assert_eq!(engine.put(&long, "v"), Err(StoreError::KeyTooLong));
        assert_eq!(engine.put("k", &long), Err(StoreError::ValueTooLong));
        assert_eq!(engine.get(&long), Err(StoreError::KeyTooLong));
        assert_eq!(engine.delete(&long), Err(StoreError::KeyTooLong));
        assert_eq!(engine.edit_key("k", &long), Err(StoreError::KeyTooLong));
        assert_eq!(engine.edit_value("k", &long), Err(StoreError::ValueTooLong));

        // Exactly 10 characters is fine
        let ten = "x".repeat(10);
        engine.put(&ten, &ten).unwrap();
        assert_eq!(engine.get(&ten).unwrap(), ten);
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let engine = StoreEngine::new();
        // Ten multi-byte characters: within the limit
        engine.put("éééééééééé", "v").unwrap();
    }

    #[test]
    fn test_delete() {
        let engine = StoreEngine::new();
        engine.put("alpha", "123").unwrap();

        engine.delete("ALPHA").unwrap();
        assert_eq!(engine.get("alpha"), Err(StoreError::KeyNotFound));
        assert_eq!(engine.delete("alpha"), Err(StoreError::KeyNotFound));
    }

    #[test]
    fn test_keys_membership() {
        let engine = StoreEngine::new();
        assert!(engine.keys().is_empty());
        assert!(engine.is_empty());

        engine.put("a", "1").unwrap();
        engine.put("b", "2").unwrap();

        // Enumeration order is unspecified; assert membership only
        let keys = engine.keys();
        assert_eq!(keys.len(), 2);
        assert!(keys.contains(&"a".to_string()));
        assert!(keys.contains(&"b".to_string()));
    }

    #[test]
    fn test_edit_key() {
        let engine = StoreEngine::new();
        engine.put("old", "123").unwrap();

        engine.edit_key("OLD", "new").unwrap();
        assert_eq!(engine.get("new").unwrap(), "123");
        assert_eq!(engine.get("old"), Err(StoreError::KeyNotFound));
    }

    #[test]
    fn test_edit_key_rejections() {
        let engine = StoreEngine::new();
        engine.put("a", "1").unwrap();
        engine.put("b", "2").unwrap();

        assert_eq!(engine.edit_key("a", "b"), Err(StoreError::KeyExists));
        assert_eq!(engine.edit_key("missing", "c"), Err(StoreError::KeyNotFound));
        // Failed edits leave the map untouched
        assert_eq!(engine.get("a").unwrap(), "1");
        assert_eq!(engine.len(), 2);
    }

    #[test]
    fn test_edit_value() {
        let engine = StoreEngine::new();
        engine.put("alpha", "123").unwrap();

        engine.edit_value("Alpha", "456").unwrap();
        assert_eq!(engine.get("alpha").unwrap(), "456");

        assert_eq!(
            engine.edit_value("missing", "456"),
            Err(StoreError::KeyNotFound)
        );
    }

    #[test]
    fn test_stats() {
        let engine = StoreEngine::new();
        engine.put("a", "1").unwrap();
        engine.put("b", "2").unwrap();
        let _ = engine.get("a");
        let _ = engine.get("missing");
        let _ = engine.delete("b");
        let _ = engine.edit_value("a", "9");

        let stats = engine.stats();
        assert_eq!(stats.keys, 1);
        assert_eq!(stats.gets, 2);
        assert_eq!(stats.puts, 2);
        assert_eq!(stats.deletes, 1);
        assert_eq!(stats.edits, 1);
    }

    #[test]
    fn test_concurrent_access() {
        use std::sync::Arc;
        use std::thread;

        let engine = Arc::new(StoreEngine::new());
        let mut handles = Vec::new();

        for i in 0..8 {
            let engine = Arc::clone(&engine);
            handles.push(thread::spawn(move || {
                let key = format!("k{}", i);
                engine.put(&key, "v").unwrap();
                assert_eq!(engine.get(&key).unwrap(), "v");
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(engine.len(), 8);
    }
}
