//! Store Engine Module
//!
//! This module provides the in-memory key-value store shared by both
//! transports: a single `HashMap` behind one `RwLock`, with lowercase key
//! normalization and the 10-character key/value limits enforced on every
//! operation.
//!
//! ## Example
//!
//! ```
//! use duokv::storage::{StoreEngine, StoreError};
//! use std::sync::Arc;
//!
//! let engine = Arc::new(StoreEngine::new());
//!
//! engine.put("alpha", "123").unwrap();
//! assert_eq!(engine.get("ALPHA").unwrap(), "123");
//!
//! // PUT never overwrites
//! assert_eq!(engine.put("alpha", "456"), Err(StoreError::KeyExists));
//! ```

pub mod engine;

// Re-export commonly used types
pub use engine::{StoreEngine, StoreError, StoreResult, StoreStats, MAX_KEY_LEN, MAX_VALUE_LEN};
