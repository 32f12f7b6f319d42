//! Fixed capacity credential table with a flat binary record file.
//!
//! ```
//! use credtable::{FixedHashTable, IdAllocator, storage};
//!
//! let mut table = FixedHashTable::new();
//! table.insert(1, "alice", "pass1").unwrap();
//! table.insert(2, "bob", "pass2").unwrap();
//! assert_eq!(table.find("alice").unwrap().password(), "pass1");
//! assert!(table.find("carol").is_none());
//!
//! let mut buffer = Vec::new();
//! storage::write_all(&table, &mut buffer).unwrap();
//!
//! let mut loaded = FixedHashTable::new();
//! let mut ids = IdAllocator::new();
//! storage::read_all(&mut loaded, &mut ids, buffer.as_slice()).unwrap();
//! assert_eq!(loaded.find("bob").unwrap().password(), "pass2");
//! assert_eq!(ids.current(), 3);
//! ```
pub mod codec;
pub mod config;
pub mod error;
pub mod ids;
pub mod record;
pub mod storage;
mod store;
pub mod table;
pub use codec::{BytesDecode, BytesEncode, Record, RecordReader, decode_record, encode_record};
pub use config::{DEFAULT_MIN_PASSWORD_LEN, DEFAULT_STORE_PATH, StoreConfig};
pub use error::{AuthError, AuthResult, Result, TableError};
pub use ids::IdAllocator;
pub use record::{FIELD_LEN, FixedStr, RECORD_SIZE, UserRecord};
pub use storage::{LoadSummary, load_all, read_all, save_all, scan_next_id, write_all};
pub use store::UserStore;
pub use table::{FixedHashTable, TABLE_SIZE, hash_key};
