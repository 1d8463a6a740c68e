//! Thornbook Domain Records and Record Store
//!
//! The flat record collections behind the guestbook: users, groups, and
//! sealed messages, plus the [`RecordStore`] trait the rest of the system
//! talks to. The store only ever sees ciphertext — public keys, wrapped
//! secret keys, and sealed messages arrive and leave as opaque base64.
//!
//! Storage durability is out of scope; [`MemoryStore`] is the shipped
//! implementation and the trait is the seam for anything sturdier.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod record;
pub mod storage;

pub use record::{GroupRecord, MessageRecord, RecordError, UserRecord, UserSummary};
pub use storage::{MemoryStore, RecordStore, StorageError};
