//! symtable-follows: a string-keyed map built on separate chaining with
//! staged prime growth, and a follower/following comparer on top of it.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: keep the hash table self-contained and small enough to reason
//!   about in one sitting; the export glue only uses its public API.
//! - Layers:
//!   - hash: the 65599 polynomial string hash and the fixed bucket tiers
//!     {509, 1021, 2039, 4093, 8191, 16381, 32749, 65521}.
//!   - SymTable<V>: bucket heads plus a `slotmap` arena of bindings; each
//!     binding links to the next one in its chain by arena key.
//!   - export / compare: read an export, scan out usernames and their
//!     timestamps into a `SymTable<Option<u64>>`, report keys present on
//!     one side only along with when each relationship started.
//!
//! Constraints
//! - Keys are unique; a duplicate `put` fails and leaves the old value.
//! - Bucket count only grows, one tier at a time, on the `put` that finds
//!   `len >= bucket_count`. Past the last tier the load factor is
//!   unbounded.
//! - Every binding sits in `hash(key) % bucket_count` for the current
//!   count; growth relinks all of them before the new array is installed.
//! - Values are opaque. `V = ()` gives a set, `V = &T` a non-owning
//!   reference.
//!
//! Mutation and traversal
//! - `put`/`replace`/`remove` take `&mut self`; `for_each`/`iter` take
//!   `&self`. A visitor can therefore query tables but never add or remove
//!   bindings mid-traversal; the borrow checker rejects it.
//! - No internal locking. Cross-thread use needs an outer lock.
//!
//! Allocation failure
//! - The bucket array (create, grow) and the owned key copy are allocated
//!   with `try_reserve_exact`. A failed grow is ignored and the insert
//!   continues on the current buckets; a failed key copy surfaces as
//!   `InsertError::OutOfMemory`.

pub mod compare;
pub mod export;
mod hash;
mod sym_table;
mod sym_table_proptest;

// Public surface
pub use compare::{compare, Account, Difference};
pub use export::{entries, extract_usernames, read_export, Entry, LoadError};
pub use hash::BUCKET_COUNTS;
pub use sym_table::{InsertError, Iter, SymTable, TableError};

#[cfg(feature = "bench_internal")]
pub use hash::bucket_index;
