//! A growable, word-packed bit vector written in pure Rust.
//! `no_std` with `alloc`, no `unsafe`.
//!
//! [`BitVector`] is the main struct in this library: a dense set of
//! non-negative indices stored as bits in a growing array of `u64` words.
//! Its [features](#features) are listed below.
//!
//! # Examples
//! ```
//! use light_bitvector::BitVector;
//!
//! let mut bv = BitVector::new();
//! assert_eq!(bv.cardinality(), 0);
//! bv.set(3);
//! bv.set(5);
//! assert!(bv.get(3));
//! assert!(!bv.get(10_000));
//! assert_eq!(bv.cardinality(), 2);
//! assert_eq!(bv.length(), 6);
//! assert_eq!(bv.to_string(), "{3, 5}");
//! ```
//!
//! # Use Cases
//!
//! - Flag sets, masks and register bitmaps whose size is not known up front
//! - Sets of small integers where a `HashSet` would waste memory
//! - Not thread-safe on its own; wrap it in a lock to share mutable access
//!
//! # Features
//!
//! - `#![no_std]` compatible (needs `alloc`)
//! - Grows on write, never on read: [`get`] accepts any index
//! - Single-bit operations: `set`, `clear`, `flip`, `get`, `set_value`
//! - Range operations: `set_range`, `clear_range`, `flip_range`,
//!   `set_value_range`, `get_range`
//! - Positional set algebra: `and`, `or`, `xor`, `and_not`
//!   - `&`, `|`, `^`, `-`
//!   - `&=`, `|=`, `^=`, `-=`
//! - Queries: `length`, `size`, `cardinality`, `intersects`, `contains_all`
//! - Bit search in both directions: `next_set_bit`, `next_clear_bit`,
//!   `previous_set_bit`, `previous_clear_bit`
//! - Iteration over set bits with `iter_ones()`
//! - Word and byte dumps: `to_bit_list` / `value_of`, `to_le_bytes` /
//!   `from_le_bytes`
//!
//! Growth and trimming of the backing array are reported through the
//! [`log`](https://docs.rs/log) facade at `trace` level.
//!
//! [`get`]: BitVector::get

#![deny(missing_docs)]
#![forbid(unsafe_code)]
#![no_std]

extern crate alloc;

mod bitvector;
mod error;

pub use bitvector::{BitVector, IterOnes, word_index};
pub use error::BitVectorError;
