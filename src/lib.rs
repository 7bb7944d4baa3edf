//! An ordered map backed by a B-tree of configurable order.
//!
//! This crate provides [`MBTreeMap`], an in-memory key-value map that keeps its
//! entries sorted by key. Unlike the standard library's `BTreeMap`, the branching
//! factor is chosen at runtime: every map is built with an [`Order`] `M`, and every
//! node holds between `ceil(M / 2) - 1` and `M - 1` entries.
//!
//! # Example
//!
//! ```
//! use mbtree::{MBTreeMap, Order};
//!
//! let mut scores = MBTreeMap::with_order(Order::new(3).unwrap());
//! scores.insert("Alice", 100);
//! scores.insert("Bob", 85);
//! scores.insert("Carol", 92);
//!
//! assert_eq!(scores.get(&"Bob"), Some(&85));
//! assert_eq!(scores.len(), 3);
//!
//! // Entries come back in key order.
//! let names: Vec<_> = scores.keys().copied().collect();
//! assert_eq!(names, ["Alice", "Bob", "Carol"]);
//!
//! // An order below 3 cannot form a B-tree.
//! assert!(MBTreeMap::<&str, u32>::try_with_order(2).is_err());
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **Familiar API** - Mirrors the read/write surface of `std::collections::BTreeMap`
//! - **Runtime order** - Node fan-out is a value, not a compile-time constant
//! - **Inspectable shape** - [`MBTreeMap::root`] and [`MBTreeMap::render`] expose the node layout
//!
//! # Implementation
//!
//! Nodes and values live in slot arenas and refer to each other by handle, so
//! splits, rotations and merges move handles rather than boxed subtrees. Every
//! mutation first records the root-to-target path and then rebalances bottom-up
//! along it. Structural events are reported through [`tracing`] at `trace` and
//! `debug` level.

#![no_std]
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod error;
mod order;
mod raw;

pub mod mbtree_map;

pub use error::ConfigError;
pub use mbtree_map::MBTreeMap;
pub use order::Order;
