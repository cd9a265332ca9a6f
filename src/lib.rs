//! # ordtree
//!
//! Persistent ordered maps and sets for Rust, built on an immutable,
//! structurally shared red-black tree.
//!
//! ## Overview
//!
//! - **Ordered map**: [`PersistentTreeMap`](persistent::PersistentTreeMap)
//!   with O(log N) lookup, insertion and removal
//! - **Ordered set**: [`PersistentTreeSet`](persistent::PersistentTreeSet)
//! - **Set algebra**: union, intersection and difference by join and split
//! - **Traversal**: forward, backward and range cursors over snapshots
//! - **Comparators**: any total order, injected at construction time
//!
//! ## Feature Flags
//!
//! - `arc`: Share nodes with `Arc` so collections are `Send + Sync`
//! - `serde`: `Serialize`/`Deserialize` for maps and sets
//!
//! ## Example
//!
//! ```rust
//! use ordtree::prelude::*;
//!
//! let scores = PersistentTreeMap::new()
//!     .insert("carol", 72)
//!     .insert("alice", 90)
//!     .insert("bob", 85);
//!
//! let names: Vec<&&str> = scores.keys(Direction::Forward).collect();
//! assert_eq!(names, vec![&"alice", &"bob", &"carol"]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// Re-exports commonly used types and traits.
///
/// # Usage
///
/// ```rust
/// use ordtree::prelude::*;
/// ```
pub mod prelude {
    pub use crate::persistent::*;
}

pub mod persistent;
