//! Generic ordered n-ary tree container.
//!
//! Nodes are owned by a [`Tree`] and addressed by generation-tagged
//! [`NodeId`]s. Traversals are cursors (see [`cursor`]) that can be stepped
//! by hand or wrapped into iterators. With the default `bookkeeping` feature
//! every node also carries subtree counters, an expand/collapse flag and a
//! visibility flag, and the tree keeps a range-based selection.

#[cfg(feature = "bookkeeping")]
pub mod bookkeeping;
pub mod cli;
mod compare;
pub mod config;
pub mod cursor;
mod display;
pub mod errors;
pub mod exitcode;
mod links;
mod mutate;
pub mod node;
pub mod outline;
pub mod path;
mod sort;
mod splice;
mod transfer;
pub mod tree;
pub mod util;

#[cfg(feature = "bookkeeping")]
pub use bookkeeping::selection::{Selection, SelectionAction};
pub use config::TreeSettings;
pub use cursor::{BidiCursor, BreadthFirst, Cursor, FixedDepth, Leaf, PostOrder, PreOrder, Sibling, Walk};
#[cfg(feature = "bookkeeping")]
pub use cursor::{Expandable, Expanded};
pub use errors::{TreeError, TreeResult};
pub use node::NodeId;
pub use path::NodePath;
pub use transfer::Detached;
pub use tree::Tree;
