//! Multicast path trees for time-sensitive network flows.
//!
//! A flow in a time-sensitive network replicates at branching devices toward
//! multiple destination devices; the physical routes form a rooted, ordered
//! tree. `flowtree` models that tree and the structural operations a
//! downstream gate-scheduling stage needs: root creation and re-rooting,
//! deterministic leaf enumeration, and per-leaf route reconstruction.
//!
//! Nodes live in a generational arena and address each other through stable
//! index handles, so parent/child links are index rewrites rather than
//! shared mutable references, and a handle into a discarded subgraph is
//! detectable instead of dangling.
//!
//! ```
//! use flowtree::{Hop, PathTree};
//!
//! let mut tree = PathTree::new();
//! let source = tree.add_root(Hop::new("dev4"));
//! let switch = tree.insert_child(source, Hop::new("switch0"))?;
//! tree.insert_child(switch, Hop::new("dev15"))?;
//! tree.insert_child(switch, Hop::new("dev16"))?;
//!
//! assert_eq!(tree.leaves()?.len(), 2);
//! # Ok::<(), flowtree::DomainError>(())
//! ```

pub mod cli;
pub mod domain;
pub mod tree_traits;
pub mod util;

pub use domain::builder::RouteBuilder;
pub use domain::entities::{Flow, Hop};
pub use domain::error::{DomainError, TreeResult};
pub use domain::node::PathNode;
pub use domain::tree::{PathTree, TreeIterator};
