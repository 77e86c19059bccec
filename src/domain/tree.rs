//! Arena-based path tree: ownership, re-rooting, leaf discovery.

use std::collections::HashSet;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::error::{DomainError, TreeResult};
use crate::domain::node::PathNode;

/// Rooted, ordered tree of the devices and switches a multicast flow
/// traverses, branching wherever the flow replicates toward multiple
/// destinations.
///
/// Every node lives in a generational arena and is addressed by a stable
/// [`Index`] handle, so parent/child links are index rewrites rather than
/// aliased references. A handle into a discarded subgraph fails its
/// generation check and surfaces as [`DomainError::StaleNode`] instead of
/// silently addressing a recycled slot.
#[derive(Debug, Clone)]
pub struct PathTree<T> {
    arena: Arena<PathNode<T>>,
    root: Option<Index>,
}

impl<T> Default for PathTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PathTree<T> {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    /// Installs a freshly constructed node as root and returns its handle.
    ///
    /// Any previous root and its entire subgraph are discarded; handles into
    /// the discarded graph become stale. The tree holds exactly one node
    /// afterwards.
    #[instrument(level = "trace", skip(self, payload))]
    pub fn add_root(&mut self, payload: T) -> Index {
        self.arena.clear();
        let idx = self.arena.insert(PathNode::new(payload));
        self.root = Some(idx);
        idx
    }

    /// Creates a node and links it under `parent` as its last child.
    ///
    /// Joint operation: appends to the parent's ordered child list and sets
    /// the child's back-link in one step.
    #[instrument(level = "trace", skip(self, payload))]
    pub fn insert_child(&mut self, parent: Index, payload: T) -> TreeResult<Index> {
        if !self.arena.contains(parent) {
            return Err(DomainError::StaleNode);
        }
        let idx = self.arena.insert(PathNode::new(payload));
        self.arena[parent].add_child(idx);
        self.arena[idx].set_parent(Some(parent));
        Ok(idx)
    }

    /// Creates an unlinked node: no parent, no children, not reachable from
    /// the root. The intended way to pre-build a replacement root, possibly
    /// populated via [`insert_child`](Self::insert_child), before
    /// [`change_root`](Self::change_root).
    #[instrument(level = "trace", skip(self, payload))]
    pub fn insert_detached(&mut self, payload: T) -> Index {
        self.arena.insert(PathNode::new(payload))
    }

    /// Re-roots the tree: the previous root becomes the **last child** of
    /// `new_root`, prior children of `new_root` keep their earlier sibling
    /// positions, and the root handle is reassigned. The subtree under the
    /// previous root is left untouched.
    ///
    /// `new_root` must be parentless and must not be reachable from the
    /// current root; otherwise [`DomainError::AlreadyAttached`] is returned
    /// and the tree is unchanged.
    #[instrument(level = "trace", skip(self))]
    pub fn change_root(&mut self, new_root: Index) -> TreeResult<Index> {
        let old_root = self.root.ok_or(DomainError::EmptyTree)?;
        let node = self.arena.get(new_root).ok_or(DomainError::StaleNode)?;
        if node.parent().is_some() || self.is_reachable(old_root, new_root) {
            return Err(DomainError::AlreadyAttached);
        }
        self.arena[new_root].add_child(old_root);
        self.arena[old_root].set_parent(Some(new_root));
        self.root = Some(new_root);
        Ok(new_root)
    }

    /// Collects the leaves in pre-order, left to right per child insertion
    /// order. Downstream constraint generation iterates this enumeration,
    /// so the ordering is part of the contract.
    ///
    /// Recomputed from scratch into a fresh vector on every call; safe to
    /// call repeatedly.
    #[instrument(level = "debug", skip(self))]
    pub fn leaves(&self) -> TreeResult<Vec<Index>> {
        let root = self.root.ok_or(DomainError::EmptyTree)?;
        let mut leaves = Vec::new();
        self.collect_leaves(root, &mut leaves);
        Ok(leaves)
    }

    fn collect_leaves(&self, idx: Index, leaves: &mut Vec<Index>) {
        if let Some(node) = self.arena.get(idx) {
            if node.is_leaf() {
                leaves.push(idx);
            } else {
                for &child in node.children() {
                    self.collect_leaves(child, leaves);
                }
            }
        }
    }

    /// Returns the root-to-`node` handle sequence by walking the ancestor
    /// chain. The scheduler uses this to reconstruct the device sequence of
    /// one path.
    pub fn route_to(&self, node: Index) -> TreeResult<Vec<Index>> {
        let root = self.root.ok_or(DomainError::EmptyTree)?;
        if !self.arena.contains(node) {
            return Err(DomainError::StaleNode);
        }

        let mut route = vec![node];
        let mut current = node;
        while let Some(parent) = self.arena[current].parent() {
            if !self.arena.contains(parent) {
                return Err(DomainError::StaleNode);
            }
            if route.len() >= self.arena.len() {
                return Err(DomainError::Internal(
                    "parent chain longer than node count".to_string(),
                ));
            }
            route.push(parent);
            current = parent;
        }
        if current != root {
            return Err(DomainError::Detached);
        }
        route.reverse();
        Ok(route)
    }

    /// One root-to-leaf sequence per leaf, in leaf order.
    #[instrument(level = "debug", skip(self))]
    pub fn routes(&self) -> TreeResult<Vec<Vec<Index>>> {
        self.leaves()?
            .into_iter()
            .map(|leaf| self.route_to(leaf))
            .collect()
    }

    /// Longest root-to-leaf node count; 0 for an empty tree.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        match self.root {
            Some(root) => self.calculate_depth(root),
            None => 0,
        }
    }

    fn calculate_depth(&self, idx: Index) -> usize {
        match self.arena.get(idx) {
            Some(node) => {
                1 + node
                    .children()
                    .iter()
                    .map(|&child| self.calculate_depth(child))
                    .max()
                    .unwrap_or(0)
            }
            None => 0,
        }
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn get_node(&self, idx: Index) -> Option<&PathNode<T>> {
        self.arena.get(idx)
    }

    pub fn get_node_mut(&mut self, idx: Index) -> Option<&mut PathNode<T>> {
        self.arena.get_mut(idx)
    }

    pub fn contains(&self, idx: Index) -> bool {
        self.arena.contains(idx)
    }

    /// Number of nodes owned by the arena, detached nodes included.
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    /// Whether a root is installed.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Pre-order, left-to-right iterator over `(handle, node)` pairs,
    /// starting at the root.
    pub fn iter(&self) -> TreeIterator<'_, T> {
        TreeIterator::new(self)
    }

    /// Checks the structural invariants over the graph reachable from the
    /// root: the root is parentless, every child back-links to its parent,
    /// and no node is reachable twice (no sharing, no cycles). An empty
    /// tree is vacuously valid.
    pub fn validate(&self) -> TreeResult<()> {
        let Some(root) = self.root else {
            return Ok(());
        };
        let root_node = self.arena.get(root).ok_or(DomainError::StaleNode)?;
        if root_node.parent().is_some() {
            return Err(DomainError::Internal("root has a parent".to_string()));
        }

        let mut visited = HashSet::new();
        let mut stack = vec![root];
        while let Some(idx) = stack.pop() {
            if !visited.insert(idx) {
                return Err(DomainError::Internal(
                    "node reachable via more than one path".to_string(),
                ));
            }
            let node = self.arena.get(idx).ok_or(DomainError::StaleNode)?;
            for &child in node.children() {
                let child_node = self.arena.get(child).ok_or(DomainError::StaleNode)?;
                if child_node.parent() != Some(idx) {
                    return Err(DomainError::Internal(
                        "child back-link does not match its parent".to_string(),
                    ));
                }
                stack.push(child);
            }
        }
        Ok(())
    }

    fn is_reachable(&self, from: Index, target: Index) -> bool {
        let mut stack = vec![from];
        while let Some(idx) = stack.pop() {
            if idx == target {
                return true;
            }
            if let Some(node) = self.arena.get(idx) {
                stack.extend(node.children().iter().copied());
            }
        }
        false
    }
}

pub struct TreeIterator<'a, T> {
    tree: &'a PathTree<T>,
    stack: Vec<Index>,
}

impl<'a, T> TreeIterator<'a, T> {
    fn new(tree: &'a PathTree<T>) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = tree.root() {
            stack.push(root);
        }
        Self { tree, stack }
    }
}

impl<'a, T> Iterator for TreeIterator<'a, T> {
    type Item = (Index, &'a PathNode<T>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(idx) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children().iter().rev() {
                    self.stack.push(child);
                }
                return Some((idx, node));
            }
        }
        None
    }
}
