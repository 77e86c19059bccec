//! Display conversion for path trees.

use std::fmt::Display;

use generational_arena::Index;
use termtree::Tree;

use crate::domain::entities::Flow;
use crate::domain::tree::PathTree;

/// Conversion into a renderable [`termtree::Tree`].
pub trait RenderTree {
    fn to_display_tree(&self) -> Tree<String>;
}

impl<T: Display> RenderTree for PathTree<T> {
    fn to_display_tree(&self) -> Tree<String> {
        match self.root() {
            Some(root_idx) => {
                fn build<T: Display>(tree: &PathTree<T>, idx: Index, out: &mut Tree<String>) {
                    if let Some(node) = tree.get_node(idx) {
                        for &child_idx in node.children() {
                            if let Some(child) = tree.get_node(child_idx) {
                                let mut child_tree = Tree::new(child.payload().to_string());
                                build(tree, child_idx, &mut child_tree);
                                out.push(child_tree);
                            }
                        }
                    }
                }

                let label = self
                    .get_node(root_idx)
                    .map(|node| node.payload().to_string())
                    .unwrap_or_default();
                let mut out = Tree::new(label);
                build(self, root_idx, &mut out);
                out
            }
            None => Tree::new("(empty tree)".to_string()),
        }
    }
}

impl RenderTree for Flow {
    fn to_display_tree(&self) -> Tree<String> {
        Tree::new(self.name.clone()).with_leaves([self.tree.to_display_tree()])
    }
}
