//! Route builder: parses flows files and merges routes into path trees.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use regex::Regex;
use tracing::{debug, instrument};

use crate::domain::entities::{Flow, Hop};
use crate::domain::error::{DomainError, TreeResult};
use crate::domain::node::PathNode;
use crate::domain::tree::PathTree;

/// Merges per-destination hop sequences into multicast path trees.
///
/// A flows file is line oriented: `# flow: <name>` starts a flow, and every
/// following non-comment line is one route from the flow's source device to
/// one destination, whitespace-separated. All routes of one flow start at
/// the same source and are merged by common prefix, branching at the first
/// divergence, so branch order follows route declaration order.
pub struct RouteBuilder {
    directive_regex: Regex,
}

impl Default for RouteBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteBuilder {
    pub fn new() -> Self {
        Self {
            directive_regex: Regex::new(r"^#\s*flow:\s*(\S*)").unwrap(),
        }
    }

    /// Builds all flows described in the file at `path`.
    #[instrument(level = "debug", skip(self))]
    pub fn build_from_file(&self, path: &Path) -> TreeResult<Vec<Flow>> {
        if !path.exists() {
            return Err(DomainError::FileNotFound(path.to_path_buf()));
        }
        let content =
            fs::read_to_string(path).map_err(|e| DomainError::FileRead(path.to_path_buf(), e))?;
        self.parse(&content)
    }

    /// Splits `content` into flow sections and builds each one.
    ///
    /// Blank lines and `#` comments are skipped. Route lines before any
    /// `# flow:` directive form an implicit first flow.
    pub fn parse(&self, content: &str) -> TreeResult<Vec<Flow>> {
        let mut sections: Vec<(Option<String>, Vec<Vec<Hop>>)> = Vec::new();

        for line in content.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if let Some(caps) = self.directive_regex.captures(trimmed) {
                let name = caps
                    .get(1)
                    .map(|m| m.as_str())
                    .filter(|name| !name.is_empty());
                sections.push((name.map(str::to_string), Vec::new()));
                continue;
            }
            if trimmed.starts_with('#') {
                continue;
            }

            let route: Vec<Hop> = trimmed.split_whitespace().map(Hop::new).collect();
            if sections.is_empty() {
                sections.push((None, Vec::new()));
            }
            if let Some((_, routes)) = sections.last_mut() {
                routes.push(route);
            }
        }

        sections
            .into_iter()
            .enumerate()
            .map(|(i, (name, routes))| {
                let name = name.unwrap_or_else(|| format!("flow{i}"));
                self.build_flow(&name, &routes)
            })
            .collect()
    }

    /// Merges `routes` into the path tree of one flow.
    ///
    /// The first hop of the first route becomes the root; every later route
    /// must start at the same source device.
    #[instrument(level = "debug", skip(self, routes))]
    pub fn build_flow(&self, name: &str, routes: &[Vec<Hop>]) -> TreeResult<Flow> {
        if routes.is_empty() {
            return Err(DomainError::EmptyFlow(name.to_string()));
        }

        let mut tree = PathTree::new();
        for route in routes {
            self.merge_route(name, &mut tree, route)?;
        }
        debug!("built flow {} with {} nodes", name, tree.node_count());

        Ok(Flow {
            name: name.to_string(),
            tree,
        })
    }

    fn merge_route(&self, flow: &str, tree: &mut PathTree<Hop>, route: &[Hop]) -> TreeResult<()> {
        let Some(source) = route.first() else {
            return Err(DomainError::EmptyRoute(flow.to_string()));
        };

        // A hop repeating within one route would fold the tree back on itself
        let mut seen: HashSet<&Hop> = HashSet::new();
        for hop in route {
            if !seen.insert(hop) {
                return Err(DomainError::CycleDetected(hop.name.clone()));
            }
        }

        let mut current = match tree.root() {
            Some(root) => {
                let root_hop = tree
                    .get_node(root)
                    .ok_or(DomainError::StaleNode)?
                    .payload()
                    .clone();
                if root_hop != *source {
                    return Err(DomainError::SourceMismatch {
                        expected: root_hop.name,
                        found: source.name.clone(),
                    });
                }
                root
            }
            None => tree.add_root(source.clone()),
        };

        for hop in &route[1..] {
            let existing = tree
                .get_node(current)
                .ok_or(DomainError::StaleNode)?
                .children()
                .iter()
                .copied()
                .find(|&child| tree.get_node(child).map(PathNode::payload) == Some(hop));
            current = match existing {
                Some(child) => child,
                None => tree.insert_child(current, hop.clone())?,
            };
        }
        Ok(())
    }
}
