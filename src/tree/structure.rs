//! Hierarchical structure built from relative paths
//!
//! Nodes live in an arena and refer to children by [`NodeId`]. A node holds
//! only its segment name and child table; display data is looked up in the
//! entry map by path.

use std::collections::HashMap;

/// Index of a node in a [`StructureTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, Default)]
struct Node {
    name: String,
    children: HashMap<String, NodeId>,
}

/// Tree of path segments rooted at the analysis root.
#[derive(Debug, Clone)]
pub struct StructureTree {
    nodes: Vec<Node>,
}

impl StructureTree {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::default()],
        }
    }

    /// The unnamed root node.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Ensure a node exists for every prefix of `path`, returning the last.
    pub fn insert(&mut self, path: &str) -> NodeId {
        let mut current = self.root();
        for segment in segments(path) {
            current = match self.nodes[current.0].children.get(segment) {
                Some(&child) => child,
                None => {
                    let child = NodeId(self.nodes.len());
                    self.nodes.push(Node {
                        name: segment.to_string(),
                        children: HashMap::new(),
                    });
                    self.nodes[current.0]
                        .children
                        .insert(segment.to_string(), child);
                    child
                }
            };
        }
        current
    }

    /// Find the node for `path`, if it was inserted.
    pub fn lookup(&self, path: &str) -> Option<NodeId> {
        let mut current = self.root();
        for segment in segments(path) {
            current = *self.nodes[current.0].children.get(segment)?;
        }
        Some(current)
    }

    pub fn name(&self, id: NodeId) -> &str {
        &self.nodes[id.0].name
    }

    /// Children of a node, in no particular order.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = (&str, NodeId)> {
        self.nodes[id.0]
            .children
            .iter()
            .map(|(name, &child)| (name.as_str(), child))
    }

    pub fn has_children(&self, id: NodeId) -> bool {
        !self.nodes[id.0].children.is_empty()
    }

    /// Number of nodes, excluding the root.
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every non-root path in the tree, sorted.
    pub fn paths(&self) -> Vec<String> {
        let mut paths = Vec::with_capacity(self.len());
        let mut stack = vec![(self.root(), String::new())];
        while let Some((id, prefix)) = stack.pop() {
            for (name, child) in self.children(id) {
                let path = if prefix.is_empty() {
                    name.to_string()
                } else {
                    format!("{}/{}", prefix, name)
                };
                paths.push(path.clone());
                stack.push((child, path));
            }
        }
        paths.sort();
        paths
    }
}

impl Default for StructureTree {
    fn default() -> Self {
        Self::new()
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}
