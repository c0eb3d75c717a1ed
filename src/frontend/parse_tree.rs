/*
 * Copyright (c) 2023-2025 Atsushi Komaba
 *
 * This file is part of Cminus.
 * Cminus is free software: you can redistribute it and/or
 * modify it under the terms of the GNU General Public License
 * as published by the Free Software Foundation, either version 3
 * of the License, or any later version.
 *
 * Cminus is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Cminus. If not, see <https://www.gnu.org/licenses/>.
 */

/*!
 * The concrete parse tree, stored as an arena of nodes.
 */

mod tests;

#[cfg(test)]
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt::{self, Display, Formatter};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeId(usize);

#[derive(Debug)]
struct Node {
    label: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/**
 * A tree whose nodes never move. Detached nodes stay in the arena but are
 * no longer reachable from the root.
 */
#[derive(Debug)]
pub struct ParseTree {
    nodes: Vec<Node>,
}

impl ParseTree {
    pub fn new(root_label: impl Into<String>) -> ParseTree {
        ParseTree {
            nodes: vec![Node {
                label: root_label.into(),
                parent: None,
                children: Vec::new(),
            }],
        }
    }
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }
    pub fn add_child(&mut self, parent: NodeId, label: impl Into<String>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            label: label.into(),
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }
    pub fn set_label(&mut self, node: NodeId, label: impl Into<String>) {
        self.nodes[node.0].label = label.into();
    }
    pub fn label(&self, node: NodeId) -> &str {
        &self.nodes[node.0].label
    }
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }
    /**
     * Detaches an unused `node`, then each ancestor left without children,
     * stopping at the first ancestor that keeps one.
     */
    pub fn clear_unused(&mut self, node: NodeId) {
        let mut current = node;
        while let Some(parent) = self.nodes[current.0].parent.take() {
            let siblings = &mut self.nodes[parent.0].children;
            siblings.retain(|&child| child != current);
            if !siblings.is_empty() {
                break;
            }
            current = parent;
        }
    }
    /**
     * Every leaf reachable from the root.
     */
    pub fn leaves(&self) -> Vec<NodeId> {
        let mut ret = Vec::new();
        let mut stack = vec![self.root()];
        while let Some(node) = stack.pop() {
            let children = self.children(node);
            if children.is_empty() {
                ret.push(node);
            }
            stack.extend(children.iter().rev());
        }
        ret
    }
    fn fmt_children(&self, f: &mut Formatter, node: NodeId, prefix: &str) -> fmt::Result {
        let children = self.children(node);
        for (index, &child) in children.iter().enumerate() {
            let last = index + 1 == children.len();
            let (branch, fill) = if last {
                ("└── ", "    ")
            } else {
                ("├── ", "│   ")
            };
            writeln!(f, "{prefix}{branch}{}", self.label(child))?;
            self.fmt_children(f, child, &format!("{prefix}{fill}"))?;
        }
        Ok(())
    }
}

impl Display for ParseTree {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        writeln!(f, "{}", self.label(self.root()))?;
        self.fmt_children(f, self.root(), "")
    }
}

/**
 * A leaf serializes as its label, and any other node as a map from its
 * label to its children.
 */
#[cfg(test)]
struct SerializeNode<'tree> {
    tree: &'tree ParseTree,
    node: NodeId,
}

#[cfg(test)]
impl Serialize for SerializeNode<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let children = self.tree.children(self.node);
        if children.is_empty() {
            return serializer.serialize_str(self.tree.label(self.node));
        }
        let children: Vec<_> = children
            .iter()
            .map(|&node| SerializeNode {
                tree: self.tree,
                node,
            })
            .collect();
        let mut state = serializer.serialize_map(Some(1))?;
        state.serialize_entry(self.tree.label(self.node), &children)?;
        state.end()
    }
}

#[cfg(test)]
impl Serialize for ParseTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        SerializeNode {
            tree: self,
            node: self.root(),
        }
        .serialize(serializer)
    }
}
