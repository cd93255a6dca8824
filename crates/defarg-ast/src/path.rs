//! Root-to-node ancestor chains.
//!
//! A [`Path`] records how a node is reached from the compilation-unit
//! root. The engine uses paths for lexical-context queries: the nearest
//! enclosing class gives the implicit-receiver owner type, the nearest
//! enclosing method gives the attribution scope for rewritten
//! expressions.

use crate::tree::{Ast, Decl, NodeId};

/// An ancestor chain from the root declaration down to a leaf node.
///
/// Paths are small id vectors, cheap to clone and extend. The chain is
/// never empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path {
    ids: Vec<NodeId>,
}

impl Path {
    /// A path consisting of just the root node.
    pub fn root(id: NodeId) -> Path {
        Path { ids: vec![id] }
    }

    /// The node this path leads to.
    pub fn leaf(&self) -> NodeId {
        *self.ids.last().expect("path is never empty")
    }

    /// Extend the path one level down to `child`.
    pub fn descend(&self, child: NodeId) -> Path {
        let mut ids = self.ids.clone();
        ids.push(child);
        Path { ids }
    }

    /// The path to this node's parent, or `None` at the root.
    pub fn parent(&self) -> Option<Path> {
        if self.ids.len() <= 1 {
            return None;
        }
        Some(Path {
            ids: self.ids[..self.ids.len() - 1].to_vec(),
        })
    }

    /// Nodes from the leaf outward to the root.
    pub fn outward(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.ids.iter().rev().copied()
    }

    /// The subpath ending at the nearest enclosing class declaration,
    /// including the leaf itself if it is one.
    pub fn enclosing_class(&self, ast: &Ast) -> Option<Path> {
        self.enclosing_where(ast, |d| matches!(d, Decl::Class(_)))
    }

    /// The subpath ending at the nearest enclosing method declaration,
    /// including the leaf itself if it is one.
    pub fn enclosing_method(&self, ast: &Ast) -> Option<Path> {
        self.enclosing_where(ast, |d| matches!(d, Decl::Method(_)))
    }

    fn enclosing_where(&self, ast: &Ast, pred: impl Fn(&Decl) -> bool) -> Option<Path> {
        for (depth, id) in self.ids.iter().enumerate().rev() {
            if let Some(decl) = ast.decl(*id) {
                if pred(decl) {
                    return Some(Path {
                        ids: self.ids[..=depth].to_vec(),
                    });
                }
            }
        }
        None
    }
}
