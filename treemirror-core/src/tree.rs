//! Arena-backed page tree.
//!
//! Every filesystem entry visited during a run becomes a [`Node`] stored in a
//! [`PageTree`] and addressed by a [`NodeId`]. Nodes carry two parent links:
//!
//! - `structural_parent`: the directory that physically contains the entry;
//! - `logical_parent`: the nearest *alive* ancestor folder, i.e. the node
//!   whose remote page becomes this node's parent page.
//!
//! Dead folders never appear as a `logical_parent`, which is how they are
//! elided from the remote hierarchy.

use std::path::{Path, PathBuf};

use crate::error::CoreError;
use crate::types::PageId;

/// Stable handle into a [`PageTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Whether a node stands for a directory or a regular file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Folder,
    File,
}

/// One filesystem entry visited during reconciliation.
#[derive(Debug, Clone)]
pub struct Node {
    pub path: PathBuf,
    pub kind: NodeKind,
    /// Only meaningful for folders.
    pub alive: bool,
    pub logical_parent: Option<NodeId>,
    pub structural_parent: Option<NodeId>,
    pub structural_children: Vec<NodeId>,
    remote_id: Option<PageId>,
    title: Option<String>,
}

impl Node {
    fn new(path: PathBuf, kind: NodeKind) -> Self {
        Self {
            path,
            kind,
            alive: false,
            logical_parent: None,
            structural_parent: None,
            structural_children: Vec::new(),
            remote_id: None,
            title: None,
        }
    }

    pub fn is_folder(&self) -> bool {
        self.kind == NodeKind::Folder
    }

    pub fn remote_id(&self) -> Option<&PageId> {
        self.remote_id.as_ref()
    }

    /// Final synchronized title, once the node's page exists remotely.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }
}

/// Arena of [`Node`]s rooted at the mirrored directory.
#[derive(Debug, Clone)]
pub struct PageTree {
    nodes: Vec<Node>,
}

impl PageTree {
    /// Create a tree holding a single root folder node.
    pub fn with_root(path: impl Into<PathBuf>) -> Self {
        Self {
            nodes: vec![Node::new(path.into(), NodeKind::Folder)],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    pub fn find_by_path(&self, path: &Path) -> Option<NodeId> {
        self.nodes.iter().position(|n| n.path == path).map(NodeId)
    }

    /// Append a child under `parent`.
    ///
    /// The child's logical parent is `parent` when `parent` is alive, otherwise
    /// `parent`'s own logical parent. The parent's aliveness must therefore be
    /// settled before any children are added.
    pub fn add_child(&mut self, parent: NodeId, path: impl Into<PathBuf>, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        let mut node = Node::new(path.into(), kind);
        node.structural_parent = Some(parent);
        node.logical_parent = self.nearest_alive(parent);
        self.nodes.push(node);
        self.nodes[parent.0].structural_children.push(id);
        id
    }

    pub fn set_alive(&mut self, id: NodeId, alive: bool) {
        self.nodes[id.0].alive = alive;
    }

    /// `id` itself when it is an alive folder, otherwise its logical parent.
    pub fn nearest_alive(&self, id: NodeId) -> Option<NodeId> {
        let node = &self.nodes[id.0];
        if node.is_folder() && node.alive {
            Some(id)
        } else {
            node.logical_parent
        }
    }

    /// Record the remote page backing `id`. A node's remote id never changes
    /// once set.
    pub fn assign_remote(
        &mut self,
        id: NodeId,
        remote_id: PageId,
        title: impl Into<String>,
    ) -> Result<(), CoreError> {
        let node = &mut self.nodes[id.0];
        if let Some(existing) = &node.remote_id {
            return Err(CoreError::RemoteIdReassigned {
                path: node.path.clone(),
                existing: existing.clone(),
            });
        }
        node.remote_id = Some(remote_id);
        node.title = Some(title.into());
        Ok(())
    }

    /// Logical ancestors of `id`, nearest first.
    pub fn logical_ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = Vec::new();
        let mut current = self.nodes[id.0].logical_parent;
        while let Some(parent) = current {
            chain.push(parent);
            current = self.nodes[parent.0].logical_parent;
        }
        chain
    }
}
