//! Drag-and-drop between the class, property and individual trees.
//!
//! Two phases: [`begin_drag`] captures the source domain and identity in a
//! [`DragToken`], [`complete_drop`] turns that token plus the hovered node
//! into one `dragAndDrop` request. Domain compatibility is left to the
//! server; nothing is held between the two phases except the token.

use serde::{Deserialize, Serialize};
use srdfse_protocol::{ClientMessage, HashCode, Resource, TreeType};

/// A node as seen by the drag gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeNode {
    /// The ontology itself, shown at the top of every tree
    Root,
    Resource(HashCode),
}

impl From<&Resource> for TreeNode {
    fn from(res: &Resource) -> Self {
        match res.hash_code {
            Some(hash) => TreeNode::Resource(hash),
            None => TreeNode::Root,
        }
    }
}

/// Transferable capture of a drag source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragToken {
    tree_type: TreeType,
    hash_code: HashCode,
}

impl DragToken {
    pub fn tree_type(&self) -> TreeType {
        self.tree_type
    }

    pub fn hash_code(&self) -> HashCode {
        self.hash_code
    }
}

/// Where the pointer was released
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropTarget {
    pub tree_type: TreeType,
    pub node: TreeNode,
    /// Identity of the ontology owning the hovered node; used when the
    /// hovered node is the root.
    pub ontology: HashCode,
}

impl DropTarget {
    pub fn resolve(&self) -> HashCode {
        match self.node {
            TreeNode::Resource(hash) => hash,
            TreeNode::Root => self.ontology,
        }
    }
}

/// Start a drag. Roots cannot be dragged, so they yield no token.
pub fn begin_drag(tree_type: TreeType, node: TreeNode) -> Option<DragToken> {
    match node {
        TreeNode::Root => None,
        TreeNode::Resource(hash_code) => Some(DragToken {
            tree_type,
            hash_code,
        }),
    }
}

/// Finish a drag on `target`, producing the reparenting request.
pub fn complete_drop(token: DragToken, target: DropTarget) -> ClientMessage {
    ClientMessage::DragAndDrop {
        src_tree_type: token.tree_type,
        src_hash_code: token.hash_code,
        dst_tree_type: target.tree_type,
        dst_hash_code: target.resolve(),
    }
}
