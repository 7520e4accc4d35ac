//! Per-block link records.

use super::BlockId;
use crate::graph::ConnectionKey;
use thiserror::Error;

/// Reference from one block to the other endpoint of a connection.
///
/// The connection key is the handle the graph uses to dispose the link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LinkRef {
    /// The block at the other end.
    pub block: BlockId,
    pub connection: ConnectionKey,
}

/// Removing a link record that is not present.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdjacencyError {
    #[error("No child link to block {0}")]
    MissingChild(BlockId),
    #[error("No parent link from block {0}")]
    MissingParent(BlockId),
}

/// Outgoing (child) and incoming (parent) link records, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Adjacency {
    children: Vec<LinkRef>,
    parents: Vec<LinkRef>,
}

impl Adjacency {
    pub fn children(&self) -> &[LinkRef] {
        &self.children
    }

    pub fn parents(&self) -> &[LinkRef] {
        &self.parents
    }

    pub fn add_child(&mut self, link: LinkRef) {
        self.children.push(link);
    }

    pub fn add_parent(&mut self, link: LinkRef) {
        self.parents.push(link);
    }

    pub fn child(&self, block: BlockId) -> Option<&LinkRef> {
        self.children.iter().find(|l| l.block == block)
    }

    pub fn parent(&self, block: BlockId) -> Option<&LinkRef> {
        self.parents.iter().find(|l| l.block == block)
    }

    /// Remove a child record; the collection is left untouched if it is absent.
    pub fn remove_child(&mut self, link: &LinkRef) -> Result<LinkRef, AdjacencyError> {
        let index = self
            .children
            .iter()
            .position(|l| l == link)
            .ok_or(AdjacencyError::MissingChild(link.block))?;
        Ok(self.children.remove(index))
    }

    /// Remove a parent record; the collection is left untouched if it is absent.
    pub fn remove_parent(&mut self, link: &LinkRef) -> Result<LinkRef, AdjacencyError> {
        let index = self
            .parents
            .iter()
            .position(|l| l == link)
            .ok_or(AdjacencyError::MissingParent(link.block))?;
        Ok(self.parents.remove(index))
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty() && self.parents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn link_to(block: BlockId, from: BlockId) -> LinkRef {
        LinkRef {
            block,
            connection: ConnectionKey::new(from, block),
        }
    }

    #[test]
    fn test_add_and_lookup() {
        let me = Uuid::new_v4();
        let other = Uuid::new_v4();
        let mut adj = Adjacency::default();
        adj.add_child(link_to(other, me));

        assert_eq!(adj.child(other).map(|l| l.block), Some(other));
        assert!(adj.parent(other).is_none());
    }

    #[test]
    fn test_remove_keeps_order() {
        let me = Uuid::new_v4();
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let mut adj = Adjacency::default();
        for id in [a, b, c] {
            adj.add_parent(link_to(id, me));
        }

        adj.remove_parent(&link_to(b, me)).unwrap();
        let remaining: Vec<_> = adj.parents().iter().map(|l| l.block).collect();
        assert_eq!(remaining, vec![a, c]);
    }

    #[test]
    fn test_remove_missing_is_reported() {
        let me = Uuid::new_v4();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let mut adj = Adjacency::default();
        adj.add_child(link_to(a, me));

        let err = adj.remove_child(&link_to(b, me));
        assert_eq!(err, Err(AdjacencyError::MissingChild(b)));
        assert_eq!(adj.children().len(), 1);

        let err = adj.remove_parent(&link_to(a, me));
        assert_eq!(err, Err(AdjacencyError::MissingParent(a)));
    }
}
