//! The local object tree oracle and path construction over it.
//!
//! The host owns the tree. The mirror only reads it through [`LocalTree`].

use std::collections::HashSet;

use crate::error::{CoreError, Result};
use crate::node::{LocalNode, Value};
use crate::profile::ProfileDefinition;
use crate::types::LocalId;

/// Read-only access to the host's local object tree.
pub trait LocalTree: Send + Sync {
    /// Fetch a node snapshot. `None` if the object does not exist.
    fn node(&self, id: LocalId) -> Option<LocalNode>;

    /// Child identities of a node, in the host's display order.
    fn children(&self, id: LocalId) -> Vec<LocalId>;

    /// Current value of a variable.
    fn value(&self, id: LocalId) -> Option<Value>;

    /// Full definition of a profile by name.
    fn profile(&self, name: &str) -> Option<ProfileDefinition>;

    fn exists(&self, id: LocalId) -> bool {
        self.node(id).is_some()
    }
}

/// Build the name path from `root` down to `id`.
///
/// Walks parent links upward, collecting each node's name, and stops when
/// `root` is reached (compared by identity, never by name). The root's own
/// name is not part of the path. The result is ordered root-to-leaf.
///
/// Fails with [`CoreError::Detached`] when a node without parent is reached
/// first, or when the walk revisits a node.
pub fn path_to_root<T: LocalTree + ?Sized>(
    tree: &T,
    id: LocalId,
    root: LocalId,
) -> Result<Vec<String>> {
    if id == root {
        return Err(CoreError::IsRoot(id));
    }

    let mut names = Vec::new();
    let mut visited = HashSet::new();
    let mut current = id;

    while current != root {
        if !visited.insert(current) {
            return Err(CoreError::Detached {
                node: id,
                stopped_at: current,
            });
        }

        let node = tree.node(current).ok_or(CoreError::NodeNotFound(current))?;
        names.push(node.name);

        current = node.parent_id.ok_or(CoreError::Detached {
            node: id,
            stopped_at: current,
        })?;
    }

    names.reverse();
    Ok(names)
}

/// All variables below `root`, depth-first in child order.
pub fn collect_variables<T: LocalTree + ?Sized>(tree: &T, root: LocalId) -> Vec<LocalId> {
    let mut found = Vec::new();
    let mut stack: Vec<LocalId> = tree.children(root).into_iter().rev().collect();
    let mut visited = HashSet::new();

    while let Some(id) = stack.pop() {
        if !visited.insert(id) {
            continue;
        }
        match tree.node(id) {
            Some(node) if node.is_variable() => found.push(id),
            Some(_) => stack.extend(tree.children(id).into_iter().rev()),
            None => {}
        }
    }

    found
}
