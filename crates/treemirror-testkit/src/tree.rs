//! In-memory local object tree.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use treemirror_core::{
    LocalId, LocalNode, LocalTree, NodeKind, ProfileDefinition, Value, VariableType,
};

/// Identity of the root created by [`MemoryTree::new`].
pub const TREE_ROOT: LocalId = LocalId(1);

struct TreeInner {
    nodes: BTreeMap<LocalId, LocalNode>,
    /// Child lists in insertion order.
    children: HashMap<LocalId, Vec<LocalId>>,
    values: HashMap<LocalId, Value>,
    profiles: HashMap<String, ProfileDefinition>,
    next_id: u32,
}

/// A host tree held in memory.
///
/// Mutable through `&self`, so a test can change values and structure while
/// a mirror holds the tree.
pub struct MemoryTree {
    inner: RwLock<TreeInner>,
}

impl MemoryTree {
    /// A tree containing only a root container named "Root".
    pub fn new() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(
            TREE_ROOT,
            LocalNode {
                id: TREE_ROOT,
                name: "Root".to_string(),
                parent_id: None,
                kind: NodeKind::Container,
                profile_name: String::new(),
                custom_profile_name: String::new(),
            },
        );

        Self {
            inner: RwLock::new(TreeInner {
                nodes,
                children: HashMap::new(),
                values: HashMap::new(),
                profiles: HashMap::new(),
                next_id: TREE_ROOT.get() + 1,
            }),
        }
    }

    pub fn root(&self) -> LocalId {
        TREE_ROOT
    }

    pub fn add_container(&self, parent: LocalId, name: &str) -> LocalId {
        self.add_node(parent, name, NodeKind::Container)
    }

    pub fn add_variable(&self, parent: LocalId, name: &str, variable_type: VariableType) -> LocalId {
        self.add_node(parent, name, NodeKind::Variable(variable_type))
    }

    /// Add a variable at `path` below the root, creating (or reusing)
    /// containers for the intermediate segments.
    pub fn add_path(&self, path: &[&str], variable_type: VariableType) -> LocalId {
        let (leaf, containers) = path.split_last().expect("path must not be empty");
        let mut parent = TREE_ROOT;
        for segment in containers {
            parent = match self.child_named(parent, segment) {
                Some(existing) => existing,
                None => self.add_container(parent, segment),
            };
        }
        self.add_variable(parent, leaf, variable_type)
    }

    /// Find a node by name path below the root.
    pub fn find(&self, path: &[&str]) -> Option<LocalId> {
        path.iter()
            .try_fold(TREE_ROOT, |parent, segment| self.child_named(parent, segment))
    }

    pub fn set_value(&self, id: LocalId, value: impl Into<Value>) {
        self.write().values.insert(id, value.into());
    }

    pub fn clear_value(&self, id: LocalId) {
        self.write().values.remove(&id);
    }

    pub fn set_profile(&self, id: LocalId, name: &str) {
        self.update(id, |node| node.profile_name = name.to_string());
    }

    pub fn set_custom_profile(&self, id: LocalId, name: &str) {
        self.update(id, |node| node.custom_profile_name = name.to_string());
    }

    pub fn rename(&self, id: LocalId, name: &str) {
        self.update(id, |node| node.name = name.to_string());
    }

    pub fn define_profile(&self, profile: ProfileDefinition) {
        self.write().profiles.insert(profile.name.clone(), profile);
    }

    /// Cut `id` loose from its parent. Its subtree stays intact.
    pub fn detach(&self, id: LocalId) {
        let mut inner = self.write();
        let parent = inner.nodes.get_mut(&id).and_then(|node| node.parent_id.take());
        if let Some(parent) = parent {
            if let Some(siblings) = inner.children.get_mut(&parent) {
                siblings.retain(|child| *child != id);
            }
        }
    }

    /// Delete `id` and everything below it.
    pub fn remove(&self, id: LocalId) {
        self.detach(id);
        let mut inner = self.write();
        let mut doomed = vec![id];
        while let Some(current) = doomed.pop() {
            inner.nodes.remove(&current);
            inner.values.remove(&current);
            if let Some(children) = inner.children.remove(&current) {
                doomed.extend(children);
            }
        }
    }

    fn add_node(&self, parent: LocalId, name: &str, kind: NodeKind) -> LocalId {
        let mut inner = self.write();
        let id = LocalId::new(inner.next_id);
        inner.next_id += 1;
        inner.nodes.insert(
            id,
            LocalNode {
                id,
                name: name.to_string(),
                parent_id: Some(parent),
                kind,
                profile_name: String::new(),
                custom_profile_name: String::new(),
            },
        );
        inner.children.entry(parent).or_default().push(id);
        id
    }

    fn child_named(&self, parent: LocalId, name: &str) -> Option<LocalId> {
        let inner = self.read();
        inner
            .children
            .get(&parent)?
            .iter()
            .copied()
            .find(|child| inner.nodes.get(child).is_some_and(|node| node.name == name))
    }

    fn update(&self, id: LocalId, f: impl FnOnce(&mut LocalNode)) {
        if let Some(node) = self.write().nodes.get_mut(&id) {
            f(node);
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, TreeInner> {
        self.inner.read().unwrap()
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, TreeInner> {
        self.inner.write().unwrap()
    }
}

impl Default for MemoryTree {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalTree for MemoryTree {
    fn node(&self, id: LocalId) -> Option<LocalNode> {
        self.read().nodes.get(&id).cloned()
    }

    fn children(&self, id: LocalId) -> Vec<LocalId> {
        self.read().children.get(&id).cloned().unwrap_or_default()
    }

    fn value(&self, id: LocalId) -> Option<Value> {
        self.read().values.get(&id).cloned()
    }

    fn profile(&self, name: &str) -> Option<ProfileDefinition> {
        self.read().profiles.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use treemirror_core::{collect_variables, path_to_root, CoreError};

    #[test]
    fn test_add_path_reuses_containers() {
        let tree = MemoryTree::new();
        let temperature = tree.add_path(&["House", "LivingRoom", "Temperature"], VariableType::Float);
        let humidity = tree.add_path(&["House", "LivingRoom", "Humidity"], VariableType::Float);

        assert_eq!(tree.children(tree.root()).len(), 1);
        assert_eq!(
            collect_variables(&tree, tree.root()),
            vec![temperature, humidity]
        );
        assert_eq!(
            path_to_root(&tree, humidity, tree.root()).unwrap(),
            vec!["House", "LivingRoom", "Humidity"]
        );
    }

    #[test]
    fn test_detach_breaks_the_path() {
        let tree = MemoryTree::new();
        let level = tree.add_path(&["Tank", "Level"], VariableType::Integer);
        let tank = tree.find(&["Tank"]).unwrap();

        tree.detach(tank);

        assert!(matches!(
            path_to_root(&tree, level, tree.root()),
            Err(CoreError::Detached { .. })
        ));
        assert!(tree.find(&["Tank"]).is_none());
    }

    #[test]
    fn test_remove_drops_subtree() {
        let tree = MemoryTree::new();
        let level = tree.add_path(&["Tank", "Level"], VariableType::Integer);
        tree.set_value(level, 40i64);

        tree.remove(tree.find(&["Tank"]).unwrap());

        assert!(!tree.exists(level));
        assert_eq!(tree.value(level), None);
    }
}
