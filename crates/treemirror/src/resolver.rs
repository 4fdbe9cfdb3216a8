//! Mirror resolution: local object → remote mirror identity.
//!
//! A cache miss walks the local parent chain up to the local root, then
//! descends the remote tree from the remote root one name lookup per
//! segment. Missing segments are created when auto-create is on (containers
//! for intermediate segments, a typed variable for the leaf). Nothing is
//! cached unless the whole walk succeeds.

use treemirror_core::{
    path_to_root, CoreError, LocalId, LocalTree, RemoteId, ValidatedConfig, VariableType,
};
use treemirror_rpc::{ChildLookup, RemoteApi};

use crate::error::ResolveError;
use crate::profile::ProfileSynchronizer;
use crate::session::{SessionState, SessionStats};

/// Resolves local variables to remote mirrors for one session.
pub struct MirrorResolver<'a, T: ?Sized, R: ?Sized> {
    tree: &'a T,
    remote: &'a R,
    config: &'a ValidatedConfig,
}

impl<'a, T, R> MirrorResolver<'a, T, R>
where
    T: LocalTree + ?Sized,
    R: RemoteApi + ?Sized,
{
    pub fn new(tree: &'a T, remote: &'a R, config: &'a ValidatedConfig) -> Self {
        Self {
            tree,
            remote,
            config,
        }
    }

    /// Map `local` to its remote mirror.
    ///
    /// A cached mapping is returned without any remote call. Otherwise the
    /// full path is walked, the profile is synchronized and the result is
    /// cached.
    pub async fn resolve(
        &self,
        state: &mut SessionState,
        local: LocalId,
    ) -> Result<RemoteId, ResolveError> {
        if let Some(remote) = state.mappings.get(local) {
            state.stats.cache_hits += 1;
            return Ok(remote);
        }
        state.stats.resolutions += 1;

        let node = self
            .tree
            .node(local)
            .ok_or(CoreError::NodeNotFound(local))?;
        let variable_type = node
            .variable_type()
            .ok_or(ResolveError::NotAVariable(local))?;
        let path = path_to_root(self.tree, local, self.config.local_root)?;

        let leaf = path.len().saturating_sub(1);
        let mut current = self.config.remote_root;
        for (depth, segment) in path.iter().enumerate() {
            let kind = (depth == leaf).then_some(variable_type);
            current = self
                .descend(current, segment, kind, &mut state.stats)
                .await?;
        }

        ProfileSynchronizer::new(self.tree, self.remote, self.config.debug)
            .ensure_profile(&mut state.profiles, &node, current)
            .await;

        state.mappings.insert(local, current);
        debug_log!(
            self.config.debug,
            debug,
            %local,
            remote = %current,
            path = %path.join("/"),
            "resolved"
        );
        Ok(current)
    }

    /// One step down: find or create `segment` under `parent`.
    ///
    /// `leaf` carries the variable type when `segment` is the last one.
    async fn descend(
        &self,
        parent: RemoteId,
        segment: &str,
        leaf: Option<VariableType>,
        stats: &mut SessionStats,
    ) -> Result<RemoteId, ResolveError> {
        let lookup = self
            .remote
            .lookup_child(parent, segment)
            .await
            .map_err(|source| ResolveError::Lookup {
                segment: segment.to_string(),
                parent,
                source,
            })?;

        match lookup {
            ChildLookup::Found(id) => Ok(id),
            ChildLookup::Ambiguous(candidates) => Err(ResolveError::Ambiguous {
                segment: segment.to_string(),
                parent,
                candidates,
            }),
            ChildLookup::NotFound if !self.config.auto_create => Err(ResolveError::Missing {
                segment: segment.to_string(),
                parent,
            }),
            ChildLookup::NotFound => {
                let id = self
                    .create(parent, segment, leaf)
                    .await
                    .map_err(|source| ResolveError::Create {
                        segment: segment.to_string(),
                        parent,
                        source,
                    })?;
                stats.created_nodes += 1;
                debug_log!(self.config.debug, debug, %parent, %id, segment, "created mirror node");
                Ok(id)
            }
        }
    }

    async fn create(
        &self,
        parent: RemoteId,
        segment: &str,
        leaf: Option<VariableType>,
    ) -> treemirror_rpc::Result<RemoteId> {
        let id = match leaf {
            Some(variable_type) => self.remote.create_variable(variable_type).await?,
            None => self.remote.create_container().await?,
        };
        self.remote.set_parent(id, parent).await?;
        self.remote.set_name(id, segment).await?;
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use treemirror_rpc::{MemoryRemote, RemoteCall, RemoteKind, MEMORY_ROOT};
    use treemirror_testkit::fixtures::validated_config;
    use treemirror_testkit::MemoryTree;

    fn living_room_tree() -> (MemoryTree, LocalId) {
        let tree = MemoryTree::new();
        let temperature =
            tree.add_path(&["House", "LivingRoom", "Temperature"], VariableType::Float);
        (tree, temperature)
    }

    #[tokio::test]
    async fn test_cache_hit_issues_no_calls() {
        let (tree, temperature) = living_room_tree();
        let remote = MemoryRemote::new();
        let config = validated_config(tree.root(), MEMORY_ROOT, true);
        let mut state = SessionState::default();
        let resolver = MirrorResolver::new(&tree, &remote, &config);

        let first = resolver.resolve(&mut state, temperature).await.unwrap();
        let calls = remote.call_count();
        let second = resolver.resolve(&mut state, temperature).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(remote.call_count(), calls);
        assert_eq!(state.stats.resolutions, 1);
        assert_eq!(state.stats.cache_hits, 1);
    }

    #[tokio::test]
    async fn test_creates_containers_then_variable() {
        let (tree, temperature) = living_room_tree();
        let remote = MemoryRemote::new();
        let config = validated_config(tree.root(), MEMORY_ROOT, true);
        let mut state = SessionState::default();

        let id = MirrorResolver::new(&tree, &remote, &config)
            .resolve(&mut state, temperature)
            .await
            .unwrap();

        assert_eq!(
            remote.find_path(MEMORY_ROOT, &["House", "LivingRoom", "Temperature"]),
            Some(id)
        );
        let house = remote.find_path(MEMORY_ROOT, &["House"]).unwrap();
        assert_eq!(remote.object(house).unwrap().kind, RemoteKind::Container);
        assert_eq!(
            remote.object(id).unwrap().kind,
            RemoteKind::Variable(VariableType::Float)
        );
        assert_eq!(state.stats.created_nodes, 3);
    }

    #[tokio::test]
    async fn test_missing_segment_without_auto_create() {
        let (tree, temperature) = living_room_tree();
        let remote = MemoryRemote::new();
        remote.add_container(MEMORY_ROOT, "House");
        let config = validated_config(tree.root(), MEMORY_ROOT, false);
        let mut state = SessionState::default();

        let err = MirrorResolver::new(&tree, &remote, &config)
            .resolve(&mut state, temperature)
            .await
            .unwrap_err();

        assert!(matches!(err, ResolveError::Missing { ref segment, .. } if segment == "LivingRoom"));
        assert!(state.mappings.is_empty());
        assert!(!remote.calls().iter().any(RemoteCall::is_node_creation));
    }

    #[tokio::test]
    async fn test_duplicate_siblings_are_ambiguous() {
        let (tree, temperature) = living_room_tree();
        let remote = MemoryRemote::new();
        remote.add_container(MEMORY_ROOT, "House");
        remote.add_container(MEMORY_ROOT, "House");
        let config = validated_config(tree.root(), MEMORY_ROOT, true);
        let mut state = SessionState::default();

        let err = MirrorResolver::new(&tree, &remote, &config)
            .resolve(&mut state, temperature)
            .await
            .unwrap_err();

        match err {
            ResolveError::Ambiguous { candidates, .. } => assert_eq!(candidates.len(), 2),
            other => panic!("expected ambiguity, got {other}"),
        }
        assert!(!remote.calls().iter().any(RemoteCall::is_node_creation));
    }

    #[tokio::test]
    async fn test_container_is_not_resolvable() {
        let (tree, _) = living_room_tree();
        let house = tree.find(&["House"]).unwrap();
        let remote = MemoryRemote::new();
        let config = validated_config(tree.root(), MEMORY_ROOT, true);
        let mut state = SessionState::default();

        let err = MirrorResolver::new(&tree, &remote, &config)
            .resolve(&mut state, house)
            .await
            .unwrap_err();

        assert!(matches!(err, ResolveError::NotAVariable(id) if id == house));
        assert_eq!(remote.call_count(), 0);
    }

    #[tokio::test]
    async fn test_failed_set_name_leaves_no_mapping() {
        let (tree, temperature) = living_room_tree();
        let remote = MemoryRemote::new();
        remote.fail_method("IPS_SetName");
        let config = validated_config(tree.root(), MEMORY_ROOT, true);
        let mut state = SessionState::default();

        let err = MirrorResolver::new(&tree, &remote, &config)
            .resolve(&mut state, temperature)
            .await
            .unwrap_err();

        assert!(matches!(err, ResolveError::Create { ref segment, .. } if segment == "House"));
        assert!(state.mappings.is_empty());
        assert_eq!(state.stats.created_nodes, 0);
    }
}
