//! Property tests for path resolution.

use proptest::prelude::*;

use treemirror::{MemoryConnector, MirrorResolver, Session, SessionState, ValueSynchronizer};
use treemirror_core::{RemoteId, VariableType};
use treemirror_rpc::{MemoryRemote, RemoteCall, RemoteKind, MEMORY_ROOT};
use treemirror_testkit::fixtures::validated_config;
use treemirror_testkit::generators::{name_path, typed_value, variable_type};
use treemirror_testkit::{sealed_credentials, two_endpoints, MemoryTree};

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(future)
}

fn segments(path: &[String]) -> Vec<&str> {
    path.iter().map(String::as_str).collect()
}

fn creations(remote: &MemoryRemote) -> Vec<RemoteCall> {
    remote
        .calls()
        .into_iter()
        .filter(RemoteCall::is_node_creation)
        .collect()
}

proptest! {
    #[test]
    fn lookups_follow_the_path_in_order(path in name_path(5), kind in variable_type()) {
        let tree = MemoryTree::new();
        let leaf = tree.add_path(&segments(&path), kind);
        let remote = MemoryRemote::new();
        let config = validated_config(tree.root(), MEMORY_ROOT, true);
        let mut state = SessionState::default();
        let resolver = MirrorResolver::new(&tree, &remote, &config);

        let id = block_on(resolver.resolve(&mut state, leaf)).unwrap();

        let lookups: Vec<RemoteCall> = remote
            .calls()
            .into_iter()
            .filter(|call| matches!(call, RemoteCall::LookupChild { .. }))
            .collect();
        prop_assert_eq!(lookups.len(), path.len());
        let names = segments(&path);
        for (depth, lookup) in lookups.iter().enumerate() {
            let parent = remote.find_path(MEMORY_ROOT, &names[..depth]).unwrap();
            prop_assert_eq!(
                lookup,
                &RemoteCall::LookupChild { parent, name: path[depth].clone() }
            );
        }
        prop_assert_eq!(remote.find_path(MEMORY_ROOT, &names), Some(id));
        prop_assert_eq!(remote.object(id).unwrap().kind, RemoteKind::Variable(kind));

        // Second resolution: same identity, no remote traffic.
        let calls = remote.call_count();
        let again = block_on(resolver.resolve(&mut state, leaf)).unwrap();
        prop_assert_eq!(again, id);
        prop_assert_eq!(remote.call_count(), calls);
    }

    #[test]
    fn auto_create_builds_only_missing_segments(
        path in name_path(5),
        existing in 0usize..5,
    ) {
        let existing = existing.min(path.len() - 1);
        let tree = MemoryTree::new();
        let leaf = tree.add_path(&segments(&path), VariableType::Integer);

        let remote = MemoryRemote::new();
        let mut parent = MEMORY_ROOT;
        for segment in &path[..existing] {
            parent = remote.add_container(parent, segment);
        }

        let config = validated_config(tree.root(), MEMORY_ROOT, true);
        let mut state = SessionState::default();
        block_on(MirrorResolver::new(&tree, &remote, &config).resolve(&mut state, leaf)).unwrap();

        let missing = path.len() - existing;
        let created = remote.calls();
        let containers = created.iter().filter(|c| matches!(c, RemoteCall::CreateContainer)).count();
        let variables = created.iter().filter(|c| matches!(c, RemoteCall::CreateVariable { .. })).count();
        let parents = created.iter().filter(|c| matches!(c, RemoteCall::SetParent { .. })).count();
        let names = created.iter().filter(|c| matches!(c, RemoteCall::SetName { .. })).count();

        prop_assert_eq!(containers, missing - 1);
        prop_assert_eq!(variables, 1);
        prop_assert_eq!(parents, missing);
        prop_assert_eq!(names, missing);
        prop_assert_eq!(state.stats.created_nodes, missing as u64);
    }

    #[test]
    fn disabled_auto_create_never_creates(path in name_path(4)) {
        let tree = MemoryTree::new();
        let leaf = tree.add_path(&segments(&path), VariableType::Boolean);
        let remote = MemoryRemote::new();
        let config = validated_config(tree.root(), MEMORY_ROOT, false);
        let mut state = SessionState::default();

        let result = block_on(MirrorResolver::new(&tree, &remote, &config).resolve(&mut state, leaf));

        prop_assert!(result.is_err());
        prop_assert!(creations(&remote).is_empty());
        prop_assert!(state.mappings.is_empty());
        prop_assert_eq!(remote.call_count(), 1);
    }

    #[test]
    fn pushed_values_land_unchanged(path in name_path(3), (kind, value) in typed_value()) {
        let tree = MemoryTree::new();
        let leaf = tree.add_path(&segments(&path), kind);
        let remote = MemoryRemote::new();
        let connector = MemoryConnector::new(remote.clone());
        let mut session = Session::new(
            validated_config(tree.root(), MEMORY_ROOT, true),
            sealed_credentials(&two_endpoints()),
        );

        let target: RemoteId = block_on(
            ValueSynchronizer::new(&tree, &connector).try_push(&mut session, leaf, &value),
        )
        .unwrap();

        prop_assert_eq!(remote.value_of(target), Some(value));
    }
}
