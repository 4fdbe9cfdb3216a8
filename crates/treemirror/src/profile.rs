//! Profile synchronization.
//!
//! Makes sure the remote knows the profile a local variable uses, then
//! assigns it to the mirror's custom-profile slot. Reserved profiles (`~`
//! prefix) exist on every system and are only assigned. Failures are logged
//! and swallowed.

use treemirror_core::{
    effective_profile_name, is_reserved_profile, LocalNode, LocalTree, ProfileDefinition,
    RemoteId,
};
use treemirror_rpc::RemoteApi;

use crate::error::ProfileError;
use crate::session::ProfileSyncRecord;

/// What [`ProfileSynchronizer::ensure_profile`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileOutcome {
    /// The node has no profile.
    Unprofiled,
    /// The profile was assigned. `defined` is set when its definition was
    /// sent to the remote by this call.
    Assigned { defined: bool },
    /// Definition or assignment failed. Assignment is still attempted
    /// after a failed definition.
    Failed,
}

pub struct ProfileSynchronizer<'a, T: ?Sized, R: ?Sized> {
    tree: &'a T,
    remote: &'a R,
    debug: bool,
}

impl<'a, T, R> ProfileSynchronizer<'a, T, R>
where
    T: LocalTree + ?Sized,
    R: RemoteApi + ?Sized,
{
    pub fn new(tree: &'a T, remote: &'a R, debug: bool) -> Self {
        Self {
            tree,
            remote,
            debug,
        }
    }

    /// Define (if needed) and assign the effective profile of `node` to
    /// the remote variable `remote`.
    ///
    /// Assignment is attempted even when the definition phase fails; the
    /// definition is retried on the next resolution.
    pub async fn ensure_profile(
        &self,
        record: &mut ProfileSyncRecord,
        node: &LocalNode,
        remote: RemoteId,
    ) -> ProfileOutcome {
        let Some(name) = effective_profile_name(node) else {
            return ProfileOutcome::Unprofiled;
        };

        let defined = if is_reserved_profile(name) {
            Ok(false)
        } else {
            self.sync_definition(record, name).await
        };
        match &defined {
            Err(err @ ProfileError::ExistenceCheck { .. }) => {
                debug_log!(self.debug, debug, error = %err, "profile definition skipped");
            }
            Err(err) => {
                debug_log!(self.debug, warn, error = %err, "profile definition failed");
            }
            Ok(_) => {}
        }

        if let Err(source) = self.remote.set_custom_profile(remote, name).await {
            let err = ProfileError::Assign {
                name: name.to_string(),
                remote,
                source,
            };
            debug_log!(self.debug, warn, error = %err, "profile assignment failed");
            return ProfileOutcome::Failed;
        }

        match defined {
            Ok(defined) => ProfileOutcome::Assigned { defined },
            Err(_) => ProfileOutcome::Failed,
        }
    }

    /// Returns whether the definition was sent.
    async fn sync_definition(
        &self,
        record: &mut ProfileSyncRecord,
        name: &str,
    ) -> Result<bool, ProfileError> {
        if record.contains(name) {
            return Ok(false);
        }

        let exists = self
            .remote
            .profile_exists(name)
            .await
            .map_err(|source| ProfileError::ExistenceCheck {
                name: name.to_string(),
                source,
            })?;
        if exists {
            record.record(name);
            return Ok(false);
        }

        let definition = self
            .tree
            .profile(name)
            .ok_or_else(|| ProfileError::NotDefinedLocally(name.to_string()))?;
        self.define(name, &definition)
            .await
            .map_err(|source| ProfileError::Define {
                name: name.to_string(),
                source,
            })?;

        record.record(name);
        debug_log!(
            self.debug,
            debug,
            profile = name,
            associations = definition.associations.len(),
            "profile defined remotely"
        );
        Ok(true)
    }

    /// Issue the definition calls in order. No rollback on failure.
    async fn define(&self, name: &str, profile: &ProfileDefinition) -> treemirror_rpc::Result<()> {
        self.remote
            .create_profile(name, profile.variable_type)
            .await?;
        self.remote
            .set_profile_text(name, &profile.prefix, &profile.suffix)
            .await?;
        self.remote
            .set_profile_values(name, profile.min, profile.max, profile.step)
            .await?;
        self.remote.set_profile_digits(name, profile.digits).await?;
        self.remote.set_profile_icon(name, &profile.icon).await?;
        for association in &profile.associations {
            self.remote
                .add_profile_association(name, association)
                .await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use treemirror_core::{Association, VariableType};
    use treemirror_rpc::{MemoryRemote, RemoteCall, MEMORY_ROOT};
    use treemirror_testkit::MemoryTree;

    struct Setup {
        tree: MemoryTree,
        remote: MemoryRemote,
        node: LocalNode,
        target: RemoteId,
    }

    fn setup(custom_profile: &str) -> Setup {
        let tree = MemoryTree::new();
        let id = tree.add_path(&["Pump"], VariableType::Integer);
        tree.set_custom_profile(id, custom_profile);

        let mut mode = ProfileDefinition::new("Pump.Mode", VariableType::Integer);
        mode.max = 2.0;
        mode.step = 1.0;
        mode.associations = vec![
            Association::new(0.0, "Off"),
            Association::new(1.0, "Auto").with_color(0x00FF00),
            Association::new(2.0, "Manual"),
        ];
        tree.define_profile(mode);

        let remote = MemoryRemote::new();
        let target = remote.add_variable(MEMORY_ROOT, "Pump", VariableType::Integer);
        let node = tree.node(id).unwrap();
        Setup {
            tree,
            remote,
            node,
            target,
        }
    }

    fn definition_calls(remote: &MemoryRemote) -> usize {
        remote
            .calls()
            .iter()
            .filter(|c| c.is_profile_definition())
            .count()
    }

    #[tokio::test]
    async fn test_defines_in_order_then_assigns() {
        let s = setup("Pump.Mode");
        let mut record = ProfileSyncRecord::default();

        let outcome = ProfileSynchronizer::new(&s.tree, &s.remote, true)
            .ensure_profile(&mut record, &s.node, s.target)
            .await;

        assert_eq!(outcome, ProfileOutcome::Assigned { defined: true });
        let methods: Vec<_> = s.remote.calls().iter().map(RemoteCall::method).collect();
        assert_eq!(
            methods,
            vec![
                "IPS_VariableProfileExists",
                "IPS_CreateVariableProfile",
                "IPS_SetVariableProfileText",
                "IPS_SetVariableProfileValues",
                "IPS_SetVariableProfileDigits",
                "IPS_SetVariableProfileIcon",
                "IPS_SetVariableProfileAssociation",
                "IPS_SetVariableProfileAssociation",
                "IPS_SetVariableProfileAssociation",
                "IPS_SetVariableCustomProfile",
            ]
        );
        assert!(record.contains("Pump.Mode"));
        assert_eq!(s.remote.profile("Pump.Mode").unwrap().associations.len(), 3);
        assert_eq!(
            s.remote.custom_profile_of(s.target).as_deref(),
            Some("Pump.Mode")
        );
    }

    #[tokio::test]
    async fn test_recorded_profile_is_only_assigned() {
        let s = setup("Pump.Mode");
        let mut record = ProfileSyncRecord::default();
        record.record("Pump.Mode");

        let outcome = ProfileSynchronizer::new(&s.tree, &s.remote, false)
            .ensure_profile(&mut record, &s.node, s.target)
            .await;

        assert_eq!(outcome, ProfileOutcome::Assigned { defined: false });
        assert_eq!(definition_calls(&s.remote), 0);
        assert_eq!(s.remote.call_count(), 1);
    }

    #[tokio::test]
    async fn test_existing_remote_profile_is_recorded() {
        let s = setup("Pump.Mode");
        s.remote
            .add_profile(ProfileDefinition::new("Pump.Mode", VariableType::Integer));
        let mut record = ProfileSyncRecord::default();

        ProfileSynchronizer::new(&s.tree, &s.remote, false)
            .ensure_profile(&mut record, &s.node, s.target)
            .await;

        assert!(record.contains("Pump.Mode"));
        assert_eq!(definition_calls(&s.remote), 0);
    }

    #[tokio::test]
    async fn test_failed_existence_check_still_assigns() {
        let s = setup("Pump.Mode");
        s.remote.fail_method("IPS_VariableProfileExists");
        let mut record = ProfileSyncRecord::default();

        let outcome = ProfileSynchronizer::new(&s.tree, &s.remote, false)
            .ensure_profile(&mut record, &s.node, s.target)
            .await;

        assert_eq!(outcome, ProfileOutcome::Failed);
        assert!(record.is_empty());
        assert_eq!(definition_calls(&s.remote), 0);
        assert_eq!(
            s.remote.custom_profile_of(s.target).as_deref(),
            Some("Pump.Mode")
        );
    }

    #[tokio::test]
    async fn test_failed_association_stops_definition() {
        let s = setup("Pump.Mode");
        s.remote.fail_when(|call| {
            matches!(call, RemoteCall::AddProfileAssociation { association, .. } if association.value == 1.0)
        });
        let mut record = ProfileSyncRecord::default();

        let outcome = ProfileSynchronizer::new(&s.tree, &s.remote, false)
            .ensure_profile(&mut record, &s.node, s.target)
            .await;

        assert_eq!(outcome, ProfileOutcome::Failed);
        assert!(!record.contains("Pump.Mode"));
        // The partial definition exists remotely and is still referenced.
        assert!(s.remote.profile("Pump.Mode").is_some());
        assert_eq!(
            s.remote.custom_profile_of(s.target).as_deref(),
            Some("Pump.Mode")
        );
    }

    #[tokio::test]
    async fn test_unknown_local_profile() {
        let s = setup("Pump.Unknown");
        let mut record = ProfileSyncRecord::default();

        let outcome = ProfileSynchronizer::new(&s.tree, &s.remote, false)
            .ensure_profile(&mut record, &s.node, s.target)
            .await;

        assert_eq!(outcome, ProfileOutcome::Failed);
        let methods: Vec<_> = s.remote.calls().iter().map(RemoteCall::method).collect();
        assert_eq!(
            methods,
            vec!["IPS_VariableProfileExists", "IPS_SetVariableCustomProfile"]
        );
    }

    #[tokio::test]
    async fn test_reserved_profile_is_never_defined() {
        let s = setup("~Switch");
        let mut record = ProfileSyncRecord::default();

        let outcome = ProfileSynchronizer::new(&s.tree, &s.remote, false)
            .ensure_profile(&mut record, &s.node, s.target)
            .await;

        assert_eq!(outcome, ProfileOutcome::Assigned { defined: false });
        assert_eq!(definition_calls(&s.remote), 0);
        assert_eq!(
            s.remote.custom_profile_of(s.target).as_deref(),
            Some("~Switch")
        );
        assert!(record.is_empty());
    }

    #[tokio::test]
    async fn test_no_profile_is_a_no_op() {
        let s = setup("");
        let mut record = ProfileSyncRecord::default();

        let outcome = ProfileSynchronizer::new(&s.tree, &s.remote, false)
            .ensure_profile(&mut record, &s.node, s.target)
            .await;

        assert_eq!(outcome, ProfileOutcome::Unprofiled);
        assert_eq!(s.remote.call_count(), 0);
    }
}
