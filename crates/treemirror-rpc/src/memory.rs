//! In-memory implementation of the RemoteApi trait.
//!
//! Simulates a remote object tree for tests. Every call is recorded in order,
//! and failures can be injected per call. Cloning a `MemoryRemote` yields
//! another handle to the same simulated system.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use treemirror_core::{Association, ProfileDefinition, RemoteId, Value, VariableType};

use crate::api::RemoteApi;
use crate::error::{Result, RpcError};
use crate::messages::{ChildLookup, RemoteCall};

/// Identity of the root object of a fresh simulated system.
pub const MEMORY_ROOT: RemoteId = RemoteId(0);

/// First identity handed out for created objects.
const FIRST_OBJECT_ID: u32 = 10_000;

/// Kind of a simulated remote object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteKind {
    Root,
    Container,
    Variable(VariableType),
}

/// A simulated remote object.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteObject {
    pub id: RemoteId,
    pub name: String,
    pub parent: Option<RemoteId>,
    pub kind: RemoteKind,
    pub value: Option<Value>,
    pub custom_profile: String,
}

type FailurePredicate = Box<dyn Fn(&RemoteCall) -> bool + Send + Sync>;

struct MemoryRemoteInner {
    /// Objects indexed by ID.
    objects: BTreeMap<RemoteId, RemoteObject>,

    /// Profiles indexed by name.
    profiles: HashMap<String, ProfileDefinition>,

    /// Every call issued, in order, including failed ones.
    calls: Vec<RemoteCall>,

    /// Calls matching any predicate fail.
    failures: Vec<FailurePredicate>,

    /// Every call fails while offline.
    offline: bool,

    next_id: u32,
}

/// In-memory remote system.
#[derive(Clone)]
pub struct MemoryRemote {
    inner: Arc<Mutex<MemoryRemoteInner>>,
}

impl MemoryRemote {
    /// A remote system containing only its root object.
    pub fn new() -> Self {
        let mut objects = BTreeMap::new();
        objects.insert(
            MEMORY_ROOT,
            RemoteObject {
                id: MEMORY_ROOT,
                name: "IP-Symcon".to_string(),
                parent: None,
                kind: RemoteKind::Root,
                value: None,
                custom_profile: String::new(),
            },
        );

        Self {
            inner: Arc::new(Mutex::new(MemoryRemoteInner {
                objects,
                profiles: HashMap::new(),
                calls: Vec::new(),
                failures: Vec::new(),
                offline: false,
                next_id: FIRST_OBJECT_ID,
            })),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Seeding (not recorded as calls)
    // ─────────────────────────────────────────────────────────────────────────

    /// Add a container below `parent`.
    pub fn add_container(&self, parent: RemoteId, name: &str) -> RemoteId {
        self.add_object(parent, name, RemoteKind::Container)
    }

    /// Add a variable below `parent`.
    pub fn add_variable(&self, parent: RemoteId, name: &str, variable_type: VariableType) -> RemoteId {
        self.add_object(parent, name, RemoteKind::Variable(variable_type))
    }

    /// Add a fully defined profile.
    pub fn add_profile(&self, profile: ProfileDefinition) {
        let mut inner = self.inner.lock().unwrap();
        inner.profiles.insert(profile.name.clone(), profile);
    }

    /// Delete an object and everything below it, out of band.
    pub fn remove(&self, id: RemoteId) {
        let mut inner = self.inner.lock().unwrap();
        let mut doomed = vec![id];
        while let Some(current) = doomed.pop() {
            inner.objects.remove(&current);
            doomed.extend(
                inner
                    .objects
                    .values()
                    .filter(|o| o.parent == Some(current))
                    .map(|o| o.id),
            );
        }
    }

    fn add_object(&self, parent: RemoteId, name: &str, kind: RemoteKind) -> RemoteId {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.allocate(kind);
        if let Some(object) = inner.objects.get_mut(&id) {
            object.name = name.to_string();
            object.parent = Some(parent);
        }
        id
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Failure injection
    // ─────────────────────────────────────────────────────────────────────────

    /// Fail every call matching `predicate` until failures are cleared.
    pub fn fail_when<F>(&self, predicate: F)
    where
        F: Fn(&RemoteCall) -> bool + Send + Sync + 'static,
    {
        self.inner.lock().unwrap().failures.push(Box::new(predicate));
    }

    /// Fail every call with the given wire method name.
    pub fn fail_method(&self, method: &'static str) {
        self.fail_when(move |call| call.method() == method);
    }

    pub fn clear_failures(&self) {
        self.inner.lock().unwrap().failures.clear();
    }

    pub fn set_offline(&self, offline: bool) {
        self.inner.lock().unwrap().offline = offline;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Inspection
    // ─────────────────────────────────────────────────────────────────────────

    /// All calls issued so far, in order.
    pub fn calls(&self) -> Vec<RemoteCall> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.inner.lock().unwrap().calls.len()
    }

    pub fn clear_calls(&self) {
        self.inner.lock().unwrap().calls.clear();
    }

    pub fn object(&self, id: RemoteId) -> Option<RemoteObject> {
        self.inner.lock().unwrap().objects.get(&id).cloned()
    }

    pub fn exists(&self, id: RemoteId) -> bool {
        self.inner.lock().unwrap().objects.contains_key(&id)
    }

    /// Children of `parent`, ordered by identity.
    pub fn children(&self, parent: RemoteId) -> Vec<RemoteObject> {
        let inner = self.inner.lock().unwrap();
        inner
            .objects
            .values()
            .filter(|o| o.parent == Some(parent))
            .cloned()
            .collect()
    }

    /// Walk `path` by name from `root`. `None` if any segment is missing or
    /// ambiguous.
    pub fn find_path(&self, root: RemoteId, path: &[&str]) -> Option<RemoteId> {
        let inner = self.inner.lock().unwrap();
        let mut current = root;
        for segment in path {
            match inner.children_named(current, segment).as_slice() {
                [only] => current = *only,
                _ => return None,
            }
        }
        Some(current)
    }

    pub fn profile(&self, name: &str) -> Option<ProfileDefinition> {
        self.inner.lock().unwrap().profiles.get(name).cloned()
    }

    pub fn value_of(&self, id: RemoteId) -> Option<Value> {
        self.object(id).and_then(|o| o.value)
    }

    pub fn custom_profile_of(&self, id: RemoteId) -> Option<String> {
        self.object(id).map(|o| o.custom_profile)
    }

    /// Record `call` and decide whether it fails.
    fn begin(&self, call: RemoteCall) -> Result<std::sync::MutexGuard<'_, MemoryRemoteInner>> {
        let mut inner = self.inner.lock().unwrap();
        let fails = inner.offline || inner.failures.iter().any(|p| p(&call));
        let method = call.method();
        inner.calls.push(call);
        if fails {
            return Err(RpcError::Simulated(method.to_string()));
        }
        Ok(inner)
    }
}

impl Default for MemoryRemote {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRemoteInner {
    fn allocate(&mut self, kind: RemoteKind) -> RemoteId {
        let id = RemoteId::new(self.next_id);
        self.next_id += 1;
        self.objects.insert(
            id,
            RemoteObject {
                id,
                name: "Unnamed Object".to_string(),
                parent: None,
                kind,
                value: None,
                custom_profile: String::new(),
            },
        );
        id
    }

    fn children_named(&self, parent: RemoteId, name: &str) -> Vec<RemoteId> {
        self.objects
            .values()
            .filter(|o| o.parent == Some(parent) && o.name == name)
            .map(|o| o.id)
            .collect()
    }

    fn object_mut(&mut self, method: &str, id: RemoteId) -> Result<&mut RemoteObject> {
        self.objects.get_mut(&id).ok_or_else(|| RpcError::Remote {
            method: method.to_string(),
            message: format!("Object #{} does not exist", id),
        })
    }

    fn variable_mut(&mut self, method: &str, id: RemoteId) -> Result<&mut RemoteObject> {
        let object = self.object_mut(method, id)?;
        if !matches!(object.kind, RemoteKind::Variable(_)) {
            return Err(RpcError::Remote {
                method: method.to_string(),
                message: format!("Variable #{} does not exist", id),
            });
        }
        Ok(object)
    }

    fn profile_mut(&mut self, method: &str, name: &str) -> Result<&mut ProfileDefinition> {
        self.profiles.get_mut(name).ok_or_else(|| RpcError::Remote {
            method: method.to_string(),
            message: format!("Profile {} does not exist", name),
        })
    }
}

#[async_trait]
impl RemoteApi for MemoryRemote {
    async fn lookup_child(&self, parent: RemoteId, name: &str) -> Result<ChildLookup> {
        let mut inner = self.begin(RemoteCall::LookupChild {
            parent,
            name: name.to_string(),
        })?;
        inner.object_mut("IPS_GetObjectIDByName", parent)?;

        let mut found = inner.children_named(parent, name);
        Ok(match found.len() {
            0 => ChildLookup::NotFound,
            1 => ChildLookup::Found(found.remove(0)),
            _ => ChildLookup::Ambiguous(found),
        })
    }

    async fn create_container(&self) -> Result<RemoteId> {
        let mut inner = self.begin(RemoteCall::CreateContainer)?;
        Ok(inner.allocate(RemoteKind::Container))
    }

    async fn create_variable(&self, variable_type: VariableType) -> Result<RemoteId> {
        let mut inner = self.begin(RemoteCall::CreateVariable { variable_type })?;
        Ok(inner.allocate(RemoteKind::Variable(variable_type)))
    }

    async fn set_parent(&self, id: RemoteId, parent: RemoteId) -> Result<()> {
        let mut inner = self.begin(RemoteCall::SetParent { id, parent })?;
        inner.object_mut("IPS_SetParent", parent)?;
        inner.object_mut("IPS_SetParent", id)?.parent = Some(parent);
        Ok(())
    }

    async fn set_name(&self, id: RemoteId, name: &str) -> Result<()> {
        let mut inner = self.begin(RemoteCall::SetName {
            id,
            name: name.to_string(),
        })?;
        inner.object_mut("IPS_SetName", id)?.name = name.to_string();
        Ok(())
    }

    async fn profile_exists(&self, name: &str) -> Result<bool> {
        let inner = self.begin(RemoteCall::ProfileExists {
            name: name.to_string(),
        })?;
        Ok(inner.profiles.contains_key(name))
    }

    async fn create_profile(&self, name: &str, variable_type: VariableType) -> Result<()> {
        let mut inner = self.begin(RemoteCall::CreateProfile {
            name: name.to_string(),
            variable_type,
        })?;
        if inner.profiles.contains_key(name) {
            return Err(RpcError::Remote {
                method: "IPS_CreateVariableProfile".to_string(),
                message: format!("Profile {} already exists", name),
            });
        }
        inner
            .profiles
            .insert(name.to_string(), ProfileDefinition::new(name, variable_type));
        Ok(())
    }

    async fn set_profile_text(&self, name: &str, prefix: &str, suffix: &str) -> Result<()> {
        let mut inner = self.begin(RemoteCall::SetProfileText {
            name: name.to_string(),
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
        })?;
        let profile = inner.profile_mut("IPS_SetVariableProfileText", name)?;
        profile.prefix = prefix.to_string();
        profile.suffix = suffix.to_string();
        Ok(())
    }

    async fn set_profile_values(&self, name: &str, min: f64, max: f64, step: f64) -> Result<()> {
        let mut inner = self.begin(RemoteCall::SetProfileValues {
            name: name.to_string(),
            min,
            max,
            step,
        })?;
        let profile = inner.profile_mut("IPS_SetVariableProfileValues", name)?;
        profile.min = min;
        profile.max = max;
        profile.step = step;
        Ok(())
    }

    async fn set_profile_digits(&self, name: &str, digits: u32) -> Result<()> {
        let mut inner = self.begin(RemoteCall::SetProfileDigits {
            name: name.to_string(),
            digits,
        })?;
        inner.profile_mut("IPS_SetVariableProfileDigits", name)?.digits = digits;
        Ok(())
    }

    async fn set_profile_icon(&self, name: &str, icon: &str) -> Result<()> {
        let mut inner = self.begin(RemoteCall::SetProfileIcon {
            name: name.to_string(),
            icon: icon.to_string(),
        })?;
        inner.profile_mut("IPS_SetVariableProfileIcon", name)?.icon = icon.to_string();
        Ok(())
    }

    async fn add_profile_association(&self, name: &str, association: &Association) -> Result<()> {
        let mut inner = self.begin(RemoteCall::AddProfileAssociation {
            name: name.to_string(),
            association: association.clone(),
        })?;
        let profile = inner.profile_mut("IPS_SetVariableProfileAssociation", name)?;
        match profile
            .associations
            .iter_mut()
            .find(|a| a.value == association.value)
        {
            Some(existing) => *existing = association.clone(),
            None => profile.associations.push(association.clone()),
        }
        Ok(())
    }

    async fn set_custom_profile(&self, id: RemoteId, name: &str) -> Result<()> {
        let mut inner = self.begin(RemoteCall::SetCustomProfile {
            id,
            name: name.to_string(),
        })?;
        inner.variable_mut("IPS_SetVariableCustomProfile", id)?.custom_profile = name.to_string();
        Ok(())
    }

    async fn set_value(&self, id: RemoteId, value: &Value) -> Result<()> {
        let mut inner = self.begin(RemoteCall::SetValue {
            id,
            value: value.clone(),
        })?;
        inner.variable_mut("SetValue", id)?.value = Some(value.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_lookup() {
        let remote = MemoryRemote::new();

        let id = remote.create_container().await.unwrap();
        remote.set_parent(id, MEMORY_ROOT).await.unwrap();
        remote.set_name(id, "House").await.unwrap();

        assert_eq!(
            remote.lookup_child(MEMORY_ROOT, "House").await.unwrap(),
            ChildLookup::Found(id)
        );
        assert_eq!(
            remote.lookup_child(MEMORY_ROOT, "house").await.unwrap(),
            ChildLookup::NotFound
        );
        assert_eq!(remote.call_count(), 5);
    }

    #[tokio::test]
    async fn test_duplicate_names_are_ambiguous() {
        let remote = MemoryRemote::new();
        let a = remote.add_container(MEMORY_ROOT, "House");
        let b = remote.add_container(MEMORY_ROOT, "House");

        assert_eq!(
            remote.lookup_child(MEMORY_ROOT, "House").await.unwrap(),
            ChildLookup::Ambiguous(vec![a, b])
        );
    }

    #[tokio::test]
    async fn test_lookup_under_missing_parent_fails() {
        let remote = MemoryRemote::new();
        let result = remote.lookup_child(RemoteId::new(4242), "House").await;
        assert!(matches!(result, Err(RpcError::Remote { .. })));
    }

    #[tokio::test]
    async fn test_injected_failure_is_recorded() {
        let remote = MemoryRemote::new();
        let var = remote.add_variable(MEMORY_ROOT, "Temp", VariableType::Float);
        remote.fail_method("SetValue");

        let result = remote.set_value(var, &Value::Float(1.0)).await;
        assert!(matches!(result, Err(RpcError::Simulated(_))));
        assert_eq!(remote.call_count(), 1);
        assert_eq!(remote.value_of(var), None);

        remote.clear_failures();
        remote.set_value(var, &Value::Float(1.0)).await.unwrap();
        assert_eq!(remote.value_of(var), Some(Value::Float(1.0)));
    }

    #[tokio::test]
    async fn test_set_value_on_removed_variable_fails() {
        let remote = MemoryRemote::new();
        let house = remote.add_container(MEMORY_ROOT, "House");
        let var = remote.add_variable(house, "Temp", VariableType::Float);

        remote.remove(house);
        assert!(!remote.exists(var));
        assert!(remote.set_value(var, &Value::Float(2.0)).await.is_err());
    }

    #[tokio::test]
    async fn test_profile_definition() {
        let remote = MemoryRemote::new();
        remote.create_profile("Pump.Mode", VariableType::Integer).await.unwrap();
        remote.set_profile_text("Pump.Mode", "", " rpm").await.unwrap();
        remote
            .add_profile_association("Pump.Mode", &Association::new(0.0, "Off"))
            .await
            .unwrap();

        assert!(remote.profile_exists("Pump.Mode").await.unwrap());
        assert!(remote.create_profile("Pump.Mode", VariableType::Integer).await.is_err());

        let profile = remote.profile("Pump.Mode").unwrap();
        assert_eq!(profile.suffix, " rpm");
        assert_eq!(profile.associations.len(), 1);
    }

    #[tokio::test]
    async fn test_find_path() {
        let remote = MemoryRemote::new();
        let house = remote.add_container(MEMORY_ROOT, "House");
        let room = remote.add_container(house, "LivingRoom");

        assert_eq!(remote.find_path(MEMORY_ROOT, &["House", "LivingRoom"]), Some(room));
        assert_eq!(remote.find_path(MEMORY_ROOT, &["House", "Kitchen"]), None);
    }
}
