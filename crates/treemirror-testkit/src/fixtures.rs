//! Test fixtures and helpers.
//!
//! Common setup code for engine and integration tests.

use std::time::Duration;

use treemirror_core::{
    Association, Endpoint, LocalId, MirrorConfig, ProfileDefinition, RemoteId, StoredCredentials,
    SyncEntry, ValidatedConfig, VariableType,
};
use treemirror_creds::{seal_endpoints, Cipher, EndpointSet};

use crate::tree::MemoryTree;

/// Endpoint 0 "Main House" and endpoint 1 "Cabin".
pub fn two_endpoints() -> EndpointSet {
    let mut set = EndpointSet::new();
    set.insert(
        0,
        Endpoint::new("Main House", "10.0.0.2:3777", "admin", "main-secret"),
    );
    set.insert(
        1,
        Endpoint::new("Cabin", "cabin.example.net", "mirror", "cabin-secret"),
    );
    set
}

/// Seal `endpoints` the way the host stores them.
pub fn sealed_credentials(endpoints: &EndpointSet) -> StoredCredentials {
    seal_endpoints(endpoints, Cipher::Aes128Gcm).expect("sealing test endpoints")
}

/// A validated configuration on endpoint 0 with debug logging on.
pub fn validated_config(
    local_root: LocalId,
    remote_root: RemoteId,
    auto_create: bool,
) -> ValidatedConfig {
    ValidatedConfig {
        local_root,
        remote_root,
        endpoint_index: 0,
        auto_create,
        debug: true,
        rpc_timeout: Duration::from_secs(5),
    }
}

/// A configuration on endpoint 0 with every object in `selected` active.
pub fn mirror_config(local_root: LocalId, remote_root: RemoteId, selected: &[LocalId]) -> MirrorConfig {
    MirrorConfig {
        local_root: Some(local_root),
        remote_root: Some(remote_root),
        endpoint_index: Some(0),
        auto_create: true,
        debug: true,
        entries: selected.iter().copied().map(SyncEntry::active).collect(),
        ..MirrorConfig::default()
    }
}

/// The `Pump.Mode` profile: Off, Auto, Manual.
pub fn pump_mode_profile() -> ProfileDefinition {
    let mut profile = ProfileDefinition::new("Pump.Mode", VariableType::Integer);
    profile.max = 2.0;
    profile.step = 1.0;
    profile.icon = "Gear".to_string();
    profile.associations = vec![
        Association::new(0.0, "Off").with_color(0x808080),
        Association::new(1.0, "Auto").with_color(0x00FF00),
        Association::new(2.0, "Manual").with_icon("Hand").with_color(0xFFA500),
    ];
    profile
}

/// A small house.
///
/// ```text
/// Root
/// └── House
///     ├── LivingRoom
///     │   ├── Temperature  float  ~Temperature     21.5
///     │   └── Humidity     float  Humidity.Percent 48.0
///     └── Basement
///         └── Pump         int    Pump.Mode        1
/// ```
pub struct House {
    pub tree: MemoryTree,
    pub house: LocalId,
    pub living_room: LocalId,
    pub temperature: LocalId,
    pub humidity: LocalId,
    pub pump: LocalId,
}

impl House {
    pub fn new() -> Self {
        let tree = MemoryTree::new();

        let temperature =
            tree.add_path(&["House", "LivingRoom", "Temperature"], VariableType::Float);
        tree.set_profile(temperature, "~Temperature");
        tree.set_value(temperature, 21.5);

        let humidity = tree.add_path(&["House", "LivingRoom", "Humidity"], VariableType::Float);
        tree.set_custom_profile(humidity, "Humidity.Percent");
        tree.set_value(humidity, 48.0);
        let mut percent = ProfileDefinition::new("Humidity.Percent", VariableType::Float);
        percent.suffix = " %".to_string();
        percent.max = 100.0;
        percent.digits = 1;
        tree.define_profile(percent);

        let pump = tree.add_path(&["House", "Basement", "Pump"], VariableType::Integer);
        tree.set_profile(pump, "Pump.Mode");
        tree.set_value(pump, 1i64);
        tree.define_profile(pump_mode_profile());

        let house = tree.find(&["House"]).expect("house container");
        let living_room = tree.find(&["House", "LivingRoom"]).expect("living room");

        Self {
            tree,
            house,
            living_room,
            temperature,
            humidity,
            pump,
        }
    }

    /// The three variables in tree order.
    pub fn variables(&self) -> [LocalId; 3] {
        [self.temperature, self.humidity, self.pump]
    }
}

impl Default for House {
    fn default() -> Self {
        Self::new()
    }
}
