//! Remote endpoint records, as found in the decrypted credential set.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Connection details for one remote system.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    /// Display name for configuration forms.
    pub name: String,
    /// Host (and optional port) of the remote RPC endpoint.
    pub host: String,
    pub username: String,
    pub password: String,
}

impl Endpoint {
    pub fn new(
        name: impl Into<String>,
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            host: host.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    /// The JSON-RPC URL of this endpoint, without credentials.
    pub fn api_url(&self) -> String {
        format!("https://{}/api/", self.host.trim_end_matches('/'))
    }
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("name", &self.name)
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
