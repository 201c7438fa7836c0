//! REST server configuration.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

/// What a token holder may do.
///
/// Reads are open to every role. Consultants and authorities register and
/// upload; only authorities move the workflow and issue certificates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Authority,
    Consultant,
    #[default]
    Client,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Authority => "authority",
            Self::Consultant => "consultant",
            Self::Client => "client",
        })
    }
}

/// Who a bearer token speaks for.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TokenGrant {
    /// Recorded as `actor` on everything the token does.
    pub principal: String,
    #[serde(default)]
    pub role: Role,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Socket address to listen on.
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Bearer token → principal and role. An empty map leaves the API
    /// unauthenticated: the `X-Actor` header (or `anonymous`) is recorded
    /// and every caller acts as an authority.
    #[serde(default)]
    pub tokens: BTreeMap<String, TokenGrant>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            tokens: BTreeMap::new(),
        }
    }
}

impl ServerConfig {
    pub fn requires_auth(&self) -> bool {
        !self.tokens.is_empty()
    }

    /// Grant bound to `token`, if any.
    pub fn grant(&self, token: &str) -> Option<&TokenGrant> {
        self.tokens.get(token)
    }
}
