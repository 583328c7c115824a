//! Resource definitions (RFC 8707 resource indicators).

use serde::{Deserialize, Serialize};

use crate::scope::ScopeDefinition;

/// A protected resource and the scopes it declares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDefinition {
    /// Absolute resource URI.
    pub resource: String,
    /// Scopes the resource declares.
    #[serde(default)]
    pub scopes: Vec<ScopeDefinition>,
}

impl ResourceDefinition {
    /// Creates a resource with no scopes.
    #[must_use]
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            scopes: Vec::new(),
        }
    }

    /// Adds a scope.
    #[must_use]
    pub fn with_scope(mut self, scope: ScopeDefinition) -> Self {
        self.scopes.push(scope);
        self
    }

    /// Keeps only the scopes whose names appear in `requested`.
    #[must_use]
    pub fn restricted_to(mut self, requested: &[String]) -> Self {
        self.scopes.retain(|s| requested.contains(&s.name));
        self
    }

    /// Finds a declared scope by name.
    #[must_use]
    pub fn find_scope(&self, name: &str) -> Option<&ScopeDefinition> {
        self.scopes.iter().find(|s| s.name == name)
    }
}
