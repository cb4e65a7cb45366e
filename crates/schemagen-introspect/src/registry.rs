use std::collections::BTreeMap;
use std::sync::Arc;

use thiserror::Error;

use crate::adapter::Driver;
use crate::postgres::PostgresDriver;

/// Raised when a driver identifier has no registered implementation.
#[derive(Debug, Error)]
#[error("unknown driver identifier: {0}")]
pub struct UnknownDriver(pub String);

/// Maps driver identifiers to implementations.
///
/// Resolution happens before any connection attempt, so a typo in the
/// identifier fails fast with [`UnknownDriver`] instead of surfacing as a
/// connection error.
pub struct DriverRegistry {
    drivers: BTreeMap<String, Arc<dyn Driver>>,
}

impl DriverRegistry {
    /// An empty registry; useful for tests and embedders.
    pub fn new() -> Self {
        Self {
            drivers: BTreeMap::new(),
        }
    }

    /// Registry holding every built-in driver under its identifier and
    /// common aliases.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        let postgres: Arc<dyn Driver> = Arc::new(PostgresDriver::new());
        registry.register_alias("postgresql", postgres.clone());
        registry.register(postgres);
        registry
    }

    /// Register a driver under its own identifier.
    pub fn register(&mut self, driver: Arc<dyn Driver>) {
        self.drivers.insert(driver.id().to_string(), driver);
    }

    /// Register an additional identifier for an existing driver.
    pub fn register_alias(&mut self, alias: &str, driver: Arc<dyn Driver>) {
        self.drivers.insert(alias.to_string(), driver);
    }

    /// Resolve an identifier to a registered driver.
    pub fn resolve(&self, id: &str) -> Result<Arc<dyn Driver>, UnknownDriver> {
        self.drivers
            .get(id)
            .cloned()
            .ok_or_else(|| UnknownDriver(id.to_string()))
    }

    /// Registered identifiers in sorted order.
    pub fn ids(&self) -> Vec<&str> {
        self.drivers.keys().map(String::as_str).collect()
    }
}

impl Default for DriverRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_builtin_postgres_and_alias() {
        let registry = DriverRegistry::builtin();
        assert_eq!(registry.resolve("postgres").expect("postgres").id(), "postgres");
        assert_eq!(
            registry.resolve("postgresql").expect("alias").id(),
            "postgres"
        );
        assert_eq!(registry.ids(), vec!["postgres", "postgresql"]);
    }

    #[test]
    fn unknown_identifier_is_a_typed_error() {
        let registry = DriverRegistry::builtin();
        let err = registry.resolve("oracle").err().expect("must not resolve");
        assert_eq!(err.to_string(), "unknown driver identifier: oracle");
    }
}
