//! Rule implementations known by name.

mod pattern;

use std::collections::BTreeMap;
use std::sync::Arc;

pub use pattern::{PatternOptions, PatternRule};

use crate::EngineError;
use crate::kernel::{EngineOptions, Rule};

/// Creates a rule from its options.
pub type RuleFactory = Arc<
    dyn Fn(&serde_json::Value, &EngineOptions) -> Result<Box<dyn Rule>, EngineError>
        + Send
        + Sync,
>;

/// Maps rule implementation names, as written in configuration, to
/// factories.
#[derive(Clone, Default)]
pub struct RuleRegistry {
    factories: BTreeMap<String, RuleFactory>,
}

impl RuleRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in rules.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(PatternRule::NAME, |options, engine| {
            Ok(Box::new(PatternRule::from_options(options, engine)?) as Box<dyn Rule>)
        });
        registry
    }

    /// Registers a factory, replacing any previous one with the same name.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(&serde_json::Value, &EngineOptions) -> Result<Box<dyn Rule>, EngineError>
            + Send
            + Sync
            + 'static,
    {
        self.factories.insert(name.into(), Arc::new(factory));
    }

    /// Returns true if a factory is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Returns the registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Creates a rule.
    pub fn create(
        &self,
        name: &str,
        options: &serde_json::Value,
        engine: &EngineOptions,
    ) -> Result<Box<dyn Rule>, EngineError> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| EngineError::config(format!("Unknown rule implementation '{}'", name)))?;
        factory(options, engine)
    }
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("factories", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}
