//! Rule registry - central management of rules, sanitizers and formatters

use crate::format::Formatter;
use crate::rules::Rule;
use crate::sanitize::Sanitizer;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Process-wide registry backing the validation engine.
///
/// Holds three independent namespaces: validation rules, sanitizers and
/// formatters, each keyed by name. Registering a name that already exists
/// overwrites the previous implementation (a warning is logged) - the last
/// registration wins. Registration is expected during startup; afterwards
/// reads dominate, so the maps sit behind cheap read locks.
pub struct RuleRegistry {
    rules: RwLock<HashMap<String, Arc<dyn Rule>>>,
    sanitizers: RwLock<HashMap<String, Arc<dyn Sanitizer>>>,
    formatters: RwLock<HashMap<String, Arc<dyn Formatter>>>,
}

impl RuleRegistry {
    /// Create a registry pre-populated with every built-in rule, sanitizer
    /// and formatter.
    pub fn new() -> Self {
        let registry = Self {
            rules: RwLock::new(HashMap::new()),
            sanitizers: RwLock::new(HashMap::new()),
            formatters: RwLock::new(HashMap::new()),
        };

        info!("🔧 Registering built-in rules");
        crate::rules::builtin::register_all(&registry);
        crate::sanitize::builtin::register_all(&registry);
        crate::format::register_all(&registry);
        info!(
            "✅ Registered {} rules, {} sanitizers, {} formatters",
            registry.rules.read().len(),
            registry.sanitizers.read().len(),
            registry.formatters.read().len()
        );

        registry
    }

    /// Register a validation rule under `name`.
    pub fn register_rule(&self, name: &str, rule: Arc<dyn Rule>) {
        debug!("Registering rule: {}", name);
        if self.rules.write().insert(name.to_string(), rule).is_some() {
            warn!("Rule '{}' re-registered, previous implementation replaced", name);
        }
    }

    /// Register a sanitizer under `name`.
    pub fn register_sanitizer(&self, name: &str, sanitizer: Arc<dyn Sanitizer>) {
        debug!("Registering sanitizer: {}", name);
        if self.sanitizers.write().insert(name.to_string(), sanitizer).is_some() {
            warn!("Sanitizer '{}' re-registered, previous implementation replaced", name);
        }
    }

    /// Register a formatter under `name`.
    pub fn register_formatter(&self, name: &str, formatter: Arc<dyn Formatter>) {
        debug!("Registering formatter: {}", name);
        if self.formatters.write().insert(name.to_string(), formatter).is_some() {
            warn!("Formatter '{}' re-registered, previous implementation replaced", name);
        }
    }

    /// Look up a validation rule by name.
    pub fn rule(&self, name: &str) -> Option<Arc<dyn Rule>> {
        self.rules.read().get(name).cloned()
    }

    /// Look up a sanitizer by name.
    pub fn sanitizer(&self, name: &str) -> Option<Arc<dyn Sanitizer>> {
        self.sanitizers.read().get(name).cloned()
    }

    /// Look up a formatter by name.
    pub fn formatter(&self, name: &str) -> Option<Arc<dyn Formatter>> {
        self.formatters.read().get(name).cloned()
    }

    /// All registered rule names, sorted.
    pub fn rule_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.rules.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// All registered sanitizer names, sorted.
    pub fn sanitizer_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.sanitizers.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// All registered formatter names, sorted.
    pub fn formatter_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.formatters.read().keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("rules", &self.rules.read().keys().collect::<Vec<_>>())
            .field("sanitizers", &self.sanitizers.read().keys().collect::<Vec<_>>())
            .field("formatters", &self.formatters.read().keys().collect::<Vec<_>>())
            .finish()
    }
}
