//! TOML-declared validator definitions
//!
//! Schemas can live in configuration instead of code. Every rule spec is
//! parsed eagerly at load time, so a malformed spec fails when the config is
//! read rather than on the first request that hits it.
//!
//! # Example TOML
//! ```toml
//! [validators.store_user]
//! formatter = "json_api"
//! sensitive = ["password"]
//!
//! [[validators.store_user.rules]]
//! field = "email"
//! spec = "required|email"
//!
//! [[validators.store_user.rules]]
//! field = "password"
//! spec = "required|min:8"
//!
//! [[validators.store_user.sanitize]]
//! field = "email"
//! spec = "trim|normalize_email"
//! ```

use crate::binding::{default_sensitive_fields, RouteValidator};
use crate::error::EngineError;
use crate::schema::{parse_rule_spec, MessageMap};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::info;

/// Top-level configuration file shape.
#[derive(Debug, Deserialize)]
pub struct ValidatorConfig {
    #[serde(default)]
    pub validators: HashMap<String, ValidatorDecl>,
}

/// One named validator declaration.
#[derive(Debug, Clone, Deserialize)]
pub struct ValidatorDecl {
    #[serde(default)]
    pub rules: Vec<FieldSpec>,

    #[serde(default)]
    pub sanitize: Vec<FieldSpec>,

    /// Custom messages keyed `"field.rule"` or `"rule"`.
    #[serde(default)]
    pub messages: HashMap<String, String>,

    #[serde(default)]
    pub formatter: Option<String>,

    /// Overrides the default sensitive-field list when present.
    #[serde(default)]
    pub sensitive: Option<Vec<String>>,
}

/// A field and its rule spec; declared as an array of tables so field order
/// survives the TOML round trip.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldSpec {
    pub field: String,
    pub spec: String,
}

impl ValidatorConfig {
    /// Load and check a configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let raw = fs::read_to_string(path)?;
        Self::from_toml(&raw)
    }

    /// Parse and check configuration from a TOML string.
    pub fn from_toml(raw: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: Self = toml::from_str(raw)?;
        config.check()?;
        info!("Loaded {} validator definition(s)", config.validators.len());
        Ok(config)
    }

    /// Parse every declared spec so bad rules surface at load time.
    fn check(&self) -> Result<(), EngineError> {
        for decl in self.validators.values() {
            for entry in decl.rules.iter().chain(decl.sanitize.iter()) {
                parse_rule_spec(&entry.field, &entry.spec)?;
            }
        }
        Ok(())
    }

    /// Materialize a named declaration as a [`RouteValidator`].
    pub fn declared(&self, name: &str) -> Option<DeclaredValidator> {
        self.validators.get(name).map(|decl| DeclaredValidator {
            name: name.to_string(),
            decl: decl.clone(),
        })
    }

    /// Names of all declared validators, sorted.
    pub fn validator_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.validators.keys().cloned().collect();
        names.sort();
        names
    }
}

/// A validator definition sourced from configuration.
#[derive(Debug, Clone)]
pub struct DeclaredValidator {
    name: String,
    decl: ValidatorDecl,
}

impl DeclaredValidator {
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl RouteValidator for DeclaredValidator {
    fn rules(&self) -> Vec<(String, String)> {
        self.decl
            .rules
            .iter()
            .map(|entry| (entry.field.clone(), entry.spec.clone()))
            .collect()
    }

    fn sanitization_rules(&self) -> Vec<(String, String)> {
        self.decl
            .sanitize
            .iter()
            .map(|entry| (entry.field.clone(), entry.spec.clone()))
            .collect()
    }

    fn messages(&self) -> MessageMap {
        self.decl.messages.clone()
    }

    fn formatter(&self) -> Option<String> {
        self.decl.formatter.clone()
    }

    fn sensitive_fields(&self) -> Vec<String> {
        self.decl
            .sensitive
            .clone()
            .unwrap_or_else(default_sensitive_fields)
    }
}
