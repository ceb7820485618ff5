//! # Veto - rule-based input validation
//!
//! Veto validates untrusted input data against declarative string rule
//! specs (`"required|email|unique:users,email"`), with pre-validation
//! sanitization, custom rules registered by name, message formatters, and a
//! route-validator binding layer with `authorize`/`fails` lifecycle hooks.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │          Validator Binding               │
//! │  authorize → data → sanitize → validate  │
//! └────────┬─────────────────────────────────┘
//!          │
//!          ├──> Rule Parser   (spec strings → descriptors)
//!          ├──> Sanitization  (new data object, input untouched)
//!          ├──> Validation    (stop-on-first / collect-all)
//!          └──> Rule Registry (rules, sanitizers, formatters)
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use serde_json::json;
//! use veto::{Engine, MessageMap, Schema};
//!
//! # async fn example() -> Result<(), veto::EngineError> {
//! let engine = Engine::new();
//! let schema = Schema::parse([
//!     ("email", "required|email"),
//!     ("password", "required|min:8"),
//! ])?;
//!
//! let data = json!({"email": "a@b.com", "password": "hunter42!"});
//! let outcome = engine.validate_all(&data, &schema, &MessageMap::new()).await?;
//! assert!(outcome.passed());
//! # Ok(())
//! # }
//! ```

pub mod binding;
pub mod config;
pub mod engine;
pub mod error;
pub mod format;
pub mod outcome;
pub mod registry;
pub mod rules;
pub mod sanitize;
pub mod schema;
pub mod value;

// Re-export commonly used types
pub use binding::{
    BindingOutcome, FailureDisposition, RequestContext, RouteValidator, ValidatorBinding,
};
pub use config::{DeclaredValidator, ValidatorConfig};
pub use engine::{Engine, Mode};
pub use error::{EngineError, RuleKind};
pub use format::Formatter;
pub use outcome::{FieldError, ValidationOutcome};
pub use registry::RuleRegistry;
pub use rules::{FieldContext, Rule, RuleVerdict};
pub use sanitize::Sanitizer;
pub use schema::{parse_rule_spec, MessageMap, RuleDescriptor, Schema};
