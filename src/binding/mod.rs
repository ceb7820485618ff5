//! Route validator binding - runs a validator definition against a request
//!
//! The binding owns the pipeline the host hands a request to before its
//! controller action runs: authorize → assemble data → sanitize → validate →
//! dispose of failures. The host's plumbing stays behind the narrow
//! [`RequestContext`] trait; the binding never touches business logic.

use crate::engine::Engine;
use crate::error::{EngineError, RuleKind};
use crate::outcome::ValidationOutcome;
use crate::schema::{MessageMap, Schema};
use crate::value::merge_objects;
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

/// What the binding needs from the host's request plumbing.
pub trait RequestContext: Send + Sync {
    /// All submitted input fields as one object.
    fn body(&self) -> Value;

    /// Single header value, case-insensitive name.
    fn header(&self, name: &str) -> Option<String>;

    /// Route/path parameter.
    fn param(&self, name: &str) -> Option<String>;

    /// True when the caller negotiated for structured (machine-readable)
    /// error responses rather than a redirect.
    fn wants_structured(&self) -> bool;

    /// Location to send the caller back to on redirect-style failure.
    fn current_location(&self) -> String;
}

/// Fields stripped from echoed-back input unless a validator overrides them.
pub fn default_sensitive_fields() -> Vec<String> {
    vec!["password".to_string(), "password_confirmation".to_string()]
}

/// A named validation schema plus lifecycle hooks, bound to routes by the
/// host. Only `rules` is mandatory; the hook defaults keep the common case
/// declarative.
#[async_trait]
pub trait RouteValidator: Send + Sync {
    /// Field rule specs, in declaration order.
    fn rules(&self) -> Vec<(String, String)>;

    /// Sanitization specs applied before validation.
    fn sanitization_rules(&self) -> Vec<(String, String)> {
        Vec::new()
    }

    /// Custom messages keyed `"field.rule"` (or `"rule"` for a blanket
    /// override).
    fn messages(&self) -> MessageMap {
        MessageMap::new()
    }

    /// Formatter name; `None` falls back to `plain`.
    fn formatter(&self) -> Option<String> {
        None
    }

    /// Fields never echoed back through flash data.
    fn sensitive_fields(&self) -> Vec<String> {
        default_sensitive_fields()
    }

    /// Collect-all by default; return `false` for stop-on-first-error.
    fn collect_all(&self) -> bool {
        true
    }

    /// Gate the whole pipeline. `false` aborts before the data object is
    /// even assembled.
    async fn authorize(&self, _ctx: &dyn RequestContext) -> bool {
        true
    }

    /// Extra data merged over the request body; override wins on collision.
    fn data(&self, _ctx: &dyn RequestContext) -> Option<Value> {
        None
    }

    /// Custom failure handling. Returning `Some` suppresses the default
    /// disposition entirely.
    async fn fails(
        &self,
        _ctx: &dyn RequestContext,
        _outcome: &ValidationOutcome,
    ) -> Option<FailureDisposition> {
        None
    }
}

/// How a failed run should be answered.
#[derive(Debug, Clone, PartialEq)]
pub enum FailureDisposition {
    /// Machine-readable envelope for the caller.
    Structured(Value),
    /// Send the caller back with errors and old input flashed; sensitive
    /// fields are already stripped from `flash["old"]`.
    RedirectBack { location: String, flash: Value },
    /// The `fails` hook answered the request itself.
    Handled,
}

/// Outcome of one binding run.
#[derive(Debug)]
pub enum BindingOutcome {
    /// Validation passed; sanitized data for the next pipeline stage.
    Passed { data: Value },
    /// Validation failed, with the chosen disposition.
    Failed {
        outcome: ValidationOutcome,
        disposition: FailureDisposition,
    },
}

/// Executes route validators against request contexts.
#[derive(Debug, Clone)]
pub struct ValidatorBinding {
    engine: Engine,
}

impl ValidatorBinding {
    pub fn new(engine: Engine) -> Self {
        Self { engine }
    }

    /// Run the full pipeline for one request.
    ///
    /// `Err(Unauthorized)` means the `authorize` hook declined; sanitization
    /// and validation never ran.
    pub async fn run(
        &self,
        validator: &dyn RouteValidator,
        ctx: &dyn RequestContext,
    ) -> Result<BindingOutcome, EngineError> {
        if !validator.authorize(ctx).await {
            debug!("Authorization declined, skipping validation");
            return Err(EngineError::Unauthorized);
        }

        let mut data = ctx.body();
        if let Some(overlay) = validator.data(ctx) {
            data = merge_objects(&data, &overlay);
        }

        let sanitize_schema = Schema::parse(validator.sanitization_rules())?;
        if !sanitize_schema.is_empty() {
            data = self.engine.sanitize(&data, &sanitize_schema)?;
        }

        let schema = Schema::parse(validator.rules())?;
        let messages = validator.messages();
        let outcome = if validator.collect_all() {
            self.engine.validate_all(&data, &schema, &messages).await?
        } else {
            self.engine.validate(&data, &schema, &messages).await?
        };

        if outcome.passed() {
            return Ok(BindingOutcome::Passed { data });
        }

        debug!("Validation failed for {} field(s)", outcome.errors().len());

        if let Some(disposition) = validator.fails(ctx, &outcome).await {
            return Ok(BindingOutcome::Failed {
                outcome,
                disposition,
            });
        }

        let disposition = self.default_disposition(validator, ctx, &data, &outcome)?;
        Ok(BindingOutcome::Failed {
            outcome,
            disposition,
        })
    }

    fn default_disposition(
        &self,
        validator: &dyn RouteValidator,
        ctx: &dyn RequestContext,
        data: &Value,
        outcome: &ValidationOutcome,
    ) -> Result<FailureDisposition, EngineError> {
        let formatted = self.format_errors(validator, outcome)?;

        if ctx.wants_structured() {
            return Ok(FailureDisposition::Structured(formatted));
        }

        // echo old input back for form repopulation, minus sensitive fields
        let mut old = data.clone();
        if let Some(map) = old.as_object_mut() {
            for field in validator.sensitive_fields() {
                map.remove(&field);
            }
        }

        Ok(FailureDisposition::RedirectBack {
            location: ctx.current_location(),
            flash: json!({ "errors": formatted, "old": old }),
        })
    }

    fn format_errors(
        &self,
        validator: &dyn RouteValidator,
        outcome: &ValidationOutcome,
    ) -> Result<Value, EngineError> {
        let name = validator.formatter().unwrap_or_else(|| "plain".to_string());
        let formatter =
            self.engine
                .registry()
                .formatter(&name)
                .ok_or_else(|| EngineError::UnknownRule {
                    kind: RuleKind::Formatter,
                    name,
                })?;
        Ok(formatter.format(outcome.errors()))
    }
}
