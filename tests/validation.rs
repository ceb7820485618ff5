//! End-to-end tests for the validation pipeline: engine modes, sanitization,
//! custom rules against a store, and the route-validator binding.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use veto::{
    BindingOutcome, Engine, EngineError, FailureDisposition, FieldContext, MessageMap,
    RequestContext, RouteValidator, Rule, RuleVerdict, Schema, ValidatorBinding, ValidatorConfig,
};

fn signup_schema() -> Schema {
    Schema::parse([("email", "required|email"), ("password", "required")]).unwrap()
}

#[tokio::test]
async fn all_rules_passing_reports_clean_in_both_modes() {
    let engine = Engine::new();
    let schema = signup_schema();
    let data = json!({"email": "a@b.com", "password": "x"});
    let messages = MessageMap::new();

    let stop = engine.validate(&data, &schema, &messages).await.unwrap();
    let all = engine.validate_all(&data, &schema, &messages).await.unwrap();

    assert!(stop.passed());
    assert!(stop.errors().is_empty());
    assert!(all.passed());
    assert!(all.errors().is_empty());
}

#[tokio::test]
async fn stop_on_first_error_reports_exactly_one_message() {
    let engine = Engine::new();
    let schema = signup_schema();
    let data = json!({"email": "not-an-email", "password": ""});

    let outcome = engine
        .validate(&data, &schema, &MessageMap::new())
        .await
        .unwrap();

    assert!(!outcome.passed());
    assert_eq!(outcome.errors().len(), 1);
    assert_eq!(outcome.failed_fields(), vec!["email"]);
    assert_eq!(
        outcome.messages_for("email"),
        Some(&["email is not a valid email".to_string()][..])
    );
}

#[tokio::test]
async fn collect_all_reports_one_message_per_failing_field_in_order() {
    let engine = Engine::new();
    let schema = signup_schema();
    let data = json!({"email": "not-an-email", "password": ""});

    let outcome = engine
        .validate_all(&data, &schema, &MessageMap::new())
        .await
        .unwrap();

    assert!(!outcome.passed());
    assert_eq!(outcome.failed_fields(), vec!["email", "password"]);
    assert_eq!(
        outcome.messages_for("email"),
        Some(&["email is not a valid email".to_string()][..])
    );
    assert_eq!(
        outcome.messages_for("password"),
        Some(&["password is required".to_string()][..])
    );
}

// Assumption: collect-all gathers only the first failing rule per field; the
// alternative of recording every rule failure per field is deliberately not
// implemented.
#[tokio::test]
async fn collect_all_reports_first_failure_per_field() {
    let engine = Engine::new();
    let schema = Schema::parse([("email", "required|email|min:5")]).unwrap();
    let data = json!({"email": ""});

    let outcome = engine
        .validate_all(&data, &schema, &MessageMap::new())
        .await
        .unwrap();

    assert_eq!(
        outcome.messages_for("email"),
        Some(&["email is required".to_string()][..])
    );
}

#[tokio::test]
async fn sanitize_returns_new_object_and_is_identity_without_rules() {
    let engine = Engine::new();
    let data = json!({"email": "  A@B.COM ", "name": "bob"});

    let sanitized = engine
        .sanitize(&data, &Schema::parse([("email", "trim|normalize_email")]).unwrap())
        .unwrap();
    assert_eq!(sanitized, json!({"email": "a@b.com", "name": "bob"}));
    // original untouched
    assert_eq!(data, json!({"email": "  A@B.COM ", "name": "bob"}));

    let untouched = engine.sanitize(&data, &Schema::default()).unwrap();
    assert_eq!(untouched, data);
}

#[test]
fn sanitizer_failure_aborts_the_pass() {
    let engine = Engine::new();
    let schema = Schema::parse([("age", "to_int")]).unwrap();

    let result = engine.sanitize(&json!({"age": "abc"}), &schema);
    match result {
        Err(EngineError::Sanitization { name, field, .. }) => {
            assert_eq!(name, "to_int");
            assert_eq!(field, "age");
        }
        other => panic!("expected sanitization error, got {:?}", other),
    }
}

struct UppercaseOnly;

#[async_trait]
impl Rule for UppercaseOnly {
    async fn check(&self, ctx: &FieldContext<'_>) -> Result<RuleVerdict, EngineError> {
        let valid = ctx
            .value()
            .and_then(|value| value.as_str())
            .map(|text| text.chars().all(|ch| !ch.is_lowercase()))
            .unwrap_or(false);
        Ok(if valid { RuleVerdict::Pass } else { ctx.fail() })
    }

    fn name(&self) -> &str {
        "uppercase_only"
    }

    fn default_message(&self, field: &str, _args: &[String]) -> String {
        format!("{} must be uppercase", field)
    }
}

#[tokio::test]
async fn extended_rule_is_usable_without_restart() {
    let engine = Engine::new();
    let schema = Schema::parse([("code", "uppercase_only")]).unwrap();

    // unknown before registration
    let before = engine
        .validate_all(&json!({"code": "ABC"}), &schema, &MessageMap::new())
        .await;
    assert!(matches!(before, Err(EngineError::UnknownRule { .. })));

    engine.extend("uppercase_only", Arc::new(UppercaseOnly));

    let after = engine
        .validate_all(&json!({"code": "ABC"}), &schema, &MessageMap::new())
        .await
        .unwrap();
    assert!(after.passed());

    let failing = engine
        .validate_all(&json!({"code": "abc"}), &schema, &MessageMap::new())
        .await
        .unwrap();
    assert_eq!(
        failing.messages_for("code"),
        Some(&["code must be uppercase".to_string()][..])
    );
}

/// In-memory stand-in for the host's data store: rows of (table, column,
/// value). The engine itself never sees it; only the rule does.
struct UniqueRule {
    rows: Arc<Vec<(String, String, String)>>,
}

#[async_trait]
impl Rule for UniqueRule {
    async fn check(&self, ctx: &FieldContext<'_>) -> Result<RuleVerdict, EngineError> {
        let table = ctx
            .arg(0)
            .ok_or_else(|| ctx.bad_args("unique expects table and column arguments"))?;
        let column = ctx.arg(1).unwrap_or(ctx.field);
        let Some(value) = ctx.value().and_then(|value| value.as_str()) else {
            return Ok(RuleVerdict::Pass);
        };

        // model an async store lookup
        tokio::task::yield_now().await;

        let taken = self
            .rows
            .iter()
            .any(|(t, c, v)| t == table && c == column && v == value);
        Ok(if taken { ctx.fail() } else { RuleVerdict::Pass })
    }

    fn name(&self) -> &str {
        "unique"
    }

    fn default_message(&self, field: &str, _args: &[String]) -> String {
        format!("{} is already taken", field)
    }
}

#[tokio::test]
async fn unique_rule_fails_against_an_existing_row() {
    let engine = Engine::new();
    let rows = Arc::new(vec![(
        "users".to_string(),
        "email".to_string(),
        "taken@b.com".to_string(),
    )]);
    engine.extend("unique", Arc::new(UniqueRule { rows }));

    let schema = Schema::parse([("email", "required|email|unique:users,email")]).unwrap();

    let taken = engine
        .validate_all(&json!({"email": "taken@b.com"}), &schema, &MessageMap::new())
        .await
        .unwrap();
    assert_eq!(
        taken.messages_for("email"),
        Some(&["email is already taken".to_string()][..])
    );

    let free = engine
        .validate_all(&json!({"email": "new@b.com"}), &schema, &MessageMap::new())
        .await
        .unwrap();
    assert!(free.passed());
}

/// Fake request context that counts how often the body is read.
struct FakeRequest {
    body: Value,
    wants_structured: bool,
    body_reads: AtomicUsize,
}

impl FakeRequest {
    fn new(body: Value, wants_structured: bool) -> Self {
        Self {
            body,
            wants_structured,
            body_reads: AtomicUsize::new(0),
        }
    }
}

impl RequestContext for FakeRequest {
    fn body(&self) -> Value {
        self.body_reads.fetch_add(1, Ordering::SeqCst);
        self.body.clone()
    }

    fn header(&self, _name: &str) -> Option<String> {
        None
    }

    fn param(&self, _name: &str) -> Option<String> {
        None
    }

    fn wants_structured(&self) -> bool {
        self.wants_structured
    }

    fn current_location(&self) -> String {
        "/signup".to_string()
    }
}

struct StoreUserValidator;

impl RouteValidator for StoreUserValidator {
    fn rules(&self) -> Vec<(String, String)> {
        vec![
            ("email".to_string(), "required|email".to_string()),
            ("password".to_string(), "required|min:8".to_string()),
        ]
    }

    fn sanitization_rules(&self) -> Vec<(String, String)> {
        vec![("email".to_string(), "trim|normalize_email".to_string())]
    }
}

#[tokio::test]
async fn binding_sanitizes_then_passes_data_through() {
    let binding = ValidatorBinding::new(Engine::new());
    let request = FakeRequest::new(
        json!({"email": "  A@B.COM ", "password": "longenough"}),
        true,
    );

    let result = binding.run(&StoreUserValidator, &request).await.unwrap();
    match result {
        BindingOutcome::Passed { data } => {
            assert_eq!(data["email"], json!("a@b.com"));
        }
        other => panic!("expected pass, got {:?}", other),
    }
}

#[tokio::test]
async fn binding_redirect_strips_sensitive_fields_but_keeps_their_errors() {
    let binding = ValidatorBinding::new(Engine::new());
    let request = FakeRequest::new(json!({"email": "a@b.com", "password": "short"}), false);

    let result = binding.run(&StoreUserValidator, &request).await.unwrap();
    match result {
        BindingOutcome::Failed {
            outcome,
            disposition: FailureDisposition::RedirectBack { location, flash },
        } => {
            assert_eq!(location, "/signup");
            // the password error is reported
            assert!(outcome.messages_for("password").is_some());
            assert!(flash["errors"]["password"].is_array());
            // but the submitted password is not echoed back
            assert_eq!(flash["old"]["email"], json!("a@b.com"));
            assert!(flash["old"].get("password").is_none());
        }
        other => panic!("expected redirect disposition, got {:?}", other),
    }
}

struct AdminOnlyValidator;

#[async_trait]
impl RouteValidator for AdminOnlyValidator {
    fn rules(&self) -> Vec<(String, String)> {
        vec![("email".to_string(), "required|email".to_string())]
    }

    async fn authorize(&self, ctx: &dyn RequestContext) -> bool {
        ctx.header("x-admin-token").is_some()
    }
}

#[tokio::test]
async fn failed_authorization_skips_validation_entirely() {
    let binding = ValidatorBinding::new(Engine::new());
    let request = FakeRequest::new(json!({"email": "not-an-email"}), true);

    let result = binding.run(&AdminOnlyValidator, &request).await;
    assert!(matches!(result, Err(EngineError::Unauthorized)));
    // the data object was never assembled
    assert_eq!(request.body_reads.load(Ordering::SeqCst), 0);
}

struct TeapotOnFailure;

#[async_trait]
impl RouteValidator for TeapotOnFailure {
    fn rules(&self) -> Vec<(String, String)> {
        vec![("email".to_string(), "required".to_string())]
    }

    async fn fails(
        &self,
        _ctx: &dyn RequestContext,
        _outcome: &veto::ValidationOutcome,
    ) -> Option<FailureDisposition> {
        Some(FailureDisposition::Handled)
    }
}

#[tokio::test]
async fn fails_hook_suppresses_default_disposition() {
    let binding = ValidatorBinding::new(Engine::new());
    let request = FakeRequest::new(json!({}), false);

    let result = binding.run(&TeapotOnFailure, &request).await.unwrap();
    match result {
        BindingOutcome::Failed { disposition, .. } => {
            assert_eq!(disposition, FailureDisposition::Handled);
        }
        other => panic!("expected failure, got {:?}", other),
    }
}

struct DataOverrideValidator;

impl RouteValidator for DataOverrideValidator {
    fn rules(&self) -> Vec<(String, String)> {
        vec![("role".to_string(), "required|in:member,admin".to_string())]
    }

    fn data(&self, _ctx: &dyn RequestContext) -> Option<Value> {
        // definition-supplied data wins over the request body
        Some(json!({"role": "member"}))
    }
}

#[tokio::test]
async fn custom_data_override_wins_on_collision() {
    let binding = ValidatorBinding::new(Engine::new());
    let request = FakeRequest::new(json!({"role": "superuser"}), true);

    let result = binding.run(&DataOverrideValidator, &request).await.unwrap();
    match result {
        BindingOutcome::Passed { data } => assert_eq!(data["role"], json!("member")),
        other => panic!("expected pass, got {:?}", other),
    }
}

#[tokio::test]
async fn declared_validator_runs_with_configured_formatter() {
    let config = ValidatorConfig::from_toml(
        r#"
        [validators.store_user]
        formatter = "json_api"

        [[validators.store_user.rules]]
        field = "email"
        spec = "required|email"

        [[validators.store_user.sanitize]]
        field = "email"
        spec = "trim"
        "#,
    )
    .unwrap();
    let validator = config.declared("store_user").unwrap();

    let binding = ValidatorBinding::new(Engine::new());
    let request = FakeRequest::new(json!({"email": "nope"}), true);

    let result = binding.run(&validator, &request).await.unwrap();
    match result {
        BindingOutcome::Failed {
            disposition: FailureDisposition::Structured(envelope),
            ..
        } => {
            let errors = envelope["errors"].as_array().unwrap();
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0]["source"]["pointer"], json!("email"));
        }
        other => panic!("expected structured disposition, got {:?}", other),
    }
}
