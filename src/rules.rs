//! Predicate evaluation for validation rules.
//!
//! Rules are data: each names a target field and a predicate expression.
//! The evaluator is a trait so a dispatcher embedding this crate can plug in
//! its own rule engine; `PatternEvaluator` is the default implementation.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::ReportDoc;

/// Boolean predicate evaluator for a single report field.
pub trait RuleEvaluator: Send + Sync {
    /// Evaluate `expression` against the named field of the document.
    /// `true` means the rule passes.
    fn evaluate(&self, expression: &str, doc: &ReportDoc, field: &str) -> bool;
}

static PREDICATE_TERM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\w+)(?:\((.*)\))?$").unwrap());

/// Default evaluator: a small conjunction language over field values.
///
/// Supported predicates, combined with `&&`:
/// - `required` — field present with a non-empty value
/// - `lenMin(n)` / `lenMax(n)` — character-count bounds
/// - `integer` — value parses as a whole number
/// - `regex(pattern)` — full regex match against the value
///
/// Unknown predicates and malformed arguments fail closed: the rule
/// evaluates false and the field's error message is emitted.
#[derive(Debug, Default, Clone, Copy)]
pub struct PatternEvaluator;

impl RuleEvaluator for PatternEvaluator {
    fn evaluate(&self, expression: &str, doc: &ReportDoc, field: &str) -> bool {
        let value = field_text(doc, field);
        expression
            .split("&&")
            .map(str::trim)
            .all(|term| evaluate_term(term, &value))
    }
}

/// The field value as text. Missing fields and nulls become the empty
/// string so length predicates read naturally.
fn field_text(doc: &ReportDoc, field: &str) -> String {
    match doc.field(field) {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(serde_json::Value::Number(n)) => n.to_string(),
        Some(serde_json::Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn evaluate_term(term: &str, value: &str) -> bool {
    let Some(caps) = PREDICATE_TERM.captures(term) else {
        return false;
    };
    let arg = caps.get(2).map(|m| m.as_str());
    match (&caps[1], arg) {
        ("required", None) => !value.is_empty(),
        ("lenMin", Some(n)) => n
            .trim()
            .parse::<usize>()
            .is_ok_and(|min| value.chars().count() >= min),
        ("lenMax", Some(n)) => n
            .trim()
            .parse::<usize>()
            .is_ok_and(|max| value.chars().count() <= max),
        ("integer", None) => value.parse::<i64>().is_ok(),
        ("regex", Some(pattern)) => match Regex::new(&format!("^(?:{pattern})$")) {
            Ok(re) => re.is_match(value),
            Err(_) => false,
        },
        _ => false,
    }
}
