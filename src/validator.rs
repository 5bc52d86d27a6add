//! Rule Validator — evaluates a report against its configured field rules.
//!
//! Pure function of (config, document): no side effects, errors are returned
//! for the caller to attach.

use crate::config::ReportTypeConfig;
use crate::models::ReportDoc;
use crate::rules::RuleEvaluator;

/// Evaluate a report type's validation rules against a document.
///
/// Returns the messages of failing fields in rule-declaration order, at most
/// one per field; a later rule for the same field replaces the earlier one
/// without moving it. Rules missing a property, predicate, or message are
/// silently skipped. No config or no rules means an unconditional pass.
pub fn validate(
    report: Option<&ReportTypeConfig>,
    doc: &ReportDoc,
    evaluator: &dyn RuleEvaluator,
) -> Vec<String> {
    let Some(report) = report else {
        return Vec::new();
    };

    // Ordered field → (predicate, message) table; duplicates replace in place.
    let mut table: Vec<(&str, &str, &str)> = Vec::new();
    for rule in &report.validations {
        let (Some(property), Some(predicate), Some(message)) = (
            rule.property.as_deref(),
            rule.rule.as_deref(),
            rule.message.as_deref(),
        ) else {
            continue;
        };
        if let Some(entry) = table.iter_mut().find(|(p, _, _)| *p == property) {
            entry.1 = predicate;
            entry.2 = message;
        } else {
            table.push((property, predicate, message));
        }
    }

    table
        .into_iter()
        .filter(|(property, predicate, _)| !evaluator.evaluate(predicate, doc, property))
        .map(|(_, _, message)| message.to_string())
        .collect()
}
