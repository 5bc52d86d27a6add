//! Configuration snapshot for the reconciliation pipeline.
//!
//! Loaded once at startup and read-only afterwards: which report forms are
//! accepted, how each is validated and replied to, and which form holds the
//! patient registrations. Dispatch is configuration-as-data — a report type
//! is resolved by form identifier, never by dynamic lookup.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// One validation rule of a report type.
///
/// Rules missing a property, predicate, or message are tolerated here and
/// skipped by the validator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationRule {
    #[serde(default)]
    pub property: Option<String>,
    #[serde(default)]
    pub rule: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Static configuration of one accepted report type, keyed by form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportTypeConfig {
    pub form: String,
    /// Reply text appended when a registration matches.
    #[serde(default)]
    pub report_accepted: Option<String>,
    /// Error text appended when no registration is found.
    #[serde(default)]
    pub registration_not_found: Option<String>,
    /// Message-type tag this report silences. No tag, no silencing.
    #[serde(default)]
    pub silence_type: Option<String>,
    /// Silence-window expression, e.g. "1 month". See [`crate::duration`].
    #[serde(default)]
    pub silence_for: Option<String>,
    #[serde(default)]
    pub validations: Vec<ValidationRule>,
}

/// The read-only configuration snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Form identifier of the registration documents, e.g. the pregnancy
    /// registration form. Absent means matching is disabled entirely.
    #[serde(default)]
    pub registration_form: Option<String>,
    #[serde(default)]
    pub patient_reports: Vec<ReportTypeConfig>,
}

impl Settings {
    /// Deserialize a settings snapshot from its JSON representation.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// The report-type config accepted for `form`, if any.
    pub fn report_config(&self, form: &str) -> Option<&ReportTypeConfig> {
        self.patient_reports.iter().find(|r| r.form == form)
    }

    /// The configured registration form; blank counts as unconfigured.
    pub fn registration_form(&self) -> Option<&str> {
        self.registration_form.as_deref().filter(|f| !f.is_empty())
    }
}
