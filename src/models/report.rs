//! Report document model — a submitted clinical form instance.
//!
//! Structural fields the engine reads (form, patient id, reported date,
//! sender) are typed; the free-form answers of the form live in `fields`
//! and are only inspected by validation rules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An incoming clinical report, as delivered by the change feed.
///
/// The engine mutates it append-only: replies and error entries are added,
/// nothing is removed or rewritten. Persistence is the dispatcher's job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportDoc {
    pub id: String,
    #[serde(default)]
    pub form: Option<String>,
    #[serde(default)]
    pub patient_id: Option<String>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub reported_date: Option<DateTime<Utc>>,
    /// Raw sender phone; fallback when the contact chain resolves nothing.
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub contact: Option<Contact>,
    /// Free-form form answers keyed by field name.
    #[serde(default)]
    pub fields: serde_json::Map<String, serde_json::Value>,
    /// Replies queued for the sender. Appended here, transported elsewhere.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub responses: Vec<ReplyEntry>,
    /// User-facing error entries.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ErrorEntry>,
}

impl ReportDoc {
    /// Resolve the originating phone: first phone found walking up the
    /// contact chain (reporting unit → facility → …), else the raw `from`.
    pub fn contact_phone(&self) -> Option<&str> {
        let mut node = self.contact.as_ref();
        while let Some(contact) = node {
            if let Some(phone) = contact.phone.as_deref() {
                if !phone.is_empty() {
                    return Some(phone);
                }
            }
            node = contact.parent.as_deref();
        }
        self.from.as_deref().filter(|f| !f.is_empty())
    }

    /// Look up a free-form field by name.
    pub fn field(&self, name: &str) -> Option<&serde_json::Value> {
        self.fields.get(name)
    }
}

/// A node in the report's contact hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub parent: Option<Box<Contact>>,
}

/// A reply queued on the report for delivery back to the sender.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyEntry {
    pub id: Uuid,
    /// Destination phone, when one could be resolved.
    #[serde(default)]
    pub to: Option<String>,
    pub message: String,
}

/// A user-facing error entry attached to the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEntry {
    /// Stable machine code (`sys.validation`, `sys.registration_not_found`).
    pub code: String,
    pub message: String,
}
