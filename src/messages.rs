//! Append-only reply and error mutations on a report document.
//!
//! Pure in-place mutation, no I/O: transport of the queued replies is the
//! messaging subsystem's job.

use uuid::Uuid;

use crate::models::{ErrorEntry, ReplyEntry, ReportDoc};

/// Error code for a failed validation rule.
pub const ERR_VALIDATION: &str = "sys.validation";
/// Error code for a report whose patient has no registration.
pub const ERR_REGISTRATION_NOT_FOUND: &str = "sys.registration_not_found";

/// Queue a reply to the report's sender. No-op for absent or blank text.
pub fn add_reply(doc: &mut ReportDoc, text: Option<&str>) {
    let Some(text) = text.map(str::trim).filter(|t| !t.is_empty()) else {
        return;
    };
    let to = doc.contact_phone().map(str::to_owned);
    doc.responses.push(ReplyEntry {
        id: Uuid::new_v4(),
        to,
        message: text.to_string(),
    });
}

/// Attach a user-facing error entry. No-op for absent or blank text.
pub fn add_error(doc: &mut ReportDoc, code: &str, text: Option<&str>) {
    let Some(text) = text.map(str::trim).filter(|t| !t.is_empty()) else {
        return;
    };
    doc.errors.push(ErrorEntry {
        code: code.to_string(),
        message: text.to_string(),
    });
}
