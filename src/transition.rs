//! Report Reconciliation Transition — the engine's entry point.
//!
//! Runs once per delivered report document, strictly sequentially:
//! structural filter → report-type resolution → validation → registration
//! lookup → match/silence. The collaborators are injected so a dispatcher
//! (or a test) can substitute any of them.

use tracing::debug;

use crate::config::Settings;
use crate::error::TransitionError;
use crate::matcher;
use crate::messages;
use crate::models::ReportDoc;
use crate::repository::DocumentRepository;
use crate::rules::RuleEvaluator;
use crate::validator;

/// The report-acceptance transition.
pub struct AcceptReports<'a> {
    settings: &'a Settings,
    repository: &'a dyn DocumentRepository,
    evaluator: &'a dyn RuleEvaluator,
}

impl<'a> AcceptReports<'a> {
    pub fn new(
        settings: &'a Settings,
        repository: &'a dyn DocumentRepository,
        evaluator: &'a dyn RuleEvaluator,
    ) -> Self {
        Self {
            settings,
            repository,
            evaluator,
        }
    }

    /// Structural eligibility: a form, a patient id, a reported date, and a
    /// resolvable originating phone. Ineligible documents are inert.
    pub fn filter(doc: &ReportDoc) -> bool {
        doc.form.as_deref().is_some_and(|f| !f.is_empty())
            && doc.patient_id.as_deref().is_some_and(|p| !p.is_empty())
            && doc.reported_date.is_some()
            && doc.contact_phone().is_some()
    }

    /// Process one report document.
    ///
    /// `Ok(true)` means the document was handled (errors attached or
    /// registrations matched); `Ok(false)` is the deliberate do-nothing
    /// outcome for ineligible documents and unconfigured forms. Repository
    /// failures propagate as `Err` — by then a reply may already be queued
    /// on the document.
    pub fn on_match(&self, doc: &mut ReportDoc) -> Result<bool, TransitionError> {
        if !Self::filter(doc) {
            return Ok(false);
        }
        let (Some(form), Some(patient_id)) = (doc.form.clone(), doc.patient_id.clone()) else {
            return Ok(false);
        };

        let report = self.settings.report_config(&form);

        let errors = validator::validate(report, doc, self.evaluator);
        if !errors.is_empty() {
            debug!(
                report_id = doc.id,
                form,
                errors = errors.len(),
                "Report failed validation"
            );
            for error in &errors {
                messages::add_error(doc, messages::ERR_VALIDATION, Some(error));
            }
            return Ok(true);
        }

        // Validation passed but there is nothing to reconcile against:
        // unknown form, or no registration form configured at all.
        let (Some(report), Some(registration_form)) = (report, self.settings.registration_form())
        else {
            return Ok(false);
        };

        let registrations = self
            .repository
            .get_registrations(&patient_id, registration_form)?;
        matcher::match_registrations(doc, report, registrations, self.repository)?;
        Ok(true)
    }
}
