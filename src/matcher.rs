//! Registration Matcher — reacts to the registrations found for a report.
//!
//! Any registration at all counts as a match; multiplicity is not
//! deduplicated. On match the configured reply is queued and, when the
//! report type declares a silence trigger, each registration has its moot
//! reminders cleared and is re-persisted.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::config::ReportTypeConfig;
use crate::error::TransitionError;
use crate::messages;
use crate::models::{MessageState, RegistrationDoc, ReportDoc};
use crate::repository::DocumentRepository;
use crate::window;

/// Apply the match outcome to the report and its registrations.
///
/// Zero registrations: the configured "not found" error is attached and
/// nothing else happens. Otherwise the accepted reply is queued first, so a
/// later persistence failure propagates without rolling it back — the report
/// itself still counts as processed.
pub fn match_registrations(
    doc: &mut ReportDoc,
    report: &ReportTypeConfig,
    registrations: Vec<RegistrationDoc>,
    repository: &dyn DocumentRepository,
) -> Result<(), TransitionError> {
    if registrations.is_empty() {
        messages::add_error(
            doc,
            messages::ERR_REGISTRATION_NOT_FOUND,
            report.registration_not_found.as_deref(),
        );
        return Ok(());
    }

    messages::add_reply(doc, report.report_accepted.as_deref());

    let Some(silence_type) = report.silence_type.as_deref() else {
        return Ok(());
    };
    let Some(reported_date) = doc.reported_date else {
        // Unreachable past the structural filter; without a reported date
        // there is no window to silence against.
        return Ok(());
    };

    for mut registration in registrations {
        silence_reminders(
            repository,
            &mut registration,
            reported_date,
            report.silence_for.as_deref(),
            silence_type,
        )?;
    }
    Ok(())
}

/// Clear the reminders a report silences and persist the registration.
///
/// Skips the write entirely when nothing was selected. Returns how many
/// messages were cleared.
pub fn silence_reminders(
    repository: &dyn DocumentRepository,
    registration: &mut RegistrationDoc,
    reported_date: DateTime<Utc>,
    silence_for: Option<&str>,
    message_type: &str,
) -> Result<usize, TransitionError> {
    let to_clear = window::select_to_clear(registration, reported_date, silence_for, message_type);
    if to_clear.is_empty() {
        return Ok(0);
    }

    for &idx in &to_clear {
        registration.scheduled_messages[idx].state = MessageState::Cleared;
    }
    debug!(
        registration_id = registration.id,
        message_type,
        cleared = to_clear.len(),
        "Cleared silenced reminders"
    );
    repository.save_registration(registration)?;
    Ok(to_clear.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RepositoryError;
    use crate::repository::MemoryRepository;
    use chrono::{Duration, TimeZone};

    fn reported() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 6, 1, 12, 0, 0).unwrap()
    }

    fn doc() -> ReportDoc {
        serde_json::from_value(serde_json::json!({
            "id": "report-1",
            "form": "ANCV",
            "patient_id": "123",
            "reported_date": reported().timestamp_millis(),
            "from": "+256700000001",
        }))
        .unwrap()
    }

    fn report(silence_type: Option<&str>) -> ReportTypeConfig {
        ReportTypeConfig {
            form: "ANCV".into(),
            report_accepted: Some("Thank you, visit recorded.".into()),
            registration_not_found: Some("No registration found.".into()),
            silence_type: silence_type.map(str::to_owned),
            silence_for: Some("1 month".into()),
            validations: vec![],
        }
    }

    fn registration(messages: Vec<(i64, &str, MessageState)>) -> RegistrationDoc {
        RegistrationDoc {
            id: "reg-1".into(),
            patient_id: "123".into(),
            form: "R".into(),
            scheduled_messages: messages
                .into_iter()
                .map(|(offset_days, group, state)| crate::models::ScheduledMessage {
                    due: reported() + Duration::days(offset_days),
                    group: Some(group.into()),
                    message_type: "anc".into(),
                    state,
                })
                .collect(),
        }
    }

    struct FailingRepository;

    impl DocumentRepository for FailingRepository {
        fn get_registrations(
            &self,
            _patient_id: &str,
            _form: &str,
        ) -> Result<Vec<RegistrationDoc>, RepositoryError> {
            Err(RepositoryError::Backend("down".into()))
        }

        fn save_registration(&self, _registration: &RegistrationDoc) -> Result<(), RepositoryError> {
            Err(RepositoryError::Backend("down".into()))
        }
    }

    #[test]
    fn zero_registrations_attach_error_only() {
        let repo = MemoryRepository::new();
        let mut doc = doc();
        match_registrations(&mut doc, &report(Some("anc")), vec![], &repo).unwrap();

        assert!(doc.responses.is_empty());
        assert_eq!(doc.errors.len(), 1);
        assert_eq!(doc.errors[0].code, messages::ERR_REGISTRATION_NOT_FOUND);
        assert_eq!(repo.save_count(), 0);
    }

    #[test]
    fn match_without_silence_trigger_replies_and_saves_nothing() {
        let repo = MemoryRepository::new();
        let mut doc = doc();
        let reg = registration(vec![(3, "g1", MessageState::Scheduled)]);
        match_registrations(&mut doc, &report(None), vec![reg], &repo).unwrap();

        assert_eq!(doc.responses.len(), 1);
        assert!(doc.errors.is_empty());
        assert_eq!(repo.save_count(), 0);
    }

    #[test]
    fn silencing_clears_cohort_and_persists_once() {
        let reg = registration(vec![
            (3, "g1", MessageState::Scheduled),
            (40, "g1", MessageState::Scheduled),
        ]);
        let repo = MemoryRepository::with_registrations(vec![reg.clone()]);
        let mut doc = doc();
        match_registrations(&mut doc, &report(Some("anc")), vec![reg], &repo).unwrap();

        assert_eq!(doc.responses.len(), 1);
        assert_eq!(repo.save_count(), 1);
        let stored = repo.registration("reg-1").unwrap();
        assert!(stored
            .scheduled_messages
            .iter()
            .all(|m| m.state == MessageState::Cleared));
    }

    #[test]
    fn nothing_selected_means_no_write() {
        let reg = registration(vec![(-10, "g1", MessageState::Scheduled)]);
        let repo = MemoryRepository::with_registrations(vec![reg.clone()]);
        let mut doc = doc();
        match_registrations(&mut doc, &report(Some("anc")), vec![reg], &repo).unwrap();

        assert_eq!(doc.responses.len(), 1);
        assert_eq!(repo.save_count(), 0);
    }

    #[test]
    fn save_failure_propagates_but_reply_stays() {
        let reg = registration(vec![(3, "g1", MessageState::Scheduled)]);
        let mut doc = doc();
        let err = match_registrations(&mut doc, &report(Some("anc")), vec![reg], &FailingRepository)
            .unwrap_err();

        assert!(matches!(err, TransitionError::Repository(_)));
        assert_eq!(doc.responses.len(), 1);
    }

    #[test]
    fn every_candidate_registration_is_silenced() {
        let reg_a = registration(vec![(3, "g1", MessageState::Scheduled)]);
        let mut reg_b = registration(vec![(5, "g2", MessageState::Scheduled)]);
        reg_b.id = "reg-2".into();
        let repo = MemoryRepository::with_registrations(vec![reg_a.clone(), reg_b.clone()]);
        let mut doc = doc();
        match_registrations(&mut doc, &report(Some("anc")), vec![reg_a, reg_b], &repo).unwrap();

        assert_eq!(doc.responses.len(), 1);
        assert_eq!(repo.saved_ids(), vec!["reg-1".to_string(), "reg-2".to_string()]);
    }

    #[test]
    fn silence_reminders_reports_cleared_count() {
        let repo = MemoryRepository::new();
        let mut reg = registration(vec![
            (3, "g1", MessageState::Scheduled),
            (40, "g1", MessageState::Scheduled),
            (5, "g2", MessageState::Sent),
        ]);
        let cleared =
            silence_reminders(&repo, &mut reg, reported(), Some("1 month"), "anc").unwrap();
        assert_eq!(cleared, 2);
        assert_eq!(repo.save_count(), 1);
    }
}
