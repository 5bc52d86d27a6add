//! Message Window Selector — which scheduled reminders a report silences.
//!
//! Reminders go out in cohorts sharing a group. Once any cohort member falls
//! inside the silence window, the whole cohort is silenced together, even
//! when individual due dates drift outside the window — otherwise a patient
//! could still receive a stray reminder from a cohort the report superseded.

use chrono::{DateTime, Utc};

use crate::duration::parse_duration;
use crate::models::{MessageState, RegistrationDoc};

/// Select the scheduled messages a report silences.
///
/// Returns indices into `registration.scheduled_messages`, in stored order;
/// the caller mutates. Only messages carrying `message_type` are considered
/// at all.
///
/// A message is a direct match when it is due inside
/// `[reported_date, reported_date + silence_for]` (both ends inclusive; an
/// absent or unparseable duration collapses the window to the reported
/// instant) and still `scheduled`. The first direct match anchors a cohort:
/// every later scheduled message sharing its group is selected whether or
/// not it matches the window itself. A message sharing the group but seen
/// before any anchor is NOT selected — anchor-first order is load-bearing.
pub fn select_to_clear(
    registration: &RegistrationDoc,
    reported_date: DateTime<Utc>,
    silence_for: Option<&str>,
    message_type: &str,
) -> Vec<usize> {
    let silence_until = match silence_for.and_then(parse_duration) {
        Some(window) => window.add_to(reported_date),
        None => reported_date,
    };

    let mut anchor_group: Option<&Option<String>> = None;
    let mut selected = Vec::new();

    for (idx, msg) in registration.messages_of_type(message_type) {
        if msg.state != MessageState::Scheduled {
            continue;
        }
        let direct = msg.due >= reported_date && msg.due <= silence_until;
        if direct && anchor_group.is_none() {
            anchor_group = Some(&msg.group);
        }
        if direct || anchor_group.is_some_and(|group| *group == msg.group) {
            selected.push(idx);
        }
    }

    selected
}
