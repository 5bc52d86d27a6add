//! Registration document model — a patient's enrollment record.
//!
//! A registration owns an ordered sequence of scheduled reminder messages.
//! The engine looks registrations up, flips selected messages to `cleared`,
//! and re-persists; it never creates one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a scheduled message.
///
/// Only `Scheduled` messages are ever eligible for silencing; every other
/// state, including ones this crate does not know about, is opaque and
/// round-trips untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageState {
    Scheduled,
    Pending,
    Sent,
    Cleared,
    Muted,
    #[serde(untagged)]
    Other(String),
}

impl MessageState {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Pending => "pending",
            Self::Sent => "sent",
            Self::Cleared => "cleared",
            Self::Muted => "muted",
            Self::Other(s) => s,
        }
    }
}

/// A pending reminder tied to a registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledMessage {
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub due: DateTime<Utc>,
    /// Cohort identifier: messages issued together share a group and are
    /// silenced as a unit.
    #[serde(default)]
    pub group: Option<String>,
    /// Type tag selecting which silencing rule applies.
    #[serde(rename = "type")]
    pub message_type: String,
    pub state: MessageState,
}

/// A patient's enrollment record for a program.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationDoc {
    pub id: String,
    pub patient_id: String,
    pub form: String,
    #[serde(default)]
    pub scheduled_messages: Vec<ScheduledMessage>,
}

impl RegistrationDoc {
    /// Messages carrying the given type tag, with their positions in the
    /// stored order. Messages of other types are invisible to silencing.
    pub fn messages_of_type<'a>(
        &'a self,
        message_type: &'a str,
    ) -> impl Iterator<Item = (usize, &'a ScheduledMessage)> + 'a {
        self.scheduled_messages
            .iter()
            .enumerate()
            .filter(move |(_, msg)| msg.message_type == message_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(due_ms: i64, message_type: &str, state: MessageState) -> ScheduledMessage {
        ScheduledMessage {
            due: DateTime::from_timestamp_millis(due_ms).unwrap(),
            group: Some("g1".into()),
            message_type: message_type.into(),
            state,
        }
    }

    #[test]
    fn message_state_serde_snake_case() {
        let json = serde_json::to_string(&MessageState::Scheduled).unwrap();
        assert_eq!(json, "\"scheduled\"");
        let parsed: MessageState = serde_json::from_str("\"cleared\"").unwrap();
        assert_eq!(parsed, MessageState::Cleared);
    }

    #[test]
    fn unknown_state_round_trips() {
        let parsed: MessageState = serde_json::from_str("\"delivered\"").unwrap();
        assert_eq!(parsed, MessageState::Other("delivered".into()));
        assert_eq!(parsed.as_str(), "delivered");
        let json = serde_json::to_string(&parsed).unwrap();
        assert_eq!(json, "\"delivered\"");
    }

    #[test]
    fn messages_of_type_filters_and_keeps_positions() {
        let reg = RegistrationDoc {
            id: "reg-1".into(),
            patient_id: "123".into(),
            form: "R".into(),
            scheduled_messages: vec![
                msg(1_000, "anc_visit", MessageState::Scheduled),
                msg(2_000, "other", MessageState::Scheduled),
                msg(3_000, "anc_visit", MessageState::Sent),
            ],
        };
        let hits: Vec<usize> = reg.messages_of_type("anc_visit").map(|(i, _)| i).collect();
        assert_eq!(hits, vec![0, 2]);
    }

    #[test]
    fn scheduled_message_due_uses_epoch_millis() {
        let parsed: ScheduledMessage = serde_json::from_value(serde_json::json!({
            "due": 1_700_000_000_000_i64,
            "group": "g2",
            "type": "anc_visit",
            "state": "scheduled"
        }))
        .unwrap();
        assert_eq!(parsed.due.timestamp_millis(), 1_700_000_000_000);
        assert_eq!(parsed.message_type, "anc_visit");
        assert_eq!(parsed.state, MessageState::Scheduled);
    }
}
