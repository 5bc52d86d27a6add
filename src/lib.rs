//! Sentira — clinical report reconciliation.
//!
//! A report document lands in the store; this crate decides how to react:
//! validate it against per-report-type rules, match it to the patient's
//! registration, queue a reply to the sender, and silence reminder messages
//! the report has made moot.
//!
//! ## Pipeline
//!
//! ```text
//! AcceptReports (transition) → validator → matcher → window selector
//! ```
//!
//! The document store, reply transport, and configuration loading live
//! outside the crate: the store is consumed through the
//! [`repository::DocumentRepository`] trait, replies and errors are
//! append-only mutations on the report document, and configuration is a
//! read-only [`config::Settings`] snapshot. The single entry point is
//! [`transition::AcceptReports::on_match`].
//!
//! Each document is processed independently and sequentially; the engine
//! holds no cross-document state and performs no retries. Silencing writes
//! are last-writer-wins on the registration document.

pub mod config;
pub mod duration;
pub mod error;
pub mod matcher;
pub mod messages;
pub mod models;
pub mod repository;
pub mod rules;
pub mod transition;
pub mod validator;
pub mod window;

pub use config::{ReportTypeConfig, Settings, ValidationRule};
pub use error::{ConfigError, RepositoryError, TransitionError};
pub use models::{
    Contact, ErrorEntry, MessageState, RegistrationDoc, ReplyEntry, ReportDoc, ScheduledMessage,
};
pub use repository::{DocumentRepository, MemoryRepository};
pub use rules::{PatternEvaluator, RuleEvaluator};
pub use transition::AcceptReports;
