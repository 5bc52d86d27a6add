pub mod registration;
pub mod report;

pub use registration::{MessageState, RegistrationDoc, ScheduledMessage};
pub use report::{Contact, ErrorEntry, ReplyEntry, ReportDoc};
