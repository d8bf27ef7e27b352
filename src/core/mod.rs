pub mod calendar;
pub mod classifier;
pub mod engine;

pub use crate::domain::model::{Classification, SlaSummary, Ticket, TicketEvaluation, Urgency, Verdict};
pub use crate::domain::ports::{Clock, FixedClock, Storage, SystemClock, TicketSource};
pub use crate::utils::error::Result;
