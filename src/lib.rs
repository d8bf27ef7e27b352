pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::{CliConfig, OutputFormat};

pub use crate::adapters::csv_source::CsvTicketSource;
pub use crate::config::{cli::LocalStorage, toml_config::SlaConfig};
pub use crate::core::calendar::{BusinessCalendar, CalendarZone, ClockTime, WorkingDays};
pub use crate::core::classifier::{EscalationClassifier, SlaPolicy, UrgencyThreshold};
pub use crate::core::engine::SlaEngine;
pub use crate::domain::model::{Classification, SlaSummary, Ticket, TicketEvaluation, Urgency, Verdict};
pub use crate::utils::error::{Result, SlaError};
