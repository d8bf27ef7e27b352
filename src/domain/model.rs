use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ticket urgency as stored by the helpdesk ("Bassa", "Media", "Alta", "Critica").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Bassa,
    Media,
    Alta,
    Critica,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Bassa => "Bassa",
            Urgency::Media => "Media",
            Urgency::Alta => "Alta",
            Urgency::Critica => "Critica",
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown urgency label '{0}'")]
pub struct UnknownUrgency(pub String);

impl FromStr for Urgency {
    type Err = UnknownUrgency;

    // 大小寫不敏感，忽略前後空白
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bassa" => Ok(Urgency::Bassa),
            "media" => Ok(Urgency::Media),
            "alta" => Ok(Urgency::Alta),
            "critica" => Ok(Urgency::Critica),
            _ => Err(UnknownUrgency(s.to_string())),
        }
    }
}

/// Escalation state derived from elapsed working time. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    OnTime,
    Approaching,
    Overdue,
    Unknown,
}

impl Classification {
    /// Label shown on the dashboard charts.
    pub fn display_name(&self) -> &'static str {
        match self {
            Classification::OnTime => "Nei tempi",
            Classification::Approaching => "In scadenza",
            Classification::Overdue => "Scaduti",
            Classification::Unknown => "Non classificato",
        }
    }

    /// Colour tag used for ticket rows.
    pub fn colour(&self) -> &'static str {
        match self {
            Classification::OnTime => "green",
            Classification::Approaching => "orange",
            Classification::Overdue => "red",
            Classification::Unknown => "grey",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Verdict {
    pub classification: Classification,
    pub elapsed_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    pub urgency: String,
}

impl Ticket {
    pub fn is_closed(&self) -> bool {
        self.closed_at.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TicketEvaluation {
    pub ticket_id: String,
    pub urgency: String,
    pub closed: bool,
    pub as_of: DateTime<Utc>,
    pub classification: Classification,
    pub elapsed_hours: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SlaSummary {
    pub total: usize,
    pub open: usize,
    pub on_time: usize,
    pub approaching: usize,
    pub overdue: usize,
    pub unknown: usize,
    pub closed: usize,
    pub average_close_hours: Option<f64>,
}

impl SlaSummary {
    pub fn count(&self, classification: Classification) -> usize {
        match classification {
            Classification::OnTime => self.on_time,
            Classification::Approaching => self.approaching,
            Classification::Overdue => self.overdue,
            Classification::Unknown => self.unknown,
        }
    }

    /// Fraction of open tickets in the given state; 0.0 when nothing is open.
    pub fn share(&self, classification: Classification) -> f64 {
        if self.open == 0 {
            return 0.0;
        }
        self.count(classification) as f64 / self.open as f64
    }
}
