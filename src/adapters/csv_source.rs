use crate::domain::model::Ticket;
use crate::domain::ports::{Storage, TicketSource};
use crate::utils::error::{Result, SlaError};
use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct TicketRow {
    id: String,
    created_at: String,
    closed_at: Option<String>,
    urgency: String,
}

/// Ticket export in CSV form: `id,created_at,closed_at,urgency`.
#[derive(Debug, Clone)]
pub struct CsvTicketSource {
    data: Vec<u8>,
}

impl CsvTicketSource {
    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self { data }
    }

    pub async fn load<S: Storage>(storage: &S, path: &str) -> Result<Self> {
        let data = storage.read_file(path).await?;
        tracing::info!("📥 Loaded ticket export {} ({} bytes)", path, data.len());
        Ok(Self::from_bytes(data))
    }
}

fn parse_instant(row: usize, column: &str, raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|instant| instant.with_timezone(&Utc))
        .map_err(|e| SlaError::InvalidTicketError {
            row,
            reason: format!("{} '{}': {}", column, raw, e),
        })
}

impl TicketSource for CsvTicketSource {
    fn tickets(&self) -> Result<Vec<Ticket>> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(self.data.as_slice());

        let mut tickets = Vec::new();
        for (index, record) in reader.deserialize::<TicketRow>().enumerate() {
            // 第一行是標題
            let row = index + 2;
            let record = record?;

            let closed_at = match record.closed_at.as_deref() {
                Some(raw) if !raw.trim().is_empty() => Some(parse_instant(row, "closed_at", raw)?),
                _ => None,
            };

            tickets.push(Ticket {
                id: record.id,
                created_at: parse_instant(row, "created_at", &record.created_at)?,
                closed_at,
                urgency: record.urgency,
            });
        }

        tracing::debug!("Parsed {} tickets", tickets.len());
        Ok(tickets)
    }
}
