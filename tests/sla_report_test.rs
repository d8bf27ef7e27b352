use anyhow::Result;
use chrono::{TimeZone, Utc};
use sla_engine::adapters::report;
use sla_engine::core::{FixedClock, TicketSource};
use sla_engine::{Classification, CsvTicketSource, LocalStorage, SlaConfig, SlaEngine};
use tempfile::TempDir;

const TICKETS: &str = "\
id,created_at,closed_at,urgency
HD-100,2024-03-04T08:00:00Z,2024-03-04T10:00:00Z,Media
HD-101,2024-03-04T09:00:00Z,,Alta
HD-102,2024-03-08T15:00:00Z,2024-03-11T08:00:00Z,Critica
HD-103,2024-03-05T09:00:00Z,,Bassa
HD-104,2024-03-05T09:00:00Z,,Legacy
";

#[tokio::test]
async fn test_end_to_end_report_from_files() -> Result<()> {
    let temp_dir = TempDir::new()?;
    tokio::fs::write(temp_dir.path().join("tickets.csv"), TICKETS).await?;

    let config_path = temp_dir.path().join("sla.toml");
    tokio::fs::write(
        &config_path,
        r#"
[calendar]
timezone = "+01:00"

[thresholds.alta]
on_time_hours = 4
approaching_hours = 9
"#,
    )
    .await?;

    let config = SlaConfig::from_file(&config_path)?;
    let storage = LocalStorage::new(temp_dir.path());
    let tickets = CsvTicketSource::load(&storage, "tickets.csv").await?.tickets()?;
    assert_eq!(tickets.len(), 5);

    // Wednesday 2024-03-06 12:00 in the office
    let now = Utc.with_ymd_and_hms(2024, 3, 6, 11, 0, 0).unwrap();
    let engine = SlaEngine::with_clock(config.classifier()?, FixedClock(now));
    let (evaluations, summary) = engine.report(&tickets);

    let by_id = |id: &str| evaluations.iter().find(|e| e.ticket_id == id).unwrap();

    // 09:00-11:00 office time, opening at 08:30 -> 2h
    assert_eq!(by_id("HD-100").elapsed_hours, 2.0);
    assert_eq!(by_id("HD-100").classification, Classification::OnTime);

    // Mon 10:00 -> Wed 12:00 = 7.5 + 9 + 3.5 = 20h, past the 9h override
    assert_eq!(by_id("HD-101").elapsed_hours, 20.0);
    assert_eq!(by_id("HD-101").classification, Classification::Overdue);

    // Fri 16:00 -> Mon 09:00 = 1.5 + 0.5, frozen at closure
    assert!(by_id("HD-102").closed);
    assert_eq!(by_id("HD-102").elapsed_hours, 2.0);
    assert_eq!(by_id("HD-102").classification, Classification::Approaching);

    assert_eq!(by_id("HD-103").classification, Classification::OnTime);
    assert_eq!(by_id("HD-104").classification, Classification::Unknown);

    // closed HD-100 and HD-102 only feed the average
    assert_eq!(summary.total, 5);
    assert_eq!(summary.open, 3);
    assert_eq!(summary.on_time, 1);
    assert_eq!(summary.approaching, 0);
    assert_eq!(summary.overdue, 1);
    assert_eq!(summary.unknown, 1);
    assert_eq!(summary.closed, 2);
    assert_eq!(summary.average_close_hours, Some(2.0));

    let text = report::render_text(&evaluations, &summary);
    assert!(text.contains("HD-104"));
    assert!(text.contains("Open tickets: 3 of 5"));
    assert!(text.contains("Average close time: 2.0 h"));

    Ok(())
}

#[tokio::test]
async fn test_missing_ticket_file_is_io_error() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let storage = LocalStorage::new(temp_dir.path());

    let err = CsvTicketSource::load(&storage, "absent.csv").await.unwrap_err();
    assert!(matches!(err, sla_engine::SlaError::IoError(_)));
    Ok(())
}

#[test]
fn test_summary_is_independent_of_ticket_order() {
    let tickets = CsvTicketSource::from_bytes(TICKETS.as_bytes().to_vec())
        .tickets()
        .unwrap();
    let mut reversed = tickets.clone();
    reversed.reverse();

    let now = Utc.with_ymd_and_hms(2024, 3, 6, 11, 0, 0).unwrap();
    let engine = SlaEngine::with_clock(SlaConfig::default().classifier().unwrap(), FixedClock(now));
    assert_eq!(engine.summarize(&tickets), engine.summarize(&reversed));
}
