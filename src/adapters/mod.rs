// Adapters layer: ticket ingestion and report output around the pure core.

pub mod csv_source;
pub mod report;
