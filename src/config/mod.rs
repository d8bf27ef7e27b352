pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use self::cli_args::{CliConfig, OutputFormat};

#[cfg(feature = "cli")]
mod cli_args {
    use crate::utils::error::{Result, SlaError};
    use crate::utils::validation::{validate_non_empty_string, Validate};
    use chrono::{DateTime, Utc};
    use clap::{Parser, ValueEnum};
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
    #[serde(rename_all = "lowercase")]
    pub enum OutputFormat {
        Text,
        Json,
    }

    #[derive(Debug, Clone, Serialize, Deserialize, Parser)]
    #[command(name = "sla-report")]
    #[command(about = "Classify helpdesk tickets against SLA working-hour thresholds")]
    pub struct CliConfig {
        /// CSV export with columns id,created_at,closed_at,urgency
        #[arg(long, default_value = "tickets.csv")]
        pub tickets: String,

        /// Optional TOML file overriding calendar and thresholds
        #[arg(long)]
        pub config: Option<String>,

        /// Evaluate open tickets as of this RFC 3339 instant instead of now
        #[arg(long)]
        pub as_of: Option<String>,

        #[arg(long, value_enum, default_value = "text")]
        pub format: OutputFormat,

        #[arg(long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Emit logs as JSON")]
        pub json_logs: bool,
    }

    impl CliConfig {
        pub fn as_of_instant(&self) -> Result<Option<DateTime<Utc>>> {
            self.as_of
                .as_deref()
                .map(|raw| {
                    DateTime::parse_from_rfc3339(raw)
                        .map(|instant| instant.with_timezone(&Utc))
                        .map_err(|e| SlaError::InvalidConfigValueError {
                            field: "as_of".to_string(),
                            value: raw.to_string(),
                            reason: e.to_string(),
                        })
                })
                .transpose()
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            validate_non_empty_string("tickets", &self.tickets)?;
            if let Some(config) = &self.config {
                validate_non_empty_string("config", config)?;
            }
            self.as_of_instant()?;
            Ok(())
        }
    }

}
