use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::error::{ExtractionError, Result};

#[derive(Parser)]
#[command(name = "tempo-processor")]
#[command(about = "TEMPO L3 trace-gas extraction pipeline")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Configuration file path")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run an extraction batch over the stored location grid
    Run {
        #[arg(short, long, help = "Window start (RFC 3339 or YYYY-MM-DD)")]
        start: String,

        #[arg(short = 'e', long, help = "Window stop (RFC 3339 or YYYY-MM-DD)")]
        stop: String,

        #[arg(short, long, help = "Process a single location by id")]
        location_id: Option<i64>,

        #[arg(long, help = "Process at most N locations")]
        limit: Option<i64>,
    },

    /// Create the locations and observations tables
    InitDb,

    /// Populate the locations table with the North America grid
    SeedGrid {
        #[arg(long, default_value = "0.25", help = "Grid spacing in degrees")]
        step: f64,
    },

    /// Show stored locations
    Locations {
        #[arg(short, long, default_value = "10")]
        sample: usize,
    },
}

/// Accepts a full RFC 3339 timestamp or a bare date (midnight UTC).
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }

    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| ExtractionError::Config(format!("invalid date: {}", value)))?;
    Ok(DateTime::from_naive_utc_and_offset(midnight, Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_rfc3339_timestamp() {
        let ts = parse_timestamp("2025-09-01T06:30:00Z").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2025, 9, 1, 6, 30, 0).unwrap());
    }

    #[test]
    fn test_parse_bare_date_as_midnight() {
        let ts = parse_timestamp("2025-09-01").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2025, 9, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_timestamp("yesterday").is_err());
    }
}
