use chrono::{DateTime, Utc};
use tracing::{error, info};

use crate::error::{ExtractionError, Result};
use crate::models::Location;
use crate::processors::location_extractor::LocationExtractor;
use crate::remote::JobService;
use crate::utils::cancel::CancelToken;
use crate::utils::progress::ProgressReporter;
use crate::writers::ObservationWriter;

/// Outcome of one batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub failed: usize,
    pub cancelled: bool,
}

impl BatchSummary {
    /// 0 = every location succeeded, 2 = partial failures, 1 = nothing
    /// succeeded. Lets an external trigger distinguish degraded from dead.
    pub fn exit_code(&self) -> i32 {
        if self.failed == 0 {
            0
        } else if self.processed == 0 {
            1
        } else {
            2
        }
    }

    pub fn summary_line(&self) -> String {
        let mut line = format!(
            "Processed {} location(s), {} failure(s)",
            self.processed, self.failed
        );
        if self.cancelled {
            line.push_str(" (cancelled)");
        }
        line
    }
}

/// Iterates the location set, invoking extraction then persistence per
/// location with failure isolation: one location's failure never stops the
/// batch.
pub struct BatchRunner<'a, C: JobService> {
    extractor: LocationExtractor<'a, C>,
    writer: &'a ObservationWriter,
}

impl<'a, C: JobService> BatchRunner<'a, C> {
    pub fn new(extractor: LocationExtractor<'a, C>, writer: &'a ObservationWriter) -> Self {
        Self { extractor, writer }
    }

    pub async fn run(
        &self,
        locations: &[Location],
        start: DateTime<Utc>,
        stop: DateTime<Utc>,
        cancel: &CancelToken,
        progress: Option<&ProgressReporter>,
    ) -> BatchSummary {
        let mut summary = BatchSummary::default();
        let gas_count = self.extractor.catalog().len();

        for location in locations {
            if cancel.is_cancelled() {
                summary.cancelled = true;
                break;
            }

            match self.process_location(location, start, stop, cancel).await {
                Ok(filled) => {
                    summary.processed += 1;
                    if filled == gas_count {
                        info!(
                            location_id = location.location_id,
                            "extraction fully succeeded"
                        );
                    } else {
                        info!(
                            location_id = location.location_id,
                            filled,
                            configured = gas_count,
                            "extraction partially succeeded"
                        );
                    }
                }
                Err(ExtractionError::Cancelled) => {
                    summary.cancelled = true;
                    break;
                }
                Err(e) => {
                    summary.failed += 1;
                    error!(
                        location_id = location.location_id,
                        error = %e,
                        "location failed"
                    );
                }
            }

            if let Some(p) = progress {
                p.increment(1);
            }
        }

        info!(
            processed = summary.processed,
            failed = summary.failed,
            cancelled = summary.cancelled,
            "batch run finished"
        );
        summary
    }

    async fn process_location(
        &self,
        location: &Location,
        start: DateTime<Utc>,
        stop: DateTime<Utc>,
        cancel: &CancelToken,
    ) -> Result<usize> {
        let record = self.extractor.extract(location, start, stop, cancel).await?;
        self.writer.write(&record).await?;
        Ok(record.filled_count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let full = BatchSummary {
            processed: 3,
            failed: 0,
            cancelled: false,
        };
        assert_eq!(full.exit_code(), 0);

        let partial = BatchSummary {
            processed: 2,
            failed: 1,
            cancelled: false,
        };
        assert_eq!(partial.exit_code(), 2);

        let total = BatchSummary {
            processed: 0,
            failed: 3,
            cancelled: false,
        };
        assert_eq!(total.exit_code(), 1);
    }

    #[test]
    fn test_summary_line_marks_cancellation() {
        let summary = BatchSummary {
            processed: 1,
            failed: 0,
            cancelled: true,
        };
        assert!(summary.summary_line().ends_with("(cancelled)"));
    }
}
