use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::models::{CollectionRef, Gas, GasCollectionCatalog, Location, ObservationRecord};
use crate::processors::attempt::{first_success, AttemptStatus};
use crate::processors::bias;
use crate::readers::{resolve_variables, DatasetOpener};
use crate::remote::{ExtractionRequest, JobService};
use crate::utils::cancel::CancelToken;
use crate::utils::constants::{
    DEFAULT_BBOX_BUFFER, DEFAULT_JOB_TIMEOUT_SECS, OUTPUT_FORMAT_NETCDF, QUALITY_VARIABLE,
};
use crate::error::Result;

/// Builds one merged observation record per location by sweeping every
/// configured gas and its candidate collections in declared order.
pub struct LocationExtractor<'a, C: JobService> {
    client: &'a C,
    catalog: &'a GasCollectionCatalog,
    opener: DatasetOpener,
    bbox_buffer: f64,
    job_timeout: Duration,
    output_format: String,
}

impl<'a, C: JobService> LocationExtractor<'a, C> {
    pub fn new(client: &'a C, catalog: &'a GasCollectionCatalog) -> Self {
        Self {
            client,
            catalog,
            opener: DatasetOpener::new(),
            bbox_buffer: DEFAULT_BBOX_BUFFER,
            job_timeout: Duration::from_secs(DEFAULT_JOB_TIMEOUT_SECS),
            output_format: OUTPUT_FORMAT_NETCDF.to_string(),
        }
    }

    pub fn with_bbox_buffer(mut self, buffer: f64) -> Self {
        self.bbox_buffer = buffer;
        self
    }

    pub fn with_job_timeout(mut self, timeout: Duration) -> Self {
        self.job_timeout = timeout;
        self
    }

    pub fn with_output_format(mut self, format: impl Into<String>) -> Self {
        self.output_format = format.into();
        self
    }

    pub fn catalog(&self) -> &GasCollectionCatalog {
        self.catalog
    }

    /// Extract one merged record for a location over `[start, stop)`.
    ///
    /// Per gas, the first candidate collection yielding a non-null corrected
    /// value wins and later candidates are not consulted. Recoverable
    /// failures skip to the next candidate; a gas with no successful
    /// candidate stays null. The record carries the window's end time.
    pub async fn extract(
        &self,
        location: &Location,
        start: DateTime<Utc>,
        stop: DateTime<Utc>,
        cancel: &CancelToken,
    ) -> Result<ObservationRecord> {
        let mut record = ObservationRecord::new(location.location_id, stop);

        for entry in self.catalog.entries() {
            if cancel.is_cancelled() {
                return Err(crate::ExtractionError::Cancelled);
            }

            let gas = entry.gas;
            let attempts = entry.collections.iter().map(|collection| {
                (
                    collection.label.clone(),
                    move || self.try_collection(gas, collection, location, start, stop, cancel),
                )
            });

            let outcome = first_success(attempts).await?;

            for attempt in &outcome.attempts {
                if let AttemptStatus::Failed(reason) = &attempt.status {
                    warn!(
                        location_id = location.location_id,
                        gas = gas.key(),
                        collection = %attempt.label,
                        reason = %reason,
                        "candidate collection failed"
                    );
                }
            }

            match outcome.winner {
                Some((_, raw_mean)) => {
                    let corrected = bias::correct(gas, raw_mean);
                    record.set(gas, corrected);
                    info!(
                        location_id = location.location_id,
                        gas = gas.key(),
                        collection = outcome.winner_label().unwrap_or("?"),
                        value = corrected,
                        "gas value extracted"
                    );
                }
                None => {
                    debug!(
                        location_id = location.location_id,
                        gas = gas.key(),
                        "no candidate collection yielded a value"
                    );
                }
            }
        }

        Ok(record)
    }

    /// One candidate collection: submit, wait, download, then scan the
    /// result files for the first aggregatable matching variable.
    async fn try_collection(
        &self,
        gas: Gas,
        collection: &CollectionRef,
        location: &Location,
        start: DateTime<Utc>,
        stop: DateTime<Utc>,
        cancel: &CancelToken,
    ) -> Result<Option<f64>> {
        if cancel.is_cancelled() {
            return Err(crate::ExtractionError::Cancelled);
        }

        let request = ExtractionRequest::new(
            collection,
            location,
            self.bbox_buffer,
            start,
            stop,
            self.output_format.clone(),
        );

        let job = self.client.submit(&request).await?;
        self.client
            .await_completion(&job, self.job_timeout, cancel)
            .await?;

        let scratch = tempfile::tempdir()?;
        let files = self.client.download_results(&job, scratch.path()).await?;

        // Remember why the first file was skipped; if no file yields a
        // value the attempt record carries that reason instead of "empty".
        let mut skip_reason: Option<crate::ExtractionError> = None;

        for path in &files {
            let Some(dataset) = self.opener.open(path) else {
                skip_reason.get_or_insert(crate::ExtractionError::DatasetOpen {
                    path: path.clone(),
                });
                continue;
            };

            let candidates = resolve_variables(dataset.as_ref(), gas.key());
            let Some(variable) = candidates.first() else {
                skip_reason.get_or_insert(crate::ExtractionError::VariableNotFound {
                    gas_key: gas.key().to_string(),
                    path: path.clone(),
                });
                continue;
            };

            if let Some(mean) = dataset.mean_of(variable, Some(QUALITY_VARIABLE)) {
                return Ok(Some(mean));
            }
        }

        match skip_reason {
            Some(reason) => Err(reason),
            None => Ok(None),
        }
    }
}
