use std::path::Path;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::{ExtractionError, Result};
use crate::utils::constants::{
    DEFAULT_BBOX_BUFFER, DEFAULT_JOB_TIMEOUT_SECS, DEFAULT_POLL_INITIAL_SECS,
    DEFAULT_POLL_MAX_SECS, OUTPUT_FORMAT_NETCDF,
};

const CONFIG_FILE: &str = "tempo";

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub database_url: String,
    pub harmony: HarmonySettings,
    pub extraction: ExtractionSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HarmonySettings {
    pub base_url: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ExtractionSettings {
    /// Half-width of the spatial bounding box, in degrees.
    pub bbox_buffer: f64,
    /// Upper bound on the remote wait per submitted job.
    pub job_timeout_secs: u64,
    pub poll_initial_secs: u64,
    pub poll_max_secs: u64,
    pub output_format: String,
}

/// Load settings from defaults, an optional `tempo.toml` (or an explicit
/// file passed on the command line) and `TEMPO__*` environment overrides.
pub fn load(path: Option<&Path>) -> Result<Settings> {
    let mut builder = Config::builder()
        .set_default("database_url", "sqlite://tempo.db")
        .map_err(config_err)?
        .set_default("harmony.base_url", "https://harmony.earthdata.nasa.gov")
        .map_err(config_err)?
        .set_default("extraction.bbox_buffer", DEFAULT_BBOX_BUFFER)
        .map_err(config_err)?
        .set_default("extraction.job_timeout_secs", DEFAULT_JOB_TIMEOUT_SECS)
        .map_err(config_err)?
        .set_default("extraction.poll_initial_secs", DEFAULT_POLL_INITIAL_SECS)
        .map_err(config_err)?
        .set_default("extraction.poll_max_secs", DEFAULT_POLL_MAX_SECS)
        .map_err(config_err)?
        .set_default("extraction.output_format", OUTPUT_FORMAT_NETCDF)
        .map_err(config_err)?;

    builder = match path {
        Some(p) => builder.add_source(File::from(p)),
        None => builder.add_source(File::with_name(CONFIG_FILE).required(false)),
    };

    builder
        .add_source(Environment::with_prefix("TEMPO").separator("__"))
        .build()
        .map_err(config_err)?
        .try_deserialize()
        .map_err(config_err)
}

fn config_err(e: config::ConfigError) -> ExtractionError {
    ExtractionError::Config(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_config_file() {
        let settings = load(None).unwrap();

        assert_eq!(settings.database_url, "sqlite://tempo.db");
        assert_eq!(settings.harmony.base_url, "https://harmony.earthdata.nasa.gov");
        assert_eq!(settings.extraction.bbox_buffer, 0.25);
        assert_eq!(settings.extraction.job_timeout_secs, 600);
        assert_eq!(settings.extraction.output_format, "netcdf");
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let result = load(Some(Path::new("/nonexistent/tempo.toml")));
        assert!(result.is_err());
    }
}
