use std::path::Path;

use tracing::{debug, warn};

use crate::readers::dataset::ScientificDataset;
use crate::readers::hdf5_reader::Hdf5Dataset;
use crate::readers::netcdf_reader::NetcdfDataset;
use crate::readers::raw_reader::RawNetcdfDataset;

/// One reader backend: returns a handle or None if this backend cannot
/// open the file.
pub type ReaderFn = fn(&Path) -> Option<Box<dyn ScientificDataset>>;

/// Tries reader backends in a fixed, deterministic order and returns the
/// first that opens the file. All backends failing means "no data from
/// this file", not a fatal error.
pub struct DatasetOpener {
    readers: Vec<(&'static str, ReaderFn)>,
}

impl DatasetOpener {
    pub fn new() -> Self {
        Self {
            readers: vec![
                ("netcdf", open_netcdf),
                ("hdf5", open_hdf5),
                ("netcdf-raw", open_raw),
            ],
        }
    }

    /// Replace the reader order. Used by tests to inject backends.
    pub fn with_readers(readers: Vec<(&'static str, ReaderFn)>) -> Self {
        Self { readers }
    }

    pub fn open(&self, path: &Path) -> Option<Box<dyn ScientificDataset>> {
        for (name, reader) in &self.readers {
            if let Some(dataset) = reader(path) {
                debug!(reader = *name, file = %path.display(), "dataset opened");
                return Some(dataset);
            }
        }
        warn!(file = %path.display(), "no reader could open dataset");
        None
    }
}

impl Default for DatasetOpener {
    fn default() -> Self {
        Self::new()
    }
}

fn open_netcdf(path: &Path) -> Option<Box<dyn ScientificDataset>> {
    match NetcdfDataset::open(path) {
        Ok(dataset) => Some(Box::new(dataset)),
        Err(e) => {
            debug!(file = %path.display(), error = %e, "netcdf reader failed");
            None
        }
    }
}

fn open_hdf5(path: &Path) -> Option<Box<dyn ScientificDataset>> {
    match Hdf5Dataset::open(path) {
        Ok(dataset) => Some(Box::new(dataset)),
        Err(e) => {
            debug!(file = %path.display(), error = %e, "hdf5 reader failed");
            None
        }
    }
}

fn open_raw(path: &Path) -> Option<Box<dyn ScientificDataset>> {
    match RawNetcdfDataset::open(path) {
        Ok(dataset) => Some(Box::new(dataset)),
        Err(e) => {
            debug!(file = %path.display(), error = %e, "raw netcdf reader failed");
            None
        }
    }
}
