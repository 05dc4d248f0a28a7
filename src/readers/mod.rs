pub mod convert;
pub mod dataset;
pub mod hdf5_reader;
pub mod netcdf_reader;
pub mod opener;
pub mod raw_reader;
pub mod resolver;

pub use convert::{normalized_mean, ValueCoding};
pub use dataset::ScientificDataset;
pub use hdf5_reader::Hdf5Dataset;
pub use netcdf_reader::NetcdfDataset;
pub use opener::{DatasetOpener, ReaderFn};
pub use raw_reader::RawNetcdfDataset;
pub use resolver::resolve_variables;
