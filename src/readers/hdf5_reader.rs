use std::path::Path;

use crate::readers::convert::{normalized_mean, ValueCoding};
use crate::readers::dataset::ScientificDataset;
use crate::utils::constants::{PRODUCT_GROUP, QUALITY_GOOD};

/// Structured HDF5 reader, second in the opener's priority order.
///
/// netCDF-4 files are HDF5 containers, so this variant recovers files whose
/// netCDF metadata the primary reader rejects. Same namespace rules: data
/// lives either at the root or one level down in `product`.
pub struct Hdf5Dataset {
    file: hdf5::File,
    product: Option<hdf5::Group>,
}

impl Hdf5Dataset {
    pub fn open(path: &Path) -> hdf5::Result<Self> {
        let file = hdf5::File::open(path)?;
        let product = file.group(PRODUCT_GROUP).ok();
        Ok(Self { file, product })
    }

    fn member_names(&self) -> Vec<String> {
        let names = match &self.product {
            Some(group) => group.member_names(),
            None => self.file.member_names(),
        };
        names.unwrap_or_default()
    }

    fn dataset(&self, name: &str) -> hdf5::Result<hdf5::Dataset> {
        match &self.product {
            Some(group) => group.dataset(name),
            None => self.file.dataset(name),
        }
    }

    fn read_values(&self, name: &str) -> Option<(Vec<f64>, ValueCoding)> {
        let ds = self.dataset(name).ok()?;
        let raw = ds.read_raw::<f64>().ok()?;
        let coding = ValueCoding {
            scale: attr_f64(&ds, "scale_factor"),
            offset: attr_f64(&ds, "add_offset"),
            fill: attr_f64(&ds, "_FillValue").or_else(|| attr_f64(&ds, "missing_value")),
        };
        Some((raw, coding))
    }
}

impl ScientificDataset for Hdf5Dataset {
    fn variable_names(&self) -> Vec<String> {
        // Subgroups and other non-dataset members are not variables.
        self.member_names()
            .into_iter()
            .filter(|name| self.dataset(name).is_ok())
            .collect()
    }

    fn mean_of(&self, variable: &str, quality_var: Option<&str>) -> Option<f64> {
        let (raw, coding) = self.read_values(variable)?;

        let keep: Option<Vec<bool>> = quality_var
            .and_then(|q| self.read_values(q))
            .map(|(flags, _)| flags.iter().map(|&f| f == QUALITY_GOOD).collect());

        normalized_mean(&raw, &coding, keep.as_deref())
    }
}

fn attr_f64(ds: &hdf5::Dataset, name: &str) -> Option<f64> {
    ds.attr(name).ok()?.read_scalar::<f64>().ok()
}
