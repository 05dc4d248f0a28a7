use std::path::Path;

use netcdf::AttributeValue;

use crate::error::Result;
use crate::readers::convert::{normalized_mean, ValueCoding};
use crate::readers::dataset::ScientificDataset;

/// Low-level fallback reader, last in the opener's priority order.
///
/// Sees only the flat root namespace and never quality-filters; fill-value
/// masking still applies. Last resort for files whose grouping metadata the
/// structured readers could not digest.
pub struct RawNetcdfDataset {
    file: netcdf::File,
}

impl RawNetcdfDataset {
    pub fn open(path: &Path) -> Result<Self> {
        let file = netcdf::open(path)?;
        Ok(Self { file })
    }
}

impl ScientificDataset for RawNetcdfDataset {
    fn variable_names(&self) -> Vec<String> {
        self.file.variables().map(|v| v.name()).collect()
    }

    fn mean_of(&self, variable: &str, _quality_var: Option<&str>) -> Option<f64> {
        let var = self.file.variable(variable)?;
        let raw = var.get_values::<f64, _>(..).ok()?;
        let coding = ValueCoding {
            scale: None,
            offset: None,
            fill: attr_f64(&var, "_FillValue").or_else(|| attr_f64(&var, "missing_value")),
        };
        normalized_mean(&raw, &coding, None)
    }
}

fn attr_f64(var: &netcdf::Variable, name: &str) -> Option<f64> {
    match var.attribute(name)?.value().ok()? {
        AttributeValue::Double(v) => Some(v),
        AttributeValue::Float(v) => Some(v as f64),
        AttributeValue::Int(v) => Some(v as f64),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_reads_root_variables_only() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mixed.nc");
        {
            let mut file = netcdf::create(&path).unwrap();
            file.add_dimension("y", 2).unwrap();
            let mut root_var = file.add_variable::<f64>("no2_total", &["y"]).unwrap();
            root_var.put_values(&[30.0, 50.0], ..).unwrap();

            let mut product = file.add_group("product").unwrap();
            product.add_dimension("z", 1).unwrap();
            let mut nested = product.add_variable::<f64>("no2_nested", &["z"]).unwrap();
            nested.put_values(&[999.0], ..).unwrap();
        }

        let ds = RawNetcdfDataset::open(&path).unwrap();

        // The nested variable is invisible to the low-level view.
        assert_eq!(ds.variable_names(), vec!["no2_total".to_string()]);
        assert_eq!(ds.mean_of("no2_total", None), Some(40.0));
        assert_eq!(ds.mean_of("no2_nested", None), None);
    }

    #[test]
    fn test_quality_argument_is_not_applied() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("flat.nc");
        {
            let mut file = netcdf::create(&path).unwrap();
            file.add_dimension("y", 3).unwrap();
            let mut var = file.add_variable::<f64>("no2_column", &["y"]).unwrap();
            var.put_values(&[10.0, 20.0, 90.0], ..).unwrap();
            let mut qa = file.add_variable::<f64>("qa_value", &["y"]).unwrap();
            qa.put_values(&[0.0, 1.0, 0.0], ..).unwrap();
        }

        let ds = RawNetcdfDataset::open(&path).unwrap();

        // Plain mean over every cell, indicator ignored.
        assert_eq!(ds.mean_of("no2_column", Some("qa_value")), Some(40.0));
    }
}
