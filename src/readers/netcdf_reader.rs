use std::path::Path;

use netcdf::AttributeValue;

use crate::error::Result;
use crate::readers::convert::{normalized_mean, ValueCoding};
use crate::readers::dataset::ScientificDataset;
use crate::utils::constants::{PRODUCT_GROUP, QUALITY_GOOD};

/// Structured netCDF reader, first in the opener's priority order.
///
/// Understands the single `product` grouping level used by TEMPO L3 files
/// and applies `qa_value` filtering when the indicator sits alongside the
/// data variable.
pub struct NetcdfDataset {
    file: netcdf::File,
    grouped: bool,
}

impl NetcdfDataset {
    pub fn open(path: &Path) -> Result<Self> {
        let file = netcdf::open(path)?;
        let grouped = file.group(PRODUCT_GROUP).map(|g| g.is_some()).unwrap_or(false);
        Ok(Self { file, grouped })
    }

    fn read_values(&self, name: &str) -> Option<(Vec<f64>, ValueCoding)> {
        if self.grouped {
            let group = self.file.group(PRODUCT_GROUP).ok().flatten()?;
            let var = group.variable(name)?;
            values_of(&var)
        } else {
            let var = self.file.variable(name)?;
            values_of(&var)
        }
    }
}

impl ScientificDataset for NetcdfDataset {
    fn variable_names(&self) -> Vec<String> {
        if self.grouped {
            match self.file.group(PRODUCT_GROUP) {
                Ok(Some(group)) => group.variables().map(|v| v.name()).collect(),
                _ => Vec::new(),
            }
        } else {
            self.file.variables().map(|v| v.name()).collect()
        }
    }

    fn mean_of(&self, variable: &str, quality_var: Option<&str>) -> Option<f64> {
        let (raw, coding) = self.read_values(variable)?;

        let keep: Option<Vec<bool>> = quality_var
            .and_then(|q| self.read_values(q))
            .map(|(flags, _)| flags.iter().map(|&f| f == QUALITY_GOOD).collect());

        normalized_mean(&raw, &coding, keep.as_deref())
    }
}

fn values_of(var: &netcdf::Variable) -> Option<(Vec<f64>, ValueCoding)> {
    let raw = var.get_values::<f64, _>(..).ok()?;
    let coding = ValueCoding {
        scale: attr_f64(var, "scale_factor"),
        offset: attr_f64(var, "add_offset"),
        fill: attr_f64(var, "_FillValue").or_else(|| attr_f64(var, "missing_value")),
    };
    Some((raw, coding))
}

fn attr_f64(var: &netcdf::Variable, name: &str) -> Option<f64> {
    match var.attribute(name)?.value().ok()? {
        AttributeValue::Double(v) => Some(v),
        AttributeValue::Float(v) => Some(v as f64),
        AttributeValue::Int(v) => Some(v as f64),
        AttributeValue::Short(v) => Some(v as f64),
        AttributeValue::Longlong(v) => Some(v as f64),
        AttributeValue::Uchar(v) => Some(v as f64),
        _ => None,
    }
}
