use crate::models::Gas;
use crate::utils::constants::{BIAS_HCHO, BIAS_NO2, BIAS_O3};

/// Fixed additive offset compensating for a known systematic measurement
/// bias. Gases without a defined correction pass through unchanged.
pub fn bias_for(gas: Gas) -> f64 {
    match gas {
        Gas::No2 => BIAS_NO2,
        Gas::O3 => BIAS_O3,
        Gas::Hcho => BIAS_HCHO,
        Gas::So2 | Gas::Co | Gas::AerosolIndex => 0.0,
    }
}

/// Applied exactly once per gas, after aggregation and before the value is
/// accepted into the merged record.
pub fn correct(gas: Gas, raw_mean: f64) -> f64 {
    raw_mean + bias_for(gas)
}
