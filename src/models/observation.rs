use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The atmospheric quantities a merged record can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gas {
    O3,
    No2,
    Hcho,
    So2,
    Co,
    AerosolIndex,
}

impl Gas {
    pub const ALL: [Gas; 6] = [
        Gas::O3,
        Gas::No2,
        Gas::Hcho,
        Gas::So2,
        Gas::Co,
        Gas::AerosolIndex,
    ];

    /// Stable lowercase key, also used for case-insensitive variable
    /// matching inside downloaded datasets.
    pub fn key(&self) -> &'static str {
        match self {
            Gas::O3 => "o3",
            Gas::No2 => "no2",
            Gas::Hcho => "hcho",
            Gas::So2 => "so2",
            Gas::Co => "co",
            Gas::AerosolIndex => "aerosol_index",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Gas::ALL.iter().copied().find(|g| g.key() == key)
    }
}

/// One best-effort reading per (location, timestamp), each gas field
/// independently nullable. Built fresh per extraction run; the timestamp is
/// the extraction window's end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ObservationRecord {
    pub location_id: i64,
    pub timestamp: DateTime<Utc>,
    pub o3: Option<f64>,
    pub no2: Option<f64>,
    pub hcho: Option<f64>,
    pub so2: Option<f64>,
    pub co: Option<f64>,
    pub aerosol_index: Option<f64>,
}

impl ObservationRecord {
    pub fn new(location_id: i64, timestamp: DateTime<Utc>) -> Self {
        Self {
            location_id,
            timestamp,
            o3: None,
            no2: None,
            hcho: None,
            so2: None,
            co: None,
            aerosol_index: None,
        }
    }

    pub fn value(&self, gas: Gas) -> Option<f64> {
        match gas {
            Gas::O3 => self.o3,
            Gas::No2 => self.no2,
            Gas::Hcho => self.hcho,
            Gas::So2 => self.so2,
            Gas::Co => self.co,
            Gas::AerosolIndex => self.aerosol_index,
        }
    }

    pub fn set(&mut self, gas: Gas, value: f64) {
        let field = match gas {
            Gas::O3 => &mut self.o3,
            Gas::No2 => &mut self.no2,
            Gas::Hcho => &mut self.hcho,
            Gas::So2 => &mut self.so2,
            Gas::Co => &mut self.co,
            Gas::AerosolIndex => &mut self.aerosol_index,
        };
        *field = Some(value);
    }

    /// Number of gas fields carrying a value.
    pub fn filled_count(&self) -> usize {
        Gas::ALL.iter().filter(|g| self.value(**g).is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.filled_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_gas_key_round_trip() {
        for gas in Gas::ALL {
            assert_eq!(Gas::from_key(gas.key()), Some(gas));
        }
        assert_eq!(Gas::from_key("pm25"), None);
    }

    #[test]
    fn test_record_starts_empty() {
        let ts = Utc.with_ymd_and_hms(2025, 9, 2, 0, 0, 0).unwrap();
        let record = ObservationRecord::new(1, ts);

        assert!(record.is_empty());
        assert_eq!(record.filled_count(), 0);
        assert_eq!(record.timestamp, ts);
    }

    #[test]
    fn test_set_and_value_agree() {
        let ts = Utc.with_ymd_and_hms(2025, 9, 2, 0, 0, 0).unwrap();
        let mut record = ObservationRecord::new(1, ts);

        record.set(Gas::No2, 40.0);
        record.set(Gas::AerosolIndex, 1.5);

        assert_eq!(record.value(Gas::No2), Some(40.0));
        assert_eq!(record.no2, Some(40.0));
        assert_eq!(record.aerosol_index, Some(1.5));
        assert_eq!(record.value(Gas::O3), None);
        assert_eq!(record.filled_count(), 2);
    }
}
