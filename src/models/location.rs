use serde::{Deserialize, Serialize};
use validator::Validate;

/// A fixed grid point observed by the extraction batches. Reference data
/// owned by the locations catalog; read-only to the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, sqlx::FromRow)]
pub struct Location {
    pub location_id: i64,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,

    pub grid_name: Option<String>,
}

impl Location {
    pub fn new(location_id: i64, latitude: f64, longitude: f64) -> Self {
        Self {
            location_id,
            latitude,
            longitude,
            grid_name: None,
        }
    }

    pub fn with_grid_name(mut self, grid_name: impl Into<String>) -> Self {
        self.grid_name = Some(grid_name.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_validation() {
        let location = Location::new(1, 19.4, -99.1).with_grid_name("Grid_19.40_-99.10");

        assert!(location.validate().is_ok());
        assert_eq!(location.grid_name.as_deref(), Some("Grid_19.40_-99.10"));
    }

    #[test]
    fn test_invalid_coordinates() {
        let location = Location::new(1, 91.0, -99.1);
        assert!(location.validate().is_err());

        let location = Location::new(1, 19.4, -181.0);
        assert!(location.validate().is_err());
    }
}
