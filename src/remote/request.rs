use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::json;

use crate::models::{CollectionRef, Location};

/// Spatial subset bounds, degrees, [west, south, east, north].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl BoundingBox {
    /// Square box centered on a point, `buffer` degrees in each direction.
    pub fn around(latitude: f64, longitude: f64, buffer: f64) -> Self {
        Self {
            west: longitude - buffer,
            south: latitude - buffer,
            east: longitude + buffer,
            north: latitude + buffer,
        }
    }

    pub fn as_array(&self) -> [f64; 4] {
        [self.west, self.south, self.east, self.north]
    }

    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        latitude >= self.south
            && latitude <= self.north
            && longitude >= self.west
            && longitude <= self.east
    }
}

/// One remote subset job: a collection, a box around a location and a
/// half-open time window. Ephemeral, built per (location, collection) pair.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionRequest {
    pub collection_id: String,
    pub bbox: BoundingBox,
    pub start: DateTime<Utc>,
    pub stop: DateTime<Utc>,
    pub output_format: String,
}

impl ExtractionRequest {
    pub fn new(
        collection: &CollectionRef,
        location: &Location,
        bbox_buffer: f64,
        start: DateTime<Utc>,
        stop: DateTime<Utc>,
        output_format: impl Into<String>,
    ) -> Self {
        Self {
            collection_id: collection.id.clone(),
            bbox: BoundingBox::around(location.latitude, location.longitude, bbox_buffer),
            start,
            stop,
            output_format: output_format.into(),
        }
    }

    /// Wire payload submitted to the job endpoint.
    pub fn to_payload(&self) -> serde_json::Value {
        json!({
            "collectionId": self.collection_id,
            "spatialBBox": self.bbox.as_array(),
            "temporalWindow": [
                self.start.to_rfc3339_opts(SecondsFormat::Secs, true),
                self.stop.to_rfc3339_opts(SecondsFormat::Secs, true),
            ],
            "outputFormat": self.output_format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_bbox_around_point() {
        let bbox = BoundingBox::around(19.4, -99.1, 0.25);

        assert_eq!(bbox.as_array(), [-99.35, 19.15, -98.85, 19.65]);
        assert!(bbox.contains(19.4, -99.1));
        assert!(!bbox.contains(20.0, -99.1));
    }

    #[test]
    fn test_payload_shape() {
        let collection = CollectionRef::new("NO2_L3", "C3685896708-LARC_CLOUD");
        let location = Location::new(1, 19.4, -99.1);
        let start = Utc.with_ymd_and_hms(2025, 9, 1, 0, 0, 0).unwrap();
        let stop = Utc.with_ymd_and_hms(2025, 9, 2, 0, 0, 0).unwrap();

        let request = ExtractionRequest::new(&collection, &location, 0.25, start, stop, "netcdf");
        let payload = request.to_payload();

        assert_eq!(payload["collectionId"], "C3685896708-LARC_CLOUD");
        assert_eq!(payload["spatialBBox"][0], -99.35);
        assert_eq!(payload["spatialBBox"][1], 19.15);
        assert_eq!(payload["spatialBBox"][2], -98.85);
        assert_eq!(payload["spatialBBox"][3], 19.65);
        assert_eq!(payload["temporalWindow"][0], "2025-09-01T00:00:00Z");
        assert_eq!(payload["temporalWindow"][1], "2025-09-02T00:00:00Z");
        assert_eq!(payload["outputFormat"], "netcdf");
    }
}
