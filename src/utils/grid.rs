use crate::utils::constants::{
    GRID_LAT_MAX, GRID_LAT_MIN, GRID_LON_MAX, GRID_LON_MIN, GRID_STEP,
};

/// A seedable grid point: latitude, longitude, grid name.
pub type GridPoint = (f64, f64, String);

/// Generate the regular lat/lon grid covering a bounding box, inclusive of
/// both edges. Steps by integer index to avoid floating point drift over
/// long spans.
pub fn grid_points(
    lat_min: f64,
    lat_max: f64,
    lon_min: f64,
    lon_max: f64,
    step: f64,
) -> Vec<GridPoint> {
    let lat_steps = ((lat_max - lat_min) / step).round() as i64;
    let lon_steps = ((lon_max - lon_min) / step).round() as i64;

    let mut points = Vec::with_capacity(((lat_steps + 1) * (lon_steps + 1)) as usize);
    for i in 0..=lat_steps {
        let lat = lat_min + i as f64 * step;
        for j in 0..=lon_steps {
            let lon = lon_min + j as f64 * step;
            points.push((lat, lon, format!("Grid_{:.2}_{:.2}", lat, lon)));
        }
    }

    points
}

/// The default North America grid used by the extraction batches.
pub fn north_america_grid(step: f64) -> Vec<GridPoint> {
    grid_points(GRID_LAT_MIN, GRID_LAT_MAX, GRID_LON_MIN, GRID_LON_MAX, step)
}
