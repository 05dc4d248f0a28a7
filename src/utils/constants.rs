/// Bias corrections, additive offsets applied once after aggregation
pub const BIAS_NO2: f64 = -5.0;
pub const BIAS_O3: f64 = -2.0;
pub const BIAS_HCHO: f64 = -1.0;

/// Quality filtering
pub const QUALITY_GOOD: f64 = 0.0;
pub const QUALITY_VARIABLE: &str = "qa_value";

/// Single grouping level used by TEMPO L3 products
pub const PRODUCT_GROUP: &str = "product";

/// Spatial request defaults
pub const DEFAULT_BBOX_BUFFER: f64 = 0.25;

/// Remote job defaults
pub const DEFAULT_JOB_TIMEOUT_SECS: u64 = 600;
pub const DEFAULT_POLL_INITIAL_SECS: u64 = 5;
pub const DEFAULT_POLL_MAX_SECS: u64 = 60;
pub const OUTPUT_FORMAT_NETCDF: &str = "netcdf";

/// North America grid bounds
pub const GRID_LAT_MIN: f64 = 14.0;
pub const GRID_LAT_MAX: f64 = 72.0;
pub const GRID_LON_MIN: f64 = -170.0;
pub const GRID_LON_MAX: f64 = -50.0;
pub const GRID_STEP: f64 = 0.25;

/// Coordinate constraints
pub const MIN_LATITUDE: f64 = -90.0;
pub const MAX_LATITUDE: f64 = 90.0;
pub const MIN_LONGITUDE: f64 = -180.0;
pub const MAX_LONGITUDE: f64 = 180.0;
