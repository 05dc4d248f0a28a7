pub mod cancel;
pub mod constants;
pub mod grid;
pub mod progress;

pub use cancel::CancelToken;
pub use constants::*;
pub use grid::{grid_points, north_america_grid, GridPoint};
pub use progress::ProgressReporter;
