pub mod bench;
pub mod coord;
mod error;
pub mod painter;
pub mod pgm;
pub mod raster;
pub mod solver;
pub mod stats;
pub mod threads;

pub use error::{Error, Result};

use coord::Viewport;
use raster::Raster;
use solver::GridSolver;

/// Computes an escape-count raster with the default thread count and
/// schedule.
pub fn render(view: &Viewport, width: usize, height: usize, i_max: u16) -> Result<Raster> {
    GridSolver::new(i_max).solve(view, width, height)
}
