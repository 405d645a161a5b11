use num::complex::Complex;

use crate::coord::Viewport;
use crate::error::{Error, Result};
use crate::raster::Raster;
use crate::threads::{ChunkPool, Schedule};

pub type C = Complex<f64>;

const ESCAPE_RADIUS: f64 = 2.0;

/// Number of `z <- z^2 + c` applications before `|z|` reaches the escape
/// radius, capped at `i_max`. Points that never escape (in or near the set)
/// return `i_max`.
#[inline]
pub fn escape_count(c: C, i_max: u16) -> u16 {
    let mut z = C::new(0.0, 0.0);
    let mut i = 0;
    while z.norm() < ESCAPE_RADIUS && i < i_max {
        z = (z * z) + c;
        i += 1;
    }
    i
}

/// Fills a [`Raster`] with escape counts for a pixel grid over a viewport.
///
/// Pixel `(col, row)` samples `x.min + col * x_step`, `y.min + row * y_step`
/// with steps `length / width` and `length / height`. Rows are distributed
/// over worker threads according to the configured [`Schedule`]; every cell
/// depends only on its own coordinate, so the result is identical whatever
/// the thread count.
#[derive(Clone, Debug)]
pub struct GridSolver {
    i_max: u16,
    threads: usize,
    schedule: Schedule,
}

impl GridSolver {
    pub fn new(i_max: u16) -> Self {
        Self {
            i_max,
            threads: num_cpus::get_physical(),
            schedule: Schedule::default(),
        }
    }

    pub fn threads(mut self, n: usize) -> Self {
        self.threads = n;
        self
    }

    pub fn schedule(mut self, schedule: Schedule) -> Self {
        self.schedule = schedule;
        self
    }

    pub fn i_max(&self) -> u16 {
        self.i_max
    }

    pub fn solve(&self, view: &Viewport, width: usize, height: usize) -> Result<Raster> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidParameter("resolution must be positive"));
        }
        if self.i_max == 0 {
            return Err(Error::InvalidParameter("iteration cap must be positive"));
        }

        let mut raster = Raster::new(width, height);
        let pool = ChunkPool::new(self.threads, self.schedule);
        let parts = pool.run(height, |start, end| {
            self.solve_rows(view, width, height, start, end)
        });
        for (start_row, rows) in parts {
            raster.write_rows(start_row, &rows);
        }
        Ok(raster)
    }

    fn solve_rows(
        &self,
        view: &Viewport,
        width: usize,
        height: usize,
        start_row: usize,
        end_row: usize,
    ) -> Vec<u16> {
        let x_step = view.x.length() / width as f64;
        let y_step = view.y.length() / height as f64;

        let mut cells = Vec::with_capacity((end_row - start_row) * width);
        for row in start_row..end_row {
            let im = view.y.min + row as f64 * y_step;
            for col in 0..width {
                let re = view.x.min + col as f64 * x_step;
                cells.push(escape_count(C::new(re, im), self.i_max));
            }
        }
        cells
    }
}

impl Default for GridSolver {
    fn default() -> Self {
        Self::new(1000)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    // Escape counts over [-2,2]^2 at 4x4 with cap 10. Row 0 is y = -2; the
    // sample at (2, 2) is the origin, which never escapes.
    const FIXTURE_4X4: [u16; 16] = [1, 1, 1, 1, 1, 3, 10, 2, 1, 10, 10, 2, 1, 3, 10, 2];

    #[test]
    fn test_immediate_escape() {
        for c in [
            C::new(-2.0, 0.0),
            C::new(2.0, 0.0),
            C::new(0.0, 2.0),
            C::new(-2.0, -2.0),
            C::new(3.5, 1.0),
        ] {
            assert_eq!(escape_count(c, 1), 1);
            assert_eq!(escape_count(c, 100), 1);
        }
    }

    #[test]
    fn test_never_escapes() {
        for n in [1, 10, 1000] {
            assert_eq!(escape_count(C::new(0.0, 0.0), n), n);
        }
        assert_eq!(escape_count(C::new(-1.0, 0.0), 500), 500);
    }

    #[test]
    fn test_count_bounded_and_monotonic() {
        let c = C::new(0.3, 0.5);
        let mut last = 0;
        for i_max in 1..64 {
            let count = escape_count(c, i_max);
            assert!(count <= i_max);
            assert!(count >= last);
            last = count;
        }
    }

    #[test]
    fn test_fixture_grid() {
        let raster = GridSolver::new(10)
            .threads(1)
            .solve(&Viewport::default(), 4, 4)
            .unwrap();
        assert_eq!(raster.cells(), &FIXTURE_4X4);
    }

    #[test]
    fn test_deterministic_across_schedules() {
        let view = Viewport::from_bounds(-2.0, 1.0, -1.2, 1.2);
        let reference = GridSolver::new(50).threads(1).solve(&view, 64, 48).unwrap();
        for threads in [2, 3, 8] {
            for schedule in [
                Schedule::Static { chunk: None },
                Schedule::Static { chunk: Some(5) },
                Schedule::Dynamic { chunk: 1 },
                Schedule::Dynamic { chunk: 4 },
                Schedule::Guided { min_chunk: 1 },
            ] {
                let raster = GridSolver::new(50)
                    .threads(threads)
                    .schedule(schedule)
                    .solve(&view, 64, 48)
                    .unwrap();
                assert_eq!(raster, reference, "{:?} x{}", schedule, threads);
            }
        }
    }

    #[test]
    fn test_invalid_parameters() {
        let view = Viewport::default();
        assert!(GridSolver::new(10).solve(&view, 0, 4).is_err());
        assert!(GridSolver::new(10).solve(&view, 4, 0).is_err());
        assert!(GridSolver::new(0).solve(&view, 4, 4).is_err());
    }
}
