use std::path::PathBuf;
use std::time::Instant;

use structopt::StructOpt;

use mandelgrid::coord::Viewport;
use mandelgrid::painter::{GreyscalePainter, Painter};
use mandelgrid::pgm;
use mandelgrid::solver::GridSolver;
use mandelgrid::stats::Summary;
use mandelgrid::threads::Schedule;

/// Renders the escape-count grid of a region of the complex plane to a
/// grayscale image. `.pgm` outputs are written directly in the binary P5
/// format; any other extension goes through the grayscale painter.
#[derive(StructOpt, Debug)]
#[structopt(name = "mandelgrid-imagegen")]
struct Opt {
    /// Output width in pixels
    #[structopt(long, default_value = "1000")]
    width: usize,

    /// Output height in pixels
    #[structopt(long, default_value = "1000")]
    height: usize,

    /// Lower bound of the real axis
    #[structopt(long = "x-min", allow_hyphen_values = true, default_value = "-2.0")]
    x_min: f64,

    /// Upper bound of the real axis
    #[structopt(long = "x-max", allow_hyphen_values = true, default_value = "2.0")]
    x_max: f64,

    /// Lower bound of the imaginary axis
    #[structopt(long = "y-min", allow_hyphen_values = true, default_value = "-2.0")]
    y_min: f64,

    /// Upper bound of the imaginary axis
    #[structopt(long = "y-max", allow_hyphen_values = true, default_value = "2.0")]
    y_max: f64,

    /// Escape iteration cap; doubles as the PGM maxval
    #[structopt(long, default_value = "1000")]
    iterations: u16,

    /// Worker threads (default: physical cores)
    #[structopt(long)]
    threads: Option<usize>,

    /// Row schedule: static, dynamic or guided, with an optional chunk
    /// size ("dynamic,4")
    #[structopt(long, default_value = "dynamic")]
    schedule: Schedule,

    /// Solve this many times and report timing statistics
    #[structopt(long, default_value = "1")]
    repeats: usize,

    /// Output file
    #[structopt(long, parse(from_os_str), default_value = "mandelbrot.pgm")]
    output: PathBuf,
}

fn run(opt: Opt) -> mandelgrid::Result<()> {
    let view = Viewport::from_bounds(opt.x_min, opt.x_max, opt.y_min, opt.y_max);
    let mut solver = GridSolver::new(opt.iterations).schedule(opt.schedule);
    if let Some(threads) = opt.threads {
        solver = solver.threads(threads);
    }

    let mut samples = vec![];
    let mut raster = None;
    for _ in 0..opt.repeats.max(1) {
        let start = Instant::now();
        raster = Some(solver.solve(&view, opt.width, opt.height)?);
        samples.push(start.elapsed().as_secs_f64());
    }
    let raster = raster.expect("at least one solve");

    match opt.output.extension().and_then(|ext| ext.to_str()) {
        Some("pgm") => pgm::write_pgm(&raster, opt.iterations, &opt.output)?,
        _ => {
            let img = GreyscalePainter::new(opt.iterations).paint(&raster);
            img.save(&opt.output).expect("failed to save image");
        }
    }
    println!("wrote {}", opt.output.display());

    if samples.len() > 1 {
        let s = Summary::of(&samples)?;
        println!(
            "solve x{}: mean {:.3}s  min {:.3}s  max {:.3}s  stdev {:.3}s",
            samples.len(),
            s.mean,
            s.min,
            s.max,
            s.stdev
        );
    }
    Ok(())
}

fn main() {
    if let Err(e) = run(Opt::from_args()) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
