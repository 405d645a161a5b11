use std::fs;
use std::io::{stdout, Write};
use std::rc::Rc;
use std::time::Instant;

use crate::stats::Summary;

/// A named closure timed once per repeat; wall-clock is measured around the
/// whole call, the closure itself decides what to set up inside.
#[derive(Clone)]
pub struct Benchmark {
    f: Rc<dyn Fn()>,
    name: String,
    repeats: usize,
}

impl Benchmark {
    pub fn iter<F: Fn() + 'static>(name: &str, n: usize, f: F) -> Self {
        Self {
            f: Rc::new(f),
            name: name.to_string(),
            repeats: n.max(1),
        }
    }

    pub fn once<F: Fn() + 'static>(name: &str, f: F) -> Self {
        Self::iter(name, 1, f)
    }

    /// One elapsed-seconds sample per repeat.
    pub fn run(&self) -> Vec<f64> {
        (0..self.repeats)
            .map(|_| {
                let start = Instant::now();
                (self.f)();
                start.elapsed().as_secs_f64()
            })
            .collect()
    }
}

pub struct BenchmarkReport {
    benches: Vec<Benchmark>,
    results: Vec<(String, usize, Summary)>,
}

impl BenchmarkReport {
    pub fn new() -> Self {
        Self {
            benches: vec![],
            results: vec![],
        }
    }

    pub fn add_bench(&mut self, bench: Benchmark) {
        self.benches.push(bench);
    }

    pub fn add_benches(&mut self, benches: &[Benchmark]) {
        for bench in benches {
            self.benches.push(bench.clone())
        }
    }

    pub fn with_benches(benches: &[Benchmark]) -> Self {
        let mut this = Self::new();
        this.add_benches(benches);
        this
    }

    pub fn run(&mut self) {
        for bench in &self.benches {
            let samples = bench.run();
            // repeats >= 1, so the summary cannot fail
            let summary = Summary::of(&samples).unwrap();
            self.results
                .push((bench.name.to_string(), bench.repeats, summary));
            print!(".");
            stdout().flush().unwrap();
        }
        print!("\n\n");
        stdout().flush().unwrap();
    }

    pub fn show(&self) {
        for (name, repeats, s) in &self.results {
            println!(
                "{} ({} repeats)\n  mean: {:.3}ms  min: {:.3}ms  max: {:.3}ms  stdev: {:.3}ms\n",
                name,
                repeats,
                s.mean * 1e3,
                s.min * 1e3,
                s.max * 1e3,
                s.stdev * 1e3,
            )
        }
        stdout().flush().unwrap();
    }

    pub fn write_csv(&self, filename: &str) {
        let mut lines: Vec<String> =
            vec!["benchmark,repeats,mean_s,min_s,max_s,stdev_s".to_string()];
        for (name, repeats, s) in &self.results {
            lines.push(format!(
                "{},{},{},{},{},{}",
                name, repeats, s.mean, s.min, s.max, s.stdev
            ));
        }
        lines.push("".to_string());
        fs::write(filename, lines.join("\n")).unwrap();
    }

    pub fn report(&mut self, name: &str) {
        self.run();
        self.show();
        self.write_csv(&format!("bench-{}.csv", name));
    }
}

impl Default for BenchmarkReport {
    fn default() -> Self {
        Self::new()
    }
}
