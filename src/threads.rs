use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;

use crate::error::Error;

/// How rows are handed out to worker threads.
///
/// Per-pixel iteration counts diverge wildly near the set boundary, so an
/// equal static split leaves threads idle while one finishes its stripe.
/// `Dynamic` and `Guided` let workers claim more rows as they go.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Schedule {
    /// Pre-assigned rows: one contiguous near-even range per worker, or
    /// round-robin chunks of the given size.
    Static { chunk: Option<usize> },
    /// Workers claim the next `chunk` rows from a shared cursor.
    Dynamic { chunk: usize },
    /// Like `Dynamic`, but the claim size shrinks with the remaining work,
    /// down to `min_chunk` rows.
    Guided { min_chunk: usize },
}

impl Default for Schedule {
    fn default() -> Self {
        Schedule::Dynamic { chunk: 1 }
    }
}

impl FromStr for Schedule {
    type Err = Error;

    /// `"static"`, `"dynamic"`, `"guided"`, optionally with a chunk size:
    /// `"static,16"`, `"dynamic,4"`, `"guided,2"`.
    fn from_str(s: &str) -> Result<Self, Error> {
        let mut parts = s.splitn(2, ',');
        let kind = parts.next().unwrap_or("");
        let chunk = match parts.next() {
            Some(c) => Some(
                c.trim()
                    .parse::<usize>()
                    .map_err(|_| Error::InvalidParameter("schedule chunk size"))?,
            ),
            None => None,
        };
        match kind.trim() {
            "static" => Ok(Schedule::Static { chunk }),
            "dynamic" => Ok(Schedule::Dynamic {
                chunk: chunk.unwrap_or(1),
            }),
            "guided" => Ok(Schedule::Guided {
                min_chunk: chunk.unwrap_or(1),
            }),
            _ => Err(Error::InvalidParameter("schedule kind")),
        }
    }
}

/// Splits `start..end` into `n` contiguous near-even ranges; the first
/// `len % n` ranges get the extra element.
pub struct RangeSplitter {
    next: usize,
    end: usize,
    size: usize,
    extra: usize,
}

impl RangeSplitter {
    pub fn split(start: usize, end: usize, n: usize) -> Self {
        let len = end - start;
        Self {
            next: start,
            end,
            size: len / n,
            extra: len % n,
        }
    }
}

impl Iterator for RangeSplitter {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<(usize, usize)> {
        if self.next >= self.end {
            return None;
        }
        let mut size = self.size;
        if self.extra > 0 {
            self.extra -= 1;
            size += 1;
        }
        let start = self.next;
        self.next = (start + size).min(self.end);
        Some((start, self.next))
    }
}

/// Shared claim cursor for the dynamic and guided schedules.
struct Cursor {
    next: AtomicUsize,
    total: usize,
    threads: usize,
    chunk: usize,
    guided: bool,
}

impl Cursor {
    fn new(total: usize, threads: usize, schedule: Schedule) -> Self {
        let (chunk, guided) = match schedule {
            Schedule::Dynamic { chunk } => (chunk.max(1), false),
            Schedule::Guided { min_chunk } => (min_chunk.max(1), true),
            Schedule::Static { .. } => unreachable!("static schedules are pre-assigned"),
        };
        Self {
            next: AtomicUsize::new(0),
            total,
            threads,
            chunk,
            guided,
        }
    }

    fn claim(&self) -> Option<(usize, usize)> {
        if self.guided {
            loop {
                let start = self.next.load(Ordering::Relaxed);
                if start >= self.total {
                    return None;
                }
                let remaining = self.total - start;
                let take = (remaining / (2 * self.threads)).max(self.chunk).min(remaining);
                if self
                    .next
                    .compare_exchange(start, start + take, Ordering::Relaxed, Ordering::Relaxed)
                    .is_ok()
                {
                    return Some((start, start + take));
                }
            }
        } else {
            let start = self.next.fetch_add(self.chunk, Ordering::Relaxed);
            if start >= self.total {
                None
            } else {
                Some((start, (start + self.chunk).min(self.total)))
            }
        }
    }
}

fn static_assignment(total: usize, threads: usize, chunk: Option<usize>) -> Vec<Vec<(usize, usize)>> {
    match chunk {
        None => RangeSplitter::split(0, total, threads)
            .map(|range| vec![range])
            .chain(std::iter::repeat_with(Vec::new))
            .take(threads)
            .collect(),
        Some(chunk) => {
            let chunk = chunk.max(1);
            let mut lists: Vec<Vec<(usize, usize)>> = vec![vec![]; threads];
            for (i, start) in (0..total).step_by(chunk).enumerate() {
                lists[i % threads].push((start, (start + chunk).min(total)));
            }
            lists
        }
    }
}

/// Worker pool over a range of row indices. Each worker computes whole
/// chunks with `f` and sends them back keyed by start index; the caller
/// reassembles them, so chunk completion order does not matter.
#[derive(Copy, Clone, Debug)]
pub struct ChunkPool {
    threads: usize,
    schedule: Schedule,
}

impl ChunkPool {
    pub fn new(threads: usize, schedule: Schedule) -> Self {
        Self {
            threads: threads.max(1),
            schedule,
        }
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    pub fn run<T, F>(&self, total: usize, f: F) -> Vec<(usize, Vec<T>)>
    where
        T: Send,
        F: Fn(usize, usize) -> Vec<T> + Sync,
    {
        if self.threads == 1 || total <= 1 {
            return vec![(0, f(0, total))];
        }

        let (tx, rx) = mpsc::channel::<(usize, Vec<T>)>();
        match self.schedule {
            Schedule::Static { chunk } => {
                let lists = static_assignment(total, self.threads, chunk);
                thread::scope(|s| {
                    for list in lists {
                        let tx = tx.clone();
                        let f = &f;
                        s.spawn(move || {
                            for (start, end) in list {
                                tx.send((start, f(start, end))).unwrap();
                            }
                        });
                    }
                });
            }
            _ => {
                let cursor = Cursor::new(total, self.threads, self.schedule);
                thread::scope(|s| {
                    for _ in 0..self.threads {
                        let tx = tx.clone();
                        let cursor = &cursor;
                        let f = &f;
                        s.spawn(move || {
                            while let Some((start, end)) = cursor.claim() {
                                tx.send((start, f(start, end))).unwrap();
                            }
                        });
                    }
                });
            }
        }
        drop(tx);
        rx.into_iter().collect()
    }
}

#[cfg(test)]
fn test_range_split(start: usize, end: usize, n: usize) {
    let ranges: Vec<(usize, usize)> = RangeSplitter::split(start, end, n).collect();
    assert!(ranges.len() <= n);
    let mut expect = start;
    for (s, e) in ranges {
        assert_eq!(s, expect);
        assert!(e > s);
        expect = e;
    }
    assert_eq!(expect, end);
}

#[test]
fn test_range_splits() {
    test_range_split(0, 1, 1);
    test_range_split(0, 5, 8);
    test_range_split(0, 8, 5);
    test_range_split(0, 100, 1);
    test_range_split(3, 58, 7);
    test_range_split(0, 55, 47);
}

#[cfg(test)]
fn test_pool_covers(threads: usize, schedule: Schedule, total: usize) {
    let pool = ChunkPool::new(threads, schedule);
    let parts = pool.run(total, |start, end| (start..end).collect::<Vec<usize>>());
    let mut seen = vec![0usize; total];
    for (start, values) in parts {
        for (offset, value) in values.into_iter().enumerate() {
            assert_eq!(value, start + offset);
            seen[value] += 1;
        }
    }
    assert!(seen.iter().all(|&n| n == 1), "row not covered exactly once");
}

#[test]
fn test_pool_coverage() {
    for threads in [1, 2, 3, 8] {
        for schedule in [
            Schedule::Static { chunk: None },
            Schedule::Static { chunk: Some(3) },
            Schedule::Dynamic { chunk: 1 },
            Schedule::Dynamic { chunk: 4 },
            Schedule::Guided { min_chunk: 1 },
            Schedule::Guided { min_chunk: 2 },
        ] {
            test_pool_covers(threads, schedule, 37);
            test_pool_covers(threads, schedule, 2);
        }
    }
}

#[test]
fn test_schedule_from_str() {
    assert_eq!(
        "static".parse::<Schedule>().unwrap(),
        Schedule::Static { chunk: None }
    );
    assert_eq!(
        "static,16".parse::<Schedule>().unwrap(),
        Schedule::Static { chunk: Some(16) }
    );
    assert_eq!(
        "dynamic".parse::<Schedule>().unwrap(),
        Schedule::Dynamic { chunk: 1 }
    );
    assert_eq!(
        "dynamic,4".parse::<Schedule>().unwrap(),
        Schedule::Dynamic { chunk: 4 }
    );
    assert_eq!(
        "guided,2".parse::<Schedule>().unwrap(),
        Schedule::Guided { min_chunk: 2 }
    );
    assert!("fair".parse::<Schedule>().is_err());
    assert!("dynamic,x".parse::<Schedule>().is_err());
}
