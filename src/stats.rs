//! Aggregates over timing samples gathered around solver runs.
//!
//! All functions reject empty input: the arithmetic would otherwise divide
//! by zero or leave min/max undefined.

use crate::error::{Error, Result};

fn non_empty(samples: &[f64]) -> Result<()> {
    if samples.is_empty() {
        Err(Error::InvalidParameter("empty sample set"))
    } else {
        Ok(())
    }
}

pub fn mean(samples: &[f64]) -> Result<f64> {
    non_empty(samples)?;
    Ok(samples.iter().sum::<f64>() / samples.len() as f64)
}

pub fn min(samples: &[f64]) -> Result<f64> {
    non_empty(samples)?;
    Ok(samples.iter().copied().fold(f64::INFINITY, f64::min))
}

pub fn max(samples: &[f64]) -> Result<f64> {
    non_empty(samples)?;
    Ok(samples.iter().copied().fold(f64::NEG_INFINITY, f64::max))
}

/// Population standard deviation: `sqrt(mean((x - mean(x))^2))`.
pub fn stdev(samples: &[f64]) -> Result<f64> {
    let avg = mean(samples)?;
    let variance =
        samples.iter().map(|x| (x - avg) * (x - avg)).sum::<f64>() / samples.len() as f64;
    Ok(variance.sqrt())
}

/// All four aggregates of one sample set.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Summary {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub stdev: f64,
}

impl Summary {
    pub fn of(samples: &[f64]) -> Result<Self> {
        Ok(Self {
            mean: mean(samples)?,
            min: min(samples)?,
            max: max(samples)?,
            stdev: stdev(samples)?,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const EPSILON: f64 = 1e-12;

    #[test]
    fn test_aggregates() {
        let samples = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((mean(&samples).unwrap() - 5.0).abs() < EPSILON);
        assert_eq!(min(&samples).unwrap(), 2.0);
        assert_eq!(max(&samples).unwrap(), 9.0);
        assert!((stdev(&samples).unwrap() - 2.0).abs() < EPSILON);
    }

    #[test]
    fn test_stdev_of_constant_is_zero() {
        assert_eq!(stdev(&[3.5; 12]).unwrap(), 0.0);
    }

    #[test]
    fn test_stdev_small_sequence() {
        let expected = (2.0f64 / 3.0).sqrt();
        assert!((stdev(&[1.0, 2.0, 3.0]).unwrap() - expected).abs() < EPSILON);
    }

    #[test]
    fn test_single_sample() {
        let summary = Summary::of(&[1.25]).unwrap();
        assert_eq!(summary.mean, 1.25);
        assert_eq!(summary.min, 1.25);
        assert_eq!(summary.max, 1.25);
        assert_eq!(summary.stdev, 0.0);
    }

    #[test]
    fn test_empty_samples_fail() {
        assert!(mean(&[]).is_err());
        assert!(min(&[]).is_err());
        assert!(max(&[]).is_err());
        assert!(stdev(&[]).is_err());
        assert!(Summary::of(&[]).is_err());
    }
}
