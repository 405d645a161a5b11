use num::Num;

/// One axis of the sampled plane window.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Axis<T> {
    pub min: T,
    pub max: T,
}

impl<T> Axis<T>
where
    T: Num + Copy,
{
    pub fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    pub fn length(&self) -> T {
        self.max - self.min
    }

    pub fn center(&self) -> T {
        (self.max + self.min) / (T::one() + T::one())
    }
}

/// Rectangular region of the complex plane: `x` is the real axis, `y` the
/// imaginary axis. Row 0 of a raster computed over a viewport samples
/// `y.min`; increasing rows increase the imaginary part.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    pub x: Axis<f64>,
    pub y: Axis<f64>,
}

impl Viewport {
    pub fn new(x: Axis<f64>, y: Axis<f64>) -> Self {
        Self { x, y }
    }

    pub fn from_bounds(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        Self::new(Axis::new(x_min, x_max), Axis::new(y_min, y_max))
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::from_bounds(-2.0, 2.0, -2.0, 2.0)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_axis_length_center() {
        let axis = Axis::new(-2.0, 2.0);
        assert_eq!(axis.length(), 4.0);
        assert_eq!(axis.center(), 0.0);

        let axis = Axis::new(1, 5);
        assert_eq!(axis.length(), 4);
        assert_eq!(axis.center(), 3);
    }

    #[test]
    fn test_default_viewport() {
        let view = Viewport::default();
        assert_eq!(view.x, Axis::new(-2.0, 2.0));
        assert_eq!(view.y, Axis::new(-2.0, 2.0));
    }
}
