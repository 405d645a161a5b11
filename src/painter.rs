use image::{GrayImage, Luma};

use crate::raster::Raster;

pub trait Painter {
    fn value_color(&self, value: u16) -> Luma<u8>;

    fn paint(&self, raster: &Raster) -> GrayImage {
        let width: u32 = raster.width().try_into().unwrap();
        let height: u32 = raster.height().try_into().unwrap();

        let mut img = GrayImage::new(width, height);
        for y in 0..height {
            for x in 0..width {
                img.put_pixel(x, y, self.value_color(raster.value(x as usize, y as usize)));
            }
        }
        img
    }
}

/// Maps escape counts to 8-bit gray, high counts dark, so in-set pixels
/// (count = cap) come out black.
pub struct GreyscalePainter {
    max_value: f64,
}

impl GreyscalePainter {
    pub fn new(max_value: u16) -> Self {
        Self {
            max_value: max_value as f64,
        }
    }
}

impl Painter for GreyscalePainter {
    fn value_color(&self, value: u16) -> Luma<u8> {
        let frac = (value as f64 / self.max_value).clamp(0.0, 1.0);
        let v: u8 = 255 - (frac * 255.0).round() as u8;
        Luma([v])
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_value_scaling() {
        let painter = GreyscalePainter::new(100);
        assert_eq!(painter.value_color(0), Luma([255]));
        assert_eq!(painter.value_color(100), Luma([0]));
        assert_eq!(painter.value_color(50), Luma([127]));
        // values above the cap clamp to black rather than wrapping
        assert_eq!(painter.value_color(200), Luma([0]));
    }

    #[test]
    fn test_paint_dimensions() {
        let mut raster = Raster::new(3, 2);
        raster.write_rows(0, &[0, 5, 10, 10, 5, 0]);
        let img = GreyscalePainter::new(10).paint(&raster);
        assert_eq!(img.dimensions(), (3, 2));
        assert_eq!(img.get_pixel(0, 0), &Luma([255]));
        assert_eq!(img.get_pixel(0, 1), &Luma([0]));
    }
}
