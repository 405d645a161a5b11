use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{Error, Result};
use crate::raster::Raster;

/// Bytes per pixel for a given maxval, per the PGM format: 1 byte up to 255,
/// 2 bytes (big-endian) up to 65535.
pub fn color_depth(maxval: u16) -> usize {
    if maxval > 255 {
        2
    } else {
        1
    }
}

/// Writes a binary (P5) PGM file: header, then raw cells row-major, top row
/// first. Cell values are expected to be in `[0, maxval]`.
///
/// On write failure a truncated file may be left behind; no cleanup is
/// attempted.
pub fn write_pgm<P: AsRef<Path>>(raster: &Raster, maxval: u16, path: P) -> Result<()> {
    if maxval == 0 {
        return Err(Error::InvalidParameter("maxval must be positive"));
    }

    let file = File::create(path)?;
    let mut out = BufWriter::new(file);
    write!(
        out,
        "P5\n# mandelgrid\n{} {}\n{}\n",
        raster.width(),
        raster.height(),
        maxval
    )?;

    if color_depth(maxval) == 1 {
        let mut row_bytes = Vec::with_capacity(raster.width());
        for row in 0..raster.height() {
            row_bytes.clear();
            row_bytes.extend(raster.row(row).iter().map(|&v| v as u8));
            out.write_all(&row_bytes)?;
        }
    } else {
        let mut row_bytes = Vec::with_capacity(raster.width() * 2);
        for row in 0..raster.height() {
            row_bytes.clear();
            for &v in raster.row(row) {
                row_bytes.extend_from_slice(&v.to_be_bytes());
            }
            out.write_all(&row_bytes)?;
        }
    }
    out.flush()?;
    Ok(())
}
