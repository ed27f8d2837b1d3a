//! Serializes a finished frame: the binary pixel map the caller asked
//! for, and optionally a PNG preview of the same buffer.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::error::{Error, Result};
use crate::film::Film;
use crate::math::MAX_CHANNEL_VALUE;

/// Binary pixel map: textual `P6` header, then raw row-major RGB
/// triples with no padding.
pub fn write_p6(film: &Film<[u8; 3]>, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|source| io_error(path, source))?;
    let mut out = BufWriter::new(file);
    write_pixels(&mut out, film).map_err(|source| io_error(path, source))
}

fn write_pixels(out: &mut impl Write, film: &Film<[u8; 3]>) -> io::Result<()> {
    write!(
        out,
        "P6\n{} {}\n{}\n",
        film.width, film.height, MAX_CHANNEL_VALUE
    )?;
    for pixel in &film.buffer {
        out.write_all(pixel)?;
    }
    out.flush()
}

pub fn write_png(film: &Film<[u8; 3]>, path: &Path) -> Result<()> {
    let preview = image::RgbImage::from_fn(film.width as u32, film.height as u32, |x, y| {
        image::Rgb(film.at(x as usize, y as usize))
    });
    preview.save(path).map_err(|err| match err {
        image::ImageError::IoError(source) => io_error(path, source),
        other => io_error(path, io::Error::new(io::ErrorKind::Other, other)),
    })
}

fn io_error(path: &Path, source: io::Error) -> Error {
    Error::Io {
        path: path.to_path_buf(),
        source,
    }
}
