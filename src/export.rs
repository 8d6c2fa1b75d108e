// Writes a finished drawing to disk: <pictures>/SignPad/sign/<uuid>.jpeg,
// JPEG at maximum quality. The directory is created on first export and
// every file gets a fresh random name, so repeated saves never collide.

use std::env;
use std::fs;
use std::io::BufWriter;
use std::path::PathBuf;

use image::codecs::jpeg::JpegEncoder;
use image::{Rgb, RgbImage};
use uuid::Uuid;

use crate::error::Error;
use crate::types::Canvas;

/// Environment override for the export directory (handy for scripts and
/// for machines without a Pictures folder).
const DIR_OVERRIDE: &str = "SIGNPAD_EXPORT_DIR";

/// Maximum quality, matching what a signature capture wants: no visible
/// compression artifacts on thin strokes.
const JPEG_QUALITY: u8 = 100;

/// Export the drawing into the default save directory. Returns the path of
/// the file that was written.
pub fn export_jpeg(canvas: &Canvas) -> Result<PathBuf, Error> {
    write_jpeg(canvas, export_dir()?)
}

/// Export the drawing into `dir`, creating the directory first.
pub fn write_jpeg(canvas: &Canvas, dir: PathBuf) -> Result<PathBuf, Error> {
    fs::create_dir_all(&dir).map_err(|e| Error::ExportDir(format!("{}: {e}", dir.display())))?;
    let path = dir.join(format!("{}.jpeg", Uuid::new_v4()));

    let file = fs::File::create(&path)
        .map_err(|e| Error::ExportWrite(format!("{}: {e}", path.display())))?;
    let mut writer = BufWriter::new(file);
    let mut encoder = JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY);
    encoder
        .encode_image(&to_rgb_image(canvas))
        .map_err(|e| Error::ExportWrite(format!("{}: {e}", path.display())))?;

    Ok(path)
}

/// Where drawings go by default: the override directory if set, otherwise
/// Pictures/SignPad/sign under the user's home (resolved from the home env
/// var per platform).
fn export_dir() -> Result<PathBuf, Error> {
    if let Ok(dir) = env::var(DIR_OVERRIDE) {
        return Ok(PathBuf::from(dir));
    }
    let home = env::var("HOME")
        .or_else(|_| env::var("USERPROFILE"))
        .map_err(|_| Error::ExportDir("neither HOME nor USERPROFILE is set".into()))?;
    Ok(PathBuf::from(home)
        .join("Pictures")
        .join("SignPad")
        .join("sign"))
}

/// Unpack the 0x00RRGGBB canvas into the byte-per-channel image the encoder
/// wants.
fn to_rgb_image(canvas: &Canvas) -> RgbImage {
    RgbImage::from_fn(canvas.width as u32, canvas.height as u32, |x, y| {
        let px = canvas.pixels[y as usize * canvas.width + x as usize];
        Rgb([
            ((px >> 16) & 0xFF) as u8,
            ((px >> 8) & 0xFF) as u8,
            (px & 0xFF) as u8,
        ])
    })
}
