// A tiny error type so we don't rely on anyhow/thiserror.
// Every variant states *where* things went wrong.
use std::fmt::{self, Display};

#[derive(Debug)]
pub enum Error {
    WindowInit(String),   // Creating the window failed
    WindowUpdate(String), // Updating the window buffer failed
    NoContent,            // Export requested before anything was drawn
    InvalidRegion {
        // The content box the crop scans produced (edges inclusive). An
        // inkless page leaves the left/right sentinels crossed
        // (left = width, right = 0).
        top: usize,
        bottom: usize,
        left: usize,
        right: usize,
    },
    ExportDir(String),   // Creating or resolving the save directory failed
    ExportWrite(String), // Encoding or writing the JPEG failed
}

impl Display for Error {
    // This decides how the error is printed to your console.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::WindowInit(s) => write!(f, "Window init error: {s}"),
            Error::WindowUpdate(s) => write!(f, "Window update error: {s}"),
            Error::NoContent => write!(f, "Nothing has been drawn yet"),
            Error::InvalidRegion {
                top,
                bottom,
                left,
                right,
            } => {
                write!(
                    f,
                    "Degenerate content region (top {top}, bottom {bottom}, left {left}, right {right})"
                )
            }
            Error::ExportDir(s) => write!(f, "Export directory error: {s}"),
            Error::ExportWrite(s) => write!(f, "Export write error: {s}"),
        }
    }
}

// We don't implement std::error::Error for now to keep things minimal.
// It's easy to add later when we wire in more components.
