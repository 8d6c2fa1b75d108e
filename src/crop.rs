// Content-aware cropping of a finished drawing. Four scans find the tightest
// box of ink pixels; the output is that box plus a fixed margin, white
// everywhere the drawing does not reach.

use crate::error::Error;
use crate::types::Canvas;

/// Margin added around the content box, split evenly on each side.
pub const PAD: usize = 100;

const WHITE: u32 = 0x00_FF_FF_FF;

/// Content box in pixel coordinates, all edges inclusive.
struct Bounds {
    top: usize,
    bottom: usize,
    left: usize,
    right: usize,
}

/// Copy the drawing onto a fresh white canvas sized to its ink content plus
/// the margin. `ink` is the exact stroke color laid down by the pad;
/// antialiased edge pixels are not ink but ride along in the copy.
///
/// With no ink pixel anywhere the scans fall back to their sentinels and the
/// box comes back crossed (left = width, right = 0); that is reported as
/// `Error::InvalidRegion` instead of an impossible allocation. A zero-area
/// source is rejected the same way: with width 0 the left sentinel equals
/// the right one and the crossed-box check alone would not catch it.
pub fn crop_to_content(src: &Canvas, ink: u32) -> Result<Canvas, Error> {
    let b = content_bounds(src, ink);
    if src.is_empty() || b.right < b.left || b.bottom < b.top {
        return Err(Error::InvalidRegion {
            top: b.top,
            bottom: b.bottom,
            left: b.left,
            right: b.right,
        });
    }

    let width = b.right - b.left + PAD;
    let height = b.bottom - b.top + PAD;
    let mut dst = Canvas::new(width, height, WHITE);

    // Composite the whole source at the padded offset. Source pixels that
    // fall outside the destination are dropped; destination pixels the
    // source never reaches stay white.
    let ox = PAD as i64 / 2 - b.left as i64;
    let oy = PAD as i64 / 2 - b.top as i64;
    for y in 0..src.height {
        let dy = y as i64 + oy;
        if dy < 0 || dy >= dst.height as i64 {
            continue;
        }
        let src_row = y * src.width;
        let dst_row = dy as usize * dst.width;
        for x in 0..src.width {
            let dx = x as i64 + ox;
            if dx < 0 || dx >= dst.width as i64 {
                continue;
            }
            dst.pixels[dst_row + dx as usize] = src.pixels[src_row + x];
        }
    }

    Ok(dst)
}

fn content_bounds(src: &Canvas, ink: u32) -> Bounds {
    let top = find_top(src, ink);
    let bottom = find_bottom(src, ink);
    let left = find_left(src, ink, top, bottom);
    let right = find_right(src, ink, top, bottom);
    Bounds {
        top,
        bottom,
        left,
        right,
    }
}

/// First row from the top containing an ink pixel; 0 when there is none.
fn find_top(src: &Canvas, ink: u32) -> usize {
    for y in 0..src.height {
        for x in 0..src.width {
            if src.get(x, y) == Some(ink) {
                return y;
            }
        }
    }
    0
}

/// First row from the bottom containing an ink pixel; 0 when there is none.
fn find_bottom(src: &Canvas, ink: u32) -> usize {
    for y in (0..src.height).rev() {
        for x in 0..src.width {
            if src.get(x, y) == Some(ink) {
                return y;
            }
        }
    }
    0
}

/// Minimum x of the first ink pixel per row, scanning rows top..=bottom left
/// to right. Defaults to the full width when no row hits, which leaves the
/// degenerate case to the caller's region check.
fn find_left(src: &Canvas, ink: u32, top: usize, bottom: usize) -> usize {
    let mut left = src.width;
    for y in top..=bottom {
        for x in 0..src.width {
            if src.get(x, y) == Some(ink) {
                if x < left {
                    left = x;
                }
                break;
            }
        }
    }
    left
}

/// Maximum x of the first ink pixel per row, scanning rows top..=bottom
/// right to left. Defaults to 0 when no row hits.
fn find_right(src: &Canvas, ink: u32, top: usize, bottom: usize) -> usize {
    let mut right = 0;
    for y in top..=bottom {
        for x in (0..src.width).rev() {
            if src.get(x, y) == Some(ink) {
                if x > right {
                    right = x;
                }
                break;
            }
        }
    }
    right
}
