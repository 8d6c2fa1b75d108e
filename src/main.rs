// A small signature pad:
// • Hold Left Mouse: you draw; strokes are committed to an off-screen
//   canvas as you go, smoothed through the sample midpoints.
// • S crops the drawing to its content plus a margin and saves it as a
//   maximum-quality JPEG under the pictures folder.
// • C clears the page. ESC quits.

mod crop;
mod draw;
mod error;
mod export;
mod gamma;
mod pad;
mod types;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use crop::crop_to_content;
use draw::{Drawer, draw_text_5x7};
use error::Error;
use export::export_jpeg;
use pad::{BACKGROUND_COLOR, INK_COLOR, SketchPad};
use types::{Canvas, TouchPhase, TouchSample};

const WINDOW_WIDTH: usize = 800;
const WINDOW_HEIGHT: usize = 600;

/// How long a status message stays on the HUD before the hint line returns.
const STATUS_SECS: f32 = 2.5;

const HINT: &str = "LMB: DRAW | C: CLEAR | S: SAVE | ESC: QUIT";
const HUD_COLOR: u32 = 0x00_20_20_20;

fn main() -> Result<(), Error> {
    /* --- Window + pad setup ---
       Visual: a blank white page opens, hint line along the top. */
    let mut drawer = Drawer::new("SignPad", WINDOW_WIDTH, WINDOW_HEIGHT)?;
    let mut pad = SketchPad::new();
    pad.resize(WINDOW_WIDTH, WINDOW_HEIGHT);

    // The image actually pushed to the window each frame: the committed
    // canvas with the HUD line composited on top, so HUD pixels never end
    // up in an exported drawing.
    let mut screen = Canvas::new(WINDOW_WIDTH, WINDOW_HEIGHT, BACKGROUND_COLOR);

    let mut pointer_down = false;
    let mut status: Option<(&'static str, Instant)> = None;

    while drawer.is_open() && !drawer.esc_pressed() {
        /* 1) Follow window resizes. The page is reallocated blank and the
           gesture in progress is dropped, like the original surface. */
        let (w, h) = drawer.size();
        if (w, h) != (pad.canvas().width, pad.canvas().height) {
            pad.resize(w, h);
            screen = Canvas::new(w, h, BACKGROUND_COLOR);
        }

        /* 2) Mouse state -> touch phases. Press starts a gesture, holding
           moves it, release ends it. */
        let down = drawer.left_mouse_down();
        if let Some((x, y)) = drawer.mouse_pos() {
            let phase = match (pointer_down, down) {
                (false, true) => Some(TouchPhase::Start),
                (true, true) => Some(TouchPhase::Move),
                (true, false) => Some(TouchPhase::End),
                (false, false) => None,
            };
            if let Some(phase) = phase {
                pad.touch(TouchSample { x, y, phase });
            }
        }
        pointer_down = down;

        /* 3) Keys. */
        if drawer.c_pressed_once() {
            pad.clear();
            status = Some(("CLEARED", Instant::now()));
        }
        if drawer.s_pressed_once() {
            status = Some((save_report(save_drawing(&pad)), Instant::now()));
        }

        /* 4) Rebuild the screen: committed page below, HUD line on top. */
        if !screen.pixels.is_empty() {
            screen.pixels.copy_from_slice(&pad.canvas().pixels);
            if status.is_some_and(|(_, since)| {
                since.elapsed() >= Duration::from_secs_f32(STATUS_SECS)
            }) {
                status = None;
            }
            let line = status.map_or(HINT, |(text, _)| text);
            draw_text_5x7(&mut screen, 8, 8, line, HUD_COLOR);
            drawer.present(&screen)?;
        } else {
            // No client area (minimized): keep pumping events until one comes back.
            drawer.pump();
        }
    }

    Ok(())
}

/// Crop the page to its content and write it out. Fails fast when nothing
/// has been drawn yet, so an untouched page never produces a file.
fn save_drawing(pad: &SketchPad) -> Result<PathBuf, Error> {
    if !pad.has_content() {
        return Err(Error::NoContent);
    }
    let cropped = crop_to_content(pad.canvas(), INK_COLOR)?;
    export_jpeg(&cropped)
}

/// Map the save result to a HUD message, with the details on the terminal.
fn save_report(result: Result<PathBuf, Error>) -> &'static str {
    match result {
        Ok(path) => {
            println!("saved {}", path.display());
            "SAVED"
        }
        Err(Error::NoContent) => "NOTHING DRAWN YET",
        Err(e) => {
            eprintln!("export failed: {e}");
            "SAVE FAILED"
        }
    }
}
