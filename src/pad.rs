// The drawing surface. Pointer samples come in, get smoothed into quadratic
// segments, and the in-progress stroke is committed onto a persistent
// off-screen canvas as it grows. What you see on screen is always this
// canvas; nothing is retained per stroke once a gesture ends.

use crate::gamma::GammaLut;
use crate::types::{Canvas, Point, TouchPhase, TouchSample};

/// Stroke and page colors, packed 0x00RRGGBB.
pub const INK_COLOR: u32 = 0x00_00_00_00;
pub const BACKGROUND_COLOR: u32 = 0x00_FF_FF_FF;

/// Stroke thickness in pixels (round caps and joins).
const STROKE_WIDTH: f32 = 6.0;

/// Movement below this distance per axis is pointer jitter: the path does
/// not grow and the canvas is not touched.
const TOUCH_TOLERANCE: f32 = 8.0;

/// One smoothed piece of the path: a quadratic curve from the previous
/// endpoint that bends toward `ctrl` and lands on `to`. The control point is
/// the last raw sample and the endpoint is the midpoint to the next one,
/// which keeps consecutive pieces joining without corners.
#[derive(Clone, Copy, Debug)]
struct QuadSegment {
    ctrl: Point,
    to: Point,
}

pub struct SketchPad {
    canvas: Canvas,
    // The gesture in progress: a start point plus quadratic pieces. Emptied
    // when a gesture begins or ends; what was rasterized stays on the canvas.
    path_start: Option<Point>,
    path: Vec<QuadSegment>,
    // Last committed raw sample (the next segment's control point).
    current: Point,
    has_content: bool,
    // Reusable rasterization scratch: per-pixel coverage for the current
    // path, canvas-sized, cleared per pass only where the path touched.
    mask: Vec<f32>,
    lut: GammaLut,
}

impl SketchPad {
    /// A pad with no surface yet. Draws are dropped until `resize` gives the
    /// canvas a real size.
    pub fn new() -> Self {
        Self {
            canvas: Canvas::new(0, 0, BACKGROUND_COLOR),
            path_start: None,
            path: Vec::new(),
            current: Point::new(0.0, 0.0),
            has_content: false,
            mask: Vec::new(),
            lut: GammaLut::new(),
        }
    }

    /// (Re)allocate the canvas for a new surface size and fill it with the
    /// background color. Prior contents are gone and the gesture in progress
    /// is dropped; safe to call repeatedly.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.canvas = Canvas::new(width, height, BACKGROUND_COLOR);
        self.mask = vec![0.0; width * height];
        self.path_start = None;
        self.path.clear();
    }

    /// Feed one pointer sample into the pad.
    pub fn touch(&mut self, sample: TouchSample) {
        let p = Point::new(sample.x, sample.y);
        match sample.phase {
            TouchPhase::Start => self.begin_stroke(p),
            TouchPhase::Move => self.extend_stroke(p),
            TouchPhase::End => self.end_stroke(),
        }
    }

    /// Start a gesture at `p`. The path restarts there; the canvas is not
    /// touched until the first committed move.
    pub fn begin_stroke(&mut self, p: Point) {
        self.has_content = true;
        self.path.clear();
        self.path_start = Some(p);
        self.current = p;
    }

    /// Grow the gesture toward `p`. Jitter below the tolerance is swallowed;
    /// a committed move appends a smoothed segment and immediately restrokes
    /// the whole accumulated path onto the canvas.
    pub fn extend_stroke(&mut self, p: Point) {
        self.has_content = true;
        let Some(_) = self.path_start else {
            // A move with no gesture start: adopt the sample as the start.
            self.path_start = Some(p);
            self.current = p;
            return;
        };

        let dx = (p.x - self.current.x).abs();
        let dy = (p.y - self.current.y).abs();
        if dx < TOUCH_TOLERANCE && dy < TOUCH_TOLERANCE {
            return;
        }

        self.path.push(QuadSegment {
            ctrl: self.current,
            to: self.current.midpoint(p),
        });
        self.current = p;
        self.rasterize_path();
    }

    /// Finish the gesture. The path is emptied so it is not stroked again;
    /// everything already committed stays on the canvas.
    pub fn end_stroke(&mut self) {
        self.has_content = true;
        self.path.clear();
        self.path_start = None;
    }

    /// Wipe the page: background everywhere, content flag down, and one more
    /// stroke pass over the current path. Between gestures the path is empty
    /// and that pass draws nothing; clearing mid-gesture repaints the pending
    /// path onto the fresh background (the original surface does the same).
    pub fn clear(&mut self) {
        self.has_content = false;
        self.canvas.fill(BACKGROUND_COLOR);
        self.rasterize_path();
    }

    /// The committed drawing, for on-screen compositing and for cropping.
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// True once any gesture has touched the pad since the last clear.
    pub fn has_content(&self) -> bool {
        self.has_content
    }

    /// Stroke the whole accumulated path onto the canvas: flatten the
    /// quadratic pieces to a polyline, rate every nearby pixel by its
    /// distance to the polyline (max over pieces, so overlaps and joins stay
    /// clean), then blend the ink through the coverage in linear light.
    fn rasterize_path(&mut self) {
        if self.canvas.is_empty() {
            return;
        }
        let Some(start) = self.path_start else {
            return;
        };

        let mut pts = Vec::with_capacity(self.path.len() * 8 + 1);
        pts.push(start);
        let mut from = start;
        for seg in &self.path {
            flatten_quad(from, seg.ctrl, seg.to, &mut pts);
            from = seg.to;
        }
        if pts.len() < 2 {
            // A lone start point strokes nothing.
            return;
        }

        let half = STROKE_WIDTH / 2.0;
        let (w, h) = (self.canvas.width, self.canvas.height);

        // Path bounding box, padded for the brush radius and the soft edge,
        // clamped to the canvas. Scratch is cleared and blended only here.
        let margin = half + 1.0;
        let mut min_x = f32::MAX;
        let mut min_y = f32::MAX;
        let mut max_x = f32::MIN;
        let mut max_y = f32::MIN;
        for p in &pts {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        let x0 = ((min_x - margin).floor().max(0.0)) as usize;
        let y0 = ((min_y - margin).floor().max(0.0)) as usize;
        let x1 = (((max_x + margin).ceil()) as usize).min(w.saturating_sub(1));
        let y1 = (((max_y + margin).ceil()) as usize).min(h.saturating_sub(1));
        if x0 > x1 || y0 > y1 {
            return; // the whole path lies outside the canvas
        }

        for y in y0..=y1 {
            let row = y * w;
            self.mask[row + x0..=row + x1].fill(0.0);
        }

        for pair in pts.windows(2) {
            accumulate_segment(&mut self.mask, w, (x0, y0, x1, y1), pair[0], pair[1], half);
        }

        for y in y0..=y1 {
            let row = y * w;
            for x in x0..=x1 {
                let cov = self.mask[row + x];
                if cov > 0.0 {
                    let base = self.canvas.pixels[row + x];
                    self.canvas.pixels[row + x] = self.lut.mix_over(INK_COLOR, base, cov);
                }
            }
        }
    }
}

/// Append evenly spaced points of the quadratic curve (from, ctrl, to) to
/// `out`, excluding `from` (the caller already has it). Step count follows
/// the control-polygon length so short pieces stay cheap.
fn flatten_quad(from: Point, ctrl: Point, to: Point, out: &mut Vec<Point>) {
    let steps = (from.dist(ctrl) + ctrl.dist(to)).ceil().max(1.0) as usize;
    for i in 1..=steps {
        let t = i as f32 / steps as f32;
        let s = 1.0 - t;
        out.push(Point::new(
            s * s * from.x + 2.0 * s * t * ctrl.x + t * t * to.x,
            s * s * from.y + 2.0 * s * t * ctrl.y + t * t * to.y,
        ));
    }
}

/// Raise the coverage of every pixel near the segment (a, b) to at least the
/// capsule coverage at that pixel: full inside the stroke, tapering over one
/// pixel at the edge (round caps fall out of the distance metric). Only the
/// clamp rectangle is touched.
fn accumulate_segment(
    mask: &mut [f32],
    stride: usize,
    clamp: (usize, usize, usize, usize),
    a: Point,
    b: Point,
    half: f32,
) {
    let margin = half + 1.0;
    let (cx0, cy0, cx1, cy1) = clamp;
    let x0 = (((a.x.min(b.x) - margin).floor().max(0.0)) as usize).max(cx0);
    let y0 = (((a.y.min(b.y) - margin).floor().max(0.0)) as usize).max(cy0);
    let x1 = (((a.x.max(b.x) + margin).ceil().max(0.0)) as usize).min(cx1);
    let y1 = (((a.y.max(b.y) + margin).ceil().max(0.0)) as usize).min(cy1);
    if x0 > x1 || y0 > y1 {
        return;
    }

    let vx = b.x - a.x;
    let vy = b.y - a.y;
    let len2 = vx * vx + vy * vy;

    for y in y0..=y1 {
        let py = y as f32 + 0.5;
        let row = y * stride;
        for x in x0..=x1 {
            let px = x as f32 + 0.5;
            // Distance from the pixel center to the segment.
            let wx = px - a.x;
            let wy = py - a.y;
            let t = if len2 <= f32::EPSILON {
                0.0
            } else {
                ((wx * vx + wy * vy) / len2).clamp(0.0, 1.0)
            };
            let dx = wx - t * vx;
            let dy = wy - t * vy;
            let d = (dx * dx + dy * dy).sqrt();

            let cov = (half + 0.5 - d).clamp(0.0, 1.0);
            if cov > mask[row + x] {
                mask[row + x] = cov;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stroke(pad: &mut SketchPad, pts: &[(f32, f32)]) {
        let (x, y) = pts[0];
        pad.touch(TouchSample {
            x,
            y,
            phase: TouchPhase::Start,
        });
        for &(x, y) in &pts[1..] {
            pad.touch(TouchSample {
                x,
                y,
                phase: TouchPhase::Move,
            });
        }
        let (x, y) = *pts.last().unwrap();
        pad.touch(TouchSample {
            x,
            y,
            phase: TouchPhase::End,
        });
    }

    /// Bounding box (min_x, min_y, max_x, max_y) of fully inked pixels.
    fn ink_bounds(c: &Canvas) -> Option<(usize, usize, usize, usize)> {
        let mut b: Option<(usize, usize, usize, usize)> = None;
        for y in 0..c.height {
            for x in 0..c.width {
                if c.get(x, y) == Some(INK_COLOR) {
                    let e = b.get_or_insert((x, y, x, y));
                    e.0 = e.0.min(x);
                    e.1 = e.1.min(y);
                    e.2 = e.2.max(x);
                    e.3 = e.3.max(y);
                }
            }
        }
        b
    }

    #[test]
    fn begin_alone_does_not_touch_the_canvas() {
        let mut pad = SketchPad::new();
        pad.resize(100, 100);
        let before = pad.canvas().clone();
        pad.begin_stroke(Point::new(50.0, 50.0));
        assert!(pad.has_content());
        assert!(*pad.canvas() == before);
    }

    #[test]
    fn jitter_below_tolerance_is_a_no_op() {
        let mut pad = SketchPad::new();
        pad.resize(100, 100);
        pad.begin_stroke(Point::new(50.0, 50.0));
        let before = pad.canvas().clone();
        // Several wiggles, each under the tolerance on both axes.
        pad.extend_stroke(Point::new(53.0, 53.0));
        pad.extend_stroke(Point::new(46.0, 52.0));
        pad.extend_stroke(Point::new(50.5, 44.5));
        assert!(*pad.canvas() == before, "jitter must not write pixels");
    }

    #[test]
    fn committed_move_lays_ink_up_to_the_midpoint() {
        let mut pad = SketchPad::new();
        pad.resize(200, 200);
        pad.begin_stroke(Point::new(20.0, 50.0));
        pad.extend_stroke(Point::new(80.0, 50.0));
        // The smoothed piece runs from the start to the midpoint (50, 50).
        assert_eq!(pad.canvas().get(35, 50), Some(INK_COLOR));
        assert_eq!(pad.canvas().get(48, 50), Some(INK_COLOR));
        // Beyond the midpoint plus brush radius the page is untouched.
        assert_eq!(pad.canvas().get(70, 50), Some(BACKGROUND_COLOR));
        // Ink spans the stroke width around the centerline.
        assert_eq!(pad.canvas().get(35, 48), Some(INK_COLOR));
        assert_eq!(pad.canvas().get(35, 40), Some(BACKGROUND_COLOR));
    }

    #[test]
    fn diagonal_stroke_covers_the_expected_box() {
        let mut pad = SketchPad::new();
        pad.resize(200, 200);
        stroke(
            &mut pad,
            &[
                (50.0, 50.0),
                (75.0, 75.0),
                (100.0, 100.0),
                (125.0, 125.0),
                (150.0, 150.0),
            ],
        );
        assert!(pad.has_content());
        let (min_x, min_y, max_x, max_y) = ink_bounds(pad.canvas()).expect("stroke lays ink");
        // Start cap sits on (50, 50); the last committed piece ends at the
        // midpoint (137.5, 137.5), so the far corner trails the final sample.
        assert!((45..=50).contains(&min_x), "min_x = {min_x}");
        assert!((45..=50).contains(&min_y), "min_y = {min_y}");
        assert!((133..=145).contains(&max_x), "max_x = {max_x}");
        assert!((133..=145).contains(&max_y), "max_y = {max_y}");
    }

    #[test]
    fn clear_resets_every_pixel_and_the_flag() {
        let mut pad = SketchPad::new();
        pad.resize(100, 100);
        stroke(&mut pad, &[(20.0, 20.0), (60.0, 60.0)]);
        assert!(ink_bounds(pad.canvas()).is_some());

        pad.clear();
        assert!(!pad.has_content());
        assert!(
            pad.canvas()
                .pixels
                .iter()
                .all(|&px| px == BACKGROUND_COLOR),
            "clear must repaint the whole page"
        );
    }

    #[test]
    fn clear_mid_gesture_repaints_the_pending_path() {
        let mut pad = SketchPad::new();
        pad.resize(100, 100);
        pad.begin_stroke(Point::new(20.0, 50.0));
        pad.extend_stroke(Point::new(60.0, 50.0));
        // No end_stroke: the path is still pending when the page is wiped.
        pad.clear();
        assert!(!pad.has_content());
        assert!(
            ink_bounds(pad.canvas()).is_some(),
            "the pending path is stroked again onto the fresh background"
        );
    }

    #[test]
    fn draws_before_any_resize_are_dropped() {
        let mut pad = SketchPad::new();
        stroke(&mut pad, &[(10.0, 10.0), (90.0, 90.0)]);
        assert!(pad.canvas().is_empty());
        assert!(pad.has_content(), "the flag tracks gestures, not pixels");
    }

    #[test]
    fn zero_sized_surface_is_safe() {
        let mut pad = SketchPad::new();
        pad.resize(0, 0);
        stroke(&mut pad, &[(0.0, 0.0), (50.0, 50.0)]);
        assert!(pad.canvas().is_empty());
    }

    #[test]
    fn move_without_a_start_adopts_the_point() {
        let mut pad = SketchPad::new();
        pad.resize(100, 100);
        pad.extend_stroke(Point::new(30.0, 30.0));
        assert!(ink_bounds(pad.canvas()).is_none(), "first orphan move only records");
        pad.extend_stroke(Point::new(70.0, 30.0));
        assert!(
            ink_bounds(pad.canvas()).is_some(),
            "the next move strokes from the adopted start"
        );
    }

    #[test]
    fn consecutive_gestures_accumulate() {
        let mut pad = SketchPad::new();
        pad.resize(100, 100);
        stroke(&mut pad, &[(10.0, 10.0), (30.0, 10.0)]);
        stroke(&mut pad, &[(10.0, 60.0), (30.0, 60.0)]);
        // Both strokes' pixels are present; the second never erases the first.
        assert_eq!(pad.canvas().get(15, 10), Some(INK_COLOR));
        assert_eq!(pad.canvas().get(15, 60), Some(INK_COLOR));
    }

    #[test]
    fn resize_drops_contents_and_the_pending_path() {
        let mut pad = SketchPad::new();
        pad.resize(100, 100);
        pad.begin_stroke(Point::new(20.0, 20.0));
        pad.extend_stroke(Point::new(60.0, 60.0));
        pad.resize(50, 50);
        assert_eq!(pad.canvas().width, 50);
        assert!(
            pad.canvas()
                .pixels
                .iter()
                .all(|&px| px == BACKGROUND_COLOR),
            "the reallocated page starts blank"
        );
        // The dropped path stays dropped: another move starts a fresh gesture.
        pad.extend_stroke(Point::new(40.0, 40.0));
        assert!(ink_bounds(pad.canvas()).is_none());
    }
}
