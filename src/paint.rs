// The stroke/canvas engine. Owns the persistent drawing layer and the pen
// continuity point; consumes one interaction mode per frame and mutates the
// canvas accordingly. The only cross-frame memory lives here: Draw chains
// segments through `pen`, every other mode lifts the pen.

use crate::config::Config;
use crate::gesture::Mode;
use crate::types::{FrameBuffer, Point};

/// A canvas pixel counts as ink iff any channel is above this. Keeps the
/// faint anti-aliasing fringe from punching holes into the live video.
const INK_THRESHOLD: u32 = 50;

/// How the renderer should draw the cursor this frame. Transient: produced
/// by `apply`, consumed by the overlay pass, never stored.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CursorStyle {
    Filled,
    Outline,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cursor {
    pub center: Point,
    pub radius: i32,
    pub color: u32,
    pub style: CursorStyle,
}

pub struct PaintSession {
    /// Allocated lazily on the first frame so its size matches whatever
    /// resolution the camera actually decided to deliver. Never reallocated.
    canvas: Option<FrameBuffer>,
    /// Where the last stroke segment ended; `None` means no active stroke.
    pen: Option<Point>,
    stroke_color: u32,
    stroke_width: f32,
    eraser_radius: i32,
    cursor_radius: i32,
}

impl PaintSession {
    pub fn new(config: &Config) -> Self {
        Self {
            canvas: None,
            pen: None,
            stroke_color: config.stroke_color,
            stroke_width: config.stroke_width,
            eraser_radius: config.eraser_radius,
            cursor_radius: config.cursor_radius,
        }
    }

    /// Advance the engine by one frame.
    ///
    /// `tip` is the index fingertip (pen position), `anchor` the middle
    /// finger base (eraser center — deliberately the palm rather than the
    /// fingertip, a larger and steadier target). Returns the cursor the
    /// renderer should show, if any.
    pub fn apply(
        &mut self,
        mode: Mode,
        tip: Point,
        anchor: Point,
        frame_width: usize,
        frame_height: usize,
    ) -> Option<Cursor> {
        let stroke_color = self.stroke_color;
        let stroke_width = self.stroke_width;
        let eraser_radius = self.eraser_radius;
        let cursor_radius = self.cursor_radius;

        let canvas = self
            .canvas
            .get_or_insert_with(|| FrameBuffer::black(frame_width, frame_height));

        match mode {
            Mode::Draw => {
                // First Draw frame of a stroke: start at the fingertip, so we
                // never rubber-band a line in from wherever the pen last was.
                let from = self.pen.unwrap_or(tip);
                stroke_segment(canvas, from, tip, stroke_color, stroke_width);
                self.pen = Some(tip);
                Some(Cursor {
                    center: tip,
                    radius: cursor_radius,
                    color: stroke_color,
                    style: CursorStyle::Filled,
                })
            }
            Mode::Hover => {
                // Pen up: the next Draw starts a fresh segment instead of
                // connecting across the hover gap.
                self.pen = None;
                Some(Cursor {
                    center: tip,
                    radius: cursor_radius,
                    color: stroke_color,
                    style: CursorStyle::Outline,
                })
            }
            Mode::Erase => {
                fill_circle(canvas, anchor, eraser_radius, 0x00000000);
                self.pen = None;
                Some(Cursor {
                    center: anchor,
                    radius: eraser_radius,
                    color: 0x00FFFFFF,
                    style: CursorStyle::Outline,
                })
            }
            Mode::Idle => {
                self.pen = None;
                None
            }
        }
    }

    /// Idle shortcut for frames with no hand at all.
    pub fn pen_up(&mut self) {
        self.pen = None;
    }

    /// Lay the canvas ink over the live frame.
    /// Visual: strokes appear opaque on top of the video, everything the pen
    /// never touched stays live camera. Ink pixels replace, they don't blend.
    pub fn composite_over(&self, frame: &mut FrameBuffer) {
        let Some(canvas) = &self.canvas else { return };
        if canvas.width != frame.width || canvas.height != frame.height {
            // Camera resolution changed mid-run; don't scribble garbage.
            log::warn!("canvas/frame size mismatch, skipping composite");
            return;
        }
        for (dst, &src) in frame.pixels.iter_mut().zip(canvas.pixels.iter()) {
            if is_ink(src) {
                *dst = src;
            }
        }
    }

    #[cfg(test)]
    fn pen(&self) -> Option<Point> {
        self.pen
    }

    #[cfg(test)]
    fn ink_at(&self, x: usize, y: usize) -> bool {
        let canvas = self.canvas.as_ref().expect("canvas not allocated");
        is_ink(canvas.pixels[y * canvas.width + x])
    }
}

#[inline]
fn is_ink(px: u32) -> bool {
    ((px >> 16) & 0xFF) > INK_THRESHOLD
        || ((px >> 8) & 0xFF) > INK_THRESHOLD
        || (px & 0xFF) > INK_THRESHOLD
}

/// Distance from `p` to the segment `a`→`b`.
fn dist_to_segment(p: Point, a: Point, b: Point) -> f32 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len2 = dx * dx + dy * dy;
    let t = if len2 <= f32::EPSILON {
        0.0
    } else {
        (((p.x - a.x) * dx + (p.y - a.y) * dy) / len2).clamp(0.0, 1.0)
    };
    let (cx, cy) = (a.x + t * dx, a.y + t * dy);
    let (ex, ey) = (p.x - cx, p.y - cy);
    (ex * ex + ey * ey).sqrt()
}

/// Stamp an anti-aliased segment of the given width onto the canvas.
///
/// Coverage is distance-based: full color within half the width of the
/// center line, fading out over one pixel at the rim. Crossing strokes take
/// the per-channel max so overlaps don't darken.
fn stroke_segment(canvas: &mut FrameBuffer, a: Point, b: Point, color: u32, width: f32) {
    let half = width * 0.5;
    let pad = half.ceil() as i32 + 1;

    let x0 = ((a.x.min(b.x)).floor() as i32 - pad).max(0);
    let x1 = ((a.x.max(b.x)).ceil() as i32 + pad).min(canvas.width as i32 - 1);
    let y0 = ((a.y.min(b.y)).floor() as i32 - pad).max(0);
    let y1 = ((a.y.max(b.y)).ceil() as i32 + pad).min(canvas.height as i32 - 1);

    let (cr, cg, cb) = (
        ((color >> 16) & 0xFF) as f32,
        ((color >> 8) & 0xFF) as f32,
        (color & 0xFF) as f32,
    );

    for y in y0..=y1 {
        for x in x0..=x1 {
            let d = dist_to_segment(Point::new(x as f32, y as f32), a, b);
            let cov = (half + 0.5 - d).clamp(0.0, 1.0);
            if cov <= 0.0 {
                continue;
            }
            let idx = y as usize * canvas.width + x as usize;
            let old = canvas.pixels[idx];
            let nr = ((cr * cov) as u32).max((old >> 16) & 0xFF);
            let ng = ((cg * cov) as u32).max((old >> 8) & 0xFF);
            let nb = ((cb * cov) as u32).max(old & 0xFF);
            canvas.pixels[idx] = (nr << 16) | (ng << 8) | nb;
        }
    }
}

/// Hard-edged filled circle, used by the eraser. Unconditional overwrite:
/// erasing is destructive and has no undo.
fn fill_circle(canvas: &mut FrameBuffer, center: Point, radius: i32, color: u32) {
    let r2 = (radius * radius) as f32;
    let cx = center.x.round() as i32;
    let cy = center.y.round() as i32;

    let x0 = (cx - radius).max(0);
    let x1 = (cx + radius).min(canvas.width as i32 - 1);
    let y0 = (cy - radius).max(0);
    let y1 = (cy + radius).min(canvas.height as i32 - 1);

    for y in y0..=y1 {
        for x in x0..=x1 {
            let (dx, dy) = ((x - cx) as f32, (y - cy) as f32);
            if dx * dx + dy * dy <= r2 {
                canvas.pixels[y as usize * canvas.width + x as usize] = color;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    const W: usize = 320;
    const H: usize = 240;

    fn session() -> PaintSession {
        PaintSession::new(&Config::default())
    }

    fn step(s: &mut PaintSession, mode: Mode, tip: Point) -> Option<Cursor> {
        // Anchor only matters for Erase; reuse the tip elsewhere.
        s.apply(mode, tip, tip, W, H)
    }

    #[test]
    fn non_draw_modes_reset_continuity() {
        for mode in [Mode::Hover, Mode::Erase, Mode::Idle] {
            let mut s = session();
            step(&mut s, Mode::Draw, Point::new(50.0, 50.0));
            step(&mut s, Mode::Draw, Point::new(80.0, 60.0));
            assert!(s.pen().is_some());
            step(&mut s, mode, Point::new(90.0, 70.0));
            assert_eq!(s.pen(), None, "{mode:?} must lift the pen");
        }
    }

    #[test]
    fn consecutive_draw_frames_connect() {
        let mut s = session();
        let a = Point::new(100.0, 100.0);
        let b = Point::new(150.0, 120.0);
        step(&mut s, Mode::Draw, a);
        step(&mut s, Mode::Draw, b);
        // The midpoint of A→B must be covered by the segment.
        assert!(s.ink_at(125, 110));
        assert!(s.ink_at(100, 100));
        assert!(s.ink_at(150, 120));
    }

    #[test]
    fn hover_gap_breaks_the_stroke() {
        let mut s = session();
        let a = Point::new(40.0, 40.0);
        let b = Point::new(200.0, 40.0);
        step(&mut s, Mode::Draw, a);
        step(&mut s, Mode::Hover, Point::new(120.0, 40.0));
        step(&mut s, Mode::Draw, b);
        // A and B each got a dot from their own stroke start, but nothing
        // connects them across the hover gap.
        assert!(!s.ink_at(120, 40));
    }

    #[test]
    fn first_draw_frame_does_not_line_in_from_anywhere() {
        let mut s = session();
        step(&mut s, Mode::Draw, Point::new(200.0, 200.0));
        // No spurious segment from some stale origin.
        assert!(!s.ink_at(100, 100));
        assert!(!s.ink_at(0, 0));
    }

    #[test]
    fn erase_is_destructive_inside_the_circle() {
        let mut s = session();
        step(&mut s, Mode::Draw, Point::new(20.0, 100.0));
        step(&mut s, Mode::Draw, Point::new(220.0, 100.0));
        assert!(s.ink_at(120, 100));

        // Erase circle centered on the line, radius 60 (Config default).
        s.apply(
            Mode::Erase,
            Point::new(120.0, 100.0),
            Point::new(120.0, 100.0),
            W,
            H,
        );
        // Everything within the radius is background again...
        assert!(!s.ink_at(120, 100));
        assert!(!s.ink_at(120 - 55, 100));
        assert!(!s.ink_at(120 + 55, 100));
        // ...while ink outside the circle survives.
        assert!(s.ink_at(40, 100));
        assert!(s.ink_at(200, 100));
    }

    #[test]
    fn draw_then_erase_scenario() {
        // End to end: draw (100,100)→(150,120), then erase at
        // (120,110) radius 60, which covers the whole segment.
        let mut s = session();
        step(&mut s, Mode::Draw, Point::new(100.0, 100.0));
        step(&mut s, Mode::Draw, Point::new(150.0, 120.0));
        assert!(s.ink_at(125, 110));

        s.apply(
            Mode::Erase,
            Point::new(150.0, 120.0),
            Point::new(120.0, 110.0),
            W,
            H,
        );
        for (x, y) in [(100, 100), (125, 110), (150, 120)] {
            assert!(!s.ink_at(x, y), "ink left at ({x},{y})");
        }
    }

    #[test]
    fn cursor_directives_per_mode() {
        let mut s = session();
        let tip = Point::new(50.0, 50.0);
        let anchor = Point::new(70.0, 90.0);

        let c = s.apply(Mode::Draw, tip, anchor, W, H).unwrap();
        assert_eq!((c.style, c.center, c.radius), (CursorStyle::Filled, tip, 8));

        let c = s.apply(Mode::Hover, tip, anchor, W, H).unwrap();
        assert_eq!((c.style, c.center), (CursorStyle::Outline, tip));

        let c = s.apply(Mode::Erase, tip, anchor, W, H).unwrap();
        assert_eq!((c.style, c.center, c.radius), (CursorStyle::Outline, anchor, 60));
        assert_eq!(c.color, 0x00FFFFFF);

        assert!(s.apply(Mode::Idle, tip, anchor, W, H).is_none());
    }

    #[test]
    fn canvas_allocates_lazily_at_frame_size() {
        let mut s = session();
        assert!(s.canvas.is_none());
        s.apply(Mode::Idle, Point::default(), Point::default(), 64, 48);
        let canvas = s.canvas.as_ref().unwrap();
        assert_eq!((canvas.width, canvas.height), (64, 48));
    }

    #[test]
    fn composite_replaces_ink_pixels_only() {
        let mut s = session();
        step(&mut s, Mode::Draw, Point::new(10.0, 10.0));
        step(&mut s, Mode::Draw, Point::new(30.0, 10.0));

        let mut frame = FrameBuffer {
            width: W,
            height: H,
            pixels: vec![0x00112233; W * H],
        };
        s.composite_over(&mut frame);

        // On the stroke: the canvas pixel, verbatim.
        assert_eq!(frame.pixels[10 * W + 20], 0x00FF0000);
        // Far away: the live frame shines through untouched.
        assert_eq!(frame.pixels[200 * W + 200], 0x00112233);
    }

    #[test]
    fn sub_threshold_canvas_pixels_are_not_ink() {
        assert!(!is_ink(0x00000000));
        assert!(!is_ink(0x00321932)); // every channel at or below 50
        assert!(is_ink(0x00330000)); // one channel just above
        assert!(is_ink(0x00FF0000));
    }
}
