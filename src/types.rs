// Core types shared by every module.

#[derive(Clone)]
pub struct FrameBuffer {
    pub width: usize,      // how wide the frame is on screen (pixels)
    pub height: usize,     // how tall the frame is on screen (pixels)
    pub pixels: Vec<u32>,  // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    /// Allocate an all-black buffer. Visual: nothing until someone draws into it.
    pub fn black(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![0u32; width * height] }
    }

    /// Mirror the image left↔right in place.
    /// Visual: the feed behaves like a mirror — raise your right hand and the
    /// hand on the right side of the window goes up. The detector runs on the
    /// mirrored frame, so its landmarks line up with what is on screen.
    pub fn mirror_in_place(&mut self) {
        for row in self.pixels.chunks_mut(self.width) {
            row.reverse();
        }
    }
}

/// A 2D position in window pixel coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}
