// Process-level configuration. Fixed constants in this version; gathered in
// one struct so the loop, the classifier and the paint engine all read from
// the same place instead of scattered magic numbers.

/// Which finger pattern counts as Draw mode.
///
/// The predicate went through two versions: an early "index up, middle down"
/// shortcut, and the final exact [0,1,0,0,0] match. Both are kept selectable;
/// `Strict` is the default and what the key bindings in the HUD describe.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawRule {
    /// Draw only on the exact vector [thumb=0, index=1, middle=0, ring=0, pinky=0].
    Strict,
    /// Draw whenever the index is up and the middle is down, ignoring the
    /// thumb, ring and pinky. Hover/Erase exact matches still win first.
    IndexUpMiddleDown,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub camera_index: u32,
    pub capture_width: u32,    // requested; the stream may pick a close match
    pub capture_height: u32,
    pub capture_fps: u32,

    pub stroke_color: u32,     // 0x00RRGGBB
    pub stroke_width: f32,     // pixels
    pub eraser_radius: i32,    // pixels
    pub cursor_radius: i32,    // draw/hover cursor size, pixels

    pub draw_rule: DrawRule,

    pub max_hands: usize,              // 1 for the painter
    pub min_detection_confidence: f32,
    pub min_tracking_confidence: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            camera_index: 0,
            capture_width: 1280,
            capture_height: 720,
            capture_fps: 60,

            stroke_color: 0x00FF0000, // red
            stroke_width: 5.0,
            eraser_radius: 60,
            cursor_radius: 8,

            draw_rule: DrawRule::Strict,

            max_hands: 1,
            min_detection_confidence: 0.85,
            min_tracking_confidence: 0.5,
        }
    }
}
