// Gesture classification: 21 landmark positions + a handedness label in,
// a discrete interaction mode out. Pure functions, no state, evaluated
// fresh every frame.
//
// The tricky part is the thumb. The four long fingers extend vertically, so
// "tip above the joint two back" works regardless of which hand it is or
// which way it faces. The thumb travels sideways, and the direction of that
// travel as seen by the (mirrored) camera flips with handedness AND with
// palm/back orientation — coupled, not independent — so we first decide the
// orientation and then pick the comparison direction from both together.

use crate::config::DrawRule;
use crate::detector::landmarks as lm;
use crate::types::Point;

/// Which hand the detector says this is. Trusted as-is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Handedness {
    Left,
    Right,
}

/// Whether the palm or the back of the hand faces the camera.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    Palm,
    Back,
}

/// The discrete application behavior selected by the finger vector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Draw,
    Hover,
    Erase,
    Idle,
}

/// Everything the classifier derives for one hand on one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Gesture {
    pub orientation: Orientation,
    /// Extension flags in [thumb, index, middle, ring, pinky] order.
    pub fingers: [bool; 5],
    pub mode: Mode,
}

/// Palm or back? Compare the x of the index base (5) against the pinky base
/// (17). These two landmarks are stable — they don't move when fingers curl —
/// and after the mirror flip their left/right ordering tracks which side of
/// the hand faces the camera. For a Right hand, Palm ⇔ index base is left of
/// the pinky base; for a Left hand the inequality reverses.
pub fn orientation(points: &[Point; 21], handedness: Handedness) -> Orientation {
    let index_base = points[lm::INDEX_FINGER_MCP].x;
    let pinky_base = points[lm::PINKY_MCP].x;
    let palm = match handedness {
        Handedness::Right => index_base < pinky_base,
        Handedness::Left => index_base > pinky_base,
    };
    if palm { Orientation::Palm } else { Orientation::Back }
}

/// Is the thumb extended? Tip (4) vs. proximal joint (3), on the x axis.
/// (Right, Palm) and (Left, Back) see the extended thumb to the LEFT of its
/// joint; the other two combinations see it to the RIGHT.
fn thumb_extended(points: &[Point; 21], handedness: Handedness, orientation: Orientation) -> bool {
    let tip = points[lm::THUMB_TIP].x;
    let joint = points[lm::THUMB_IP].x;
    match (handedness, orientation) {
        (Handedness::Right, Orientation::Palm) | (Handedness::Left, Orientation::Back) => {
            tip < joint
        }
        (Handedness::Right, Orientation::Back) | (Handedness::Left, Orientation::Palm) => {
            tip > joint
        }
    }
}

/// The extension vector for all five fingers.
/// Index/middle/ring/pinky: extended ⇔ tip is above (smaller y than) the
/// joint two landmarks back in the same finger chain. No handedness or
/// orientation dependence for those four.
pub fn finger_extensions(
    points: &[Point; 21],
    handedness: Handedness,
    orientation: Orientation,
) -> [bool; 5] {
    const FINGER_TIPS: [usize; 4] = [
        lm::INDEX_FINGER_TIP,
        lm::MIDDLE_FINGER_TIP,
        lm::RING_FINGER_TIP,
        lm::PINKY_TIP,
    ];

    let mut fingers = [false; 5];
    fingers[0] = thumb_extended(points, handedness, orientation);
    for (slot, &tip) in fingers[1..].iter_mut().zip(FINGER_TIPS.iter()) {
        *slot = points[tip].y < points[tip - 2].y;
    }
    fingers
}

/// Map a finger vector to a mode, in priority order.
///
/// Hover and Erase are exact matches and are checked before Draw, so that
/// under the relaxed rule ("index up, middle down") raising the thumb still
/// lifts the pen instead of drawing. Anything unrecognized falls through to
/// Idle — never to Draw, so an ambiguous pose can't leave accidental ink.
pub fn mode_for(fingers: [bool; 5], rule: DrawRule) -> Mode {
    match fingers {
        [true, true, false, false, false] => Mode::Hover,
        [true, true, true, false, false] => Mode::Erase,
        [false, true, false, false, false] => Mode::Draw,
        [_, true, false, _, _] if rule == DrawRule::IndexUpMiddleDown => Mode::Draw,
        _ => Mode::Idle,
    }
}

/// Full classification for one hand on one frame. Pure and deterministic:
/// the same landmarks always give the same gesture.
pub fn classify(points: &[Point; 21], handedness: Handedness, rule: DrawRule) -> Gesture {
    let orientation = orientation(points, handedness);
    let fingers = finger_extensions(points, handedness, orientation);
    Gesture {
        orientation,
        fingers,
        mode: mode_for(fingers, rule),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A synthetic hand with every landmark at (100, 100). Tests move the
    /// few landmarks each rule actually reads.
    fn flat_hand() -> [Point; 21] {
        [Point::new(100.0, 100.0); 21]
    }

    /// Place the index/pinky bases so the hand reads as the wanted orientation.
    fn set_orientation(points: &mut [Point; 21], handedness: Handedness, o: Orientation) {
        let (index_x, pinky_x) = match (handedness, o) {
            (Handedness::Right, Orientation::Palm) => (80.0, 120.0),
            (Handedness::Right, Orientation::Back) => (120.0, 80.0),
            (Handedness::Left, Orientation::Palm) => (120.0, 80.0),
            (Handedness::Left, Orientation::Back) => (80.0, 120.0),
        };
        points[lm::INDEX_FINGER_MCP].x = index_x;
        points[lm::PINKY_MCP].x = pinky_x;
    }

    #[test]
    fn orientation_follows_base_ordering() {
        for handedness in [Handedness::Left, Handedness::Right] {
            for o in [Orientation::Palm, Orientation::Back] {
                let mut points = flat_hand();
                set_orientation(&mut points, handedness, o);
                assert_eq!(orientation(&points, handedness), o, "{handedness:?}");
            }
        }
    }

    #[test]
    fn thumb_rule_direction_per_handedness_and_orientation() {
        // (handedness, orientation, tip left of joint) → extended?
        let cases = [
            (Handedness::Right, Orientation::Palm, true, true),
            (Handedness::Right, Orientation::Palm, false, false),
            (Handedness::Left, Orientation::Back, true, true),
            (Handedness::Left, Orientation::Back, false, false),
            (Handedness::Right, Orientation::Back, true, false),
            (Handedness::Right, Orientation::Back, false, true),
            (Handedness::Left, Orientation::Palm, true, false),
            (Handedness::Left, Orientation::Palm, false, true),
        ];
        for (handedness, o, tip_left, expect) in cases {
            let mut points = flat_hand();
            set_orientation(&mut points, handedness, o);
            points[lm::THUMB_IP].x = 100.0;
            points[lm::THUMB_TIP].x = if tip_left { 60.0 } else { 140.0 };
            assert_eq!(
                thumb_extended(&points, handedness, o),
                expect,
                "{handedness:?} {o:?} tip_left={tip_left}"
            );
        }
    }

    #[test]
    fn long_fingers_ignore_handedness_and_orientation() {
        // Randomized tip/joint y pairs: extension must equal tip.y < joint.y
        // for every finger under every handedness × orientation combination.
        let tips = [
            lm::INDEX_FINGER_TIP,
            lm::MIDDLE_FINGER_TIP,
            lm::RING_FINGER_TIP,
            lm::PINKY_TIP,
        ];
        fastrand::seed(7);
        for _ in 0..200 {
            let mut points = flat_hand();
            let mut expect = [false; 4];
            for (i, &tip) in tips.iter().enumerate() {
                let tip_y = fastrand::f32() * 400.0;
                let joint_y = fastrand::f32() * 400.0;
                points[tip].y = tip_y;
                points[tip - 2].y = joint_y;
                expect[i] = tip_y < joint_y;
            }
            for handedness in [Handedness::Left, Handedness::Right] {
                for o in [Orientation::Palm, Orientation::Back] {
                    let fingers = finger_extensions(&points, handedness, o);
                    assert_eq!(&fingers[1..], &expect[..], "{handedness:?} {o:?}");
                }
            }
        }
    }

    #[test]
    fn classification_is_idempotent() {
        let mut points = flat_hand();
        set_orientation(&mut points, Handedness::Right, Orientation::Palm);
        points[lm::INDEX_FINGER_TIP].y = 40.0; // index up
        let first = classify(&points, Handedness::Right, DrawRule::Strict);
        let second = classify(&points, Handedness::Right, DrawRule::Strict);
        assert_eq!(first, second);
    }

    #[test]
    fn mode_mapping_strict() {
        assert_eq!(mode_for([false, true, false, false, false], DrawRule::Strict), Mode::Draw);
        assert_eq!(mode_for([true, true, false, false, false], DrawRule::Strict), Mode::Hover);
        assert_eq!(mode_for([true, true, true, false, false], DrawRule::Strict), Mode::Erase);
        // Strict ignores nothing: index plus any stray finger is Idle.
        assert_eq!(mode_for([false, true, false, true, false], DrawRule::Strict), Mode::Idle);
        assert_eq!(mode_for([false, true, false, false, true], DrawRule::Strict), Mode::Idle);
        assert_eq!(mode_for([true, true, true, true, true], DrawRule::Strict), Mode::Idle);
        assert_eq!(mode_for([false, false, false, false, false], DrawRule::Strict), Mode::Idle);
    }

    #[test]
    fn thumb_and_index_is_hover_never_draw() {
        // The strict rule must not treat [1,1,0,0,0] as "index is up, draw".
        for rule in [DrawRule::Strict, DrawRule::IndexUpMiddleDown] {
            assert_eq!(mode_for([true, true, false, false, false], rule), Mode::Hover);
        }
    }

    #[test]
    fn mode_mapping_relaxed_rule() {
        let rule = DrawRule::IndexUpMiddleDown;
        // Ring/pinky up no longer block drawing...
        assert_eq!(mode_for([false, true, false, true, false], rule), Mode::Draw);
        assert_eq!(mode_for([false, true, false, false, true], rule), Mode::Draw);
        // ...but a raised middle finger still does.
        assert_eq!(mode_for([false, true, true, false, false], rule), Mode::Idle);
        // Exact hover/erase poses keep their meaning.
        assert_eq!(mode_for([true, true, false, false, false], rule), Mode::Hover);
        assert_eq!(mode_for([true, true, true, false, false], rule), Mode::Erase);
    }

    #[test]
    fn fist_is_idle() {
        let mut points = flat_hand();
        set_orientation(&mut points, Handedness::Left, Orientation::Back);
        // All tips below their joints, thumb tucked.
        for tip in [
            lm::INDEX_FINGER_TIP,
            lm::MIDDLE_FINGER_TIP,
            lm::RING_FINGER_TIP,
            lm::PINKY_TIP,
        ] {
            points[tip].y = 160.0;
            points[tip - 2].y = 120.0;
        }
        points[lm::THUMB_TIP].x = 100.0;
        points[lm::THUMB_IP].x = 100.0;
        let g = classify(&points, Handedness::Left, DrawRule::Strict);
        assert_eq!(g.mode, Mode::Idle);
    }
}
