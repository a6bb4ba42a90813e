// Webcam air painter.
// What you SEE:
// • Live (mirrored) camera is always the base image.
// • Index finger alone: you draw red strokes in the air.
// • Thumb + index: pen up, a hollow cursor follows your fingertip.
// • Thumb + index + middle: a white ring erases around your palm.
// • Anything else (or no hand): nothing happens.
// • Q or closing the window quits.

mod camera;
mod config;
mod detector;
mod draw;
mod error;
mod gesture;
mod paint;
mod types;

use camera::CameraCapture;
use config::Config;
use detector::{HandDetector, landmarks};
use draw::{Drawer, darken_top_bar, draw_cursor, draw_hand_skeleton, draw_text_5x7};
use error::Error;
use gesture::{Mode, classify};
use paint::PaintSession;
use std::time::{Duration, Instant};
use types::Point;

const HUD_HINT: &str = "INDEX: DRAW | +THUMB: HOVER | +MIDDLE: ERASE | Q: QUIT";

fn main() -> Result<(), Error> {
    env_logger::init();
    let config = Config::default();

    /* --- Camera + window + detector setup ---
       Visual: window opens with the live mirrored camera feed. */
    let mut cam = CameraCapture::new(
        config.camera_index,
        config.capture_width,
        config.capture_height,
        config.capture_fps,
    )?;
    let (w, h) = cam.resolution();
    let mut drawer = Drawer::new("Hand Painter", w as usize, h as usize)?;
    let mut detector = HandDetector::new(&config)?;

    /* --- Paint session ---
       Canvas + pen continuity live here; allocated lazily on the first frame. */
    let mut session = PaintSession::new(&config);

    /* --- HUD / FPS --- */
    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;
    let mut hud_fps_text = String::from("FPS: 0.0");

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.quit_pressed() {
        /* 1) Grab a fresh frame and mirror it so the display acts like a mirror.
           The detector sees the mirrored frame too, so landmark coordinates
           line up with what ends up on screen. */
        let mut frame = cam.next_frame()?;
        frame.mirror_in_place();

        /* 2) Hand landmarks for this frame (empty vec = no hand = Idle). */
        let hands = detector.detect(&frame)?;

        /* 3) Classify and paint. One hand drives the painter; a missing or
           malformed hand just lifts the pen. */
        let mut cursor = None;
        let mut skeleton: Option<[Point; 21]> = None;
        let mut mode = Mode::Idle;
        if let Some(hand) = hands.first() {
            let handedness = hand.handedness;
            let points = hand.pixel_points(frame.width, frame.height);
            let gesture = classify(&points, handedness, config.draw_rule);
            mode = gesture.mode;
            log::debug!(
                "{handedness:?} ({:.2}) {:?} fingers {:?} -> {mode:?}",
                hand.confidence,
                gesture.orientation,
                gesture.fingers.map(u8::from),
            );

            cursor = session.apply(
                mode,
                points[landmarks::INDEX_FINGER_TIP],
                points[landmarks::MIDDLE_FINGER_MCP],
                frame.width,
                frame.height,
            );
            skeleton = Some(points);
        } else {
            session.pen_up();
        }

        /* 4) Composite the persistent canvas over the live frame.
           Visual: your strokes stay put while the video moves behind them. */
        session.composite_over(&mut frame);

        /* 5) Overlays: skeleton, cursor, top bar, HUD text. */
        if let Some(points) = &skeleton {
            draw_hand_skeleton(&mut frame, points);
        }
        if let Some(cursor) = &cursor {
            draw_cursor(&mut frame, cursor);
        }
        darken_top_bar(&mut frame, 50);
        let mode_tag = match mode {
            Mode::Draw => "DRAW",
            Mode::Hover => "HOVER",
            Mode::Erase => "ERASE",
            Mode::Idle => "IDLE",
        };
        let hud = format!("{mode_tag} | {HUD_HINT} | {hud_fps_text}");
        draw_text_5x7(&mut frame, 8, 8, &hud, 0x00FFFFFF);

        /* 6) Present to the window (this is when the on-screen image updates). */
        drawer.present(&frame)?;

        /* 7) FPS counter (logs + HUD refresh once per second). */
        frames_this_second += 1;
        let now = Instant::now();
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let secs = now.duration_since(last_fps_time).as_secs_f32();
            let fps = frames_this_second as f32 / secs;
            log::info!("FPS: {fps:.1}");
            hud_fps_text = format!("FPS: {fps:.1}");
            frames_this_second = 0;
            last_fps_time = now;
        }
    }

    log::info!("exiting");
    Ok(())
}
