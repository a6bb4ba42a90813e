// External hand-landmark collaborator: MediaPipe, driven through a small
// Python subprocess. We pipe each raw RGB frame to its stdin and read one
// JSON line back with up to `max_hands` hands, each carrying 21 normalized
// landmarks plus a handedness label.
//
// Setup: python3 -m venv .venv && .venv/bin/pip install mediapipe numpy
// The bridge script lives at scripts/hand_detect.py.

use crate::config::Config;
use crate::error::Error;
use crate::gesture::Handedness;
use crate::types::{FrameBuffer, Point};
use serde::Deserialize;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdout, Command, Stdio};

/// Landmark indices (MediaPipe hand landmark model convention).
/// See: https://google.github.io/mediapipe/solutions/hands.html
#[allow(dead_code)]
pub mod landmarks {
    pub const WRIST: usize = 0;
    pub const THUMB_CMC: usize = 1;
    pub const THUMB_MCP: usize = 2;
    pub const THUMB_IP: usize = 3;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_FINGER_MCP: usize = 5;
    pub const INDEX_FINGER_PIP: usize = 6;
    pub const INDEX_FINGER_DIP: usize = 7;
    pub const INDEX_FINGER_TIP: usize = 8;
    pub const MIDDLE_FINGER_MCP: usize = 9;
    pub const MIDDLE_FINGER_PIP: usize = 10;
    pub const MIDDLE_FINGER_DIP: usize = 11;
    pub const MIDDLE_FINGER_TIP: usize = 12;
    pub const RING_FINGER_MCP: usize = 13;
    pub const RING_FINGER_PIP: usize = 14;
    pub const RING_FINGER_DIP: usize = 15;
    pub const RING_FINGER_TIP: usize = 16;
    pub const PINKY_MCP: usize = 17;
    pub const PINKY_PIP: usize = 18;
    pub const PINKY_DIP: usize = 19;
    pub const PINKY_TIP: usize = 20;
}

/// One landmark in normalized image coordinates (0..1 relative to the frame).
#[derive(Clone, Copy, Debug, Default)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    /// Depth relative to the wrist. Reported by the detector but not read
    /// by the classifier, which works in the 2D image plane.
    #[allow(dead_code)]
    pub z: f32,
}

/// One detected hand: all 21 landmarks plus what MediaPipe says about it.
#[derive(Clone, Debug)]
pub struct Hand {
    pub landmarks: [Landmark; 21],
    pub handedness: Handedness,
    pub confidence: f32,
}

impl Hand {
    /// Scale the normalized landmarks into window pixel coordinates.
    /// The classifier and the paint engine both work in pixel space.
    pub fn pixel_points(&self, width: usize, height: usize) -> [Point; 21] {
        let (w, h) = (width as f32, height as f32);
        let mut pts = [Point::default(); 21];
        for (p, lm) in pts.iter_mut().zip(self.landmarks.iter()) {
            *p = Point::new(lm.x * w, lm.y * h);
        }
        pts
    }
}

/// JSON structures for parsing the subprocess output.
#[derive(Deserialize, Debug)]
struct LandmarkJson {
    x: f32,
    y: f32,
    z: f32,
}

#[derive(Deserialize, Debug)]
struct HandJson {
    handedness: String,
    score: f32,
    landmarks: Vec<LandmarkJson>,
}

#[derive(Deserialize, Debug)]
struct DetectionJson {
    hands: Vec<HandJson>,
    #[serde(default)]
    error: Option<String>,
}

/// Owns the Python subprocess for the lifetime of the run.
pub struct HandDetector {
    process: Child,
    stdout_reader: BufReader<ChildStdout>,
}

impl HandDetector {
    /// Spawn the bridge script and wait for its READY handshake.
    pub fn new(config: &Config) -> Result<Self, Error> {
        let script = PathBuf::from("scripts/hand_detect.py");
        if !script.exists() {
            return Err(Error::DetectorInit(format!(
                "bridge script not found at {script:?}"
            )));
        }

        // Prefer a project-local venv; fall back to whatever python3 is around.
        let venv = PathBuf::from(".venv/bin/python");
        let python = if venv.exists() {
            venv
        } else {
            PathBuf::from("python3")
        };

        log::info!("starting MediaPipe hand detector subprocess ({python:?})");

        let mut process = Command::new(&python)
            .arg(&script)
            .arg(config.max_hands.to_string())
            .arg(config.min_detection_confidence.to_string())
            .arg(config.min_tracking_confidence.to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| Error::DetectorInit(format!("Spawn {python:?}: {e}")))?;

        let stdout = process
            .stdout
            .take()
            .ok_or_else(|| Error::DetectorInit("no stdout handle".into()))?;
        let mut stdout_reader = BufReader::new(stdout);

        // The script prints READY once the model is loaded.
        let mut ready = String::new();
        stdout_reader
            .read_line(&mut ready)
            .map_err(|e| Error::DetectorInit(format!("Read handshake: {e}")))?;
        if ready.trim() != "READY" {
            return Err(Error::DetectorInit(format!(
                "subprocess did not signal ready, got: {ready:?}"
            )));
        }

        log::info!("MediaPipe hand detector ready");

        Ok(Self {
            process,
            stdout_reader,
        })
    }

    /// Detect hands in one (already mirrored) frame.
    ///
    /// Returns every hand MediaPipe reports, already confidence-filtered by
    /// the subprocess. An empty vec means no hand this frame, which the loop
    /// treats as Idle. A malformed hand (≠ 21 landmarks) is logged and
    /// skipped rather than indexed out of range.
    pub fn detect(&mut self, frame: &FrameBuffer) -> Result<Vec<Hand>, Error> {
        // Header: width, height, channels as little-endian u32, then raw RGB.
        let stdin = self
            .process
            .stdin
            .as_mut()
            .ok_or_else(|| Error::DetectorFrame("no stdin handle".into()))?;

        let w = frame.width as u32;
        let h = frame.height as u32;
        stdin
            .write_all(&w.to_le_bytes())
            .and_then(|_| stdin.write_all(&h.to_le_bytes()))
            .and_then(|_| stdin.write_all(&3u32.to_le_bytes()))
            .map_err(|e| Error::DetectorFrame(format!("Write header: {e}")))?;

        // Unpack 0x00RRGGBB into the byte stream the script expects.
        let mut rgb = Vec::with_capacity(frame.pixels.len() * 3);
        for &px in &frame.pixels {
            rgb.push(((px >> 16) & 0xFF) as u8);
            rgb.push(((px >> 8) & 0xFF) as u8);
            rgb.push((px & 0xFF) as u8);
        }
        stdin
            .write_all(&rgb)
            .and_then(|_| stdin.flush())
            .map_err(|e| Error::DetectorFrame(format!("Write frame: {e}")))?;

        // One JSON line back per frame.
        let mut response = String::new();
        self.stdout_reader
            .read_line(&mut response)
            .map_err(|e| Error::DetectorFrame(format!("Read result: {e}")))?;

        let result: DetectionJson = serde_json::from_str(&response)
            .map_err(|e| Error::DetectorFrame(format!("Parse result: {e} in {response:?}")))?;

        if let Some(error) = result.error {
            log::warn!("detector error: {error}");
            return Ok(Vec::new());
        }

        let mut hands = Vec::with_capacity(result.hands.len());
        for hand in result.hands {
            if hand.landmarks.len() != 21 {
                log::warn!("expected 21 landmarks, got {}; skipping hand", hand.landmarks.len());
                continue;
            }
            let handedness = match hand.handedness.as_str() {
                "Left" => Handedness::Left,
                "Right" => Handedness::Right,
                other => {
                    log::warn!("unknown handedness label {other:?}; skipping hand");
                    continue;
                }
            };

            let mut lms = [Landmark::default(); 21];
            for (out, lm) in lms.iter_mut().zip(hand.landmarks.iter()) {
                *out = Landmark { x: lm.x, y: lm.y, z: lm.z };
            }

            log::debug!(
                "hand {:?} (confidence {:.2}), index tip at ({:.3}, {:.3})",
                handedness,
                hand.score,
                lms[landmarks::INDEX_FINGER_TIP].x,
                lms[landmarks::INDEX_FINGER_TIP].y,
            );

            hands.push(Hand {
                landmarks: lms,
                handedness,
                confidence: hand.score,
            });
        }

        Ok(hands)
    }
}

impl Drop for HandDetector {
    fn drop(&mut self) {
        // Kill the Python subprocess when the detector goes away.
        let _ = self.process.kill();
    }
}
