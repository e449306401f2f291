//! Hand sources: where each frame's tracked hands come from.
//!
//! The public interface is the [`HandSource`] trait, polled once per frame
//! by the main loop.  Consumers don't need to know whether hands came from
//! real hardware, a recording, or the keyboard puppet.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, TryRecvError};

use log::{info, warn};
use serde::{Deserialize, Serialize};

use alchemy_circle::circle::CENTER_LIFT_PX;
use hand_pose::landmarks::*;
use hand_pose::{Gesture, NormalizedLandmark, TrackedHand};

use crate::error::{AppError, Result};

// ════════════════════════════════════════════════════════════════════════════
// HandSource trait: unified interface for hw, replay and sim
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver one frame of tracked hands on demand.
pub trait HandSource {
    /// Hands visible this frame.  `Ok(None)` ends the session.
    fn next_frame(&mut self) -> Result<Option<Vec<TrackedHand>>>;

    fn name(&self) -> &'static str;
}

/// One frame as stored in a recording: a single JSON line.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    pub hands: Vec<TrackedHand>,
}

// ════════════════════════════════════════════════════════════════════════════
// Synthetic hands
// ════════════════════════════════════════════════════════════════════════════

/// Default thumb–index spread of a synthetic hand, pixels.
pub const DEFAULT_SPREAD: f32 = 85.0;
pub const SPREAD_MIN:     f32 = 40.0;
pub const SPREAD_MAX:     f32 = 160.0;
const SPREAD_STEP:        f32 = 5.0;

/// Build a full 21-point hand posed as `gesture` with its wrist at
/// `wrist` (pixels), then express it as tracker fractions of
/// `width × height`.
///
/// `spread` is the thumb–index distance used for every pose except
/// `Pinch`.  Right hands are drawn as the mirror image of left ones.
pub fn pose_hand(
    label:   &str,
    wrist:   (f32, f32),
    gesture: Gesture,
    spread:  f32,
    width:   u32,
    height:  u32,
) -> TrackedHand {
    let (wx, wy) = wrist;
    let side = if label.eq_ignore_ascii_case("right") { -1.0 } else { 1.0 };
    let mut px = [(wx, wy); LANDMARK_COUNT];

    let raised = |finger: usize| match gesture {
        Gesture::OpenPalm  => true,
        Gesture::IndexOnly => finger == 0,
        Gesture::Unknown   => finger < 2,
        _                  => false,
    };

    // index, middle, ring, pinky: MCP, PIP, DIP, TIP are consecutive indices
    for finger in 0..4 {
        let fx   = wx + side * (-30.0 + 20.0 * finger as f32);
        let base = INDEX_MCP + 4 * finger;
        let ys: [f32; 4] = if raised(finger) {
            [-90.0, -115.0, -138.0, -160.0]
        } else {
            [-90.0, -108.0, -92.0, -72.0]
        };
        for (j, dy) in ys.iter().enumerate() {
            px[base + j] = (fx, wy + dy);
        }
    }

    let index_tip = px[INDEX_TIP];
    let thumb_tip = if gesture == Gesture::Pinch {
        (index_tip.0 + 5.0, index_tip.1 + 5.0)
    } else {
        (index_tip.0 - side * spread.clamp(SPREAD_MIN, SPREAD_MAX), index_tip.1)
    };
    px[THUMB_CMC] = (wx - side * 25.0, wy - 25.0);
    px[THUMB_MCP] = (wx - side * 45.0, wy - 50.0);
    px[THUMB_IP]  = ((px[THUMB_MCP].0 + thumb_tip.0) / 2.0, (px[THUMB_MCP].1 + thumb_tip.1) / 2.0);
    px[THUMB_TIP] = thumb_tip;

    let (w, h) = (width.max(1) as f32, height.max(1) as f32);
    TrackedHand {
        label:     label.to_string(),
        landmarks: px.iter().map(|&(x, y)| NormalizedLandmark { x: x / w, y: y / h }).collect(),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SimHandSource: keyboard/mouse puppet (always available)
// ════════════════════════════════════════════════════════════════════════════

/// Raw input event from the simulation window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SimInput {
    /// Mouse position in window pixels.
    Pointer { x: f32, y: f32 },
    KeyDown(SimKey),
}

/// Simulated key codes (mapped from minifb Key).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimKey {
    SelectLeft,    // 1
    SelectRight,   // 2
    ToggleHand,    // H
    Pinch,         // P
    Fist,          // F
    OpenPalm,      // O
    IndexOnly,     // I
    Relax,         // U
    SpreadWider,   // Up
    SpreadNarrower,// Down
    Quit,          // Esc / Q
}

#[derive(Clone, Copy, Debug)]
struct SimHand {
    label:   &'static str,
    visible: bool,
    wrist:   (f32, f32),
    pose:    Gesture,
    spread:  f32,
}

/// Puppet hands driven by [`SimInput`] events from the window.
///
/// The pointer places the selected hand so its circle sits under the
/// cursor; pose keys change its gesture.  Input is drained synchronously on
/// every poll.
pub struct SimHandSource {
    rx:       Receiver<SimInput>,
    width:    u32,
    height:   u32,
    hands:    [SimHand; 2],
    selected: usize,
    quit:     bool,
}

impl SimHandSource {
    /// Starts with the left hand visible and relaxed at frame centre.
    pub fn new(rx: Receiver<SimInput>, width: u32, height: u32) -> Self {
        let centre = (width as f32 / 2.0, height as f32 / 2.0 + CENTER_LIFT_PX);
        let hand = |label, visible| SimHand {
            label, visible, wrist: centre, pose: Gesture::Unknown, spread: DEFAULT_SPREAD,
        };
        SimHandSource {
            rx, width, height,
            hands:    [hand("Left", true), hand("Right", false)],
            selected: 0,
            quit:     false,
        }
    }

    pub fn apply(&mut self, input: SimInput) {
        let hand = &mut self.hands[self.selected];
        match input {
            SimInput::Pointer { x, y } => hand.wrist = (x, y + CENTER_LIFT_PX),
            SimInput::KeyDown(key) => match key {
                SimKey::SelectLeft     => self.selected = 0,
                SimKey::SelectRight    => self.selected = 1,
                SimKey::ToggleHand     => hand.visible = !hand.visible,
                SimKey::Pinch          => hand.pose = Gesture::Pinch,
                SimKey::Fist           => hand.pose = Gesture::Fist,
                SimKey::OpenPalm       => hand.pose = Gesture::OpenPalm,
                SimKey::IndexOnly      => hand.pose = Gesture::IndexOnly,
                SimKey::Relax          => hand.pose = Gesture::Unknown,
                SimKey::SpreadWider    => hand.spread = (hand.spread + SPREAD_STEP).min(SPREAD_MAX),
                SimKey::SpreadNarrower => hand.spread = (hand.spread - SPREAD_STEP).max(SPREAD_MIN),
                SimKey::Quit           => self.quit = true,
            },
        }
    }
}

impl HandSource for SimHandSource {
    fn next_frame(&mut self) -> Result<Option<Vec<TrackedHand>>> {
        loop {
            match self.rx.try_recv() {
                Ok(input)                       => self.apply(input),
                Err(TryRecvError::Empty)        => break,
                Err(TryRecvError::Disconnected) => { self.quit = true; break; }
            }
        }
        if self.quit {
            return Ok(None);
        }
        Ok(Some(
            self.hands.iter()
                .filter(|h| h.visible)
                .map(|h| pose_hand(h.label, h.wrist, h.pose, h.spread, self.width, self.height))
                .collect(),
        ))
    }

    fn name(&self) -> &'static str { "simulation" }
}

// ════════════════════════════════════════════════════════════════════════════
// ReplayHandSource: recorded JSON lines
// ════════════════════════════════════════════════════════════════════════════

/// Plays back a file written by [`FrameRecorder`], one frame per poll.
pub struct ReplayHandSource {
    frames:  Vec<FrameRecord>,
    cursor:  usize,
    looping: bool,
}

impl ReplayHandSource {
    /// Read and parse the whole recording.  Blank lines are skipped.
    pub fn open(path: &Path, looping: bool) -> Result<Self> {
        let file = File::open(path).map_err(|source| AppError::ReplayOpen {
            path: path.to_path_buf(),
            source,
        })?;
        let mut frames = Vec::new();
        for (i, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let frame = serde_json::from_str(&line).map_err(|source| AppError::ReplayParse {
                path: path.to_path_buf(),
                line: i + 1,
                source,
            })?;
            frames.push(frame);
        }
        info!("replay: {} frames from {}", frames.len(), path.display());
        Ok(Self::from_frames(frames, looping))
    }

    pub fn from_frames(frames: Vec<FrameRecord>, looping: bool) -> Self {
        ReplayHandSource { frames, cursor: 0, looping }
    }

    pub fn len(&self) -> usize { self.frames.len() }
    pub fn is_empty(&self) -> bool { self.frames.is_empty() }
}

impl HandSource for ReplayHandSource {
    fn next_frame(&mut self) -> Result<Option<Vec<TrackedHand>>> {
        if self.cursor >= self.frames.len() {
            if !self.looping || self.frames.is_empty() {
                return Ok(None);
            }
            self.cursor = 0;
        }
        let hands = self.frames[self.cursor].hands.clone();
        self.cursor += 1;
        Ok(Some(hands))
    }

    fn name(&self) -> &'static str { "replay" }
}

// ════════════════════════════════════════════════════════════════════════════
// FrameRecorder
// ════════════════════════════════════════════════════════════════════════════

/// Appends every frame's hands to a JSON-lines file.
pub struct FrameRecorder {
    path:   PathBuf,
    out:    BufWriter<File>,
    frames: usize,
}

impl FrameRecorder {
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path).map_err(|source| AppError::Record {
            path: path.to_path_buf(),
            source,
        })?;
        info!("recording frames to {}", path.display());
        Ok(FrameRecorder { path: path.to_path_buf(), out: BufWriter::new(file), frames: 0 })
    }

    pub fn record(&mut self, hands: &[TrackedHand]) -> Result<()> {
        #[derive(Serialize)]
        struct Borrowed<'a> { hands: &'a [TrackedHand] }

        serde_json::to_writer(&mut self.out, &Borrowed { hands })
            .map_err(std::io::Error::from)
            .and_then(|_| writeln!(self.out))
            .map_err(|source| AppError::Record { path: self.path.clone(), source })?;
        self.frames += 1;
        Ok(())
    }

    /// Flush and close.  Returns the number of frames written.
    pub fn finish(mut self) -> Result<usize> {
        self.out.flush().map_err(|source| AppError::Record { path: self.path.clone(), source })?;
        info!("recorded {} frames to {}", self.frames, self.path.display());
        Ok(self.frames)
    }
}

/// Drop malformed hands from a frame, logging each one.  Wrong landmark
/// counts and non-finite or far off-frame coordinates are both rejected.
pub fn well_formed(hands: Vec<TrackedHand>) -> Vec<TrackedHand> {
    hands.into_iter()
        .filter(|h| match h.defect() {
            Some(defect) => {
                warn!("dropping '{}' hand: {}", h.label, defect);
                false
            }
            None => true,
        })
        .collect()
}

// ════════════════════════════════════════════════════════════════════════════
// LeapHandSource: real hardware (feature = "leap")
// ════════════════════════════════════════════════════════════════════════════

/// Hand source backed by a real LeapMotion controller.
///
/// Requires the `leap` feature flag and the LeapC shared library installed.
///
/// # Projection
///
/// Leap joints are millimetres above the device.  Each joint's `(x, y)` is
/// mapped onto frame fractions with `nx = (x + 200) / 400` and
/// `ny = 1 − (y − 50) / 400`, so a hand 250 mm above the centre of the
/// device lands mid-frame.  The wrist is the base of the middle
/// metacarpal; the thumb uses its proximal, intermediate and distal bones.
#[cfg(feature = "leap")]
pub struct LeapHandSource {
    connection: leaprs::Connection,
    last:       Vec<TrackedHand>,
}

#[cfg(feature = "leap")]
impl LeapHandSource {
    const POLL_MS: u32 = 30;

    pub fn open() -> Result<Self> {
        use leaprs::*;
        let mut connection = Connection::create(ConnectionConfig::default())
            .map_err(|e| AppError::Tracker(format!("cannot create LeapC connection: {:?}", e)))?;
        connection.open()
            .map_err(|e| AppError::Tracker(format!("cannot open LeapMotion device: {:?}", e)))?;
        info!("LeapMotion connection open");
        Ok(LeapHandSource { connection, last: Vec::new() })
    }
}

#[cfg(feature = "leap")]
impl HandSource for LeapHandSource {
    /// Returns the latest tracking frame; repeats the previous one when the
    /// poll yields some other event.
    fn next_frame(&mut self) -> Result<Option<Vec<TrackedHand>>> {
        use leaprs::*;
        match self.connection.poll(Self::POLL_MS) {
            Ok(msg) => {
                if let Event::Tracking(frame) = msg.event() {
                    self.last = frame.hands().filter_map(|h| leap_hand(&h)).collect();
                }
            }
            Err(e) => log::debug!("leap poll: {:?}", e),
        }
        Ok(Some(self.last.clone()))
    }

    fn name(&self) -> &'static str { "leap" }
}

#[cfg(feature = "leap")]
fn leap_project(x: f32, y: f32) -> NormalizedLandmark {
    NormalizedLandmark { x: (x + 200.0) / 400.0, y: 1.0 - (y - 50.0) / 400.0 }
}

#[cfg(feature = "leap")]
fn leap_hand(hand: &leaprs::Hand) -> Option<TrackedHand> {
    let digits: Vec<_> = hand.digits().collect();
    if digits.len() < 5 { return None; }

    let mut pts = [NormalizedLandmark::default(); LANDMARK_COUNT];
    let w = digits[2].metacarpal().prev_joint();
    pts[WRIST] = leap_project(w.x, w.y);

    let thumb = &digits[0];
    let joints = [
        thumb.proximal().prev_joint(),
        thumb.intermediate().prev_joint(),
        thumb.distal().prev_joint(),
        thumb.distal().next_joint(),
    ];
    for (j, p) in joints.iter().enumerate() {
        pts[THUMB_CMC + j] = leap_project(p.x, p.y);
    }

    for (f, digit) in digits[1..5].iter().enumerate() {
        let joints = [
            digit.proximal().prev_joint(),
            digit.intermediate().prev_joint(),
            digit.distal().prev_joint(),
            digit.distal().next_joint(),
        ];
        for (j, p) in joints.iter().enumerate() {
            pts[INDEX_MCP + 4 * f + j] = leap_project(p.x, p.y);
        }
    }

    let label = if hand.hand_type() == leaprs::HandType::Left { "Left" } else { "Right" };
    Some(TrackedHand::new(label, pts))
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
