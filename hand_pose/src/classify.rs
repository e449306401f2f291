//! Rule-based gesture classification.
//!
//! Pure and stateless.  Pinch is tested first and overrides everything else;
//! otherwise the four non-thumb fingers are counted as "up" when the tip is
//! above its MCP knuckle on screen.

use crate::landmarks::*;

/// Thumb-tip to index-tip distance (pixels) below which a hand is pinching.
pub const PINCH_THRESHOLD_PX: f32 = 40.0;

// ════════════════════════════════════════════════════════════════════════════
// Gesture
// ════════════════════════════════════════════════════════════════════════════

/// The five recognised hand gestures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Gesture {
    Pinch,
    Fist,
    OpenPalm,
    IndexOnly,
    Unknown,
}

impl Gesture {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gesture::Pinch     => "pinch",
            Gesture::Fist      => "fist",
            Gesture::OpenPalm  => "open_palm",
            Gesture::IndexOnly => "index_only",
            Gesture::Unknown   => "unknown",
        }
    }
}

impl std::fmt::Display for Gesture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Finger
// ════════════════════════════════════════════════════════════════════════════

/// The four fingers that take part in the up-count.  The thumb never does.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Finger {
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 4] = [Finger::Index, Finger::Middle, Finger::Ring, Finger::Pinky];

    /// `(tip, mcp)` landmark indices.
    pub fn joints(self) -> (usize, usize) {
        match self {
            Finger::Index  => (INDEX_TIP,  INDEX_MCP),
            Finger::Middle => (MIDDLE_TIP, MIDDLE_MCP),
            Finger::Ring   => (RING_TIP,   RING_MCP),
            Finger::Pinky  => (PINKY_TIP,  PINKY_MCP),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Measurements
// ════════════════════════════════════════════════════════════════════════════

/// Distance between thumb tip and index tip.
pub fn pinch_distance(pts: &LandmarkSet) -> f32 {
    pts.thumb_tip().distance(pts.index_tip())
}

/// Depth proxy: the same thumb–index distance.  A hand closer to the camera
/// spreads these further apart in pixels.
pub fn hand_depth(pts: &LandmarkSet) -> f32 {
    pinch_distance(pts)
}

/// A finger is up when its tip is strictly higher on screen than its MCP.
pub fn finger_is_up(pts: &LandmarkSet, finger: Finger) -> bool {
    let (tip, mcp) = finger.joints();
    pts[tip].y < pts[mcp].y
}

/// Classify a pixel-space hand.
pub fn classify(pts: &LandmarkSet) -> Gesture {
    if pinch_distance(pts) < PINCH_THRESHOLD_PX {
        return Gesture::Pinch;
    }

    let up_count = Finger::ALL.iter().filter(|&&f| finger_is_up(pts, f)).count();

    match up_count {
        4 => Gesture::OpenPalm,
        0 => Gesture::Fist,
        1 if finger_is_up(pts, Finger::Index) => Gesture::IndexOnly,
        _ => Gesture::Unknown,
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
