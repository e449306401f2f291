//! Landmark types, index constants, and the normaliser.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Index;

/// Number of landmarks per tracked hand.
pub const LANDMARK_COUNT: usize = 21;

// ════════════════════════════════════════════════════════════════════════════
// Anatomical indices
// ════════════════════════════════════════════════════════════════════════════

pub const WRIST:      usize = 0;
pub const THUMB_CMC:  usize = 1;
pub const THUMB_MCP:  usize = 2;
pub const THUMB_IP:   usize = 3;
pub const THUMB_TIP:  usize = 4;
pub const INDEX_MCP:  usize = 5;
pub const INDEX_PIP:  usize = 6;
pub const INDEX_DIP:  usize = 7;
pub const INDEX_TIP:  usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP:   usize = 13;
pub const RING_PIP:   usize = 14;
pub const RING_DIP:   usize = 15;
pub const RING_TIP:   usize = 16;
pub const PINKY_MCP:  usize = 17;
pub const PINKY_PIP:  usize = 18;
pub const PINKY_DIP:  usize = 19;
pub const PINKY_TIP:  usize = 20;

/// Skeleton edges between landmarks, for drawing the tracked hand.
pub const HAND_CONNECTIONS: [(usize, usize); 21] = [
    // thumb
    (WRIST, THUMB_CMC), (THUMB_CMC, THUMB_MCP), (THUMB_MCP, THUMB_IP), (THUMB_IP, THUMB_TIP),
    // index
    (WRIST, INDEX_MCP), (INDEX_MCP, INDEX_PIP), (INDEX_PIP, INDEX_DIP), (INDEX_DIP, INDEX_TIP),
    // middle
    (MIDDLE_MCP, MIDDLE_PIP), (MIDDLE_PIP, MIDDLE_DIP), (MIDDLE_DIP, MIDDLE_TIP),
    // ring
    (RING_MCP, RING_PIP), (RING_PIP, RING_DIP), (RING_DIP, RING_TIP),
    // pinky
    (WRIST, PINKY_MCP), (PINKY_MCP, PINKY_PIP), (PINKY_PIP, PINKY_DIP), (PINKY_DIP, PINKY_TIP),
    // palm
    (INDEX_MCP, MIDDLE_MCP), (MIDDLE_MCP, RING_MCP), (RING_MCP, PINKY_MCP),
];

// ════════════════════════════════════════════════════════════════════════════
// Point: pixel space
// ════════════════════════════════════════════════════════════════════════════

/// A landmark in integer pixel coordinates.  `y` grows downward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }

    /// Euclidean distance in pixels.
    pub fn distance(self, other: Point) -> f32 {
        (self.x as f32 - other.x as f32).hypot(self.y as f32 - other.y as f32)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tracker records: fractional coordinates
// ════════════════════════════════════════════════════════════════════════════

/// How far outside [0, 1] a fraction may stray before the landmark is
/// treated as garbage.  Trackers report joints slightly off-frame.
pub const FRAME_SLACK: f32 = 1.0;

/// A landmark as reported by the tracker: fractions of frame width/height.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedLandmark {
    pub x: f32,
    pub y: f32,
}

impl NormalizedLandmark {
    /// Finite and within [`FRAME_SLACK`] of the frame on both axes.
    pub fn in_range(self) -> bool {
        let ok = |v: f32| (-FRAME_SLACK..=1.0 + FRAME_SLACK).contains(&v);
        ok(self.x) && ok(self.y)
    }
}

/// Why a [`TrackedHand`] cannot be normalised.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HandDefect {
    /// Not exactly [`LANDMARK_COUNT`] landmarks.
    Count(usize),
    /// Landmark at this index is non-finite or far off-frame.
    OutOfRange(usize),
}

impl fmt::Display for HandDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandDefect::Count(n)      => write!(f, "{} landmarks, expected {}", n, LANDMARK_COUNT),
            HandDefect::OutOfRange(i) => write!(f, "landmark {} out of range", i),
        }
    }
}

/// One hand as reported by the tracker for a single frame.
///
/// `label` is the tracker's handedness string (`"Left"` / `"Right"`).
/// Serialised as `{"label": "Left", "landmarks": [{"x": .., "y": ..}, ..]}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackedHand {
    pub label:     String,
    pub landmarks: Vec<NormalizedLandmark>,
}

impl TrackedHand {
    pub fn new(label: &str, landmarks: [NormalizedLandmark; LANDMARK_COUNT]) -> Self {
        TrackedHand { label: label.to_string(), landmarks: landmarks.to_vec() }
    }

    /// First reason this hand cannot be normalised, if any.
    pub fn defect(&self) -> Option<HandDefect> {
        if self.landmarks.len() != LANDMARK_COUNT {
            return Some(HandDefect::Count(self.landmarks.len()));
        }
        self.landmarks.iter().position(|l| !l.in_range()).map(HandDefect::OutOfRange)
    }

    /// Rescale to pixel space.  Returns `None` for any hand with a
    /// [`defect`](Self::defect).
    pub fn to_landmark_set(&self, width: u32, height: u32) -> Option<LandmarkSet> {
        if self.defect().is_some() {
            return None;
        }
        let raw: &[NormalizedLandmark; LANDMARK_COUNT] =
            self.landmarks.as_slice().try_into().ok()?;
        Some(normalize(raw, width, height))
    }

    /// Flip horizontally (`x → 1 − x`), as if the frame had been mirrored
    /// before tracking.
    pub fn mirrored(&self) -> Self {
        TrackedHand {
            label:     self.label.clone(),
            landmarks: self.landmarks.iter()
                .map(|l| NormalizedLandmark { x: 1.0 - l.x, y: l.y })
                .collect(),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LandmarkSet: 21 pixel-space points
// ════════════════════════════════════════════════════════════════════════════

/// The 21 pixel-space landmarks of one hand for one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LandmarkSet {
    points: [Point; LANDMARK_COUNT],
}

impl LandmarkSet {
    pub fn new(points: [Point; LANDMARK_COUNT]) -> Self {
        LandmarkSet { points }
    }

    pub fn points(&self) -> &[Point; LANDMARK_COUNT] { &self.points }
    pub fn wrist(&self)  -> Point { self.points[WRIST] }
    pub fn thumb_tip(&self) -> Point { self.points[THUMB_TIP] }
    pub fn index_tip(&self) -> Point { self.points[INDEX_TIP] }

    /// Replace one landmark, returning the modified set.
    pub fn with(mut self, idx: usize, p: Point) -> Self {
        self.points[idx] = p;
        self
    }
}

impl Index<usize> for LandmarkSet {
    type Output = Point;
    fn index(&self, idx: usize) -> &Point { &self.points[idx] }
}

/// Rescale fractional landmarks to integer pixels: `trunc(x·w)`, `trunc(y·h)`.
pub fn normalize(
    raw:    &[NormalizedLandmark; LANDMARK_COUNT],
    width:  u32,
    height: u32,
) -> LandmarkSet {
    let (w, h) = (width as f32, height as f32);
    let mut points = [Point::default(); LANDMARK_COUNT];
    for (p, l) in points.iter_mut().zip(raw.iter()) {
        *p = Point::new((l.x * w) as i32, (l.y * h) as i32);
    }
    LandmarkSet { points }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_at(x: f32, y: f32) -> [NormalizedLandmark; LANDMARK_COUNT] {
        [NormalizedLandmark { x, y }; LANDMARK_COUNT]
    }

    #[test]
    fn normalize_scales_to_pixels() {
        let mut raw = raw_at(0.0, 0.0);
        raw[WRIST] = NormalizedLandmark { x: 0.5, y: 0.25 };
        raw[INDEX_TIP] = NormalizedLandmark { x: 1.0, y: 1.0 };
        let pts = normalize(&raw, 640, 480);
        assert_eq!(pts.wrist(), Point::new(320, 120));
        assert_eq!(pts.index_tip(), Point::new(640, 480));
        assert_eq!(pts[THUMB_TIP], Point::new(0, 0));
    }

    #[test]
    fn normalize_truncates() {
        let pts = normalize(&raw_at(0.3333, 0.6667), 100, 100);
        assert_eq!(pts.wrist(), Point::new(33, 66));
    }

    #[test]
    fn point_distance() {
        let d = Point::new(100, 100).distance(Point::new(110, 105));
        assert!((d - 11.18).abs() < 0.01);
    }

    #[test]
    fn tracked_hand_rejects_wrong_count() {
        let hand = TrackedHand {
            label: "Left".into(),
            landmarks: vec![NormalizedLandmark::default(); 20],
        };
        assert!(hand.to_landmark_set(640, 480).is_none());
    }

    #[test]
    fn tracked_hand_rejects_wild_coordinates() {
        let mut raw = raw_at(0.5, 0.5);
        raw[THUMB_TIP].x = 1e7;
        raw[INDEX_TIP].x = -1e7;
        let hand = TrackedHand::new("Left", raw);
        assert_eq!(hand.defect(), Some(HandDefect::OutOfRange(THUMB_TIP)));
        assert!(hand.to_landmark_set(640, 480).is_none());

        let mut raw = raw_at(0.5, 0.5);
        raw[WRIST].y = f32::NAN;
        assert_eq!(TrackedHand::new("Left", raw).defect(), Some(HandDefect::OutOfRange(WRIST)));
    }

    #[test]
    fn slightly_off_frame_is_kept() {
        let mut raw = raw_at(0.5, 0.5);
        raw[PINKY_TIP] = NormalizedLandmark { x: 1.2, y: -0.1 };
        let hand = TrackedHand::new("Right", raw);
        assert_eq!(hand.defect(), None);
        let pts = hand.to_landmark_set(100, 100).unwrap();
        assert_eq!(pts[PINKY_TIP], Point::new(120, -10));
    }

    #[test]
    fn distance_survives_extreme_points() {
        let d = Point::new(i32::MAX, 0).distance(Point::new(i32::MIN, 0));
        assert!(d.is_finite() && d > 4.0e9);
    }

    #[test]
    fn tracked_hand_accepts_21() {
        let hand = TrackedHand::new("Right", raw_at(0.5, 0.5));
        let pts = hand.to_landmark_set(200, 100).unwrap();
        assert_eq!(pts.wrist(), Point::new(100, 50));
    }

    #[test]
    fn mirrored_flips_x_only() {
        let hand = TrackedHand::new("Left", raw_at(0.25, 0.75));
        let m = hand.mirrored();
        assert_eq!(m.label, "Left");
        assert!(m.landmarks.iter().all(|l| l.x == 0.75 && l.y == 0.75));
    }

    #[test]
    fn tracked_hand_json_shape() {
        let hand = TrackedHand::new("Left", raw_at(0.5, 0.5));
        let json = serde_json::to_string(&hand).unwrap();
        assert!(json.starts_with(r#"{"label":"Left","landmarks":[{"x":0.5,"y":0.5}"#));
    }

    #[test]
    fn connections_in_range() {
        for &(a, b) in HAND_CONNECTIONS.iter() {
            assert!(a < LANDMARK_COUNT && b < LANDMARK_COUNT);
            assert_ne!(a, b);
        }
    }
}
