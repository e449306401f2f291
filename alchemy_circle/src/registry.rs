//! Per-hand circle ownership and gesture-driven transitions.
//!
//! The registry maps each tracked [`HandIdentity`] to its circle and the
//! gesture last observed for that hand.  Transitions fire on the rising edge
//! of a gesture: holding a pinch for many frames spawns once.

use std::collections::BTreeMap;
use std::str::FromStr;
use std::time::Instant;

use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;

use hand_pose::{classify, hand_depth, Gesture, LandmarkSet};

use crate::circle::{AlchemyCircle, CENTER_LIFT_PX};
use crate::style::RenderStyle;

// ════════════════════════════════════════════════════════════════════════════
// HandIdentity
// ════════════════════════════════════════════════════════════════════════════

/// Which hand.  Only distinguishes simultaneously tracked hands; it is not
/// stable across sessions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HandIdentity {
    Left,
    Right,
}

impl HandIdentity {
    pub fn name(&self) -> &'static str {
        match self {
            HandIdentity::Left  => "Left",
            HandIdentity::Right => "Right",
        }
    }
}

impl FromStr for HandIdentity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("left") {
            Ok(HandIdentity::Left)
        } else if s.eq_ignore_ascii_case("right") {
            Ok(HandIdentity::Right)
        } else {
            Err(format!("unrecognised hand label '{}'", s))
        }
    }
}

impl std::fmt::Display for HandIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Transitions and per-frame report
// ════════════════════════════════════════════════════════════════════════════

/// A state change applied to a circle in response to a gesture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Transition {
    /// Pinch began: circle conjured.
    Spawned,
    /// Open palm on a dormant circle: conjured with extra runes.
    AutoSpawned,
    /// Fist began, or the hand left the frame.
    Dismissed,
    /// Index finger began pointing: rune pinned at `angle` degrees.
    RuneAdded { angle: f32 },
}

/// What one observed hand did this frame.
#[derive(Clone, Debug, PartialEq)]
pub struct HandReport {
    pub identity:    HandIdentity,
    pub gesture:     Gesture,
    pub transitions: Vec<Transition>,
}

/// Summary of one [`HandRegistry::process_frame`] call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameReport {
    /// In tracker-report order.
    pub hands:   Vec<HandReport>,
    /// Hands that vanished and were removed along with their circle.
    pub evicted: Vec<HandIdentity>,
}

// ════════════════════════════════════════════════════════════════════════════
// HandRegistry
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug)]
struct HandTrack {
    circle:       AlchemyCircle,
    /// `None` until the first gesture is recorded.
    last_gesture: Option<Gesture>,
}

/// Owns one circle per tracked hand and drives its lifecycle.
#[derive(Debug)]
pub struct HandRegistry {
    tracks: BTreeMap<HandIdentity, HandTrack>,
    style:  RenderStyle,
    rng:    StdRng,
}

impl HandRegistry {
    pub fn new(style: RenderStyle, rng: StdRng) -> Self {
        HandRegistry { tracks: BTreeMap::new(), style, rng }
    }

    /// Deterministic styles and rune angles.
    pub fn with_seed(style: RenderStyle, seed: u64) -> Self {
        Self::new(style, StdRng::seed_from_u64(seed))
    }

    pub fn from_os_rng(style: RenderStyle) -> Self {
        Self::new(style, StdRng::from_os_rng())
    }

    pub fn style(&self) -> RenderStyle { self.style }
    pub fn len(&self) -> usize { self.tracks.len() }
    pub fn is_empty(&self) -> bool { self.tracks.is_empty() }

    pub fn get(&self, id: HandIdentity) -> Option<&AlchemyCircle> {
        self.tracks.get(&id).map(|t| &t.circle)
    }

    pub fn last_gesture(&self, id: HandIdentity) -> Option<Gesture> {
        self.tracks.get(&id).and_then(|t| t.last_gesture)
    }

    /// All circles, active or not, in identity order.
    pub fn circles(&self) -> impl Iterator<Item = (HandIdentity, &AlchemyCircle)> {
        self.tracks.iter().map(|(id, t)| (*id, &t.circle))
    }

    /// Apply one frame of tracker output.
    ///
    /// `hands` are processed in order.  Every hand present in the registry
    /// but absent from `hands` is dismissed and then evicted in the same
    /// pass.
    pub fn process_frame(
        &mut self,
        hands: &[(HandIdentity, LandmarkSet)],
        now:   Instant,
    ) -> FrameReport {
        let mut report = FrameReport::default();

        for (id, pts) in hands {
            report.hands.push(self.observe(*id, pts, now));
        }

        let absent: Vec<HandIdentity> = self.tracks.keys()
            .copied()
            .filter(|id| !hands.iter().any(|(seen, _)| seen == id))
            .collect();

        for id in absent {
            if let Some(track) = self.tracks.get_mut(&id) {
                if track.circle.active {
                    track.circle.dismiss();
                    debug!("{} hand lost: circle dismissed", id);
                }
                if !track.circle.active {
                    self.tracks.remove(&id);
                    debug!("{} hand evicted", id);
                    report.evicted.push(id);
                }
            }
        }

        report
    }

    /// Advance physics for every circle.
    pub fn advance(&mut self, now: Instant) {
        for track in self.tracks.values_mut() {
            track.circle.update(now);
        }
    }

    fn observe(&mut self, id: HandIdentity, pts: &LandmarkSet, now: Instant) -> HandReport {
        let gesture = classify(pts);
        let wrist   = pts.wrist();
        let target  = (wrist.x as f32, wrist.y as f32 - CENTER_LIFT_PX);

        let rng   = &mut self.rng;
        let track = self.tracks.entry(id).or_insert_with(|| {
            debug!("{} hand tracked: new circle at ({:.0}, {:.0})", id, target.0, target.1);
            HandTrack {
                circle:       AlchemyCircle::new(target, now, rng),
                last_gesture: None,
            }
        });

        let last   = track.last_gesture;
        let circle = &mut track.circle;
        circle.smooth_center(target);
        circle.set_target_from_depth(hand_depth(pts));

        let rising = |g: Gesture| gesture == g && last != Some(g);
        let mut transitions = Vec::new();

        if rising(Gesture::Pinch) {
            circle.spawn(self.style, &mut self.rng);
            transitions.push(Transition::Spawned);
        }
        if rising(Gesture::Fist) {
            circle.dismiss();
            transitions.push(Transition::Dismissed);
        }
        if rising(Gesture::IndexOnly) {
            let tip   = pts.index_tip();
            let angle = circle.angle_to((tip.x as f32, tip.y as f32));
            circle.add_rune(angle);
            transitions.push(Transition::RuneAdded { angle });
        }
        if gesture == Gesture::OpenPalm && !circle.active {
            circle.spawn_auto(self.style, &mut self.rng);
            transitions.push(Transition::AutoSpawned);
        }

        for t in &transitions {
            debug!("{} hand {}: {:?}", id, gesture, t);
        }

        track.last_gesture = Some(gesture);
        HandReport { identity: id, gesture, transitions }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
