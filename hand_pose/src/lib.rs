//! # hand_pose
//!
//! Pixel-space hand landmarks and a small rule-based gesture vocabulary.
//!
//! A hand tracker reports 21 landmarks per hand in fractional frame
//! coordinates.  [`normalize`] rescales them to pixels; [`classify`] turns a
//! pixel-space [`LandmarkSet`] into one of five [`Gesture`]s.
//!
//! ## Landmark convention
//!
//! | Index | Point | | Index | Point |
//! |---|---|---|---|---|
//! | 0 | wrist | | 4 | thumb tip |
//! | 2 | thumb MCP | | 8 | index tip |
//! | 5 | index MCP | | 12 | middle tip |
//! | 9 | middle MCP | | 16 | ring tip |
//! | 13 | ring MCP | | 20 | pinky tip |
//! | 17 | pinky MCP | | | |
//!
//! ## Quick start
//!
//! ```rust
//! use hand_pose::{classify, normalize, Gesture, NormalizedLandmark};
//!
//! let raw = [NormalizedLandmark { x: 0.5, y: 0.5 }; 21];
//! let pts = normalize(&raw, 640, 480);
//! // Every landmark on one spot: thumb touches index → pinch.
//! assert_eq!(classify(&pts), Gesture::Pinch);
//! ```

pub mod landmarks;
pub mod classify;

pub use landmarks::{
    normalize, HandDefect, LandmarkSet, NormalizedLandmark, Point, TrackedHand,
    HAND_CONNECTIONS, LANDMARK_COUNT,
};
pub use classify::{
    classify, finger_is_up, hand_depth, pinch_distance, Finger, Gesture,
    PINCH_THRESHOLD_PX,
};
