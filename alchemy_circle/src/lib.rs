//! # alchemy_circle
//!
//! Gesture-summoned conjuring circles, one per tracked hand.
//!
//! ## Gesture → Action mapping
//!
//! Transitions fire when a gesture *begins*, not while it is held.
//!
//! | Gesture | Action |
//! |---|---|
//! | Pinch | **Spawn**: conjure the circle with a new random style and 2–6 runes |
//! | Fist | **Dismiss**: circle goes dormant at once |
//! | Index only | **Rune**: pin a rune at the angle from centre to fingertip |
//! | Open palm (circle dormant) | **Auto-spawn**: spawn plus 3–8 extra runes |
//! | Hand leaves frame | Dismiss, then forget the hand |
//!
//! Every frame the circle centre eases toward a point 100 px above the
//! wrist, and the target radius follows the thumb–index spread (a depth
//! proxy).
//!
//! ## Quick start
//!
//! ```rust
//! use std::time::Instant;
//! use alchemy_circle::{HandIdentity, HandRegistry, RenderStyle};
//!
//! let mut registry = HandRegistry::with_seed(RenderStyle::Strange, 7);
//! let now = Instant::now();
//! // No hands this frame: nothing to do.
//! let report = registry.process_frame(&[], now);
//! registry.advance(now);
//! assert!(report.hands.is_empty());
//! assert!(registry.get(HandIdentity::Left).is_none());
//! ```

pub mod style;
pub mod circle;
pub mod registry;

pub use style::{rgb, ColorScheme, RenderStyle, StyleParams, SCHEMES, WHITE};
pub use circle::{radius_for_depth, AlchemyCircle, Rune};
pub use registry::{FrameReport, HandIdentity, HandRegistry, HandReport, Transition};
