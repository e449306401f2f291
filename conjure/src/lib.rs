//! # conjure
//!
//! Gesture-summoned conjuring circles over a software framebuffer.  Hands
//! come from a keyboard/mouse puppet, a recorded session, or a LeapMotion
//! controller; each is classified every frame and drives its own circle.
//!
//! ## Gesture → Action mapping
//!
//! | Gesture | Action |
//! |---|---|
//! | Pinch (thumb tip to index tip) | Conjure the circle |
//! | Fist | Dismiss it |
//! | Index finger only | Pin a rune where the finger points |
//! | Open palm, circle dormant | Conjure with extra runes |
//! | Thumb–index spread | Circle size |
//!
//! ## Frame pipeline
//!
//! ```text
//! HandSource ─▶ TrackedHand ─▶ LandmarkSet ─▶ Gesture ─▶ HandRegistry ─▶ DrawCommand ─▶ Canvas ─▶ window
//!   (sim/replay/leap)   normalise     classify     transitions    render_circle   execute
//!                                                   + physics
//! ```
//!
//! ## Feature flags
//!
//! * (default): **Simulation mode**: the mouse moves the selected hand and
//!   keys pick its pose.
//! * `leap`: **Hardware mode**: polls a real LeapMotion controller via LeapC.
//!
//! ### Simulation keyboard shortcuts
//!
//! | Key | Effect |
//! |---|---|
//! | mouse | Move the selected hand (the circle follows the cursor) |
//! | `1` / `2` | Select Left / Right hand |
//! | `H` | Show / hide the selected hand |
//! | `P` | Pinch |
//! | `F` | Fist |
//! | `O` | Open palm |
//! | `I` | Index only |
//! | `U` | Relaxed (unknown) pose |
//! | `Up` / `Down` | Widen / narrow thumb–index spread |
//! | `Esc` / `Q` | Quit |

pub mod error;
pub mod canvas;
pub mod render;
pub mod tracker;
pub mod visualizer;
pub mod app;

pub use app::{run, AppConfig, AppState};
pub use canvas::Canvas;
pub use error::{AppError, Result};
pub use render::{render_circle, DrawCommand};
pub use tracker::{FrameRecord, FrameRecorder, HandSource, ReplayHandSource, SimHandSource};
