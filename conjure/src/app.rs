//! Top-level application state and main loop.
//!
//! `AppState` owns the [`HandRegistry`] and the latest frame's landmarks.
//! Each frame it runs normaliser → classifier → registry → physics, then
//! draws backdrop, landmarks, circles and HUD onto a [`Canvas`].

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};
use std::time::Instant;

use log::{info, warn};

use alchemy_circle::{FrameReport, HandIdentity, HandRegistry, RenderStyle, Transition};
use hand_pose::{LandmarkSet, TrackedHand, HAND_CONNECTIONS};

use crate::canvas::{text_width, Canvas};
use crate::error::Result;
use crate::render::render_circle;
use crate::tracker::{well_formed, FrameRecorder, HandSource, ReplayHandSource, SimInput};
use crate::visualizer::Visualizer;

// ════════════════════════════════════════════════════════════════════════════
// Colours and layout
// ════════════════════════════════════════════════════════════════════════════

pub const BG_COLOR:      u32 = 0xFF1A1A2E;
const BONE_COLOR:        u32 = 0xFF5A7FA0;
const JOINT_COLOR:       u32 = 0xFFE0E0E0;
const HUD_COLOR:         u32 = 0xFFFFFFFF;
const HINT_COLOR:        u32 = 0xFF9A9AB0;
const JOINT_RADIUS:      i32 = 3;
const HUD_SCALE:         i32 = 3;
const HINT_SCALE:        i32 = 2;

const HINT: &str = "PINCH: SPAWN | FIST: DISMISS | INDEX: RUNE | OPEN PALM: AUTO";

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

/// Configuration for the full application.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub width:          u32,
    pub height:         u32,
    pub style:          RenderStyle,
    /// `None` seeds from OS entropy.
    pub seed:           Option<u64>,
    /// Flip incoming hands horizontally.
    pub mirror:         bool,
    pub show_landmarks: bool,
    /// Play a recording instead of live input.
    pub replay:         Option<PathBuf>,
    pub loop_replay:    bool,
    /// Write every frame's hands to this file.
    pub record:         Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            width:          1280,
            height:         720,
            style:          RenderStyle::Strange,
            seed:           None,
            mirror:         false,
            show_landmarks: true,
            replay:         None,
            loop_replay:    false,
            record:         None,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

pub struct AppState {
    registry:       HandRegistry,
    width:          u32,
    height:         u32,
    mirror:         bool,
    show_landmarks: bool,
    /// This frame's accepted hands, in tracker order.
    hands:          Vec<(HandIdentity, LandmarkSet)>,
    pub status:     String,
}

impl AppState {
    pub fn new(cfg: &AppConfig) -> Self {
        let registry = match cfg.seed {
            Some(seed) => HandRegistry::with_seed(cfg.style, seed),
            None       => HandRegistry::from_os_rng(cfg.style),
        };
        AppState {
            registry,
            width:          cfg.width,
            height:         cfg.height,
            mirror:         cfg.mirror,
            show_landmarks: cfg.show_landmarks,
            hands:          Vec::new(),
            status:         format!("Ready. Style: {}", cfg.style.name()),
        }
    }

    pub fn registry(&self) -> &HandRegistry { &self.registry }
    pub fn hands(&self) -> &[(HandIdentity, LandmarkSet)] { &self.hands }

    // ── one frame ─────────────────────────────────────────────────────────

    /// Normalise, classify and apply one frame of tracker output, then
    /// advance every circle's physics to `now`.
    ///
    /// Hands with an unrecognised label are skipped with a warning; a second
    /// hand with an already-seen label is ignored.  Malformed hands (see
    /// [`well_formed`]) are skipped quietly.
    pub fn process_frame(&mut self, tracked: &[TrackedHand], now: Instant) -> FrameReport {
        self.hands.clear();
        for hand in tracked {
            let id = match hand.label.parse::<HandIdentity>() {
                Ok(id) => id,
                Err(e) => { warn!("{}", e); continue; }
            };
            let pts = if self.mirror {
                hand.mirrored().to_landmark_set(self.width, self.height)
            } else {
                hand.to_landmark_set(self.width, self.height)
            };
            // Already reported by `well_formed` on the live path.
            let Some(pts) = pts else { continue };
            if self.hands.iter().any(|(seen, _)| *seen == id) {
                warn!("second {} hand in one frame ignored", id);
                continue;
            }
            self.hands.push((id, pts));
        }

        let report = self.registry.process_frame(&self.hands, now);
        self.registry.advance(now);
        self.update_status(&report);
        report
    }

    fn update_status(&mut self, report: &FrameReport) {
        for h in &report.hands {
            if let Some(t) = h.transitions.last() {
                self.status = match t {
                    Transition::Spawned            => format!("{}: conjured", h.identity),
                    Transition::AutoSpawned        => format!("{}: conjured with open palm", h.identity),
                    Transition::Dismissed          => format!("{}: dismissed", h.identity),
                    Transition::RuneAdded { angle } => format!("{}: rune at {:.0}", h.identity, angle),
                };
            }
        }
        if let Some(id) = report.evicted.last() {
            self.status = format!("{}: hand lost", id);
        }
    }

    // ── drawing ───────────────────────────────────────────────────────────

    pub fn render(&self, canvas: &mut Canvas) {
        canvas.clear(BG_COLOR);

        if self.show_landmarks {
            for (_, pts) in &self.hands {
                draw_landmarks(canvas, pts);
            }
        }

        for (_, circle) in self.registry.circles() {
            canvas.execute_all(&render_circle(circle));
        }

        self.draw_hud(canvas);
    }

    fn draw_hud(&self, canvas: &mut Canvas) {
        let h = canvas.height() as i32;
        canvas.text(&format!("HANDS: {}", self.hands.len()), 10, 10, HUD_SCALE, HUD_COLOR);

        let status_y = h - 20 - 5 * HINT_SCALE - 12;
        canvas.text(&self.status, 10, status_y, HINT_SCALE, HUD_COLOR);
        canvas.text(HINT, 10, h - 20, HINT_SCALE, HINT_COLOR);

        let style = self.registry.style().name();
        let x = canvas.width() as i32 - text_width(style, HINT_SCALE) - 10;
        canvas.text(style, x, 10, HINT_SCALE, HINT_COLOR);
    }
}

fn draw_landmarks(canvas: &mut Canvas, pts: &LandmarkSet) {
    for &(a, b) in HAND_CONNECTIONS.iter() {
        canvas.line(pts[a], pts[b], BONE_COLOR, 2);
    }
    for &p in pts.points() {
        canvas.disc(p, JOINT_RADIUS, JOINT_COLOR);
    }
}

// ════════════════════════════════════════════════════════════════════════════
// run: main loop
// ════════════════════════════════════════════════════════════════════════════

fn open_source(cfg: &AppConfig, sim_rx: Receiver<SimInput>) -> Result<Box<dyn HandSource>> {
    if let Some(path) = &cfg.replay {
        return Ok(Box::new(ReplayHandSource::open(path, cfg.loop_replay)?));
    }

    #[cfg(feature = "leap")]
    let source: Box<dyn HandSource> = {
        drop(sim_rx);
        Box::new(crate::tracker::LeapHandSource::open()?)
    };
    #[cfg(not(feature = "leap"))]
    let source: Box<dyn HandSource> =
        Box::new(crate::tracker::SimHandSource::new(sim_rx, cfg.width, cfg.height));

    Ok(source)
}

/// Open the window and hand source, then loop until the window closes,
/// quit is pressed, or the source runs dry.
pub fn run(cfg: AppConfig) -> Result<()> {
    // ── Sim input channel (window → puppet hands) ────────────────────────
    let (sim_tx, sim_rx) = mpsc::channel::<SimInput>();

    let mut source = open_source(&cfg, sim_rx)?;
    info!("hand source: {}", source.name());

    let mut recorder = match &cfg.record {
        Some(path) => Some(FrameRecorder::create(path)?),
        None       => None,
    };

    let (w, h) = (cfg.width as usize, cfg.height as usize);
    let mut vis    = Visualizer::new(w, h, sim_tx)?;
    let mut canvas = Canvas::new(w, h, BG_COLOR);
    let mut app    = AppState::new(&cfg);

    // ── Main loop ─────────────────────────────────────────────────────────
    while vis.is_open() {
        // 1. Window input → SimInput
        if !vis.poll_input() { break; }

        // 2. Next frame of hands
        let hands = match source.next_frame()? {
            Some(hands) => well_formed(hands),
            None => {
                info!("{} source ended", source.name());
                break;
            }
        };

        // 3. Record
        if let Some(rec) = recorder.as_mut() {
            rec.record(&hands)?;
        }

        // 4. Classify → registry → physics
        app.process_frame(&hands, Instant::now());

        // 5. Render
        app.render(&mut canvas);
        vis.present(&canvas)?;
    }

    if let Some(rec) = recorder {
        rec.finish()?;
    }
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
