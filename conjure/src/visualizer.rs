//! The `minifb` window: presents a [`Canvas`] and turns keyboard and mouse
//! input into [`SimInput`] events.

use std::sync::mpsc::Sender;
use std::time::Duration;

use minifb::{Key, KeyRepeat, MouseMode, Window, WindowOptions};

use crate::canvas::Canvas;
use crate::error::{AppError, Result};
use crate::tracker::{SimInput, SimKey};

pub const WINDOW_TITLE: &str = "Conjure: Gesture Circles";

/// Keys that trigger on first press only.
const ONE_SHOT: [(Key, SimKey); 9] = [
    (Key::Key1, SimKey::SelectLeft),
    (Key::Key2, SimKey::SelectRight),
    (Key::H,    SimKey::ToggleHand),
    (Key::P,    SimKey::Pinch),
    (Key::F,    SimKey::Fist),
    (Key::O,    SimKey::OpenPalm),
    (Key::I,    SimKey::IndexOnly),
    (Key::U,    SimKey::Relax),
    (Key::Escape, SimKey::Quit),
];

/// Keys that repeat while held.
const HELD: [(Key, SimKey); 2] = [
    (Key::Up,   SimKey::SpreadWider),
    (Key::Down, SimKey::SpreadNarrower),
];

pub struct Visualizer {
    window:       Window,
    width:        usize,
    height:       usize,
    sim_tx:       Sender<SimInput>,
    last_pointer: Option<(f32, f32)>,
}

impl Visualizer {
    pub fn new(width: usize, height: usize, sim_tx: Sender<SimInput>) -> Result<Self> {
        let mut window = Window::new(
            WINDOW_TITLE,
            width, height,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        ).map_err(|e| AppError::Window(e.to_string()))?;

        window.limit_update_rate(Some(Duration::from_millis(33))); // ~30fps, camera rate

        Ok(Visualizer { window, width, height, sim_tx, last_pointer: None })
    }

    pub fn is_open(&self) -> bool { self.window.is_open() }

    /// Poll keyboard and mouse and forward them as [`SimInput`].
    /// Returns false once the window closes or quit is pressed.
    pub fn poll_input(&mut self) -> bool {
        if !self.window.is_open() { return false; }

        if let Some(pos) = self.window.get_mouse_pos(MouseMode::Clamp) {
            if self.last_pointer != Some(pos) {
                self.last_pointer = Some(pos);
                let _ = self.sim_tx.send(SimInput::Pointer { x: pos.0, y: pos.1 });
            }
        }

        if self.window.is_key_pressed(Key::Q, KeyRepeat::No) {
            let _ = self.sim_tx.send(SimInput::KeyDown(SimKey::Quit));
            return false;
        }
        for (key, sim) in ONE_SHOT {
            if self.window.is_key_pressed(key, KeyRepeat::No) {
                let _ = self.sim_tx.send(SimInput::KeyDown(sim));
                if sim == SimKey::Quit {
                    return false;
                }
            }
        }
        for (key, sim) in HELD {
            if self.window.is_key_pressed(key, KeyRepeat::Yes) {
                let _ = self.sim_tx.send(SimInput::KeyDown(sim));
            }
        }

        true
    }

    /// Blit one frame.
    pub fn present(&mut self, canvas: &Canvas) -> Result<()> {
        self.window
            .update_with_buffer(canvas.pixels(), self.width, self.height)
            .map_err(|e| AppError::Window(e.to_string()))
    }
}
