//! The conjuring circle: lifecycle, eased geometry, and runes.
//!
//! Two states: **Dormant** (`active == false`) and **Conjured**.  While
//! dormant the circle is frozen; `update` still records the time so a later
//! spawn starts with a small `dt`.

use std::time::Instant;

use rand::Rng;

use crate::style::{RenderStyle, StyleParams};

// ════════════════════════════════════════════════════════════════════════════
// Tuning constants
// ════════════════════════════════════════════════════════════════════════════

/// Centre = wrist shifted up by this many pixels.
pub const CENTER_LIFT_PX:    f32 = 100.0;
/// Weight of the new target in the per-call centre smoothing.
pub const CENTER_SMOOTHING:  f32 = 0.2;
/// Per-call fraction of the radius gap closed.
pub const RADIUS_EASING:     f32 = 0.18;
/// Opacity gained per second while conjured.
pub const FADE_IN_PER_SEC:   f32 = 2.0;
/// Rune progress gained per second.
pub const RUNE_WRITE_PER_SEC: f32 = 1.2;

pub const SPAWN_RADIUS:      f32 = 10.0;
pub const INITIAL_TARGET_RADIUS: f32 = 120.0;

/// Depth proxy range (pixels) mapped onto the radius range.
pub const DEPTH_MIN: f32 = 20.0;
pub const DEPTH_MAX: f32 = 150.0;
pub const RADIUS_MIN: f32 = 50.0;
pub const RADIUS_MAX: f32 = 200.0;

// ════════════════════════════════════════════════════════════════════════════
// Rune
// ════════════════════════════════════════════════════════════════════════════

/// An arc glyph pinned at `angle` degrees that writes itself in as
/// `progress` climbs to 1.0.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rune {
    pub angle:    f32,
    pub progress: f32,
}

impl Rune {
    pub fn new(angle: f32) -> Self {
        Rune { angle, progress: 0.0 }
    }

    pub fn is_written(&self) -> bool { self.progress >= 1.0 }

    fn advance(&mut self, dt: f32) {
        if self.progress < 1.0 {
            self.progress = (self.progress + dt * RUNE_WRITE_PER_SEC).min(1.0);
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// AlchemyCircle
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug)]
pub struct AlchemyCircle {
    /// Smoothed centre in pixels.
    pub center:        (f32, f32),
    pub radius:        f32,
    pub target_radius: f32,
    /// Opacity, 0.0–1.0.
    pub alpha:         f32,
    /// Cumulative rotation in degrees.  Unbounded.
    pub angle:         f32,
    pub active:        bool,
    pub style:         RenderStyle,
    pub params:        StyleParams,
    pub runes:         Vec<Rune>,
    last_update:       Instant,
}

impl AlchemyCircle {
    /// A dormant circle with freshly rolled style parameters.
    pub fn new<R: Rng>(center: (f32, f32), now: Instant, rng: &mut R) -> Self {
        AlchemyCircle {
            center,
            radius:        SPAWN_RADIUS,
            target_radius: INITIAL_TARGET_RADIUS,
            alpha:         0.0,
            angle:         0.0,
            active:        false,
            style:         RenderStyle::default(),
            params:        StyleParams::random(rng),
            runes:         Vec::new(),
            last_update:   now,
        }
    }

    // ── transitions ───────────────────────────────────────────────────────

    /// Conjure: reset size and opacity, re-roll the style, and scatter 2–6
    /// runes.
    pub fn spawn<R: Rng>(&mut self, style: RenderStyle, rng: &mut R) {
        self.active = true;
        self.radius = SPAWN_RADIUS;
        self.alpha  = 0.0;
        self.runes.clear();
        self.target_radius = rng.random_range(70..=100u32) as f32;
        self.style  = style;
        self.params = StyleParams::random(rng);
        self.scatter_runes(rng.random_range(2..=6), rng);
    }

    /// Spawn, then scatter 3–8 more runes.
    pub fn spawn_auto<R: Rng>(&mut self, style: RenderStyle, rng: &mut R) {
        self.spawn(style, rng);
        self.scatter_runes(rng.random_range(3..=8), rng);
    }

    /// Go dormant immediately.  No fade-out.
    pub fn dismiss(&mut self) {
        self.active = false;
    }

    pub fn add_rune(&mut self, angle: f32) {
        self.runes.push(Rune::new(angle));
    }

    fn scatter_runes<R: Rng>(&mut self, count: usize, rng: &mut R) {
        for _ in 0..count {
            self.add_rune(rng.random_range(0.0..360.0));
        }
    }

    // ── hand tracking inputs ──────────────────────────────────────────────

    /// Blend the centre toward `target` by a fixed per-call weight.
    pub fn smooth_center(&mut self, target: (f32, f32)) {
        let k = CENTER_SMOOTHING;
        self.center = (
            self.center.0 * (1.0 - k) + target.0 * k,
            self.center.1 * (1.0 - k) + target.1 * k,
        );
    }

    /// Map the hand depth proxy onto `target_radius`.
    pub fn set_target_from_depth(&mut self, depth: f32) {
        self.target_radius = radius_for_depth(depth);
    }

    /// Angle in degrees from the centre to `p`, screen convention (positive
    /// sweeps toward +y, i.e. clockwise on screen).
    pub fn angle_to(&self, p: (f32, f32)) -> f32 {
        let dx = p.0 - self.center.0;
        let dy = p.1 - self.center.1;
        dy.atan2(dx).to_degrees()
    }

    // ── physics ───────────────────────────────────────────────────────────

    /// Advance physics by the wall-clock time since the previous call.
    pub fn update(&mut self, now: Instant) {
        let dt = now.saturating_duration_since(self.last_update).as_secs_f32();
        self.last_update = now;
        self.step(dt);
    }

    /// Advance physics by `dt` seconds.  No-op while dormant.
    ///
    /// The radius easing is applied once per call regardless of `dt`.
    pub fn step(&mut self, dt: f32) {
        if !self.active {
            return;
        }
        self.radius += (self.target_radius - self.radius) * RADIUS_EASING;
        self.radius = self.radius.max(0.0);
        self.alpha  = (self.alpha + dt * FADE_IN_PER_SEC).min(1.0);
        self.angle += dt * self.params.rotation_speed;
        for rune in &mut self.runes {
            rune.advance(dt);
        }
    }
}

/// Clamp `depth` to [20, 150] px and rescale linearly onto [50, 200] px,
/// truncated to whole pixels.
pub fn radius_for_depth(depth: f32) -> f32 {
    let d = depth.clamp(DEPTH_MIN, DEPTH_MAX);
    (RADIUS_MIN + (d - DEPTH_MIN) / (DEPTH_MAX - DEPTH_MIN) * (RADIUS_MAX - RADIUS_MIN)).trunc()
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn make_circle() -> (AlchemyCircle, StdRng) {
        let mut rng = StdRng::seed_from_u64(42);
        let c = AlchemyCircle::new((320.0, 240.0), Instant::now(), &mut rng);
        (c, rng)
    }

    fn close(a: f32, b: f32) -> bool { (a - b).abs() < 1e-3 }

    #[test]
    fn new_circle_is_dormant() {
        let (c, _) = make_circle();
        assert!(!c.active);
        assert_eq!(c.radius, 10.0);
        assert_eq!(c.target_radius, 120.0);
        assert_eq!(c.alpha, 0.0);
        assert!(c.runes.is_empty());
    }

    #[test]
    fn spawn_resets_and_scatters() {
        let (mut c, mut rng) = make_circle();
        c.add_rune(15.0);
        c.alpha = 0.7;
        c.radius = 90.0;
        c.spawn(RenderStyle::Strange, &mut rng);
        assert!(c.active);
        assert_eq!(c.radius, 10.0);
        assert_eq!(c.alpha, 0.0);
        assert!((70.0..=100.0).contains(&c.target_radius));
        assert!((2..=6).contains(&c.runes.len()));
        assert!(c.runes.iter().all(|r| r.progress == 0.0 && (0.0..360.0).contains(&r.angle)));
    }

    #[test]
    fn spawn_auto_scatters_more() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..50 {
            let mut c = AlchemyCircle::new((0.0, 0.0), Instant::now(), &mut rng);
            c.spawn_auto(RenderStyle::Strange, &mut rng);
            assert!((5..=14).contains(&c.runes.len()), "got {}", c.runes.len());
        }
    }

    #[test]
    fn spawn_keeps_angle() {
        let (mut c, mut rng) = make_circle();
        c.angle = 123.0;
        c.spawn(RenderStyle::Strange, &mut rng);
        assert_eq!(c.angle, 123.0);
    }

    #[test]
    fn spawn_assigns_style() {
        let (mut c, mut rng) = make_circle();
        c.spawn(RenderStyle::Classic, &mut rng);
        assert_eq!(c.style, RenderStyle::Classic);
    }

    #[test]
    fn dismiss_is_immediate() {
        let (mut c, mut rng) = make_circle();
        c.spawn(RenderStyle::Strange, &mut rng);
        c.step(0.1);
        let alpha = c.alpha;
        c.dismiss();
        assert!(!c.active);
        assert_eq!(c.alpha, alpha);
    }

    #[test]
    fn radius_single_step() {
        let (mut c, mut rng) = make_circle();
        c.spawn(RenderStyle::Strange, &mut rng);
        c.radius = 10.0;
        c.target_radius = 100.0;
        c.step(0.016);
        assert!(close(c.radius, 26.2));
    }

    #[test]
    fn radius_approaches_without_overshoot() {
        let (mut c, mut rng) = make_circle();
        c.spawn(RenderStyle::Strange, &mut rng);
        c.target_radius = 100.0;
        let mut prev = c.radius;
        for _ in 0..200 {
            c.step(0.016);
            assert!(c.radius >= prev);
            assert!(c.radius <= c.target_radius);
            prev = c.radius;
        }
        assert!(close(c.radius, 100.0));
    }

    #[test]
    fn radius_shrinks_toward_smaller_target() {
        let (mut c, mut rng) = make_circle();
        c.spawn(RenderStyle::Strange, &mut rng);
        c.radius = 150.0;
        c.target_radius = 60.0;
        for _ in 0..100 { c.step(0.016); }
        assert!(c.radius >= 60.0 && c.radius < 61.0);
    }

    #[test]
    fn alpha_full_after_half_second() {
        let (mut c, mut rng) = make_circle();
        c.spawn(RenderStyle::Strange, &mut rng);
        let mut prev = c.alpha;
        for _ in 0..30 {
            c.step(1.0 / 60.0);
            assert!(c.alpha >= prev);
            prev = c.alpha;
        }
        assert!(c.alpha >= 0.99);
        for _ in 0..30 { c.step(1.0 / 60.0); }
        assert_eq!(c.alpha, 1.0);
    }

    #[test]
    fn angle_advances_by_rotation_speed() {
        let (mut c, mut rng) = make_circle();
        c.spawn(RenderStyle::Strange, &mut rng);
        let speed = c.params.rotation_speed;
        c.step(0.5);
        assert!(close(c.angle, speed * 0.5));
    }

    #[test]
    fn rune_progress_capped_and_monotonic() {
        let (mut c, mut rng) = make_circle();
        c.spawn(RenderStyle::Strange, &mut rng);
        c.add_rune(90.0);
        let n = c.runes.len();
        let mut prev: Vec<f32> = c.runes.iter().map(|r| r.progress).collect();
        for _ in 0..100 {
            c.step(0.037);
            for (r, p) in c.runes.iter().zip(prev.iter()) {
                assert!(r.progress >= *p);
                assert!(r.progress <= 1.0);
            }
            prev = c.runes.iter().map(|r| r.progress).collect();
        }
        assert_eq!(c.runes.len(), n);
        assert!(c.runes.iter().all(Rune::is_written));
    }

    #[test]
    fn rune_written_after_point_eight_three_seconds() {
        let (mut c, mut rng) = make_circle();
        c.spawn(RenderStyle::Strange, &mut rng);
        c.runes.clear();
        c.add_rune(0.0);
        c.step(0.8);
        assert!(!c.runes[0].is_written());
        c.step(0.04);
        assert!(c.runes[0].is_written());
    }

    #[test]
    fn dormant_circle_is_frozen() {
        let (mut c, _) = make_circle();
        c.add_rune(45.0);
        let before = c.clone();
        c.step(1.0);
        assert_eq!(c.radius, before.radius);
        assert_eq!(c.alpha, before.alpha);
        assert_eq!(c.angle, before.angle);
        assert_eq!(c.runes, before.runes);
    }

    #[test]
    fn update_measures_elapsed_time() {
        use std::time::Duration;
        let mut rng = StdRng::seed_from_u64(5);
        let t0 = Instant::now();
        let mut c = AlchemyCircle::new((0.0, 0.0), t0, &mut rng);
        c.spawn(RenderStyle::Strange, &mut rng);
        c.update(t0 + Duration::from_millis(250));
        assert!(close(c.alpha, 0.5));
    }

    #[test]
    fn update_while_dormant_refreshes_clock() {
        use std::time::Duration;
        let mut rng = StdRng::seed_from_u64(5);
        let t0 = Instant::now();
        let mut c = AlchemyCircle::new((0.0, 0.0), t0, &mut rng);
        c.update(t0 + Duration::from_secs(10));
        c.spawn(RenderStyle::Strange, &mut rng);
        c.update(t0 + Duration::from_millis(10_100));
        assert!(close(c.alpha, 0.2));
    }

    #[test]
    fn depth_mapping_scenario() {
        assert!(close(radius_for_depth(85.0), 125.0));
    }

    #[test]
    fn depth_mapping_truncates_to_whole_pixels() {
        // 50 + 66/130 × 150 = 126.15
        assert_eq!(radius_for_depth(86.0), 126.0);
        assert_eq!(radius_for_depth(20.5), 50.0);
    }

    #[test]
    fn depth_mapping_clamps() {
        assert_eq!(radius_for_depth(0.0), 50.0);
        assert_eq!(radius_for_depth(20.0), 50.0);
        assert_eq!(radius_for_depth(150.0), 200.0);
        assert_eq!(radius_for_depth(900.0), 200.0);
    }

    #[test]
    fn smoothing_blends_eighty_twenty() {
        let (mut c, _) = make_circle();
        c.center = (100.0, 100.0);
        c.smooth_center((200.0, 0.0));
        assert!(close(c.center.0, 120.0));
        assert!(close(c.center.1, 80.0));
    }

    #[test]
    fn angle_to_uses_screen_convention() {
        let (mut c, _) = make_circle();
        c.center = (100.0, 100.0);
        assert!(close(c.angle_to((200.0, 100.0)), 0.0));
        // Straight down on screen is +90°.
        assert!(close(c.angle_to((100.0, 200.0)), 90.0));
        assert!(close(c.angle_to((100.0, 0.0)), -90.0));
    }
}
