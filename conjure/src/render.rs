//! Procedural circle geometry.
//!
//! [`render_circle`] is a pure function of a circle's state: it emits a flat
//! list of [`DrawCommand`]s and touches no pixels.  [`Canvas::execute`]
//! turns each command into raster calls.  Positions and radii are
//! truncated to whole pixels before any geometry is derived from them.

use alchemy_circle::{AlchemyCircle, ColorScheme, RenderStyle};
use hand_pose::Point;

use crate::canvas::Canvas;

// ════════════════════════════════════════════════════════════════════════════
// Recipe constants
// ════════════════════════════════════════════════════════════════════════════

const OUTER_ARCS:        u32 = 12;
const OUTER_ARC_SWEEP:   i32 = 25;
const CROSS_TICKS:       u32 = 8;
const CROSS_HALF_LEN:    i32 = 8;
const CROSS_SPIN:        f32 = 1.5;
const VERTEX_MARKER_R:   i32 = 3;
const STRANGE_RING_ALPHA: f32 = 0.4;

const RUNE_RADIUS:       f32 = 0.9;
const RUNE_LEAD_DEG:     f32 = 20.0;
const RUNE_SWEEP_DEG:    f32 = 40.0;

// ════════════════════════════════════════════════════════════════════════════
// DrawCommand
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// Circle outline composited at `opacity`.
    Ring    { center: Point, radius: i32, color: u32, thickness: i32, opacity: f32 },
    /// Closed outline through `points`.
    Polygon { points: Vec<Point>, color: u32, thickness: i32 },
    Line    { from: Point, to: Point, color: u32, thickness: i32 },
    /// Degrees, screen convention.
    Arc     { center: Point, radius: i32, start_deg: i32, end_deg: i32, color: u32, thickness: i32 },
    Disc    { center: Point, radius: i32, color: u32 },
}

impl Canvas {
    pub fn execute(&mut self, cmd: &DrawCommand) {
        match cmd {
            DrawCommand::Ring { center, radius, color, thickness, opacity } => {
                if *opacity >= 1.0 {
                    self.circle(*center, *radius, *color, *thickness);
                } else {
                    self.composite(*opacity, |o| o.circle(*center, *radius, *color, *thickness));
                }
            }
            DrawCommand::Polygon { points, color, thickness } => {
                self.polyline(points, true, *color, *thickness);
            }
            DrawCommand::Line { from, to, color, thickness } => {
                self.line(*from, *to, *color, *thickness);
            }
            DrawCommand::Arc { center, radius, start_deg, end_deg, color, thickness } => {
                self.arc(*center, *radius, *start_deg as f32, *end_deg as f32, *color, *thickness);
            }
            DrawCommand::Disc { center, radius, color } => {
                self.disc(*center, *radius, *color);
            }
        }
    }

    pub fn execute_all(&mut self, cmds: &[DrawCommand]) {
        for cmd in cmds {
            self.execute(cmd);
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Recipes
// ════════════════════════════════════════════════════════════════════════════

/// Geometry for one circle.  Dormant circles produce nothing.
pub fn render_circle(circle: &AlchemyCircle) -> Vec<DrawCommand> {
    if !circle.active {
        return Vec::new();
    }
    let center = Point::new(circle.center.0 as i32, circle.center.1 as i32);
    let r      = circle.radius as i32;
    let scheme = circle.params.color_scheme();

    let mut cmds = match circle.style {
        RenderStyle::Strange => strange(circle, center, r, scheme),
        RenderStyle::Classic => classic(circle, center, r, scheme),
    };

    let rune_r = (r as f32 * RUNE_RADIUS) as i32;
    for rune in &circle.runes {
        cmds.push(DrawCommand::Arc {
            center,
            radius:    rune_r,
            start_deg: (rune.angle - RUNE_LEAD_DEG) as i32,
            end_deg:   (rune.angle - RUNE_LEAD_DEG + rune.progress * RUNE_SWEEP_DEG) as i32,
            color:     scheme.accent,
            thickness: 2,
        });
    }
    cmds
}

/// Point at `deg` on a circle of `radius` around `c`, truncated.
fn on_circle(c: Point, radius: f32, deg: f32) -> Point {
    let theta = deg.to_radians();
    Point::new(
        (c.x as f32 + radius * theta.cos()) as i32,
        (c.y as f32 + radius * theta.sin()) as i32,
    )
}

fn vertices(c: Point, radius: f32, rotation: f32, sides: u32) -> Vec<Point> {
    (0..sides)
        .map(|k| on_circle(c, radius, rotation + k as f32 * 360.0 / sides as f32))
        .collect()
}

fn strange(circle: &AlchemyCircle, c: Point, r: i32, scheme: ColorScheme) -> Vec<DrawCommand> {
    let p = &circle.params;
    let mut cmds = Vec::new();

    for layer in 0..p.mandala_layers {
        let layer_r = (r as f32 * (0.3 + layer as f32 * 0.3)) as i32;
        let layer_angle = if p.counter_rotate && layer % 2 == 1 { -circle.angle } else { circle.angle };
        let sides = if layer % 2 == 0 { 6 } else { 8 };

        cmds.push(DrawCommand::Ring {
            center: c, radius: layer_r, color: scheme.primary, thickness: 2,
            opacity: circle.alpha * STRANGE_RING_ALPHA,
        });

        let pts = vertices(c, layer_r as f32, layer_angle, sides);
        cmds.push(DrawCommand::Polygon { points: pts.clone(), color: scheme.secondary, thickness: 2 });
        for &v in &pts {
            cmds.push(DrawCommand::Line { from: c, to: v, color: scheme.accent, thickness: 1 });
        }
        for &v in &pts {
            cmds.push(DrawCommand::Disc { center: v, radius: VERTEX_MARKER_R, color: scheme.primary });
        }
    }

    for k in 0..OUTER_ARCS {
        let start = (circle.angle + k as f32 * 360.0 / OUTER_ARCS as f32) as i32;
        cmds.push(DrawCommand::Arc {
            center: c, radius: r, start_deg: start, end_deg: start + OUTER_ARC_SWEEP,
            color: scheme.primary, thickness: 2,
        });
    }

    for k in 0..CROSS_TICKS {
        let m = on_circle(c, r as f32 * 0.85, circle.angle * CROSS_SPIN + k as f32 * 360.0 / CROSS_TICKS as f32);
        let s = CROSS_HALF_LEN;
        cmds.push(DrawCommand::Line {
            from: Point::new(m.x - s, m.y), to: Point::new(m.x + s, m.y),
            color: scheme.secondary, thickness: 2,
        });
        cmds.push(DrawCommand::Line {
            from: Point::new(m.x, m.y - s), to: Point::new(m.x, m.y + s),
            color: scheme.secondary, thickness: 2,
        });
    }

    cmds
}

fn classic(circle: &AlchemyCircle, c: Point, r: i32, scheme: ColorScheme) -> Vec<DrawCommand> {
    let p = &circle.params;
    let rf = r as f32;
    let mut cmds = Vec::new();

    for i in 0..p.num_rings {
        let i = i as f32;
        cmds.push(DrawCommand::Ring {
            center:    c,
            radius:    (rf * (1.0 + i * 0.12)) as i32,
            color:     scheme.primary,
            thickness: 2,
            opacity:   (circle.alpha * (0.6 - i * 0.12)).max(0.05),
        });
    }

    cmds.push(DrawCommand::Polygon {
        points:    vertices(c, rf * 0.55, circle.angle, p.polygon_sides),
        color:     scheme.secondary,
        thickness: 2,
    });

    for k in 0..p.radial_lines {
        let deg = circle.angle + k as f32 * 360.0 / p.radial_lines as f32;
        cmds.push(DrawCommand::Line {
            from:      on_circle(c, rf * 0.7, deg),
            to:        on_circle(c, rf, deg),
            color:     scheme.primary,
            thickness: 1,
        });
    }

    cmds
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use alchemy_circle::{StyleParams, SCHEMES};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::time::Instant;

    fn params(layers: u32, counter_rotate: bool) -> StyleParams {
        StyleParams {
            polygon_sides:  5,
            radial_lines:   10,
            rotation_speed: 60.0,
            color_hue:      1,
            num_rings:      3,
            mandala_layers: layers,
            counter_rotate,
        }
    }

    /// An active circle at (400, 300), radius 100, with no runes.
    fn active(style: RenderStyle, p: StyleParams) -> AlchemyCircle {
        let mut rng = StdRng::seed_from_u64(3);
        let mut c = AlchemyCircle::new((400.0, 300.0), Instant::now(), &mut rng);
        c.spawn(style, &mut rng);
        c.params = p;
        c.radius = 100.0;
        c.alpha  = 1.0;
        c.angle  = 0.0;
        c.runes.clear();
        c
    }

    fn count<F: Fn(&DrawCommand) -> bool>(cmds: &[DrawCommand], f: F) -> usize {
        cmds.iter().filter(|c| f(c)).count()
    }

    #[test]
    fn dormant_circle_draws_nothing() {
        let mut c = active(RenderStyle::Strange, params(2, false));
        c.dismiss();
        assert!(render_circle(&c).is_empty());
    }

    #[test]
    fn strange_command_counts() {
        let cmds = render_circle(&active(RenderStyle::Strange, params(2, false)));
        // Layer 0 is a hexagon, layer 1 an octagon.
        assert_eq!(count(&cmds, |c| matches!(c, DrawCommand::Ring { .. })), 2);
        assert_eq!(count(&cmds, |c| matches!(c, DrawCommand::Polygon { .. })), 2);
        assert_eq!(count(&cmds, |c| matches!(c, DrawCommand::Disc { .. })), 14);
        assert_eq!(count(&cmds, |c| matches!(c, DrawCommand::Arc { .. })), 12);
        // 14 spokes + 8 crosses × 2 strokes.
        assert_eq!(count(&cmds, |c| matches!(c, DrawCommand::Line { .. })), 30);
    }

    #[test]
    fn strange_layer_radii_and_ring_opacity() {
        let mut c = active(RenderStyle::Strange, params(3, false));
        c.alpha = 0.5;
        let rings: Vec<(i32, f32)> = render_circle(&c).iter().filter_map(|cmd| match cmd {
            DrawCommand::Ring { radius, opacity, .. } => Some((*radius, *opacity)),
            _ => None,
        }).collect();
        assert_eq!(rings.iter().map(|r| r.0).collect::<Vec<_>>(), vec![30, 60, 90]);
        assert!(rings.iter().all(|r| (r.1 - 0.2).abs() < 1e-6));
    }

    #[test]
    fn counter_rotation_flips_odd_layers() {
        let mut c = active(RenderStyle::Strange, params(2, true));
        c.angle = 30.0;
        let polys: Vec<Vec<Point>> = render_circle(&c).into_iter().filter_map(|cmd| match cmd {
            DrawCommand::Polygon { points, .. } => Some(points),
            _ => None,
        }).collect();
        assert_eq!(polys[0][0], on_circle(Point::new(400, 300), 30.0, 30.0));
        assert_eq!(polys[1][0], on_circle(Point::new(400, 300), 60.0, -30.0));
    }

    #[test]
    fn outer_arcs_follow_angle() {
        let mut c = active(RenderStyle::Strange, params(2, false));
        c.angle = 7.9;
        let first = render_circle(&c).into_iter().find_map(|cmd| match cmd {
            DrawCommand::Arc { radius: 100, start_deg, end_deg, .. } => Some((start_deg, end_deg)),
            _ => None,
        });
        assert_eq!(first, Some((7, 32)));
    }

    #[test]
    fn rune_arc_writes_in() {
        let mut c = active(RenderStyle::Strange, params(2, false));
        c.add_rune(90.0);
        c.runes[0].progress = 0.5;
        let rune = render_circle(&c).pop();
        assert_eq!(rune, Some(DrawCommand::Arc {
            center:    Point::new(400, 300),
            radius:    90,
            start_deg: 70,
            end_deg:   90,
            color:     SCHEMES[1].accent,
            thickness: 2,
        }));
    }

    #[test]
    fn classic_command_counts_and_opacity_floor() {
        let mut c = active(RenderStyle::Classic, params(2, false));
        c.alpha = 0.1;
        let cmds = render_circle(&c);
        let rings: Vec<(i32, f32)> = cmds.iter().filter_map(|cmd| match cmd {
            DrawCommand::Ring { radius, opacity, .. } => Some((*radius, *opacity)),
            _ => None,
        }).collect();
        assert_eq!(rings.iter().map(|r| r.0).collect::<Vec<_>>(), vec![100, 112, 124]);
        assert!((rings[0].1 - 0.06).abs() < 1e-6);
        assert_eq!(rings[2].1, 0.05);
        assert_eq!(count(&cmds, |c| matches!(c, DrawCommand::Line { .. })), 10);
        match cmds.iter().find(|c| matches!(c, DrawCommand::Polygon { .. })) {
            Some(DrawCommand::Polygon { points, .. }) => assert_eq!(points.len(), 5),
            other => panic!("expected polygon, got {:?}", other),
        }
    }

    #[test]
    fn executing_commands_marks_canvas() {
        let c = active(RenderStyle::Strange, params(2, false));
        let mut canvas = Canvas::new(800, 600, 0xFF000000);
        canvas.execute_all(&render_circle(&c));
        // Outer arc at 0° passes through (500, 300).
        assert_ne!(canvas.get(500, 300), Some(0xFF000000));
        assert!(canvas.pixels().iter().any(|&p| p == SCHEMES[1].primary));
    }
}
