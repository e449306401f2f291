//! Scripted two-hand session: shows spawn, rune, dismiss and eviction
//! without a window or a tracker.

use std::time::{Duration, Instant};

use alchemy_circle::{HandIdentity, HandRegistry, RenderStyle};
use hand_pose::landmarks::*;
use hand_pose::{Finger, LandmarkSet, Point};

/// Build a hand with the wrist at `(x, y)`.  `raised` fingers point up;
/// `pinch` touches thumb to index.
fn hand(x: i32, y: i32, raised: &[Finger], pinch: bool) -> LandmarkSet {
    let mut pts = [Point::new(x, y); LANDMARK_COUNT];
    for (i, f) in Finger::ALL.iter().enumerate() {
        let (tip, mcp) = f.joints();
        let fx = x - 30 + 20 * i as i32;
        pts[mcp] = Point::new(fx, y - 90);
        pts[tip] = Point::new(fx, if raised.contains(f) { y - 160 } else { y - 65 });
    }
    let idx = pts[INDEX_TIP];
    pts[THUMB_TIP] = if pinch {
        Point::new(idx.x + 4, idx.y + 4)
    } else {
        Point::new(idx.x - 90, idx.y)
    };
    LandmarkSet::new(pts)
}

fn show(reg: &HandRegistry) {
    if reg.is_empty() {
        println!("     (no circles)");
    }
    for (id, c) in reg.circles() {
        println!(
            "     {:<5} active={:<5} r={:>6.1}→{:<5.1} α={:.2} θ={:>6.1}° runes={}",
            id.name(), c.active, c.radius, c.target_radius, c.alpha, c.angle, c.runes.len()
        );
    }
}

fn main() {
    println!("\n=== Conjuring Circle Registry Demo ===\n");

    let mut reg = HandRegistry::with_seed(RenderStyle::Strange, 2024);
    let mut now = Instant::now();
    let frame = Duration::from_millis(33);
    let all   = Finger::ALL;

    let script: Vec<(&str, Vec<(HandIdentity, LandmarkSet)>)> = vec![
        ("left hand appears, relaxed",
            vec![(HandIdentity::Left, hand(300, 500, &[Finger::Index, Finger::Middle], false))]),
        ("left pinches",
            vec![(HandIdentity::Left, hand(300, 500, &[], true))]),
        ("left keeps pinching",
            vec![(HandIdentity::Left, hand(310, 500, &[], true))]),
        ("left points; right shows open palm",
            vec![
                (HandIdentity::Left,  hand(320, 500, &[Finger::Index], false)),
                (HandIdentity::Right, hand(800, 500, &all, false)),
            ]),
        ("left makes a fist",
            vec![
                (HandIdentity::Left,  hand(320, 500, &[], false)),
                (HandIdentity::Right, hand(800, 500, &all, false)),
            ]),
        ("right hand leaves",
            vec![(HandIdentity::Left, hand(320, 500, &[], false))]),
        ("everyone leaves", vec![]),
    ];

    for (i, (label, hands)) in script.iter().enumerate() {
        println!("{}. {}", i + 1, label);
        for _ in 0..10 {
            now += frame;
            let report = reg.process_frame(hands, now);
            reg.advance(now);
            for h in &report.hands {
                for t in &h.transitions {
                    println!("   ▸ {} {}: {:?}", h.identity, h.gesture, t);
                }
            }
            for id in &report.evicted {
                println!("   ▸ {} evicted", id);
            }
        }
        show(&reg);
        println!();
    }
}
