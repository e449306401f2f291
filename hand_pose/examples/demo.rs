//! Classifies a few hand-built poses and prints the measurements.

use hand_pose::landmarks::*;
use hand_pose::{classify, finger_is_up, hand_depth, Finger, LandmarkSet, Point};

fn pose(thumb_tip: Point, raised: &[Finger]) -> LandmarkSet {
    let mut pts = [Point::new(320, 420); LANDMARK_COUNT];
    for (i, f) in Finger::ALL.iter().enumerate() {
        let (tip, mcp) = f.joints();
        let x = 280 + 25 * i as i32;
        pts[mcp] = Point::new(x, 330);
        pts[tip] = if raised.contains(f) { Point::new(x, 260) } else { Point::new(x, 355) };
    }
    pts[THUMB_TIP] = thumb_tip;
    LandmarkSet::new(pts)
}

fn show(label: &str, pts: &LandmarkSet) {
    let ups: Vec<&str> = Finger::ALL.iter()
        .filter(|&&f| finger_is_up(pts, f))
        .map(|f| match f {
            Finger::Index  => "index",
            Finger::Middle => "middle",
            Finger::Ring   => "ring",
            Finger::Pinky  => "pinky",
        })
        .collect();
    println!(
        "   {:<22} depth={:>6.1}px  up={:<28} → {}",
        label, hand_depth(pts), format!("{:?}", ups), classify(pts)
    );
}

fn main() {
    println!("\n=== Hand Pose Classification Demo ===\n");

    let all = [Finger::Index, Finger::Middle, Finger::Ring, Finger::Pinky];
    let far_thumb = Point::new(190, 340);

    show("open palm:",         &pose(far_thumb, &all));
    show("fist:",              &pose(far_thumb, &[]));
    show("pointing:",          &pose(far_thumb, &[Finger::Index]));
    show("victory:",           &pose(far_thumb, &[Finger::Index, Finger::Middle]));
    show("pinch (thumb@index):", &pose(Point::new(285, 265), &all));
    println!();
}
