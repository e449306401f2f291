//! Immediate-mode raster primitives over a packed `0xAARRGGBB` buffer.
//!
//! Coordinates are `i32` pixels and may lie off-canvas; anything outside
//! is clipped.  Angles are degrees in screen convention: 0° points right
//! and positive angles sweep clockwise (toward +y).

use hand_pose::Point;

#[derive(Clone, Debug)]
pub struct Canvas {
    width:  usize,
    height: usize,
    pixels: Vec<u32>,
}

impl Canvas {
    pub fn new(width: usize, height: usize, background: u32) -> Self {
        Canvas { width, height, pixels: vec![background; width * height] }
    }

    pub fn width(&self)  -> usize { self.width }
    pub fn height(&self) -> usize { self.height }
    pub fn pixels(&self) -> &[u32] { &self.pixels }

    pub fn clear(&mut self, color: u32) {
        self.pixels.fill(color);
    }

    pub fn get(&self, x: i32, y: i32) -> Option<u32> {
        self.offset(x, y).map(|i| self.pixels[i])
    }

    fn offset(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 { return None; }
        let (x, y) = (x as usize, y as usize);
        if x < self.width && y < self.height { Some(y * self.width + x) } else { None }
    }

    pub fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        if let Some(i) = self.offset(x, y) {
            self.pixels[i] = color;
        }
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: u32) {
        for row in y.max(0)..(y + h).min(self.height as i32) {
            for col in x.max(0)..(x + w).min(self.width as i32) {
                self.set_pixel(col, row, color);
            }
        }
    }

    // ── shapes ────────────────────────────────────────────────────────────

    /// Every pixel whose distance from `c` lies within `thickness / 2` of
    /// `r` and passes `keep`.
    fn band<F: Fn(i32, i32) -> bool>(&mut self, c: Point, r: i32, thickness: i32, color: u32, keep: F) {
        let half = thickness.max(1) as f32 / 2.0;
        let r_f  = r.max(0) as f32;
        let ext  = (r_f + half).ceil() as i32;
        for dy in -ext..=ext {
            for dx in -ext..=ext {
                let d = ((dx * dx + dy * dy) as f32).sqrt();
                if (d - r_f).abs() <= half && keep(dx, dy) {
                    self.set_pixel(c.x + dx, c.y + dy, color);
                }
            }
        }
    }

    /// Circle outline.
    pub fn circle(&mut self, c: Point, r: i32, color: u32, thickness: i32) {
        self.band(c, r, thickness, color, |_, _| true);
    }

    /// Filled disc.
    pub fn disc(&mut self, c: Point, r: i32, color: u32) {
        let r = r.max(0);
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy <= r * r {
                    self.set_pixel(c.x + dx, c.y + dy, color);
                }
            }
        }
    }

    /// Circular arc from `start_deg` to `end_deg`.  Reversed bounds are
    /// swapped; a sweep of 360° or more draws the full circle.
    pub fn arc(&mut self, c: Point, r: i32, start_deg: f32, end_deg: f32, color: u32, thickness: i32) {
        let (start, end) = if end_deg < start_deg { (end_deg, start_deg) } else { (start_deg, end_deg) };
        let span = end - start;
        if span >= 360.0 {
            self.circle(c, r, color, thickness);
            return;
        }
        self.band(c, r, thickness, color, |dx, dy| {
            if dx == 0 && dy == 0 { return true; }
            let theta = (dy as f32).atan2(dx as f32).to_degrees();
            (theta - start).rem_euclid(360.0) <= span
        });
    }

    /// Straight segment (Bresenham), widened by stamping discs.
    pub fn line(&mut self, a: Point, b: Point, color: u32, thickness: i32) {
        let (mut x, mut y) = (a.x, a.y);
        let dx = (b.x - a.x).abs();
        let dy = -(b.y - a.y).abs();
        let sx = if a.x < b.x { 1 } else { -1 };
        let sy = if a.y < b.y { 1 } else { -1 };
        let mut err = dx + dy;
        let stamp = thickness / 2;

        loop {
            if stamp == 0 {
                self.set_pixel(x, y, color);
            } else {
                self.disc(Point::new(x, y), stamp, color);
            }
            if x == b.x && y == b.y { break; }
            let e2 = 2 * err;
            if e2 >= dy { err += dy; x += sx; }
            if e2 <= dx { err += dx; y += sy; }
        }
    }

    /// Connected segments through `pts`; `closed` joins last to first.
    pub fn polyline(&mut self, pts: &[Point], closed: bool, color: u32, thickness: i32) {
        for w in pts.windows(2) {
            self.line(w[0], w[1], color, thickness);
        }
        if closed && pts.len() > 2 {
            self.line(pts[pts.len() - 1], pts[0], color, thickness);
        }
    }

    // ── compositing ───────────────────────────────────────────────────────

    /// Draw onto a copy of the canvas, then blend the copy back in at
    /// `opacity`.
    pub fn composite<F: FnOnce(&mut Canvas)>(&mut self, opacity: f32, draw: F) {
        let mut overlay = self.clone();
        draw(&mut overlay);
        let t = opacity.clamp(0.0, 1.0);
        for (dst, &src) in self.pixels.iter_mut().zip(overlay.pixels.iter()) {
            if *dst != src {
                *dst = blend(*dst, src, t);
            }
        }
    }

    // ── text ──────────────────────────────────────────────────────────────

    /// Minimal bitmap font of 3×5 glyphs, each dot drawn as a `scale`²
    /// block.
    pub fn text(&mut self, text: &str, x: i32, y: i32, scale: i32, color: u32) {
        let s = scale.max(1);
        let mut cx = x;
        for ch in text.chars() {
            let glyph = char_glyph(ch);
            for (row, &bits) in glyph.iter().enumerate() {
                for col in 0..3 {
                    if bits & (1 << (2 - col)) != 0 {
                        self.fill_rect(cx + col * s, y + row as i32 * s, s, s, color);
                    }
                }
            }
            cx += 4 * s; // 3 wide + 1 gap
            if cx >= self.width as i32 { break; }
        }
    }
}

/// Pixel width of `text` at `scale`.
pub fn text_width(text: &str, scale: i32) -> i32 {
    text.chars().count() as i32 * 4 * scale.max(1)
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

fn char_glyph(c: char) -> [u8; 5] {
    match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'a' | 'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'b' | 'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'c' | 'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'd' | 'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' | 'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'f' | 'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'g' | 'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'h' | 'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' | 'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'j' | 'J' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'k' | 'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'l' | 'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' | 'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'n' | 'N' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'o' | 'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'p' | 'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'q' | 'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'r' | 'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' | 'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        't' | 'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' | 'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'v' | 'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'w' | 'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'x' | 'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'y' | 'Y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'z' | 'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '|' => [0b010, 0b010, 0b010, 0b010, 0b010],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '_' => [0b000, 0b000, 0b000, 0b000, 0b111],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _   => [0b000, 0b000, 0b010, 0b000, 0b000], // fallback dot
    }
}

/// Alpha-blend two ARGB colors. `t` = 0.0 → all `a`, `t` = 1.0 → all `b`.
pub fn blend(a: u32, b: u32, t: f32) -> u32 {
    let t = t.clamp(0.0, 1.0);
    let lerp = |ca: u32, cb: u32| (ca as f32 * (1.0 - t) + cb as f32 * t).round() as u32;
    let ar = (a >> 16) & 0xFF; let br = (b >> 16) & 0xFF;
    let ag = (a >>  8) & 0xFF; let bg = (b >>  8) & 0xFF;
    let ab =  a        & 0xFF; let bb =  b        & 0xFF;
    0xFF000000 | (lerp(ar, br) << 16) | (lerp(ag, bg) << 8) | lerp(ab, bb)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
